use serde::{Deserialize, Serialize};

/// Populations that [`Simulation::reset`](crate::Simulation::reset) can
/// reinitialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// Redistribute the disk over its full radial range
    Disk,
    /// Drop every outflow particle in flight
    Outflow,
    /// Introduce a fresh infalling body and drop the old debris
    TidalEncounter,
    /// Restart the companion's wind
    CompanionWind,
    Pairs,
    All,
}

impl Scenario {
    pub fn includes(self, other: Scenario) -> bool {
        self == Scenario::All || self == other
    }
}
