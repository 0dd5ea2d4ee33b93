use serde::Serialize;
use units::Temperature;

/// Aggregate counters and gauges for display.
///
/// Counters accumulate from construction; gauges describe the state after
/// the most recent tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Disk elements removed at the ISCO, with or without a launch
    pub captures: u64,
    pub launches: u64,
    /// Captures without a visible launch
    pub plunges: u64,
    pub outflow_launched: u64,
    pub outflow_evicted: u64,
    pub outflow_active: usize,
    pub debris_emitted: u64,
    pub debris_evicted: u64,
    pub debris_circularized: u64,
    pub debris_accreted: u64,
    /// Debris removed after reaching its maximum age
    pub debris_expired: u64,
    pub debris_in_stream: usize,
    pub debris_in_disk: usize,
    pub disruptions: u64,
    /// Bodies captured before disruption
    pub swallowed: u64,
    pub pair_annihilations: u64,
    pub pair_swallowed: u64,
    /// Mean inward radial speed of the disk (units/s)
    pub average_infall_speed: f64,
    pub peak_temperature: Temperature,
    /// Most recent adaptive step (s)
    pub last_dt: f64,
    pub ticks: u64,
    /// Simulated time (s)
    pub time: f64,
    /// Slots reset after their state became non-finite
    pub numeric_faults: u64,
}
