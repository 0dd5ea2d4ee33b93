//! Collimated outflow launched from the ISCO band.
//!
//! Outflow particles do not fly freely. Each one rides a precomputed helical
//! magnetic channel, and its state is a single progress scalar that grows with
//! the particle's Lorentz factor and the field strength. Positions are read
//! off the channel curve.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

pub mod channel;
pub mod system;

#[cfg(test)]
mod outflow_test;

pub use channel::{ChannelCurve, ChannelSet};
pub use system::{OutflowParticle, OutflowSystem};

/// Index of a magnetic channel
pub type ChannelId = u16;

/// Which side of the disk plane a particle leaves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Upper,
    Lower,
}

impl Polarity {
    /// +1 above the disk plane, -1 below
    pub fn sign(self) -> f64 {
        match self {
            Polarity::Upper => 1.0,
            Polarity::Lower => -1.0,
        }
    }

    /// Even odds from a uniform in [0, 1)
    pub fn from_uniform(u: f64) -> Self {
        if u < 0.5 {
            Polarity::Upper
        } else {
            Polarity::Lower
        }
    }
}

/// A launch produced by the disk, consumed by [`OutflowSystem::launch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchEvent {
    pub channel: ChannelId,
    pub polarity: Polarity,
    pub lorentz_factor: f64,
    /// Uniform in [0, 1) spreading the particle lifetime
    pub lifetime_jitter: f64,
}

/// Shape and pacing of the outflow channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutflowTunables {
    /// Progress gained per unit Lorentz factor and field strength (1/s)
    pub progress_rate: f64,
    /// Nominal particle lifetime (s)
    pub max_age: f64,
    /// Fractional spread of the lifetime around `max_age`
    pub lifetime_spread: f64,
    /// Time a particle may sit at the end of its channel (s)
    pub saturation_hold: f64,
    /// Exponent e in the progress^e shaping of the helix
    pub helix_exponent: f64,
    /// Full turns of the helix along the channel
    pub helix_turns: f64,
    /// Channel foot radius in ISCO radii
    pub base_radius_factor: f64,
    /// Fraction of the foot radius lost by the end of the channel
    pub collimation: f64,
    /// Foot height in horizon radii
    pub base_height_radii: f64,
    /// Channel length along the spin axis in horizon radii
    pub length_radii: f64,
    /// Samples per channel curve
    pub samples: usize,
}

impl Default for OutflowTunables {
    fn default() -> Self {
        Self {
            progress_rate: 0.15,
            max_age: 6.0,
            lifetime_spread: 0.3,
            saturation_hold: 0.5,
            helix_exponent: 0.4,
            helix_turns: 1.5,
            base_radius_factor: 1.1,
            collimation: 0.85,
            base_height_radii: 0.5,
            length_radii: 60.0,
            samples: 64,
        }
    }
}

impl OutflowTunables {
    pub fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            return Err(ConfigurationError::InvalidSettings(
                "outflow channels need at least two samples".to_string(),
            ));
        }
        if !(0.35..=0.5).contains(&self.helix_exponent) {
            return Err(ConfigurationError::InvalidSettings(format!(
                "helix exponent {} outside 0.35..=0.5",
                self.helix_exponent
            )));
        }
        if !(self.max_age.is_finite() && self.max_age > 0.0) {
            return Err(ConfigurationError::InvalidSettings(
                "outflow max age must be positive".to_string(),
            ));
        }
        let shape = [
            self.progress_rate,
            self.saturation_hold,
            self.helix_turns,
            self.base_radius_factor,
            self.base_height_radii,
            self.length_radii,
        ];
        if !shape.iter().all(|v| v.is_finite() && *v >= 0.0) {
            return Err(ConfigurationError::InvalidSettings(
                "outflow rates and channel shape must be finite and non-negative".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.lifetime_spread) || !(0.0..1.0).contains(&self.collimation) {
            return Err(ConfigurationError::InvalidSettings(
                "lifetime spread and collimation must lie in 0..1".to_string(),
            ));
        }
        Ok(())
    }
}
