//! Companion body and its wind.
//!
//! The companion rides an imposed Kepler orbit (no back-reaction on the
//! central body). Every option can change between ticks; the body is
//! reconfigured in place and its influence radius recomputed. Its force
//! contribution leaves this module only as a [`CompanionSource`] copy.
//!
//! [`CompanionSource`]: crate::forces::CompanionSource

use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_setting, non_negative, positive};

pub mod body;
pub mod wind;


pub use body::CompanionBody;
pub use wind::{WindParticle, WindPool};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanionTunables {
    /// radius = scale · (m / M☉)^exponent, clamped
    pub radius_scale: f64,
    pub radius_exponent: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Influence radius never drops below this many companion radii
    pub influence_floor_radii: f64,
    /// Nominal wind particle lifetime (s)
    pub wind_max_age: f64,
    /// Fractional spread of wind speeds and lifetimes
    pub wind_spread: f64,
}

impl Default for CompanionTunables {
    fn default() -> Self {
        Self {
            radius_scale: 2.0,
            radius_exponent: 0.5,
            min_radius: 2.0,
            max_radius: 12.0,
            influence_floor_radii: 6.0,
            wind_max_age: 4.0,
            wind_spread: 0.3,
        }
    }
}

impl CompanionTunables {
    pub fn validate(&self) -> Result<()> {
        ensure_setting(positive(self.radius_scale), "companion radiusScale", "positive")?;
        ensure_setting(self.radius_exponent.is_finite(), "companion radiusExponent", "finite")?;
        ensure_setting(
            positive(self.min_radius) && self.max_radius.is_finite() && self.min_radius <= self.max_radius,
            "companion radius bounds",
            "positive with minRadius <= maxRadius",
        )?;
        ensure_setting(non_negative(self.influence_floor_radii), "companion influenceFloorRadii", "non-negative")?;
        ensure_setting(positive(self.wind_max_age), "companion windMaxAge", "positive")?;
        ensure_setting((0.0..1.0).contains(&self.wind_spread), "companion windSpread", "in 0..1")
    }
}
