//! Tidal disruption of an infalling body.
//!
//! A single body falls in on a nearly parabolic orbit and moves through a
//! one-way state machine:
//!
//! ```text
//! Approaching ──(d < r_t)──▶ Stretching ──(integrity < threshold)──▶ Disrupted
//!      │                          │
//!      └──────(d < r_capture)─────┴──▶ Swallowed
//! ```
//!
//! Once disrupted the remnant sheds debris every tick until its budget is
//! spent. Debris rides the stream on free orbits until its radial speed
//! vanishes, then circularizes and spirals inward as viscosity drains its
//! angular momentum.

use serde::{Deserialize, Serialize};
use units::Mass;

use crate::error::{Result, ensure_setting, non_negative, positive};

pub mod body;
pub mod debris;
pub mod encounter;


pub use body::{TidalBody, TidalPhase, tidal_radius};
pub use debris::{DebrisParticle, DebrisState};
pub use encounter::{TidalCounters, TidalEncounter, TidalReport};

/// Empirically tuned constants of the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TidalTunables {
    pub body_mass: Mass,
    /// Visual radius of the intact body (scene units)
    pub body_radius: f64,
    /// Start distance from the centre (scene units)
    pub spawn_radius: f64,
    /// Prefactor of r_t = f · r_s · (M / m)^⅓
    pub tidal_radius_factor: f64,
    /// Upper bound on r_t (scene units)
    pub tidal_radius_cap: f64,
    /// Pericentre target range as fractions of r_t
    pub pericenter_min: f64,
    pub pericenter_max: f64,
    /// Initial kinetic energy as a fraction of the escape value
    pub energy_fraction: f64,
    /// Integrity lost per second at the centre of the tidal sphere
    pub disruption_rate: f64,
    /// Integrity below which the body is disrupted
    pub disruption_threshold: f64,
    /// Elongation per unit of lost integrity
    pub stretch_gain: f64,
    pub debris_per_tick: usize,
    /// Total debris a disrupted body can shed
    pub debris_budget: usize,
    /// Positional spread of new debris, in body radii
    pub debris_spread: f64,
    /// Fractional velocity jitter of new debris
    pub velocity_jitter: f64,
    pub debris_max_age: f64,
    /// Radial speed below which stream debris circularizes (units/s)
    pub circularization_epsilon: f64,
    /// Minimum circularization radius in ISCO radii
    pub circularization_min_factor: f64,
    /// Fractional angular-momentum loss per second once circularized
    pub viscous_decay: f64,
}

impl Default for TidalTunables {
    fn default() -> Self {
        Self {
            body_mass: Mass::from_solar_masses(1.0),
            body_radius: 3.0,
            spawn_radius: 300.0,
            tidal_radius_factor: 3.0,
            tidal_radius_cap: 80.0,
            pericenter_min: 0.35,
            pericenter_max: 0.6,
            energy_fraction: 0.95,
            disruption_rate: 2.0,
            disruption_threshold: 0.3,
            stretch_gain: 3.0,
            debris_per_tick: 12,
            debris_budget: 3_000,
            debris_spread: 1.0,
            velocity_jitter: 0.05,
            debris_max_age: 60.0,
            circularization_epsilon: 2.0,
            circularization_min_factor: 1.5,
            viscous_decay: 0.05,
        }
    }
}

impl TidalTunables {
    pub fn validate(&self) -> Result<()> {
        ensure_setting(positive(self.body_mass.to_solar_masses()), "tidal bodyMass", "positive")?;
        let lengths = [self.body_radius, self.spawn_radius, self.tidal_radius_cap, self.debris_max_age];
        ensure_setting(
            lengths.iter().all(|&v| positive(v)),
            "tidal body radius, spawn radius, radius cap and debris lifetime",
            "positive",
        )?;
        let rates = [
            self.tidal_radius_factor,
            self.disruption_rate,
            self.stretch_gain,
            self.debris_spread,
            self.velocity_jitter,
            self.circularization_epsilon,
            self.circularization_min_factor,
            self.viscous_decay,
        ];
        ensure_setting(rates.iter().all(|&v| non_negative(v)), "tidal rates and spreads", "finite and non-negative")?;
        ensure_setting(
            non_negative(self.pericenter_min) && self.pericenter_min <= self.pericenter_max && self.pericenter_max.is_finite(),
            "tidal pericenter range",
            "0 <= min <= max",
        )?;
        ensure_setting(
            self.energy_fraction > 0.0 && self.energy_fraction <= 1.0,
            "tidal energyFraction",
            "in (0, 1]",
        )?;
        ensure_setting(
            self.disruption_threshold > 0.0 && self.disruption_threshold < 1.0,
            "tidal disruptionThreshold",
            "in (0, 1)",
        )
    }
}
