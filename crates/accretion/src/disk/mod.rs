//! Accretion disk particle system.
//!
//! A fixed population of disk elements orbits in the x-y plane. Every tick
//! each element:
//!
//! 1. Feels the companion's perturbation, decomposed in its local
//!    cylindrical frame
//! 2. Drifts inward from viscous angular-momentum loss
//! 3. Integrates damped radial and vertical motion with the tangential
//!    speed floored at the Keplerian profile
//! 4. Precesses under frame dragging
//! 5. Updates its temperature and density
//! 6. Inside the ISCO band, may launch an outflow particle
//!
//! Elements that launch or plunge below the ISCO are reset to the outer
//! edge. The population size never changes.
//!
//! # Physics
//!
//! The profiles are approximations tuned for a plausible picture:
//!
//! - Temperature: T(r) = T_peak (1 − (r − r_isco)/Δ)^¾ plus ISCO heating
//! - Density: ρ ∝ ṁ (r_isco / r)^(15/8)
//! - Launch power: P ∝ a² B² exp(−(r − r_s)/r_s) (Blandford-Znajek)

use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_setting, non_negative, positive};

pub mod particle;
pub mod physics;
pub mod system;


pub use particle::DiskParticle;
pub use system::{DiskConditions, DiskReport, DiskSystem};

/// Empirically tuned constants of the disk model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiskTunables {
    /// Coefficient k of the tangential floor v_φ = k r^-1.5
    pub keplerian_coefficient: f64,
    /// Viscous inward drift per unit α·ṁ at r = r_s (units/s²)
    pub radial_drift: f64,
    /// Extra inward pull inside the ISCO, per ISCO radius of depth
    pub plunge_acceleration: f64,
    /// Tangential drag per unit α (1/s)
    pub tangential_drag: f64,
    /// Vertical spring constant toward the mid-plane (1/s²)
    pub vertical_restoring: f64,
    /// Radial velocity kept per step
    pub radial_damping: f64,
    /// Vertical velocity kept per step
    pub vertical_damping: f64,
    /// Bound on |height| (scene units)
    pub max_height: f64,
    /// Half width of the ISCO band (scene units)
    pub isco_band_half_width: f64,
    /// Depth below the ISCO at which an element is reset (scene units)
    pub plunge_margin: f64,
    /// Time in band after which launches become likely (s)
    pub launch_timescale: f64,
    /// Multiplier on Ω(r) = 2 a r_s³ / r³
    pub frame_dragging_strength: f64,
    /// Warp amplitude per unit spin, in horizon radii
    pub warp_tilt: f64,
    /// Heating gained in band per second, as a fraction of the peak temperature
    pub heating_rate: f64,
    /// Fractional heat loss per second outside the band
    pub cooling_rate: f64,
    /// Γ = 1 + scale · P
    pub lorentz_scale: f64,
    pub max_lorentz: f64,
    /// Power-law index of the initial radius distribution
    pub initial_radius_index: f64,
    /// Respawned elements start between this fraction of the outer radius and the edge
    pub respawn_inner_fraction: f64,
    /// Half thickness of the initial disk (scene units)
    pub initial_thickness: f64,
}

impl Default for DiskTunables {
    fn default() -> Self {
        Self {
            keplerian_coefficient: 6_000.0,
            radial_drift: 20.0,
            plunge_acceleration: 200.0,
            tangential_drag: 1.0,
            vertical_restoring: 4.0,
            radial_damping: 0.98,
            vertical_damping: 0.95,
            max_height: 6.0,
            isco_band_half_width: 3.0,
            plunge_margin: 2.0,
            launch_timescale: 0.5,
            frame_dragging_strength: 1.0,
            warp_tilt: 0.3,
            heating_rate: 0.5,
            cooling_rate: 2.0,
            lorentz_scale: 4.0,
            max_lorentz: 10.0,
            initial_radius_index: -0.5,
            respawn_inner_fraction: 0.75,
            initial_thickness: 1.5,
        }
    }
}

impl DiskTunables {
    pub fn validate(&self) -> Result<()> {
        let rates = [
            self.keplerian_coefficient,
            self.radial_drift,
            self.plunge_acceleration,
            self.tangential_drag,
            self.vertical_restoring,
            self.isco_band_half_width,
            self.plunge_margin,
            self.frame_dragging_strength,
            self.warp_tilt,
            self.heating_rate,
            self.cooling_rate,
            self.lorentz_scale,
            self.initial_thickness,
        ];
        ensure_setting(rates.iter().all(|&v| non_negative(v)), "disk rates and widths", "finite and non-negative")?;
        ensure_setting(
            (0.0..=1.0).contains(&self.radial_damping) && (0.0..=1.0).contains(&self.vertical_damping),
            "disk damping factors",
            "in 0..=1",
        )?;
        ensure_setting(positive(self.max_height), "disk maxHeight", "positive")?;
        ensure_setting(positive(self.launch_timescale), "disk launchTimescale", "positive")?;
        ensure_setting(self.max_lorentz.is_finite() && self.max_lorentz >= 1.0, "disk maxLorentz", "at least 1")?;
        ensure_setting(self.initial_radius_index.is_finite(), "disk initialRadiusIndex", "finite")?;
        ensure_setting(
            self.respawn_inner_fraction > 0.0 && self.respawn_inner_fraction <= 1.0,
            "disk respawnInnerFraction",
            "in (0, 1]",
        )
    }
}
