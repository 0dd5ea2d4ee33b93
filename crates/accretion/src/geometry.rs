//! Derived scene geometry of the central body.
//!
//! Distances are scene units. The horizon radius `r_s` is fixed in scene units
//! by [`EngineSettings`]; the gravitational parameter follows from
//! `r_s = 2GM/c²` with the scene light speed, so the central mass never
//! rescales the picture. It does set the physical scale (Schwarzschild radius
//! in km), the peak disk temperature and the tidal mass ratio.

use serde::Serialize;
use units::{Mass, Temperature};

use crate::config::{EngineSettings, SimulationConfig};

/// Peak disk temperature of a 10⁸ M☉ hole accreting at the Eddington rate (K)
const PEAK_TEMPERATURE_REFERENCE_K: f64 = 6.3e5;

/// Reference mass for the temperature scaling (M☉)
const TEMPERATURE_REFERENCE_MASS: f64 = 1.0e8;

/// Outer disk edge in horizon radii
pub const DISK_OUTER_RADII: f64 = 20.0;

/// Quantities derived from the current configuration.
///
/// Recomputed on every configuration commit; never mutated during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub central_mass: Mass,
    pub spin: f64,
    /// Event-horizon radius r_s (scene units)
    pub horizon_radius: f64,
    /// Scene light speed (scene units per second)
    pub light_speed: f64,
    /// Gravitational parameter GM (scene units³/s²)
    pub gm: f64,
    /// Innermost stable circular orbit (scene units)
    pub isco_radius: f64,
    pub disk_outer_radius: f64,
    pub peak_temperature: Temperature,
}

impl Geometry {
    pub fn new(config: &SimulationConfig, settings: &EngineSettings) -> Self {
        let r_s = settings.horizon_radius;
        let c = settings.light_speed;

        Self {
            central_mass: config.central_mass,
            spin: config.spin,
            horizon_radius: r_s,
            light_speed: c,
            gm: 0.5 * c * c * r_s,
            isco_radius: isco_radius(config.spin, r_s),
            disk_outer_radius: DISK_OUTER_RADII * r_s,
            peak_temperature: peak_disk_temperature(config.central_mass, config.accretion_rate),
        }
    }

    /// Radius below which matter is removed from the simulation.
    pub fn capture_radius(&self) -> f64 {
        self.isco_radius
    }

    /// Circular orbital speed sqrt(GM/r) for freely moving bodies.
    pub fn circular_speed(&self, radius: f64) -> f64 {
        (self.gm / radius.max(crate::vector::DISTANCE_FLOOR)).sqrt()
    }

    /// Lense-Thirring precession rate Ω(r) = 2·a·r_s³/r³ (rad/s before tuning).
    pub fn frame_dragging_rate(&self, radius: f64) -> f64 {
        let r = radius.max(self.horizon_radius);
        2.0 * self.spin * self.horizon_radius.powi(3) / r.powi(3)
    }

    /// Physical size of one scene unit in kilometres.
    pub fn kilometres_per_unit(&self) -> f64 {
        self.central_mass.schwarzschild_radius_km() / self.horizon_radius
    }
}

/// Prograde ISCO radius for dimensionless spin `a`, in the units of `horizon_radius`.
///
/// Bardeen, Press & Teukolsky (1972):
///
/// ```text
/// Z₁ = 1 + (1 − a²)^⅓ [(1 + a)^⅓ + (1 − a)^⅓]
/// Z₂ = √(3a² + Z₁²)
/// r_isco = r_g [3 + Z₂ − √((3 − Z₁)(3 + Z₁ + 2Z₂))]
/// ```
///
/// with r_g = r_s / 2. A non-spinning hole gives 3 r_s.
///
/// ```
/// use accretion::geometry::isco_radius;
///
/// assert!((isco_radius(0.0, 10.0) - 30.0).abs() < 1e-9);
/// assert!(isco_radius(0.9, 10.0) < isco_radius(0.5, 10.0));
/// ```
pub fn isco_radius(spin: f64, horizon_radius: f64) -> f64 {
    let a = spin.clamp(0.0, 1.0);
    let z1 = 1.0 + (1.0 - a * a).cbrt() * ((1.0 + a).cbrt() + (1.0 - a).cbrt());
    let z2 = (3.0 * a * a + z1 * z1).sqrt();
    let r_over_rg = 3.0 + z2 - ((3.0 - z1) * (3.0 + z1 + 2.0 * z2)).max(0.0).sqrt();
    0.5 * horizon_radius * r_over_rg
}

/// Peak thin-disk temperature for a given hole mass and accretion rate.
///
/// Shakura-Sunyaev scaling T ∝ ṁ^¼ M^-¼, normalised so a 10⁸ M☉ hole at the
/// Eddington rate peaks near 6.3 × 10⁵ K.
pub fn peak_disk_temperature(mass: Mass, accretion_rate: f64) -> Temperature {
    if accretion_rate <= 0.0 || mass.to_solar_masses() <= 0.0 {
        return Temperature::zero();
    }
    let scale = accretion_rate.powf(0.25)
        * (mass.to_solar_masses() / TEMPERATURE_REFERENCE_MASS).powf(-0.25);
    Temperature::from_kelvin(PEAK_TEMPERATURE_REFERENCE_K * scale)
}
