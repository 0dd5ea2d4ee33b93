//! Gravity and radiatively driven wind of the companion body

use nalgebra::{Point3, Vector3};
use units::Mass;

use crate::forces::ForceModel;
use crate::vector::safe_normalize;

/// Softening ε added to d² in both companion terms (scene units²)
pub const SOFTENING: f64 = 1.0;

/// Scene gravitational coupling per solar mass of companion
pub const GRAVITY_COUPLING: f64 = 40.0;

/// Scene coupling of wind momentum flux (density × speed)
pub const WIND_COUPLING: f64 = 60.0;

/// Wind pressure only acts within this many companion radii
pub const WIND_REACH_RADII: f64 = 4.0;

/// Force-relevant companion state, copied once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompanionSource {
    pub position: Point3<f64>,
    pub mass: Mass,
    /// Physical radius (scene units)
    pub radius: f64,
    /// Hill-sphere analogue; gravity is zero outside it
    pub influence_radius: f64,
    pub gravity_strength: f64,
    pub wind_speed: f64,
    pub wind_density: f64,
}

impl CompanionSource {
    /// Attraction toward the companion, active inside the influence radius.
    pub fn gravity_at(&self, position: &Point3<f64>) -> Vector3<f64> {
        let toward = self.position - position;
        let d2 = toward.norm_squared();
        if d2 > self.influence_radius * self.influence_radius {
            return Vector3::zeros();
        }
        let magnitude =
            self.gravity_strength * GRAVITY_COUPLING * self.mass.to_solar_masses() / (d2 + SOFTENING);
        safe_normalize(&toward, Vector3::zeros()) * magnitude
    }

    /// Outward wind pressure, active within [`WIND_REACH_RADII`] companion radii.
    pub fn wind_at(&self, position: &Point3<f64>) -> Vector3<f64> {
        let away = position - self.position;
        let d2 = away.norm_squared();
        let reach = WIND_REACH_RADII * self.radius;
        if d2 > reach * reach {
            return Vector3::zeros();
        }
        let magnitude = WIND_COUPLING * self.wind_density * self.wind_speed / (d2 + SOFTENING);
        safe_normalize(&away, Vector3::zeros()) * magnitude
    }
}

impl ForceModel for CompanionSource {
    fn acceleration_at(&self, position: &Point3<f64>) -> Vector3<f64> {
        self.gravity_at(position) + self.wind_at(position)
    }
}

/// Compute Hill radius for a body orbiting a much heavier primary
///
/// r_H = a (1 − e) (m / 3M)^(1/3), evaluated at pericentre.
///
/// # Examples
///
/// ```
/// use accretion::forces::hill_radius;
/// use units::Mass;
///
/// // Earth's Hill radius at 1 AU is about 0.01 AU
/// let r_hill = hill_radius(Mass::from_solar_masses(3.0e-6), Mass::from_solar_masses(1.0), 1.0, 0.0);
/// assert!((r_hill - 0.01).abs() < 0.001);
/// ```
pub fn hill_radius(mass: Mass, primary_mass: Mass, semi_major_axis: f64, eccentricity: f64) -> f64 {
    let ratio = mass / (primary_mass * 3.0);
    semi_major_axis * (1.0 - eccentricity) * ratio.max(0.0).cbrt()
}
