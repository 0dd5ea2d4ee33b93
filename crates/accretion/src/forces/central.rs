//! Inverse-square gravity of the central body

use nalgebra::{Point3, Vector3};

use crate::forces::ForceModel;
use crate::vector::floored_norm;

/// Newtonian pull toward the origin, a = -GM/r² · r̂.
///
/// The distance is floored so the field stays finite at the origin; inside
/// the floor the magnitude falls off linearly to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralGravity {
    /// Gravitational parameter GM (scene units³/s²)
    pub gm: f64,
}

impl CentralGravity {
    pub fn new(gm: f64) -> Self {
        Self { gm }
    }
}

impl ForceModel for CentralGravity {
    fn acceleration_at(&self, position: &Point3<f64>) -> Vector3<f64> {
        let r = floored_norm(&position.coords);
        -position.coords * (self.gm / (r * r * r))
    }
}
