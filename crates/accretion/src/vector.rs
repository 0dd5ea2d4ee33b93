//! Small vector helpers on top of nalgebra.
//!
//! The disk works in a local cylindrical frame (radius, azimuth, height) with
//! the disk plane in x-y and the spin axis along +z. Everything else uses
//! Cartesian `Point3`/`Vector3`.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

/// Smallest distance used in any inverse-square law (scene units)
pub const DISTANCE_FLOOR: f64 = 1.0e-3;

/// Length of a vector, never below [`DISTANCE_FLOOR`].
pub fn floored_norm(v: &Vector3<f64>) -> f64 {
    v.norm().max(DISTANCE_FLOOR)
}

/// Unit vector along `v`, or `fallback` when `v` is too short to normalize.
pub fn safe_normalize(v: &Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n > DISTANCE_FLOOR && n.is_finite() {
        v / n
    } else {
        fallback
    }
}

/// Cartesian position of a disk element.
pub fn cylindrical_to_cartesian(radius: f64, angle: f64, height: f64) -> Point3<f64> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(radius * cos, radius * sin, height)
}

/// Uniformly distributed unit vector from two uniforms in [0, 1).
pub fn unit_vector_from_uniforms(u1: f64, u2: f64) -> Vector3<f64> {
    let z = 2.0 * u1 - 1.0;
    let ring = (1.0 - z * z).max(0.0).sqrt();
    let (sin, cos) = (TAU * u2).sin_cos();
    Vector3::new(ring * cos, ring * sin, z)
}

/// Two unit vectors completing `axis` to an orthonormal basis.
pub fn perpendicular_basis(axis: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let axis = safe_normalize(axis, Vector3::z());
    // Pick the world axis least aligned with `axis` as a seed
    let seed = if axis.z.abs() < 0.9 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    let e1 = safe_normalize(&axis.cross(&seed), Vector3::x());
    let e2 = axis.cross(&e1);
    (e1, e2)
}

/// Local cylindrical frame at a given azimuth.
///
/// ```
/// use accretion::vector::CylindricalFrame;
/// use nalgebra::Vector3;
///
/// let frame = CylindricalFrame::at_angle(0.0);
/// let (radial, tangential, vertical) = frame.decompose(&Vector3::new(1.0, 2.0, 3.0));
/// assert!((radial - 1.0).abs() < 1e-12);
/// assert!((tangential - 2.0).abs() < 1e-12);
/// assert!((vertical - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CylindricalFrame {
    pub radial: Vector3<f64>,
    pub tangential: Vector3<f64>,
    pub vertical: Vector3<f64>,
}

impl CylindricalFrame {
    pub fn at_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            radial: Vector3::new(cos, sin, 0.0),
            tangential: Vector3::new(-sin, cos, 0.0),
            vertical: Vector3::z(),
        }
    }

    /// Components of `v` along (radial, tangential, vertical).
    pub fn decompose(&self, v: &Vector3<f64>) -> (f64, f64, f64) {
        (
            v.dot(&self.radial),
            v.dot(&self.tangential),
            v.dot(&self.vertical),
        )
    }
}
