//! Force models for the accretion engine
//!
//! Every term is a pure function of position and of state frozen at the start
//! of the tick, so one [`ForceField`] can be shared by all worker threads
//! during the parallel particle passes. Nothing here allocates.

use nalgebra::{Point3, Vector3};

use crate::geometry::Geometry;

pub mod central;
pub mod companion;


pub use central::CentralGravity;
pub use companion::{CompanionSource, hill_radius};

/// A source of acceleration at a point in space
///
/// # Examples
///
/// ```
/// use accretion::forces::{CentralGravity, ForceModel};
/// use nalgebra::Point3;
///
/// let gravity = CentralGravity::new(50_000.0);
/// let accel = gravity.acceleration_at(&Point3::new(100.0, 0.0, 0.0));
///
/// // Points back toward the origin
/// assert!(accel.x < 0.0);
/// assert!((accel.x + 5.0).abs() < 1e-9);
/// ```
pub trait ForceModel: Send + Sync {
    /// Acceleration in scene units/s² at `position`
    fn acceleration_at(&self, position: &Point3<f64>) -> Vector3<f64>;
}

/// The complete field for one tick: central gravity plus the optional companion.
#[derive(Debug, Clone, Copy)]
pub struct ForceField {
    central: CentralGravity,
    companion: Option<CompanionSource>,
}

impl ForceField {
    /// Freezes the field for a tick.
    ///
    /// `companion` is a copy of the companion's force-relevant state, so the
    /// companion itself can only be mutated between ticks.
    pub fn new(geometry: &Geometry, companion: Option<CompanionSource>) -> Self {
        Self {
            central: CentralGravity::new(geometry.gm),
            companion,
        }
    }

    /// Central gravity only.
    pub fn central_only(geometry: &Geometry) -> Self {
        Self::new(geometry, None)
    }

    pub fn companion(&self) -> Option<&CompanionSource> {
        self.companion.as_ref()
    }

    /// Companion gravity plus wind; zero when no companion is active.
    pub fn companion_acceleration_at(&self, position: &Point3<f64>) -> Vector3<f64> {
        self.companion
            .as_ref()
            .map_or_else(Vector3::zeros, |c| c.acceleration_at(position))
    }
}

impl ForceModel for ForceField {
    fn acceleration_at(&self, position: &Point3<f64>) -> Vector3<f64> {
        self.central.acceleration_at(position) + self.companion_acceleration_at(position)
    }
}

/// Advance a free body by one kick-drift-kick leapfrog step.
///
/// 1. Kick: v(t + dt/2) = v(t) + a(t) * dt/2
/// 2. Drift: x(t + dt) = x(t) + v(t + dt/2) * dt
/// 3. Kick: v(t + dt) = v(t + dt/2) + a(t + dt) * dt/2
pub fn leapfrog_step<F: ForceModel + ?Sized>(
    position: &mut Point3<f64>,
    velocity: &mut Vector3<f64>,
    dt: f64,
    force: &F,
) {
    let half = 0.5 * dt;
    *velocity += force.acceleration_at(position) * half;
    *position += *velocity * dt;
    *velocity += force.acceleration_at(position) * half;
}
