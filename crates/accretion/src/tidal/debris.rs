//! Debris stream and circularization

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::Serialize;
use units::Temperature;

use super::TidalTunables;
use crate::forces::{ForceModel, leapfrog_step};
use crate::geometry::Geometry;
use crate::vector::{DISTANCE_FLOOR, safe_normalize};

/// Debris lifecycle; `InStream → Circularized` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DebrisState {
    InStream,
    Circularized,
}

/// What a debris step asks the owner to do with the particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebrisFate {
    Keep,
    /// Circularized this step
    Circularized,
    /// Crossed the capture boundary
    Accreted,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebrisParticle {
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    /// Specific angular momentum r × v
    pub angular_momentum: Vector3<f64>,
    pub temperature: Temperature,
    pub age: f64,
    pub max_age: f64,
    pub state: DebrisState,
}

impl DebrisParticle {
    pub fn new(position: Point3<f64>, velocity: Vector3<f64>, max_age: f64, geometry: &Geometry) -> Self {
        let mut particle = Self {
            position,
            velocity,
            angular_momentum: position.coords.cross(&velocity),
            temperature: Temperature::zero(),
            age: 0.0,
            max_age,
            state: DebrisState::InStream,
        };
        particle.update_temperature(geometry);
        particle
    }

    pub fn radius(&self) -> f64 {
        self.position.coords.norm()
    }

    /// Radial component of the velocity
    pub fn radial_velocity(&self) -> f64 {
        let r_hat = safe_normalize(&self.position.coords, Vector3::x());
        self.velocity.dot(&r_hat)
    }

    /// Advance one step.
    ///
    /// Stream debris follows the field with a leapfrog step. Circularized
    /// debris keeps a circular orbit whose angular momentum decays by
    /// `viscous_decay` per second, so r = |L|² / GM shrinks.
    pub fn advance<F: ForceModel + ?Sized>(
        &mut self,
        dt: f64,
        field: &F,
        geometry: &Geometry,
        tunables: &TidalTunables,
    ) -> DebrisFate {
        self.age += dt;
        let capture = geometry.capture_radius();

        let fate = match self.state {
            DebrisState::InStream => {
                leapfrog_step(&mut self.position, &mut self.velocity, dt, field);
                self.angular_momentum = self.position.coords.cross(&self.velocity);
                let r = self.radius();

                if r < capture || !r.is_finite() {
                    DebrisFate::Accreted
                } else if self.radial_velocity().abs() < tunables.circularization_epsilon
                    && r > tunables.circularization_min_factor * geometry.isco_radius
                {
                    self.circularize(geometry);
                    DebrisFate::Circularized
                } else {
                    DebrisFate::Keep
                }
            }
            DebrisState::Circularized => {
                self.spiral(dt, geometry, tunables.viscous_decay);
                if self.radius() < capture {
                    DebrisFate::Accreted
                } else {
                    DebrisFate::Keep
                }
            }
        };

        if fate == DebrisFate::Keep && self.age > self.max_age {
            return DebrisFate::Expired;
        }
        self.update_temperature(geometry);
        fate
    }

    /// Replace the velocity with the circular one at the current radius,
    /// tangent to the orbital plane.
    fn circularize(&mut self, geometry: &Geometry) {
        let r_hat = safe_normalize(&self.position.coords, Vector3::x());
        let l_hat = safe_normalize(&self.angular_momentum, Vector3::z());
        let tangent = safe_normalize(&l_hat.cross(&r_hat), Vector3::y());

        self.velocity = tangent * geometry.circular_speed(self.radius());
        self.angular_momentum = self.position.coords.cross(&self.velocity);
        self.state = DebrisState::Circularized;
    }

    fn spiral(&mut self, dt: f64, geometry: &Geometry, decay: f64) {
        let r_old = self.radius().max(DISTANCE_FLOOR);
        let l_old = self.angular_momentum.norm();
        let axis = Unit::new_normalize(safe_normalize(&self.angular_momentum, Vector3::z()));

        // Orbit at the old radius for this step, then shrink
        let omega = l_old / (r_old * r_old);
        let rotation = UnitQuaternion::from_axis_angle(&axis, omega * dt);
        let r_hat = rotation * safe_normalize(&self.position.coords, Vector3::x());

        let l_new = l_old * (1.0 - decay * dt).max(0.0);
        let r_new = l_new * l_new / geometry.gm;

        self.position = Point3::from(r_hat * r_new);
        self.angular_momentum = axis.into_inner() * l_new;
        self.velocity = axis.cross(&r_hat) * (l_new / r_new.max(DISTANCE_FLOOR));
    }

    /// T = T_peak (r_isco / r)^¾, capped at the peak
    fn update_temperature(&mut self, geometry: &Geometry) {
        let ratio = (geometry.isco_radius / self.radius().max(DISTANCE_FLOOR)).min(1.0);
        self.temperature = geometry.peak_temperature * ratio.powf(0.75);
    }
}
