//! A single disk element

use std::f64::consts::TAU;

use nalgebra::Point3;
use serde::Serialize;
use units::Temperature;

use super::DiskTunables;
use super::physics::{baseline_temperature, keplerian_speed, surface_density};
use crate::geometry::Geometry;
use crate::outflow::ChannelId;
use crate::sampling::{power_law_from_uniform, signed};
use crate::vector::cylindrical_to_cartesian;

/// Disk element in cylindrical coordinates.
///
/// Velocities are along the local radial, tangential and vertical axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskParticle {
    pub radius: f64,
    pub angle: f64,
    pub height: f64,
    pub radial_velocity: f64,
    pub tangential_velocity: f64,
    pub vertical_velocity: f64,
    pub mass: f64,
    pub density: f64,
    pub temperature: Temperature,
    /// Heat deposited near the ISCO (K)
    pub heating: f64,
    /// Continuous time spent in the ISCO band (s)
    pub time_in_band: f64,
    /// Accumulated frame-dragging phase (radians)
    pub precession: f64,
    /// Vertical displacement from precession (scene units)
    pub warp: f64,
    pub channel: ChannelId,
    /// Captured and respawned at any step of the latest frame
    pub captured: bool,
}

/// Uniforms consumed when placing an element
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub radius: f64,
    pub angle: f64,
    pub height: f64,
    pub mass: f64,
}

impl DiskParticle {
    pub(crate) fn placed(
        placement: Placement,
        r_min: f64,
        r_max: f64,
        geometry: &Geometry,
        accretion_rate: f64,
        tunables: &DiskTunables,
    ) -> Self {
        let mut particle = Self {
            radius: 0.0,
            angle: 0.0,
            height: 0.0,
            radial_velocity: 0.0,
            tangential_velocity: 0.0,
            vertical_velocity: 0.0,
            mass: 1.0,
            density: 0.0,
            temperature: Temperature::zero(),
            heating: 0.0,
            time_in_band: 0.0,
            precession: 0.0,
            warp: 0.0,
            channel: 0,
            captured: false,
        };
        particle.place(placement, r_min, r_max, geometry, accretion_rate, tunables);
        particle
    }

    /// Put the element at a fresh position on a Keplerian orbit.
    ///
    /// Radius follows the power law of [`DiskTunables::initial_radius_index`]
    /// between `r_min` and `r_max`.
    pub(crate) fn place(
        &mut self,
        placement: Placement,
        r_min: f64,
        r_max: f64,
        geometry: &Geometry,
        accretion_rate: f64,
        tunables: &DiskTunables,
    ) {
        let radius = power_law_from_uniform(placement.radius, r_min, r_max, tunables.initial_radius_index)
            .clamp(r_min, r_max);

        self.radius = radius;
        self.angle = TAU * placement.angle;
        self.height = signed(placement.height) * tunables.initial_thickness;
        self.radial_velocity = 0.0;
        self.tangential_velocity = keplerian_speed(tunables.keplerian_coefficient, radius);
        self.vertical_velocity = 0.0;
        self.mass = 0.5 + placement.mass;
        self.heating = 0.0;
        self.time_in_band = 0.0;
        self.precession = 0.0;
        self.warp = 0.0;
        self.density = surface_density(accretion_rate, geometry.isco_radius, radius);
        self.temperature = baseline_temperature(
            geometry.peak_temperature,
            radius,
            geometry.isco_radius,
            geometry.disk_outer_radius - geometry.isco_radius,
        );
    }

    /// Rendered position, including the precession warp.
    pub fn position(&self) -> Point3<f64> {
        cylindrical_to_cartesian(self.radius, self.angle, self.height + self.warp)
    }

    pub fn is_finite(&self) -> bool {
        self.radius.is_finite()
            && self.angle.is_finite()
            && self.height.is_finite()
            && self.radial_velocity.is_finite()
            && self.tangential_velocity.is_finite()
            && self.vertical_velocity.is_finite()
            && self.heating.is_finite()
            && self.warp.is_finite()
    }
}
