//! Companion orbit and derived quantities

use std::f64::consts::TAU;

use nalgebra::{Point3, Rotation3, Vector3};
use serde::Serialize;
use units::{Mass, Temperature};

use super::CompanionTunables;
use crate::config::SimulationConfig;
use crate::forces::{CompanionSource, hill_radius};
use crate::geometry::Geometry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionBody {
    pub enabled: bool,
    pub mass: Mass,
    pub temperature: Temperature,
    /// Physical radius (scene units)
    pub radius: f64,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Tilt of the orbital plane about the x axis (radians)
    pub inclination: f64,
    /// True anomaly (radians)
    pub angle: f64,
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    pub influence_radius: f64,
    pub wind_speed: f64,
    pub wind_density: f64,
    pub gravity_strength: f64,
    #[serde(skip)]
    tunables: CompanionTunables,
}

impl CompanionBody {
    pub fn new(config: &SimulationConfig, geometry: &Geometry, tunables: CompanionTunables) -> Self {
        let mut body = Self {
            enabled: config.companion_enabled,
            mass: config.companion_mass,
            temperature: config.companion_temperature,
            radius: 0.0,
            semi_major_axis: config.companion_orbital_radius,
            eccentricity: config.companion_eccentricity,
            inclination: config.companion_inclination,
            angle: 0.0,
            position: Point3::origin(),
            velocity: Vector3::zeros(),
            influence_radius: 0.0,
            wind_speed: config.companion_wind_speed,
            wind_density: config.companion_wind_density,
            gravity_strength: config.companion_gravity_strength,
            tunables,
        };
        body.reconfigure(config, geometry);
        body
    }

    /// Take new options without resetting the orbital phase.
    pub fn reconfigure(&mut self, config: &SimulationConfig, geometry: &Geometry) {
        self.enabled = config.companion_enabled;
        self.mass = config.companion_mass;
        self.temperature = config.companion_temperature;
        self.semi_major_axis = config.companion_orbital_radius;
        self.eccentricity = config.companion_eccentricity;
        self.inclination = config.companion_inclination;
        self.wind_speed = config.companion_wind_speed;
        self.wind_density = config.companion_wind_density;
        self.gravity_strength = config.companion_gravity_strength;

        let t = &self.tunables;
        self.radius = (t.radius_scale * self.mass.to_solar_masses().powf(t.radius_exponent))
            .clamp(t.min_radius, t.max_radius);
        let hill = hill_radius(self.mass, geometry.central_mass, self.semi_major_axis, self.eccentricity);
        self.influence_radius = hill.max(t.influence_floor_radii * self.radius);

        self.update_state(geometry);
    }

    /// Semi-latus rectum p = a (1 − e²)
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Current distance from the centre, r = p / (1 + e cos θ).
    pub fn orbital_radius(&self) -> f64 {
        self.semi_latus_rectum() / (1.0 + self.eccentricity * self.angle.cos())
    }

    /// Advance the true anomaly by θ̇ dt with θ̇ = sqrt(GM p) / r².
    pub fn advance(&mut self, dt: f64, geometry: &Geometry) {
        let r = self.orbital_radius();
        let rate = (geometry.gm * self.semi_latus_rectum()).sqrt() / (r * r);
        self.angle = (self.angle + rate * dt).rem_euclid(TAU);
        self.update_state(geometry);
    }

    fn update_state(&mut self, geometry: &Geometry) {
        let r = self.orbital_radius();
        let (sin, cos) = self.angle.sin_cos();
        let p = self.semi_latus_rectum();
        let scale = (geometry.gm / p).sqrt();
        let v_r = scale * self.eccentricity * sin;
        let v_t = scale * (1.0 + self.eccentricity * cos);

        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination);
        self.position = tilt * Point3::new(r * cos, r * sin, 0.0);
        self.velocity = tilt * Vector3::new(v_r * cos - v_t * sin, v_r * sin + v_t * cos, 0.0);
    }

    /// Force-relevant state for this tick, or `None` when disabled.
    pub fn force_source(&self) -> Option<CompanionSource> {
        self.enabled.then_some(CompanionSource {
            position: self.position,
            mass: self.mass,
            radius: self.radius,
            influence_radius: self.influence_radius,
            gravity_strength: self.gravity_strength,
            wind_speed: self.wind_speed,
            wind_density: self.wind_density,
        })
    }

    pub fn tunables(&self) -> &CompanionTunables {
        &self.tunables
    }
}
