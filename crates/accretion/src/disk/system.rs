//! Parallel advance of the disk population

use std::f64::consts::TAU;

use rand_chacha::ChaChaRng;
use rayon::prelude::*;
use units::Temperature;

use super::particle::{DiskParticle, Placement};
use super::physics::{
    baseline_temperature, blandford_znajek_power, keplerian_speed, launch_probability, lorentz_factor,
    plunge_pull, surface_density, viscous_drift,
};
use super::DiskTunables;
use crate::config::SimulationConfig;
use crate::forces::{ForceField, ForceModel};
use crate::geometry::Geometry;
use crate::outflow::channel::channel_for_angle;
use crate::outflow::{LaunchEvent, Polarity};
use crate::sampling::UniformBuffer;
use crate::vector::CylindricalFrame;

// Uniform slots drawn per element per tick
const U_LAUNCH: usize = 0;
const U_POLARITY: usize = 1;
const U_LIFETIME: usize = 2;
const U_RADIUS: usize = 3;
const U_ANGLE: usize = 4;
const U_HEIGHT: usize = 5;
const U_MASS: usize = 6;
const UNIFORMS_PER_PARTICLE: usize = 7;

/// Configuration the disk reads during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskConditions {
    pub geometry: Geometry,
    pub magnetic_field: f64,
    pub accretion_rate: f64,
    pub viscosity: f64,
    pub jet_launch_rate: f64,
    pub channel_count: usize,
}

impl DiskConditions {
    pub fn new(config: &SimulationConfig, geometry: Geometry, channel_count: usize) -> Self {
        Self {
            geometry,
            magnetic_field: config.magnetic_field,
            accretion_rate: config.accretion_rate,
            viscosity: config.viscosity,
            jet_launch_rate: config.jet_launch_rate,
            channel_count,
        }
    }
}

/// What happened to one element during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum StepOutcome {
    Orbiting,
    Launched(LaunchEvent),
    Plunged,
    Fault,
}

/// Event counts from one disk tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskReport {
    pub launches: u64,
    pub plunges: u64,
    pub faults: u64,
}

impl DiskReport {
    /// Capture-triggered resets, with or without a visible launch
    pub fn captures(&self) -> u64 {
        self.launches + self.plunges
    }
}

/// Owns the disk population and its per-tick scratch buffers.
#[derive(Debug, Clone)]
pub struct DiskSystem {
    particles: Vec<DiskParticle>,
    tunables: DiskTunables,
    uniforms: UniformBuffer,
    outcomes: Vec<StepOutcome>,
    launches: Vec<LaunchEvent>,
}

impl DiskSystem {
    pub fn new(
        count: usize,
        conditions: &DiskConditions,
        tunables: DiskTunables,
        rng: &mut ChaChaRng,
    ) -> Self {
        let mut system = Self {
            particles: Vec::with_capacity(count),
            tunables,
            uniforms: UniformBuffer::new(UNIFORMS_PER_PARTICLE),
            outcomes: vec![StepOutcome::Orbiting; count],
            launches: Vec::with_capacity(count.min(256)),
        };
        system.seed(count, conditions, rng);
        system
    }

    fn seed(&mut self, count: usize, conditions: &DiskConditions, rng: &mut ChaChaRng) {
        let g = &conditions.geometry;
        self.uniforms.refill(rng, count);
        self.particles.clear();
        for i in 0..count {
            let mut particle = DiskParticle::placed(
                placement(self.uniforms.slot(i)),
                g.isco_radius,
                g.disk_outer_radius,
                g,
                conditions.accretion_rate,
                &self.tunables,
            );
            particle.channel = channel_for_angle(particle.angle, conditions.channel_count);
            self.particles.push(particle);
        }
        self.launches.clear();
    }

    /// Redistribute every element over the whole disk, keeping the allocation.
    pub fn reseed(&mut self, conditions: &DiskConditions, rng: &mut ChaChaRng) {
        let count = self.particles.len();
        self.seed(count, conditions, rng);
    }

    /// Advance every element by `dt`.
    ///
    /// Launches are buffered; collect them with
    /// [`drain_launches`](Self::drain_launches).
    pub fn advance(
        &mut self,
        dt: f64,
        conditions: &DiskConditions,
        field: &ForceField,
        rng: &mut ChaChaRng,
    ) -> DiskReport {
        let stride = self.uniforms.stride();
        self.uniforms.refill(rng, self.particles.len());
        let tunables = &self.tunables;

        self.particles
            .par_iter_mut()
            .zip(self.uniforms.as_slice().par_chunks(stride))
            .zip(self.outcomes.par_iter_mut())
            .for_each(|((particle, u), outcome)| {
                *outcome = step_particle(particle, u, dt, conditions, field, tunables);
            });

        let mut report = DiskReport::default();
        for outcome in &self.outcomes {
            match outcome {
                StepOutcome::Orbiting => {}
                StepOutcome::Launched(event) => {
                    report.launches += 1;
                    self.launches.push(*event);
                }
                StepOutcome::Plunged => report.plunges += 1,
                StepOutcome::Fault => report.faults += 1,
            }
        }
        report
    }

    /// Forget which elements were captured; called once per frame.
    pub fn clear_captures(&mut self) {
        self.particles.par_iter_mut().for_each(|p| p.captured = false);
    }

    /// Launch events produced since the last drain.
    pub fn drain_launches(&mut self) -> impl Iterator<Item = LaunchEvent> + '_ {
        self.launches.drain(..)
    }

    /// Largest field acceleration felt by any element.
    pub fn max_acceleration(&self, field: &ForceField) -> f64 {
        self.particles
            .par_iter()
            .map(|p| field.acceleration_at(&p.position()).norm())
            .reduce(|| 0.0, f64::max)
    }

    /// Mean inward radial speed
    pub fn average_infall_speed(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f64 = self.particles.par_iter().map(|p| -p.radial_velocity).sum();
        total / self.particles.len() as f64
    }

    pub fn peak_temperature(&self) -> Temperature {
        let kelvin = self
            .particles
            .par_iter()
            .map(|p| p.temperature.to_kelvin())
            .reduce(|| 0.0, f64::max);
        Temperature::from_kelvin(kelvin)
    }

    pub fn particles(&self) -> &[DiskParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn tunables(&self) -> &DiskTunables {
        &self.tunables
    }
}

fn placement(u: &[f64]) -> Placement {
    Placement {
        radius: u[U_RADIUS],
        angle: u[U_ANGLE],
        height: u[U_HEIGHT],
        mass: u[U_MASS],
    }
}

fn respawn(particle: &mut DiskParticle, u: &[f64], conditions: &DiskConditions, tunables: &DiskTunables) {
    let g = &conditions.geometry;
    particle.place(
        placement(u),
        tunables.respawn_inner_fraction * g.disk_outer_radius,
        g.disk_outer_radius,
        g,
        conditions.accretion_rate,
        tunables,
    );
    particle.channel = channel_for_angle(particle.angle, conditions.channel_count);
}

pub(super) fn step_particle(
    p: &mut DiskParticle,
    u: &[f64],
    dt: f64,
    conditions: &DiskConditions,
    field: &ForceField,
    t: &DiskTunables,
) -> StepOutcome {
    let g = &conditions.geometry;

    // 1. Companion perturbation in the local frame
    let frame = CylindricalFrame::at_angle(p.angle);
    let perturbation = field.companion_acceleration_at(&p.position());
    let (pert_r, pert_t, pert_z) = frame.decompose(&perturbation);

    // 2. Accelerations per unit element mass
    let inv_mass = 1.0 / p.mass.max(0.1);
    let drift = viscous_drift(
        conditions.viscosity,
        conditions.accretion_rate,
        t.radial_drift,
        g.horizon_radius,
        p.radius,
    );
    let accel_r = (drift + plunge_pull(t.plunge_acceleration, g.isco_radius, p.radius) + pert_r) * inv_mass;
    let accel_t = (pert_t - conditions.viscosity * t.tangential_drag * p.tangential_velocity) * inv_mass;
    let accel_z = (pert_z - t.vertical_restoring * p.height) * inv_mass;

    // 3. Velocities
    p.radial_velocity = (p.radial_velocity + accel_r * dt) * t.radial_damping;
    p.vertical_velocity = (p.vertical_velocity + accel_z * dt) * t.vertical_damping;
    p.tangential_velocity = (p.tangential_velocity + accel_t * dt)
        .max(keplerian_speed(t.keplerian_coefficient, p.radius));

    // 4. Positions
    p.angle = (p.angle + p.tangential_velocity / (p.radius + 1.0) * dt).rem_euclid(TAU);
    p.radius = (p.radius + p.radial_velocity * dt).max(0.0);
    p.height += p.vertical_velocity * dt;
    if p.height.abs() > t.max_height {
        p.height = p.height.clamp(-t.max_height, t.max_height);
        p.vertical_velocity = 0.0;
    }

    // 5. Frame dragging
    p.precession =
        (p.precession + g.frame_dragging_rate(p.radius) * t.frame_dragging_strength * dt).rem_euclid(TAU);
    let reach = (g.isco_radius / p.radius.max(f64::EPSILON)).min(1.0);
    p.warp = t.warp_tilt * g.spin * g.horizon_radius * reach * (p.angle - p.precession).sin();

    // 6. Thermodynamics
    let in_band = (p.radius - g.isco_radius).abs() <= t.isco_band_half_width;
    let peak = g.peak_temperature.to_kelvin();
    if in_band {
        p.time_in_band += dt;
        p.heating = (p.heating + t.heating_rate * peak * dt).min(peak);
    } else {
        p.time_in_band = 0.0;
        p.heating *= (1.0 - t.cooling_rate * dt).max(0.0);
    }
    let span = g.disk_outer_radius - g.isco_radius;
    p.temperature = baseline_temperature(g.peak_temperature, p.radius, g.isco_radius, span)
        + Temperature::from_kelvin(p.heating);
    p.density = surface_density(conditions.accretion_rate, g.isco_radius, p.radius);
    p.channel = channel_for_angle(p.angle, conditions.channel_count);

    if !p.is_finite() {
        respawn(p, u, conditions, t);
        return StepOutcome::Fault;
    }

    // 7. Capture
    if in_band {
        let chance = launch_probability(conditions.jet_launch_rate, p.time_in_band, t.launch_timescale, dt);
        if u[U_LAUNCH] < chance {
            let power =
                blandford_znajek_power(g.spin, conditions.magnetic_field, p.radius, g.horizon_radius);
            let event = LaunchEvent {
                channel: p.channel,
                polarity: Polarity::from_uniform(u[U_POLARITY]),
                lorentz_factor: lorentz_factor(power, t.lorentz_scale, t.max_lorentz),
                lifetime_jitter: u[U_LIFETIME],
            };
            respawn(p, u, conditions, t);
            p.captured = true;
            return StepOutcome::Launched(event);
        }
    }

    if p.radius < g.isco_radius - t.plunge_margin {
        respawn(p, u, conditions, t);
        p.captured = true;
        return StepOutcome::Plunged;
    }

    StepOutcome::Orbiting
}
