//! Transient particle/antiparticle pairs at the horizon.
//!
//! A fixed pool of pair particles is recycled, never created or destroyed.
//! Particles escape outward and antiparticles fall inward; both wander with
//! a small isotropic jitter. Expiry is counted as an annihilation, an
//! antiparticle crossing the horizon as swallowed. Either way the slot is
//! redrawn at the boundary.

use nalgebra::{Point3, Vector3};
use rand_chacha::ChaChaRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_setting, non_negative, positive};
use crate::geometry::Geometry;
use crate::sampling::{UniformBuffer, signed};
use crate::vector::unit_vector_from_uniforms;

const U_DIRECTION: usize = 0;
const U_KIND: usize = 2;
const U_RADIUS: usize = 3;
const U_LIFETIME: usize = 4;
const U_JITTER: usize = 5;
const UNIFORMS_PER_PARTICLE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairKind {
    /// Escapes outward
    Particle,
    /// Falls inward
    Antiparticle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PairTunables {
    /// Spawn shell starts at this many horizon radii
    pub spawn_inner: f64,
    /// Width of the spawn shell in horizon radii
    pub spawn_width: f64,
    /// Radial speed at unit intensity (units/s)
    pub speed: f64,
    /// Jitter amplitude at unit intensity (units/s)
    pub jitter: f64,
    pub max_age: f64,
    /// Fractional spread of lifetimes
    pub lifetime_spread: f64,
}

impl Default for PairTunables {
    fn default() -> Self {
        Self {
            spawn_inner: 1.05,
            spawn_width: 0.1,
            speed: 6.0,
            jitter: 3.0,
            max_age: 1.5,
            lifetime_spread: 0.4,
        }
    }
}

impl PairTunables {
    pub fn validate(&self) -> Result<()> {
        ensure_setting(positive(self.spawn_inner), "pair spawnInner", "positive")?;
        ensure_setting(
            [self.spawn_width, self.speed, self.jitter].iter().all(|&v| non_negative(v)),
            "pair spawnWidth, speed and jitter",
            "finite and non-negative",
        )?;
        ensure_setting(positive(self.max_age), "pair maxAge", "positive")?;
        ensure_setting((0.0..1.0).contains(&self.lifetime_spread), "pair lifetimeSpread", "in 0..1")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairParticle {
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    pub age: f64,
    pub max_age: f64,
    pub kind: PairKind,
}

impl PairParticle {
    fn recycle(&mut self, u: &[f64], horizon_radius: f64, intensity: f64, t: &PairTunables) {
        let direction = unit_vector_from_uniforms(u[U_DIRECTION], u[U_DIRECTION + 1]);
        let radius = horizon_radius * (t.spawn_inner + t.spawn_width * u[U_RADIUS]);

        self.kind = if u[U_KIND] < 0.5 {
            PairKind::Particle
        } else {
            PairKind::Antiparticle
        };
        let sign = match self.kind {
            PairKind::Particle => 1.0,
            PairKind::Antiparticle => -1.0,
        };
        self.position = Point3::from(direction * radius);
        self.velocity = direction * (sign * t.speed * intensity);
        self.age = 0.0;
        self.max_age = t.max_age * (1.0 + t.lifetime_spread * signed(u[U_LIFETIME]));
    }
}

/// Event counts from one pair tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairReport {
    pub annihilations: u64,
    pub swallowed: u64,
}

impl std::ops::Add for PairReport {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            annihilations: self.annihilations + other.annihilations,
            swallowed: self.swallowed + other.swallowed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PairEventSystem {
    particles: Vec<PairParticle>,
    uniforms: UniformBuffer,
    tunables: PairTunables,
}

impl PairEventSystem {
    pub fn new(
        count: usize,
        geometry: &Geometry,
        intensity: f64,
        tunables: PairTunables,
        rng: &mut ChaChaRng,
    ) -> Self {
        let blank = PairParticle {
            position: Point3::origin(),
            velocity: Vector3::zeros(),
            age: 0.0,
            max_age: 1.0,
            kind: PairKind::Particle,
        };
        let mut system = Self {
            particles: vec![blank; count],
            uniforms: UniformBuffer::new(UNIFORMS_PER_PARTICLE),
            tunables,
        };
        system.reseed(geometry, intensity, rng);
        system
    }

    /// Redraw every slot at the boundary with staggered ages.
    pub fn reseed(&mut self, geometry: &Geometry, intensity: f64, rng: &mut ChaChaRng) {
        self.uniforms.refill(rng, self.particles.len());
        for (i, particle) in self.particles.iter_mut().enumerate() {
            let u = self.uniforms.slot(i);
            particle.recycle(u, geometry.horizon_radius, intensity, &self.tunables);
            particle.age = particle.max_age * u[U_JITTER];
        }
    }

    pub fn advance(&mut self, dt: f64, geometry: &Geometry, intensity: f64, rng: &mut ChaChaRng) -> PairReport {
        let stride = self.uniforms.stride();
        self.uniforms.refill(rng, self.particles.len());
        let horizon = geometry.horizon_radius;
        let amplitude = self.tunables.jitter * intensity * dt;
        let tunables = &self.tunables;

        self.particles
            .par_iter_mut()
            .zip(self.uniforms.as_slice().par_chunks(stride))
            .map(|(p, u)| {
                let jitter = Vector3::new(signed(u[U_JITTER]), signed(u[U_JITTER + 1]), signed(u[U_JITTER + 2]));
                p.age += dt;
                p.position += p.velocity * dt + jitter * amplitude;

                let mut report = PairReport::default();
                if p.kind == PairKind::Antiparticle && p.position.coords.norm() < horizon {
                    report.swallowed = 1;
                } else if p.age > p.max_age || !p.position.coords.iter().all(|c| c.is_finite()) {
                    report.annihilations = 1;
                } else {
                    return report;
                }
                p.recycle(u, horizon, intensity, tunables);
                report
            })
            .reduce(PairReport::default, |a, b| a + b)
    }

    pub fn particles(&self) -> &[PairParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
