//! Fixed pool of wind particles streaming off the companion surface

use nalgebra::Vector3;
use rand_chacha::ChaChaRng;
use rayon::prelude::*;
use serde::Serialize;

use super::{CompanionBody, CompanionTunables};
use crate::sampling::{UniformBuffer, signed};
use crate::vector::unit_vector_from_uniforms;

const UNIFORMS_PER_PARTICLE: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindParticle {
    /// Position relative to the companion centre
    pub offset: Vector3<f64>,
    /// Outward unit direction
    pub direction: Vector3<f64>,
    /// Speed multiplier on the companion's wind speed
    pub speed: f64,
    pub age: f64,
    pub max_age: f64,
}

impl WindParticle {
    fn respawn(&mut self, u: &[f64], radius: f64, tunables: &CompanionTunables) {
        self.direction = unit_vector_from_uniforms(u[0], u[1]);
        self.offset = self.direction * radius;
        self.speed = 1.0 + tunables.wind_spread * signed(u[2]);
        self.age = 0.0;
        self.max_age = tunables.wind_max_age * (1.0 + tunables.wind_spread * signed(u[3]));
    }
}

#[derive(Debug, Clone)]
pub struct WindPool {
    particles: Vec<WindParticle>,
    uniforms: UniformBuffer,
}

impl WindPool {
    /// Fill the pool with particles at staggered ages so the wind starts
    /// out as a steady stream.
    pub fn new(count: usize, companion: &CompanionBody, rng: &mut ChaChaRng) -> Self {
        let mut pool = Self {
            particles: Vec::with_capacity(count),
            uniforms: UniformBuffer::new(UNIFORMS_PER_PARTICLE),
        };
        pool.particles.resize(
            count,
            WindParticle {
                offset: Vector3::zeros(),
                direction: Vector3::z(),
                speed: 1.0,
                age: 0.0,
                max_age: 1.0,
            },
        );
        pool.reseed(companion, rng);
        pool
    }

    pub fn reseed(&mut self, companion: &CompanionBody, rng: &mut ChaChaRng) {
        let tunables = companion.tunables();
        let outflow = companion.wind_speed * companion.wind_density;
        self.uniforms.refill(rng, self.particles.len());

        for (i, particle) in self.particles.iter_mut().enumerate() {
            let u = self.uniforms.slot(i);
            particle.respawn(u, companion.radius, tunables);
            // Stagger initial ages across one lifetime
            particle.age = particle.max_age * u[2];
            particle.offset += particle.direction * particle.speed * outflow * particle.age;
        }
    }

    /// Push every particle outward; expired ones restart at the surface.
    pub fn advance(&mut self, dt: f64, companion: &CompanionBody, rng: &mut ChaChaRng) {
        let stride = self.uniforms.stride();
        self.uniforms.refill(rng, self.particles.len());
        let outflow = companion.wind_speed * companion.wind_density;
        let radius = companion.radius;
        let tunables = companion.tunables();

        self.particles
            .par_iter_mut()
            .zip(self.uniforms.as_slice().par_chunks(stride))
            .for_each(|(particle, u)| {
                particle.age += dt;
                particle.offset += particle.direction * particle.speed * outflow * dt;
                if particle.age > particle.max_age || !particle.offset.iter().all(|c| c.is_finite()) {
                    particle.respawn(u, radius, tunables);
                }
            });
    }

    pub fn particles(&self) -> &[WindParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
