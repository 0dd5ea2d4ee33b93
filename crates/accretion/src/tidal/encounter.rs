//! Owner of the infalling body and its debris queue

use rand::Rng;
use rand_chacha::ChaChaRng;

use super::debris::DebrisFate;
use super::{DebrisParticle, DebrisState, TidalBody, TidalPhase, TidalTunables};
use crate::forces::{ForceField, ForceModel};
use crate::geometry::Geometry;
use crate::pool::CappedQueue;
use crate::sampling::sample_gaussian;
use crate::vector::{perpendicular_basis, safe_normalize};

/// Running totals since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TidalCounters {
    pub disruptions: u64,
    pub swallowed: u64,
    pub debris_emitted: u64,
    pub debris_circularized: u64,
    pub debris_accreted: u64,
    pub debris_expired: u64,
}

/// What changed during one encounter step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TidalReport {
    pub transition: Option<(TidalPhase, TidalPhase)>,
    pub emitted: usize,
    /// Debris evicted to make room this step
    pub evicted: usize,
    pub circularized: usize,
    pub accreted: usize,
}

#[derive(Debug, Clone)]
pub struct TidalEncounter {
    body: Option<TidalBody>,
    debris: CappedQueue<DebrisParticle>,
    tunables: TidalTunables,
    counters: TidalCounters,
}

impl TidalEncounter {
    pub fn new(capacity: usize, tunables: TidalTunables) -> Self {
        Self {
            body: None,
            debris: CappedQueue::with_capacity(capacity),
            tunables,
            counters: TidalCounters::default(),
        }
    }

    /// Replace any current body with a fresh one at the spawn radius and
    /// drop the old debris.
    pub fn spawn(&mut self, geometry: &Geometry, rng: &mut ChaChaRng) {
        let u = [rng.random(), rng.random(), rng.random(), rng.random()];
        self.body = Some(TidalBody::spawn(geometry, &self.tunables, u));
        self.debris.clear();
    }

    /// Remove the body and all debris.
    pub fn clear(&mut self) {
        self.body = None;
        self.debris.clear();
    }

    /// Advance the body, emit debris and move the stream.
    ///
    /// Emission happens after the body step and before the stream step, so
    /// fresh debris moves in the same tick it is created.
    pub fn advance(
        &mut self,
        dt: f64,
        geometry: &Geometry,
        field: &ForceField,
        rng: &mut ChaChaRng,
    ) -> TidalReport {
        let mut report = TidalReport::default();

        if let Some(body) = self.body.as_mut() {
            let before = body.phase;
            if let Some(after) = body.advance(dt, field, geometry.capture_radius(), &self.tunables) {
                report.transition = Some((before, after));
                match after {
                    TidalPhase::Disrupted => self.counters.disruptions += 1,
                    TidalPhase::Swallowed => self.counters.swallowed += 1,
                    _ => {}
                }
            }
        }

        self.emit(geometry, rng, &mut report);

        let tunables = &self.tunables;
        let counters = &mut self.counters;
        self.debris.retain_mut(|particle| match particle.advance(dt, field, geometry, tunables) {
            DebrisFate::Keep => true,
            DebrisFate::Circularized => {
                counters.debris_circularized += 1;
                report.circularized += 1;
                true
            }
            DebrisFate::Accreted => {
                counters.debris_accreted += 1;
                report.accreted += 1;
                false
            }
            DebrisFate::Expired => {
                counters.debris_expired += 1;
                false
            }
        });

        report
    }

    /// Shed a batch of debris around the disrupted remnant.
    ///
    /// Each particle is offset across and along the orbit and given a
    /// jittered copy of the remnant's velocity.
    fn emit(&mut self, geometry: &Geometry, rng: &mut ChaChaRng, report: &mut TidalReport) {
        let Some(body) = self.body.as_mut() else {
            return;
        };
        if !body.is_shedding() {
            return;
        }

        let t = &self.tunables;
        let count = t.debris_per_tick.min(body.remaining_debris);
        let r_hat = safe_normalize(&body.position.coords, nalgebra::Vector3::x());
        let (e1, e2) = perpendicular_basis(&r_hat);
        let spread = t.debris_spread * body.radius;
        let speed = body.velocity.norm();

        for _ in 0..count {
            let offset = e1 * sample_gaussian(rng, 0.0, spread)
                + e2 * sample_gaussian(rng, 0.0, spread)
                + r_hat * sample_gaussian(rng, 0.0, spread * body.stretch);
            let jitter = e1 * sample_gaussian(rng, 0.0, t.velocity_jitter * speed)
                + e2 * sample_gaussian(rng, 0.0, t.velocity_jitter * speed);
            let velocity = body.velocity * (1.0 + sample_gaussian(rng, 0.0, t.velocity_jitter)) + jitter;
            let max_age = t.debris_max_age * (0.75 + 0.5 * rng.random::<f64>());

            let particle = DebrisParticle::new(body.position + offset, velocity, max_age, geometry);
            if self.debris.push(particle) {
                report.evicted += 1;
            }
            body.shed(t.debris_budget);
        }

        report.emitted += count;
        self.counters.debris_emitted += count as u64;
    }

    /// Largest field acceleration on the body or the stream.
    pub fn max_acceleration(&self, field: &ForceField) -> f64 {
        let body = self
            .body
            .as_ref()
            .filter(|b| !b.phase.is_terminal())
            .map_or(0.0, |b| field.acceleration_at(&b.position).norm());
        self.debris
            .iter()
            .filter(|d| d.state == DebrisState::InStream)
            .map(|d| field.acceleration_at(&d.position).norm())
            .fold(body, f64::max)
    }

    pub fn body(&self) -> Option<&TidalBody> {
        self.body.as_ref()
    }

    pub fn phase(&self) -> Option<TidalPhase> {
        self.body.as_ref().map(|b| b.phase)
    }

    pub fn debris(&self) -> impl Iterator<Item = &DebrisParticle> {
        self.debris.iter()
    }

    pub fn debris_len(&self) -> usize {
        self.debris.len()
    }

    pub fn debris_capacity(&self) -> usize {
        self.debris.capacity()
    }

    pub fn debris_evicted(&self) -> u64 {
        self.debris.evicted()
    }

    /// Debris counts as (in stream, circularized)
    pub fn debris_census(&self) -> (usize, usize) {
        self.debris.iter().fold((0, 0), |(stream, disk), d| match d.state {
            DebrisState::InStream => (stream + 1, disk),
            DebrisState::Circularized => (stream, disk + 1),
        })
    }

    pub fn counters(&self) -> &TidalCounters {
        &self.counters
    }

    pub fn tunables(&self) -> &TidalTunables {
        &self.tunables
    }
}
