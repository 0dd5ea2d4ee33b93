//! The expiring queue of outflow particles

use nalgebra::Point3;
use serde::Serialize;

use super::{ChannelId, ChannelSet, LaunchEvent, OutflowTunables, Polarity};
use crate::geometry::Geometry;
use crate::pool::CappedQueue;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutflowParticle {
    pub position: Point3<f64>,
    pub channel: ChannelId,
    pub polarity: Polarity,
    /// Distance along the channel in [0, 1]
    pub progress: f64,
    pub age: f64,
    pub max_age: f64,
    pub lorentz_factor: f64,
    /// Time spent at progress 1 (s)
    pub saturated_for: f64,
}

impl OutflowParticle {
    fn is_expired(&self, saturation_hold: f64) -> bool {
        self.age > self.max_age || self.saturated_for >= saturation_hold
    }
}

/// Owns the outflow particles and the channel curves they ride.
#[derive(Debug, Clone)]
pub struct OutflowSystem {
    channels: ChannelSet,
    particles: CappedQueue<OutflowParticle>,
    tunables: OutflowTunables,
    launched: u64,
    expired: u64,
}

impl OutflowSystem {
    pub fn new(
        channel_count: usize,
        capacity: usize,
        geometry: &Geometry,
        tunables: OutflowTunables,
    ) -> Self {
        Self {
            channels: ChannelSet::new(channel_count, geometry, &tunables),
            particles: CappedQueue::with_capacity(capacity),
            tunables,
            launched: 0,
            expired: 0,
        }
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Rebuild the channel curves for a new geometry.
    ///
    /// Particles in flight are re-read from the new curves on their next step.
    pub fn rebuild_channels(&mut self, geometry: &Geometry) {
        self.channels.rebuild(geometry, &self.tunables);
    }

    /// Start a particle at the foot of its channel.
    ///
    /// Returns true if the oldest particle was evicted to make room.
    pub fn launch(&mut self, event: &LaunchEvent) -> bool {
        let spread = self.tunables.lifetime_spread * (2.0 * event.lifetime_jitter - 1.0);
        let particle = OutflowParticle {
            position: self.channels.position(event.channel, 0.0, event.polarity),
            channel: event.channel,
            polarity: event.polarity,
            progress: 0.0,
            age: 0.0,
            max_age: self.tunables.max_age * (1.0 + spread),
            lorentz_factor: event.lorentz_factor,
            saturated_for: 0.0,
        };
        self.launched += 1;
        self.particles.push(particle)
    }

    /// Move every particle along its channel and retire the expired ones.
    pub fn advance(&mut self, dt: f64, magnetic_field: f64) {
        let rate = self.tunables.progress_rate * magnetic_field;
        let hold = self.tunables.saturation_hold;
        let channels = &self.channels;
        let mut expired = 0;

        self.particles.retain_mut(|p| {
            p.age += dt;
            if p.progress >= 1.0 {
                p.saturated_for += dt;
            }
            p.progress = (p.progress + rate * p.lorentz_factor * dt).min(1.0);
            p.position = channels.position(p.channel, p.progress, p.polarity);

            let keep = !p.is_expired(hold);
            if !keep {
                expired += 1;
            }
            keep
        });

        self.expired += expired;
    }

    pub fn particles(&self) -> impl Iterator<Item = &OutflowParticle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    pub fn launched(&self) -> u64 {
        self.launched
    }

    pub fn evicted(&self) -> u64 {
        self.particles.evicted()
    }

    pub fn expired(&self) -> u64 {
        self.expired
    }

    /// Drop every particle in flight; counters are kept.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
