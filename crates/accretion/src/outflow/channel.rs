//! Precomputed helical channel curves

use std::f64::consts::TAU;

use nalgebra::Point3;

use super::{ChannelId, OutflowTunables, Polarity};
use crate::geometry::Geometry;

/// One channel sampled at evenly spaced progress values (upper polarity).
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCurve {
    samples: Vec<Point3<f64>>,
}

impl ChannelCurve {
    /// Sample a helix whose radius shrinks and whose height grows with
    /// progress^e.
    ///
    /// ```text
    /// radius(p) = R₀ (1 − c·pᵉ)
    /// z(p)      = z₀ + L·pᵉ
    /// φ(p)      = φ₀ + 2π·turns·p
    /// ```
    pub fn build(base_angle: f64, geometry: &Geometry, tunables: &OutflowTunables) -> Self {
        let n = tunables.samples.max(2);
        let r0 = tunables.base_radius_factor * geometry.isco_radius;
        let z0 = tunables.base_height_radii * geometry.horizon_radius;
        let length = tunables.length_radii * geometry.horizon_radius;

        let samples = (0..n)
            .map(|i| {
                let p = i as f64 / (n - 1) as f64;
                let shaped = p.powf(tunables.helix_exponent);
                let radius = r0 * (1.0 - tunables.collimation * shaped);
                let angle = base_angle + TAU * tunables.helix_turns * p;
                let (sin, cos) = angle.sin_cos();
                Point3::new(radius * cos, radius * sin, z0 + length * shaped)
            })
            .collect();

        Self { samples }
    }

    /// Position at `progress` ∈ [0, 1], linearly interpolated between samples.
    pub fn point_at(&self, progress: f64, polarity: Polarity) -> Point3<f64> {
        let last = self.samples.len() - 1;
        let x = progress.clamp(0.0, 1.0) * last as f64;
        let i = (x.floor() as usize).min(last.saturating_sub(1));
        let t = x - i as f64;

        let a = &self.samples[i];
        let b = &self.samples[(i + 1).min(last)];
        let mut p = a + (b - a) * t;
        p.z *= polarity.sign();
        p
    }
}

/// All channels, evenly spaced in azimuth.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSet {
    curves: Vec<ChannelCurve>,
}

impl ChannelSet {
    pub fn new(count: usize, geometry: &Geometry, tunables: &OutflowTunables) -> Self {
        let count = count.max(1);
        let curves = (0..count)
            .map(|i| ChannelCurve::build(TAU * i as f64 / count as f64, geometry, tunables))
            .collect();
        Self { curves }
    }

    /// Recompute every curve in place, e.g. after the ISCO moved.
    pub fn rebuild(&mut self, geometry: &Geometry, tunables: &OutflowTunables) {
        let count = self.curves.len();
        for (i, curve) in self.curves.iter_mut().enumerate() {
            *curve = ChannelCurve::build(TAU * i as f64 / count as f64, geometry, tunables);
        }
    }

    pub fn curve(&self, channel: ChannelId) -> &ChannelCurve {
        &self.curves[channel as usize % self.curves.len()]
    }

    pub fn position(&self, channel: ChannelId, progress: f64, polarity: Polarity) -> Point3<f64> {
        self.curve(channel).point_at(progress, polarity)
    }
}

/// Azimuthal sector index of `angle` among `count` equal sectors.
pub fn channel_for_angle(angle: f64, count: usize) -> ChannelId {
    let count = count.max(1);
    let sector = (angle.rem_euclid(TAU) / TAU * count as f64).floor() as usize;
    sector.min(count - 1) as ChannelId
}
