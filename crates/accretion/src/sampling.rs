//! Random sampling helpers.
//!
//! Per-particle loops run in parallel, so they never touch the engine RNG
//! directly. Instead each tick pre-draws a fixed number of uniforms per slot
//! into a [`UniformBuffer`]; the parallel pass reads its own chunk. Results
//! are therefore identical for any thread count.

use std::f64::consts::PI;

use rand::Rng;
use rand_chacha::ChaChaRng;

/// Sample from a Gaussian (normal) distribution using Box-Muller transform
pub fn sample_gaussian(rng: &mut ChaChaRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z
}

/// Map a uniform in [0, 1) onto p(x) ∝ x^α between `x_min` and `x_max`.
///
/// Inverse transform sampling; α = -1 falls back to log-uniform.
///
/// ```
/// use accretion::sampling::power_law_from_uniform;
///
/// assert!((power_law_from_uniform(0.0, 10.0, 200.0, -0.5) - 10.0).abs() < 1e-9);
/// assert!((power_law_from_uniform(1.0, 10.0, 200.0, -0.5) - 200.0).abs() < 1e-9);
/// ```
pub fn power_law_from_uniform(u: f64, x_min: f64, x_max: f64, alpha: f64) -> f64 {
    let alpha1 = alpha + 1.0;
    if alpha1.abs() < 1e-9 {
        return x_min * (x_max / x_min).powf(u);
    }
    (u * (x_max.powf(alpha1) - x_min.powf(alpha1)) + x_min.powf(alpha1)).powf(1.0 / alpha1)
}

/// Symmetric uniform in [-1, 1) from a uniform in [0, 1)
pub fn signed(u: f64) -> f64 {
    2.0 * u - 1.0
}

/// Reusable scratch of pre-drawn uniforms, `stride` values per slot.
#[derive(Debug, Clone)]
pub struct UniformBuffer {
    values: Vec<f64>,
    stride: usize,
}

impl UniformBuffer {
    pub fn new(stride: usize) -> Self {
        Self {
            values: Vec::new(),
            stride: stride.max(1),
        }
    }

    /// Draw `slots × stride` fresh uniforms.
    ///
    /// Only grows the backing storage when the slot count increases, so a
    /// fixed-size pool allocates once.
    pub fn refill(&mut self, rng: &mut ChaChaRng, slots: usize) {
        self.values.resize(slots * self.stride, 0.0);
        self.values.iter_mut().for_each(|v| *v = rng.random());
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn slot(&self, index: usize) -> &[f64] {
        &self.values[index * self.stride..(index + 1) * self.stride]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_power_law_stays_in_bounds() {
        let mut rng = ChaChaRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = power_law_from_uniform(rng.random(), 17.0, 200.0, -0.5);
            assert!((17.0..=200.0).contains(&x), "sample {} escaped bounds", x);
        }
    }

    #[test]
    fn test_log_uniform_limit() {
        let mid = power_law_from_uniform(0.5, 1.0, 100.0, -1.0);
        assert!((mid - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_buffer_is_reproducible_and_sized() {
        let mut a = UniformBuffer::new(4);
        let mut b = UniformBuffer::new(4);
        a.refill(&mut ChaChaRng::seed_from_u64(11), 10);
        b.refill(&mut ChaChaRng::seed_from_u64(11), 10);

        assert_eq!(a.as_slice().len(), 40);
        assert_eq!(a.as_slice(), b.as_slice());
        assert_eq!(a.slot(2), &a.as_slice()[8..12]);
        assert!(a.as_slice().iter().all(|u| (0.0..1.0).contains(u)));
    }

    #[test]
    fn test_gaussian_mean_is_close() {
        let mut rng = ChaChaRng::seed_from_u64(99);
        let n = 5000;
        let mean: f64 = (0..n).map(|_| sample_gaussian(&mut rng, 3.0, 0.5)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.05);
    }
}
