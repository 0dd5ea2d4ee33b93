//! Global tick timing and the adaptive time step.
//!
//! A frame handed to [`SimulationClock::plan`] is scaled by the configured
//! time scale and split into substeps no longer than `dt_base`. Within each
//! substep the systems driven by free-body forces run the cycles from
//! [`StepControl::split`]. Every integrated step lies in `[dt_min, dt_base]`;
//! time too short to step is carried into the next frame.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// Upper bound on substeps per frame; anything beyond is dropped.
pub const MAX_SUBSTEPS: u32 = 8;

/// Upper bound on `dt_base / dt_min`, and so on full cycles per substep.
pub const MAX_ADAPTIVE_CYCLES: u32 = 64;

/// Bounds and safety factor of the adaptive time step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepControl {
    /// Base step (s); also the longest step ever taken
    pub dt_base: f64,
    /// Shortest step (s)
    pub dt_min: f64,
    /// Fraction of the free-fall time across `characteristic_length`
    pub courant_factor: f64,
    /// Length scale L in dt = C·sqrt(L / a_max) (scene units)
    pub characteristic_length: f64,
    /// Accelerations below this leave the base step unchanged
    pub noise_floor: f64,
}

impl Default for StepControl {
    fn default() -> Self {
        Self {
            dt_base: 0.016,
            dt_min: 0.001,
            courant_factor: 0.3,
            characteristic_length: 2.0,
            noise_floor: 1.0e-6,
        }
    }
}

impl StepControl {
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.dt_base) || !positive(self.dt_min) {
            return Err(ConfigurationError::InvalidSettings(
                "time-step bounds must be positive".to_string(),
            ));
        }
        if self.dt_min > self.dt_base {
            return Err(ConfigurationError::InvalidSettings(format!(
                "dtMin {} exceeds dtBase {}",
                self.dt_min, self.dt_base
            )));
        }
        if !positive(self.courant_factor) || !positive(self.characteristic_length) {
            return Err(ConfigurationError::InvalidSettings(
                "courantFactor and characteristicLength must be positive".to_string(),
            ));
        }
        if self.dt_base / self.dt_min > MAX_ADAPTIVE_CYCLES as f64 {
            return Err(ConfigurationError::InvalidSettings(format!(
                "dtBase / dtMin must not exceed {}",
                MAX_ADAPTIVE_CYCLES
            )));
        }
        if !(self.noise_floor.is_finite() && self.noise_floor >= 0.0) {
            return Err(ConfigurationError::InvalidSettings(
                "noiseFloor must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Adaptive step for a substep of length `base` given the largest
    /// acceleration magnitude seen this tick.
    ///
    /// ```text
    /// dt = clamp(C · sqrt(L / a_max), dt_min, max(min(base, dt_base), dt_min))
    /// ```
    ///
    /// A non-finite `a_max` is treated as the worst case and yields the
    /// shortest step. The result always lies in `[dt_min, dt_base]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::clock::StepControl;
    ///
    /// let control = StepControl::default();
    /// assert_eq!(control.step_for(control.dt_base, 0.0), control.dt_base);
    /// assert_eq!(control.step_for(control.dt_base, 1.0e12), control.dt_min);
    /// ```
    pub fn step_for(&self, base: f64, max_acceleration: f64) -> f64 {
        let ceiling = base.min(self.dt_base).max(self.dt_min);

        if max_acceleration.is_nan() || max_acceleration.is_infinite() {
            return self.dt_min;
        }
        if max_acceleration < self.noise_floor {
            return ceiling;
        }

        let dt = self.courant_factor * (self.characteristic_length / max_acceleration).sqrt();
        dt.clamp(self.dt_min, ceiling)
    }

    /// Cover a substep of length `base` with adaptive cycles.
    ///
    /// Full cycles take the step from [`step_for`](Self::step_for). What is
    /// left becomes either a shorter tail cycle, a finer even split, or, when
    /// neither fits above `dt_min`, deferred time for the next frame.
    ///
    /// ```
    /// use accretion::clock::StepControl;
    ///
    /// let control = StepControl::default();
    /// // 0.3 * sqrt(2 / 5000) = 0.006: two full cycles and a 0.004 tail
    /// let split = control.split(0.016, 5_000.0);
    /// assert_eq!(split.cycles, 2);
    /// assert!((split.tail - 0.004).abs() < 1e-12);
    /// assert_eq!(split.deferred, 0.0);
    /// ```
    pub fn split(&self, base: f64, max_acceleration: f64) -> CycleSplit {
        let dt = self.step_for(base, max_acceleration);
        let cycles = (base / dt + 1.0e-9).floor() as u32;
        let rest = (base - cycles as f64 * dt).max(0.0);

        if rest >= self.dt_min {
            return CycleSplit { dt, cycles, tail: rest, deferred: 0.0 };
        }
        if cycles > 0 && rest > 1.0e-12 {
            let finer = base / (cycles + 1) as f64;
            if finer >= self.dt_min {
                return CycleSplit { dt: finer, cycles: cycles + 1, tail: 0.0, deferred: 0.0 };
            }
        }
        CycleSplit { dt, cycles, tail: 0.0, deferred: rest }
    }
}

/// Adaptive cycles covering one substep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSplit {
    /// Length of each full cycle (s)
    pub dt: f64,
    pub cycles: u32,
    /// Final shorter cycle, or 0
    pub tail: f64,
    /// Left over below `dt_min`; carried to the next frame
    pub deferred: f64,
}

impl CycleSplit {
    /// Cycle lengths in order.
    pub fn steps(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::repeat_n(self.dt, self.cycles as usize).chain((self.tail > 0.0).then_some(self.tail))
    }

    /// Time actually integrated
    pub fn stepped(&self) -> f64 {
        self.cycles as f64 * self.dt + self.tail
    }

    /// Length of the last cycle, or 0 when nothing is stepped
    pub fn last(&self) -> f64 {
        if self.tail > 0.0 {
            self.tail
        } else if self.cycles > 0 {
            self.dt
        } else {
            0.0
        }
    }
}

/// Substeps that cover one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    /// May be 0 when the frame is carried over whole
    pub substeps: u32,
    /// Length of each substep (s)
    pub base: f64,
}

impl TickPlan {
    pub fn simulated_time(&self) -> f64 {
        self.substeps as f64 * self.base
    }
}

/// Tick counter, simulated time and pause state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationClock {
    pub time: f64,
    pub ticks: u64,
    pub paused: bool,
    pub time_scale: f64,
    pub control: StepControl,
    /// Most recent adaptive step (s)
    pub last_dt: f64,
    /// Scaled time not yet stepped (s)
    pub carry: f64,
}

impl SimulationClock {
    pub fn new(control: StepControl, time_scale: f64, paused: bool) -> Self {
        Self {
            time: 0.0,
            ticks: 0,
            paused,
            time_scale,
            control,
            last_dt: control.dt_base,
            carry: 0.0,
        }
    }

    /// Split a frame of wall time, plus any carried time, into substeps.
    ///
    /// Returns `None` when paused or when there is nothing to simulate.
    /// Time below `dt_min` is carried rather than stepped, so a plan may
    /// hold zero substeps. Each substep is at least `dt_min` long.
    pub fn plan(&mut self, frame_dt: f64) -> Option<TickPlan> {
        if self.paused || !frame_dt.is_finite() || frame_dt <= 0.0 {
            return None;
        }
        let scaled = frame_dt * self.time_scale;
        if !scaled.is_finite() || scaled <= 0.0 {
            return None;
        }

        let StepControl { dt_base, dt_min, .. } = self.control;
        let available = scaled + self.carry;
        if available < dt_min {
            self.carry = available;
            return Some(TickPlan { substeps: 0, base: 0.0 });
        }

        // Tolerance keeps exact multiples of dt_base from rounding up a substep
        let mut substeps = ((available / dt_base - 1.0e-9).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let mut base = (available / substeps as f64).min(dt_base);
        if base < dt_min {
            // Only reachable with dt_min above dt_base / 2
            substeps -= 1;
            base = dt_base;
        }

        // Whatever a capped frame cannot fit is dropped
        let leftover = (available - substeps as f64 * base).max(0.0);
        self.carry = if leftover < dt_base { leftover } else { 0.0 };
        Some(TickPlan { substeps, base })
    }

    pub fn split(&self, base: f64, max_acceleration: f64) -> CycleSplit {
        self.control.split(base, max_acceleration)
    }

    /// Account for one finished substep.
    pub fn record(&mut self, split: &CycleSplit) {
        self.time += split.stepped();
        self.carry += split.deferred;
        if split.stepped() > 0.0 {
            self.last_dt = split.last();
        }
    }

    pub fn finish_tick(&mut self) {
        self.ticks += 1;
    }
}
