//! The infalling body and its disruption state machine

use nalgebra::{Point3, Vector3};
use serde::Serialize;
use units::Mass;

use super::TidalTunables;
use crate::forces::{ForceModel, leapfrog_step};
use crate::geometry::Geometry;
use crate::vector::{perpendicular_basis, unit_vector_from_uniforms};

/// Lifecycle of the infalling body. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TidalPhase {
    /// Outside the tidal radius
    Approaching,
    /// Inside the tidal radius, losing integrity
    Stretching,
    /// Torn apart; the remnant sheds debris
    Disrupted,
    /// Crossed the capture boundary before disruption
    Swallowed,
}

impl TidalPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TidalPhase::Swallowed)
    }

    fn rank(self) -> u8 {
        match self {
            TidalPhase::Approaching => 0,
            TidalPhase::Stretching => 1,
            TidalPhase::Disrupted | TidalPhase::Swallowed => 2,
        }
    }

    /// True if `next` may follow `self`.
    ///
    /// ```
    /// use accretion::tidal::TidalPhase;
    ///
    /// assert!(TidalPhase::Approaching.can_become(TidalPhase::Stretching));
    /// assert!(TidalPhase::Stretching.can_become(TidalPhase::Swallowed));
    /// assert!(!TidalPhase::Disrupted.can_become(TidalPhase::Stretching));
    /// assert!(!TidalPhase::Disrupted.can_become(TidalPhase::Swallowed));
    /// ```
    pub fn can_become(self, next: TidalPhase) -> bool {
        if self == next {
            return true;
        }
        match self {
            TidalPhase::Disrupted | TidalPhase::Swallowed => false,
            _ => next.rank() > self.rank(),
        }
    }
}

/// Tidal radius r_t = f · r_s · (M / m)^⅓, capped.
///
/// # Examples
///
/// ```
/// use accretion::tidal::tidal_radius;
/// use units::Mass;
///
/// let r_t = tidal_radius(Mass::from_solar_masses(8.0), Mass::from_solar_masses(1.0), 10.0, 3.0, 1.0e3);
/// assert!((r_t - 60.0).abs() < 1e-9);
///
/// let capped = tidal_radius(Mass::from_solar_masses(6.6e10), Mass::from_solar_masses(1.0), 10.0, 3.0, 80.0);
/// assert_eq!(capped, 80.0);
/// ```
pub fn tidal_radius(central_mass: Mass, body_mass: Mass, horizon_radius: f64, factor: f64, cap: f64) -> f64 {
    let ratio = central_mass / body_mass;
    (factor * horizon_radius * ratio.max(0.0).cbrt()).min(cap)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalBody {
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    pub mass: Mass,
    /// Visual radius (scene units)
    pub radius: f64,
    /// Structural integrity in [0, 1]
    pub integrity: f64,
    pub tidal_radius: f64,
    /// Elongation along the radial direction (1 = round)
    pub stretch: f64,
    pub phase: TidalPhase,
    /// Debris still to be shed
    pub remaining_debris: usize,
    /// The disrupted remnant has crossed the capture boundary
    pub remnant_accreted: bool,
}

impl TidalBody {
    /// Place a body at the spawn radius on an inbound, slightly bound orbit.
    ///
    /// The angular momentum is chosen so a parabolic orbit would reach the
    /// target pericentre r_p:
    ///
    /// ```text
    /// h   = sqrt(2 GM r_p)
    /// v²  = f_E · 2GM / r₀
    /// v_t = h / r₀,  v_r = −sqrt(v² − v_t²)
    /// ```
    ///
    /// `u` holds four uniforms: direction (2), orbital plane and pericentre.
    pub fn spawn(geometry: &Geometry, tunables: &TidalTunables, u: [f64; 4]) -> Self {
        let r_t = tidal_radius(
            geometry.central_mass,
            tunables.body_mass,
            geometry.horizon_radius,
            tunables.tidal_radius_factor,
            tunables.tidal_radius_cap,
        );

        let r0 = tunables.spawn_radius;
        let radial = unit_vector_from_uniforms(u[0], u[1]);
        let (e1, e2) = perpendicular_basis(&radial);
        let (sin, cos) = (std::f64::consts::TAU * u[2]).sin_cos();
        let tangent = e1 * cos + e2 * sin;

        let pericenter = r_t
            * (tunables.pericenter_min + (tunables.pericenter_max - tunables.pericenter_min) * u[3]);
        let gm = geometry.gm;
        let h = (2.0 * gm * pericenter).sqrt();
        let v2 = tunables.energy_fraction * 2.0 * gm / r0;
        let v_t = h / r0;
        let v_r = -(v2 - v_t * v_t).max(0.0).sqrt();

        Self {
            position: Point3::from(radial * r0),
            velocity: radial * v_r + tangent * v_t,
            mass: tunables.body_mass,
            radius: tunables.body_radius,
            integrity: 1.0,
            tidal_radius: r_t,
            stretch: 1.0,
            phase: TidalPhase::Approaching,
            remaining_debris: tunables.debris_budget,
            remnant_accreted: false,
        }
    }

    pub fn distance(&self) -> f64 {
        self.position.coords.norm()
    }

    /// Leapfrog step through the field, then advance the state machine.
    ///
    /// Returns the new phase if it changed.
    pub fn advance<F: ForceModel + ?Sized>(
        &mut self,
        dt: f64,
        field: &F,
        capture_radius: f64,
        tunables: &TidalTunables,
    ) -> Option<TidalPhase> {
        if self.phase.is_terminal() || self.remnant_accreted {
            return None;
        }

        leapfrog_step(&mut self.position, &mut self.velocity, dt, field);
        let d = self.distance();
        let next = match self.phase {
            TidalPhase::Approaching | TidalPhase::Stretching => {
                if d < capture_radius || !d.is_finite() {
                    TidalPhase::Swallowed
                } else if d < self.tidal_radius {
                    let depth = 1.0 - d / self.tidal_radius;
                    self.integrity = (self.integrity - tunables.disruption_rate * depth * dt).max(0.0);
                    self.stretch = 1.0 + tunables.stretch_gain * (1.0 - self.integrity);
                    if self.integrity < tunables.disruption_threshold {
                        TidalPhase::Disrupted
                    } else {
                        TidalPhase::Stretching
                    }
                } else {
                    self.phase
                }
            }
            TidalPhase::Disrupted => {
                if d < capture_radius || !d.is_finite() {
                    self.remnant_accreted = true;
                }
                self.phase
            }
            TidalPhase::Swallowed => self.phase,
        };

        if next == self.phase || !self.phase.can_become(next) {
            return None;
        }
        self.phase = next;
        Some(next)
    }

    /// Remove one particle's worth of mass from the remnant.
    pub(crate) fn shed(&mut self, budget: usize) {
        if self.remaining_debris == 0 {
            return;
        }
        let share = self.mass / self.remaining_debris.max(1) as f64;
        self.mass = self.mass - share;
        self.remaining_debris -= 1;
        if budget > 0 {
            self.radius *= 1.0 - 0.5 / budget as f64;
        }
    }

    /// Still shedding debris this tick
    pub fn is_shedding(&self) -> bool {
        self.phase == TidalPhase::Disrupted && !self.remnant_accreted && self.remaining_debris > 0
    }
}
