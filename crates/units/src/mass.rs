use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Mass of the Sun in kilograms
pub const SOLAR_MASS_KG: f64 = 1.98847e30;

/// Gravitational constant (m³ kg⁻¹ s⁻²)
const G_SI: f64 = 6.674_30e-11;

/// Speed of light (m/s)
const C_SI: f64 = 2.997_924_58e8;

/// A physical mass quantity using f64 precision.
///
/// Solar masses are the base unit, which keeps compact objects from stellar
/// remnants up to the heaviest known black holes in a comfortable range.
///
/// # Examples
///
/// ```rust
/// use units::Mass;
///
/// let central = Mass::from_solar_masses(6.6e10);
/// let companion = Mass::from_solar_masses(20.0);
///
/// let ratio = central / companion;
/// let horizon_km = central.schwarzschild_radius_km();
/// assert!(ratio > 1e9);
/// assert!(horizon_km > 1e11);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: Solar Masses

impl Mass {
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in solar masses.
    pub fn from_solar_masses(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Mass` from a value in kilograms.
    pub fn from_kg(value: f64) -> Self {
        Self(value / SOLAR_MASS_KG)
    }

    /// Returns the mass in solar masses.
    pub fn to_solar_masses(&self) -> f64 {
        self.0
    }

    pub fn to_kg(&self) -> f64 {
        self.0 * SOLAR_MASS_KG
    }

    /// Schwarzschild radius r_s = 2GM/c² in kilometres.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use units::Mass;
    ///
    /// // One solar mass collapses inside ~2.95 km
    /// let r_s = Mass::from_solar_masses(1.0).schwarzschild_radius_km();
    /// assert!((r_s - 2.95).abs() < 0.01);
    /// ```
    pub fn schwarzschild_radius_km(&self) -> f64 {
        2.0 * G_SI * self.to_kg() / (C_SI * C_SI) / 1000.0
    }

    /// Power function
    pub fn powf(&self, n: f64) -> f64 {
        self.0.powf(n)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}

impl Div<f64> for Mass {
    type Output = Mass;

    fn div(self, rhs: f64) -> Mass {
        Mass(self.0 / rhs)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Mass) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Mass (commutative multiplication)
impl Mul<Mass> for f64 {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        rhs * self
    }
}
