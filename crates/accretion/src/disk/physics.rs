//! Pure disk profiles and rates

use units::Temperature;

/// Tangential speed floor v_φ = k · r^-1.5
pub fn keplerian_speed(coefficient: f64, radius: f64) -> f64 {
    coefficient * radius.max(1.0).powf(-1.5)
}

/// Inward drift from viscous angular-momentum loss.
///
/// ```text
/// a_drift = −α · ṁ · D · sqrt(r_s / r)
/// ```
pub fn viscous_drift(
    viscosity: f64,
    accretion_rate: f64,
    coefficient: f64,
    horizon_radius: f64,
    radius: f64,
) -> f64 {
    -viscosity * accretion_rate * coefficient * (horizon_radius / radius.max(horizon_radius)).sqrt()
}

/// Extra inward pull once an element is inside the ISCO, growing with depth.
pub fn plunge_pull(coefficient: f64, isco_radius: f64, radius: f64) -> f64 {
    if radius >= isco_radius {
        return 0.0;
    }
    -coefficient * (isco_radius - radius) / isco_radius
}

/// Baseline temperature T_peak (1 − (r − r_isco)/Δ)^¾.
///
/// Elements inside the ISCO sit at the peak; beyond r_isco + Δ the disk is
/// cold.
///
/// # Examples
///
/// ```
/// use accretion::disk::physics::baseline_temperature;
/// use units::Temperature;
///
/// let peak = Temperature::from_kelvin(1.0e5);
/// assert_eq!(baseline_temperature(peak, 17.0, 17.0, 100.0), peak);
/// assert_eq!(baseline_temperature(peak, 150.0, 17.0, 100.0), Temperature::zero());
/// ```
pub fn baseline_temperature(peak: Temperature, radius: f64, isco_radius: f64, span: f64) -> Temperature {
    let x = 1.0 - (radius - isco_radius).max(0.0) / span.max(f64::EPSILON);
    peak * x.max(0.0).powf(0.75)
}

/// Density ρ = ṁ (r_isco / r)^(15/8), capped at twice the ISCO value.
pub fn surface_density(accretion_rate: f64, isco_radius: f64, radius: f64) -> f64 {
    let ratio = (isco_radius / radius.max(f64::EPSILON)).min(2.0);
    accretion_rate * ratio.powf(1.875)
}

/// Blandford-Znajek style launch power P = a² B² exp(−(r − r_s)/r_s).
pub fn blandford_znajek_power(spin: f64, magnetic_field: f64, radius: f64, horizon_radius: f64) -> f64 {
    let falloff = (-(radius - horizon_radius) / horizon_radius).exp();
    spin * spin * magnetic_field * magnetic_field * falloff
}

/// Lorentz-like factor Γ = 1 + scale · P, capped.
pub fn lorentz_factor(power: f64, scale: f64, max: f64) -> f64 {
    (1.0 + scale * power.max(0.0)).min(max.max(1.0))
}

/// Probability of a launch during `dt`, rising with time spent in the band.
///
/// ```text
/// p = 1 − exp(−rate · (t_band / τ) · dt)
/// ```
pub fn launch_probability(rate: f64, time_in_band: f64, timescale: f64, dt: f64) -> f64 {
    let hazard = rate.max(0.0) * time_in_band / timescale.max(f64::EPSILON);
    1.0 - (-hazard * dt).exp()
}
