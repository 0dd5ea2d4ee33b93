//! Runtime configuration and construction-time engine settings.
//!
//! [`SimulationConfig`] holds the options a presentation layer may change at
//! any time through [`Simulation::configure`](crate::Simulation::configure).
//! [`EngineSettings`] fixes pool sizes, queue capacities, the scene scale and
//! the empirically tuned constants; it is only read at construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use units::{Mass, Temperature};

use crate::clock::StepControl;
use crate::companion::CompanionTunables;
use crate::disk::DiskTunables;
use crate::error::{ConfigurationError, Result};
use crate::outflow::OutflowTunables;
use crate::pairs::PairTunables;
use crate::tidal::TidalTunables;

/// Largest spin accepted (Thorne limit)
pub const MAX_SPIN: f64 = 0.998;

/// Hot-reconfigurable simulation options.
///
/// # Examples
///
/// ```
/// use accretion::SimulationConfig;
///
/// let config = SimulationConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.central_mass.to_solar_masses(), 6.6e10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SimulationConfig {
    /// Central mass (M☉)
    pub central_mass: Mass,
    /// Dimensionless spin a ∈ [0, 0.998]
    pub spin: f64,
    /// Magnetic field strength threading the horizon (arbitrary units)
    pub magnetic_field: f64,
    /// Accretion rate in Eddington units
    pub accretion_rate: f64,
    /// Shakura-Sunyaev α
    pub viscosity: f64,
    /// Base rate of outflow launches from the ISCO band (1/s)
    pub jet_launch_rate: f64,
    pub companion_enabled: bool,
    pub companion_mass: Mass,
    pub companion_temperature: Temperature,
    /// Companion semi-major axis (scene units)
    pub companion_orbital_radius: f64,
    pub companion_eccentricity: f64,
    /// Tilt of the companion orbit out of the disk plane (radians)
    pub companion_inclination: f64,
    pub companion_wind_speed: f64,
    pub companion_wind_density: f64,
    pub companion_gravity_strength: f64,
    pub tidal_encounter_enabled: bool,
    pub pair_intensity: f64,
    pub time_scale: f64,
    pub paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            central_mass: Mass::from_solar_masses(6.6e10),
            spin: 0.7,
            magnetic_field: 1.0,
            accretion_rate: 1.0,
            viscosity: 0.1,
            jet_launch_rate: 1.0,
            companion_enabled: true,
            companion_mass: Mass::from_solar_masses(20.0),
            companion_temperature: Temperature::from_kelvin(30_000.0),
            companion_orbital_radius: 260.0,
            companion_eccentricity: 0.0,
            companion_inclination: 0.2,
            companion_wind_speed: 8.0,
            companion_wind_density: 1.0,
            companion_gravity_strength: 1.0,
            tidal_encounter_enabled: true,
            pair_intensity: 1.0,
            time_scale: 1.0,
            paused: false,
        }
    }
}

impl SimulationConfig {
    /// Check every option; the first violation is reported.
    pub fn validate(&self) -> Result<()> {
        check_range("centralMass", self.central_mass.to_solar_masses(), 1.0e-3, 1.0e12, "0.001..=1e12 M☉")?;
        check_range("spin", self.spin, 0.0, MAX_SPIN, "0..=0.998")?;
        check_range("magneticField", self.magnetic_field, 0.0, 100.0, "0..=100")?;
        check_range("accretionRate", self.accretion_rate, 0.0, 100.0, "0..=100 Eddington")?;
        check_range("viscosity", self.viscosity, 0.0, 1.0, "0..=1")?;
        check_range("jetLaunchRate", self.jet_launch_rate, 0.0, 1000.0, "0..=1000 per second")?;
        check_range("companionMass", self.companion_mass.to_solar_masses(), 1.0e-3, 1.0e9, "0.001..=1e9 M☉")?;
        check_range(
            "companionTemperature",
            self.companion_temperature.to_kelvin(),
            1.0,
            1.0e7,
            "1..=1e7 K",
        )?;
        check_range(
            "companionOrbitalRadius",
            self.companion_orbital_radius,
            20.0,
            1.0e5,
            "20..=1e5 scene units",
        )?;
        check_range("companionEccentricity", self.companion_eccentricity, 0.0, 0.9, "0..=0.9")?;
        check_range(
            "companionInclination",
            self.companion_inclination,
            -std::f64::consts::PI,
            std::f64::consts::PI,
            "-π..=π",
        )?;
        check_range("companionWindSpeed", self.companion_wind_speed, 0.0, 1000.0, "0..=1000")?;
        check_range("companionWindDensity", self.companion_wind_density, 0.0, 100.0, "0..=100")?;
        check_range(
            "companionGravityStrength",
            self.companion_gravity_strength,
            0.0,
            100.0,
            "0..=100",
        )?;
        check_range("pairIntensity", self.pair_intensity, 0.0, 10.0, "0..=10")?;
        check_range("timeScale", self.time_scale, 0.0, 10.0, "0..=10")?;
        Ok(())
    }
}

fn check_range(option: &'static str, value: f64, min: f64, max: f64, expected: &'static str) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigurationError::NotFinite { option });
    }
    if value < min || value > max {
        return Err(ConfigurationError::OutOfRange {
            option,
            value,
            expected,
        });
    }
    Ok(())
}

/// A partial update of [`SimulationConfig`]; unset options keep their value.
///
/// # Examples
///
/// ```
/// use accretion::{ConfigPatch, SimulationConfig};
///
/// let patch = ConfigPatch::from_json(r#"{ "spin": 0.9, "paused": true }"#).unwrap();
/// let mut config = SimulationConfig::default();
/// patch.apply_to(&mut config);
///
/// assert_eq!(config.spin, 0.9);
/// assert!(config.paused);
///
/// assert!(ConfigPatch::from_json(r#"{ "warpDrive": 9 }"#).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    pub central_mass: Option<Mass>,
    pub spin: Option<f64>,
    pub magnetic_field: Option<f64>,
    pub accretion_rate: Option<f64>,
    pub viscosity: Option<f64>,
    pub jet_launch_rate: Option<f64>,
    pub companion_enabled: Option<bool>,
    pub companion_mass: Option<Mass>,
    pub companion_temperature: Option<Temperature>,
    pub companion_orbital_radius: Option<f64>,
    pub companion_eccentricity: Option<f64>,
    pub companion_inclination: Option<f64>,
    pub companion_wind_speed: Option<f64>,
    pub companion_wind_density: Option<f64>,
    pub companion_gravity_strength: Option<f64>,
    pub tidal_encounter_enabled: Option<bool>,
    pub pair_intensity: Option<f64>,
    pub time_scale: Option<f64>,
    pub paused: Option<bool>,
}

impl ConfigPatch {
    /// Names accepted by [`from_json`](Self::from_json)
    pub const OPTIONS: &'static [&'static str] = &[
        "centralMass",
        "spin",
        "magneticField",
        "accretionRate",
        "viscosity",
        "jetLaunchRate",
        "companionEnabled",
        "companionMass",
        "companionTemperature",
        "companionOrbitalRadius",
        "companionEccentricity",
        "companionInclination",
        "companionWindSpeed",
        "companionWindDensity",
        "companionGravityStrength",
        "tidalEncounterEnabled",
        "pairIntensity",
        "timeScale",
        "paused",
    ];

    /// Parse a JSON object of options.
    ///
    /// Keys are checked against [`OPTIONS`](Self::OPTIONS) before
    /// deserializing so an unknown option is reported by name.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = &value else {
            return Err(ConfigurationError::NotAnObject);
        };
        if let Some(unknown) = map.keys().find(|k| !Self::OPTIONS.contains(&k.as_str())) {
            return Err(ConfigurationError::UnknownOption(unknown.clone()));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite every option that is set in the patch.
    pub fn apply_to(&self, config: &mut SimulationConfig) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut config.central_mass, self.central_mass);
        set(&mut config.spin, self.spin);
        set(&mut config.magnetic_field, self.magnetic_field);
        set(&mut config.accretion_rate, self.accretion_rate);
        set(&mut config.viscosity, self.viscosity);
        set(&mut config.jet_launch_rate, self.jet_launch_rate);
        set(&mut config.companion_enabled, self.companion_enabled);
        set(&mut config.companion_mass, self.companion_mass);
        set(&mut config.companion_temperature, self.companion_temperature);
        set(&mut config.companion_orbital_radius, self.companion_orbital_radius);
        set(&mut config.companion_eccentricity, self.companion_eccentricity);
        set(&mut config.companion_inclination, self.companion_inclination);
        set(&mut config.companion_wind_speed, self.companion_wind_speed);
        set(&mut config.companion_wind_density, self.companion_wind_density);
        set(&mut config.companion_gravity_strength, self.companion_gravity_strength);
        set(&mut config.tidal_encounter_enabled, self.tidal_encounter_enabled);
        set(&mut config.pair_intensity, self.pair_intensity);
        set(&mut config.time_scale, self.time_scale);
        set(&mut config.paused, self.paused);
    }
}

/// Construction-time settings: scene scale, population sizes and tunables.
///
/// The tunables reproduce a visually plausible flow; they are not physical
/// constants and may be changed freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EngineSettings {
    pub seed: u64,
    /// Event-horizon radius r_s in scene units
    pub horizon_radius: f64,
    /// Scene light speed; fixes GM = c² r_s / 2
    pub light_speed: f64,
    pub disk_particles: usize,
    pub wind_particles: usize,
    pub pair_particles: usize,
    pub outflow_capacity: usize,
    pub debris_capacity: usize,
    pub outflow_channels: usize,
    pub step: StepControl,
    pub disk: DiskTunables,
    pub outflow: OutflowTunables,
    pub tidal: TidalTunables,
    pub companion: CompanionTunables,
    pub pairs: PairTunables,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            horizon_radius: 10.0,
            light_speed: 100.0,
            disk_particles: 4_000,
            wind_particles: 600,
            pair_particles: 300,
            outflow_capacity: 2_000,
            debris_capacity: 3_000,
            outflow_channels: 6,
            step: StepControl::default(),
            disk: DiskTunables::default(),
            outflow: OutflowTunables::default(),
            tidal: TidalTunables::default(),
            companion: CompanionTunables::default(),
            pairs: PairTunables::default(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ConfigurationError::InvalidSettings(msg.to_string()));

        if !(self.horizon_radius.is_finite() && self.horizon_radius > 0.0) {
            return invalid("horizonRadius must be positive");
        }
        if !(self.light_speed.is_finite() && self.light_speed > 0.0) {
            return invalid("lightSpeed must be positive");
        }
        if self.disk_particles == 0 || self.wind_particles == 0 || self.pair_particles == 0 {
            return invalid("particle pools must not be empty");
        }
        if self.outflow_channels == 0 || self.outflow_channels > u16::MAX as usize {
            return invalid("outflowChannels must be in 1..=65535");
        }
        self.step.validate()?;
        self.disk.validate()?;
        self.outflow.validate()?;
        self.tidal.validate()?;
        self.companion.validate()?;
        self.pairs.validate()?;
        Ok(())
    }
}
