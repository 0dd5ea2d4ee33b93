use units::Mass;

use crate::clock::StepControl;
use crate::companion::CompanionTunables;
use crate::config::{ConfigPatch, EngineSettings, SimulationConfig};
use crate::disk::DiskTunables;
use crate::error::ConfigurationError;
use crate::pairs::PairTunables;
use crate::tidal::TidalTunables;

#[test]
fn test_default_config_is_valid() {
    assert!(SimulationConfig::default().validate().is_ok());
    assert!(EngineSettings::default().validate().is_ok());
}

#[test]
fn test_negative_mass_rejected() {
    let config = SimulationConfig {
        central_mass: Mass::from_solar_masses(-1.0),
        ..SimulationConfig::default()
    };

    match config.validate() {
        Err(ConfigurationError::OutOfRange { option, value, .. }) => {
            assert_eq!(option, "centralMass");
            assert_eq!(value, -1.0);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }
}

#[test]
fn test_non_finite_rejected() {
    let config = SimulationConfig {
        time_scale: f64::NAN,
        ..SimulationConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::NotFinite { option: "timeScale" })
    ));
}

#[test]
fn test_spin_limit() {
    let at_limit = SimulationConfig {
        spin: 0.998,
        ..SimulationConfig::default()
    };
    let beyond = SimulationConfig {
        spin: 0.999,
        ..SimulationConfig::default()
    };

    assert!(at_limit.validate().is_ok());
    assert!(beyond.validate().is_err());
}

#[test]
fn test_eccentricity_must_stay_bound() {
    let config = SimulationConfig {
        companion_eccentricity: 0.95,
        ..SimulationConfig::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_patch_applies_only_set_fields() {
    let patch = ConfigPatch {
        spin: Some(0.3),
        companion_mass: Some(Mass::from_solar_masses(5.0)),
        ..ConfigPatch::default()
    };
    let mut config = SimulationConfig::default();
    patch.apply_to(&mut config);

    assert_eq!(config.spin, 0.3);
    assert_eq!(config.companion_mass.to_solar_masses(), 5.0);
    assert_eq!(config.viscosity, SimulationConfig::default().viscosity);
    assert!(ConfigPatch::default().is_empty());
    assert!(!patch.is_empty());
}

#[test]
fn test_patch_from_json_uses_camel_case() {
    let patch = ConfigPatch::from_json(
        r#"{ "centralMass": 4.0e6, "companionWindSpeed": 12.5, "tidalEncounterEnabled": false }"#,
    )
    .unwrap();

    assert_eq!(patch.central_mass, Some(Mass::from_solar_masses(4.0e6)));
    assert_eq!(patch.companion_wind_speed, Some(12.5));
    assert_eq!(patch.tidal_encounter_enabled, Some(false));
    assert_eq!(patch.spin, None);
}

#[test]
fn test_patch_from_json_rejects_wrong_types() {
    let result = ConfigPatch::from_json(r#"{ "spin": "fast" }"#);

    assert!(matches!(result, Err(ConfigurationError::Malformed(_))));
}

#[test]
fn test_every_option_name_is_accepted() {
    let config = serde_json::to_value(SimulationConfig::default()).unwrap();
    let keys: Vec<&str> = config.as_object().unwrap().keys().map(String::as_str).collect();

    assert_eq!(keys.len(), ConfigPatch::OPTIONS.len());
    for key in keys {
        assert!(ConfigPatch::OPTIONS.contains(&key), "missing option {}", key);
    }

    let round_trip = ConfigPatch::from_json(&config.to_string()).unwrap();
    let mut applied = SimulationConfig {
        spin: 0.1,
        ..SimulationConfig::default()
    };
    round_trip.apply_to(&mut applied);
    assert_eq!(applied, SimulationConfig::default());
}

#[test]
fn test_settings_reject_inverted_step_bounds() {
    let settings = EngineSettings {
        step: StepControl {
            dt_min: 0.05,
            ..StepControl::default()
        },
        ..EngineSettings::default()
    };

    assert!(matches!(
        settings.validate(),
        Err(ConfigurationError::InvalidSettings(_))
    ));
}

#[test]
fn test_settings_deserialize_with_defaults() {
    let settings: EngineSettings =
        serde_json::from_str(r#"{ "seed": 7, "diskParticles": 100, "disk": { "launchTimescale": 1.0 } }"#)
            .unwrap();

    assert_eq!(settings.seed, 7);
    assert_eq!(settings.disk_particles, 100);
    assert_eq!(settings.disk.launch_timescale, 1.0);
    assert_eq!(settings.wind_particles, EngineSettings::default().wind_particles);
}

fn assert_invalid(settings: EngineSettings) {
    assert!(
        matches!(settings.validate(), Err(ConfigurationError::InvalidSettings(_))),
        "accepted {:?}",
        settings
    );
}

#[test]
fn test_disk_height_bound_must_be_positive() {
    for max_height in [-1.0, 0.0, f64::NAN] {
        assert_invalid(EngineSettings {
            disk: DiskTunables {
                max_height,
                ..DiskTunables::default()
            },
            ..EngineSettings::default()
        });
    }
}

#[test]
fn test_disk_respawn_fraction_in_unit_interval() {
    for respawn_inner_fraction in [0.0, 1.5, f64::NAN] {
        assert_invalid(EngineSettings {
            disk: DiskTunables {
                respawn_inner_fraction,
                ..DiskTunables::default()
            },
            ..EngineSettings::default()
        });
    }

    let edge = EngineSettings {
        disk: DiskTunables {
            respawn_inner_fraction: 1.0,
            ..DiskTunables::default()
        },
        ..EngineSettings::default()
    };
    assert!(edge.validate().is_ok());
}

#[test]
fn test_disk_damping_in_unit_interval() {
    assert_invalid(EngineSettings {
        disk: DiskTunables {
            radial_damping: 1.2,
            ..DiskTunables::default()
        },
        ..EngineSettings::default()
    });
    assert_invalid(EngineSettings {
        disk: DiskTunables {
            vertical_damping: -0.1,
            ..DiskTunables::default()
        },
        ..EngineSettings::default()
    });
}

#[test]
fn test_companion_radius_bounds_ordered() {
    assert_invalid(EngineSettings {
        companion: CompanionTunables {
            min_radius: 20.0,
            max_radius: 2.0,
            ..CompanionTunables::default()
        },
        ..EngineSettings::default()
    });
    assert_invalid(EngineSettings {
        companion: CompanionTunables {
            max_radius: f64::NAN,
            ..CompanionTunables::default()
        },
        ..EngineSettings::default()
    });
}

#[test]
fn test_lifetimes_must_be_positive() {
    assert_invalid(EngineSettings {
        companion: CompanionTunables {
            wind_max_age: 0.0,
            ..CompanionTunables::default()
        },
        ..EngineSettings::default()
    });
    assert_invalid(EngineSettings {
        pairs: PairTunables {
            max_age: -1.0,
            ..PairTunables::default()
        },
        ..EngineSettings::default()
    });
    assert_invalid(EngineSettings {
        tidal: TidalTunables {
            debris_max_age: 0.0,
            ..TidalTunables::default()
        },
        ..EngineSettings::default()
    });
}

#[test]
fn test_tidal_ranges_checked() {
    assert_invalid(EngineSettings {
        tidal: TidalTunables {
            pericenter_min: 0.8,
            pericenter_max: 0.6,
            ..TidalTunables::default()
        },
        ..EngineSettings::default()
    });
    assert_invalid(EngineSettings {
        tidal: TidalTunables {
            disruption_threshold: 1.0,
            ..TidalTunables::default()
        },
        ..EngineSettings::default()
    });
}

#[test]
fn test_pair_lifetime_spread_below_one() {
    assert_invalid(EngineSettings {
        pairs: PairTunables {
            lifetime_spread: 1.0,
            ..PairTunables::default()
        },
        ..EngineSettings::default()
    });
}
