use crate::companion::CompanionTunables;
use crate::config::{ConfigPatch, EngineSettings, SimulationConfig};
use crate::disk::DiskTunables;
use crate::error::ConfigurationError;
use crate::simulation::{Scenario, Simulation};
use crate::tidal::{TidalPhase, TidalTunables};

fn small_settings() -> EngineSettings {
    EngineSettings {
        disk_particles: 300,
        wind_particles: 60,
        pair_particles: 40,
        outflow_capacity: 50,
        debris_capacity: 100,
        ..EngineSettings::default()
    }
}

fn small_sim(config: SimulationConfig) -> Simulation {
    Simulation::new(config, small_settings()).unwrap()
}

#[test]
fn test_new_rejects_invalid_settings() {
    let settings = EngineSettings {
        disk_particles: 0,
        ..EngineSettings::default()
    };
    let result = Simulation::new(SimulationConfig::default(), settings);

    assert!(matches!(result, Err(ConfigurationError::InvalidSettings(_))));
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = SimulationConfig {
        spin: 1.5,
        ..SimulationConfig::default()
    };
    let result = Simulation::new(config, small_settings());

    assert!(matches!(result, Err(ConfigurationError::OutOfRange { option: "spin", .. })));
}

#[test]
fn test_new_rejects_tunables_that_would_panic() {
    let flat_disk = EngineSettings {
        disk: DiskTunables {
            max_height: -1.0,
            ..DiskTunables::default()
        },
        ..small_settings()
    };
    let inverted_companion = EngineSettings {
        companion: CompanionTunables {
            min_radius: 20.0,
            max_radius: 2.0,
            ..CompanionTunables::default()
        },
        ..small_settings()
    };

    for settings in [flat_disk, inverted_companion] {
        assert!(matches!(
            Simulation::new(SimulationConfig::default(), settings),
            Err(ConfigurationError::InvalidSettings(_))
        ));
    }
}

#[test]
fn test_advance_counts_ticks_and_time() {
    let mut sim = small_sim(SimulationConfig::default());
    for _ in 0..5 {
        sim.advance(0.016);
    }

    let stats = sim.statistics();
    assert_eq!(stats.ticks, 5);
    // Up to dt_min may be carried into the next frame
    assert!(stats.time <= 0.08 + 1e-9);
    assert!(stats.time > 0.08 - 0.001);
    assert!(stats.last_dt >= 0.001 && stats.last_dt <= 0.016);
}

#[test]
fn test_slow_motion_keeps_step_within_bounds() {
    let mut sim = small_sim(SimulationConfig {
        time_scale: 0.05,
        ..SimulationConfig::default()
    });
    let step = sim.settings().step;

    for frame in 1..=40 {
        sim.advance(0.016);

        let stats = sim.statistics();
        assert_eq!(stats.ticks, frame);
        assert!(stats.last_dt >= step.dt_min, "frame {}: dt {}", frame, stats.last_dt);
        assert!(stats.last_dt <= step.dt_base);

        let scaled = frame as f64 * 0.016 * 0.05;
        assert!(stats.time <= scaled + 1e-9);
        assert!(stats.time > scaled - step.dt_min);
    }
}

#[test]
fn test_expired_debris_reaches_statistics() {
    let settings = EngineSettings {
        tidal: TidalTunables {
            disruption_rate: 50.0,
            debris_max_age: 0.5,
            ..TidalTunables::default()
        },
        ..small_settings()
    };
    let mut sim = Simulation::new(SimulationConfig::default(), settings).unwrap();

    let mut previous = 0;
    for _ in 0..15_000 {
        sim.advance(1.0 / 60.0);
        let expired = sim.statistics().debris_expired;
        assert!(expired >= previous);
        previous = expired;
        if expired > 0 {
            break;
        }
    }

    let stats = sim.statistics();
    assert!(stats.disruptions >= 1);
    assert!(stats.debris_expired > 0);
    assert!(stats.debris_expired <= stats.debris_emitted);
}

#[test]
fn test_captured_flags_cover_every_substep_of_the_frame() {
    let mut sim = small_sim(SimulationConfig::default());

    let mut total = 0;
    for _ in 0..200 {
        let before = sim.statistics().captures;
        sim.advance(0.064);
        let in_frame = sim.statistics().captures - before;

        let flagged = sim.snapshot().disk.iter().filter(|p| p.captured).count() as u64;
        assert_eq!(flagged, in_frame);
        total += in_frame;
    }
    assert!(total > 0);
}

#[test]
fn test_paused_advance_is_a_no_op() {
    let mut sim = small_sim(SimulationConfig::default());
    sim.advance(0.016);
    sim.configure(&ConfigPatch {
        paused: Some(true),
        ..ConfigPatch::default()
    })
    .unwrap();
    let before = sim.snapshot();

    for _ in 0..10 {
        sim.advance(0.016);
    }

    assert!(sim.is_paused());
    assert_eq!(sim.snapshot(), before);
}

#[test]
fn test_rejected_patch_changes_nothing() {
    let mut sim = small_sim(SimulationConfig::default());
    sim.advance(0.016);
    let before = sim.snapshot();

    let err = sim
        .configure(&ConfigPatch {
            spin: Some(0.9),
            viscosity: Some(-0.1),
            ..ConfigPatch::default()
        })
        .unwrap_err();

    assert!(matches!(err, ConfigurationError::OutOfRange { option: "viscosity", .. }));
    assert_eq!(sim.config().spin, 0.7);
    assert_eq!(sim.snapshot(), before);
}

#[test]
fn test_unknown_json_option_rejected() {
    let mut sim = small_sim(SimulationConfig::default());

    let err = sim.configure_json(r#"{"spin": 0.5, "warpFactor": 9}"#).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownOption(ref name) if name == "warpFactor"));

    assert!(matches!(sim.configure_json("[1, 2]"), Err(ConfigurationError::NotAnObject)));
    assert!(matches!(sim.configure_json("{"), Err(ConfigurationError::Malformed(_))));
    assert_eq!(sim.config().spin, 0.7);
}

#[test]
fn test_spin_change_moves_isco_and_channels() {
    let mut sim = small_sim(SimulationConfig::default());
    let isco = sim.geometry().isco_radius;

    sim.configure_json(r#"{"spin": 0.95}"#).unwrap();

    assert!(sim.geometry().isco_radius < isco);
    assert_eq!(sim.config().spin, 0.95);
}

#[test]
fn test_disabling_tidal_clears_body() {
    let mut sim = small_sim(SimulationConfig::default());
    assert!(sim.snapshot().tidal_body.is_some());

    sim.configure_json(r#"{"tidalEncounterEnabled": false}"#).unwrap();
    let snapshot = sim.snapshot();
    assert!(snapshot.tidal_body.is_none());
    assert!(snapshot.debris.is_empty());

    sim.configure_json(r#"{"tidalEncounterEnabled": true}"#).unwrap();
    assert_eq!(
        sim.snapshot().tidal_body.map(|b| b.phase),
        Some(TidalPhase::Approaching)
    );
}

#[test]
fn test_disabled_companion_hides_wind() {
    let mut sim = small_sim(SimulationConfig::default());
    assert_eq!(sim.snapshot().wind.len(), 60);

    sim.configure_json(r#"{"companionEnabled": false}"#).unwrap();
    sim.advance(0.016);

    let snapshot = sim.snapshot();
    assert!(!snapshot.companion.enabled);
    assert!(snapshot.wind.is_empty());
    assert_eq!(sim.wind_len(), 60);
}

#[test]
fn test_reset_outflow_and_tidal() {
    let mut sim = small_sim(SimulationConfig {
        jet_launch_rate: 40.0,
        ..SimulationConfig::default()
    });
    for _ in 0..120 {
        sim.advance(0.016);
    }
    assert!(sim.statistics().outflow_active > 0);

    sim.reset(Scenario::Outflow);
    assert_eq!(sim.statistics().outflow_active, 0);
    assert!(sim.snapshot().outflow.is_empty());

    sim.reset(Scenario::TidalEncounter);
    let body = sim.snapshot().tidal_body.unwrap();
    assert_eq!(body.phase, TidalPhase::Approaching);
    assert_eq!(body.integrity, 1.0);
}

#[test]
fn test_reset_all_keeps_population_sizes() {
    let mut sim = small_sim(SimulationConfig::default());
    sim.advance(0.016);
    sim.reset(Scenario::All);

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.disk.len(), 300);
    assert_eq!(snapshot.pairs.len(), 40);
    assert_eq!(snapshot.wind.len(), 60);
    assert!(snapshot.outflow.is_empty());
}

#[test]
fn test_snapshot_serializes_to_json() {
    let sim = small_sim(SimulationConfig::default());
    let json = sim.snapshot().to_json().unwrap();

    assert!(json.contains("\"statistics\""));
    assert!(json.contains("\"iscoRadius\""));
}

#[test]
fn test_same_seed_same_run() {
    let run = || {
        let mut sim = small_sim(SimulationConfig::default());
        for _ in 0..30 {
            sim.advance(0.016);
        }
        sim.snapshot()
    };

    assert_eq!(run(), run());
}
