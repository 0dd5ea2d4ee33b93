//! Integration tests for the full engine.
//!
//! These drive the public API only: configure, advance, snapshot, reset.

use accretion::tidal::{DebrisState, TidalPhase};
use accretion::{ConfigurationError, EngineSettings, Scenario, Simulation, SimulationConfig};

fn settings() -> EngineSettings {
    EngineSettings {
        disk_particles: 1_500,
        wind_particles: 200,
        pair_particles: 100,
        outflow_capacity: 300,
        debris_capacity: 400,
        ..EngineSettings::default()
    }
}

#[test]
fn test_population_sizes_are_conserved() {
    let config = SimulationConfig {
        jet_launch_rate: 20.0,
        ..SimulationConfig::default()
    };
    let settings = settings();
    let mut sim = Simulation::new(config, settings.clone()).unwrap();

    for tick in 0..600 {
        sim.advance(0.016);

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.disk.len(), settings.disk_particles, "tick {}", tick);
        assert_eq!(snapshot.wind.len(), settings.wind_particles, "tick {}", tick);
        assert_eq!(snapshot.pairs.len(), settings.pair_particles, "tick {}", tick);
        assert!(snapshot.outflow.len() <= settings.outflow_capacity);
        assert!(snapshot.debris.len() <= settings.debris_capacity);
    }

    let stats = sim.statistics();
    assert!(stats.launches > 0);
    assert_eq!(stats.numeric_faults, 0);
}

#[test]
fn test_capture_scenario_keeps_disk_inside_seed_radius() {
    let config = SimulationConfig {
        central_mass: units::Mass::from_solar_masses(66e9),
        spin: 0.7,
        companion_enabled: false,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config, EngineSettings::default()).unwrap();
    let outer = sim.geometry().disk_outer_radius;

    let initial_max = sim
        .snapshot()
        .disk
        .iter()
        .map(|p| p.radius)
        .fold(0.0, f64::max);
    assert!(initial_max <= outer);

    for _ in 0..1_000 {
        sim.advance(0.016);
    }

    let snapshot = sim.snapshot();
    assert!(snapshot.disk.iter().all(|p| p.radius <= outer));
    assert!(snapshot.statistics.captures >= 1);
    assert_eq!(snapshot.statistics.ticks, 1_000);
    assert!(snapshot.statistics.peak_temperature.to_kelvin() > 0.0);
}

#[test]
fn test_disk_never_lingers_below_plunge_margin() {
    let mut sim = Simulation::new(SimulationConfig::default(), settings()).unwrap();
    let isco = sim.geometry().isco_radius;
    let margin = sim.settings().disk.plunge_margin;

    for _ in 0..400 {
        sim.advance(0.016);
        let snapshot = sim.snapshot();
        assert!(snapshot.disk.iter().all(|p| p.radius >= isco - margin));
    }
}

#[test]
fn test_rejected_configuration_leaves_state_unchanged() {
    let mut sim = Simulation::new(SimulationConfig::default(), settings()).unwrap();
    for _ in 0..50 {
        sim.advance(0.016);
    }
    let before = sim.snapshot();

    let result = sim.configure_json(r#"{"centralMass": -1}"#);

    assert!(matches!(
        result,
        Err(ConfigurationError::OutOfRange {
            option: "centralMass",
            ..
        })
    ));
    assert_eq!(sim.snapshot(), before);

    // And the engine carries on exactly as an untouched one would
    let mut twin = Simulation::new(SimulationConfig::default(), settings()).unwrap();
    for _ in 0..50 {
        twin.advance(0.016);
    }
    sim.advance(0.016);
    twin.advance(0.016);
    assert_eq!(sim.snapshot(), twin.snapshot());
}

#[test]
fn test_lifecycle_transitions_are_one_way() {
    let config = SimulationConfig {
        companion_enabled: false,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config, settings()).unwrap();

    let mut disrupted_seen = false;
    let mut circularized_seen = 0;
    for _ in 0..3_000 {
        sim.advance(0.016);
        let snapshot = sim.snapshot();

        if let Some(body) = &snapshot.tidal_body {
            if disrupted_seen {
                assert_eq!(body.phase, TidalPhase::Disrupted);
            }
            disrupted_seen |= body.phase == TidalPhase::Disrupted;
        }

        let circularized = snapshot
            .debris
            .iter()
            .filter(|d| d.state == DebrisState::Circularized)
            .count();
        // Every circularized particle still alive was counted on the way in
        assert!(circularized as u64 <= snapshot.statistics.debris_circularized);
        assert_eq!(
            snapshot.debris.len() - circularized,
            snapshot.statistics.debris_in_stream
        );
        circularized_seen = circularized_seen.max(circularized);
    }

    assert!(disrupted_seen);
    assert!(sim.statistics().debris_emitted > 0);
    assert!(circularized_seen > 0);
}

#[test]
fn test_reset_reintroduces_tidal_body() {
    let mut sim = Simulation::new(SimulationConfig::default(), settings()).unwrap();
    for _ in 0..1_500 {
        sim.advance(0.016);
    }
    assert_ne!(
        sim.snapshot().tidal_body.map(|b| b.phase),
        Some(TidalPhase::Approaching)
    );

    sim.reset(Scenario::TidalEncounter);

    let snapshot = sim.snapshot();
    let body = snapshot.tidal_body.unwrap();
    assert_eq!(body.phase, TidalPhase::Approaching);
    assert!((body.position.coords.norm() - 300.0).abs() < 1e-6);
    assert!(snapshot.debris.is_empty());
    assert_eq!(snapshot.disk.len(), 1_500);
}

#[test]
fn test_time_scale_speeds_up_simulated_time() {
    let mut normal = Simulation::new(SimulationConfig::default(), settings()).unwrap();
    let mut fast = Simulation::new(
        SimulationConfig {
            time_scale: 4.0,
            ..SimulationConfig::default()
        },
        settings(),
    )
    .unwrap();

    for _ in 0..10 {
        normal.advance(0.016);
        fast.advance(0.016);
    }

    // Each substep may leave under dt_min waiting for the next frame
    let dt_min = normal.settings().step.dt_min;
    assert!((normal.statistics().time - 0.16).abs() < dt_min);
    assert!((fast.statistics().time - 0.64).abs() < 4.0 * dt_min);
}
