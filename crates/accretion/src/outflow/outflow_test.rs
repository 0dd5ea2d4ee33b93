use approx::assert_relative_eq;

use crate::config::{EngineSettings, SimulationConfig};
use crate::geometry::Geometry;
use crate::outflow::channel::channel_for_angle;
use crate::outflow::{ChannelSet, LaunchEvent, OutflowSystem, OutflowTunables, Polarity};

fn geometry() -> Geometry {
    Geometry::new(&SimulationConfig::default(), &EngineSettings::default())
}

fn event(channel: u16, polarity: Polarity) -> LaunchEvent {
    LaunchEvent {
        channel,
        polarity,
        lorentz_factor: 2.0,
        lifetime_jitter: 0.5,
    }
}

#[test]
fn test_channel_radius_shrinks_and_height_grows() {
    let geometry = geometry();
    let tunables = OutflowTunables::default();
    let channels = ChannelSet::new(6, &geometry, &tunables);
    let curve = channels.curve(0);

    let foot = curve.point_at(0.0, Polarity::Upper);
    let mid = curve.point_at(0.5, Polarity::Upper);
    let tip = curve.point_at(1.0, Polarity::Upper);

    let cyl = |p: &nalgebra::Point3<f64>| (p.x * p.x + p.y * p.y).sqrt();
    assert_relative_eq!(cyl(&foot), 1.1 * geometry.isco_radius, epsilon = 1e-9);
    assert!(cyl(&mid) < cyl(&foot));
    assert!(cyl(&tip) < cyl(&mid));
    assert!(foot.z < mid.z && mid.z < tip.z);
    assert_relative_eq!(
        tip.z,
        (tunables.base_height_radii + tunables.length_radii) * geometry.horizon_radius,
        epsilon = 1e-9
    );
}

#[test]
fn test_lower_polarity_mirrors_height() {
    let channels = ChannelSet::new(4, &geometry(), &OutflowTunables::default());

    let upper = channels.position(2, 0.3, Polarity::Upper);
    let lower = channels.position(2, 0.3, Polarity::Lower);

    assert_relative_eq!(upper.x, lower.x);
    assert_relative_eq!(upper.y, lower.y);
    assert_relative_eq!(upper.z, -lower.z);
}

#[test]
fn test_channel_sectors_cover_full_turn() {
    assert_eq!(channel_for_angle(0.0, 6), 0);
    assert_eq!(channel_for_angle(std::f64::consts::PI, 6), 3);
    assert_eq!(channel_for_angle(-0.01, 6), 5);
    assert_eq!(channel_for_angle(std::f64::consts::TAU, 6), 0);
}

#[test]
fn test_progress_grows_with_lorentz_and_field() {
    let mut system = OutflowSystem::new(6, 10, &geometry(), OutflowTunables::default());
    system.launch(&event(1, Polarity::Upper));
    system.advance(0.1, 2.0);

    let p = system.particles().next().unwrap();
    // 0.15 * 2 (field) * 2 (Lorentz) * 0.1
    assert_relative_eq!(p.progress, 0.06, epsilon = 1e-12);
    assert_relative_eq!(p.age, 0.1, epsilon = 1e-12);
    assert_eq!(system.launched(), 1);
}

#[test]
fn test_zero_field_particles_stay_at_foot_and_expire() {
    let tunables = OutflowTunables::default();
    let mut system = OutflowSystem::new(6, 10, &geometry(), tunables);
    system.launch(&event(0, Polarity::Lower));
    let foot = system.particles().next().unwrap().position;

    system.advance(1.0, 0.0);
    assert_eq!(system.particles().next().unwrap().position, foot);

    for _ in 0..10 {
        system.advance(1.0, 0.0);
    }
    assert!(system.is_empty());
    assert_eq!(system.expired(), 1);
}

#[test]
fn test_saturated_particles_retire_after_hold() {
    let mut system = OutflowSystem::new(6, 10, &geometry(), OutflowTunables::default());
    system.launch(&LaunchEvent {
        lorentz_factor: 10.0,
        ..event(0, Polarity::Upper)
    });

    // Reaches the end of the channel on the first step
    system.advance(0.2, 5.0);
    assert_eq!(system.len(), 1);
    assert_relative_eq!(system.particles().next().unwrap().progress, 1.0);

    system.advance(0.3, 5.0);
    assert_eq!(system.len(), 1);
    system.advance(0.3, 5.0);
    assert!(system.is_empty());
}

#[test]
fn test_capacity_evicts_oldest() {
    let mut system = OutflowSystem::new(6, 3, &geometry(), OutflowTunables::default());
    for channel in 0..5 {
        system.launch(&event(channel, Polarity::Upper));
    }

    assert_eq!(system.len(), 3);
    assert_eq!(system.evicted(), 2);
    let channels: Vec<u16> = system.particles().map(|p| p.channel).collect();
    assert_eq!(channels, vec![2, 3, 4]);
}

#[test]
fn test_rebuild_follows_isco() {
    let settings = EngineSettings::default();
    let slow = Geometry::new(&SimulationConfig::default(), &settings);
    let fast = Geometry::new(
        &SimulationConfig {
            spin: 0.95,
            ..SimulationConfig::default()
        },
        &settings,
    );

    let mut system = OutflowSystem::new(6, 10, &slow, OutflowTunables::default());
    let before = system.channels().position(0, 0.0, Polarity::Upper);
    system.rebuild_channels(&fast);
    let after = system.channels().position(0, 0.0, Polarity::Upper);

    assert!(after.x < before.x);
}
