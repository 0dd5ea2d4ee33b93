//! Tick orchestration.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use super::snapshot::{
    CompanionView, DebrisView, DiskView, OutflowView, PairView, Snapshot, TidalBodyView, WindView,
};
use super::{Scenario, Statistics};
use crate::clock::SimulationClock;
use crate::companion::{CompanionBody, WindPool};
use crate::config::{ConfigPatch, EngineSettings, SimulationConfig};
use crate::disk::{DiskConditions, DiskSystem};
use crate::error::Result;
use crate::forces::ForceField;
use crate::geometry::Geometry;
use crate::outflow::OutflowSystem;
use crate::pairs::PairEventSystem;
use crate::tidal::{TidalEncounter, TidalPhase};
use crate::vector::safe_normalize;

/// The simulation engine.
///
/// # Examples
///
/// ```
/// use accretion::{EngineSettings, Simulation, SimulationConfig};
///
/// let settings = EngineSettings {
///     disk_particles: 200,
///     wind_particles: 50,
///     pair_particles: 20,
///     ..EngineSettings::default()
/// };
/// let mut sim = Simulation::new(SimulationConfig::default(), settings).unwrap();
///
/// for _ in 0..10 {
///     sim.advance(0.016);
/// }
///
/// let snapshot = sim.snapshot();
/// assert_eq!(snapshot.disk.len(), 200);
/// assert_eq!(snapshot.ticks, 10);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    settings: EngineSettings,
    geometry: Geometry,
    clock: SimulationClock,
    rng: ChaChaRng,
    disk: DiskSystem,
    outflow: OutflowSystem,
    tidal: TidalEncounter,
    companion: CompanionBody,
    wind: WindPool,
    pairs: PairEventSystem,
    stats: Statistics,
    circularization_seen: bool,
}

impl Simulation {
    pub fn new(config: SimulationConfig, settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        config.validate()?;

        let geometry = Geometry::new(&config, &settings);
        let mut rng = ChaChaRng::seed_from_u64(settings.seed);
        let conditions = DiskConditions::new(&config, geometry, settings.outflow_channels);

        let disk = DiskSystem::new(settings.disk_particles, &conditions, settings.disk, &mut rng);
        let outflow = OutflowSystem::new(
            settings.outflow_channels,
            settings.outflow_capacity,
            &geometry,
            settings.outflow,
        );
        let mut tidal = TidalEncounter::new(settings.debris_capacity, settings.tidal);
        if config.tidal_encounter_enabled {
            tidal.spawn(&geometry, &mut rng);
        }
        let companion = CompanionBody::new(&config, &geometry, settings.companion);
        let wind = WindPool::new(settings.wind_particles, &companion, &mut rng);
        let pairs = PairEventSystem::new(
            settings.pair_particles,
            &geometry,
            config.pair_intensity,
            settings.pairs,
            &mut rng,
        );
        let clock = SimulationClock::new(settings.step, config.time_scale, config.paused);

        tracing::info!(
            target: "accretion",
            seed = settings.seed,
            disk = settings.disk_particles,
            isco = geometry.isco_radius,
            peak_temperature_k = geometry.peak_temperature.to_kelvin(),
            "simulation created"
        );

        let mut sim = Self {
            config,
            settings,
            geometry,
            clock,
            rng,
            disk,
            outflow,
            tidal,
            companion,
            wind,
            pairs,
            stats: Statistics::default(),
            circularization_seen: false,
        };
        sim.refresh_statistics();
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn is_paused(&self) -> bool {
        self.clock.paused
    }

    /// Apply a partial configuration.
    ///
    /// The patch is validated against a copy; on error nothing changes.
    pub fn configure(&mut self, patch: &ConfigPatch) -> Result<()> {
        let mut next = self.config.clone();
        patch.apply_to(&mut next);

        if let Err(err) = next.validate() {
            tracing::warn!(target: "accretion", "configuration rejected: {}", err);
            return Err(err);
        }
        self.commit(next);
        Ok(())
    }

    /// Apply a JSON object of options, e.g. `{"spin": 0.9}`.
    pub fn configure_json(&mut self, json: &str) -> Result<()> {
        let patch = ConfigPatch::from_json(json).inspect_err(|err| {
            tracing::warn!(target: "accretion", "configuration rejected: {}", err);
        })?;
        self.configure(&patch)
    }

    fn commit(&mut self, next: SimulationConfig) {
        let previous = std::mem::replace(&mut self.config, next);
        let config = &self.config;

        self.geometry = Geometry::new(config, &self.settings);
        if previous.spin != config.spin {
            self.outflow.rebuild_channels(&self.geometry);
        }
        self.companion.reconfigure(config, &self.geometry);

        match (previous.tidal_encounter_enabled, config.tidal_encounter_enabled) {
            (true, false) => self.tidal.clear(),
            (false, true) => {
                self.tidal.spawn(&self.geometry, &mut self.rng);
                self.circularization_seen = false;
            }
            _ => {}
        }

        self.clock.paused = config.paused;
        self.clock.time_scale = config.time_scale;

        tracing::debug!(
            target: "accretion",
            spin = config.spin,
            isco = self.geometry.isco_radius,
            companion = config.companion_enabled,
            tidal = config.tidal_encounter_enabled,
            paused = config.paused,
            "configuration committed"
        );
        self.refresh_statistics();
    }

    /// Advance by one frame of `frame_dt` seconds.
    ///
    /// Does nothing while paused or for a non-positive frame.
    pub fn advance(&mut self, frame_dt: f64) {
        let Some(plan) = self.clock.plan(frame_dt) else {
            return;
        };
        self.disk.clear_captures();

        let outflow_evicted = self.outflow.evicted();
        let debris_evicted = self.tidal.debris_evicted();

        for _ in 0..plan.substeps {
            self.substep(plan.base);
        }
        self.clock.finish_tick();

        if self.outflow.evicted() > outflow_evicted {
            tracing::debug!(
                target: "accretion",
                evicted = self.outflow.evicted() - outflow_evicted,
                "outflow queue at capacity"
            );
        }
        if self.tidal.debris_evicted() > debris_evicted {
            tracing::debug!(
                target: "accretion",
                evicted = self.tidal.debris_evicted() - debris_evicted,
                "debris queue at capacity"
            );
        }
        self.refresh_statistics();
    }

    fn substep(&mut self, base: f64) {
        let field = ForceField::new(&self.geometry, self.companion.force_source());

        let max_acceleration = if self.config.tidal_encounter_enabled {
            self.disk.max_acceleration(&field).max(self.tidal.max_acceleration(&field))
        } else {
            self.disk.max_acceleration(&field)
        };
        let split = self.clock.split(base, max_acceleration);

        let conditions = DiskConditions::new(&self.config, self.geometry, self.settings.outflow_channels);
        for h in split.steps() {
            let report = self.disk.advance(h, &conditions, &field, &mut self.rng);
            self.stats.launches += report.launches;
            self.stats.plunges += report.plunges;
            self.stats.captures += report.captures();
            self.stats.numeric_faults += report.faults;

            if self.config.tidal_encounter_enabled {
                self.advance_tidal(h, &field);
            }
        }

        let stepped = split.stepped();
        if stepped > 0.0 {
            for event in self.disk.drain_launches() {
                self.outflow.launch(&event);
            }
            self.outflow.advance(stepped, self.config.magnetic_field);

            if self.config.companion_enabled {
                self.wind.advance(stepped, &self.companion, &mut self.rng);
            }

            let pairs = self
                .pairs
                .advance(stepped, &self.geometry, self.config.pair_intensity, &mut self.rng);
            self.stats.pair_annihilations += pairs.annihilations;
            self.stats.pair_swallowed += pairs.swallowed;

            // Companion moves only between particle passes
            self.companion.advance(stepped, &self.geometry);
        }

        self.clock.record(&split);
    }

    fn advance_tidal(&mut self, dt: f64, field: &ForceField) {
        let report = self.tidal.advance(dt, &self.geometry, field, &mut self.rng);

        if let Some((from, to)) = report.transition {
            let integrity = self.tidal.body().map_or(0.0, |b| b.integrity);
            match to {
                TidalPhase::Swallowed => tracing::info!(
                    target: "accretion",
                    ?from,
                    integrity,
                    "tidal body swallowed before disruption"
                ),
                _ => tracing::info!(target: "accretion", ?from, ?to, integrity, "tidal phase change"),
            }
        }
        if report.circularized > 0 && !self.circularization_seen {
            self.circularization_seen = true;
            tracing::debug!(target: "accretion", time = self.clock.time, "first debris circularized");
        }
    }

    /// Reinitialize the populations named by `scenario`.
    ///
    /// Counters in [`Statistics`] keep accumulating.
    pub fn reset(&mut self, scenario: Scenario) {
        if scenario.includes(Scenario::Disk) {
            let conditions = DiskConditions::new(&self.config, self.geometry, self.settings.outflow_channels);
            self.disk.reseed(&conditions, &mut self.rng);
        }
        if scenario.includes(Scenario::Outflow) {
            self.outflow.clear();
        }
        if scenario.includes(Scenario::TidalEncounter) {
            if self.config.tidal_encounter_enabled {
                self.tidal.spawn(&self.geometry, &mut self.rng);
            } else {
                self.tidal.clear();
            }
            self.circularization_seen = false;
        }
        if scenario.includes(Scenario::CompanionWind) {
            self.wind.reseed(&self.companion, &mut self.rng);
        }
        if scenario.includes(Scenario::Pairs) {
            self.pairs
                .reseed(&self.geometry, self.config.pair_intensity, &mut self.rng);
        }

        tracing::info!(target: "accretion", ?scenario, "scenario reset");
        self.refresh_statistics();
    }

    fn refresh_statistics(&mut self) {
        let counters = self.tidal.counters();
        let (in_stream, in_disk) = self.tidal.debris_census();
        let debris_peak = self
            .tidal
            .debris()
            .map(|d| d.temperature)
            .fold(units::Temperature::zero(), units::Temperature::max);

        let stats = &mut self.stats;
        stats.outflow_launched = self.outflow.launched();
        stats.outflow_evicted = self.outflow.evicted();
        stats.outflow_active = self.outflow.len();
        stats.debris_emitted = counters.debris_emitted;
        stats.debris_evicted = self.tidal.debris_evicted();
        stats.debris_circularized = counters.debris_circularized;
        stats.debris_accreted = counters.debris_accreted;
        stats.debris_expired = counters.debris_expired;
        stats.debris_in_stream = in_stream;
        stats.debris_in_disk = in_disk;
        stats.disruptions = counters.disruptions;
        stats.swallowed = counters.swallowed;
        stats.average_infall_speed = self.disk.average_infall_speed();
        stats.peak_temperature = self.disk.peak_temperature().max(debris_peak);
        stats.last_dt = self.clock.last_dt;
        stats.ticks = self.clock.ticks;
        stats.time = self.clock.time;
    }

    /// Detached copy of everything a consumer may render.
    pub fn snapshot(&self) -> Snapshot {
        let disk = self
            .disk
            .particles()
            .iter()
            .map(|p| DiskView {
                position: p.position(),
                radius: p.radius,
                temperature: p.temperature,
                density: p.density,
                captured: p.captured,
            })
            .collect();

        let outflow = self
            .outflow
            .particles()
            .map(|p| OutflowView {
                position: p.position,
                channel: p.channel,
                polarity: p.polarity,
                progress: p.progress,
                lorentz_factor: p.lorentz_factor,
                age_fraction: p.age / p.max_age,
            })
            .collect();

        let tidal_body = self.tidal.body().map(|b| TidalBodyView {
            position: b.position,
            velocity: b.velocity,
            mass: b.mass,
            radius: b.radius,
            integrity: b.integrity,
            tidal_radius: b.tidal_radius,
            stretch: b.stretch,
            stretch_axis: safe_normalize(&b.position.coords, nalgebra::Vector3::x()),
            phase: b.phase,
            remnant_accreted: b.remnant_accreted,
        });

        let debris = self
            .tidal
            .debris()
            .map(|d| DebrisView {
                position: d.position,
                temperature: d.temperature,
                state: d.state,
            })
            .collect();

        let companion = CompanionView {
            enabled: self.companion.enabled,
            position: self.companion.position,
            mass: self.companion.mass,
            radius: self.companion.radius,
            temperature: self.companion.temperature,
            influence_radius: self.companion.influence_radius,
        };

        let wind = if self.companion.enabled {
            self.wind
                .particles()
                .iter()
                .map(|p| WindView {
                    position: self.companion.position + p.offset,
                    age_fraction: p.age / p.max_age,
                })
                .collect()
        } else {
            Vec::new()
        };

        let pairs = self
            .pairs
            .particles()
            .iter()
            .map(|p| PairView {
                position: p.position,
                kind: p.kind,
            })
            .collect();

        Snapshot {
            time: self.clock.time,
            ticks: self.clock.ticks,
            paused: self.clock.paused,
            geometry: self.geometry,
            disk,
            outflow,
            tidal_body,
            debris,
            companion,
            wind,
            pairs,
            statistics: self.stats.clone(),
        }
    }

    /// Disk population size; constant for the lifetime of the engine
    pub fn disk_len(&self) -> usize {
        self.disk.len()
    }

    pub fn wind_len(&self) -> usize {
        self.wind.len()
    }

    pub fn pair_len(&self) -> usize {
        self.pairs.len()
    }
}
