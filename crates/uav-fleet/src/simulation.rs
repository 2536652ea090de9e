//! `Simulation` — a fleet and the engine that flies it, stepped together.

use uav_core::{EngineConfig, Tick};
use uav_engine::{Engine, EngineObserver, NoopObserver, TickReport, Ticker};

use crate::{EntitySnapshot, Fleet, FleetResult};

/// Engine hooks plus fleet-level snapshots.
///
/// All methods have default no-op implementations.
pub trait SimObserver: EngineObserver {
    /// Called after every `snapshot_interval_ticks`-th running tick, once
    /// completions for that tick have been applied.
    fn on_snapshot(&mut self, _tick: Tick, _snapshots: &[EntitySnapshot]) {}

    /// Called once when a `run_*` method returns.  `final_tick` is the next
    /// tick that would run.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

impl SimObserver for NoopObserver {}

/// Drives an [`Engine`] and keeps a [`Fleet`] in step with it.
pub struct Simulation {
    pub fleet:  Fleet,
    pub engine: Engine,
}

impl Simulation {
    /// An empty fleet and a stopped engine.
    pub fn new(config: EngineConfig) -> FleetResult<Self> {
        Self::with_fleet(Fleet::new(), config)
    }

    pub fn with_fleet(fleet: Fleet, config: EngineConfig) -> FleetResult<Self> {
        Ok(Self { fleet, engine: Engine::new(config)? })
    }

    /// Start the engine and launch every idle entity with somewhere to go.
    /// Returns the number of flights launched.
    pub fn launch(&mut self) -> usize {
        self.engine.start();
        self.fleet.start_simulation(&mut self.engine)
    }

    /// One engine tick, then fold its completions into the fleet.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> TickReport {
        let report = self.engine.tick_with(observer);
        if !report.ran {
            return report;
        }

        let finished = self.engine.take_finished();
        self.fleet.apply_completions(&finished);

        let interval = self.engine.config().snapshot_interval_ticks;
        if interval > 0 && report.tick.0.is_multiple_of(interval) {
            observer.on_snapshot(report.tick, &self.fleet.snapshots());
        }
        report
    }

    /// Step back to back until idle, stopped, or `max_ticks` ran.
    pub fn run_until_idle<O: SimObserver>(&mut self, max_ticks: u64, observer: &mut O) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.engine.is_running() && !self.engine.is_idle() {
            self.step(observer);
            ran += 1;
        }
        observer.on_run_end(self.engine.now());
        ran
    }

    /// Step once per tick interval of wall-clock time until idle, stopped, or
    /// `max_ticks` ran.
    pub fn run_paced<O: SimObserver>(&mut self, max_ticks: Option<u64>, observer: &mut O) -> u64 {
        let mut ticker = Ticker::new(self.engine.config().tick_interval());
        let mut ran = 0;
        while self.engine.is_running()
            && !self.engine.is_idle()
            && max_ticks.is_none_or(|max| ran < max)
        {
            ticker.wait();
            self.step(observer);
            ran += 1;
        }
        observer.on_run_end(self.engine.now());
        ran
    }
}
