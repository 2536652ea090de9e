//! corridor — a small fleet flying random multi-leg routes.
//!
//! Seeds a fleet inside a bounding box, gives every entity a random
//! trajectory (or the legs from a CSV file), launches them all, and runs
//! until every entity has landed.  Positions and per-tick counters go to CSV.
//!
//! ```text
//! cargo run -p corridor -- demos/corridor/corridor.toml
//! RUST_LOG=debug cargo run -p corridor
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use uav_core::{EngineConfig, LatLng, Leg, Tick, load_legs_csv};
use uav_engine::{EngineObserver, TickReport};
use uav_fleet::{EntitySnapshot, SimObserver, Simulation};
use uav_output::{CsvWriter, OutputWriter, SimOutputObserver};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    engine: EngineConfig,
    fleet:  FleetSection,
    run:    RunSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FleetSection {
    count:           usize,
    seed:            u64,
    legs_per_entity: usize,
    min_leg_ms:      f64,
    max_leg_ms:      f64,
    bbox:            BoundingBox,
    /// When set, every entity flies these legs instead of random ones.
    legs_file:       Option<PathBuf>,
}

impl Default for FleetSection {
    fn default() -> Self {
        Self {
            count:           8,
            seed:            42,
            legs_per_entity: 4,
            min_leg_ms:      500.0,
            max_leg_ms:      3_000.0,
            bbox:            BoundingBox::default(),
            legs_file:       None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct BoundingBox {
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self { min_lat: 30.60, max_lat: 30.75, min_lng: -88.20, max_lng: -88.00 }
    }
}

impl BoundingBox {
    fn random_point(&self, rng: &mut SmallRng) -> LatLng {
        LatLng::new(
            rng.gen_range(self.min_lat..self.max_lat),
            rng.gen_range(self.min_lng..self.max_lng),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunSection {
    /// Tick once per `tick_interval_ms` of wall-clock time instead of as fast
    /// as possible.
    paced:      bool,
    max_ticks:  u64,
    output_dir: PathBuf,
}

impl Default for RunSection {
    fn default() -> Self {
        Self { paced: false, max_ticks: 100_000, output_dir: PathBuf::from("output/corridor") }
    }
}

impl DemoConfig {
    fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DemoConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        let b = &self.fleet.bbox;
        if !(b.min_lat < b.max_lat && b.min_lng < b.max_lng) {
            bail!("bounding box is empty: {b:?}");
        }
        if !(self.fleet.min_leg_ms > 0.0 && self.fleet.min_leg_ms < self.fleet.max_leg_ms) {
            bail!(
                "leg duration range {}..{} ms is empty",
                self.fleet.min_leg_ms, self.fleet.max_leg_ms
            );
        }
        Ok(())
    }
}

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    position_rows: usize,
    summary_rows:  usize,
    failed_steps:  usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, position_rows: 0, summary_rows: 0, failed_steps: 0 }
    }
}

impl<W: OutputWriter> EngineObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        self.summary_rows += 1;
        self.failed_steps += report.failed;
        self.inner.on_tick_end(tick, report);
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_snapshot(&mut self, tick: Tick, snapshots: &[EntitySnapshot]) {
        self.position_rows += snapshots.len();
        self.inner.on_snapshot(tick, snapshots);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.inner.on_run_end(final_tick);
    }
}

// ── Fleet seeding ─────────────────────────────────────────────────────────────

fn random_legs(fleet: &FleetSection, rng: &mut SmallRng) -> Vec<Leg> {
    (0..fleet.legs_per_entity)
        .map(|_| {
            let target = fleet.bbox.random_point(rng);
            Leg::new(target, rng.gen_range(fleet.min_leg_ms..fleet.max_leg_ms))
        })
        .collect()
}

fn seed_fleet(sim: &mut Simulation, config: &FleetSection) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let shared_legs = match &config.legs_file {
        Some(path) => Some(
            load_legs_csv(path).with_context(|| format!("loading legs from {}", path.display()))?,
        ),
        None => None,
    };

    for _ in 0..config.count {
        let id = sim.fleet.add_entity(config.bbox.random_point(&mut rng));
        let legs = match &shared_legs {
            Some(legs) => legs.clone(),
            None => random_legs(config, &mut rng),
        };
        for leg in legs {
            sim.fleet.push_leg(id, leg)?;
        }
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(Path::new(&path))?,
        None => {
            log::info!("no config given; using built-in defaults");
            let config = DemoConfig::default();
            config.validate()?;
            config
        }
    };

    println!("=== corridor — rust_uav motion engine ===");
    println!(
        "Entities: {}  |  Legs each: {}  |  Seed: {}  |  Tick: {} ms",
        config.fleet.count,
        config.fleet.legs_per_entity,
        config.fleet.seed,
        config.engine.tick_interval_ms,
    );
    println!();

    // 1. Build the fleet.
    let mut sim = Simulation::new(config.engine.clone())?;
    seed_fleet(&mut sim, &config.fleet)?;

    // 2. Set up output.
    let writer = CsvWriter::new(&config.run.output_dir)?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, &config.engine));

    // 3. Launch and run.
    let launched = sim.launch();
    log::info!("launched {launched} flights");

    let t0 = Instant::now();
    let ticks = if config.run.paced {
        sim.run_paced(Some(config.run.max_ticks), &mut obs)
    } else {
        sim.run_until_idle(config.run.max_ticks, &mut obs)
    };
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        log::error!("output error: {e}");
    }
    if sim.fleet.simulation_running() {
        log::warn!("stopped after {ticks} ticks with flights still in the air");
    }

    // 4. Summary.
    println!(
        "Ran {ticks} ticks ({} ms simulated) in {:.3} s",
        sim.engine.clock().elapsed_ms(),
        elapsed.as_secs_f64()
    );
    println!("  positions.csv      : {} rows", obs.position_rows);
    println!("  tick_summaries.csv : {} rows", obs.summary_rows);
    println!("  failed steps       : {}", obs.failed_steps);
    println!();

    // 5. Final positions.
    println!("{:<10} {:<8} {:>12} {:>12}", "Entity", "Moving", "Lat", "Lng");
    println!("{}", "-".repeat(45));
    for entity in sim.fleet.iter() {
        let p = entity.position();
        println!(
            "{:<10} {:<8} {:>12.6} {:>12.6}",
            entity.name,
            if entity.moving { "yes" } else { "no" },
            p.lat,
            p.lng,
        );
    }

    Ok(())
}
