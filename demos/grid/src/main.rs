//! grid-dispatch — command-line runner for the rust_dispatch simulator.
//!
//! Builds a rectangular grid, spawns a responder fleet, schedules incident
//! arrivals and runs the dispatch cycle until every incident is resolved.
//! Prints per-kind success rates and the learned resource estimates.
//!
//! ```text
//! grid-dispatch --preset --behavior patrol --distribution normal
//! grid-dispatch --scenario run.json --output out/ --estimates-out est.json
//! RUST_LOG=debug grid-dispatch --width 5 --height 5 --incidents 20
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rd_agent::{BehaviorMode, Responder};
use rd_core::{Cycle, IncidentKind};
use rd_dispatch::Resolution;
use rd_output::{CsvWriter, OutputWriter, SimOutputObserver};
use rd_schedule::{ArrivalDistribution, load_schedule_csv};
use rd_sim::{CycleSummary, NoopObserver, ScenarioConfig, Sim, SimObserver};
use rd_spatial::BfsRouter;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "grid-dispatch", version, about = "Run a grid dispatch scenario")]
struct Cli {
    /// Scenario JSON; explicit flags below override its fields.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Start from the reference run (15×15, 100 responders, 1500 incidents).
    #[arg(long, conflicts_with = "scenario")]
    preset: bool,

    /// idle | patrol | station | mix
    #[arg(long)]
    behavior: Option<BehaviorMode>,

    /// uniform | normal | linear | exponential
    #[arg(long)]
    distribution: Option<ArrivalDistribution>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    responders: Option<usize>,

    #[arg(long)]
    incidents: Option<usize>,

    /// Cycles during which incidents arrive.
    #[arg(long)]
    cycles: Option<u64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Stop after `cycles` even if incidents are still active.
    #[arg(long)]
    no_drain: bool,

    /// Arrival schedule CSV (`cycle,kind`) replacing the generated one.
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Directory for output files; nothing is written when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write `output.db` instead of CSV files.
    #[cfg(feature = "sqlite")]
    #[arg(long, requires = "output")]
    sqlite: bool,

    /// Responder snapshot interval in cycles (0 disables snapshots).
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Warm-start estimates from a previous run.
    #[arg(long)]
    estimates_in: Option<PathBuf>,

    /// Save the learned estimates after the run.
    #[arg(long)]
    estimates_out: Option<PathBuf>,
}

impl Cli {
    /// Resolve the scenario: file or preset first, then flag overrides.
    fn scenario(&self) -> Result<ScenarioConfig> {
        let mut s = match &self.scenario {
            Some(path) => read_json(path)?,
            None if self.preset => ScenarioConfig::simulation_preset(),
            None => ScenarioConfig::default(),
        };
        if let Some(v) = self.behavior          { s.behavior = v; }
        if let Some(v) = self.distribution      { s.distribution = v; }
        if let Some(v) = self.width             { s.width = v; }
        if let Some(v) = self.height            { s.height = v; }
        if let Some(v) = self.responders        { s.responders = v; }
        if let Some(v) = self.incidents         { s.incidents = v; }
        if let Some(v) = self.cycles            { s.cycles = v; }
        if let Some(v) = self.seed              { s.seed = v; }
        if let Some(v) = self.snapshot_interval { s.snapshot_interval_cycles = v; }
        if self.no_drain {
            s.drain_incidents = false;
        }
        if let Some(path) = &self.estimates_in {
            let estimates: BTreeMap<IncidentKind, i64> = read_json(path)?;
            s.estimates = Some(estimates);
        }
        Ok(s)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

// ── Observers ─────────────────────────────────────────────────────────────────

/// Counts what passes through and forwards to the inner observer.
struct CountingObserver<O: SimObserver> {
    inner:       O,
    cycles:      u64,
    resolutions: usize,
    dropped:     usize,
    snapshots:   usize,
}

impl<O: SimObserver> CountingObserver<O> {
    fn new(inner: O) -> Self {
        Self { inner, cycles: 0, resolutions: 0, dropped: 0, snapshots: 0 }
    }
}

impl<O: SimObserver> SimObserver for CountingObserver<O> {
    fn on_cycle_start(&mut self, cycle: Cycle) {
        self.inner.on_cycle_start(cycle);
    }

    fn on_resolution(&mut self, resolution: &Resolution) {
        self.resolutions += 1;
        self.inner.on_resolution(resolution);
    }

    fn on_cycle_end(&mut self, summary: &CycleSummary) {
        self.cycles += 1;
        self.dropped += summary.dropped;
        self.inner.on_cycle_end(summary);
    }

    fn on_snapshot(&mut self, cycle: Cycle, responders: &[Responder]) {
        self.snapshots += responders.len();
        self.inner.on_snapshot(cycle, responders);
    }

    fn on_sim_end(&mut self, final_cycle: Cycle) {
        self.inner.on_sim_end(final_cycle);
    }
}

/// Run with a counting wrapper and print the tallies.
fn run_counted<O: SimObserver>(sim: &mut Sim<BfsRouter>, inner: O) -> Result<O> {
    let mut obs = CountingObserver::new(inner);
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  cycles run        : {}", obs.cycles);
    println!("  incidents resolved: {}", obs.resolutions);
    println!("  arrivals dropped  : {}", obs.dropped);
    println!("  snapshot rows     : {}", obs.snapshots);
    println!();
    Ok(obs.inner)
}

fn run_to_writer<W: OutputWriter>(sim: &mut Sim<BfsRouter>, writer: W) -> Result<()> {
    let mut obs = run_counted(sim, SimOutputObserver::new(writer))?;
    if let Some(e) = obs.take_error() {
        return Err(e).context("writing simulation output");
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
fn run_to_dir(sim: &mut Sim<BfsRouter>, dir: &Path, cli: &Cli) -> Result<()> {
    if cli.sqlite {
        return run_to_writer(sim, rd_output::SqliteWriter::new(dir)?);
    }
    run_to_writer(sim, CsvWriter::new(dir)?)
}

#[cfg(not(feature = "sqlite"))]
fn run_to_dir(sim: &mut Sim<BfsRouter>, dir: &Path, _cli: &Cli) -> Result<()> {
    run_to_writer(sim, CsvWriter::new(dir)?)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // 1. Scenario.
    let scenario = cli.scenario()?;
    println!("=== grid-dispatch ===");
    println!(
        "Grid {}×{}, {} {} responders, {} incidents ({}) over {} cycles, seed {}",
        scenario.width,
        scenario.height,
        scenario.responders,
        scenario.behavior,
        scenario.incidents,
        scenario.distribution,
        scenario.cycles,
        scenario.seed,
    );
    println!();

    // 2. Build.
    let builder = match &cli.schedule {
        Some(path) => {
            let schedule = load_schedule_csv(path).with_context(|| format!("loading {}", path.display()))?;
            info!("loaded {} arrivals from {}", schedule.len(), path.display());
            scenario.builder_with_schedule(schedule)?
        }
        None => scenario.builder()?,
    };
    let mut sim = builder.build()?;

    // 3. Run.
    match &cli.output {
        None => {
            run_counted(&mut sim, NoopObserver)?;
        }
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            run_to_dir(&mut sim, dir, &cli)?;
            println!("Output written to {}", dir.display());
        }
    }

    report(&sim, &cli)
}

/// Print success rates and estimates; save the estimates when asked.
fn report(sim: &Sim<BfsRouter>, cli: &Cli) -> Result<()> {
    println!("Success rate by incident type");
    println!("{}", "-".repeat(32));
    print!("{}", sim.coordinator.success_rate());
    println!();

    let estimates = sim.coordinator.estimates();
    println!("{:<10} {:>8}", "Type", "Estimate");
    println!("{}", "-".repeat(19));
    for (kind, estimate) in &estimates {
        println!("{:<10} {:>8}", kind.type_number(), estimate);
    }

    if let Some(path) = &cli.estimates_out {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &estimates)
            .with_context(|| format!("writing {}", path.display()))?;
        println!();
        println!("Estimates saved to {}", path.display());
    }
    Ok(())
}
