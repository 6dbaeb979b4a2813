//! `grid` — SIGO routing over a Manhattan grid of cruising vehicles.
//!
//! Vehicles are dropped on random roads of a generated grid (or a topology
//! file) and drive straight along them.  After `flow_start_secs` of
//! beaconing, random source/destination pairs start one send cycle each.
//! Send, receive and flow logs are written per seed.
//!
//! Run with:
//!   cargo run -p grid --release -- --recovery 2 --vehicles 150 --sweep 8
//!   RUST_LOG=debug cargo run -p grid -- --config scenario.toml --seed 3

mod config;
mod scenario;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use rayon::prelude::*;

use sg_core::SimRng;
use sg_output::{DeliveryStats, SimOutputObserver};
use sg_routing::RecoveryMode;
use sg_schedule::load_flows_csv;
use sg_sim::SimBuilder;

use config::ScenarioConfig;
use scenario::{generate_flows, load_topology, place_vehicles};

/// Seed offset separating scenario generation from protocol jitter.
const SCENARIO_STREAM: u64 = 0x5eed;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// TOML scenario file; flags below override its values.
    #[arg(short = 'c', long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Master RNG seed (first seed of a sweep).
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Local recovery: 0 = none, 1 = SIGO, 2 = JBR.
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u8).range(0..=2))]
    recovery: Option<u8>,

    /// Seconds of beaconing before the first flow.
    #[arg(long = "start", value_name = "SECS")]
    start_secs: Option<f64>,

    /// Number of generated flows.
    #[arg(long)]
    sources: Option<usize>,

    /// Number of vehicles.
    #[arg(short = 'n', long)]
    vehicles: Option<usize>,

    /// Simulated seconds.
    #[arg(short = 'd', long, value_name = "SECS")]
    duration: Option<f64>,

    /// Flow schedule CSV (`source,destination,start_secs`).
    #[arg(long, value_name = "CSV")]
    flows: Option<PathBuf>,

    /// Topology file instead of the generated grid.
    #[arg(long, value_name = "FILE")]
    topology: Option<PathBuf>,

    /// Output directory.
    #[arg(short = 'o', long, default_value = "output/grid")]
    output: PathBuf,

    /// Run this many consecutive seeds in parallel.
    #[arg(long, default_value_t = 1)]
    sweep: u64,
}

impl CliArgs {
    fn apply(&self, cfg: &mut ScenarioConfig) -> Result<()> {
        if let Some(seed) = self.seed {
            cfg.simulation.seed = seed;
        }
        if let Some(mode) = self.recovery {
            cfg.protocol.recovery_mode = RecoveryMode::try_from(mode)?;
        }
        if let Some(start) = self.start_secs {
            cfg.simulation.flow_start_secs = start;
        }
        if let Some(duration) = self.duration {
            cfg.simulation.duration_secs = duration;
        }
        if let Some(sources) = self.sources {
            cfg.traffic.sources = sources;
        }
        if let Some(vehicles) = self.vehicles {
            cfg.grid.vehicles = vehicles;
        }
        if let Some(flows) = &self.flows {
            cfg.traffic.flows_file = Some(flows.clone());
        }
        if let Some(topology) = &self.topology {
            cfg.grid.topology_file = Some(topology.clone());
        }
        Ok(())
    }
}

// ── Output backend ────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
fn open_writer(dir: &Path) -> Result<sg_output::CsvWriter> {
    Ok(sg_output::CsvWriter::new(dir)?)
}

#[cfg(feature = "sqlite")]
fn open_writer(dir: &Path) -> Result<sg_output::SqliteWriter> {
    Ok(sg_output::SqliteWriter::new(dir)?)
}

// ── One run ───────────────────────────────────────────────────────────────────

fn run_one(cfg: &ScenarioConfig, seed: u64, out_dir: &Path) -> Result<DeliveryStats> {
    let mut sim_config = cfg.simulation.clone();
    sim_config.seed = seed;

    let mut rng = SimRng::new(seed).child(SCENARIO_STREAM);
    let topology = load_topology(&cfg.grid)?;
    let mobility = place_vehicles(&topology, &cfg.grid, &mut rng)?;
    let flows = match &cfg.traffic.flows_file {
        Some(path) => load_flows_csv(path)
            .with_context(|| format!("loading flows from {}", path.display()))?,
        None => generate_flows(&cfg.traffic, mobility.len(), &mut rng)?,
    };
    info!(
        "seed {seed}: {} vehicles, {} roads, {} flows, recovery {:?}",
        mobility.len(),
        topology.road_count(),
        flows.len(),
        cfg.protocol.recovery_mode,
    );

    let mut sim = SimBuilder::new(sim_config, topology, mobility)
        .protocol(cfg.protocol.clone())
        .channel(cfg.channel.clone())
        .flows(flows)
        .build()?;

    let mut obs = SimOutputObserver::new(open_writer(out_dir)?);
    sim.run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        return Err(e).with_context(|| format!("writing output to {}", out_dir.display()));
    }
    obs.stats().cloned().context("run finished without statistics")
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let args = CliArgs::parse();
    let mut cfg = match &args.config {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    args.apply(&mut cfg)?;

    let first = cfg.simulation.seed;
    let start = Instant::now();

    if args.sweep <= 1 {
        let stats = run_one(&cfg, first, &args.output)?;
        println!("seed {first}: {stats}");
    } else {
        let results: Vec<(u64, Result<DeliveryStats>)> = (first..first + args.sweep)
            .into_par_iter()
            .map(|seed| (seed, run_one(&cfg, seed, &args.output.join(format!("seed-{seed}")))))
            .collect();

        let mut ratios = Vec::new();
        for (seed, result) in &results {
            match result {
                Ok(stats) => {
                    println!("seed {seed}: {stats}");
                    ratios.push(stats.delivery_ratio());
                }
                Err(e) => error!("seed {seed} failed: {e:#}"),
            }
        }
        if ratios.is_empty() {
            anyhow::bail!("every run of the sweep failed");
        }
        let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
        println!("sweep of {} seeds: mean delivery ratio {:.1}%", ratios.len(), mean * 100.0);
    }

    println!("finished in {} ms", start.elapsed().as_millis());
    Ok(())
}
