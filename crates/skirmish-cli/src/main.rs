//! Skirmish runner
//!
//! Spawns or loads a population, lets the workers run for a fixed time while
//! printing a coarse map once per second, then prints a final report.

mod render;
mod sinks;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish_core::config::SimulationConfig;
use skirmish_core::entity::{Creature, Entity};
use skirmish_core::factory::populate;
use skirmish_core::persistence;
use skirmish_core::simulation::Simulation;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::render::{render_map, RunReport};
use crate::sinks::{ConsoleSink, FileSink};

/// Concurrent creature combat simulation
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run a concurrent creature combat simulation")]
struct Args {
    /// Seconds to run before stopping
    #[arg(long, default_value_t = 30)]
    duration: u64,

    /// Number of random creatures to spawn (ignored with --load)
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load the starting population from a row file
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the survivors to a row file at the end
    #[arg(long)]
    save: Option<PathBuf>,

    /// Append combat events to this file
    #[arg(long, default_value = "log.txt")]
    log_file: PathBuf,

    /// Do not write the event log file
    #[arg(long)]
    no_log_file: bool,

    /// Do not render the map every second
    #[arg(long)]
    quiet: bool,

    /// Random seed for deterministic spawning and movement
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let creatures = match &args.load {
        Some(path) => {
            let creatures = persistence::load(path)
                .with_context(|| format!("failed to load population from {}", path.display()))?;
            ensure_on_map(&creatures, config.map_size)
                .with_context(|| format!("population in {} does not fit the map", path.display()))?;
            creatures
        }
        None => {
            let seed = config.seed.unwrap_or_else(rand::random);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            populate(args.count, config.map_size, &mut rng).context("failed to spawn population")?
        }
    };
    info!(count = creatures.len(), map_size = config.map_size, "population ready");

    let map_size = config.map_size;
    let seed = config.seed;
    let mut sim = Simulation::new(config, creatures).context("failed to set up simulation")?;
    sim.add_sink(Arc::new(ConsoleSink::stdout()));
    if !args.no_log_file {
        match FileSink::append(&args.log_file) {
            Ok(sink) => sim.add_sink(Arc::new(sink)),
            Err(err) => warn!(path = %args.log_file.display(), %err, "event log disabled"),
        }
    }

    let started = Instant::now();
    let duration = Duration::from_secs(args.duration);
    sim.start().context("failed to start simulation")?;
    while started.elapsed() < duration {
        let remaining = duration.saturating_sub(started.elapsed());
        thread::sleep(remaining.min(Duration::from_secs(1)));
        if !args.quiet {
            let elapsed = started.elapsed().as_secs();
            let map = sim.roster().read_locked(|arena| render_map(arena, map_size, elapsed));
            println!("{map}");
        }
        if sim.roster().len() <= 1 {
            info!("at most one creature left, ending early");
            break;
        }
    }
    sim.stop();

    let report = sim.roster().read_locked(|arena| {
        RunReport::from_arena(arena, sim.tally(), started.elapsed().as_secs_f64(), seed)
    });
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }

    if let Some(path) = &args.save {
        let survivors = sim.roster().survivors();
        persistence::save(path, survivors.iter().map(Entity::creature))
            .with_context(|| format!("failed to save survivors to {}", path.display()))?;
    }
    Ok(())
}

/// Fails if any creature sits outside `(0, map_size]`, where it could never
/// move and would be drawn on the map edge.
fn ensure_on_map(creatures: &[Creature], map_size: i32) -> Result<()> {
    let off_map: Vec<_> = creatures
        .iter()
        .filter(|c| c.position().x() > map_size || c.position().y() > map_size)
        .collect();
    if let Some(first) = off_map.first() {
        bail!(
            "{} creature(s) lie outside map_size {map_size}, first is {} at {}",
            off_map.len(),
            first.name(),
            first.position()
        );
    }
    Ok(())
}

/// Reads the config file, if any, and applies command line overrides.
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::entity::Kind;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let args = Args::parse_from(["skirmish"]);
        assert_eq!(args.duration, 30);
        assert_eq!(args.count, 50);
        assert_eq!(args.log_file, PathBuf::from("log.txt"));
        assert!(!args.quiet && !args.json && !args.no_log_file);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn seed_flag_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 1\nmap_size = 30").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::parse_from(["skirmish", "--config", &path, "--seed", "5"]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.seed, Some(5));
        assert_eq!(config.map_size, 30);
    }

    #[test]
    fn loaded_population_must_fit_map() {
        let inside = Creature::new("in", Kind::Ranger, 100, 1).unwrap();
        let outside = Creature::new("far", Kind::Marauder, 300, 5).unwrap();

        assert!(ensure_on_map(&[inside.clone()], 100).is_ok());
        let err = ensure_on_map(&[inside, outside], 100).unwrap_err();
        assert!(err.to_string().contains("far at [300,5]"));
    }

    #[test]
    fn invalid_config_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resolver_threads = 0").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::parse_from(["skirmish", "--config", &path]);
        assert!(build_config(&args).is_err());
    }
}
