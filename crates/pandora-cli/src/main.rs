mod shell;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pandora_core::{RunSummary, SimConfig, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "pandora")]
#[command(version)]
#[command(about = "Cellular life simulation with energy, movement and combat")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one simulation, optionally drawing every generation
    Run {
        /// JSON config file; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, default_value = "1000")]
        generations: usize,

        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(long)]
        width: Option<usize>,

        #[arg(long)]
        height: Option<usize>,

        /// Draw the grid in the terminal, pausing `tick_interval_ms` per frame
        #[arg(short, long)]
        render: bool,

        #[arg(long, default_value = "10")]
        sample_every: usize,

        /// Write the run summary as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run independent seeded worlds in parallel and report their outcomes
    Sweep {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "8")]
        runs: usize,

        #[arg(long, default_value = "42")]
        base_seed: u64,

        #[arg(short, long, default_value = "500")]
        generations: usize,

        #[arg(long, default_value = "50")]
        sample_every: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare bare stepping against a fully sampled run
    Bench {
        #[arg(long, default_value = "200")]
        width: usize,

        #[arg(long, default_value = "150")]
        height: usize,

        #[arg(short, long, default_value = "100")]
        generations: usize,
    },

    /// Write the default configuration as JSON
    Init {
        #[arg(short, long, default_value = "pandora.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            generations,
            seed,
            width,
            height,
            render,
            sample_every,
            output,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(width) = width {
                config.width = width;
            }
            if let Some(height) = height {
                config.height = height;
            }
            run(config, generations, sample_every, render, output.as_deref())
        }
        Commands::Sweep {
            config,
            runs,
            base_seed,
            generations,
            sample_every,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            sweep(
                config,
                runs,
                base_seed,
                generations,
                sample_every,
                output.as_deref(),
            )
        }
        Commands::Bench {
            width,
            height,
            generations,
        } => bench(width, height, generations),
        Commands::Init { output } => init(&output),
    }
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        log::info!("using default configuration");
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = SimConfig::from_json_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn run(
    config: SimConfig,
    generations: usize,
    sample_every: usize,
    render: bool,
    output: Option<&Path>,
) -> Result<()> {
    let tick = Duration::from_millis(config.tick_interval_ms);
    let mut world = World::try_new(config).context("failed to initialize world")?;

    let mut stdout = std::io::stdout().lock();
    if render {
        write!(stdout, "{}{}", shell::CLEAR_SCREEN, shell::CURSOR_HOME)?;
        write!(stdout, "{}", shell::render_frame(&world))?;
        writeln!(stdout, "{}", shell::overlay(&world.statistics()))?;
        stdout.flush()?;
    }

    let start = Instant::now();
    let mut draw_error = None;
    let summary = world.try_run_experiment_observed(generations, sample_every, |world, stats| {
        if !render || draw_error.is_some() {
            return;
        }
        let frame = format!(
            "{}{}{}\n",
            shell::CURSOR_HOME,
            shell::render_frame(world),
            shell::overlay(stats)
        );
        if let Err(e) = stdout.write_all(frame.as_bytes()).and_then(|_| stdout.flush()) {
            draw_error = Some(e);
            return;
        }
        thread::sleep(tick);
    })?;
    if let Some(e) = draw_error {
        return Err(e).context("failed to draw frame");
    }
    drop(stdout);

    let elapsed = start.elapsed();
    report(&summary, elapsed);
    if let Some(path) = output {
        write_json(path, &summary)?;
    }
    Ok(())
}

fn report(summary: &RunSummary, elapsed: Duration) {
    let stats = summary.final_statistics;
    println!("=== Run complete (seed {}) ===", summary.seed);
    println!("Generations: {}", stats.generation);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Final: {}", shell::overlay(&stats));
    println!(
        "Events: births={} deaths={} kills={} offspring={} displacements={} stagnation_deaths={}",
        summary.totals.births,
        summary.totals.deaths,
        summary.totals.kills,
        summary.totals.offspring,
        summary.totals.displacements,
        summary.totals.stagnation_deaths
    );
    if let Some(generation) = summary.extinct_at {
        println!("Population extinct at generation {generation}");
    }
}

/// Seeds for `runs` worlds, derived deterministically from `base_seed`.
fn sweep_seeds(base_seed: u64, runs: usize) -> Vec<u64> {
    let mut rng = ChaCha12Rng::seed_from_u64(base_seed);
    (0..runs).map(|_| rng.random::<u64>()).collect()
}

fn sweep(
    config: SimConfig,
    runs: usize,
    base_seed: u64,
    generations: usize,
    sample_every: usize,
    output: Option<&Path>,
) -> Result<()> {
    if runs == 0 {
        bail!("--runs must be positive");
    }
    config.validate()?;
    let seeds = sweep_seeds(base_seed, runs);
    log::info!("sweeping {runs} worlds for {generations} generations");

    let start = Instant::now();
    let summaries = seeds
        .par_iter()
        .map(|&seed| -> Result<RunSummary> {
            let mut world = World::try_new(SimConfig {
                seed,
                ..config.clone()
            })?;
            Ok(world.try_run_experiment(generations, sample_every)?)
        })
        .collect::<Result<Vec<_>>>()?;
    let elapsed = start.elapsed();

    println!(
        "{:>20} {:>8} {:>8} {:>8} {:>8} {:>8} {:>10}",
        "seed", "alive", "mutated", "warrior", "kills", "births", "extinct_at"
    );
    for summary in &summaries {
        let stats = summary.final_statistics;
        println!(
            "{:>20} {:>8} {:>8} {:>8} {:>8} {:>8} {:>10}",
            summary.seed,
            stats.alive,
            stats.mutated,
            stats.warrior,
            summary.totals.kills,
            summary.totals.births,
            summary
                .extinct_at
                .map_or_else(|| "-".to_string(), |g| g.to_string())
        );
    }
    let extinct = summaries.iter().filter(|s| s.extinct_at.is_some()).count();
    println!(
        "{runs} runs in {:.2}s, {extinct} went extinct",
        elapsed.as_secs_f64()
    );

    if let Some(path) = output {
        write_json(path, &summaries)?;
    }
    Ok(())
}

fn bench(width: usize, height: usize, generations: usize) -> Result<()> {
    if generations == 0 {
        bail!("--generations must be positive");
    }
    let config = SimConfig {
        width,
        height,
        ..SimConfig::default()
    };
    println!(
        "Benchmarking {}x{} grid ({} cells) for {} generations",
        width,
        height,
        config.cell_count(),
        generations
    );
    let mut bare = World::try_new(config.clone())?;
    let mut sampled = World::try_new(config)?;

    let mut phase_us = [0u64; 3];
    let start = Instant::now();
    for _ in 0..generations {
        let timings = bare.step();
        phase_us[0] += timings.movement_us;
        phase_us[1] += timings.interaction_us;
        phase_us[2] += timings.transition_us;
    }
    let duration_bare = start.elapsed();
    let steps = generations as u32;
    println!("Time WITHOUT metrics: {:?}", duration_bare);
    println!("Avg per generation: {:?}", duration_bare / steps);
    println!(
        "Avg phase time (us): movement={} interaction={} transition={}",
        phase_us[0] / generations as u64,
        phase_us[1] / generations as u64,
        phase_us[2] / generations as u64
    );

    let start = Instant::now();
    sampled.try_run_experiment(generations, 1)?;
    let duration_sampled = start.elapsed();
    println!("Time WITH metrics every generation: {:?}", duration_sampled);
    println!("Avg per generation: {:?}", duration_sampled / steps);

    let diff = duration_sampled.saturating_sub(duration_bare);
    println!("Total metrics overhead: {:?}", diff);
    println!("Avg overhead per generation: {:?}", diff / steps);
    Ok(())
}

fn init(output: &Path) -> Result<()> {
    if output.exists() {
        bail!("{} already exists", output.display());
    }
    let json = SimConfig::default().to_json_pretty()?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}
