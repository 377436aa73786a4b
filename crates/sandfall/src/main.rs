use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sandfall::config::SandfallConfig;
use sandfall::render::{AsciiRenderer, PixelRenderer};
use sandfall::scenario::{ScenarioDefinition, ScenarioExecutor, ScenarioExecutorConfig};
use sandfall::world::{World, WorldRng, seeded};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (RON); runs the built-in demo when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Config file (RON); `sandfall.ron` is used when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run (overrides scenario and config)
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Capture a text frame every N ticks
    #[arg(long)]
    print_every: Option<u64>,

    /// Print the final grid as text (with any captured frames)
    #[arg(long)]
    ascii: bool,

    /// Write the final grid as a PNG image
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per cell in the PNG image
    #[arg(long, default_value = "4")]
    scale: usize,

    /// Write the execution report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log every setup action
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &args.config {
        Some(path) => SandfallConfig::load_from(path)?,
        None => SandfallConfig::load()?,
    };
    if let Some(width) = args.width {
        config.world.width = width;
    }
    if let Some(height) = args.height {
        config.world.height = height;
    }
    if let Some(every) = args.print_every {
        config.run.print_every = every;
    }

    let mut scenario = match &args.scenario {
        Some(path) => ScenarioDefinition::from_file(path)?,
        None => ScenarioDefinition::demo(),
    };
    if let Some(ticks) = args.ticks {
        scenario.ticks = Some(ticks);
    }
    // Command line flags beat the scenario file
    if args.width.is_some() || args.height.is_some() {
        scenario.size = None;
    }

    let mut world = World::new(&scenario.world_config(&config.world))
        .context("Failed to create world")?;

    let seed = args.seed.or(scenario.seed).or(config.run.seed);
    let mut report = match seed {
        Some(seed) => {
            log::info!("Seeded run: {}", seed);
            run(&args, &config, &scenario, &mut world, &mut seeded(seed))
        }
        None => run(&args, &config, &scenario, &mut world, &mut rand::thread_rng()),
    }?;
    report.seed = seed;

    if args.ascii {
        for snapshot in &report.snapshots {
            println!("-- tick {} --", snapshot.tick);
            println!("{}", snapshot.ascii);
        }
        if report.snapshots.is_empty() {
            println!("{}", AsciiRenderer::new().render(&world));
        }
    }

    if let Some(path) = &args.png {
        let mut renderer = PixelRenderer::for_world(&world, args.scale);
        renderer.render(&world);
        renderer.save_png(path)?;
        log::info!("Saved image: {}", path.display());
    }

    if let Some(path) = &args.report {
        report.save_json(path)?;
        log::info!("Saved report: {}", path.display());
    }

    println!(
        "{}: {} ({} ticks, {} moved, {} settled)",
        report.scenario_name,
        if report.passed { "PASSED" } else { "FAILED" },
        report.ticks_executed,
        report.stats.cells_moved,
        report.stats.cells_settled
    );

    if !report.passed {
        for failure in &report.verification_failures {
            eprintln!("  ✗ {}", failure.message);
        }
        anyhow::bail!(
            "{} verification(s) failed",
            report.verification_failures.len()
        );
    }

    Ok(())
}

fn run<R: WorldRng>(
    args: &Args,
    config: &SandfallConfig,
    scenario: &ScenarioDefinition,
    world: &mut World,
    rng: &mut R,
) -> anyhow::Result<sandfall::scenario::ExecutionReport> {
    let mut executor = ScenarioExecutor::with_config(ScenarioExecutorConfig {
        default_ticks: config.run.ticks,
        snapshot_every: (config.run.print_every > 0).then_some(config.run.print_every),
        verbose: args.verbose,
    });

    executor.execute_scenario(scenario, world, rng)
}
