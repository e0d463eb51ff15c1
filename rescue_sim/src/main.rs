//! Rescue Swarm Simulator CLI
//!
//! Runs cooperative search over a random (or explicitly described) grid and
//! reports steps, rescues, discoveries and coverage.

use clap::Parser;
use rescue_core::{create_roster, Coordinate, Grid};
use rescue_sim::render;
use rescue_sim::{RunExport, SeedRunner, SimConfig, SimError, Simulation, SimulationReport};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Rescue swarm simulator
#[derive(Parser, Debug)]
#[command(name = "rescue-sim")]
#[command(about = "Simulate cooperative drones searching a grid for victims", long_about = None)]
struct Args {
    /// Seed for grid generation (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of cooperating drones
    #[arg(short, long, default_value = "3")]
    agents: usize,

    /// Grid width
    #[arg(long, default_value = "10")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "10")]
    height: usize,

    /// Number of random victims
    #[arg(long, default_value = "4")]
    victims: usize,

    /// Number of random obstacles
    #[arg(long, default_value = "10")]
    obstacles: usize,

    /// Tick limit
    #[arg(long, default_value = "50")]
    steps: u64,

    /// Number of consecutive seeds to run
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Ticks to skip a target after failing to plan a route to it (0 = never)
    #[arg(long, default_value = "0")]
    cooldown: u64,

    /// Base cell for an explicit grid
    #[arg(long, default_value = "0,0")]
    base: Coordinate,

    /// Victim cell "x,y" (repeatable; switches to an explicit grid)
    #[arg(long = "victim")]
    victim_cells: Vec<Coordinate>,

    /// Obstacle cell "x,y" (repeatable; switches to an explicit grid)
    #[arg(long = "obstacle")]
    obstacle_cells: Vec<Coordinate>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output
    #[arg(long)]
    json: bool,

    /// Export a tick-by-tick replay to a JSON file
    #[arg(long)]
    export: Option<String>,
}

impl Args {
    fn is_explicit(&self) -> bool {
        !self.victim_cells.is_empty() || !self.obstacle_cells.is_empty()
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    // JSON goes to stdout, so keep progress logs out of it.
    let level = if args.json {
        Level::WARN
    } else if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    let config = SimConfig::default()
        .with_seed(base_seed)
        .with_agents(args.agents)
        .with_size(args.width, args.height)
        .with_population(args.victims, args.obstacles)
        .with_step_limit(args.steps)
        .with_retry_cooldown(args.cooldown);

    if args.seeds > 1 && !args.is_explicit() {
        if args.export.is_some() {
            return Err(SimError::InvalidOptions(
                "--export only supports a single seed".to_string(),
            ));
        }
        return run_sweep(args, config);
    }

    let mut sim = if args.is_explicit() {
        let grid = Grid::new(
            args.width,
            args.height,
            args.base,
            args.victim_cells.iter().copied(),
            args.obstacle_cells.iter().copied(),
        )?;
        let roster = create_roster(&grid, args.agents, config.agent_config())?;
        Simulation::new(grid, roster, args.steps)?
    } else {
        Simulation::from_config(&config)?
    };

    if !args.json {
        info!("Rescue Swarm Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("Initial map:");
        for row in render::describe(sim.grid()) {
            info!("  {}", row);
        }
    }

    let report = match &args.export {
        Some(path) => {
            let generated = (!args.is_explicit()).then_some(&config);
            let export = RunExport::record(base_seed, generated, &mut sim);
            export.write_to_file(path)?;
            info!("Exported {} frames to {}", export.frames.len(), path);
            sim.report()
        }
        None => sim.run(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
        info!("Final map:");
        let positions: Vec<Coordinate> = report.agents.iter().map(|a| a.position).collect();
        for row in render::describe_with_agents(sim.grid(), &positions) {
            info!("  {}", row);
        }
    }
    Ok(())
}

fn run_sweep(args: &Args, config: SimConfig) -> Result<(), SimError> {
    let base_seed = config.seed;
    let runner = SeedRunner::new(config);
    let results = runner.run_many(base_seed, args.seeds)?;
    let fully_rescued = results.iter().filter(|r| r.all_rescued).count();

    if args.json {
        let summary = serde_json::json!({
            "total": results.len(),
            "fully_rescued": fully_rescued,
            "results": results.iter().map(|r| {
                serde_json::json!({
                    "seed": r.seed,
                    "steps": r.metrics.steps,
                    "rescued": r.metrics.rescued,
                    "discovered": r.metrics.discovered,
                    "total_victims": r.total_victims,
                    "coverage": r.metrics.coverage,
                    "failed_searches": r.metrics.failed_searches,
                })
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("{}/{} runs rescued every victim", fully_rescued, results.len());
    }
    Ok(())
}

fn print_summary(report: &SimulationReport) {
    let m = &report.metrics;
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("Steps executed:    {}", m.steps);
    info!("Victims rescued:   {}/{}", m.rescued, report.total_victims);
    info!("Victims detected:  {}/{}", m.discovered, report.total_victims);
    info!("Area coverage:     {:.2}%", m.coverage * 100.0);
    info!("Searches:          {} ({} failed)", m.searches, m.failed_searches);
}
