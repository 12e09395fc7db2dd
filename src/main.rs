use clap::Parser;

use bundle_planner_rs::adapters::{load_menu, load_request, save_json};
use bundle_planner_rs::cli::{Cli, Command};
use bundle_planner_rs::config::EngineConfig;
use bundle_planner_rs::error::Result;
use bundle_planner_rs::orchestrator;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` always wins when set; otherwise `--verbose` picks the default
/// level so `enable_detailed_logging` actually gates the `debug!`/`trace!`
/// spans scattered through the solvers instead of being a dead knob.
fn init_tracing(cli: &Cli) {
    let verbose = matches!(cli.command, Command::Plan { verbose, .. } if verbose);
    let default_level = if verbose { "debug" } else { "info" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Plan { menu, request, kitchen_cap, solver, output, seed, diversity_pct, time_cap_ms, verbose } => {
            cmd_plan(
                &menu,
                &request,
                kitchen_cap,
                solver.into(),
                output.as_deref(),
                seed,
                diversity_pct,
                time_cap_ms,
                verbose,
            )
        }
        Command::Validate { menu } => cmd_validate(&menu),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_plan(
    menu_path: &str,
    request_path: &str,
    kitchen_cap: u32,
    solver: bundle_planner_rs::SolverKind,
    output: Option<&str>,
    seed: u64,
    diversity_pct: u32,
    time_cap_ms: u64,
    verbose: bool,
) -> Result<()> {
    let menu = load_menu(menu_path)?;
    let request = load_request(request_path)?;
    let config = EngineConfig::new(diversity_pct, time_cap_ms, verbose)?;

    let comparison = orchestrator::build(&menu, &request, kitchen_cap, solver, &config, seed)?;

    match output {
        Some(path) => {
            save_json(path, &comparison)?;
            println!("Wrote {} bundle(s) to {path}", comparison.solutions.len());
        }
        None => {
            println!(
                "{} solver found {} bundle(s) in {}ms",
                comparison.solver_type,
                comparison.solutions.len(),
                comparison.finding_time_ms
            );
            for (rank, solution) in comparison.solutions.iter().enumerate() {
                println!(
                    "  #{}: score {} — {} items, {} cents total",
                    rank + 1,
                    solution.metrics.optimality_score,
                    solution.distinct_items(),
                    solution.metrics.total_cost
                );
            }
        }
    }

    Ok(())
}

fn cmd_validate(menu_path: &str) -> Result<()> {
    let menu = load_menu(menu_path)?;
    let items = bundle_planner_rs::adapters::split_menu(&menu);

    if items.is_empty() {
        println!("{menu_path}: parses, but no item contributes any usable servings.");
    } else {
        println!("{menu_path}: OK — {} usable item(s) out of {} menu entries.", items.len(), menu.len());
    }

    Ok(())
}
