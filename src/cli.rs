use clap::{Parser, Subcommand, ValueEnum};

use crate::models::SolverKind;

/// bundle_planner — plans group meal bundles from a menu, headcount,
/// budget and kitchen capacity using interchangeable solvers.
#[derive(Parser, Debug)]
#[command(name = "bundle_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan bundles for a menu and request, using the chosen solver.
    Plan {
        /// Path to the bulk menu JSON file.
        #[arg(long)]
        menu: String,

        /// Path to the planning request JSON file.
        #[arg(long)]
        request: String,

        /// Total kitchen prep-load capacity available.
        #[arg(long)]
        kitchen_cap: u32,

        /// Which solver to use.
        #[arg(long, value_enum, default_value_t = SolverArg::Milp)]
        solver: SolverArg,

        /// Write the resulting BundleComparison as JSON to this path
        /// instead of printing a summary.
        #[arg(long)]
        output: Option<String>,

        /// Seed for the greedy solver's randomized construction.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Percent of a prior CP solution's items that must differ in the
        /// next one (1..=100).
        #[arg(long, default_value_t = 30)]
        diversity_pct: u32,

        /// Per-solve wall-clock cap for the CP/MILP solver, in milliseconds.
        #[arg(long, default_value_t = 300)]
        time_cap_ms: u64,

        /// Enable solver-internal debug/trace logging.
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Validate that a menu file parses and splits into at least one
    /// usable item, without running any solver.
    Validate {
        /// Path to the bulk menu JSON file.
        #[arg(long)]
        menu: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverArg {
    Milp,
    Greedy,
    BruteForce,
}

impl From<SolverArg> for SolverKind {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::Milp => SolverKind::Milp,
            SolverArg::Greedy => SolverKind::Greedy,
            SolverArg::BruteForce => SolverKind::BruteForce,
        }
    }
}
