use std::time::Instant;

use tracing::info;

use crate::adapters::split_menu;
use crate::config::EngineConfig;
use crate::core::constraints::Quantities;
use crate::core::scoring::{build_metrics, composite_score, greedy_score};
use crate::error::{BundleError, Result};
use crate::models::{BundleComparison, BundleLineItem, BundleRequest, MenuItemInput, Solution, SolverKind};
use crate::solvers::{brute_force, greedy, milp};

/// Run the requested solver over a bulk menu and return its ranked
/// bundles. This is the single entry point every adapter (CLI, future
/// service layer) goes through — it owns menu splitting, solver dispatch,
/// scoring, and final ranking so none of that logic lives twice.
pub fn build(
    menu: &[MenuItemInput],
    request: &BundleRequest,
    kitchen_cap: u32,
    solver_kind: SolverKind,
    config: &EngineConfig,
    seed: u64,
) -> Result<BundleComparison> {
    let items = split_menu(menu);
    if items.is_empty() {
        return Err(BundleError::InvalidInput(
            "menu has no usable items after serving-unit splitting".to_string(),
        ));
    }

    let started = Instant::now();

    let raw_solutions: Vec<Quantities> = match solver_kind {
        SolverKind::Milp => milp::solve(&items, request, kitchen_cap, config),
        SolverKind::Greedy => greedy::solve(&items, request, kitchen_cap, seed),
        SolverKind::BruteForce => brute_force::solve(&items, request, kitchen_cap, config),
    };

    let finding_time_ms = started.elapsed().as_millis() as u64;

    let mut solutions: Vec<Solution> = raw_solutions
        .into_iter()
        .map(|qty| {
            let optimality_score = match solver_kind {
                SolverKind::Greedy => greedy_score(&items, request, kitchen_cap, &qty),
                SolverKind::Milp | SolverKind::BruteForce => composite_score(&items, request, kitchen_cap, &qty),
            };

            let (lines, metrics) = build_metrics(&items, request, kitchen_cap, &qty, optimality_score, finding_time_ms);

            Solution {
                items: lines
                    .into_iter()
                    .map(|(id, name, qty, price_cents)| BundleLineItem { id, name, qty, price_cents })
                    .collect(),
                metrics,
            }
        })
        .collect();

    solutions.sort_by(|a, b| b.metrics.optimality_score.cmp(&a.metrics.optimality_score));

    info!(
        solver = %solver_kind,
        found = solutions.len(),
        finding_time_ms,
        "bundle search complete"
    );

    Ok(BundleComparison {
        solutions,
        solver_type: solver_kind,
        finding_time_ms,
    })
}
