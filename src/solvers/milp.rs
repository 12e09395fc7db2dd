use std::collections::HashMap;
use std::time::Instant;

use good_lp::solvers::microlp::microlp;
use good_lp::{variable, Expression, ProblemVariables, Solution as LpSolution, SolverModel, Variable};
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::core::constants::{GroupParams, MAX_ITEMS_PER_TYPE, MILP_BIG, MIN_DIFFERENT_ITEMS};
use crate::core::constraints::{is_valid_bundle, Quantities};
use crate::models::{BundleRequest, Diet, Item};

/// One prior solve's selection pattern plus its total servings, used to
/// build the next solve's diversity cut (§4.3: the threshold is a
/// percentage of the prior solution's own T, not of the item count).
struct PriorSolution {
    selected: Vec<bool>,
    total: u32,
}

/// Decision variables for a single solve, indexed in lockstep with the
/// `items` slice passed to [`solve`].
struct ModelVars {
    x: Vec<Variable>,
    y: Vec<Variable>,
    z: HashMap<(usize, usize), Variable>,
    /// Free binary, only ever worth setting to 1 when at most one item is
    /// selected; relaxes the portion upper bound for that case (§4.1 rule 7
    /// only applies when `distinct >= 2`, mirrored from `constraints.rs` and
    /// `greedy.rs`).
    is_single: Variable,
}

/// Run the CP/MILP solver, returning up to `request.top_n` distinct
/// solutions in the order they were found. Each solve after the first adds
/// a diversity cut over the previous one (§4.3); infeasibility or the
/// per-solve wall-clock cap simply truncates the returned list rather than
/// producing an error.
pub fn solve(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    config: &EngineConfig,
) -> Vec<Quantities> {
    let mut found = Vec::new();
    let mut priors: Vec<PriorSolution> = Vec::new();

    for round in 0..request.top_n {
        let started = Instant::now();
        let deadline_ms = config.max_time_per_solution_ms();

        if started.elapsed().as_millis() as u64 > deadline_ms {
            warn!(round, "milp solver deadline exceeded before solve started");
            break;
        }

        let Some((qty, prior)) = solve_once(items, request, kitchen_cap, config, &priors) else {
            debug!(round, "milp solver found no further feasible solution");
            break;
        };

        trace!(round, elapsed_ms = started.elapsed().as_millis() as u64, "milp solve completed");

        if !is_valid_bundle(items, request, kitchen_cap, &qty) {
            // The linearized model is an approximation of §4.1; a solution
            // that fails the exact validator is discarded rather than returned.
            warn!(round, "milp solution failed the exact validator, discarding");
            break;
        }

        found.push(qty);
        priors.push(prior);
    }

    found
}

fn solve_once(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    config: &EngineConfig,
    prior_solutions: &[PriorSolution],
) -> Option<(Quantities, PriorSolution)> {
    if items.is_empty() {
        return None;
    }

    let mut vars = ProblemVariables::new();
    // x[i] bounded by stock (§4.3); MAX_ITEMS_PER_TYPE is a brute-force
    // search-space cap only and doesn't apply to the MILP model.
    let bounds: Vec<u32> = items.iter().map(|item| item.available_qty).collect();
    let big_m: f64 = bounds.iter().map(|&b| b as f64).sum::<f64>().max(1.0);

    let model_vars = build_variables(&mut vars, &bounds);
    let objective = build_objective(items, &model_vars);

    let mut model = vars.minimise(objective).using(microlp);

    model = add_linking_constraints(model, &model_vars, &bounds);
    model = add_demand_constraints(model, items, request, &model_vars);
    model = add_budget_and_kitchen_constraints(model, items, request, kitchen_cap, &model_vars);
    model = add_variety_constraint(model, request, &model_vars);
    model = add_portion_constraints(model, request.people, &model_vars, big_m);
    model = add_pairwise_constraints(model, request.people, &model_vars, big_m);
    model = add_diversity_cuts(model, config, &model_vars, prior_solutions);

    let solution = model.solve().ok()?;

    let mut qty = Quantities::new();
    let mut selected = Vec::with_capacity(items.len());
    let mut total = 0u32;
    for (idx, item) in items.iter().enumerate() {
        let raw = solution.value(model_vars.x[idx]);
        let rounded = raw.round().max(0.0) as u32;
        if rounded > 0 {
            qty.insert(item.id.clone(), rounded);
        }
        total += rounded;
        selected.push(solution.value(model_vars.y[idx]) > 0.5);
    }

    Some((qty, PriorSolution { selected, total }))
}

fn build_variables(vars: &mut ProblemVariables, bounds: &[u32]) -> ModelVars {
    let x: Vec<Variable> = bounds
        .iter()
        .map(|&b| vars.add(variable().integer().min(0.0).max(b as f64)))
        .collect();
    let y: Vec<Variable> = (0..bounds.len()).map(|_| vars.add(variable().binary())).collect();

    let mut z = HashMap::new();
    for i in 0..bounds.len() {
        for j in (i + 1)..bounds.len() {
            z.insert((i, j), vars.add(variable().binary()));
        }
    }

    let is_single = vars.add(variable().binary());

    ModelVars { x, y, z, is_single }
}

/// minimize Σ (price·BIG − bonus)·x (§4.3). `BIG` dwarfs the bonus term so
/// the solver drives toward the cheapest feasible plan; the bonus only
/// breaks ties among equally-priced choices, nudging toward popular and
/// well-rated items. This is the solver's own objective, distinct from
/// (and not to be confused with) the scoring formula's documented "cost
/// efficiency rewards higher cost" quirk (§9), which only affects the
/// post-hoc optimality score, not what the MILP model optimizes for.
fn build_objective(items: &[Item], vars: &ModelVars) -> Expression {
    let mut objective = Expression::default();
    for (idx, item) in items.iter().enumerate() {
        let popularity_bonus = if item.popular() { 1.0 } else { 0.0 };
        let rating_bonus = if item.highly_rated() {
            2.0
        } else if item.good_rating() {
            1.0
        } else {
            0.0
        };
        let diversity_bonus = 1.0;
        let bonus = popularity_bonus + rating_bonus + diversity_bonus;
        let coeff = item.price_cents as f64 * MILP_BIG as f64 - bonus;
        objective += vars.x[idx] * coeff;
    }
    objective
}

fn add_linking_constraints<M: SolverModel>(mut model: M, vars: &ModelVars, bounds: &[u32]) -> M {
    for idx in 0..vars.x.len() {
        let m = bounds[idx] as f64;
        model = model.with(Expression::from(vars.x[idx]).leq(vars.y[idx] * m));
        model = model.with(Expression::from(vars.x[idx]).geq(vars.y[idx]));
    }
    model
}

fn add_demand_constraints<M: SolverModel>(
    mut model: M,
    items: &[Item],
    request: &BundleRequest,
    vars: &ModelVars,
) -> M {
    let total: Expression = vars.x.iter().copied().sum();
    model = model.with(total.geq(request.people as f64));

    for diet in Diet::ORDER {
        let required = request.required_for(diet);
        if required == 0 {
            continue;
        }
        let diet_total: Expression = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.diet == diet)
            .map(|(idx, _)| Expression::from(vars.x[idx]))
            .sum();
        model = model.with(diet_total.geq(required as f64));
    }

    model
}

fn add_budget_and_kitchen_constraints<M: SolverModel>(
    mut model: M,
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    vars: &ModelVars,
) -> M {
    let cost: Expression = items
        .iter()
        .enumerate()
        .map(|(idx, item)| vars.x[idx] * item.price_cents as f64)
        .sum();
    model = model.with(cost.leq(request.budget_cents() as f64));

    let load: Expression = items
        .iter()
        .enumerate()
        .map(|(idx, item)| vars.x[idx] * item.load as f64)
        .sum();
    model = model.with(load.leq(kitchen_cap as f64));

    model
}

fn add_variety_constraint<M: SolverModel>(mut model: M, request: &BundleRequest, vars: &ModelVars) -> M {
    let min_variety = MIN_DIFFERENT_ITEMS.min(request.people) as f64;
    let selected: Expression = vars.y.iter().copied().sum();
    model = model.with(selected.geq(min_variety));
    model
}

fn add_portion_constraints<M: SolverModel>(
    mut model: M,
    people: u32,
    vars: &ModelVars,
    big_m: f64,
) -> M {
    let params = GroupParams::for_people(people);
    let total: Expression = vars.x.iter().copied().sum();
    let n_items = vars.x.len() as f64;

    // is_single can only be 1 when at most one item is selected:
    // Σy + (n-1)*is_single <= n. At is_single=0 this is vacuous (Σy <= n
    // always); at is_single=1 it forces Σy <= 1. Nothing rewards is_single
    // in the objective, so the solver only spends it when the max-share
    // bound below would otherwise make a genuine one-item bundle infeasible.
    let selected_count: Expression = vars.y.iter().copied().sum();
    model = model.with((selected_count + vars.is_single * (n_items - 1.0).max(0.0)).leq(n_items));

    for idx in 0..vars.x.len() {
        // x_i <= max_pct * total, relaxed away (by big_m) when is_single = 1
        // (i.e. when distinct < 2; §4.1 rule 7 doesn't apply to a lone item).
        model = model.with(
            (Expression::from(vars.x[idx]) - total.clone() * params.max_pct - vars.is_single * big_m)
                .leq(0.0),
        );
        // x_i >= min_pct * total, relaxed away (by big_m) when y_i = 0 so
        // an unselected item isn't forced to meet the minimum share.
        model = model.with(
            (Expression::from(vars.x[idx]) - total.clone() * params.min_pct + big_m
                - vars.y[idx] * big_m)
                .geq(0.0),
        );
    }

    model
}

fn add_pairwise_constraints<M: SolverModel>(
    mut model: M,
    people: u32,
    vars: &ModelVars,
    big_m: f64,
) -> M {
    let params = GroupParams::for_people(people);
    let bound = params.cp_pairwise_bound(people) as f64;

    for (&(i, j), &z_ij) in &vars.z {
        // z_ij linearizes y_i ∧ y_j.
        model = model.with(Expression::from(z_ij).leq(Expression::from(vars.y[i])));
        model = model.with(Expression::from(z_ij).leq(Expression::from(vars.y[j])));
        model = model.with(
            (Expression::from(z_ij) - vars.y[i] - vars.y[j]).geq(-1.0),
        );

        // |x_i - x_j| <= bound + big_m*(1 - z_ij): tight when both selected
        // (z_ij = 1), relaxed away otherwise.
        model = model.with(
            (Expression::from(vars.x[i]) - vars.x[j] + z_ij * big_m).leq(bound + big_m),
        );
        model = model.with(
            (Expression::from(vars.x[j]) - vars.x[i] + z_ij * big_m).leq(bound + big_m),
        );
    }

    model
}

fn add_diversity_cuts<M: SolverModel>(
    mut model: M,
    config: &EngineConfig,
    vars: &ModelVars,
    prior_solutions: &[PriorSolution],
) -> M {
    if vars.y.is_empty() {
        return model;
    }

    for prior in prior_solutions {
        // Threshold is a percentage of the PRIOR solution's own total
        // servings (§4.3), not of the item count, with a floor of 1.
        let threshold = (((config.min_solution_diversity_percent() as f64 / 100.0) * prior.total as f64).ceil()).max(1.0);

        let mut diff: Expression = Expression::default();
        for (idx, &was_selected) in prior.selected.iter().enumerate() {
            if was_selected {
                diff += 1.0 - Expression::from(vars.y[idx]);
            } else {
                diff += Expression::from(vars.y[idx]);
            }
        }
        model = model.with(diff.geq(threshold));
    }

    model
}
