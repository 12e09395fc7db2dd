use crate::core::constants::{GroupParams, MIN_DIFFERENT_ITEMS};
use crate::core::constraints::Quantities;
use crate::models::{BundleRequest, Item};

/// Intermediate tallies shared by every scoring component, computed once
/// per bundle.
struct BundleFacts<'a> {
    selected: Vec<(&'a Item, u32)>,
    total_servings: u32,
    total_cost: u64,
    total_load: u64,
}

fn gather_facts<'a>(items: &'a [Item], qty: &Quantities) -> BundleFacts<'a> {
    let selected: Vec<(&Item, u32)> = items
        .iter()
        .filter_map(|item| qty.get(&item.id).filter(|&&q| q > 0).map(|&q| (item, q)))
        .collect();

    let total_servings: u32 = selected.iter().map(|(_, q)| *q).sum();
    let total_cost: u64 = selected
        .iter()
        .map(|(item, q)| item.price_cents as u64 * *q as u64)
        .sum();
    let total_load: u64 = selected.iter().map(|(item, q)| item.load as u64 * *q as u64).sum();

    BundleFacts {
        selected,
        total_servings,
        total_cost,
        total_load,
    }
}

/// Cost efficiency: 25 · (totalCost / B), 0 if over budget or zero cost.
fn cost_efficiency_score(total_cost: u64, budget: u64) -> f64 {
    if budget == 0 || total_cost == 0 || total_cost > budget {
        return 0.0;
    }
    (total_cost as f64 / budget as f64) * 25.0
}

/// Popular items: 20 · (popular-count / distinct).
fn popular_items_score(selected: &[(&Item, u32)]) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }
    let popular = selected.iter().filter(|(item, _)| item.popular()).count();
    (popular as f64 / selected.len() as f64) * 20.0
}

/// Highly-rated items: 20 · (highly-rated-count / distinct).
fn highly_rated_score(selected: &[(&Item, u32)]) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }
    let highly_rated = selected.iter().filter(|(item, _)| item.highly_rated()).count();
    (highly_rated as f64 / selected.len() as f64) * 20.0
}

/// Kitchen efficiency: 15 · (kitchenLoadPercent / 100), zero outside (0,100].
fn kitchen_efficiency_score(kitchen_load_percent: f64) -> f64 {
    if kitchen_load_percent <= 0.0 || kitchen_load_percent > 100.0 {
        return 0.0;
    }
    (kitchen_load_percent / 100.0) * 15.0
}

/// Distribution fairness: 10·(1 − qtyRange/max_pct) when distinct ≥
/// MIN_DIFFERENT_ITEMS and qtyRange ≤ max_pct, else 0.
///
/// Per §9's documented quirk, the small-group `max_pct` is used here even
/// for large groups — the scoring formula was never updated to take the
/// group-size-adaptive parameters brute-force's validator uses. Preserved
/// as-is.
fn distribution_fairness_score(selected: &[(&Item, u32)], total_servings: u32) -> f64 {
    if selected.len() < MIN_DIFFERENT_ITEMS as usize || total_servings == 0 {
        return 0.0;
    }
    let small_group_max_pct = GroupParams::for_people(1).max_pct;

    let fractions: Vec<f64> = selected
        .iter()
        .map(|(_, q)| *q as f64 / total_servings as f64)
        .collect();
    let max_frac = fractions.iter().cloned().fold(f64::MIN, f64::max);
    let min_frac = fractions.iter().cloned().fold(f64::MAX, f64::min);
    let qty_range = max_frac - min_frac;

    if qty_range > small_group_max_pct {
        return 0.0;
    }
    10.0 * (1.0 - qty_range / small_group_max_pct)
}

/// Diversity: 10·min(1, distinct / max(MIN_DIFFERENT_ITEMS, people/5)) when
/// distinct ≥ MIN_DIFFERENT_ITEMS, else 0.
fn diversity_score(distinct: usize, people: u32) -> f64 {
    if distinct < MIN_DIFFERENT_ITEMS as usize {
        return 0.0;
    }
    let denom = (MIN_DIFFERENT_ITEMS as f64).max(people as f64 / 5.0);
    10.0 * (distinct as f64 / denom).min(1.0)
}

/// Full 0-100 composite score used by the CP/MILP and brute-force solvers.
pub fn composite_score(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    qty: &Quantities,
) -> u32 {
    let facts = gather_facts(items, qty);
    let budget = request.budget_cents();
    let kitchen_load_percent = kitchen_load_percent(facts.total_load, kitchen_cap);

    let total = cost_efficiency_score(facts.total_cost, budget)
        + popular_items_score(&facts.selected)
        + highly_rated_score(&facts.selected)
        + kitchen_efficiency_score(kitchen_load_percent)
        + distribution_fairness_score(&facts.selected, facts.total_servings)
        + diversity_score(facts.selected.len(), request.people);

    total.round().clamp(0.0, 100.0) as u32
}

/// Efficiency bonus added to the greedy solver's 60-point base (§4.2):
/// budget 0-6, popular 0-5, highly-rated 0-5, kitchen 0-4.
pub fn greedy_score(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    qty: &Quantities,
) -> u32 {
    let facts = gather_facts(items, qty);
    let budget = request.budget_cents();
    let kitchen_load_percent = kitchen_load_percent(facts.total_load, kitchen_cap);

    let budget_bonus = cost_efficiency_score(facts.total_cost, budget) / 25.0 * 6.0;
    let popular_bonus = popular_items_score(&facts.selected) / 20.0 * 5.0;
    let highly_rated_bonus = highly_rated_score(&facts.selected) / 20.0 * 5.0;
    let kitchen_bonus = kitchen_efficiency_score(kitchen_load_percent) / 15.0 * 4.0;

    let total = 60.0 + budget_bonus + popular_bonus + highly_rated_bonus + kitchen_bonus;
    total.round().clamp(60.0, 80.0) as u32
}

/// kitchenLoadPercent = total load · 100 / kitchenCap.
pub fn kitchen_load_percent(total_load: u64, kitchen_cap: u32) -> f64 {
    if kitchen_cap == 0 {
        return 0.0;
    }
    (total_load as f64 * 100.0) / kitchen_cap as f64
}

/// popularItemsPercent = popular-item-count · 100 / distinct-item-count.
pub fn popular_items_percent(items: &[Item], qty: &Quantities) -> f64 {
    let facts = gather_facts(items, qty);
    if facts.selected.is_empty() {
        return 0.0;
    }
    let popular = facts.selected.iter().filter(|(item, _)| item.popular()).count();
    (popular as f64 * 100.0) / facts.selected.len() as f64
}

/// Build the owned line-item/metrics pair the orchestrator returns,
/// independent of which scoring formula (composite vs. greedy-base) was
/// used to produce `optimality_score`.
pub fn build_metrics(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    qty: &Quantities,
    optimality_score: u32,
    finding_time_ms: u64,
) -> (Vec<(String, String, u32, u32)>, crate::models::SolutionMetrics) {
    let facts = gather_facts(items, qty);
    let total_cost = facts.total_cost;
    let average_cost_per_person = if request.people == 0 {
        0
    } else {
        total_cost / request.people as u64
    };

    let lines: Vec<(String, String, u32, u32)> = facts
        .selected
        .iter()
        .map(|(item, q)| (item.id.clone(), item.name.clone(), *q, item.price_cents))
        .collect();

    let metrics = crate::models::SolutionMetrics {
        optimality_score,
        total_cost,
        average_cost_per_person,
        popular_items_percent: popular_items_percent(items, qty),
        kitchen_load_percent: kitchen_load_percent(facts.total_load, kitchen_cap),
        finding_time_ms,
    };

    (lines, metrics)
}
