use std::time::Instant;

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::core::constants::MAX_ITEMS_PER_TYPE;
use crate::core::constraints::{is_valid_bundle, Quantities};
use crate::core::scoring::composite_score;
use crate::models::{BundleRequest, Diet, Item};

fn diet_idx(diet: Diet) -> usize {
    Diet::ORDER.iter().position(|&d| d == diet).expect("Diet::ORDER covers every variant")
}

/// Order items the way §4.5 wants them explored: items whose diet still has
/// outstanding demand first, then popular items, then by rating descending.
/// This is purely a search-order/pruning concern — the final assignment is
/// still keyed by item id, so reordering can't change which bundles are
/// found, only how quickly.
fn sorted_order(items: &[Item], request: &BundleRequest) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let item_a = &items[a];
        let item_b = &items[b];

        let required_tier = |item: &Item| if request.required_for(item.diet) > 0 { 0 } else { 1 };
        let popular_tier = |item: &Item| if item.popular() { 0 } else { 1 };

        required_tier(item_a)
            .cmp(&required_tier(item_b))
            .then(popular_tier(item_a).cmp(&popular_tier(item_b)))
            .then(
                item_b
                    .rating
                    .percentage()
                    .partial_cmp(&item_a.rating.percentage())
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    order
}

/// Suffix sums (indexed so `suffix[k]` covers `bounds[k..]`) used to prune a
/// branch as soon as what's left to explore can't possibly meet remaining
/// demand, overall or for any still-short diet (§4.5: "essential").
struct Suffixes {
    total: Vec<u32>,
    by_diet: Vec<[u32; 3]>,
}

fn build_suffixes(items: &[Item], bounds: &[u32]) -> Suffixes {
    let n = items.len();
    let mut total = vec![0u32; n + 1];
    let mut by_diet = vec![[0u32; 3]; n + 1];

    for k in (0..n).rev() {
        total[k] = total[k + 1] + bounds[k];
        by_diet[k] = by_diet[k + 1];
        by_diet[k][diet_idx(items[k].diet)] += bounds[k];
    }

    Suffixes { total, by_diet }
}

/// Recursive backtracking search over per-item quantities, pruning on
/// cost/load as soon as a partial assignment exceeds the budget or kitchen
/// cap, plus a remaining-capacity prune against total and per-diet demand,
/// and validating the full §4.1 rule set only at each leaf.
///
/// Returns up to `request.top_n` distinct valid bundles, ranked by the
/// composite score, highest first.
pub fn solve(items: &[Item], request: &BundleRequest, kitchen_cap: u32, config: &EngineConfig) -> Vec<Quantities> {
    let started = Instant::now();

    let order = sorted_order(items, request);
    let sorted_items: Vec<Item> = order.iter().map(|&i| items[i].clone()).collect();
    let bounds: Vec<u32> = sorted_items.iter().map(|i| i.available_qty.min(MAX_ITEMS_PER_TYPE)).collect();
    let suffixes = build_suffixes(&sorted_items, &bounds);

    let mut found: Vec<(u32, Quantities)> = Vec::new();
    let mut current = vec![0u32; sorted_items.len()];

    search(
        &sorted_items,
        request,
        kitchen_cap,
        &bounds,
        &suffixes,
        &mut current,
        0,
        0,
        0,
        0,
        [0u32; 3],
        started,
        config.max_time_per_solution_ms(),
        &mut found,
    );

    debug!(found = found.len(), elapsed_ms = started.elapsed().as_millis() as u64, "brute force search finished");

    found.sort_by(|a, b| b.0.cmp(&a.0));
    found.truncate(request.top_n as usize);
    found.into_iter().map(|(_, qty)| qty).collect()
}

#[allow(clippy::too_many_arguments)]
fn search(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    bounds: &[u32],
    suffixes: &Suffixes,
    current: &mut Vec<u32>,
    index: usize,
    running_cost: u64,
    running_load: u64,
    running_total: u32,
    committed_by_diet: [u32; 3],
    started: Instant,
    deadline_ms: u64,
    found: &mut Vec<(u32, Quantities)>,
) {
    if started.elapsed().as_millis() as u64 > deadline_ms {
        trace!("brute force deadline reached, unwinding");
        return;
    }

    let remaining_people = request.people.saturating_sub(running_total);
    if suffixes.total[index] < remaining_people {
        return;
    }
    for diet in Diet::ORDER {
        let required = request.required_for(diet);
        if required == 0 {
            continue;
        }
        let remaining_for_diet = required.saturating_sub(committed_by_diet[diet_idx(diet)]);
        if suffixes.by_diet[index][diet_idx(diet)] < remaining_for_diet {
            return;
        }
    }

    if index == items.len() {
        let qty: Quantities = items
            .iter()
            .zip(current.iter())
            .filter(|(_, &q)| q > 0)
            .map(|(item, &q)| (item.id.clone(), q))
            .collect();

        if is_valid_bundle(items, request, kitchen_cap, &qty) {
            let score = composite_score(items, request, kitchen_cap, &qty);
            found.push((score, qty));
        }
        return;
    }

    let item = &items[index];
    let max_q = bounds[index];
    let diet = diet_idx(item.diet);

    for q in 0..=max_q {
        let cost = running_cost + item.price_cents as u64 * q as u64;
        if cost > request.budget_cents() {
            break;
        }
        let load = running_load + item.load as u64 * q as u64;
        if load > kitchen_cap as u64 {
            break;
        }

        current[index] = q;
        let mut next_committed = committed_by_diet;
        next_committed[diet] += q;
        search(
            items,
            request,
            kitchen_cap,
            bounds,
            suffixes,
            current,
            index + 1,
            cost,
            load,
            running_total + q,
            next_committed,
            started,
            deadline_ms,
            found,
        );
    }
    current[index] = 0;
}
