use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::constants::{GroupParams, MAX_GREEDY_ITERATIONS};
use crate::core::constraints::{is_valid_bundle, Quantities};
use crate::core::scoring::greedy_score;
use crate::models::{BundleRequest, Diet, Item};

/// Internal failure mode for a single greedy construction attempt. Never
/// surfaces past [`solve`]: a diet pass that can't be satisfied just yields
/// fewer solutions, not an error the caller sees.
#[derive(Debug, Error)]
enum GreedyError {
    #[error("diet {0:?} could not be satisfied with the available menu")]
    DietUnsatisfied(Diet),

    #[error("constructed bundle failed the shared validator")]
    Infeasible,
}

/// A candidate bite considered at one step of construction.
struct Candidate {
    rating_tier: u8,
    popularity_tier: u8,
    price_cents: u32,
    jitter: f64,
}

fn rating_tier(item: &Item) -> u8 {
    if item.popular() {
        2
    } else if item.highly_rated() {
        1
    } else {
        0
    }
}

/// Run the randomized greedy constructor `request.top_n` times with
/// distinct seeds, returning every attempt that produced a valid bundle.
pub fn solve(items: &[Item], request: &BundleRequest, kitchen_cap: u32, seed: u64) -> Vec<Quantities> {
    let mut out = Vec::with_capacity(request.top_n as usize);

    for attempt in 0..request.top_n {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(attempt as u64));
        match construct_once(items, request, kitchen_cap, &mut rng) {
            Ok(qty) => out.push(qty),
            Err(e) => {
                // §4.4: stop on the first failure rather than trying more
                // seeds — the constraint budget that defeated this attempt
                // doesn't improve on the next one.
                debug!(attempt, error = %e, "greedy attempt failed");
                break;
            }
        }
    }

    out
}

fn construct_once(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    rng: &mut StdRng,
) -> Result<Quantities, GreedyError> {
    let mut qty: Quantities = Quantities::new();
    let mut remaining: Vec<u32> = items.iter().map(|i| i.available_qty).collect();

    // Diet-ordered fill pass: satisfy each diet's minimum demand first,
    // in the fixed VEGAN -> VEGETARIAN -> MEAT order.
    for diet in Diet::ORDER {
        let required = request.required_for(diet);
        if required == 0 {
            continue;
        }

        let mut served = 0u32;
        let mut iterations = 0usize;
        while served < required && iterations < MAX_GREEDY_ITERATIONS {
            iterations += 1;
            if !try_add_one_bite(items, &mut remaining, &mut qty, request, kitchen_cap, Some(diet), rng) {
                return Err(GreedyError::DietUnsatisfied(diet));
            }
            served += 1;
        }

        if served < required {
            return Err(GreedyError::DietUnsatisfied(diet));
        }
    }

    // General fill pass: keep adding bites, skipping over candidates that
    // would blow the budget, kitchen cap, or per-item portion cap, until
    // demand is met and the bundle validates, or no further candidate
    // fits. The portion cap (enforced on every bite, including the diet
    // pass above) is what drives the rotation across distinct items that
    // the minimum-variety rule needs — a single item can only climb to
    // its capped share of the running total before a different item
    // becomes the best-fitting candidate.
    for iterations in 0..MAX_GREEDY_ITERATIONS {
        let served: u32 = qty.values().copied().sum();
        if served >= request.people && is_valid_bundle(items, request, kitchen_cap, &qty) {
            break;
        }

        if !try_add_one_bite(items, &mut remaining, &mut qty, request, kitchen_cap, None, rng) {
            break;
        }
        trace!(iterations, "greedy general pass added a bite");
    }

    if !is_valid_bundle(items, request, kitchen_cap, &qty) {
        return Err(GreedyError::Infeasible);
    }

    Ok(qty)
}

/// Try each candidate in ranked order until one fits within the remaining
/// budget, kitchen capacity, and per-item portion cap; commit that bite
/// and return `true`, or return `false` if none of the candidates fit.
fn try_add_one_bite(
    items: &[Item],
    remaining: &mut [u32],
    qty: &mut Quantities,
    request: &BundleRequest,
    kitchen_cap: u32,
    diet_filter: Option<Diet>,
    rng: &mut StdRng,
) -> bool {
    let current_cost: u64 = qty
        .iter()
        .filter_map(|(id, &q)| items.iter().find(|i| &i.id == id).map(|i| i.price_cents as u64 * q as u64))
        .sum();
    let current_load: u64 = qty
        .iter()
        .filter_map(|(id, &q)| items.iter().find(|i| &i.id == id).map(|i| i.load as u64 * q as u64))
        .sum();
    let current_total: u32 = qty.values().copied().sum();
    let params = GroupParams::for_people(request.people);

    for idx in rank_candidates(items, remaining, diet_filter, rng) {
        let item = &items[idx];

        let next_cost = current_cost + item.price_cents as u64;
        let next_load = current_load + item.load as u64;
        if next_cost > request.budget_cents() || next_load > kitchen_cap as u64 {
            continue;
        }

        // Portion cap: once there's enough in the bundle for a share to
        // be meaningful, don't let this bite push the item past its
        // allowed fraction of the new total. This is what makes the diet
        // pass rotate across distinct items instead of piling the whole
        // diet quota onto the single best-ranked one.
        let new_total = current_total + 1;
        if new_total >= 2 {
            let new_item_qty = qty.get(&item.id).copied().unwrap_or(0) + 1;
            let frac = new_item_qty as f64 / new_total as f64;
            if frac > params.max_pct + f64::EPSILON {
                continue;
            }
        }

        bite(items, idx, qty, remaining);
        return true;
    }

    false
}

fn bite(items: &[Item], idx: usize, qty: &mut Quantities, remaining: &mut [u32]) {
    *qty.entry(items[idx].id.clone()).or_insert(0) += 1;
    remaining[idx] = remaining[idx].saturating_sub(1);
}

/// Multi-stage selection: diet filter, then composite sort key (rating
/// tier desc, popularity tier desc, price desc — preserving the "higher
/// cost is better, up to budget" quirk shared with the scoring formula),
/// with a small random jitter to break exact ties without destabilizing
/// the ordering. Returns every matching candidate, best first, so the
/// caller can fall through to the next one when the top choice doesn't
/// fit the remaining budget or kitchen capacity.
fn rank_candidates(
    items: &[Item],
    remaining: &[u32],
    diet_filter: Option<Diet>,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut candidates: Vec<(usize, Candidate)> = items
        .iter()
        .enumerate()
        .filter(|(idx, item)| {
            remaining[*idx] > 0 && diet_filter.map(|d| item.diet == d).unwrap_or(true)
        })
        .map(|(idx, item)| {
            (
                idx,
                Candidate {
                    rating_tier: rating_tier(item),
                    popularity_tier: if item.popular() { 1 } else { 0 },
                    price_cents: item.price_cents,
                    jitter: rng.gen_range(0.0..1.0),
                },
            )
        })
        .collect();

    candidates.sort_by(|(_, a), (_, b)| {
        b.rating_tier
            .cmp(&a.rating_tier)
            .then(b.popularity_tier.cmp(&a.popularity_tier))
            .then(b.price_cents.cmp(&a.price_cents))
            .then(b.jitter.partial_cmp(&a.jitter).unwrap_or(Ordering::Equal))
    });

    candidates.into_iter().map(|(idx, _)| idx).collect()
}

/// Score a constructed bundle using the greedy 60-base formula (§4.2).
pub fn score(items: &[Item], request: &BundleRequest, kitchen_cap: u32, qty: &Quantities) -> u32 {
    greedy_score(items, request, kitchen_cap, qty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use std::collections::HashMap;

    fn item(id: &str, diet: Diet, price: u32, stock: u32, load: u32) -> Item {
        Item {
            id: id.to_string(),
            name: id.to_string(),
            price_cents: price,
            diet,
            available_qty: stock,
            load,
            rating: Rating::default(),
        }
    }

    fn request(people: u32, max_price: u32, required: &[(Diet, u32)], top_n: u32) -> BundleRequest {
        BundleRequest {
            people,
            max_price_per_person_cents: max_price,
            required_by_diet: required.iter().copied().collect(),
            top_n,
        }
    }

    #[test]
    fn constructs_a_feasible_bundle_for_s1() {
        let items = vec![
            item("a", Diet::Meat, 1000, 100, 1),
            item("b", Diet::Meat, 1500, 100, 1),
            item("c", Diet::Meat, 1200, 100, 1),
        ];
        let req = request(3, 2000, &[(Diet::Meat, 3)], 1);

        let solutions = solve(&items, &req, 100, 42);
        assert_eq!(solutions.len(), 1);
        assert!(is_valid_bundle(&items, &req, 100, &solutions[0]));
    }

    #[test]
    fn fails_gracefully_when_diet_cannot_be_satisfied() {
        let items = vec![item("a", Diet::Vegan, 1000, 100, 1)];
        let req = request(3, 100000, &[(Diet::Meat, 3)], 2);

        let solutions = solve(&items, &req, 100, 1);
        assert!(solutions.is_empty());
    }

    #[test]
    fn different_seeds_can_yield_different_attempts() {
        let items = vec![
            item("a", Diet::Meat, 1000, 100, 1),
            item("b", Diet::Meat, 1000, 100, 1),
            item("c", Diet::Meat, 1000, 100, 1),
        ];
        let req = request(4, 5000, &[(Diet::Meat, 4)], 3);

        let solutions = solve(&items, &req, 100, 7);
        assert!(!solutions.is_empty());
        for qty in &solutions {
            assert!(is_valid_bundle(&items, &req, 100, qty));
        }
    }

    #[test]
    fn scoring_matches_greedy_band() {
        let items = vec![item("a", Diet::Meat, 1000, 100, 1)];
        let req = request(1, 2000, &[], 1);
        let mut qty = HashMap::new();
        qty.insert("a".to_string(), 1u32);

        let s = score(&items, &req, 10, &qty);
        assert!((60..=80).contains(&s));
    }
}
