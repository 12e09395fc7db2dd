use std::collections::HashMap;

use crate::core::constants::{GroupParams, MIN_DIFFERENT_ITEMS};
use crate::models::{BundleRequest, Diet, Item};

/// A candidate quantity assignment: item id → quantity. Items absent from
/// the map (or mapped to 0) are not selected.
pub type Quantities = HashMap<String, u32>;

/// Pure, solver-agnostic validator for §4.1. CP, greedy, and brute-force
/// all defer to this so scoring and leaf-acceptance never drift from what
/// the MILP model encodes.
pub fn is_valid_bundle(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    qty: &Quantities,
) -> bool {
    violation(items, request, kitchen_cap, qty).is_none()
}

/// Same check as [`is_valid_bundle`] but returns a human-readable reason
/// for the first violated rule, or `None` if the bundle is valid.
pub fn violation(
    items: &[Item],
    request: &BundleRequest,
    kitchen_cap: u32,
    qty: &Quantities,
) -> Option<String> {
    let by_id: HashMap<&str, &Item> = items.iter().map(|i| (i.id.as_str(), i)).collect();

    // 1. Stock.
    for (id, &q) in qty {
        let Some(item) = by_id.get(id.as_str()) else {
            return Some(format!("unknown item id {id}"));
        };
        if q > item.available_qty {
            return Some(format!("{id} exceeds stock: {q} > {}", item.available_qty));
        }
    }

    let total: u32 = qty.values().copied().sum();

    // 2. Demand.
    if total < request.people {
        return Some(format!("demand unmet: {total} < {}", request.people));
    }

    // 3. Per-diet demand.
    for diet in Diet::ORDER {
        let required = request.required_for(diet);
        if required == 0 {
            continue;
        }
        let served: u32 = qty
            .iter()
            .filter_map(|(id, &q)| by_id.get(id.as_str()).map(|item| (item, q)))
            .filter(|(item, _)| item.diet == diet)
            .map(|(_, q)| q)
            .sum();
        if served < required {
            return Some(format!("{diet:?} demand unmet: {served} < {required}"));
        }
    }

    // 4. Budget.
    let total_cost: u64 = qty
        .iter()
        .filter_map(|(id, &q)| by_id.get(id.as_str()).map(|item| item.price_cents as u64 * q as u64))
        .sum();
    let budget = request.budget_cents();
    if total_cost > budget {
        return Some(format!("over budget: {total_cost} > {budget}"));
    }

    // 5. Kitchen.
    let total_load: u64 = qty
        .iter()
        .filter_map(|(id, &q)| by_id.get(id.as_str()).map(|item| item.load as u64 * q as u64))
        .sum();
    if total_load > kitchen_cap as u64 {
        return Some(format!("over kitchen cap: {total_load} > {kitchen_cap}"));
    }

    // 6. Minimum variety.
    let distinct = qty.values().filter(|&&q| q > 0).count() as u32;
    let min_variety = MIN_DIFFERENT_ITEMS.min(request.people);
    if distinct < min_variety {
        return Some(format!(
            "insufficient variety: {distinct} < {min_variety}"
        ));
    }

    let params = GroupParams::for_people(request.people);

    // 7. Portion bounds. Only meaningful once at least two distinct items
    // are in play — a single selected item is trivially 100% of the
    // bundle and has nothing to be bounded against.
    if total > 0 && distinct >= 2 {
        for (id, &q) in qty {
            if q == 0 {
                continue;
            }
            let frac = q as f64 / total as f64;
            if frac < params.min_pct - f64::EPSILON {
                return Some(format!("{id} below min portion: {frac} < {}", params.min_pct));
            }
            if frac > params.max_pct + f64::EPSILON {
                return Some(format!("{id} above max portion: {frac} > {}", params.max_pct));
            }
        }
    }

    // 8. Pairwise fair distribution.
    let selected: Vec<(&str, u32)> = qty
        .iter()
        .filter(|(_, &q)| q > 0)
        .map(|(id, &q)| (id.as_str(), q))
        .collect();
    let bound = params.pairwise_bound(request.people);
    for i in 0..selected.len() {
        for j in (i + 1)..selected.len() {
            let diff = (selected[i].1 as i64 - selected[j].1 as i64).unsigned_abs() as f64;
            if diff > bound + f64::EPSILON {
                return Some(format!(
                    "pairwise spread {} vs {} exceeds bound {diff} > {bound}",
                    selected[i].0, selected[j].0
                ));
            }
        }
    }

    None
}
