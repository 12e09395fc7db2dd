//! Full-stack fixtures from the spec's S-1..S-6 scenarios, run through the
//! public `orchestrator::build` entry point exactly as the CLI adapter
//! would call it.

use std::collections::HashMap;

use bundle_planner_rs::core::{is_valid_bundle, violation};
use bundle_planner_rs::models::{Diet, MenuItemInput, Rating};
use bundle_planner_rs::orchestrator::build;
use bundle_planner_rs::{BundleRequest, EngineConfig, SolverKind};

fn menu_item(id: &str, price: u32, serves: i64, stock: u32, load: u32, diet: Diet) -> MenuItemInput {
    MenuItemInput {
        id: id.to_string(),
        name: id.to_string(),
        price_cents: price,
        serves,
        diet,
        stock,
        load,
        rating: None,
    }
}

fn rated_menu_item(
    id: &str,
    price: u32,
    serves: i64,
    stock: u32,
    load: u32,
    diet: Diet,
    up: u32,
    down: u32,
) -> MenuItemInput {
    let mut item = menu_item(id, price, serves, stock, load, diet);
    item.rating = Some(Rating {
        upvote_count: up,
        downvote_count: down,
        review_count: up + down,
    });
    item
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
fn s1_minimal_feasibility_holds_for_every_solver() {
    let menu = vec![
        menu_item("a", 1000, 1, 100, 1, Diet::Meat),
        menu_item("b", 1500, 1, 100, 1, Diet::Meat),
    ];
    let req = request(3, 2000, &[(Diet::Meat, 3)], 1);
    let cfg = EngineConfig::default();

    for solver in [SolverKind::Milp, SolverKind::Greedy, SolverKind::BruteForce] {
        let result = build(&menu, &req, 100, solver, &cfg, 7).unwrap();
        assert!(!result.solutions.is_empty(), "{solver} found nothing");
        for solution in &result.solutions {
            assert!(solution.total_servings() >= 3);
            assert!(solution.metrics.total_cost >= 3000);
            assert!(solution.metrics.total_cost <= 6000);
        }
    }
}

#[test]
fn s2_balanced_distribution_keeps_quantities_close() {
    let menu = vec![
        menu_item("a", 1000, 1, 100, 1, Diet::Meat),
        menu_item("b", 1000, 1, 100, 1, Diet::Meat),
        menu_item("c", 1000, 1, 100, 1, Diet::Meat),
    ];
    let req = request(4, 2000, &[(Diet::Meat, 4)], 1);
    let cfg = EngineConfig::default();

    let result = build(&menu, &req, 100, SolverKind::Milp, &cfg, 1).unwrap();
    assert!(!result.solutions.is_empty());

    let solution = &result.solutions[0];
    let quantities: Vec<u32> = solution.items.iter().map(|i| i.qty).collect();
    let max = *quantities.iter().max().unwrap();
    let min = *quantities.iter().min().unwrap();
    assert!((max - min) as f64 <= 0.15 * 4.0 + 1.0);
}

#[test]
fn s3_diet_mix_is_satisfied_within_kitchen_cap() {
    let menu = vec![
        menu_item("v", 1000, 1, 100, 2, Diet::Vegan),
        menu_item("t", 1200, 1, 100, 1, Diet::Vegetarian),
        menu_item("m", 1500, 1, 100, 3, Diet::Meat),
    ];
    let req = request(
        3,
        2000,
        &[(Diet::Vegan, 1), (Diet::Vegetarian, 1), (Diet::Meat, 1)],
        1,
    );
    let cfg = EngineConfig::default();

    let result = build(&menu, &req, 50, SolverKind::BruteForce, &cfg, 1).unwrap();
    assert!(!result.solutions.is_empty());

    let solution = &result.solutions[0];
    // serves=1 still suffixes the expanded id with "#1" (§6).
    assert!(solution.qty_of("v#1") >= 1);
    assert!(solution.qty_of("t#1") >= 1);
    assert!(solution.qty_of("m#1") >= 1);
    assert!(solution.metrics.kitchen_load_percent <= 100.0);
    assert!(solution.metrics.total_cost <= 6000);
}

#[test]
fn s4_multi_solution_diversity_respects_portion_and_spread_caps() {
    let menu = vec![
        menu_item("m1", 600, 1, 30, 1, Diet::Meat),
        menu_item("m2", 700, 1, 30, 1, Diet::Meat),
        menu_item("m3", 900, 1, 30, 1, Diet::Meat),
        menu_item("m4", 1200, 1, 30, 1, Diet::Meat),
        menu_item("v1", 800, 1, 30, 1, Diet::Vegetarian),
        menu_item("v2", 1000, 1, 30, 1, Diet::Vegetarian),
    ];
    let req = request(20, 1500, &[(Diet::Meat, 15), (Diet::Vegetarian, 5)], 3);
    let cfg = EngineConfig::default();

    let result = build(&menu, &req, 30, SolverKind::Milp, &cfg, 1).unwrap();
    assert!(!result.solutions.is_empty());

    let first = &result.solutions[0];
    assert!(first.distinct_items() >= 4);

    let total: u32 = first.items.iter().map(|i| i.qty).sum();
    for line in &first.items {
        assert!(line.qty as f64 / total as f64 <= 0.25 + f64::EPSILON);
    }
    let quantities: Vec<u32> = first.items.iter().map(|i| i.qty).collect();
    let max = *quantities.iter().max().unwrap();
    let min = *quantities.iter().min().unwrap();
    assert!((max - min) as f64 <= 0.15 * total as f64 + f64::EPSILON);
}

#[test]
fn s5_greedy_cost_is_within_twenty_percent_of_cp_cost() {
    let menu = vec![
        menu_item("a", 1000, 1, 100, 1, Diet::Meat),
        menu_item("b", 1100, 1, 100, 1, Diet::Meat),
        menu_item("c", 1200, 1, 100, 1, Diet::Meat),
    ];
    let req = request(3, 2000, &[(Diet::Meat, 3)], 1);
    let cfg = EngineConfig::default();

    let cp = build(&menu, &req, 100, SolverKind::Milp, &cfg, 1).unwrap();
    let greedy = build(&menu, &req, 100, SolverKind::Greedy, &cfg, 1).unwrap();
    assert!(!cp.solutions.is_empty());
    assert!(!greedy.solutions.is_empty());

    let cp_cost = cp.solutions[0].metrics.total_cost;
    let greedy_cost = greedy.solutions[0].metrics.total_cost;
    assert!(greedy_cost as f64 <= 1.2 * cp_cost as f64 + 100.0);
}

#[test]
fn s6_rating_predicates_match_the_spec_table() {
    let r = Rating { upvote_count: 900, downvote_count: 100, review_count: 1000 };
    assert!(r.good_rating() && r.highly_rated() && r.popular());

    let r = Rating { upvote_count: 45, downvote_count: 5, review_count: 50 };
    assert!(r.good_rating() && r.highly_rated() && !r.popular());

    let r = Rating { upvote_count: 600, downvote_count: 400, review_count: 1000 };
    assert!(!r.good_rating() && !r.highly_rated() && !r.popular());

    let r = Rating::default();
    assert_eq!(r.percentage(), 0.0);
    assert!(!r.good_rating() && !r.highly_rated() && !r.popular());
}

#[test]
fn every_returned_solution_passes_the_shared_validator() {
    let menu = vec![
        rated_menu_item("a", 1000, 1, 100, 1, Diet::Meat, 900, 100),
        rated_menu_item("b", 1500, 1, 100, 1, Diet::Meat, 10, 10),
        menu_item("c", 1200, 1, 100, 1, Diet::Meat),
    ];
    let req = request(3, 2000, &[(Diet::Meat, 3)], 2);
    let cfg = EngineConfig::default();

    for solver in [SolverKind::Milp, SolverKind::Greedy, SolverKind::BruteForce] {
        let result = build(&menu, &req, 100, solver, &cfg, 3).unwrap();
        for solution in &result.solutions {
            let qty: HashMap<String, u32> =
                solution.items.iter().map(|i| (i.id.clone(), i.qty)).collect();
            let items = bundle_planner_rs::adapters::split_menu(&menu);
            assert!(
                is_valid_bundle(&items, &req, 100, &qty),
                "{solver} produced an invalid bundle: {:?}",
                violation(&items, &req, 100, &qty)
            );
        }
    }
}

#[test]
fn solutions_are_sorted_by_score_descending_across_solvers() {
    let menu = vec![
        rated_menu_item("a", 1000, 1, 100, 1, Diet::Meat, 900, 100),
        menu_item("b", 1500, 1, 100, 1, Diet::Meat),
        menu_item("c", 1200, 1, 100, 1, Diet::Meat),
    ];
    let req = request(3, 2000, &[(Diet::Meat, 3)], 3);
    let cfg = EngineConfig::default();

    for solver in [SolverKind::Milp, SolverKind::Greedy, SolverKind::BruteForce] {
        let result = build(&menu, &req, 100, solver, &cfg, 11).unwrap();
        let scores: Vec<u32> = result.solutions.iter().map(|s| s.metrics.optimality_score).collect();
        let mut sorted = scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted, "{solver} solutions not sorted descending");
    }
}

#[test]
fn total_cost_never_falls_below_the_cheapest_item_times_people() {
    let menu = vec![
        menu_item("a", 1000, 1, 100, 1, Diet::Meat),
        menu_item("b", 1500, 1, 100, 1, Diet::Meat),
        menu_item("c", 1200, 1, 100, 1, Diet::Meat),
    ];
    let req = request(3, 2000, &[(Diet::Meat, 3)], 1);
    let cfg = EngineConfig::default();

    let cheapest = menu.iter().map(|m| m.price_cents).min().unwrap() as u64;
    let floor = cheapest * req.people as u64;

    for solver in [SolverKind::Milp, SolverKind::Greedy, SolverKind::BruteForce] {
        let result = build(&menu, &req, 100, solver, &cfg, 1).unwrap();
        for solution in &result.solutions {
            assert!(solution.metrics.total_cost >= floor);
        }
    }
}

#[test]
fn empty_menu_is_rejected_as_invalid_input() {
    let menu: Vec<MenuItemInput> = Vec::new();
    let req = request(1, 2000, &[], 1);
    let cfg = EngineConfig::default();

    let result = build(&menu, &req, 100, SolverKind::Milp, &cfg, 1);
    assert!(result.is_err());
}
