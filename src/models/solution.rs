use serde::{Deserialize, Serialize};

/// Which solver produced a [`BundleComparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverKind {
    Milp,
    Greedy,
    BruteForce,
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolverKind::Milp => "MILP",
            SolverKind::Greedy => "GREEDY",
            SolverKind::BruteForce => "BRUTE_FORCE",
        };
        write!(f, "{s}")
    }
}

/// One item line in a returned bundle, as seen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleLineItem {
    pub id: String,
    pub name: String,
    pub qty: u32,
    pub price_cents: u32,
}

/// Computed quality metrics for a single solution, shared across solver
/// kinds except for the [`optimality_score`](SolutionMetrics::optimality_score)
/// scale (see §4.2: greedy uses a 60-base, CP/brute-force use the full
/// 0-100 composite).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolutionMetrics {
    pub optimality_score: u32,
    pub total_cost: u64,
    pub average_cost_per_person: u64,
    pub popular_items_percent: f64,
    pub kitchen_load_percent: f64,
    pub finding_time_ms: u64,
}

/// A concrete bundle: a multiset of items plus its computed metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub items: Vec<BundleLineItem>,
    pub metrics: SolutionMetrics,
}

impl Solution {
    /// Total servings T = Σ x[i].
    pub fn total_servings(&self) -> u32 {
        self.items.iter().map(|i| i.qty).sum()
    }

    /// Number of distinct selected items.
    pub fn distinct_items(&self) -> usize {
        self.items.len()
    }

    pub fn qty_of(&self, item_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.qty)
            .unwrap_or(0)
    }
}

/// The result of a single `orchestrator::build` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleComparison {
    /// Sorted by `metrics.optimality_score` descending.
    pub solutions: Vec<Solution>,
    pub solver_type: SolverKind,
    pub finding_time_ms: u64,
}
