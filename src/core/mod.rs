pub mod constants;
pub mod constraints;
pub mod scoring;

pub use constants::{GroupParams, LARGE_GROUP_THRESHOLD, MAX_GREEDY_ITERATIONS, MAX_ITEMS_PER_TYPE, MILP_BIG, MIN_DIFFERENT_ITEMS};
pub use constraints::{is_valid_bundle, violation, Quantities};
pub use scoring::{build_metrics, composite_score, greedy_score, kitchen_load_percent, popular_items_percent};
