pub mod item;
pub mod menu_input;
pub mod request;
pub mod solution;

pub use item::{Diet, Item, Rating};
pub use menu_input::MenuItemInput;
pub use request::BundleRequest;
pub use solution::{BundleComparison, BundleLineItem, Solution, SolutionMetrics, SolverKind};
