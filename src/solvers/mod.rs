pub mod brute_force;
pub mod greedy;
pub mod milp;
