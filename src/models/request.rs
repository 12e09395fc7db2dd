use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::item::Diet;

/// Caller-supplied planning request. Immutable for the duration of a call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleRequest {
    /// Headcount. Always ≥ 1.
    pub people: u32,
    pub max_price_per_person_cents: u32,
    /// Required servings per diet; diets absent from the map require 0.
    #[serde(default)]
    pub required_by_diet: HashMap<Diet, u32>,
    /// K: number of bundles to return.
    pub top_n: u32,
}

impl BundleRequest {
    /// maxPricePerPersonCents × people.
    pub fn budget_cents(&self) -> u64 {
        self.max_price_per_person_cents as u64 * self.people as u64
    }

    pub fn required_for(&self, diet: Diet) -> u32 {
        self.required_by_diet.get(&diet).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_price_times_people() {
        let req = BundleRequest {
            people: 4,
            max_price_per_person_cents: 1500,
            required_by_diet: HashMap::new(),
            top_n: 1,
        };
        assert_eq!(req.budget_cents(), 6000);
    }

    #[test]
    fn missing_diet_requirement_defaults_to_zero() {
        let req = BundleRequest {
            people: 4,
            max_price_per_person_cents: 1500,
            required_by_diet: HashMap::new(),
            top_n: 1,
        };
        assert_eq!(req.required_for(Diet::Vegan), 0);
    }
}
