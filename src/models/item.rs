use serde::{Deserialize, Serialize};

/// Dietary tag, tested in this fixed order wherever ordering matters
/// (greedy diet pass, brute-force ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Diet {
    Vegan,
    Vegetarian,
    Meat,
}

impl Diet {
    /// Fixed processing order used by the greedy solver's dietary pass.
    pub const ORDER: [Diet; 3] = [Diet::Vegan, Diet::Vegetarian, Diet::Meat];
}

/// Raw vote counts backing the derived rating predicates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub upvote_count: u32,
    #[serde(default)]
    pub downvote_count: u32,
    #[serde(default)]
    pub review_count: u32,
}

impl Rating {
    fn total_votes(&self) -> u32 {
        self.upvote_count + self.downvote_count
    }

    /// Rating percentage in [0, 1]; 0 if no votes were cast.
    pub fn percentage(&self) -> f64 {
        let total = self.total_votes();
        if total == 0 {
            0.0
        } else {
            self.upvote_count as f64 / total as f64
        }
    }

    /// good_rating ≡ rating ≥ 0.85
    pub fn good_rating(&self) -> bool {
        self.percentage() >= 0.85
    }

    /// highly_rated ≡ good_rating ∧ (upvotes+downvotes) ≥ 50
    pub fn highly_rated(&self) -> bool {
        self.good_rating() && self.total_votes() >= 50
    }

    /// popular ≡ good_rating ∧ (upvotes+downvotes) ≥ 100
    pub fn popular(&self) -> bool {
        self.good_rating() && self.total_votes() >= 100
    }
}

/// A single per-serving menu item: the unit the solvers operate on.
///
/// Produced by splitting a bulk [`MenuItemInput`](crate::models::MenuItemInput)
/// into `serves` identical-priced servings (see `adapters::serving_split`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Price in cents for one serving. Always > 0.
    pub price_cents: u32,
    pub diet: Diet,
    /// Available servings in stock.
    pub available_qty: u32,
    /// Kitchen prep-load units consumed per serving. Always > 0.
    pub load: u32,
    pub rating: Rating,
}

impl Item {
    pub fn good_rating(&self) -> bool {
        self.rating.good_rating()
    }

    pub fn highly_rated(&self) -> bool {
        self.rating.highly_rated()
    }

    pub fn popular(&self) -> bool {
        self.rating.popular()
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl std::hash::Hash for Item {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(up: u32, down: u32) -> Rating {
        Rating {
            upvote_count: up,
            downvote_count: down,
            review_count: up + down,
        }
    }

    #[test]
    fn predicates_agree_with_exact_thresholds() {
        // S-6 fixtures.
        let r = rating(900, 100);
        assert!(r.good_rating() && r.highly_rated() && r.popular());

        let r = rating(45, 5);
        assert!(r.good_rating() && r.highly_rated() && !r.popular());

        let r = rating(600, 400);
        assert!(!r.good_rating() && !r.highly_rated() && !r.popular());

        let r = rating(0, 0);
        assert_eq!(r.percentage(), 0.0);
        assert!(!r.good_rating() && !r.highly_rated() && !r.popular());
    }

    #[test]
    fn highly_rated_requires_fifty_votes_not_just_good_rating() {
        // good_rating but under the 50-vote floor.
        let r = rating(40, 2);
        assert!(r.good_rating());
        assert!(!r.highly_rated());
        assert!(!r.popular());
    }

    #[test]
    fn popular_requires_hundred_votes_even_if_highly_rated() {
        let r = rating(60, 5);
        assert!(r.highly_rated());
        assert!(!r.popular());
    }

    #[test]
    fn items_are_equal_by_id_only() {
        let mut a = sample_item("a");
        let b = sample_item("a");
        a.price_cents = 999;
        assert_eq!(a, b);
    }

    fn sample_item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            name: "Tofu".to_string(),
            price_cents: 500,
            diet: Diet::Vegan,
            available_qty: 10,
            load: 1,
            rating: Rating::default(),
        }
    }
}
