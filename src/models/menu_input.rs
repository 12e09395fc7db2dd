use serde::{Deserialize, Serialize};

use crate::models::item::{Diet, Rating};

/// A bulk menu entry as received from the (out-of-scope) menu-fetching
/// service, before serving-unit splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemInput {
    pub id: String,
    pub name: String,
    /// Bulk price in cents for the whole unit.
    pub price_cents: u32,
    /// Servings contained in one bulk unit.
    pub serves: i64,
    pub diet: Diet,
    /// Bulk stock on hand.
    pub stock: u32,
    /// Kitchen prep-load units per serving.
    pub load: u32,
    #[serde(default)]
    pub rating: Option<Rating>,
}
