use crate::models::{Item, MenuItemInput};

/// Split one bulk [`MenuItemInput`] into its `serves` per-serving [`Item`]s
/// (§6): distinct ids `"{id}#{1..serves}"`, sharing one price/stock/diet/load
/// across all of them. Returns nothing when the input contributes nothing
/// usable: non-positive `serves`, or a per-serving stock of zero.
pub fn split(input: &MenuItemInput) -> Vec<Item> {
    if input.serves <= 0 {
        return Vec::new();
    }
    let serves = input.serves as u32;

    let available_qty = input.stock / serves;
    if available_qty == 0 {
        return Vec::new();
    }

    let price_cents = ceil_div(input.price_cents as u64, serves as u64) as u32;
    let rating = input.rating.unwrap_or_default();

    (1..=serves)
        .map(|k| Item {
            id: format!("{}#{k}", input.id),
            name: input.name.clone(),
            price_cents,
            diet: input.diet,
            available_qty,
            load: input.load,
            rating,
        })
        .collect()
}

/// Split a whole menu, dropping entries that contribute nothing.
pub fn split_menu(inputs: &[MenuItemInput]) -> Vec<Item> {
    inputs.iter().flat_map(split).collect()
}

fn ceil_div(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Diet, Rating};

    fn input(price: u32, serves: i64, stock: u32, load: u32) -> MenuItemInput {
        MenuItemInput {
            id: "x".to_string(),
            name: "X".to_string(),
            price_cents: price,
            serves,
            diet: Diet::Meat,
            stock,
            load,
            rating: None,
        }
    }

    #[test]
    fn expands_into_distinct_suffixed_ids() {
        let items = split(&input(1000, 3, 6, 1));
        assert_eq!(items.len(), 3);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["x#1", "x#2", "x#3"]);
    }

    #[test]
    fn price_rounds_up_when_not_evenly_divisible() {
        let items = split(&input(1000, 3, 6, 1));
        for item in &items {
            assert_eq!(item.price_cents, 334);
        }
    }

    #[test]
    fn price_is_exact_when_evenly_divisible() {
        let items = split(&input(900, 3, 6, 1));
        for item in &items {
            assert_eq!(item.price_cents, 300);
        }
    }

    #[test]
    fn per_serving_stock_is_floor_divided() {
        // stock=5, serves=3 -> floor(5/3) = 1 per expanded item.
        let items = split(&input(1000, 3, 5, 1));
        assert_eq!(items.len(), 3);
        for item in &items {
            assert_eq!(item.available_qty, 1);
        }
    }

    #[test]
    fn non_positive_serves_contributes_nothing() {
        assert!(split(&input(1000, 0, 5, 1)).is_empty());
        assert!(split(&input(1000, -1, 5, 1)).is_empty());
    }

    #[test]
    fn stock_smaller_than_serves_contributes_nothing() {
        // floor(2/3) = 0 per-serving stock.
        assert!(split(&input(1000, 3, 2, 1)).is_empty());
    }

    #[test]
    fn missing_rating_defaults() {
        let items = split(&input(1000, 2, 6, 1));
        assert_eq!(items[0].rating.upvote_count, 0);
    }

    #[test]
    fn split_menu_drops_unusable_entries_and_flattens_expansions() {
        let menu = vec![input(1000, 2, 6, 1), input(1000, 0, 5, 1)];
        let items = split_menu(&menu);
        assert_eq!(items.len(), 2);
    }
}
