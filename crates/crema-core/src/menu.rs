//! # Menu Helpers
//!
//! Read-side helpers over the staff-owned menu.

use std::collections::BTreeSet;

use crate::types::MenuItem;

/// Distinct categories, sorted alphabetically.
pub fn categories(items: &[MenuItem]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Items a customer can currently order.
pub fn available_items(items: &[MenuItem]) -> Vec<&MenuItem> {
    items.iter().filter(|i| i.available).collect()
}

/// Items in one category. `None` means "All".
pub fn items_in_category<'a>(items: &'a [MenuItem], category: Option<&str>) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|i| category.map_or(true, |c| i.category == c))
        .collect()
}

/// Sorts the menu the way it is displayed: by category, then name.
pub fn sort_for_display(items: &mut [MenuItem]) {
    items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, category: &str, available: bool) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price_cents: 400,
            category: category.to_string(),
            image: String::new(),
            calories: None,
            available,
        }
    }

    fn menu() -> Vec<MenuItem> {
        vec![
            item("tea-1", "Matcha Green Tea Latte", "Tea", true),
            item("hc-1", "Espresso Silk", "Hot Coffee", true),
            item("bak-1", "Almond Croissant", "Bakery", false),
            item("hc-3", "Cappuccino Royale", "Hot Coffee", true),
        ]
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        assert_eq!(categories(&menu()), vec!["Bakery", "Hot Coffee", "Tea"]);
        assert!(categories(&[]).is_empty());
    }

    #[test]
    fn test_available_items() {
        let menu = menu();
        let available = available_items(&menu);
        assert_eq!(available.len(), 3);
        assert!(available.iter().all(|i| i.id != "bak-1"));
    }

    #[test]
    fn test_items_in_category() {
        let menu = menu();
        assert_eq!(items_in_category(&menu, Some("Hot Coffee")).len(), 2);
        assert_eq!(items_in_category(&menu, None).len(), 4);
        assert!(items_in_category(&menu, Some("Smoothies")).is_empty());
    }

    #[test]
    fn test_sort_for_display() {
        let mut menu = menu();
        sort_for_display(&mut menu);
        let ids: Vec<_> = menu.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["bak-1", "hc-3", "hc-1", "tea-1"]);
    }
}
