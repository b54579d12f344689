//! Core data types for GearCrate.
//!
//! These types mirror the records exchanged with the item backend. They are
//! serializable so the same structs travel over the HTTP transport and into
//! the local data file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single catalog entry, the unit of search.
///
/// `name` is the catalog key: no two items share a name within a session.
/// Search only looks at `name`; everything else is carried through results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Display name, unique within the catalog
    pub name: String,

    /// Classification such as "Helmet", "Arms" or "Torso"
    #[serde(default, rename = "item_type", alias = "category")]
    pub category: Option<String>,

    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Quantity currently owned
    #[serde(default)]
    pub count: u32,

    /// Whether the user marked this item as a favorite
    #[serde(default)]
    pub is_favorite: bool,

    /// Remote image location, if known
    #[serde(default)]
    pub image_url: Option<String>,

    /// When the item last entered the inventory (count went from 0 to >0)
    #[serde(default)]
    pub added_to_inventory_at: Option<DateTime<Utc>>,
}

impl CatalogItem {
    /// Create an item with only a name and a count.
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        CatalogItem {
            name: name.into(),
            category: None,
            notes: None,
            count,
            is_favorite: false,
            image_url: None,
            added_to_inventory_at: None,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Mark as favorite
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Set the inventory timestamp
    pub fn with_added_at(mut self, added: DateTime<Utc>) -> Self {
        self.added_to_inventory_at = Some(added);
        self
    }

    /// True if the item is part of the inventory (owned at least once)
    pub fn is_owned(&self) -> bool {
        self.count > 0
    }
}

/// Parameters for adding an item.
///
/// Adding an item that already exists increments its count by
/// `initial_count` instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(rename = "item_type")]
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub initial_count: u32,
}

impl NewItem {
    /// A new item with a single owned copy
    pub fn new(name: impl Into<String>) -> Self {
        NewItem {
            name: name.into(),
            category: None,
            image_url: None,
            notes: None,
            initial_count: 1,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the starting count (0 registers the item without owning it)
    pub fn with_count(mut self, count: u32) -> Self {
        self.initial_count = count;
        self
    }
}

/// What `add_item` did with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddAction {
    Added,
    Updated,
}

/// Outcome of `add_item`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOutcome {
    pub action: AddAction,
    pub count: u32,
}

/// Aggregate numbers shown on the statistics screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Every item known to the database, owned or not
    pub total_items_in_db: u64,

    /// Distinct items with a positive count
    pub inventory_unique_items: u64,

    /// Sum of all counts
    pub total_item_count: u64,

    /// Owned quantity per category, plus a `Favorites` bucket
    #[serde(default)]
    pub category_counts: BTreeMap<String, u64>,

    /// Image cache size, only reported by remote backends
    #[serde(default)]
    pub cache_size_mb: Option<f64>,
}

/// Pseudo-category used for favorite items in category listings
pub const FAVORITES_CATEGORY: &str = "Favorites";

impl CatalogStats {
    /// Compute statistics from a catalog snapshot.
    pub fn from_items(items: &[CatalogItem]) -> Self {
        let mut stats = CatalogStats {
            total_items_in_db: items.len() as u64,
            ..Default::default()
        };

        let mut favorites = 0u64;
        for item in items.iter().filter(|i| i.is_owned()) {
            stats.inventory_unique_items += 1;
            stats.total_item_count += u64::from(item.count);
            if let Some(category) = item.category.as_deref() {
                *stats.category_counts.entry(category.to_string()).or_default() +=
                    u64::from(item.count);
            }
            if item.is_favorite {
                favorites += u64::from(item.count);
            }
        }

        if favorites > 0 {
            stats
                .category_counts
                .insert(FAVORITES_CATEGORY.to_string(), favorites);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_deserializes_backend_shape() {
        let json = r#"{"name": "ADP Arms Black", "item_type": "Arms", "count": 2, "notes": null}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.name, "ADP Arms Black");
        assert_eq!(item.category.as_deref(), Some("Arms"));
        assert_eq!(item.count, 2);
        assert!(!item.is_favorite);
    }

    #[test]
    fn test_item_accepts_category_alias() {
        let json = r#"{"name": "Overlord Helmet", "category": "Helmet"}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category.as_deref(), Some("Helmet"));
        assert_eq!(item.count, 0);
        assert!(!item.is_owned());
    }

    #[test]
    fn test_stats_from_items() {
        let items = vec![
            CatalogItem::new("ADP Arms Black", 2).with_category("Arms"),
            CatalogItem::new("ADP Legs Black", 1)
                .with_category("Legs")
                .with_favorite(true),
            CatalogItem::new("ADP Helmet Black", 0).with_category("Helmet"),
        ];

        let stats = CatalogStats::from_items(&items);
        assert_eq!(stats.total_items_in_db, 3);
        assert_eq!(stats.inventory_unique_items, 2);
        assert_eq!(stats.total_item_count, 3);
        assert_eq!(stats.category_counts.get("Arms"), Some(&2));
        assert_eq!(stats.category_counts.get("Helmet"), None);
        assert_eq!(stats.category_counts.get(FAVORITES_CATEGORY), Some(&1));
    }
}
