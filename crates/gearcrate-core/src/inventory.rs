//! Inventory view selection: filtering and sorting of owned items.

use crate::search::{normalize_query, token_search};
use crate::types::{CatalogItem, FAVORITES_CATEGORY};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Column used to order the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Count,
    /// When the item entered the inventory
    Date,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Count => write!(f, "count"),
            SortKey::Date => write!(f, "date"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "count" => Ok(SortKey::Count),
            "date" => Ok(SortKey::Date),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Parameters of an inventory listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryQuery {
    pub sort_by: SortKey,
    pub sort_order: SortOrder,

    /// Restrict to one category; `Favorites` selects favorite items
    #[serde(default)]
    pub category: Option<String>,

    /// Only favorite items
    #[serde(default)]
    pub favorites_only: bool,

    /// Token-search filter applied to item names
    #[serde(default)]
    pub query: Option<String>,
}

impl InventoryQuery {
    /// Set the sort column and direction
    pub fn sorted(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Restrict to a category
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to items whose names match a token query
    pub fn matching(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    fn wants_favorites(&self) -> bool {
        self.favorites_only || self.category.as_deref() == Some(FAVORITES_CATEGORY)
    }

    fn real_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != FAVORITES_CATEGORY)
    }
}

/// Select and order the owned items described by `query`.
pub fn select(items: &[CatalogItem], query: &InventoryQuery) -> Vec<CatalogItem> {
    let matched: Option<HashSet<&str>> = query
        .query
        .as_deref()
        .and_then(normalize_query)
        .map(|q| token_search(q, items).into_iter().map(|i| i.name.as_str()).collect());

    let mut selected: Vec<CatalogItem> = items
        .iter()
        .filter(|item| item.is_owned())
        .filter(|item| !query.wants_favorites() || item.is_favorite)
        .filter(|item| {
            query
                .real_category()
                .map_or(true, |c| item.category.as_deref() == Some(c))
        })
        .filter(|item| {
            matched
                .as_ref()
                .map_or(true, |names| names.contains(item.name.as_str()))
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    selected
}

fn compare(a: &CatalogItem, b: &CatalogItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Count => a.count.cmp(&b.count),
        // Missing dates sort like the empty value, i.e. first
        SortKey::Date => a.added_to_inventory_at.cmp(&b.added_to_inventory_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn items() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("overlord Helmet", 2)
                .with_category("Helmet")
                .with_added_at(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            CatalogItem::new("ADP Arms Black", 5)
                .with_category("Arms")
                .with_favorite(true)
                .with_added_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            CatalogItem::new("ADP Helmet Black", 0).with_category("Helmet"),
            CatalogItem::new("Citadel Core Base", 1).with_category("Torso"),
        ]
    }

    fn names(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_default_is_owned_by_name() {
        let selected = select(&items(), &InventoryQuery::default());
        assert_eq!(
            names(&selected),
            vec!["ADP Arms Black", "Citadel Core Base", "overlord Helmet"]
        );
    }

    #[test]
    fn test_sort_by_count_desc() {
        let query = InventoryQuery::default().sorted(SortKey::Count, SortOrder::Desc);
        let selected = select(&items(), &query);
        assert_eq!(
            names(&selected),
            vec!["ADP Arms Black", "overlord Helmet", "Citadel Core Base"]
        );
    }

    #[test]
    fn test_sort_by_date_puts_undated_first() {
        let query = InventoryQuery::default().sorted(SortKey::Date, SortOrder::Asc);
        let selected = select(&items(), &query);
        assert_eq!(
            names(&selected),
            vec!["Citadel Core Base", "ADP Arms Black", "overlord Helmet"]
        );
    }

    #[test]
    fn test_category_and_favorites() {
        let selected = select(&items(), &InventoryQuery::default().in_category("Helmet"));
        assert_eq!(names(&selected), vec!["overlord Helmet"]);

        let selected = select(&items(), &InventoryQuery::default().in_category("Favorites"));
        assert_eq!(names(&selected), vec!["ADP Arms Black"]);
    }

    #[test]
    fn test_query_filter() {
        let selected = select(&items(), &InventoryQuery::default().matching("adp"));
        assert_eq!(names(&selected), vec!["ADP Arms Black"]);

        // Too short to search: no filtering
        let selected = select(&items(), &InventoryQuery::default().matching("a"));
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn test_parse_sort_options() {
        assert_eq!("Count".parse::<SortKey>().unwrap(), SortKey::Count);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("size".parse::<SortKey>().is_err());
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }
}
