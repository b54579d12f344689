//! In-memory catalog snapshot.
//!
//! The catalog is loaded once per session from the backend and searched
//! locally on every keystroke. Successful backend writes to an item's count,
//! notes or favorite flag are mirrored into the snapshot; items added or
//! deleted elsewhere only show up after [`Catalog::replace`].

use crate::search::{search_page, token_search, SearchLimit, SearchPage};
use crate::types::{CatalogItem, CatalogStats};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// An ordered, name-keyed snapshot of catalog items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot, keeping the first occurrence of duplicate names.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut catalog = Catalog::new();
        catalog.replace(items);
        catalog
    }

    /// Replace the whole snapshot (full reload).
    pub fn replace(&mut self, items: impl IntoIterator<Item = CatalogItem>) {
        self.items.clear();
        self.by_name.clear();

        let mut duplicates = 0usize;
        for item in items {
            if self.by_name.contains_key(&item.name) {
                duplicates += 1;
                debug!(name = %item.name, "Skipping duplicate catalog entry");
                continue;
            }
            self.by_name.insert(item.name.clone(), self.items.len());
            self.items.push(item);
        }

        if duplicates > 0 {
            warn!(duplicates, "Catalog contained duplicate item names");
        }
        info!(items = self.items.len(), "Catalog loaded");
    }

    /// Number of items in the snapshot
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no items are loaded
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in load order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Look up an item by its exact name
    pub fn get(&self, name: &str) -> Option<&CatalogItem> {
        self.by_name.get(name).map(|&idx| &self.items[idx])
    }

    /// Owned items (count > 0) in load order
    pub fn inventory(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|i| i.is_owned())
    }

    /// Sorted distinct categories
    pub fn categories(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|i| i.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Statistics computed from the snapshot
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_items(&self.items)
    }

    /// Run a token search and truncate to `limit`.
    ///
    /// Returns `None` when the query is too short to search.
    pub fn search(&self, query: &str, limit: SearchLimit) -> Option<SearchPage<'_>> {
        search_page(query, &self.items, limit)
    }

    /// Names of items matching `query`, for filtering an existing view.
    ///
    /// `None` means the query is too short and everything stays visible.
    pub fn filter_names(&self, query: &str) -> Option<HashSet<&str>> {
        let query = crate::search::normalize_query(query)?;
        Some(
            token_search(query, &self.items)
                .into_iter()
                .map(|item| item.name.as_str())
                .collect(),
        )
    }

    /// Mirror a successful count update. Returns the previous count.
    pub fn apply_count(&mut self, name: &str, count: u32) -> Option<u32> {
        let item = self.get_mut(name)?;
        let previous = item.count;
        item.count = count;
        if count == 0 {
            item.added_to_inventory_at = None;
        } else if previous == 0 {
            item.added_to_inventory_at = Some(chrono::Utc::now());
        }
        Some(previous)
    }

    /// Mirror a successful notes update.
    pub fn apply_notes(&mut self, name: &str, notes: Option<String>) -> bool {
        match self.get_mut(name) {
            Some(item) => {
                item.notes = notes;
                true
            }
            None => false,
        }
    }

    /// Mirror a successful favorite toggle.
    pub fn apply_favorite(&mut self, name: &str, is_favorite: bool) -> bool {
        match self.get_mut(name) {
            Some(item) => {
                item.is_favorite = is_favorite;
                true
            }
            None => false,
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut CatalogItem> {
        let idx = *self.by_name.get(name)?;
        self.items.get_mut(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_items(vec![
            CatalogItem::new("ADP Arms Black", 1).with_category("Arms"),
            CatalogItem::new("ADP Helmet Black", 0).with_category("Helmet"),
            CatalogItem::new("Overlord Helmet Heavy Orange", 2).with_category("Helmet"),
            CatalogItem::new("ADP Legs Black", 0).with_category("Legs"),
        ])
    }

    #[test]
    fn test_duplicates_keep_first() {
        let catalog = Catalog::from_items(vec![
            CatalogItem::new("ADP Arms Black", 1),
            CatalogItem::new("ADP Arms Black", 7),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("ADP Arms Black").unwrap().count, 1);
    }

    #[test]
    fn test_inventory_and_categories() {
        let catalog = sample();
        let owned: Vec<_> = catalog.inventory().map(|i| i.name.as_str()).collect();
        assert_eq!(owned, vec!["ADP Arms Black", "Overlord Helmet Heavy Orange"]);
        assert_eq!(catalog.categories(), vec!["Arms", "Helmet", "Legs"]);
    }

    #[test]
    fn test_search_reports_total() {
        let catalog = sample();
        let page = catalog.search("adp black", SearchLimit::new(1).unwrap()).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].name, "ADP Arms Black");
        assert!(catalog.search("a", SearchLimit::DEFAULT).is_none());
    }

    #[test]
    fn test_filter_names() {
        let catalog = sample();
        let names = catalog.filter_names("helmet").unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("ADP Helmet Black"));
        assert!(catalog.filter_names(" ").is_none());
    }

    #[test]
    fn test_apply_count_tracks_inventory_date() {
        let mut catalog = sample();
        assert_eq!(catalog.apply_count("ADP Legs Black", 3), Some(0));
        let legs = catalog.get("ADP Legs Black").unwrap();
        assert_eq!(legs.count, 3);
        assert!(legs.added_to_inventory_at.is_some());

        assert_eq!(catalog.apply_count("ADP Legs Black", 0), Some(3));
        assert!(catalog
            .get("ADP Legs Black")
            .unwrap()
            .added_to_inventory_at
            .is_none());

        assert_eq!(catalog.apply_count("Missing", 1), None);
    }

    #[test]
    fn test_apply_notes_and_favorite() {
        let mut catalog = sample();
        assert!(catalog.apply_notes("ADP Arms Black", Some("left shoulder".to_string())));
        assert!(catalog.apply_favorite("ADP Arms Black", true));
        let arms = catalog.get("ADP Arms Black").unwrap();
        assert_eq!(arms.notes.as_deref(), Some("left shoulder"));
        assert!(arms.is_favorite);
        assert!(!catalog.apply_favorite("Missing", true));
    }
}
