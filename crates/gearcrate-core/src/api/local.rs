//! In-process backend over a JSON data file.

use super::CatalogApi;
use crate::error::{GearCrateError, Result};
use crate::gear_sets::{GearSetCatalog, GearSetSummary, SetVariant};
use crate::i18n::Language;
use crate::inventory::{self, InventoryQuery};
use crate::persistence::JsonFile;
use crate::types::{
    AddAction, AddOutcome, CatalogItem, CatalogStats, NewItem, FAVORITES_CATEGORY,
};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Current data file format version
pub const DATA_VERSION: u32 = 1;

/// Data file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCatalog {
    version: u32,
    #[serde(default)]
    items: Vec<CatalogItem>,
    #[serde(default)]
    language: Option<Language>,
}

impl Default for StoredCatalog {
    fn default() -> Self {
        StoredCatalog {
            version: DATA_VERSION,
            items: Vec::new(),
            language: None,
        }
    }
}

impl StoredCatalog {
    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|i| i.name == name)
    }

    fn item_mut(&mut self, name: &str) -> Result<&mut CatalogItem> {
        let idx = self
            .position(name)
            .ok_or_else(|| GearCrateError::item_not_found(name))?;
        Ok(&mut self.items[idx])
    }

    fn sort(&mut self) {
        self.items
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}

/// Backend that keeps the item database in a local JSON file.
///
/// Every write is persisted before the call returns. A `None` path keeps
/// everything in memory.
pub struct LocalCatalogApi {
    file: Option<JsonFile>,
    data: RwLock<StoredCatalog>,
    sets: GearSetCatalog,
}

impl LocalCatalogApi {
    /// Open (or create on first write) the data file at `path`.
    pub fn open(path: &Path, sets: GearSetCatalog) -> Result<Self> {
        let file = JsonFile::new(path);
        let mut data: StoredCatalog = file.load_or_backup()?.unwrap_or_default();

        if data.version > DATA_VERSION {
            return Err(GearCrateError::DataFileInvalid {
                path: path.to_path_buf(),
                reason: format!(
                    "version {} is newer than supported version {}",
                    data.version, DATA_VERSION
                ),
            });
        }
        data.sort();

        info!(
            path = %path.display(),
            items = data.items.len(),
            sets = sets.len(),
            "Opened local item database"
        );

        Ok(LocalCatalogApi {
            file: Some(file),
            data: RwLock::new(data),
            sets,
        })
    }

    /// A backend that never touches the filesystem.
    pub fn in_memory(items: Vec<CatalogItem>, sets: GearSetCatalog) -> Self {
        let mut data = StoredCatalog {
            items,
            ..Default::default()
        };
        data.sort();
        LocalCatalogApi {
            file: None,
            data: RwLock::new(data),
            sets,
        }
    }

    /// Apply a mutation and persist the result.
    fn write<T>(&self, f: impl FnOnce(&mut StoredCatalog) -> Result<T>) -> Result<T> {
        let mut data = self.data.write();
        let out = f(&mut data)?;
        if let Some(ref file) = self.file {
            file.save(&*data)?;
        }
        Ok(out)
    }
}

impl CatalogApi for LocalCatalogApi {
    fn search_items_local(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let data = self.data.read();
        let needle = query.to_lowercase();
        Ok(data
            .items
            .iter()
            .filter(|i| needle.is_empty() || i.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn get_item(&self, name: &str) -> Result<Option<CatalogItem>> {
        let data = self.data.read();
        Ok(data.items.iter().find(|i| i.name == name).cloned())
    }

    fn add_item(&self, item: &NewItem) -> Result<AddOutcome> {
        let name = item.name.trim();
        if name.is_empty() {
            return Err(GearCrateError::EmptyItemName);
        }

        self.write(|data| {
            if let Some(idx) = data.position(name) {
                let existing = &mut data.items[idx];
                if item.initial_count > 0 {
                    if existing.count == 0 {
                        existing.added_to_inventory_at = Some(Utc::now());
                    }
                    existing.count = existing.count.saturating_add(item.initial_count);
                }
                if existing.category.is_none() && item.category.is_some() {
                    existing.category = item.category.clone();
                }
                debug!(name, count = existing.count, "Incremented existing item");
                return Ok(AddOutcome {
                    action: AddAction::Updated,
                    count: existing.count,
                });
            }

            let mut new_item = CatalogItem::new(name, item.initial_count);
            new_item.category = item.category.clone();
            new_item.notes = item.notes.clone();
            new_item.image_url = item.image_url.clone();
            if item.initial_count > 0 {
                new_item.added_to_inventory_at = Some(Utc::now());
            }
            data.items.push(new_item);
            data.sort();

            info!(name, count = item.initial_count, "Added item");
            Ok(AddOutcome {
                action: AddAction::Added,
                count: item.initial_count,
            })
        })
    }

    fn update_count(&self, name: &str, count: u32) -> Result<()> {
        self.write(|data| {
            let item = data.item_mut(name)?;
            if count == 0 {
                item.added_to_inventory_at = None;
            } else if item.count == 0 || item.added_to_inventory_at.is_none() {
                item.added_to_inventory_at = Some(Utc::now());
            }
            item.count = count;
            debug!(name, count, "Updated count");
            Ok(())
        })
    }

    fn update_notes(&self, name: &str, notes: &str) -> Result<()> {
        self.write(|data| {
            let item = data.item_mut(name)?;
            item.notes = if notes.is_empty() {
                None
            } else {
                Some(notes.to_string())
            };
            Ok(())
        })
    }

    fn toggle_favorite(&self, name: &str, is_favorite: bool) -> Result<()> {
        self.write(|data| {
            data.item_mut(name)?.is_favorite = is_favorite;
            Ok(())
        })
    }

    fn delete_item(&self, name: &str) -> Result<()> {
        self.write(|data| {
            let idx = data
                .position(name)
                .ok_or_else(|| GearCrateError::item_not_found(name))?;
            data.items.remove(idx);
            info!(name, "Deleted item");
            Ok(())
        })
    }

    fn clear_inventory(&self) -> Result<u64> {
        self.write(|data| {
            let mut affected = 0;
            for item in data.items.iter_mut() {
                if item.count > 0 {
                    affected += 1;
                }
                item.count = 0;
                item.added_to_inventory_at = None;
            }
            info!(affected, "Cleared inventory");
            Ok(affected)
        })
    }

    fn delete_all_items(&self) -> Result<u64> {
        self.write(|data| {
            let deleted = data.items.len() as u64;
            data.items.clear();
            info!(deleted, "Deleted all items");
            Ok(deleted)
        })
    }

    fn get_stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats::from_items(&self.data.read().items))
    }

    fn get_categories(&self) -> Result<Vec<String>> {
        let stats = self.get_stats()?;
        Ok(stats
            .category_counts
            .into_keys()
            .filter(|c| c != FAVORITES_CATEGORY)
            .collect())
    }

    fn inventory(&self, query: &InventoryQuery) -> Result<Vec<CatalogItem>> {
        Ok(inventory::select(&self.data.read().items, query))
    }

    fn get_all_gear_sets(&self) -> Result<Vec<GearSetSummary>> {
        Ok(self.sets.summaries(&self.data.read().items))
    }

    fn get_gear_set_details(&self, set_name: &str, variant: &str) -> Result<SetVariant> {
        self.sets.resolve(set_name, variant, &self.data.read().items)
    }

    fn get_gear_set_variants(&self, set_name: &str) -> Result<Vec<String>> {
        self.sets.variants(set_name, &self.data.read().items)
    }

    fn get_user_language(&self) -> Result<Option<Language>> {
        Ok(self.data.read().language)
    }

    fn set_user_language(&self, language: Language) -> Result<()> {
        self.write(|data| {
            data.language = Some(language);
            info!(language = %language, "User language saved");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> LocalCatalogApi {
        LocalCatalogApi::in_memory(
            vec![
                CatalogItem::new("ADP Legs Black", 0).with_category("Legs"),
                CatalogItem::new("ADP Arms Black", 1).with_category("Arms"),
            ],
            GearSetCatalog::default(),
        )
    }

    #[test]
    fn test_items_sorted_by_name() {
        let items = api().search_items_local("").unwrap();
        assert_eq!(items[0].name, "ADP Arms Black");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_add_existing_increments() {
        let api = api();
        let outcome = api
            .add_item(&NewItem::new("ADP Arms Black").with_count(2))
            .unwrap();
        assert_eq!(outcome.action, AddAction::Updated);
        assert_eq!(outcome.count, 3);

        let outcome = api.add_item(&NewItem::new("Overlord Helmet")).unwrap();
        assert_eq!(outcome.action, AddAction::Added);
        assert!(api.get_item("Overlord Helmet").unwrap().unwrap().added_to_inventory_at.is_some());

        assert!(matches!(
            api.add_item(&NewItem::new("   ")),
            Err(GearCrateError::EmptyItemName)
        ));
    }

    #[test]
    fn test_update_count_maintains_date() {
        let api = api();
        api.update_count("ADP Legs Black", 2).unwrap();
        assert!(api.get_item("ADP Legs Black").unwrap().unwrap().added_to_inventory_at.is_some());

        api.update_count("ADP Legs Black", 0).unwrap();
        assert!(api.get_item("ADP Legs Black").unwrap().unwrap().added_to_inventory_at.is_none());

        assert!(api.update_count("Missing", 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_clear_inventory_keeps_items() {
        let api = api();
        assert_eq!(api.clear_inventory().unwrap(), 1);
        assert_eq!(api.get_stats().unwrap().total_items_in_db, 2);
        assert_eq!(api.get_stats().unwrap().total_item_count, 0);
    }

    #[test]
    fn test_categories_exclude_favorites() {
        let api = api();
        api.toggle_favorite("ADP Arms Black", true).unwrap();
        assert_eq!(api.get_categories().unwrap(), vec!["Arms"]);
    }
}
