//! Application state and its persistence.
//!
//! All UI preferences live in one [`AppState`] value owned by a
//! [`StateManager`]. Views never mutate the state directly; they send a
//! [`Message`] and act on the returned [`Effect`]. Where the state is stored
//! is decided by the injected [`PreferenceStore`].

use crate::error::Result;
use crate::gear_sets::{favorite_key, CompletionFilter};
use crate::i18n::Language;
use crate::inventory::{InventoryQuery, SortKey, SortOrder};
use crate::persistence::JsonFile;
use crate::search::SearchLimit;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Set shown first in the gear sets view
pub const DEFAULT_SELECTED_SET: &str = "ADP";

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Inventory,
    Search,
    GearSets,
    Stats,
}

impl View {
    /// Views in tab order
    pub const ALL: [View; 4] = [View::Inventory, View::Search, View::GearSets, View::Stats];

    /// Translation key of the view title
    pub fn title_key(&self) -> &'static str {
        match self {
            View::Inventory => "inventory",
            View::Search => "search",
            View::GearSets => "gearSets",
            View::Stats => "stats",
        }
    }

    /// The view after this one, wrapping around
    pub fn next(self) -> View {
        let idx = View::ALL.iter().position(|v| *v == self).unwrap_or(0);
        View::ALL[(idx + 1) % View::ALL.len()]
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Inventory => write!(f, "inventory"),
            View::Search => write!(f, "search"),
            View::GearSets => write!(f, "gear-sets"),
            View::Stats => write!(f, "stats"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inventory" => Ok(View::Inventory),
            "search" => Ok(View::Search),
            "gear-sets" | "gearsets" | "sets" => Ok(View::GearSets),
            "stats" => Ok(View::Stats),
            _ => Err(format!("Unknown view: {}", s)),
        }
    }
}

/// Persisted UI state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub view: View,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    /// Inventory category filter; `None` shows all categories
    pub category_filter: Option<String>,
    pub search_limit: SearchLimit,
    /// Favorite set variants as `"{set}|||{variant}"` keys
    pub favorite_sets: Vec<String>,
    pub gear_sets_filter: CompletionFilter,
    pub selected_set: String,
    pub language: Option<Language>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            view: View::default(),
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            category_filter: None,
            search_limit: SearchLimit::default(),
            favorite_sets: Vec::new(),
            gear_sets_filter: CompletionFilter::default(),
            selected_set: DEFAULT_SELECTED_SET.to_string(),
            language: None,
        }
    }
}

impl AppState {
    /// Inventory query for the current sort and category settings
    pub fn inventory_query(&self) -> InventoryQuery {
        let query = InventoryQuery::default().sorted(self.sort_by, self.sort_order);
        match self.category_filter {
            Some(ref category) => query.in_category(category.clone()),
            None => query,
        }
    }

    /// Check if a set variant is a favorite.
    pub fn is_favorite_set(&self, set_name: &str, variant: &str) -> bool {
        self.favorite_sets.contains(&favorite_key(set_name, variant))
    }
}

/// State changes requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SwitchView(View),
    SetSort(SortKey),
    ToggleSortOrder,
    SetCategory(Option<String>),
    SetSearchLimit(usize),
    ResetSearchLimit,
    ToggleFavoriteSet { set_name: String, variant: String },
    SetGearSetsFilter(CompletionFilter),
    SelectSet(String),
    SetLanguage(Language),
}

/// What the caller has to do after a message was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Rerender(View),
    ReloadInventory,
    /// Show the translated notice with this key
    Notify(&'static str),
}

/// Storage for [`AppState`]
pub trait PreferenceStore: Send {
    /// Stored state, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<AppState>>;

    /// Replace the stored state
    fn save(&self, state: &AppState) -> Result<()>;
}

/// Preferences in a JSON file.
pub struct JsonFileStore {
    file: JsonFile,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            file: JsonFile::new(path),
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Result<Option<AppState>> {
        self.file.load_or_backup()
    }

    fn save(&self, state: &AppState) -> Result<()> {
        self.file.save(state)
    }
}

/// Preferences kept in memory only.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<AppState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved state
    pub fn saved(&self) -> Option<AppState> {
        self.saved.lock().clone()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Option<AppState>> {
        Ok(self.saved.lock().clone())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        *self.saved.lock() = Some(state.clone());
        Ok(())
    }
}

/// Owns the application state and applies messages to it.
pub struct StateManager {
    state: AppState,
    store: Box<dyn PreferenceStore>,
}

impl StateManager {
    /// Load the stored state; unreadable preferences fall back to defaults.
    pub fn new(store: Box<dyn PreferenceStore>) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => AppState::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load preferences, using defaults");
                AppState::default()
            }
        };
        debug!(view = %state.view, limit = %state.search_limit, "State loaded");
        StateManager { state, store }
    }

    /// Current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply a message and persist the new state.
    ///
    /// An invalid message leaves the state unchanged.
    pub fn dispatch(&mut self, message: Message) -> Result<Effect> {
        debug!(?message, "Dispatching");
        let effect = self.apply(message)?;
        if effect != Effect::None {
            self.store.save(&self.state)?;
        }
        Ok(effect)
    }

    fn apply(&mut self, message: Message) -> Result<Effect> {
        let state = &mut self.state;
        let effect = match message {
            Message::SwitchView(view) => {
                if state.view == view {
                    return Ok(Effect::None);
                }
                state.view = view;
                Effect::Rerender(view)
            }
            Message::SetSort(key) => {
                state.sort_by = key;
                Effect::ReloadInventory
            }
            Message::ToggleSortOrder => {
                state.sort_order = state.sort_order.toggled();
                Effect::ReloadInventory
            }
            Message::SetCategory(category) => {
                state.category_filter = category.filter(|c| !c.is_empty());
                Effect::ReloadInventory
            }
            Message::SetSearchLimit(limit) => {
                let limit = SearchLimit::new(limit)?;
                state.search_limit = limit;
                info!(limit = %limit, "Search limit changed");
                Effect::Notify("searchLimitSet")
            }
            Message::ResetSearchLimit => {
                state.search_limit = SearchLimit::default();
                info!("Search limit reset");
                Effect::Notify("searchLimitReset")
            }
            Message::ToggleFavoriteSet { set_name, variant } => {
                let key = favorite_key(&set_name, &variant);
                match state.favorite_sets.iter().position(|k| *k == key) {
                    Some(idx) => {
                        state.favorite_sets.remove(idx);
                    }
                    None => state.favorite_sets.push(key),
                }
                Effect::Rerender(View::GearSets)
            }
            Message::SetGearSetsFilter(filter) => {
                state.gear_sets_filter = filter;
                Effect::Rerender(View::GearSets)
            }
            Message::SelectSet(set_name) => {
                state.selected_set = set_name;
                Effect::Rerender(View::GearSets)
            }
            Message::SetLanguage(language) => {
                state.language = Some(language);
                info!(language = %language, "Language changed");
                Effect::Rerender(state.view)
            }
        };
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GearCrateError;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct SharedStore(Arc<MemoryStore>);

    impl PreferenceStore for SharedStore {
        fn load(&self) -> Result<Option<AppState>> {
            self.0.load()
        }

        fn save(&self, state: &AppState) -> Result<()> {
            self.0.save(state)
        }
    }

    #[test]
    fn test_defaults() {
        let state = AppState::default();
        assert_eq!(state.view, View::Inventory);
        assert_eq!(state.sort_by, SortKey::Name);
        assert_eq!(state.sort_order, SortOrder::Asc);
        assert_eq!(state.search_limit.get(), 25);
        assert_eq!(state.gear_sets_filter, CompletionFilter::All);
        assert_eq!(state.selected_set, "ADP");
        assert!(state.language.is_none());
    }

    #[test]
    fn test_dispatch_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut manager = StateManager::new(Box::new(SharedStore(store.clone())));

        let effect = manager.dispatch(Message::SetSearchLimit(50)).unwrap();
        assert_eq!(effect, Effect::Notify("searchLimitSet"));
        assert_eq!(store.saved().unwrap().search_limit.get(), 50);

        manager.dispatch(Message::ResetSearchLimit).unwrap();
        assert_eq!(store.saved().unwrap().search_limit, SearchLimit::DEFAULT);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut manager = StateManager::new(Box::new(SharedStore(store.clone())));
        manager.dispatch(Message::SetSearchLimit(10)).unwrap();

        let err = manager.dispatch(Message::SetSearchLimit(0)).unwrap_err();
        assert!(matches!(err, GearCrateError::InvalidPreference { .. }));
        assert_eq!(manager.state().search_limit.get(), 10);
        assert_eq!(store.saved().unwrap().search_limit.get(), 10);
    }

    #[test]
    fn test_toggle_favorite_set() {
        let mut manager = StateManager::new(Box::new(MemoryStore::new()));
        let toggle = || Message::ToggleFavoriteSet {
            set_name: "ADP".to_string(),
            variant: "Black".to_string(),
        };

        manager.dispatch(toggle()).unwrap();
        assert_eq!(manager.state().favorite_sets, vec!["ADP|||Black"]);
        assert!(manager.state().is_favorite_set("ADP", "Black"));

        manager.dispatch(toggle()).unwrap();
        assert!(manager.state().favorite_sets.is_empty());
    }

    #[test]
    fn test_sort_and_category_reload_inventory() {
        let mut manager = StateManager::new(Box::new(MemoryStore::new()));
        assert_eq!(
            manager.dispatch(Message::SetSort(SortKey::Count)).unwrap(),
            Effect::ReloadInventory
        );
        manager.dispatch(Message::ToggleSortOrder).unwrap();
        manager
            .dispatch(Message::SetCategory(Some("Helmet".to_string())))
            .unwrap();

        let query = manager.state().inventory_query();
        assert_eq!(query.sort_by, SortKey::Count);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.category.as_deref(), Some("Helmet"));

        manager.dispatch(Message::SetCategory(Some(String::new()))).unwrap();
        assert!(manager.state().category_filter.is_none());
    }

    #[test]
    fn test_switch_to_same_view_is_noop() {
        let mut manager = StateManager::new(Box::new(MemoryStore::new()));
        assert_eq!(
            manager.dispatch(Message::SwitchView(View::Inventory)).unwrap(),
            Effect::None
        );
        assert_eq!(
            manager.dispatch(Message::SwitchView(View::Stats)).unwrap(),
            Effect::Rerender(View::Stats)
        );
        assert_eq!(View::Stats.next(), View::Inventory);
    }

    #[test]
    fn test_json_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        {
            let mut manager = StateManager::new(Box::new(JsonFileStore::new(&path)));
            manager.dispatch(Message::SetLanguage(Language::De)).unwrap();
            manager
                .dispatch(Message::SetGearSetsFilter(CompletionFilter::Complete))
                .unwrap();
        }

        let manager = StateManager::new(Box::new(JsonFileStore::new(&path)));
        assert_eq!(manager.state().language, Some(Language::De));
        assert_eq!(manager.state().gear_sets_filter, CompletionFilter::Complete);
    }

    #[test]
    fn test_corrupt_preferences_fall_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        std::fs::write(&path, "not json").unwrap();

        let manager = StateManager::new(Box::new(JsonFileStore::new(&path)));
        assert_eq!(*manager.state(), AppState::default());
    }

    #[test]
    fn test_corrupt_preferences_restored_from_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        {
            let mut manager = StateManager::new(Box::new(JsonFileStore::new(&path)));
            manager.dispatch(Message::SetSearchLimit(50)).unwrap();
            manager.dispatch(Message::SetSearchLimit(100)).unwrap();
        }
        std::fs::write(&path, "{ truncated").unwrap();

        let manager = StateManager::new(Box::new(JsonFileStore::new(&path)));
        assert_eq!(manager.state().search_limit.get(), 50);
    }

    #[test]
    fn test_partial_preferences_use_defaults() {
        let state: AppState = serde_json::from_str(r#"{"view": "gear-sets"}"#).unwrap();
        assert_eq!(state.view, View::GearSets);
        assert_eq!(state.selected_set, DEFAULT_SELECTED_SET);
    }
}
