//! Application state management.

use gearcrate_core::api::{self, CatalogApi};
use gearcrate_core::state::{AppState, Effect, JsonFileStore, Message, PreferenceStore, StateManager};
use gearcrate_core::{AddOutcome, Catalog, Config, Language, NewItem, Translator};
use tracing::{debug, info, warn};

/// Shared application state.
pub struct App {
    /// Configuration
    pub config: Config,

    /// Item backend
    pub api: Box<dyn CatalogApi>,

    /// Snapshot of all known items
    pub catalog: Catalog,

    /// Persisted UI preferences
    pub state: StateManager,

    /// Strings for the active language
    pub translator: Translator,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api = api::connect(&config)?;
        let prefs_path = config.preferences_file()?;
        let first_run = !prefs_path.exists();
        let mut app = Self::with_parts(config, api, Box::new(JsonFileStore::new(&prefs_path)))?;

        let configured = app.config.ui.default_search_limit;
        if first_run && configured != app.state.state().search_limit {
            app.state.dispatch(Message::SetSearchLimit(configured.get()))?;
        }

        info!(
            prefs = %prefs_path.display(),
            items = app.catalog.len(),
            language = %app.translator.language(),
            "Application initialized"
        );
        Ok(app)
    }

    /// Assemble an application from an existing backend and preference store.
    pub fn with_parts(
        config: Config,
        api: Box<dyn CatalogApi>,
        store: Box<dyn PreferenceStore>,
    ) -> anyhow::Result<Self> {
        let catalog = Catalog::from_items(api.search_items_local("")?);
        let state = StateManager::new(store);
        let language = detect_language(&config, state.state(), api.as_ref());

        Ok(App {
            config,
            api,
            catalog,
            state,
            translator: Translator::new(language),
        })
    }

    /// Current preferences
    pub fn prefs(&self) -> &AppState {
        self.state.state()
    }

    /// Translate a key.
    pub fn tr(&self, key: &str) -> String {
        self.translator.tr(key)
    }

    /// Translate a key with parameters.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.translator.t(key, params)
    }

    /// Apply a state message and return the translated notice, if any.
    pub fn dispatch(&mut self, message: Message) -> anyhow::Result<Option<String>> {
        let effect = self.state.dispatch(message)?;
        Ok(match effect {
            Effect::Notify(key) => {
                let limit = self.prefs().search_limit.to_string();
                Some(self.t(key, &[("limit", &limit)]))
            }
            Effect::Rerender(_) | Effect::ReloadInventory | Effect::None => None,
        })
    }

    /// Change the UI language and store it with the backend.
    pub fn set_language(&mut self, language: Language) -> anyhow::Result<()> {
        self.dispatch(Message::SetLanguage(language))?;
        self.translator.set_language(language);
        if let Err(e) = self.api.set_user_language(language) {
            warn!(error = %e, "Backend did not store the language");
        }
        Ok(())
    }

    /// Refetch the whole catalog from the backend.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        self.catalog.replace(self.api.search_items_local("")?);
        debug!(items = self.catalog.len(), "Catalog reloaded");
        Ok(())
    }

    /// Set the count of an item, then update the snapshot.
    pub fn set_count(&mut self, name: &str, count: u32) -> anyhow::Result<u32> {
        self.api.update_count(name, count)?;
        if self.catalog.apply_count(name, count).is_none() {
            self.reload()?;
        }
        Ok(count)
    }

    /// Change the count of an item by `delta`, never going below zero.
    pub fn adjust_count(&mut self, name: &str, delta: i64) -> anyhow::Result<u32> {
        let current = match self.catalog.get(name) {
            Some(item) => item.count,
            None => self
                .api
                .get_item(name)?
                .ok_or_else(|| gearcrate_core::GearCrateError::item_not_found(name))?
                .count,
        };
        let next = (i64::from(current) + delta).clamp(0, i64::from(u32::MAX)) as u32;
        self.set_count(name, next)
    }

    /// Replace the notes of an item, then update the snapshot.
    pub fn set_notes(&mut self, name: &str, notes: &str) -> anyhow::Result<()> {
        self.api.update_notes(name, notes)?;
        let stored = (!notes.is_empty()).then(|| notes.to_string());
        if !self.catalog.apply_notes(name, stored) {
            self.reload()?;
        }
        Ok(())
    }

    /// Mark or unmark a favorite, then update the snapshot.
    pub fn set_favorite(&mut self, name: &str, is_favorite: bool) -> anyhow::Result<()> {
        self.api.toggle_favorite(name, is_favorite)?;
        if !self.catalog.apply_favorite(name, is_favorite) {
            self.reload()?;
        }
        Ok(())
    }

    /// Add an item; the snapshot is reloaded since the item may be new.
    pub fn add_item(&mut self, item: &NewItem) -> anyhow::Result<AddOutcome> {
        let outcome = self.api.add_item(item)?;
        self.reload()?;
        Ok(outcome)
    }

    /// Delete an item and reload the snapshot.
    pub fn delete_item(&mut self, name: &str) -> anyhow::Result<()> {
        self.api.delete_item(name)?;
        self.reload()
    }

    /// Zero every count and reload the snapshot.
    pub fn clear_inventory(&mut self) -> anyhow::Result<u64> {
        let affected = self.api.clear_inventory()?;
        self.reload()?;
        Ok(affected)
    }
}

/// Configured language, then saved preference, then backend, then `LANG`.
fn detect_language(config: &Config, state: &AppState, api: &dyn CatalogApi) -> Language {
    let saved = config
        .ui
        .language
        .clone()
        .or_else(|| state.language.map(|l| l.code().to_string()))
        .or_else(|| match api.get_user_language() {
            Ok(language) => language.map(|l| l.code().to_string()),
            Err(e) => {
                warn!(error = %e, "Could not read language from backend");
                None
            }
        });
    let locale = std::env::var("LANG").ok();
    Language::detect(saved.as_deref(), locale.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearcrate_core::api::LocalCatalogApi;
    use gearcrate_core::gear_sets::{CompletionFilter, GearSetCatalog};
    use gearcrate_core::state::{MemoryStore, View};
    use gearcrate_core::{CatalogItem, SearchLimit};
    use tempfile::TempDir;

    fn app() -> App {
        let api = LocalCatalogApi::in_memory(
            vec![
                CatalogItem::new("ADP Core Black", 1).with_category("Torso"),
                CatalogItem::new("P4-AR Rifle", 0).with_category("Weapons"),
            ],
            GearSetCatalog::default(),
        );
        let mut config = Config::default();
        config.ui.language = Some("en".to_string());
        App::with_parts(config, Box::new(api), Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_count_writes_through_to_snapshot() {
        let mut app = app();
        assert_eq!(app.adjust_count("ADP Core Black", 2).unwrap(), 3);
        assert_eq!(app.catalog.get("ADP Core Black").unwrap().count, 3);
        assert_eq!(app.adjust_count("P4-AR Rifle", -1).unwrap(), 0);
        assert!(app.set_count("Missing", 1).is_err());
    }

    #[test]
    fn test_notes_and_favorite_write_through() {
        let mut app = app();
        app.set_notes("P4-AR Rifle", "spare").unwrap();
        app.set_favorite("P4-AR Rifle", true).unwrap();

        let item = app.catalog.get("P4-AR Rifle").unwrap();
        assert_eq!(item.notes.as_deref(), Some("spare"));
        assert!(item.is_favorite);
    }

    #[test]
    fn test_add_and_delete_reload_snapshot() {
        let mut app = app();
        app.add_item(&NewItem::new("Overlord Helmet").with_category("Helmet"))
            .unwrap();
        assert!(app.catalog.get("Overlord Helmet").is_some());

        app.delete_item("Overlord Helmet").unwrap();
        assert!(app.catalog.get("Overlord Helmet").is_none());
    }

    #[test]
    fn test_limit_notice_is_translated() {
        let mut app = app();
        let notice = app.dispatch(Message::SetSearchLimit(50)).unwrap();
        assert_eq!(notice.as_deref(), Some("Search result limit set to 50"));
    }

    #[test]
    fn test_set_language() {
        let mut app = app();
        app.set_language(Language::De).unwrap();
        assert_eq!(app.translator.language(), Language::De);
        assert_eq!(app.api.get_user_language().unwrap(), Some(Language::De));
        assert_eq!(app.tr("inventory"), "Inventar");
    }

    #[test]
    fn test_configured_language_survives_rerender() {
        let store = MemoryStore::new();
        store
            .save(&AppState {
                language: Some(Language::De),
                ..AppState::default()
            })
            .unwrap();
        let mut config = Config::default();
        config.ui.language = Some("en".to_string());
        let mut app = App::with_parts(
            config,
            Box::new(LocalCatalogApi::in_memory(Vec::new(), GearSetCatalog::default())),
            Box::new(store),
        )
        .unwrap();
        assert_eq!(app.translator.language(), Language::En);

        app.dispatch(Message::SwitchView(View::Stats)).unwrap();
        app.dispatch(Message::SetGearSetsFilter(CompletionFilter::Complete))
            .unwrap();
        assert_eq!(app.translator.language(), Language::En);
        assert_eq!(app.tr("inventory"), "Inventory");
    }

    #[test]
    fn test_new_uses_configured_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.data_dir = Some(temp_dir.path().to_path_buf());
        config.catalog.sets_file = Some(temp_dir.path().join("sets.toml"));
        config.ui.default_search_limit = SearchLimit::new(40).unwrap();
        config.ui.language = Some("en".to_string());

        {
            let mut app = App::new(config.clone()).unwrap();
            assert_eq!(app.prefs().search_limit.get(), 40);
            app.add_item(&NewItem::new("ADP Core Black")).unwrap();
        }

        let app = App::new(config).unwrap();
        assert!(app.catalog.get("ADP Core Black").is_some());
        assert!(temp_dir.path().join("inventory.json").exists());
        assert!(temp_dir.path().join("preferences.json").exists());
    }
}
