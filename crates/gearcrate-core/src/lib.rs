//! # GearCrate Core Library
//!
//! Item catalog, inventory and gear set logic for the GearCrate inventory
//! manager. The frontends (CLI, terminal UI) only talk to this crate.
//!
//! ## Architecture
//!
//! - **Types** (`types`): Catalog items, statistics and write payloads
//! - **Search** (`search`): Token search with prefix-weighted ranking
//! - **Catalog** (`catalog`): In-memory snapshot of all known items
//! - **Inventory** (`inventory`): Filtering and sorting of owned items
//! - **Gear sets** (`gear_sets`): Set definitions, variants and completion
//! - **API** (`api`): Typed backend client with HTTP and local transports
//! - **State** (`state`): UI preferences and message dispatch
//! - **i18n** (`i18n`): Translation tables
//! - **Persistence** (`persistence`): Atomic JSON documents
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust,ignore
//! use gearcrate_core::{api, Catalog, Config, SearchLimit};
//!
//! let config = Config::load()?;
//! let api = api::connect(&config)?;
//! let catalog = Catalog::from_items(api.search_items_local("")?);
//!
//! if let Some(page) = catalog.search("adp black", SearchLimit::DEFAULT) {
//!     println!("Showing {} of {}", page.shown(), page.total);
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gear_sets;
pub mod i18n;
pub mod inventory;
pub mod persistence;
pub mod search;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use api::{connect, CatalogApi, HttpCatalogApi, LocalCatalogApi};
pub use catalog::Catalog;
pub use config::{Config, Transport};
pub use debounce::SearchDebouncer;
pub use error::{GearCrateError, Result};
pub use gear_sets::{CompletionFilter, FilterCounts, GearSetCatalog, SetVariant, Slot};
pub use i18n::{Language, Translator};
pub use inventory::{InventoryQuery, SortKey, SortOrder};
pub use search::{search_page, token_search, SearchLimit, SearchPage};
pub use state::{AppState, Effect, JsonFileStore, Message, StateManager, View};
pub use types::{AddAction, AddOutcome, CatalogItem, CatalogStats, NewItem};
