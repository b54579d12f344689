//! Typed client for the item backend.
//!
//! Every backend operation is one method on [`CatalogApi`]. The transport is
//! an implementation detail chosen once at startup by [`connect`]:
//!
//! - [`HttpCatalogApi`]: a remote backend reached via `POST /api/<method>`
//! - [`LocalCatalogApi`]: an in-process backend over a JSON data file
//!
//! Callers hold a `Box<dyn CatalogApi>` and never branch on the transport.

mod http;
mod local;

pub use http::HttpCatalogApi;
pub use local::LocalCatalogApi;

use crate::config::{Config, Transport};
use crate::error::Result;
use crate::gear_sets::{GearSetCatalog, GearSetSummary, SetVariant};
use crate::i18n::Language;
use crate::inventory::InventoryQuery;
use crate::types::{AddOutcome, CatalogItem, CatalogStats, NewItem};
use tracing::info;

/// Operations offered by the item backend.
pub trait CatalogApi: Send + Sync {
    /// Items whose name contains `query`; an empty query returns the whole
    /// catalog, including items with a zero count.
    fn search_items_local(&self, query: &str) -> Result<Vec<CatalogItem>>;

    /// Full record of one item, `None` if unknown
    fn get_item(&self, name: &str) -> Result<Option<CatalogItem>>;

    /// Add an item, or increase the count of an existing one
    fn add_item(&self, item: &NewItem) -> Result<AddOutcome>;

    /// Set the owned quantity of an item
    fn update_count(&self, name: &str, count: u32) -> Result<()>;

    /// Replace the notes of an item
    fn update_notes(&self, name: &str, notes: &str) -> Result<()>;

    /// Mark or unmark an item as favorite
    fn toggle_favorite(&self, name: &str, is_favorite: bool) -> Result<()>;

    /// Remove an item from the database
    fn delete_item(&self, name: &str) -> Result<()>;

    /// Set every count to zero; returns the number of affected items
    fn clear_inventory(&self) -> Result<u64>;

    /// Remove every item; returns the number of deleted items
    fn delete_all_items(&self) -> Result<u64>;

    /// Aggregate statistics
    fn get_stats(&self) -> Result<CatalogStats>;

    /// Sorted categories that currently hold owned items
    fn get_categories(&self) -> Result<Vec<String>>;

    /// Filtered and sorted inventory listing
    fn inventory(&self, query: &InventoryQuery) -> Result<Vec<CatalogItem>>;

    /// All gear sets with their variants
    fn get_all_gear_sets(&self) -> Result<Vec<GearSetSummary>>;

    /// Pieces and completion of one set variant
    fn get_gear_set_details(&self, set_name: &str, variant: &str) -> Result<SetVariant>;

    /// Variants of one set
    fn get_gear_set_variants(&self, set_name: &str) -> Result<Vec<String>>;

    /// Language stored by the backend, if any
    fn get_user_language(&self) -> Result<Option<Language>>;

    /// Store the user's language with the backend
    fn set_user_language(&self, language: Language) -> Result<()>;
}

/// Create the client for the configured transport.
pub fn connect(config: &Config) -> Result<Box<dyn CatalogApi>> {
    info!(transport = %config.api.transport, "Connecting to item backend");
    match config.api.transport {
        Transport::Http => Ok(Box::new(HttpCatalogApi::new(
            &config.api.base_url,
            config.api.timeout(),
        )?)),
        Transport::Local => {
            let sets = GearSetCatalog::load_from(&config.sets_file()?)?;
            Ok(Box::new(LocalCatalogApi::open(&config.data_file()?, sets)?))
        }
    }
}
