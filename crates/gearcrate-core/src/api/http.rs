//! HTTP transport: `POST {base_url}/api/{method}` with a JSON body.

use super::CatalogApi;
use crate::error::{GearCrateError, Result};
use crate::gear_sets::{GearSetSummary, SetVariant};
use crate::i18n::Language;
use crate::inventory::InventoryQuery;
use crate::types::{AddOutcome, CatalogItem, CatalogStats, NewItem};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for a remote GearCrate backend.
pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
}

/// Envelope used by write and gear-set endpoints: `{"success": bool, "error": ..., ...}`
#[derive(Debug, Deserialize)]
struct Reply<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: T,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct Empty {}

#[derive(Debug, Deserialize)]
struct Affected {
    #[serde(default, alias = "deleted")]
    affected: u64,
}

#[derive(Debug, Deserialize)]
struct Sets {
    sets: Vec<GearSetSummary>,
}

#[derive(Debug, Deserialize)]
struct SetDetails {
    set: SetVariant,
}

#[derive(Debug, Deserialize)]
struct Variants {
    variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UserLanguage {
    #[serde(default)]
    language: Option<String>,
}

/// Body of the `inventory` call
#[derive(Debug, Serialize)]
struct InventoryRequest<'a> {
    sort_by: String,
    sort_order: String,
    query: &'a str,
    category: Option<&'a str>,
    is_favorite: Option<bool>,
}

impl<'a> From<&'a InventoryQuery> for InventoryRequest<'a> {
    fn from(q: &'a InventoryQuery) -> Self {
        InventoryRequest {
            sort_by: q.sort_by.to_string(),
            sort_order: q.sort_order.to_string(),
            query: q.query.as_deref().unwrap_or(""),
            category: q.category.as_deref(),
            is_favorite: q.favorites_only.then_some(true),
        }
    }
}

impl HttpCatalogApi {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .user_agent(concat!("GearCrate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(HttpCatalogApi { client, base_url })
    }

    /// Endpoint URL of a backend method
    pub fn endpoint(&self, method: &str) -> String {
        format!("{}/api/{}", self.base_url, method)
    }

    fn call<B: Serialize + ?Sized, R: DeserializeOwned>(&self, method: &str, body: &B) -> Result<R> {
        debug!(method, "Calling backend");
        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .map_err(|e| GearCrateError::Transport(format!("{}: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(method, status = status.as_u16(), "Backend returned an error status");
            return Err(GearCrateError::Api {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<R>()
            .map_err(|e| GearCrateError::serialization(format!("{}: {}", method, e)))
    }

    fn call_checked<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<R> {
        let reply: Reply<R> = self.call(method, body)?;
        unwrap_reply(method, reply)
    }
}

fn unwrap_reply<R>(method: &str, reply: Reply<R>) -> Result<R> {
    if reply.success {
        Ok(reply.body)
    } else {
        Err(GearCrateError::Rejected {
            method: method.to_string(),
            reason: reply.error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| GearCrateError::ConfigError {
        reason: format!("invalid base_url {}: {}", base_url, e),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(GearCrateError::ConfigError {
            reason: format!("unsupported scheme in base_url: {}", url.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

impl CatalogApi for HttpCatalogApi {
    fn search_items_local(&self, query: &str) -> Result<Vec<CatalogItem>> {
        self.call("search_items_local", &json!({ "query": query }))
    }

    fn get_item(&self, name: &str) -> Result<Option<CatalogItem>> {
        self.call("get_item", &json!({ "name": name }))
    }

    fn add_item(&self, item: &NewItem) -> Result<AddOutcome> {
        self.call_checked("add_item", item)
    }

    fn update_count(&self, name: &str, count: u32) -> Result<()> {
        let _: Empty = self.call_checked("update_count", &json!({ "name": name, "count": count }))?;
        Ok(())
    }

    fn update_notes(&self, name: &str, notes: &str) -> Result<()> {
        let _: Empty = self.call_checked("update_notes", &json!({ "name": name, "notes": notes }))?;
        Ok(())
    }

    fn toggle_favorite(&self, name: &str, is_favorite: bool) -> Result<()> {
        let _: Empty = self.call_checked(
            "toggle_favorite",
            &json!({ "name": name, "is_favorite": is_favorite }),
        )?;
        Ok(())
    }

    fn delete_item(&self, name: &str) -> Result<()> {
        let _: Empty = self.call_checked("delete_item", &json!({ "name": name }))?;
        Ok(())
    }

    fn clear_inventory(&self) -> Result<u64> {
        let reply: Affected = self.call_checked("clear_inventory", &json!({}))?;
        Ok(reply.affected)
    }

    fn delete_all_items(&self) -> Result<u64> {
        let reply: Affected = self.call_checked("delete_all_items", &json!({}))?;
        Ok(reply.affected)
    }

    fn get_stats(&self) -> Result<CatalogStats> {
        self.call("get_stats", &json!({}))
    }

    fn get_categories(&self) -> Result<Vec<String>> {
        self.call("get_categories", &json!({}))
    }

    fn inventory(&self, query: &InventoryQuery) -> Result<Vec<CatalogItem>> {
        self.call("inventory", &InventoryRequest::from(query))
    }

    fn get_all_gear_sets(&self) -> Result<Vec<GearSetSummary>> {
        let reply: Sets = self.call_checked("get_all_gear_sets", &json!({}))?;
        Ok(reply.sets)
    }

    fn get_gear_set_details(&self, set_name: &str, variant: &str) -> Result<SetVariant> {
        let reply: SetDetails = self.call_checked(
            "get_gear_set_details",
            &json!({ "set_name": set_name, "variant": variant }),
        )?;
        Ok(reply.set)
    }

    fn get_gear_set_variants(&self, set_name: &str) -> Result<Vec<String>> {
        let reply: Variants =
            self.call_checked("get_gear_set_variants", &json!({ "set_name": set_name }))?;
        Ok(reply.variants)
    }

    fn get_user_language(&self) -> Result<Option<Language>> {
        let reply: UserLanguage = self.call_checked("get_user_language", &json!({}))?;
        // Unknown codes stored by other clients are treated as unset
        Ok(reply.language.and_then(|code| code.parse().ok()))
    }

    fn set_user_language(&self, language: Language) -> Result<()> {
        let _: UserLanguage = self.call_checked(
            "set_user_language",
            &json!({ "language": language.code() }),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{SortKey, SortOrder};

    #[test]
    fn test_endpoint() {
        let api = HttpCatalogApi::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.endpoint("get_item"), "http://localhost:8080/api/get_item");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(HttpCatalogApi::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpCatalogApi::new("ftp://host", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_reply_envelope() {
        let reply: Reply<AddOutcome> =
            serde_json::from_str(r#"{"success": true, "action": "added", "count": 1}"#).unwrap();
        assert_eq!(unwrap_reply("add_item", reply).unwrap().count, 1);

        let reply: Reply<Empty> =
            serde_json::from_str(r#"{"success": false, "error": "Item 'X' not found."}"#).unwrap();
        let err = unwrap_reply("update_count", reply).unwrap_err();
        assert!(err.to_string().contains("not found"));

        let reply: Reply<Affected> = serde_json::from_str(r#"{"success": true, "deleted": 4}"#).unwrap();
        assert_eq!(unwrap_reply("delete_all_items", reply).unwrap().affected, 4);
    }

    #[test]
    fn test_inventory_request_body() {
        let query = InventoryQuery::default()
            .sorted(SortKey::Date, SortOrder::Desc)
            .in_category("Helmet");
        let body = serde_json::to_value(InventoryRequest::from(&query)).unwrap();
        assert_eq!(body["sort_by"], "date");
        assert_eq!(body["sort_order"], "desc");
        assert_eq!(body["category"], "Helmet");
        assert!(body["is_favorite"].is_null());
    }

    #[test]
    fn test_unreachable_backend_is_transport_error() {
        let api = HttpCatalogApi::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = api.get_stats().unwrap_err();
        assert!(matches!(err, GearCrateError::Transport(_)));
        assert!(err.is_recoverable());
    }
}
