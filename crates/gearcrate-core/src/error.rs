//! Error types for GearCrate core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while the CLI uses `anyhow` for convenient error
//! handling at the command level.
//!
//! Searching never fails: an empty result is represented as an empty
//! sequence. Errors belong to the backend-communication, persistence and
//! configuration layers.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using GearCrateError
pub type Result<T> = std::result::Result<T, GearCrateError>;

/// Core error types for GearCrate operations.
#[derive(Error, Debug)]
pub enum GearCrateError {
    // === Catalog Errors ===
    /// No item with the given name exists in the catalog
    #[error("item not found: {name}")]
    ItemNotFound { name: String },

    /// Item names are the catalog key and may not be blank
    #[error("item name must not be empty")]
    EmptyItemName,

    /// The gear set is not defined
    #[error("gear set not found: {set_name}")]
    SetNotFound { set_name: String },

    // === Backend Errors ===
    /// The backend answered with a non-success status
    #[error("API error calling {method}: status {status}")]
    Api { method: String, status: u16 },

    /// The backend reported a failure in its response body
    #[error("backend rejected {method}: {reason}")]
    Rejected { method: String, reason: String },

    /// The request could not be delivered (connection refused, timeout, ...)
    #[error("transport error: {0}")]
    Transport(String),

    // === Preference Errors ===
    /// The language code is not one of the supported languages
    #[error("unsupported language: {code}")]
    UnsupportedLanguage { code: String },

    /// A preference value was rejected
    #[error("invalid preference {key}: {reason}")]
    InvalidPreference { key: String, reason: String },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A data file could not be parsed
    #[error("data file {path} is invalid: {reason}")]
    DataFileInvalid { path: PathBuf, reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GearCrateError {
    /// Returns true if the error means the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GearCrateError::ItemNotFound { .. } | GearCrateError::SetNotFound { .. }
        )
    }

    /// Returns true if this error is recoverable (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            GearCrateError::Transport(_) | GearCrateError::Io(_) => true,
            GearCrateError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an item-not-found error
    pub fn item_not_found(name: impl Into<String>) -> Self {
        GearCrateError::ItemNotFound { name: name.into() }
    }

    /// Create an invalid-preference error
    pub fn invalid_preference(key: impl Into<String>, reason: impl Into<String>) -> Self {
        GearCrateError::InvalidPreference {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        GearCrateError::Serialization(reason.into())
    }
}

impl From<serde_json::Error> for GearCrateError {
    fn from(err: serde_json::Error) -> Self {
        GearCrateError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for GearCrateError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            let method = err
                .url()
                .and_then(|u| u.path_segments())
                .and_then(|mut segments| segments.next_back())
                .unwrap_or("unknown")
                .to_string();
            return GearCrateError::Api {
                method,
                status: status.as_u16(),
            };
        }
        GearCrateError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(GearCrateError::item_not_found("ADP Arms Black").is_not_found());
        assert!(GearCrateError::SetNotFound {
            set_name: "ADP".to_string()
        }
        .is_not_found());
        assert!(!GearCrateError::EmptyItemName.is_not_found());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(GearCrateError::Transport("refused".to_string()).is_recoverable());
        assert!(GearCrateError::Api {
            method: "get_stats".to_string(),
            status: 503
        }
        .is_recoverable());
        assert!(!GearCrateError::Api {
            method: "get_stats".to_string(),
            status: 404
        }
        .is_recoverable());
        assert!(!GearCrateError::UnsupportedLanguage {
            code: "xx".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = GearCrateError::Api {
            method: "update_count".to_string(),
            status: 500,
        };
        assert_eq!(err.to_string(), "API error calling update_count: status 500");
    }
}
