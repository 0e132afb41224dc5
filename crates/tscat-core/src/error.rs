#![forbid(unsafe_code)]

//! Error taxonomy for catalog loading and lookup.
//!
//! | Error | Phase | Recovery |
//! |-------|-------|----------|
//! | [`CatalogError`] | load | caller keeps its previous handle |
//! | [`UnknownLocaleError`] | load | store falls back to the two-form rule |
//! | [`TranslateError`] | lookup | surfaced to the call site |
//! | [`ConfigError`] | startup | caller uses defaults or aborts |
//!
//! Missing keys and vanished entries are not errors; they resolve to the
//! source text with a diagnostic event.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::PlaceholderIndexError;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Load-time failures. Fatal to the catalog being loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed markup.
    #[error("malformed catalog at line {line}, column {column}: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },

    /// The markup is well-formed but a required field is missing or a key
    /// is duplicated.
    #[error("schema violation in context {context:?}: {message}")]
    SchemaViolation { context: String, message: String },
}

impl CatalogError {
    #[must_use]
    pub fn schema(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// No plural rule is registered for a locale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no plural rule registered for locale {locale:?}")]
pub struct UnknownLocaleError {
    pub locale: String,
}

/// Lookup-time failures. These are call-site contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// A plural entry was looked up without a count.
    #[error("plural message {source_text:?} in context {context:?} requires a count")]
    MissingPluralCount {
        context: String,
        source_text: String,
    },

    #[error(transparent)]
    Placeholder(#[from] PlaceholderIndexError),
}

/// Failures while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
