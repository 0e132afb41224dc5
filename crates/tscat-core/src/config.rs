#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`EngineConfig`] collects the tunables of loading and lookup. It can be
//! read from TOML or JSON, then overridden from the environment:
//!
//! ```toml
//! # tscat.toml
//! placeholder_mode = "lenient"
//! retain_vanished = false
//! fallback_locales = ["en"]
//! catalog_dir = "locale"
//! file_prefix = "bitcoin"
//! ```
//!
//! | Variable | Field |
//! |----------|-------|
//! | `TSCAT_PLACEHOLDER_MODE` | `placeholder_mode` (`strict` / `lenient`) |
//! | `TSCAT_RETAIN_VANISHED` | `retain_vanished` |
//! | `TSCAT_LOG_MISSING` | `log_missing` |
//! | `TSCAT_CATALOG_DIR` | `catalog_dir` |
//!
//! Every field has a default, so `EngineConfig::default()` is a working
//! configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::PlaceholderMode;
use crate::parser::ParseOptions;
use crate::store::StoreOptions;

pub const ENV_PLACEHOLDER_MODE: &str = "TSCAT_PLACEHOLDER_MODE";
pub const ENV_RETAIN_VANISHED: &str = "TSCAT_RETAIN_VANISHED";
pub const ENV_LOG_MISSING: &str = "TSCAT_LOG_MISSING";
pub const ENV_CATALOG_DIR: &str = "TSCAT_CATALOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Handling of `%N` references beyond the supplied arguments.
    pub placeholder_mode: PlaceholderMode,
    /// Keep vanished entries in parsed catalogs.
    pub retain_vanished: bool,
    /// Warn on missing and vanished lookups.
    pub log_missing: bool,
    /// Locales consulted after the requested one and its base language.
    pub fallback_locales: Vec<String>,
    /// Directory searched by the locale resolver.
    pub catalog_dir: Option<PathBuf>,
    /// Catalog file stem prefix: `{prefix}_{locale}.ts`.
    pub file_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder_mode: PlaceholderMode::Strict,
            retain_vanished: true,
            log_missing: true,
            fallback_locales: Vec::new(),
            catalog_dir: None,
            file_prefix: String::new(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load from a file, choosing the format by extension (`.json` is JSON,
    /// anything else TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an injectable lookup.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env_with(get_env);
        config
    }

    /// Apply environment overrides in place. Unparseable values are logged
    /// and ignored.
    pub fn apply_env_with<F>(&mut self, get_env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = get_env(ENV_PLACEHOLDER_MODE) {
            match PlaceholderMode::parse(&raw) {
                Some(mode) => self.placeholder_mode = mode,
                None => ignored(ENV_PLACEHOLDER_MODE, &raw),
            }
        }
        if let Some(raw) = get_env(ENV_RETAIN_VANISHED) {
            match parse_bool(&raw) {
                Some(value) => self.retain_vanished = value,
                None => ignored(ENV_RETAIN_VANISHED, &raw),
            }
        }
        if let Some(raw) = get_env(ENV_LOG_MISSING) {
            match parse_bool(&raw) {
                Some(value) => self.log_missing = value,
                None => ignored(ENV_LOG_MISSING, &raw),
            }
        }
        if let Some(raw) = get_env(ENV_CATALOG_DIR) {
            let raw = raw.trim();
            if raw.is_empty() {
                ignored(ENV_CATALOG_DIR, raw);
            } else {
                self.catalog_dir = Some(PathBuf::from(raw));
            }
        }
    }

    /// File (if any), then process environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        tracing::debug!(
            target: "tscat.config",
            placeholder_mode = ?config.placeholder_mode,
            retain_vanished = config.retain_vanished,
            log_missing = config.log_missing,
            fallbacks = config.fallback_locales.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Check all fields. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (i, locale) in self.fallback_locales.iter().enumerate() {
            if locale.trim().is_empty() {
                errors.push(format!("fallback_locales[{i}] must not be empty"));
            } else if locale.contains(['/', '\\', '.']) {
                errors.push(format!(
                    "fallback_locales[{i}] is not a locale tag: {locale:?}"
                ));
            } else if self.fallback_locales[..i].contains(locale) {
                errors.push(format!("fallback_locales[{i}] duplicates {locale:?}"));
            }
        }

        if self.file_prefix.contains(['/', '\\']) {
            errors.push(format!(
                "file_prefix must not contain path separators, got {:?}",
                self.file_prefix
            ));
        }

        if let Some(dir) = &self.catalog_dir
            && dir.as_os_str().is_empty()
        {
            errors.push("catalog_dir must not be empty".into());
        }

        errors
    }

    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            retain_vanished: self.retain_vanished,
        }
    }

    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            placeholder_mode: self.placeholder_mode,
            log_missing: self.log_missing,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn ignored(key: &str, raw: &str) {
    tracing::warn!(target: "tscat.config", key, value = raw, "ignoring invalid override");
}
