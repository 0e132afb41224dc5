#![forbid(unsafe_code)]

//! Locale to catalog files, in fallback order.
//!
//! For a requested locale `zh_TW` the resolver consults, in order:
//! `zh_TW`, its base language `zh`, then each configured fallback locale.
//! Candidates whose file does not exist are skipped; the rest become the
//! stores of one [`CatalogHandle`].

use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::error::{CatalogError, Result};
use crate::handle::{CatalogHandle, load_store};
use crate::plural::{PluralRuleTable, normalize_locale, primary_subtag};

#[derive(Debug, Clone)]
pub struct LocaleResolver {
    config: EngineConfig,
    rules: PluralRuleTable,
}

impl LocaleResolver {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rules(config, PluralRuleTable::builtin())
    }

    #[must_use]
    pub fn with_rules(config: EngineConfig, rules: PluralRuleTable) -> Self {
        Self { config, rules }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Locales to try for `locale`, most specific first, without duplicates.
    #[must_use]
    pub fn candidates(&self, locale: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |tag: &str| {
            let tag = tag.trim();
            if tag.is_empty() {
                return;
            }
            let key = normalize_locale(tag);
            if !out.iter().any(|seen| normalize_locale(seen) == key) {
                out.push(tag.to_string());
            }
        };
        push(locale);
        push(primary_subtag(locale.trim()));
        for fallback in &self.config.fallback_locales {
            push(fallback);
        }
        out
    }

    /// Catalog path for one locale.
    #[must_use]
    pub fn path_for(&self, locale: &str) -> PathBuf {
        let dir = self
            .config
            .catalog_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."));
        let name = if self.config.file_prefix.is_empty() {
            format!("{locale}.ts")
        } else {
            format!("{}_{locale}.ts", self.config.file_prefix)
        };
        dir.join(name)
    }

    /// Load every existing candidate catalog into one handle.
    ///
    /// # Errors
    ///
    /// A parse or read failure in any existing candidate, or
    /// [`CatalogError::Io`] for the requested locale's path when no candidate
    /// file exists.
    pub fn load(&self, locale: &str) -> Result<CatalogHandle> {
        let span = tracing::debug_span!(target: "tscat.locale", "resolve_locale", locale);
        let _guard = span.enter();

        let mut stores = Vec::new();
        for candidate in self.candidates(locale) {
            let path = self.path_for(&candidate);
            if !path.is_file() {
                tracing::debug!(
                    target: "tscat.locale",
                    candidate = %candidate,
                    path = %path.display(),
                    "no catalog for candidate"
                );
                continue;
            }
            stores.push(load_store(&path, &candidate, &self.config, &self.rules)?);
        }

        if stores.is_empty() {
            return Err(CatalogError::Io {
                path: self.path_for(locale),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no catalog found for locale {locale:?}"),
                ),
            });
        }
        Ok(CatalogHandle::from_stores(locale, stores))
    }
}
