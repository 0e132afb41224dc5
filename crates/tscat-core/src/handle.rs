#![forbid(unsafe_code)]

//! Shared catalog handles and the swappable [`Localizer`].
//!
//! A [`CatalogHandle`] is an immutable, fallback-ordered list of stores for
//! one locale. Cloning it is a reference-count bump. A [`Localizer`] holds
//! the active handle behind an [`ArcSwap`]: switching locale is one atomic
//! pointer store, and each `translate` call works on a single snapshot, so a
//! concurrent switch is observed either entirely or not at all.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::EngineConfig;
use crate::error::{Result, TranslateError};
use crate::parser;
use crate::plural::PluralRuleTable;
use crate::store::{self, CatalogStore, Lookup};

#[derive(Debug)]
struct HandleInner {
    locale: String,
    stores: Vec<CatalogStore>,
}

/// Immutable, fallback-ordered set of stores for a locale.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    inner: Arc<HandleInner>,
}

impl CatalogHandle {
    /// Handle over a single store.
    #[must_use]
    pub fn from_store(store: CatalogStore) -> Self {
        let locale = store.locale().to_string();
        Self::from_stores(locale, vec![store])
    }

    /// Handle over `stores`, consulted in order.
    #[must_use]
    pub fn from_stores(locale: impl Into<String>, stores: Vec<CatalogStore>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                locale: locale.into(),
                stores,
            }),
        }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.inner.locale
    }

    #[must_use]
    pub fn stores(&self) -> &[CatalogStore] {
        &self.inner.stores
    }

    /// The first store in the chain, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&CatalogStore> {
        self.inner.stores.first()
    }

    /// Resolve `lookup`; the first store with a finished entry wins.
    pub fn translate(&self, lookup: &Lookup<'_>) -> std::result::Result<String, TranslateError> {
        store::translate_chain(self.inner.stores.iter(), lookup)
    }

    #[must_use]
    pub fn tr_lossy(&self, lookup: &Lookup<'_>) -> String {
        store::lossy(self.translate(lookup), lookup)
    }

    /// Whether two handles share the same stores.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Load one catalog file for `locale` with default settings.
///
/// # Errors
///
/// Any [`CatalogError`](crate::error::CatalogError) from reading or parsing.
pub fn load_catalog(path: impl AsRef<Path>, locale: &str) -> Result<CatalogHandle> {
    load_catalog_with(
        path,
        locale,
        &EngineConfig::default(),
        &PluralRuleTable::builtin(),
    )
}

/// Load one catalog file for `locale` under `config` and `rules`.
pub fn load_catalog_with(
    path: impl AsRef<Path>,
    locale: &str,
    config: &EngineConfig,
    rules: &PluralRuleTable,
) -> Result<CatalogHandle> {
    let store = load_store(path.as_ref(), locale, config, rules)?;
    Ok(CatalogHandle::from_store(store))
}

pub(crate) fn load_store(
    path: &Path,
    locale: &str,
    config: &EngineConfig,
    rules: &PluralRuleTable,
) -> Result<CatalogStore> {
    let span = tracing::debug_span!(
        target: "tscat.locale",
        "load_catalog",
        locale,
        path = %path.display()
    );
    let _guard = span.enter();

    let catalog = parser::parse_file_with(path, config.parse_options())?;
    tracing::info!(
        target: "tscat.locale",
        locale,
        path = %path.display(),
        messages = catalog.len(),
        "catalog loaded"
    );
    Ok(CatalogStore::for_locale(
        catalog,
        locale,
        rules,
        config.store_options(),
    ))
}

/// Process-facing translator with an atomically swappable active handle.
pub struct Localizer {
    active: ArcSwap<CatalogHandle>,
}

impl Localizer {
    #[must_use]
    pub fn new(handle: CatalogHandle) -> Self {
        Self {
            active: ArcSwap::from_pointee(handle),
        }
    }

    /// Replace the active handle and return the previous one.
    ///
    /// In-flight `translate` calls finish on the handle they started with.
    pub fn switch_locale(&self, handle: CatalogHandle) -> CatalogHandle {
        let to = handle.locale().to_string();
        let previous = self.active.swap(Arc::new(handle));
        tracing::info!(
            target: "tscat.locale",
            from = previous.locale(),
            to = %to,
            "locale switched"
        );
        CatalogHandle::clone(&previous)
    }

    /// Snapshot of the active handle.
    #[must_use]
    pub fn current(&self) -> CatalogHandle {
        CatalogHandle::clone(&self.active.load())
    }

    #[must_use]
    pub fn locale(&self) -> String {
        self.active.load().locale().to_string()
    }

    pub fn translate(&self, lookup: &Lookup<'_>) -> std::result::Result<String, TranslateError> {
        self.active.load().translate(lookup)
    }

    #[must_use]
    pub fn tr_lossy(&self, lookup: &Lookup<'_>) -> String {
        self.active.load().tr_lossy(lookup)
    }
}

impl std::fmt::Debug for Localizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("locale", &self.locale())
            .finish()
    }
}
