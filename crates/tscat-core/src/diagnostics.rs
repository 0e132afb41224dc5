#![forbid(unsafe_code)]

//! Lookup observability: monotonic counters and structured events.
//!
//! Every [`translate`](crate::store::CatalogStore::translate) call bumps
//! `lookups_total`; fallbacks bump the counter for their cause and emit an
//! event on the `tscat.lookup` target with `context` and `source` fields.
//!
//! Counters are process-wide and never reset.

use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Monotonic counters
// ---------------------------------------------------------------------------

static LOOKUPS_TOTAL: AtomicU64 = AtomicU64::new(0);
static LOOKUPS_MISSING_TOTAL: AtomicU64 = AtomicU64::new(0);
static LOOKUPS_VANISHED_TOTAL: AtomicU64 = AtomicU64::new(0);
static LOOKUPS_UNFINISHED_TOTAL: AtomicU64 = AtomicU64::new(0);
static PLURAL_CLAMPED_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Total lookups served (monotonic counter).
#[must_use]
pub fn lookups_total() -> u64 {
    LOOKUPS_TOTAL.load(Ordering::Relaxed)
}

/// Lookups whose key was absent from every store.
#[must_use]
pub fn lookups_missing_total() -> u64 {
    LOOKUPS_MISSING_TOTAL.load(Ordering::Relaxed)
}

/// Lookups that only matched a retired entry.
#[must_use]
pub fn lookups_vanished_total() -> u64 {
    LOOKUPS_VANISHED_TOTAL.load(Ordering::Relaxed)
}

/// Lookups that hit an unfinished entry and returned the source text.
#[must_use]
pub fn lookups_unfinished_total() -> u64 {
    LOOKUPS_UNFINISHED_TOTAL.load(Ordering::Relaxed)
}

/// Plural selections clamped to the last declared form.
#[must_use]
pub fn plural_clamped_total() -> u64 {
    PLURAL_CLAMPED_TOTAL.load(Ordering::Relaxed)
}

/// Point-in-time copy of all counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct LookupCounters {
    pub total: u64,
    pub missing: u64,
    pub vanished: u64,
    pub unfinished: u64,
    pub clamped: u64,
}

#[must_use]
pub fn snapshot() -> LookupCounters {
    LookupCounters {
        total: lookups_total(),
        missing: lookups_missing_total(),
        vanished: lookups_vanished_total(),
        unfinished: lookups_unfinished_total(),
        clamped: plural_clamped_total(),
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

pub(crate) fn record_lookup() {
    LOOKUPS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_missing(context: &str, source: &str, emit: bool) {
    LOOKUPS_MISSING_TOTAL.fetch_add(1, Ordering::Relaxed);
    if emit {
        tracing::warn!(
            target: "tscat.lookup",
            context,
            source,
            "missing translation; using source text"
        );
    }
}

pub(crate) fn record_vanished(context: &str, source: &str, emit: bool) {
    LOOKUPS_VANISHED_TOTAL.fetch_add(1, Ordering::Relaxed);
    if emit {
        tracing::warn!(
            target: "tscat.lookup",
            context,
            source,
            "translation is vanished; using source text"
        );
    }
}

pub(crate) fn record_unfinished(context: &str, source: &str) {
    LOOKUPS_UNFINISHED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "tscat.lookup",
        context,
        source,
        "unfinished translation; using source text"
    );
}

pub(crate) fn record_clamped(context: &str, source: &str, index: usize, forms: usize) {
    PLURAL_CLAMPED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "tscat.lookup",
        context,
        source,
        index,
        forms,
        "plural index beyond declared forms; using last form"
    );
}
