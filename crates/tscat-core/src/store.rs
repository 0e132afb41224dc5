#![forbid(unsafe_code)]

//! Indexed catalog with lookup, plural selection and formatting.
//!
//! # Resolution
//!
//! | Matched entry | Result |
//! |---------------|--------|
//! | none | source text, `missing` diagnostic |
//! | vanished only | source text, `vanished` diagnostic |
//! | unfinished | source text |
//! | finished, single form | formatted translation |
//! | finished, plural | formatted form selected by the locale rule |
//!
//! Source-text fallbacks are returned verbatim, without placeholder
//! substitution. Vanished entries are never indexed.
//!
//! Disambiguation: the exact `(context, source, disambiguation)` key wins;
//! when a disambiguation was supplied and nothing matches, the entry without
//! one is tried.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use crate::catalog::{Catalog, MessageEntry, Status, Translation};
use crate::diagnostics;
use crate::error::TranslateError;
use crate::format::{self, PlaceholderMode};
use crate::plural::{PluralRule, PluralRuleTable};

/// A translation request.
///
/// ```
/// use tscat_core::store::Lookup;
///
/// let lookup = Lookup::new("Intro", "%n GB of free space available").count(4);
/// assert_eq!(lookup.context(), "Intro");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<'a> {
    context: &'a str,
    source_text: &'a str,
    disambiguation: Option<&'a str>,
    count: Option<i64>,
    args: SmallVec<[&'a str; 4]>,
}

impl<'a> Lookup<'a> {
    #[must_use]
    pub fn new(context: &'a str, source_text: &'a str) -> Self {
        Self {
            context,
            source_text,
            disambiguation: None,
            count: None,
            args: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn disambiguation(mut self, disambiguation: &'a str) -> Self {
        self.disambiguation = Some(disambiguation);
        self
    }

    /// Count for plural selection and `%n`.
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Append one positional argument (`%1` is the first).
    #[must_use]
    pub fn arg(mut self, value: &'a str) -> Self {
        self.args.push(value);
        self
    }

    #[must_use]
    pub fn args(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        self.args.extend(values);
        self
    }

    #[must_use]
    pub fn context(&self) -> &'a str {
        self.context
    }

    #[must_use]
    pub fn source_text(&self) -> &'a str {
        self.source_text
    }
}

/// Per-store behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub placeholder_mode: PlaceholderMode,
    /// Emit a warning event for missing and vanished lookups.
    pub log_missing: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            placeholder_mode: PlaceholderMode::Strict,
            log_missing: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    disambiguation: Option<String>,
    context: usize,
    message: usize,
}

/// Outcome of a key search in one store.
pub(crate) enum Resolution<'s> {
    Finished(&'s MessageEntry),
    Unfinished,
    Vanished,
    Missing,
}

/// Immutable, indexed catalog for one locale.
#[derive(Debug)]
pub struct CatalogStore {
    catalog: Catalog,
    locale: String,
    rule: PluralRule,
    options: StoreOptions,
    index: HashMap<String, HashMap<String, SmallVec<[Slot; 1]>>>,
    retired: HashSet<(String, String)>,
}

impl CatalogStore {
    /// Index `catalog` under an explicit plural rule.
    #[must_use]
    pub fn new(catalog: Catalog, locale: impl Into<String>, rule: PluralRule) -> Self {
        Self::with_options(catalog, locale, rule, StoreOptions::default())
    }

    #[must_use]
    pub fn with_options(
        catalog: Catalog,
        locale: impl Into<String>,
        rule: PluralRule,
        options: StoreOptions,
    ) -> Self {
        let mut index: HashMap<String, HashMap<String, SmallVec<[Slot; 1]>>> = HashMap::new();
        let mut retired = HashSet::new();
        for (ci, context) in catalog.contexts().iter().enumerate() {
            for (mi, entry) in context.messages.iter().enumerate() {
                if !entry.status.is_active() {
                    retired.insert((entry.context.clone(), entry.source_text.clone()));
                    continue;
                }
                index
                    .entry(entry.context.clone())
                    .or_default()
                    .entry(entry.source_text.clone())
                    .or_default()
                    .push(Slot {
                        disambiguation: entry.disambiguation.clone(),
                        context: ci,
                        message: mi,
                    });
            }
        }
        Self {
            catalog,
            locale: locale.into(),
            rule,
            options,
            index,
            retired,
        }
    }

    /// Index `catalog` with the rule registered for `locale`, falling back to
    /// the two-form default when none is.
    #[must_use]
    pub fn for_locale(
        catalog: Catalog,
        locale: &str,
        rules: &PluralRuleTable,
        options: StoreOptions,
    ) -> Self {
        let rule = rules.rule_or_default(locale);
        Self::with_options(catalog, locale, rule, options)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn rule(&self) -> PluralRule {
        self.rule
    }

    #[must_use]
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Resolve and format `lookup`.
    ///
    /// # Errors
    ///
    /// [`TranslateError::MissingPluralCount`] for a plural entry looked up
    /// without a count, and [`TranslateError::Placeholder`] in strict mode
    /// when the translation references an argument that was not supplied.
    pub fn translate(&self, lookup: &Lookup<'_>) -> Result<String, TranslateError> {
        translate_chain(std::iter::once(self), lookup)
    }

    /// [`translate`](Self::translate) that never fails: errors are logged and
    /// the source text is returned.
    #[must_use]
    pub fn tr_lossy(&self, lookup: &Lookup<'_>) -> String {
        lossy(self.translate(lookup), lookup)
    }

    /// The entry a lookup would use, if it is indexed.
    #[must_use]
    pub fn entry(&self, lookup: &Lookup<'_>) -> Option<&MessageEntry> {
        self.find(lookup.context, lookup.source_text, lookup.disambiguation)
    }

    pub(crate) fn resolve(&self, lookup: &Lookup<'_>) -> Resolution<'_> {
        match self.entry(lookup) {
            Some(entry) if entry.status == Status::Finished => Resolution::Finished(entry),
            Some(_) => Resolution::Unfinished,
            None if self
                .retired
                .contains(&(lookup.context.to_string(), lookup.source_text.to_string())) =>
            {
                Resolution::Vanished
            }
            None => Resolution::Missing,
        }
    }

    fn find(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&MessageEntry> {
        let slots = self.index.get(context)?.get(source)?;
        let slot = slots
            .iter()
            .find(|s| s.disambiguation.as_deref() == disambiguation)
            .or_else(|| {
                disambiguation?;
                slots.iter().find(|s| s.disambiguation.is_none())
            })?;
        self.catalog
            .contexts()
            .get(slot.context)?
            .messages
            .get(slot.message)
    }

    /// Format a finished entry under this store's rule and mode.
    fn render(&self, entry: &MessageEntry, lookup: &Lookup<'_>) -> Result<String, TranslateError> {
        let template = match &entry.translation {
            Translation::NonPlural(text) => text.as_str(),
            Translation::Plural(forms) => {
                let Some(count) = lookup.count else {
                    return Err(TranslateError::MissingPluralCount {
                        context: lookup.context.to_string(),
                        source_text: lookup.source_text.to_string(),
                    });
                };
                let Some(last) = forms.len().checked_sub(1) else {
                    return Ok(lookup.source_text.to_string());
                };
                let index = self.rule.index(count);
                if index > last {
                    diagnostics::record_clamped(
                        lookup.context,
                        lookup.source_text,
                        index,
                        forms.len(),
                    );
                }
                forms[index.min(last)].as_str()
            }
        };
        if template.is_empty() {
            return Ok(lookup.source_text.to_string());
        }
        Ok(format::format(
            template,
            &lookup.args,
            lookup.count,
            self.options.placeholder_mode,
        )?)
    }
}

/// Resolve `lookup` against `stores` in order. The first store holding a
/// finished entry formats it; otherwise the source text is returned.
pub(crate) fn translate_chain<'s>(
    stores: impl IntoIterator<Item = &'s CatalogStore>,
    lookup: &Lookup<'_>,
) -> Result<String, TranslateError> {
    diagnostics::record_lookup();

    let mut unfinished = false;
    let mut vanished = false;
    let mut log_missing = true;
    let mut first = true;
    for store in stores {
        if first {
            log_missing = store.options.log_missing;
            first = false;
        }
        match store.resolve(lookup) {
            Resolution::Finished(entry) => return store.render(entry, lookup),
            Resolution::Unfinished => unfinished = true,
            Resolution::Vanished => vanished = true,
            Resolution::Missing => {}
        }
    }

    if unfinished {
        diagnostics::record_unfinished(lookup.context, lookup.source_text);
    } else if vanished {
        diagnostics::record_vanished(lookup.context, lookup.source_text, log_missing);
    } else {
        diagnostics::record_missing(lookup.context, lookup.source_text, log_missing);
    }
    Ok(lookup.source_text.to_string())
}

pub(crate) fn lossy(result: Result<String, TranslateError>, lookup: &Lookup<'_>) -> String {
    match result {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(
                target: "tscat.lookup",
                context = lookup.context,
                source = lookup.source_text,
                error = %err,
                "translation failed; using source text"
            );
            lookup.source_text.to_string()
        }
    }
}
