#![forbid(unsafe_code)]

//! Immutable catalog model.
//!
//! A [`Catalog`] is the parsed form of one translation document: document
//! attributes plus an ordered list of [`MessageContext`]s, each holding its
//! [`MessageEntry`] records in document order. Nothing here is mutated after
//! the parser hands it over; a locale change builds a new catalog.

use serde::Serialize;

/// Translation status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Ready to use.
    Finished,
    /// Present but not reviewed or empty. Lookups fall back to the source.
    Unfinished,
    /// Retired from the source code. Kept for tooling, never returned.
    Vanished,
}

impl Status {
    /// Whether lookups may index this entry.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Vanished)
    }
}

/// Translated body of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Translation {
    NonPlural(String),
    /// Forms ordered by the locale's plural categories.
    Plural(Vec<String>),
}

impl Translation {
    #[must_use]
    pub fn is_plural(&self) -> bool {
        matches!(self, Self::Plural(_))
    }

    /// True when no variant carries text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::NonPlural(text) => text.is_empty(),
            Self::Plural(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// Every variant, in order. A non-plural translation has exactly one.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::NonPlural(text) => std::slice::from_ref(text),
            Self::Plural(forms) => forms,
        };
        slice.iter().map(String::as_str)
    }
}

/// Source location recorded for tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub filename: String,
    /// Absolute line, if the document carried one.
    pub line: Option<u32>,
}

/// The atomic translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEntry {
    pub context: String,
    pub source_text: String,
    /// Secondary key distinguishing identical source phrases.
    pub disambiguation: Option<String>,
    pub translation: Translation,
    pub status: Status,
    pub locations: Vec<Location>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
}

impl MessageEntry {
    #[must_use]
    pub fn is_plural(&self) -> bool {
        self.translation.is_plural()
    }

    /// The identifying key within a catalog.
    #[must_use]
    pub fn key(&self) -> MessageKey<'_> {
        MessageKey {
            context: &self.context,
            source_text: &self.source_text,
            disambiguation: self.disambiguation.as_deref(),
        }
    }
}

/// Borrowed `(context, source, disambiguation)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey<'a> {
    pub context: &'a str,
    pub source_text: &'a str,
    pub disambiguation: Option<&'a str>,
}

impl std::fmt::Display for MessageKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{:?}", self.context, self.source_text)?;
        if let Some(d) = self.disambiguation {
            write!(f, " ({d})")?;
        }
        Ok(())
    }
}

/// Named grouping of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContext {
    pub name: String,
    pub messages: Vec<MessageEntry>,
}

/// A parsed translation document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Catalog {
    /// Target language (`language` attribute), e.g. `zh_TW`.
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub version: Option<String>,
    pub(crate) contexts: Vec<MessageContext>,
}

impl Catalog {
    #[must_use]
    pub fn new(
        language: Option<String>,
        source_language: Option<String>,
        version: Option<String>,
        contexts: Vec<MessageContext>,
    ) -> Self {
        Self {
            language,
            source_language,
            version,
            contexts,
        }
    }

    /// Contexts in document order.
    #[must_use]
    pub fn contexts(&self) -> &[MessageContext] {
        &self.contexts
    }

    #[must_use]
    pub fn context(&self, name: &str) -> Option<&MessageContext> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Every entry in document order, vanished ones included.
    pub fn entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.contexts.iter().flat_map(|c| c.messages.iter())
    }

    /// Total number of entries, vanished ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of this catalog without vanished entries. Contexts left empty
    /// are removed.
    #[must_use]
    pub fn without_vanished(&self) -> Self {
        let contexts = self
            .contexts
            .iter()
            .filter_map(|ctx| {
                let messages: Vec<MessageEntry> = ctx
                    .messages
                    .iter()
                    .filter(|m| m.status.is_active())
                    .cloned()
                    .collect();
                (!messages.is_empty()).then(|| MessageContext {
                    name: ctx.name.clone(),
                    messages,
                })
            })
            .collect();
        Self {
            language: self.language.clone(),
            source_language: self.source_language.clone(),
            version: self.version.clone(),
            contexts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, status: Status) -> MessageEntry {
        MessageEntry {
            context: "Ctx".into(),
            source_text: source.into(),
            disambiguation: None,
            translation: Translation::NonPlural(format!("t:{source}")),
            status,
            locations: Vec::new(),
            extra_comment: None,
            translator_comment: None,
        }
    }

    #[test]
    fn translation_variants() {
        let single = Translation::NonPlural("x".into());
        assert_eq!(single.variants().collect::<Vec<_>>(), vec!["x"]);
        let plural = Translation::Plural(vec!["a".into(), String::new()]);
        assert!(plural.is_plural());
        assert!(!plural.is_empty());
        assert!(Translation::Plural(vec![String::new()]).is_empty());
        assert!(Translation::Plural(Vec::new()).is_empty());
    }

    #[test]
    fn key_display() {
        let mut e = entry("Copy", Status::Finished);
        assert_eq!(e.key().to_string(), "Ctx::\"Copy\"");
        e.disambiguation = Some("address".into());
        assert_eq!(e.key().to_string(), "Ctx::\"Copy\" (address)");
    }

    #[test]
    fn without_vanished_drops_entries_and_empty_contexts() {
        let catalog = Catalog::new(
            Some("zh_TW".into()),
            None,
            Some("2.1".into()),
            vec![
                MessageContext {
                    name: "Ctx".into(),
                    messages: vec![entry("a", Status::Finished), entry("b", Status::Vanished)],
                },
                MessageContext {
                    name: "Old".into(),
                    messages: vec![entry("c", Status::Vanished)],
                },
            ],
        );
        assert_eq!(catalog.len(), 3);
        let trimmed = catalog.without_vanished();
        assert_eq!(trimmed.len(), 1);
        assert!(trimmed.context("Old").is_none());
        assert_eq!(trimmed.language.as_deref(), Some("zh_TW"));
    }
}
