#![forbid(unsafe_code)]

//! Completion statistics for a catalog.

use serde::Serialize;

use crate::catalog::{Catalog, MessageContext, Status};

/// Whole-catalog statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogReport {
    /// Target language of the catalog, if declared.
    pub language: Option<String>,
    pub totals: Counts,
    /// Per-context data in document order.
    pub contexts: Vec<ContextReport>,
}

/// Status counts for a group of entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Counts {
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub plural: usize,
    /// `finished / (finished + unfinished)`, 100 when there is nothing to
    /// translate.
    pub completion_percent: f32,
}

impl Counts {
    fn add(&mut self, status: Status, plural: bool) {
        self.total += 1;
        match status {
            Status::Finished => self.finished += 1,
            Status::Unfinished => self.unfinished += 1,
            Status::Vanished => self.vanished += 1,
        }
        if plural {
            self.plural += 1;
        }
    }

    fn finish(mut self) -> Self {
        let active = self.finished + self.unfinished;
        self.completion_percent = if active == 0 {
            100.0
        } else {
            (self.finished as f32 / active as f32) * 100.0
        };
        self
    }
}

/// Per-context statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextReport {
    pub name: String,
    pub counts: Counts,
    /// Source texts of unfinished entries.
    pub untranslated: Vec<String>,
}

impl ContextReport {
    fn from_context(context: &MessageContext) -> Self {
        let mut counts = Counts::default();
        let mut untranslated = Vec::new();
        for entry in &context.messages {
            counts.add(entry.status, entry.is_plural());
            if entry.status == Status::Unfinished {
                untranslated.push(entry.source_text.clone());
            }
        }
        Self {
            name: context.name.clone(),
            counts: counts.finish(),
            untranslated,
        }
    }
}

impl CatalogReport {
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let contexts: Vec<ContextReport> = catalog
            .contexts()
            .iter()
            .map(ContextReport::from_context)
            .collect();
        let mut totals = Counts::default();
        for ctx in &contexts {
            totals.total += ctx.counts.total;
            totals.finished += ctx.counts.finished;
            totals.unfinished += ctx.counts.unfinished;
            totals.vanished += ctx.counts.vanished;
            totals.plural += ctx.counts.plural;
        }
        Self {
            language: catalog.language.clone(),
            totals: totals.finish(),
            contexts,
        }
    }

    /// Context report by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&ContextReport> {
        self.contexts.iter().find(|c| c.name == name)
    }
}
