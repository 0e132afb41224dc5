#![forbid(unsafe_code)]

//! Consistency checks on finished translations.
//!
//! - A positional placeholder used by the source but not the translation
//!   ([`LintKind::MissingPlaceholder`]) or the reverse
//!   ([`LintKind::UnexpectedPlaceholder`]). Strict formatting would fail on
//!   the latter.
//! - A plural entry whose form count differs from the locale rule
//!   ([`LintKind::PluralFormCount`]). Lookups would clamp.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::catalog::{Catalog, MessageEntry, Status, Translation};
use crate::format::{Placeholder, placeholders};
use crate::plural::PluralRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LintKind {
    MissingPlaceholder { index: usize },
    UnexpectedPlaceholder { index: usize },
    PluralFormCount { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub context: String,
    pub source_text: String,
    pub disambiguation: Option<String>,
    /// Plural form the finding applies to, if any.
    pub form: Option<usize>,
    #[serde(flatten)]
    pub kind: LintKind,
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.context, self.source_text)?;
        if let Some(form) = self.form {
            write!(f, " [form {form}]")?;
        }
        match self.kind {
            LintKind::MissingPlaceholder { index } => {
                write!(f, ": translation does not use %{index}")
            }
            LintKind::UnexpectedPlaceholder { index } => {
                write!(f, ": translation uses %{index}, which the source does not")
            }
            LintKind::PluralFormCount { expected, found } => {
                write!(f, ": {found} plural forms, locale expects {expected}")
            }
        }
    }
}

/// Check every finished entry of `catalog` against `rule`.
#[must_use]
pub fn lint(catalog: &Catalog, rule: PluralRule) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    for entry in catalog.entries().filter(|e| e.status == Status::Finished) {
        lint_entry(entry, rule, &mut findings);
    }
    tracing::debug!(
        target: "tscat.lint",
        entries = catalog.len(),
        findings = findings.len(),
        "lint finished"
    );
    findings
}

fn lint_entry(entry: &MessageEntry, rule: PluralRule, out: &mut Vec<LintFinding>) {
    let finding = |form: Option<usize>, kind: LintKind| LintFinding {
        context: entry.context.clone(),
        source_text: entry.source_text.clone(),
        disambiguation: entry.disambiguation.clone(),
        form,
        kind,
    };
    let expected = positionals(&entry.source_text);

    match &entry.translation {
        Translation::NonPlural(text) => {
            for kind in compare(&expected, &positionals(text)) {
                out.push(finding(None, kind));
            }
        }
        Translation::Plural(forms) => {
            if forms.len() != rule.form_count() {
                out.push(finding(
                    None,
                    LintKind::PluralFormCount {
                        expected: rule.form_count(),
                        found: forms.len(),
                    },
                ));
            }
            for (i, form) in forms.iter().enumerate().filter(|(_, f)| !f.is_empty()) {
                for kind in compare(&expected, &positionals(form)) {
                    out.push(finding(Some(i), kind));
                }
            }
        }
    }
}

fn positionals(text: &str) -> BTreeSet<usize> {
    placeholders(text)
        .into_iter()
        .filter_map(|p| match p {
            Placeholder::Positional(i) => Some(i),
            Placeholder::Count => None,
        })
        .collect()
}

fn compare(source: &BTreeSet<usize>, translation: &BTreeSet<usize>) -> Vec<LintKind> {
    let missing = source
        .difference(translation)
        .map(|&index| LintKind::MissingPlaceholder { index });
    let unexpected = translation
        .difference(source)
        .map(|&index| LintKind::UnexpectedPlaceholder { index });
    missing.chain(unexpected).collect()
}
