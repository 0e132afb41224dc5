#![forbid(unsafe_code)]

//! Placeholder substitution for translated templates.
//!
//! Recognized tokens, scanned left to right in a single pass:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `%1`..`%9` | positional argument, 1-indexed |
//! | `%n` | decimal rendering of the count |
//! | `%%` | literal `%` |
//!
//! Anything else after a `%` is copied through unchanged, as is `%n` when no
//! count is supplied. Substituted values are never rescanned.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How out-of-range positional references are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderMode {
    /// `%3` with fewer than three arguments is an error.
    #[default]
    Strict,
    /// `%3` with fewer than three arguments renders as nothing.
    Lenient,
}

impl PlaceholderMode {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lenient" => Some(Self::Lenient),
            _ => None,
        }
    }
}

/// A positional placeholder referenced an argument that was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("placeholder %{index} references a missing argument ({supplied} supplied)")]
pub struct PlaceholderIndexError {
    pub index: usize,
    pub supplied: usize,
}

/// A recognized token in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    Positional(usize),
    Count,
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positional(i) => write!(f, "%{i}"),
            Self::Count => write!(f, "%n"),
        }
    }
}

/// Substitute placeholders in `template`.
///
/// # Example
///
/// ```
/// use tscat_core::format::{format, PlaceholderMode};
///
/// let out = format("%1 and %2", &["A", "B"], None, PlaceholderMode::Strict).unwrap();
/// assert_eq!(out, "A and B");
/// let out = format("%n GB (100%%)", &[], Some(4), PlaceholderMode::Strict).unwrap();
/// assert_eq!(out, "4 GB (100%)");
/// ```
pub fn format(
    template: &str,
    args: &[&str],
    count: Option<i64>,
    mode: PlaceholderMode,
) -> Result<String, PlaceholderIndexError> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            result.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                result.push('%');
            }
            Some('n') if count.is_some() => {
                chars.next();
                if let Some(n) = count {
                    result.push_str(&n.to_string());
                }
            }
            Some(d @ '1'..='9') => {
                chars.next();
                let index = d as usize - '0' as usize;
                match args.get(index - 1) {
                    Some(value) => result.push_str(value),
                    None if mode == PlaceholderMode::Lenient => {}
                    None => {
                        return Err(PlaceholderIndexError {
                            index,
                            supplied: args.len(),
                        });
                    }
                }
            }
            // Unrecognized or trailing: literal.
            _ => result.push('%'),
        }
    }

    Ok(result)
}

/// Every recognized placeholder in `template`, in order of appearance.
///
/// `%%` is a literal and is not reported.
#[must_use]
pub fn placeholders(template: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
            }
            Some('n') => {
                chars.next();
                found.push(Placeholder::Count);
            }
            Some(d @ '1'..='9') => {
                chars.next();
                found.push(Placeholder::Positional(d as usize - '0' as usize));
            }
            _ => {}
        }
    }
    found
}
