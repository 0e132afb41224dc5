#![forbid(unsafe_code)]

//! CLDR plural rules mapped onto catalog plural-form indices.
//!
//! A catalog stores the plural forms of a message as an ordered list. Each
//! [`PluralRule`] knows which CLDR categories its locale distinguishes and in
//! which order they appear in that list, so `count -> category -> index` is a
//! pure lookup.
//!
//! # Invariants
//!
//! 1. Every `PluralRule` maps any `i64` to exactly one `PluralCategory`.
//! 2. [`PluralRule::index`] is always `< PluralRule::form_count()`.
//! 3. Rules are pure functions: same count always yields the same index.
//!
//! The [`PluralRuleTable`] is data: new locales are registered, never coded
//! into the store.

use core::fmt;
use std::collections::HashMap;

use crate::error::UnknownLocaleError;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "zero"),
            Self::One => write!(f, "one"),
            Self::Two => write!(f, "two"),
            Self::Few => write!(f, "few"),
            Self::Many => write!(f, "many"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A plural rule: count to category, and category to form index.
///
/// Built-in rules cover the common CLDR language groups for integer counts.
/// `Custom` takes a direct `count -> index` function for anything else.
#[derive(Clone, Copy)]
pub enum PluralRule {
    /// `one` for 1, `other` for everything else. Two forms.
    English,
    /// `one` for 0 and 1, `other` for everything else. Two forms.
    French,
    /// No plural distinction. One form.
    EastAsian,
    /// `one` / `few` / `many` on the last two digits. Three forms.
    Russian,
    /// `one` for 1, `few` for 2-4 (not 12-14), `many` otherwise. Three forms.
    Polish,
    /// `one` for 1, `few` for 2-4, `other` otherwise. Three forms.
    Czech,
    /// `zero`, `one`, `two`, `few` (3-10), `many` (11-99), `other`. Six forms.
    Arabic,
    /// Caller-supplied rule.
    Custom {
        forms: usize,
        select: fn(i64) -> usize,
    },
}

const ENGLISH_FORMS: &[PluralCategory] = &[PluralCategory::One, PluralCategory::Other];
const EAST_ASIAN_FORMS: &[PluralCategory] = &[PluralCategory::Other];
const SLAVIC_FORMS: &[PluralCategory] =
    &[PluralCategory::One, PluralCategory::Few, PluralCategory::Many];
const CZECH_FORMS: &[PluralCategory] =
    &[PluralCategory::One, PluralCategory::Few, PluralCategory::Other];
const ARABIC_FORMS: &[PluralCategory] = &[
    PluralCategory::Zero,
    PluralCategory::One,
    PluralCategory::Two,
    PluralCategory::Few,
    PluralCategory::Many,
    PluralCategory::Other,
];

impl PluralRule {
    /// The default rule used when a locale has no registered rule.
    pub const DEFAULT: Self = Self::English;

    /// Determine the plural category for the given count.
    ///
    /// `Custom` rules have no category vocabulary and report `Other`.
    #[must_use]
    pub fn categorize(&self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        match self {
            Self::English => english_rule(n),
            Self::French => french_rule(n),
            Self::EastAsian | Self::Custom { .. } => PluralCategory::Other,
            Self::Russian => russian_rule(n),
            Self::Polish => polish_rule(n),
            Self::Czech => czech_rule(n),
            Self::Arabic => arabic_rule(n),
        }
    }

    /// Ordered categories, one per plural form in the catalog.
    #[must_use]
    pub fn categories(&self) -> &'static [PluralCategory] {
        match self {
            Self::English | Self::French => ENGLISH_FORMS,
            Self::EastAsian => EAST_ASIAN_FORMS,
            Self::Russian | Self::Polish => SLAVIC_FORMS,
            Self::Czech => CZECH_FORMS,
            Self::Arabic => ARABIC_FORMS,
            Self::Custom { .. } => &[],
        }
    }

    /// Number of plural forms a catalog for this locale declares.
    #[must_use]
    pub fn form_count(&self) -> usize {
        match self {
            Self::Custom { forms, .. } => (*forms).max(1),
            _ => self.categories().len(),
        }
    }

    /// Form index for `count`, always in `0..form_count()`.
    #[must_use]
    pub fn index(&self, count: i64) -> usize {
        let last = self.form_count() - 1;
        if let Self::Custom { select, .. } = self {
            return select(count).min(last);
        }
        let category = self.categorize(count);
        self.categories()
            .iter()
            .position(|c| *c == category)
            .unwrap_or(last)
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => write!(f, "PluralRule::English"),
            Self::French => write!(f, "PluralRule::French"),
            Self::EastAsian => write!(f, "PluralRule::EastAsian"),
            Self::Russian => write!(f, "PluralRule::Russian"),
            Self::Polish => write!(f, "PluralRule::Polish"),
            Self::Czech => write!(f, "PluralRule::Czech"),
            Self::Arabic => write!(f, "PluralRule::Arabic"),
            Self::Custom { forms, .. } => write!(f, "PluralRule::Custom({forms} forms)"),
        }
    }
}

// ── Rule table ──────────────────────────────────────────────────────

/// Normalize a locale tag for table lookup: lowercase, `_` becomes `-`.
#[must_use]
pub fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

/// Primary language subtag of a locale tag (`"zh_TW"` -> `"zh"`).
#[must_use]
pub fn primary_subtag(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Locale to plural rule registry.
///
/// Lookups try the full normalized tag first, then its primary subtag, so
/// `zh_TW` resolves through `zh` unless a region-specific rule is registered.
#[derive(Debug, Clone, Default)]
pub struct PluralRuleTable {
    rules: HashMap<String, PluralRule>,
}

impl PluralRuleTable {
    /// An empty table. Every lookup fails until rules are registered.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table preloaded with the built-in language groups.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        let groups: [(&[&str], PluralRule); 7] = [
            (
                &[
                    "en", "de", "nl", "sv", "da", "no", "nb", "nn", "it", "es", "pt", "el", "hu",
                    "fi", "et", "he", "tr", "bg", "ca", "eo", "eu", "gl", "af", "sq", "ur",
                ],
                PluralRule::English,
            ),
            (&["fr", "hi", "bn", "pt-br", "hy", "fil"], PluralRule::French),
            (
                &["zh", "ja", "ko", "th", "vi", "id", "ms", "lo", "my", "km", "fa"],
                PluralRule::EastAsian,
            ),
            (&["ru", "uk", "be", "hr", "sr", "bs"], PluralRule::Russian),
            (&["pl"], PluralRule::Polish),
            (&["cs", "sk"], PluralRule::Czech),
            (&["ar"], PluralRule::Arabic),
        ];
        for (locales, rule) in groups {
            for locale in locales {
                table.register(*locale, rule);
            }
        }
        table
    }

    /// Register (or replace) the rule for a locale tag.
    pub fn register(&mut self, locale: impl AsRef<str>, rule: PluralRule) {
        self.rules.insert(normalize_locale(locale.as_ref()), rule);
    }

    /// Resolve the rule for `locale`.
    pub fn rule(&self, locale: &str) -> Result<PluralRule, UnknownLocaleError> {
        let normalized = normalize_locale(locale);
        if let Some(rule) = self.rules.get(&normalized) {
            return Ok(*rule);
        }
        self.rules
            .get(primary_subtag(&normalized))
            .copied()
            .ok_or_else(|| UnknownLocaleError {
                locale: locale.to_string(),
            })
    }

    /// Resolve the rule for `locale`, falling back to [`PluralRule::DEFAULT`].
    #[must_use]
    pub fn rule_or_default(&self, locale: &str) -> PluralRule {
        match self.rule(locale) {
            Ok(rule) => rule,
            Err(err) => {
                tracing::warn!(
                    target: "tscat.locale",
                    locale = %err.locale,
                    "no plural rule registered; using two-form default"
                );
                PluralRule::DEFAULT
            }
        }
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no tags are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ── Rule implementations ────────────────────────────────────────────

fn english_rule(n: u64) -> PluralCategory {
    if n == 1 {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}

fn french_rule(n: u64) -> PluralCategory {
    if n <= 1 {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}

fn russian_rule(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;

    if mod10 == 1 && mod100 != 11 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

fn polish_rule(n: u64) -> PluralCategory {
    let mod10 = n % 10;
    let mod100 = n % 100;

    if n == 1 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

fn czech_rule(n: u64) -> PluralCategory {
    match n {
        1 => PluralCategory::One,
        2..=4 => PluralCategory::Few,
        _ => PluralCategory::Other,
    }
}

fn arabic_rule(n: u64) -> PluralCategory {
    let mod100 = n % 100;
    match n {
        0 => PluralCategory::Zero,
        1 => PluralCategory::One,
        2 => PluralCategory::Two,
        _ if (3..=10).contains(&mod100) => PluralCategory::Few,
        _ if (11..=99).contains(&mod100) => PluralCategory::Many,
        _ => PluralCategory::Other,
    }
}
