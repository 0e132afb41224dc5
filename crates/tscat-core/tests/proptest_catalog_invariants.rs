//! Property-based invariant tests for the catalog engine.
//!
//! 1.  Every built-in plural rule yields an index below its form count
//! 2.  Plural rules are deterministic: same count -> same index
//! 3.  East-Asian rule always selects the single form
//! 4.  English: index 0 for +-1, index 1 otherwise
//! 5.  Formatting a template without `%` is identity
//! 6.  Substituted arguments are never rescanned
//! 7.  Lenient formatting never fails
//! 8.  Strict formatting with nine arguments never fails
//! 9.  Missing keys return the source text verbatim
//! 10. Write -> parse preserves a message
//! 11. The parser never panics on arbitrary input
//! 12. Report completion percent is in [0, 100]
//! 13. tr_lossy never returns empty for a non-empty source

use proptest::prelude::*;
use tscat_core::{
    Catalog, CatalogReport, CatalogStore, Location, Lookup, MessageContext, MessageEntry,
    PlaceholderMode, PluralRule, Status, Translation, format, parse, write,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn all_built_in_rules() -> Vec<PluralRule> {
    vec![
        PluralRule::English,
        PluralRule::French,
        PluralRule::EastAsian,
        PluralRule::Russian,
        PluralRule::Polish,
        PluralRule::Czech,
        PluralRule::Arabic,
    ]
}

fn single_message(context: &str, entry: MessageEntry) -> Catalog {
    Catalog::new(
        Some("zh_TW".into()),
        None,
        Some("2.1".into()),
        vec![MessageContext {
            name: context.to_string(),
            messages: vec![entry],
        }],
    )
}

fn empty_store() -> CatalogStore {
    CatalogStore::new(Catalog::default(), "en", PluralRule::English)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Index below form count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rule_index_in_range(count in any::<i64>()) {
        for rule in all_built_in_rules() {
            let index = rule.index(count);
            prop_assert!(
                index < rule.form_count(),
                "rule {:?} returned index {} for count {}",
                rule, index, count
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Deterministic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn plural_rules_deterministic(count in any::<i64>()) {
        for rule in all_built_in_rules() {
            prop_assert_eq!(rule.index(count), rule.index(count));
            prop_assert_eq!(rule.categorize(count), rule.categorize(count));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. East-Asian single form
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn east_asian_always_first_form(count in any::<i64>()) {
        prop_assert_eq!(PluralRule::EastAsian.index(count), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. English
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn english_one_or_other(count in any::<i64>()) {
        let index = PluralRule::English.index(count);
        if count == 1 || count == -1 {
            prop_assert_eq!(index, 0);
        } else {
            prop_assert_eq!(index, 1);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. No placeholders -> identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn format_without_percent_is_identity(text in "[^%]*") {
        let out = format(&text, &["a", "b"], Some(3), PlaceholderMode::Strict).unwrap();
        prop_assert_eq!(out, text);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. No rescanning
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arguments_are_not_rescanned(arg in ".*") {
        let out = format("%1", &[arg.as_str()], Some(5), PlaceholderMode::Strict).unwrap();
        prop_assert_eq!(out, arg);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7-8. Formatting totality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lenient_never_fails(template in ".*", n_args in 0usize..=9, count in proptest::option::of(any::<i64>())) {
        let args: Vec<&str> = ["a", "b", "c", "d", "e", "f", "g", "h", "i"][..n_args].to_vec();
        prop_assert!(format(&template, &args, count, PlaceholderMode::Lenient).is_ok());
    }

    #[test]
    fn strict_with_all_args_never_fails(template in ".*") {
        let args = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];
        prop_assert!(format(&template, &args, None, PlaceholderMode::Strict).is_ok());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Missing keys
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn missing_key_returns_source(context in "[A-Za-z]{1,12}", source in ".*", arg in ".*") {
        let store = empty_store();
        let out = store
            .translate(&Lookup::new(&context, &source).arg(&arg).count(2))
            .unwrap();
        prop_assert_eq!(out, source);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 10. Write -> parse
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn write_then_parse_preserves_message(
        context in "[A-Za-z][A-Za-z0-9_]{0,11}",
        source in "\\PC*",
        translation in "\\PC+",
        disambiguation in proptest::option::of("\\PC+"),
        line in proptest::option::of(1u32..100_000),
    ) {
        let entry = MessageEntry {
            context: context.clone(),
            source_text: source,
            disambiguation,
            translation: Translation::NonPlural(translation),
            status: Status::Finished,
            locations: vec![Location { filename: "../forms/x.ui".into(), line }],
            extra_comment: None,
            translator_comment: None,
        };
        let catalog = single_message(&context, entry);
        let parsed = parse(&write(&catalog)).unwrap();
        prop_assert_eq!(parsed, catalog);
    }

    #[test]
    fn write_then_parse_preserves_plural_forms(
        forms in proptest::collection::vec("\\PC+", 1..4),
    ) {
        let entry = MessageEntry {
            context: "Intro".into(),
            source_text: "%n GB".into(),
            disambiguation: None,
            translation: Translation::Plural(forms),
            status: Status::Finished,
            locations: Vec::new(),
            extra_comment: None,
            translator_comment: None,
        };
        let catalog = single_message("Intro", entry);
        let parsed = parse(&write(&catalog)).unwrap();
        prop_assert_eq!(parsed, catalog);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 11. Parser totality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parser_never_panics(input in ".*") {
        let _ = parse(&input);
    }

    #[test]
    fn parser_never_panics_on_markup_soup(
        parts in proptest::collection::vec(
            prop_oneof![
                Just("<TS>"), Just("</TS>"), Just("<context>"), Just("</context>"),
                Just("<name>"), Just("</name>"), Just("<message numerus=\"yes\">"),
                Just("</message>"), Just("<source>"), Just("</source>"),
                Just("<translation type=\"vanished\">"), Just("</translation>"),
                Just("<numerusform>"), Just("</numerusform>"), Just("&amp;"),
                Just("&bogus;"), Just("<![CDATA[x]]>"), Just("<!-- c -->"), Just("text"),
            ],
            0..40,
        )
    ) {
        let _ = parse(&parts.concat());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 12. Report bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn completion_percent_bounded(statuses in proptest::collection::vec(0u8..3, 0..20)) {
        let messages = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| MessageEntry {
                context: "C".into(),
                source_text: format!("m{i}"),
                disambiguation: None,
                translation: Translation::NonPlural("t".into()),
                status: match s {
                    0 => Status::Finished,
                    1 => Status::Unfinished,
                    _ => Status::Vanished,
                },
                locations: Vec::new(),
                extra_comment: None,
                translator_comment: None,
            })
            .collect();
        let catalog = Catalog::new(None, None, None, vec![MessageContext { name: "C".into(), messages }]);
        let report = CatalogReport::from_catalog(&catalog);
        prop_assert!((0.0..=100.0).contains(&report.totals.completion_percent));
        prop_assert_eq!(report.totals.total, statuses.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 13. tr_lossy
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tr_lossy_never_empty(source in ".+", count in proptest::option::of(any::<i64>())) {
        let store = empty_store();
        let mut lookup = Lookup::new("C", &source);
        if let Some(n) = count {
            lookup = lookup.count(n);
        }
        prop_assert!(!store.tr_lossy(&lookup).is_empty());
    }
}
