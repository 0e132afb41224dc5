#![forbid(unsafe_code)]

//! Translation catalog engine for tscat.
//!
//! Loads Qt Linguist `.ts` catalogs, resolves
//! `(context, source, disambiguation, count)` lookups to localized strings,
//! selects plural forms by locale rule, and substitutes `%1`..`%9`, `%n` and
//! `%%` placeholders.
//!
//! # Role in tscat
//! `tscat-core` is the whole engine; the `tscat` binary is a thin command
//! line over it. Catalogs are parsed once, indexed into immutable stores and
//! shared behind handles. A locale change replaces the handle wholesale.
//!
//! # Quick start
//!
//! ```
//! use tscat_core::{CatalogStore, Lookup, PluralRule, parse};
//!
//! let catalog = parse(
//!     r#"<TS version="2.1" language="zh_TW"><context><name>Intro</name>
//!        <message numerus="yes"><source>%n GB of free space available</source>
//!        <translation><numerusform>可用空間尚存 %n GB</numerusform></translation>
//!        </message></context></TS>"#,
//! )?;
//! let store = CatalogStore::new(catalog, "zh_TW", PluralRule::EastAsian);
//! let text = store.translate(&Lookup::new("Intro", "%n GB of free space available").count(7))?;
//! assert_eq!(text, "可用空間尚存 7 GB");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod handle;
pub mod lint;
pub mod parser;
pub mod plural;
pub mod report;
pub mod resolver;
pub mod store;
pub mod writer;
pub mod xml;

pub use catalog::{Catalog, Location, MessageContext, MessageEntry, MessageKey, Status, Translation};
pub use config::EngineConfig;
pub use error::{CatalogError, ConfigError, TranslateError, UnknownLocaleError};
pub use format::{PlaceholderIndexError, PlaceholderMode, format};
pub use handle::{CatalogHandle, Localizer, load_catalog, load_catalog_with};
pub use lint::{LintFinding, LintKind, lint};
pub use parser::{ParseOptions, parse, parse_file, parse_file_with, parse_with};
pub use plural::{PluralCategory, PluralRule, PluralRuleTable};
pub use report::{CatalogReport, ContextReport, Counts};
pub use resolver::LocaleResolver;
pub use store::{CatalogStore, Lookup, StoreOptions};
pub use writer::write;
