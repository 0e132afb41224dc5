#![forbid(unsafe_code)]

//! Translation document to [`Catalog`].
//!
//! The parser is a pure function of its input. Well-formedness problems
//! surface as [`CatalogError::Malformed`]; structural problems (missing
//! context name or source text, duplicate keys) as
//! [`CatalogError::SchemaViolation`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::catalog::{Catalog, Location, MessageContext, MessageEntry, Status, Translation};
use crate::error::{CatalogError, Result};
use crate::xml::{self, Element, XmlError};

/// Knobs for [`parse_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep vanished entries in the catalog for tooling. They are never
    /// indexed for lookup either way.
    pub retain_vanished: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            retain_vanished: true,
        }
    }
}

impl From<XmlError> for CatalogError {
    fn from(err: XmlError) -> Self {
        Self::Malformed {
            line: err.position.line,
            column: err.position.col,
            message: err.message,
        }
    }
}

/// Parse a catalog document with default options.
pub fn parse(input: &str) -> Result<Catalog> {
    parse_with(input, ParseOptions::default())
}

/// Read and parse a catalog file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Catalog> {
    parse_file_with(path, ParseOptions::default())
}

pub fn parse_file_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Catalog> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with(&input, options)
}

pub fn parse_with(input: &str, options: ParseOptions) -> Result<Catalog> {
    let span = tracing::debug_span!(target: "tscat.parse", "parse_catalog", bytes = input.len());
    let _guard = span.enter();

    let root = xml::parse_document(input)?;
    if root.name != "TS" {
        return Err(CatalogError::Malformed {
            line: root.position.line,
            column: root.position.col,
            message: format!("expected <TS> root element, found <{}>", root.name),
        });
    }

    let mut builder = CatalogBuilder::new(options);
    for element in root.elements() {
        if element.name == "context" {
            builder.context(element)?;
        }
    }

    let catalog = Catalog::new(
        root.attribute("language").map(str::to_string),
        root.attribute("sourcelanguage").map(str::to_string),
        root.attribute("version").map(str::to_string),
        builder.contexts,
    );
    tracing::debug!(
        target: "tscat.parse",
        language = catalog.language.as_deref().unwrap_or(""),
        contexts = catalog.contexts().len(),
        messages = catalog.len(),
        dropped = builder.dropped,
        "catalog parsed"
    );
    Ok(catalog)
}

struct CatalogBuilder {
    options: ParseOptions,
    contexts: Vec<MessageContext>,
    by_name: HashMap<String, usize>,
    active_keys: HashSet<(String, String, Option<String>)>,
    locations: LocationTracker,
    dropped: usize,
}

impl CatalogBuilder {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            contexts: Vec::new(),
            by_name: HashMap::new(),
            active_keys: HashSet::new(),
            locations: LocationTracker::default(),
            dropped: 0,
        }
    }

    fn context(&mut self, element: &Element) -> Result<()> {
        let messages: Vec<&Element> = element
            .elements()
            .filter(|e| e.name == "message")
            .collect();
        let Some(name) = element
            .child("name")
            .map(Element::text)
            .filter(|n| !n.is_empty())
        else {
            if messages.iter().any(|m| !is_vanished(m)) {
                return Err(CatalogError::schema("", "context without a <name>"));
            }
            let dropped = messages.len();
            tracing::debug!(
                target: "tscat.parse",
                dropped,
                "dropping unnamed context holding only vanished messages"
            );
            self.dropped += dropped;
            return Ok(());
        };

        for message in messages {
            if let Some(entry) = self.message(&name, message)? {
                self.push(entry);
            }
        }
        Ok(())
    }

    fn push(&mut self, entry: MessageEntry) {
        let index = match self.by_name.get(&entry.context) {
            Some(&index) => index,
            None => {
                self.contexts.push(MessageContext {
                    name: entry.context.clone(),
                    messages: Vec::new(),
                });
                let index = self.contexts.len() - 1;
                self.by_name.insert(entry.context.clone(), index);
                index
            }
        };
        self.contexts[index].messages.push(entry);
    }

    fn message(&mut self, context: &str, element: &Element) -> Result<Option<MessageEntry>> {
        let plural = element.attribute("numerus") == Some("yes");

        let mut locations = Vec::new();
        for loc in element.elements().filter(|e| e.name == "location") {
            locations.push(self.locations.resolve(loc));
        }

        let translation_el = element.child("translation");
        let status_attr = translation_el.and_then(|t| t.attribute("type"));
        let vanished = is_vanished(element);

        let Some(source_text) = element.child("source").map(Element::text) else {
            if vanished {
                tracing::debug!(
                    target: "tscat.parse",
                    context,
                    "dropping vanished message without <source>"
                );
                self.dropped += 1;
                return Ok(None);
            }
            return Err(CatalogError::schema(context, "message without <source>"));
        };

        if vanished && !self.options.retain_vanished {
            self.dropped += 1;
            return Ok(None);
        }

        let translation = match translation_el {
            Some(t) if plural => Translation::Plural(plural_forms(t)),
            Some(t) => Translation::NonPlural(first_variant(t)),
            None if plural => Translation::Plural(Vec::new()),
            None => Translation::NonPlural(String::new()),
        };

        let status = match status_attr {
            Some("vanished" | "obsolete") => Status::Vanished,
            Some("unfinished") => Status::Unfinished,
            _ if translation.is_empty() => Status::Unfinished,
            _ => Status::Finished,
        };

        let disambiguation = element
            .child("comment")
            .map(Element::text)
            .filter(|c| !c.is_empty());

        if status.is_active() {
            let key = (
                context.to_string(),
                source_text.clone(),
                disambiguation.clone(),
            );
            if !self.active_keys.insert(key) {
                return Err(CatalogError::schema(
                    context,
                    format!("duplicate message {source_text:?}"),
                ));
            }
        }

        Ok(Some(MessageEntry {
            context: context.to_string(),
            source_text,
            disambiguation,
            translation,
            status,
            locations,
            extra_comment: element.child("extracomment").map(Element::text),
            translator_comment: element.child("translatorcomment").map(Element::text),
        }))
    }
}

fn is_vanished(message: &Element) -> bool {
    matches!(
        message
            .child("translation")
            .and_then(|t| t.attribute("type")),
        Some("vanished" | "obsolete")
    )
}

/// Ordered `<numerusform>` bodies. A translation without any numerusform
/// children contributes its own text as the single form, if non-empty.
fn plural_forms(translation: &Element) -> Vec<String> {
    let forms: Vec<String> = translation
        .elements()
        .filter(|e| e.name == "numerusform")
        .map(first_variant)
        .collect();
    if !forms.is_empty() {
        return forms;
    }
    let text = translation.text();
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

/// Element text, or the first `<lengthvariant>` when variants are present.
fn first_variant(element: &Element) -> String {
    match element.child("lengthvariant") {
        Some(variant) => variant.text(),
        None => element.text(),
    }
}

/// Resolves relative `line="+N"` offsets against the previous line seen for
/// the same file. Filenames are inherited from the previous location.
#[derive(Default)]
struct LocationTracker {
    current_file: String,
    last_line: HashMap<String, i64>,
}

impl LocationTracker {
    fn resolve(&mut self, element: &Element) -> Location {
        if let Some(filename) = element.attribute("filename") {
            self.current_file = filename.to_string();
        }
        let line = element.attribute("line").and_then(|raw| {
            let raw = raw.trim();
            let previous = self.last_line.get(&self.current_file).copied().unwrap_or(0);
            let absolute = if let Some(delta) = raw.strip_prefix('+') {
                previous + delta.parse::<i64>().ok()?
            } else if raw.starts_with('-') {
                previous + raw.parse::<i64>().ok()?
            } else {
                raw.parse::<i64>().ok()?
            };
            self.last_line.insert(self.current_file.clone(), absolute);
            u32::try_from(absolute).ok()
        });
        Location {
            filename: self.current_file.clone(),
            line,
        }
    }
}
