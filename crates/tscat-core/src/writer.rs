#![forbid(unsafe_code)]

//! [`Catalog`] back to a translation document.
//!
//! Output follows the layout the translation tools produce: declaration,
//! doctype, four-space indentation, absolute location lines. Parsing the
//! output yields an equivalent catalog.

use std::fmt::Write as _;

use crate::catalog::{Catalog, MessageEntry, Status, Translation};

const INDENT: &str = "    ";

/// Serialize `catalog`.
#[must_use]
pub fn write(catalog: &Catalog) -> String {
    let mut out = String::with_capacity(catalog.len() * 160);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");
    out.push_str("<TS");
    push_attr(&mut out, "version", catalog.version.as_deref().unwrap_or("2.1"));
    if let Some(language) = &catalog.language {
        push_attr(&mut out, "language", language);
    }
    if let Some(source_language) = &catalog.source_language {
        push_attr(&mut out, "sourcelanguage", source_language);
    }
    out.push_str(">\n");

    for context in catalog.contexts() {
        out.push_str("<context>\n");
        push_element(&mut out, 1, "name", &context.name);
        for message in &context.messages {
            write_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }
    out.push_str("</TS>\n");
    out
}

fn write_message(out: &mut String, message: &MessageEntry) {
    out.push_str(INDENT);
    out.push_str("<message");
    if message.is_plural() {
        push_attr(out, "numerus", "yes");
    }
    out.push_str(">\n");

    for location in &message.locations {
        out.push_str(INDENT);
        out.push_str(INDENT);
        out.push_str("<location");
        push_attr(out, "filename", &location.filename);
        if let Some(line) = location.line {
            push_attr(out, "line", &line.to_string());
        }
        out.push_str("/>\n");
    }
    push_element(out, 2, "source", &message.source_text);
    if let Some(comment) = &message.disambiguation {
        push_element(out, 2, "comment", comment);
    }
    if let Some(extra) = &message.extra_comment {
        push_element(out, 2, "extracomment", extra);
    }
    if let Some(note) = &message.translator_comment {
        push_element(out, 2, "translatorcomment", note);
    }

    out.push_str(INDENT);
    out.push_str(INDENT);
    out.push_str("<translation");
    match message.status {
        Status::Finished => {}
        Status::Unfinished => push_attr(out, "type", "unfinished"),
        Status::Vanished => push_attr(out, "type", "vanished"),
    }
    match &message.translation {
        Translation::NonPlural(text) => {
            out.push('>');
            push_escaped(out, text, false);
        }
        Translation::Plural(forms) => {
            out.push_str(">\n");
            for form in forms {
                push_element(out, 3, "numerusform", form);
            }
            out.push_str(INDENT);
            out.push_str(INDENT);
        }
    }
    out.push_str("</translation>\n");

    out.push_str(INDENT);
    out.push_str("</message>\n");
}

fn push_element(out: &mut String, depth: usize, name: &str, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    let _ = write!(out, "<{name}>");
    push_escaped(out, text, false);
    let _ = writeln!(out, "</{name}>");
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"");
    push_escaped(out, value, true);
    out.push('"');
}

fn push_escaped(out: &mut String, text: &str, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
}
