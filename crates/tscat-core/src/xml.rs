#![forbid(unsafe_code)]

//! Minimal XML reader for catalog documents.
//!
//! Covers what translation catalogs use: the XML declaration, a doctype,
//! comments, processing instructions, CDATA sections, elements with quoted
//! attributes, the five predefined entities and numeric character
//! references. Namespaces and DTD validation are not interpreted.
//!
//! The reader is a byte cursor with line/column tracking; [`parse_document`]
//! folds its events into a small element tree. Any well-formedness problem is
//! reported as an [`XmlError`] carrying the position where it was detected.

use core::fmt;
use std::borrow::Cow;

/// Deepest element nesting accepted. Catalogs use five levels.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub byte: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError {
    pub message: String,
    pub position: Position,
}

impl XmlError {
    fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}, col {})",
            self.message, self.position.line, self.position.col
        )
    }
}

impl std::error::Error for XmlError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    Start {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
        position: Position,
    },
    End {
        name: &'a str,
        position: Position,
    },
    Text(Cow<'a, str>),
    Eof,
}

/// Pull reader over a complete document.
///
/// Tag balance is checked as events are produced; a self-closing tag yields
/// a `Start` immediately followed by an `End`.
pub struct Reader<'a> {
    input: &'a str,
    bytes: &'a [u8],
    idx: usize,
    line: usize,
    col: usize,
    stack: Vec<&'a str>,
    pending_end: Option<(&'a str, Position)>,
    seen_root: bool,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            input,
            bytes: input.as_bytes(),
            idx: 0,
            line: 1,
            col: 1,
            stack: Vec::new(),
            pending_end: None,
            seen_root: false,
        }
    }

    pub fn next_event(&mut self) -> Result<Event<'a>, XmlError> {
        if let Some((name, position)) = self.pending_end.take() {
            self.stack.pop();
            return Ok(Event::End { name, position });
        }
        loop {
            if self.idx >= self.bytes.len() {
                return self.finish();
            }
            if self.bytes[self.idx] != b'<' {
                if let Some(text) = self.read_text()? {
                    return Ok(Event::Text(text));
                }
                continue;
            }
            if self.starts_with("<!--") {
                self.skip_comment()?;
            } else if self.starts_with("<![CDATA[") {
                let text = self.read_cdata()?;
                return Ok(Event::Text(Cow::Borrowed(text)));
            } else if self.starts_with("<!") {
                self.skip_doctype()?;
            } else if self.starts_with("<?") {
                self.skip_processing_instruction()?;
            } else if self.starts_with("</") {
                return self.read_end_tag();
            } else {
                return self.read_start_tag();
            }
        }
    }

    fn finish(&self) -> Result<Event<'a>, XmlError> {
        if let Some(open) = self.stack.last() {
            return Err(XmlError::new(
                format!("unexpected end of input: <{open}> is not closed"),
                self.position(),
            ));
        }
        if !self.seen_root {
            return Err(XmlError::new("document has no root element", self.position()));
        }
        Ok(Event::Eof)
    }

    /// Character data up to the next `<`. Whitespace outside the root element
    /// is dropped; anything else there is an error.
    fn read_text(&mut self) -> Result<Option<Cow<'a, str>>, XmlError> {
        let start = self.position();
        let start_idx = self.idx;
        while self.idx < self.bytes.len() && self.bytes[self.idx] != b'<' {
            self.advance_byte();
        }
        let raw = &self.input[start_idx..self.idx];
        if self.stack.is_empty() {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            return Err(XmlError::new("text outside the root element", start));
        }
        decode_text(raw, start).map(Some)
    }

    fn read_cdata(&mut self) -> Result<&'a str, XmlError> {
        let start = self.position();
        if self.stack.is_empty() {
            return Err(XmlError::new("CDATA outside the root element", start));
        }
        self.advance_n(9);
        let content_start = self.idx;
        while self.idx < self.bytes.len() {
            if self.starts_with("]]>") {
                let content = &self.input[content_start..self.idx];
                self.advance_n(3);
                return Ok(content);
            }
            self.advance_byte();
        }
        Err(XmlError::new("unterminated CDATA section", start))
    }

    fn skip_comment(&mut self) -> Result<(), XmlError> {
        let start = self.position();
        self.advance_n(4);
        while self.idx < self.bytes.len() {
            if self.starts_with("-->") {
                self.advance_n(3);
                return Ok(());
            }
            self.advance_byte();
        }
        Err(XmlError::new("unterminated comment", start))
    }

    fn skip_doctype(&mut self) -> Result<(), XmlError> {
        let start = self.position();
        if self.seen_root {
            return Err(XmlError::new("declaration after the root element", start));
        }
        self.advance_n(2);
        let mut depth = 0usize;
        while self.idx < self.bytes.len() {
            match self.bytes[self.idx] {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => {
                    self.advance_byte();
                    return Ok(());
                }
                _ => {}
            }
            self.advance_byte();
        }
        Err(XmlError::new("unterminated declaration", start))
    }

    fn skip_processing_instruction(&mut self) -> Result<(), XmlError> {
        let start = self.position();
        self.advance_n(2);
        while self.idx < self.bytes.len() {
            if self.starts_with("?>") {
                self.advance_n(2);
                return Ok(());
            }
            self.advance_byte();
        }
        Err(XmlError::new("unterminated processing instruction", start))
    }

    fn read_start_tag(&mut self) -> Result<Event<'a>, XmlError> {
        let position = self.position();
        if self.stack.is_empty() && self.seen_root {
            return Err(XmlError::new("content after the root element", position));
        }
        if self.stack.len() >= MAX_DEPTH {
            return Err(XmlError::new(
                format!("elements nested deeper than {MAX_DEPTH} levels"),
                position,
            ));
        }
        self.advance_byte(); // <
        let name = self.read_name()?;
        let mut attributes: Vec<Attribute<'a>> = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                Some(b'>') => {
                    self.advance_byte();
                    self.open(name);
                    return Ok(Event::Start {
                        name,
                        attributes,
                        position,
                    });
                }
                Some(b'/') => {
                    self.advance_byte();
                    if self.peek() != Some(b'>') {
                        return Err(XmlError::new("expected '>' after '/'", self.position()));
                    }
                    self.advance_byte();
                    self.open(name);
                    self.pending_end = Some((name, position));
                    return Ok(Event::Start {
                        name,
                        attributes,
                        position,
                    });
                }
                Some(_) if had_space => {
                    let attr_pos = self.position();
                    let attribute = self.read_attribute()?;
                    if attributes.iter().any(|a| a.name == attribute.name) {
                        return Err(XmlError::new(
                            format!("duplicate attribute '{}'", attribute.name),
                            attr_pos,
                        ));
                    }
                    attributes.push(attribute);
                }
                Some(_) => {
                    return Err(XmlError::new(
                        format!("unexpected character in <{name}>"),
                        self.position(),
                    ));
                }
                None => {
                    return Err(XmlError::new(
                        format!("unterminated start tag <{name}>"),
                        position,
                    ));
                }
            }
        }
    }

    fn open(&mut self, name: &'a str) {
        self.stack.push(name);
        self.seen_root = true;
    }

    fn read_end_tag(&mut self) -> Result<Event<'a>, XmlError> {
        let position = self.position();
        self.advance_n(2);
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.peek() != Some(b'>') {
            return Err(XmlError::new(
                format!("unterminated end tag </{name}>"),
                position,
            ));
        }
        self.advance_byte();
        match self.stack.pop() {
            Some(open) if open == name => Ok(Event::End { name, position }),
            Some(open) => Err(XmlError::new(
                format!("mismatched end tag: expected </{open}>, found </{name}>"),
                position,
            )),
            None => Err(XmlError::new(
                format!("end tag </{name}> without matching start tag"),
                position,
            )),
        }
    }

    fn read_attribute(&mut self) -> Result<Attribute<'a>, XmlError> {
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Err(XmlError::new(
                format!("attribute '{name}' has no value"),
                self.position(),
            ));
        }
        self.advance_byte();
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(XmlError::new(
                    format!("attribute '{name}' value must be quoted"),
                    self.position(),
                ));
            }
        };
        self.advance_byte();
        let value_pos = self.position();
        let value_start = self.idx;
        while self.idx < self.bytes.len() && self.bytes[self.idx] != quote {
            if self.bytes[self.idx] == b'<' {
                return Err(XmlError::new("'<' in attribute value", self.position()));
            }
            self.advance_byte();
        }
        if self.idx >= self.bytes.len() {
            return Err(XmlError::new(
                format!("unterminated value for attribute '{name}'"),
                value_pos,
            ));
        }
        let raw = &self.input[value_start..self.idx];
        self.advance_byte();
        Ok(Attribute {
            name,
            value: decode_text(raw, value_pos)?,
        })
    }

    fn read_name(&mut self) -> Result<&'a str, XmlError> {
        let start = self.idx;
        let position = self.position();
        match self.peek() {
            Some(b) if is_name_start(b) => self.advance_byte(),
            _ => return Err(XmlError::new("expected a name", position)),
        }
        while let Some(b) = self.peek() {
            if !is_name_continue(b) {
                break;
            }
            self.advance_byte();
        }
        Ok(&self.input[start..self.idx])
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.idx;
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.advance_byte();
        }
        self.idx > start
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.bytes[self.idx..].starts_with(pat.as_bytes())
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance_byte();
        }
    }

    fn advance_byte(&mut self) {
        if self.idx >= self.bytes.len() {
            return;
        }
        let b = self.bytes[self.idx];
        self.idx += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if b & 0xC0 != 0x80 {
            // Count characters, not UTF-8 continuation bytes.
            self.col += 1;
        }
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            col: self.col,
            byte: self.idx,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.idx).copied()
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80
}

fn is_name_continue(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.'
}

/// Expand predefined entities and character references.
/// Line endings normalized to `\n`, then entities decoded. Character
/// references such as `&#13;` are expanded after normalization and survive.
fn decode_text(raw: &str, position: Position) -> Result<Cow<'_, str>, XmlError> {
    if !raw.contains('\r') {
        return decode_entities(raw, position);
    }
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let decoded = decode_entities(&normalized, position)?.into_owned();
    Ok(Cow::Owned(decoded))
}

fn decode_entities(raw: &str, position: Position) -> Result<Cow<'_, str>, XmlError> {
    if !raw.contains('&') {
        return Ok(Cow::Borrowed(raw));
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            return Err(XmlError::new("unterminated entity reference", position));
        };
        let entity = &after[..semi];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => out.push(decode_char_ref(entity).ok_or_else(|| {
                XmlError::new(format!("unknown entity '&{entity};'"), position)
            })?),
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

fn decode_char_ref(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

// ---------------------------------------------------------------------------
// Element tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub position: Position,
}

impl Element {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated direct text children (not descendants).
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }
}

/// Parse a complete document into its root element.
pub fn parse_document(input: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::new(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.next_event()? {
            Event::Start {
                name,
                attributes,
                position,
            } => stack.push(Element {
                name: name.to_string(),
                attributes: attributes
                    .into_iter()
                    .map(|a| (a.name.to_string(), a.value.into_owned()))
                    .collect(),
                children: Vec::new(),
                position,
            }),
            Event::End { position, .. } => {
                let Some(done) = stack.pop() else {
                    return Err(XmlError::new("unbalanced end tag", position));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(done)),
                    None => root = Some(done),
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    match parent.children.last_mut() {
                        Some(Node::Text(prev)) => prev.push_str(&text),
                        _ => parent.children.push(Node::Text(text.into_owned())),
                    }
                }
            }
            Event::Eof => break,
        }
    }

    root.ok_or_else(|| XmlError::new("document has no root element", reader.position()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declaration_doctype_and_root() {
        let doc = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.1\" language=\"zh_TW\"></TS>\n";
        let root = parse_document(doc).unwrap();
        assert_eq!(root.name, "TS");
        assert_eq!(root.attribute("language"), Some("zh_TW"));
        assert_eq!(root.attribute("sourcelanguage"), None);
    }

    #[test]
    fn decodes_entities_in_text_and_attributes() {
        let root = parse_document(
            "<a t='x &amp; y'>&lt;b&gt;C&amp;lose&lt;/b&gt; &#65;&#x42; &quot;&apos;</a>",
        )
        .unwrap();
        assert_eq!(root.attribute("t"), Some("x & y"));
        assert_eq!(root.text(), "<b>C&lose</b> AB \"'");
    }

    #[test]
    fn self_closing_elements_have_no_children() {
        let root = parse_document("<m><location filename=\"a.ui\" line=\"+3\"/><s>x</s></m>").unwrap();
        let loc = root.child("location").unwrap();
        assert!(loc.children.is_empty());
        assert_eq!(loc.attribute("line"), Some("+3"));
        assert_eq!(root.child("s").unwrap().text(), "x");
    }

    #[test]
    fn cdata_and_comments() {
        let root = parse_document("<a><!-- note --><![CDATA[<raw> & ]]>tail</a>").unwrap();
        assert_eq!(root.text(), "<raw> & tail");
    }

    #[test]
    fn mismatched_end_tag_reports_position() {
        let err = parse_document("<a>\n  <b></c>\n</a>").unwrap_err();
        assert!(err.message.contains("mismatched end tag"));
        assert_eq!(err.position.line, 2);
        assert_eq!(err.position.col, 6);
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let depth = 20_000;
        let doc = format!("<TS>{}{}</TS>", "<x>".repeat(depth), "</x>".repeat(depth));
        let err = parse_document(&doc).unwrap_err();
        assert!(err.message.contains("nested deeper"), "{}", err.message);
        assert_eq!(err.position.line, 1);
        assert_eq!(err.position.col, 4 + 3 * (MAX_DEPTH - 1) + 1);

        let inner = MAX_DEPTH - 1;
        let shallow = format!("<a>{}{}</a>", "<x>".repeat(inner), "</x>".repeat(inner));
        assert!(parse_document(&shallow).is_ok());
    }

    #[test]
    fn crlf_line_endings_are_normalized() {
        let doc = "<a k=\"x\r\ny\">line one\r\nline two\rthree&#13;</a>\r\n";
        let root = parse_document(doc).unwrap();
        assert_eq!(root.text(), "line one\nline two\nthree\r");
        assert_eq!(root.attribute("k"), Some("x\ny"));
    }

    #[test]
    fn unclosed_root_is_error() {
        let err = parse_document("<a><b></b>").unwrap_err();
        assert!(err.message.contains("not closed"));
    }

    #[test]
    fn empty_and_text_only_documents_are_errors() {
        assert!(parse_document("").is_err());
        assert!(parse_document("   \n").is_err());
        assert!(parse_document("just text").is_err());
    }

    #[test]
    fn second_root_is_error() {
        let err = parse_document("<a/><b/>").unwrap_err();
        assert!(err.message.contains("after the root"));
    }

    #[test]
    fn unknown_entity_is_error() {
        let err = parse_document("<a>&nbsp;</a>").unwrap_err();
        assert!(err.message.contains("unknown entity"));
    }

    #[test]
    fn attribute_errors() {
        assert!(parse_document("<a x=1/>").is_err());
        assert!(parse_document("<a x='1' x='2'/>").is_err());
        assert!(parse_document("<a x/>").is_err());
        assert!(parse_document("<a x='1'y='2'/>").is_err());
    }

    #[test]
    fn columns_count_characters() {
        let err = parse_document("<a>可用</b>").unwrap_err();
        assert_eq!(err.position.col, 6);
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let root = parse_document("\u{feff}<a/>").unwrap();
        assert_eq!(root.name, "a");
    }

    #[test]
    fn reader_emits_balanced_events() {
        let mut reader = Reader::new("<a><b/>t</a>");
        let mut names = Vec::new();
        loop {
            match reader.next_event().unwrap() {
                Event::Start { name, .. } => names.push(format!("+{name}")),
                Event::End { name, .. } => names.push(format!("-{name}")),
                Event::Text(t) => names.push(t.into_owned()),
                Event::Eof => break,
            }
        }
        assert_eq!(names, vec!["+a", "+b", "-b", "t", "-a"]);
    }
}
