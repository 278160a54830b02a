//! Markup parsing and serialization
//!
//! A forgiving HTML-like reader. Tag and attribute names are lower-cased,
//! `/>` closes any element, void elements never take children, and raw-text
//! elements (`script`, `style`, ...) keep their content verbatim. Stray close
//! tags are ignored and unclosed elements close at end of input, so the only
//! hard errors are unterminated comments and tags.

use super::node::{Element, NodeKind, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
use super::{Document, NodeId};
use crate::error::DocumentError;

impl Document {
    /// Parse a complete document.
    pub fn parse(markup: &str) -> Result<Self, DocumentError> {
        let mut doc = Document::new();
        let root = doc.root();
        Parser::new(markup).parse_into(&mut doc, root)?;
        Ok(doc)
    }

    /// Parse a fragment and append its top-level nodes to `parent`.
    ///
    /// Returns the appended nodes. Each is journaled as an insertion when
    /// `parent` is connected.
    pub fn append_markup(
        &mut self,
        parent: NodeId,
        markup: &str,
    ) -> Result<Vec<NodeId>, DocumentError> {
        let holder = self.create_element("template")?;
        Parser::new(markup).parse_into(self, holder)?;
        let nodes = self.children(holder).to_vec();
        for &n in &nodes {
            self.append_child(parent, n)?;
        }
        Ok(nodes)
    }

    /// Replace the children of `id` with parsed markup.
    pub fn set_inner_html(&mut self, id: NodeId, markup: &str) -> Result<(), DocumentError> {
        self.element_mut(id)?;
        self.clear_children(id);
        self.append_markup(id, markup)?;
        Ok(())
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &c in self.children(id) {
            self.write_node(c, &mut out);
        }
        out
    }

    /// Serialize `id` itself.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the whole document.
    pub fn to_markup(&self) -> String {
        self.inner_html(self.root())
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Document => {
                for &c in &node.children {
                    self.write_node(c, out);
                }
            }
            NodeKind::Text(text) => {
                let raw = self
                    .parent(id)
                    .and_then(|p| self.tag_name(p))
                    .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
                if raw {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    write_attribute(name, value, out);
                }
                if !el.style.is_empty() {
                    write_attribute("style", &el.style_text(), out);
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                for &c in &node.children {
                    self.write_node(c, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn write_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    if !value.is_empty() {
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

/// Decode the handful of character references markup authors actually use.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ═══════════════════════════════════════════════════════════════════════
// Parser
// ═══════════════════════════════════════════════════════════════════════

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, message: impl Into<String>) -> DocumentError {
        DocumentError::Markup {
            message: message.into(),
            offset: self.pos,
        }
    }

    fn parse_into(&mut self, doc: &mut Document, container: NodeId) -> Result<(), DocumentError> {
        // Open elements; the bottom entry is the container itself
        let mut stack: Vec<NodeId> = vec![container];

        while self.pos < self.src.len() {
            let rest = self.rest();
            let parent = *stack.last().unwrap_or(&container);

            if rest.starts_with("<!--") {
                let end = rest[4..]
                    .find("-->")
                    .ok_or_else(|| self.error("unterminated comment"))?;
                let comment = doc.create_comment(&rest[4..4 + end]);
                doc.attach(parent, comment)?;
                self.pos += 4 + end + 3;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                // Doctype and processing instructions carry nothing we use
                let end = rest
                    .find('>')
                    .ok_or_else(|| self.error("unterminated declaration"))?;
                self.pos += end + 1;
            } else if rest.starts_with("</") {
                let end = rest
                    .find('>')
                    .ok_or_else(|| self.error("unterminated close tag"))?;
                let name = rest[2..end].trim().to_ascii_lowercase();
                self.pos += end + 1;
                // Pop back to the matching open element; ignore strays
                if let Some(depth) = stack
                    .iter()
                    .rposition(|&n| n != container && doc.tag_name(n) == Some(name.as_str()))
                {
                    stack.truncate(depth);
                }
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                let (element, self_closing) = self.parse_open_tag()?;
                let tag = element.tag.clone();
                let id = doc.push_node(NodeKind::Element(element));
                doc.attach(parent, id)?;

                if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                    continue;
                }
                if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    let close = format!("</{}", tag);
                    let rest = self.rest();
                    let end = find_ignore_case(rest, &close).unwrap_or(rest.len());
                    if end > 0 {
                        let text = doc.create_text(&rest[..end]);
                        doc.attach(id, text)?;
                    }
                    self.pos += end;
                    if let Some(gt) = self.rest().find('>') {
                        self.pos += gt + 1;
                    }
                    continue;
                }
                stack.push(id);
            } else {
                // Text runs until the next tag-like '<'
                let first = rest.chars().next().map_or(1, char::len_utf8);
                let end = rest[first..]
                    .find('<')
                    .map(|i| i + first)
                    .unwrap_or(rest.len());
                let text = doc.create_text(decode_entities(&rest[..end]));
                doc.attach(parent, text)?;
                self.pos += end;
            }
        }
        Ok(())
    }

    /// Parse `<tag attr=value ...>` starting at `<`.
    fn parse_open_tag(&mut self) -> Result<(Element, bool), DocumentError> {
        self.pos += 1;
        let name = self.take_while(|c| !c.is_whitespace() && c != '>' && c != '/');
        let mut element = Element::new(name);

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(format!("unterminated <{}> tag", element.tag)));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((element, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((element, false));
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let attr_name = attribute_name(
                self.take_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/'),
            );
            if attr_name.is_empty() {
                // A lone '=' or similar; skip the character
                self.pos += self.rest().chars().next().map_or(1, char::len_utf8);
                continue;
            }
            self.skip_whitespace();

            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.parse_attribute_value()?
            } else {
                String::new()
            };

            if attr_name == "style" {
                element.set_style_text(&value);
            } else {
                element.attributes.entry(attr_name).or_insert(value);
            }
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String, DocumentError> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let end = rest[1..]
                    .find(q)
                    .ok_or_else(|| self.error("unterminated attribute value"))?;
                let value = decode_entities(&rest[1..1 + end]);
                self.pos += end + 2;
                Ok(value)
            }
            _ => {
                let raw = self.take_while(|c| !c.is_whitespace() && c != '>');
                Ok(decode_entities(raw))
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

/// Attribute names are case-insensitive, except the property after a
/// `style.` prefix, which keeps its case so `style.backgroundColor` maps to
/// `background-color`.
fn attribute_name(raw: &str) -> String {
    match raw.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("style.") => {
            format!("style.{}", &raw[6..])
        }
        _ => raw.to_ascii_lowercase(),
    }
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
