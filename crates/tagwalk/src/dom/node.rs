//! Node storage for the host document

use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// Handle to a node in a [`Document`](super::Document) arena.
///
/// Ids are never reused, so a handle stays valid (if possibly detached)
/// for the life of its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node, `None` for the document root and detached nodes
    pub parent: Option<NodeId>,

    /// Child nodes in document order
    pub children: Vec<NodeId>,

    /// What kind of node this is
    pub kind: NodeKind,
}

/// The payload of a [`Node`].
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document root
    Document,

    /// An element with a tag, attributes, style and properties
    Element(Element),

    /// A run of character data
    Text(String),

    /// A `<!-- ... -->` comment
    Comment(String),
}

/// Element data.
///
/// Tag and attribute names are stored lower-cased. The `style` attribute is
/// kept parsed in [`Element::style`] rather than in the attribute map.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Lower-cased tag name
    pub tag: String,

    /// Attributes in source order
    pub attributes: IndexMap<String, String>,

    /// Inline style declarations in source order
    pub style: IndexMap<String, String>,

    /// Script-visible properties that are not attributes (`value`, expandos)
    pub properties: IndexMap<String, Value>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether the inline style suppresses rendering.
    pub fn is_hidden(&self) -> bool {
        self.style.get("display").map(String::as_str) == Some("none")
    }

    /// Parse a `style` attribute into declarations.
    pub(crate) fn set_style_text(&mut self, text: &str) {
        self.style.clear();
        for decl in text.split(';') {
            if let Some((prop, value)) = decl.split_once(':') {
                let prop = prop.trim();
                let value = value.trim();
                if !prop.is_empty() && !value.is_empty() {
                    self.style
                        .insert(prop.to_ascii_lowercase(), value.to_string());
                }
            }
        }
    }

    /// Render the inline style back into attribute text.
    pub fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(k, v)| format!("{}: {};", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text up to the matching close tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Convert a camelCase style property to its hyphenated form
/// (`backgroundColor` to `background-color`); other names pass through.
pub fn css_property_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
