//! In-memory host document
//!
//! The interpreter acts on a [`Document`]: an arena of nodes addressed by
//! [`NodeId`]. It covers what the directive handlers consume from a host
//! tree: lookup by id and selector, attribute/style/property access, node
//! creation, insertion and detachment, and an insertion journal that feeds
//! the mutation bridge.

mod markup;
mod node;
mod property;
mod selector;

pub use node::{
    css_property_name, Element, Node, NodeId, NodeKind, RAW_TEXT_ELEMENTS, VOID_ELEMENTS,
};
pub use selector::{Selector, SelectorList};

use crate::error::DocumentError;

/// An arena-backed document tree.
///
/// # Example
///
/// ```
/// use tagwalk::Document;
///
/// let mut doc = Document::parse(r#"<div id="box"><p class="msg">hi</p></div>"#).unwrap();
/// let p = doc.query_selector("#box > .msg").unwrap().unwrap();
/// assert_eq!(doc.text_content(p), "hi");
///
/// let span = doc.create_element("span").unwrap();
/// doc.append_child(p, span).unwrap();
/// assert_eq!(doc.take_inserted(), vec![span]);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes ever created, indexed by `NodeId`
    nodes: Vec<Node>,

    /// Nodes inserted into the connected tree since the last drain
    inserted: Vec<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            inserted: Vec::new(),
        }
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Node Access
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes.get_mut(id.0).ok_or(DocumentError::UnknownNode(id))
    }

    /// Look up an element; `None` for other node kinds.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Mutable access to an element.
    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DocumentError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DocumentError::NotAnElement(id)),
        }
    }

    /// Lower-cased tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// All children of a node, including text and comments.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children of a node, as an owned snapshot.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
            .collect()
    }

    /// Whether `id` is reachable from the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors_inclusive(id).any(|a| a == self.root())
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors_inclusive(id).any(|a| a == ancestor)
    }

    /// Iterate `id` and then its ancestors up to the root of its tree.
    pub fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.parent(n))
    }

    /// Pre-order traversal of the elements beneath `id`, excluding `id`.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if self.element(n).is_some() {
                out.push(n);
            }
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    // ═══════════════════════════════════════════════════════════════════
    // Node Creation and Tree Mutation
    // ═══════════════════════════════════════════════════════════════════

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId, DocumentError> {
        let valid = tag
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':');
        if !valid {
            return Err(DocumentError::InvalidTagName(tag.to_string()));
        }
        Ok(self.push_node(NodeKind::Element(Element::new(tag))))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Comment(text.into()))
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached elsewhere.
    ///
    /// Insertions into the connected tree are journaled for
    /// [`take_inserted`](Self::take_inserted).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.attach(parent, child)?;
        if self.is_connected(parent) {
            self.inserted.push(child);
        }
        Ok(())
    }

    /// Append without journaling; used while building from markup.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        match self.node(parent).map(|n| &n.kind) {
            None => return Err(DocumentError::UnknownNode(parent)),
            Some(NodeKind::Text(_) | NodeKind::Comment(_)) => {
                return Err(DocumentError::NotAnElement(parent))
            }
            Some(_) => {}
        }
        if self.node(child).is_none() || child == self.root() {
            return Err(DocumentError::UnknownNode(child));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DocumentError::Cycle { child, parent });
        }
        self.detach(child);
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach a node from its parent. Returns `false` if it had none.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.nodes.get_mut(id.0) {
            n.parent = None;
        }
        true
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.detach(child);
        }
    }

    /// Drain the insertion journal.
    pub fn take_inserted(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.inserted)
    }

    /// Whether insertions are waiting in the journal.
    pub fn has_pending_insertions(&self) -> bool {
        !self.inserted.is_empty()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Attributes and Style
    // ═══════════════════════════════════════════════════════════════════

    /// Read an attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    /// Set an attribute. Setting `style` replaces the inline style.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let name = name.to_ascii_lowercase();
        let value: String = value.into();
        let el = self.element_mut(id)?;
        if name == "style" {
            el.set_style_text(&value);
        } else {
            el.attributes.insert(name, value);
        }
        Ok(())
    }

    /// Read an inline style property.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.style.get(&css_property_name(property)))
            .map(String::as_str)
    }

    /// Set an inline style property; an empty value removes it.
    pub fn set_style(
        &mut self,
        id: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), DocumentError> {
        let property = css_property_name(property);
        let el = self.element_mut(id)?;
        if value.is_empty() {
            el.style.shift_remove(&property);
        } else {
            el.style.insert(property, value.to_string());
        }
        Ok(())
    }

    /// Whether the element's inline style is `display: none`.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(Element::is_hidden)
    }

    /// Suppress or restore rendering of an element.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<(), DocumentError> {
        self.set_style(id, "display", if hidden { "none" } else { "" })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Text Content
    // ═══════════════════════════════════════════════════════════════════

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, false, &mut out);
        out
    }

    /// Like [`text_content`](Self::text_content) but skipping hidden
    /// elements, which is what a reader would see.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, true, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, skip_hidden: bool, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Comment(_) => {}
            NodeKind::Element(el) if skip_hidden && el.is_hidden() => {}
            NodeKind::Element(_) | NodeKind::Document => {
                for &c in &node.children {
                    self.collect_text(c, skip_hidden, out);
                }
            }
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DocumentError> {
        self.element_mut(id)?;
        self.clear_children(id);
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t)?;
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// First connected element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendant_elements(self.root())
            .into_iter()
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    /// First connected element matching `selector`, in document order.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DocumentError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendant_elements(self.root())
            .into_iter()
            .find(|&n| list.matches(self, n)))
    }

    /// Every connected element matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DocumentError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendant_elements(self.root())
            .into_iter()
            .filter(|&n| list.matches(self, n))
            .collect())
    }

    /// Resolve a reference that may be an element id or a selector.
    ///
    /// The id is tried first; a string that is not a valid selector simply
    /// fails to resolve.
    pub fn resolve_reference(&self, reference: &str) -> Option<NodeId> {
        self.get_element_by_id(reference)
            .or_else(|| self.query_selector(reference).ok().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse(r#"<div id="a"><p id="b">one</p><p class="x">two</p></div>"#).unwrap()
    }

    #[test]
    fn test_get_element_by_id() {
        let doc = sample();
        let b = doc.get_element_by_id("b").unwrap();
        assert_eq!(doc.tag_name(b), Some("p"));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert_eq!(doc.get_element_by_id(""), None);
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = sample();
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        doc.append_child(a, b).unwrap();
        assert_eq!(doc.children(a).last(), Some(&b));
        assert_eq!(doc.element_children(a).len(), 2);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = sample();
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        assert_eq!(
            doc.append_child(b, a),
            Err(DocumentError::Cycle {
                child: a,
                parent: b
            })
        );
        assert_eq!(
            doc.append_child(a, a),
            Err(DocumentError::Cycle {
                child: a,
                parent: a
            })
        );
    }

    #[test]
    fn test_detached_insertions_are_not_journaled() {
        let mut doc = Document::new();
        let div = doc.create_element("div").unwrap();
        let span = doc.create_element("span").unwrap();
        doc.append_child(div, span).unwrap();
        assert!(doc.take_inserted().is_empty());

        doc.append_child(doc.root(), div).unwrap();
        assert_eq!(doc.take_inserted(), vec![div]);
        assert!(doc.is_connected(span));
    }

    #[test]
    fn test_detach_without_parent() {
        let mut doc = Document::new();
        let div = doc.create_element("div").unwrap();
        assert!(!doc.detach(div));
    }

    #[test]
    fn test_invalid_tag_name() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.create_element("not a tag"),
            Err(DocumentError::InvalidTagName(_))
        ));
        assert!(doc.create_element("").is_err());
    }

    #[test]
    fn test_inner_text_skips_hidden() {
        let mut doc = sample();
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        doc.set_hidden(b, true).unwrap();
        assert_eq!(doc.text_content(a), "onetwo");
        assert_eq!(doc.inner_text(a), "two");
        doc.set_hidden(b, false).unwrap();
        assert!(!doc.is_hidden(b));
    }

    #[test]
    fn test_resolve_reference_prefers_id() {
        let doc = sample();
        assert_eq!(doc.resolve_reference("b"), doc.get_element_by_id("b"));
        assert_eq!(doc.resolve_reference(".x"), doc.query_selector(".x").unwrap());
        assert_eq!(doc.resolve_reference("[[bad"), None);
    }
}
