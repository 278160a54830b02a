//! Target context threaded through directive dispatch
//!
//! Scope-opening directives (`getElementById`, `querySelector`,
//! `querySelectorAll`, `create`) hand their node down to their children;
//! scoped actions (`set`, `get`, `remove`, ...) act on whatever node the
//! nearest enclosing scope-opener attached. The context is a plain value
//! passed by copy into each recursive dispatch, so a nested scope-opener
//! replaces it for its own subtree only.

use crate::dom::NodeId;

/// The host node a block of directives is operating on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetContext {
    target: Option<NodeId>,
}

impl TargetContext {
    /// A context with no target, as at the top of a scan.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The context a scope-opener hands to its children.
    ///
    /// The returned context carries `node` regardless of what `self`
    /// carried; the caller's own context is unchanged.
    pub fn attach(self, node: NodeId) -> Self {
        Self { target: Some(node) }
    }

    /// The node scoped actions should act upon, if any.
    pub fn resolve_target(&self) -> Option<NodeId> {
        self.target
    }

    /// Whether a target is in force.
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }
}

impl From<NodeId> for TargetContext {
    fn from(node: NodeId) -> Self {
        Self::empty().attach(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_nested_attach_shadows_only_the_child() {
        let mut doc = Document::new();
        let outer = doc.create_element("div").unwrap();
        let inner = doc.create_element("span").unwrap();

        let parent = TargetContext::empty().attach(outer);
        let child = parent.attach(inner);

        assert_eq!(child.resolve_target(), Some(inner));
        assert_eq!(parent.resolve_target(), Some(outer));
        assert!(!TargetContext::empty().has_target());
    }
}
