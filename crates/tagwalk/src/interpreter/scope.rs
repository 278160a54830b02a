//! Scope-opening directives: `getElementById`, `querySelector`,
//! `querySelectorAll` and `create`

use tracing::debug;

use super::Interpreter;
use crate::dom::NodeId;
use crate::error::DirectiveError;
use crate::host::Host;
use crate::target::TargetContext;
use crate::value::Value;

impl<H: Host> Interpreter<H> {
    /// `<getElementById target>`
    pub(super) fn exec_get_element_by_id(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let id = self.attr(node, "target").unwrap_or_default();
        match self.document.get_element_by_id(&id) {
            Some(found) => self.dispatch_children(node, TargetContext::from(found)),
            None => {
                debug!(id = %id, "getElementById matched nothing");
                Ok(())
            }
        }
    }

    /// `<querySelector selector>`
    pub(super) fn exec_query_selector(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let Some(selector) = self.required_attr(node, "selector") else {
            return Ok(());
        };
        match self.document.query_selector(&selector)? {
            Some(found) => self.dispatch_children(node, TargetContext::from(found)),
            None => {
                debug!(selector = %selector, "querySelector matched nothing");
                Ok(())
            }
        }
    }

    /// `<querySelectorAll selector>`: the whole body runs once per match,
    /// in document order.
    pub(super) fn exec_query_selector_all(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let Some(selector) = self.required_attr(node, "selector") else {
            return Ok(());
        };
        let matches = self.document.query_selector_all(&selector)?;
        debug!(selector = %selector, matches = matches.len(), "querySelectorAll");
        for found in matches {
            self.dispatch_children(node, TargetContext::from(found))?;
        }
        Ok(())
    }

    /// `<create tag variable>`: the new element stays detached until
    /// something appends it.
    pub(super) fn exec_create(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let Some(tag) = self.required_attr(node, "tag") else {
            return Ok(());
        };
        let created = self.document.create_element(&tag)?;
        if let Some(variable) = self.required_attr(node, "variable") {
            self.namespace.declare_variable(variable, Value::Node(created));
        }
        self.dispatch_children(node, target.attach(created))
    }
}
