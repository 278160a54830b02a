//! Scoped actions: `set`, `get`, `append`, `remove`, `show`, `hide`,
//! `toggle`

use tracing::debug;

use super::{Interpreter, Visibility};
use crate::dom::NodeId;
use crate::error::DirectiveError;
use crate::host::Host;
use crate::target::TargetContext;

/// Attributes of `<set>` that never become mutations.
const SET_IGNORED: &[&str] = &["class", "id", "style"];

impl<H: Host> Interpreter<H> {
    /// `<set ...>`: each attribute of the directive writes to the target.
    ///
    /// - `data-*` is copied as an attribute, verbatim
    /// - `style.<prop>` sets an inline style property
    /// - `innertext`, `innerhtml`, `value` and any other name set the
    ///   property of that name
    ///
    /// Every value except `data-*` goes through value resolution.
    pub(super) fn exec_set(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let Some(element) = target.resolve_target() else {
            debug!(%node, "set without a target");
            return Ok(());
        };
        let attributes: Vec<(String, String)> = self
            .document
            .element(node)
            .map(|el| {
                el.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        for (name, raw) in attributes {
            if name.starts_with("data-") {
                self.document.set_attribute(element, &name, raw)?;
            } else if let Some(property) = name.strip_prefix("style.") {
                let value = self.evaluate_value(&raw);
                self.document
                    .set_style(element, property, &value.to_string())?;
            } else if !SET_IGNORED.contains(&name.as_str()) {
                let value = self.evaluate_value(&raw);
                self.document.set_property(element, &name, value)?;
            }
        }
        Ok(())
    }

    /// `<get property variable>`
    pub(super) fn exec_get(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let (Some(element), Some(property), Some(variable)) = (
            target.resolve_target(),
            self.required_attr(node, "property"),
            self.required_attr(node, "variable"),
        ) else {
            debug!(%node, "get needs a target, property and variable");
            return Ok(());
        };
        let value = self.document.get_property(element, &property);
        self.namespace.declare_variable(variable, value);
        Ok(())
    }

    /// `<append target source>`
    ///
    /// The parent is looked up by id or selector when `target` is given,
    /// else it is the context target. The child is a variable holding a
    /// node, else an id or selector lookup, else the context target.
    pub(super) fn exec_append(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let parent = match self.required_attr(node, "target") {
            Some(reference) => self.document.resolve_reference(&reference),
            None => target.resolve_target(),
        };
        let child = match self.required_attr(node, "source") {
            Some(reference) => self
                .namespace
                .lookup_variable(&reference)
                .and_then(|v| v.as_node())
                .or_else(|| self.document.resolve_reference(&reference)),
            None => target.resolve_target(),
        };

        let (Some(parent), Some(child)) = (parent, child) else {
            debug!(%node, "append could not resolve both parent and child");
            return Ok(());
        };
        self.document.append_child(parent, child)?;
        Ok(())
    }

    /// `<remove>`: detach the target; a detached target is left alone.
    pub(super) fn exec_remove(&mut self, target: TargetContext) -> Result<(), DirectiveError> {
        if let Some(element) = target.resolve_target() {
            if !self.document.detach(element) {
                debug!(%element, "remove on a node without a parent");
            }
        }
        Ok(())
    }

    /// `<show>`, `<hide>` and `<toggle>`
    pub(super) fn exec_visibility(
        &mut self,
        target: TargetContext,
        change: Visibility,
    ) -> Result<(), DirectiveError> {
        let Some(element) = target.resolve_target() else {
            return Ok(());
        };
        let hidden = match change {
            Visibility::Show => false,
            Visibility::Hide => true,
            Visibility::Toggle => !self.document.is_hidden(element),
        };
        self.document.set_hidden(element, hidden)?;
        Ok(())
    }
}
