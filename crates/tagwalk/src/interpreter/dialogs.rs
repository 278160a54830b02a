//! `alert`, `confirm`, `prompt` and `log`

use super::Interpreter;
use crate::dom::NodeId;
use crate::error::DirectiveError;
use crate::host::Host;
use crate::value::Value;

impl<H: Host> Interpreter<H> {
    /// The `message` attribute, or the element's text when it is missing or
    /// empty, resolved to display text.
    fn message(&self, node: NodeId) -> String {
        let raw = self
            .required_attr(node, "message")
            .unwrap_or_else(|| self.document.text_content(node));
        self.evaluate_value(&raw).to_string()
    }

    pub(super) fn exec_alert(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let message = self.message(node);
        self.host.alert(&message);
        Ok(())
    }

    pub(super) fn exec_confirm(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let message = self.message(node);
        let answer = self.host.confirm(&message);
        if let Some(variable) = self.required_attr(node, "variable") {
            self.namespace.declare_variable(variable, Value::Bool(answer));
        }
        Ok(())
    }

    /// A cancelled prompt stores `null`.
    pub(super) fn exec_prompt(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let message = self.message(node);
        let default = self
            .attr(node, "default")
            .map(|d| self.evaluate_value(&d).to_string())
            .unwrap_or_default();
        let answer = self.host.prompt(&message, &default);
        if let Some(variable) = self.required_attr(node, "variable") {
            let value = answer.map_or(Value::Null, Value::string);
            self.namespace.declare_variable(variable, value);
        }
        Ok(())
    }

    pub(super) fn exec_log(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let message = self.message(node);
        self.host.log(&message);
        Ok(())
    }
}
