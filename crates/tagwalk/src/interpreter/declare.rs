//! `function`, `variable`, `addEventListener` and `call`

use tracing::debug;

use super::{EventTarget, Interpreter};
use crate::dom::NodeId;
use crate::error::DirectiveError;
use crate::host::Host;
use crate::namespace::Function;
use crate::target::TargetContext;
use crate::value::{parse_float, Value};

impl<H: Host> Interpreter<H> {
    /// `<function name>`: capture the element children as the body.
    pub(super) fn exec_function(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let Some(name) = self.required_attr(node, "name") else {
            debug!(%node, "function without a name");
            return Ok(());
        };
        let body = self.document.element_children(node);
        debug!(name = %name, statements = body.len(), "declaring function");
        self.namespace.declare_function(Function {
            name,
            body,
            context: target,
        });
        Ok(())
    }

    /// `<variable name value type>`: parse the literal per its type tag.
    pub(super) fn exec_variable(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let Some(name) = self.required_attr(node, "name") else {
            debug!(%node, "variable without a name");
            return Ok(());
        };
        let literal = self.attr(node, "value");
        let kind = self.attr(node, "type").unwrap_or_else(|| "string".to_string());
        let value = parse_literal(&name, &kind, literal.as_deref())?;
        self.namespace.declare_variable(name, value);
        Ok(())
    }

    /// `<addEventListener target event function>`
    pub(super) fn exec_add_event_listener(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let (Some(target), Some(event), Some(function)) = (
            self.required_attr(node, "target"),
            self.required_attr(node, "event"),
            self.required_attr(node, "function"),
        ) else {
            debug!(%node, "addEventListener needs target, event and function");
            return Ok(());
        };

        let resolved = match target.as_str() {
            "window" => Some(EventTarget::Window),
            "document" => Some(EventTarget::Document),
            reference => self.document.resolve_reference(reference).map(EventTarget::Node),
        };
        let Some(resolved) = resolved else {
            debug!(reference = %target, "listener target not found");
            return Ok(());
        };
        let Some(handler) = self.namespace.lookup_function(&function) else {
            debug!(function = %function, "listener function not declared");
            return Ok(());
        };

        debug!(event_target = %resolved, event = %event, function = %function, "binding listener");
        self.add_listener(resolved, event, handler);
        Ok(())
    }

    /// `<call function args>`: arguments must parse but are not bound.
    pub(super) fn exec_call(&mut self, node: NodeId) -> Result<(), DirectiveError> {
        let Some(name) = self.required_attr(node, "function") else {
            return Ok(());
        };
        let Some(function) = self.namespace.lookup_function(&name) else {
            debug!(function = %name, "call to undeclared function");
            return Ok(());
        };

        if let Some(args) = self.required_attr(node, "args") {
            let parsed: Vec<serde_json::Value> = serde_json::from_str(&format!("[{}]", args))
                .map_err(|err| DirectiveError::InvalidArguments {
                    function: name.clone(),
                    message: err.to_string(),
                })?;
            debug!(function = %name, args = parsed.len(), "call arguments are not bound");
        }

        self.invoke(&function)
    }
}

/// Parse a `variable` literal according to its `type` attribute.
///
/// A missing literal reads as `null` except for `number` (NaN) and
/// `boolean` (false).
fn parse_literal(name: &str, kind: &str, literal: Option<&str>) -> Result<Value, DirectiveError> {
    Ok(match kind {
        "number" => Value::Number(literal.map_or(f64::NAN, parse_float)),
        "boolean" => Value::Bool(literal == Some("true")),
        "array" | "object" => match literal {
            None => Value::Null,
            Some(text) => serde_json::from_str::<serde_json::Value>(text)
                .map(Value::from_json)
                .map_err(|err| DirectiveError::InvalidLiteral {
                    name: name.to_string(),
                    kind: kind.to_string(),
                    message: err.to_string(),
                })?,
        },
        _ => literal.map_or(Value::Null, Value::string),
    })
}
