//! The expression language used in directive attributes
//!
//! Conditions (`if`, `while`, `for`), values (`set`, `alert`, ...) and loop
//! statements (`for` `init`/`increment`) are small expressions over
//! literals, declared variables and the usual arithmetic, comparison and
//! logical operators. Identifiers are looked up in the [`Namespace`] while
//! evaluating; nothing is substituted into the source text.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use ast::{BinaryOp, Expr, Stmt, UnaryOp};
pub use eval::Evaluate;
pub use parser::{parse_expr, parse_statements};

use tracing::{trace, warn};

use crate::error::ExprError;
use crate::namespace::Namespace;
use crate::value::Value;

/// Characters that mark a value attribute as an expression rather than a
/// literal.
const VALUE_OPERATORS: &[char] = &['+', '-', '*', '/'];

/// Evaluate a condition to a boolean.
///
/// Never fails: an empty condition is `false`, and a condition that does
/// not parse or evaluate is logged and treated as `false`.
pub fn evaluate_condition(text: &str, ns: &Namespace) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    match parse_expr(text).and_then(|expr| expr.eval(ns)) {
        Ok(value) => value.is_truthy(),
        Err(err) => {
            warn!(condition = text, error = %err, "condition failed to evaluate");
            false
        }
    }
}

/// Resolve a value attribute.
///
/// A text that is exactly a declared variable name yields that variable's
/// value unchanged. A text containing `+ - * /` is evaluated as an
/// expression, falling back to the text itself if that fails. Anything
/// else is a string literal.
///
/// # Example
///
/// ```
/// use tagwalk::{evaluate_value, Namespace, Value};
///
/// let mut ns = Namespace::new();
/// ns.declare_variable("n", Value::Number(2.0));
///
/// assert_eq!(evaluate_value("n", &ns), Value::Number(2.0));
/// assert_eq!(evaluate_value("n * 3", &ns), Value::Number(6.0));
/// assert_eq!(evaluate_value("hello", &ns), Value::string("hello"));
/// assert_eq!(evaluate_value("a - b", &ns), Value::string("a - b"));
/// ```
pub fn evaluate_value(text: &str, ns: &Namespace) -> Value {
    if let Some(value) = ns.lookup_variable(text) {
        return value.clone();
    }
    if !text.contains(VALUE_OPERATORS) {
        return Value::string(text);
    }
    match parse_expr(text).and_then(|expr| expr.eval(ns)) {
        Ok(value) => value,
        Err(err) => {
            trace!(value = text, error = %err, "value kept as literal text");
            Value::string(text)
        }
    }
}

/// Run `;`-separated statements against the namespace.
///
/// Statements run in order; the first failure stops the rest and is
/// returned.
pub fn execute_statement(text: &str, ns: &mut Namespace) -> Result<(), ExprError> {
    for stmt in parse_statements(text)? {
        stmt.execute(ns)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_condition_failures_are_false() {
        let ns = Namespace::new();
        assert!(!evaluate_condition("", &ns));
        assert!(!evaluate_condition("   ", &ns));
        assert!(!evaluate_condition("undeclared > 1", &ns));
        assert!(!evaluate_condition("1 +* (", &ns));
        assert!(evaluate_condition("1 < 2 && 'x'", &ns));
    }

    #[test]
    fn test_value_exact_name_returns_structured_value() {
        let mut ns = Namespace::new();
        let list = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        ns.declare_variable("list", list.clone());

        let got = evaluate_value("list", &ns);
        assert!(got.strict_equals(&list));
    }

    #[test]
    fn test_value_without_operator_is_literal() {
        let mut ns = Namespace::new();
        ns.declare_variable("x", Value::Number(1.0));
        // Not an exact name and no operator: taken as text
        assert_eq!(evaluate_value("x y", &ns), Value::string("x y"));
        assert_eq!(evaluate_value("42", &ns), Value::string("42"));
    }

    #[test]
    fn test_value_expression() {
        let mut ns = Namespace::new();
        ns.declare_variable("name", Value::string("Ada"));
        assert_eq!(
            evaluate_value("'Hello, ' + name", &ns),
            Value::string("Hello, Ada")
        );
        assert_eq!(evaluate_value("10 / 4", &ns), Value::Number(2.5));
    }

    #[test]
    fn test_deeply_nested_text_falls_back() {
        let ns = Namespace::new();
        let deep = format!("{}1{} + 1", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(evaluate_value(&deep, &ns), Value::string(deep.clone()));
        assert!(!evaluate_condition(&deep, &ns));

        let mut ns = Namespace::new();
        assert!(matches!(
            execute_statement(&format!("x = {}1", "- ".repeat(10_000)), &mut ns),
            Err(ExprError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_execute_statement_stops_at_first_error() {
        let mut ns = Namespace::new();
        let err = execute_statement("a = 1; b = missing; c = 3", &mut ns).unwrap_err();
        assert_eq!(
            err,
            ExprError::UndefinedVariable {
                name: "missing".to_string()
            }
        );
        assert_eq!(ns.lookup_variable("a"), Some(&Value::Number(1.0)));
        assert!(!ns.contains_variable("c"));
    }
}
