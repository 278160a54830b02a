//! Expression evaluation

use super::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use crate::error::ExprError;
use crate::namespace::Namespace;
use crate::value::Value;

/// Trait for evaluating expression nodes to values.
pub trait Evaluate {
    /// Evaluate this node against the namespace.
    fn eval(&self, ns: &Namespace) -> Result<Value, ExprError>;
}

impl Evaluate for Expr {
    fn eval(&self, ns: &Namespace) -> Result<Value, ExprError> {
        match self {
            Expr::Literal(v) => Ok(v.clone()),

            Expr::Variable(name) => {
                ns.lookup_variable(name)
                    .cloned()
                    .ok_or_else(|| ExprError::UndefinedVariable { name: name.clone() })
            }

            Expr::Array(items) => Ok(Value::array(
                items
                    .iter()
                    .map(|e| e.eval(ns))
                    .collect::<Result<Vec<_>, _>>()?,
            )),

            Expr::Unary { op, operand } => {
                let v = operand.eval(ns)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!v.is_truthy()),
                    UnaryOp::Neg => Value::Number(-v.to_number()),
                    UnaryOp::Plus => Value::Number(v.to_number()),
                })
            }

            // Short-circuit; the result is the deciding operand, not a bool
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                let l = left.eval(ns)?;
                if l.is_truthy() {
                    right.eval(ns)
                } else {
                    Ok(l)
                }
            }
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                let l = left.eval(ns)?;
                if l.is_truthy() {
                    Ok(l)
                } else {
                    right.eval(ns)
                }
            }

            Expr::Binary { op, left, right } => {
                let l = left.eval(ns)?;
                let r = right.eval(ns)?;
                apply_binary(*op, &l, &r)
            }

            Expr::Member { target, name } => {
                let v = target.eval(ns)?;
                member(&v, name)
            }

            Expr::Index { target, index } => {
                let v = target.eval(ns)?;
                let i = index.eval(ns)?;
                match (&v, &i) {
                    (Value::Array(items), Value::Number(n)) => Ok(array_get(items, *n)),
                    (Value::String(s), Value::Number(n)) => Ok(string_char(s, *n)),
                    _ => member(&v, &i.to_string()),
                }
            }
        }
    }
}

/// Apply a non-short-circuit binary operator.
pub fn apply_binary(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, ExprError> {
    Ok(match op {
        BinaryOp::Add => add(l, r),
        BinaryOp::Sub => Value::Number(l.to_number() - r.to_number()),
        BinaryOp::Mul => Value::Number(l.to_number() * r.to_number()),
        BinaryOp::Div => Value::Number(l.to_number() / r.to_number()),
        BinaryOp::Rem => Value::Number(l.to_number() % r.to_number()),

        BinaryOp::Lt => Value::Bool(compare(l, r, |o| o.is_lt())),
        BinaryOp::Le => Value::Bool(compare(l, r, |o| o.is_le())),
        BinaryOp::Gt => Value::Bool(compare(l, r, |o| o.is_gt())),
        BinaryOp::Ge => Value::Bool(compare(l, r, |o| o.is_ge())),

        BinaryOp::LooseEq => Value::Bool(l.loose_equals(r)),
        BinaryOp::LooseNe => Value::Bool(!l.loose_equals(r)),
        BinaryOp::StrictEq => Value::Bool(l.strict_equals(r)),
        BinaryOp::StrictNe => Value::Bool(!l.strict_equals(r)),

        BinaryOp::And | BinaryOp::Or => {
            return Err(ExprError::TypeError {
                message: "logical operators must be evaluated lazily".to_string(),
            })
        }
    })
}

/// `+` concatenates when either side is textual (including arrays and
/// records, which stringify), otherwise adds numerically.
fn add(l: &Value, r: &Value) -> Value {
    let textual = |v: &Value| {
        matches!(
            v,
            Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Node(_)
        )
    };
    if textual(l) || textual(r) {
        Value::string(format!("{}{}", l, r))
    } else {
        Value::Number(l.to_number() + r.to_number())
    }
}

/// Relational comparison: two strings compare lexically, anything else
/// numerically. Comparisons involving `NaN` are false.
fn compare(l: &Value, r: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    match (l, r) {
        (Value::String(a), Value::String(b)) => test(a.as_str().cmp(b.as_str())),
        _ => l
            .to_number()
            .partial_cmp(&r.to_number())
            .is_some_and(test),
    }
}

fn member(v: &Value, name: &str) -> Result<Value, ExprError> {
    match v {
        Value::Undefined | Value::Null => Err(ExprError::TypeError {
            message: format!("cannot read property '{}' of {}", name, v.type_name()),
        }),
        Value::String(s) if name == "length" => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(items) if name == "length" => Ok(Value::Number(items.len() as f64)),
        Value::Array(items) => Ok(name
            .parse::<f64>()
            .map(|n| array_get(items, n))
            .unwrap_or(Value::Undefined)),
        Value::Object(fields) => Ok(fields.get(name).cloned().unwrap_or(Value::Undefined)),
        Value::Node(_) => Err(ExprError::TypeError {
            message: format!(
                "cannot read property '{}' of a node inside an expression; use <get>",
                name
            ),
        }),
        _ => Ok(Value::Undefined),
    }
}

fn array_get(items: &[Value], n: f64) -> Value {
    if n >= 0.0 && n.fract() == 0.0 {
        items.get(n as usize).cloned().unwrap_or(Value::Undefined)
    } else {
        Value::Undefined
    }
}

fn string_char(s: &str, n: f64) -> Value {
    if n >= 0.0 && n.fract() == 0.0 {
        s.chars()
            .nth(n as usize)
            .map_or(Value::Undefined, |c| Value::string(c.to_string()))
    } else {
        Value::Undefined
    }
}

impl Stmt {
    /// Execute the statement, writing any assignment into `ns`.
    ///
    /// Assignments declare the variable if it does not exist yet; compound
    /// assignments and steps read the current value first and fail if it is
    /// undeclared.
    pub fn execute(&self, ns: &mut Namespace) -> Result<(), ExprError> {
        match self {
            Stmt::Assign { name, op, value } => {
                let rhs = value.eval(ns)?;
                let new_value = match op {
                    None => rhs,
                    Some(op) => {
                        let current = Expr::Variable(name.clone()).eval(ns)?;
                        apply_binary(*op, &current, &rhs)?
                    }
                };
                ns.declare_variable(name.clone(), new_value);
                Ok(())
            }
            Stmt::Step { name, delta } => {
                let current = Expr::Variable(name.clone()).eval(ns)?;
                ns.declare_variable(name.clone(), Value::Number(current.to_number() + delta));
                Ok(())
            }
            Stmt::Expr(expr) => expr.eval(ns).map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parser::{parse_expr, parse_statements};

    fn eval_with(src: &str, ns: &Namespace) -> Result<Value, ExprError> {
        parse_expr(src)?.eval(ns)
    }

    fn eval(src: &str) -> Value {
        eval_with(src, &Namespace::new()).unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(eval("7 % 4"), Value::Number(3.0));
        assert_eq!(eval("-(2 - 5)"), Value::Number(3.0));
        assert_eq!(eval("1 / 0"), Value::Number(f64::INFINITY));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval("'a' + 1 + 2"), Value::string("a12"));
        assert_eq!(eval("1 + 2 + 'a'"), Value::string("3a"));
        assert_eq!(eval("'n' + [1, 2]"), Value::string("n1,2"));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("2 < 10"), Value::Bool(true));
        assert_eq!(eval("'2' < '10'"), Value::Bool(false));
        assert_eq!(eval("'2' < 10"), Value::Bool(true));
        assert_eq!(eval("NaN < 1"), Value::Bool(false));
        assert_eq!(eval("'1' == 1"), Value::Bool(true));
        assert_eq!(eval("'1' === 1"), Value::Bool(false));
        assert_eq!(eval("null == undefined"), Value::Bool(true));
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(eval("0 || 'x'"), Value::string("x"));
        assert_eq!(eval("'a' && 'b'"), Value::string("b"));
        assert_eq!(eval("!''"), Value::Bool(true));
        // The right side is never evaluated
        assert_eq!(eval("false && missing"), Value::Bool(false));
    }

    #[test]
    fn test_variables_and_members() {
        let mut ns = Namespace::new();
        ns.declare_variable(
            "items",
            Value::array(vec![Value::string("a"), Value::string("b")]),
        );
        ns.declare_variable("name", Value::string("héllo"));

        assert_eq!(eval_with("items.length", &ns).unwrap(), Value::Number(2.0));
        assert_eq!(eval_with("items[1]", &ns).unwrap(), Value::string("b"));
        assert_eq!(eval_with("items[5]", &ns).unwrap(), Value::Undefined);
        assert_eq!(eval_with("name.length", &ns).unwrap(), Value::Number(5.0));
        assert_eq!(eval_with("name[1]", &ns).unwrap(), Value::string("é"));
        assert_eq!(
            eval_with("missing + 1", &ns),
            Err(ExprError::UndefinedVariable {
                name: "missing".to_string()
            })
        );
        assert!(matches!(
            eval_with("items[5].x", &ns),
            Err(ExprError::TypeError { .. })
        ));
    }

    #[test]
    fn test_variable_value_is_not_resubstituted() {
        // A string value that happens to spell another variable's name
        // stays a plain string
        let mut ns = Namespace::new();
        ns.declare_variable("a", Value::string("b"));
        ns.declare_variable("b", Value::Number(5.0));
        assert_eq!(eval_with("a + 1", &ns).unwrap(), Value::string("b1"));
    }

    #[test]
    fn test_statements_write_namespace() {
        let mut ns = Namespace::new();
        for stmt in parse_statements("i = 0; i += 5; i++; i *= 2").unwrap() {
            stmt.execute(&mut ns).unwrap();
        }
        assert_eq!(ns.lookup_variable("i"), Some(&Value::Number(12.0)));
    }

    #[test]
    fn test_step_on_undeclared_fails() {
        let mut ns = Namespace::new();
        let stmts = parse_statements("k++").unwrap();
        assert!(stmts[0].execute(&mut ns).is_err());
    }
}
