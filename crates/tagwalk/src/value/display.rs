//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{:?}", s.as_str()),

            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {:?}", k, v)?;
                }
                write!(f, "}}")
            }

            Value::Node(id) => write!(f, "Node({})", id),
        }
    }
}

/// Display renders the string form a value takes when it is written into
/// the document (text content, attribute values, dialog messages).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),

            // Sequences join their elements with commas; holes render empty
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match item {
                        Value::Undefined | Value::Null => {}
                        other => write!(f, "{}", other)?,
                    }
                }
                Ok(())
            }

            Value::Object(_) => write!(f, "[object Object]"),
            Value::Node(_) => write!(f, "[object Element]"),
        }
    }
}

/// Format a number the way it reads in markup: no trailing `.0`, no
/// negative zero, spelled-out infinities, and exponent form (`1e+21`,
/// `1e-7`) outside `1e-7 < |n| < 1e21`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else {
        let scientific = format!("{:e}", n);
        match scientific.split_once('e') {
            Some((mantissa, exp)) => match exp.parse::<i32>() {
                Ok(exp) if exp >= 21 => format!("{}e+{}", mantissa, exp),
                Ok(exp) if exp <= -7 => format!("{}e{}", mantissa, exp),
                _ => format!("{}", n),
            },
            None => format!("{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(3.5).to_string(), "3.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_display_exponent_range() {
        assert_eq!(Value::Number(1e21).to_string(), "1e+21");
        assert_eq!(Value::Number(-2.5e30).to_string(), "-2.5e+30");
        assert_eq!(Value::Number(1.23e20).to_string(), "123000000000000000000");
        assert_eq!(Value::Number(1e-6).to_string(), "0.000001");
        assert_eq!(Value::Number(1.5e-7).to_string(), "1.5e-7");
    }

    #[test]
    fn test_display_array_joins_with_commas() {
        let v = Value::array(vec![Value::Number(1.0), Value::Null, Value::string("x")]);
        assert_eq!(v.to_string(), "1,,x");
    }

    #[test]
    fn test_debug_string_is_quoted() {
        assert_eq!(format!("{:?}", Value::string("hi")), "\"hi\"");
    }
}
