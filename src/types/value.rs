use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar values used both as rule literals and as record fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
}

/// A field value as seen by the predicate evaluator after path lookup.
///
/// Comparability is decided by the variant: integers and floats both
/// collapse into [`Extracted::Number`], and anything the evaluator cannot
/// compare is [`Extracted::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extracted<'a> {
    Number(f64),
    Text(&'a str),
    Boolean(bool),
    Absent,
    Unsupported,
}

impl Value {
    /// View this value as an extracted operand.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn extracted(&self) -> Extracted<'_> {
        match self {
            Value::Int(v) => Extracted::Number(*v as f64),
            Value::Float(v) => Extracted::Number(*v),
            Value::Bool(v) => Extracted::Boolean(*v),
            Value::String(v) => Extracted::Text(v),
        }
    }

    /// The stored integer, if this is an [`Value::Int`].
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The stored float, if this is a [`Value::Float`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The stored boolean, if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The stored string, if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl Extracted<'_> {
    /// Numeric view used by the comparators. Booleans count as `1.0`/`0.0`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Extracted::Number(n) => Some(*n),
            Extracted::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Whether a value was found at the looked-up path.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Extracted::Absent)
    }

    /// String form used by `regex` and `intersect`. `None` when absent or unsupported.
    #[must_use]
    pub fn stringify(&self) -> Option<String> {
        match self {
            Extracted::Number(n) => Some(n.to_string()),
            Extracted::Text(s) => Some((*s).to_owned()),
            Extracted::Boolean(b) => Some(b.to_string()),
            Extracted::Absent | Extracted::Unsupported => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
        }
    }
}
