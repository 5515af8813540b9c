mod arith;
mod compare;

#[cfg(test)]
mod tests;

use derive_more::Display;
use serde::Serialize;
use std::fmt;

// re-exports
pub use arith::{ArithOp, ArithmeticError, apply_arith, negate};
pub use compare::{compare_eq, compare_order};

///
/// ValueFamily
///
/// Coarse value classification used by comparison and arithmetic rules.
/// `Int` and `Float` share the numeric family.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ValueFamily {
    #[display("null")]
    Null,
    #[display("boolean")]
    Bool,
    #[display("numeric")]
    Numeric,
    #[display("text")]
    Text,
}

///
/// Value
///
/// Dynamically typed scalar carried by source records, grouping keys,
/// accumulator slots and result rows.
///
/// Null   → absent or SQL NULL; never equal to anything, itself included.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn family(&self) -> ValueFamily {
        match self {
            Self::Null => ValueFamily::Null,
            Self::Bool(_) => ValueFamily::Bool,
            Self::Int(_) | Self::Float(_) => ValueFamily::Numeric,
            Self::Text(_) => ValueFamily::Text,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Widen a numeric value to `f64`; `None` for every other family.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Render the value in its natural textual form for result sinks.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            // Debug keeps a fractional part on integral floats (8.0, -inf).
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
