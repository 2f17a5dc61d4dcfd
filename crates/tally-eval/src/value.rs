//! Runtime values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value produced by evaluation.
///
/// Serializes untagged: integers and floats as JSON numbers, `Nothing` as
/// `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    /// The result of a call that finished without `return`, or of a
    /// program with no expression statements. Never equal to any number.
    Nothing,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Nothing => "nothing",
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Value::Nothing)
    }

    /// Numeric view with int→float promotion. `None` for `Nothing`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(n) => Some(n as f64),
            Value::Float(f) => Some(f),
            Value::Nothing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            // `{:?}` keeps the decimal point on whole floats: `4.0`, not `4`.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Nothing => f.write_str("nothing"),
        }
    }
}
