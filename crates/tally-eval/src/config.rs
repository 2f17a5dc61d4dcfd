//! Evaluator limits.

use serde::{Deserialize, Serialize};

/// Evaluator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Maximum number of nested function calls before
    /// [`EvalError::StackOverflow`](crate::EvalError::StackOverflow).
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
        }
    }
}
