//! Tally tree-walking evaluator.
//!
//! Executes a parsed [`tally_types::ast::Program`] directly, resolving names
//! through a chain of [`Environment`] scopes: one global scope per run and
//! one child scope per function call.

pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
mod stack;
pub mod value;

pub use config::EvalConfig;
pub use env::{Binding, Environment};
pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluator, Flow, ProgramOutput};
pub use value::Value;
