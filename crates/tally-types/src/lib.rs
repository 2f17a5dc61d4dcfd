//! Shared types for Tally.
//!
//! This crate defines the AST node types, source spans, error codes and
//! the serializable [`Diagnostic`] used across every pipeline stage.

mod error;
mod span;
pub mod ast;

pub use error::{Diagnostic, ErrorCategory, ErrorCode};
pub use span::{SourceFile, Span};
