//! Runtime error types for the Tally evaluator.

use tally_types::{ErrorCode, Span};
use thiserror::Error;

/// Evaluation error. Any of these aborts the whole program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    #[error("undefined function '{name}'")]
    UndefinedFunction { name: String, span: Span },

    #[error("function '{name}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
        span: Span,
    },

    #[error("division by zero")]
    DivisionByZero { span: Span },

    #[error("type mismatch: {context}")]
    TypeMismatch { context: String, span: Span },

    #[error("integer overflow in '{op}'")]
    IntegerOverflow { op: &'static str, span: Span },

    #[error("call depth exceeded {depth}")]
    StackOverflow { depth: usize, span: Span },
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndefinedVariable { .. } => ErrorCode::UNDEFINED_VARIABLE,
            Self::UndefinedFunction { .. } => ErrorCode::UNDEFINED_FUNCTION,
            Self::ArityMismatch { .. } => ErrorCode::ARITY_MISMATCH,
            Self::DivisionByZero { .. } => ErrorCode::DIVISION_BY_ZERO,
            Self::TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            Self::IntegerOverflow { .. } => ErrorCode::INTEGER_OVERFLOW,
            Self::StackOverflow { .. } => ErrorCode::STACK_OVERFLOW,
        }
    }

    /// Where the failing expression sits in the source.
    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::DivisionByZero { span }
            | Self::TypeMismatch { span, .. }
            | Self::IntegerOverflow { span, .. }
            | Self::StackOverflow { span, .. } => *span,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
