use crate::{SourceFile, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    Runtime,
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical errors (E100–E199) ──
    pub const UNEXPECTED_CHARACTER: Self = Self(100);
    pub const INTEGER_OUT_OF_RANGE: Self = Self(101);

    // ── Syntax errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const NESTING_TOO_DEEP: Self = Self(201);

    // ── Runtime errors (E300–E399) ──
    pub const UNDEFINED_VARIABLE: Self = Self(300);
    pub const UNDEFINED_FUNCTION: Self = Self(301);
    pub const ARITY_MISMATCH: Self = Self(302);
    pub const DIVISION_BY_ZERO: Self = Self(303);
    pub const TYPE_MISMATCH: Self = Self(304);
    pub const INTEGER_OVERFLOW: Self = Self(305);
    pub const STACK_OVERFLOW: Self = Self(306);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lexical,
            200..=299 => ErrorCategory::Syntax,
            _ => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Syntax => write!(f, "syntax"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// A structured, serializable report of a failed run.
///
/// Stage errors stay strongly typed inside the pipeline; they are lowered
/// into a `Diagnostic` only at the output boundary, so consumers never have
/// to parse free-form strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Source file name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub code: ErrorCode,
    /// Derived from `code`.
    pub category: ErrorCategory,
    pub message: String,
    /// `None` when no location is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// The exact source line for context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            file: None,
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: None,
        }
    }

    /// Attach the file name and the offending source line.
    pub fn with_source(mut self, source: &SourceFile) -> Self {
        self.file = Some(source.name.clone());
        self.source_line = self
            .span
            .and_then(|span| source.line(span.line))
            .map(str::to_string);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "{span}: ")?;
        }
        write!(f, "{} [{}] {}", self.code, self.category, self.message)
    }
}

impl std::error::Error for Diagnostic {}
