//! Unified pipeline error.

use tally_eval::EvalError;
use tally_lexer::LexError;
use tally_parser::ParseError;
use tally_types::{Diagnostic, ErrorCode, SourceFile, Span};
use thiserror::Error;

/// The first error raised by any stage. Every variant aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl TallyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Lex(e) => e.code(),
            Self::Parse(e) => e.code(),
            Self::Eval(e) => e.code(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Lex(e) => e.span(),
            Self::Parse(e) => e.span(),
            Self::Eval(e) => e.span(),
        }
    }

    /// Lower into a serializable diagnostic carrying the offending line.
    pub fn to_diagnostic(&self, source: &SourceFile) -> Diagnostic {
        Diagnostic::new(self.code(), self.to_string(), Some(self.span())).with_source(source)
    }
}

/// Result alias for driver operations.
pub type TallyResult<T> = Result<T, TallyError>;
