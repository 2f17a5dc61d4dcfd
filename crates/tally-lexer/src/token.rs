//! Token types for the Tally lexer.
//!
//! Defines [`TokenKind`] covering every lexeme in Tally and [`Token`],
//! which pairs a kind with its source text and [`Span`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tally_types::Span;

/// Reserved identifiers. The lexer emits a keyword token for each of
/// these instead of [`TokenKind::Identifier`].
pub const ALL_KEYWORDS: &[&str] = &["func", "return"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the Tally lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The exact lexeme. Empty for [`TokenKind::Eof`].
    pub text: String,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Integer | TokenKind::Float | TokenKind::Identifier => {
                write!(f, "{}({})", self.kind.name(), self.text)
            }
            _ => f.write_str(self.kind.name()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the Tally language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// `42`
    Integer,
    /// `3.14`
    Float,

    // ── Names ────────────────────────────────────────────────
    Identifier,
    /// `func`
    KwFunc,
    /// `return`
    KwReturn,

    // ── Operators ────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `=`
    Assign,

    // ── Punctuation ──────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up a reserved identifier. Returns `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "func" => Some(TokenKind::KwFunc),
            "return" => Some(TokenKind::KwReturn),
            _ => None,
        }
    }

    /// Map a single-character lexeme to its token kind.
    pub fn from_punct(ch: u8) -> Option<TokenKind> {
        Some(match ch {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'=' => TokenKind::Assign,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            _ => return None,
        })
    }

    /// Short, stable name used in `Display` for tokens and in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Integer => "Integer",
            TokenKind::Float => "Float",
            TokenKind::Identifier => "Identifier",
            TokenKind::KwFunc => "func",
            TokenKind::KwReturn => "return",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Assign => "=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer => f.write_str("integer literal"),
            TokenKind::Float => f.write_str("float literal"),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::Eof => f.write_str("end of file"),
            other => write!(f, "'{}'", other.name()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keyword_recognises_all() {
        for &kw in ALL_KEYWORDS {
            assert!(
                matches!(
                    TokenKind::from_keyword(kw),
                    Some(TokenKind::KwFunc | TokenKind::KwReturn)
                ),
                "'{kw}' should be a keyword"
            );
        }
    }

    #[test]
    fn test_keyword_case_sensitivity() {
        assert_eq!(TokenKind::from_keyword("Func"), None);
        assert_eq!(TokenKind::from_keyword("RETURN"), None);
        assert_eq!(TokenKind::from_keyword("funcs"), None);
    }

    #[test]
    fn test_from_punct_covers_all_single_char_tokens() {
        for ch in b"+-*/(){}=,;" {
            assert!(TokenKind::from_punct(*ch).is_some(), "{}", *ch as char);
        }
        assert_eq!(TokenKind::from_punct(b'%'), None);
        assert_eq!(TokenKind::from_punct(b'.'), None);
    }

    #[test]
    fn test_display_kinds() {
        assert_eq!(TokenKind::RParen.to_string(), "')'");
        assert_eq!(TokenKind::KwFunc.to_string(), "'func'");
        assert_eq!(TokenKind::Identifier.to_string(), "identifier");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
    }

    #[test]
    fn test_display_tokens() {
        let span = Span::new(0, 2, 1, 1);
        assert_eq!(
            Token::new(TokenKind::Integer, "12", span).to_string(),
            "Integer(12)"
        );
        assert_eq!(Token::new(TokenKind::Plus, "+", span).to_string(), "+");
    }
}
