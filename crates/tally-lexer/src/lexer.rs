//! Core Tally lexer: converts source text to a token stream.
//!
//! Features:
//! - Integer and float literals (maximal munch, no sign, no exponent)
//! - Identifiers with the reserved words `func` and `return`
//! - Single-character operators and punctuation
//! - Whitespace skipped; the first unrecognised character aborts lexing

use tally_types::{ErrorCode, Span};
use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Lexing failure. Lexing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize, span: Span },

    #[error("integer literal '{text}' at offset {offset} does not fit in 64 bits")]
    IntegerOutOfRange {
        text: String,
        offset: usize,
        span: Span,
    },
}

impl LexError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedCharacter { .. } => ErrorCode::UNEXPECTED_CHARACTER,
            Self::IntegerOutOfRange { .. } => ErrorCode::INTEGER_OUT_OF_RANGE,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedCharacter { span, .. } | Self::IntegerOutOfRange { span, .. } => *span,
        }
    }
}

/// Result alias for lexing.
pub type LexResult<T> = Result<T, LexError>;

/// Lex `source` into tokens. The returned sequence always ends with
/// [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    Lexer::new(source).lex()
}

/// The Tally lexer.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// `source` as bytes; every lexeme Tally accepts is ASCII.
    bytes: &'src [u8],
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire source into a token stream.
    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tracing::debug!(count = tokens.len(), "lexed source");
        Ok(tokens)
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|ch| ch.is_ascii_whitespace());
    }

    fn token_from(&self, kind: TokenKind, start: usize, line: u32, col: u32) -> Token {
        let span = Span::new(start, self.pos, line, col);
        Token::new(kind, &self.source[start..self.pos], span)
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();

        let (start, line, col) = (self.pos, self.line, self.col);
        let Some(ch) = self.peek() else {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                Span::point(start, line, col),
            ));
        };

        if ch.is_ascii_digit() {
            return self.scan_number(start, line, col);
        }
        if ch.is_ascii_alphabetic() {
            return Ok(self.scan_identifier(start, line, col));
        }
        if let Some(kind) = TokenKind::from_punct(ch) {
            self.advance();
            return Ok(self.token_from(kind, start, line, col));
        }

        // Decode the full character so multi-byte input is reported intact.
        let ch = self.source[start..].chars().next().unwrap_or(ch as char);
        Err(LexError::UnexpectedCharacter {
            ch,
            offset: start,
            span: Span::new(start, start + ch.len_utf8(), line, col),
        })
    }

    /// `digits ('.' digits?)?`. A `.` makes it a float.
    fn scan_number(&mut self, start: usize, line: u32, col: u32) -> LexResult<Token> {
        self.advance_while(|ch| ch.is_ascii_digit());

        let mut kind = TokenKind::Integer;
        if self.peek() == Some(b'.') {
            kind = TokenKind::Float;
            self.advance();
            self.advance_while(|ch| ch.is_ascii_digit());
        }

        let token = self.token_from(kind, start, line, col);
        if kind == TokenKind::Integer && token.text.parse::<i64>().is_err() {
            return Err(LexError::IntegerOutOfRange {
                text: token.text,
                offset: start,
                span: token.span,
            });
        }
        Ok(token)
    }

    fn scan_identifier(&mut self, start: usize, line: u32, col: u32) -> Token {
        self.advance_while(|ch| ch.is_ascii_alphanumeric());
        let text = &self.source[start..self.pos];
        let kind = TokenKind::from_keyword(text).unwrap_or(TokenKind::Identifier);
        self.token_from(kind, start, line, col)
    }
}
