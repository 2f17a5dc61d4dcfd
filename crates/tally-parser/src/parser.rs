//! Core parser infrastructure: token cursor, configuration, errors, helpers.

use serde::{Deserialize, Serialize};
use std::fmt;
use tally_lexer::token::{Token, TokenKind};
use tally_types::ast::{Ident, Program};
use tally_types::{ErrorCode, Span};
use thiserror::Error;

// ── Configuration ─────────────────────────────────────────────────────────────

/// How the four arithmetic operators bind relative to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precedence {
    /// Every operator binds equally, evaluated left to right: `2 + 3 * 4`
    /// is `(2 + 3) * 4`.
    #[default]
    Flat,
    /// `*` and `/` bind tighter than `+` and `-`.
    Standard,
}

/// Parser options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub precedence: Precedence,
    /// Maximum nesting of expressions (parentheses, assignments, call
    /// arguments) and blocks, counted together.
    pub max_nesting: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            precedence: Precedence::Flat,
            max_nesting: 256,
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// What the parser wanted to see where it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    Expression,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Expression => f.write_str("expression"),
        }
    }
}

/// Parse failure. The first one aborts the compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {}", describe_found(.found, .text))]
    UnexpectedToken {
        expected: Expected,
        found: TokenKind,
        /// Lexeme of the offending token.
        text: String,
        span: Span,
    },

    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: u32, span: Span },
}

fn describe_found(found: &TokenKind, text: &str) -> String {
    match found {
        TokenKind::Integer | TokenKind::Float | TokenKind::Identifier => {
            format!("{found} '{text}'")
        }
        _ => found.to_string(),
    }
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedToken { .. } => ErrorCode::UNEXPECTED_TOKEN,
            Self::NestingTooDeep { .. } => ErrorCode::NESTING_TOO_DEEP,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } | Self::NestingTooDeep { span, .. } => *span,
        }
    }
}

/// Result alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a token stream with the default configuration.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Program> {
    Parser::new(tokens).parse()
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// The Tally parser.
///
/// Consumes a token stream produced by the lexer and builds an AST by
/// recursive descent.
pub struct Parser {
    /// The token stream. Never empty; always ends with `Eof`.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    pub(crate) config: ParserConfig,
    /// Current expression and block nesting depth.
    depth: u32,
}

impl Parser {
    /// Create a new parser with the default configuration.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(mut tokens: Vec<Token>, config: ParserConfig) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            // Tokens never span lines, so the end sits on the last token's line.
            let span = match tokens.last() {
                Some(last) => {
                    let width = (last.span.end - last.span.start) as u32;
                    Span::point(last.span.end, last.span.line, last.span.col + width)
                }
                None => Span::point(0, 1, 1),
            };
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self {
            tokens,
            pos: 0,
            config,
            depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Look ahead by `n` tokens from current position. Saturates at `Eof`.
    pub(crate) fn look_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Advance the cursor by one and return the consumed token.
    /// Never moves past the final `Eof`.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind.
    pub(crate) fn expect(&mut self, expected: TokenKind) -> ParseResult<Token> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(Expected::Token(expected)))
        }
    }

    /// Expect an identifier token.
    pub(crate) fn expect_identifier(&mut self) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Ident::new(token.text, token.span))
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    /// Enter a nested expression or block. Fails once the depth passes
    /// `max_nesting`, before the recursion can exhaust the stack.
    pub(crate) fn enter_nesting(&mut self) -> ParseResult<()> {
        if self.depth >= self.config.max_nesting {
            return Err(ParseError::NestingTooDeep {
                limit: self.config.max_nesting,
                span: self.current_span(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build an error describing the current token.
    pub(crate) fn unexpected(&self, expected: Expected) -> ParseError {
        let token = self.peek();
        ParseError::UnexpectedToken {
            expected,
            found: token.kind,
            text: token.text.clone(),
            span: token.span,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Program` AST.
    pub fn parse(mut self) -> ParseResult<Program> {
        let program = self.parse_program()?;
        tracing::debug!(statements = program.stmts.len(), "parsed program");
        Ok(program)
    }
}
