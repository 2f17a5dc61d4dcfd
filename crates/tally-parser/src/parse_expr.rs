//! Expression parsing.
//!
//! By default the four arithmetic operators share one precedence level and
//! associate left: `2 + 3 * 4` parses as `(2 + 3) * 4`. With
//! [`Precedence::Standard`] the chain becomes:
//!
//! 2. `+`, `-`
//! 1. `*`, `/`

use tally_lexer::token::TokenKind;
use tally_types::ast::*;

use crate::parser::{Expected, ParseResult, Parser, Precedence};

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.enter_nesting()?;
        let result = match self.config.precedence {
            Precedence::Flat => self.parse_flat(),
            Precedence::Standard => self.parse_add(),
        };
        self.exit_nesting();
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Operator Chains
    // ══════════════════════════════════════════════════════════════════════════

    /// `FlatExpr = Primary { ("+" | "-" | "*" | "/") Primary }`
    fn parse_flat(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_primary()?;
        while let Some(op) = self.match_op(&[BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div]) {
            self.advance();
            let right = self.parse_primary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_mul()?;
        while let Some(op) = self.match_op(&[BinOp::Add, BinOp::Sub]) {
            self.advance();
            let right = self.parse_mul()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `MulExpr = Primary { ("*" | "/") Primary }`
    fn parse_mul(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_primary()?;
        while let Some(op) = self.match_op(&[BinOp::Mul, BinOp::Div]) {
            self.advance();
            let right = self.parse_primary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// If the current token is one of `allowed`, return the matching operator.
    fn match_op(&self, allowed: &[BinOp]) -> Option<BinOp> {
        let op = match self.peek_kind() {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            _ => return None,
        };
        allowed.contains(&op).then_some(op)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        match self.peek_kind() {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::Integer => {
                let value = self
                    .peek()
                    .text
                    .parse::<i64>()
                    .map_err(|_| self.unexpected(Expected::Token(TokenKind::Integer)))?;
                self.advance();
                Ok(Expr::new(ExprKind::IntegerLit(value), start))
            }
            TokenKind::Float => {
                let value = self
                    .peek()
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.unexpected(Expected::Token(TokenKind::Float)))?;
                self.advance();
                Ok(Expr::new(ExprKind::FloatLit(value), start))
            }

            // ── Grouping ────────────────────────────────────────────────
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let mut inner = self.parse_expression()?;
                let end = self.expect(TokenKind::RParen)?.span;
                inner.span = start.merge(end);
                Ok(inner)
            }

            // ── Call, assignment or variable ────────────────────────────
            TokenKind::Identifier => match self.look_ahead(1) {
                TokenKind::LParen => self.parse_call(),
                TokenKind::Assign => self.parse_assignment(),
                _ => {
                    let ident = self.expect_identifier()?;
                    Ok(Expr::new(ExprKind::Variable(ident.name), ident.span))
                }
            },

            _ => Err(self.unexpected(Expected::Expression)),
        }
    }

    /// `name = expression`
    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        let span = name.span.merge(value.span);
        Ok(Expr::new(
            ExprKind::Assign {
                name,
                value: Box::new(value),
            },
            span,
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Call Parsing
    // ══════════════════════════════════════════════════════════════════════════

    /// `name(args...)`
    fn parse_call(&mut self) -> ParseResult<Expr> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        let args = self.parse_arg_list()?;
        let end = self.expect(TokenKind::RParen)?.span;
        let span = name.span.merge(end);
        Ok(Expr::new(ExprKind::Call { name, args }, span))
    }

    /// Parse a comma-separated argument list (inside parens).
    fn parse_arg_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
