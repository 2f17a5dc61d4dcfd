//! Statement parsing.

use tally_lexer::token::TokenKind;
use tally_types::ast::*;

use crate::parser::{ParseResult, Parser};

impl Parser {
    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.expect(TokenKind::LBrace)?.span;
        self.enter_nesting()?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }
        self.exit_nesting();
        let end = self.expect(TokenKind::RBrace)?.span;
        Ok(Block {
            stmts,
            span: start.merge(end),
        })
    }

    /// Parse a single statement, consuming an optional trailing `;`.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let stmt = match self.peek_kind() {
            TokenKind::KwFunc => Stmt::FunctionDef(self.parse_function_def()?),
            TokenKind::KwReturn => self.parse_return_stmt()?,
            _ => {
                let expr = self.parse_expression()?;
                let span = expr.span;
                Stmt::Expr(ExprStmt { expr, span })
            }
        };
        self.eat(TokenKind::Semicolon);
        Ok(stmt)
    }

    /// `return expr`
    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.advance().span; // eat `return`
        let value = self.parse_expression()?;
        let span = start.merge(value.span);
        Ok(Stmt::Return(ReturnStmt { value, span }))
    }
}
