//! Top-level and declaration parsing: the program and `func` definitions.

use tally_lexer::token::TokenKind;
use tally_types::ast::*;

use crate::parser::{ParseResult, Parser};

impl Parser {
    /// `program := statement* Eof`
    pub(crate) fn parse_program(&mut self) -> ParseResult<Program> {
        let start = self.current_span();
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_statement()?);
        }
        let span = start.merge(self.current_span());
        Ok(Program { stmts, span })
    }

    /// `func name(a, b, ...) { body }`
    pub(crate) fn parse_function_def(&mut self) -> ParseResult<FunctionDef> {
        let start = self.expect(TokenKind::KwFunc)?.span;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Ok(FunctionDef {
            name,
            params,
            body,
            span,
        })
    }

    /// `params := Identifier (',' Identifier)*`, possibly empty.
    fn parse_param_list(&mut self) -> ParseResult<Vec<Ident>> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.expect_identifier()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }
}
