//! AST node types for the Tally language.
//!
//! Every node carries a [`Span`] for error reporting and exclusively owns
//! its children. Recursive expressions are boxed.
//!
//! A flat operator chain of N terms parses into a left-nested tree N levels
//! deep, so [`Expr`] is torn down iteratively instead of through the
//! derived, recursive drop glue.

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Tally program: ordered top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    /// Top-level function definitions in source order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.stmts.iter().filter_map(|stmt| match stmt {
            Stmt::FunctionDef(def) => Some(def),
            _ => None,
        })
    }
}

/// `{ stmts... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    Return(ReturnStmt),
    Expr(ExprStmt),
}

/// `func name(params...) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

impl FunctionDef {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// `return expr`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

/// An expression used as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// A childless node left behind when a subtree is detached.
    fn hollow(span: Span) -> Self {
        Self::new(ExprKind::IntegerLit(0), span)
    }

    /// Move every direct child of this node onto `out`.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        match &mut self.kind {
            ExprKind::Binary { left, right, .. } => {
                out.push(take(left));
                out.push(take(right));
            }
            ExprKind::Assign { value, .. } => out.push(take(value)),
            ExprKind::Call { args, .. } => out.append(args),
            ExprKind::IntegerLit(_) | ExprKind::FloatLit(_) | ExprKind::Variable(_) => {}
        }
    }
}

fn take(slot: &mut Expr) -> Expr {
    let span = slot.span;
    std::mem::replace(slot, Expr::hollow(span))
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntegerLit(i64),
    FloatLit(f64),
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `name = value`
    Assign {
        name: Ident,
        value: Box<Expr>,
    },
    /// A bare variable reference.
    Variable(String),
    /// `name(args...)`
    Call {
        name: Ident,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
