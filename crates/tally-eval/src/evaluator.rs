//! Core expression and statement evaluator.

use crate::config::EvalConfig;
use crate::env::{Binding, Environment};
use crate::error::{EvalError, EvalResult};
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_types::ast::*;
use tally_types::Span;

/// Outcome of executing a statement or block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    /// Execution continues; carries the statement's value.
    Normal(Value),
    /// A `return` fired. Unwinds enclosing blocks up to the call boundary.
    Return(Value),
}

/// What a successful run leaves behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramOutput {
    /// Value of the last evaluated expression statement (or of a top-level
    /// `return`), `Nothing` if there was none.
    pub value: Value,
    /// Value bindings of the global scope, in name order.
    pub globals: BTreeMap<String, Value>,
}

/// Walks AST nodes and produces Values.
#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
    /// Number of function calls currently executing.
    call_depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            config,
            call_depth: 0,
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program
    // ══════════════════════════════════════════════════════════════════════

    /// Run a program against a fresh global environment.
    ///
    /// Every top-level function is registered before the first statement
    /// runs, so calls may precede definitions.
    pub fn eval_program(&mut self, program: &Program) -> EvalResult<ProgramOutput> {
        let mut global = Environment::new();
        for def in program.functions() {
            global.bind_function(def);
        }
        tracing::debug!(statements = program.stmts.len(), "evaluating program");

        let mut value = Value::Nothing;
        for stmt in &program.stmts {
            match self.exec_stmt(stmt, &mut global)? {
                Flow::Return(v) => {
                    value = v;
                    break;
                }
                Flow::Normal(v) => {
                    if matches!(stmt, Stmt::Expr(_)) {
                        value = v;
                    }
                }
            }
        }

        Ok(ProgramOutput {
            value,
            globals: global.value_bindings(),
        })
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Execute statements in order, stopping at the first `return`.
    /// A block that runs to completion yields its last statement's value.
    pub fn exec_block<'p>(
        &mut self,
        block: &'p Block,
        env: &mut Environment<'p>,
    ) -> EvalResult<Flow> {
        let mut last = Value::Nothing;
        for stmt in &block.stmts {
            match self.exec_stmt(stmt, env)? {
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal(v) => last = v,
            }
        }
        Ok(Flow::Normal(last))
    }

    pub fn exec_stmt<'p>(
        &mut self,
        stmt: &'p Stmt,
        env: &mut Environment<'p>,
    ) -> EvalResult<Flow> {
        match stmt {
            Stmt::FunctionDef(def) => {
                env.bind_function(def);
                Ok(Flow::Normal(Value::Nothing))
            }
            Stmt::Return(ret) => Ok(Flow::Return(self.eval_expr(&ret.value, env)?)),
            Stmt::Expr(stmt) => Ok(Flow::Normal(self.eval_expr(&stmt.expr, env)?)),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr, env: &mut Environment<'_>) -> EvalResult<Value> {
        ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::IntegerLit(n) => Ok(Value::Int(*n)),
            ExprKind::FloatLit(f) => Ok(Value::Float(*f)),
            ExprKind::Binary { left, op, right } => {
                let lv = self.eval_expr(left, env)?;
                let rv = self.eval_expr(right, env)?;
                eval_arith(*op, lv, rv, expr.span)
            }
            ExprKind::Assign { name, value } => {
                let v = self.eval_expr(value, env)?;
                env.bind(&name.name, v);
                Ok(v)
            }
            ExprKind::Variable(name) => eval_variable(name, env, expr.span),
            ExprKind::Call { name, args } => self.eval_call(name, args, env, expr.span),
        })
    }

    /// Evaluate `name(args...)`.
    ///
    /// Arguments are evaluated left to right in the caller's scope; the body
    /// runs in a fresh scope whose parent is the global scope, so callees
    /// never see the caller's locals.
    fn eval_call(
        &mut self,
        name: &Ident,
        args: &[Expr],
        env: &mut Environment<'_>,
        span: Span,
    ) -> EvalResult<Value> {
        let def = match env.lookup(&name.name) {
            Some(Binding::Function(def)) => *def,
            Some(Binding::Value(v)) => {
                return Err(EvalError::TypeMismatch {
                    context: format!("'{}' is {}, not a function", name.name, v.type_name()),
                    span,
                })
            }
            None => {
                return Err(EvalError::UndefinedFunction {
                    name: name.name.clone(),
                    span,
                })
            }
        };

        if def.arity() != args.len() {
            return Err(EvalError::ArityMismatch {
                name: name.name.clone(),
                expected: def.arity(),
                actual: args.len(),
                span,
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, env)?);
        }

        if self.call_depth >= self.config.max_call_depth {
            return Err(EvalError::StackOverflow {
                depth: self.config.max_call_depth,
                span,
            });
        }

        let mut call_env = Environment::child(env.global());
        for (param, value) in def.params.iter().zip(values) {
            call_env.bind(&param.name, value);
        }

        self.call_depth += 1;
        let flow = self.exec_block(&def.body, &mut call_env);
        self.call_depth -= 1;
        call_env.destroy();

        match flow? {
            Flow::Return(v) => Ok(v),
            Flow::Normal(_) => Ok(Value::Nothing),
        }
    }
}

fn eval_variable(name: &str, env: &Environment<'_>, span: Span) -> EvalResult<Value> {
    match env.lookup(name) {
        Some(Binding::Value(v)) => Ok(*v),
        Some(Binding::Function(_)) => Err(EvalError::TypeMismatch {
            context: format!("function '{name}' used as a value"),
            span,
        }),
        None => Err(EvalError::UndefinedVariable {
            name: name.to_string(),
            span,
        }),
    }
}

/// Apply a binary operator. Float if either side is float, integer
/// otherwise; integer division truncates toward zero.
fn eval_arith(op: BinOp, lv: Value, rv: Value, span: Span) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Int(a), Value::Int(b)) => {
            if op == BinOp::Div && b == 0 {
                return Err(EvalError::DivisionByZero { span });
            }
            let result = match op {
                BinOp::Add => a.checked_add(b),
                BinOp::Sub => a.checked_sub(b),
                BinOp::Mul => a.checked_mul(b),
                BinOp::Div => a.checked_div(b),
            };
            result.map(Value::Int).ok_or(EvalError::IntegerOverflow {
                op: op.symbol(),
                span,
            })
        }
        _ => {
            let (Some(a), Some(b)) = (lv.as_f64(), rv.as_f64()) else {
                let side = if lv.is_nothing() { "left" } else { "right" };
                return Err(EvalError::TypeMismatch {
                    context: format!("{side} operand of '{op}' has no value"),
                    span,
                });
            };
            let result = match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => {
                    if b == 0.0 {
                        return Err(EvalError::DivisionByZero { span });
                    }
                    a / b
                }
            };
            Ok(Value::Float(result))
        }
    }
}
