//! Integration tests for the Tally tree-walking evaluator.
//!
//! Tests key evaluator features:
//! - arithmetic and int/float promotion
//! - assignment and global bindings
//! - function definition, calls and arity
//! - scoping (call scopes see globals, never caller locals)
//! - return propagation through blocks and at top level
//! - runtime errors and the call depth guard

use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use tally_eval::{EvalConfig, EvalError, Evaluator, ProgramOutput, Value};
use tally_lexer::tokenize;
use tally_parser::{Parser, ParserConfig, Precedence};
use tally_types::ast::Program;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Lex and parse Tally source (panics on front-end errors).
fn parse_with(source: &str, config: ParserConfig) -> Program {
    let tokens = tokenize(source).unwrap_or_else(|e| panic!("lex error: {e}"));
    Parser::with_config(tokens, config)
        .parse()
        .unwrap_or_else(|e| panic!("parse error: {e}"))
}

fn run_with(source: &str, config: EvalConfig) -> Result<ProgramOutput, EvalError> {
    let program = parse_with(source, ParserConfig::default());
    Evaluator::with_config(config).eval_program(&program)
}

fn run(source: &str) -> Result<ProgramOutput, EvalError> {
    run_with(source, EvalConfig::default())
}

/// Run and return the program value (panics on runtime errors).
fn value(source: &str) -> Value {
    match run(source) {
        Ok(out) => out.value,
        Err(e) => panic!("runtime error: {e}"),
    }
}

fn run_err(source: &str) -> EvalError {
    match run(source) {
        Ok(out) => panic!("expected a runtime error, got {out:?}"),
        Err(e) => e,
    }
}

fn globals(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_integer_division_truncates() {
    assert_eq!(value("7/2"), Value::Int(3));
}

#[test]
fn test_float_promotion_in_division() {
    assert_eq!(value("7.0/2"), Value::Float(3.5));
    assert_eq!(value("7/2.0"), Value::Float(3.5));
}

#[test]
fn test_flat_precedence_is_default() {
    assert_eq!(value("2 + 3 * 4"), Value::Int(20));
}

#[test]
fn test_standard_precedence() {
    let cfg = ParserConfig {
        precedence: Precedence::Standard,
        ..ParserConfig::default()
    };
    let program = parse_with("2 + 3 * 4", cfg);
    let out = Evaluator::new().eval_program(&program).unwrap();
    assert_eq!(out.value, Value::Int(14));
}

#[test]
fn test_parentheses_override_flat_order() {
    assert_eq!(value("2 + (3 * 4)"), Value::Int(14));
}

#[test]
fn test_negative_results() {
    assert_eq!(value("1 - 5"), Value::Int(-4));
    assert_eq!(value("(0 - 7) / 2"), Value::Int(-3));
}

#[test]
fn test_long_left_nested_chain() {
    let src = vec!["1"; 200_000].join(" + ");
    assert_eq!(value(&src), Value::Int(200_000));
}

#[test]
fn test_long_chain_in_function_body() {
    let chain = vec!["n"; 200_000].join(" + ");
    let src = format!("func f(n) {{ return {chain}; }} f(1); f(2);");
    assert_eq!(value(&src), Value::Int(400_000));
}

// ══════════════════════════════════════════════════════════════════════════════
// Assignment & program result
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_assign_then_read() {
    let out = run("x = 5; x;").unwrap();
    assert_eq!(out.value, Value::Int(5));
    assert_eq!(out.globals, globals(&[("x", Value::Int(5))]));
}

#[test]
fn test_assignment_yields_value() {
    assert_eq!(value("y = 2.5"), Value::Float(2.5));
}

#[test]
fn test_chained_assignment() {
    let out = run("a = b = 4;").unwrap();
    assert_eq!(
        out.globals,
        globals(&[("a", Value::Int(4)), ("b", Value::Int(4))])
    );
}

#[test]
fn test_reassignment_overwrites() {
    let out = run("x = 1; x = x + 1; x = x * 10;").unwrap();
    assert_eq!(out.value, Value::Int(20));
    assert_eq!(out.globals, globals(&[("x", Value::Int(20))]));
}

#[test]
fn test_empty_program_yields_nothing() {
    let out = run("").unwrap();
    assert_eq!(out.value, Value::Nothing);
    assert!(out.globals.is_empty());
}

#[test]
fn test_definition_only_program_yields_nothing() {
    assert_eq!(value("func f() { return 1; }"), Value::Nothing);
}

#[test]
fn test_definition_does_not_replace_last_value() {
    assert_eq!(value("3; func f() { return 1; }"), Value::Int(3));
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_add_function() {
    assert_eq!(
        value("func add(a,b){return a+b;} add(2,3);"),
        Value::Int(5)
    );
}

#[test]
fn test_function_without_return_yields_nothing() {
    let v = value("func f() { 1 + 1; } f();");
    assert_eq!(v, Value::Nothing);
    assert_ne!(v, Value::Int(0));
}

#[test]
fn test_call_before_definition() {
    assert_eq!(
        value("add(2, 3); func add(a, b) { return a + b; }"),
        Value::Int(5)
    );
}

#[test]
fn test_functions_call_each_other() {
    let src = "
        func double(n) { return n * 2; }
        func quad(n) { return double(double(n)); }
        quad(3);
    ";
    assert_eq!(value(src), Value::Int(12));
}

#[test]
fn test_arguments_evaluated_left_to_right_in_caller_scope() {
    let out = run("func sub(a, b) { return a - b; } sub(x = 10, x / 2);").unwrap();
    assert_eq!(out.value, Value::Int(5));
    assert_eq!(out.globals, globals(&[("x", Value::Int(10))]));
}

#[test]
fn test_zero_arg_function() {
    assert_eq!(value("func seven() { return 7; } seven() + 1;"), Value::Int(8));
}

#[test]
fn test_many_parameters() {
    let params: Vec<String> = (0..50).map(|i| format!("p{i}")).collect();
    let args: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    let src = format!(
        "func last({}) {{ return p49; }} last({});",
        params.join(", "),
        args.join(", ")
    );
    assert_eq!(value(&src), Value::Int(49));
}

#[test]
fn test_redefinition_replaces_function() {
    let src = "
        func f() { return 1; }
        a = f();
        func f() { return 2; }
        b = f();
    ";
    let out = run(src).unwrap();
    // Each definition statement rebinds `f` when it runs.
    assert_eq!(
        out.globals,
        globals(&[("a", Value::Int(1)), ("b", Value::Int(2))])
    );
}

#[test]
fn test_functions_are_not_globals() {
    let out = run("func f() { return 1; } x = f();").unwrap();
    assert_eq!(out.globals, globals(&[("x", Value::Int(1))]));
}

// ══════════════════════════════════════════════════════════════════════════════
// Scoping
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_call_scope_reads_globals() {
    assert_eq!(value("y = 2; func f() { return y * 3; } f();"), Value::Int(6));
}

#[test]
fn test_call_scope_does_not_see_caller_locals() {
    let src = "
        func inner() { return secret; }
        func outer() { secret = 1; return inner(); }
        outer();
    ";
    assert!(matches!(
        run_err(src),
        EvalError::UndefinedVariable { name, .. } if name == "secret"
    ));
}

#[test]
fn test_locals_do_not_leak_into_globals() {
    let out = run("func f(a) { z = a + 1; return z; } r = f(1);").unwrap();
    assert_eq!(out.globals, globals(&[("r", Value::Int(2))]));
}

#[test]
fn test_parameter_shadows_global() {
    let out = run("a = 100; func f(a) { return a; } f(1);").unwrap();
    assert_eq!(out.value, Value::Int(1));
    assert_eq!(out.globals, globals(&[("a", Value::Int(100))]));
}

#[test]
fn test_assignment_in_call_shadows_global() {
    let out = run("g = 1; func f() { g = 5; return g; } f();").unwrap();
    assert_eq!(out.value, Value::Int(5));
    assert_eq!(out.globals, globals(&[("g", Value::Int(1))]));
}

#[test]
fn test_nested_definition_is_local_to_call() {
    let src = "func outer() { func inner() { return 1; } return inner() + 1; } outer();";
    assert_eq!(value(src), Value::Int(2));

    let err = run_err(&format!("{src} inner();"));
    assert!(matches!(err, EvalError::UndefinedFunction { name, .. } if name == "inner"));
}

// ══════════════════════════════════════════════════════════════════════════════
// Return propagation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_return_skips_remaining_statements() {
    assert_eq!(value("func f() { return 1; 2; } f();"), Value::Int(1));
}

#[test]
fn test_first_return_wins() {
    assert_eq!(value("func f() { return 1; return 2; } f();"), Value::Int(1));
}

#[test]
fn test_return_only_unwinds_to_call_boundary() {
    let src = "
        func g() { return 10; }
        func f() { a = g(); return a + 1; }
        f();
    ";
    assert_eq!(value(src), Value::Int(11));
}

#[test]
fn test_top_level_return_ends_program() {
    let out = run("x = 1; return x + 6; x = 99;").unwrap();
    assert_eq!(out.value, Value::Int(7));
    assert_eq!(out.globals, globals(&[("x", Value::Int(1))]));
}

// ══════════════════════════════════════════════════════════════════════════════
// Runtime errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_undefined_function() {
    assert!(matches!(
        run_err("missing(1);"),
        EvalError::UndefinedFunction { name, .. } if name == "missing"
    ));
}

#[test]
fn test_arity_mismatch() {
    let err = run_err("func add(a,b){return a+b;} add(1);");
    match err {
        EvalError::ArityMismatch {
            name,
            expected,
            actual,
            ..
        } => {
            assert_eq!(name, "add");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected ArityMismatch, got {other:?}"),
    }
}

#[test]
fn test_arity_checked_before_arguments() {
    let err = run_err("func f(a) { return a; } f(1, nope);");
    assert!(matches!(err, EvalError::ArityMismatch { .. }));
}

#[test]
fn test_undefined_variable() {
    assert!(matches!(
        run_err("x + 1;"),
        EvalError::UndefinedVariable { name, .. } if name == "x"
    ));
}

#[test]
fn test_division_by_zero() {
    assert!(matches!(run_err("1 / 0;"), EvalError::DivisionByZero { .. }));
    assert!(matches!(run_err("1.5 / 0;"), EvalError::DivisionByZero { .. }));
    assert!(matches!(run_err("1 / 0.0;"), EvalError::DivisionByZero { .. }));
}

#[test]
fn test_integer_overflow() {
    let err = run_err("9223372036854775807 + 1;");
    assert!(matches!(err, EvalError::IntegerOverflow { op: "+", .. }));
}

#[test]
fn test_nothing_in_arithmetic() {
    let err = run_err("func f() {} f() + 1;");
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
}

#[test]
fn test_function_used_as_value() {
    let err = run_err("func f() { return 1; } f + 1;");
    assert_eq!(err.to_string(), "type mismatch: function 'f' used as a value");
}

#[test]
fn test_value_called_as_function() {
    let err = run_err("x = 1; x();");
    assert_eq!(err.to_string(), "type mismatch: 'x' is int, not a function");
}

#[test]
fn test_error_span_points_at_failing_expression() {
    let err = run_err("x = 1;\ny = missing(2);");
    let span = err.span();
    assert_eq!((span.line, span.col), (2, 5));
}

#[test]
fn test_error_aborts_program() {
    let err = run_err("a = 1; b = 1 / 0; c = 3;");
    assert!(matches!(err, EvalError::DivisionByZero { .. }));
}

// ══════════════════════════════════════════════════════════════════════════════
// Call depth guard
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unbounded_recursion_hits_depth_limit() {
    let err = run("func f(n) { return f(n + 1); } f(0);").unwrap_err();
    assert!(matches!(err, EvalError::StackOverflow { depth: 1000, .. }));
}

#[test]
fn test_custom_call_depth() {
    let cfg = EvalConfig { max_call_depth: 3 };
    let src = "func a() { return b(); } func b() { return c(); } func c() { return 1; }";

    let ok = run_with(&format!("{src} a();"), cfg).unwrap();
    assert_eq!(ok.value, Value::Int(1));

    let cfg = EvalConfig { max_call_depth: 2 };
    let err = run_with(&format!("{src} a();"), cfg).unwrap_err();
    assert!(matches!(err, EvalError::StackOverflow { depth: 2, .. }));
}

#[test]
fn test_depth_resets_between_calls() {
    let cfg = EvalConfig { max_call_depth: 1 };
    let out = run_with("func f() { return 1; } f() + f() + f();", cfg).unwrap();
    assert_eq!(out.value, Value::Int(3));
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_determinism_100_iterations() {
    let src = "func sq(n) { return n * n; } a = sq(3); b = a / 2.0; a + b;";
    let first = run(src).unwrap();
    for i in 0..100 {
        assert_eq!(first, run(src).unwrap(), "Determinism failure at iteration {i}");
    }
}

#[test]
fn test_output_serializes_to_json() {
    let out = run("x = 2; y = 0.5; x + y;").unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "value": 2.5, "globals": { "x": 2, "y": 0.5 } })
    );
}
