//! Tally interpreter: orchestrates the full pipeline for one source unit.
//!
//! ```text
//! Tally Source → Lexer → Parser → Evaluator → ProgramOutput
//! ```
//!
//! [`run`] returns the typed result; [`run_to_result`] returns a
//! serializable [`RunResult`] suitable for JSON output.

mod error;
mod options;

pub use error::{TallyError, TallyResult};
pub use options::RunOptions;
pub use tally_eval::{EvalConfig, ProgramOutput, Value};
pub use tally_parser::{ParserConfig, Precedence};
pub use tally_types::{Diagnostic, ErrorCategory, ErrorCode, SourceFile, Span};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_eval::Evaluator;
use tally_parser::Parser;

// ══════════════════════════════════════════════════════════════════════════════
// Run Result
// ══════════════════════════════════════════════════════════════════════════════

/// Outcome of a run, shaped for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    /// Program value; `None` on failure. `Nothing` serializes as `null`.
    pub value: Option<Value>,
    /// Global value bindings; empty on failure.
    pub globals: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Diagnostic>,
}

impl RunResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

/// Lex, parse and evaluate `source` with default options.
pub fn run(source: &str) -> TallyResult<ProgramOutput> {
    run_with(source, &RunOptions::default())
}

/// Lex, parse and evaluate `source`. The first error from any stage is
/// returned; later stages do not run.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn run_with(source: &str, options: &RunOptions) -> TallyResult<ProgramOutput> {
    let tokens = tally_lexer::tokenize(source)?;
    let program = Parser::with_config(tokens, options.parser).parse()?;
    let output = Evaluator::with_config(options.eval).eval_program(&program)?;
    tracing::debug!(value = %output.value, globals = output.globals.len(), "run complete");
    Ok(output)
}

/// Run `source` with default options and package the outcome.
pub fn run_to_result(source: &str, filename: &str) -> RunResult {
    run_to_result_with(source, filename, &RunOptions::default())
}

/// Run `source` and package the outcome. Errors are lowered into a
/// [`Diagnostic`] that names `filename` and quotes the offending line.
pub fn run_to_result_with(source: &str, filename: &str, options: &RunOptions) -> RunResult {
    match run_with(source, options) {
        Ok(output) => RunResult {
            success: true,
            value: Some(output.value),
            globals: output.globals,
            error: None,
        },
        Err(err) => {
            tracing::debug!(code = %err.code(), "run failed");
            let file = SourceFile::new(filename, source);
            RunResult {
                success: false,
                value: None,
                globals: BTreeMap::new(),
                error: Some(err.to_diagnostic(&file)),
            }
        }
    }
}

/// The interpreter version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
