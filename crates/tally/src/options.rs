//! Run options.

use serde::{Deserialize, Serialize};
use tally_eval::EvalConfig;
use tally_parser::ParserConfig;

/// Options for one run, covering every stage that has knobs.
///
/// Missing fields fall back to their defaults, so `{}` is a valid
/// configuration:
///
/// ```json
/// { "parser": { "precedence": "standard" }, "eval": { "max_call_depth": 64 } }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub parser: ParserConfig,
    pub eval: EvalConfig,
}

impl RunOptions {
    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
