//! Output-format-aware shaping of execution outcomes.

use crate::error::BridgeError;
use crate::types::{ExecutionOutcome, OutputFormat, QueryResult};

/// Shape an outcome into the result returned to callers.
///
/// For `json` output on a successful run, stdout is parsed. A parse failure is
/// not an error: the result simply carries the raw text without
/// `parsed_output`. Every other combination passes the outcome through.
pub fn normalize(outcome: ExecutionOutcome, format: OutputFormat) -> QueryResult {
    match outcome {
        ExecutionOutcome::Success {
            stdout,
            stderr,
            command,
        } => {
            let parsed_output = if format == OutputFormat::Json && !stdout.is_empty() {
                match serde_json::from_str(&stdout) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::debug!(error = %e, "json output did not parse, returning raw text");
                        None
                    }
                }
            } else {
                None
            };

            QueryResult::Success {
                output: stdout,
                parsed_output,
                stderr,
                command,
            }
        }
        ExecutionOutcome::Failed {
            stdout,
            stderr,
            exit_code,
            command,
        } => {
            let err = BridgeError::ProcessFailed {
                exit_code,
                stderr: stderr.clone(),
            };

            QueryResult::Error {
                kind: err.kind(),
                error: err.to_string(),
                output: Some(stdout),
                stderr: Some(stderr),
                exit_code,
                command: Some(command),
            }
        }
    }
}
