//! Data model for bridged invocations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, ErrorKind};

// ─────────────────────────────────────────────────────────────────────────────
// Invocation inputs
// ─────────────────────────────────────────────────────────────────────────────

/// Requested shape of the executable's stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Plain text (the executable's default).
    #[default]
    Text,
    /// A single JSON document.
    Json,
    /// Newline-delimited JSON events.
    StreamJson,
}

impl OutputFormat {
    /// The value passed to `--output-format`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::StreamJson => "stream-json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "stream-json" => Ok(Self::StreamJson),
            other => Err(BridgeError::invalid_argument(
                "output_format",
                format!("'{}' (expected text, json, or stream-json)", other),
            )),
        }
    }
}

/// Parameters for one invocation of the wrapped executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationSpec {
    /// Prompt passed as the trailing positional argument.
    pub prompt: Option<String>,
    /// Model identifier for `--model`.
    pub model: Option<String>,
    /// Requested output format.
    pub output_format: OutputFormat,
}

impl InvocationSpec {
    /// Create a spec carrying a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the output format.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Ordered argument vector, program name first.
///
/// Immutable once built; handed to the process executor as a vector, never
/// joined into a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentVector(Vec<String>);

impl ArgumentVector {
    pub(crate) fn new(args: Vec<String>) -> Self {
        Self(args)
    }

    /// The program to execute.
    pub fn program(&self) -> &str {
        &self.0[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    /// All elements, program name included.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Render the vector for diagnostics.
    pub fn render(&self) -> String {
        self.0.join(" ")
    }
}

impl fmt::Display for ArgumentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Execution results
// ─────────────────────────────────────────────────────────────────────────────

/// Completion state of a child process that was started and awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Exit status zero.
    Success {
        /// Captured stdout, trimmed.
        stdout: String,
        /// Captured stderr, verbatim.
        stderr: String,
        /// Rendered argument vector.
        command: String,
    },
    /// Nonzero exit status or termination by signal.
    Failed {
        /// Captured stdout, verbatim.
        stdout: String,
        /// Captured stderr, verbatim.
        stderr: String,
        /// Exit code, absent when killed by a signal.
        exit_code: Option<i32>,
        /// Rendered argument vector.
        command: String,
    },
}

impl ExecutionOutcome {
    /// Whether the process exited successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Captured stdout.
    pub fn stdout(&self) -> &str {
        match self {
            Self::Success { stdout, .. } | Self::Failed { stdout, .. } => stdout,
        }
    }

    /// Captured stderr.
    pub fn stderr(&self) -> &str {
        match self {
            Self::Success { stderr, .. } | Self::Failed { stderr, .. } => stderr,
        }
    }

    /// Exit code of a failed run. `None` on success or when killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Success { .. } => None,
            Self::Failed { exit_code, .. } => *exit_code,
        }
    }

    /// Rendered command line.
    pub fn command(&self) -> &str {
        match self {
            Self::Success { command, .. } | Self::Failed { command, .. } => command,
        }
    }
}

/// Result of the query operation as returned to callers.
///
/// Serialized with a `status` discriminator of `success` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryResult {
    /// The executable ran and exited with status zero.
    Success {
        /// Raw stdout, trimmed.
        output: String,
        /// Parsed stdout; present only for `json` output that parsed cleanly.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parsed_output: Option<Value>,
        /// Captured stderr.
        stderr: String,
        /// Rendered command line.
        command: String,
    },
    /// The query could not be completed.
    Error {
        /// Classification of the failure.
        kind: ErrorKind,
        /// Human-readable description.
        error: String,
        /// Stdout captured before failure, if the process ran.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        /// Stderr captured before failure, if the process ran.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
        /// Exit code, if the process exited normally.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
        /// Rendered command line, if one was built.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        command: Option<String>,
    },
}

impl QueryResult {
    /// Build an error result for a failure that happened before or instead of
    /// a completed process.
    pub fn from_error(err: &BridgeError, command: Option<String>) -> Self {
        Self::Error {
            kind: err.kind(),
            error: err.to_string(),
            output: None,
            stderr: None,
            exit_code: None,
            command,
        }
    }

    /// Whether this is an error result.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Parsed output, if any.
    pub fn parsed_output(&self) -> Option<&Value> {
        match self {
            Self::Success { parsed_output, .. } => parsed_output.as_ref(),
            Self::Error { .. } => None,
        }
    }
}

/// Result of the availability probe.
///
/// `Warning` means the executable exists but did not answer in time, which is
/// distinct from its absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusReport {
    /// The executable was found and answered `--help`.
    Success {
        message: String,
        /// Resolved location of the executable.
        path: String,
        /// Help text, as evidence of liveness.
        help_output: String,
    },
    /// The executable was found but did not answer within the bound.
    Warning {
        message: String,
        path: String,
        suggestion: String,
    },
    /// The executable is missing or the check failed outright.
    Error {
        message: String,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
    },
}

impl StatusReport {
    /// Whether this is an error report.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Located path, when the executable was found.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Success { path, .. } | Self::Warning { path, .. } => Some(path),
            Self::Error { .. } => None,
        }
    }
}
