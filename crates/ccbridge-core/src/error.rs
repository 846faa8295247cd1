//! Error taxonomy for bridged invocations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error type for bridge operations.
///
/// These never reach the transport: the [`ToolAdapter`](crate::ToolAdapter)
/// turns each one into a structured result carrying its [`ErrorKind`].
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The executable could not be found on the search path.
    #[error("'{program}' not found in PATH")]
    MissingExecutable {
        /// Program name that was looked up.
        program: String,
    },

    /// The process ran and exited with a nonzero status.
    #[error("command exited with {}: {}", exit_label(.exit_code), .stderr.trim())]
    ProcessFailed {
        /// Exit code, absent when the process was killed by a signal.
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The liveness check did not complete within its bound.
    #[error("no response within {}s", .timeout.as_secs())]
    ProbeTimeout {
        /// The bound that was exceeded.
        timeout: std::time::Duration,
    },

    /// Any failure not classified above (spawn I/O error, wait failure).
    #[error("unexpected error: {0}")]
    UnexpectedFault(String),

    /// A query arrived without a prompt.
    #[error("Missing required parameter: prompt")]
    MissingPrompt,

    /// A caller-supplied argument had an unusable value.
    #[error("invalid value for '{name}': {message}")]
    InvalidArgument {
        /// Parameter name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "signal".to_string(),
    }
}

impl BridgeError {
    /// Create an unexpected fault.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedFault(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// The stable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingExecutable { .. } => ErrorKind::MissingExecutable,
            Self::ProcessFailed { .. } => ErrorKind::ProcessFailed,
            Self::ProbeTimeout { .. } => ErrorKind::ProbeTimeout,
            Self::UnexpectedFault(_) => ErrorKind::UnexpectedFault,
            Self::MissingPrompt => ErrorKind::MissingPrompt,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Wire-level classification carried in error results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingExecutable,
    ProcessFailed,
    ProbeTimeout,
    UnexpectedFault,
    MissingPrompt,
    InvalidArgument,
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        Self::UnexpectedFault(e.to_string())
    }
}
