//! Bridge configuration.

use std::time::Duration;

use crate::probe::DEFAULT_PROBE_TIMEOUT;

/// Default program to wrap.
pub const DEFAULT_PROGRAM: &str = "claude";

/// Model used when a query does not name one.
pub const DEFAULT_MODEL: &str = "sonnet";

/// Immutable configuration for the [`ToolAdapter`](crate::ToolAdapter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Program name or path of the wrapped executable.
    pub program: String,

    /// Model used when a query omits one.
    pub default_model: String,

    /// Bound for the liveness check.
    pub probe_timeout: Duration,

    /// Maximum number of query subprocesses running at once.
    /// `None` means unbounded.
    pub max_concurrent: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_concurrent: None,
        }
    }
}

impl BridgeConfig {
    /// Create a config wrapping `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Set the default model.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the liveness-check bound.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Bound concurrent query subprocesses. Zero is treated as one.
    pub fn with_max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = Some(limit.max(1));
        self
    }
}
