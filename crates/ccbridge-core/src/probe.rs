//! Availability probe for the wrapped executable.
//!
//! The probe runs in two steps, each re-evaluated on every call:
//!
//! 1. **Locate** the program on the search path. Absence is an `error`.
//! 2. **Liveness check**: run `<path> --help` with a short bound.
//!    - completes: `success`, carrying the path and help text
//!    - times out: `warning`, since the binary exists but may be blocked on
//!      an interactive prompt such as authentication
//!    - fails otherwise: `error` with the failure description

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{BridgeError, Result};
use crate::executor::ProcessRunner;
use crate::invocation::help_arguments;
use crate::types::{ExecutionOutcome, StatusReport};

/// Where to obtain the wrapped executable.
pub const INSTALL_URL: &str = "https://docs.anthropic.com/claude-code";

/// Default bound for the liveness check.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a program name to a path on the search path.
pub trait ExecutableLocator: Send + Sync {
    /// Locate `program`, returning `None` when it cannot be found.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// [`ExecutableLocator`] searching `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl ExecutableLocator for PathLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Locator with a fixed answer, for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator(Option<PathBuf>);

impl StaticLocator {
    /// A locator that always finds the program at `path`.
    pub fn found(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    /// A locator that never finds anything.
    pub fn missing() -> Self {
        Self(None)
    }
}

impl ExecutableLocator for StaticLocator {
    fn locate(&self, _program: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Answers whether the wrapped executable is present and responsive.
#[derive(Clone)]
pub struct AvailabilityProbe {
    program: String,
    timeout: Duration,
    locator: Arc<dyn ExecutableLocator>,
    runner: Arc<dyn ProcessRunner>,
}

impl AvailabilityProbe {
    /// Create a probe for `program`.
    pub fn new(
        program: impl Into<String>,
        locator: Arc<dyn ExecutableLocator>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_PROBE_TIMEOUT,
            locator,
            runner,
        }
    }

    /// Set the liveness-check bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program this probe checks.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Locate the program.
    ///
    /// # Errors
    ///
    /// [`BridgeError::MissingExecutable`] when it is not on the search path.
    pub fn locate(&self) -> Result<PathBuf> {
        self.locator
            .locate(&self.program)
            .ok_or_else(|| BridgeError::MissingExecutable {
                program: self.program.clone(),
            })
    }

    /// Run both probe steps and report.
    pub async fn check(&self) -> StatusReport {
        let path = match self.locate() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(program = %self.program, "executable not found");
                return StatusReport::Error {
                    message: "Claude Code CLI not found in PATH".to_string(),
                    error: e.to_string(),
                    suggestion: Some(format!(
                        "Please install Claude Code CLI following the instructions at {}",
                        INSTALL_URL
                    )),
                };
            }
        };
        let path_display = path.to_string_lossy().into_owned();

        let args = help_arguments(&path_display);
        match self.runner.run(&args, Some(self.timeout)).await {
            Ok(outcome) => {
                if let ExecutionOutcome::Failed { exit_code, .. } = &outcome {
                    tracing::debug!(?exit_code, "--help exited non-zero, treating as responsive");
                }
                StatusReport::Success {
                    message: "Claude Code CLI is installed and available".to_string(),
                    path: path_display,
                    help_output: outcome.stdout().to_string(),
                }
            }
            Err(BridgeError::ProbeTimeout { timeout }) => {
                tracing::warn!(
                    path = %path_display,
                    timeout_secs = timeout.as_secs(),
                    "liveness check timed out"
                );
                StatusReport::Warning {
                    message: "Claude Code CLI found but --help command timed out".to_string(),
                    path: path_display,
                    suggestion:
                        "The CLI may be waiting for authentication or have other issues"
                            .to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(path = %path_display, error = %e, "liveness check failed");
                StatusReport::Error {
                    message: "Error checking Claude Code status".to_string(),
                    error: e.to_string(),
                    suggestion: None,
                }
            }
        }
    }
}
