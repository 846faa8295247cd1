//! Subprocess execution with output capture.

use std::process::Stdio;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{BridgeError, Result};
use crate::types::{ArgumentVector, ExecutionOutcome};

/// Runs an argument vector as a child process.
///
/// Implementations spawn exactly one process per call and await it before
/// returning. A nonzero exit is an [`ExecutionOutcome::Failed`], not an `Err`;
/// errors are reserved for the cases where no exit status exists.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `args`, waiting at most `timeout` when one is given.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::MissingExecutable`] when the program cannot be found
    /// - [`BridgeError::ProbeTimeout`] when `timeout` elapses first
    /// - [`BridgeError::UnexpectedFault`] for any other spawn or wait failure
    async fn run(&self, args: &ArgumentVector, timeout: Option<Duration>)
    -> Result<ExecutionOutcome>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
///
/// Bounded runs spawn the child with `kill_on_drop`, so a timed-out child is
/// killed and reaped in the background while the caller moves on.
///
/// Unbounded runs are never cancelled. The child is awaited on a detached
/// task that keeps draining its output, so dropping the returned future (for
/// example when an HTTP client disconnects) leaves the child running to
/// completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        args: &ArgumentVector,
        timeout: Option<Duration>,
    ) -> Result<ExecutionOutcome> {
        let command = args.render();

        let child = Command::new(args.program())
            .args(args.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(timeout.is_some())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => BridgeError::MissingExecutable {
                    program: args.program().to_string(),
                },
                _ => BridgeError::unexpected(format!(
                    "failed to spawn '{}': {}",
                    args.program(),
                    e
                )),
            })?;

        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::debug!(
                        command = %command,
                        timeout_secs = limit.as_secs_f64(),
                        "process timed out, killing"
                    );
                    return Err(BridgeError::ProbeTimeout { timeout: limit });
                }
            },
            None => tokio::spawn(child.wait_with_output())
                .await
                .map_err(|e| {
                    BridgeError::unexpected(format!("process wait task failed: {}", e))
                })??,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !stderr.is_empty() {
            tracing::debug!(command = %command, stderr = %stderr.trim(), "process stderr");
        }

        if output.status.success() {
            Ok(ExecutionOutcome::Success {
                stdout: stdout.trim().to_string(),
                stderr,
                command,
            })
        } else {
            Ok(ExecutionOutcome::Failed {
                stdout,
                stderr,
                exit_code: output.status.code(),
                command,
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Runner
// ─────────────────────────────────────────────────────────────────────────────

/// A runner returning pre-configured results in order, for tests.
///
/// Records every argument vector it receives and the peak number of calls in
/// flight at once.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: Mutex<Vec<Result<ExecutionOutcome>>>,
    calls: Mutex<Vec<(Vec<String>, Option<Duration>)>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockRunner {
    /// Create a runner with the given results.
    pub fn new(responses: Vec<Result<ExecutionOutcome>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            ..Default::default()
        }
    }

    /// A runner whose single call succeeds with `stdout`.
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self::new(vec![Ok(ExecutionOutcome::Success {
            stdout: stdout.into(),
            stderr: String::new(),
            command: String::new(),
        })])
    }

    /// Sleep this long inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Argument vectors received so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.lock_calls().iter().map(|(args, _)| args.clone()).collect()
    }

    /// Timeouts received so far, in call order.
    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        self.lock_calls().iter().map(|(_, timeout)| *timeout).collect()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Highest number of calls that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(Vec<String>, Option<Duration>)>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ProcessRunner for MockRunner {
    async fn run(
        &self,
        args: &ArgumentVector,
        timeout: Option<Duration>,
    ) -> Result<ExecutionOutcome> {
        self.lock_calls().push((args.as_slice().to_vec(), timeout));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        if responses.is_empty() {
            return Err(BridgeError::unexpected(
                "MockRunner: no more responses available",
            ));
        }
        match responses.remove(0) {
            Ok(ExecutionOutcome::Success { stdout, stderr, .. }) => Ok(ExecutionOutcome::Success {
                stdout,
                stderr,
                command: args.render(),
            }),
            Ok(ExecutionOutcome::Failed {
                stdout,
                stderr,
                exit_code,
                ..
            }) => Ok(ExecutionOutcome::Failed {
                stdout,
                stderr,
                exit_code,
                command: args.render(),
            }),
            Err(e) => Err(e),
        }
    }
}
