//! The externally exposed operations: query and status.
//!
//! Every failure is converted into a structured result here. Nothing below
//! this boundary reaches the transport as an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::executor::{ProcessRunner, TokioProcessRunner};
use crate::invocation::build_arguments;
use crate::normalize::normalize;
use crate::probe::{AvailabilityProbe, ExecutableLocator, PathLocator};
use crate::types::{InvocationSpec, OutputFormat, QueryResult, StatusReport};

/// Arguments of the query operation as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The prompt to send. Required and non-empty.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Model identifier; the configured default when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Output format name; `text` when absent.
    #[serde(default)]
    pub output_format: Option<String>,
}

impl QueryRequest {
    /// Create a request carrying a prompt.
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
    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }
}

/// Composes builder, executor, normalizer and probe into the two operations.
///
/// Stateless across calls apart from the optional concurrency limiter, so a
/// single instance can be shared behind an `Arc` by concurrent handlers.
#[derive(Clone)]
pub struct ToolAdapter {
    config: BridgeConfig,
    runner: Arc<dyn ProcessRunner>,
    probe: AvailabilityProbe,
    limiter: Option<Arc<Semaphore>>,
}

impl ToolAdapter {
    /// Create an adapter that spawns real processes and searches `PATH`.
    pub fn new(config: BridgeConfig) -> Self {
        Self::with_components(
            config,
            Arc::new(TokioProcessRunner::new()),
            Arc::new(PathLocator),
        )
    }

    /// Create an adapter with an injected runner and locator.
    pub fn with_components(
        config: BridgeConfig,
        runner: Arc<dyn ProcessRunner>,
        locator: Arc<dyn ExecutableLocator>,
    ) -> Self {
        let probe = AvailabilityProbe::new(config.program.clone(), locator, runner.clone())
            .with_timeout(config.probe_timeout);
        let limiter = config.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));

        Self {
            config,
            runner,
            probe,
            limiter,
        }
    }

    /// The adapter's configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The availability probe used by [`status`](Self::status).
    pub fn probe(&self) -> &AvailabilityProbe {
        &self.probe
    }

    /// Run a query through the wrapped executable.
    pub async fn query(&self, request: QueryRequest) -> QueryResult {
        let prompt = match request.prompt.filter(|p| !p.is_empty()) {
            Some(prompt) => prompt,
            None => {
                tracing::warn!("query rejected: missing prompt");
                return QueryResult::from_error(&BridgeError::MissingPrompt, None);
            }
        };

        let output_format = match request.output_format.as_deref() {
            None | Some("") => OutputFormat::default(),
            Some(name) => match name.parse::<OutputFormat>() {
                Ok(format) => format,
                Err(e) => {
                    tracing::warn!(output_format = %name, "query rejected: unknown output format");
                    return QueryResult::from_error(&e, None);
                }
            },
        };

        let model = request
            .model
            .unwrap_or_else(|| self.config.default_model.clone());

        let spec = InvocationSpec::new(prompt)
            .with_model(model)
            .with_output_format(output_format);
        let args = build_arguments(&self.config.program, &spec);

        let _permit = match &self.limiter {
            Some(limiter) => match limiter.clone().acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(e) => {
                    let err = BridgeError::unexpected(format!("concurrency limiter closed: {}", e));
                    return QueryResult::from_error(&err, Some(args.render()));
                }
            },
            None => None,
        };

        tracing::info!(command = %args, "executing command");

        match self.runner.run(&args, None).await {
            Ok(outcome) => {
                let result = normalize(outcome, output_format);
                if let QueryResult::Error {
                    exit_code, error, ..
                } = &result
                {
                    tracing::warn!(?exit_code, error = %error, "command failed");
                }
                result
            }
            Err(e) => {
                tracing::warn!(command = %args, error = %e, "command could not be run");
                QueryResult::from_error(&e, Some(args.render()))
            }
        }
    }

    /// Probe the wrapped executable. Every call re-probes from scratch.
    pub async fn status(&self) -> StatusReport {
        self.probe.check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::executor::MockRunner;
    use crate::probe::StaticLocator;
    use crate::types::ExecutionOutcome;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn adapter(runner: Arc<MockRunner>) -> ToolAdapter {
        ToolAdapter::with_components(
            BridgeConfig::default(),
            runner,
            Arc::new(StaticLocator::found("/usr/bin/claude")),
        )
    }

    #[tokio::test]
    async fn test_missing_prompt_never_spawns() {
        let runner = Arc::new(MockRunner::new(vec![]));
        let adapter = adapter(runner.clone());

        for request in [QueryRequest::default(), QueryRequest::new("")] {
            match adapter.query(request).await {
                QueryResult::Error {
                    kind,
                    error,
                    command,
                    ..
                } => {
                    assert_eq!(kind, ErrorKind::MissingPrompt);
                    assert_eq!(error, "Missing required parameter: prompt");
                    assert!(command.is_none());
                }
                other => panic!("expected Error, got {:?}", other),
            }
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_default_model_and_format() {
        let runner = Arc::new(MockRunner::with_stdout("hello"));
        let result = adapter(runner.clone())
            .query(QueryRequest::new("say hi"))
            .await;

        assert_eq!(
            runner.calls(),
            vec![vec![
                "claude".to_string(),
                "--model".to_string(),
                "sonnet".to_string(),
                "--print".to_string(),
                "say hi".to_string(),
            ]]
        );
        assert_eq!(runner.timeouts(), vec![None]);

        match result {
            QueryResult::Success {
                output, command, ..
            } => {
                assert_eq!(output, "hello");
                assert_eq!(command, "claude --model sonnet --print say hi");
            }
            other => panic!("expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_output_parsed() {
        let runner = Arc::new(MockRunner::with_stdout(r#"{"a":1}"#));
        let result = adapter(runner.clone())
            .query(QueryRequest::new("x").with_output_format("json"))
            .await;

        assert_eq!(result.parsed_output(), Some(&json!({"a": 1})));
        assert!(!result.is_error());
        assert!(runner.calls()[0].contains(&"--output-format".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_json_is_success_without_parsed_output() {
        let runner = Arc::new(MockRunner::with_stdout("not json"));
        let result = adapter(runner)
            .query(QueryRequest::new("x").with_output_format("json"))
            .await;

        match result {
            QueryResult::Success {
                output,
                parsed_output,
                ..
            } => {
                assert_eq!(output, "not json");
                assert!(parsed_output.is_none());
            }
            other => panic!("expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let runner = Arc::new(MockRunner::new(vec![Ok(ExecutionOutcome::Failed {
            stdout: String::new(),
            stderr: "boom".to_string(),
            exit_code: Some(1),
            command: String::new(),
        })]));
        match adapter(runner).query(QueryRequest::new("x")).await {
            QueryResult::Error {
                kind,
                stderr,
                exit_code,
                command,
                ..
            } => {
                assert_eq!(kind, ErrorKind::ProcessFailed);
                assert_eq!(stderr.as_deref(), Some("boom"));
                assert_eq!(exit_code, Some(1));
                assert!(command.is_some());
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure_is_structured() {
        let runner = Arc::new(MockRunner::new(vec![Err(BridgeError::MissingExecutable {
            program: "claude".to_string(),
        })]));
        match adapter(runner).query(QueryRequest::new("x")).await {
            QueryResult::Error {
                kind,
                exit_code,
                command,
                ..
            } => {
                assert_eq!(kind, ErrorKind::MissingExecutable);
                assert!(exit_code.is_none());
                assert_eq!(
                    command.as_deref(),
                    Some("claude --model sonnet --print x")
                );
            }
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_output_format_is_text() {
        let runner = Arc::new(MockRunner::with_stdout("plain"));
        let result = adapter(runner.clone())
            .query(QueryRequest::new("x").with_output_format(""))
            .await;

        assert!(!result.is_error());
        assert_eq!(
            runner.calls(),
            vec![vec![
                "claude".to_string(),
                "--model".to_string(),
                "sonnet".to_string(),
                "--print".to_string(),
                "x".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn test_unknown_output_format_rejected() {
        let runner = Arc::new(MockRunner::new(vec![]));
        let result = adapter(runner.clone())
            .query(QueryRequest::new("x").with_output_format("xml"))
            .await;

        match result {
            QueryResult::Error { kind, .. } => assert_eq!(kind, ErrorKind::InvalidArgument),
            other => panic!("expected Error, got {:?}", other),
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_model_and_configured_default() {
        let runner = Arc::new(MockRunner::new(vec![
            Ok(ExecutionOutcome::Success {
                stdout: String::new(),
                stderr: String::new(),
                command: String::new(),
            }),
            Ok(ExecutionOutcome::Success {
                stdout: String::new(),
                stderr: String::new(),
                command: String::new(),
            }),
        ]));
        let adapter = ToolAdapter::with_components(
            BridgeConfig::default().with_default_model("haiku"),
            runner.clone(),
            Arc::new(StaticLocator::missing()),
        );

        adapter.query(QueryRequest::new("a").with_model("opus")).await;
        adapter.query(QueryRequest::new("b")).await;

        let calls = runner.calls();
        assert_eq!(calls[0][2], "opus");
        assert_eq!(calls[1][2], "haiku");
    }

    #[tokio::test]
    async fn test_concurrency_limit() {
        let responses = (0..6)
            .map(|_| {
                Ok(ExecutionOutcome::Success {
                    stdout: "ok".to_string(),
                    stderr: String::new(),
                    command: String::new(),
                })
            })
            .collect();
        let runner = Arc::new(MockRunner::new(responses).with_delay(Duration::from_millis(50)));
        let adapter = ToolAdapter::with_components(
            BridgeConfig::default().with_max_concurrent(2),
            runner.clone(),
            Arc::new(StaticLocator::missing()),
        );

        let mut handles = Vec::new();
        for i in 0..6 {
            let adapter = adapter.clone();
            handles.push(tokio::spawn(async move {
                adapter.query(QueryRequest::new(format!("q{}", i))).await
            }));
        }
        for handle in handles {
            assert!(!handle.await.unwrap().is_error());
        }

        assert_eq!(runner.call_count(), 6);
        assert!(runner.peak_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_unbounded_by_default() {
        let responses = (0..4)
            .map(|_| {
                Ok(ExecutionOutcome::Success {
                    stdout: "ok".to_string(),
                    stderr: String::new(),
                    command: String::new(),
                })
            })
            .collect();
        let runner = Arc::new(MockRunner::new(responses).with_delay(Duration::from_millis(200)));
        let adapter = adapter(runner.clone());

        let mut handles = Vec::new();
        for i in 0..4 {
            let adapter = adapter.clone();
            handles.push(tokio::spawn(async move {
                adapter.query(QueryRequest::new(format!("q{}", i))).await
            }));
        }
        for handle in handles {
            assert!(!handle.await.unwrap().is_error());
        }

        assert_eq!(runner.peak_in_flight(), 4);
    }

    struct CountingLocator(AtomicUsize);

    impl ExecutableLocator for CountingLocator {
        fn locate(&self, _program: &str) -> Option<PathBuf> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Some(PathBuf::from("/usr/bin/claude"))
        }
    }

    #[tokio::test]
    async fn test_status_reprobes_every_call() {
        let locator = Arc::new(CountingLocator(AtomicUsize::new(0)));
        let runner = Arc::new(MockRunner::new(vec![
            Ok(ExecutionOutcome::Success {
                stdout: "help".to_string(),
                stderr: String::new(),
                command: String::new(),
            }),
            Err(BridgeError::ProbeTimeout {
                timeout: Duration::from_secs(10),
            }),
        ]));
        let adapter =
            ToolAdapter::with_components(BridgeConfig::default(), runner.clone(), locator.clone());

        assert!(matches!(adapter.status().await, StatusReport::Success { .. }));
        assert!(matches!(adapter.status().await, StatusReport::Warning { .. }));
        assert_eq!(locator.0.load(Ordering::SeqCst), 2);
        assert_eq!(runner.call_count(), 2);
    }
}
