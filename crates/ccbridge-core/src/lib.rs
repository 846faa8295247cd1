//! Invocation bridging engine for ccbridge.
//!
//! This crate turns structured tool calls into invocations of a local
//! command-line program (Claude Code by default) and shapes the captured
//! output into structured results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ToolAdapter                                                │
//! │  - query: validate → build → run → normalize                │
//! │  - status: locate → bounded `--help`                        │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                    │
//!          ▼                  ▼                    ▼
//!   build_arguments     ProcessRunner      AvailabilityProbe
//!   (pure)              (tokio::process)   (ExecutableLocator)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use ccbridge_core::{BridgeConfig, QueryRequest, ToolAdapter};
//!
//! let adapter = ToolAdapter::new(BridgeConfig::default().with_max_concurrent(4));
//!
//! let result = adapter
//!     .query(QueryRequest::new("Explain this codebase").with_output_format("json"))
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//!
//! let status = adapter.status().await;
//! ```
//!
//! Neither operation returns `Err`: every failure is reported through the
//! `status` discriminator of [`QueryResult`] or [`StatusReport`].

pub mod adapter;
pub mod config;
pub mod error;
pub mod executor;
pub mod invocation;
pub mod normalize;
pub mod probe;
pub mod types;

pub use adapter::{QueryRequest, ToolAdapter};
pub use config::{BridgeConfig, DEFAULT_MODEL, DEFAULT_PROGRAM};
pub use error::{BridgeError, ErrorKind, Result};
pub use executor::{MockRunner, ProcessRunner, TokioProcessRunner};
pub use invocation::{build_arguments, help_arguments};
pub use normalize::normalize;
pub use probe::{
    AvailabilityProbe, DEFAULT_PROBE_TIMEOUT, ExecutableLocator, INSTALL_URL, PathLocator,
    StaticLocator,
};
pub use types::{
    ArgumentVector, ExecutionOutcome, InvocationSpec, OutputFormat, QueryResult, StatusReport,
};
