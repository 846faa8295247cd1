//! ccbridge - MCP server wrapping the Claude Code CLI.
//!
//! Main entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{error, info};

use ccbridge_core::{BridgeConfig, DEFAULT_MODEL, DEFAULT_PROGRAM, INSTALL_URL, ToolAdapter};
use ccbridge_server::{QUERY_TOOL, STATUS_TOOL, Server, ServerConfig};

mod logging;

/// ccbridge - expose the Claude Code CLI as MCP tools
#[derive(Parser, Debug)]
#[command(name = "ccbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "localhost", env = "CCBRIDGE_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000, env = "CCBRIDGE_PORT")]
    pub port: u16,

    /// Executable to wrap
    #[arg(long, default_value = DEFAULT_PROGRAM, env = "CCBRIDGE_PROGRAM")]
    pub program: String,

    /// Model used when a query does not name one
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub default_model: String,

    /// Seconds to wait for `<program> --help` in the status check
    #[arg(long, default_value_t = 10)]
    pub probe_timeout_secs: u64,

    /// Maximum number of queries running at once (unbounded if unset)
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Directory for JSON log files, rotated daily
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn bridge_config(&self) -> BridgeConfig {
        let config = BridgeConfig::new(self.program.clone())
            .with_default_model(self.default_model.clone())
            .with_probe_timeout(Duration::from_secs(self.probe_timeout_secs));
        match self.max_concurrent {
            Some(limit) => config.with_max_concurrent(limit),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_dir.as_deref());

    let adapter = ToolAdapter::new(cli.bridge_config());

    let path = match adapter.probe().locate() {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, "Claude Code CLI is required but was not found");
            error!("Install it from {}", INSTALL_URL);
            return Err(anyhow!(e));
        }
    };
    info!(path = %path.display(), "found Claude Code CLI");

    let addr = resolve(&cli.host, cli.port).await?;

    info!("Claude Code MCP server listening on http://{}:{}/mcp", cli.host, cli.port);
    info!("Available tools: {}, {}", QUERY_TOOL, STATUS_TOOL);
    if let Some(limit) = adapter.config().max_concurrent {
        info!(limit, "limiting concurrent queries");
    }

    Server::new(adapter, ServerConfig::new(addr))
        .run_until(shutdown_signal())
        .await
        .context("server failed")
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("failed to resolve {}:{}", host, port))?
        .next()
        .ok_or_else(|| anyhow!("{}:{} resolved to no addresses", host, port))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
