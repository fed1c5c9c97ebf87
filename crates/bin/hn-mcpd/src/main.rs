//! Daemon entry point for the Hacker News MCP server.
//!
//! Loads configuration from the command line and environment, then serves the
//! MCP protocol over stdio and/or streamable HTTP. All diagnostics go to
//! stderr; stdout belongs to the protocol.

mod config;

use std::error::Error;
use std::future::Future;

use hn_core::control::{HnControlPlane, ToolRequest};
use hn_core::session::StorySession;
use hn_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{HnConfig, OneShotCall};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = HnConfig::from_args()?;
    init_tracing(&config.log_filter);

    let control = HnControlPlane::from_config(&config.client_config(), config.fetch_options())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = control.client().base_url(),
        "starting hn-mcpd"
    );

    if let Some(call) = config.call {
        return run_once(&control, call).await;
    }

    let stdio = config.enable_stdio.then(|| serve_stdio(control.clone()));
    let http = config.mcp_serve.then(|| {
        serve_streamable_http(control, McpHttpServerConfig::new(config.mcp_http_addr))
    });
    let result = until_first_exit(stdio, http).await;
    if let Err(err) = &result {
        error!(error = %err, "transport stopped");
    }
    result
}

/// Drives the enabled transports until one of them returns.
///
/// A failure in either transport ends the process.
async fn until_first_exit<S, H>(stdio: Option<S>, http: Option<H>) -> Result<(), BoxError>
where
    S: Future<Output = Result<(), BoxError>>,
    H: Future<Output = Result<(), BoxError>>,
{
    match (stdio, http) {
        (Some(stdio), Some(http)) => tokio::select! {
            result = stdio => result,
            result = http => result,
        },
        (Some(stdio), None) => stdio.await,
        (None, Some(http)) => http.await,
        (None, None) => Ok(()),
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

async fn run_once(control: &HnControlPlane, call: OneShotCall) -> Result<(), BoxError> {
    let request = ToolRequest::decode(&call.operation, &call.arguments)?;
    let text = control.dispatch(request, &StorySession::new()).await?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::future::{Ready, pending, ready};

    use super::*;

    type Outcome = Result<(), BoxError>;

    #[tokio::test]
    async fn http_failure_ends_a_running_stdio_transport() {
        let stdio = pending::<Outcome>();
        let http = ready::<Outcome>(Err("address in use".into()));

        let err = until_first_exit(Some(stdio), Some(http))
            .await
            .expect_err("http failure should surface");
        assert_eq!(err.to_string(), "address in use");
    }

    #[tokio::test]
    async fn stdio_exit_returns_its_result() {
        let result = until_first_exit(Some(ready::<Outcome>(Ok(()))), Some(pending::<Outcome>())).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn no_transports_is_a_clean_exit() {
        let result = until_first_exit(None::<Ready<Outcome>>, None::<Ready<Outcome>>).await;
        assert!(result.is_ok());
    }
}
