//! MCP server runners for hn-mcp.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use hn_core::control::HnControlPlane;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::HnMcp;

pub const DEFAULT_HTTP_ADDR: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::LOCALHOST, 4030));

/// Configuration for the MCP streamable HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
            sse_retry: Some(Duration::from_secs(3)),
        }
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_ADDR)
    }
}

/// Serves the MCP server over stdio with a single story session.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    control: HnControlPlane,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = HnMcp::new(control);
    let (stdin, stdout) = stdio();
    info!("hn-mcp serving on stdio");
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Serves the MCP server using streamable HTTP transport.
///
/// Each MCP session gets its own story session.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    control: HnControlPlane,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service: StreamableHttpService<HnMcp, LocalSessionManager> = StreamableHttpService::new(
        move || Ok(HnMcp::new(control.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            sse_keep_alive: config.sse_keep_alive,
            sse_retry: config.sse_retry,
            stateful_mode: config.stateful_mode,
            ..Default::default()
        },
    );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("hn-mcp listening on http://{}/mcp", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_config_binds_localhost() {
        let config = McpHttpServerConfig::default();
        assert_eq!(config.addr.to_string(), "127.0.0.1:4030");
        assert!(config.stateful_mode);
    }

    #[tokio::test]
    async fn http_bind_failure_is_returned() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral port should bind");
        let addr = taken.local_addr().expect("listener has an address");

        let control = HnControlPlane::from_config(
            &hn_core::client::ClientConfig::new("http://127.0.0.1:9"),
            hn_core::fetch::FetchOptions::default(),
        )
        .expect("control plane should build");
        let result = serve_streamable_http(control, McpHttpServerConfig::new(addr)).await;

        assert!(result.is_err(), "binding an occupied address should fail");
    }
}
