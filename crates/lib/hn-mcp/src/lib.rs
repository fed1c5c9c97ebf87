//! MCP server implementation for hn-mcp.
//!
//! This crate wires the control plane into rmcp tool handlers and exposes the
//! read-only Hacker News query tools over stdio or streamable HTTP.

mod helpers;
mod tools;
pub mod server;

use hn_core::control::{HnControlPlane, ToolRequest};
use hn_core::session::StorySession;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use tracing::debug;

const SERVER_INSTRUCTIONS: &str = r"hn-mcp provides read-only tools over the public Hacker News API.

Workflow:
1. List stories with `list-latest`, `list-top`, or `list-best` (optional `limit`, 1-50, default 10).
   The most recent list is remembered for this session.
2. Read a story with `get-story` using its `story_id`.
3. Read a story's direct comments with `get-comments`, passing either `story_id` or
   `story_index` (1-based position in the most recent list). `story_id` wins when both are given.

Notes:
- Only first-level comments are fetched; reply counts cover direct replies only.
- Comment text has `&gt; &lt; &amp; &quot;` decoded and tags stripped; other entities are left as-is.
- Use `help` for a command summary. `health` returns `ok`.";

/// MCP server wrapper around the control plane and this connection's session.
#[derive(Clone)]
pub struct HnMcp {
    tool_router: ToolRouter<Self>,
    control: HnControlPlane,
    session: StorySession,
}

impl HnMcp {
    /// Creates a server with a fresh story session.
    #[must_use]
    pub fn new(control: HnControlPlane) -> Self {
        Self::with_session(control, StorySession::new())
    }

    /// Creates a server bound to an existing story session.
    #[must_use]
    pub fn with_session(control: HnControlPlane, session: StorySession) -> Self {
        let tool_router =
            Self::tool_router_core() + Self::tool_router_stories() + Self::tool_router_context();
        Self {
            tool_router,
            control,
            session,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &StorySession {
        &self.session
    }

    /// Runs a decoded request and wraps the rendered text as a tool result.
    pub(crate) async fn run(&self, request: ToolRequest) -> Result<CallToolResult, ErrorData> {
        debug!(operation = request.operation(), "dispatching tool request");
        let text = self
            .control
            .dispatch(request, &self.session)
            .await
            .map_err(helpers::map_dispatch_err)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl HnMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for HnMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
