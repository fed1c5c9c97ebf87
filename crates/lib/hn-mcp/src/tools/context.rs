use hn_core::control::request::{GET_COMMENTS, GET_STORY, LIST_BEST, LIST_LATEST, LIST_TOP};
use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::HnMcp;

/// Payload listing the MCP commands this server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List the MCP commands this server exposes.".to_string(),
                "health - Health check. Returns 'ok'.".to_string(),
                format!("{LIST_LATEST} - Newest stories. Optional limit (1-50, default 10)."),
                format!("{LIST_TOP} - Top stories. Optional limit (1-50, default 10)."),
                format!("{LIST_BEST} - Best stories. Optional limit (1-50, default 10)."),
                format!("{GET_STORY} - One story by story_id, with its text when present."),
                format!(
                    "{GET_COMMENTS} - Direct comments of a story by story_id, or by story_index into the most recent list."
                ),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl HnMcp {
    #[tool(description = "List the MCP commands this server exposes.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
