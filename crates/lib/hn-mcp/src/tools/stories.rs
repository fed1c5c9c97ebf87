use hn_core::client::StoryCategory;
use hn_core::control::ToolRequest;
use hn_core::control::request::{DEFAULT_LIMIT, MAX_LIMIT};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, Schema, SchemaGenerator, json_schema},
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{HnMcp, helpers};

/// Parameters for the story list tools.
///
/// Numeric fields are kept as raw JSON so that numeric strings are accepted
/// and malformed values get a descriptive error from the request decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListStoriesParams {
    #[serde(default)]
    #[schemars(schema_with = "limit_schema")]
    pub limit: Option<Value>,
}

/// Parameters for fetching a single story.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetStoryParams {
    #[serde(default)]
    #[schemars(schema_with = "story_id_schema")]
    pub story_id: Option<Value>,
}

/// Parameters for fetching a story's direct comments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetCommentsParams {
    #[serde(default)]
    #[schemars(schema_with = "story_id_schema")]
    pub story_id: Option<Value>,
    #[serde(default)]
    #[schemars(schema_with = "story_index_schema")]
    pub story_index: Option<Value>,
}

fn limit_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_LIMIT,
        "default": DEFAULT_LIMIT,
        "description": "Number of stories to return."
    })
}

fn story_id_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "integer",
        "minimum": 0,
        "description": "Hacker News item id of the story."
    })
}

fn story_index_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "integer",
        "minimum": 1,
        "description": "1-based position of the story in the most recent list result."
    })
}

impl HnMcp {
    async fn list(
        &self,
        category: StoryCategory,
        params: &ListStoriesParams,
    ) -> Result<CallToolResult, ErrorData> {
        let request =
            ToolRequest::list(category, params.limit.as_ref()).map_err(helpers::map_dispatch_err)?;
        self.run(request).await
    }
}

#[tool_router(router = tool_router_stories, vis = "pub")]
impl HnMcp {
    #[tool(
        name = "list-latest",
        description = "List the newest Hacker News stories. Remembers the list for story_index lookups."
    )]
    async fn list_latest(
        &self,
        Parameters(params): Parameters<ListStoriesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.list(StoryCategory::Latest, &params).await
    }

    #[tool(
        name = "list-top",
        description = "List the top Hacker News stories. Remembers the list for story_index lookups."
    )]
    async fn list_top(
        &self,
        Parameters(params): Parameters<ListStoriesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.list(StoryCategory::Top, &params).await
    }

    #[tool(
        name = "list-best",
        description = "List the best Hacker News stories. Remembers the list for story_index lookups."
    )]
    async fn list_best(
        &self,
        Parameters(params): Parameters<ListStoriesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.list(StoryCategory::Best, &params).await
    }

    #[tool(
        name = "get-story",
        description = "Fetch a single story by id, including its text when present."
    )]
    async fn get_story(
        &self,
        Parameters(params): Parameters<GetStoryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request =
            ToolRequest::get_story(params.story_id.as_ref()).map_err(helpers::map_dispatch_err)?;
        self.run(request).await
    }

    #[tool(
        name = "get-comments",
        description = "Fetch the direct comments of a story by story_id, or by story_index into the most recent list."
    )]
    async fn get_comments(
        &self,
        Parameters(params): Parameters<GetCommentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request =
            ToolRequest::get_comments(params.story_id.as_ref(), params.story_index.as_ref())
                .map_err(helpers::map_dispatch_err)?;
        self.run(request).await
    }
}
