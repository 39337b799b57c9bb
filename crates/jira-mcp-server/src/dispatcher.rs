//! Routes tool calls to the Jira client
//!
//! This is the one place where failures are caught: whatever goes wrong while
//! parsing arguments or talking to Jira comes back as an error result, never
//! as a protocol-level error.

use std::sync::Arc;

use jira_mcp_client::JiraClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::tools::{self, ToolCall, ToolDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// MCP `CallToolResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text {
                text: format!("Error: {}", message.into()),
            }],
            is_error: true,
        }
    }

    /// Concatenated text of all content blocks.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|Content::Text { text }| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct Dispatcher {
    client: Arc<JiraClient>,
}

impl Dispatcher {
    pub fn new(client: Arc<JiraClient>) -> Self {
        Self { client }
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        tools::list_tools()
    }

    pub async fn call_tool(&self, name: &str, arguments: &Value) -> ToolResult {
        let outcome = match ToolCall::parse(name, arguments) {
            Ok(call) => self.execute(call).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value)
                    .unwrap_or_else(|_| "Failed to serialize result".to_string());
                ToolResult::text(text)
            }
            Err(e) => {
                tracing::warn!(tool = name, "Tool call failed: {}", e);
                ToolResult::error(e.to_string())
            }
        }
    }

    /// Run an already-parsed call.
    pub async fn execute(&self, call: ToolCall) -> Result<Value> {
        tracing::info!(tool = call.name(), "Executing tool");

        let value = match call {
            ToolCall::GetIssue { issue_key } => self.client.get_issue(&issue_key).await?,
            ToolCall::SearchIssues { jql, max_results } => {
                self.client.search_issues(&jql, max_results).await?
            }
            ToolCall::CreateIssue {
                project_key,
                summary,
                issue_type,
                description,
            } => {
                self.client
                    .create_issue(&project_key, &summary, &issue_type, description.as_deref())
                    .await?
            }
            ToolCall::UpdateIssue { issue_key, fields } => {
                self.client.update_issue(&issue_key, fields).await?;
                json!({ "success": true, "issue_key": issue_key })
            }
            ToolCall::AddComment { issue_key, comment } => {
                self.client.add_comment(&issue_key, &comment).await?
            }
            ToolCall::GetProjects => Value::Array(self.client.get_projects().await?),
            ToolCall::TransitionIssue {
                issue_key,
                transition_id,
            } => {
                self.client
                    .transition_issue(&issue_key, &transition_id)
                    .await?;
                json!({ "success": true, "issue_key": issue_key })
            }
            ToolCall::GetTransitions { issue_key } => {
                self.client.get_transitions(&issue_key).await?
            }
        };

        Ok(value)
    }
}
