//! Tool call errors

use thiserror::Error;

/// Anything that can make a tool call fail. Always reported back to the agent as text.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument '{name}': expected {expected}")]
    InvalidArgument { name: String, expected: &'static str },

    #[error(transparent)]
    Jira(#[from] jira_mcp_client::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;
