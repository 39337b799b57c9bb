//! jira-mcp server
//!
//! Exposes Jira issue operations as MCP tools over stdio.

pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use dispatcher::{Content, Dispatcher, ToolResult};
pub use error::ToolError;
pub use protocol::{JsonRpcError, Request, RequestId, Response};
pub use server::McpServer;
pub use tools::{list_tools, ToolCall, ToolDescriptor};
