//! MCP server over newline-delimited JSON-RPC

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::dispatcher::Dispatcher;
use crate::protocol::{JsonRpcError, Request, RequestId, Response};

pub const SERVER_NAME: &str = "jira-mcp";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";
const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2024-11-05", "2025-03-26", "2025-06-18"];

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Serve requests from stdin until it closes. Stdout carries protocol frames only.
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        self.serve(stdin, &mut stdout).await
    }

    /// Read one JSON-RPC message per line and write one response line per request.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!(%line, "Received MCP message");

            if let Some(response) = self.handle_line(line).await {
                let response_str = serde_json::to_string(&response)?;
                tracing::debug!(%response_str, "Sending MCP response");
                writer.write_all(response_str.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        tracing::info!("Input closed");
        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to parse request: {}", e);
                return Some(Response::error(
                    JsonRpcError::parse_error("Parse error"),
                    RequestId::Null,
                ));
            }
        };

        let id = value
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<RequestId>(id).ok())
            .unwrap_or(RequestId::Null);

        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                tracing::error!("Invalid request: {}", e);
                Some(Response::error(
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                    id,
                ))
            }
        }
    }

    /// Handle one request. Notifications never produce a response.
    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        if request.is_notification() {
            if request.method == "notifications/initialized" {
                tracing::info!("MCP client initialized");
            } else {
                tracing::debug!(method = %request.method, "Ignoring notification");
            }
            return None;
        }
        let id = request.id.clone().unwrap_or(RequestId::Null);

        if let Err(e) = request.validate() {
            return Some(Response::error(e, id));
        }

        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            method => Err(JsonRpcError::method_not_found(method)),
        };

        Some(match result {
            Ok(value) => Response::success(value, id),
            Err(e) => Response::error(e, id),
        })
    }

    fn handle_initialize(&self, params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let protocol_version = match requested {
            Some(version) if SUPPORTED_PROTOCOL_VERSIONS.contains(&version) => version,
            _ => DEFAULT_PROTOCOL_VERSION,
        };

        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
        })
    }

    fn handle_tools_list(&self) -> std::result::Result<Value, JsonRpcError> {
        let tools = serde_json::to_value(self.dispatcher.list_tools())
            .map_err(|e| JsonRpcError::internal_error(e.to_string()))?;
        Ok(json!({ "tools": tools }))
    }

    async fn handle_tools_call(
        &self,
        params: Option<Value>,
    ) -> std::result::Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Invalid params"))?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::invalid_params("Missing or invalid argument: name"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = self.dispatcher.call_tool(name, &arguments).await;
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }
}
