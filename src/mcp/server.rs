//! MCP server with stdio transport
//!
//! Implements a JSON-RPC 2.0 server that reads one request per line and
//! writes one response per line. Requests are handled one at a time.

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION, PROTOCOL_VERSION};
use super::tools::ToolHandler;
use crate::error::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

const SERVER_NAME: &str = "agent-assist-mcp";

/// MCP server that handles JSON-RPC requests over stdio
pub struct McpServer {
    tool_handler: ToolHandler,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tool_handler: ToolHandler) -> Self {
        Self { tool_handler }
    }

    pub fn tool_handler(&self) -> &ToolHandler {
        &self.tool_handler
    }

    /// Serve stdin/stdout until EOF
    pub async fn run(&self) -> Result<()> {
        info!("MCP server started, listening on stdin...");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("MCP server shutting down");
        Ok(())
    }

    /// Serve line-delimited JSON-RPC from `reader`, writing responses to `writer`
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            if reader.read_line(&mut line).await? == 0 {
                debug!("Received EOF");
                break;
            }

            let request = line.trim();
            if request.is_empty() {
                continue;
            }
            debug!("Received request: {}", request);

            let Some(response) = self.handle_line(request).await else {
                continue;
            };

            let response_json = match serde_json::to_string(&response) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize response: {}", e);
                    fallback_error(response.id)
                }
            };
            debug!("Sending response: {}", response_json);

            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Process one line; `None` for notifications
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().filter(|id| !id.is_null());
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        Some(self.process_request(request).await)
    }

    async fn process_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        }
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling initialize");

        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {
                    "tools": {}
                }
            }),
        )
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling tools/list");

        JsonRpcResponse::success(
            request.id,
            json!({
                "tools": self.tool_handler.list_tools()
            }),
        )
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let Some(params) = request.params.as_object() else {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params("params must be an object"),
            );
        };

        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params("missing 'name' field"),
            );
        };

        if !self.tool_handler.has_tool(tool_name) {
            warn!("Unknown tool: {}", tool_name);
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", tool_name)),
            );
        }

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        debug!("Handling tools/call: {}", tool_name);
        let (payload, is_error) = match self.tool_handler.execute(tool_name, arguments).await {
            Ok(result) => (result, false),
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                (e.to_tool_payload(), true)
            }
        };

        JsonRpcResponse::success(
            request.id,
            json!({
                "content": [
                    {
                        "type": "text",
                        "text": serde_json::to_string_pretty(&payload)
                            .unwrap_or_else(|_| payload.to_string())
                    }
                ],
                "isError": is_error
            }),
        )
    }
}

fn fallback_error(id: Option<Value>) -> String {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "error": { "code": -32603, "message": "Failed to serialize response" },
        "id": id,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::services::RestConnector;
    use std::sync::Arc;

    fn server() -> McpServer {
        McpServer::new(ToolHandler::new(
            Settings::default(),
            Arc::new(RestConnector),
        ))
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"initialize","params":{},"id":1}"#)
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_null_id_gets_a_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"ping","id":null}"#)
            .await
            .unwrap();
        assert_eq!(response.id, Some(Value::Null));
        assert_eq!(response.result, Some(serde_json::json!({})));

        let line = serde_json::to_string(&response).unwrap();
        assert!(line.contains("\"id\":null"));
    }

    #[tokio::test]
    async fn test_parse_and_version_errors() {
        let server = server();

        let response = server.handle_line("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);

        let response = server
            .handle_line(r#"{"jsonrpc":"1.0","method":"ping","id":2}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32600);

        let response = server.handle_line(r#"{"jsonrpc":"2.0","id":3}"#).await.unwrap();
        assert_eq!(response.id, Some(json!(3)));
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_unknown_method_and_tool() {
        let server = server();

        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"resources/list","id":4}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);

        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"nope"},"id":5}"#,
            )
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tool_error_is_reported_in_result() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"list_conversations","arguments":{}},"id":6}"#,
            )
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["status"], "error");
        assert!(payload["message"]
            .as_str()
            .unwrap()
            .contains("initialize_agent_assist"));
    }
}
