//! End-to-end MCP session over in-memory IO

mod common;

use agent_assist_mcp::{ApiRequest, ApiVersion, McpServer};
use common::{handler_expecting, handler_without_requests, PARENT};
use serde_json::{json, Value};
use tokio::io::BufReader;

async fn run_session(server: &McpServer, lines: &[Value]) -> Vec<Value> {
    let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
    let mut output: Vec<u8> = Vec::new();

    server
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_full_session() {
    let conversation = format!("{}/conversations/conv-1", PARENT);
    let server = McpServer::new(handler_expecting(vec![(
        ApiRequest::get(ApiVersion::V2, conversation.clone()),
        json!({ "name": conversation.clone(), "lifecycleState": "IN_PROGRESS" }),
    )]));

    let responses = run_session(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
                "name": "get_conversation",
                "arguments": {"conversation_id": "conv-1"}
            }}),
            json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}),
        ],
    )
    .await;

    // The notification gets no response
    assert_eq!(responses.len(), 4);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 32);
    assert!(tools
        .iter()
        .all(|t| t["inputSchema"]["type"] == "object"));

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"]["isError"], false);
    let payload = tool_payload(&responses[2]);
    assert_eq!(payload["conversation"]["lifecycleState"], "IN_PROGRESS");

    assert_eq!(responses[3]["id"], 4);
    assert_eq!(responses[3]["result"], json!({}));
}

#[tokio::test]
async fn test_tool_failure_is_error_result() {
    let server = McpServer::new(handler_without_requests());

    let responses = run_session(
        &server,
        &[json!({"jsonrpc": "2.0", "id": "a", "method": "tools/call", "params": {
            "name": "create_participant",
            "arguments": {"conversation_id": "conv-1", "role": "SUPERVISOR"}
        }})],
    )
    .await;

    assert_eq!(responses[0]["id"], "a");
    assert_eq!(responses[0]["result"]["isError"], true);
    let payload = tool_payload(&responses[0]);
    assert_eq!(payload["status"], "error");
    assert!(payload["message"].as_str().unwrap().contains("role"));
}

#[tokio::test]
async fn test_protocol_errors() {
    let server = McpServer::new(handler_without_requests());
    let input = "not json\n\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"tools/call\",\"params\":{\"name\":\"nope\"}}\n{\"jsonrpc\":\"2.0\",\"id\":8,\"method\":\"tools/call\",\"params\":[]}\n";
    let mut output: Vec<u8> = Vec::new();

    server
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["error"]["code"], -32602);
    assert_eq!(responses[1]["id"], 7);
    assert_eq!(responses[2]["error"]["code"], -32602);
}
