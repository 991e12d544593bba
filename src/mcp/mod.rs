//! Model Context Protocol (MCP) server implementation
//!
//! Provides a JSON-RPC 2.0 server over stdio exposing Agent Assist
//! operations as tools.

pub mod catalog;
pub mod protocol;
pub mod server;
pub mod tools;

pub use catalog::Tool;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::McpServer;
pub use tools::ToolHandler;
