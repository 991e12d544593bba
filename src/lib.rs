//! Agent Assist MCP - Google Cloud Agent Assist over the Model Context Protocol
//!
//! Exposes Dialogflow Agent Assist operations (conversations, profiles,
//! participants, suggestions, knowledge bases, models, datasets, feedback)
//! as MCP tools. Each tool maps to one REST request; responses are passed
//! through to the caller.
//!
//! # Architecture
//!
//! - **Types**: resource name construction and validation
//! - **Requests**: tool arguments and request body shaping
//! - **Services**: credentials, HTTP transport, the Agent Assist client
//! - **MCP**: JSON-RPC server over stdio and the tool dispatcher
//!
//! # Example
//!
//! ```ignore
//! use agent_assist_mcp::{McpServer, RestConnector, Settings, ToolHandler};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> agent_assist_mcp::Result<()> {
//!     let settings = Settings::load(None)?;
//!     let handler = ToolHandler::new(settings, Arc::new(RestConnector));
//!     handler.initialize_from_settings().await?;
//!     McpServer::new(handler).run().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod mcp;
pub mod requests;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::Settings;
pub use error::{AgentAssistError, Result};
pub use mcp::{McpServer, ToolHandler};
pub use services::{
    AgentAssistClient, ApiRequest, ApiVersion, Connector, DialogflowTransport, HttpMethod,
    OperationPolicy, RestConnector, ServiceAccountKey,
};
pub use types::ResourceNames;
