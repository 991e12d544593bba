//! Services layer for the Agent Assist MCP server
//!
//! Provides credentials, the Dialogflow HTTP transport, and the Agent Assist
//! client used by the tool handlers.

pub mod agent_assist;
pub mod auth;
pub mod transport;

pub use agent_assist::{AgentAssistClient, OperationPolicy, PageRequest, SuggestionKind};
pub use auth::{ServiceAccountKey, TokenProvider};
pub use transport::{
    ApiRequest, ApiVersion, Connector, DialogflowTransport, HttpMethod, RestConnector,
    RestTransport,
};
