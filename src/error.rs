//! Error types for the Agent Assist MCP server
//!
//! Uses thiserror for structured error definitions. The binary wraps these
//! in anyhow with context at startup.

use thiserror::Error;

/// Main error type for Agent Assist operations
#[derive(Error, Debug)]
pub enum AgentAssistError {
    /// A tool was called before the client handle was created
    #[error("Agent Assist not initialized. Call initialize_agent_assist first.")]
    NotInitialized,

    /// Missing or malformed tool argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Service account key could not be parsed or loaded
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// OAuth token exchange failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The Dialogflow API returned a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Google RPC status name (e.g. NOT_FOUND)
        code: Option<String>,
        message: String,
    },

    /// A long-running operation finished with an error
    #[error("Operation {name} failed: {message}")]
    OperationFailed { name: String, message: String },

    /// A long-running operation did not finish in time
    #[error("Timed out waiting for operation: {0}")]
    OperationTimeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JWT signing error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl AgentAssistError {
    /// Shorthand for argument validation failures
    pub fn invalid(message: impl Into<String>) -> Self {
        AgentAssistError::InvalidArgument(message.into())
    }

    /// Error payload returned to MCP callers as the tool result
    pub fn to_tool_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        });

        if let AgentAssistError::Api { status, code, .. } = self {
            payload["http_status"] = serde_json::json!(status);
            if let Some(code) = code {
                payload["code"] = serde_json::json!(code);
            }
        }

        payload
    }
}

/// Result type alias for Agent Assist operations
pub type Result<T> = std::result::Result<T, AgentAssistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentAssistError::invalid("conversation_id must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid argument: conversation_id must not be empty"
        );
    }

    #[test]
    fn test_api_error_payload() {
        let err = AgentAssistError::Api {
            status: 404,
            code: Some("NOT_FOUND".to_string()),
            message: "Conversation not found".to_string(),
        };

        let payload = err.to_tool_payload();
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["http_status"], 404);
        assert_eq!(payload["code"], "NOT_FOUND");
        assert!(payload["message"]
            .as_str()
            .unwrap()
            .contains("Conversation not found"));
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json");
        let err: AgentAssistError = json_err.unwrap_err().into();
        assert!(matches!(err, AgentAssistError::Serialization(_)));
    }
}
