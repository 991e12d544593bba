//! HTTP transport for the Dialogflow REST API
//!
//! Every tool call becomes exactly one [`ApiRequest`] handed to a
//! [`DialogflowTransport`]. The production transport is [`RestTransport`];
//! tests substitute a mock to assert request shapes.

use crate::config::Settings;
use crate::error::{AgentAssistError, Result};
use crate::services::auth::{ServiceAccountKey, TokenProvider};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP verbs used by the Dialogflow API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// API surface version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V2,
    /// Needed for analyzeContent, suggestConversationSummary and searchKnowledge
    V2Beta1,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V2Beta1 => "v2beta1",
        }
    }
}

/// A single Dialogflow REST request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub version: ApiVersion,
    /// Resource path without the version prefix, e.g. `projects/p/locations/global/conversations`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: HttpMethod, version: ApiVersion, path: impl Into<String>) -> Self {
        Self {
            method,
            version,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(version: ApiVersion, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, version, path)
    }

    pub fn post(version: ApiVersion, path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, version, path).with_body(body)
    }

    pub fn patch(version: ApiVersion, path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, version, path).with_body(body)
    }

    pub fn delete(version: ApiVersion, path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, version, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present
    pub fn with_optional_query<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    /// Look up a query parameter (first match)
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes Dialogflow requests
#[async_trait]
pub trait DialogflowTransport: Send + Sync {
    /// Send the request and return the decoded JSON response
    async fn execute(&self, request: ApiRequest) -> Result<Value>;
}

/// Builds a transport from service account credentials
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        key: ServiceAccountKey,
        endpoint: &str,
        settings: &Settings,
    ) -> Result<Arc<dyn DialogflowTransport>>;
}

/// Connector producing [`RestTransport`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct RestConnector;

impl Connector for RestConnector {
    fn connect(
        &self,
        key: ServiceAccountKey,
        endpoint: &str,
        settings: &Settings,
    ) -> Result<Arc<dyn DialogflowTransport>> {
        Ok(Arc::new(RestTransport::new(
            key,
            endpoint,
            settings.request_timeout(),
        )?))
    }
}

/// reqwest-backed transport authenticated with a service account
pub struct RestTransport {
    http: reqwest::Client,
    endpoint: String,
    tokens: TokenProvider,
}

impl RestTransport {
    pub fn new(
        key: ServiceAccountKey,
        endpoint: &str,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agent-assist-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let tokens = TokenProvider::new(key, http.clone())?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn url_for(&self, request: &ApiRequest) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            request.version.as_str(),
            request.path
        )
    }
}

#[async_trait]
impl DialogflowTransport for RestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request);
        debug!("{:?} {} (as {})", request.method, url, self.tokens.client_email());

        let token = self.tokens.access_token().await?;

        let mut builder = self
            .http
            .request(request.method.into(), &url)
            .bearer_auth(token.expose_secret());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Dialogflow returned {} for {}", status, url);
            return Err(api_error(status.as_u16(), &text));
        }

        decode_body(&text)
    }
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Map a non-success response body to an API error
pub fn api_error(status: u16, body: &str) -> AgentAssistError {
    match serde_json::from_str::<GoogleErrorEnvelope>(body) {
        Ok(envelope) => AgentAssistError::Api {
            status,
            code: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => AgentAssistError::Api {
            status,
            code: None,
            message: if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                body.trim().to_string()
            },
        },
    }
}

/// Decode a success body; empty bodies (e.g. from DELETE) become `{}`
pub fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        Ok(Value::Object(serde_json::Map::new()))
    } else {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get(ApiVersion::V2, "projects/p/locations/global/conversations")
            .with_query("pageSize", 100)
            .with_optional_query::<String>("pageToken", None)
            .with_optional_query("filter", Some("lifecycle_state = \"IN_PROGRESS\""));

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.query_value("pageSize"), Some("100"));
        assert_eq!(request.query_value("pageToken"), None);
        assert!(request.query_value("filter").is_some());
        assert!(request.body.is_none());

        let request = ApiRequest::post(ApiVersion::V2Beta1, "x:analyzeContent", json!({"a": 1}));
        assert_eq!(request.version.as_str(), "v2beta1");
        assert_eq!(request.body, Some(json!({"a": 1})));
    }

    #[test]
    fn test_api_error_from_google_body() {
        let body = r#"{"error":{"code":404,"message":"Conversation not found.","status":"NOT_FOUND"}}"#;
        match api_error(404, body) {
            AgentAssistError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("NOT_FOUND"));
                assert_eq!(message, "Conversation not found.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_from_plain_body() {
        match api_error(502, "Bad Gateway") {
            AgentAssistError::Api { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_body() {
        assert_eq!(decode_body("").unwrap(), json!({}));
        assert_eq!(decode_body("{\"name\":\"x\"}").unwrap(), json!({"name": "x"}));
        assert!(decode_body("<html>").is_err());
    }
}
