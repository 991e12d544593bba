//! Integration tests for client initialization
//!
//! Uses a stub connector so no token exchange or network access happens.

mod common;

use agent_assist_mcp::{AgentAssistError, ApiRequest, ApiVersion, Settings, ToolHandler};
use common::{service_account_json, MockTransport, StubConnector};
use mockall::predicate::eq;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn transport_expecting(request: ApiRequest) -> MockTransport {
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .with(eq(request))
        .times(1)
        .returning(|req| Ok(json!({ "name": req.path })));
    transport
}

#[tokio::test]
async fn test_initialize_uses_location_for_endpoint_and_names() {
    let transport = transport_expecting(ApiRequest::get(
        ApiVersion::V2,
        "projects/acme/locations/europe-west1/conversations/c-1",
    ));
    let connector = Arc::new(StubConnector::new(transport));
    let handler = ToolHandler::new(Settings::default(), connector.clone());

    let result = handler
        .execute(
            "initialize_agent_assist",
            json!({
                "service_account_json": service_account_json("acme"),
                "project_id": "acme",
                "location": "europe-west1"
            }),
        )
        .await
        .unwrap();

    assert_eq!(result["status"], "success");
    assert_eq!(result["location"], "europe-west1");
    assert!(handler.is_initialized().await);
    assert_eq!(
        connector.endpoints(),
        vec!["https://europe-west1-dialogflow.googleapis.com".to_string()]
    );

    let result = handler
        .execute("get_conversation", json!({ "conversation_id": "c-1" }))
        .await
        .unwrap();
    assert_eq!(
        result["conversation"]["name"],
        "projects/acme/locations/europe-west1/conversations/c-1"
    );
}

#[tokio::test]
async fn test_initialize_defaults_to_global() {
    let connector = Arc::new(StubConnector::default());
    let handler = ToolHandler::new(Settings::default(), connector.clone());

    let result = handler
        .execute(
            "initialize_agent_assist",
            json!({
                "service_account_json": service_account_json("acme"),
                "project_id": "acme"
            }),
        )
        .await
        .unwrap();

    assert_eq!(result["location"], "global");
    assert_eq!(
        connector.endpoints(),
        vec!["https://dialogflow.googleapis.com".to_string()]
    );
}

#[tokio::test]
async fn test_initialize_honours_endpoint_override() {
    let settings = Settings {
        api_endpoint: Some("http://localhost:8089/".to_string()),
        ..Settings::default()
    };
    let connector = Arc::new(StubConnector::default());
    let handler = ToolHandler::new(settings, connector.clone());

    handler
        .execute(
            "initialize_agent_assist",
            json!({
                "service_account_json": service_account_json("acme"),
                "project_id": "acme",
                "location": "us-central1"
            }),
        )
        .await
        .unwrap();

    assert_eq!(connector.endpoints(), vec!["http://localhost:8089".to_string()]);
}

#[tokio::test]
async fn test_invalid_credentials_leave_handler_uninitialized() {
    let connector = Arc::new(StubConnector::default());
    let handler = ToolHandler::new(Settings::default(), connector.clone());

    let err = handler
        .execute(
            "initialize_agent_assist",
            json!({
                "service_account_json": "{\"type\": \"authorized_user\"}",
                "project_id": "acme"
            }),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AgentAssistError::Credentials(_)));
    assert!(!handler.is_initialized().await);
    assert!(connector.endpoints().is_empty());

    let err = handler
        .execute("list_conversations", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentAssistError::NotInitialized));
}

#[tokio::test]
async fn test_initialize_rejects_bad_project_id() {
    let handler = ToolHandler::new(Settings::default(), Arc::new(StubConnector::default()));

    let err = handler
        .execute(
            "initialize_agent_assist",
            json!({
                "service_account_json": service_account_json("acme"),
                "project_id": "acme/other"
            }),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AgentAssistError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_reinitialize_replaces_client() {
    let connector = Arc::new(StubConnector::default());
    let handler = ToolHandler::new(Settings::default(), connector.clone());

    for location in ["global", "us-central1"] {
        handler
            .execute(
                "initialize_agent_assist",
                json!({
                    "service_account_json": service_account_json("acme"),
                    "project_id": "acme",
                    "location": location
                }),
            )
            .await
            .unwrap();
    }

    assert_eq!(connector.endpoints().len(), 2);
    assert_eq!(
        connector.endpoints()[1],
        "https://us-central1-dialogflow.googleapis.com"
    );
}

#[tokio::test]
async fn test_initialize_from_credentials_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(service_account_json("from-key").as_bytes())
        .unwrap();

    let transport = transport_expecting(ApiRequest::get(
        ApiVersion::V2,
        "projects/from-key/locations/global/conversationProfiles/p-1",
    ));
    let settings = Settings {
        credentials_file: Some(file.path().to_path_buf()),
        ..Settings::default()
    };
    let handler = ToolHandler::new(settings, Arc::new(StubConnector::new(transport)));

    assert!(handler.initialize_from_settings().await.unwrap());

    let result = handler
        .execute("get_conversation_profile", json!({ "profile_id": "p-1" }))
        .await
        .unwrap();
    assert_eq!(
        result["conversation_profile"]["name"],
        "projects/from-key/locations/global/conversationProfiles/p-1"
    );
}

#[tokio::test]
async fn test_configured_project_overrides_key_project() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(service_account_json("from-key").as_bytes())
        .unwrap();

    let transport = transport_expecting(ApiRequest::get(
        ApiVersion::V2,
        "projects/configured/locations/global/conversations/c-1",
    ));
    let settings = Settings {
        credentials_file: Some(file.path().to_path_buf()),
        project_id: Some("configured".to_string()),
        ..Settings::default()
    };
    let handler = ToolHandler::new(settings, Arc::new(StubConnector::new(transport)));

    assert!(handler.initialize_from_settings().await.unwrap());
    handler
        .execute("get_conversation", json!({ "conversation_id": "c-1" }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_credentials_file_is_an_error() {
    let settings = Settings {
        credentials_file: Some("/nonexistent/agent-assist/key.json".into()),
        ..Settings::default()
    };
    let handler = ToolHandler::new(settings, Arc::new(StubConnector::default()));

    let err = handler.initialize_from_settings().await.unwrap_err();
    assert!(matches!(err, AgentAssistError::Credentials(_)));
    assert!(!handler.is_initialized().await);
}
