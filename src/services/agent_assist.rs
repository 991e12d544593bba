//! Agent Assist client
//!
//! One method per remote operation. Bodies arrive already shaped by
//! [`crate::requests`]; responses are returned as received.

use crate::error::{AgentAssistError, Result};
use crate::services::transport::{ApiRequest, ApiVersion, DialogflowTransport};
use crate::types::ResourceNames;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default page size for list calls
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pagination arguments shared by every list tool
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub page_token: Option<String>,
}

impl PageRequest {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .with_query("pageSize", self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
            .with_optional_query(
                "pageToken",
                self.page_token.as_deref().filter(|t| !t.is_empty()),
            )
    }
}

/// Suggestion endpoints on a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Articles,
    FaqAnswers,
    SmartReplies,
}

impl SuggestionKind {
    fn method(&self) -> &'static str {
        match self {
            SuggestionKind::Articles => "suggestArticles",
            SuggestionKind::FaqAnswers => "suggestFaqAnswers",
            SuggestionKind::SmartReplies => "suggestSmartReplies",
        }
    }
}

/// How long-running operations are awaited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for OperationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Initialized client handle shared by all tool calls
pub struct AgentAssistClient {
    transport: Arc<dyn DialogflowTransport>,
    names: ResourceNames,
    operations: OperationPolicy,
}

impl AgentAssistClient {
    pub fn new(
        transport: Arc<dyn DialogflowTransport>,
        names: ResourceNames,
        operations: OperationPolicy,
    ) -> Self {
        Self {
            transport,
            names,
            operations,
        }
    }

    pub fn names(&self) -> &ResourceNames {
        &self.names
    }

    async fn call(&self, request: ApiRequest) -> Result<Value> {
        debug!(
            "Dialogflow {:?} {}/{}",
            request.method,
            request.version.as_str(),
            request.path
        );
        self.transport.execute(request).await
    }

    // === Conversations ===

    pub async fn create_conversation(
        &self,
        conversation: Value,
        conversation_id: Option<&str>,
    ) -> Result<Value> {
        let path = format!("{}/conversations", self.names.parent());
        self.call(
            ApiRequest::post(ApiVersion::V2, path, conversation)
                .with_optional_query("conversationId", conversation_id),
        )
        .await
    }

    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Value> {
        let name = self.names.conversation(conversation_id)?;
        self.call(ApiRequest::get(ApiVersion::V2, name)).await
    }

    pub async fn list_conversations(
        &self,
        page: &PageRequest,
        filter: Option<&str>,
    ) -> Result<Value> {
        let path = format!("{}/conversations", self.names.parent());
        let request = page
            .apply(ApiRequest::get(ApiVersion::V2, path))
            .with_optional_query("filter", filter);
        self.call(request).await
    }

    pub async fn complete_conversation(&self, conversation_id: &str) -> Result<Value> {
        let name = self.names.conversation(conversation_id)?;
        self.call(ApiRequest::post(
            ApiVersion::V2,
            format!("{}:complete", name),
            json!({}),
        ))
        .await
    }

    pub async fn list_messages(
        &self,
        conversation_id: &str,
        page: &PageRequest,
        filter: Option<&str>,
    ) -> Result<Value> {
        let path = format!("{}/messages", self.names.conversation(conversation_id)?);
        let request = page
            .apply(ApiRequest::get(ApiVersion::V2, path))
            .with_optional_query("filter", filter);
        self.call(request).await
    }

    // === Conversation profiles ===

    pub async fn create_conversation_profile(&self, profile: Value) -> Result<Value> {
        let path = format!("{}/conversationProfiles", self.names.parent());
        self.call(ApiRequest::post(ApiVersion::V2, path, profile))
            .await
    }

    pub async fn get_conversation_profile(&self, profile_id: &str) -> Result<Value> {
        let name = self.names.conversation_profile(profile_id)?;
        self.call(ApiRequest::get(ApiVersion::V2, name)).await
    }

    pub async fn list_conversation_profiles(&self, page: &PageRequest) -> Result<Value> {
        let path = format!("{}/conversationProfiles", self.names.parent());
        self.call(page.apply(ApiRequest::get(ApiVersion::V2, path)))
            .await
    }

    pub async fn delete_conversation_profile(&self, profile_id: &str) -> Result<Value> {
        let name = self.names.conversation_profile(profile_id)?;
        self.call(ApiRequest::delete(ApiVersion::V2, name)).await
    }

    // === Participants ===

    pub async fn create_participant(
        &self,
        conversation_id: &str,
        participant: Value,
    ) -> Result<Value> {
        let path = format!(
            "{}/participants",
            self.names.conversation(conversation_id)?
        );
        self.call(ApiRequest::post(ApiVersion::V2, path, participant))
            .await
    }

    pub async fn list_participants(
        &self,
        conversation_id: &str,
        page: &PageRequest,
    ) -> Result<Value> {
        let path = format!(
            "{}/participants",
            self.names.conversation(conversation_id)?
        );
        self.call(page.apply(ApiRequest::get(ApiVersion::V2, path)))
            .await
    }

    /// `participant` must be a full participant resource name
    pub async fn analyze_content(&self, participant: &str, body: Value) -> Result<Value> {
        self.call(ApiRequest::post(
            ApiVersion::V2Beta1,
            format!("{}:analyzeContent", participant),
            body,
        ))
        .await
    }

    pub async fn suggest(
        &self,
        participant: &str,
        kind: SuggestionKind,
        body: Value,
    ) -> Result<Value> {
        self.call(ApiRequest::post(
            ApiVersion::V2,
            format!("{}/suggestions:{}", participant, kind.method()),
            body,
        ))
        .await
    }

    // === Knowledge bases and documents ===

    pub async fn create_knowledge_base(&self, knowledge_base: Value) -> Result<Value> {
        let path = format!("{}/knowledgeBases", self.names.parent());
        self.call(ApiRequest::post(ApiVersion::V2, path, knowledge_base))
            .await
    }

    pub async fn list_knowledge_bases(&self, page: &PageRequest) -> Result<Value> {
        let path = format!("{}/knowledgeBases", self.names.parent());
        self.call(page.apply(ApiRequest::get(ApiVersion::V2, path)))
            .await
    }

    pub async fn delete_knowledge_base(&self, knowledge_base_id: &str, force: bool) -> Result<Value> {
        let name = self.names.knowledge_base(knowledge_base_id)?;
        let request = ApiRequest::delete(ApiVersion::V2, name)
            .with_optional_query("force", force.then_some(true));
        self.call(request).await
    }

    /// Returns the long-running operation
    pub async fn create_document(&self, knowledge_base_id: &str, document: Value) -> Result<Value> {
        let path = format!(
            "{}/documents",
            self.names.knowledge_base(knowledge_base_id)?
        );
        self.call(ApiRequest::post(ApiVersion::V2, path, document))
            .await
    }

    pub async fn list_documents(&self, knowledge_base_id: &str, page: &PageRequest) -> Result<Value> {
        let path = format!(
            "{}/documents",
            self.names.knowledge_base(knowledge_base_id)?
        );
        self.call(page.apply(ApiRequest::get(ApiVersion::V2, path)))
            .await
    }

    // === Conversation models ===

    /// Returns the long-running operation
    pub async fn create_conversation_model(&self, model: Value) -> Result<Value> {
        let path = format!("{}/conversationModels", self.names.parent());
        self.call(ApiRequest::post(ApiVersion::V2, path, model)).await
    }

    /// Returns the long-running operation
    pub async fn deploy_conversation_model(&self, model_id: &str) -> Result<Value> {
        let name = self.names.conversation_model(model_id)?;
        self.call(ApiRequest::post(
            ApiVersion::V2,
            format!("{}:deploy", name),
            json!({}),
        ))
        .await
    }

    pub async fn list_conversation_models(&self, page: &PageRequest) -> Result<Value> {
        let path = format!("{}/conversationModels", self.names.parent());
        self.call(page.apply(ApiRequest::get(ApiVersion::V2, path)))
            .await
    }

    // === Conversation datasets ===

    /// Returns the long-running operation
    pub async fn create_conversation_dataset(&self, dataset: Value) -> Result<Value> {
        let path = format!("{}/conversationDatasets", self.names.parent());
        self.call(ApiRequest::post(ApiVersion::V2, path, dataset))
            .await
    }

    /// `dataset` is a full dataset resource name; returns the long-running operation
    pub async fn import_conversation_data(&self, dataset: &str, body: Value) -> Result<Value> {
        self.call(ApiRequest::post(
            ApiVersion::V2,
            format!("{}:importConversationData", dataset),
            body,
        ))
        .await
    }

    // === Answer records ===

    pub async fn update_answer_record(
        &self,
        answer_record: &str,
        body: Value,
        update_mask: &[&str],
    ) -> Result<Value> {
        let request = ApiRequest::patch(ApiVersion::V2, answer_record, body)
            .with_query("updateMask", update_mask.join(","));
        self.call(request).await
    }

    pub async fn list_answer_records(
        &self,
        page: &PageRequest,
        filter: Option<&str>,
    ) -> Result<Value> {
        let path = format!("{}/answerRecords", self.names.parent());
        let request = page
            .apply(ApiRequest::get(ApiVersion::V2, path))
            .with_optional_query("filter", filter);
        self.call(request).await
    }

    // === Summarization and knowledge search ===

    pub async fn suggest_conversation_summary(
        &self,
        conversation_id: &str,
        body: Value,
    ) -> Result<Value> {
        let path = format!(
            "{}/suggestions:suggestConversationSummary",
            self.names.conversation(conversation_id)?
        );
        self.call(ApiRequest::post(ApiVersion::V2Beta1, path, body))
            .await
    }

    pub async fn search_knowledge(&self, body: Value) -> Result<Value> {
        let path = format!("{}/suggestions:searchKnowledge", self.names.parent());
        self.call(ApiRequest::post(ApiVersion::V2Beta1, path, body))
            .await
    }

    // === Operations ===

    pub async fn get_operation(&self, operation_name: &str) -> Result<Value> {
        self.call(ApiRequest::get(ApiVersion::V2, operation_name))
            .await
    }

    /// Poll an operation until it is done and return its `response`
    pub async fn wait_for_operation(&self, operation: Value) -> Result<Value> {
        let name = operation
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AgentAssistError::Other("operation response has no name".to_string())
            })?;

        let deadline = tokio::time::Instant::now() + self.operations.timeout;
        let mut current = operation;

        loop {
            if current.get("done").and_then(|d| d.as_bool()) == Some(true) {
                if let Some(error) = current.get("error") {
                    return Err(AgentAssistError::OperationFailed {
                        name,
                        message: error
                            .get("message")
                            .and_then(|m| m.as_str())
                            .unwrap_or("unknown error")
                            .to_string(),
                    });
                }

                info!("Operation {} completed", name);
                return Ok(current
                    .get("response")
                    .cloned()
                    .unwrap_or_else(|| json!({})));
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(AgentAssistError::OperationTimeout(name));
            }

            debug!("Operation {} still running", name);
            tokio::time::sleep(self.operations.poll_interval).await;
            current = self.get_operation(&name).await?;
        }
    }
}
