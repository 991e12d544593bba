//! MCP tool implementations
//!
//! Every tool validates its arguments, shapes one Dialogflow request, and
//! returns the response wrapped in a `{"status": "success", ...}` envelope.
//! The client handle is created by `initialize_agent_assist` (or at startup
//! from a configured credentials file) and shared by all later calls.

use super::catalog::{tool_catalog, Tool, SUPPORTED_LANGUAGES};
use crate::config::Settings;
use crate::error::{AgentAssistError, Result};
use crate::requests::{self, *};
use crate::services::{
    AgentAssistClient, Connector, OperationPolicy, RestConnector, ServiceAccountKey,
    SuggestionKind,
};
use crate::types::{validate_name, NameKind, ResourceNames};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Tool handler that dispatches to appropriate implementation
pub struct ToolHandler {
    settings: Settings,
    connector: Arc<dyn Connector>,
    client: RwLock<Option<Arc<AgentAssistClient>>>,
}

impl ToolHandler {
    /// Create an uninitialized handler
    pub fn new(settings: Settings, connector: Arc<dyn Connector>) -> Self {
        Self {
            settings,
            connector,
            client: RwLock::new(None),
        }
    }

    /// Create a handler around an existing client
    pub fn with_client(settings: Settings, client: AgentAssistClient) -> Self {
        Self {
            settings,
            connector: Arc::new(RestConnector),
            client: RwLock::new(Some(Arc::new(client))),
        }
    }

    /// Initialize from `credentials_file`, if one is configured
    ///
    /// Returns `Ok(false)` when no credentials file is set.
    pub async fn initialize_from_settings(&self) -> Result<bool> {
        let Some(path) = self.settings.credentials_file.as_ref() else {
            return Ok(false);
        };

        let key = ServiceAccountKey::from_file(path)?;
        let project_id = self
            .settings
            .project_id
            .clone()
            .or_else(|| key.project_id.clone())
            .ok_or_else(|| {
                AgentAssistError::Credentials(format!(
                    "no project_id configured and {} does not name one",
                    path.display()
                ))
            })?;

        let location = self.settings.location.clone();
        self.install(key, &project_id, &location).await?;
        Ok(true)
    }

    pub async fn is_initialized(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Get list of all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        tool_catalog()
    }

    pub fn has_tool(&self, tool_name: &str) -> bool {
        tool_catalog().iter().any(|t| t.name == tool_name)
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_name: &str, params: Value) -> Result<Value> {
        debug!("Executing tool: {}", tool_name);

        match tool_name {
            "initialize_agent_assist" => self.initialize_agent_assist(params).await,
            "list_supported_languages" => Ok(list_supported_languages()),

            "create_conversation" => self.create_conversation(params).await,
            "get_conversation" => self.get_conversation(params).await,
            "list_conversations" => self.list_conversations(params).await,
            "complete_conversation" => self.complete_conversation(params).await,
            "list_messages" => self.list_messages(params).await,

            "create_conversation_profile" => self.create_conversation_profile(params).await,
            "get_conversation_profile" => self.get_conversation_profile(params).await,
            "list_conversation_profiles" => self.list_conversation_profiles(params).await,
            "delete_conversation_profile" => self.delete_conversation_profile(params).await,

            "create_participant" => self.create_participant(params).await,
            "list_participants" => self.list_participants(params).await,
            "analyze_content" => self.analyze_content(params).await,
            "suggest_articles" => self.suggest(params, SuggestionKind::Articles).await,
            "suggest_faq_answers" => self.suggest(params, SuggestionKind::FaqAnswers).await,
            "suggest_smart_replies" => self.suggest(params, SuggestionKind::SmartReplies).await,

            "create_knowledge_base" => self.create_knowledge_base(params).await,
            "list_knowledge_bases" => self.list_knowledge_bases(params).await,
            "delete_knowledge_base" => self.delete_knowledge_base(params).await,
            "create_document" => self.create_document(params).await,
            "list_documents" => self.list_documents(params).await,

            "create_conversation_model" => self.create_conversation_model(params).await,
            "deploy_conversation_model" => self.deploy_conversation_model(params).await,
            "list_conversation_models" => self.list_conversation_models(params).await,

            "create_conversation_dataset" => self.create_conversation_dataset(params).await,
            "import_conversation_data" => self.import_conversation_data(params).await,

            "update_answer_record" => self.update_answer_record(params).await,
            "list_answer_records" => self.list_answer_records(params).await,

            "generate_conversation_summary" => self.generate_conversation_summary(params).await,
            "search_knowledge" => self.search_knowledge(params).await,
            "get_operation_status" => self.get_operation_status(params).await,

            _ => {
                warn!("Unknown tool: {}", tool_name);
                Err(AgentAssistError::invalid(format!(
                    "Unknown tool: {}",
                    tool_name
                )))
            }
        }
    }

    // === Session ===

    async fn initialize_agent_assist(&self, params: Value) -> Result<Value> {
        let args: InitializeArgs = parse_args(params)?;
        require_text("project_id", &args.project_id)?;

        let key = ServiceAccountKey::from_json(&args.service_account_json)?;
        let location = args
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.settings.location.clone());

        self.install(key, &args.project_id, &location).await?;

        Ok(json!({
            "status": "success",
            "message": "Agent Assist initialized successfully",
            "project_id": args.project_id,
            "location": location,
        }))
    }

    async fn install(&self, key: ServiceAccountKey, project_id: &str, location: &str) -> Result<()> {
        let names = ResourceNames::new(project_id, location)?;
        let endpoint = self.settings.endpoint_for(location);
        let client_email = key.client_email.clone();

        let transport = self.connector.connect(key, &endpoint, &self.settings)?;
        let policy = OperationPolicy {
            poll_interval: self.settings.operation_poll_interval(),
            timeout: self.settings.operation_timeout(),
        };

        let client = AgentAssistClient::new(transport, names, policy);
        *self.client.write().await = Some(Arc::new(client));

        info!(
            "Agent Assist initialized for projects/{}/locations/{} as {} ({})",
            project_id, location, client_email, endpoint
        );
        Ok(())
    }

    async fn client(&self) -> Result<Arc<AgentAssistClient>> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(AgentAssistError::NotInitialized)
    }

    fn language(&self) -> &str {
        &self.settings.language_code
    }

    // === Conversations ===

    async fn create_conversation(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: CreateConversationArgs = parse_args(params)?;

        let body = args.body(client.names())?;
        let conversation = client
            .create_conversation(body, args.conversation_id())
            .await?;
        Ok(success("conversation", conversation))
    }

    async fn get_conversation(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ConversationArgs = parse_args(params)?;

        let conversation = client.get_conversation(&args.conversation_id).await?;
        Ok(success("conversation", conversation))
    }

    async fn list_conversations(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ListArgs = parse_args(params)?;

        let response = client.list_conversations(&args.page, args.filter()).await?;
        Ok(page("conversations", "conversations", &response))
    }

    async fn complete_conversation(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ConversationArgs = parse_args(params)?;

        let conversation = client.complete_conversation(&args.conversation_id).await?;
        Ok(success("conversation", conversation))
    }

    async fn list_messages(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ConversationListArgs = parse_args(params)?;

        let response = client
            .list_messages(&args.conversation_id, &args.page, args.filter())
            .await?;
        Ok(page("messages", "messages", &response))
    }

    // === Conversation profiles ===

    async fn create_conversation_profile(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: CreateConversationProfileArgs = parse_args(params)?;

        let profile = client
            .create_conversation_profile(args.body(self.language())?)
            .await?;
        Ok(success("conversation_profile", profile))
    }

    async fn get_conversation_profile(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ProfileArgs = parse_args(params)?;

        let profile = client.get_conversation_profile(&args.profile_id).await?;
        Ok(success("conversation_profile", profile))
    }

    async fn list_conversation_profiles(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ListArgs = parse_args(params)?;

        let response = client.list_conversation_profiles(&args.page).await?;
        Ok(page("conversationProfiles", "conversation_profiles", &response))
    }

    async fn delete_conversation_profile(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ProfileArgs = parse_args(params)?;

        client.delete_conversation_profile(&args.profile_id).await?;
        Ok(json!({
            "status": "success",
            "message": "Conversation profile deleted",
            "name": client.names().conversation_profile(&args.profile_id)?,
        }))
    }

    // === Participants and suggestions ===

    async fn create_participant(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: CreateParticipantArgs = parse_args(params)?;

        let participant = client
            .create_participant(&args.conversation_id, args.body()?)
            .await?;
        Ok(success("participant", participant))
    }

    async fn list_participants(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ConversationListArgs = parse_args(params)?;

        let response = client
            .list_participants(&args.conversation_id, &args.page)
            .await?;
        Ok(page("participants", "participants", &response))
    }

    async fn analyze_content(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: AnalyzeContentArgs = parse_args(params)?;
        validate_name("participant_id", NameKind::Participant, &args.participant_id)?;

        if args.enable_partial_automated_agent_reply {
            debug!("enable_partial_automated_agent_reply applies to streaming analysis only");
        }

        let analysis = client
            .analyze_content(&args.participant_id, args.body(self.language())?)
            .await?;
        Ok(success("analysis", analysis))
    }

    async fn suggest(&self, params: Value, kind: SuggestionKind) -> Result<Value> {
        let client = self.client().await?;
        let args: SuggestArgs = parse_args(params)?;
        validate_name("participant_id", NameKind::Participant, &args.participant_id)?;

        let suggestions = client
            .suggest(&args.participant_id, kind, args.body()?)
            .await?;
        Ok(success("suggestions", suggestions))
    }

    // === Knowledge bases and documents ===

    async fn create_knowledge_base(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: CreateKnowledgeBaseArgs = parse_args(params)?;

        let knowledge_base = client
            .create_knowledge_base(args.body(self.language())?)
            .await?;
        Ok(success("knowledge_base", knowledge_base))
    }

    async fn list_knowledge_bases(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ListArgs = parse_args(params)?;

        let response = client.list_knowledge_bases(&args.page).await?;
        Ok(page("knowledgeBases", "knowledge_bases", &response))
    }

    async fn delete_knowledge_base(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: DeleteKnowledgeBaseArgs = parse_args(params)?;

        client
            .delete_knowledge_base(&args.knowledge_base_id, args.force)
            .await?;
        Ok(json!({
            "status": "success",
            "message": "Knowledge base deleted",
            "name": client.names().knowledge_base(&args.knowledge_base_id)?,
        }))
    }

    async fn create_document(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: CreateDocumentArgs = parse_args(params)?;

        let operation = client
            .create_document(&args.knowledge_base_id, args.body()?)
            .await?;
        info!("Waiting for document creation: {}", operation_name(&operation)?);

        let document = client.wait_for_operation(operation).await?;
        Ok(success("document", document))
    }

    async fn list_documents(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: KnowledgeBaseListArgs = parse_args(params)?;

        let response = client
            .list_documents(&args.knowledge_base_id, &args.page)
            .await?;
        Ok(page("documents", "documents", &response))
    }

    // === Conversation models ===

    async fn create_conversation_model(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: CreateConversationModelArgs = parse_args(params)?;

        let body = args.body(client.names(), self.language())?;
        let operation = client.create_conversation_model(body).await?;
        started("Model creation started", &operation)
    }

    async fn deploy_conversation_model(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ModelArgs = parse_args(params)?;

        let operation = client.deploy_conversation_model(&args.model_id).await?;
        started("Model deployment started", &operation)
    }

    async fn list_conversation_models(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ListArgs = parse_args(params)?;

        let response = client.list_conversation_models(&args.page).await?;
        Ok(page("conversationModels", "conversation_models", &response))
    }

    // === Conversation datasets ===

    async fn create_conversation_dataset(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: CreateConversationDatasetArgs = parse_args(params)?;

        let import_body = args
            .input_uri()
            .map(requests::import_conversation_data_body)
            .transpose()?;

        let operation = client
            .create_conversation_dataset(args.body(self.language())?)
            .await?;

        let Some(import_body) = import_body else {
            return started("Dataset creation started", &operation);
        };

        let dataset = client.wait_for_operation(operation).await?;
        let dataset_name = dataset
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| AgentAssistError::Other("created dataset has no name".to_string()))?
            .to_string();

        let import = client
            .import_conversation_data(&dataset_name, import_body)
            .await?;

        Ok(json!({
            "status": "success",
            "message": "Dataset created; conversation import started",
            "conversation_dataset": dataset,
            "operation_name": operation_name(&import)?,
        }))
    }

    async fn import_conversation_data(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ImportConversationDataArgs = parse_args(params)?;

        let dataset = client.names().conversation_dataset(&args.dataset_id)?;
        let body = requests::import_conversation_data_body(&args.input_uri)?;

        let operation = client.import_conversation_data(&dataset, body).await?;
        started("Conversation import started", &operation)
    }

    // === Answer records ===

    async fn update_answer_record(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: UpdateAnswerRecordArgs = parse_args(params)?;
        validate_name(
            "answer_record_id",
            NameKind::AnswerRecord,
            &args.answer_record_id,
        )?;

        let (body, mask) = args.body()?;
        let record = client
            .update_answer_record(&args.answer_record_id, body, &mask)
            .await?;
        Ok(success("answer_record", record))
    }

    async fn list_answer_records(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: ListArgs = parse_args(params)?;

        let response = client
            .list_answer_records(&args.page, args.filter())
            .await?;
        Ok(page("answerRecords", "answer_records", &response))
    }

    // === Summarization and knowledge search ===

    async fn generate_conversation_summary(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: SummaryArgs = parse_args(params)?;

        let profile = args
            .profile_id()
            .map(|id| client.names().conversation_profile(id))
            .transpose()?;

        let response = client
            .suggest_conversation_summary(&args.conversation_id, args.body()?)
            .await?;

        let mut result = json!({
            "status": "success",
            "summary": response.get("summary").cloned().unwrap_or_else(|| json!({})),
            "latest_message": response.get("latestMessage").cloned().unwrap_or(Value::Null),
            "context_size": response.get("contextSize").cloned().unwrap_or(Value::Null),
        });
        if let Some(profile) = profile {
            result["conversation_profile"] = json!(profile);
        }
        Ok(result)
    }

    async fn search_knowledge(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: SearchKnowledgeArgs = parse_args(params)?;

        let body = args.body(client.names(), self.language())?;
        let response = client.search_knowledge(body).await?;

        Ok(json!({
            "status": "success",
            "answers": response.get("answers").cloned().unwrap_or_else(|| json!([])),
            "rewritten_query": response
                .get("rewrittenQuery")
                .and_then(|q| q.as_str())
                .unwrap_or_default(),
        }))
    }

    async fn get_operation_status(&self, params: Value) -> Result<Value> {
        let client = self.client().await?;
        let args: OperationArgs = parse_args(params)?;
        validate_name("operation_name", NameKind::Operation, &args.operation_name)?;

        let operation = client.get_operation(&args.operation_name).await?;
        let done = operation
            .get("done")
            .and_then(|d| d.as_bool())
            .unwrap_or(false);

        Ok(json!({
            "status": "success",
            "done": done,
            "operation": operation,
        }))
    }
}

fn list_supported_languages() -> Value {
    let languages: Vec<Value> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| json!({ "code": code, "name": name }))
        .collect();

    json!({
        "status": "success",
        "languages": languages,
    })
}

/// Deserialize tool arguments, reporting schema problems as invalid arguments
fn parse_args<T: DeserializeOwned>(params: Value) -> Result<T> {
    let params = match params {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| AgentAssistError::invalid(e.to_string()))
}

fn success(key: &str, value: Value) -> Value {
    let mut result = json!({ "status": "success" });
    result[key] = value;
    result
}

/// Re-key a list response: `field` in the API becomes `key` in the result
fn page(field: &str, key: &str, response: &Value) -> Value {
    let mut result = json!({
        "status": "success",
        "next_page_token": response
            .get("nextPageToken")
            .and_then(|t| t.as_str())
            .unwrap_or_default(),
    });
    result[key] = response.get(field).cloned().unwrap_or_else(|| json!([]));
    result
}

fn operation_name(operation: &Value) -> Result<&str> {
    operation
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| AgentAssistError::Other("operation response has no name".to_string()))
}

fn started(message: &str, operation: &Value) -> Result<Value> {
    Ok(json!({
        "status": "success",
        "message": message,
        "operation_name": operation_name(operation)?,
    }))
}
