//! Tool arguments and Dialogflow request bodies
//!
//! Each tool deserializes its arguments into one of the structs below, which
//! validates them and shapes the camelCase JSON body the REST API expects.

use crate::error::{AgentAssistError, Result};
use crate::services::agent_assist::PageRequest;
use crate::types::ResourceNames;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub const PARTICIPANT_ROLES: &[&str] = &["END_USER", "HUMAN_AGENT", "AUTOMATED_AGENT"];

pub const SUGGESTION_FEATURE_TYPES: &[&str] = &[
    "ARTICLE_SUGGESTION",
    "FAQ",
    "SMART_REPLY",
    "SMART_COMPOSE",
    "DIALOGFLOW_ASSIST",
    "CONVERSATION_SUMMARIZATION",
    "KNOWLEDGE_SEARCH",
    "KNOWLEDGE_ASSIST",
];

pub const KNOWLEDGE_TYPES: &[&str] = &[
    "FAQ",
    "EXTRACTIVE_QA",
    "ARTICLE_SUGGESTION",
    "AGENT_FACING_SMART_REPLY",
];

pub const CORRECTNESS_LEVELS: &[&str] = &["FULLY_CORRECT", "PARTIALLY_CORRECT", "NOT_CORRECT"];

pub const QUERY_SOURCES: &[&str] = &["AGENT_QUERY", "SUGGESTED_QUERY"];

pub const MESSAGE_FORMATS: &[&str] = &["PROTO", "JSON"];

const DEFAULT_TIME_ZONE: &str = "America/New_York";
const DEFAULT_MAX_RESULTS: u64 = 3;
const AUDIO_SAMPLE_RATE_HERTZ: u32 = 16000;

/// Normalize an enum argument and check it against the allowed values
pub fn enum_value(field: &str, value: &str, allowed: &[&str]) -> Result<String> {
    let normalized = value.trim().to_uppercase();
    if allowed.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(AgentAssistError::invalid(format!(
            "{} must be one of {}, got '{}'",
            field,
            allowed.join(", "),
            value
        )))
    }
}

/// Reject empty or whitespace-only required strings
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AgentAssistError::invalid(format!(
            "{} must not be empty",
            field
        )))
    } else {
        Ok(())
    }
}

/// Convert `snake_case` object keys to `camelCase`, recursively
pub fn camel_case_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (snake_to_camel(k), camel_case_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(camel_case_keys).collect()),
        other => other.clone(),
    }
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn as_object<'a>(field: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| AgentAssistError::invalid(format!("{} must be an object", field)))
}

fn string_list(field: &str, value: Option<&Value>) -> Result<Vec<Value>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(Value::String(s.clone())),
                _ => Err(AgentAssistError::invalid(format!(
                    "{} must contain only strings",
                    field
                ))),
            })
            .collect(),
        Some(_) => Err(AgentAssistError::invalid(format!(
            "{} must be a list of strings",
            field
        ))),
    }
}

fn language_or(language_code: &Option<String>, default_language: &str) -> String {
    language_code
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(default_language)
        .to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// === Session ===

#[derive(Debug, Clone, Deserialize)]
pub struct InitializeArgs {
    pub service_account_json: String,
    #[serde(alias = "project_id_input")]
    pub project_id: String,
    #[serde(default)]
    pub location: Option<String>,
}

// === Conversations ===

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationArgs {
    pub conversation_profile_id: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl CreateConversationArgs {
    pub fn body(&self, names: &ResourceNames) -> Result<Value> {
        if let Some(id) = non_empty(&self.conversation_id) {
            crate::types::validate_id("conversation_id", id)?;
        }
        Ok(json!({
            "conversationProfile": names.conversation_profile(&self.conversation_profile_id)?,
        }))
    }

    pub fn conversation_id(&self) -> Option<&str> {
        non_empty(&self.conversation_id)
    }
}

/// Arguments for project-level list tools
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArgs {
    #[serde(flatten)]
    pub page: PageRequest,
    #[serde(default, alias = "filter_str")]
    pub filter: Option<String>,
}

impl ListArgs {
    pub fn filter(&self) -> Option<&str> {
        non_empty(&self.filter)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationArgs {
    pub conversation_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationListArgs {
    pub conversation_id: String,
    #[serde(flatten)]
    pub page: PageRequest,
    #[serde(default)]
    pub filter: Option<String>,
}

impl ConversationListArgs {
    pub fn filter(&self) -> Option<&str> {
        non_empty(&self.filter)
    }
}

// === Conversation profiles ===

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationProfileArgs {
    pub display_name: String,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub human_agent_assistant_config: Option<Value>,
    #[serde(default)]
    pub automated_agent_config: Option<Value>,
    #[serde(default)]
    pub notification_config: Option<Value>,
}

impl CreateConversationProfileArgs {
    pub fn body(&self, default_language: &str) -> Result<Value> {
        require_text("display_name", &self.display_name)?;

        let mut profile = json!({
            "displayName": self.display_name,
            "languageCode": language_or(&self.language_code, default_language),
            "timeZone": non_empty(&self.time_zone).unwrap_or(DEFAULT_TIME_ZONE),
        });

        if let Some(config) = self.human_agent_assistant_config.as_ref().filter(|c| !c.is_null()) {
            profile["humanAgentAssistantConfig"] = human_agent_assistant_config(config)?;
        }

        if let Some(config) = self.automated_agent_config.as_ref().filter(|c| !c.is_null()) {
            let config = as_object("automated_agent_config", config)?;
            let agent = config
                .get("agent")
                .and_then(|a| a.as_str())
                .filter(|a| !a.is_empty())
                .ok_or_else(|| AgentAssistError::invalid("automated_agent_config.agent is required"))?;
            profile["automatedAgentConfig"] = json!({ "agent": agent });
        }

        if let Some(config) = self.notification_config.as_ref().filter(|c| !c.is_null()) {
            let config = as_object("notification_config", config)?;
            let topic = config
                .get("topic")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AgentAssistError::invalid("notification_config.topic is required"))?;
            let format = match config.get("message_format").and_then(|f| f.as_str()) {
                Some(format) => enum_value("notification_config.message_format", format, MESSAGE_FORMATS)?,
                None => "PROTO".to_string(),
            };
            profile["notificationConfig"] = json!({
                "topic": topic,
                "messageFormat": format,
            });
        }

        Ok(profile)
    }
}

/// Shape a snake_case human agent assistant config into the API form
pub fn human_agent_assistant_config(config: &Value) -> Result<Value> {
    let config = as_object("human_agent_assistant_config", config)?;
    let mut out = Map::new();

    if let Some(suggestion) = config.get("human_agent_suggestion_config") {
        let suggestion = as_object("human_agent_suggestion_config", suggestion)?;
        let feature_configs = match suggestion.get("feature_configs") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(suggestion_feature_config)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(AgentAssistError::invalid(
                    "human_agent_suggestion_config.feature_configs must be a list",
                ))
            }
        };
        out.insert(
            "humanAgentSuggestionConfig".to_string(),
            json!({ "featureConfigs": feature_configs }),
        );
    }

    if let Some(analysis) = config.get("message_analysis_config") {
        let analysis = as_object("message_analysis_config", analysis)?;
        let flag = |key: &str| analysis.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
        out.insert(
            "messageAnalysisConfig".to_string(),
            json!({
                "enableEntityExtraction": flag("enable_entity_extraction"),
                "enableSentimentAnalysis": flag("enable_sentiment_analysis"),
            }),
        );
    }

    Ok(Value::Object(out))
}

fn suggestion_feature_config(feature: &Value) -> Result<Value> {
    let feature = as_object("feature_configs[]", feature)?;

    let feature_type = match feature.get("type").and_then(|t| t.as_str()) {
        Some(t) => enum_value("feature_configs[].type", t, SUGGESTION_FEATURE_TYPES)?,
        None => "ARTICLE_SUGGESTION".to_string(),
    };

    let mut query_config = json!({
        "maxResults": feature
            .get("max_results")
            .and_then(|m| m.as_u64())
            .unwrap_or(DEFAULT_MAX_RESULTS),
        "confidenceThreshold": feature
            .get("confidence_threshold")
            .and_then(|c| c.as_f64())
            .unwrap_or(0.0),
    });

    if let Some(query) = feature.get("query_config") {
        let query = as_object("feature_configs[].query_config", query)?;

        if let Some(source) = query.get("knowledge_base_query_source") {
            query_config["knowledgeBaseQuerySource"] = json!({
                "knowledgeBases": string_list("knowledge_bases", source.get("knowledge_bases"))?,
            });
        }
        if let Some(source) = query.get("document_query_source") {
            query_config["documentQuerySource"] = json!({
                "documents": string_list("documents", source.get("documents"))?,
            });
        }
        if let Some(source) = query.get("dialogflow_query_source") {
            query_config["dialogflowQuerySource"] = json!({
                "agent": source.get("agent").cloned().unwrap_or(Value::Null),
            });
        }
    }

    Ok(json!({
        "suggestionFeature": { "type": feature_type },
        "queryConfig": query_config,
        "enableInlineSuggestion": feature
            .get("enable_inline_suggestion")
            .and_then(|e| e.as_bool())
            .unwrap_or(true),
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileArgs {
    pub profile_id: String,
}

// === Participants ===

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParticipantArgs {
    pub conversation_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateParticipantArgs {
    pub fn body(&self) -> Result<Value> {
        let role = match non_empty(&self.role) {
            Some(role) => enum_value("role", role, PARTICIPANT_ROLES)?,
            None => "END_USER".to_string(),
        };

        let mut participant = json!({ "role": role });
        if let Some(user_id) = non_empty(&self.user_id) {
            participant["obfuscatedExternalUserId"] = json!(user_id);
        }
        Ok(participant)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeContentArgs {
    pub participant_id: String,
    #[serde(default)]
    pub text_input: Option<String>,
    /// Base64 encoded LINEAR16 audio
    #[serde(default)]
    pub audio_input: Option<String>,
    #[serde(default)]
    pub event_input: Option<Value>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub enable_partial_automated_agent_reply: bool,
}

impl AnalyzeContentArgs {
    /// Input precedence: text, then audio, then event
    pub fn body(&self, default_language: &str) -> Result<Value> {
        let language = language_or(&self.language_code, default_language);

        let mut body = if let Some(text) = non_empty(&self.text_input) {
            json!({
                "textInput": { "text": text, "languageCode": language },
            })
        } else if let Some(audio) = non_empty(&self.audio_input) {
            BASE64.decode(audio.trim()).map_err(|e| {
                AgentAssistError::invalid(format!("audio_input is not valid base64: {}", e))
            })?;
            json!({
                "audioInput": {
                    "audio": audio.trim(),
                    "config": {
                        "audioEncoding": "AUDIO_ENCODING_LINEAR_16",
                        "sampleRateHertz": AUDIO_SAMPLE_RATE_HERTZ,
                        "languageCode": language,
                    },
                },
            })
        } else if let Some(event) = self.event_input.as_ref().filter(|e| !e.is_null()) {
            let event = as_object("event_input", event)?;
            let name = event
                .get("name")
                .and_then(|n| n.as_str())
                .filter(|n| !n.is_empty())
                .ok_or_else(|| AgentAssistError::invalid("event_input.name is required"))?;
            let event_language = event
                .get("language_code")
                .and_then(|l| l.as_str())
                .unwrap_or(&language);
            json!({
                "eventInput": {
                    "name": name,
                    "parameters": event.get("parameters").cloned().unwrap_or_else(|| json!({})),
                    "languageCode": event_language,
                },
            })
        } else {
            return Err(AgentAssistError::invalid(
                "one of text_input, audio_input or event_input is required",
            ));
        };

        if let Some(request_id) = non_empty(&self.request_id) {
            body["requestId"] = json!(request_id);
        }

        Ok(body)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestArgs {
    pub participant_id: String,
    #[serde(default)]
    pub latest_message: Option<String>,
    #[serde(default)]
    pub context_size: Option<i32>,
}

impl SuggestArgs {
    pub fn body(&self) -> Result<Value> {
        let mut body = json!({});
        if let Some(message) = non_empty(&self.latest_message) {
            body["latestMessage"] = json!(message);
        }
        if let Some(size) = self.context_size {
            if size <= 0 {
                return Err(AgentAssistError::invalid("context_size must be positive"));
            }
            body["contextSize"] = json!(size);
        }
        Ok(body)
    }
}

// === Knowledge bases and documents ===

#[derive(Debug, Clone, Deserialize)]
pub struct CreateKnowledgeBaseArgs {
    pub display_name: String,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl CreateKnowledgeBaseArgs {
    pub fn body(&self, default_language: &str) -> Result<Value> {
        require_text("display_name", &self.display_name)?;
        Ok(json!({
            "displayName": self.display_name,
            "languageCode": language_or(&self.language_code, default_language),
        }))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteKnowledgeBaseArgs {
    pub knowledge_base_id: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseListArgs {
    pub knowledge_base_id: String,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentArgs {
    pub knowledge_base_id: String,
    pub display_name: String,
    pub mime_type: String,
    pub knowledge_types: Vec<String>,
    #[serde(default)]
    pub content_uri: Option<String>,
    #[serde(default)]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl CreateDocumentArgs {
    /// Source precedence: content_uri, then raw_content
    pub fn body(&self) -> Result<Value> {
        require_text("display_name", &self.display_name)?;
        require_text("mime_type", &self.mime_type)?;

        if self.knowledge_types.is_empty() {
            return Err(AgentAssistError::invalid(
                "knowledge_types must list at least one type",
            ));
        }
        let knowledge_types = self
            .knowledge_types
            .iter()
            .map(|t| enum_value("knowledge_types", t, KNOWLEDGE_TYPES))
            .collect::<Result<Vec<_>>>()?;

        let mut document = json!({
            "displayName": self.display_name,
            "mimeType": self.mime_type,
            "knowledgeTypes": knowledge_types,
        });

        if let Some(uri) = non_empty(&self.content_uri) {
            document["contentUri"] = json!(uri);
        } else if let Some(raw) = self.raw_content.as_deref().filter(|r| !r.is_empty()) {
            document["rawContent"] = json!(BASE64.encode(raw.as_bytes()));
        } else {
            return Err(AgentAssistError::invalid(
                "one of content_uri or raw_content is required",
            ));
        }

        if let Some(metadata) = self.metadata.as_ref().filter(|m| !m.is_empty()) {
            let mut entries = Map::new();
            for (key, value) in metadata {
                let value = value.as_str().ok_or_else(|| {
                    AgentAssistError::invalid(format!("metadata.{} must be a string", key))
                })?;
                entries.insert(key.clone(), json!(value));
            }
            document["metadata"] = Value::Object(entries);
        }

        Ok(document)
    }
}

// === Conversation models and datasets ===

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationModelArgs {
    pub display_name: String,
    pub datasets: Vec<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl CreateConversationModelArgs {
    pub fn body(&self, names: &ResourceNames, default_language: &str) -> Result<Value> {
        require_text("display_name", &self.display_name)?;
        if self.datasets.is_empty() {
            return Err(AgentAssistError::invalid(
                "datasets must list at least one dataset ID",
            ));
        }

        let datasets = self
            .datasets
            .iter()
            .map(|id| Ok(json!({ "dataset": names.conversation_dataset(id)? })))
            .collect::<Result<Vec<_>>>()?;

        Ok(json!({
            "displayName": self.display_name,
            "languageCode": language_or(&self.language_code, default_language),
            "datasets": datasets,
        }))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelArgs {
    pub model_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationDatasetArgs {
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_uri: Option<String>,
    #[serde(default)]
    pub conversation_info: Option<Value>,
}

impl CreateConversationDatasetArgs {
    pub fn body(&self, default_language: &str) -> Result<Value> {
        require_text("display_name", &self.display_name)?;

        let mut dataset = json!({ "displayName": self.display_name });
        if let Some(description) = non_empty(&self.description) {
            dataset["description"] = json!(description);
        }
        if let Some(info) = self.conversation_info.as_ref().filter(|i| !i.is_null()) {
            let info = as_object("conversation_info", info)?;
            let language = info
                .get("language_code")
                .and_then(|l| l.as_str())
                .unwrap_or(default_language);
            dataset["conversationInfo"] = json!({ "languageCode": language });
        }
        Ok(dataset)
    }

    pub fn input_uri(&self) -> Option<&str> {
        non_empty(&self.input_uri)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConversationDataArgs {
    pub dataset_id: String,
    pub input_uri: String,
}

/// Body for importConversationData from a Cloud Storage URI
pub fn import_conversation_data_body(input_uri: &str) -> Result<Value> {
    if !input_uri.starts_with("gs://") {
        return Err(AgentAssistError::invalid(format!(
            "input_uri must be a Cloud Storage URI (gs://...), got '{}'",
            input_uri
        )));
    }
    Ok(json!({
        "inputConfig": { "gcsSource": { "uris": [input_uri] } },
    }))
}

// === Answer records ===

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAnswerRecordArgs {
    pub answer_record_id: String,
    #[serde(default)]
    pub clicked: Option<bool>,
    #[serde(default)]
    pub displayed: Option<bool>,
    #[serde(default)]
    pub correctness_level: Option<String>,
    #[serde(default)]
    pub feedback_details: Option<Value>,
}

impl UpdateAnswerRecordArgs {
    /// Returns the answer record body and the update mask paths
    pub fn body(&self) -> Result<(Value, Vec<&'static str>)> {
        let mut feedback = Map::new();
        let mut mask = Vec::new();

        if let Some(clicked) = self.clicked {
            feedback.insert("clicked".to_string(), json!(clicked));
            mask.push("answer_feedback.clicked");
        }
        if let Some(displayed) = self.displayed {
            feedback.insert("displayed".to_string(), json!(displayed));
            mask.push("answer_feedback.displayed");
        }
        if let Some(level) = non_empty(&self.correctness_level) {
            let level = enum_value("correctness_level", level, CORRECTNESS_LEVELS)?;
            feedback.insert("correctnessLevel".to_string(), json!(level));
            mask.push("answer_feedback.correctness_level");
        }
        if let Some(details) = self.feedback_details.as_ref().filter(|d| !d.is_null()) {
            as_object("feedback_details", details)?;
            feedback.insert(
                "agentAssistantDetailFeedback".to_string(),
                camel_case_keys(details),
            );
            mask.push("answer_feedback.agent_assistant_detail_feedback");
        }

        if mask.is_empty() {
            return Err(AgentAssistError::invalid(
                "at least one of clicked, displayed, correctness_level or feedback_details is required",
            ));
        }

        Ok((
            json!({
                "name": self.answer_record_id,
                "answerFeedback": Value::Object(feedback),
            }),
            mask,
        ))
    }
}

// === Summarization and knowledge search ===

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryArgs {
    pub conversation_id: String,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub latest_message: Option<String>,
    #[serde(default)]
    pub context_size: Option<i32>,
}

impl SummaryArgs {
    pub fn body(&self) -> Result<Value> {
        let mut body = json!({});
        if let Some(message) = non_empty(&self.latest_message) {
            body["latestMessage"] = json!(message);
        }
        if let Some(size) = self.context_size {
            if size <= 0 {
                return Err(AgentAssistError::invalid("context_size must be positive"));
            }
            body["contextSize"] = json!(size);
        }
        Ok(body)
    }

    pub fn profile_id(&self) -> Option<&str> {
        non_empty(&self.profile_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchKnowledgeArgs {
    pub query: String,
    pub conversation_profile_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub latest_message: Option<String>,
    #[serde(default)]
    pub query_source: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl SearchKnowledgeArgs {
    pub fn body(&self, names: &ResourceNames, default_language: &str) -> Result<Value> {
        require_text("query", &self.query)?;

        let query_source = match non_empty(&self.query_source) {
            Some(source) => enum_value("query_source", source, QUERY_SOURCES)?,
            None => "AGENT_QUERY".to_string(),
        };

        let mut body = json!({
            "parent": names.parent(),
            "query": {
                "text": self.query,
                "languageCode": language_or(&self.language_code, default_language),
            },
            "conversationProfile": names.conversation_profile(&self.conversation_profile_id)?,
            "querySource": query_source,
        });

        if let Some(session_id) = non_empty(&self.session_id) {
            body["sessionId"] = json!(session_id);
        }
        if let Some(conversation_id) = non_empty(&self.conversation_id) {
            body["conversation"] = json!(names.conversation(conversation_id)?);
        }
        if let Some(message) = non_empty(&self.latest_message) {
            body["latestMessage"] = json!(message);
        }

        Ok(body)
    }
}

// === Operations ===

#[derive(Debug, Clone, Deserialize)]
pub struct OperationArgs {
    pub operation_name: String,
}
