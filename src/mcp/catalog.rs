//! Tool catalogue advertised through `tools/list`

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tool schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (e.g., "create_conversation")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl Tool {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Language codes reported by `list_supported_languages`
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en-US", "English (US)"),
    ("en-GB", "English (UK)"),
    ("es-ES", "Spanish (Spain)"),
    ("es-419", "Spanish (Latin America)"),
    ("fr-FR", "French"),
    ("de-DE", "German"),
    ("it-IT", "Italian"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("nl-NL", "Dutch"),
    ("ja-JP", "Japanese"),
    ("ko-KR", "Korean"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
];

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn page_properties(mut properties: Value) -> Value {
    properties["page_size"] = json!({
        "type": "integer",
        "description": "Maximum number of results per page",
        "default": 100
    });
    properties["page_token"] = string("Token from a previous response's next_page_token");
    properties
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// All tools, in catalogue order
pub fn tool_catalog() -> Vec<Tool> {
    vec![
        // Session
        Tool::new(
            "initialize_agent_assist",
            "Initialize the Agent Assist client with service account credentials. Must be called before any other tool unless the server was started with a credentials file.",
            object(
                json!({
                    "service_account_json": string("Service account key JSON document, as a string"),
                    "project_id": string("Google Cloud project ID"),
                    "location": string("Dialogflow location (default: global)")
                }),
                &["service_account_json", "project_id"],
            ),
        ),
        // Conversations
        Tool::new(
            "create_conversation",
            "Create a new conversation using a conversation profile.",
            object(
                json!({
                    "conversation_profile_id": string("ID of the conversation profile to use"),
                    "conversation_id": string("Optional custom conversation ID")
                }),
                &["conversation_profile_id"],
            ),
        ),
        Tool::new(
            "get_conversation",
            "Get a conversation by ID.",
            object(
                json!({ "conversation_id": string("Conversation ID") }),
                &["conversation_id"],
            ),
        ),
        Tool::new(
            "list_conversations",
            "List conversations in the project, optionally filtered (e.g. lifecycle_state = \"IN_PROGRESS\").",
            object(
                page_properties(json!({ "filter": string("Conversation filter expression") })),
                &[],
            ),
        ),
        Tool::new(
            "complete_conversation",
            "Mark a conversation as completed.",
            object(
                json!({ "conversation_id": string("Conversation ID") }),
                &["conversation_id"],
            ),
        ),
        Tool::new(
            "list_messages",
            "List the messages of a conversation.",
            object(
                page_properties(json!({
                    "conversation_id": string("Conversation ID"),
                    "filter": string("Message filter expression")
                })),
                &["conversation_id"],
            ),
        ),
        // Conversation profiles
        Tool::new(
            "create_conversation_profile",
            "Create a conversation profile configuring suggestion features, automated agent and notifications.",
            object(
                json!({
                    "display_name": string("Display name of the profile"),
                    "language_code": string("Language code (default: en-US)"),
                    "time_zone": string("Time zone (default: America/New_York)"),
                    "human_agent_assistant_config": {
                        "type": "object",
                        "description": "Suggestion configuration: human_agent_suggestion_config.feature_configs[] with type, query_config, max_results, confidence_threshold, enable_inline_suggestion; message_analysis_config with enable_entity_extraction and enable_sentiment_analysis"
                    },
                    "automated_agent_config": {
                        "type": "object",
                        "description": "Automated agent configuration with the Dialogflow 'agent' resource name"
                    },
                    "notification_config": {
                        "type": "object",
                        "description": "Pub/Sub notification configuration with 'topic' and optional 'message_format' (PROTO or JSON)"
                    }
                }),
                &["display_name"],
            ),
        ),
        Tool::new(
            "get_conversation_profile",
            "Get a conversation profile by ID.",
            object(
                json!({ "profile_id": string("Conversation profile ID") }),
                &["profile_id"],
            ),
        ),
        Tool::new(
            "list_conversation_profiles",
            "List conversation profiles in the project.",
            object(page_properties(json!({})), &[]),
        ),
        Tool::new(
            "delete_conversation_profile",
            "Delete a conversation profile.",
            object(
                json!({ "profile_id": string("Conversation profile ID") }),
                &["profile_id"],
            ),
        ),
        // Participants and suggestions
        Tool::new(
            "create_participant",
            "Add a participant to a conversation.",
            object(
                json!({
                    "conversation_id": string("Conversation ID"),
                    "role": {
                        "type": "string",
                        "enum": ["END_USER", "HUMAN_AGENT", "AUTOMATED_AGENT"],
                        "default": "END_USER"
                    },
                    "user_id": string("Obfuscated external user ID")
                }),
                &["conversation_id"],
            ),
        ),
        Tool::new(
            "list_participants",
            "List the participants of a conversation.",
            object(
                page_properties(json!({ "conversation_id": string("Conversation ID") })),
                &["conversation_id"],
            ),
        ),
        Tool::new(
            "analyze_content",
            "Send a message from a participant and receive suggestions. Provide one of text_input, audio_input or event_input.",
            object(
                json!({
                    "participant_id": string("Full participant resource name"),
                    "text_input": string("Text message"),
                    "audio_input": string("Base64 encoded LINEAR16 audio at 16000 Hz"),
                    "event_input": {
                        "type": "object",
                        "description": "Event with 'name', optional 'parameters' and 'language_code'"
                    },
                    "language_code": string("Language code (default: en-US)"),
                    "request_id": string("Idempotency key for the request"),
                    "enable_partial_automated_agent_reply": {
                        "type": "boolean",
                        "default": false,
                        "description": "Accepted for compatibility and ignored; partial replies only apply to streaming analysis"
                    }
                }),
                &["participant_id"],
            ),
        ),
        suggest_tool("suggest_articles", "Get article suggestions for a participant."),
        suggest_tool("suggest_faq_answers", "Get FAQ answer suggestions for a participant."),
        suggest_tool("suggest_smart_replies", "Get smart reply suggestions for a participant."),
        // Knowledge bases and documents
        Tool::new(
            "create_knowledge_base",
            "Create a knowledge base.",
            object(
                json!({
                    "display_name": string("Display name of the knowledge base"),
                    "language_code": string("Language code (default: en-US)")
                }),
                &["display_name"],
            ),
        ),
        Tool::new(
            "list_knowledge_bases",
            "List knowledge bases in the project.",
            object(page_properties(json!({})), &[]),
        ),
        Tool::new(
            "delete_knowledge_base",
            "Delete a knowledge base. Set force to also delete its documents.",
            object(
                json!({
                    "knowledge_base_id": string("Knowledge base ID"),
                    "force": { "type": "boolean", "default": false }
                }),
                &["knowledge_base_id"],
            ),
        ),
        Tool::new(
            "create_document",
            "Create a document in a knowledge base from a URI or raw content, waiting until it is ready.",
            object(
                json!({
                    "knowledge_base_id": string("Knowledge base ID"),
                    "display_name": string("Display name of the document"),
                    "mime_type": string("MIME type, e.g. text/html or text/csv"),
                    "knowledge_types": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["FAQ", "EXTRACTIVE_QA", "ARTICLE_SUGGESTION", "AGENT_FACING_SMART_REPLY"]
                        }
                    },
                    "content_uri": string("Public URL or gs:// URI of the document"),
                    "raw_content": string("Inline document content"),
                    "metadata": {
                        "type": "object",
                        "additionalProperties": { "type": "string" }
                    }
                }),
                &["knowledge_base_id", "display_name", "mime_type", "knowledge_types"],
            ),
        ),
        Tool::new(
            "list_documents",
            "List the documents of a knowledge base.",
            object(
                page_properties(json!({ "knowledge_base_id": string("Knowledge base ID") })),
                &["knowledge_base_id"],
            ),
        ),
        // Conversation models
        Tool::new(
            "create_conversation_model",
            "Start training a conversation model from conversation datasets. Returns the operation name.",
            object(
                json!({
                    "display_name": string("Display name of the model"),
                    "datasets": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Conversation dataset IDs"
                    },
                    "language_code": string("Language code (default: en-US)")
                }),
                &["display_name", "datasets"],
            ),
        ),
        Tool::new(
            "deploy_conversation_model",
            "Deploy a trained conversation model. Returns the operation name.",
            object(
                json!({ "model_id": string("Conversation model ID") }),
                &["model_id"],
            ),
        ),
        Tool::new(
            "list_conversation_models",
            "List conversation models in the project.",
            object(page_properties(json!({})), &[]),
        ),
        // Conversation datasets
        Tool::new(
            "create_conversation_dataset",
            "Create a conversation dataset. With input_uri, waits for creation and then starts importing conversations.",
            object(
                json!({
                    "display_name": string("Display name of the dataset"),
                    "description": string("Dataset description"),
                    "input_uri": string("gs:// URI of conversation data to import"),
                    "conversation_info": {
                        "type": "object",
                        "description": "Conversation metadata with 'language_code'"
                    }
                }),
                &["display_name"],
            ),
        ),
        Tool::new(
            "import_conversation_data",
            "Import conversations from Cloud Storage into a dataset. Returns the operation name.",
            object(
                json!({
                    "dataset_id": string("Conversation dataset ID"),
                    "input_uri": string("gs:// URI of conversation data")
                }),
                &["dataset_id", "input_uri"],
            ),
        ),
        // Answer records
        Tool::new(
            "update_answer_record",
            "Record feedback on a suggestion. Only the supplied feedback fields are updated.",
            object(
                json!({
                    "answer_record_id": string("Full answer record resource name"),
                    "clicked": { "type": "boolean" },
                    "displayed": { "type": "boolean" },
                    "correctness_level": {
                        "type": "string",
                        "enum": ["FULLY_CORRECT", "PARTIALLY_CORRECT", "NOT_CORRECT"]
                    },
                    "feedback_details": {
                        "type": "object",
                        "description": "Agent assistant detail feedback (snake_case keys accepted)"
                    }
                }),
                &["answer_record_id"],
            ),
        ),
        Tool::new(
            "list_answer_records",
            "List answer records in the project.",
            object(
                page_properties(json!({ "filter": string("Answer record filter expression") })),
                &[],
            ),
        ),
        // Summarization and knowledge search
        Tool::new(
            "generate_conversation_summary",
            "Generate a summary of a conversation.",
            object(
                json!({
                    "conversation_id": string("Conversation ID"),
                    "profile_id": string("Conversation profile ID, echoed in the result only; the conversation's own profile drives summarization"),
                    "latest_message": string("Full name of the latest message to consider"),
                    "context_size": { "type": "integer", "description": "Number of messages to summarize" }
                }),
                &["conversation_id"],
            ),
        ),
        Tool::new(
            "search_knowledge",
            "Search knowledge bases configured on a conversation profile.",
            object(
                json!({
                    "query": string("Search query text"),
                    "conversation_profile_id": string("Conversation profile ID"),
                    "session_id": string("Session ID for stateless search"),
                    "conversation_id": string("Conversation ID for context"),
                    "latest_message": string("Full name of the latest message"),
                    "query_source": {
                        "type": "string",
                        "enum": ["AGENT_QUERY", "SUGGESTED_QUERY"],
                        "default": "AGENT_QUERY"
                    },
                    "language_code": string("Language code (default: en-US)")
                }),
                &["query", "conversation_profile_id"],
            ),
        ),
        // Utilities
        Tool::new(
            "get_operation_status",
            "Get the status of a long-running operation.",
            object(
                json!({ "operation_name": string("Full operation resource name") }),
                &["operation_name"],
            ),
        ),
        Tool::new(
            "list_supported_languages",
            "List language codes supported by Agent Assist.",
            object(json!({}), &[]),
        ),
    ]
}

fn suggest_tool(name: &str, description: &str) -> Tool {
    Tool::new(
        name,
        description,
        object(
            json!({
                "participant_id": string("Full participant resource name"),
                "latest_message": string("Full name of the latest message to consider"),
                "context_size": { "type": "integer", "description": "Number of previous messages to use" }
            }),
            &["participant_id"],
        ),
    )
}
