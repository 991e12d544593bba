//! Dialogflow resource names
//!
//! Tools accept short IDs for project-scoped resources and full resource
//! names for resources returned by the API (participants, answer records,
//! operations). Both forms are validated before any request is sent.

use crate::error::{AgentAssistError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static SHORT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid short id regex"));

static PARTICIPANT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^projects/[^/]+/(locations/[^/]+/)?conversations/[^/]+/participants/[^/]+$")
        .expect("valid participant regex")
});

static ANSWER_RECORD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^projects/[^/]+/(locations/[^/]+/)?answerRecords/[^/]+$")
        .expect("valid answer record regex")
});

static OPERATION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^projects/[^/]+/(locations/[^/]+/)?operations/[^/]+$")
        .expect("valid operation regex")
});

/// Kind of full resource name accepted from callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Participant,
    AnswerRecord,
    Operation,
}

impl NameKind {
    fn pattern(&self) -> &'static Regex {
        match self {
            NameKind::Participant => &*PARTICIPANT_NAME,
            NameKind::AnswerRecord => &*ANSWER_RECORD_NAME,
            NameKind::Operation => &*OPERATION_NAME,
        }
    }

    fn example(&self) -> &'static str {
        match self {
            NameKind::Participant => {
                "projects/<project>/locations/<location>/conversations/<id>/participants/<id>"
            }
            NameKind::AnswerRecord => "projects/<project>/locations/<location>/answerRecords/<id>",
            NameKind::Operation => "projects/<project>/locations/<location>/operations/<id>",
        }
    }
}

/// Validate a short resource ID such as a conversation or profile ID
pub fn validate_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(AgentAssistError::invalid(format!(
            "{} must not be empty",
            field
        )));
    }

    if !SHORT_ID.is_match(id) {
        return Err(AgentAssistError::invalid(format!(
            "{} '{}' must be a bare ID (letters, digits, '.', '_' or '-')",
            field, id
        )));
    }

    Ok(())
}

/// Validate a full resource name of the given kind
pub fn validate_name(field: &str, kind: NameKind, name: &str) -> Result<()> {
    if kind.pattern().is_match(name) {
        Ok(())
    } else {
        Err(AgentAssistError::invalid(format!(
            "{} must be a full resource name like {}, got '{}'",
            field,
            kind.example(),
            name
        )))
    }
}

/// Builds resource names scoped to one project and location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    project_id: String,
    location: String,
}

impl ResourceNames {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Result<Self> {
        let project_id = project_id.into();
        let location = location.into();
        validate_id("project_id", &project_id)?;
        validate_id("location", &location)?;
        Ok(Self {
            project_id,
            location,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// `projects/{project}/locations/{location}`
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    pub fn conversation(&self, id: &str) -> Result<String> {
        self.child("conversation_id", "conversations", id)
    }

    pub fn conversation_profile(&self, id: &str) -> Result<String> {
        self.child("conversation_profile_id", "conversationProfiles", id)
    }

    pub fn knowledge_base(&self, id: &str) -> Result<String> {
        self.child("knowledge_base_id", "knowledgeBases", id)
    }

    pub fn conversation_model(&self, id: &str) -> Result<String> {
        self.child("model_id", "conversationModels", id)
    }

    pub fn conversation_dataset(&self, id: &str) -> Result<String> {
        self.child("dataset_id", "conversationDatasets", id)
    }

    fn child(&self, field: &str, collection: &str, id: &str) -> Result<String> {
        validate_id(field, id)?;
        Ok(format!("{}/{}/{}", self.parent(), collection, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_and_children() {
        let names = ResourceNames::new("my-project", "global").unwrap();
        assert_eq!(names.parent(), "projects/my-project/locations/global");
        assert_eq!(
            names.conversation("conv-1").unwrap(),
            "projects/my-project/locations/global/conversations/conv-1"
        );
        assert_eq!(
            names.conversation_profile("prof_1").unwrap(),
            "projects/my-project/locations/global/conversationProfiles/prof_1"
        );
        assert_eq!(
            names.conversation_dataset("ds").unwrap(),
            "projects/my-project/locations/global/conversationDatasets/ds"
        );
    }

    #[test]
    fn test_rejects_path_injection() {
        let names = ResourceNames::new("p", "global").unwrap();
        assert!(names.conversation("a/b").is_err());
        assert!(names.knowledge_base("").is_err());
        assert!(names.conversation_model("  ").is_err());
        assert!(ResourceNames::new("p/q", "global").is_err());
    }

    #[test]
    fn test_validate_full_names() {
        assert!(validate_name(
            "participant_id",
            NameKind::Participant,
            "projects/p/locations/global/conversations/c/participants/x"
        )
        .is_ok());
        assert!(validate_name(
            "participant_id",
            NameKind::Participant,
            "projects/p/conversations/c/participants/x"
        )
        .is_ok());
        assert!(validate_name("participant_id", NameKind::Participant, "x").is_err());

        assert!(validate_name(
            "answer_record_id",
            NameKind::AnswerRecord,
            "projects/p/locations/global/answerRecords/123"
        )
        .is_ok());
        assert!(validate_name(
            "operation_name",
            NameKind::Operation,
            "projects/p/locations/global/conversations/c"
        )
        .is_err());
    }

    #[test]
    fn test_invalid_name_message_mentions_field() {
        let err = validate_name("answer_record_id", NameKind::AnswerRecord, "abc").unwrap_err();
        assert!(err.to_string().contains("answer_record_id"));
        assert!(err.to_string().contains("answerRecords"));
    }
}
