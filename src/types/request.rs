//! Coaching request as received from the caller
//!
//! Field names follow the caller-facing JSON contract (`conversationType`,
//! `transcriptText`, ...).

use serde::{Deserialize, Serialize};

use crate::errors::{CoachError, Result};

/// One coaching-feedback request. Built once, never mutated by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalRequest {
    pub conversation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_sub_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub transcript_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    /// Speaker label of the leader in the transcript (prompt only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_label: Option<String>,
    /// Speaker label of the employee in the transcript (prompt only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_label: Option<String>,
}

impl RetrievalRequest {
    pub fn new(conversation_type: impl Into<String>, transcript_text: impl Into<String>) -> Self {
        Self {
            conversation_type: conversation_type.into(),
            transcript_text: transcript_text.into(),
            ..Default::default()
        }
    }

    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.conversation_sub_type = Some(sub_type.into());
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    pub fn with_speaker_labels(
        mut self,
        leader: impl Into<String>,
        employee: impl Into<String>,
    ) -> Self {
        self.leader_label = Some(leader.into());
        self.employee_label = Some(employee.into());
        self
    }

    /// Reject requests missing the two required fields.
    ///
    /// Runs before any retrieval attempt; a failure here fails the whole
    /// coaching request.
    pub fn validate(&self) -> Result<()> {
        if self.conversation_type.trim().is_empty() {
            return Err(CoachError::Validation("Missing conversationType".to_string()));
        }
        if self.transcript_text.trim().is_empty() {
            return Err(CoachError::Validation("Missing transcriptText".to_string()));
        }
        Ok(())
    }

    pub fn sub_type(&self) -> Option<&str> {
        non_blank(&self.conversation_sub_type)
    }

    pub fn goal(&self) -> Option<&str> {
        non_blank(&self.goal)
    }

    pub fn lang(&self) -> Option<&str> {
        non_blank(&self.lang)
    }

    pub fn jurisdiction(&self) -> Option<&str> {
        non_blank(&self.jurisdiction)
    }

    pub fn leader_label(&self) -> Option<&str> {
        non_blank(&self.leader_label)
    }

    pub fn employee_label(&self) -> Option<&str> {
        non_blank(&self.employee_label)
    }
}

/// The value as given, or `None` when absent or whitespace-only.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_minimal_request() {
        let request = RetrievalRequest::new("feedback", "FK: Hallo\nMA: Hallo");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_conversation_type() {
        let request = RetrievalRequest::new("   ", "FK: Hallo");
        let err = request.validate().unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));
        assert!(err.to_string().contains("conversationType"));
    }

    #[test]
    fn test_validate_rejects_blank_transcript() {
        let request = RetrievalRequest::new("feedback", "\n\t");
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("transcriptText"));
    }

    #[test]
    fn test_blank_optionals_read_as_absent() {
        let request = RetrievalRequest::new("feedback", "text")
            .with_goal("  ")
            .with_jurisdiction("")
            .with_lang("de");
        assert_eq!(request.goal(), None);
        assert_eq!(request.jurisdiction(), None);
        assert_eq!(request.lang(), Some("de"));
    }

    #[test]
    fn test_non_blank_keeps_value_untrimmed() {
        let value = Some(" de_eu ".to_string());
        assert_eq!(non_blank(&value), Some(" de_eu "));
    }

    #[test]
    fn test_deserialize_caller_contract() {
        let json = r#"{
            "conversationType": "feedback",
            "conversationSubType": "kritisch",
            "transcriptText": "FK: Hallo",
            "lang": "de",
            "jurisdiction": "de_eu"
        }"#;
        let request: RetrievalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.conversation_type, "feedback");
        assert_eq!(request.sub_type(), Some("kritisch"));
        assert_eq!(request.goal, None);
        assert_eq!(request.jurisdiction(), Some("de_eu"));
    }
}
