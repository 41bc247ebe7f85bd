//! Coaching prompt input and rendering

use serde::Serialize;

use crate::types::RetrievalRequest;

/// Goal used when the request carries none
pub const DEFAULT_GOAL: &str = "Provide clear, constructive coaching feedback.";

const RULES: &str = "\
You are an AI-powered communication coach for leadership conversations.

IMPORTANT RULES:
- Focus your evaluation primarily on the LEADER (manager).
- The transcript uses speaker labels. If a Leader Label / Employee Label is provided, use it to interpret who is who.
- Do NOT reveal any internal sources, cards, vector database, or metadata. Use relevant snippets only as guidance.
- Do NOT use real names in quotes. Use the speaker labels or generic \"Führungskraft\" / \"Mitarbeiter:in\".
- Output language: if a Language is provided (e.g. \"de\"), write the feedback in that language. Otherwise, default to German.";

const OUTPUT_INSTRUCTIONS: &str = "\
Return ONLY a JSON object with these fields:
- \"summary\": string
- \"strengths\": array of strings
- \"improvements\": array of strings
- \"rewrites\": array of strings
- \"riskFlags\": array of strings
- \"scores\": object of numbers from 0 to 10, including \"overall\"";

/// Everything the generation backend sees for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptInput {
    pub input_text: String,
    pub conversation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_sub_type: Option<String>,
    pub goal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_label: Option<String>,
    /// Absent, not empty, when retrieval found nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevant_snippets: Option<Vec<String>>,
}

impl PromptInput {
    /// Blank optional fields are dropped; an empty snippet list becomes `None`
    pub fn from_request(request: &RetrievalRequest, snippets: Vec<String>) -> Self {
        Self {
            input_text: request.transcript_text.clone(),
            conversation_type: request.conversation_type.clone(),
            conversation_sub_type: request.sub_type().map(str::to_string),
            goal: request.goal().unwrap_or(DEFAULT_GOAL).to_string(),
            lang: request.lang().map(str::to_string),
            jurisdiction: request.jurisdiction().map(str::to_string),
            leader_label: request.leader_label().map(str::to_string),
            employee_label: request.employee_label().map(str::to_string),
            relevant_snippets: if snippets.is_empty() {
                None
            } else {
                Some(snippets)
            },
        }
    }

    /// Render the full prompt text
    pub fn render(&self) -> String {
        let mut prompt = String::with_capacity(self.input_text.len() + 2048);
        prompt.push_str(RULES);
        prompt.push_str("\n\nTranscript:\n");
        prompt.push_str(&self.input_text);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Conversation Type: {}\n", self.conversation_type));
        if let Some(sub_type) = &self.conversation_sub_type {
            prompt.push_str(&format!("Conversation Subtype: {}\n", sub_type));
        }
        prompt.push_str(&format!("Goal: {}\n", self.goal));
        if let Some(lang) = &self.lang {
            prompt.push_str(&format!("Language: {}\n", lang));
        }
        if let Some(jurisdiction) = &self.jurisdiction {
            prompt.push_str(&format!("Jurisdiction: {}\n", jurisdiction));
        }
        if let Some(label) = &self.leader_label {
            prompt.push_str(&format!("Leader Label: {}\n", label));
        }
        if let Some(label) = &self.employee_label {
            prompt.push_str(&format!("Employee Label: {}\n", label));
        }

        if let Some(snippets) = &self.relevant_snippets {
            prompt.push_str("\nInternal Coaching Guidance (do not mention explicitly):\n");
            for snippet in snippets {
                prompt.push_str("- ");
                prompt.push_str(snippet);
                prompt.push('\n');
            }
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_INSTRUCTIONS);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_goal() {
        let input = PromptInput::from_request(&RetrievalRequest::new("feedback", "t").with_goal(" "), vec![]);
        assert_eq!(input.goal, DEFAULT_GOAL);
    }

    #[test]
    fn test_empty_snippets_omitted() {
        let input = PromptInput::from_request(&RetrievalRequest::new("feedback", "t"), vec![]);
        assert!(input.relevant_snippets.is_none());

        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("relevantSnippets").is_none());
        assert!(!input.render().contains("Internal Coaching Guidance"));
    }

    #[test]
    fn test_guidance_section_rendered() {
        let input = PromptInput::from_request(
            &RetrievalRequest::new("feedback", "FK: Hallo"),
            vec!["[#c1 score=0.900]\nIch-Botschaften nutzen".to_string()],
        );
        let prompt = input.render();
        assert!(prompt.contains("Internal Coaching Guidance"));
        assert!(prompt.contains("- [#c1 score=0.900]\nIch-Botschaften nutzen"));
    }

    #[test]
    fn test_optional_lines() {
        let request = RetrievalRequest::new("feedback", "FK: Hallo")
            .with_sub_type("kritisch")
            .with_lang("de")
            .with_speaker_labels("FK", "MA");
        let prompt = PromptInput::from_request(&request, vec![]).render();
        assert!(prompt.contains("Conversation Subtype: kritisch"));
        assert!(prompt.contains("Language: de"));
        assert!(prompt.contains("Leader Label: FK"));
        assert!(prompt.contains("Employee Label: MA"));
        assert!(!prompt.contains("Jurisdiction:"));
    }
}
