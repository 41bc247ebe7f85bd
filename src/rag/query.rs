// Retrieval query construction from a coaching request
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::RetrievalConfig;
use crate::rag::context::truncate_chars;
use crate::types::RetrievalRequest;

/// Character budget of the query text before the ellipsis marker
pub const MAX_QUERY_CHARS: usize = 4000;

/// Number of hits requested from (and kept after) the vector search
pub const DEFAULT_TOP_K: usize = 8;

/// Filter key for the conversation type (always present)
pub const FILTER_CONVERSATION_TYPE: &str = "conversation_type";

/// Filter key for the jurisdiction (present only when given)
pub const FILTER_JURISDICTION: &str = "jurisdiction";

/// Exact-match conjunction over payload fields
pub type MetadataFilter = BTreeMap<String, String>;

/// Query sent to the vector search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub text: String,
    pub top_k: usize,
    pub filter: MetadataFilter,
    /// Language hint; only set when the request carries a non-blank language
    pub language: Option<String>,
}

/// Builds retrieval queries with fixed character and result budgets
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    max_query_chars: usize,
    top_k: usize,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            max_query_chars: MAX_QUERY_CHARS,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_config(config: &RetrievalConfig) -> Self {
        Self {
            max_query_chars: config.max_query_chars,
            top_k: config.top_k,
        }
    }

    /// Build query text, filter and language hint. Never fails.
    pub fn build(&self, request: &RetrievalRequest) -> RetrievalQuery {
        RetrievalQuery {
            text: self.build_text(request),
            top_k: self.top_k,
            filter: Self::build_filter(request),
            language: request.lang().map(str::to_string),
        }
    }

    /// Labeled fields followed by the raw transcript, one per line
    pub fn build_text(&self, request: &RetrievalRequest) -> String {
        let mut parts = Vec::with_capacity(4);
        parts.push(format!("conversationType: {}", request.conversation_type));
        if let Some(sub_type) = request.sub_type() {
            parts.push(format!("conversationSubType: {}", sub_type));
        }
        if let Some(goal) = request.goal() {
            parts.push(format!("goal: {}", goal));
        }
        parts.push(request.transcript_text.clone());

        truncate_chars(&parts.join("\n"), self.max_query_chars)
    }

    /// Only `conversation_type` and a non-blank `jurisdiction` are filterable
    pub fn build_filter(request: &RetrievalRequest) -> MetadataFilter {
        let mut filter = MetadataFilter::new();
        filter.insert(
            FILTER_CONVERSATION_TYPE.to_string(),
            request.conversation_type.clone(),
        );
        if let Some(jurisdiction) = request.jurisdiction() {
            filter.insert(FILTER_JURISDICTION.to_string(), jurisdiction.to_string());
        }
        filter
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::context::ELLIPSIS;

    #[test]
    fn test_minimal_request() {
        let request = RetrievalRequest::new("feedback", "FK: Hallo\nMA: Hallo");
        let query = QueryBuilder::new().build(&request);

        assert_eq!(query.text, "conversationType: feedback\nFK: Hallo\nMA: Hallo");
        assert_eq!(query.top_k, 8);
        assert_eq!(query.filter.len(), 1);
        assert_eq!(query.filter.get("conversation_type").map(String::as_str), Some("feedback"));
        assert!(query.language.is_none());
    }

    #[test]
    fn test_field_order() {
        let request = RetrievalRequest::new("feedback", "transcript")
            .with_goal("Klarheit schaffen")
            .with_sub_type("kritisch");
        let text = QueryBuilder::new().build_text(&request);
        assert_eq!(
            text,
            "conversationType: feedback\nconversationSubType: kritisch\ngoal: Klarheit schaffen\ntranscript"
        );
    }

    #[test]
    fn test_blank_optionals_are_skipped() {
        let request = RetrievalRequest::new("feedback", "transcript")
            .with_sub_type(" ")
            .with_goal("");
        let text = QueryBuilder::new().build_text(&request);
        assert_eq!(text, "conversationType: feedback\ntranscript");
    }

    #[test]
    fn test_jurisdiction_in_filter() {
        let request = RetrievalRequest::new("feedback", "t").with_jurisdiction("de_eu");
        let filter = QueryBuilder::build_filter(&request);
        assert_eq!(filter.get("jurisdiction").map(String::as_str), Some("de_eu"));
    }

    #[test]
    fn test_language_never_in_filter() {
        let request = RetrievalRequest::new("feedback", "t").with_lang("de");
        let query = QueryBuilder::new().build(&request);
        assert!(!query.filter.contains_key("lang"));
        assert_eq!(query.language.as_deref(), Some("de"));
    }

    #[test]
    fn test_long_transcript_truncated() {
        let request = RetrievalRequest::new("feedback", "ä".repeat(5000));
        let text = QueryBuilder::new().build_text(&request);
        assert_eq!(text.chars().count(), MAX_QUERY_CHARS + 1);
        assert!(text.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_custom_limits() {
        let config = RetrievalConfig {
            top_k: 3,
            max_query_chars: 10,
            max_snippet_chars: 100,
        };
        let builder = QueryBuilder::with_config(&config);
        let query = builder.build(&RetrievalRequest::new("feedback", "long transcript"));
        assert_eq!(query.top_k, 3);
        assert_eq!(query.text, "conversati…");
    }
}
