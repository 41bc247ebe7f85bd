// Retrieval orchestration: query -> search (with language fallback) -> snippets
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::RetrievalConfig;
use crate::errors::Result;
use crate::rag::context::{Snippet, SnippetFormatter};
use crate::rag::query::{QueryBuilder, RetrievalQuery};
use crate::rag::retrieval::{SearchBackend, SearchHit};
use crate::types::RetrievalRequest;

/// What retrieval produced for one request.
///
/// Failures are recorded in `error`, never raised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    pub snippets: Vec<Snippet>,
    pub count: usize,
    pub error: Option<String>,
    /// True when the language-free second attempt was issued
    pub fallback_used: bool,
}

impl RetrievalOutcome {
    fn from_snippets(snippets: Vec<Snippet>, fallback_used: bool) -> Self {
        Self {
            count: snippets.len(),
            snippets,
            error: None,
            fallback_used,
        }
    }

    fn degraded(error: String) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    /// Rendered snippet texts, in order
    pub fn snippet_texts(&self) -> Vec<String> {
        self.snippets.iter().map(|s| s.content.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Effective hits of a search sequence
struct SearchAttempts {
    hits: Vec<SearchHit>,
    fallback_used: bool,
}

/// Runs retrieval for coaching requests
pub struct RetrievalOrchestrator {
    backend: Arc<dyn SearchBackend>,
    query_builder: QueryBuilder,
    formatter: SnippetFormatter,
}

impl RetrievalOrchestrator {
    /// Create orchestrator with default limits
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            query_builder: QueryBuilder::new(),
            formatter: SnippetFormatter::new(),
        }
    }

    /// Create with custom limits
    pub fn with_config(backend: Arc<dyn SearchBackend>, config: &RetrievalConfig) -> Self {
        Self {
            backend,
            query_builder: QueryBuilder::with_config(config),
            formatter: SnippetFormatter::with_config(config),
        }
    }

    /// Retrieve snippets for a request. Never fails.
    pub async fn retrieve(&self, request: &RetrievalRequest) -> RetrievalOutcome {
        let query = self.query_builder.build(request);

        match self.search_with_fallback(&query).await {
            Ok(attempts) => {
                let snippets = self.formatter.format_all(&attempts.hits);
                debug!(
                    hits = attempts.hits.len(),
                    snippets = snippets.len(),
                    "Retrieval complete"
                );
                RetrievalOutcome::from_snippets(snippets, attempts.fallback_used)
            }
            Err(err) => {
                warn!(error = %err, "Retrieval failed, continuing without context");
                RetrievalOutcome::degraded(err.to_string())
            }
        }
    }

    /// First attempt with the language hint; if that finds nothing, exactly
    /// one more attempt without it.
    async fn search_with_fallback(&self, query: &RetrievalQuery) -> Result<SearchAttempts> {
        let first = self
            .backend
            .search(
                &query.text,
                query.top_k,
                query.language.as_deref(),
                Some(&query.filter),
            )
            .await?;

        if query.language.is_some() && first.count == 0 {
            info!(
                language = query.language.as_deref().unwrap_or_default(),
                "No hits for language, retrying without it"
            );
            let second = self
                .backend
                .search(&query.text, query.top_k, None, Some(&query.filter))
                .await?;
            return Ok(SearchAttempts {
                hits: second.hits,
                fallback_used: true,
            });
        }

        Ok(SearchAttempts {
            hits: first.hits,
            fallback_used: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoachError;
    use crate::rag::query::MetadataFilter;
    use crate::rag::retrieval::RawSearchResult;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replies with canned hit counts (or a failure) in call order
    struct CannedSearch {
        replies: Mutex<Vec<Option<usize>>>,
        languages: Mutex<Vec<Option<String>>>,
    }

    impl CannedSearch {
        fn new(replies: Vec<Option<usize>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                languages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for CannedSearch {
        async fn search(
            &self,
            _query: &str,
            _top_k: usize,
            language: Option<&str>,
            _filter: Option<&MetadataFilter>,
        ) -> Result<RawSearchResult> {
            self.languages.lock().unwrap().push(language.map(str::to_string));
            match self.replies.lock().unwrap().remove(0) {
                Some(n) => Ok(RawSearchResult::from_hits(
                    (0..n)
                        .map(|i| SearchHit {
                            id: format!("card-{}", i),
                            score: Some(0.5),
                            fields: json!({"chunk_text": "tip"}).as_object().cloned().unwrap(),
                        })
                        .collect(),
                )),
                None => Err(CoachError::SearchBackend {
                    status: Some(500),
                    message: "boom".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_hits_become_snippets() {
        let backend = Arc::new(CannedSearch::new(vec![Some(2)]));
        let orchestrator = RetrievalOrchestrator::new(backend.clone());
        let outcome = orchestrator
            .retrieve(&RetrievalRequest::new("feedback", "t").with_lang("de"))
            .await;

        assert_eq!(outcome.count, 2);
        assert!(!outcome.fallback_used);
        assert_eq!(outcome.snippet_texts()[0], "[#card-0 score=0.500]\ntip");
        assert_eq!(backend.languages.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_drops_language() {
        let backend = Arc::new(CannedSearch::new(vec![Some(0), Some(1)]));
        let orchestrator = RetrievalOrchestrator::new(backend.clone());
        let outcome = orchestrator
            .retrieve(&RetrievalRequest::new("feedback", "t").with_lang("de"))
            .await;

        assert_eq!(outcome.count, 1);
        assert!(outcome.fallback_used);
        assert_eq!(
            *backend.languages.lock().unwrap(),
            vec![Some("de".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_failure_is_contained() {
        let backend = Arc::new(CannedSearch::new(vec![None]));
        let orchestrator = RetrievalOrchestrator::new(backend);
        let outcome = orchestrator.retrieve(&RetrievalRequest::new("feedback", "t")).await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.count, 0);
        assert!(outcome.error.unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_custom_top_k_caps_snippets() {
        let backend = Arc::new(CannedSearch::new(vec![Some(6)]));
        let config = RetrievalConfig {
            top_k: 2,
            ..Default::default()
        };
        let orchestrator = RetrievalOrchestrator::with_config(backend, &config);
        let outcome = orchestrator.retrieve(&RetrievalRequest::new("feedback", "t")).await;
        assert_eq!(outcome.count, 2);
    }
}
