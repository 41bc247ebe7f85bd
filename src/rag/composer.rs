// Feedback composition: retrieval outcome + generation -> caller-facing result
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::Result;
use crate::generation::{FeedbackGenerator, PromptInput};
use crate::rag::context::Snippet;
use crate::rag::pipeline::RetrievalOrchestrator;
use crate::types::{FeedbackOutput, RetrievalRequest};

/// Generation output with retrieval diagnostics attached.
///
/// `rag_context_cards` is for operators and debugging; it is not meant to be
/// shown to end users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedResult {
    #[serde(flatten)]
    pub feedback: FeedbackOutput,
    pub rag_context_cards: Vec<Snippet>,
    pub rag_context_count: usize,
    pub rag_error: Option<String>,
}

/// Merges retrieved snippets into the generation prompt
pub struct FeedbackComposer {
    orchestrator: RetrievalOrchestrator,
    generator: Arc<dyn FeedbackGenerator>,
}

impl FeedbackComposer {
    pub fn new(orchestrator: RetrievalOrchestrator, generator: Arc<dyn FeedbackGenerator>) -> Self {
        Self {
            orchestrator,
            generator,
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// Validation and generation errors propagate; retrieval errors only
    /// show up in `rag_error`.
    pub async fn compose_feedback(&self, request: &RetrievalRequest) -> Result<ComposedResult> {
        request.validate()?;

        let span = info_span!(
            "compose_feedback",
            request_id = %Uuid::new_v4(),
            conversation_type = %request.conversation_type,
        );

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &RetrievalRequest) -> Result<ComposedResult> {
        let outcome = self.orchestrator.retrieve(request).await;
        info!(
            rag_count = outcome.count,
            rag_failed = outcome.error.is_some(),
            fallback = outcome.fallback_used,
            "Retrieval finished"
        );

        let input = PromptInput::from_request(request, outcome.snippet_texts());
        let feedback = self.generator.generate(&input).await?;
        debug!(summary_chars = feedback.summary.len(), "Generation finished");

        Ok(ComposedResult {
            feedback,
            rag_context_count: outcome.count,
            rag_context_cards: outcome.snippets,
            rag_error: outcome.error,
        })
    }
}
