//! Text-generation capability
//!
//! Provides the coaching prompt and an Ollama-backed generator.

pub mod client;
pub mod prompt;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::FeedbackOutput;

// Re-export commonly used types
pub use client::{parse_feedback, OllamaGenerator};
pub use prompt::{PromptInput, DEFAULT_GOAL};

/// Produces structured feedback from a prompt input.
///
/// Errors are hard failures of the coaching request.
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn generate(&self, input: &PromptInput) -> Result<FeedbackOutput>;
}
