//! Ollama generation client
//!
//! Renders the coaching prompt and asks an Ollama-compatible endpoint for a
//! JSON answer:
//! - Endpoint: POST /api/generate (`stream: false`, `format: "json"`)
//! - The model's `response` string must parse as [`FeedbackOutput`]

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::errors::{error_excerpt, CoachError, Result};
use crate::generation::prompt::PromptInput;
use crate::generation::FeedbackGenerator;
use crate::types::FeedbackOutput;

/// Ollama generation client
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OllamaGenerator {
    /// Create generator from configuration
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(CoachError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: self
                .temperature
                .map(|temperature| GenerateOptions { temperature }),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CoachError::Generation(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CoachError::Generation(format!(
                "HTTP {}: {}",
                status,
                error_excerpt(&error_text)
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CoachError::Generation(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }
}

#[async_trait]
impl FeedbackGenerator for OllamaGenerator {
    async fn generate(&self, input: &PromptInput) -> Result<FeedbackOutput> {
        let prompt = input.render();
        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            snippets = input.relevant_snippets.as_ref().map_or(0, Vec::len),
            "Requesting coaching feedback"
        );

        let raw = self.complete(prompt).await?;
        parse_feedback(&raw)
    }
}

/// Parse the model's JSON answer against the output schema
pub fn parse_feedback(raw: &str) -> Result<FeedbackOutput> {
    let output: FeedbackOutput = serde_json::from_str(raw.trim())
        .map_err(|e| CoachError::Generation(format!("Model output does not match schema: {}", e)))?;
    output.scores.check_overall().map_err(CoachError::Generation)?;
    Ok(output)
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Ollama generate response (non-streaming)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
