//! coach-rag - Retrieval-augmented coaching feedback
//!
//! Sends conversation transcripts to a text-generation backend for coaching
//! feedback, enriched with snippets retrieved from a vector index.
//!
//! # Architecture
//!
//! - **Query**: bounded query text + metadata filter from the request
//! - **Retrieval**: vector search with a one-shot language fallback; failures
//!   degrade to an empty outcome
//! - **Composer**: snippets merged into the prompt, generation failures
//!   propagate

pub mod errors;
pub mod types;

// Re-export commonly used types
pub use errors::{CoachError, Result};

pub mod cli;
pub mod config;
pub mod generation;
pub mod rag;
