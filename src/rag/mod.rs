// RAG (Retrieval-Augmented Generation) pipeline
//
// Turns a coaching request into a vector search, normalizes the hits into
// bounded snippets and merges them into the generation prompt.
//
// Components:
// - Query: query text and metadata filter from the request
// - Retrieval: vector search client and payload adapter
// - Context: snippet formatting and truncation
// - Pipeline: search with language fallback, failure containment
// - Composer: prompt merge, generation, diagnostics

pub mod composer;
pub mod context;
pub mod pipeline;
pub mod query;
pub mod retrieval;

// Re-export key types
pub use composer::{ComposedResult, FeedbackComposer};
pub use context::{truncate_chars, Snippet, SnippetFormatter};
pub use pipeline::{RetrievalOrchestrator, RetrievalOutcome};
pub use query::{MetadataFilter, QueryBuilder, RetrievalQuery};
pub use retrieval::{PineconeSearchClient, RawSearchResult, SearchBackend, SearchHit};
