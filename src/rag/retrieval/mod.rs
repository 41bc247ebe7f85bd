// Retrieval: vector search client and payload adapter
pub mod client;
pub mod payload;

pub use client::{
    merge_language, PineconeSearchClient, RawSearchResult, SearchBackend, SearchHit,
};
