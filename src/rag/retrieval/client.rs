//! Vector search client
//!
//! Text-based nearest-neighbour search against a Pinecone index with
//! integrated embedding:
//! - Endpoint: POST https://{host}/records/namespaces/{namespace}/search
//! - One request per call, no retries
//! - Every failure is returned as an error; containment happens upstream

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::{clean_host, SearchConfig};
use crate::errors::{error_excerpt, CoachError, Result};
use crate::rag::query::MetadataFilter;

/// Top-K used when a caller passes zero
pub const FALLBACK_TOP_K: usize = 5;

/// Filter key the language hint is merged under
pub const LANGUAGE_FILTER_KEY: &str = "lang";

/// One raw hit as returned by the backend.
///
/// Null or missing members decode to their empty value so one malformed hit
/// does not invalidate the rest of the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id", default, deserialize_with = "id_as_string")]
    pub id: String,
    /// Backend-defined similarity scale; not normalized
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl SearchHit {
    /// Score, or `0.0` when missing or not a finite number
    pub fn finite_score(&self) -> f64 {
        self.score.filter(|s| s.is_finite()).unwrap_or(0.0)
    }
}

/// Hits in backend order plus their count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSearchResult {
    pub hits: Vec<SearchHit>,
    pub count: usize,
}

impl RawSearchResult {
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        let count = hits.len();
        Self { hits, count }
    }
}

/// Search capability consumed by the retrieval orchestrator
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Single search call. `language`, when non-blank, joins the filter.
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        language: Option<&str>,
        filter: Option<&MetadataFilter>,
    ) -> Result<RawSearchResult>;
}

/// HTTP client for the Pinecone records search API
#[derive(Debug, Clone)]
pub struct PineconeSearchClient {
    client: Client,
    base_url: Option<String>,
    index_host: Option<String>,
    namespace: String,
    api_key: Option<String>,
    api_version: String,
    fields: Vec<String>,
}

impl PineconeSearchClient {
    /// Build from configuration.
    ///
    /// Host and API key are checked when a search is issued, not here, so a
    /// deployment without a configured index still serves coaching requests.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(CoachError::Http)?;

        Ok(Self {
            client,
            base_url: None,
            index_host: config.index_host.clone(),
            namespace: config.namespace.clone(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            fields: config.fields.clone(),
        })
    }

    /// Send requests to `base_url` instead of `https://{index_host}`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Full search URL; the namespace is percent-encoded as one path segment
    pub fn endpoint(&self) -> Result<Url> {
        let base = match (&self.base_url, &self.index_host) {
            (Some(base), _) => base.clone(),
            (None, Some(host)) if !host.trim().is_empty() => {
                format!("https://{}", clean_host(host))
            }
            _ => {
                return Err(CoachError::Config(
                    "Missing search index host (PINECONE_INDEX_HOST)".to_string(),
                ))
            }
        };

        let mut url = Url::parse(&base)
            .map_err(|e| CoachError::Config(format!("Invalid search host '{}': {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| CoachError::Config(format!("Invalid search host '{}'", base)))?
            .pop_if_empty()
            .extend(["records", "namespaces", self.namespace.as_str(), "search"]);
        Ok(url)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CoachError::Config("Missing search API key (PINECONE_API_KEY)".to_string()))
    }

    fn build_body<'a>(
        &'a self,
        query: &'a str,
        top_k: usize,
        language: Option<&str>,
        filter: Option<&MetadataFilter>,
    ) -> SearchRequestBody<'a> {
        SearchRequestBody {
            query: SearchQueryBody {
                inputs: QueryInputs { text: query },
                top_k: if top_k == 0 { FALLBACK_TOP_K } else { top_k },
                filter: merge_language(filter, language),
            },
            fields: &self.fields,
        }
    }
}

#[async_trait]
impl SearchBackend for PineconeSearchClient {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        language: Option<&str>,
        filter: Option<&MetadataFilter>,
    ) -> Result<RawSearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoachError::Validation("Missing search text".to_string()));
        }

        let url = self.endpoint()?;
        let api_key = self.api_key()?;
        let body = self.build_body(query, top_k, language, filter);

        debug!(
            url = %url,
            top_k = body.query.top_k,
            filter = ?body.query.filter,
            "Sending vector search request"
        );

        let response = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .header("Api-Key", api_key)
            .header("X-Pinecone-Api-Version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(CoachError::search_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CoachError::SearchBackend {
                status: Some(status.as_u16()),
                message: format!("{}: {}", status, error_excerpt(&error_text)),
            });
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| CoachError::SearchBackend {
            status: Some(status.as_u16()),
            message: format!("Invalid search response: {}", e),
        })?;

        let hits = parsed.result.map(|r| r.hits).unwrap_or_default();
        debug!(count = hits.len(), "Vector search returned");
        Ok(RawSearchResult::from_hits(hits))
    }
}

/// Copy of `filter` with a non-blank language added under `lang`.
///
/// A `lang` already present in the filter is kept. `None` when the result
/// would be empty, so no filter is sent at all.
pub fn merge_language(
    filter: Option<&MetadataFilter>,
    language: Option<&str>,
) -> Option<MetadataFilter> {
    let mut merged = filter.cloned().unwrap_or_default();
    if let Some(lang) = language.map(str::trim).filter(|l| !l.is_empty()) {
        merged
            .entry(LANGUAGE_FILTER_KEY.to_string())
            .or_insert_with(|| lang.to_string());
    }
    if merged.is_empty() {
        None
    } else {
        Some(merged)
    }
}

/// Search request body
#[derive(Debug, Serialize)]
struct SearchRequestBody<'a> {
    query: SearchQueryBody<'a>,
    fields: &'a [String],
}

#[derive(Debug, Serialize)]
struct SearchQueryBody<'a> {
    inputs: QueryInputs<'a>,
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<MetadataFilter>,
}

#[derive(Debug, Serialize)]
struct QueryInputs<'a> {
    text: &'a str,
}

/// Search response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Option<SearchResultBody>,
}

#[derive(Debug, Deserialize)]
struct SearchResultBody {
    #[serde(default, deserialize_with = "null_as_default")]
    hits: Vec<SearchHit>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ids are strings on the wire, but numbers and null are tolerated
fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(id)) => id,
        Some(other) => other.to_string(),
    })
}
