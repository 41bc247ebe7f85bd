// Snippet formatting for RAG-augmented prompts
use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::rag::query::DEFAULT_TOP_K;
use crate::rag::retrieval::{payload, SearchHit};

/// Character budget of one snippet before the ellipsis marker
pub const MAX_SNIPPET_CHARS: usize = 1800;

/// Appended to any text cut by a character budget
pub const ELLIPSIS: char = '…';

/// Bounded unit of retrieved text, ready for prompt inclusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    /// Backend score, `0.0` when the backend sent none or a non-finite one
    pub score: f64,
    /// Header line plus main text, already truncated
    pub content: String,
}

/// Turns search hits into snippets, in backend order
#[derive(Debug, Clone)]
pub struct SnippetFormatter {
    max_chars: usize,
    max_snippets: usize,
}

impl SnippetFormatter {
    pub fn new() -> Self {
        Self {
            max_chars: MAX_SNIPPET_CHARS,
            max_snippets: DEFAULT_TOP_K,
        }
    }

    pub fn with_config(config: &RetrievalConfig) -> Self {
        Self {
            max_chars: config.max_snippet_chars,
            max_snippets: config.top_k,
        }
    }

    /// Format at most `max_snippets` hits; no re-ranking
    pub fn format_all(&self, hits: &[SearchHit]) -> Vec<Snippet> {
        hits.iter()
            .take(self.max_snippets)
            .map(|hit| self.format(hit))
            .collect()
    }

    /// `[#<id> score=<score:.3>]` + newline + main text, cut to the budget
    pub fn format(&self, hit: &SearchHit) -> Snippet {
        let score = hit.finite_score();
        let header = format!("[#{} score={:.3}]", hit.id, score);
        let body = payload::main_text(&hit.fields);

        Snippet {
            id: hit.id.clone(),
            score,
            content: truncate_chars(&format!("{}\n{}", header, body), self.max_chars),
        }
    }
}

impl Default for SnippetFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut `text` to `max_chars` characters, appending [`ELLIPSIS`] when cut.
///
/// Pure character count; may split a word.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + ELLIPSIS.len_utf8());
            truncated.push_str(&text[..cut]);
            truncated.push(ELLIPSIS);
            truncated
        }
    }
}
