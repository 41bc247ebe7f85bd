//! Configuration management for coach-rag
//!
//! TOML-based configuration with defaults, environment overrides and
//! validation. Location: ~/.coach-rag/config.toml
//!
//! The configuration is loaded once at startup and handed to the search
//! client, the generator and the composer through their constructors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{CoachError, Result};
use crate::rag::context::MAX_SNIPPET_CHARS;
use crate::rag::query::{DEFAULT_TOP_K, MAX_QUERY_CHARS};

/// Namespace used when none (or a blank one) is configured
pub const DEFAULT_NAMESPACE: &str = "__default__";

/// Records API version sent with every search request
pub const DEFAULT_API_VERSION: &str = "2025-10";

/// Payload fields requested from the knowledge base
pub const DEFAULT_FIELDS: &[&str] = &[
    "chunk_text",
    "title",
    "card_group_id",
    "card_type",
    "card_version",
    "version",
    "dataset_version",
    "status",
    "lang",
    "conversation_type",
    "conversation_types",
    "skill",
    "skills",
    "competency_ids",
    "competency_primary",
    "competency_secondary",
    "seniority",
    "jurisdiction",
    "workplace_context",
    "level_min",
    "level_max",
    "source_id",
    "source_ref",
    "created_at",
    "updated_at",
];

const ENV_API_KEY: &str = "PINECONE_API_KEY";
const ENV_INDEX_HOST: &str = "PINECONE_INDEX_HOST";
const ENV_NAMESPACE: &str = "PINECONE_NAMESPACE";

/// Complete configuration for coach-rag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// Vector search backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Index host, with or without scheme
    pub index_host: Option<String>,
    pub namespace: String,
    pub api_key: Option<String>,
    pub api_version: String,
    pub timeout_secs: u64,
    pub fields: Vec<String>,
}

/// Limits applied while building queries and snippets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub max_query_chars: usize,
    pub max_snippet_chars: usize,
}

/// Ollama-compatible generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_host: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            api_key: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 20,
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_query_chars: MAX_QUERY_CHARS,
            max_snippet_chars: MAX_SNIPPET_CHARS,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            model: "qwen2.5:7b-instruct".to_string(),
            timeout_secs: 120,
            temperature: Some(0.2),
        }
    }
}

impl GenerationConfig {
    /// Base URL of the generation endpoint
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or defaults, then apply environment overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else {
            Self::load_default()?
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoachError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| CoachError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// `~/.coach-rag/config.toml`, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".coach-rag").join("config.toml"))
    }

    /// Overlay `PINECONE_*` variables from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup (environment in production)
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = value(ENV_API_KEY) {
            self.search.api_key = Some(key);
        }
        if let Some(host) = value(ENV_INDEX_HOST) {
            self.search.index_host = Some(host);
        }
        if let Some(namespace) = value(ENV_NAMESPACE) {
            self.search.namespace = namespace.trim().to_string();
        }
        if self.search.namespace.trim().is_empty() {
            self.search.namespace = DEFAULT_NAMESPACE.to_string();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(CoachError::Config(
                "retrieval.top_k must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.max_query_chars == 0 || self.retrieval.max_snippet_chars == 0 {
            return Err(CoachError::Config(
                "retrieval character limits must be greater than 0".to_string(),
            ));
        }

        if self.search.timeout_secs == 0 || self.generation.timeout_secs == 0 {
            return Err(CoachError::Config(
                "timeouts must be greater than 0 seconds".to_string(),
            ));
        }

        if self.search.api_version.trim().is_empty() {
            return Err(CoachError::Config(
                "search.api_version must not be empty".to_string(),
            ));
        }

        if let Some(t) = self.generation.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(CoachError::Config(format!(
                    "generation.temperature must be between 0.0 and 2.0, got {}",
                    t
                )));
            }
        }

        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(CoachError::Config(format!("Invalid log level: {}", other)))
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CoachError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoachError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CoachError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

/// Strip scheme and trailing slashes from an index host
pub fn clean_host(host: &str) -> String {
    let trimmed = host.trim();
    let lower = trimmed.to_ascii_lowercase();
    let without_scheme = if lower.starts_with("https://") {
        &trimmed[8..]
    } else if lower.starts_with("http://") {
        &trimmed[7..]
    } else {
        trimmed
    };
    without_scheme.trim_end_matches('/').to_string()
}
