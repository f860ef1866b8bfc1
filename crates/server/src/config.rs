//! Dispatcher and service configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ml_client::DEFAULT_TIMEOUT;
use retrieval::DEFAULT_LIMIT;
use serde::Deserialize;

/// Reply used when the conversational engine is missing or failing
pub const DEFAULT_FALLBACK_REPLY: &str =
    "I'm not able to chat right now, but I can still search for movies or suggest something to watch.";

/// How the dispatcher shapes results
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Result cap for keyword search
    pub default_limit: usize,
    /// Result cap for recommendations
    pub recommendation_limit: usize,
    pub fallback_reply: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            recommendation_limit: DEFAULT_LIMIT,
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}

/// Where the collaborators live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Movie catalog export (JSON or JSON-lines)
    pub catalog_path: PathBuf,
    /// Recommendation service; `None` disables the branch
    pub recommender_addr: Option<String>,
    /// Conversational service; `None` disables the branch
    pub conversation_addr: Option<String>,
    /// Per-call timeout for the model services
    pub timeout_ms: u64,
    pub dispatch: DispatchConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/movies.jsonl"),
            recommender_addr: Some("http://localhost:50051".to_string()),
            conversation_addr: Some("http://localhost:50052".to_string()),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
