//! Request and response shapes crossing the pipeline boundary.

use crate::intent::Intent;
use data_loader::{Movie, MovieId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single free-text query.
///
/// `text` is `None` when the inbound value was missing or not a string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: Option<String>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// A query whose text was absent
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Who said a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Prior context a caller may send along with a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    /// Movies shown to the user recently; used as recommendation seeds
    #[serde(default)]
    pub recent_movie_ids: Vec<MovieId>,
}

/// Inbound request: `{ "query_text": ..., "history": [...], "recent_movie_ids": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub query_text: Option<String>,
    #[serde(flatten)]
    pub context: QueryContext,
}

impl QueryRequest {
    pub fn into_parts(self) -> (Query, QueryContext) {
        (
            Query {
                text: self.query_text,
            },
            self.context,
        )
    }
}

/// Accept any JSON value; only strings are kept
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Outbound response.
///
/// Serializes as `{"intent": ..., "results": [...]}` or
/// `{"intent": "conversational", "response": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RetrievalResult {
    Movies { intent: Intent, results: Vec<Movie> },
    Reply { intent: Intent, response: String },
}

impl RetrievalResult {
    pub fn movies(intent: Intent, results: Vec<Movie>) -> Self {
        RetrievalResult::Movies { intent, results }
    }

    pub fn reply(response: impl Into<String>) -> Self {
        RetrievalResult::Reply {
            intent: Intent::Conversational,
            response: response.into(),
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            RetrievalResult::Movies { intent, .. } | RetrievalResult::Reply { intent, .. } => *intent,
        }
    }

    /// Movie results, empty for a conversational reply
    pub fn results(&self) -> &[Movie] {
        match self {
            RetrievalResult::Movies { results, .. } => results,
            RetrievalResult::Reply { .. } => &[],
        }
    }

    pub fn response(&self) -> Option<&str> {
        match self {
            RetrievalResult::Reply { response, .. } => Some(response),
            RetrievalResult::Movies { .. } => None,
        }
    }
}
