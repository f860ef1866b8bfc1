//! Rule-based intent classification.
//!
//! A query is routed by case-insensitive substring matching against an
//! ordered table of keyword sets. The first set with a hit wins, so
//! recommendation keywords dominate conversational ones.
//!
//! Matching is plain containment with no tokenization or stemming: "dislike"
//! contains "like" and routes to `Recommend`, "this" contains "hi" and
//! routes to `Conversational`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The classified purpose of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Question answering, served by keyword search
    #[default]
    Qa,
    Recommend,
    Conversational,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Qa => "qa",
            Intent::Recommend => "recommend",
            Intent::Conversational => "conversational",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword sets in priority order. Anything unmatched is `Intent::Qa`.
pub const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Recommend,
        &["recommend", "suggest", "similar", "like", "more like"],
    ),
    (
        Intent::Conversational,
        &["hello", "hi", "how are you", "tell me a story", "chat"],
    ),
];

/// Classify raw query text.
///
/// Total over its input: `None` and empty text are `Intent::Qa`.
pub fn classify<'a>(text: impl Into<Option<&'a str>>) -> Intent {
    let Some(text) = text.into() else {
        return Intent::Qa;
    };
    if text.is_empty() {
        return Intent::Qa;
    }

    let lowered = text.to_lowercase();
    INTENT_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(intent, _)| *intent)
        .unwrap_or_default()
}
