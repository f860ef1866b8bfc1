//! Field-filtered lookup criteria for the movie store.
//!
//! A movie matches when any token is a case-insensitive literal substring
//! of the title, of any cast member, or of any genre. Tokens are compared
//! as plain text, so characters like `.`, `*` or `(` match themselves.

use data_loader::Movie;
use serde::{Deserialize, Serialize};

/// Default number of results for a lookup
pub const DEFAULT_LIMIT: usize = 10;

/// A searchable movie field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Cast,
    Genres,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [SearchField::Title, SearchField::Cast, SearchField::Genres];
}

/// What the keyword strategy asks the store for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    /// Lowercased query tokens, OR-ed together
    pub tokens: Vec<String>,
    /// Fields to test, OR-ed together
    pub fields: Vec<SearchField>,
    pub limit: usize,
}

impl MatchCriteria {
    /// Build criteria from free text.
    ///
    /// Returns `None` when the text has no tokens. A `limit` of 0 is
    /// raised to 1.
    pub fn from_query(query: &str, limit: usize) -> Option<Self> {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return None;
        }

        Some(Self {
            tokens,
            fields: SearchField::ALL.to_vec(),
            limit: limit.max(1),
        })
    }

    /// Restrict the fields tested (builder pattern)
    pub fn with_fields(mut self, fields: &[SearchField]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    /// Whether `movie` satisfies these criteria
    pub fn matches(&self, movie: &Movie) -> bool {
        self.fields.iter().any(|field| match field {
            SearchField::Title => self.matches_text(&movie.title),
            SearchField::Cast => movie.cast.iter().any(|name| self.matches_text(name)),
            SearchField::Genres => movie.genres.iter().any(|genre| self.matches_text(genre)),
        })
    }

    fn matches_text(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.tokens.iter().any(|token| lowered.contains(token.as_str()))
    }
}
