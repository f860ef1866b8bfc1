//! Query rewriting from chat history.
//!
//! Short follow-up queries ("and the sequel?") are ambiguous on their own.
//! When the query is short, the most recent user turn is prepended so the
//! recommendation and conversational backends see what it refers to.

use crate::types::{ChatTurn, Role};

/// Queries with more words than this are treated as self-contained
pub const SELF_CONTAINED_WORDS: usize = 6;

/// Rewrite `query` using the most recent user turn in `history`.
pub fn rewrite_query(history: &[ChatTurn], query: &str) -> String {
    if history.is_empty() {
        return query.to_string();
    }

    let trimmed = query.trim();
    if trimmed.split_whitespace().count() > SELF_CONTAINED_WORDS {
        return trimmed.to_string();
    }

    let last_user = history
        .iter()
        .rev()
        .find(|turn| turn.role == Role::User && !turn.text.is_empty());

    match last_user {
        Some(turn) => format!("In context of: \"{}\". Question: {}", turn.text, trimmed),
        None => trimmed.to_string(),
    }
}
