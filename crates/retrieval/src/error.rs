//! Fault types crossing the collaborator boundary.
//!
//! None of these reach the caller of the dispatcher: each branch maps its
//! fault to a known default (empty results or a fallback reply).

use thiserror::Error;

/// A movie store lookup failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("movie store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid lookup criteria: {0}")]
    InvalidCriteria(String),

    #[error("movie store lookup failed: {0}")]
    Lookup(String),
}

/// The recommendation or conversational backend failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("collaborator timed out: {0}")]
    TimedOut(String),

    #[error("collaborator call failed: {0}")]
    Failed(String),

    #[error("invalid response from collaborator: {0}")]
    InvalidResponse(String),
}

/// Which collaborator a configuration fault refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Store,
    Recommender,
    Conversation,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Collaborator::Store => "movie store",
            Collaborator::Recommender => "recommender",
            Collaborator::Conversation => "conversational engine",
        };
        f.write_str(name)
    }
}

/// Every fault a retrieval strategy can hit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("no {0} configured")]
    NotConfigured(Collaborator),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("recommendation failed: {0}")]
    Recommender(CollaboratorError),

    #[error("conversational reply failed: {0}")]
    Conversation(CollaboratorError),
}
