//! Collaborator traits.
//!
//! The pipeline talks to its backends only through these. All of them are
//! `Send + Sync` so a single instance can serve concurrent queries behind an
//! `Arc`.

use crate::criteria::MatchCriteria;
use crate::error::{CollaboratorError, StoreError};
use async_trait::async_trait;
use data_loader::{Movie, MovieId};

/// A document collection queryable by text fields.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Returns the name of this store (for logging/debugging)
    fn name(&self) -> &str;

    /// Movies matching `criteria`, in storage order, at most `criteria.limit`.
    async fn find(&self, criteria: &MatchCriteria) -> Result<Vec<Movie>, StoreError>;
}

/// Input to the recommendation backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    /// Movies the recommendation should be anchored on; may be empty
    pub seed_ids: Vec<MovieId>,
    pub query_text: String,
    pub limit: usize,
}

/// An external recommendation model
#[async_trait]
pub trait Recommender: Send + Sync {
    fn name(&self) -> &str;

    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Movie>, CollaboratorError>;
}

/// An external conversational engine
#[async_trait]
pub trait Conversationalist: Send + Sync {
    fn name(&self) -> &str;

    async fn reply(&self, text: &str) -> Result<String, CollaboratorError>;
}
