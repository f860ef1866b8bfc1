//! Keyword retrieval strategy.
//!
//! Splits the query into whitespace tokens and asks the store for movies
//! whose title, cast or genres contain any token. Results come back in
//! storage order; no scoring is computed.

use crate::criteria::MatchCriteria;
use crate::error::{Collaborator, RetrievalError};
use crate::traits::MovieStore;
use data_loader::Movie;
use tracing::{debug, instrument, warn};

/// Typed keyword search.
///
/// A blank query is not a fault and yields `Ok(vec![])`. A missing store
/// is `RetrievalError::NotConfigured`.
#[instrument(skip(store), fields(store = store.map(|s| s.name()).unwrap_or("none")))]
pub async fn try_keyword_search(
    store: Option<&dyn MovieStore>,
    query: &str,
    limit: usize,
) -> Result<Vec<Movie>, RetrievalError> {
    let store = store.ok_or(RetrievalError::NotConfigured(Collaborator::Store))?;

    let Some(criteria) = MatchCriteria::from_query(query, limit) else {
        debug!("Blank query, skipping store lookup");
        return Ok(Vec::new());
    };

    let mut movies = store.find(&criteria).await?;

    // the store is external; enforce the cap here too
    movies.truncate(criteria.limit);

    debug!(
        "Keyword search matched {} movies for {} tokens",
        movies.len(),
        criteria.tokens.len()
    );
    Ok(movies)
}

/// Fail-soft keyword search: every fault becomes an empty result.
pub async fn keyword_search(
    store: Option<&dyn MovieStore>,
    query: &str,
    limit: usize,
) -> Vec<Movie> {
    match try_keyword_search(store, query, limit).await {
        Ok(movies) => movies,
        Err(e) => {
            warn!("Keyword search degraded to no results: {}", e);
            Vec::new()
        }
    }
}
