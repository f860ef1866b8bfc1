//! `MovieStore` over the in-memory catalog.

use crate::criteria::MatchCriteria;
use crate::error::StoreError;
use crate::traits::MovieStore;
use async_trait::async_trait;
use data_loader::{Movie, MovieCatalog};
use std::sync::Arc;

/// Scans a shared `MovieCatalog` in storage order.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<MovieCatalog>,
}

impl CatalogStore {
    pub fn new(catalog: Arc<MovieCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl MovieStore for CatalogStore {
    fn name(&self) -> &str {
        "CatalogStore"
    }

    async fn find(&self, criteria: &MatchCriteria) -> Result<Vec<Movie>, StoreError> {
        if criteria.tokens.is_empty() || criteria.fields.is_empty() {
            return Err(StoreError::InvalidCriteria(
                "criteria need at least one token and one field".to_string(),
            ));
        }

        Ok(self
            .catalog
            .movies()
            .iter()
            .filter(|movie| criteria.matches(movie))
            .take(criteria.limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::SearchField;

    fn store() -> CatalogStore {
        let catalog = MovieCatalog::from_movies(vec![
            Movie::new("1", "Heat").with_genres(["Crime"]),
            Movie::new("2", "Alien").with_genres(["Horror"]),
            Movie::new("3", "Se7en").with_genres(["Crime", "Mystery"]),
            Movie::new("4", "Zodiac").with_genres(["Crime"]),
        ]);
        CatalogStore::new(Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_find_keeps_storage_order_and_limit() {
        let criteria = MatchCriteria::from_query("crime", 2).unwrap();
        let found = store().find(&criteria).await.unwrap();

        let ids: Vec<_> = found.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_find_rejects_fieldless_criteria() {
        let criteria = MatchCriteria::from_query("crime", 2).unwrap().with_fields(&[]);
        let err = store().find(&criteria).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCriteria(_)));
    }

    #[tokio::test]
    async fn test_find_single_field() {
        let criteria = MatchCriteria::from_query("alien", 10)
            .unwrap()
            .with_fields(&[SearchField::Genres]);
        assert!(store().find(&criteria).await.unwrap().is_empty());
    }
}
