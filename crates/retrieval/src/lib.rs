//! # Retrieval Crate
//!
//! Intent classification and retrieval strategies for the movie assistant.
//!
//! ## Components
//!
//! ### Intent Classifier
//! Maps raw query text to `qa`, `recommend` or `conversational` using an
//! ordered keyword table. Pure and total.
//!
//! ### Keyword Strategy
//! OR-across-tokens, OR-across-fields literal matching against a
//! `MovieStore`, capped at a limit, fail-soft on store faults.
//!
//! ### Collaborators
//! `MovieStore`, `Recommender` and `Conversationalist` are the narrow
//! interfaces to external backends. `CatalogStore` implements `MovieStore`
//! over the in-memory `MovieCatalog`.
//!
//! ### Memory
//! Rewrites short follow-up queries with the last user turn.
//!
//! ## Example Usage
//!
//! ```ignore
//! use retrieval::{classify, keyword_search, CatalogStore, Intent};
//! use std::sync::Arc;
//!
//! let store = CatalogStore::new(Arc::new(catalog));
//! if classify("matrix reloaded") == Intent::Qa {
//!     let movies = keyword_search(Some(&store), "matrix reloaded", 10).await;
//! }
//! ```

// Public modules
pub mod criteria;
pub mod error;
pub mod intent;
pub mod keyword;
pub mod memory;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use criteria::{DEFAULT_LIMIT, MatchCriteria, SearchField};
pub use error::{Collaborator, CollaboratorError, RetrievalError, StoreError};
pub use intent::{Intent, classify};
pub use keyword::{keyword_search, try_keyword_search};
pub use memory::rewrite_query;
pub use store::CatalogStore;
pub use traits::{Conversationalist, MovieStore, RecommendationRequest, Recommender};
pub use types::{ChatTurn, Query, QueryContext, QueryRequest, RetrievalResult, Role};
