//! # Data Loader Crate
//!
//! This crate loads and indexes the movie catalog that backs keyword search.
//!
//! ## Main Components
//!
//! - **types**: `Movie` and the in-memory `MovieCatalog`
//! - **parser**: Parse JSON / JSON-lines document exports into `Movie`s
//! - **index**: Load a catalog from disk and validate it
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::MovieCatalog;
//! use std::path::Path;
//!
//! let catalog = MovieCatalog::load_from_file(Path::new("data/movies.jsonl"))?;
//! let matrix = catalog.get_movie("tt0133093");
//! let thrillers = catalog.get_movies_by_genre("Thriller");
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{Movie, MovieCatalog, MovieId};
