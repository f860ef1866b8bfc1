//! Core domain types for the movie catalog.
//!
//! The catalog is read-only once loaded: retrieval code filters and selects
//! from it but never mutates a `Movie`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (document id from the movie store)
pub type MovieId = String;

// =============================================================================
// Movie
// =============================================================================

/// A movie document as exposed to the retrieval pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub plot: String,
    /// Release year, when the source document carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// IMDb rating on the 0-10 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f32>,
}

impl Movie {
    /// Create a movie with only an id and a title set.
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            genres: Vec::new(),
            cast: Vec::new(),
            plot: String::new(),
            year: None,
            imdb_rating: None,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cast<I, S>(mut self, cast: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cast = cast.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }
}

// =============================================================================
// MovieCatalog - The In-Memory Movie Store
// =============================================================================

/// Holds all movies in insertion ("storage-native") order plus indices.
///
/// Movies live in a `Vec` so that iteration order is stable and matches the
/// order of the source export. Lookups by id, genre and year go through
/// position indices into that `Vec`.
#[derive(Debug, Default)]
pub struct MovieCatalog {
    pub(crate) movies: Vec<Movie>,
    pub(crate) positions: HashMap<MovieId, usize>,

    // Secondary indices
    /// Lowercased genre name -> positions of movies in that genre
    pub(crate) genre_index: HashMap<String, Vec<usize>>,
    /// Release year -> positions of movies from that year
    pub(crate) year_index: BTreeMap<u16, Vec<usize>>,
}

impl MovieCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from movies in the given order.
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut catalog = Self::new();
        for movie in movies {
            catalog.insert_movie(movie);
        }
        catalog.build_secondary_indices();
        catalog
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: &str) -> Option<&Movie> {
        self.positions.get(id).map(|&pos| &self.movies[pos])
    }

    /// All movies in storage-native order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Get all movies tagged with a genre (case-insensitive)
    pub fn get_movies_by_genre(&self, genre: &str) -> Vec<&Movie> {
        self.genre_index
            .get(&genre.to_lowercase())
            .map(|positions| positions.iter().map(|&pos| &self.movies[pos]).collect())
            .unwrap_or_default()
    }

    /// Get all movies released in a specific year
    pub fn get_movies_by_year(&self, year: u16) -> Vec<&Movie> {
        self.year_index
            .get(&year)
            .map(|positions| positions.iter().map(|&pos| &self.movies[pos]).collect())
            .unwrap_or_default()
    }

    /// Movies in a genre and/or year, in storage order.
    ///
    /// With neither filter every movie is returned. With both, the year
    /// index drives the scan and the genre is checked per movie.
    pub fn browse(&self, genre: Option<&str>, year: Option<u16>) -> Vec<&Movie> {
        match (genre, year) {
            (None, None) => self.movies.iter().collect(),
            (Some(genre), None) => self.get_movies_by_genre(genre),
            (None, Some(year)) => self.get_movies_by_year(year),
            (Some(genre), Some(year)) => {
                let genre = genre.to_lowercase();
                self.get_movies_by_year(year)
                    .into_iter()
                    .filter(|movie| movie.genres.iter().any(|g| g.to_lowercase() == genre))
                    .collect()
            }
        }
    }

    /// Insert a movie. Re-inserting an existing id replaces the record in
    /// place so storage order is kept.
    ///
    /// Secondary indices are stale until `build_secondary_indices` runs.
    pub fn insert_movie(&mut self, movie: Movie) {
        match self.positions.get(&movie.id) {
            Some(&pos) => self.movies[pos] = movie,
            None => {
                self.positions.insert(movie.id.clone(), self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    /// Rebuild the genre and year indices from the primary store
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        self.year_index.clear();

        for (pos, movie) in self.movies.iter().enumerate() {
            for genre in &movie.genres {
                let positions = self.genre_index.entry(genre.to_lowercase()).or_default();
                // a document may list the same genre twice
                if positions.last() != Some(&pos) {
                    positions.push(pos);
                }
            }

            if let Some(year) = movie.year {
                self.year_index.entry(year).or_default().push(pos);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
