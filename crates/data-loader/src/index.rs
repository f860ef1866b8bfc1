//! MovieCatalog loading and validation.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

impl MovieCatalog {
    /// Load a catalog from a JSON or JSON-lines export
    ///
    /// Steps:
    /// 1. Read the file
    /// 2. Parse every document (in parallel for JSON-lines)
    /// 3. Reject duplicate ids within the file
    /// 4. Insert in file order and build secondary indices
    /// 5. Validate
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        if !path.exists() {
            return Err(DataLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let parsed = parser::parse_movies(&content, &file)?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(parsed.len());
        for (line, movie) in &parsed {
            if !seen.insert(movie.id.as_str()) {
                return Err(DataLoadError::DuplicateId {
                    id: movie.id.clone(),
                    line: *line,
                });
            }
        }

        let catalog = MovieCatalog::from_movies(parsed.into_iter().map(|(_, movie)| movie));
        catalog.validate()?;

        info!(
            "Loaded {} movies ({} genres indexed)",
            catalog.len(),
            catalog.genre_index.len()
        );
        Ok(catalog)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Every movie has an id and a title
    /// - The id index points at the right records
    /// - IMDb ratings are on the 0-10 scale
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() != self.movies.len() {
            return Err(DataLoadError::ValidationError(format!(
                "id index has {} entries for {} movies",
                self.positions.len(),
                self.movies.len()
            )));
        }

        for (pos, movie) in self.movies.iter().enumerate() {
            if movie.id.is_empty() || movie.title.trim().is_empty() {
                return Err(DataLoadError::ValidationError(format!(
                    "movie at position {} is missing an id or title",
                    pos
                )));
            }
            if self.positions.get(&movie.id) != Some(&pos) {
                return Err(DataLoadError::ValidationError(format!(
                    "id index out of sync for movie {}",
                    movie.id
                )));
            }
            if let Some(rating) = movie.imdb_rating {
                if !(0.0..=10.0).contains(&rating) {
                    return Err(DataLoadError::InvalidValue {
                        field: "imdb.rating".to_string(),
                        value: rating.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog(content: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file_keeps_file_order() {
        let file = write_catalog(
            concat!(
                "{\"_id\": \"m3\", \"title\": \"Heat\", \"year\": 1995, \"genres\": [\"Crime\"]}\n",
                "{\"_id\": \"m1\", \"title\": \"Alien\", \"year\": 1979, \"genres\": [\"Horror\", \"Sci-Fi\"]}\n",
                "{\"_id\": \"m2\", \"title\": \"Se7en\", \"year\": 1995, \"genres\": [\"Crime\", \"Mystery\"]}\n",
            ),
            ".jsonl",
        );

        let catalog = MovieCatalog::load_from_file(file.path()).unwrap();
        let ids: Vec<_> = catalog.movies().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m1", "m2"]);
        assert_eq!(catalog.get_movies_by_genre("crime").len(), 2);
        assert_eq!(catalog.get_movies_by_year(1995).len(), 2);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let file = write_catalog(
            r#"[{"_id": "a", "title": "One"}, {"_id": "a", "title": "Two"}]"#,
            ".json",
        );

        let err = MovieCatalog::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateId { ref id, line: 2 } if id == "a"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = MovieCatalog::load_from_file(Path::new("does/not/exist.jsonl")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let mut movie = Movie::new("x", "Broken");
        movie.imdb_rating = Some(42.0);
        let catalog = MovieCatalog::from_movies(vec![movie]);

        assert!(matches!(
            catalog.validate(),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }
}
