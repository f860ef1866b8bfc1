//! Parser for movie catalog exports.
//!
//! Two layouts are accepted:
//! - a JSON array of movie documents
//! - JSON-lines: one document per line, blank lines skipped
//!
//! Documents follow the shape of a document-store export (`_id`, `title`,
//! `year`, `genres`, `cast`, `plot`, `imdb.rating`). Field types in such
//! exports are loose, so ids and years are normalized here.

use crate::error::{DataLoadError, Result};
use crate::types::Movie;
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;

/// A movie document exactly as it appears in the export
#[derive(Debug, Deserialize)]
struct RawMovie {
    /// Document-store key; preferred when both keys are present
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<Value>,
    // Exports write `null` for empty lists
    #[serde(default)]
    genres: Option<Vec<String>>,
    #[serde(default)]
    cast: Option<Vec<String>>,
    #[serde(default)]
    plot: Option<String>,
    #[serde(default)]
    imdb: Option<RawImdb>,
}

#[derive(Debug, Deserialize)]
struct RawImdb {
    #[serde(default)]
    rating: Option<Value>,
}

/// Normalize a document id: plain strings, numbers, or `{"$oid": "..."}`
fn parse_id(value: &Value) -> Result<String> {
    let id = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => match map.get("$oid") {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => String::new(),
        },
        _ => String::new(),
    };

    if id.is_empty() {
        return Err(DataLoadError::InvalidValue {
            field: "_id".to_string(),
            value: value.to_string(),
        });
    }
    Ok(id)
}

/// Years are numbers in most documents, but some exports carry strings
/// such as "1999è". The leading digits are taken; anything else is absent.
fn parse_year(value: Option<&Value>) -> Option<u16> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|y| u16::try_from(y).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// Ratings can be numbers or empty strings
fn parse_rating(value: Option<&Value>) -> Option<f32> {
    match value? {
        Value::Number(n) => n.as_f64().map(|r| r as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl RawMovie {
    fn into_movie(self) -> Result<Movie> {
        let raw_id = self.object_id.or(self.id).unwrap_or(Value::Null);
        let id = parse_id(&raw_id)?;

        let title = self.title.map(|t| t.trim().to_string()).unwrap_or_default();
        if title.is_empty() {
            return Err(DataLoadError::InvalidValue {
                field: "title".to_string(),
                value: format!("<empty> for movie {}", id),
            });
        }

        Ok(Movie {
            id,
            title,
            genres: self.genres.unwrap_or_default(),
            cast: self.cast.unwrap_or_default(),
            plot: self.plot.unwrap_or_default(),
            year: parse_year(self.year.as_ref()),
            imdb_rating: self.imdb.and_then(|imdb| parse_rating(imdb.rating.as_ref())),
        })
    }
}

/// Parse a catalog document set, detecting the layout from the first
/// non-whitespace character.
///
/// `file` is only used for error context. Each returned movie is paired with
/// the line it came from.
pub fn parse_movies(content: &str, file: &str) -> Result<Vec<(usize, Movie)>> {
    if content.trim_start().starts_with('[') {
        parse_json_array(content, file)
    } else {
        parse_json_lines(content, file)
    }
}

/// Parse a JSON array of documents
pub fn parse_json_array(content: &str, file: &str) -> Result<Vec<(usize, Movie)>> {
    let raw: Vec<RawMovie> =
        serde_json::from_str(content).map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line: e.line(),
            reason: e.to_string(),
        })?;

    // Array documents have no per-document line; the element index stands in
    raw.into_iter()
        .enumerate()
        .map(|(idx, doc)| {
            doc.into_movie()
                .map(|movie| (idx + 1, movie))
                .map_err(|e| with_context(e, file, idx + 1))
        })
        .collect()
}

/// Parse JSON-lines documents in parallel, keeping file order
pub fn parse_json_lines(content: &str, file: &str) -> Result<Vec<(usize, Movie)>> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    // par_iter + collect preserves the input order
    lines
        .par_iter()
        .map(|&(line_no, line)| {
            let raw: RawMovie =
                serde_json::from_str(line).map_err(|e| DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: e.to_string(),
                })?;
            raw.into_movie()
                .map(|movie| (line_no, movie))
                .map_err(|e| with_context(e, file, line_no))
        })
        .collect()
}

/// Attach file/line context to a field-level error
fn with_context(err: DataLoadError, file: &str, line: usize) -> DataLoadError {
    match err {
        DataLoadError::InvalidValue { field, value } => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason: format!("invalid {}: {}", field, value),
        },
        other => other,
    }
}
