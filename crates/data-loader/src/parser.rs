//! Parser for MovieLens CSV files.
//!
//! This module handles turning the four comma-separated files into records:
//! - ratings.csv: userId,movieId,rating,timestamp
//! - tags.csv:    userId,movieId,tag,timestamp
//! - movies.csv:  movieId,title,genres
//! - links.csv:   movieId,imdbId,tmdbId
//!
//! Every file starts with one header line, which is skipped. Titles and tags
//! are free text and may contain the delimiter, so those files are split with
//! a [`RowLayout`] that reserves the middle of the line for the text field.
//!
//! A malformed line never aborts a load: it is logged and skipped. Only a file
//! that cannot be opened at all is reported as an error.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Genre list marker used by movies.csv for movies without genres
pub const NO_GENRES_LISTED: &str = "(no genres listed)";

/// Four digits in parentheses, e.g. the "(1995)" in "Toy Story (1995)"
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("year pattern is valid"));

/// One data line of a file, already cut into fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number in the source file (the header is line 1)
    pub line: usize,
    pub fields: Vec<String>,
}

/// Read a file and cut every data line into fields.
///
/// Skips exactly one header line and any blank lines. Lines whose field count
/// does not match the layout are logged and skipped.
///
/// Fails with `SourceUnavailable` when the file cannot be opened or read.
pub fn open_rows(path: &Path, layout: RowLayout) -> Result<Vec<Row>> {
    let bytes = std::fs::read(path).map_err(|source| DataLoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    // MovieLens files are UTF-8, but older dumps contain stray Latin-1 bytes
    let content = String::from_utf8_lossy(&bytes);

    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue; // Skip empty lines
        }

        match split_row(line, layout, line_no) {
            Ok(fields) => rows.push(Row {
                line: line_no,
                fields,
            }),
            Err(err) => warn!(path = %path.display(), "Skipping line: {}", err),
        }
    }

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Cut one line into exactly `layout.arity` fields.
///
/// Example with the movies layout (arity 3, leading 1):
/// `1,"American President, The (1995)",Comedy|Drama|Romance`
/// -> `["1", "\"American President, The (1995)\"", "Comedy|Drama|Romance"]`
pub fn split_row(line: &str, layout: RowLayout, line_no: usize) -> Result<Vec<String>> {
    let mismatch = || DataLoadError::FieldCountMismatch {
        expected: layout.arity,
        found: line.split(layout.delimiter).count(),
        line: line_no,
    };

    if layout.leading >= layout.arity {
        let fields: Vec<String> = line
            .split(layout.delimiter)
            .map(|field| field.trim().to_string())
            .collect();
        if fields.len() != layout.arity {
            return Err(mismatch());
        }
        return Ok(fields);
    }

    let mut left = line.splitn(layout.leading + 1, layout.delimiter);
    let mut fields: Vec<String> = Vec::with_capacity(layout.arity);
    for _ in 0..layout.leading {
        let field = left.next().ok_or_else(mismatch)?;
        fields.push(field.trim().to_string());
    }
    let rest = left.next().ok_or_else(mismatch)?;

    // Rust concept: rsplitn walks from the right, so the trailing fields come
    // out last-first and the free text comes out last of all
    let mut right: Vec<&str> = rest.rsplitn(layout.trailing() + 1, layout.delimiter).collect();
    if right.len() != layout.trailing() + 1 {
        return Err(mismatch());
    }
    right.reverse();
    fields.extend(right.into_iter().map(|field| field.trim().to_string()));

    Ok(fields)
}

/// Load every parseable record of type `T` from `path`.
///
/// Rows that fail to parse are logged and skipped; only an unavailable file
/// is returned as an error.
pub fn load_records<T: Record>(path: &Path) -> Result<Vec<T>> {
    let rows = open_rows(path, T::LAYOUT)?;
    let total = rows.len();

    let mut records = Vec::with_capacity(total);
    for row in rows {
        match T::from_fields(&row.fields, row.line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(file = T::FILE_LABEL, "Skipping row: {}", err),
        }
    }

    if records.len() < total {
        warn!(
            file = T::FILE_LABEL,
            "Skipped {} of {} rows",
            total - records.len(),
            total
        );
    }
    Ok(records)
}

/// Parse a numeric field, naming the file, line and column on failure
fn parse_field<T>(value: &str, file: &str, line: usize, column: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", column, e),
    })
}

/// Remove one level of CSV quoting: `"Heat, The"` -> `Heat, The`, `""` -> `"`
fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}

fn is_valid_rating(rating: f32) -> bool {
    (0.5..=5.0).contains(&rating) && (rating * 2.0).fract() == 0.0
}

impl Record for Rating {
    const FILE_LABEL: &'static str = "ratings.csv";
    const LAYOUT: RowLayout = RowLayout::fixed(',', 4);

    fn from_fields(fields: &[String], line: usize) -> Result<Self> {
        let file = Self::FILE_LABEL;
        let rating: f32 = parse_field(&fields[2], file, line, "rating")?;
        if !is_valid_rating(rating) {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: fields[2].clone(),
            });
        }
        let timestamp: i64 = parse_field(&fields[3], file, line, "timestamp")?;
        if timestamp < 0 {
            return Err(DataLoadError::InvalidValue {
                field: "timestamp".to_string(),
                value: fields[3].clone(),
            });
        }

        Ok(Rating {
            user_id: parse_field(&fields[0], file, line, "userId")?,
            movie_id: parse_field(&fields[1], file, line, "movieId")?,
            rating,
            rating_text: fields[2].clone(),
            timestamp,
        })
    }
}

impl Record for Tag {
    const FILE_LABEL: &'static str = "tags.csv";
    const LAYOUT: RowLayout = RowLayout::with_free_text(',', 4, 2);

    fn from_fields(fields: &[String], line: usize) -> Result<Self> {
        let file = Self::FILE_LABEL;
        let text = unquote(&fields[2]).trim().to_string();
        if text.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason: "Empty tag".to_string(),
            });
        }

        Ok(Tag {
            user_id: parse_field(&fields[0], file, line, "userId")?,
            movie_id: parse_field(&fields[1], file, line, "movieId")?,
            text,
            timestamp: parse_field(&fields[3], file, line, "timestamp")?,
        })
    }
}

impl Record for Movie {
    const FILE_LABEL: &'static str = "movies.csv";
    const LAYOUT: RowLayout = RowLayout::with_free_text(',', 3, 1);

    fn from_fields(fields: &[String], line: usize) -> Result<Self> {
        let title = unquote(&fields[1]);
        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: Self::FILE_LABEL.to_string(),
                line,
                reason: "Missing title".to_string(),
            });
        }

        Ok(Movie {
            id: parse_field(&fields[0], Self::FILE_LABEL, line, "movieId")?,
            year: extract_year_from_title(&title),
            title,
            genres: parse_genres(&fields[2]),
        })
    }
}

impl Record for Link {
    const FILE_LABEL: &'static str = "links.csv";
    const LAYOUT: RowLayout = RowLayout::fixed(',', 3);

    fn from_fields(fields: &[String], line: usize) -> Result<Self> {
        let imdb_id = fields[1].clone();
        if imdb_id.is_empty() || !imdb_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DataLoadError::InvalidValue {
                field: "imdbId".to_string(),
                value: imdb_id,
            });
        }

        let tmdb_id = if fields[2].is_empty() {
            None
        } else {
            Some(parse_field(&fields[2], Self::FILE_LABEL, line, "tmdbId")?)
        };

        Ok(Link {
            movie_id: parse_field(&fields[0], Self::FILE_LABEL, line, "movieId")?,
            imdb_id,
            tmdb_id,
        })
    }
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
///
/// When a title carries several parenthesised groups the last four-digit one wins.
pub fn extract_year_from_title(title: &str) -> Option<u16> {
    YEAR_PATTERN
        .captures_iter(title)
        .last()
        .and_then(|caps| caps[1].parse().ok())
}

/// Parse pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> vec!["Action", "Adventure", "Sci-Fi"]
fn parse_genres(s: &str) -> Vec<String> {
    let s = s.trim();
    if s.is_empty() || s == NO_GENRES_LISTED {
        return Vec::new();
    }
    s.split('|')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year_from_title("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year_from_title("Movie Title"), None);
        assert_eq!(extract_year_from_title("Babylon 5"), None);
        assert_eq!(
            extract_year_from_title("Seven (a.k.a. Se7en) (1995)"),
            Some(1995)
        );
    }

    #[test]
    fn test_split_movie_title_with_commas() {
        let fields = split_row(
            "11,\"American President, The (1995)\",Comedy|Drama|Romance",
            Movie::LAYOUT,
            2,
        )
        .unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "11");
        assert_eq!(fields[1], "\"American President, The (1995)\"");
        assert_eq!(fields[2], "Comedy|Drama|Romance");
    }

    #[test]
    fn test_split_tag_with_commas() {
        let fields = split_row("2,60756,funny, but long,1445714994", Tag::LAYOUT, 2).unwrap();
        assert_eq!(fields, vec!["2", "60756", "funny, but long", "1445714994"]);
    }

    #[test]
    fn test_split_field_count_mismatch() {
        let err = split_row("1,2,3", Rating::LAYOUT, 7).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::FieldCountMismatch {
                expected: 4,
                found: 3,
                line: 7
            }
        ));
        assert!(split_row("1", Movie::LAYOUT, 2).is_err());
    }

    #[test]
    fn test_parse_movie_genres() {
        let fields = split_row("1,Toy Story (1995),Adventure|Animation", Movie::LAYOUT, 2).unwrap();
        let movie = Movie::from_fields(&fields, 2).unwrap();
        assert_eq!(movie.title, "Toy Story (1995)");
        assert_eq!(movie.year, Some(1995));
        assert_eq!(movie.genres, vec!["Adventure", "Animation"]);

        let fields = split_row("2,Unknown Film,(no genres listed)", Movie::LAYOUT, 3).unwrap();
        let movie = Movie::from_fields(&fields, 3).unwrap();
        assert!(movie.genres.is_empty());
        assert_eq!(movie.year, None);
    }

    #[test]
    fn test_parse_rating_keeps_text() {
        let fields = split_row("1,31,2.5,1260759144", Rating::LAYOUT, 2).unwrap();
        let rating = Rating::from_fields(&fields, 2).unwrap();
        assert_eq!(rating.rating, 2.5);
        assert_eq!(rating.rating_text, "2.5");
    }

    #[test]
    fn test_rating_off_scale_rejected() {
        let fields = split_row("1,31,7.0,1260759144", Rating::LAYOUT, 2).unwrap();
        assert!(Rating::from_fields(&fields, 2).is_err());
        let fields = split_row("1,31,4.0,-5", Rating::LAYOUT, 2).unwrap();
        assert!(Rating::from_fields(&fields, 2).is_err());
    }

    #[test]
    fn test_parse_link_without_tmdb() {
        let fields = split_row("791,0113610,", Link::LAYOUT, 2).unwrap();
        let link = Link::from_fields(&fields, 2).unwrap();
        assert_eq!(link.imdb_id, "0113610");
        assert_eq!(link.tmdb_id, None);
    }

    #[test]
    fn test_load_records_skips_header_and_bad_rows() {
        let file = write_file(
            "userId,movieId,rating,timestamp\n\
             1,31,2.5,1260759144\n\
             1,1029,not-a-number,1260759179\n\
             \n\
             1,1061,3.0,1260759182\r\n",
        );
        let ratings: Vec<Rating> = load_records(file.path()).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].movie_id, 1061);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = load_records::<Rating>(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.is_source_unavailable());
    }
}
