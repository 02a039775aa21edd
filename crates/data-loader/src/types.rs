//! Row types for the four MovieLens CSV files, and how each file is split.
//!
//! Rust concepts you'll see here:
//! - Associated constants on a trait (`Record::LAYOUT`)
//! - `const fn` constructors usable in those constants

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// `userId` column of ratings.csv and tags.csv
pub type UserId = u32;

/// Unique identifier for a movie (the `movieId` column shared by all four files)
pub type MovieId = u32;

// =============================================================================
// Records
// =============================================================================

/// One row of ratings.csv
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value on the 0.5 - 5.0 half-star scale
    pub rating: f32,
    /// The rating exactly as written in the file ("4.0", "3.5", ...)
    ///
    /// Kept so distributions can be keyed by the original token.
    pub rating_text: String,
    /// Unix timestamp (seconds) when the rating was made
    pub timestamp: i64,
}

/// Free-text tag applied by a user to a movie (one row of tags.csv)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Trimmed tag text, never empty
    pub text: String,
    pub timestamp: i64,
}

/// One row of movies.csv
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Release year parsed from a "(YYYY)" in the title; `None` when the title has none
    pub year: Option<u16>,
    /// Genre names in file order
    ///
    /// Empty when the file says "(no genres listed)".
    pub genres: Vec<String>,
}

/// Cross reference from a MovieLens movie to its external identifiers (links.csv)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub movie_id: MovieId,
    /// IMDb identifier without the "tt" prefix, as written in the file ("0114709")
    pub imdb_id: String,
    /// TMDb identifier; some rows leave this column empty
    pub tmdb_id: Option<u32>,
}

// =============================================================================
// Row Layout
// =============================================================================

/// How one line of a delimited file is cut into fields.
///
/// A row has `arity` fields. The first `leading` fields are split off from the
/// left, the remaining `arity - leading - 1` fields from the right, and
/// everything in between is kept as a single field even if it contains the
/// delimiter. That middle field is how free text (titles, tags) survives
/// unquoted commas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    pub delimiter: char,
    pub arity: usize,
    pub leading: usize,
}

impl RowLayout {
    /// Plain fixed-arity split with no free-text field
    pub const fn fixed(delimiter: char, arity: usize) -> Self {
        Self {
            delimiter,
            arity,
            leading: arity,
        }
    }

    /// Split with one free-text field at position `leading`
    pub const fn with_free_text(delimiter: char, arity: usize, leading: usize) -> Self {
        Self {
            delimiter,
            arity,
            leading,
        }
    }

    /// Number of fields split off from the right end of the line
    pub fn trailing(&self) -> usize {
        self.arity.saturating_sub(self.leading + 1)
    }
}

/// A row type that can be built from the fields of one line.
///
/// Rust concept: associated constants let each implementor carry its own
/// file label and layout without needing an instance.
pub trait Record: Sized {
    /// Short name of the source file, used in error messages and logs
    const FILE_LABEL: &'static str;

    /// How to cut a line of this file into fields
    const LAYOUT: RowLayout;

    /// Build a record from exactly `LAYOUT.arity` fields.
    ///
    /// `line` is the 1-based line number in the source file.
    fn from_fields(fields: &[String], line: usize) -> Result<Self>;
}
