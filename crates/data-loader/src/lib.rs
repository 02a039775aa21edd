//! # Data Loader
//!
//! Reads ratings.csv, tags.csv, movies.csv and links.csv into read-only
//! [`RecordStore`]s.
//!
//! - `types`: the row structs and the [`Record`] trait that says how to build one
//! - `parser`: line splitting and per-field validation
//! - `store`: the loaded table, and the "missing file means empty" policy
//!
//! ## Example
//!
//! ```ignore
//! use data_loader::{MovieStore, RatingStore};
//!
//! // A missing file is logged and leaves the store empty
//! let ratings = RatingStore::open("data/ml-latest-small/ratings.csv");
//! let movies = MovieStore::open("data/ml-latest-small/movies.csv");
//!
//! println!("{} ratings for {} movies", ratings.len(), movies.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod store;

pub use error::{DataLoadError, Result};
pub use parser::{NO_GENRES_LISTED, Row, extract_year_from_title, load_records, open_rows};
pub use store::{LinkStore, MovieStore, RatingStore, RecordStore, TagStore};
pub use types::{Link, Movie, MovieId, Rating, Record, RowLayout, Tag, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_from_no_records_is_available() {
        let store = RatingStore::from_records(Vec::new());
        assert_eq!(store.len(), 0);
        assert!(store.is_available());
    }

    #[test]
    fn test_row_layout_trailing() {
        assert_eq!(<Movie as Record>::LAYOUT.trailing(), 1);
        assert_eq!(<Tag as Record>::LAYOUT.trailing(), 1);
        assert_eq!(<Rating as Record>::LAYOUT.trailing(), 0);
    }
}
