//! In-memory record stores, one per dataset file.
//!
//! A `RecordStore` is filled once, when it is opened, by draining the whole
//! file. After that it is never mutated; every report reads from it through
//! shared references (usually an `Arc<RecordStore<T>>`).
//!
//! Rust concepts you'll learn:
//! - Generic structs bounded by a trait (`T: Record`)
//! - Borrowing: accessors hand out `&T` and `&[T]`, never owned copies
//! - Keeping an error around as data instead of returning it

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Immutable, ordered table of records loaded from one file
#[derive(Debug)]
pub struct RecordStore<T: Record> {
    records: Vec<T>,
    source: Option<PathBuf>,
    /// Set when the source could not be opened and the store is empty because of it
    load_error: Option<DataLoadError>,
}

/// Store of ratings.csv rows
pub type RatingStore = RecordStore<Rating>;
/// Store of tags.csv rows
pub type TagStore = RecordStore<Tag>;
/// Store of movies.csv rows
pub type MovieStore = RecordStore<Movie>;
/// Store of links.csv rows
pub type LinkStore = RecordStore<Link>;

impl<T: Record> RecordStore<T> {
    /// Load a dataset, proceeding empty if the file is unavailable.
    ///
    /// A missing file is logged and remembered (see [`RecordStore::load_error`])
    /// so reports can still run and simply come back empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_open(path) {
            Ok(store) => store,
            Err(err) => {
                warn!(file = T::FILE_LABEL, "{}; continuing with an empty dataset", err);
                Self {
                    records: Vec::new(),
                    source: Some(path.to_path_buf()),
                    load_error: Some(err),
                }
            }
        }
    }

    /// Load a dataset, returning `SourceUnavailable` if the file cannot be read.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let records = parser::load_records::<T>(path)?;
        info!(
            file = T::FILE_LABEL,
            "Loaded {} records from {}",
            records.len(),
            path.display()
        );
        Ok(Self {
            records,
            source: Some(path.to_path_buf()),
            load_error: None,
        })
    }

    /// Build a store directly from records (no file involved)
    pub fn from_records(records: Vec<T>) -> Self {
        Self {
            records,
            source: None,
            load_error: None,
        }
    }

    /// All records in file order
    ///
    /// Rust concept: `&[T]` is a slice (view into a vector)
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path the store was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// False when the source file could not be opened
    pub fn is_available(&self) -> bool {
        self.load_error.is_none()
    }

    /// The error that left this store empty, if any
    pub fn load_error(&self) -> Option<&DataLoadError> {
        self.load_error.as_ref()
    }
}

impl<'a, T: Record> IntoIterator for &'a RecordStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl MovieStore {
    /// Title lookup table used to join other datasets on movie id
    pub fn titles(&self) -> HashMap<MovieId, &str> {
        self.records
            .iter()
            .map(|movie| (movie.id, movie.title.as_str()))
            .collect()
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.records.iter().find(|movie| movie.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_missing_file_proceeds_empty() {
        let store = RatingStore::open("/no/such/ratings.csv");
        assert!(store.is_empty());
        assert!(!store.is_available());
        assert!(store.load_error().unwrap().is_source_unavailable());
    }

    #[test]
    fn test_try_open_missing_file_escalates() {
        let result = TagStore::try_open("/no/such/tags.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_open_movies_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "movieId,title,genres\n\
             1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
             11,\"American President, The (1995)\",Comedy|Drama|Romance\n"
        )
        .unwrap();

        let store = MovieStore::open(file.path());
        assert!(store.is_available());
        assert_eq!(store.len(), 2);
        assert_eq!(store.source(), Some(file.path()));

        let titles = store.titles();
        assert_eq!(titles[&11], "American President, The (1995)");
        assert_eq!(store.get_movie(1).unwrap().genres.len(), 5);
    }

    #[test]
    fn test_from_records() {
        let store = LinkStore::from_records(vec![Link {
            movie_id: 1,
            imdb_id: "0114709".to_string(),
            tmdb_id: Some(862),
        }]);
        assert_eq!(store.len(), 1);
        assert!(store.source().is_none());
        assert_eq!((&store).into_iter().count(), 1);
    }
}
