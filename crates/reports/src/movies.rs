//! Reports over movies.csv.

use data_loader::MovieStore;
use ranking::{Count, MaxLength, RankedResult, Ranker};
use std::path::Path;
use std::sync::Arc;

use crate::features::{genre_count, release_bucket};

#[derive(Debug, Clone)]
pub struct Movies {
    store: Arc<MovieStore>,
}

impl Movies {
    /// Load movies.csv; a missing file leaves the reports empty
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(MovieStore::open(path)))
    }

    pub fn new(store: Arc<MovieStore>) -> Self {
        Self { store }
    }

    /// The underlying store, shareable with [`crate::Ratings::with_titles`]
    pub fn store(&self) -> Arc<MovieStore> {
        Arc::clone(&self.store)
    }

    /// Number of movies per release year, most common first.
    ///
    /// Titles without a year are counted under "(year not specified)".
    pub fn dist_by_release(&self) -> RankedResult<String, usize> {
        Ranker::new(Count).rank(self.store.iter(), |movie| Some((release_bucket(movie), ())))
    }

    /// Number of movies per genre, most common first
    pub fn dist_by_genres(&self) -> RankedResult<String, usize> {
        let genres = self
            .store
            .iter()
            .flat_map(|movie| movie.genres.iter());
        Ranker::new(Count).rank(genres, |genre| Some((genre.clone(), ())))
    }

    /// Top `n` movies by number of genres
    pub fn most_genres(&self, n: usize) -> RankedResult<String, usize> {
        Ranker::new(MaxLength)
            .with_limit(n)
            .rank(self.store.iter(), |movie| {
                Some((movie.title.clone(), genre_count(movie)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Movie;

    fn movie(id: u32, title: &str, year: Option<u16>, genres: &[&str]) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn sample() -> Movies {
        Movies::new(Arc::new(MovieStore::from_records(vec![
            movie(1, "Toy Story (1995)", Some(1995), &["Adventure", "Animation", "Children"]),
            movie(2, "Jumanji (1995)", Some(1995), &["Adventure", "Children", "Fantasy"]),
            movie(3, "Heat (1995)", Some(1995), &["Action", "Crime", "Thriller"]),
            movie(4, "Babylon 5", None, &[]),
            movie(5, "Cosmos", None, &["Documentary"]),
            movie(6, "Fargo (1996)", Some(1996), &["Comedy", "Crime", "Drama", "Thriller"]),
        ])))
    }

    #[test]
    fn test_dist_by_release() {
        let dist = sample().dist_by_release();
        let entries: Vec<_> = dist.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(
            entries,
            vec![("1995", 3), ("(year not specified)", 2), ("1996", 1)]
        );
        assert_eq!(dist.values().sum::<usize>(), 6);
    }

    #[test]
    fn test_dist_by_genres() {
        let dist = sample().dist_by_genres();
        assert_eq!(dist.get_index(0), Some((&"Adventure".to_string(), &2)));
        assert_eq!(dist["Crime"], 2);
        assert_eq!(dist["Documentary"], 1);
        // Every listed genre is counted once per movie
        assert_eq!(dist.values().sum::<usize>(), 14);
    }

    #[test]
    fn test_most_genres() {
        let top = sample().most_genres(2);
        let entries: Vec<_> = top.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, vec![("Fargo (1996)", 4), ("Toy Story (1995)", 3)]);
    }
}
