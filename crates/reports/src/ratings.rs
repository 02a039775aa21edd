//! Reports over ratings.csv.
//!
//! `Ratings` owns a shared handle to the rating store and hands out two views
//! over it: [`MovieRatings`] (grouped by movie) and [`UserRatings`] (grouped
//! by user). Both views hold an `Arc` to the same store; neither copies or
//! mutates it.
//!
//! Movie-level reports are keyed by title when a movies table is attached
//! with [`Ratings::with_titles`]. Ratings whose movie is missing from that
//! table are skipped. Without a movies table, the movie id is used as the key.
//! Either way ratings are grouped per movie id, so two movies sharing a title
//! are never pooled together.

use data_loader::{MovieId, MovieStore, Rating, RatingStore, UserId};
use ranking::{Count, Metric, Order, RankedResult, Ranker, Reducer, SampleVariance};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use crate::features::rating_year;

/// Entry point for rating reports
#[derive(Debug, Clone)]
pub struct Ratings {
    store: Arc<RatingStore>,
    titles: Option<Arc<MovieStore>>,
}

impl Ratings {
    /// Load ratings.csv; a missing file leaves the reports empty
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(RatingStore::open(path)))
    }

    pub fn new(store: Arc<RatingStore>) -> Self {
        Self {
            store,
            titles: None,
        }
    }

    /// Key movie reports by title, joining through `movies`
    pub fn with_titles(mut self, movies: Arc<MovieStore>) -> Self {
        self.titles = Some(movies);
        self
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    /// Reports grouped by movie
    pub fn movies(&self) -> MovieRatings {
        MovieRatings {
            store: Arc::clone(&self.store),
            titles: self.titles.clone(),
        }
    }

    /// Reports grouped by user
    pub fn users(&self) -> UserRatings {
        UserRatings {
            store: Arc::clone(&self.store),
        }
    }
}

/// Rating reports grouped by movie
#[derive(Debug, Clone)]
pub struct MovieRatings {
    store: Arc<RatingStore>,
    titles: Option<Arc<MovieStore>>,
}

/// Maps movie ids to the labels shown in movie reports
struct MovieKeys<'a> {
    titles: Option<HashMap<MovieId, &'a str>>,
}

impl MovieKeys<'_> {
    /// False when a title table is attached but has no row for `movie_id`
    fn knows(&self, movie_id: MovieId) -> bool {
        self.titles
            .as_ref()
            .is_none_or(|titles| titles.contains_key(&movie_id))
    }

    /// Relabel a ranking keyed by movie id, keeping its order.
    ///
    /// Groups are always formed per movie id. When two ranked movies share a
    /// title, the lower-ranked one is labeled `"Title [id]"`.
    fn label<V>(&self, ranked: RankedResult<MovieId, V>) -> RankedResult<String, V> {
        let mut labeled = RankedResult::with_capacity(ranked.len());
        for (movie_id, value) in ranked {
            let label = match self.titles.as_ref().and_then(|titles| titles.get(&movie_id)) {
                Some(title) if labeled.contains_key(*title) => format!("{} [{}]", title, movie_id),
                Some(title) => title.to_string(),
                None => movie_id.to_string(),
            };
            labeled.insert(label, value);
        }
        labeled
    }
}

impl MovieRatings {
    fn keys(&self) -> MovieKeys<'_> {
        MovieKeys {
            titles: self.titles.as_ref().map(|movies| movies.titles()),
        }
    }

    /// Rank movies by `reducer` over their ratings, then label them
    fn rank_movies<R>(&self, ranker: Ranker<R>) -> RankedResult<String, R::Output>
    where
        R: Reducer<f64>,
    {
        let keys = self.keys();
        let ranked = ranker.rank(self.store.iter(), |r| {
            keys.knows(r.movie_id).then(|| (r.movie_id, rating_value(r)))
        });
        keys.label(ranked)
    }

    /// Number of ratings per year the rating was made, ascending by year
    pub fn dist_by_year(&self) -> RankedResult<i64, usize> {
        Ranker::new(Count)
            .with_order(Order::Ascending)
            .rank_by_key(self.store.iter(), |r| Some((rating_year(r.timestamp), ())))
    }

    /// Number of ratings per rating value, ascending by the value's text
    ///
    /// Keys are the tokens from the file ("0.5", "4.0", ...), ordered as
    /// strings rather than numbers.
    pub fn dist_by_rating(&self) -> RankedResult<String, usize> {
        Ranker::new(Count)
            .with_order(Order::Ascending)
            .rank_by_key(self.store.iter(), |r| Some((r.rating_text.clone(), ())))
    }

    /// Top `n` movies by number of ratings
    #[instrument(skip(self))]
    pub fn top_by_num_of_ratings(&self, n: usize) -> RankedResult<String, usize> {
        self.rank_movies(Ranker::new(Count).with_limit(n))
    }

    /// Top `n` movies by average or median rating
    #[instrument(skip(self))]
    pub fn top_by_ratings(&self, n: usize, metric: Metric) -> RankedResult<String, f64> {
        self.rank_movies(Ranker::new(metric).with_limit(n))
    }

    /// Top `n` movies by sample variance of their ratings
    #[instrument(skip(self))]
    pub fn top_controversial(&self, n: usize) -> RankedResult<String, f64> {
        self.rank_movies(Ranker::new(SampleVariance).with_limit(n))
    }
}

/// Rating reports grouped by user
#[derive(Debug, Clone)]
pub struct UserRatings {
    store: Arc<RatingStore>,
}

impl UserRatings {
    /// Number of ratings made by each user, descending
    pub fn dist_by_num_of_ratings(&self) -> RankedResult<UserId, usize> {
        Ranker::new(Count).rank(self.store.iter(), |r| Some((r.user_id, ())))
    }

    /// Same as [`UserRatings::dist_by_num_of_ratings`]
    pub fn top_valuers(&self) -> RankedResult<UserId, usize> {
        self.dist_by_num_of_ratings()
    }

    /// Average or median rating given by each user, descending
    pub fn dist_by_ratings(&self, metric: Metric) -> RankedResult<UserId, f64> {
        Ranker::new(metric).rank(self.store.iter(), |r| Some((r.user_id, rating_value(r))))
    }

    /// Same as [`UserRatings::dist_by_ratings`]
    pub fn valuers_with_ratings(&self, metric: Metric) -> RankedResult<UserId, f64> {
        self.dist_by_ratings(metric)
    }

    /// Top `n` users by sample variance of the ratings they gave
    pub fn top_controversial(&self, n: usize) -> RankedResult<UserId, f64> {
        Ranker::new(SampleVariance)
            .with_limit(n)
            .rank(self.store.iter(), |r| Some((r.user_id, rating_value(r))))
    }

    /// Same as [`UserRatings::top_controversial`]
    pub fn top_controversial_valuers(&self, n: usize) -> RankedResult<UserId, f64> {
        self.top_controversial(n)
    }
}

fn rating_value(rating: &Rating) -> f64 {
    f64::from(rating.rating)
}
