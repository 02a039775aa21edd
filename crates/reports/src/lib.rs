//! Descriptive reports over the MovieLens dataset.
//!
//! One view per dataset file, each a thin layer of key functions over the
//! shared ranking engine:
//!
//! - [`Ratings`] with its [`MovieRatings`] and [`UserRatings`] views
//! - [`Tags`]
//! - [`Movies`]
//! - [`Links`], which resolves IMDb detail pages, and [`DetailReport`]
//!
//! Every view loads its file once and never mutates it. Queries recompute
//! from the store on every call.
//!
//! ## Example
//! ```ignore
//! use reports::{Movies, Ratings};
//! use ranking::Metric;
//!
//! let movies = Movies::open("data/movies.csv");
//! let ratings = Ratings::open("data/ratings.csv").with_titles(movies.store());
//! let top = ratings.movies().top_by_ratings(10, Metric::Median);
//! ```

pub mod features;
pub mod links;
pub mod movies;
pub mod ratings;
pub mod tags;

pub use features::YEAR_NOT_SPECIFIED;
pub use links::{DetailReport, Links, cost_per_minute, profit};
pub use movies::Movies;
pub use ratings::{MovieRatings, Ratings, UserRatings};
pub use tags::Tags;
