//! Generic grouping and ranking engine.
//!
//! This crate provides:
//! - The `Reducer` trait and the reductions used by every report
//!   (count, mean, median, sample variance, max length)
//! - `Metric`, the caller-selectable "average" / "median" reduction
//! - `Ranker`, which groups rows by key, reduces, sorts and truncates
//!
//! ## Architecture
//! A ranking runs in stages:
//! 1. Rows are partitioned into groups by a key function (first-seen order)
//! 2. A reducer collapses each group to one score
//! 3. Groups are stable-sorted by score, so ties keep first-seen order
//! 4. The result is truncated to the requested size
//!
//! ## Example Usage
//! ```ignore
//! use ranking::{Metric, Order, Ranker};
//!
//! let top = Ranker::new(Metric::Median)
//!     .with_order(Order::Descending)
//!     .with_limit(10)
//!     .rank(ratings.iter(), |r| Some((r.movie_id, r.rating as f64)));
//! ```

pub mod error;
pub mod reducers;
pub mod ranker;

// Re-export main types
pub use error::ConfigError;
pub use reducers::{Count, MaxLength, Mean, Median, Metric, Reducer, SampleVariance};
pub use ranker::{Order, RankedResult, Ranker, rank_entries};
