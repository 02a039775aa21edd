//! IMDb detail page client.
//!
//! This crate turns a `links.csv` row into one reconciled record of detail
//! fields (title, director, budget, cumulative worldwide gross, runtime). It
//! handles:
//! - Fetching the title page for an IMDb id (`DocumentFetcher`)
//! - Locating labeled fields in inconsistent markup (`DetailNode`, `extract`)
//! - Substituting per-field sentinels when a field is absent or malformed
//! - Resolving many ids on a bounded worker pool, ordered by movie id
//!
//! ## Example Usage
//! ```ignore
//! use imdb_client::{DetailResolver, ResolverConfig};
//!
//! let resolver = DetailResolver::http(ResolverConfig::default().with_workers(8));
//! let resolution = resolver.resolve_all(links.records());
//! for record in &resolution.records {
//!     println!("{}: {} ({} min)", record.title, record.director, record.runtime_minutes);
//! }
//! ```

pub mod document;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod resolver;

pub use document::DetailNode;
pub use error::{FetchError, ResolveError};
pub use fetcher::{DocumentFetcher, HttpFetcher, StaticFetcher};
pub use resolver::{
    BUDGET_SENTINEL, DIRECTOR_SENTINEL, DetailField, DetailResolver, GROSS_SENTINEL,
    RUNTIME_SENTINEL, Resolution, ResolvedDetail, ResolverConfig, reconcile,
};
