//! Per-identifier resolution of IMDb detail pages.
//!
//! Each link goes through the same stages:
//! 1. Pending: build the detail URL from the IMDb id
//! 2. Fetched: the fetcher returned a document (a fetch failure ends here)
//! 3. Parsed: the document root is available for traversal
//! 4. Resolved: every field extracted independently, sentinels filled in
//!
//! Identifiers are independent, so they are resolved on a bounded rayon
//! pool. The output is sorted by movie id regardless of completion order.

use crate::document::DetailNode;
use crate::error::ResolveError;
use crate::extract;
use crate::fetcher::{DocumentFetcher, HttpFetcher};
use data_loader::{Link, MovieId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Director when the page does not name one
pub const DIRECTOR_SENTINEL: &str = "";
/// Budget when absent or unparsable
pub const BUDGET_SENTINEL: u64 = 0;
/// Gross when absent or unparsable
pub const GROSS_SENTINEL: u64 = 0;
/// Runtime when absent or unparsable; never 0 so per-minute ratios stay defined
pub const RUNTIME_SENTINEL: u32 = 1;

/// One movie's reconciled detail fields. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDetail {
    pub movie_id: MovieId,
    pub imdb_id: String,
    pub title: String,
    pub director: String,
    pub budget: u64,
    /// Cumulative worldwide gross
    pub gross: u64,
    pub runtime_minutes: u32,
}

/// Fields that can be requested from a resolved record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailField {
    Title,
    Director,
    Budget,
    Gross,
    Runtime,
}

impl DetailField {
    pub const ALL: [DetailField; 5] = [
        DetailField::Title,
        DetailField::Director,
        DetailField::Budget,
        DetailField::Gross,
        DetailField::Runtime,
    ];

    /// The field's value on `record`, rendered as text
    pub fn value_of(&self, record: &ResolvedDetail) -> String {
        match self {
            DetailField::Title => record.title.clone(),
            DetailField::Director => record.director.clone(),
            DetailField::Budget => record.budget.to_string(),
            DetailField::Gross => record.gross.to_string(),
            DetailField::Runtime => record.runtime_minutes.to_string(),
        }
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DetailField::Title => "Title",
            DetailField::Director => "Director",
            DetailField::Budget => "Budget",
            DetailField::Gross => "Cumulative Worldwide Gross",
            DetailField::Runtime => "Runtime",
        };
        f.write_str(label)
    }
}

/// Settings for [`DetailResolver`]
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Prefix of every detail URL; `tt{imdbId}/` is appended
    pub base_url: String,
    /// Size of the worker pool; 1 resolves serially on the calling thread
    pub workers: usize,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.imdb.com/title/".to_string(),
            workers: 4,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(15),
        }
    }
}

impl ResolverConfig {
    /// Configure the URL prefix (default: https://www.imdb.com/title/)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Configure the worker pool size (default: 4, minimum 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Configure the connect timeout (default: 5s)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Configure the read timeout (default: 15s)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Detail page URL for an IMDb id as written in links.csv ("0114709")
    pub fn detail_url(&self, imdb_id: &str) -> String {
        format!("{}tt{}/", self.base_url, imdb_id)
    }
}

/// Outcome of resolving a batch of links
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Successfully reconciled records, sorted by movie id
    pub records: Vec<ResolvedDetail>,
    /// Identifiers that could not be resolved, sorted by movie id
    pub failures: Vec<ResolveError>,
}

/// Fetches and reconciles detail pages for links.
#[derive(Clone)]
pub struct DetailResolver {
    fetcher: Arc<dyn DocumentFetcher>,
    config: ResolverConfig,
}

impl fmt::Debug for DetailResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DetailResolver {
    pub fn new(fetcher: impl DocumentFetcher + 'static, config: ResolverConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config,
        }
    }

    /// Resolver that fetches over HTTP using the config's timeouts
    pub fn http(config: ResolverConfig) -> Self {
        let fetcher = HttpFetcher::new(config.connect_timeout, config.read_timeout);
        Self::new(fetcher, config)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one link.
    ///
    /// A fetch failure or a page without a title fails the whole record; any
    /// other missing field is replaced by its sentinel.
    #[instrument(skip(self, link), fields(movie_id = link.movie_id))]
    pub fn resolve_one(&self, link: &Link) -> Result<ResolvedDetail, ResolveError> {
        let url = self.config.detail_url(&link.imdb_id);
        let document = self
            .fetcher
            .fetch(&url)
            .map_err(|source| ResolveError::Fetch {
                movie_id: link.movie_id,
                source,
            })?;
        debug!("Fetched {}", url);

        let root = document.root_element();
        reconcile(link, &root)
    }

    /// Resolve every link, each independently of the others.
    ///
    /// Runs on a pool of `config.workers` threads. A failed identifier is
    /// reported in `failures` and does not stop the rest of the batch.
    pub fn resolve_all(&self, links: &[Link]) -> Resolution {
        info!(
            "Resolving {} links with {} worker(s)",
            links.len(),
            self.config.workers
        );

        let outcomes: Vec<Result<ResolvedDetail, ResolveError>> = if self.config.workers <= 1 {
            links.iter().map(|link| self.resolve_one(link)).collect()
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.workers)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    links
                        .par_iter()
                        .map(|link| self.resolve_one(link))
                        .collect()
                }),
                Err(err) => {
                    warn!("Could not start worker pool ({}); resolving serially", err);
                    links.iter().map(|link| self.resolve_one(link)).collect()
                }
            }
        };

        let mut resolution = Resolution::default();
        for outcome in outcomes {
            match outcome {
                Ok(record) => resolution.records.push(record),
                Err(err) => {
                    warn!("{}", err);
                    resolution.failures.push(err);
                }
            }
        }
        resolution.records.sort_by_key(|record| record.movie_id);
        resolution.failures.sort_by_key(|err| err.movie_id());

        info!(
            "Resolved {} of {} links ({} failed)",
            resolution.records.len(),
            links.len(),
            resolution.failures.len()
        );
        resolution
    }
}

/// Build a record from a parsed page, one field at a time.
///
/// Only the title is required. Every other field falls back to its sentinel
/// on its own, so one malformed field never discards the others.
pub fn reconcile<N: DetailNode>(link: &Link, root: &N) -> Result<ResolvedDetail, ResolveError> {
    let title = extract::extract_title(root).ok_or(ResolveError::MissingTitle {
        movie_id: link.movie_id,
    })?;

    let director = or_sentinel(
        extract::extract_director(root),
        DetailField::Director,
        DIRECTOR_SENTINEL.to_string(),
    );
    let budget = or_sentinel(
        extract::extract_budget(root),
        DetailField::Budget,
        BUDGET_SENTINEL,
    );
    let gross = or_sentinel(
        extract::extract_gross(root),
        DetailField::Gross,
        GROSS_SENTINEL,
    );
    let runtime_minutes = or_sentinel(
        extract::extract_runtime(root),
        DetailField::Runtime,
        RUNTIME_SENTINEL,
    );

    Ok(ResolvedDetail {
        movie_id: link.movie_id,
        imdb_id: link.imdb_id.clone(),
        title,
        director,
        budget,
        gross,
        runtime_minutes,
    })
}

fn or_sentinel<T>(value: Option<T>, field: DetailField, sentinel: T) -> T {
    value.unwrap_or_else(|| {
        debug!(%field, "Field missing or unparsable; using sentinel");
        sentinel
    })
}
