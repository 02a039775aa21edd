//! Reports over links.csv joined with IMDb detail pages.
//!
//! `Links` resolves each link through a [`DetailResolver`]; the resulting
//! records are materialized once into a [`DetailReport`], which derives
//! profit and cost per minute and ranks over them.

use data_loader::{Link, LinkStore};
use imdb_client::{DetailField, DetailResolver, Resolution, ResolvedDetail};
use ranking::{Count, Order, RankedResult, Ranker, rank_entries};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Links {
    store: Arc<LinkStore>,
    resolver: DetailResolver,
    limit: Option<usize>,
}

impl fmt::Debug for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("links", &self.store.len())
            .field("resolver", &self.resolver)
            .field("limit", &self.limit)
            .finish()
    }
}

impl Links {
    /// Load links.csv; a missing file leaves the reports empty
    pub fn open(path: impl AsRef<Path>, resolver: DetailResolver) -> Self {
        Self::new(Arc::new(LinkStore::open(path)), resolver)
    }

    pub fn new(store: Arc<LinkStore>, resolver: DetailResolver) -> Self {
        Self {
            store,
            resolver,
            limit: None,
        }
    }

    /// Only resolve the first `limit` links of the file
    pub fn with_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.limit = limit.into();
        self
    }

    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    fn selected(&self) -> &[Link] {
        let links = self.store.records();
        match self.limit {
            Some(limit) => &links[..limit.min(links.len())],
            None => links,
        }
    }

    /// Fetch and reconcile every selected link
    pub fn resolve(&self) -> Resolution {
        self.resolver.resolve_all(self.selected())
    }

    /// One row per resolved movie: the movie id followed by the requested
    /// fields, in the order given. Rows are sorted by movie id.
    pub fn get_imdb(&self, fields: &[DetailField]) -> Vec<Vec<String>> {
        self.resolve()
            .records
            .iter()
            .map(|record| {
                let mut row = Vec::with_capacity(fields.len() + 1);
                row.push(record.movie_id.to_string());
                row.extend(fields.iter().map(|field| field.value_of(record)));
                row
            })
            .collect()
    }

    /// Resolve the selected links and wrap the records for ranking
    pub fn report(&self) -> DetailReport {
        let resolution = self.resolve();
        if !resolution.failures.is_empty() {
            info!(
                "{} link(s) left out of the report",
                resolution.failures.len()
            );
        }
        DetailReport::new(resolution.records)
    }
}

/// Gross minus budget; negative when the movie lost money
pub fn profit(record: &ResolvedDetail) -> i64 {
    let gross = i64::try_from(record.gross).unwrap_or(i64::MAX);
    let budget = i64::try_from(record.budget).unwrap_or(i64::MAX);
    gross.saturating_sub(budget)
}

/// Budget spent per minute of runtime
pub fn cost_per_minute(record: &ResolvedDetail) -> f64 {
    record.budget as f64 / f64::from(record.runtime_minutes.max(1))
}

/// Rankings over already-resolved records, keyed by title
#[derive(Debug, Clone, Default)]
pub struct DetailReport {
    records: Vec<ResolvedDetail>,
}

impl DetailReport {
    pub fn new(records: Vec<ResolvedDetail>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ResolvedDetail] {
        &self.records
    }

    /// Top `n` directors by number of movies; records without a director are skipped
    pub fn top_directors(&self, n: usize) -> RankedResult<String, usize> {
        Ranker::new(Count).with_limit(n).rank(&self.records, |record| {
            (!record.director.is_empty()).then(|| (record.director.clone(), ()))
        })
    }

    pub fn most_expensive(&self, n: usize) -> RankedResult<String, u64> {
        self.rank_by(n, |record| record.budget)
    }

    pub fn most_profitable(&self, n: usize) -> RankedResult<String, i64> {
        self.rank_by(n, profit)
    }

    /// Top `n` movies by runtime in minutes
    pub fn longest(&self, n: usize) -> RankedResult<String, u32> {
        self.rank_by(n, |record| record.runtime_minutes)
    }

    pub fn top_cost_per_minute(&self, n: usize) -> RankedResult<String, f64> {
        self.rank_by(n, cost_per_minute)
    }

    fn rank_by<V, F>(&self, n: usize, score: F) -> RankedResult<String, V>
    where
        V: PartialOrd,
        F: Fn(&ResolvedDetail) -> V,
    {
        let entries = self
            .records
            .iter()
            .map(|record| (record.title.clone(), score(record)));
        rank_entries(entries, Order::Descending, Some(n))
    }
}
