//! The group-by → reduce → rank → truncate pipeline.
//!
//! Every report in the workspace is built from the same four steps:
//! 1. Partition rows into groups by key (groups keep first-seen key order)
//! 2. Reduce each group's values to one score
//! 3. Stable-sort the groups by score (or by key)
//! 4. Keep the first `limit` groups
//!
//! ## Usage
//! ```ignore
//! let top = Ranker::new(SampleVariance)
//!     .with_order(Order::Descending)
//!     .with_limit(10)
//!     .rank(ratings.iter(), |r| Some((r.movie_id, r.rating as f64)));
//! ```

use crate::reducers::Reducer;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::hash::Hash;
use tracing::debug;

/// Ordered mapping from key to score; iteration order is rank order.
pub type RankedResult<K, V> = IndexMap<K, V>;

/// Sort direction for a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    Ascending,
    #[default]
    Descending,
}

impl Order {
    /// Compare two scores in this direction. Incomparable values (NaN) are
    /// treated as equal so the stable sort leaves them in place.
    pub fn compare<T: PartialOrd + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match self {
            Order::Ascending => ordering,
            Order::Descending => ordering.reverse(),
        }
    }
}

/// Groups rows by key, reduces each group and ranks the results.
///
/// Built with the builder pattern:
/// ```ignore
/// let ranker = Ranker::new(Count).with_order(Order::Ascending).with_limit(5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Ranker<R> {
    reducer: R,
    order: Order,
    limit: Option<usize>,
}

impl<R> Ranker<R> {
    /// Create a ranker with descending order and no limit.
    pub fn new(reducer: R) -> Self {
        Self {
            reducer,
            order: Order::Descending,
            limit: None,
        }
    }

    /// Set the sort direction (default: descending)
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Keep at most `limit` entries; `None` keeps everything
    pub fn with_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.limit = limit.into();
        self
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Rank groups by their reduced score.
    ///
    /// `key_fn` maps a row to its `(key, value)`. Returning `None` means the row
    /// cannot be keyed (for example its movie is missing from a joined table);
    /// such rows are skipped without failing the ranking.
    pub fn rank<T, K, V, F>(
        &self,
        rows: impl IntoIterator<Item = T>,
        key_fn: F,
    ) -> RankedResult<K, R::Output>
    where
        F: FnMut(T) -> Option<(K, V)>,
        K: Hash + Eq,
        R: Reducer<V>,
    {
        let reduced = self.reduce_groups(rows, key_fn);
        rank_entries(reduced, self.order, self.limit)
    }

    /// Rank groups by their key instead of their score.
    ///
    /// Used for distributions that read naturally in key order
    /// (years, rating values).
    pub fn rank_by_key<T, K, V, F>(
        &self,
        rows: impl IntoIterator<Item = T>,
        key_fn: F,
    ) -> RankedResult<K, R::Output>
    where
        F: FnMut(T) -> Option<(K, V)>,
        K: Hash + Eq + Ord,
        R: Reducer<V>,
    {
        let mut entries: Vec<(K, R::Output)> = self.reduce_groups(rows, key_fn);
        entries.sort_by(|a, b| self.order.compare(&a.0, &b.0));
        collect_ranked(entries, self.limit)
    }

    /// Steps 1 and 2: partition by key in first-seen order, then reduce.
    fn reduce_groups<T, K, V, F>(
        &self,
        rows: impl IntoIterator<Item = T>,
        mut key_fn: F,
    ) -> Vec<(K, R::Output)>
    where
        F: FnMut(T) -> Option<(K, V)>,
        K: Hash + Eq,
        R: Reducer<V>,
    {
        let mut groups: IndexMap<K, Vec<V>> = IndexMap::new();
        let mut skipped = 0usize;

        for row in rows {
            match key_fn(row) {
                Some((key, value)) => groups.entry(key).or_insert_with(Vec::new).push(value),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} rows without a group key", skipped);
        }

        groups
            .into_iter()
            .map(|(key, values)| {
                let score = self.reducer.reduce(&values);
                (key, score)
            })
            .collect()
    }
}

/// Rank already-reduced `(key, score)` entries.
///
/// This is step 3 and 4 on their own, for callers whose scores come from
/// materialized records rather than grouped rows. If a key appears more than
/// once, its best-ranked entry is kept.
pub fn rank_entries<K, V>(
    entries: impl IntoIterator<Item = (K, V)>,
    order: Order,
    limit: Option<usize>,
) -> RankedResult<K, V>
where
    K: Hash + Eq,
    V: PartialOrd,
{
    let mut entries: Vec<(K, V)> = entries.into_iter().collect();
    // Rust concept: `sort_by` is a stable sort, so ties keep their input order
    entries.sort_by(|a, b| order.compare(&a.1, &b.1));
    collect_ranked(entries, limit)
}

fn collect_ranked<K, V>(entries: Vec<(K, V)>, limit: Option<usize>) -> RankedResult<K, V>
where
    K: Hash + Eq,
{
    let mut ranked = IndexMap::with_capacity(limit.unwrap_or(entries.len()).min(entries.len()));
    for (key, value) in entries {
        if limit.is_some_and(|limit| ranked.len() >= limit) {
            break;
        }
        ranked.entry(key).or_insert(value);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducers::{Count, Mean, SampleVariance};

    #[test]
    fn test_count_descending() {
        let rows = vec!["a", "b", "a", "c", "a", "b"];
        let ranked = Ranker::new(Count).rank(rows, |s| Some((s, ())));

        let entries: Vec<_> = ranked.into_iter().collect();
        assert_eq!(entries, vec![("a", 3), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let rows = vec!["z", "y", "x", "y", "z", "x"];
        let ranked = Ranker::new(Count).rank(rows, |s| Some((s, ())));

        let keys: Vec<_> = ranked.keys().copied().collect();
        assert_eq!(keys, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_limit_truncates() {
        let rows = vec![1, 2, 2, 3, 3, 3];
        let ranked = Ranker::new(Count).with_limit(2).rank(rows, |n| Some((n, ())));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked.get_index(0), Some((&3, &3)));

        let rows = vec![1, 2];
        let ranked = Ranker::new(Count).with_limit(10).rank(rows, |n| Some((n, ())));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_ascending_mean() {
        let rows = vec![("m1", 4.0), ("m2", 1.0), ("m1", 2.0)];
        let ranked = Ranker::new(Mean)
            .with_order(Order::Ascending)
            .rank(rows, |(k, v)| Some((k, v)));

        let entries: Vec<_> = ranked.into_iter().collect();
        assert_eq!(entries, vec![("m2", 1.0), ("m1", 3.0)]);
    }

    #[test]
    fn test_join_miss_rows_are_skipped() {
        let rows = vec![(1, 4.0), (99, 5.0), (1, 2.0)];
        let ranked = Ranker::new(SampleVariance).rank(rows, |(id, v)| {
            if id == 99 { None } else { Some((id, v)) }
        });
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[&1], 2.0);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<(u32, f64)> = Vec::new();
        let ranked = Ranker::new(Mean).with_limit(5).rank(rows, Some);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_by_key() {
        let rows = vec!["4.0", "10", "2.5", "4.0"];
        let ranked = Ranker::new(Count)
            .with_order(Order::Ascending)
            .rank_by_key(rows, |s| Some((s.to_string(), ())));

        let keys: Vec<_> = ranked.keys().cloned().collect();
        // Lexicographic, so "10" sorts before "2.5"
        assert_eq!(keys, vec!["10", "2.5", "4.0"]);
        assert_eq!(ranked["4.0"], 2);
    }

    #[test]
    fn test_rank_entries_keeps_best_duplicate() {
        let entries = vec![("a", 1), ("b", 5), ("a", 7)];
        let ranked = rank_entries(entries, Order::Descending, None);
        let entries: Vec<_> = ranked.into_iter().collect();
        assert_eq!(entries, vec![("a", 7), ("b", 5)]);
    }

    #[test]
    fn test_descending_values_non_increasing() {
        let rows: Vec<(u32, f64)> = (0..50).map(|i| (i % 7, (i * 13 % 11) as f64)).collect();
        let ranked = Ranker::new(Mean).with_limit(4).rank(rows, Some);

        assert!(ranked.len() <= 4);
        let values: Vec<f64> = ranked.values().copied().collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }
}
