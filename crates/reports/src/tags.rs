//! Reports over tags.csv.

use data_loader::TagStore;
use ranking::{Count, MaxLength, RankedResult, Ranker};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::features::{char_length, distinct_tags, word_count};

/// Tag reports. Length-based reports look at each distinct tag text once.
#[derive(Debug, Clone)]
pub struct Tags {
    store: Arc<TagStore>,
}

impl Tags {
    /// Load tags.csv; a missing file leaves the reports empty
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(TagStore::open(path)))
    }

    pub fn new(store: Arc<TagStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TagStore {
        &self.store
    }

    /// Top `n` distinct tags by number of words
    pub fn most_words(&self, n: usize) -> RankedResult<String, usize> {
        Ranker::new(MaxLength)
            .with_limit(n)
            .rank(distinct_tags(self.store.iter()), |text| {
                Some((text.to_string(), word_count(text)))
            })
    }

    /// Top `n` distinct tags by number of characters
    pub fn longest(&self, n: usize) -> Vec<String> {
        Ranker::new(MaxLength)
            .with_limit(n)
            .rank(distinct_tags(self.store.iter()), |text| {
                Some((text.to_string(), char_length(text)))
            })
            .into_keys()
            .collect()
    }

    /// Tags that are both in the top `n` by words and the top `n` by length,
    /// in word-count rank order
    pub fn most_words_and_longest(&self, n: usize) -> Vec<String> {
        let longest: HashSet<String> = self.longest(n).into_iter().collect();
        self.most_words(n)
            .into_keys()
            .filter(|text| longest.contains(text))
            .collect()
    }

    /// Top `n` tags by how many times they were applied
    pub fn most_popular(&self, n: usize) -> RankedResult<String, usize> {
        Ranker::new(Count)
            .with_limit(n)
            .rank(self.store.iter(), |tag| Some((tag.text.clone(), ())))
    }

    /// Distinct tags containing `word`, ignoring case, sorted alphabetically
    pub fn tags_with(&self, word: &str) -> Vec<String> {
        let needle = word.to_lowercase();
        let mut matches: Vec<String> = distinct_tags(self.store.iter())
            .into_iter()
            .filter(|text| text.to_lowercase().contains(&needle))
            .map(str::to_string)
            .collect();
        matches.sort();
        matches
    }
}
