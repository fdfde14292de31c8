use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Word-count table with an ordered (count, word) index.
///
/// Both in-memory tiers evict by current minimum; the ordered mirror makes
/// victim selection O(log n) instead of a scan over the whole table. Ties on
/// equal counts go to the lexicographically smallest word.
#[derive(Debug, Default)]
pub struct MinTable {
    counts: FxHashMap<String, u64>,
    ordered: BTreeSet<(u64, String)>,
}

impl MinTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    /// Add `delta` to an existing entry. Returns false if the word is not
    /// resident, leaving the table untouched.
    pub fn bump(&mut self, word: &str, delta: u64) -> bool {
        let Some(count) = self.counts.get_mut(word) else {
            return false;
        };
        let old = *count;
        *count += delta;
        let new = *count;
        self.ordered.remove(&(old, word.to_string()));
        self.ordered.insert((new, word.to_string()));
        true
    }

    /// Insert a word that is not currently resident.
    pub fn insert(&mut self, word: String, count: u64) {
        debug_assert!(!self.counts.contains_key(&word));
        self.ordered.insert((count, word.clone()));
        self.counts.insert(word, count);
    }

    /// Remove and return the minimum entry (lowest count, then smallest word).
    pub fn pop_min(&mut self) -> Option<(String, u64)> {
        let (count, word) = self.ordered.pop_first()?;
        self.counts.remove(&word);
        Some((word, count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(word, count)| (word.as_str(), *count))
    }

    pub fn into_entries(self) -> Vec<(String, u64)> {
        self.counts.into_iter().collect()
    }
}
