use crate::min_table::MinTable;
use crate::promotion_buffer::PromotionBuffer;
use crate::shard_store::ShardStore;

/// Tier-1: bounded cache that accumulates word counts across dispatch
/// batches. On overflow it frees exactly one slot by draining the current
/// minimum entry into the promotion buffer; entries are never dropped any
/// other way.
pub struct AggregationCache {
    table: MinTable,
    capacity: usize,
}

impl AggregationCache {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "aggregation cache capacity must be at least 1");
        Self {
            table: MinTable::new(),
            capacity,
        }
    }

    /// Add `delta` to the word's count, evicting through `buffer` first if
    /// the word is new and the cache is full.
    pub fn merge(&mut self, word: &str, delta: u64, buffer: &mut PromotionBuffer, store: &ShardStore) {
        if self.table.bump(word, delta) {
            return;
        }
        if self.table.len() == self.capacity {
            let (victim, victim_value) = self
                .table
                .pop_min()
                .expect("capacity is at least 1, so a full cache has a minimum");
            buffer.promote(&victim, victim_value, store);
        }
        self.table.insert(word.to_string(), delta);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.table.get(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.table.iter()
    }

    /// Residual entries at end of run, for the extractor.
    pub fn into_entries(self) -> Vec<(String, u64)> {
        self.table.into_entries()
    }
}
