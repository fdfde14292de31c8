use crate::min_table::MinTable;
use crate::shard_store::ShardStore;

/// Tier-2: bounded buffer between the aggregation cache and the shard store.
///
/// Holds at most `shard_count` entries, the hottest words seen at the tier
/// boundary. Colder words go to disk through the shard merge; a disk-resident
/// word whose merged total climbs above the buffer's current floor is pulled
/// back in, displacing the current coldest entry.
pub struct PromotionBuffer {
    table: MinTable,
    capacity: usize,
}

impl PromotionBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "promotion buffer capacity must be at least 1");
        Self {
            table: MinTable::new(),
            capacity,
        }
    }

    /// Accept a count evicted from Tier-1 (or arriving from a merge), keeping
    /// the buffer within capacity. No count is ever dropped: it lands in the
    /// buffer or in a shard partition.
    pub fn promote(&mut self, word: &str, value: u64, store: &ShardStore) {
        if self.table.bump(word, value) {
            return;
        }
        if self.table.len() < self.capacity {
            self.table.insert(word.to_string(), value);
            return;
        }
        // Full and the word is not resident: the current minimum is the
        // victim and also the floor for the incoming word's shard merge.
        let (victim, victim_value) = self
            .table
            .pop_min()
            .expect("capacity is at least 1, so a full buffer has a minimum");
        let promoted = store.merge(word, value, victim_value);
        if promoted > 0 {
            // The incoming word's merged total beats the floor: it takes the
            // victim's slot and the victim goes to disk for good.
            store.persist(&victim, victim_value);
            self.table.insert(word.to_string(), promoted);
        } else {
            // Absorbed into its shard; the victim keeps its slot.
            self.table.insert(victim, victim_value);
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn store(shard_count: usize) -> (tempfile::TempDir, ShardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ShardStore::new(dir.path(), shard_count).unwrap();
        (dir, store)
    }

    #[test]
    fn test_fills_to_capacity_without_touching_disk() {
        let (_dir, store) = store(2);
        let mut buffer = PromotionBuffer::new(2);
        buffer.promote("a", 5, &store);
        buffer.promote("b", 3, &store);
        assert_eq!(buffer.len(), 2);
        assert!(store.load(0).is_empty());
        assert!(store.load(1).is_empty());
    }

    #[test]
    fn test_resident_word_is_summed_in_place() {
        let (_dir, store) = store(2);
        let mut buffer = PromotionBuffer::new(2);
        buffer.promote("a", 5, &store);
        buffer.promote("a", 4, &store);
        assert_eq!(buffer.get("a"), Some(9));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_cold_word_is_absorbed_and_victim_reinserted() {
        let (_dir, store) = store(1);
        let mut buffer = PromotionBuffer::new(1);
        buffer.promote("hot", 10, &store);
        // 2 does not beat the floor of 10, so it goes to disk and the
        // membership of the buffer is unchanged.
        buffer.promote("cold", 2, &store);
        assert_eq!(buffer.get("hot"), Some(10));
        assert_eq!(buffer.get("cold"), None);
        assert_eq!(store.load(0).get("cold"), Some(&2));
    }

    #[test]
    fn test_hot_word_displaces_minimum_which_is_persisted() {
        let (_dir, store) = store(1);
        let mut buffer = PromotionBuffer::new(1);
        buffer.promote("old", 4, &store);
        buffer.promote("new", 7, &store);
        assert_eq!(buffer.get("new"), Some(7));
        assert_eq!(buffer.get("old"), None);
        assert_eq!(store.load(0).get("old"), Some(&4));
        assert!(store.load(0).get("new").is_none());
    }

    #[test]
    fn test_disk_resident_word_is_promoted_back_when_total_beats_floor() {
        let (_dir, store) = store(1);
        let mut buffer = PromotionBuffer::new(1);
        buffer.promote("resident", 10, &store);
        // Absorbed: disk now holds warm=6.
        buffer.promote("warm", 6, &store);
        assert_eq!(store.load(0).get("warm"), Some(&6));
        // 6 + 5 = 11 beats the floor of 10: warm comes back, resident goes out.
        buffer.promote("warm", 5, &store);
        assert_eq!(buffer.get("warm"), Some(11));
        assert_eq!(buffer.get("resident"), None);
        let partition = store.load(0);
        assert_eq!(partition.get("resident"), Some(&10));
        assert!(partition.get("warm").is_none());
    }

    #[test]
    fn test_merged_total_equal_to_floor_stays_on_disk() {
        let (_dir, store) = store(1);
        let mut buffer = PromotionBuffer::new(1);
        buffer.promote("floor", 10, &store);
        buffer.promote("edge", 4, &store);
        // 4 + 6 = 10 does not strictly exceed the floor of 10.
        buffer.promote("edge", 6, &store);
        assert_eq!(buffer.get("floor"), Some(10));
        assert_eq!(store.load(0).get("edge"), Some(&10));
    }

    #[test]
    fn test_bound_and_conservation_over_many_promotions() {
        let (_dir, store) = store(3);
        let mut buffer = PromotionBuffer::new(3);
        let mut expected: std::collections::HashMap<String, u64> = std::collections::HashMap::new();
        for (i, value) in [5u64, 1, 9, 2, 7, 3, 8, 4, 6, 1, 9, 2].iter().enumerate() {
            let word = format!("w{}", i % 7);
            *expected.entry(word.clone()).or_insert(0) += value;
            buffer.promote(&word, *value, &store);
            assert!(buffer.len() <= 3);
        }
        let mut totals: std::collections::HashMap<String, u64> = std::collections::HashMap::new();
        for (word, count) in buffer.iter() {
            *totals.entry(word.to_string()).or_insert(0) += count;
        }
        for shard in 0..3 {
            for (word, count) in store.load(shard) {
                *totals.entry(word).or_insert(0) += count;
            }
        }
        assert_eq!(totals, expected);
    }
}
