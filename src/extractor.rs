use crate::aggregation_cache::AggregationCache;
use crate::promotion_buffer::PromotionBuffer;
use crate::shard_store::ShardStore;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Serializes a ranking as a word -> count JSON object, emitting entries in
/// ranking order so the result document reads top-down by count.
pub struct Ranking<'a>(pub &'a [(String, u64)]);

impl Serialize for Ranking<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, count) in self.0 {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// Produce the final ranking after aggregation completes.
///
/// Scans every shard partition in id order, destructively extracting up to
/// `per_shard_limit` entries from each, then folds in the residual Tier-1 and
/// Tier-2 entries so no merged count is lost. The result holds at most
/// `shard_count * per_shard_limit` shard entries plus residuals; truncating
/// to a smaller top-N is the caller's business.
///
/// Ordering: count descending, then first-seen container (shards in id
/// order, residual tiers last), then word. A word split across containers is
/// summed under its first-seen position.
pub fn extract(
    store: &ShardStore,
    cache: AggregationCache,
    buffer: PromotionBuffer,
    per_shard_limit: usize,
) -> Vec<(String, u64)> {
    // word -> (total, first-seen container rank)
    let mut totals: FxHashMap<String, (u64, usize)> = FxHashMap::default();
    let mut note = |word: String, count: u64, rank: usize| {
        let entry = totals.entry(word).or_insert((0, rank));
        entry.0 += count;
        entry.1 = entry.1.min(rank);
    };

    for shard in 0..store.shard_count() {
        for (word, count) in store.extract_top(shard, per_shard_limit) {
            note(word, count, shard);
        }
    }
    let residual_rank = store.shard_count();
    for (word, count) in cache.into_entries().into_iter().chain(buffer.into_entries()) {
        note(word, count, residual_rank);
    }

    totals
        .into_iter()
        .map(|(word, (count, rank))| (word, count, rank))
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)).then(a.0.cmp(&b.0)))
        .map(|(word, count, _)| (word, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures(shard_count: usize) -> (tempfile::TempDir, ShardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ShardStore::new(dir.path(), shard_count).unwrap();
        (dir, store)
    }

    #[test]
    fn test_ranks_shard_entries_by_count_descending() {
        let (_dir, store) = fixtures(2);
        store.persist("one", 1);
        store.persist("nine", 9);
        store.persist("five", 5);
        let ranked = extract(&store, AggregationCache::new(4), PromotionBuffer::new(2), 5);
        let counts: Vec<u64> = ranked.iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, vec![9, 5, 1]);
    }

    #[test]
    fn test_per_shard_limit_leaves_remainder_on_disk() {
        let (_dir, store) = fixtures(1);
        for (word, count) in [("a", 9), ("b", 8), ("c", 7), ("d", 6)] {
            store.persist(word, count);
        }
        let ranked = extract(&store, AggregationCache::new(4), PromotionBuffer::new(1), 2);
        assert_eq!(ranked, vec![("a".to_string(), 9), ("b".to_string(), 8)]);
        let remainder = store.load(0);
        assert_eq!(remainder.get("c"), Some(&7));
        assert_eq!(remainder.get("d"), Some(&6));
    }

    #[test]
    fn test_residual_tier_entries_are_included() {
        let (_dir, store) = fixtures(2);
        store.persist("disk", 4);
        let mut cache = AggregationCache::new(4);
        let mut buffer = PromotionBuffer::new(2);
        cache.merge("hot", 10, &mut buffer, &store);
        buffer.promote("warm", 6, &store);
        let ranked = extract(&store, cache, buffer, 5);
        assert_eq!(
            ranked,
            vec![
                ("hot".to_string(), 10),
                ("warm".to_string(), 6),
                ("disk".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_word_split_across_containers_is_summed() {
        let (_dir, store) = fixtures(1);
        store.persist("word", 3);
        let mut cache = AggregationCache::new(4);
        let mut buffer = PromotionBuffer::new(1);
        cache.merge("word", 2, &mut buffer, &store);
        let ranked = extract(&store, cache, buffer, 5);
        assert_eq!(ranked, vec![("word".to_string(), 5)]);
    }

    #[test]
    fn test_ranking_serializes_as_object_in_ranking_order() {
        let entries = vec![
            ("quick".to_string(), 5),
            ("the".to_string(), 4),
            ("a".to_string(), 2),
        ];
        let json = serde_json::to_string(&Ranking(&entries)).unwrap();
        assert_eq!(json, r#"{"quick":5,"the":4,"a":2}"#);
    }

    #[test]
    fn test_ties_order_by_shard_then_word() {
        let (_dir, store) = fixtures(4);
        // All equal counts: order must be deterministic regardless of which
        // shard each word hashes to.
        for word in ["kilo", "lima", "mike"] {
            store.persist(word, 7);
        }
        let first = extract(&store, AggregationCache::new(2), PromotionBuffer::new(4), 5);
        for word in ["kilo", "lima", "mike"] {
            store.persist(word, 7);
        }
        let second = extract(&store, AggregationCache::new(2), PromotionBuffer::new(4), 5);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
