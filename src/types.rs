use rustc_hash::FxHashMap;

/// Word -> count mapping, produced per document by workers and accumulated
/// by the tiers and shard partitions.
pub type FrequencyMap = FxHashMap<String, u64>;

/// Stable 32-bit polynomial hash over the word's chars.
///
/// Shard assignment must be identical across runs against the same partition
/// set, so this does not use the std hasher (which is randomly seeded).
pub fn word_hash(word: &str) -> u32 {
    let mut hash: u32 = 0;
    for ch in word.chars() {
        hash = hash.wrapping_mul(281) ^ (ch as u32).wrapping_mul(997);
    }
    hash
}
