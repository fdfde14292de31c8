use crate::error::TallyError;
use crate::types::{word_hash, FrequencyMap};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{error, warn};

/// Disk-backed overflow store: one JSON partition file per shard id, each a
/// word -> count object named `<shard_id>.json`.
///
/// Partitions are read and rewritten whole. A single process must own the
/// partition set for the duration of a run; nothing here is synchronized.
/// Per the recovery policy, unreadable or corrupt partitions degrade to an
/// empty mapping (logged, not masked) and write failures are logged and
/// skipped, so persistence is best effort.
pub struct ShardStore {
    dir: PathBuf,
    shard_count: usize,
}

impl ShardStore {
    pub fn new(dir: impl Into<PathBuf>, shard_count: usize) -> Result<Self, TallyError> {
        if shard_count == 0 {
            return Err(TallyError::Config("shard count must be at least 1".to_string()));
        }
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, shard_count })
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    /// Deterministic shard assignment; stable across runs.
    pub fn shard_id(&self, word: &str) -> usize {
        word_hash(word) as usize % self.shard_count
    }

    fn partition_path(&self, shard: usize) -> PathBuf {
        self.dir.join(format!("{}.json", shard))
    }

    /// Load one partition. Missing and empty files are empty mappings;
    /// unreadable or corrupt files degrade to empty with a warning.
    pub fn load(&self, shard: usize) -> FrequencyMap {
        let path = self.partition_path(shard);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return FrequencyMap::default(),
            Err(e) => {
                warn!(shard, error = %e, "unreadable shard partition, treating as empty");
                return FrequencyMap::default();
            }
        };
        if bytes.is_empty() {
            return FrequencyMap::default();
        }
        match serde_json::from_slice(&bytes) {
            Ok(map) => map,
            Err(e) => {
                warn!(shard, error = %e, "corrupt shard partition, treating as empty");
                FrequencyMap::default()
            }
        }
    }

    fn write_partition(&self, shard: usize, partition: &FrequencyMap) -> Result<(), TallyError> {
        let encoded = serde_json::to_vec(partition)?;
        fs::write(self.partition_path(shard), encoded)?;
        Ok(())
    }

    /// Rewrite a partition, logging and continuing on failure. Counts can be
    /// lost here; callers must not assume durability beyond best effort.
    fn store_partition(&self, shard: usize, partition: &FrequencyMap) {
        if let Err(e) = self.write_partition(shard, partition) {
            error!(shard, error = %e, "failed to persist shard partition, counts may be lost");
        }
    }

    /// Merge `value` into the word's partition against a floor value.
    ///
    /// Returns 0 when the total was absorbed into persistent storage. A
    /// positive return is the word's merged total, which the caller must keep
    /// resident: the word either never hit disk (absent and `value > floor`)
    /// or was promoted back out (stored total plus `value` exceeds `floor`,
    /// in which case the entry is removed from the partition).
    pub fn merge(&self, word: &str, value: u64, floor: u64) -> u64 {
        let shard = self.shard_id(word);
        let mut partition = self.load(shard);
        match partition.get(word).copied() {
            None => {
                if value > floor {
                    return value;
                }
                partition.insert(word.to_string(), value);
                self.store_partition(shard, &partition);
                0
            }
            Some(stored) => {
                let merged = stored + value;
                if merged > floor {
                    partition.remove(word);
                    self.store_partition(shard, &partition);
                    merged
                } else {
                    partition.insert(word.to_string(), merged);
                    self.store_partition(shard, &partition);
                    0
                }
            }
        }
    }

    /// Merge `value` into the word's partition unconditionally (a floor no
    /// total can exceed). The word always ends up on disk.
    pub fn persist(&self, word: &str, value: u64) {
        let shard = self.shard_id(word);
        let mut partition = self.load(shard);
        let merged = partition.get(word).copied().unwrap_or(0) + value;
        partition.insert(word.to_string(), merged);
        self.store_partition(shard, &partition);
    }

    /// Destructively extract up to `limit` highest-count entries from one
    /// partition (ties to the smallest word) and persist the remainder.
    pub fn extract_top(&self, shard: usize, limit: usize) -> Vec<(String, u64)> {
        let mut partition = self.load(shard);
        if partition.is_empty() || limit == 0 {
            return Vec::new();
        }
        let mut entries: Vec<(String, u64)> = partition.drain().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let split = limit.min(entries.len());
        let remainder: FrequencyMap = entries.split_off(split).into_iter().collect();
        self.store_partition(shard, &remainder);
        entries
    }
}
