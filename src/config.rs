use crate::error::TallyError;
use std::path::PathBuf;

/// Configuration for one aggregation run. Everything is injected here
/// (shard layout, tier capacities, pool addresses) rather than read from
/// ambient globals, so runs against different partition sets can coexist in
/// one process's tests.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// File holding one document identifier per line.
    pub document_list: PathBuf,
    /// Directory holding the `<shard_id>.json` partition files.
    pub shard_dir: PathBuf,
    /// Number of shard partitions; also the Tier-2 capacity.
    pub shard_count: usize,
    /// Tier-1 capacity.
    pub cache_capacity: usize,
    /// Worker endpoints; batch size equals pool size.
    pub worker_addresses: Vec<String>,
    /// Entries destructively extracted per shard for the final ranking.
    pub top_per_shard: usize,
    /// Optional relational sink for the final ranking.
    pub database_url: Option<String>,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), TallyError> {
        if self.shard_count == 0 {
            return Err(TallyError::Config("shard count must be at least 1".to_string()));
        }
        if self.cache_capacity == 0 {
            return Err(TallyError::Config("cache capacity must be at least 1".to_string()));
        }
        if self.worker_addresses.is_empty() {
            return Err(TallyError::Config("worker pool must not be empty".to_string()));
        }
        Ok(())
    }
}
