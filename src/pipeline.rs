use crate::aggregation_cache::AggregationCache;
use crate::config::RunConfig;
use crate::dispatcher::Dispatcher;
use crate::error::TallyError;
use crate::extractor;
use crate::promotion_buffer::PromotionBuffer;
use crate::shard_store::ShardStore;
use crate::source;
use crate::worker_client::WorkerClient;
use tracing::{info, instrument};

/// Drive one aggregation run end to end: read the document list, dispatch it
/// batch by batch through the worker pool into the tiers, then extract the
/// final ranking from the shards and residual tiers.
#[instrument(skip_all)]
pub async fn run<C: WorkerClient>(config: &RunConfig, client: C) -> Result<Vec<(String, u64)>, TallyError> {
    config.validate()?;
    let documents = source::read_documents(&config.document_list)?;
    info!(
        documents = documents.len(),
        workers = config.worker_addresses.len(),
        shards = config.shard_count,
        "starting aggregation run"
    );

    let store = ShardStore::new(&config.shard_dir, config.shard_count)?;
    let mut cache = AggregationCache::new(config.cache_capacity);
    let mut buffer = PromotionBuffer::new(config.shard_count);
    let dispatcher = Dispatcher::new(client, config.worker_addresses.clone());
    dispatcher.run(&documents, &mut cache, &mut buffer, &store).await?;

    let ranked = extractor::extract(&store, cache, buffer, config.top_per_shard);
    info!(words = ranked.len(), "aggregation run complete");
    Ok(ranked)
}
