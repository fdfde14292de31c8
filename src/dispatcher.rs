use crate::aggregation_cache::AggregationCache;
use crate::error::TallyError;
use crate::promotion_buffer::PromotionBuffer;
use crate::shard_store::ShardStore;
use crate::types::FrequencyMap;
use crate::worker_client::WorkerClient;
use tokio::task::JoinSet;
use tracing::debug;

/// Partitions the document list into pool-sized batches and fans each batch
/// out to the worker pool, one concurrent request per document, round-robined
/// across the addresses.
///
/// There is an explicit barrier between batches: every response of a batch is
/// merged into Tier-1 before the next batch is dispatched. The first failed
/// request aborts the run and cancels its in-flight siblings; counts merged
/// from earlier batches are not rolled back.
pub struct Dispatcher<C: WorkerClient> {
    client: C,
    addresses: Vec<String>,
}

impl<C: WorkerClient> Dispatcher<C> {
    pub fn new(client: C, addresses: Vec<String>) -> Self {
        assert!(!addresses.is_empty(), "worker pool must not be empty");
        Self { client, addresses }
    }

    pub async fn run(
        &self,
        documents: &[String],
        cache: &mut AggregationCache,
        buffer: &mut PromotionBuffer,
        store: &ShardStore,
    ) -> Result<(), TallyError> {
        for (batch_index, batch) in documents.chunks(self.addresses.len()).enumerate() {
            let maps = self.dispatch_batch(batch).await?;
            for map in maps {
                for (word, count) in map {
                    cache.merge(&word, count, buffer, store);
                }
            }
            debug!(batch = batch_index, documents = batch.len(), "batch merged");
        }
        Ok(())
    }

    async fn dispatch_batch(&self, batch: &[String]) -> Result<Vec<FrequencyMap>, TallyError> {
        let mut inflight = JoinSet::new();
        for (i, document) in batch.iter().enumerate() {
            let client = self.client.clone();
            let address = self.addresses[i % self.addresses.len()].clone();
            let document = document.clone();
            inflight.spawn(async move { client.fetch_counts(&address, &document).await });
        }
        let mut maps = Vec::with_capacity(batch.len());
        while let Some(joined) = inflight.join_next().await {
            match joined {
                Ok(Ok(map)) => maps.push(map),
                Ok(Err(e)) => {
                    inflight.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    inflight.abort_all();
                    return Err(TallyError::Worker(format!("worker task failed: {}", e)));
                }
            }
        }
        Ok(maps)
    }
}
