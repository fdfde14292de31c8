use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use tally::config::RunConfig;
use tally::extractor::Ranking;
use tally::worker_client::HttpWorkerClient;
use tally::{pipeline, results_db, TallyError};
use tracing_subscriber::EnvFilter;

/// Distributed word-frequency aggregation coordinator: dispatches a document
/// list to a worker pool and prints the ranked word counts as JSON.
#[derive(Parser)]
#[command(name = "tally")]
struct Args {
    /// File with one document identifier per line
    #[arg(long, default_value = "urls.txt")]
    urls: PathBuf,

    /// Directory for the shard partition files
    #[arg(long, default_value = "./tally_state/shards")]
    shard_dir: PathBuf,

    /// Number of shard partitions (also the Tier-2 capacity)
    #[arg(long, default_value_t = 8)]
    shard_count: usize,

    /// Tier-1 capacity
    #[arg(long, default_value_t = 1000)]
    cache_capacity: usize,

    /// Worker endpoint, repeatable; batch size equals the pool size
    #[arg(long = "worker", required = true)]
    workers: Vec<String>,

    /// Entries extracted per shard for the final ranking
    #[arg(long, default_value_t = 5)]
    top_per_shard: usize,

    /// Postgres URL to also persist the ranking into (or DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), TallyError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = RunConfig {
        document_list: args.urls,
        shard_dir: args.shard_dir,
        shard_count: args.shard_count,
        cache_capacity: args.cache_capacity,
        worker_addresses: args.workers,
        top_per_shard: args.top_per_shard,
        database_url: args.database_url.or_else(|| std::env::var("DATABASE_URL").ok()),
    };

    let ranking = pipeline::run(&config, HttpWorkerClient::new()).await?;

    // Word -> count document, descending by count.
    println!("{}", serde_json::to_string_pretty(&Ranking(&ranking))?);

    if let Some(url) = &config.database_url {
        results_db::persist_ranking(url, &ranking)?;
        tracing::info!(words = ranking.len(), "ranking persisted to database");
    }

    Ok(())
}
