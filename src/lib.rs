pub mod aggregation_cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod min_table;
pub mod pipeline;
pub mod promotion_buffer;
pub mod results_db;
pub mod shard_store;
pub mod source;
pub mod types;
pub mod worker_client;

pub use error::*;
pub use types::*;
