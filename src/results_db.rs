use crate::error::TallyError;
use postgres::{Client, NoTls};

/// Persist the final ranking into the auxiliary relational store. The table
/// is created on first use; re-running a ranking upserts the counts.
pub fn persist_ranking(database_url: &str, ranking: &[(String, u64)]) -> Result<(), TallyError> {
    let mut client = Client::connect(database_url, NoTls)?;
    client.batch_execute(
        "CREATE TABLE IF NOT EXISTS word_counts (
            word TEXT PRIMARY KEY,
            count BIGINT NOT NULL
        )",
    )?;
    let statement = client.prepare(
        "INSERT INTO word_counts (word, count) VALUES ($1, $2)
         ON CONFLICT (word) DO UPDATE SET count = EXCLUDED.count",
    )?;
    for (word, count) in ranking {
        client.execute(&statement, &[word, &(*count as i64)])?;
    }
    Ok(())
}
