use std::fmt;

#[derive(Debug)]
pub enum TallyError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Worker(String),
    Database(String),
    Config(String),
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TallyError::Io(e) => write!(f, "IO error: {}", e),
            TallyError::Serialization(e) => write!(f, "Serialization error: {}", e),
            TallyError::Worker(e) => write!(f, "Worker error: {}", e),
            TallyError::Database(e) => write!(f, "Database error: {}", e),
            TallyError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for TallyError {}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        TallyError::Io(err)
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Serialization(err)
    }
}

impl From<postgres::Error> for TallyError {
    fn from(err: postgres::Error) -> Self {
        TallyError::Database(err.to_string())
    }
}
