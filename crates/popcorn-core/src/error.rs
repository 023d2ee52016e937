use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopcornError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid rating {0}: must be between 1 and 10")]
    InvalidRating(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
