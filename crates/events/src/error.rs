use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EventError>;
