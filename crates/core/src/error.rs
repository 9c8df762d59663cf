use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid note config: {0}")]
    InvalidNoteConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
