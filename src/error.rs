use thiserror::Error;

pub type GraphicResult<T> = Result<T, GraphicError>;

#[derive(Debug, Error)]
pub enum GraphicError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("chart host rejected update: {0}")]
    Host(String),

    #[error("failed to serialize graphic payload: {0}")]
    Serialization(#[from] serde_json::Error),
}
