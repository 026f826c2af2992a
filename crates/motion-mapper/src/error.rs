use phrase_encoder::EncoderError;
use thiserror::Error;

pub type Result<T, E = MapperError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MapperError {
    #[error("unknown entity label: {0}")]
    UnknownLabel(String),
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error("encoder error: {0}")]
    Encoder(#[from] EncoderError),
    #[error("invalid catalog: {0}")]
    Catalog(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
