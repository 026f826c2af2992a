use thiserror::Error;

pub type Result<T, E = EncoderError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("backend not available: {0}")]
    Unsupported(&'static str),
    #[error("invalid encoder config: {0}")]
    InvalidConfig(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("expected {expected} embeddings, got {got}")]
    CountMismatch { expected: usize, got: usize },
}
