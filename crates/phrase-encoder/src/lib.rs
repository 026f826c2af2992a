//! phrase-encoder: phrase embedding backends behind a single trait
//!
//! The mapper only needs `phrase -> Vec<f32>`. Backends:
//! - `HashedEncoder`: deterministic hashed n-gram vectors, no model files
//! - `MockEncoder`: scriptable aliases and failures for tests (feature `mock`)
//! - `HttpEncoder`: remote sentence-embedding server (feature `http`)

mod error;
pub use error::{EncoderError, Result};

mod types;
pub use types::EncoderConfig;

mod traits;
pub use traits::PhraseEncoder;

mod hashed;
pub use hashed::{normalize_phrase, HashedEncoder, DEFAULT_DIMENSIONS};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::MockEncoder;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::HttpEncoder;

pub mod plugin;
pub use plugin::{new_encoder_backend, EncoderBackendKind};

/// Initialize the phrase encoder system
pub fn init() -> Result<()> {
    tracing::info!("Initializing phrase encoder system");
    Ok(())
}
