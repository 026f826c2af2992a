use crate::{EncoderBackendKind, DEFAULT_DIMENSIONS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    #[serde(default)]
    pub backend: EncoderBackendKind,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Only used by the http backend
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_dimensions() -> usize {
    DEFAULT_DIMENSIONS
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            backend: EncoderBackendKind::default(),
            dimensions: default_dimensions(),
            endpoint: None,
        }
    }
}
