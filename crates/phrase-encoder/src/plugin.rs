use crate::{EncoderConfig, EncoderError, HashedEncoder, PhraseEncoder, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderBackendKind {
    #[default]
    Hashed,
    Mock,
    Http,
}

/// Build the configured encoder. Called once at startup; an error here is fatal.
pub fn new_encoder_backend(cfg: &EncoderConfig) -> Result<Arc<dyn PhraseEncoder>> {
    match cfg.backend {
        EncoderBackendKind::Hashed => Ok(Arc::new(HashedEncoder::new(cfg.dimensions)?)),
        EncoderBackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                Ok(Arc::new(crate::MockEncoder::new(cfg.dimensions)?))
            }
            #[cfg(not(feature = "mock"))]
            {
                Err(EncoderError::Unsupported("mock feature not enabled"))
            }
        }
        EncoderBackendKind::Http => {
            #[cfg(feature = "http")]
            {
                Ok(Arc::new(crate::HttpEncoder::new(cfg)?))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(EncoderError::Unsupported("http feature not enabled"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_is_hashed() {
        let enc = new_encoder_backend(&EncoderConfig::default()).unwrap();
        assert_eq!(enc.name(), "hashed");
    }

    #[test]
    fn test_zero_dimensions_is_startup_error() {
        let cfg = EncoderConfig {
            dimensions: 0,
            ..EncoderConfig::default()
        };
        assert!(new_encoder_backend(&cfg).is_err());
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn test_http_requires_feature() {
        let cfg = EncoderConfig {
            backend: EncoderBackendKind::Http,
            ..EncoderConfig::default()
        };
        assert!(matches!(
            new_encoder_backend(&cfg),
            Err(EncoderError::Unsupported(_))
        ));
    }

    #[test]
    fn test_backend_kind_serde() {
        let kind: EncoderBackendKind = serde_json::from_str("\"http\"").unwrap();
        assert_eq!(kind, EncoderBackendKind::Http);
    }
}
