//! HTTP client for an external sentence-embedding server.

use crate::{EncoderConfig, EncoderError, PhraseEncoder, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9010/embed";

pub struct HttpEncoder {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

// Expected response: { "embeddings": [[f32, ...], ...] } in request order
#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl HttpEncoder {
    pub fn new(config: &EncoderConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| EncoderError::Backend(e.to_string()))?;
        tracing::info!("http phrase encoder targeting {}", endpoint);
        Ok(Self { endpoint, client })
    }
}

impl PhraseEncoder for HttpEncoder {
    fn name(&self) -> &str {
        "http"
    }

    fn encode(&self, phrase: &str) -> Result<Vec<f32>> {
        let mut out = self.encode_batch(&[phrase])?;
        out.pop().ok_or(EncoderError::CountMismatch {
            expected: 1,
            got: 0,
        })
    }

    fn encode_batch(&self, phrases: &[&str]) -> Result<Vec<Vec<f32>>> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { inputs: phrases })
            .send()
            .map_err(|e| EncoderError::Io(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EncoderError::Backend(format!("HTTP {}", resp.status())));
        }

        let body: EmbedResponse = resp
            .json()
            .map_err(|e| EncoderError::Malformed(e.to_string()))?;
        if body.embeddings.len() != phrases.len() {
            return Err(EncoderError::CountMismatch {
                expected: phrases.len(),
                got: body.embeddings.len(),
            });
        }
        Ok(body.embeddings)
    }
}
