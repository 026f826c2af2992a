//! Mapper configuration, loadable from YAML

use crate::similarity::DEFAULT_THRESHOLD;
use crate::{MapperError, Result, SegmentMode};
use anyhow::Context;
use phrase_encoder::EncoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_PATH: &str = "prediction_output.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Minimum cosine similarity for a vocabulary match (inclusive)
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f32,
    #[serde(default)]
    pub segment_mode: SegmentMode,
    #[serde(default)]
    pub encoder: EncoderConfig,
    /// Control catalog YAML; the built-in catalog when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_threshold(),
            segment_mode: SegmentMode::default(),
            encoder: EncoderConfig::default(),
            catalog_path: None,
            output_path: default_output_path(),
        }
    }
}

impl MapperConfig {
    pub fn validate(&self) -> Result<()> {
        let t = self.similarity_threshold;
        if !t.is_finite() || !(-1.0..=1.0).contains(&t) {
            return Err(MapperError::Config(format!(
                "similarity_threshold must be within [-1, 1], got {}",
                t
            )));
        }
        if self.encoder.dimensions == 0 {
            return Err(MapperError::Config(
                "encoder.dimensions must be positive".into(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(MapperError::Config("output_path is empty".into()));
        }
        Ok(())
    }
}

pub fn load_config_file(path: impl AsRef<Path>) -> anyhow::Result<MapperConfig> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
    let config: MapperConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating config: {}", path.display()))?;
    Ok(config)
}
