//! Nearest-neighbour phrase resolution with confidence rejection

use phrase_encoder::PhraseEncoder;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Minimum cosine similarity for a match
pub const DEFAULT_THRESHOLD: f32 = 0.20;

/// Sentinel written to the document when nothing matched
pub const NO_MATCH: &str = "none";

/// Outcome of resolving one phrase against a vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Matched { phrase: String, score: f32 },
    /// Best candidate scored below the threshold
    LowConfidence { best: String, score: f32 },
    NoCandidates,
    ProviderUnavailable { reason: String },
}

impl Resolution {
    /// Matched phrase, or `"none"`
    pub fn label(&self) -> &str {
        match self {
            Resolution::Matched { phrase, .. } => phrase,
            _ => NO_MATCH,
        }
    }
}

/// Cosine similarity, `None` when the vectors differ in length.
/// A zero vector has similarity 0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return Some(0.0);
    }
    let sim = dot / (na.sqrt() * nb.sqrt());
    if sim.is_nan() {
        Some(-1.0)
    } else {
        Some(sim.clamp(-1.0, 1.0))
    }
}

#[derive(Clone)]
pub struct SimilarityResolver {
    encoder: Arc<dyn PhraseEncoder>,
    threshold: f32,
}

impl SimilarityResolver {
    pub fn new(encoder: Arc<dyn PhraseEncoder>, threshold: f32) -> Self {
        Self { encoder, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// String form: the best candidate, or `"none"` for no candidates, a
    /// score below the threshold, or an encoder failure.
    pub fn resolve<S: AsRef<str>>(&self, target: &str, candidates: &[S]) -> String {
        self.resolve_detailed(target, candidates).label().to_string()
    }

    pub fn resolve_detailed<S: AsRef<str>>(&self, target: &str, candidates: &[S]) -> Resolution {
        if candidates.is_empty() {
            return Resolution::NoCandidates;
        }

        let target_vec = match self.encoder.encode(target) {
            Ok(v) => v,
            Err(e) => {
                warn!("encoder failed on '{}': {}", target, e);
                return Resolution::ProviderUnavailable {
                    reason: e.to_string(),
                };
            }
        };
        let phrases: Vec<&str> = candidates.iter().map(AsRef::as_ref).collect();
        let candidate_vecs = match self.encoder.encode_batch(&phrases) {
            Ok(v) if v.len() == phrases.len() => v,
            Ok(v) => {
                return Resolution::ProviderUnavailable {
                    reason: format!("expected {} embeddings, got {}", phrases.len(), v.len()),
                }
            }
            Err(e) => {
                warn!("encoder failed on vocabulary for '{}': {}", target, e);
                return Resolution::ProviderUnavailable {
                    reason: e.to_string(),
                };
            }
        };

        // Strict `>` keeps the first candidate on ties
        let mut best: Option<(usize, f32)> = None;
        for (idx, vec) in candidate_vecs.iter().enumerate() {
            let Some(score) = cosine_similarity(&target_vec, vec) else {
                return Resolution::ProviderUnavailable {
                    reason: format!(
                        "embedding length mismatch: {} vs {}",
                        target_vec.len(),
                        vec.len()
                    ),
                };
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        let Some((idx, score)) = best else {
            return Resolution::NoCandidates;
        };
        let phrase = phrases[idx].to_string();
        debug!("'{}' -> '{}' ({:.4})", target, phrase, score);
        if score < self.threshold {
            Resolution::LowConfidence { best: phrase, score }
        } else {
            Resolution::Matched { phrase, score }
        }
    }
}
