//! Hashed n-gram phrase vectors.
//!
//! Each phrase becomes a bag of word unigrams, word bigrams and boundary-marked
//! character trigrams, hashed into a fixed number of signed buckets and
//! L2-normalised. Words from a small table of synonym groups also emit a
//! shared concept feature, so "destroy" lands near "break" without a model.
//! Identical phrases (after normalisation) always produce
//! identical vectors, which is all the resolver needs for exact vocabulary hits;
//! near-misses such as "index pinch" vs "index_pinch_hand_closed" share most
//! features and land close together.

use crate::{EncoderError, PhraseEncoder, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;
const TRIGRAM_WEIGHT: f32 = 0.35;
const CONCEPT_WEIGHT: f32 = 1.0;

/// Bucket count used when none is configured. Phrases carry only a few dozen
/// features, so collisions at this width stay far below the match threshold.
pub const DEFAULT_DIMENSIONS: usize = 8192;

// Game-control verbs that users describe in their own words
const CONCEPTS: &[(&str, &[&str])] = &[
    ("break", &["break", "destroy", "smash", "demolish", "wreck"]),
    ("place", &["place", "put", "build", "set"]),
    ("jump", &["jump", "hop", "leap"]),
    ("crouch", &["crouch", "sneak", "duck", "squat"]),
    ("sprint", &["sprint", "dash"]),
    ("attack", &["attack", "hit", "strike", "fight"]),
    ("shoot", &["shoot", "fire"]),
    ("rotate", &["rotate", "turn", "spin"]),
    ("inventory", &["inventory", "items", "bag"]),
    ("accelerate", &["accelerate", "speed", "throttle"]),
];

fn concept_of(token: &str) -> Option<&'static str> {
    CONCEPTS
        .iter()
        .find(|(_, words)| words.contains(&token))
        .map(|(concept, _)| *concept)
}

pub struct HashedEncoder {
    dimensions: usize,
}

impl HashedEncoder {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(EncoderError::InvalidConfig(
                "dimensions must be greater than zero".into(),
            ));
        }
        Ok(Self { dimensions })
    }

    fn add_feature(&self, vec: &mut [f32], feature: &str, weight: f32) {
        let mut hasher = DefaultHasher::new();
        ("idx", feature).hash(&mut hasher);
        let idx = (hasher.finish() % self.dimensions as u64) as usize;

        let mut hasher = DefaultHasher::new();
        ("sign", feature).hash(&mut hasher);
        let sign = if hasher.finish() & 1 == 0 { 1.0 } else { -1.0 };

        vec[idx] += sign * weight;
    }
}

impl PhraseEncoder for HashedEncoder {
    fn name(&self) -> &str {
        "hashed"
    }

    fn encode(&self, phrase: &str) -> Result<Vec<f32>> {
        let mut vec = vec![0.0f32; self.dimensions];
        let normalized = normalize_phrase(phrase);
        let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();

        for token in &tokens {
            self.add_feature(&mut vec, &format!("u:{token}"), UNIGRAM_WEIGHT);
            if let Some(concept) = concept_of(token) {
                self.add_feature(&mut vec, &format!("s:{concept}"), CONCEPT_WEIGHT);
            }

            let marked: Vec<char> = format!("^{token}$").chars().collect();
            for tri in marked.windows(3) {
                let key: String = tri.iter().collect();
                self.add_feature(&mut vec, &format!("c:{key}"), TRIGRAM_WEIGHT);
            }
        }
        for pair in tokens.windows(2) {
            self.add_feature(&mut vec, &format!("b:{}|{}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        l2_normalize(&mut vec);
        Ok(vec)
    }
}

/// Lowercase, treat `_`/punctuation as separators, collapse whitespace.
///
/// Vocabulary entries are file-style keys (`thumb_index_pinch`) while extracted
/// phrases are free text (`thumb index pinch`); both normalise to the same form.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vec {
            *v /= norm;
        }
    }
}
