use crate::{normalize_phrase, EncoderError, HashedEncoder, PhraseEncoder, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scriptable encoder for tests and demos.
///
/// Phrases are hashed like `HashedEncoder`, except that an aliased phrase is
/// encoded as its alias target, so "destroy" can be made to land exactly on
/// "break". Phrases registered with `failing_on` return a backend error.
pub struct MockEncoder {
    inner: HashedEncoder,
    aliases: HashMap<String, String>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl MockEncoder {
    pub fn new(dimensions: usize) -> Result<Self> {
        Ok(Self {
            inner: HashedEncoder::new(dimensions)?,
            aliases: HashMap::new(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn with_alias(mut self, phrase: &str, encode_as: &str) -> Self {
        self.aliases
            .insert(normalize_phrase(phrase), encode_as.to_string());
        self
    }

    pub fn failing_on(mut self, phrase: &str) -> Self {
        self.failing.insert(normalize_phrase(phrase));
        self
    }

    /// Number of phrases encoded so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PhraseEncoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    fn encode(&self, phrase: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let key = normalize_phrase(phrase);
        if self.failing.contains(&key) {
            return Err(EncoderError::Backend(format!(
                "mock failure for '{}'",
                phrase
            )));
        }
        match self.aliases.get(&key) {
            Some(target) => self.inner.encode(target),
            None => self.inner.encode(phrase),
        }
    }
}
