use crate::Result;

/// Maps a phrase to a fixed-length vector.
///
/// Implementations are loaded once and shared read-only, so `encode` must not
/// mutate observable state.
pub trait PhraseEncoder: Send + Sync {
    fn name(&self) -> &str;

    fn encode(&self, phrase: &str) -> Result<Vec<f32>>;

    /// Batched form; backends with a real batch endpoint override this.
    fn encode_batch(&self, phrases: &[&str]) -> Result<Vec<Vec<f32>>> {
        phrases.iter().map(|p| self.encode(p)).collect()
    }
}
