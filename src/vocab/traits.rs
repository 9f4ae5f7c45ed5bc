// Text encoder trait — the swap-ready abstraction.
//
// The default implementation runs a local ONNX CLIP text encoder. Keeping
// the seam a trait lets tests stub the encoder and leaves room for other
// backends without touching the export path.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for encoding words into fixed-width embedding vectors.
/// Implementations are async because inference is offloaded from the
/// runtime (spawn_blocking for local models).
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Encode a batch of words, returning one embedding per word in order.
    async fn encode_batch(&self, words: &[String]) -> Result<Vec<Vec<f32>>>;

    /// The embedding width this encoder is expected to produce, when known
    /// ahead of inference (from the model metadata table).
    fn expected_dim(&self) -> Option<usize>;
}
