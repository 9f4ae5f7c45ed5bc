// Embedding artifact persistence.
//
// The export format is safetensors: a single f32 tensor named
// `text_embeddings` with shape [n_words, dim], plus `model` and `count`
// metadata. Readable from the Python side via safetensors.torch.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use safetensors::tensor::{Dtype, TensorView};

/// Name of the embedding tensor inside the artifact.
pub const TENSOR_NAME: &str = "text_embeddings";

/// Serialize the embedding matrix to `path`. One file write, no partial
/// output: serialization happens fully in memory first.
pub fn save_embeddings(embeddings: &[Vec<f32>], model: &str, path: &Path) -> Result<()> {
    let n = embeddings.len();
    if n == 0 {
        anyhow::bail!("No embeddings to save");
    }
    let dim = embeddings[0].len();
    for (i, row) in embeddings.iter().enumerate() {
        if row.len() != dim {
            anyhow::bail!(
                "Inconsistent embedding widths: row 0 has {dim}, row {i} has {}",
                row.len()
            );
        }
    }

    let mut bytes: Vec<u8> = Vec::with_capacity(n * dim * 4);
    for row in embeddings {
        for v in row {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
    }

    let view = TensorView::new(Dtype::F32, vec![n, dim], &bytes)
        .context("Failed to build embedding tensor view")?;

    let metadata = HashMap::from([
        ("model".to_string(), model.to_string()),
        ("count".to_string(), n.to_string()),
    ]);

    let data = safetensors::serialize(vec![(TENSOR_NAME.to_string(), view)], &Some(metadata))
        .context("Failed to serialize embeddings")?;

    std::fs::write(path, data)
        .with_context(|| format!("Failed to write embeddings to {}", path.display()))?;

    Ok(())
}
