// Local ONNX CLIP text encoder.
//
// Loads `model.onnx` + `tokenizer.json` from the per-model directory and
// produces one embedding per input word. Runs entirely locally — no API
// calls. Accepts both export flavors found in the wild: models that emit
// a pooled [batch, dim] embedding and models that emit the full
// [batch, seq, dim] hidden state (pooled here at the end-of-text token).

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::builder::SessionBuilder;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::traits::TextEncoder;

/// CLIP text encoder backed by a local ONNX session.
pub struct ClipTextEncoder {
    // Arc+Mutex because ort::Session::run takes &mut self and
    // spawn_blocking needs 'static shared ownership. Inference is
    // serialized through spawn_blocking, so contention is minimal.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    expected_dim: Option<usize>,
}

impl ClipTextEncoder {
    /// Load the encoder for `model` from `model_dir/<model>/`.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in that directory. For
    /// models with a prebuilt export, `sieve download-model` fetches them;
    /// anything else can be placed there by hand.
    pub fn load(model_dir: &Path, model: &str, force_cpu: bool) -> Result<Self> {
        let dir = super::download::encoder_dir(model_dir, model);
        let model_path = dir.join("model.onnx");
        let tokenizer_path = dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Encoder model not found: {}\n\
                 Run `sieve download-model {}` to download it, or place\n\
                 model.onnx and tokenizer.json there manually.",
                model_path.display(),
                model
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Encoder tokenizer not found: {}\n\
                 Run `sieve download-model {}` to download it.",
                tokenizer_path.display(),
                model
            );
        }

        let builder = Session::builder().context("Failed to create ONNX session builder")?;
        let mut builder = if force_cpu {
            info!("Device: CPU (forced)");
            builder
        } else {
            register_accelerator(builder)?
        };

        let session = builder.commit_from_file(&model_path).with_context(|| {
            format!("Failed to load encoder model from {}", model_path.display())
        })?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        debug!("Loaded CLIP text encoder from {}", dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            expected_dim: crate::config::embedding_dim(model),
        })
    }
}

#[cfg(feature = "cuda")]
fn register_accelerator(builder: SessionBuilder) -> Result<SessionBuilder> {
    let builder = builder
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to register CUDA execution provider")?;
    info!("Device: CUDA");
    Ok(builder)
}

#[cfg(not(feature = "cuda"))]
fn register_accelerator(builder: SessionBuilder) -> Result<SessionBuilder> {
    info!("Device: CPU (built without the cuda feature)");
    Ok(builder)
}

#[async_trait]
impl TextEncoder for ClipTextEncoder {
    /// Tokenize all words, run one forward pass, and pool to one vector
    /// per word. CPU-bound work is offloaded to spawn_blocking so the
    /// async runtime stays responsive.
    async fn encode_batch(&self, words: &[String]) -> Result<Vec<Vec<f32>>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let expected_dim = self.expected_dim;
        let words = words.to_vec();

        tokio::task::spawn_blocking(move || {
            encode_sync(&session, &tokenizer, expected_dim, &words)
        })
        .await
        .context("spawn_blocking panicked")?
    }

    fn expected_dim(&self) -> Option<usize> {
        self.expected_dim
    }
}

/// Synchronous encoding: tokenization, inference, pooling.
fn encode_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    expected_dim: Option<usize>,
    words: &[String],
) -> Result<Vec<Vec<f32>>> {
    let encodings: Vec<_> = words
        .iter()
        .map(|w| {
            tokenizer
                .encode(w.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed for {:?}: {}", w, e))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        anyhow::bail!("Tokenizer produced empty sequences for the whole batch");
    }

    // Pad to max_len: input_ids with 0, attention_mask 1-for-real/0-for-pad.
    let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let ids = enc.get_ids();
        let mask = enc.get_attention_mask();
        let pad_len = max_len - ids.len();

        input_ids_flat.extend(ids.iter().map(|&id| id as i64));
        attention_mask_flat.extend(mask.iter().map(|&m| m as i64));
        input_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
        attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
    }

    let shape = [batch_size as i64, max_len as i64];

    let input_ids_tensor = Tensor::from_array((shape, input_ids_flat.clone()))
        .context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat))
        .context("Failed to create attention_mask tensor")?;

    let (out_dims, out_data) = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            })
            .context("Encoder ONNX inference failed")?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract encoder output tensor")?;

        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        (dims, data.to_vec())
    };

    let embeddings = pool_output(&out_dims, &out_data, &input_ids_flat, batch_size, max_len)?;

    if let Some(dim) = expected_dim {
        let got = embeddings.first().map(|e| e.len()).unwrap_or(0);
        if got != dim {
            anyhow::bail!(
                "Encoder produced {got}-dim embeddings but the model table says {dim}. \
                 Wrong export in the model directory?"
            );
        }
    }

    debug!(
        batch_size,
        dim = embeddings.first().map(|e| e.len()).unwrap_or(0),
        "Encoded word batch"
    );

    Ok(embeddings)
}

/// Reduce the raw model output to one vector per word.
///
/// [batch, dim] outputs are already pooled. [batch, seq, dim] outputs are
/// pooled at the end-of-text position — in CLIP's vocabulary the EOT token
/// has the highest id, so argmax over the input ids finds it (padding is
/// id 0 and never wins).
fn pool_output(
    dims: &[usize],
    data: &[f32],
    input_ids_flat: &[i64],
    batch_size: usize,
    max_len: usize,
) -> Result<Vec<Vec<f32>>> {
    match *dims {
        [b, dim] if b == batch_size => Ok((0..batch_size)
            .map(|i| data[i * dim..(i + 1) * dim].to_vec())
            .collect()),
        [b, seq, dim] if b == batch_size && seq == max_len => {
            let mut embeddings = Vec::with_capacity(batch_size);
            for i in 0..batch_size {
                let row = &input_ids_flat[i * max_len..(i + 1) * max_len];
                let eot = row
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, &id)| id)
                    .map(|(pos, _)| pos)
                    .unwrap_or(0);
                let offset = (i * max_len + eot) * dim;
                embeddings.push(data[offset..offset + dim].to_vec());
            }
            Ok(embeddings)
        }
        _ => anyhow::bail!(
            "Unexpected encoder output shape {:?} for batch of {}",
            dims,
            batch_size
        ),
    }
}
