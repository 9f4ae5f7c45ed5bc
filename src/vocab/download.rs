// Encoder model download helper.
//
// Fetches prebuilt ONNX CLIP text encoders from HuggingFace into a
// per-model subdirectory of the model dir. Files are stored in a
// platform-appropriate directory (~/.local/share/sieve/models/ on Linux)
// so they persist across runs. Models without a published ONNX export
// have to be placed there manually.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// HuggingFace repo with the ONNX export of the ViT-B/32 text tower.
const CLIP_VITB32_TEXT_HF_URL: &str =
    "https://huggingface.co/Qdrant/clip-ViT-B-32-text/resolve/main";

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Returns the default directory for storing encoder files.
/// Uses the platform data directory: ~/.local/share/sieve/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sieve")
        .join("models")
}

/// Subdirectory of `model_dir` holding one model's files.
pub fn encoder_dir(model_dir: &Path, model: &str) -> PathBuf {
    model_dir.join(model)
}

/// Check whether both required encoder files exist for `model`.
pub fn model_files_present(model_dir: &Path, model: &str) -> bool {
    let dir = encoder_dir(model_dir, model);
    dir.join(MODEL_FILE).exists() && dir.join(TOKENIZER_FILE).exists()
}

/// HuggingFace base URL for models with a known prebuilt text-encoder
/// export. The RN50 and ViT-L14 towers have no published ONNX export.
fn hf_repo_url(model: &str) -> Option<&'static str> {
    match model {
        "clip_ViT-B32" => Some(CLIP_VITB32_TEXT_HF_URL),
        _ => None,
    }
}

/// Download the ONNX encoder + tokenizer for `model`.
///
/// Shows a progress bar for the model file. Skips files that already
/// exist. Creates directories as needed.
pub async fn download_model(model_dir: &Path, model: &str) -> Result<()> {
    let Some(base_url) = hf_repo_url(model) else {
        anyhow::bail!(
            "No prebuilt ONNX export is published for {model}.\n\
             Export the text tower yourself and place model.onnx and\n\
             tokenizer.json in {}",
            encoder_dir(model_dir, model).display()
        );
    };

    let dir = encoder_dir(model_dir, model);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nText encoder ({model}):");

    let tokenizer_path = dir.join(TOKENIZER_FILE);
    if tokenizer_path.exists() {
        info!("Tokenizer already exists, skipping");
        println!("  {TOKENIZER_FILE} (already exists)");
    } else {
        println!("  Downloading {TOKENIZER_FILE}...");
        download_file(&format!("{base_url}/{TOKENIZER_FILE}"), &tokenizer_path, false).await?;
    }

    let model_path = dir.join(MODEL_FILE);
    if model_path.exists() {
        info!("Model already exists, skipping");
        println!("  {MODEL_FILE} (already exists)");
    } else {
        println!("  Downloading {MODEL_FILE}...");
        download_file(&format!("{base_url}/{MODEL_FILE}"), &model_path, true).await?;
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let total_size = response.content_length();

    let pb = if show_progress {
        let pb = if let Some(size) = total_size {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        };
        Some(pb)
    } else {
        None
    };

    let bytes = response
        .bytes()
        .await
        .context("Failed to read response body")?;

    if let Some(ref pb) = pb {
        pb.set_position(bytes.len() as u64);
    }

    std::fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_sieve() {
        let dir = default_model_dir();
        assert!(dir.to_string_lossy().contains("sieve"));
    }

    #[test]
    fn test_encoder_dir_is_per_model() {
        let dir = encoder_dir(Path::new("/tmp/models"), "clip_ViT-B32");
        assert_eq!(dir, Path::new("/tmp/models/clip_ViT-B32"));
    }

    #[test]
    fn test_unknown_models_have_no_repo_url() {
        assert!(hf_repo_url("clip_ViT-B32").is_some());
        assert!(hf_repo_url("clip_RN50").is_none());
        assert!(hf_repo_url("not-a-model").is_none());
    }
}
