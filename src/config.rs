use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Seeds used by the SAE training runs this tool analyzes. Overridable
/// via SIEVE_SEEDS or `--seeds`, but these match the published runs.
pub const DEFAULT_SEEDS: [u64; 7] = [42, 1948, 360, 0, 10, 100, 2048];

/// Central configuration loaded from environment variables.
///
/// Every directory has a code default rooted under SIEVE_ROOT, so the tool
/// works out of the box on a fresh checkout. A .env file is loaded
/// automatically at startup via dotenvy.
pub struct Config {
    /// Root for activation data (image activations per dataset).
    pub data_dir: PathBuf,
    /// Root for SAE checkpoints and their per-seed outputs.
    pub sae_dir: PathBuf,
    /// Root for probe / concept-selection results.
    pub probe_dir: PathBuf,
    /// Directory holding vocabulary word lists.
    pub vocab_dir: PathBuf,
    /// Directory where analysis outputs are written.
    pub analysis_dir: PathBuf,
    /// Directory containing the ONNX encoder files, one subdirectory per model.
    pub model_dir: PathBuf,
    /// Directory holding the per-seed concept-name CSVs. No sensible
    /// default exists — it names one specific SAE training run.
    pub concept_dir: Option<PathBuf>,
    /// Seed list for the aggregation step.
    pub seeds: Vec<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only SIEVE_CONCEPT_DIR has no default; it is required for
    /// `analyze` and checked via `require_concept_dir`.
    pub fn load() -> Result<Self> {
        let root = env::var("SIEVE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./sieve-data"));

        let dir = |var: &str, default: PathBuf| -> PathBuf {
            env::var(var).map(PathBuf::from).unwrap_or(default)
        };

        let seeds = match env::var("SIEVE_SEEDS") {
            Ok(raw) => parse_seed_list(&raw)
                .with_context(|| format!("Invalid SIEVE_SEEDS value: {raw:?}"))?,
            Err(_) => DEFAULT_SEEDS.to_vec(),
        };

        Ok(Self {
            data_dir: dir("SIEVE_DATA_DIR", root.join("data")),
            sae_dir: dir("SIEVE_SAE_DIR", root.join("sae")),
            probe_dir: dir("SIEVE_PROBE_DIR", root.join("probe")),
            vocab_dir: dir("SIEVE_VOCAB_DIR", root.join("vocab")),
            analysis_dir: dir("SIEVE_ANALYSIS_DIR", root.join("analysis")),
            model_dir: env::var("SIEVE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| crate::vocab::download::default_model_dir()),
            concept_dir: env::var("SIEVE_CONCEPT_DIR").ok().map(PathBuf::from),
            seeds,
        })
    }

    /// Check that the concept directory is configured.
    /// Call this before the aggregation step unless `--concept-dir` was given.
    pub fn require_concept_dir(&self) -> Result<&Path> {
        match self.concept_dir.as_deref() {
            Some(dir) => Ok(dir),
            None => anyhow::bail!(
                "SIEVE_CONCEPT_DIR not set. Point it at the SAE run directory\n\
                 containing the concept_names_seed<N>.csv files, or pass\n\
                 --concept-dir to `sieve analyze`."
            ),
        }
    }

    /// Activation root for a probe dataset.
    ///
    /// ImageNet usually lives on a shared mount rather than under data_dir,
    /// so it gets its own override (SIEVE_IMAGENET_DIR).
    pub fn dataset_root(&self, dataset: &str) -> Option<PathBuf> {
        match dataset {
            "imagenet" => Some(
                env::var("SIEVE_IMAGENET_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| self.data_dir.join("imagenet")),
            ),
            "places365" | "cifar10" | "cifar100" => {
                Some(self.data_dir.join("activations_img").join(dataset))
            }
            _ => None,
        }
    }
}

/// Parse a comma-separated seed list ("42, 1948, 360").
pub fn parse_seed_list(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .with_context(|| format!("Invalid seed value: {s:?}"))
        })
        .collect()
}

/// Text-embedding width produced by each supported CLIP encoder.
///
/// These match the SAE input dimensions of the upstream pipeline; an
/// unknown model returns None and the dimension is taken from the model
/// output instead.
pub fn embedding_dim(model: &str) -> Option<usize> {
    match model {
        "clip_RN50" => Some(1024),
        "clip_ViT-B16" => Some(512),
        "clip_ViT-B32" => Some(512),
        "clip_ViT-L14" => Some(768),
        _ => None,
    }
}

/// Number of classes in each supported probe dataset.
pub fn dataset_class_count(dataset: &str) -> Option<usize> {
    match dataset {
        "places365" => Some(365),
        "imagenet" => Some(1000),
        "cifar10" => Some(10),
        "cifar100" => Some(100),
        _ => None,
    }
}
