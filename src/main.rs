use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sieve::concepts::{analysis, loader, persist, plot};
use sieve::config;
use sieve::output;
use sieve::vocab::{self, traits::TextEncoder};

/// Sieve: concept stability analysis for SAE concept-bottleneck pipelines.
///
/// Exports CLIP text embeddings for a vocabulary and measures which
/// discovered concept names are stable across SAE training seeds.
#[derive(Parser)]
#[command(name = "sieve", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a word list into CLIP text embeddings and save them
    Embed {
        /// Encoder model name (e.g. clip_ViT-B32)
        model: String,

        /// Path to a newline-delimited word list
        words_file: PathBuf,

        /// Where to write the safetensors embedding artifact
        save_path: PathBuf,

        /// Force CPU inference even when a CUDA build is available
        #[arg(long)]
        cpu: bool,

        /// Words per inference batch (default: 256)
        #[arg(long, default_value = "256")]
        batch_size: usize,
    },

    /// Aggregate per-seed concept names into unique/common/frequent sets
    Analyze {
        /// Directory with concept_names_seed<N>.csv files
        /// (default: SIEVE_CONCEPT_DIR)
        #[arg(long)]
        concept_dir: Option<PathBuf>,

        /// Comma-separated seed list (default: SIEVE_SEEDS or the built-in list)
        #[arg(long)]
        seeds: Option<String>,

        /// Output directory for category files and the chart
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Download the ONNX text encoder for a model
    DownloadModel {
        /// Encoder model name (e.g. clip_ViT-B32)
        model: String,
    },

    /// Show resolved configuration and what is present on disk
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sieve=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Embed {
            model,
            words_file,
            save_path,
            cpu,
            batch_size,
        } => {
            let config = config::Config::load()?;

            // An identifier outside the model table is only acceptable when
            // a hand-placed export exists for it locally.
            if config::embedding_dim(&model).is_none()
                && !vocab::download::model_files_present(&config.model_dir, &model)
            {
                anyhow::bail!(
                    "Unknown model {:?} and no local files under {}\n\
                     Known models: clip_RN50, clip_ViT-B16, clip_ViT-B32, clip_ViT-L14.",
                    model,
                    vocab::download::encoder_dir(&config.model_dir, &model).display()
                );
            }

            let words = vocab::words::load_words(&words_file)?;
            println!("Encoding {} words with {model}...", words.len());

            let encoder = vocab::clip::ClipTextEncoder::load(&config.model_dir, &model, cpu)?;

            let batch_size = batch_size.max(1);
            let pb = ProgressBar::new(words.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  [{bar:40.cyan/blue}] {pos}/{len} words ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );

            let mut embeddings = Vec::with_capacity(words.len());
            for chunk in words.chunks(batch_size) {
                embeddings.extend(encoder.encode_batch(chunk).await?);
                pb.inc(chunk.len() as u64);
            }
            pb.finish_and_clear();

            vocab::export::save_embeddings(&embeddings, &model, &save_path)?;

            let dim = embeddings.first().map(|e| e.len()).unwrap_or(0);
            info!(words = words.len(), dim, "Export complete");
            println!(
                "{}",
                format!(
                    "Embeddings saved to {} ({} x {})",
                    save_path.display(),
                    embeddings.len(),
                    dim
                )
                .bold()
            );
        }

        Commands::Analyze {
            concept_dir,
            seeds,
            output: output_dir,
        } => {
            let config = config::Config::load()?;

            let concept_dir = match concept_dir {
                Some(dir) => dir,
                None => config.require_concept_dir()?.to_path_buf(),
            };
            let seeds = match seeds {
                Some(raw) => config::parse_seed_list(&raw)
                    .with_context(|| format!("Invalid --seeds value: {raw:?}"))?,
                None => config.seeds.clone(),
            };
            let out_dir = output_dir
                .unwrap_or_else(|| config.analysis_dir.join("concept_analysis_results"));

            println!(
                "Loading concept files for {} seeds from {}...",
                seeds.len(),
                concept_dir.display()
            );

            let loaded = loader::load_concept_files(&concept_dir, &seeds)?;
            for (seed, path) in &loaded.missing {
                println!(
                    "  {} no concept file for seed {} ({})",
                    "Warning:".yellow(),
                    seed,
                    path.display()
                );
            }

            // Bails before anything is written when no seed file loaded.
            let categories = analysis::categorize(&loaded.by_seed)?;

            persist::write_categories(&categories, &out_dir)?;
            let summary = persist::AnalysisSummary::build(&seeds, &loaded, &categories);
            persist::write_summary(&summary, &out_dir)?;

            println!("Creating visualization...");
            plot::render_category_chart(&categories, &out_dir)?;

            output::terminal::display_analysis_summary(&loaded, &categories);
            println!("\n{}", format!("Results saved to: {}", out_dir.display()).bold());
        }

        Commands::DownloadModel { model } => {
            let config = config::Config::load()?;

            println!("Downloading ONNX text encoder...");
            println!("  Destination: {}", config.model_dir.display());

            vocab::download::download_model(&config.model_dir, &model).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `sieve embed {model} <words-file> <save-path>`.");
        }

        Commands::Status => {
            let config = config::Config::load()?;
            output::terminal::display_status(&config);
        }
    }

    Ok(())
}
