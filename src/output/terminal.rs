// Colored terminal output for analysis summaries and system status.
//
// This module handles all terminal-specific formatting. The main.rs
// command handlers delegate here.

use std::path::Path;

use colored::Colorize;

use crate::concepts::analysis::ConceptCategories;
use crate::concepts::loader::{concept_file_name, LoadedConcepts};
use crate::config::Config;

/// Display the aggregation summary: seeds analyzed, per-seed set sizes,
/// and the size of each category.
pub fn display_analysis_summary(loaded: &LoadedConcepts, categories: &ConceptCategories) {
    println!("\n{}", "=== Analysis Summary ===".bold());
    println!("  Seeds analyzed: {}", loaded.seed_count());

    if !loaded.missing.is_empty() {
        let seeds: Vec<String> = loaded.missing.iter().map(|(s, _)| s.to_string()).collect();
        println!(
            "  {} {} seed file(s) missing: {}",
            "Warning:".yellow(),
            loaded.missing.len(),
            seeds.join(", ")
        );
    }

    println!();
    for (seed, concepts) in &loaded.by_seed {
        println!("  seed {:<6} {:>5} concepts", seed, concepts.len());
    }

    println!();
    println!(
        "  Unique concepts (present in only one seed):  {}",
        categories.unique.len().to_string().bold()
    );
    println!(
        "  Common concepts (present in all seeds):      {}",
        categories.common.len().to_string().bold()
    );
    println!(
        "  Frequent concepts (present in majority):     {}",
        categories.frequent.len().to_string().bold()
    );
}

/// Display the resolved configuration and what is present on disk.
/// Read-only — never creates anything.
pub fn display_status(config: &Config) {
    println!("{}", "=== sieve status ===".bold());

    println!("\nDirectories:");
    print_dir("data", &config.data_dir);
    print_dir("sae", &config.sae_dir);
    print_dir("probe", &config.probe_dir);
    print_dir("vocab", &config.vocab_dir);
    print_dir("analysis", &config.analysis_dir);
    print_dir("models", &config.model_dir);
    match config.concept_dir.as_deref() {
        Some(dir) => print_dir("concepts", dir),
        None => println!(
            "  {:<10} {}",
            "concepts",
            "not set (SIEVE_CONCEPT_DIR)".dimmed()
        ),
    }

    println!("\nEncoder models:");
    let mut any = false;
    for model in ["clip_RN50", "clip_ViT-B16", "clip_ViT-B32", "clip_ViT-L14"] {
        if crate::vocab::download::model_files_present(&config.model_dir, model) {
            println!("  {model} {}", "(downloaded)".green());
            any = true;
        }
    }
    if !any {
        println!("  none — run `sieve download-model <model>`");
    }

    if let Some(dir) = config.concept_dir.as_deref() {
        println!("\nConcept files for seeds {:?}:", config.seeds);
        for &seed in &config.seeds {
            let path = dir.join(concept_file_name(seed));
            if path.exists() {
                println!("  seed {seed}: {}", "found".green());
            } else {
                println!("  seed {seed}: {}", "missing".yellow());
            }
        }
    }
}

fn print_dir(label: &str, path: &Path) {
    let marker = if path.exists() {
        "exists".green()
    } else {
        "absent".dimmed()
    };
    println!("  {:<10} {} ({})", label, path.display(), marker);
}
