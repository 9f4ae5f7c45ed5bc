// Persistence of analysis results — category text files plus a JSON summary.
//
// The text files (one concept per line, sorted) are the interchange format
// the rest of the pipeline reads. The JSON summary is for humans and
// notebooks: it records what was requested, what actually loaded, and the
// category sizes, with a timestamp.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::analysis::ConceptCategories;
use super::loader::LoadedConcepts;

/// Machine-readable record of one analysis run.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub generated_at: String,
    pub seeds_requested: Vec<u64>,
    pub seeds_loaded: Vec<u64>,
    pub seeds_missing: Vec<u64>,
    /// Number of concepts each loaded seed contributed.
    pub set_sizes: BTreeMap<u64, usize>,
    pub unique_count: usize,
    pub common_count: usize,
    pub frequent_count: usize,
}

impl AnalysisSummary {
    pub fn build(
        requested: &[u64],
        loaded: &LoadedConcepts,
        categories: &ConceptCategories,
    ) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            seeds_requested: requested.to_vec(),
            seeds_loaded: loaded.by_seed.keys().copied().collect(),
            seeds_missing: loaded.missing.iter().map(|(s, _)| *s).collect(),
            set_sizes: loaded
                .by_seed
                .iter()
                .map(|(seed, set)| (*seed, set.len()))
                .collect(),
            unique_count: categories.unique.len(),
            common_count: categories.common.len(),
            frequent_count: categories.frequent.len(),
        }
    }
}

/// Write each category to `<name>_concepts.txt` in `out_dir`, one concept
/// per line in lexicographic order. Creates the directory if needed.
/// Returns the paths written.
pub fn write_categories(
    categories: &ConceptCategories,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut written = Vec::new();
    for (name, concepts) in categories.named() {
        let path = out_dir.join(format!("{name}_concepts.txt"));
        let mut file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        // BTreeSet iterates in sorted order, so the file is sorted for free.
        for concept in concepts {
            writeln!(file, "{concept}")
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        written.push(path);
    }
    Ok(written)
}

/// Write the JSON summary next to the category files.
pub fn write_summary(summary: &AnalysisSummary, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join("analysis_summary.json");
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
