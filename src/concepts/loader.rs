// Per-seed concept file loading.
//
// A missing file for one seed is expected (not every run finished) and is
// reported rather than fatal. A file that exists but has malformed rows is
// a real data problem and aborts the run.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use super::records::ConceptRow;

/// Outcome of attempting to load one seed's concept file.
#[derive(Debug)]
pub enum SeedLoad {
    Loaded { seed: u64, concepts: HashSet<String> },
    Missing { seed: u64, path: PathBuf },
}

/// Everything the load step produced: the per-seed sets that were found,
/// in seed-list order, plus the seeds that had no file.
#[derive(Debug, Default)]
pub struct LoadedConcepts {
    pub by_seed: BTreeMap<u64, HashSet<String>>,
    pub missing: Vec<(u64, PathBuf)>,
}

impl LoadedConcepts {
    pub fn seed_count(&self) -> usize {
        self.by_seed.len()
    }
}

/// File name for one seed's concept list.
pub fn concept_file_name(seed: u64) -> String {
    format!("concept_names_seed{seed}.csv")
}

/// Read one per-seed CSV into a set of concept names.
///
/// Blank lines are skipped; every other row must have at least two
/// columns, with the name in column 1.
pub fn load_seed_file(path: &Path) -> Result<HashSet<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read concept file: {}", path.display()))?;

    let mut concepts = HashSet::new();
    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = ConceptRow::parse(line);
        let name = row.concept_name().with_context(|| {
            format!("{}:{}: bad concept row", path.display(), line_no + 1)
        })?;
        concepts.insert(name.to_string());
    }
    Ok(concepts)
}

/// Load concept files for each seed from `dir`.
///
/// Seeds whose file is absent are recorded in `missing` and excluded from
/// `by_seed`; downstream categorization counts only the seeds that loaded.
/// Duplicate seeds in the list are loaded once.
pub fn load_concept_files(dir: &Path, seeds: &[u64]) -> Result<LoadedConcepts> {
    let mut result = LoadedConcepts::default();

    for &seed in seeds {
        if result.by_seed.contains_key(&seed)
            || result.missing.iter().any(|(s, _)| *s == seed)
        {
            continue;
        }
        match load_seed(dir, seed)? {
            SeedLoad::Loaded { seed, concepts } => {
                result.by_seed.insert(seed, concepts);
            }
            SeedLoad::Missing { seed, path } => {
                warn!(seed, path = %path.display(), "Concept file not found, skipping seed");
                result.missing.push((seed, path));
            }
        }
    }

    Ok(result)
}

fn load_seed(dir: &Path, seed: u64) -> Result<SeedLoad> {
    let path = dir.join(concept_file_name(seed));
    if !path.exists() {
        return Ok(SeedLoad::Missing { seed, path });
    }
    let concepts = load_seed_file(&path)?;
    Ok(SeedLoad::Loaded { seed, concepts })
}
