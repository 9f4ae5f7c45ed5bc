// Composition tests — the full aggregation chain wired together:
//   load -> categorize -> persist
// exercised against real files under the system temp dir, the way the
// `analyze` command runs it.

use std::collections::BTreeSet;
use std::path::PathBuf;

use sieve::concepts::analysis::categorize;
use sieve::concepts::loader::{concept_file_name, load_concept_files};
use sieve::concepts::persist::{write_categories, write_summary, AnalysisSummary};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sieve_compose_{name}"));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_seed_file(dir: &std::path::Path, seed: u64, rows: &[&str]) {
    std::fs::write(dir.join(concept_file_name(seed)), rows.join("\n")).unwrap();
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// Chain: load -> categorize on the canonical three-seed example
// ============================================================

#[test]
fn three_seed_example_end_to_end() {
    let dir = scratch_dir("three_seeds");
    write_seed_file(&dir, 1, &["0,a", "1,b"]);
    write_seed_file(&dir, 2, &["0,b", "1,c"]);
    write_seed_file(&dir, 3, &["0,b", "1,d"]);

    let loaded = load_concept_files(&dir, &[1, 2, 3]).unwrap();
    assert_eq!(loaded.seed_count(), 3);
    assert!(loaded.missing.is_empty());

    let cats = categorize(&loaded.by_seed).unwrap();
    assert_eq!(cats.common, set(&["b"]));
    assert_eq!(cats.frequent, set(&["b"]));
    assert_eq!(cats.unique, set(&["a", "c", "d"]));

    let out_dir = dir.join("results");
    let written = write_categories(&cats, &out_dir).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "unique_concepts.txt",
            "common_concepts.txt",
            "frequent_concepts.txt"
        ]
    );
}

// ============================================================
// Chain with a missing seed: n shrinks to the loaded count
// ============================================================

#[test]
fn missing_seed_shrinks_the_common_threshold() {
    let dir = scratch_dir("missing_seed");
    // Seed 30 has no file. "rain" is in both surviving seeds, so with
    // n == 2 it is common even though 3 seeds were requested.
    write_seed_file(&dir, 10, &["0,rain", "1,mist"]);
    write_seed_file(&dir, 20, &["0,rain"]);

    let requested = vec![10, 20, 30];
    let loaded = load_concept_files(&dir, &requested).unwrap();
    assert_eq!(loaded.seed_count(), 2);
    assert_eq!(loaded.missing.len(), 1);

    let cats = categorize(&loaded.by_seed).unwrap();
    assert_eq!(cats.common, set(&["rain"]));
    assert_eq!(cats.frequent, set(&["rain"]));
    assert_eq!(cats.unique, set(&["mist"]));

    let out_dir = dir.join("results");
    write_categories(&cats, &out_dir).unwrap();
    let summary = AnalysisSummary::build(&requested, &loaded, &cats);
    write_summary(&summary, &out_dir).unwrap();

    let json = std::fs::read_to_string(out_dir.join("analysis_summary.json")).unwrap();
    let parsed: AnalysisSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.seeds_missing, vec![30]);
    assert_eq!(parsed.common_count, 1);
}

// ============================================================
// Larger chain: seven seeds, majority threshold of four
// ============================================================

#[test]
fn seven_seed_majority_threshold() {
    let dir = scratch_dir("seven_seeds");
    let seeds: Vec<u64> = vec![42, 1948, 360, 0, 10, 100, 2048];

    // "stable" in all 7, "majority" in 4, "minority" in 3, "once" in 1.
    for (i, &seed) in seeds.iter().enumerate() {
        let mut rows = vec!["0,stable".to_string()];
        if i < 4 {
            rows.push("1,majority".to_string());
        }
        if i < 3 {
            rows.push("2,minority".to_string());
        }
        if i == 6 {
            rows.push("3,once".to_string());
        }
        let joined: Vec<&str> = rows.iter().map(String::as_str).collect();
        write_seed_file(&dir, seed, &joined);
    }

    let loaded = load_concept_files(&dir, &seeds).unwrap();
    let cats = categorize(&loaded.by_seed).unwrap();

    assert_eq!(cats.common, set(&["stable"]));
    assert_eq!(cats.frequent, set(&["majority", "stable"]));
    assert_eq!(cats.unique, set(&["once"]));
    assert!(
        !cats.frequent.contains("minority"),
        "3 of 7 is not a majority"
    );
}

// ============================================================
// Persisted files re-load as the same sets
// ============================================================

#[test]
fn persisted_categories_reload_identically() {
    let dir = scratch_dir("reload");
    write_seed_file(&dir, 1, &["0,oak", "1,elm", "2,fir"]);
    write_seed_file(&dir, 2, &["0,elm", "1,fir"]);
    write_seed_file(&dir, 3, &["0,fir", "1,ash"]);

    let loaded = load_concept_files(&dir, &[1, 2, 3]).unwrap();
    let cats = categorize(&loaded.by_seed).unwrap();
    let out_dir = dir.join("results");
    write_categories(&cats, &out_dir).unwrap();

    for (name, original) in cats.named() {
        let path = out_dir.join(format!("{name}_concepts.txt"));
        let reloaded: BTreeSet<String> = std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(&reloaded, original, "{name} category changed on disk");
    }
}
