// Concept categorization across seeds.
//
// A concept's occurrence count (how many seed runs discovered it) places
// it in up to three categories:
//   unique:   count == 1 (an artifact of one initialization)
//   common:   count == n (every run found it)
//   frequent: count >= n/2 + 1 (a majority found it)
// The categories are not mutually exclusive: common is a subset of frequent.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use anyhow::Result;

/// The three derived concept categories, each sorted and deduplicated.
#[derive(Debug, Clone)]
pub struct ConceptCategories {
    pub unique: BTreeSet<String>,
    pub common: BTreeSet<String>,
    pub frequent: BTreeSet<String>,
}

impl ConceptCategories {
    /// (name, set) pairs in the order they are reported and persisted.
    pub fn named(&self) -> [(&'static str, &BTreeSet<String>); 3] {
        [
            ("unique", &self.unique),
            ("common", &self.common),
            ("frequent", &self.frequent),
        ]
    }
}

/// Categorize concepts by their occurrence count across seed sets.
///
/// `n` is the number of seed sets actually present here: callers pass only
/// the seeds that loaded, so a missing file shrinks the "all seeds"
/// threshold instead of making `common` unsatisfiable.
///
/// Errors when no seed sets are given: the thresholds would be meaningless
/// and silently-empty categories would look like a real result.
pub fn categorize(by_seed: &BTreeMap<u64, HashSet<String>>) -> Result<ConceptCategories> {
    let n = by_seed.len();
    if n == 0 {
        anyhow::bail!("No concept data found. Check the directory and seed values.");
    }
    let majority = n / 2 + 1;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for concepts in by_seed.values() {
        for concept in concepts {
            *counts.entry(concept.as_str()).or_insert(0) += 1;
        }
    }

    let mut categories = ConceptCategories {
        unique: BTreeSet::new(),
        common: BTreeSet::new(),
        frequent: BTreeSet::new(),
    };

    for (concept, count) in counts {
        if count == 1 {
            categories.unique.insert(concept.to_string());
        }
        if count == n {
            categories.common.insert(concept.to_string());
        }
        if count >= majority {
            categories.frequent.insert(concept.to_string());
        }
    }

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_sets(sets: &[&[&str]]) -> BTreeMap<u64, HashSet<String>> {
        sets.iter()
            .enumerate()
            .map(|(i, set)| {
                (
                    i as u64 + 1,
                    set.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_overlapping_three_seeds() {
        // Three seeds: {a,b}, {b,c}, {b,d}. Majority threshold is 2.
        let by_seed = seed_sets(&[&["a", "b"], &["b", "c"], &["b", "d"]]);
        let cats = categorize(&by_seed).unwrap();

        assert_eq!(cats.common, ["b".to_string()].into_iter().collect());
        assert_eq!(cats.frequent, ["b".to_string()].into_iter().collect());
        let unique: BTreeSet<String> =
            ["a", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(cats.unique, unique);
    }

    #[test]
    fn test_identical_sets() {
        let by_seed = seed_sets(&[&["x", "y"], &["x", "y"], &["x", "y"]]);
        let cats = categorize(&by_seed).unwrap();

        let expected: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        assert!(cats.unique.is_empty());
        assert_eq!(cats.common, expected);
        assert_eq!(cats.frequent, expected);
    }

    #[test]
    fn test_disjoint_sets() {
        let by_seed = seed_sets(&[&["a"], &["b"], &["c"]]);
        let cats = categorize(&by_seed).unwrap();

        let all: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(cats.unique, all);
        assert!(cats.common.is_empty());
        assert!(cats.frequent.is_empty());
    }

    #[test]
    fn test_unique_and_common_disjoint_for_multiple_seeds() {
        let by_seed = seed_sets(&[&["a", "b", "c"], &["b", "c", "d"], &["c", "e"]]);
        let cats = categorize(&by_seed).unwrap();
        assert!(
            cats.unique.is_disjoint(&cats.common),
            "unique and common must be disjoint when n > 1"
        );
    }

    #[test]
    fn test_common_subset_of_frequent() {
        let by_seed = seed_sets(&[&["a", "b"], &["b", "c"], &["b", "c"], &["b"]]);
        let cats = categorize(&by_seed).unwrap();
        assert!(cats.common.is_subset(&cats.frequent));
    }

    #[test]
    fn test_single_seed() {
        // n == 1: every concept has count 1 == n, so unique == common.
        let by_seed = seed_sets(&[&["a", "b"]]);
        let cats = categorize(&by_seed).unwrap();
        assert_eq!(cats.unique, cats.common);
        assert_eq!(cats.common, cats.frequent);
    }

    #[test]
    fn test_majority_threshold_rounds_up() {
        // 4 seeds: majority is 3. "b" appears twice — frequent must exclude it.
        let by_seed = seed_sets(&[&["a", "b"], &["a", "b"], &["a"], &["a"]]);
        let cats = categorize(&by_seed).unwrap();
        assert!(cats.frequent.contains("a"));
        assert!(!cats.frequent.contains("b"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let by_seed = BTreeMap::new();
        let err = categorize(&by_seed).unwrap_err();
        assert!(err.to_string().contains("No concept data found"), "{err}");
    }
}
