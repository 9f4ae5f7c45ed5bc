// Word-list loading: plain text, one word per line.

use std::path::Path;

use anyhow::{Context, Result};

/// Read a newline-delimited word list. Lines are trimmed and blank lines
/// skipped; an empty result is an error since an empty vocabulary would
/// produce a zero-row embedding matrix downstream.
pub fn load_words(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read word list: {}", path.display()))?;

    let words: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if words.is_empty() {
        anyhow::bail!("Word list is empty: {}", path.display());
    }
    Ok(words)
}
