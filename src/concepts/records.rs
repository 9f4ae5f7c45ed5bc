// Concept CSV rows — explicit record type instead of positional indexing.
//
// The per-seed files have no header and at least two columns; column 1
// holds the concept name (column 0 is the neuron/latent index). Rows are
// validated on access so a malformed file fails loudly with its position
// instead of silently shifting columns.

use anyhow::Result;

/// One raw row of a per-seed concept file.
#[derive(Debug, Clone)]
pub struct ConceptRow {
    pub columns: Vec<String>,
}

impl ConceptRow {
    /// Split a CSV line into trimmed columns.
    pub fn parse(line: &str) -> Self {
        Self {
            columns: line.split(',').map(|c| c.trim().to_string()).collect(),
        }
    }

    /// The concept name — the second column of the row.
    ///
    /// Errors on rows with fewer than two columns rather than guessing.
    pub fn concept_name(&self) -> Result<&str> {
        match self.columns.get(1) {
            Some(name) => Ok(name.as_str()),
            None => anyhow::bail!(
                "Malformed concept row: expected at least 2 columns, got {}",
                self.columns.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_columns() {
        let row = ConceptRow::parse("17, waterfall");
        assert_eq!(row.columns, vec!["17", "waterfall"]);
        assert_eq!(row.concept_name().unwrap(), "waterfall");
    }

    #[test]
    fn test_parse_strips_whitespace() {
        let row = ConceptRow::parse("  3 ,  snowy mountain  ");
        assert_eq!(row.concept_name().unwrap(), "snowy mountain");
    }

    #[test]
    fn test_extra_columns_are_kept() {
        let row = ConceptRow::parse("4,lighthouse,0.92");
        assert_eq!(row.columns.len(), 3);
        assert_eq!(row.concept_name().unwrap(), "lighthouse");
    }

    #[test]
    fn test_single_column_is_malformed() {
        let row = ConceptRow::parse("42");
        let err = row.concept_name().unwrap_err();
        assert!(err.to_string().contains("at least 2 columns"), "{err}");
    }
}
