use super::matcher::{MatchError, SmirksMatcher};
use super::pattern::SmirksPattern;
use crate::core::models::graph::MolecularGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// One recorded pattern and the tuples a toolkit found for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchRecord {
    pub smirks: String,
    #[serde(default)]
    pub tuples: Vec<Vec<usize>>,
}

/// Replays substructure matches recorded for a single molecular graph.
///
/// A table is only meaningful for the graph it was recorded against. Patterns with no
/// recorded entry match nothing.
#[derive(Debug, Clone, Default)]
pub struct TableMatcher {
    tables: HashMap<String, Vec<Vec<usize>>>,
}

impl TableMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = MatchRecord>) -> Self {
        let mut matcher = Self::new();
        for record in records {
            matcher
                .tables
                .entry(record.smirks)
                .or_default()
                .extend(record.tuples);
        }
        matcher
    }

    /// Records the tuples returned for `smirks`, appending to any earlier record.
    pub fn record(&mut self, smirks: &str, tuples: impl IntoIterator<Item = Vec<usize>>) {
        self.tables
            .entry(smirks.to_string())
            .or_default()
            .extend(tuples);
    }

    pub fn with(mut self, smirks: &str, tuples: impl IntoIterator<Item = Vec<usize>>) -> Self {
        self.record(smirks, tuples);
        self
    }

    pub fn records(&self) -> Vec<MatchRecord> {
        let mut records: Vec<MatchRecord> = self
            .tables
            .iter()
            .map(|(smirks, tuples)| MatchRecord {
                smirks: smirks.clone(),
                tuples: tuples.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.smirks.cmp(&b.smirks));
        records
    }
}

impl SmirksMatcher for TableMatcher {
    fn find_matches(
        &self,
        _graph: &dyn MolecularGraph,
        smirks: &str,
    ) -> Result<Vec<Vec<usize>>, MatchError> {
        SmirksPattern::parse(smirks)?;
        match self.tables.get(smirks) {
            Some(tuples) => Ok(tuples.clone()),
            None => {
                trace!("No recorded matches for '{}'.", smirks);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ethane;

    #[test]
    fn find_matches_replays_recorded_tuples() {
        let mol = ethane();
        let matcher = TableMatcher::new().with("[#6X4:1]-[#6X4:2]", [vec![0, 1]]);
        assert_eq!(
            matcher.find_matches(&mol, "[#6X4:1]-[#6X4:2]").unwrap(),
            vec![vec![0, 1]]
        );
    }

    #[test]
    fn find_matches_returns_empty_for_unrecorded_pattern() {
        let mol = ethane();
        let matcher = TableMatcher::new();
        assert!(matcher.find_matches(&mol, "[#7:1]").unwrap().is_empty());
    }

    #[test]
    fn find_matches_rejects_malformed_pattern() {
        let mol = ethane();
        let matcher = TableMatcher::new();
        assert!(matches!(
            matcher.find_matches(&mol, "[#6:1"),
            Err(MatchError::MalformedPattern { .. })
        ));
    }

    #[test]
    fn from_records_merges_duplicate_patterns() {
        let matcher = TableMatcher::from_records(vec![
            MatchRecord {
                smirks: "[#1:1]".into(),
                tuples: vec![vec![2]],
            },
            MatchRecord {
                smirks: "[#1:1]".into(),
                tuples: vec![vec![3]],
            },
        ]);
        let records = matcher.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tuples, vec![vec![2], vec![3]]);
    }
}
