//! Combination summaries

use crate::FieldConflict;
use serde::Serialize;

/// Per-dataset contribution to a combined corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetContribution {
    /// Dataset label
    pub label: String,
    /// Records the dataset brought in
    pub input_records: usize,
    /// Records from this dataset that survived deduplication
    pub kept_records: usize,
}

/// What a combination did to its inputs
///
/// This is a required output of every combination, not a log line.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CombineSummary {
    /// Records across all input corpora
    pub input_records: usize,

    /// Records dropped as duplicates
    pub duplicates_dropped: usize,

    /// Records in the combined corpus
    pub unique_records: usize,

    /// Breakdown per input corpus, in input order
    pub datasets: Vec<DatasetContribution>,

    /// Count disagreements found between duplicates
    pub conflicts: Vec<FieldConflict>,
}

impl CombineSummary {
    /// Number of identities with disagreeing counts
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Share of input records that were duplicates (None for empty input)
    pub fn duplicate_rate(&self) -> Option<f64> {
        (self.input_records > 0)
            .then(|| self.duplicates_dropped as f64 / self.input_records as f64)
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Combination Summary".to_string(),
            "===================".to_string(),
            format!("Input records: {}", self.input_records),
            format!("Duplicates dropped: {}", self.duplicates_dropped),
            format!("Unique records: {}", self.unique_records),
        ];

        if !self.datasets.is_empty() {
            lines.push(String::new());
            lines.push("By dataset:".to_string());
            for dataset in &self.datasets {
                lines.push(format!(
                    "  {}: {} in, {} kept",
                    dataset.label, dataset.input_records, dataset.kept_records
                ));
            }
        }

        if !self.conflicts.is_empty() {
            lines.push(String::new());
            lines.push(format!("Conflicting counts ({}):", self.conflicts.len()));
            for conflict in &self.conflicts {
                lines.push(format!("  {}", conflict));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progeny_domain::IdentityKey;

    #[test]
    fn test_empty_summary() {
        let summary = CombineSummary::default();
        assert_eq!(summary.duplicate_rate(), None);
        assert_eq!(summary.conflict_count(), 0);
        assert!(summary.summary().contains("Input records: 0"));
        assert!(!summary.summary().contains("By dataset"));
    }

    #[test]
    fn test_summary_report() {
        let summary = CombineSummary {
            input_records: 10,
            duplicates_dropped: 4,
            unique_records: 6,
            datasets: vec![
                DatasetContribution {
                    label: "lok_sabha_16".to_string(),
                    input_records: 5,
                    kept_records: 1,
                },
                DatasetContribution {
                    label: "lok_sabha_17".to_string(),
                    input_records: 5,
                    kept_records: 5,
                },
            ],
            conflicts: vec![FieldConflict {
                identity_key: IdentityKey::from_name("A").unwrap(),
                session: None,
                field: "daughters",
                values: vec![1, 2],
            }],
        };

        let report = summary.summary();
        assert_eq!(summary.duplicate_rate(), Some(0.4));
        assert!(report.contains("Duplicates dropped: 4"));
        assert!(report.contains("lok_sabha_16: 5 in, 1 kept"));
        assert!(report.contains("a: daughters = 1 / 2"));
    }
}
