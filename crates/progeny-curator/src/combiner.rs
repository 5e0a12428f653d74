//! Multi-source dataset combination

use crate::{
    CombineSummary, CuratorConfig, CuratorError, DatasetContribution, Deduplicator,
};
use progeny_domain::{DatasetCorpus, PoliticianRecord};
use tracing::{info, warn};

/// Result of combining several corpora
#[derive(Debug, Clone)]
pub struct Combination {
    /// Deduplicated combined corpus
    pub corpus: DatasetCorpus,
    /// What happened along the way
    pub summary: CombineSummary,
}

/// Merges per-source corpora into one deduplicated corpus
///
/// Every record is tagged with the label of the corpus it came from
/// (`dataset-N`, counting from 1, for unlabelled corpora), then the configured
/// deduplicator runs once across all of them. A label already used by an
/// earlier corpus gets a `-2`, `-3`, ... suffix so contributions stay
/// distinguishable.
pub struct DatasetCombiner {
    deduplicator: Deduplicator,
}

impl DatasetCombiner {
    /// Create a new combiner with the given configuration
    pub fn new(config: CuratorConfig) -> Self {
        Self {
            deduplicator: Deduplicator::new(config),
        }
    }

    /// Create a combiner with default configuration
    pub fn default_config() -> Self {
        Self::new(CuratorConfig::default())
    }

    /// The underlying deduplicator
    pub fn deduplicator(&self) -> &Deduplicator {
        &self.deduplicator
    }

    /// Combine corpora, deduplicating globally across all of them
    pub fn combine(&self, corpora: &[DatasetCorpus]) -> Result<Combination, CuratorError> {
        let mut labels: Vec<(String, usize)> = Vec::with_capacity(corpora.len());
        let mut tagged: Vec<PoliticianRecord> = Vec::new();

        for (i, corpus) in corpora.iter().enumerate() {
            let base = corpus
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| format!("dataset-{}", i + 1));
            let label = unique_label(base, &labels);
            tagged.extend(corpus.iter().map(|r| r.tagged(&label)));
            labels.push((label, corpus.len()));
        }

        let conflicts = self.deduplicator.conflicts(&tagged);
        let unique = self.deduplicator.dedupe(&tagged)?;

        let datasets = labels
            .into_iter()
            .map(|(label, input_records)| {
                let kept_records = unique
                    .iter()
                    .filter(|r| r.provenance.dataset.as_deref() == Some(label.as_str()))
                    .count();
                DatasetContribution {
                    label,
                    input_records,
                    kept_records,
                }
            })
            .collect::<Vec<_>>();

        let summary = CombineSummary {
            input_records: tagged.len(),
            duplicates_dropped: tagged.len() - unique.len(),
            unique_records: unique.len(),
            datasets,
            conflicts,
        };

        if summary.conflict_count() > 0 {
            warn!(
                "{} identities have conflicting counts across datasets ({} kept)",
                summary.conflict_count(),
                self.deduplicator.config().keep_policy
            );
        }
        info!(
            "Combined {} corpora: {} records in, {} duplicates dropped, {} unique",
            corpora.len(),
            summary.input_records,
            summary.duplicates_dropped,
            summary.unique_records
        );

        let label = summary
            .datasets
            .iter()
            .map(|d| d.label.as_str())
            .collect::<Vec<_>>()
            .join("+");

        Ok(Combination {
            corpus: DatasetCorpus::labelled(label, unique),
            summary,
        })
    }
}

fn unique_label(base: String, taken: &[(String, usize)]) -> String {
    let in_use = |candidate: &str| taken.iter().any(|(label, _)| label == candidate);
    if !in_use(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !in_use(&candidate) {
            warn!("Dataset label {:?} appears more than once, using {:?}", base, candidate);
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeepPolicy;
    use chrono::DateTime;
    use progeny_domain::{IdentityKey, Provenance, SourceTag};

    fn record(name: &str, sons: u32, daughters: u32, secs: i64) -> PoliticianRecord {
        PoliticianRecord::new(
            IdentityKey::from_name(name).unwrap(),
            name,
            Provenance::new(SourceTag::BiodataApi, DateTime::from_timestamp(secs, 0)),
        )
        .with_counts(Some(sons), Some(daughters))
    }

    #[test]
    fn test_combine_dedupes_across_corpora() {
        let ls16 = DatasetCorpus::labelled(
            "lok_sabha_16",
            vec![record("A", 1, 1, 100), record("B", 2, 0, 100)],
        );
        let ls17 = DatasetCorpus::labelled(
            "lok_sabha_17",
            vec![record("A", 2, 1, 200), record("C", 0, 3, 200)],
        );

        let combination = DatasetCombiner::default_config()
            .combine(&[ls16, ls17])
            .unwrap();
        let summary = &combination.summary;

        assert_eq!(summary.input_records, 4);
        assert_eq!(summary.duplicates_dropped, 1);
        assert_eq!(summary.unique_records, 3);
        assert_eq!(combination.corpus.len(), 3);
        assert_eq!(combination.corpus.label(), Some("lok_sabha_16+lok_sabha_17"));

        assert_eq!(summary.datasets[0].kept_records, 1);
        assert_eq!(summary.datasets[1].kept_records, 2);

        let a = &combination.corpus.records()[0];
        assert_eq!(a.name, "A");
        assert_eq!(a.sons, Some(2));
        assert_eq!(a.provenance.dataset.as_deref(), Some("lok_sabha_17"));

        assert_eq!(summary.conflict_count(), 1);
        assert_eq!(summary.conflicts[0].field, "sons");
    }

    #[test]
    fn test_unlabelled_corpora_get_positional_labels() {
        let combination = DatasetCombiner::default_config()
            .combine(&[
                DatasetCorpus::new(vec![record("A", 1, 1, 0)]),
                DatasetCorpus::new(vec![record("B", 1, 1, 0)]),
            ])
            .unwrap();

        let labels: Vec<_> = combination
            .corpus
            .iter()
            .map(|r| r.provenance.dataset.clone().unwrap())
            .collect();
        assert_eq!(labels, vec!["dataset-1", "dataset-2"]);
    }

    #[test]
    fn test_repeated_labels_are_kept_apart() {
        let combination = DatasetCombiner::default_config()
            .combine(&[
                DatasetCorpus::labelled("members", vec![record("A", 1, 1, 100), record("B", 2, 0, 100)]),
                DatasetCorpus::labelled("members", vec![record("A", 1, 1, 200), record("C", 0, 3, 200)]),
                DatasetCorpus::labelled("members", vec![record("D", 1, 0, 300)]),
            ])
            .unwrap();
        let datasets = &combination.summary.datasets;

        let labels: Vec<_> = datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["members", "members-2", "members-3"]);

        let kept: Vec<_> = datasets.iter().map(|d| d.kept_records).collect();
        assert_eq!(kept, vec![1, 2, 1]);
        assert_eq!(
            kept.iter().sum::<usize>(),
            combination.summary.unique_records
        );
        assert_eq!(combination.corpus.label(), Some("members+members-2+members-3"));
    }

    #[test]
    fn test_combine_nothing() {
        let combination = DatasetCombiner::default_config().combine(&[]).unwrap();
        assert!(combination.corpus.is_empty());
        assert_eq!(combination.summary.input_records, 0);
        assert_eq!(combination.summary.unique_records, 0);
    }

    #[test]
    fn test_merge_policy_conflict_is_an_error() {
        let combiner = DatasetCombiner::new(CuratorConfig {
            keep_policy: KeepPolicy::MergeFields,
            ..CuratorConfig::default()
        });

        let result = combiner.combine(&[
            DatasetCorpus::labelled("x", vec![record("A", 1, 1, 0)]),
            DatasetCorpus::labelled("y", vec![record("A", 1, 2, 1)]),
        ]);
        assert!(matches!(
            result,
            Err(CuratorError::ConflictingCounts { field: "daughters", .. })
        ));
    }
}
