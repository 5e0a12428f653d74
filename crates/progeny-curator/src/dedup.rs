//! Deduplication of validated politician records

use crate::{CuratorConfig, CuratorError, DedupScope, KeepPolicy};
use progeny_domain::{DatasetCorpus, IdentityKey, PoliticianRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

type CountAccessor = fn(&PoliticianRecord) -> Option<u32>;

const COUNT_FIELDS: [(&str, CountAccessor); 2] = [("sons", sons), ("daughters", daughters)];

fn sons(record: &PoliticianRecord) -> Option<u32> {
    record.sons
}

fn daughters(record: &PoliticianRecord) -> Option<u32> {
    record.daughters
}

/// Records sharing an identity that disagree on a count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldConflict {
    /// Identity key of the group
    pub identity_key: IdentityKey,
    /// Session of the group when deduplicating per session
    pub session: Option<String>,
    /// Field name ("sons" or "daughters")
    pub field: &'static str,
    /// Distinct observed values in first-appearance order
    pub values: Vec<u32>,
}

impl std::fmt::Display for FieldConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.values.iter().map(u32::to_string).collect();
        write!(f, "{}", self.identity_key)?;
        if let Some(session) = &self.session {
            write!(f, " (session {})", session)?;
        }
        write!(f, ": {} = {}", self.field, values.join(" / "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    identity_key: IdentityKey,
    session: Option<String>,
}

/// Merges records describing the same politician into one canonical record
///
/// Output order is stable: each identity appears at the position of its
/// first input record.
///
/// # Examples
///
/// ```
/// use progeny_curator::Deduplicator;
/// use progeny_domain::{IdentityKey, PoliticianRecord, Provenance, SourceTag};
///
/// let record = |sons| {
///     PoliticianRecord::new(
///         IdentityKey::from_name("A").unwrap(),
///         "A",
///         Provenance::new(SourceTag::Manual, None),
///     )
///     .with_counts(Some(sons), Some(1))
/// };
///
/// let deduped = Deduplicator::default_config()
///     .dedupe(&[record(1), record(2)])
///     .unwrap();
/// assert_eq!(deduped.len(), 1);
/// assert_eq!(deduped[0].sons, Some(2));
/// ```
pub struct Deduplicator {
    config: CuratorConfig,
}

impl Deduplicator {
    /// Create a new Deduplicator with the given configuration
    pub fn new(config: CuratorConfig) -> Self {
        Self { config }
    }

    /// Create a Deduplicator with default configuration
    pub fn default_config() -> Self {
        Self::new(CuratorConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &CuratorConfig {
        &self.config
    }

    /// Deduplicate a sequence of records
    ///
    /// Only merge-fields can fail, on disagreeing counts.
    pub fn dedupe(
        &self,
        records: &[PoliticianRecord],
    ) -> Result<Vec<PoliticianRecord>, CuratorError> {
        let groups = self.group(records);
        let mut output = Vec::with_capacity(groups.len());

        for (key, members) in &groups {
            if members.len() > 1 {
                debug!(
                    "Resolving {} records for {} with {}",
                    members.len(),
                    key.identity_key,
                    self.config.keep_policy
                );
            }

            let kept = match self.config.keep_policy {
                KeepPolicy::KeepLast => keep_last(records, members).map(|i| records[i].clone()),
                KeepPolicy::KeepMostComplete => {
                    most_complete(records, members).map(|i| records[i].clone())
                }
                KeepPolicy::MergeFields => merge_fields(records, members)?,
            };
            output.extend(kept);
        }

        let dropped = records.len() - output.len();
        if dropped > 0 {
            debug!(
                "Dropped {} duplicate records, {} remain",
                dropped,
                output.len()
            );
        }
        Ok(output)
    }

    /// Deduplicate a corpus into a new corpus with the same label
    pub fn dedupe_corpus(&self, corpus: &DatasetCorpus) -> Result<DatasetCorpus, CuratorError> {
        let records = self.dedupe(corpus.records())?;
        Ok(match corpus.label() {
            Some(label) => DatasetCorpus::labelled(label, records),
            None => DatasetCorpus::new(records),
        })
    }

    /// List every group whose records disagree on sons or daughters
    ///
    /// Independent of the keep-policy, so keep-last discards can be audited.
    pub fn conflicts(&self, records: &[PoliticianRecord]) -> Vec<FieldConflict> {
        let mut conflicts = Vec::new();

        for (key, members) in self.group(records) {
            if members.len() < 2 {
                continue;
            }
            for (field, accessor) in COUNT_FIELDS {
                let mut values: Vec<u32> = Vec::new();
                for value in members.iter().filter_map(|&i| accessor(&records[i])) {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                if values.len() > 1 {
                    warn!(
                        "Conflicting {} for {}: {:?}",
                        field, key.identity_key, values
                    );
                    conflicts.push(FieldConflict {
                        identity_key: key.identity_key.clone(),
                        session: key.session.clone(),
                        field,
                        values,
                    });
                }
            }
        }

        conflicts
    }

    /// Group record positions by key, in order of first appearance
    fn group(&self, records: &[PoliticianRecord]) -> Vec<(GroupKey, Vec<usize>)> {
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<(GroupKey, Vec<usize>)> = Vec::new();

        for (position, record) in records.iter().enumerate() {
            let key = GroupKey {
                identity_key: record.identity_key.clone(),
                session: match self.config.scope {
                    DedupScope::Global => None,
                    DedupScope::PerSession => record.session_or_assembly.clone(),
                },
            };
            match index.get(&key) {
                Some(&slot) => groups[slot].1.push(position),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, vec![position]));
                }
            }
        }

        groups
    }
}

/// Position of the most recently collected record; later position wins ties
fn keep_last(records: &[PoliticianRecord], members: &[usize]) -> Option<usize> {
    members
        .iter()
        .copied()
        .max_by_key(|&i| (records[i].provenance.collected_at, i))
}

fn most_complete(records: &[PoliticianRecord], members: &[usize]) -> Option<usize> {
    members.iter().copied().max_by_key(|&i| {
        let r = &records[i];
        let known_counts = usize::from(r.sons.is_some()) + usize::from(r.daughters.is_some());
        (
            r.has_complete_counts(),
            known_counts,
            r.populated_fields(),
            r.provenance.collected_at,
            i,
        )
    })
}

fn merge_fields(
    records: &[PoliticianRecord],
    members: &[usize],
) -> Result<Option<PoliticianRecord>, CuratorError> {
    let mut ordered = members.to_vec();
    ordered.sort_by_key(|&i| (records[i].provenance.collected_at, i));

    let Some((&first, rest)) = ordered.split_first() else {
        return Ok(None);
    };

    let mut merged = records[first].clone();
    for &i in rest {
        let next = &records[i];
        merged.sons = merge_count(&merged, "sons", merged.sons, next.sons)?;
        merged.daughters = merge_count(&merged, "daughters", merged.daughters, next.daughters)?;
        merged.name = next.name.clone();
        merged.party = next.party.clone().or(merged.party);
        merged.state = next.state.clone().or(merged.state);
        merged.constituency = next.constituency.clone().or(merged.constituency);
        merged.session_or_assembly = next
            .session_or_assembly
            .clone()
            .or(merged.session_or_assembly);
        merged.provenance = next.provenance.clone();
    }

    Ok(Some(merged))
}

fn merge_count(
    merged: &PoliticianRecord,
    field: &'static str,
    current: Option<u32>,
    incoming: Option<u32>,
) -> Result<Option<u32>, CuratorError> {
    match (current, incoming) {
        (Some(a), Some(b)) if a != b => Err(CuratorError::ConflictingCounts {
            identity_key: merged.identity_key.to_string(),
            field,
            first: a,
            second: b,
        }),
        (Some(a), _) => Ok(Some(a)),
        (None, b) => Ok(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use progeny_domain::{Provenance, SourceTag};

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(secs, 0)
    }

    fn record(
        name: &str,
        sons: Option<u32>,
        daughters: Option<u32>,
        collected_at: Option<DateTime<Utc>>,
    ) -> PoliticianRecord {
        PoliticianRecord::new(
            IdentityKey::from_name(name).unwrap(),
            name,
            Provenance::new(SourceTag::Wikipedia, collected_at),
        )
        .with_counts(sons, daughters)
    }

    fn with(policy: KeepPolicy) -> Deduplicator {
        Deduplicator::new(CuratorConfig {
            keep_policy: policy,
            ..CuratorConfig::default()
        })
    }

    #[test]
    fn test_keep_last_prefers_later_collection() {
        let records = vec![
            record("A", Some(3), Some(1), at(2_000)),
            record("A", Some(2), Some(1), at(1_000)),
        ];

        let deduped = Deduplicator::default_config().dedupe(&records).unwrap();
        assert_eq!(deduped, vec![records[0].clone()]);
    }

    #[test]
    fn test_keep_last_ties_go_to_later_position() {
        let records = vec![
            record("A", Some(1), Some(1), None),
            record("A", Some(2), Some(1), None),
        ];
        let deduped = Deduplicator::default_config().dedupe(&records).unwrap();
        assert_eq!(deduped[0].sons, Some(2));

        // A missing timestamp sorts before any present one
        let records = vec![
            record("A", Some(1), Some(1), at(0)),
            record("A", Some(2), Some(1), None),
        ];
        let deduped = Deduplicator::default_config().dedupe(&records).unwrap();
        assert_eq!(deduped[0].sons, Some(1));
    }

    #[test]
    fn test_stable_first_appearance_order() {
        let records = vec![
            record("B", Some(1), Some(0), None),
            record("A", Some(1), Some(1), None),
            record("B", Some(2), Some(0), None),
            record("C", None, None, None),
            record("A", Some(0), Some(1), None),
        ];

        let deduped = Deduplicator::default_config().dedupe(&records).unwrap();
        let names: Vec<_> = deduped.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(deduped[0].sons, Some(2));
        assert_eq!(deduped[1].daughters, Some(1));
    }

    #[test]
    fn test_keep_most_complete() {
        let records = vec![
            record("A", Some(2), Some(1), at(1_000)),
            record("A", Some(2), None, at(2_000)),
            record("A", None, None, at(3_000)),
        ];

        let deduped = with(KeepPolicy::KeepMostComplete).dedupe(&records).unwrap();
        assert_eq!(deduped, vec![records[0].clone()]);
    }

    #[test]
    fn test_keep_most_complete_falls_back_to_keep_last() {
        let records = vec![
            record("A", Some(2), Some(1), at(2_000)),
            record("A", Some(3), Some(1), at(1_000)),
        ];

        let deduped = with(KeepPolicy::KeepMostComplete).dedupe(&records).unwrap();
        assert_eq!(deduped[0].sons, Some(2));
    }

    #[test]
    fn test_merge_fields_unions() {
        let records = vec![
            record("A", Some(2), None, at(1_000)).with_party(Some("INC".to_string())),
            record("A", None, Some(1), at(2_000)).with_state(Some("Bihar".to_string())),
        ];

        let merged = with(KeepPolicy::MergeFields).dedupe(&records).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].counts(), Some((2, 1)));
        assert_eq!(merged[0].party.as_deref(), Some("INC"));
        assert_eq!(merged[0].state.as_deref(), Some("Bihar"));
        assert_eq!(merged[0].provenance.collected_at, at(2_000));
    }

    #[test]
    fn test_merge_fields_labels_resolve_keep_last() {
        let records = vec![
            record("A", Some(1), Some(1), at(2_000)).with_party(Some("BJP".to_string())),
            record("A", Some(1), Some(1), at(1_000)).with_party(Some("INC".to_string())),
        ];

        let merged = with(KeepPolicy::MergeFields).dedupe(&records).unwrap();
        assert_eq!(merged[0].party.as_deref(), Some("BJP"));
    }

    #[test]
    fn test_merge_fields_rejects_conflicting_counts() {
        let records = vec![
            record("A", Some(2), Some(1), at(1_000)),
            record("A", Some(3), Some(1), at(2_000)),
        ];

        let err = with(KeepPolicy::MergeFields).dedupe(&records).unwrap_err();
        assert_eq!(
            err,
            CuratorError::ConflictingCounts {
                identity_key: "a".to_string(),
                field: "sons",
                first: 2,
                second: 3,
            }
        );
    }

    #[test]
    fn test_per_session_scope() {
        let records = vec![
            record("A", Some(1), Some(1), None).with_session(Some("16".to_string())),
            record("A", Some(2), Some(1), None).with_session(Some("17".to_string())),
            record("A", Some(2), Some(2), None).with_session(Some("17".to_string())),
        ];

        let global = Deduplicator::default_config().dedupe(&records).unwrap();
        assert_eq!(global.len(), 1);

        let per_session = Deduplicator::new(CuratorConfig::per_session())
            .dedupe(&records)
            .unwrap();
        assert_eq!(per_session.len(), 2);
        assert_eq!(per_session[0].session_or_assembly.as_deref(), Some("16"));
        assert_eq!(per_session[1].counts(), Some((2, 2)));
    }

    #[test]
    fn test_conflict_audit() {
        let records = vec![
            record("A", Some(2), Some(1), None),
            record("B", Some(0), Some(0), None),
            record("A", Some(3), Some(1), None),
            record("A", None, Some(1), None),
            record("B", Some(0), None, None),
        ];

        let conflicts = Deduplicator::default_config().conflicts(&records);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].identity_key.as_str(), "a");
        assert_eq!(conflicts[0].field, "sons");
        assert_eq!(conflicts[0].values, vec![2, 3]);
        assert_eq!(conflicts[0].to_string(), "a: sons = 2 / 3");
    }

    #[test]
    fn test_empty_input() {
        for policy in KeepPolicy::ALL {
            assert!(with(policy).dedupe(&[]).unwrap().is_empty());
        }
        assert!(Deduplicator::default_config().conflicts(&[]).is_empty());
    }

    #[test]
    fn test_dedupe_corpus_keeps_label() {
        let corpus = DatasetCorpus::labelled(
            "rajya_sabha",
            vec![record("A", Some(1), Some(1), None), record("A", Some(1), Some(1), None)],
        );

        let deduped = Deduplicator::default_config().dedupe_corpus(&corpus).unwrap();
        assert_eq!(deduped.label(), Some("rajya_sabha"));
        assert_eq!(deduped.len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::DateTime;
    use progeny_domain::{Provenance, SourceTag};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn arb_record() -> impl Strategy<Value = PoliticianRecord> {
        (
            prop::sample::select(vec!["A", "B", "C", "D"]),
            proptest::option::of(0u32..5),
            proptest::option::of(0u32..5),
            proptest::option::of(0i64..10),
        )
            .prop_map(|(name, sons, daughters, secs)| {
                PoliticianRecord::new(
                    IdentityKey::from_name(name).unwrap(),
                    name,
                    Provenance::new(
                        SourceTag::Manual,
                        secs.and_then(|s| DateTime::from_timestamp(s, 0)),
                    ),
                )
                .with_counts(sons, daughters)
            })
    }

    proptest! {
        /// Property: dedupe(dedupe(X)) == dedupe(X)
        #[test]
        fn test_dedupe_idempotent(records in prop::collection::vec(arb_record(), 0..20)) {
            for policy in [KeepPolicy::KeepLast, KeepPolicy::KeepMostComplete] {
                let dedup = Deduplicator::new(CuratorConfig { keep_policy: policy, ..Default::default() });
                let once = dedup.dedupe(&records).unwrap();
                let twice = dedup.dedupe(&once).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        /// Property: output holds exactly one record per identity key
        #[test]
        fn test_dedupe_unique_keys(records in prop::collection::vec(arb_record(), 0..20)) {
            let deduped = Deduplicator::default_config().dedupe(&records).unwrap();
            let keys: HashSet<_> = records.iter().map(|r| r.identity_key.clone()).collect();
            let output_keys: HashSet<_> = deduped.iter().map(|r| r.identity_key.clone()).collect();

            prop_assert_eq!(deduped.len(), keys.len());
            prop_assert_eq!(output_keys, keys);
        }
    }
}
