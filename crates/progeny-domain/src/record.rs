//! Politician record - the validated unit every later stage works on

use crate::{IdentityKey, Provenance};
use serde::{Deserialize, Serialize};

/// A validated politician record
///
/// Records are immutable once built; deduplication and combination create
/// new records rather than editing existing ones. `total_children` is not a
/// field: it is always derived from `sons` and `daughters`, and is absent
/// whenever either of them is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticianRecord {
    /// Deduplication key
    pub identity_key: IdentityKey,

    /// Display name as collected (trimmed)
    pub name: String,

    /// Party label
    pub party: Option<String>,

    /// State label
    pub state: Option<String>,

    /// Constituency label
    pub constituency: Option<String>,

    /// Legislative session or assembly identifier
    pub session_or_assembly: Option<String>,

    /// Number of sons, if known
    pub sons: Option<u32>,

    /// Number of daughters, if known
    pub daughters: Option<u32>,

    /// Source, timestamp and dataset of the observation
    pub provenance: Provenance,
}

impl PoliticianRecord {
    /// Create a record with no labels and unknown counts
    pub fn new(identity_key: IdentityKey, name: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            identity_key,
            name: name.into(),
            party: None,
            state: None,
            constituency: None,
            session_or_assembly: None,
            sons: None,
            daughters: None,
            provenance,
        }
    }

    /// Set both counts
    pub fn with_counts(mut self, sons: Option<u32>, daughters: Option<u32>) -> Self {
        self.sons = sons;
        self.daughters = daughters;
        self
    }

    /// Set the party label
    pub fn with_party(mut self, party: Option<String>) -> Self {
        self.party = party;
        self
    }

    /// Set the state label
    pub fn with_state(mut self, state: Option<String>) -> Self {
        self.state = state;
        self
    }

    /// Set the constituency label
    pub fn with_constituency(mut self, constituency: Option<String>) -> Self {
        self.constituency = constituency;
        self
    }

    /// Set the session identifier
    pub fn with_session(mut self, session: Option<String>) -> Self {
        self.session_or_assembly = session;
        self
    }

    /// A copy of this record tagged with a dataset label
    pub fn tagged(&self, dataset: &str) -> Self {
        let mut copy = self.clone();
        copy.provenance.dataset = Some(dataset.to_string());
        copy
    }

    /// Both counts, when both are known
    pub fn counts(&self) -> Option<(u32, u32)> {
        Some((self.sons?, self.daughters?))
    }

    /// Whether both sons and daughters are known
    pub fn has_complete_counts(&self) -> bool {
        self.counts().is_some()
    }

    /// Whether both sons and daughters are unknown
    pub fn has_no_counts(&self) -> bool {
        self.sons.is_none() && self.daughters.is_none()
    }

    /// Sons + daughters, absent unless both are known
    ///
    /// `u64` so two counts at `u32::MAX` still sum exactly.
    pub fn total_children(&self) -> Option<u64> {
        self.counts().map(|(s, d)| u64::from(s) + u64::from(d))
    }

    /// Daughters / total children for this politician
    ///
    /// `None` when counts are incomplete or the politician has no children.
    pub fn proportion_daughters(&self) -> Option<f64> {
        let (_, daughters) = self.counts()?;
        let total = self.total_children()?;
        (total > 0).then(|| f64::from(daughters) / total as f64)
    }

    /// Number of populated optional fields (counts and labels)
    pub fn populated_fields(&self) -> usize {
        [
            self.sons.is_some(),
            self.daughters.is_some(),
            self.party.is_some(),
            self.state.is_some(),
            self.constituency.is_some(),
            self.session_or_assembly.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceTag;

    fn record(sons: Option<u32>, daughters: Option<u32>) -> PoliticianRecord {
        PoliticianRecord::new(
            IdentityKey::from_name("test").unwrap(),
            "Test",
            Provenance::new(SourceTag::Manual, None),
        )
        .with_counts(sons, daughters)
    }

    #[test]
    fn test_total_children_requires_both() {
        assert_eq!(record(Some(2), Some(1)).total_children(), Some(3));
        assert_eq!(record(Some(2), None).total_children(), None);
        assert_eq!(record(None, Some(1)).total_children(), None);
        assert_eq!(record(None, None).total_children(), None);
    }

    #[test]
    fn test_proportion_daughters() {
        assert_eq!(record(Some(1), Some(3)).proportion_daughters(), Some(0.75));
        assert_eq!(record(Some(0), Some(0)).proportion_daughters(), None);
        assert_eq!(record(None, Some(3)).proportion_daughters(), None);
    }

    #[test]
    fn test_counts_at_u32_max_do_not_overflow() {
        let big = record(Some(u32::MAX), Some(1));
        assert_eq!(big.total_children(), Some(u64::from(u32::MAX) + 1));

        let share = big.proportion_daughters().unwrap();
        assert!(share > 0.0 && share < 1e-9);

        let all_daughters = record(Some(0), Some(u32::MAX));
        assert_eq!(all_daughters.proportion_daughters(), Some(1.0));
    }

    #[test]
    fn test_tagged_leaves_original_untouched() {
        let original = record(Some(1), Some(1));
        let tagged = original.tagged("lok_sabha_17");

        assert_eq!(original.provenance.dataset, None);
        assert_eq!(tagged.provenance.dataset.as_deref(), Some("lok_sabha_17"));
        assert_eq!(tagged.identity_key, original.identity_key);
    }

    #[test]
    fn test_populated_fields() {
        assert_eq!(record(None, None).populated_fields(), 0);
        let full = record(Some(1), Some(0))
            .with_party(Some("INC".into()))
            .with_state(Some("Kerala".into()));
        assert_eq!(full.populated_fields(), 4);
    }
}
