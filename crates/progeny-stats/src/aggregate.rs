//! Aggregate statistics over politician records
//!
//! Every function takes a slice of records or of record references, so the
//! same code runs on a whole corpus, a filtered view, or a bootstrap resample.
//! Records missing either count are left out of every ratio. Results do not
//! depend on input order.

use crate::{Measure, Undefined};
use progeny_domain::PoliticianRecord;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Group label for records without a value for the grouping field
pub const UNKNOWN_GROUP: &str = "(unknown)";

/// Sons and daughters of complete records
fn complete_counts<R: Borrow<PoliticianRecord>>(
    records: &[R],
) -> impl Iterator<Item = (u64, u64)> + '_ {
    records
        .iter()
        .filter_map(|r| r.borrow().counts())
        .map(|(s, d)| (u64::from(s), u64::from(d)))
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    complete: usize,
    sons: u64,
    daughters: u64,
}

impl Totals {
    fn of<R: Borrow<PoliticianRecord>>(records: &[R]) -> Self {
        complete_counts(records).fold(Self::default(), |mut t, (s, d)| {
            t.complete += 1;
            t.sons += s;
            t.daughters += d;
            t
        })
    }

    fn children(&self) -> u64 {
        self.sons + self.daughters
    }

    fn mean(&self, total: u64) -> Measure {
        if self.complete == 0 {
            Measure::Undefined(Undefined::NoData)
        } else {
            Measure::Defined(total as f64 / self.complete as f64)
        }
    }
}

/// Sons per daughter: total sons / total daughters over complete records
///
/// # Examples
///
/// ```
/// use progeny_domain::{IdentityKey, PoliticianRecord, Provenance, SourceTag};
/// use progeny_stats::{sex_ratio, Measure, Undefined};
///
/// let record = |sons, daughters| {
///     PoliticianRecord::new(
///         IdentityKey::from_name("x").unwrap(),
///         "x",
///         Provenance::new(SourceTag::Manual, None),
///     )
///     .with_counts(Some(sons), Some(daughters))
/// };
///
/// assert_eq!(sex_ratio(&[record(2, 1), record(2, 1)]), Measure::Defined(2.0));
/// assert_eq!(
///     sex_ratio(&[record(3, 0)]),
///     Measure::Undefined(Undefined::DivisionByZero)
/// );
/// ```
pub fn sex_ratio<R: Borrow<PoliticianRecord>>(records: &[R]) -> Measure {
    let totals = Totals::of(records);
    if totals.complete == 0 {
        return Measure::Undefined(Undefined::NoData);
    }
    Measure::ratio(totals.sons as f64, totals.daughters as f64)
}

/// Per-politician daughters / total children, in input order
///
/// Only complete records with at least one child contribute.
pub fn daughter_proportions<R: Borrow<PoliticianRecord>>(records: &[R]) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| r.borrow().proportion_daughters())
        .collect()
}

/// Mean of per-politician proportion of daughters
///
/// Records with zero children are excluded, as are records missing either
/// count. The ratios are summed in sorted order so the result is identical
/// for any permutation of the input.
pub fn proportion_daughters<R: Borrow<PoliticianRecord>>(records: &[R]) -> Measure {
    let mut proportions = daughter_proportions(records);
    if proportions.is_empty() {
        return Measure::Undefined(Undefined::NoData);
    }
    proportions.sort_by(f64::total_cmp);
    let sum: f64 = proportions.iter().sum();
    Measure::Defined(sum / proportions.len() as f64)
}

/// Total daughters / total children over complete records
pub fn pooled_proportion_daughters<R: Borrow<PoliticianRecord>>(records: &[R]) -> Measure {
    let totals = Totals::of(records);
    if totals.complete == 0 {
        return Measure::Undefined(Undefined::NoData);
    }
    Measure::ratio(totals.daughters as f64, totals.children() as f64)
}

/// Mean total children over complete records, zeros included
pub fn mean_total_children<R: Borrow<PoliticianRecord>>(records: &[R]) -> Measure {
    let totals = Totals::of(records);
    totals.mean(totals.children())
}

/// Headline family statistics for a set of records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySummary {
    /// All records, complete or not
    pub records: usize,
    /// Records with both counts
    pub complete_records: usize,
    /// complete / all (None when there are no records)
    pub completeness: Option<f64>,
    /// Complete records with at least one child
    pub with_children: usize,
    /// Sons across complete records
    pub total_sons: u64,
    /// Daughters across complete records
    pub total_daughters: u64,
    /// Children across complete records
    pub total_children: u64,
    /// Sons per daughter
    pub sex_ratio: Measure,
    /// Mean sons per complete record
    pub mean_sons: Measure,
    /// Mean daughters per complete record
    pub mean_daughters: Measure,
    /// Mean children per complete record
    pub mean_total_children: Measure,
    /// Mean per-politician proportion of daughters
    pub proportion_daughters: Measure,
    /// Total daughters / total children
    pub pooled_proportion_daughters: Measure,
}

/// Compute the family summary
pub fn summarize<R: Borrow<PoliticianRecord>>(records: &[R]) -> FamilySummary {
    let totals = Totals::of(records);
    let with_children = complete_counts(records).filter(|(s, d)| s + d > 0).count();

    FamilySummary {
        records: records.len(),
        complete_records: totals.complete,
        completeness: (!records.is_empty())
            .then(|| totals.complete as f64 / records.len() as f64),
        with_children,
        total_sons: totals.sons,
        total_daughters: totals.daughters,
        total_children: totals.children(),
        sex_ratio: sex_ratio(records),
        mean_sons: totals.mean(totals.sons),
        mean_daughters: totals.mean(totals.daughters),
        mean_total_children: totals.mean(totals.children()),
        proportion_daughters: proportion_daughters(records),
        pooled_proportion_daughters: pooled_proportion_daughters(records),
    }
}

/// Daughters expected under a natural sex ratio, against those observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissingDaughters {
    /// Natural sons-per-daughter ratio used
    pub natural_sex_ratio: f64,
    /// Children across complete records
    pub total_children: u64,
    /// total_children / (1 + natural_sex_ratio)
    pub expected_daughters: f64,
    /// Daughters observed
    pub observed_daughters: u64,
    /// expected - observed (negative means more daughters than expected)
    pub missing_daughters: f64,
}

/// Estimate daughters missing relative to a natural sex ratio
///
/// Returns `None` when no record has both counts or the ratio is not
/// positive.
pub fn missing_daughters<R: Borrow<PoliticianRecord>>(
    records: &[R],
    natural_sex_ratio: f64,
) -> Option<MissingDaughters> {
    let totals = Totals::of(records);
    if totals.complete == 0 || natural_sex_ratio.is_nan() || natural_sex_ratio <= 0.0 {
        return None;
    }

    let expected = totals.children() as f64 / (1.0 + natural_sex_ratio);
    Some(MissingDaughters {
        natural_sex_ratio,
        total_children: totals.children(),
        expected_daughters: expected,
        observed_daughters: totals.daughters,
        missing_daughters: expected - totals.daughters as f64,
    })
}

/// The `n` complete records with the most children, ties by name
pub fn largest_families<R: Borrow<PoliticianRecord>>(
    records: &[R],
    n: usize,
) -> Vec<&PoliticianRecord> {
    let mut complete: Vec<&PoliticianRecord> = records
        .iter()
        .map(|r| r.borrow())
        .filter(|r| r.has_complete_counts())
        .collect();

    complete.sort_by(|a, b| {
        b.total_children()
            .cmp(&a.total_children())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.identity_key.cmp(&b.identity_key))
    });
    complete.truncate(n);
    complete
}

/// Built-in grouping fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupField {
    /// Party label
    Party,
    /// State label
    State,
    /// Session or assembly
    Session,
}

impl GroupField {
    /// Key of a record under this field
    pub fn key(&self, record: &PoliticianRecord) -> String {
        let value = match self {
            GroupField::Party => record.party.as_deref(),
            GroupField::State => record.state.as_deref(),
            GroupField::Session => record.session_or_assembly.as_deref(),
        };
        value.unwrap_or(UNKNOWN_GROUP).to_string()
    }

    /// Field name
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::Party => "party",
            GroupField::State => "state",
            GroupField::Session => "session",
        }
    }
}

impl std::str::FromStr for GroupField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "party" => Ok(GroupField::Party),
            "state" => Ok(GroupField::State),
            "session" | "assembly" => Ok(GroupField::Session),
            other => Err(format!("unknown group field: {}", other)),
        }
    }
}

/// Statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    /// Group key
    pub key: String,
    /// Records in the group
    pub count: usize,
    /// Records with both counts
    pub complete_records: usize,
    /// Sons across complete records
    pub total_sons: u64,
    /// Daughters across complete records
    pub total_daughters: u64,
    /// Sons per daughter
    pub sex_ratio: Measure,
    /// Mean per-politician proportion of daughters
    pub proportion_daughters: Measure,
    /// Mean children per complete record
    pub mean_total_children: Measure,
    /// Fewer sons + daughters than the configured minimum
    pub low_confidence: bool,
}

/// Partition records by `key_fn` and compute per-group statistics
///
/// Small groups are kept and flagged `low_confidence` when their combined
/// sons + daughters fall below `min_children`. Groups come back ordered by
/// key.
pub fn group_by<R, F>(records: &[R], key_fn: F, min_children: u64) -> BTreeMap<String, GroupStats>
where
    R: Borrow<PoliticianRecord>,
    F: Fn(&PoliticianRecord) -> String,
{
    let mut partitions: BTreeMap<String, Vec<&PoliticianRecord>> = BTreeMap::new();
    for record in records.iter().map(|r| r.borrow()) {
        partitions.entry(key_fn(record)).or_default().push(record);
    }

    partitions
        .into_iter()
        .map(|(key, members)| {
            let totals = Totals::of(&members);
            let stats = GroupStats {
                key: key.clone(),
                count: members.len(),
                complete_records: totals.complete,
                total_sons: totals.sons,
                total_daughters: totals.daughters,
                sex_ratio: sex_ratio(&members),
                proportion_daughters: proportion_daughters(&members),
                mean_total_children: totals.mean(totals.children()),
                low_confidence: totals.children() < min_children,
            };
            (key, stats)
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use progeny_domain::{IdentityKey, Provenance, SourceTag};
    use proptest::prelude::*;

    fn arb_records() -> impl Strategy<Value = Vec<PoliticianRecord>> {
        prop::collection::vec(
            (proptest::option::of(0u32..8), proptest::option::of(0u32..8)),
            0..30,
        )
        .prop_map(|counts| {
            counts
                .into_iter()
                .enumerate()
                .map(|(i, (s, d))| {
                    let name = format!("p{}", i);
                    PoliticianRecord::new(
                        IdentityKey::from_name(&name).unwrap(),
                        name,
                        Provenance::new(SourceTag::Manual, None),
                    )
                    .with_counts(s, d)
                })
                .collect()
        })
    }

    proptest! {
        /// Property: aggregates do not depend on input order
        #[test]
        fn test_permutation_invariance(
            (records, shuffled) in arb_records().prop_flat_map(|r| {
                let shuffled = Just(r.clone()).prop_shuffle();
                (Just(r), shuffled)
            })
        ) {
            prop_assert_eq!(sex_ratio(&records), sex_ratio(&shuffled));
            prop_assert_eq!(proportion_daughters(&records), proportion_daughters(&shuffled));
            prop_assert_eq!(mean_total_children(&records), mean_total_children(&shuffled));
            prop_assert_eq!(summarize(&records), summarize(&shuffled));
        }

        /// Property: defined measures are always finite
        #[test]
        fn test_measures_finite(records in arb_records()) {
            let summary = summarize(&records);
            for measure in [
                summary.sex_ratio,
                summary.proportion_daughters,
                summary.pooled_proportion_daughters,
                summary.mean_total_children,
            ] {
                if let Some(v) = measure.value() {
                    prop_assert!(v.is_finite());
                }
            }
        }
    }
}
