//! Full analysis and comparison reports

use crate::{
    bootstrap_se, chi_square_contingency, daughter_proportions, goodness_of_fit, group_by,
    largest_families, missing_daughters, one_sample_test, proportion_daughters, sex_ratio,
    summarize, two_sample_test, AnalysisConfig, BootstrapEstimate, ChiSquareTest, FamilySummary,
    GroupField, GroupStats, MissingDaughters, StatsError, TTest,
};
use progeny_domain::PoliticianRecord;
use serde::Serialize;
use std::borrow::Borrow;
use tracing::{debug, info};

/// One row of the largest families table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyRow {
    /// Politician name
    pub name: String,
    /// Party label
    pub party: Option<String>,
    /// Sons
    pub sons: u32,
    /// Daughters
    pub daughters: u32,
    /// Sons + daughters
    pub total_children: u64,
}

impl FamilyRow {
    fn from_record(record: &PoliticianRecord) -> Option<Self> {
        let (sons, daughters) = record.counts()?;
        Some(Self {
            name: record.name.clone(),
            party: record.party.clone(),
            sons,
            daughters,
            total_children: record.total_children()?,
        })
    }
}

/// Everything the analysis computes for one corpus
///
/// Tests that could not run leave their field empty and add a note.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Headline statistics
    pub summary: FamilySummary,
    /// Daughters missing relative to the natural sex ratio
    pub missing_daughters: Option<MissingDaughters>,
    /// Bootstrap standard error of the sex ratio
    pub sex_ratio_se: Option<BootstrapEstimate>,
    /// Bootstrap standard error of the mean proportion of daughters
    pub proportion_daughters_se: Option<BootstrapEstimate>,
    /// Per-politician proportions against the reference proportion
    pub one_sample: Option<TTest>,
    /// Pooled counts against the reference proportion
    pub goodness_of_fit: Option<ChiSquareTest>,
    /// Field the groups were built on
    pub grouped_by: Option<GroupField>,
    /// Per-group statistics, ordered by key
    pub groups: Vec<GroupStats>,
    /// Largest complete families
    pub largest_families: Vec<FamilyRow>,
    /// Why any test was skipped
    pub notes: Vec<String>,
}

/// Two corpora tested against each other
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Left-hand summary
    pub left: FamilySummary,
    /// Right-hand summary
    pub right: FamilySummary,
    /// Two-sample t-test of per-politician proportions
    pub proportions: Option<TTest>,
    /// Chi-square of pooled sons/daughters counts
    pub counts: Option<ChiSquareTest>,
    /// Why any test was skipped
    pub notes: Vec<String>,
}

fn keep<T>(what: &str, result: Result<T, StatsError>, notes: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Skipping {}: {}", what, e);
            notes.push(format!("{}: {}", what, e));
            None
        }
    }
}

/// Run every statistic and test over a set of records
pub fn analyze<R: Borrow<PoliticianRecord>>(
    records: &[R],
    config: &AnalysisConfig,
    group: Option<GroupField>,
) -> AnalysisReport {
    let mut notes = Vec::new();
    let summary = summarize(records);

    let sex_ratio_se = keep(
        "sex ratio bootstrap",
        bootstrap_se(
            records,
            |s| sex_ratio(s),
            config.bootstrap_iterations,
            config.bootstrap_seed,
        ),
        &mut notes,
    );
    let proportion_daughters_se = keep(
        "proportion daughters bootstrap",
        bootstrap_se(
            records,
            |s| proportion_daughters(s),
            config.bootstrap_iterations,
            config.bootstrap_seed,
        ),
        &mut notes,
    );
    let one_sample = keep(
        "one-sample t-test",
        one_sample_test(&daughter_proportions(records), config.reference_proportion),
        &mut notes,
    );
    let goodness_of_fit = keep(
        "goodness of fit",
        goodness_of_fit(
            summary.total_sons,
            summary.total_daughters,
            config.reference_proportion,
        ),
        &mut notes,
    );

    let groups: Vec<GroupStats> = group
        .map(|field| {
            group_by(records, |r| field.key(r), config.low_confidence_min_children)
                .into_values()
                .collect()
        })
        .unwrap_or_default();

    let largest_families = largest_families(records, config.largest_families)
        .into_iter()
        .filter_map(FamilyRow::from_record)
        .collect();

    info!(
        "Analyzed {} records ({} complete): sex ratio {}",
        summary.records, summary.complete_records, summary.sex_ratio
    );

    AnalysisReport {
        missing_daughters: missing_daughters(records, config.natural_sex_ratio),
        summary,
        sex_ratio_se,
        proportion_daughters_se,
        one_sample,
        goodness_of_fit,
        grouped_by: group,
        groups,
        largest_families,
        notes,
    }
}

/// Compare two sets of records
pub fn compare<L, R>(left: &[L], right: &[R], config: &AnalysisConfig) -> ComparisonReport
where
    L: Borrow<PoliticianRecord>,
    R: Borrow<PoliticianRecord>,
{
    let mut notes = Vec::new();
    let left_summary = summarize(left);
    let right_summary = summarize(right);

    let proportions = keep(
        "two-sample t-test",
        two_sample_test(
            &daughter_proportions(left),
            &daughter_proportions(right),
            config.variance,
        ),
        &mut notes,
    );
    let counts = keep(
        "chi-square contingency",
        chi_square_contingency(
            &[left_summary.total_sons, left_summary.total_daughters],
            &[right_summary.total_sons, right_summary.total_daughters],
            config.yates_correction,
        ),
        &mut notes,
    );

    if let Some(test) = counts.as_ref().filter(|t| t.is_degenerate()) {
        notes.push(format!(
            "chi-square contingency: degenerate table (chi2 = {}, p = {}), no evidence either way",
            test.statistic, test.p_value
        ));
    }

    ComparisonReport {
        left: left_summary,
        right: right_summary,
        proportions,
        counts,
        notes,
    }
}
