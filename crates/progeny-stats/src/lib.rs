//! Progeny Stats
//!
//! Aggregate statistics and significance tests over validated politician
//! records.
//!
//! # Overview
//!
//! - **Aggregates**: sex ratio (sons per daughter), mean proportion of
//!   daughters, pooled proportion, mean family size, group breakdowns with
//!   low-confidence flags, missing daughters against a natural ratio
//! - **Significance**: seeded bootstrap standard errors, one- and two-sample
//!   t-tests, chi-square contingency and goodness-of-fit tests
//! - **Reports**: [`analyze`] and [`compare`] run everything and collect the
//!   results as plain serializable values
//!
//! # Missing data
//!
//! A record contributes to ratios only when both sons and daughters are
//! known. Mean proportion of daughters further drops records with no
//! children. Undefined results are [`Measure::Undefined`], never `inf` or
//! `NaN`; tests that cannot run return a [`StatsError`].
//!
//! # Example
//!
//! ```
//! use progeny_domain::{IdentityKey, PoliticianRecord, Provenance, SourceTag};
//! use progeny_stats::{analyze, AnalysisConfig, Measure};
//!
//! let records: Vec<_> = [(2, 1), (1, 1), (3, 2)]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &(s, d))| {
//!         PoliticianRecord::new(
//!             IdentityKey::from_name(&format!("p{}", i)).unwrap(),
//!             format!("P{}", i),
//!             Provenance::new(SourceTag::Wikipedia, None),
//!         )
//!         .with_counts(Some(s), Some(d))
//!     })
//!     .collect();
//!
//! let report = analyze(&records, &AnalysisConfig::default(), None);
//! assert_eq!(report.summary.sex_ratio, Measure::Defined(1.5));
//! ```

#![warn(missing_docs)]

mod aggregate;
mod config;
pub mod distributions;
mod error;
mod measure;
mod report;
mod significance;

pub use aggregate::{
    daughter_proportions, group_by, largest_families, mean_total_children, missing_daughters,
    pooled_proportion_daughters, proportion_daughters, sex_ratio, summarize, FamilySummary,
    GroupField, GroupStats, MissingDaughters, UNKNOWN_GROUP,
};
pub use config::{AnalysisConfig, VarianceAssumption};
pub use error::StatsError;
pub use measure::{Measure, Undefined};
pub use report::{analyze, compare, AnalysisReport, ComparisonReport, FamilyRow};
pub use significance::{
    bootstrap_se, bootstrap_se_with_rng, chi_square_contingency, goodness_of_fit,
    one_sample_test, two_sample_test, BootstrapEstimate, ChiSquareTest, TTest, TableStatus,
};
