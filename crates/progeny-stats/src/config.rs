//! Configuration for analysis runs

use serde::{Deserialize, Serialize};

/// Variance assumption for the two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VarianceAssumption {
    /// Unequal variances, Welch-Satterthwaite degrees of freedom
    #[default]
    Welch,
    /// Equal variances, pooled estimate
    Pooled,
}

/// Parameters for significance testing and reporting
///
/// # Examples
///
/// ```
/// use progeny_stats::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.bootstrap_seed, 314);
/// assert_eq!(config.reference_proportion, 0.4878);
///
/// let config = AnalysisConfig::thorough();
/// assert_eq!(config.bootstrap_iterations, 10_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Expected proportion of daughters at birth
    /// Default: 0.4878 (1 / (1 + 1.05))
    pub reference_proportion: f64,

    /// Natural sons-per-daughter ratio, used for the missing daughters estimate
    /// Default: 1.05
    pub natural_sex_ratio: f64,

    /// Groups with fewer sons + daughters than this are flagged low-confidence
    /// Default: 100
    pub low_confidence_min_children: u64,

    /// Bootstrap resamples
    /// Default: 1000
    pub bootstrap_iterations: usize,

    /// Bootstrap seed
    /// Default: 314
    pub bootstrap_seed: u64,

    /// Two-sample t-test variance assumption
    pub variance: VarianceAssumption,

    /// Apply Yates' continuity correction to 2x2 tables
    pub yates_correction: bool,

    /// Rows shown in the largest families table
    /// Default: 10
    pub largest_families: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_proportion: 0.4878,
            natural_sex_ratio: 1.05,
            low_confidence_min_children: 100,
            bootstrap_iterations: 1000,
            bootstrap_seed: 314,
            variance: VarianceAssumption::Welch,
            yates_correction: true,
            largest_families: 10,
        }
    }
}

impl AnalysisConfig {
    /// More bootstrap resamples for publication figures
    pub fn thorough() -> Self {
        Self {
            bootstrap_iterations: 10_000,
            ..Self::default()
        }
    }
}
