//! Significance testing: bootstrap, t-tests and chi-square

use crate::distributions::{chi_square_sf, student_t_two_sided};
use crate::{Measure, StatsError, VarianceAssumption};
use progeny_domain::PoliticianRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::borrow::Borrow;
use tracing::debug;

/// Bootstrap standard error of a statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapEstimate {
    /// Sample standard deviation of the defined replicates
    pub standard_error: f64,
    /// Mean of the defined replicates
    pub replicate_mean: f64,
    /// Resamples drawn
    pub iterations: usize,
    /// Resamples whose statistic was undefined and were skipped
    pub undefined_replicates: usize,
}

/// Bootstrap standard error with a generator seeded from `seed`
///
/// Identical input, statistic and seed give identical output.
///
/// # Examples
///
/// ```
/// use progeny_domain::{IdentityKey, PoliticianRecord, Provenance, SourceTag};
/// use progeny_stats::{bootstrap_se, sex_ratio};
///
/// let records: Vec<_> = (0..20u32)
///     .map(|i| {
///         PoliticianRecord::new(
///             IdentityKey::from_name(&format!("p{}", i)).unwrap(),
///             format!("P{}", i),
///             Provenance::new(SourceTag::Manual, None),
///         )
///         .with_counts(Some(i % 3), Some(1 + i % 2))
///     })
///     .collect();
///
/// let a = bootstrap_se(&records, |s| sex_ratio(s), 200, 314).unwrap();
/// let b = bootstrap_se(&records, |s| sex_ratio(s), 200, 314).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn bootstrap_se<R, F>(
    records: &[R],
    statistic: F,
    iterations: usize,
    seed: u64,
) -> Result<BootstrapEstimate, StatsError>
where
    R: Borrow<PoliticianRecord>,
    F: Fn(&[&PoliticianRecord]) -> Measure,
{
    let mut rng = StdRng::seed_from_u64(seed);
    bootstrap_se_with_rng(records, statistic, iterations, &mut rng)
}

/// Bootstrap standard error drawing from a caller-supplied generator
///
/// Each resample has the size of the input and is drawn with replacement.
/// Undefined replicates are skipped and counted; fewer than two defined
/// replicates is an [`StatsError::InsufficientSample`].
pub fn bootstrap_se_with_rng<R, F, G>(
    records: &[R],
    statistic: F,
    iterations: usize,
    rng: &mut G,
) -> Result<BootstrapEstimate, StatsError>
where
    R: Borrow<PoliticianRecord>,
    F: Fn(&[&PoliticianRecord]) -> Measure,
    G: Rng + ?Sized,
{
    let n = records.len();
    if n == 0 {
        return Err(StatsError::InsufficientSample {
            required: 1,
            actual: 0,
        });
    }

    let mut replicates = Vec::with_capacity(iterations);
    let mut undefined = 0;
    let mut resample: Vec<&PoliticianRecord> = Vec::with_capacity(n);

    for _ in 0..iterations {
        resample.clear();
        resample.extend((0..n).map(|_| records[rng.gen_range(0..n)].borrow()));
        match statistic(&resample).value() {
            Some(v) => replicates.push(v),
            None => undefined += 1,
        }
    }

    if undefined > 0 {
        debug!("Skipped {} undefined bootstrap replicates", undefined);
    }
    if replicates.len() < 2 {
        return Err(StatsError::InsufficientSample {
            required: 2,
            actual: replicates.len(),
        });
    }

    let (mean, variance) = mean_and_variance(&replicates);
    Ok(BootstrapEstimate {
        standard_error: variance.sqrt(),
        replicate_mean: mean,
        iterations,
        undefined_replicates: undefined,
    })
}

/// Mean and sample variance (n - 1 denominator); needs at least two values
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (mean, squares / (n - 1.0))
}

fn require_sample(values: &[f64]) -> Result<(), StatsError> {
    if values.len() < 2 {
        return Err(StatsError::InsufficientSample {
            required: 2,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Outcome of a t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    /// t statistic
    pub statistic: f64,
    /// Degrees of freedom (fractional under Welch)
    pub degrees_of_freedom: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Sample mean minus reference, or mean of A minus mean of B
    pub mean_difference: f64,
    /// Standard error of the difference
    pub standard_error: f64,
}

/// One-sample t-test of `sample` against a fixed reference mean
///
/// Typically the per-politician daughter proportions against 0.4878.
pub fn one_sample_test(sample: &[f64], reference: f64) -> Result<TTest, StatsError> {
    require_sample(sample)?;

    let n = sample.len() as f64;
    let (mean, variance) = mean_and_variance(sample);
    let standard_error = (variance / n).sqrt();
    if standard_error == 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    let statistic = (mean - reference) / standard_error;
    let degrees_of_freedom = n - 1.0;
    Ok(TTest {
        statistic,
        degrees_of_freedom,
        p_value: student_t_two_sided(statistic, degrees_of_freedom),
        mean_difference: mean - reference,
        standard_error,
    })
}

/// Independent two-sample t-test of A against B
pub fn two_sample_test(
    group_a: &[f64],
    group_b: &[f64],
    variance: VarianceAssumption,
) -> Result<TTest, StatsError> {
    require_sample(group_a)?;
    require_sample(group_b)?;

    let (na, nb) = (group_a.len() as f64, group_b.len() as f64);
    let (mean_a, var_a) = mean_and_variance(group_a);
    let (mean_b, var_b) = mean_and_variance(group_b);

    let (standard_error, degrees_of_freedom) = match variance {
        VarianceAssumption::Welch => {
            let (sa, sb) = (var_a / na, var_b / nb);
            let se2 = sa + sb;
            let df = se2.powi(2) / (sa.powi(2) / (na - 1.0) + sb.powi(2) / (nb - 1.0));
            (se2.sqrt(), df)
        }
        VarianceAssumption::Pooled => {
            let df = na + nb - 2.0;
            let pooled = ((na - 1.0) * var_a + (nb - 1.0) * var_b) / df;
            ((pooled * (1.0 / na + 1.0 / nb)).sqrt(), df)
        }
    };
    if standard_error == 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    let statistic = (mean_a - mean_b) / standard_error;
    Ok(TTest {
        statistic,
        degrees_of_freedom,
        p_value: student_t_two_sided(statistic, degrees_of_freedom),
        mean_difference: mean_a - mean_b,
        standard_error,
    })
}

/// Whether a chi-square result carries evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableStatus {
    /// All margins populated
    Valid,
    /// A row or column total is zero; chi2 = 0 and p = 1 mean "no evidence"
    Degenerate,
}

/// Outcome of a chi-square test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareTest {
    /// Chi-square statistic
    pub statistic: f64,
    /// Upper-tail p-value
    pub p_value: f64,
    /// Degrees of freedom
    pub degrees_of_freedom: usize,
    /// Expected counts under independence (or the reference proportion)
    pub expected: Vec<Vec<f64>>,
    /// Whether the table supports inference
    pub status: TableStatus,
    /// Whether Yates' correction was applied
    pub yates_corrected: bool,
}

impl ChiSquareTest {
    /// True when the table was degenerate
    pub fn is_degenerate(&self) -> bool {
        self.status == TableStatus::Degenerate
    }

    fn degenerate(expected: Vec<Vec<f64>>, degrees_of_freedom: usize) -> Self {
        Self {
            statistic: 0.0,
            p_value: 1.0,
            degrees_of_freedom,
            expected,
            status: TableStatus::Degenerate,
            yates_corrected: false,
        }
    }
}

/// Chi-square test of association for a 2 x k table
///
/// `counts_a` and `counts_b` are the two rows, e.g. `[sons, daughters]` for
/// two groups. Yates' correction applies only to 2 x 2 tables, when asked
/// for. A zero row or column total gives a [`TableStatus::Degenerate`]
/// result with chi2 = 0 and p = 1.
pub fn chi_square_contingency(
    counts_a: &[u64],
    counts_b: &[u64],
    yates: bool,
) -> Result<ChiSquareTest, StatsError> {
    if counts_a.len() != counts_b.len() || counts_a.len() < 2 {
        return Err(StatsError::ShapeMismatch {
            left: counts_a.len(),
            right: counts_b.len(),
        });
    }

    let rows = [counts_a, counts_b];
    let row_totals: Vec<f64> = rows.iter().map(|r| r.iter().sum::<u64>() as f64).collect();
    let col_totals: Vec<f64> = (0..counts_a.len())
        .map(|j| (counts_a[j] + counts_b[j]) as f64)
        .collect();
    let grand_total: f64 = row_totals.iter().sum();
    let degrees_of_freedom = counts_a.len() - 1;

    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|rt| {
            col_totals
                .iter()
                .map(|ct| {
                    if grand_total > 0.0 {
                        rt * ct / grand_total
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    if row_totals.iter().chain(&col_totals).any(|t| *t == 0.0) {
        debug!("Degenerate contingency table: {:?} / {:?}", counts_a, counts_b);
        return Ok(ChiSquareTest::degenerate(expected, degrees_of_freedom));
    }

    let yates_corrected = yates && degrees_of_freedom == 1;
    let mut statistic = 0.0;
    for (row, expected_row) in rows.iter().zip(&expected) {
        for (&observed, &e) in row.iter().zip(expected_row) {
            let mut deviation = (observed as f64 - e).abs();
            if yates_corrected {
                deviation = (deviation - 0.5).max(0.0);
            }
            statistic += deviation * deviation / e;
        }
    }

    Ok(ChiSquareTest {
        statistic,
        p_value: chi_square_sf(statistic, degrees_of_freedom as f64),
        degrees_of_freedom,
        expected,
        status: TableStatus::Valid,
        yates_corrected,
    })
}

/// Chi-square goodness of fit of sons/daughters against a daughter proportion
///
/// One degree of freedom, no continuity correction. No children at all gives
/// a degenerate result.
pub fn goodness_of_fit(
    sons: u64,
    daughters: u64,
    reference_proportion: f64,
) -> Result<ChiSquareTest, StatsError> {
    if !(reference_proportion > 0.0 && reference_proportion < 1.0) {
        return Err(StatsError::InvalidParameter(format!(
            "reference proportion must be strictly between 0 and 1, got {}",
            reference_proportion
        )));
    }

    let total = (sons + daughters) as f64;
    let expected_daughters = total * reference_proportion;
    let expected_sons = total - expected_daughters;
    let expected = vec![vec![expected_sons, expected_daughters]];

    if total == 0.0 {
        return Ok(ChiSquareTest::degenerate(expected, 1));
    }

    let statistic = (sons as f64 - expected_sons).powi(2) / expected_sons
        + (daughters as f64 - expected_daughters).powi(2) / expected_daughters;

    Ok(ChiSquareTest {
        statistic,
        p_value: chi_square_sf(statistic, 1.0),
        degrees_of_freedom: 1,
        expected,
        status: TableStatus::Valid,
        yates_corrected: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{proportion_daughters, sex_ratio};
    use progeny_domain::{IdentityKey, Provenance, SourceTag};

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn records(counts: &[(u32, u32)]) -> Vec<PoliticianRecord> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &(s, d))| {
                let name = format!("p{}", i);
                PoliticianRecord::new(
                    IdentityKey::from_name(&name).unwrap(),
                    name,
                    Provenance::new(SourceTag::Manual, None),
                )
                .with_counts(Some(s), Some(d))
            })
            .collect()
    }

    #[test]
    fn test_bootstrap_reproducible() {
        let input = records(&[(2, 1), (1, 1), (0, 2), (3, 1), (1, 0), (2, 2), (0, 1)]);

        let first = bootstrap_se(&input, |s| sex_ratio(s), 1000, 314).unwrap();
        let second = bootstrap_se(&input, |s| sex_ratio(s), 1000, 314).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iterations, 1000);
        assert!(first.standard_error > 0.0);

        let other = bootstrap_se(&input, |s| sex_ratio(s), 1000, 315).unwrap();
        assert_ne!(first.standard_error, other.standard_error);
    }

    #[test]
    fn test_bootstrap_constant_statistic() {
        let input = records(&[(2, 1), (4, 2), (6, 3)]);
        let estimate = bootstrap_se(&input, |s| sex_ratio(s), 100, 1).unwrap();
        assert!(close(estimate.standard_error, 0.0, 1e-12));
        assert!(close(estimate.replicate_mean, 2.0, 1e-12));
    }

    #[test]
    fn test_bootstrap_skips_undefined_replicates() {
        // Resamples containing only the daughterless record have no ratio
        let input = records(&[(1, 0), (1, 1)]);
        let estimate = bootstrap_se(&input, |s| sex_ratio(s), 500, 314).unwrap();
        assert!(estimate.undefined_replicates > 0);
        assert!(estimate.undefined_replicates < 500);
    }

    #[test]
    fn test_bootstrap_insufficient() {
        let empty: Vec<PoliticianRecord> = Vec::new();
        assert!(matches!(
            bootstrap_se(&empty, |s| sex_ratio(s), 100, 314),
            Err(StatsError::InsufficientSample { .. })
        ));

        let no_daughters = records(&[(1, 0), (2, 0)]);
        assert_eq!(
            bootstrap_se(&no_daughters, |s| proportion_daughters(s), 0, 314),
            Err(StatsError::InsufficientSample {
                required: 2,
                actual: 0
            })
        );
    }

    #[test]
    fn test_one_sample() {
        let result = one_sample_test(&[1.0, 2.0, 3.0, 4.0, 5.0], 2.0).unwrap();
        assert!(close(result.statistic, 2f64.sqrt(), 1e-12));
        assert_eq!(result.degrees_of_freedom, 4.0);
        assert!(close(result.p_value, 0.230_199_641, 1e-6));
        assert_eq!(result.mean_difference, 1.0);

        let centred = one_sample_test(&[0.2, 0.4, 0.6], 0.4).unwrap();
        assert!(close(centred.p_value, 1.0, 1e-9));
    }

    #[test]
    fn test_one_sample_guards() {
        assert_eq!(
            one_sample_test(&[0.5], 0.4878),
            Err(StatsError::InsufficientSample {
                required: 2,
                actual: 1
            })
        );
        assert_eq!(
            one_sample_test(&[0.5, 0.5, 0.5], 0.4878),
            Err(StatsError::ZeroVariance)
        );
    }

    #[test]
    fn test_two_sample() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];

        let welch = two_sample_test(&a, &b, VarianceAssumption::Welch).unwrap();
        assert!(close(welch.statistic, -3.0 / 2.5f64.sqrt(), 1e-12));
        assert!(close(welch.degrees_of_freedom, 6.25 / 1.0625, 1e-12));
        assert_eq!(welch.mean_difference, -3.0);

        let pooled = two_sample_test(&a, &b, VarianceAssumption::Pooled).unwrap();
        assert!(close(pooled.statistic, welch.statistic, 1e-12));
        assert_eq!(pooled.degrees_of_freedom, 8.0);
        assert!(pooled.p_value < welch.p_value);

        assert!(matches!(
            two_sample_test(&a, &[1.0], VarianceAssumption::Welch),
            Err(StatsError::InsufficientSample { actual: 1, .. })
        ));
    }

    #[test]
    fn test_chi_square_with_yates() {
        let result = chi_square_contingency(&[10, 20], &[20, 10], true).unwrap();
        assert_eq!(result.status, TableStatus::Valid);
        assert!(result.yates_corrected);
        assert!(close(result.statistic, 5.4, 1e-12));
        assert!(close(result.p_value, 0.020_136_751_550_346, 1e-9));
        assert_eq!(result.expected, vec![vec![15.0, 15.0], vec![15.0, 15.0]]);

        let uncorrected = chi_square_contingency(&[10, 20], &[20, 10], false).unwrap();
        assert!(close(uncorrected.statistic, 20.0 / 3.0, 1e-12));
    }

    #[test]
    fn test_chi_square_degenerate() {
        let result = chi_square_contingency(&[5, 0], &[0, 0], true).unwrap();
        assert!(result.is_degenerate());
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);

        // A real p = 1 is distinguishable from a degenerate one
        let balanced = chi_square_contingency(&[10, 10], &[10, 10], true).unwrap();
        assert_eq!(balanced.p_value, 1.0);
        assert!(!balanced.is_degenerate());
    }

    #[test]
    fn test_chi_square_shape() {
        assert_eq!(
            chi_square_contingency(&[1, 2, 3], &[1, 2], true),
            Err(StatsError::ShapeMismatch { left: 3, right: 2 })
        );

        let wide = chi_square_contingency(&[10, 20, 30], &[30, 20, 10], true).unwrap();
        assert_eq!(wide.degrees_of_freedom, 2);
        assert!(!wide.yates_corrected);
    }

    #[test]
    fn test_goodness_of_fit() {
        let result = goodness_of_fit(60, 40, 0.5).unwrap();
        assert!(close(result.statistic, 4.0, 1e-12));
        assert!(close(result.p_value, 0.045_500_263_896, 1e-9));

        assert!(goodness_of_fit(0, 0, 0.4878).unwrap().is_degenerate());
        assert!(matches!(
            goodness_of_fit(1, 1, 1.5),
            Err(StatsError::InvalidParameter(_))
        ));
    }
}
