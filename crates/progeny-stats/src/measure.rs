//! Results that may be undefined

use serde::Serialize;

/// Why a measure has no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Undefined {
    /// No record qualified for the computation
    NoData,
    /// The denominator summed to zero
    DivisionByZero,
}

/// A statistic that is either a number or an explicit undefined marker
///
/// Never `inf` or `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Measure {
    /// A finite value
    Defined(f64),
    /// No value, with the reason
    Undefined(Undefined),
}

impl Measure {
    /// `numerator / denominator`, undefined when the denominator is zero
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Measure::Undefined(Undefined::DivisionByZero)
        } else {
            Measure::Defined(numerator / denominator)
        }
    }

    /// The value, if defined
    pub fn value(&self) -> Option<f64> {
        match self {
            Measure::Defined(v) => Some(*v),
            Measure::Undefined(_) => None,
        }
    }

    /// Whether the measure has a value
    pub fn is_defined(&self) -> bool {
        matches!(self, Measure::Defined(_))
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Measure::Defined(v) => write!(f, "{:.4}", v),
            Measure::Undefined(Undefined::NoData) => f.write_str("n/a (no data)"),
            Measure::Undefined(Undefined::DivisionByZero) => {
                f.write_str("undefined (zero denominator)")
            }
        }
    }
}
