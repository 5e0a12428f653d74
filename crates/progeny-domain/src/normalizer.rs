//! Field normalization for sons/daughters counts
//!
//! Collectors hand over counts as integers, floats, digit strings or English
//! number words ("Two", "one"). The normalizer maps all of these onto an
//! optional non-negative integer and reports anything else as
//! [`InvalidCount`]. It is a pure function of its input.

use crate::RawValue;
use thiserror::Error;

/// English number words accepted in count fields, indexed by value
const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

/// A raw count that could not be read as a non-negative integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCount {
    /// Value is below zero
    #[error("negative count {0}")]
    Negative(String),

    /// Float with a fractional part
    #[error("non-integral count {0}")]
    NonIntegral(String),

    /// Integer too large for a count
    #[error("count {0} out of range")]
    OutOfRange(String),

    /// Text that is neither a digit string nor a known number word
    #[error("unrecognized count {0:?}")]
    Unrecognized(String),
}

/// Converts raw count values into `Option<u32>`
///
/// # Examples
///
/// ```
/// use progeny_domain::{FieldNormalizer, RawValue};
///
/// let normalizer = FieldNormalizer::default();
/// assert_eq!(normalizer.normalize(Some(&RawValue::from("Two"))), Ok(Some(2)));
/// assert_eq!(normalizer.normalize(Some(&RawValue::from("2"))), Ok(Some(2)));
/// assert_eq!(normalizer.normalize(None), Ok(None));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNormalizer {
    /// Treat empty or whitespace-only text as absent rather than invalid
    pub blank_as_absent: bool,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self {
            blank_as_absent: true,
        }
    }
}

impl FieldNormalizer {
    /// Create a normalizer
    pub fn new(blank_as_absent: bool) -> Self {
        Self { blank_as_absent }
    }

    /// Normalize one raw value
    ///
    /// `None` in gives `Ok(None)` out: unknown stays unknown and is never
    /// turned into zero.
    pub fn normalize(&self, raw: Option<&RawValue>) -> Result<Option<u32>, InvalidCount> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        match raw {
            RawValue::Integer(n) => from_integer(*n).map(Some),
            RawValue::Float(f) => from_float(*f).map(Some),
            RawValue::Text(s) => self.from_text(s),
        }
    }

    fn from_text(&self, s: &str) -> Result<Option<u32>, InvalidCount> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return if self.blank_as_absent {
                Ok(None)
            } else {
                Err(InvalidCount::Unrecognized(s.to_string()))
            };
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u32>()
                .map(Some)
                .map_err(|_| InvalidCount::OutOfRange(trimmed.to_string()));
        }

        if let Some(digits) = trimmed.strip_prefix('-') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InvalidCount::Negative(trimmed.to_string()));
            }
        }

        let lower = trimmed.to_lowercase();
        NUMBER_WORDS
            .iter()
            .position(|word| *word == lower)
            .map(|value| Some(value as u32))
            .ok_or_else(|| InvalidCount::Unrecognized(s.to_string()))
    }
}

fn from_integer(n: i64) -> Result<u32, InvalidCount> {
    if n < 0 {
        return Err(InvalidCount::Negative(n.to_string()));
    }
    u32::try_from(n).map_err(|_| InvalidCount::OutOfRange(n.to_string()))
}

fn from_float(f: f64) -> Result<u32, InvalidCount> {
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(InvalidCount::NonIntegral(f.to_string()));
    }
    if f < 0.0 {
        return Err(InvalidCount::Negative(f.to_string()));
    }
    if f > f64::from(u32::MAX) {
        return Err(InvalidCount::OutOfRange(f.to_string()));
    }
    Ok(f as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(value: impl Into<RawValue>) -> Result<Option<u32>, InvalidCount> {
        FieldNormalizer::default().normalize(Some(&value.into()))
    }

    #[test]
    fn test_absent_is_none_not_zero() {
        let normalizer = FieldNormalizer::default();
        assert_eq!(normalizer.normalize(None), Ok(None));
        assert_eq!(norm("0"), Ok(Some(0)));
        assert_ne!(normalizer.normalize(None), norm("0"));
    }

    #[test]
    fn test_number_words_case_and_whitespace() {
        assert_eq!(norm("Two"), Ok(Some(2)));
        assert_eq!(norm("  one "), Ok(Some(1)));
        assert_eq!(norm("TWENTY"), Ok(Some(20)));
        assert_eq!(norm("Zero"), Ok(Some(0)));
    }

    #[test]
    fn test_numeric_inputs() {
        assert_eq!(norm(3i64), Ok(Some(3)));
        assert_eq!(norm(3.0), Ok(Some(3)));
        assert_eq!(norm(" 4 "), Ok(Some(4)));
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(matches!(norm(-1i64), Err(InvalidCount::Negative(_))));
        assert!(matches!(norm(-2.0), Err(InvalidCount::Negative(_))));
        assert!(matches!(norm("-3"), Err(InvalidCount::Negative(_))));
    }

    #[test]
    fn test_non_integral_float_rejected() {
        assert!(matches!(norm(1.5), Err(InvalidCount::NonIntegral(_))));
        assert!(matches!(norm(f64::NAN), Err(InvalidCount::NonIntegral(_))));
    }

    #[test]
    fn test_unrecognized_text_rejected() {
        assert!(matches!(norm("many"), Err(InvalidCount::Unrecognized(_))));
        assert!(matches!(norm("2.5"), Err(InvalidCount::Unrecognized(_))));
        assert!(matches!(norm("twenty-one"), Err(InvalidCount::Unrecognized(_))));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(norm(i64::MAX), Err(InvalidCount::OutOfRange(_))));
        assert!(matches!(norm("99999999999"), Err(InvalidCount::OutOfRange(_))));
    }

    #[test]
    fn test_blank_text_policy() {
        assert_eq!(norm(""), Ok(None));
        assert_eq!(norm("   "), Ok(None));

        let strict = FieldNormalizer::new(false);
        assert!(strict.normalize(Some(&RawValue::from(""))).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every number word and its digit form normalize to the same value
        #[test]
        fn test_word_and_digit_agree(value in 0usize..=20) {
            let normalizer = FieldNormalizer::default();
            let word = RawValue::from(NUMBER_WORDS[value].to_uppercase());
            let digits = RawValue::from(value.to_string());

            let from_word = normalizer.normalize(Some(&word));
            let from_digits = normalizer.normalize(Some(&digits));
            prop_assert_eq!(from_word.clone(), from_digits);
            prop_assert_eq!(from_word, Ok(Some(value as u32)));
        }

        /// Property: normalization is deterministic
        #[test]
        fn test_deterministic(text in ".{0,12}") {
            let normalizer = FieldNormalizer::default();
            let raw = RawValue::from(text);
            prop_assert_eq!(normalizer.normalize(Some(&raw)), normalizer.normalize(Some(&raw)));
        }

        /// Property: any non-negative integer in range is accepted unchanged
        #[test]
        fn test_integers_pass_through(n in 0u32..=u32::MAX) {
            let normalizer = FieldNormalizer::default();
            prop_assert_eq!(normalizer.normalize(Some(&RawValue::from(n))), Ok(Some(n)));
        }
    }
}
