//! Raw records as handed over by scrapers, extractors and manual entry
//!
//! Nothing here is validated. Count fields keep whatever type the collector
//! produced (`"Two"`, `"2"`, `2`, `2.0`, `""`, or nothing at all) so that the
//! normalizer can decide what is a count and what is a rejection.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A single loosely-typed field value
///
/// JSON `null` is represented by the surrounding `Option` being `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Whole number
    Integer(i64),

    /// Floating point number (may or may not be integral)
    Float(f64),

    /// Free text (number words, digit strings, junk)
    Text(String),
}

impl RawValue {
    /// Render the value as a trimmed text label
    ///
    /// Used for identifier-like fields such as session numbers, which show up
    /// as `17`, `17.0` or `"17"` depending on the collector. Blank text
    /// yields `None`.
    pub fn as_label(&self) -> Option<String> {
        match self {
            RawValue::Integer(n) => Some(n.to_string()),
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                Some(format!("{}", *f as i64))
            }
            RawValue::Float(f) => Some(f.to_string()),
            RawValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Integer(n) => write!(f, "{}", n),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Integer(i64::from(value))
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Integer(i64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// One extracted row describing a politician
///
/// Field names follow the collection scripts' JSON dumps; `names` (older CSV
/// exports) and `assembly`/`session` are accepted as aliases. Text fields
/// take numbers as well (`"party": 7` reads as `"7"`), and `collected_at`
/// takes naive timestamps as UTC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Display name
    #[serde(default, alias = "names", deserialize_with = "lenient_text")]
    pub name: Option<String>,

    /// Party label
    #[serde(default, deserialize_with = "lenient_text")]
    pub party: Option<String>,

    /// State label
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,

    /// Constituency label
    #[serde(default, deserialize_with = "lenient_text")]
    pub constituency: Option<String>,

    /// Legislative session or assembly the row was observed in
    #[serde(default, alias = "assembly", alias = "session")]
    pub session_or_assembly: Option<RawValue>,

    /// Number of sons, untyped
    #[serde(default)]
    pub sons: Option<RawValue>,

    /// Number of daughters, untyped
    #[serde(default)]
    pub daughters: Option<RawValue>,

    /// Free-form source label written by the collector
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: Option<String>,

    /// Extraction timestamp
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub collected_at: Option<DateTime<Utc>>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawValue>::deserialize(deserializer)?.and_then(|v| v.as_label()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(&text)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("unrecognized timestamp {:?}", text)))
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a collection timestamp
///
/// Accepts RFC 3339 (`2024-06-01T10:00:00Z`, `+05:30` offsets), naive
/// date-times such as Python's `isoformat()` output (read as UTC), and bare
/// dates (midnight UTC).
///
/// # Examples
///
/// ```
/// use progeny_domain::raw::parse_timestamp;
///
/// let aware = parse_timestamp("2024-06-01T10:00:00Z").unwrap();
/// let naive = parse_timestamp("2024-06-01T10:00:00.000000").unwrap();
/// assert_eq!(aware, naive);
/// assert!(parse_timestamp("last tuesday").is_none());
/// ```
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(aware) = DateTime::parse_from_rfc3339(text) {
        return Some(aware.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// A row that could not be read as a [`RawRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// Name, when the row carried a readable one
    pub name: Option<String>,
    /// What was wrong with the row
    pub message: String,
}

/// One row of a dump as a loader read it
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    /// Read into a raw record (not yet validated)
    Record(RawRecord),
    /// Unreadable; becomes a rejection during validation
    Malformed(MalformedRow),
}

impl From<RawRecord> for RawRow {
    fn from(record: RawRecord) -> Self {
        RawRow::Record(record)
    }
}

impl RawRecord {
    /// Start a raw record with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the sons field
    pub fn sons(mut self, value: impl Into<RawValue>) -> Self {
        self.sons = Some(value.into());
        self
    }

    /// Set the daughters field
    pub fn daughters(mut self, value: impl Into<RawValue>) -> Self {
        self.daughters = Some(value.into());
        self
    }

    /// Set the party label
    pub fn party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    /// Set the state label
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the constituency label
    pub fn constituency(mut self, constituency: impl Into<String>) -> Self {
        self.constituency = Some(constituency.into());
        self
    }

    /// Set the session/assembly identifier
    pub fn session(mut self, session: impl Into<RawValue>) -> Self {
        self.session_or_assembly = Some(session.into());
        self
    }

    /// Set the collector's source label
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the extraction timestamp
    pub fn collected_at(mut self, at: DateTime<Utc>) -> Self {
        self.collected_at = Some(at);
        self
    }
}
