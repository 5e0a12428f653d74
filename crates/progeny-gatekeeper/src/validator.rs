//! Record validation logic

use crate::{BatchValidation, GatekeeperError, Rejection, RejectionReport, ValidationConfig};
use progeny_domain::traits::RecordSource;
use progeny_domain::{
    DatasetCorpus, FieldNormalizer, IdentityKey, InvalidCount, PoliticianRecord, Provenance,
    RawRecord, RawRow, SourceTag,
};
use tracing::{debug, info, warn};

/// Which count field failed normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountField {
    /// The sons field
    Sons,
    /// The daughters field
    Daughters,
}

impl CountField {
    /// Field name as it appears in raw records
    pub fn as_str(&self) -> &'static str {
        match self {
            CountField::Sons => "sons",
            CountField::Daughters => "daughters",
        }
    }
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Name missing or blank
    MissingIdentity,

    /// A count field could not be normalized
    InvalidFieldValue {
        /// Offending field
        field: CountField,
        /// What was wrong with it
        error: InvalidCount,
    },

    /// The row could not be read at all (wrong field type, bad timestamp)
    MalformedRow {
        /// Loader's description of the problem
        message: String,
    },
}

impl RejectionReason {
    /// Stable name of the rejection kind, for grouping in reports
    pub fn kind(&self) -> &'static str {
        match self {
            RejectionReason::MissingIdentity => "MissingIdentity",
            RejectionReason::InvalidFieldValue { .. } => "InvalidFieldValue",
            RejectionReason::MalformedRow { .. } => "MalformedRow",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::MissingIdentity => write!(f, "missing identity: name is empty"),
            RejectionReason::InvalidFieldValue { field, error } => {
                write!(f, "invalid {} value: {}", field.as_str(), error)
            }
            RejectionReason::MalformedRow { message } => write!(f, "malformed row: {}", message),
        }
    }
}

/// The validator turns raw records into politician records
pub struct RecordValidator {
    config: ValidationConfig,
    normalizer: FieldNormalizer,
}

impl RecordValidator {
    /// Create a new validator with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        let normalizer = FieldNormalizer::new(config.blank_as_absent);
        Self { config, normalizer }
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate one raw record
    ///
    /// A record with both counts missing is accepted; it only drops out of
    /// ratio computations later. Any invalid count rejects the whole record.
    pub fn validate(
        &self,
        raw: &RawRecord,
        source: SourceTag,
    ) -> Result<PoliticianRecord, RejectionReason> {
        let name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(RejectionReason::MissingIdentity)?;

        let sons = self
            .normalizer
            .normalize(raw.sons.as_ref())
            .map_err(|error| RejectionReason::InvalidFieldValue {
                field: CountField::Sons,
                error,
            })?;
        let daughters = self
            .normalizer
            .normalize(raw.daughters.as_ref())
            .map_err(|error| RejectionReason::InvalidFieldValue {
                field: CountField::Daughters,
                error,
            })?;

        let state = clean_label(raw.state.as_deref());
        let session = raw.session_or_assembly.as_ref().and_then(|s| s.as_label());

        let identity_key = self
            .identity_key(name, state.as_deref(), session.as_deref())
            .ok_or(RejectionReason::MissingIdentity)?;

        Ok(
            PoliticianRecord::new(identity_key, name, Provenance::new(source, raw.collected_at))
                .with_counts(sons, daughters)
                .with_party(clean_label(raw.party.as_deref()))
                .with_state(state)
                .with_constituency(clean_label(raw.constituency.as_deref()))
                .with_session(session),
        )
    }

    /// Validate a batch of raw records
    ///
    /// Always completes. Rows naming a recognised source keep it; the rest
    /// get `default_source`. When `dataset` is given, accepted records and the
    /// resulting corpus carry that label.
    pub fn validate_batch(
        &self,
        raws: &[RawRecord],
        default_source: SourceTag,
        dataset: Option<&str>,
    ) -> BatchValidation {
        let outcomes = raws.iter().map(|raw| {
            let source = resolve_source(raw, default_source);
            (raw.name.as_deref(), self.validate(raw, source))
        });
        self.collect_batch(outcomes, raws.len(), dataset)
    }

    /// Validate rows as a loader read them
    ///
    /// Like [`validate_batch`](Self::validate_batch), except unreadable rows
    /// are rejected as [`RejectionReason::MalformedRow`] at their position.
    pub fn validate_rows(
        &self,
        rows: &[RawRow],
        default_source: SourceTag,
        dataset: Option<&str>,
    ) -> BatchValidation {
        let outcomes = rows.iter().map(|row| match row {
            RawRow::Record(raw) => {
                let source = resolve_source(raw, default_source);
                (raw.name.as_deref(), self.validate(raw, source))
            }
            RawRow::Malformed(malformed) => (
                malformed.name.as_deref(),
                Err(RejectionReason::MalformedRow {
                    message: malformed.message.clone(),
                }),
            ),
        });
        self.collect_batch(outcomes, rows.len(), dataset)
    }

    fn collect_batch<'a>(
        &self,
        outcomes: impl Iterator<Item = (Option<&'a str>, Result<PoliticianRecord, RejectionReason>)>,
        total: usize,
        dataset: Option<&str>,
    ) -> BatchValidation {
        let mut accepted = Vec::with_capacity(total);
        let mut rejections = RejectionReport::default();

        for (index, (name, outcome)) in outcomes.enumerate() {
            match outcome {
                Ok(record) => {
                    let record = match dataset {
                        Some(label) => record.tagged(label),
                        None => record,
                    };
                    accepted.push(record);
                }
                Err(reason) => {
                    warn!("Rejected record {} ({:?}): {}", index, name, reason);
                    rejections.push(Rejection {
                        index,
                        name: name.map(str::to_string),
                        reason,
                    });
                }
            }
        }

        let corpus = match dataset {
            Some(label) => DatasetCorpus::labelled(label, accepted),
            None => DatasetCorpus::new(accepted),
        };

        let batch = BatchValidation {
            corpus,
            rejections,
            total,
        };
        info!(
            "Validated {} records: {} accepted, {} rejected, {} with complete family data",
            batch.total,
            batch.accepted(),
            batch.rejected(),
            batch.corpus.complete().len()
        );
        batch
    }

    /// Load and validate everything a record source produces
    pub fn validate_source<S: RecordSource>(
        &self,
        source: &S,
    ) -> Result<BatchValidation, GatekeeperError>
    where
        S::Error: std::fmt::Display,
    {
        let dataset = source.dataset_label().to_string();
        let rows = source.raw_records().map_err(|e| GatekeeperError::Source {
            dataset: dataset.clone(),
            message: e.to_string(),
        })?;
        debug!("Loaded {} raw rows from {}", rows.len(), dataset);

        Ok(self.validate_rows(&rows, source.default_source(), Some(&dataset)))
    }

    fn identity_key(
        &self,
        name: &str,
        state: Option<&str>,
        session: Option<&str>,
    ) -> Option<IdentityKey> {
        let mut salts = Vec::new();
        if self.config.disambiguate.uses_state() {
            salts.push(state);
        }
        if self.config.disambiguate.uses_session() {
            salts.push(session);
        }
        IdentityKey::salted(name, &salts)
    }
}

fn resolve_source(raw: &RawRecord, default_source: SourceTag) -> SourceTag {
    match raw.source.as_deref() {
        Some(label) => SourceTag::parse(label).unwrap_or_else(|| {
            debug!("Unknown source label {:?}, using {}", label, default_source);
            default_source
        }),
        None => default_source,
    }
}

/// Trim a free-text label; blank becomes absent
fn clean_label(label: Option<&str>) -> Option<String> {
    label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}
