//! Provenance tracking

use crate::SourceTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where and when a record was observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source the record was extracted from
    pub source: SourceTag,

    /// When the record was extracted (None when the collector did not say)
    pub collected_at: Option<DateTime<Utc>>,

    /// Label of the dataset the record arrived in (e.g. "lok_sabha_17")
    pub dataset: Option<String>,
}

impl Provenance {
    /// Create a new provenance entry
    pub fn new(source: SourceTag, collected_at: Option<DateTime<Utc>>) -> Self {
        Self {
            source,
            collected_at,
            dataset: None,
        }
    }

    /// Attach a dataset label
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }
}
