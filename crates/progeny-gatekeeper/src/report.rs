//! Rejection reports and batch results

use crate::RejectionReason;
use progeny_domain::DatasetCorpus;
use std::collections::BTreeMap;

/// One rejected input row
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position of the row in the input batch
    pub index: usize,
    /// Name as it appeared in the row, if any
    pub name: Option<String>,
    /// Why the row was rejected
    pub reason: RejectionReason,
}

/// Rejections accumulated over a batch, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RejectionReport {
    /// Rejected rows
    pub entries: Vec<Rejection>,
}

impl RejectionReport {
    /// Record a rejection
    pub fn push(&mut self, rejection: Rejection) {
        self.entries.push(rejection);
    }

    /// Number of rejected rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was rejected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rejection counts grouped by reason kind
    pub fn counts_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.reason.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Iterate over rejections
    pub fn iter(&self) -> std::slice::Iter<'_, Rejection> {
        self.entries.iter()
    }
}

/// Outcome of validating a batch: the accepted corpus and everything else
#[derive(Debug, Clone)]
pub struct BatchValidation {
    /// Accepted records
    pub corpus: DatasetCorpus,
    /// Rejected rows
    pub rejections: RejectionReport,
    /// Number of input rows
    pub total: usize,
}

impl BatchValidation {
    /// Number of accepted records
    pub fn accepted(&self) -> usize {
        self.corpus.len()
    }

    /// Number of rejected rows
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }

    /// Accepted share of the input (None for an empty batch)
    pub fn acceptance_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.accepted() as f64 / self.total as f64)
    }

    /// Share of input rows that produced complete family data
    pub fn usable_family_data_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.corpus.complete().len() as f64 / self.total as f64)
    }

    /// Get a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Validated {} records: {} accepted, {} rejected, {} with complete family data ({:.1}%)",
            self.total,
            self.accepted(),
            self.rejected(),
            self.corpus.complete().len(),
            self.usable_family_data_rate().unwrap_or(0.0) * 100.0
        )
    }
}
