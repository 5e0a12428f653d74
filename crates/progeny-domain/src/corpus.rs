//! Dataset corpus - an immutable, ordered collection of records

use crate::PoliticianRecord;

/// Ordered records owned by whichever pipeline stage holds them
///
/// Stages never edit a corpus; they build a new one. Filtering for a
/// computation produces a borrowed view and leaves the corpus intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetCorpus {
    label: Option<String>,
    records: Vec<PoliticianRecord>,
}

impl DatasetCorpus {
    /// Create a corpus from records
    pub fn new(records: Vec<PoliticianRecord>) -> Self {
        Self {
            label: None,
            records,
        }
    }

    /// Create a labelled corpus (e.g. "rajya_sabha_2024")
    pub fn labelled(label: impl Into<String>, records: Vec<PoliticianRecord>) -> Self {
        Self {
            label: Some(label.into()),
            records,
        }
    }

    /// Dataset label, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Records in order
    pub fn records(&self) -> &[PoliticianRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records
    pub fn iter(&self) -> std::slice::Iter<'_, PoliticianRecord> {
        self.records.iter()
    }

    /// Borrowed view of the records matching a predicate
    pub fn view<F>(&self, predicate: F) -> Vec<&PoliticianRecord>
    where
        F: Fn(&PoliticianRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(*r)).collect()
    }

    /// Records with both sons and daughters known
    pub fn complete(&self) -> Vec<&PoliticianRecord> {
        self.view(PoliticianRecord::has_complete_counts)
    }

    /// Fraction of records with both counts known, `None` for an empty corpus
    pub fn completeness(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        Some(self.complete().len() as f64 / self.records.len() as f64)
    }

    /// Consume the corpus, yielding its records
    pub fn into_records(self) -> Vec<PoliticianRecord> {
        self.records
    }
}

impl FromIterator<PoliticianRecord> for DatasetCorpus {
    fn from_iter<I: IntoIterator<Item = PoliticianRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DatasetCorpus {
    type Item = &'a PoliticianRecord;
    type IntoIter = std::slice::Iter<'a, PoliticianRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
