//! Trait definitions for external interactions
//!
//! Scrapers, PDF extractors and manual-entry tools live outside the core.
//! They meet it at this boundary by handing over raw rows.

use crate::{RawRow, SourceTag};

/// A collaborator that produces raw records for one dataset
///
/// Implemented by whatever loads scraped dumps (the CLI's JSON loader, a
/// scraper run, a test fixture).
pub trait RecordSource {
    /// Error type for loading
    type Error;

    /// Label of the dataset (e.g. "lok_sabha_18", "kerala_assembly")
    fn dataset_label(&self) -> &str;

    /// Tag applied to rows that don't name their own source
    fn default_source(&self) -> SourceTag;

    /// Load the raw rows
    ///
    /// An `Err` means the dataset as a whole could not be read. Individual
    /// rows that could not be read come back as [`RawRow::Malformed`].
    fn raw_records(&self) -> Result<Vec<RawRow>, Self::Error>;
}
