//! Progeny Curator
//!
//! Deduplication and multi-source combination of validated politician records.
//!
//! # Overview
//!
//! The Curator is responsible for:
//! - **Deduplication**: collapsing records that share an identity key into one
//!   canonical record, under a configurable keep-policy
//! - **Conflict auditing**: listing identities whose records disagree on sons
//!   or daughters, whichever policy resolved them
//! - **Combination**: merging per-source corpora into one corpus, tagging
//!   provenance and reporting how many records were dropped
//!
//! Corpora are never edited in place. Every operation returns a new corpus.
//!
//! ## Keep-policies
//!
//! | Policy | Winner | On disagreeing counts |
//! |--------|--------|-----------------------|
//! | **keep-last** (default) | Latest `collected_at`, then latest input position | Silently discarded (see [`Deduplicator::conflicts`]) |
//! | **keep-most-complete** | Most known counts, then most populated labels, then keep-last | Silently discarded |
//! | **merge-fields** | Union of all fields, labels in keep-last order | [`CuratorError::ConflictingCounts`] |
//!
//! # Usage
//!
//! ```
//! use progeny_curator::{CuratorConfig, DatasetCombiner};
//! use progeny_domain::{DatasetCorpus, IdentityKey, PoliticianRecord, Provenance, SourceTag};
//!
//! let record = |name: &str| {
//!     PoliticianRecord::new(
//!         IdentityKey::from_name(name).unwrap(),
//!         name,
//!         Provenance::new(SourceTag::BiodataApi, None),
//!     )
//!     .with_counts(Some(1), Some(1))
//! };
//!
//! let combiner = DatasetCombiner::new(CuratorConfig::default());
//! let combination = combiner
//!     .combine(&[
//!         DatasetCorpus::labelled("lok_sabha", vec![record("A"), record("B")]),
//!         DatasetCorpus::labelled("rajya_sabha", vec![record("A")]),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(combination.summary.duplicates_dropped, 1);
//! println!("{}", combination.summary.summary());
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [curation]
//! keep_policy = "keep-last"   # or "keep-most-complete", "merge-fields"
//! scope = "global"            # or "per-session"
//! ```

#![warn(missing_docs)]

mod combiner;
mod config;
mod dedup;
mod error;
mod summary;

pub use combiner::{Combination, DatasetCombiner};
pub use config::{CuratorConfig, DedupScope, KeepPolicy};
pub use dedup::{Deduplicator, FieldConflict};
pub use error::CuratorError;
pub use summary::{CombineSummary, DatasetContribution};
