//! Progeny Domain Layer
//!
//! This crate contains the core data model for Progeny: the validated
//! politician record, the loosely-typed raw record handed over by scrapers
//! and extractors, and the pure field normalization that turns one into the
//! other. It performs no I/O.
//!
//! ## Key Concepts
//!
//! - **RawRecord**: One scraped row, fields still strings/numbers/absent
//! - **FieldNormalizer**: Raw sons/daughters value → optional non-negative count
//! - **PoliticianRecord**: Validated, immutable record with provenance
//! - **IdentityKey**: Deterministic key used to recognise the same politician
//! - **DatasetCorpus**: Ordered, immutable collection of records from one stage
//!
//! ## Missing vs zero
//!
//! Counts are `Option<u32>` everywhere. `None` means "unknown" and is never
//! folded into zero; `total_children` is derived on demand and is absent
//! whenever either count is absent.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod corpus;
pub mod identity;
pub mod normalizer;
pub mod provenance;
pub mod raw;
pub mod record;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use corpus::DatasetCorpus;
pub use identity::IdentityKey;
pub use normalizer::{FieldNormalizer, InvalidCount};
pub use provenance::Provenance;
pub use raw::{MalformedRow, RawRecord, RawRow, RawValue};
pub use record::PoliticianRecord;
pub use source::SourceTag;
