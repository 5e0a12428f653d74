//! Progeny Gatekeeper
//!
//! Validates raw politician records before they enter a corpus.
//!
//! The Gatekeeper provides:
//! - Identity checks (a usable, non-blank name)
//! - Count normalization for sons/daughters, rejecting the whole record on
//!   any invalid count
//! - Identity key construction, optionally salted with state/session
//! - Batch validation that accumulates a rejection report next to the
//!   accepted corpus, so no batch is aborted by a bad row
//!
//! # Examples
//!
//! ```
//! use progeny_domain::{RawRecord, SourceTag};
//! use progeny_gatekeeper::{RecordValidator, ValidationConfig};
//!
//! let validator = RecordValidator::new(ValidationConfig::default());
//! let raw = RawRecord::named("Asha Devi").sons("Two").daughters("1");
//!
//! let record = validator.validate(&raw, SourceTag::BiodataApi).unwrap();
//! assert_eq!(record.total_children(), Some(3));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod report;
mod validator;

pub use config::{Disambiguation, ValidationConfig};
pub use error::GatekeeperError;
pub use report::{BatchValidation, Rejection, RejectionReport};
pub use validator::{CountField, RecordValidator, RejectionReason};
