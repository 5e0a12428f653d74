//! Command implementations.
//!
//! Every command reads dumps the same way: each file is one dataset, each
//! dataset is validated on its own, and rejected rows are reported without
//! stopping the run. Only unreadable files abort.

pub mod analyze;
pub mod combine;
pub mod compare;
pub mod validate;

pub use self::analyze::{analyze_files, execute_analyze};
pub use self::combine::{combine_files, execute_combine};
pub use self::compare::{compare_files, execute_compare};
pub use self::validate::{execute_validate, validate_files};

use crate::cli::{CurationArgs, InputArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::source::JsonFileSource;
use progeny_curator::{Combination, CuratorConfig, DatasetCombiner, DedupScope};
use progeny_domain::SourceTag;
use progeny_gatekeeper::{BatchValidation, RecordValidator};
use std::path::PathBuf;
use tracing::warn;

fn default_source(input: &InputArgs, config: &Config) -> Result<SourceTag> {
    match input.source.as_deref() {
        Some(label) => SourceTag::parse(label).ok_or_else(|| {
            let known: Vec<&str> = SourceTag::ALL.iter().map(SourceTag::as_str).collect();
            CliError::InvalidInput(format!(
                "unknown source '{}' (expected one of: {})",
                label,
                known.join(", ")
            ))
        }),
        None => Ok(config.settings.default_source),
    }
}

fn validator(input: &InputArgs, config: &Config) -> RecordValidator {
    let mut validation = config.validation.clone();
    if let Some(salt) = input.disambiguate {
        validation.disambiguate = salt.into();
    }
    RecordValidator::new(validation)
}

fn curator_config(curation: &CurationArgs, config: &Config) -> CuratorConfig {
    let mut curator = config.curation.clone();
    if let Some(policy) = curation.policy {
        curator.keep_policy = policy.into();
    }
    if curation.per_session {
        curator.scope = DedupScope::PerSession;
    }
    curator
}

/// Validate every file as its own dataset
pub(crate) fn load_batches(
    files: &[PathBuf],
    input: &InputArgs,
    config: &Config,
) -> Result<Vec<BatchValidation>> {
    let source = default_source(input, config)?;
    let validator = validator(input, config);

    let mut batches = Vec::with_capacity(files.len());
    for path in files {
        batches.push(validator.validate_source(&JsonFileSource::new(path, source))?);
    }
    Ok(batches)
}

/// Validate every file and combine the accepted records
pub(crate) fn load_combined(
    files: &[PathBuf],
    input: &InputArgs,
    curation: &CurationArgs,
    config: &Config,
) -> Result<(Vec<BatchValidation>, Combination)> {
    let batches = load_batches(files, input, config)?;
    let corpora: Vec<_> = batches.iter().map(|b| b.corpus.clone()).collect();
    let combination = DatasetCombiner::new(curator_config(curation, config)).combine(&corpora)?;
    Ok((batches, combination))
}

/// Note rejected rows on stderr when the command's output is about something else
fn note_rejections(batches: &[BatchValidation]) {
    let rejected: usize = batches.iter().map(BatchValidation::rejected).sum();
    if rejected > 0 {
        warn!(
            "{} row(s) rejected during validation; run `progeny validate` for details",
            rejected
        );
    }
}
