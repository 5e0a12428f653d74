//! Validate command implementation.

use super::load_batches;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use progeny_gatekeeper::BatchValidation;

/// Validate each file and return the per-file results.
pub fn validate_files(args: &ValidateArgs, config: &Config) -> Result<Vec<BatchValidation>> {
    load_batches(&args.files, &args.input, config)
}

/// Execute the validate command.
pub fn execute_validate(args: ValidateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let batches = validate_files(&args, config)?;
    println!("{}", formatter.format_validation(&batches)?);
    Ok(())
}
