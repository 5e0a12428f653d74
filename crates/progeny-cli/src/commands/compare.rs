//! Compare command implementation.

use super::{load_combined, note_rejections};
use crate::cli::CompareArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use progeny_stats::{compare, ComparisonReport};

/// Combine each side separately and test them against each other.
pub fn compare_files(args: &CompareArgs, config: &Config) -> Result<ComparisonReport> {
    let (left_batches, left) = load_combined(&args.left, &args.input, &args.curation, config)?;
    let (right_batches, right) = load_combined(&args.right, &args.input, &args.curation, config)?;
    note_rejections(&left_batches);
    note_rejections(&right_batches);

    Ok(compare(
        left.corpus.records(),
        right.corpus.records(),
        &config.analysis,
    ))
}

/// Execute the compare command.
pub fn execute_compare(args: CompareArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let report = compare_files(&args, config)?;
    println!("{}", formatter.format_comparison(&report)?);
    Ok(())
}
