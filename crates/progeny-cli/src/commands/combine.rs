//! Combine command implementation.

use super::{load_combined, note_rejections};
use crate::cli::CombineArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::source::write_dump;
use progeny_curator::Combination;

/// Validate and combine the files, writing the corpus if an output path was given.
pub fn combine_files(args: &CombineArgs, config: &Config) -> Result<Combination> {
    let (batches, combination) = load_combined(&args.files, &args.input, &args.curation, config)?;
    note_rejections(&batches);

    if let Some(path) = &args.output {
        write_dump(path, combination.corpus.records())?;
    }
    Ok(combination)
}

/// Execute the combine command.
pub fn execute_combine(args: CombineArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let combination = combine_files(&args, config)?;
    println!("{}", formatter.format_combination(&combination)?);

    if let Some(path) = &args.output {
        eprintln!(
            "{}",
            formatter.success(&format!(
                "Wrote {} records to {}",
                combination.corpus.len(),
                path.display()
            ))
        );
    }
    Ok(())
}
