//! Analyze command implementation.

use super::{load_combined, note_rejections};
use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use progeny_stats::{analyze, AnalysisReport};

/// Run the full pipeline over the files.
pub fn analyze_files(args: &AnalyzeArgs, config: &Config) -> Result<AnalysisReport> {
    let mut analysis = config.analysis.clone();
    if let Some(seed) = args.seed {
        analysis.bootstrap_seed = seed;
    }
    if let Some(iterations) = args.iterations {
        analysis.bootstrap_iterations = iterations;
    }

    let (batches, combination) = load_combined(&args.files, &args.input, &args.curation, config)?;
    note_rejections(&batches);

    Ok(analyze(
        combination.corpus.records(),
        &analysis,
        args.group_by.map(Into::into),
    ))
}

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let report = analyze_files(&args, config)?;
    println!("{}", formatter.format_analysis(&report)?);
    Ok(())
}
