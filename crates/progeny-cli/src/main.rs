//! Progeny CLI - validate, combine and analyze politicians' family data.

use clap::Parser;
use progeny_cli::commands;
use progeny_cli::{logging, Cli, Command, Config, Formatter};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> progeny_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Validate(args) => commands::execute_validate(args, &config, &formatter),
        Command::Combine(args) => commands::execute_combine(args, &config, &formatter),
        Command::Analyze(args) => commands::execute_analyze(args, &config, &formatter),
        Command::Compare(args) => commands::execute_compare(args, &config, &formatter),
    }
}
