//! CLI command definitions and argument parsing.

use clap::{ArgAction, Args, Parser, Subcommand};
use progeny_curator::KeepPolicy;
use progeny_gatekeeper::Disambiguation;
use progeny_stats::GroupField;
use std::path::PathBuf;

/// Progeny - clean, combine and analyze politicians' family data.
#[derive(Debug, Parser)]
#[command(name = "progeny")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PROGENY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate record dumps and report rejections
    Validate(ValidateArgs),

    /// Validate and merge record dumps into one deduplicated corpus
    Combine(CombineArgs),

    /// Run the full statistics pipeline
    Analyze(AnalyzeArgs),

    /// Test two corpora against each other
    Compare(CompareArgs),
}

/// Options shared by every command that reads record dumps.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Source tag for rows that do not name one (e.g. wikipedia, biodata-api)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Salt identity keys with state and/or session
    #[arg(short, long, value_enum)]
    pub disambiguate: Option<DisambiguateArg>,
}

/// Deduplication options.
#[derive(Debug, Clone, Default, Args)]
pub struct CurationArgs {
    /// Policy for records sharing an identity
    #[arg(short, long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Deduplicate within each session instead of globally
    #[arg(long)]
    pub per_session: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// JSON record dumps
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for the combine command.
#[derive(Debug, Args)]
pub struct CombineArgs {
    /// JSON record dumps, one dataset per file
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub curation: CurationArgs,

    /// Write the combined corpus to this file as a JSON record dump
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// JSON record dumps, combined before analysis
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub curation: CurationArgs,

    /// Break the statistics down by a label
    #[arg(short, long, value_enum)]
    pub group_by: Option<GroupArg>,

    /// Bootstrap seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bootstrap resamples
    #[arg(short, long)]
    pub iterations: Option<usize>,
}

/// Arguments for the compare command.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Record dumps forming the left-hand corpus
    #[arg(short, long, num_args = 1.., required = true)]
    pub left: Vec<PathBuf>,

    /// Record dumps forming the right-hand corpus
    #[arg(short, long, num_args = 1.., required = true)]
    pub right: Vec<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub curation: CurationArgs,
}

/// Keep-policy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyArg {
    /// Most recently collected record wins
    KeepLast,
    /// Record with the most known fields wins
    KeepMostComplete,
    /// Union of fields; conflicting counts abort
    MergeFields,
}

/// Grouping argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupArg {
    /// Political party
    Party,
    /// State
    State,
    /// Session or assembly
    Session,
}

/// Identity key salting argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DisambiguateArg {
    /// Name only
    None,
    /// Name and state
    State,
    /// Name and session
    Session,
    /// Name, state and session
    StateAndSession,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<PolicyArg> for KeepPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::KeepLast => KeepPolicy::KeepLast,
            PolicyArg::KeepMostComplete => KeepPolicy::KeepMostComplete,
            PolicyArg::MergeFields => KeepPolicy::MergeFields,
        }
    }
}

impl From<GroupArg> for GroupField {
    fn from(group: GroupArg) -> Self {
        match group {
            GroupArg::Party => GroupField::Party,
            GroupArg::State => GroupField::State,
            GroupArg::Session => GroupField::Session,
        }
    }
}

impl From<DisambiguateArg> for Disambiguation {
    fn from(arg: DisambiguateArg) -> Self {
        match arg {
            DisambiguateArg::None => Disambiguation::None,
            DisambiguateArg::State => Disambiguation::State,
            DisambiguateArg::Session => Disambiguation::Session,
            DisambiguateArg::StateAndSession => Disambiguation::StateAndSession,
        }
    }
}
