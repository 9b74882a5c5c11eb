use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-splice",
    version,
    about = "Cross-tool reconciliation of differential splicing calls"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Canonicalise, classify and integrate native tool outputs.
    Unify(UnifyArgs),
    /// Integrate classification tables written by a previous `unify` run.
    Integrate(IntegrateArgs),
    /// Resolve software and event names and list the supported pairs.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct SelectionArgs {
    #[arg(
        long,
        required = true,
        num_args = 1..,
        help = "Software to reconcile: rmats, suppa2, psi-sigma, majiq"
    )]
    pub software: Vec<String>,

    #[arg(long, num_args = 1.., help = "Event types (default: all of SE A3SS A5SS AF AL RI MX)")]
    pub event: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UnifyArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[arg(long, help = "Directory holding {Software}/{sample}/ tool outputs")]
    pub input: PathBuf,

    #[arg(long, help = "GTF annotation (.gz accepted), required for PSI-Sigma gene lookup")]
    pub gtf: Option<PathBuf>,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long)]
    pub sample_name: String,

    #[arg(long, value_enum, default_value_t = NovelArg::Exclude)]
    pub novel: NovelArg,

    #[arg(long, help = "Column label of the test group (default: by position)")]
    pub test_label: Option<String>,

    #[arg(long, help = "Column label of the control group (default: by position)")]
    pub control_label: Option<String>,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[arg(long, default_value_t = false, help = "Abort on the first failing unit")]
    pub fail_fast: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct IntegrateArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[arg(long, help = "Output directory of a previous unify run")]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long)]
    pub sample_name: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NovelArg {
    Exclude,
    Include,
}
