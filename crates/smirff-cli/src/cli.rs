use clap::{Args, Parser, Subcommand};
use smirff::core::forcefield::handlers::electrostatics::BulkChargeMethod;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "SMIRFF Developers",
    version,
    about = "SMIRFF CLI - Assign SMIRKS-typed force-field parameters to molecules and export simulation-ready terms.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used when parameterizing many molecules.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a force-field document and report its contents.
    /// With a molecule file, also check every pattern against its matcher.
    Check(CheckArgs),
    /// Print or export which parameter each structural unit receives.
    Label(LabelArgs),
    /// Parameterize molecules and write the assembled systems as TOML.
    Parameterize(ParameterizeArgs),
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to a force-field document (TOML). Repeat to stack several sources;
    /// definitions from later files take precedence.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub forcefield: Vec<PathBuf>,

    /// Path to a molecule file whose recorded matchers validate every pattern.
    #[arg(short, long, value_name = "PATH")]
    pub molecules: Option<PathBuf>,
}

/// Arguments for the `label` subcommand.
#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Path to a force-field document (TOML). Repeat to stack several sources;
    /// definitions from later files take precedence.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub forcefield: Vec<PathBuf>,

    /// Path to the molecule file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub molecules: PathBuf,

    /// Write the labels as CSV to this path instead of printing a table.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `parameterize` subcommand.
#[derive(Args, Debug)]
pub struct ParameterizeArgs {
    /// Path to a force-field document (TOML). Repeat to stack several sources;
    /// definitions from later files take precedence.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub forcefield: Vec<PathBuf>,

    /// Path to the molecule file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub molecules: PathBuf,

    /// Path for the parameterized output (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the bulk charge method (from-molecule, formal-charges, none).
    #[arg(long, value_name = "METHOD")]
    pub charge_method: Option<BulkChargeMethod>,

    /// Do not emit scaled 1-2, 1-3 and 1-4 nonbonded exceptions.
    #[arg(long)]
    pub no_exceptions: bool,

    /// Check every pattern against each molecule's matcher before assigning.
    #[arg(long)]
    pub validate_patterns: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S charges.bulk-method=formal-charges
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
