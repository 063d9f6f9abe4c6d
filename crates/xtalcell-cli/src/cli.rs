use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Michael Wharmby",
    version,
    about = "xtalcell CLI - Unit-cell geometry for crystal structures: metric tensors, reciprocal cells, reflection lists and interatomic contacts.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report the metric tensors, reciprocal lattice and transforms of a crystal's unit cell.
    Cell(CellArgs),
    /// List every reflection down to a minimum d-spacing.
    Reflections(ReflectionsArgs),
    /// List interatomic contacts between sites using nearest periodic images.
    Contacts(ContactsArgs),
}

/// Output format for the `cell` report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Toml,
}

/// Arguments for the `cell` subcommand.
#[derive(Args, Debug)]
pub struct CellArgs {
    /// Path to the crystal description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Output format of the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `reflections` subcommand.
#[derive(Args, Debug)]
pub struct ReflectionsArgs {
    /// Path to the crystal description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Write the reflection list as CSV to this path instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override `analysis.d-min` from the config file.
    #[arg(short, long, value_name = "FLOAT")]
    pub d_min: Option<f64>,

    /// Override `analysis.include-friedel-mates` from the config file.
    #[command(flatten)]
    pub friedel_mates: FriedelMates,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.d-min=0.8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// A group to handle mutually exclusive flags for keeping Friedel mates.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct FriedelMates {
    /// Keep both (hkl) and (-h-k-l) in the list.
    #[arg(long)]
    pub with_friedel_mates: bool,
    /// Keep only one member of each Friedel pair.
    #[arg(long)]
    pub no_friedel_mates: bool,
}

impl FriedelMates {
    /// The choice made on the command line, if any.
    pub fn choice(&self) -> Option<bool> {
        match (self.with_friedel_mates, self.no_friedel_mates) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the `contacts` subcommand.
#[derive(Args, Debug)]
pub struct ContactsArgs {
    /// Path to the crystal description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override `analysis.contact-cutoff` (Å) from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.contact-cutoff=3.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
