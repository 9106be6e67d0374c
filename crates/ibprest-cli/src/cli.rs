use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ibprest - derive iBP-ng geometric restraints from protein structures and ensembles, prepare solver runs and compare their trajectories.",
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
    /// Write the sequence, restraints and run script of an iBP-ng run into a directory.
    Prepare(PrepareArgs),
    /// Derive dihedral and distance restraints from a PDB file.
    Restraints(RestraintsArgs),
    /// Run a single-model loop experiment with widened loop tolerances.
    Loops(LoopsArgs),
    /// Measure backbone bond and angle statistics over every model of a PDB file.
    Calibrate(CalibrateArgs),
    /// Compute the aligned RMSD of every frame of a trajectory against a reference frame.
    Compare(CompareArgs),
}

/// Configuration file and `--set` overrides shared by the subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override a configuration value, e.g. `-S synthesis.distance-cutoff=5.5`.
    /// Can be used multiple times.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Overrides of the restraint synthesis parameters.
#[derive(Args, Debug, Clone, Default)]
pub struct SynthesisArgs {
    /// Restrain a single model (0-based index) instead of the whole ensemble.
    #[arg(short, long, value_name = "INDEX")]
    pub model: Option<usize>,

    /// Extra phi/psi tolerance in degrees on the flexible residues.
    #[arg(long, value_name = "DEGREES")]
    pub eps: Option<f64>,

    /// Largest amide-proton distance, in Angstroms, that is restrained.
    #[arg(long, value_name = "ANGSTROMS")]
    pub cutoff: Option<f64>,
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the input PDB file (a single structure or an NMR ensemble).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory receiving `input.fa`, `input.res` and the `run` script.
    /// Created if missing.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    #[command(flatten)]
    pub synthesis: SynthesisArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `restraints` subcommand.
#[derive(Args, Debug)]
pub struct RestraintsArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the restraint file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Comment written at the top of the restraint file.
    #[arg(long, value_name = "TEXT")]
    pub header: Option<String>,

    #[command(flatten)]
    pub synthesis: SynthesisArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `loops` subcommand.
#[derive(Args, Debug)]
pub struct LoopsArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Extra phi/psi tolerance in degrees on the loop residues.
    #[arg(long, required = true, value_name = "DEGREES")]
    pub eps: f64,

    /// Largest amide-proton distance, in Angstroms, that is restrained.
    #[arg(long, required = true, value_name = "ANGSTROMS")]
    pub dmax: f64,

    /// Model (0-based index) the restraints are measured on.
    #[arg(short, long, default_value_t = 0, value_name = "INDEX")]
    pub model: usize,

    /// Directory receiving the experiment files.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Run iBP-ng on the generated restraints and report whether it found a solution.
    #[arg(long)]
    pub run: bool,

    /// Wall-time budget for the iBP-ng run, in seconds.
    #[arg(long, value_name = "SECONDS", requires = "run")]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `calibrate` subcommand.
#[derive(Args, Debug)]
pub struct CalibrateArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the CSV file receiving the statistics.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// DCD trajectory holding the reference frame.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// DCD trajectory whose frames are compared.
    #[arg(short = 't', long, required = true, value_name = "PATH")]
    pub result: PathBuf,

    /// Index (0-based) of the reference frame.
    #[arg(short, long, default_value_t = 0, value_name = "INDEX")]
    pub frame: usize,
}
