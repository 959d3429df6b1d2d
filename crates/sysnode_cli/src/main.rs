//! sysnode CLI: verifies systolic-array processor nodes against an exact
//! fixed-point reference.
//!
//! Provides `sysnode run` for a single test instance and `sysnode sweep` for
//! checking a node across a grid of bit-width configurations.

#![warn(missing_docs)]

mod pipeline;
mod run;
mod sweep;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use sysnode_config::Variant;

/// sysnode: randomized fixed-point verification of processor nodes.
#[derive(Parser, Debug)]
#[command(name = "sysnode", version, about = "Processor-node verification harness")]
pub struct Cli {
    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `sysnode.toml` file (default: `./sysnode.toml` if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for diagnostics and results.
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify one configuration against the behavioral model.
    Run(RunArgs),
    /// Verify every point of the bit-width grid.
    Sweep(SweepArgs),
}

/// Arguments for the `sysnode run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Node variant (`a` or `b`), overriding `node.variant`.
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Number of checked events, overriding `run.events`.
    #[arg(short = 'n', long)]
    pub events: Option<usize>,

    /// Stimulus seed, overriding `run.seed`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a VCD waveform to this path.
    #[arg(long)]
    pub waveform: Option<PathBuf>,

    /// Register stages of the model, overriding `node.latency`.
    #[arg(long)]
    pub latency: Option<usize>,
}

/// Arguments for the `sysnode sweep` subcommand.
#[derive(Parser, Debug)]
pub struct SweepArgs {
    /// Node variant (`a` or `b`), overriding `node.variant`.
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Number of checked events per configuration, overriding `run.events`.
    #[arg(short = 'n', long)]
    pub events: Option<usize>,

    /// Base seed; configuration `i` of the grid uses `seed + i`.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
    /// Output format.
    pub format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => stderr_supports_color(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
        format: cli.format,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Sweep(ref args) => sweep::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Colors unless `NO_COLOR` is set or the terminal is unknown.
fn stderr_supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && std::env::var("TERM").is_ok_and(|term| term != "dumb")
}
