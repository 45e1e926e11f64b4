//! ioplace CLI: places boundary I/O pins from a JSON netlist.
//!
//! Provides `ioplace place` to run the placer and print or write the pin
//! assignment, and `ioplace slots` to inspect the slot ring a configuration
//! produces.

#![warn(missing_docs)]

mod design;
mod place;
mod render;
mod slots;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// ioplace: wirelength-driven boundary pin placement.
#[derive(Parser, Debug)]
#[command(name = "ioplace", version, about = "Boundary I/O pin placer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also print informational notes.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `ioplace.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place the pins of a netlist on the core boundary.
    Place(PlaceArgs),
    /// Print the slot ring generated from the configuration.
    Slots(SlotsArgs),
}

/// Arguments for the `ioplace place` subcommand.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// JSON netlist listing pins and their sinks.
    pub netlist: String,

    /// Write the assignment to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format of the assignment.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Shuffle pins onto the ring instead of matching.
    #[arg(long)]
    pub random: bool,

    /// Seed for `--random`, overriding the configuration.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the `ioplace slots` subcommand.
#[derive(Parser, Debug)]
pub struct SlotsArgs {
    /// List every slot instead of a per-edge summary.
    #[arg(long)]
    pub all: bool,
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

/// Assignment output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// PINS-section style text.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print notes.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Place(ref args) => place::run(args, &global),
        Command::Slots(ref args) => slots::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
