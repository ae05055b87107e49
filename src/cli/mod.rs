//! Command-line parsing for the growth-curve explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{ModelFamily, DEFAULT_SAMPLES};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "growth", version, about = "Country growth models through a calculus lens")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a model and print formulas, derivatives, and marked points.
    Report(ModelArgs),
    /// Compute a model and write the sampled curves to a JSON file.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying compute pipeline as `growth report`, but
    /// renders the three-panel chart in a terminal UI using Ratatui.
    Tui(ModelArgs),
}

/// Common model selection options.
#[derive(Debug, Parser, Clone)]
pub struct ModelArgs {
    /// Primary country (Spain, Italy, United States, Mexico, Japan, Brazil).
    #[arg(short = 'c', long, default_value = "Spain")]
    pub country: String,

    /// Comparison country; enables comparison mode.
    #[arg(long)]
    pub compare: Option<String>,

    /// Function family to model.
    #[arg(short = 'f', long, value_enum, default_value_t = ModelFamily::Exponential)]
    pub family: ModelFamily,

    /// Start of the time range (>= 0.1).
    #[arg(long, default_value_t = 0.1)]
    pub xmin: f64,

    /// End of the time range (<= 10.0).
    #[arg(long, default_value_t = 5.0)]
    pub xmax: f64,

    /// Number of sample points per curve.
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,
}

/// Options for exporting curves.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Output JSON path.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,
}
