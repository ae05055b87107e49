//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves country selections against the catalog
//! - runs the compute pipeline
//! - prints reports or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ExportArgs, ModelArgs};
use crate::domain::{DisplayRange, ModelConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `growth` binary.
pub fn run() -> Result<(), AppError> {
    // We want `growth` and `growth -c Spain` to behave like `growth tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_report(args: ModelArgs) -> Result<(), AppError> {
    let config = model_config_from_args(&args)?;
    let run = pipeline::run_model(&config)?;
    println!("{}", crate::report::format_run_summary(&run));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = model_config_from_args(&args.model)?;
    let run = pipeline::run_model(&config)?;
    crate::io::curve::write_curve_json(&args.out, &run)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_tui(args: ModelArgs) -> Result<(), AppError> {
    let config = model_config_from_args(&args)?;
    crate::tui::run(config)
}

/// Resolve CLI arguments into a pipeline configuration.
///
/// Country names go through the catalog so that unknown selections fail
/// with a clear message before any computation starts.
pub fn model_config_from_args(args: &ModelArgs) -> Result<ModelConfig, AppError> {
    let country = crate::catalog::lookup(&args.country)?.country;
    let compare = match &args.compare {
        Some(name) => Some(crate::catalog::lookup(name)?.country),
        None => None,
    };

    Ok(ModelConfig {
        country,
        compare,
        family: args.family,
        range: DisplayRange {
            xmin: args.xmin,
            xmax: args.xmax,
        },
        samples: args.samples,
    })
}

/// Rewrite argv so `growth` defaults to `growth tui`.
///
/// Rules:
/// - `growth`                      -> `growth tui`
/// - `growth -c Spain ...`         -> `growth tui -c Spain ...`
/// - `growth --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
