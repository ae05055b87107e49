//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed country and model-family enumerations
//! - the per-country coefficient profile
//! - the display range contract shared by CLI and TUI
//! - computed outputs (sampled curves + marked point sets)

pub mod types;

pub use types::*;
