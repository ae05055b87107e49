//! Write curve JSON files.
//!
//! Curve JSON is the "portable" representation of one computed pass:
//! - model family + range
//! - per-country formulas and coefficient profile
//! - the sampled f / f' / f'' grids
//! - critical and inflection point sets
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CurveFile, RunOutput};
use crate::error::AppError;

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &curve_file_from_run(run))
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

fn curve_file_from_run(run: &RunOutput) -> CurveFile {
    let mut curves = vec![run.primary.clone()];
    if let Some(cmp) = &run.comparison {
        curves.push(cmp.clone());
    }
    CurveFile {
        tool: "growth".to_string(),
        family: run.family,
        xmin: run.range.xmin,
        xmax: run.range.xmax,
        curves,
    }
}
