//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a compute/render pass
//! - exported to JSON
//! - reloaded later for plotting or comparisons

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lower bound of the time axis the interaction shell may offer.
pub const RANGE_MIN: f64 = 0.1;
/// Upper bound of the time axis the interaction shell may offer.
pub const RANGE_MAX: f64 = 10.0;
/// Number of evenly spaced sample points per curve.
pub const DEFAULT_SAMPLES: usize = 1000;

/// The fixed set of supported countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Spain,
    Italy,
    UnitedStates,
    Mexico,
    Japan,
    Brazil,
}

impl Country {
    pub const ALL: [Country; 6] = [
        Country::Spain,
        Country::Italy,
        Country::UnitedStates,
        Country::Mexico,
        Country::Japan,
        Country::Brazil,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Country::Spain => "Spain",
            Country::Italy => "Italy",
            Country::UnitedStates => "United States",
            Country::Mexico => "Mexico",
            Country::Japan => "Japan",
            Country::Brazil => "Brazil",
        }
    }

    pub fn next(self) -> Country {
        let i = Country::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Country::ALL[(i + 1) % Country::ALL.len()]
    }

    pub fn prev(self) -> Country {
        let i = Country::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Country::ALL[(i + Country::ALL.len() - 1) % Country::ALL.len()]
    }
}

/// Fixed per-country model coefficients.
///
/// Immutable: the catalog is compiled in and never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    pub country: Country,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// The four closed-form function templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// `a·e^(b·x) + c`
    Exponential,
    /// `a·ln(b·x) + c`
    Logarithmic,
    /// `a·x² + b·x + c`
    Polynomial,
    /// `a·sin(b·x) + c`
    Trigonometric,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 4] = [
        ModelFamily::Exponential,
        ModelFamily::Logarithmic,
        ModelFamily::Polynomial,
        ModelFamily::Trigonometric,
    ];

    /// Human-readable label, with the interpretation the original models carry.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelFamily::Exponential => "Exponential (Market Growth)",
            ModelFamily::Logarithmic => "Logarithmic (Diminishing Returns)",
            ModelFamily::Polynomial => "Polynomial (Cost Structure)",
            ModelFamily::Trigonometric => "Trigonometric (Seasonality)",
        }
    }

    pub fn next(self) -> ModelFamily {
        let i = ModelFamily::ALL.iter().position(|&f| f == self).unwrap_or(0);
        ModelFamily::ALL[(i + 1) % ModelFamily::ALL.len()]
    }

    pub fn prev(self) -> ModelFamily {
        let i = ModelFamily::ALL.iter().position(|&f| f == self).unwrap_or(0);
        ModelFamily::ALL[(i + ModelFamily::ALL.len() - 1) % ModelFamily::ALL.len()]
    }
}

/// The active time interval `[xmin, xmax]`.
///
/// Interaction-shell contract: `0.1 ≤ xmin < xmax ≤ 10.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub xmin: f64,
    pub xmax: f64,
}

impl DisplayRange {
    /// `n` evenly spaced sample points covering the range inclusively.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        let n = n.max(2);
        let mut xs = Vec::with_capacity(n);
        for i in 0..n {
            let u = i as f64 / (n as f64 - 1.0);
            xs.push(self.xmin + u * (self.xmax - self.xmin));
        }
        xs
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags or TUI selections (plus defaults).
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub country: Country,
    /// Second country for comparison mode; `None` disables the overlay.
    pub compare: Option<Country>,
    pub family: ModelFamily,
    pub range: DisplayRange,
    pub samples: usize,
}

/// The three sampled curves over a shared x grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    pub xs: Vec<f64>,
    /// `f` sampled at `xs`; may contain non-finite values (log family
    /// outside its domain), which the renderer treats as line breaks.
    pub f: Vec<f64>,
    pub d1: Vec<f64>,
    pub d2: Vec<f64>,
}

/// Everything computed for one plotted country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCurves {
    pub profile: CountryProfile,
    /// Pretty-printed formulas for f, f', f''.
    pub formula: String,
    pub d1_formula: String,
    pub d2_formula: String,
    pub curves: CurveSet,
    /// x positions where f'(x) = 0, within range (local extremum candidates).
    pub critical: Vec<f64>,
    /// x positions where f''(x) = 0, within range (concavity changes).
    pub inflection: Vec<f64>,
}

/// All computed outputs of a single compute/render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub family: ModelFamily,
    pub range: DisplayRange,
    pub primary: CountryCurves,
    /// Present only when comparison mode is on and the second country
    /// differs from the first (no duplicate overlay).
    pub comparison: Option<CountryCurves>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub family: ModelFamily,
    pub xmin: f64,
    pub xmax: f64,
    pub curves: Vec<CountryCurves>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_covers_range_inclusively() {
        let range = DisplayRange { xmin: 0.1, xmax: 5.0 };
        let xs = range.linspace(1000);
        assert_eq!(xs.len(), 1000);
        assert!((xs[0] - 0.1).abs() < 1e-12);
        assert!((xs[999] - 5.0).abs() < 1e-12);
        // Evenly spaced.
        let step = xs[1] - xs[0];
        assert!((xs[501] - xs[500] - step).abs() < 1e-9);
    }

    #[test]
    fn country_cycling_wraps() {
        assert_eq!(Country::Brazil.next(), Country::Spain);
        assert_eq!(Country::Spain.prev(), Country::Brazil);
        assert_eq!(Country::Spain.next(), Country::Italy);
    }

    #[test]
    fn family_cycling_wraps() {
        assert_eq!(ModelFamily::Trigonometric.next(), ModelFamily::Exponential);
        assert_eq!(ModelFamily::Exponential.prev(), ModelFamily::Trigonometric);
    }
}
