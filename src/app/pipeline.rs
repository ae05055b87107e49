//! Shared "compute pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! catalog lookup -> template instantiation -> differentiate twice ->
//! sample -> solve critical/inflection points
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! Every entity here is transient: a pass reads the current selections,
//! computes, and hands the output to the renderer. Nothing is cached across
//! passes, so identical inputs always produce identical outputs.

use crate::catalog;
use crate::domain::{CountryCurves, CountryProfile, DisplayRange, ModelConfig, ModelFamily, RunOutput};
use crate::error::AppError;
use crate::math::solve_roots;
use crate::models::build_expr;

/// Execute the full pipeline for the configured selection.
pub fn run_model(config: &ModelConfig) -> Result<RunOutput, AppError> {
    if !(config.range.xmin >= crate::domain::RANGE_MIN
        && config.range.xmin < config.range.xmax
        && config.range.xmax <= crate::domain::RANGE_MAX)
    {
        return Err(AppError::new(
            2,
            format!(
                "Invalid range [{}, {}]: expected {} <= xmin < xmax <= {}",
                config.range.xmin,
                config.range.xmax,
                crate::domain::RANGE_MIN,
                crate::domain::RANGE_MAX,
            ),
        ));
    }

    let primary = compute_country(
        config.family,
        catalog::profile(config.country),
        config.range,
        config.samples,
    );

    // Comparing a country against itself would just overdraw the same
    // curves, so it collapses to single-country mode.
    let comparison = config
        .compare
        .filter(|&c| c != config.country)
        .map(|c| compute_country(config.family, catalog::profile(c), config.range, config.samples));

    Ok(RunOutput {
        family: config.family,
        range: config.range,
        primary,
        comparison,
    })
}

/// Compute curves and marked points for one country.
fn compute_country(
    family: ModelFamily,
    profile: CountryProfile,
    range: DisplayRange,
    samples: usize,
) -> CountryCurves {
    let f = build_expr(family, &profile).simplify();
    let d1 = f.diff();
    let d2 = d1.diff();

    let xs = range.linspace(samples);
    let curves = crate::domain::CurveSet {
        f: f.sample(&xs),
        d1: d1.sample(&xs),
        d2: d2.sample(&xs),
        xs,
    };

    let critical = solve_roots(&d1, range.xmin, range.xmax);
    let inflection = solve_roots(&d2, range.xmin, range.xmax);

    CountryCurves {
        profile,
        formula: f.to_string(),
        d1_formula: d1.to_string(),
        d2_formula: d2.to_string(),
        curves,
        critical,
        inflection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Country;

    fn config(country: Country, family: ModelFamily) -> ModelConfig {
        ModelConfig {
            country,
            compare: None,
            family,
            range: DisplayRange { xmin: 0.1, xmax: 5.0 },
            samples: 1000,
        }
    }

    #[test]
    fn exponential_spain_has_no_marked_points() {
        // f' = 1.2·0.45·e^(0.45x) is never zero, and neither is f''.
        let run = run_model(&config(Country::Spain, ModelFamily::Exponential)).unwrap();
        assert!(run.primary.critical.is_empty());
        assert!(run.primary.inflection.is_empty());
        assert_eq!(run.primary.curves.xs.len(), 1000);
        assert!(run.primary.curves.f.iter().all(|y| y.is_finite()));
    }

    #[test]
    fn polynomial_critical_point_outside_range_is_empty() {
        // Italy polynomial: f = 1.0·x² + 0.3·x + 4.5, f' = 2x + 0.3,
        // root at x = -0.15, outside [0.1, 5.0].
        let run = run_model(&config(Country::Italy, ModelFamily::Polynomial)).unwrap();
        assert!(run.primary.critical.is_empty());
        // f'' = 2a is a nonzero constant: no inflection points anywhere.
        assert!(run.primary.inflection.is_empty());
    }

    #[test]
    fn trigonometric_points_land_on_the_sine_lattice() {
        // Brazil: b = 0.55. Critical where cos(bx)=0: x = (π/2 + nπ)/b.
        // Inflection where sin(bx)=0: x = nπ/b.
        let mut cfg = config(Country::Brazil, ModelFamily::Trigonometric);
        cfg.range = DisplayRange { xmin: 0.1, xmax: 10.0 };
        let run = run_model(&cfg).unwrap();

        let b = 0.55;
        let pi = std::f64::consts::PI;
        let expected_critical = [pi / 2.0 / b, (pi / 2.0 + pi) / b];
        assert_eq!(run.primary.critical.len(), expected_critical.len());
        for (got, want) in run.primary.critical.iter().zip(expected_critical) {
            assert!((got - want).abs() < 1e-9);
        }

        let expected_inflection = [pi / b];
        assert_eq!(run.primary.inflection.len(), expected_inflection.len());
        assert!((run.primary.inflection[0] - expected_inflection[0]).abs() < 1e-9);
    }

    #[test]
    fn logarithmic_family_samples_are_finite_for_positive_b() {
        // With 0.1 <= x and b > 0, b·x stays positive, so all samples are
        // finite and match a·ln(b·x) + c.
        let run = run_model(&config(Country::Japan, ModelFamily::Logarithmic)).unwrap();
        let p = run.primary.profile;
        for (x, y) in run.primary.curves.xs.iter().zip(&run.primary.curves.f) {
            assert!(y.is_finite());
            assert!((y - (p.a * (p.b * x).ln() + p.c)).abs() < 1e-9);
        }
        // Both derivative shapes are rational with constant numerators.
        assert!(run.primary.critical.is_empty());
        assert!(run.primary.inflection.is_empty());
    }

    #[test]
    fn pipeline_is_idempotent() {
        let cfg = config(Country::Mexico, ModelFamily::Trigonometric);
        let a = run_model(&cfg).unwrap();
        let b = run_model(&cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn comparison_with_same_country_collapses() {
        let mut cfg = config(Country::Spain, ModelFamily::Polynomial);
        cfg.compare = Some(Country::Spain);
        let run = run_model(&cfg).unwrap();
        assert!(run.comparison.is_none());
    }

    #[test]
    fn comparison_with_distinct_country_is_computed() {
        let mut cfg = config(Country::Spain, ModelFamily::Polynomial);
        cfg.compare = Some(Country::Italy);
        let run = run_model(&cfg).unwrap();
        let cmp = run.comparison.expect("comparison curves");
        assert_eq!(cmp.profile.country, Country::Italy);
        assert_eq!(cmp.curves.xs, run.primary.curves.xs);
    }

    #[test]
    fn invalid_range_is_rejected() {
        let mut cfg = config(Country::Spain, ModelFamily::Exponential);
        cfg.range = DisplayRange { xmin: 5.0, xmax: 0.5 };
        let err = run_model(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        cfg.range = DisplayRange { xmin: 0.0, xmax: 5.0 };
        assert!(run_model(&cfg).is_err());

        cfg.range = DisplayRange { xmin: 0.1, xmax: 10.5 };
        assert!(run_model(&cfg).is_err());
    }
}
