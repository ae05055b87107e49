//! Text report for a single compute pass.

use crate::domain::{CountryCurves, RunOutput};

/// Format the full run summary (formulas + derivative shapes + marked points).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== growth - Country Growth Model (Calculus View) ===\n");
    out.push_str(&format!("Model: {}\n", run.family.display_name()));
    out.push_str(&format!(
        "Range: [{:.2}, {:.2}] | samples: {}\n",
        run.range.xmin,
        run.range.xmax,
        run.primary.curves.xs.len(),
    ));
    out.push('\n');

    format_country(&mut out, &run.primary);
    if let Some(cmp) = &run.comparison {
        out.push('\n');
        format_country(&mut out, cmp);
    }

    out.push_str("\nInterpretation:\n");
    out.push_str("- Critical points (dashed markers): growth stops increasing or decreasing.\n");
    out.push_str("- Inflection points (dotted markers): acceleration changes sign.\n");

    out
}

fn format_country(out: &mut String, cc: &CountryCurves) {
    let p = &cc.profile;
    out.push_str(&format!(
        "{} (a={}, b={}, c={})\n",
        p.country.display_name(),
        p.a,
        p.b,
        p.c,
    ));
    out.push_str(&format!("  f(x)   = {}\n", cc.formula));
    out.push_str(&format!("  f'(x)  = {}\n", cc.d1_formula));
    out.push_str(&format!("  f''(x) = {}\n", cc.d2_formula));
    out.push_str(&format!(
        "  critical points  : {}\n",
        fmt_points(&cc.critical),
    ));
    out.push_str(&format!(
        "  inflection points: {}\n",
        fmt_points(&cc.inflection),
    ));
}

fn fmt_points(points: &[f64]) -> String {
    if points.is_empty() {
        return "none in range".to_string();
    }
    let parts: Vec<String> = points.iter().map(|x| format!("{x:.4}")).collect();
    parts.join(", ")
}
