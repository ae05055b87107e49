//! Closed-form root extraction over a bounded interval.
//!
//! `solve_roots` answers "where is this expression exactly zero inside
//! `[xmin, xmax]`?" for the shapes produced by differentiating the four
//! model templates: polynomials up to degree two, constant multiples of
//! `sin`/`cos`/`exp`/`ln`, and rational forms like `a/x`.
//!
//! The contract is fail-soft by design: any shape the solver cannot handle
//! (or a degenerate identically-zero input) yields an **empty** set rather
//! than an error, because the surrounding pipeline must always produce a
//! chart even when a model/range combination is analytically awkward.
//! Complex roots are discarded (a negative quadratic discriminant simply
//! contributes nothing).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::math::expr::Expr;

/// Two roots closer than this are treated as one.
const ROOT_MERGE_EPS: f64 = 1e-9;

/// Cap on lattice enumeration, to stay fail-soft on absurd frequencies.
const MAX_LATTICE_ROOTS: usize = 10_000;

/// Find the real roots of `expr` within `[xmin, xmax]` inclusive.
///
/// Returns a sorted, deduplicated vector; empty when there are no roots in
/// range *or* when the expression shape is unsolvable.
pub fn solve_roots(expr: &Expr, xmin: f64, xmax: f64) -> Vec<f64> {
    let normalized = expr.simplify();
    let mut roots = candidates(&normalized, xmin, xmax).unwrap_or_default();

    roots.retain(|x| x.is_finite() && *x >= xmin && *x <= xmax);
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|a, b| (*a - *b).abs() < ROOT_MERGE_EPS);
    roots
}

/// Candidate roots (not yet range-filtered), or `None` when unsolvable.
fn candidates(e: &Expr, xmin: f64, xmax: f64) -> Option<Vec<f64>> {
    // Polynomial shapes (constants, linear, quadratic) in one go.
    if let Some(coeffs) = as_poly(e) {
        return poly_roots(coeffs);
    }

    match e {
        // A product is zero where any factor is zero. Constant coefficients
        // hoisted by `simplify` land in the `as_poly` path above and
        // contribute an empty set.
        Expr::Mul(a, b) => {
            let mut roots = candidates(a, xmin, xmax)?;
            roots.extend(candidates(b, xmin, xmax)?);
            Some(roots)
        }
        // A quotient is zero where the numerator is, away from poles.
        Expr::Div(num, den) => {
            let mut roots = candidates(num, xmin, xmax)?;
            roots.retain(|&x| {
                let d = den.eval(x);
                d.is_finite() && d.abs() > 1e-12
            });
            Some(roots)
        }
        Expr::Pow(base, expo) => match expo.as_ref() {
            Expr::Const(n) if *n > 0.0 => candidates(base, xmin, xmax),
            Expr::Const(_) => Some(Vec::new()),
            _ => None,
        },
        // e^u is never zero.
        Expr::Exp(_) => Some(Vec::new()),
        // sin(k·x + m) = 0  ⇔  k·x + m = n·π
        Expr::Sin(inner) => lattice_roots(inner, 0.0, xmin, xmax),
        // cos(k·x + m) = 0  ⇔  k·x + m = π/2 + n·π
        Expr::Cos(inner) => lattice_roots(inner, FRAC_PI_2, xmin, xmax),
        // ln(u) = 0  ⇔  u = 1
        Expr::Ln(inner) => {
            let mut p = as_poly(inner)?;
            p[0] -= 1.0;
            poly_roots(p)
        }
        _ => None,
    }
}

/// Interpret `e` as `c0 + c1·x + c2·x²` if possible.
fn as_poly(e: &Expr) -> Option<[f64; 3]> {
    match e {
        Expr::Const(v) => Some([*v, 0.0, 0.0]),
        Expr::Var => Some([0.0, 1.0, 0.0]),
        Expr::Add(a, b) => {
            let pa = as_poly(a)?;
            let pb = as_poly(b)?;
            Some([pa[0] + pb[0], pa[1] + pb[1], pa[2] + pb[2]])
        }
        Expr::Sub(a, b) => {
            let pa = as_poly(a)?;
            let pb = as_poly(b)?;
            Some([pa[0] - pb[0], pa[1] - pb[1], pa[2] - pb[2]])
        }
        Expr::Neg(a) => {
            let p = as_poly(a)?;
            Some([-p[0], -p[1], -p[2]])
        }
        Expr::Mul(a, b) => {
            let pa = as_poly(a)?;
            let pb = as_poly(b)?;
            poly_mul(pa, pb)
        }
        Expr::Pow(base, expo) => match expo.as_ref() {
            Expr::Const(n) if *n == 0.0 => Some([1.0, 0.0, 0.0]),
            Expr::Const(n) if *n == 1.0 => as_poly(base),
            Expr::Const(n) if *n == 2.0 => {
                let p = as_poly(base)?;
                poly_mul(p, p)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Multiply two polynomials, failing when the product exceeds degree two.
fn poly_mul(a: [f64; 3], b: [f64; 3]) -> Option<[f64; 3]> {
    let mut out = [0.0; 5];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            out[i + j] += ca * cb;
        }
    }
    if out[3] != 0.0 || out[4] != 0.0 {
        return None;
    }
    Some([out[0], out[1], out[2]])
}

/// Real roots of `c0 + c1·x + c2·x²`.
fn poly_roots([c0, c1, c2]: [f64; 3]) -> Option<Vec<f64>> {
    if c2 != 0.0 {
        let disc = c1 * c1 - 4.0 * c2 * c0;
        if disc < 0.0 {
            // Complex pair; nothing real to mark.
            return Some(Vec::new());
        }
        let sq = disc.sqrt();
        if sq == 0.0 {
            return Some(vec![-c1 / (2.0 * c2)]);
        }
        return Some(vec![(-c1 - sq) / (2.0 * c2), (-c1 + sq) / (2.0 * c2)]);
    }
    if c1 != 0.0 {
        return Some(vec![-c0 / c1]);
    }
    if c0 != 0.0 {
        return Some(Vec::new());
    }
    // Identically zero: every x is a root, which is not representable as a
    // marker set. Degrade to "unsolvable".
    None
}

/// Enumerate solutions of `k·x + m = offset + n·π` for integer `n`,
/// restricted to `[xmin, xmax]`.
fn lattice_roots(inner: &Expr, offset: f64, xmin: f64, xmax: f64) -> Option<Vec<f64>> {
    let p = as_poly(inner)?;
    if p[2] != 0.0 || p[1] == 0.0 {
        return None;
    }
    let (k, m) = (p[1], p[0]);

    // Map the x-interval into the argument's range.
    let t0 = k * xmin + m - offset;
    let t1 = k * xmax + m - offset;
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };

    let n_lo = (lo / PI).ceil() as i64;
    let n_hi = (hi / PI).floor() as i64;
    if n_hi < n_lo {
        return Some(Vec::new());
    }
    if (n_hi - n_lo) as usize >= MAX_LATTICE_ROOTS {
        return None;
    }

    let mut roots = Vec::with_capacity((n_hi - n_lo + 1) as usize);
    for n in n_lo..=n_hi {
        roots.push((offset + n as f64 * PI - m) / k);
    }
    Some(roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_root_of_polynomial_derivative() {
        // f' = 2a·x + b with a = 1.5, b = 0.35: root at -b/2a.
        let d1 = Expr::add(Expr::mul(Expr::num(3.0), Expr::var()), Expr::num(0.35));
        let roots = solve_roots(&d1, -1.0, 1.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - (-0.35 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn linear_root_outside_range_is_dropped() {
        // f' = 2x + 2 has its root at x = -1, outside [0.1, 5.0].
        let d1 = Expr::add(Expr::mul(Expr::num(2.0), Expr::var()), Expr::num(2.0));
        assert!(solve_roots(&d1, 0.1, 5.0).is_empty());
    }

    #[test]
    fn quadratic_roots_both_found() {
        // x² - 3x + 2 = (x-1)(x-2)
        let e = Expr::add(
            Expr::add(
                Expr::pow(Expr::var(), Expr::num(2.0)),
                Expr::mul(Expr::num(-3.0), Expr::var()),
            ),
            Expr::num(2.0),
        );
        let roots = solve_roots(&e, 0.0, 10.0);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - 1.0).abs() < 1e-9);
        assert!((roots[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn quadratic_with_complex_roots_is_empty() {
        // x² + 1 has no real roots.
        let e = Expr::add(Expr::pow(Expr::var(), Expr::num(2.0)), Expr::num(1.0));
        assert!(solve_roots(&e, -10.0, 10.0).is_empty());
    }

    #[test]
    fn exponential_derivative_has_no_roots() {
        // 0.54·e^(0.45·x) is never zero.
        let e = Expr::mul(
            Expr::num(0.54),
            Expr::exp(Expr::mul(Expr::num(0.45), Expr::var())),
        );
        assert!(solve_roots(&e, 0.1, 5.0).is_empty());
    }

    #[test]
    fn sine_lattice_restricted_to_interval() {
        // -a·b²·sin(b·x) = 0 at x = n·π/b.
        let b = 0.55;
        let e = Expr::mul(
            Expr::num(-1.3 * b * b),
            Expr::sin(Expr::mul(Expr::num(b), Expr::var())),
        );
        let roots = solve_roots(&e, 0.1, 10.0);
        // π/b ≈ 5.712 is the only sine zero in (0.1, 10.0].
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - PI / b).abs() < 1e-9);

        // A wider interval picks up the lattice point at 2π/b too.
        let wide = solve_roots(&e, 0.0, 12.0);
        assert_eq!(wide.len(), 3);
        assert!(wide[0].abs() < 1e-9);
        assert!((wide[1] - PI / b).abs() < 1e-9);
        assert!((wide[2] - 2.0 * PI / b).abs() < 1e-9);
    }

    #[test]
    fn cosine_lattice_offset_by_half_pi() {
        // cos(2x) = 0 at x = π/4 + n·π/2.
        let e = Expr::cos(Expr::mul(Expr::num(2.0), Expr::var()));
        let roots = solve_roots(&e, 0.0, 2.5);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - PI / 4.0).abs() < 1e-9);
        assert!((roots[1] - 3.0 * PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn rational_derivative_of_log_family_has_no_roots() {
        // f' of a·ln(b·x) + c simplifies to a·(b/(b·x)); constant numerator.
        let b = 0.45;
        let d1 = Expr::mul(
            Expr::num(1.2),
            Expr::div(
                Expr::num(b),
                Expr::mul(Expr::num(b), Expr::var()),
            ),
        );
        assert!(solve_roots(&d1, 0.1, 10.0).is_empty());
    }

    #[test]
    fn log_equals_zero_where_argument_is_one() {
        // ln(0.5·x) = 0 at x = 2.
        let e = Expr::ln(Expr::mul(Expr::num(0.5), Expr::var()));
        let roots = solve_roots(&e, 0.1, 10.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unsolvable_shape_degrades_to_empty() {
        // sin(x) + ln(x) has no closed-form root extraction here.
        let e = Expr::add(Expr::sin(Expr::var()), Expr::ln(Expr::var()));
        assert!(solve_roots(&e, 0.1, 10.0).is_empty());
    }

    #[test]
    fn identically_zero_degrades_to_empty() {
        assert!(solve_roots(&Expr::num(0.0), 0.0, 1.0).is_empty());
    }

    #[test]
    fn nonzero_constant_has_no_roots() {
        assert!(solve_roots(&Expr::num(3.0), 0.0, 1.0).is_empty());
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        // Root exactly at xmin.
        let e = Expr::add(Expr::var(), Expr::num(-0.1));
        let roots = solve_roots(&e, 0.1, 5.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 0.1).abs() < 1e-12);
    }
}
