//! Exact symbolic differentiation.
//!
//! Standard calculus rules (sum, product, quotient, chain); the result is
//! normalized through [`Expr::simplify`] so that downstream code (display,
//! root solving) sees a predictable shape, e.g. the polynomial family
//! `a·x² + b·x + c` differentiates to `2a·x + b` and then to the constant
//! `2a`.

use crate::math::expr::Expr;

impl Expr {
    /// First derivative with respect to the free variable, simplified.
    pub fn diff(&self) -> Expr {
        derivative(self).simplify()
    }
}

fn derivative(e: &Expr) -> Expr {
    match e {
        Expr::Const(_) => Expr::Const(0.0),
        Expr::Var => Expr::Const(1.0),
        Expr::Add(a, b) => Expr::add(derivative(a), derivative(b)),
        Expr::Sub(a, b) => Expr::sub(derivative(a), derivative(b)),
        Expr::Mul(a, b) => Expr::add(
            Expr::mul(derivative(a), (**b).clone()),
            Expr::mul((**a).clone(), derivative(b)),
        ),
        Expr::Div(a, b) => Expr::div(
            Expr::sub(
                Expr::mul(derivative(a), (**b).clone()),
                Expr::mul((**a).clone(), derivative(b)),
            ),
            Expr::mul((**b).clone(), (**b).clone()),
        ),
        Expr::Pow(base, expo) => match expo.as_ref() {
            // n·u^(n-1)·u'
            Expr::Const(n) => Expr::mul(
                Expr::num(*n),
                Expr::mul(
                    Expr::pow((**base).clone(), Expr::num(n - 1.0)),
                    derivative(base),
                ),
            ),
            // General rule: (u^v)' = u^v · (v'·ln u + v·u'/u).
            // Unused by the fixed templates but kept total.
            _ => Expr::mul(
                (*e).clone(),
                Expr::add(
                    Expr::mul(derivative(expo), Expr::ln((**base).clone())),
                    Expr::mul(
                        (**expo).clone(),
                        Expr::div(derivative(base), (**base).clone()),
                    ),
                ),
            ),
        },
        Expr::Neg(a) => Expr::neg(derivative(a)),
        Expr::Sin(a) => Expr::mul(Expr::cos((**a).clone()), derivative(a)),
        Expr::Cos(a) => Expr::neg(Expr::mul(Expr::sin((**a).clone()), derivative(a))),
        Expr::Exp(a) => Expr::mul(Expr::exp((**a).clone()), derivative(a)),
        Expr::Ln(a) => Expr::div(derivative(a), (**a).clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(a: f64, b: f64, c: f64) -> Expr {
        Expr::add(
            Expr::add(
                Expr::mul(Expr::num(a), Expr::pow(Expr::var(), Expr::num(2.0))),
                Expr::mul(Expr::num(b), Expr::var()),
            ),
            Expr::num(c),
        )
    }

    #[test]
    fn polynomial_derivatives_match_closed_form() {
        // f = a·x² + b·x + c  =>  f' = 2a·x + b  =>  f'' = 2a
        let f = poly(1.5, 0.35, 6.0);
        let d1 = f.diff();
        let d2 = d1.diff();

        assert_eq!(
            d1,
            Expr::add(Expr::mul(Expr::num(3.0), Expr::var()), Expr::num(0.35)),
        );
        assert_eq!(d2, Expr::Const(3.0));
    }

    #[test]
    fn exponential_derivative_hoists_coefficient() {
        // f = a·e^(b·x) + c  =>  f' = a·b·e^(b·x)
        let bx = Expr::mul(Expr::num(0.45), Expr::var());
        let f = Expr::add(
            Expr::mul(Expr::num(1.2), Expr::exp(bx.clone())),
            Expr::num(3.0),
        );
        let d1 = f.diff();
        assert_eq!(d1, Expr::mul(Expr::num(1.2 * 0.45), Expr::exp(bx)));
    }

    #[test]
    fn sine_second_derivative_is_negated_sine() {
        // f = a·sin(b·x) + c  =>  f'' = -a·b²·sin(b·x)
        let a = 1.1;
        let b = 0.5;
        let bx = Expr::mul(Expr::num(b), Expr::var());
        let f = Expr::add(
            Expr::mul(Expr::num(a), Expr::sin(bx.clone())),
            Expr::num(2.5),
        );
        let d2 = f.diff().diff();
        assert_eq!(d2, Expr::mul(Expr::num(-a * b * b), Expr::sin(bx)));
    }

    #[test]
    fn log_derivative_evaluates_correctly() {
        // f = a·ln(b·x) + c  =>  f'(x) = a/x, f''(x) = -a/x²
        let a = 0.9;
        let f = Expr::add(
            Expr::mul(
                Expr::num(a),
                Expr::ln(Expr::mul(Expr::num(0.25), Expr::var())),
            ),
            Expr::num(5.0),
        );
        let d1 = f.diff();
        let d2 = d1.diff();
        for &x in &[0.5, 1.0, 2.0, 7.5] {
            assert!((d1.eval(x) - a / x).abs() < 1e-12);
            assert!((d2.eval(x) + a / (x * x)).abs() < 1e-12);
        }
    }

    #[test]
    fn second_derivative_consistency() {
        // diff(diff(f)) must equal diff(f') for every fixed template shape.
        let bx = Expr::mul(Expr::num(0.3), Expr::var());
        let shapes = vec![
            poly(1.0, 2.0, 4.5),
            Expr::add(Expr::mul(Expr::num(1.2), Expr::exp(bx.clone())), Expr::num(3.0)),
            Expr::add(Expr::mul(Expr::num(1.3), Expr::sin(bx.clone())), Expr::num(3.0)),
            Expr::add(Expr::mul(Expr::num(1.0), Expr::ln(bx)), Expr::num(4.5)),
        ];
        for f in shapes {
            let d1 = f.diff();
            assert_eq!(d1.diff(), f.diff().diff());
            // And numerically: f' approximates (f(x+h)-f(x-h))/2h.
            for &x in &[0.7, 1.9, 4.2] {
                let h = 1e-6;
                let approx = (f.eval(x + h) - f.eval(x - h)) / (2.0 * h);
                assert!((d1.eval(x) - approx).abs() < 1e-5);
            }
        }
    }
}
