//! Closed-form expression trees in a single real variable.
//!
//! The four model families only need a small operator set: arithmetic,
//! powers, `sin`/`cos`, `exp`, and `ln`. Expressions are built by the model
//! templates, differentiated symbolically, simplified, and then either
//! evaluated over a sample grid or handed to the root solver.
//!
//! `simplify` also acts as a normalizer: it folds constants, flattens
//! products so that a single numeric coefficient ends up on the left, and
//! rewrites `Neg`/`Sub` away. The root solver relies on that normal form.

/// A symbolic expression in one free variable (time).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    /// The free variable `x`.
    Var,
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Exp(Box<Expr>),
    Ln(Box<Expr>),
}

impl Expr {
    pub fn num(v: f64) -> Expr {
        Expr::Const(v)
    }

    pub fn var() -> Expr {
        Expr::Var
    }

    pub fn add(a: Expr, b: Expr) -> Expr {
        Expr::Add(Box::new(a), Box::new(b))
    }

    pub fn sub(a: Expr, b: Expr) -> Expr {
        Expr::Sub(Box::new(a), Box::new(b))
    }

    pub fn mul(a: Expr, b: Expr) -> Expr {
        Expr::Mul(Box::new(a), Box::new(b))
    }

    pub fn div(a: Expr, b: Expr) -> Expr {
        Expr::Div(Box::new(a), Box::new(b))
    }

    pub fn pow(a: Expr, b: Expr) -> Expr {
        Expr::Pow(Box::new(a), Box::new(b))
    }

    pub fn neg(a: Expr) -> Expr {
        Expr::Neg(Box::new(a))
    }

    pub fn sin(a: Expr) -> Expr {
        Expr::Sin(Box::new(a))
    }

    pub fn cos(a: Expr) -> Expr {
        Expr::Cos(Box::new(a))
    }

    pub fn exp(a: Expr) -> Expr {
        Expr::Exp(Box::new(a))
    }

    pub fn ln(a: Expr) -> Expr {
        Expr::Ln(Box::new(a))
    }

    /// Evaluate the expression at `x`.
    ///
    /// Out-of-domain inputs are *not* guarded: `ln` of a non-positive
    /// argument yields `NaN`/`-inf` per IEEE 754, and that value propagates
    /// into the sampled array. The renderer breaks the plotted line at
    /// non-finite samples, so this is the intended behavior for e.g. the
    /// logarithmic family evaluated at `b·x ≤ 0`.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Const(v) => *v,
            Expr::Var => x,
            Expr::Add(a, b) => a.eval(x) + b.eval(x),
            Expr::Sub(a, b) => a.eval(x) - b.eval(x),
            Expr::Mul(a, b) => a.eval(x) * b.eval(x),
            Expr::Div(a, b) => a.eval(x) / b.eval(x),
            Expr::Pow(a, b) => a.eval(x).powf(b.eval(x)),
            Expr::Neg(a) => -a.eval(x),
            Expr::Sin(a) => a.eval(x).sin(),
            Expr::Cos(a) => a.eval(x).cos(),
            Expr::Exp(a) => a.eval(x).exp(),
            Expr::Ln(a) => a.eval(x).ln(),
        }
    }

    /// Evaluate the expression at every sample point.
    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// Normalize the tree: fold constants, hoist numeric coefficients to the
    /// left of products, and eliminate `Neg`/`Sub` and trivial identities.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Var => self.clone(),
            Expr::Add(a, b) => simp_add(a.simplify(), b.simplify()),
            Expr::Sub(a, b) => simp_add(a.simplify(), simp_neg(b.simplify())),
            Expr::Mul(a, b) => simp_mul(a.simplify(), b.simplify()),
            Expr::Div(a, b) => simp_div(a.simplify(), b.simplify()),
            Expr::Pow(a, b) => simp_pow(a.simplify(), b.simplify()),
            Expr::Neg(a) => simp_neg(a.simplify()),
            Expr::Sin(a) => Expr::sin(a.simplify()),
            Expr::Cos(a) => Expr::cos(a.simplify()),
            Expr::Exp(a) => Expr::exp(a.simplify()),
            Expr::Ln(a) => Expr::ln(a.simplify()),
        }
    }
}

fn simp_add(a: Expr, b: Expr) -> Expr {
    let mut constant = 0.0;
    let mut terms = Vec::new();
    collect_terms(a, &mut constant, &mut terms);
    collect_terms(b, &mut constant, &mut terms);

    let body = terms.into_iter().reduce(Expr::add);
    match body {
        None => Expr::Const(constant),
        Some(e) if constant == 0.0 => e,
        Some(e) => Expr::add(e, Expr::Const(constant)),
    }
}

fn collect_terms(e: Expr, constant: &mut f64, out: &mut Vec<Expr>) {
    match e {
        Expr::Const(v) => *constant += v,
        Expr::Add(a, b) => {
            collect_terms(*a, constant, out);
            collect_terms(*b, constant, out);
        }
        other => out.push(other),
    }
}

fn simp_mul(a: Expr, b: Expr) -> Expr {
    let mut coeff = 1.0;
    let mut factors = Vec::new();
    collect_factors(a, &mut coeff, &mut factors);
    collect_factors(b, &mut coeff, &mut factors);

    if coeff == 0.0 {
        return Expr::Const(0.0);
    }
    let body = factors.into_iter().reduce(Expr::mul);
    match body {
        None => Expr::Const(coeff),
        Some(e) if coeff == 1.0 => e,
        Some(e) => Expr::mul(Expr::Const(coeff), e),
    }
}

fn collect_factors(e: Expr, coeff: &mut f64, out: &mut Vec<Expr>) {
    match e {
        Expr::Const(v) => *coeff *= v,
        Expr::Mul(a, b) => {
            collect_factors(*a, coeff, out);
            collect_factors(*b, coeff, out);
        }
        Expr::Neg(inner) => {
            *coeff = -*coeff;
            collect_factors(*inner, coeff, out);
        }
        other => out.push(other),
    }
}

fn simp_neg(e: Expr) -> Expr {
    simp_mul(Expr::Const(-1.0), e)
}

fn simp_div(a: Expr, b: Expr) -> Expr {
    match (a, b) {
        (Expr::Const(x), Expr::Const(y)) if y != 0.0 => Expr::Const(x / y),
        (Expr::Const(x), _) if x == 0.0 => Expr::Const(0.0),
        (a, Expr::Const(y)) if y == 1.0 => a,
        (a, b) => Expr::div(a, b),
    }
}

fn simp_pow(base: Expr, expo: Expr) -> Expr {
    match (base, expo) {
        (Expr::Const(x), Expr::Const(y)) => Expr::Const(x.powf(y)),
        (_, Expr::Const(y)) if y == 0.0 => Expr::Const(1.0),
        (base, Expr::Const(y)) if y == 1.0 => base,
        (base, expo) => Expr::pow(base, expo),
    }
}

// --- Display ---
//
// Precedence levels used for parenthesization:
// 1 add/sub, 2 mul/div, 3 unary minus, 4 pow, 5 atoms/function calls.

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_prec(f, 0)
    }
}

impl Expr {
    fn fmt_prec(&self, f: &mut std::fmt::Formatter<'_>, parent: u8) -> std::fmt::Result {
        let prec = self.precedence();
        let parens = prec < parent;
        if parens {
            write!(f, "(")?;
        }
        match self {
            Expr::Const(v) => write!(f, "{}", fmt_const(*v))?,
            Expr::Var => write!(f, "x")?,
            Expr::Add(a, b) => {
                a.fmt_prec(f, 1)?;
                // Render `u + (-k)·v` as `u - k·v`.
                if let Some(flipped) = negated_term(b) {
                    write!(f, " - ")?;
                    flipped.fmt_prec(f, 2)?;
                } else {
                    write!(f, " + ")?;
                    b.fmt_prec(f, 2)?;
                }
            }
            Expr::Sub(a, b) => {
                a.fmt_prec(f, 1)?;
                write!(f, " - ")?;
                b.fmt_prec(f, 2)?;
            }
            Expr::Mul(a, b) => {
                a.fmt_prec(f, 2)?;
                write!(f, "·")?;
                b.fmt_prec(f, 2)?;
            }
            Expr::Div(a, b) => {
                a.fmt_prec(f, 2)?;
                write!(f, "/")?;
                b.fmt_prec(f, 3)?;
            }
            Expr::Neg(a) => {
                write!(f, "-")?;
                a.fmt_prec(f, 3)?;
            }
            Expr::Pow(a, b) => {
                a.fmt_prec(f, 5)?;
                write!(f, "^")?;
                b.fmt_prec(f, 5)?;
            }
            Expr::Sin(a) => write!(f, "sin({a})")?,
            Expr::Cos(a) => write!(f, "cos({a})")?,
            Expr::Exp(a) => write!(f, "e^({a})")?,
            Expr::Ln(a) => write!(f, "ln({a})")?,
        }
        if parens {
            write!(f, ")")?;
        }
        Ok(())
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Neg(_) => 3,
            Expr::Pow(_, _) => 4,
            Expr::Const(v) if *v < 0.0 => 3,
            _ => 5,
        }
    }
}

/// If `e` has a negative leading coefficient, return it with the sign flipped.
fn negated_term(e: &Expr) -> Option<Expr> {
    match e {
        Expr::Const(v) if *v < 0.0 => Some(Expr::Const(-v)),
        Expr::Mul(a, b) => match a.as_ref() {
            Expr::Const(v) if *v < 0.0 => Some(simp_mul(Expr::Const(-v), (**b).clone())),
            _ => None,
        },
        _ => None,
    }
}

fn fmt_const(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e12 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_basic_arithmetic() {
        // 2·x + 3 at x = 4
        let e = Expr::add(Expr::mul(Expr::num(2.0), Expr::var()), Expr::num(3.0));
        assert_eq!(e.eval(4.0), 11.0);
    }

    #[test]
    fn eval_ln_out_of_domain_is_non_finite() {
        let e = Expr::ln(Expr::var());
        assert!(e.eval(-1.0).is_nan());
        assert_eq!(e.eval(0.0), f64::NEG_INFINITY);
        assert!((e.eval(1.0)).abs() < 1e-12);
    }

    #[test]
    fn simplify_folds_constants_left() {
        // 2·(sin(x)·3) -> 6·sin(x)
        let e = Expr::mul(
            Expr::num(2.0),
            Expr::mul(Expr::sin(Expr::var()), Expr::num(3.0)),
        );
        let s = e.simplify();
        assert_eq!(
            s,
            Expr::mul(Expr::num(6.0), Expr::sin(Expr::var())),
        );
    }

    #[test]
    fn simplify_removes_neg_and_sub() {
        // 0 - (-x) -> x
        let e = Expr::sub(Expr::num(0.0), Expr::neg(Expr::var()));
        assert_eq!(e.simplify(), Expr::Var);
    }

    #[test]
    fn simplify_zero_and_identity_rules() {
        let zero_mul = Expr::mul(Expr::num(0.0), Expr::exp(Expr::var()));
        assert_eq!(zero_mul.simplify(), Expr::Const(0.0));

        let one_pow = Expr::pow(Expr::var(), Expr::num(1.0));
        assert_eq!(one_pow.simplify(), Expr::Var);

        let add_zero = Expr::add(Expr::var(), Expr::num(0.0));
        assert_eq!(add_zero.simplify(), Expr::Var);
    }

    #[test]
    fn sample_matches_pointwise_eval() {
        let e = Expr::pow(Expr::var(), Expr::num(2.0));
        let xs = [0.5, 1.0, 2.0];
        let ys = e.sample(&xs);
        assert_eq!(ys, vec![0.25, 1.0, 4.0]);
    }

    #[test]
    fn display_reads_naturally() {
        // 1.2·e^(0.45·x) + 3
        let e = Expr::add(
            Expr::mul(
                Expr::num(1.2),
                Expr::exp(Expr::mul(Expr::num(0.45), Expr::var())),
            ),
            Expr::num(3.0),
        );
        assert_eq!(e.to_string(), "1.2·e^(0.45·x) + 3");

        let quad = Expr::add(
            Expr::add(
                Expr::mul(Expr::num(1.0), Expr::pow(Expr::var(), Expr::num(2.0))),
                Expr::mul(Expr::num(2.0), Expr::var()),
            ),
            Expr::num(4.5),
        );
        assert_eq!(quad.to_string(), "1·x^2 + 2·x + 4.5");
    }

    #[test]
    fn display_folds_negative_terms_into_subtraction() {
        // x + (-2)·sin(x) -> "x - 2·sin(x)"
        let e = Expr::add(
            Expr::var(),
            Expr::mul(Expr::num(-2.0), Expr::sin(Expr::var())),
        );
        assert_eq!(e.to_string(), "x - 2·sin(x)");
    }
}
