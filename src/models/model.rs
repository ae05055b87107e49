//! Template instantiation for the four model families.
//!
//! Each family maps a country's `(a, b, c)` coefficients to a closed-form
//! expression in the time variable `x`:
//!
//! | Family        | Expression        |
//! |---------------|-------------------|
//! | Exponential   | `a·e^(b·x) + c`   |
//! | Logarithmic   | `a·ln(b·x) + c`   |
//! | Polynomial    | `a·x² + b·x + c`  |
//! | Trigonometric | `a·sin(b·x) + c`  |

use crate::domain::{CountryProfile, ModelFamily};
use crate::math::Expr;

/// Instantiate the family template with a country's coefficients.
///
/// Total over the closed `ModelFamily` enumeration.
pub fn build_expr(family: ModelFamily, profile: &CountryProfile) -> Expr {
    let CountryProfile { a, b, c, .. } = *profile;
    let bx = || Expr::mul(Expr::num(b), Expr::var());

    match family {
        ModelFamily::Exponential => Expr::add(
            Expr::mul(Expr::num(a), Expr::exp(bx())),
            Expr::num(c),
        ),
        ModelFamily::Logarithmic => Expr::add(
            Expr::mul(Expr::num(a), Expr::ln(bx())),
            Expr::num(c),
        ),
        ModelFamily::Polynomial => Expr::add(
            Expr::add(
                Expr::mul(Expr::num(a), Expr::pow(Expr::var(), Expr::num(2.0))),
                Expr::mul(Expr::num(b), Expr::var()),
            ),
            Expr::num(c),
        ),
        ModelFamily::Trigonometric => Expr::add(
            Expr::mul(Expr::num(a), Expr::sin(bx())),
            Expr::num(c),
        ),
    }
}
