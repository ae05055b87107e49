//! Symbolic math: expression trees, differentiation, and root extraction.

pub mod diff;
pub mod expr;
pub mod roots;

pub use expr::*;
pub use roots::*;
