//! Model family templates.
//!
//! Templates are implemented as small, pure functions so that the pipeline
//! and the solver can stay generic over the family.

pub mod model;

pub use model::*;
