//! Atom functions for building expressions.
//!
//! Atoms are the building blocks of model expressions. They include:
//!
//! - **Linear atoms**: references, parameters, generator sums and arithmetic
//! - **Nonlinear atoms**: abs, max/min, and/or, if-then-else, piecewise-linear

pub mod linear;
pub mod nonlinear;

// Re-export linear atoms
pub use linear::{constant, param, poly, scalar, sum_over, sym, var};

// Re-export nonlinear atoms
pub use nonlinear::{abs, and, if_then_else, max, max2, min, min2, or, piecewise};
