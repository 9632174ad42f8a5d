//! Sparse multivariate polynomials.
//!
//! This module provides the algebra every other layer produces and consumes:
//! - `Term` - a sorted multiset of variable names (a product of variables)
//! - `Polynomial` - a sparse map from terms to non-zero coefficients

pub mod polynomial;
pub mod term;

pub use polynomial::Polynomial;
pub use term::Term;
