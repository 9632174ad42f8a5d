//! Linearity analysis.
//!
//! This module decides which expressions can be evaluated directly and which
//! must go through the linearizer:
//! - Classification tracking (constant, variable, linear, non-linear)
//! - Composition rules for arithmetic
//! - Recursive detection of non-linear sub-expressions

pub mod linearity;

pub use linearity::{add_classification, analyze, mul_classification, Analysis, Classification};
