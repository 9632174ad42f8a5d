//! Expression trees, generator expansion and direct evaluation.
//!
//! This module provides the front half of the compiler:
//! - `Expr` - the closed set of node kinds
//! - `Scope` / `DataContext` - generator bindings and external data
//! - `generator::expand` - Cartesian-product expansion of generator lists
//! - `eval::evaluate` - structural evaluation of linear expressions

pub mod eval;
pub mod expression;
pub mod generator;
pub mod scope;

pub use eval::{evaluate, resolve_pattern, resolve_var};
pub use expression::{Domain, Expr, Generator, IndexExpr, Piecewise, VarRef};
pub use generator::expand;
pub use scope::{DataContext, Scope};
