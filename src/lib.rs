//! # milpc
//!
//! A symbolic modeling layer that compiles algebraic models into
//! mixed-integer linear programs.
//!
//! Models are written as expression trees over indexed variable families.
//! Linear parts evaluate directly to sparse polynomials; non-linear constructs
//! (absolute value, max/min, logical and/or, if-then-else, piecewise-linear
//! functions) are rewritten into auxiliary variables plus linear constraints.
//! The finished model is written as CPLEX LP text for a MILP solver, or
//! solved directly when it is a continuous LP/QP.
//!
//! ## Quick Start
//!
//! ```
//! use milpc::prelude::*;
//!
//! let data = DataContext::new()
//!     .with_domain("items", [1, 2, 3])
//!     .with_table("target", [(vec![1], 4.0), (vec![2], -1.0), (vec![3], 2.5)]);
//!
//! let mut problem = Problem::minimize();
//! problem
//!     .new_family("x", &[Generator::data("i", "items")], &VariableOptions::new(), &data)
//!     .unwrap();
//!
//! // minimize sum_i |x(i) - target(i)|
//! let deviation = sum_over(
//!     abs(&(var("x", ["i"]) - param("target", ["i"]))),
//!     vec![Generator::data("i", "items")],
//! );
//! problem.add_objective_expr(&deviation, &Scope::new(&data)).unwrap();
//!
//! let lp = write_lp(&problem).unwrap();
//! assert!(lp.starts_with("Minimize"));
//! ```
//!
//! ## Constructs and their encodings
//!
//! - `abs(e)`: one auxiliary `a` with `a >= e`, `a >= -e`
//! - `max(e1..en)` / `min(e1..en)`: one auxiliary bounded by every operand
//! - `and` / `or`: one binary auxiliary with the usual 0/1 linking rows
//! - `if_then_else(c, t, f)`: big-M selection between `t` and `f`
//! - `piecewise(x, ...)`: one binary selector per segment plus a value variable
//!
//! ## Architecture
//!
//! - **Polynomials** (`poly`) are the common currency of every layer
//! - **Expression trees** (`expr`) use the `Expr` enum with `Arc` sharing
//! - **Linearity analysis** (`analysis`) decides what needs rewriting
//! - **Linearization** (`linearize`) emits auxiliaries, memoized by fingerprint
//! - **Problem assembly** (`problem`) owns variables, families and constraints
//! - **Solvers** (`solver`) write LP text or solve continuous models with Clarabel

pub mod analysis;
pub mod atoms;
pub mod error;
pub mod expr;
pub mod linearize;
pub mod model;
pub mod poly;
pub mod problem;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```
/// use milpc::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{DataContext, Domain, Expr, Generator, IndexExpr, Scope};

    // Atoms
    pub use crate::atoms::{
        abs, and, constant, if_then_else, max, max2, min, min2, or, param, piecewise, poly,
        scalar, sum_over, sym, var,
    };

    // Polynomials
    pub use crate::poly::{Polynomial, Term};

    // Model records
    pub use crate::model::{Comparison, Constraint, Family, VarType, VariableDef, VariableOptions};

    // Analysis
    pub use crate::analysis::{analyze, Classification};

    // Problem
    pub use crate::problem::{Direction, Problem, ProblemBuilder};

    // Linearization
    pub use crate::linearize::{LinearizeConfig, Linearizer};

    // Solver
    pub use crate::solver::{write_lp, ClarabelSolver, Settings, Solution, SolveStatus, Solver};

    // Errors
    pub use crate::error::{ModelError, Result};
}

// Re-export main types at crate root
pub use error::{ModelError, Result};
pub use poly::Polynomial;
pub use problem::Problem;
pub use solver::{Solution, SolveStatus};
