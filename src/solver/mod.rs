//! Solver interface for milpc.
//!
//! This module provides:
//! - The `Solver` trait and solver-independent `Solution`
//! - CPLEX LP text output for external MILP solvers
//! - Matrix stuffing and Clarabel integration for continuous models

pub mod clarabel;
pub mod lp_format;
pub mod solution;
pub mod stuffing;

pub use self::clarabel::{ClarabelSolver, Settings};
pub use lp_format::{check_degrees, write_lp};
pub use solution::{SolveStatus, Solution, Solver};
pub use stuffing::{stuff_problem, ConeDims, StuffedProblem, VariableMap};
