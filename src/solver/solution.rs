//! Solver-independent results.

use std::collections::HashMap;

use crate::error::Result;
use crate::poly::Polynomial;
use crate::problem::Problem;

/// Solution status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Iteration or time limit reached.
    MaxIterations,
    /// Numerical difficulties.
    NumericalError,
    /// Unknown status.
    Unknown,
}

/// A solution: status, objective value and values by variable name.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status.
    pub status: SolveStatus,
    /// Objective value in the problem's own direction (if solved).
    pub objective: Option<f64>,
    /// Variable values keyed by generated name; empty unless solved.
    pub values: HashMap<String, f64>,
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Number of iterations.
    pub iterations: u32,
}

impl Solution {
    /// A solution carrying only a status.
    pub fn unsolved(status: SolveStatus) -> Self {
        Solution {
            status,
            objective: None,
            values: HashMap::new(),
            solve_time: 0.0,
            iterations: 0,
        }
    }

    /// Check if the backend reported an optimum.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Value of a variable by name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Evaluate a polynomial (typically a variable handle or an auxiliary
    /// result) at this solution.
    pub fn evaluate(&self, poly: &Polynomial) -> Result<f64> {
        poly.evaluate(&self.values)
    }
}

/// A backend that can solve a model.
pub trait Solver {
    /// Solve `problem`. Models the backend cannot express are an error.
    fn solve(&self, problem: &Problem) -> Result<Solution>;
}
