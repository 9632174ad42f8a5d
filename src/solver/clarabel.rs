//! Clarabel solver integration.
//!
//! Clarabel is an interior-point solver for continuous problems. It handles
//! the LP/QP relaxation side of a model; anything with integer or binary
//! variables goes to an external MILP solver through the LP writer.

use std::collections::HashMap;

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT};
use tracing::debug;

use super::solution::{SolveStatus, Solution, Solver};
use super::stuffing::{stuff_problem, ConeDims, VariableMap};
use crate::error::{ModelError, Result};
use crate::problem::Problem;

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::PrimalInfeasible => SolveStatus::Infeasible,
            SolverStatus::DualInfeasible => SolveStatus::Unbounded,
            SolverStatus::MaxIterations => SolveStatus::MaxIterations,
            SolverStatus::MaxTime => SolveStatus::MaxIterations,
            SolverStatus::NumericalError => SolveStatus::NumericalError,
            _ => SolveStatus::Unknown,
        }
    }
}

/// Solver settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute tolerance.
    pub tol_gap_abs: f64,
    /// Relative tolerance.
    pub tol_gap_rel: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose: false,
            max_iter: 100,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }
}

/// Continuous LP/QP backend.
///
/// ```
/// use milpc::prelude::*;
///
/// let mut problem = Problem::minimize();
/// let x = problem.new_variable("x", &VariableOptions::new()).unwrap();
/// problem.add_objective_expr(&abs(&(poly(&x) - 2.0)), &Scope::empty()).unwrap();
///
/// let solution = ClarabelSolver::default().solve(&problem).unwrap();
/// assert!((solution.evaluate(&x).unwrap() - 2.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClarabelSolver {
    settings: Settings,
}

impl ClarabelSolver {
    /// A solver with custom settings.
    pub fn new(settings: Settings) -> Self {
        ClarabelSolver { settings }
    }

    /// The settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl Solver for ClarabelSolver {
    fn solve(&self, problem: &Problem) -> Result<Solution> {
        let stuffed = stuff_problem(problem)?;
        debug!(
            variables = stuffed.var_map.len(),
            rows = stuffed.cone_dims.total(),
            "solving with clarabel"
        );

        let p = to_clarabel_csc(&stuffed.p);
        let a = to_clarabel_csc(&stuffed.a);
        let cones = to_clarabel_cones(&stuffed.cone_dims);

        let settings = DefaultSettingsBuilder::default()
            .verbose(self.settings.verbose)
            .max_iter(self.settings.max_iter)
            .time_limit(self.settings.time_limit)
            .tol_gap_abs(self.settings.tol_gap_abs)
            .tol_gap_rel(self.settings.tol_gap_rel)
            .build()
            .map_err(|e| ModelError::Solver(format!("invalid settings: {:?}", e)))?;

        let mut solver = DefaultSolver::new(
            &p,
            stuffed.q.as_slice(),
            &a,
            stuffed.b.as_slice(),
            &cones,
            settings,
        );
        solver.solve();

        let status: SolveStatus = solver.solution.status.into();
        let mut solution = Solution::unsolved(status);
        solution.solve_time = solver.solution.solve_time;
        solution.iterations = solver.info.iterations;
        debug!(?status, iterations = solution.iterations, "clarabel finished");

        if status == SolveStatus::Optimal {
            solution.values = unpack_primal(&solver.solution.x, &stuffed.var_map);
            solution.objective = Some(problem.objective_value(&solution.values)?);
        }
        Ok(solution)
    }
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &nalgebra_sparse::CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Convert cone dimensions to Clarabel cones.
fn to_clarabel_cones(dims: &ConeDims) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();
    if dims.zero > 0 {
        cones.push(SupportedConeT::ZeroConeT(dims.zero));
    }
    if dims.nonneg > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(dims.nonneg));
    }
    cones
}

/// Values by variable name.
fn unpack_primal(x: &[f64], var_map: &VariableMap) -> HashMap<String, f64> {
    x.iter()
        .enumerate()
        .filter_map(|(col, v)| var_map.name(col).map(|n| (n.to_string(), *v)))
        .collect()
}
