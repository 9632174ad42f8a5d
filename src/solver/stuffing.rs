//! Matrix stuffing: converts a model into conic standard form.
//!
//! The continuous backend solves
//!
//! ```text
//! minimize    (1/2) x' P x + q' x
//! subject to  A x + s = b,  s in K
//! ```
//!
//! with `K` a zero cone (equalities) followed by a nonnegative cone
//! (inequalities and variable bounds). One column per registered variable.

use std::collections::HashMap;

use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use crate::error::{ModelError, Result};
use crate::model::{Comparison, VarType};
use crate::poly::Polynomial;
use crate::problem::Problem;
use crate::sparse::csc_from_triplets;

/// Cone dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConeDims {
    /// Number of zero cone (equality) rows.
    pub zero: usize,
    /// Number of nonnegative cone rows.
    pub nonneg: usize,
}

impl ConeDims {
    /// Total number of constraint rows.
    pub fn total(&self) -> usize {
        self.zero + self.nonneg
    }
}

/// Mapping from variable names to columns.
#[derive(Debug, Clone, Default)]
pub struct VariableMap {
    columns: HashMap<String, usize>,
    names: Vec<String>,
}

impl VariableMap {
    /// One column per registered variable, in registration order.
    pub fn from_problem(problem: &Problem) -> Self {
        let names: Vec<String> = problem.variables().map(|v| v.name.clone()).collect();
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        VariableMap { columns, names }
    }

    /// Column of a variable.
    pub fn get(&self, name: &str) -> Result<usize> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UndefinedVariable(name.to_string()))
    }

    /// Variable name of a column.
    pub fn name(&self, col: usize) -> Option<&str> {
        self.names.get(col).map(String::as_str)
    }

    /// Total number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Stuffed problem ready for the conic solver.
#[derive(Debug)]
pub struct StuffedProblem {
    /// Quadratic cost matrix P (n x n, upper triangle).
    pub p: CscMatrix<f64>,
    /// Linear cost vector q (n).
    pub q: DVector<f64>,
    /// Constraint matrix A (m x n).
    pub a: CscMatrix<f64>,
    /// Constraint vector b (m).
    pub b: DVector<f64>,
    /// Cone dimensions.
    pub cone_dims: ConeDims,
    /// Variable mapping for solution recovery.
    pub var_map: VariableMap,
}

/// Build the conic form of a continuous model.
///
/// Maximization is stuffed as minimization of the negated objective.
/// Integer or binary variables, quadratic constraints and objectives above
/// degree 2 are rejected.
pub fn stuff_problem(problem: &Problem) -> Result<StuffedProblem> {
    if let Some(v) = problem.variables().find(|v| v.kind != VarType::Continuous) {
        return Err(ModelError::Unsupported(format!(
            "{} variable {} needs a MILP solver; write the model with write_lp",
            v.kind, v.name
        )));
    }
    let var_map = VariableMap::from_problem(problem);

    let objective = if problem.direction().is_minimize() {
        problem.objective().clone()
    } else {
        problem.objective().negate()
    };
    let (p, q) = stuff_objective(&objective, &var_map)?;
    let (a, b, cone_dims) = stuff_constraints(problem, &var_map)?;

    Ok(StuffedProblem {
        p,
        q,
        a,
        b,
        cone_dims,
        var_map,
    })
}

/// Stuff the objective into P and q.
fn stuff_objective(
    objective: &Polynomial,
    var_map: &VariableMap,
) -> Result<(CscMatrix<f64>, DVector<f64>)> {
    let n = var_map.len();
    if objective.degree() > 2 {
        return Err(ModelError::DegreeTooHigh {
            location: "objective".into(),
            degree: objective.degree(),
        });
    }

    let mut q = DVector::zeros(n);
    for (name, k) in objective.linear_terms() {
        q[var_map.get(name)?] += k;
    }

    let mut p_rows = Vec::new();
    let mut p_cols = Vec::new();
    let mut p_vals = Vec::new();
    for (a, b, k) in objective.quadratic_terms() {
        let (i, j) = (var_map.get(a)?, var_map.get(b)?);
        // Clarabel reads (1/2) x'Px from the upper triangle: a square term
        // k x^2 is P_ii = 2k, a cross term k x y is P_ij = k.
        let val = if i == j { 2.0 * k } else { k };
        p_rows.push(i.min(j));
        p_cols.push(i.max(j));
        p_vals.push(val);
    }

    Ok((csc_from_triplets(n, n, p_rows, p_cols, p_vals), q))
}

/// Stuff constraints and variable bounds into A, b and cone dims.
fn stuff_constraints(
    problem: &Problem,
    var_map: &VariableMap,
) -> Result<(CscMatrix<f64>, DVector<f64>, ConeDims)> {
    let n = var_map.len();

    // (row coefficients, rhs), already oriented as a x <= b for nonneg rows
    let mut zeros: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();
    let mut nonnegs: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();

    for (id, c) in problem.constraints() {
        if c.degree() > 1 {
            return Err(ModelError::Unsupported(format!(
                "constraint {} is quadratic; the continuous backend accepts linear constraints only",
                id
            )));
        }
        let row = c
            .lhs
            .linear_terms()
            .map(|(name, k)| Ok((var_map.get(name)?, k)))
            .collect::<Result<Vec<_>>>()?;
        match c.op {
            Comparison::Eq => zeros.push((row, c.rhs)),
            Comparison::Le | Comparison::Lt => nonnegs.push((row, c.rhs)),
            Comparison::Ge | Comparison::Gt => {
                let flipped = row.into_iter().map(|(j, k)| (j, -k)).collect();
                nonnegs.push((flipped, -c.rhs));
            }
        }
    }

    for def in problem.variables() {
        let col = var_map.get(&def.name)?;
        if let Some(lo) = def.lower {
            nonnegs.push((vec![(col, -1.0)], -lo));
        }
        if let Some(hi) = def.upper {
            nonnegs.push((vec![(col, 1.0)], hi));
        }
    }

    let cone_dims = ConeDims {
        zero: zeros.len(),
        nonneg: nonnegs.len(),
    };
    let m = cone_dims.total();

    let mut a_rows = Vec::new();
    let mut a_cols = Vec::new();
    let mut a_vals = Vec::new();
    let mut b = DVector::zeros(m);
    for (i, (row, rhs)) in zeros.into_iter().chain(nonnegs).enumerate() {
        for (j, k) in row {
            a_rows.push(i);
            a_cols.push(j);
            a_vals.push(k);
        }
        b[i] = rhs;
    }

    Ok((csc_from_triplets(m, n, a_rows, a_cols, a_vals), b, cone_dims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, VariableOptions};
    use crate::sparse::csc_triplets;

    #[test]
    fn test_stuff_rows_and_cones() {
        let mut p = Problem::minimize();
        let x = p.new_variable("x", &VariableOptions::new().nonneg()).unwrap();
        let y = p.new_variable("y", &VariableOptions::new()).unwrap();
        p.increment_objective(&x.add(&y.scale(2.0)));
        p.add_constraint(Constraint::geq(&x.add(&y), &Polynomial::constant(1.0)));
        p.add_constraint(Constraint::eq(&y, &Polynomial::constant(0.5)));

        let s = stuff_problem(&p).unwrap();
        assert_eq!(s.cone_dims, ConeDims { zero: 1, nonneg: 2 });
        assert_eq!(s.q.as_slice(), &[1.0, 2.0]);
        assert_eq!(s.b.as_slice(), &[0.5, -1.0, 0.0]);
        assert_eq!(
            csc_triplets(&s.a),
            vec![(1, 0, -1.0), (2, 0, -1.0), (0, 1, 1.0), (1, 1, -1.0)]
        );
    }

    #[test]
    fn test_quadratic_objective() {
        let mut p = Problem::maximize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();
        let y = p.new_variable("y", &VariableOptions::new()).unwrap();
        // maximize -(x^2 + 3xy) is minimize x^2 + 3xy
        p.decrement_objective(&x.multiply(&x).add(&x.multiply(&y).scale(3.0)));
        let s = stuff_problem(&p).unwrap();
        assert_eq!(csc_triplets(&s.p), vec![(0, 0, 2.0), (0, 1, 3.0)]);
    }

    #[test]
    fn test_rejects_integer_and_quadratic_rows() {
        let mut p = Problem::minimize();
        p.new_variable("n", &VariableOptions::new().integer()).unwrap();
        assert!(matches!(stuff_problem(&p), Err(ModelError::Unsupported(_))));

        let mut q = Problem::minimize();
        let x = q.new_variable("x", &VariableOptions::new()).unwrap();
        q.add_constraint(Constraint::leq(&x.multiply(&x), &Polynomial::constant(1.0)));
        assert!(matches!(stuff_problem(&q), Err(ModelError::Unsupported(_))));
    }
}
