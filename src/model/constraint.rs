//! Normalized constraints.
//!
//! A constraint stores its variable terms on the left and a plain number on
//! the right:
//! - `lhs <op> rhs` with `lhs` free of a constant term
//! - `rhs` is always an `f64`, never a polynomial

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::poly::Polynomial;

/// Comparison operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `==`
    Eq,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `>`
    Gt,
}

impl Comparison {
    /// Check `lhs <op> rhs` within a tolerance.
    ///
    /// Strict comparisons are checked as their non-strict counterparts,
    /// which is what LP solvers enforce.
    pub fn holds(self, lhs: f64, rhs: f64, tol: f64) -> bool {
        match self {
            Comparison::Eq => (lhs - rhs).abs() <= tol,
            Comparison::Le | Comparison::Lt => lhs <= rhs + tol,
            Comparison::Ge | Comparison::Gt => lhs >= rhs - tol,
        }
    }

    /// The operator with both sides swapped.
    pub fn flip(self) -> Self {
        match self {
            Comparison::Eq => Comparison::Eq,
            Comparison::Le => Comparison::Ge,
            Comparison::Ge => Comparison::Le,
            Comparison::Lt => Comparison::Gt,
            Comparison::Gt => Comparison::Lt,
        }
    }

    /// Operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Gt => ">",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Comparison {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "==" | "=" => Ok(Comparison::Eq),
            "<=" => Ok(Comparison::Le),
            ">=" => Ok(Comparison::Ge),
            "<" => Ok(Comparison::Lt),
            ">" => Ok(Comparison::Gt),
            other => Err(ModelError::Unsupported(format!("comparison operator {}", other))),
        }
    }
}

/// A constraint `lhs <op> rhs` in normalized form.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Variable terms only.
    pub lhs: Polynomial,
    /// Comparison operator.
    pub op: Comparison,
    /// Numeric right-hand side.
    pub rhs: f64,
    /// Optional human label.
    pub label: Option<String>,
}

impl Constraint {
    /// Normalize `lhs <op> rhs` so every variable term is on the left and
    /// the constant is on the right.
    pub fn new(lhs: &Polynomial, op: Comparison, rhs: &Polynomial) -> Self {
        let (constant, vars) = lhs.subtract(rhs).split_constant();
        Constraint {
            lhs: vars,
            op,
            rhs: -constant,
            label: None,
        }
    }

    /// `lhs == rhs`.
    pub fn eq(lhs: &Polynomial, rhs: &Polynomial) -> Self {
        Self::new(lhs, Comparison::Eq, rhs)
    }

    /// `lhs <= rhs`.
    pub fn leq(lhs: &Polynomial, rhs: &Polynomial) -> Self {
        Self::new(lhs, Comparison::Le, rhs)
    }

    /// `lhs >= rhs`.
    pub fn geq(lhs: &Polynomial, rhs: &Polynomial) -> Self {
        Self::new(lhs, Comparison::Ge, rhs)
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Degree of the left-hand side.
    pub fn degree(&self) -> usize {
        self.lhs.degree()
    }

    /// Check the constraint under an assignment.
    pub fn is_satisfied(&self, values: &HashMap<String, f64>, tol: f64) -> Result<bool> {
        let lhs = self.lhs.evaluate(values)?;
        Ok(self.op.holds(lhs, self.rhs, tol))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}
