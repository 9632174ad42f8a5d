//! Constructs that need linearization.
//!
//! Each function only builds the node. Operand-count and shape checks are
//! made when the linearizer compiles the node, so every failure surfaces
//! with the bindings in scope.

use std::sync::Arc;

use crate::expr::{Expr, Piecewise};

// ============================================================================
// Element-wise atoms
// ============================================================================

/// Absolute value: |x|.
///
/// Encoding: one continuous auxiliary `a` with `a >= x` and `a >= -x`.
pub fn abs(x: &Expr) -> Expr {
    Expr::Abs(Arc::new(x.clone()))
}

// ============================================================================
// Maximum and minimum
// ============================================================================

/// Maximum of expressions.
///
/// A single wildcard reference such as `max(vec![var("x", ["_"])])` ranges
/// over every matched variable.
pub fn max(exprs: Vec<Expr>) -> Expr {
    Expr::Max(exprs.into_iter().map(Arc::new).collect())
}

/// Maximum of two expressions.
pub fn max2(a: &Expr, b: &Expr) -> Expr {
    max(vec![a.clone(), b.clone()])
}

/// Minimum of expressions.
pub fn min(exprs: Vec<Expr>) -> Expr {
    Expr::Min(exprs.into_iter().map(Arc::new).collect())
}

/// Minimum of two expressions.
pub fn min2(a: &Expr, b: &Expr) -> Expr {
    min(vec![a.clone(), b.clone()])
}

// ============================================================================
// Logic over 0/1 expressions
// ============================================================================

/// Logical AND. The result is a binary auxiliary.
pub fn and(exprs: Vec<Expr>) -> Expr {
    Expr::And(exprs.into_iter().map(Arc::new).collect())
}

/// Logical OR. The result is a binary auxiliary.
pub fn or(exprs: Vec<Expr>) -> Expr {
    Expr::Or(exprs.into_iter().map(Arc::new).collect())
}

/// `if cond then a else b`, where `cond` takes values in {0, 1}.
pub fn if_then_else(cond: &Expr, then: &Expr, otherwise: &Expr) -> Expr {
    Expr::IfThenElse {
        cond: Arc::new(cond.clone()),
        then: Arc::new(then.clone()),
        otherwise: Arc::new(otherwise.clone()),
    }
}

// ============================================================================
// Piecewise-linear functions
// ============================================================================

/// Piecewise-linear function of `x`.
///
/// Segment `i` covers `[breakpoints[i], breakpoints[i + 1]]` and has value
/// `slopes[i] * x + intercepts[i]` there.
///
/// ```
/// use milpc::prelude::*;
///
/// // 2x on [0, 10], then x + 10 on [10, 20]
/// let cost = piecewise(&var("x", [1]), vec![0.0, 10.0, 20.0], vec![2.0, 1.0], vec![0.0, 10.0]);
/// ```
pub fn piecewise(x: &Expr, breakpoints: Vec<f64>, slopes: Vec<f64>, intercepts: Vec<f64>) -> Expr {
    Expr::PiecewiseLinear(Piecewise {
        arg: Arc::new(x.clone()),
        breakpoints,
        slopes,
        intercepts,
    })
}
