//! Classification of expressions as constant, variable, linear or non-linear.
//!
//! Rules, in priority order:
//! - literals, symbols and parameters are constant
//! - a bare variable reference is a variable; a wildcard reference is a sum
//!   and therefore linear
//! - abs, max, min, and, or, if-then-else and piecewise-linear are always
//!   non-linear, whatever their operands
//! - a product of two non-constant operands is non-linear (quadratic)
//! - a quotient is linear only when the divisor is constant
//! - sums of linear operands are linear

use std::collections::BTreeSet;

use crate::expr::Expr;

/// Classification of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// No free variables.
    Constant,
    /// A single variable reference.
    Variable,
    /// A linear combination of variables.
    Linear,
    /// Needs the linearizer (or is quadratic).
    NonLinear,
}

impl Classification {
    /// Constant, variable or linear.
    pub fn is_linear(self) -> bool {
        !matches!(self, Classification::NonLinear)
    }

    /// Check if this is a constant.
    pub fn is_constant(self) -> bool {
        matches!(self, Classification::Constant)
    }

    /// Collapse `Variable` into `Linear` for composite results.
    fn widen(self) -> Self {
        match self {
            Classification::Variable => Classification::Linear,
            other => other,
        }
    }
}

/// Combine classifications for addition and subtraction.
pub fn add_classification(a: Classification, b: Classification) -> Classification {
    use Classification::*;
    match (a, b) {
        (NonLinear, _) | (_, NonLinear) => NonLinear,
        (Constant, Constant) => Constant,
        _ => Linear,
    }
}

/// Combine classifications for multiplication.
pub fn mul_classification(a: Classification, b: Classification) -> Classification {
    use Classification::*;
    match (a, b) {
        (NonLinear, _) | (_, NonLinear) => NonLinear,
        (Constant, Constant) => Constant,
        (Constant, x) | (x, Constant) => x.widen(),
        // Both operands carry free variables: quadratic
        _ => NonLinear,
    }
}

/// Result of analyzing an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Classification of the root node.
    pub classification: Classification,
    /// Family names and embedded variable names the expression references.
    pub referenced_variables: BTreeSet<String>,
}

/// Analyze an expression.
pub fn analyze(expr: &Expr) -> Analysis {
    Analysis {
        classification: expr.classification(),
        referenced_variables: expr.referenced_variables(),
    }
}

impl Expr {
    /// Get the classification of this expression.
    pub fn classification(&self) -> Classification {
        match self {
            // Leaves
            Expr::Const(_) | Expr::Sym(_) | Expr::Param { .. } => Classification::Constant,
            Expr::Poly(p) => {
                if p.is_constant() {
                    Classification::Constant
                } else if p.as_variable().is_some() {
                    Classification::Variable
                } else if p.degree() <= 1 {
                    Classification::Linear
                } else {
                    Classification::NonLinear
                }
            }
            Expr::Var(v) => {
                if v.is_pattern() {
                    Classification::Linear
                } else {
                    Classification::Variable
                }
            }

            // Summation never introduces non-linearity by itself
            Expr::Sum { body, .. } => {
                if body.classification().is_constant() {
                    Classification::Constant
                } else {
                    Classification::Linear
                }
            }

            // Arithmetic
            Expr::Add(a, b) | Expr::Sub(a, b) => {
                add_classification(a.classification(), b.classification())
            }
            Expr::Neg(a) => a.classification().widen(),
            Expr::Mul(a, b) => mul_classification(a.classification(), b.classification()),
            Expr::Div(a, b) => {
                if b.classification().is_constant() {
                    a.classification().widen()
                } else {
                    Classification::NonLinear
                }
            }

            // Always need auxiliary structure
            Expr::Abs(_)
            | Expr::Max(_)
            | Expr::Min(_)
            | Expr::And(_)
            | Expr::Or(_)
            | Expr::IfThenElse { .. }
            | Expr::PiecewiseLinear(_) => Classification::NonLinear,
        }
    }

    /// Check if this expression is linear (constant, variable or linear).
    pub fn is_linear(&self) -> bool {
        self.classification().is_linear()
    }

    /// Check whether any reachable node is non-linear.
    ///
    /// Expressions for which this is false bypass the linearizer and are
    /// evaluated directly.
    pub fn contains_non_linear(&self) -> bool {
        if !self.classification().is_linear() {
            return true;
        }
        match self {
            Expr::Const(_) | Expr::Poly(_) | Expr::Sym(_) | Expr::Var(_) | Expr::Param { .. } => {
                false
            }
            Expr::Sum { body, .. } | Expr::Neg(body) => body.contains_non_linear(),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.contains_non_linear() || b.contains_non_linear()
            }
            // Classified non-linear above
            Expr::Abs(_)
            | Expr::Max(_)
            | Expr::Min(_)
            | Expr::And(_)
            | Expr::Or(_)
            | Expr::IfThenElse { .. }
            | Expr::PiecewiseLinear(_) => true,
        }
    }
}
