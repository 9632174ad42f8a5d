//! Leaf constructors, generator sums and operator overloading.
//!
//! Nothing built here needs linearization on its own; products of two
//! variable expressions are quadratic and are classified by the analyzer.

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::expr::{Expr, Generator, IndexExpr, VarRef};
use crate::poly::Polynomial;

// ============================================================================
// Leaves
// ============================================================================

/// A numeric literal.
pub fn constant(value: f64) -> Expr {
    Expr::Const(value)
}

/// A reference to family `family` at the given indices.
///
/// Strings are symbols (`"i"`) or the wildcard (`"_"`); integers are literals.
///
/// ```
/// use milpc::prelude::*;
///
/// let exact = var("x", [1, 2]);
/// let bound = var("x", ["i", "j"]);
/// let row_sum = var("x", [IndexExpr::Lit(1), IndexExpr::Wildcard]);
/// ```
pub fn var<I, T>(family: impl Into<String>, indices: I) -> Expr
where
    I: IntoIterator<Item = T>,
    T: Into<IndexExpr>,
{
    Expr::Var(VarRef {
        family: family.into(),
        indices: indices.into_iter().map(Into::into).collect(),
    })
}

/// A reference to a scalar (zero-arity) family.
pub fn scalar(family: impl Into<String>) -> Expr {
    Expr::Var(VarRef {
        family: family.into(),
        indices: Vec::new(),
    })
}

/// A parameter from the data context.
pub fn param<I, T>(name: impl Into<String>, indices: I) -> Expr
where
    I: IntoIterator<Item = T>,
    T: Into<IndexExpr>,
{
    Expr::Param {
        name: name.into(),
        indices: indices.into_iter().map(Into::into).collect(),
    }
}

/// A bare symbol used as a number.
pub fn sym(name: impl Into<String>) -> Expr {
    Expr::Sym(name.into())
}

/// Embed a polynomial the caller already holds.
pub fn poly(p: &Polynomial) -> Expr {
    Expr::Poly(p.clone())
}

/// Sum of `body` over the Cartesian product of `generators`.
pub fn sum_over(body: impl Into<Expr>, generators: Vec<Generator>) -> Expr {
    Expr::Sum {
        body: Arc::new(body.into()),
        generators,
    }
}

// ============================================================================
// Operator overloading for Expr
// ============================================================================

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Arc::new(self))
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Arc::new(self.clone()))
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Arc::new(self), Arc::new(rhs))
            }
        }

        impl $trait for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                Expr::$variant(Arc::new(self.clone()), Arc::new(rhs.clone()))
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                Expr::$variant(Arc::new(self), Arc::new(rhs.clone()))
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Arc::new(self.clone()), Arc::new(rhs))
            }
        }

        impl $trait<f64> for Expr {
            type Output = Expr;

            fn $method(self, rhs: f64) -> Expr {
                Expr::$variant(Arc::new(self), Arc::new(Expr::Const(rhs)))
            }
        }

        impl $trait<f64> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: f64) -> Expr {
                Expr::$variant(Arc::new(self.clone()), Arc::new(Expr::Const(rhs)))
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Arc::new(Expr::Const(self)), Arc::new(rhs))
            }
        }

        impl $trait<&Expr> for f64 {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                Expr::$variant(Arc::new(Expr::Const(self)), Arc::new(rhs.clone()))
            }
        }
    };
}

binary_op!(Add, add, Add);
binary_op!(Sub, sub, Sub);
binary_op!(Mul, mul, Mul);
binary_op!(Div, div, Div);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_build_nodes() {
        let x = var("x", [1]);
        let y = var("y", [1]);
        assert!(matches!(&x + &y, Expr::Add(_, _)));
        assert!(matches!(2.0 * &x, Expr::Mul(_, _)));
        assert!(matches!(x.clone() / 2.0, Expr::Div(_, _)));
        assert!(matches!(-x, Expr::Neg(_)));
    }

    #[test]
    fn test_var_indices() {
        match var("x", ["i", "_"]) {
            Expr::Var(v) => {
                assert_eq!(v.indices[0], IndexExpr::Sym("i".into()));
                assert_eq!(v.indices[1], IndexExpr::Wildcard);
            }
            _ => unreachable!(),
        }
        match scalar("z") {
            Expr::Var(v) => assert!(v.indices.is_empty()),
            _ => unreachable!(),
        }
    }
}
