//! Direct evaluation of expressions into polynomials.
//!
//! Expressions without non-linear constructs are turned into a `Polynomial`
//! by structural recursion. The resolution helpers here (index patterns,
//! variable references, parameters) are shared with the linearizer.

use super::expression::{Expr, IndexExpr, VarRef};
use super::generator::expand;
use super::scope::Scope;
use crate::error::{ModelError, Result};
use crate::model::{Pattern, PatternComponent};
use crate::poly::Polynomial;
use crate::problem::Problem;

/// Resolve one index expression under the bindings.
///
/// Unbound symbols become opaque components that never match.
pub fn resolve_index(index: &IndexExpr, scope: &Scope<'_>) -> Result<PatternComponent> {
    match index {
        IndexExpr::Lit(v) => Ok(PatternComponent::Value(*v)),
        IndexExpr::Wildcard => Ok(PatternComponent::Wildcard),
        IndexExpr::Sym(s) => Ok(match scope.lookup(s) {
            Some(v) => PatternComponent::Value(v),
            None => PatternComponent::Opaque(s.clone()),
        }),
        IndexExpr::Computed(e) => {
            let v = eval_constant(e, scope)?;
            // i64::MAX is not exactly representable; 2^63 would saturate
            if v.fract() != 0.0 || !v.is_finite() || v < i64::MIN as f64 || v >= i64::MAX as f64 {
                return Err(ModelError::NonIntegralIndex(e.to_string()));
            }
            Ok(PatternComponent::Value(v as i64))
        }
    }
}

/// Resolve a list of index expressions into a pattern.
pub fn resolve_pattern(indices: &[IndexExpr], scope: &Scope<'_>) -> Result<Pattern> {
    indices
        .iter()
        .map(|i| resolve_index(i, scope))
        .collect::<Result<Vec<_>>>()
        .map(Pattern)
}

/// Resolve a variable reference: an exact lookup, or the sum over a pattern.
pub fn resolve_var(var: &VarRef, problem: &Problem, scope: &Scope<'_>) -> Result<Polynomial> {
    let family = problem.get_family(&var.family)?;
    let pattern = resolve_pattern(&var.indices, scope)?;
    if pattern.has_wildcard() {
        return Ok(family.sum_matching(&pattern));
    }
    match pattern.as_index() {
        Some(index) => family.lookup(&index).cloned(),
        None => Err(ModelError::IndexNotFound {
            family: var.family.clone(),
            index: pattern.to_string(),
        }),
    }
}

/// Every variable a pattern reference selects, in index order.
///
/// Used by constructs that need the individual operands (`max(x(_))`).
pub fn resolve_matches(
    var: &VarRef,
    problem: &Problem,
    scope: &Scope<'_>,
) -> Result<Vec<Polynomial>> {
    let family = problem.get_family(&var.family)?;
    let pattern = resolve_pattern(&var.indices, scope)?;
    Ok(family
        .matching(&pattern)
        .map(|(_, p)| p.clone())
        .collect())
}

/// Resolve a bare symbol used as a number.
fn resolve_symbol(symbol: &str, scope: &Scope<'_>) -> Result<f64> {
    if let Some(v) = scope.lookup(symbol) {
        return Ok(v as f64);
    }
    scope
        .data()
        .scalar(symbol)
        .ok_or_else(|| ModelError::UnboundSymbol(symbol.to_string()))
}

/// Resolve a parameter reference against the data context.
pub fn resolve_param(name: &str, indices: &[IndexExpr], scope: &Scope<'_>) -> Result<f64> {
    let pattern = resolve_pattern(indices, scope)?;
    let index = pattern.as_index().ok_or_else(|| {
        ModelError::UnknownParameter(format!("{}{}", name, pattern))
    })?;
    scope.data().param(name, &index)
}

/// Evaluate an expression that must reduce to a number (domain bounds,
/// computed indices). Variables are not allowed here.
pub fn eval_constant(expr: &Expr, scope: &Scope<'_>) -> Result<f64> {
    match expr {
        Expr::Const(v) => Ok(*v),
        Expr::Sym(s) => resolve_symbol(s, scope),
        Expr::Param { name, indices } => resolve_param(name, indices, scope),
        Expr::Poly(p) => p
            .constant_value()
            .ok_or_else(|| not_constant(expr)),
        Expr::Add(a, b) => Ok(eval_constant(a, scope)? + eval_constant(b, scope)?),
        Expr::Sub(a, b) => Ok(eval_constant(a, scope)? - eval_constant(b, scope)?),
        Expr::Mul(a, b) => Ok(eval_constant(a, scope)? * eval_constant(b, scope)?),
        Expr::Div(a, b) => {
            let d = eval_constant(b, scope)?;
            if d == 0.0 {
                return Err(ModelError::DivisionByZero);
            }
            Ok(eval_constant(a, scope)? / d)
        }
        Expr::Neg(a) => Ok(-eval_constant(a, scope)?),
        Expr::Var(_)
        | Expr::Sum { .. }
        | Expr::Abs(_)
        | Expr::Max(_)
        | Expr::Min(_)
        | Expr::And(_)
        | Expr::Or(_)
        | Expr::IfThenElse { .. }
        | Expr::PiecewiseLinear(_) => Err(not_constant(expr)),
    }
}

fn not_constant(expr: &Expr) -> ModelError {
    ModelError::InvalidGenerator(format!("{} is not a constant expression", expr))
}

/// Evaluate an expression with no non-linear constructs into a polynomial.
///
/// Products of variables are kept as higher-degree terms. Abs, max, min,
/// and, or, if-then-else and piecewise-linear need auxiliary structure and
/// are rejected here; use the linearizer for those.
pub fn evaluate(expr: &Expr, problem: &Problem, scope: &Scope<'_>) -> Result<Polynomial> {
    match expr {
        Expr::Const(v) => Ok(Polynomial::constant(*v)),
        Expr::Poly(p) => Ok(p.clone()),
        Expr::Var(v) => resolve_var(v, problem, scope),
        Expr::Param { name, indices } => {
            Ok(Polynomial::constant(resolve_param(name, indices, scope)?))
        }
        Expr::Sym(s) => Ok(Polynomial::constant(resolve_symbol(s, scope)?)),
        Expr::Sum { body, generators } => {
            let mut total = Polynomial::zero();
            for inner in expand(generators, scope)? {
                let term = evaluate(body, problem, &inner)
                    .map_err(|e| e.with_context(format!("{} in {}", inner.describe(), body)))?;
                total = total.add(&term);
            }
            Ok(total)
        }
        Expr::Add(a, b) => Ok(evaluate(a, problem, scope)?.add(&evaluate(b, problem, scope)?)),
        Expr::Sub(a, b) => {
            Ok(evaluate(a, problem, scope)?.subtract(&evaluate(b, problem, scope)?))
        }
        Expr::Mul(a, b) => {
            Ok(evaluate(a, problem, scope)?.multiply(&evaluate(b, problem, scope)?))
        }
        Expr::Div(a, b) => evaluate(a, problem, scope)?.divide_by(&evaluate(b, problem, scope)?),
        Expr::Neg(a) => Ok(evaluate(a, problem, scope)?.negate()),
        Expr::Abs(_)
        | Expr::Max(_)
        | Expr::Min(_)
        | Expr::And(_)
        | Expr::Or(_)
        | Expr::IfThenElse { .. }
        | Expr::PiecewiseLinear(_) => Err(ModelError::Unsupported(format!(
            "{} requires linearization",
            expr
        ))),
    }
}
