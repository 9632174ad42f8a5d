//! The linearization transformer.
//!
//! Linearization composes bottom-up: operands are transformed first, then the
//! node itself is encoded against the resulting polynomials. Every encoding
//! introduces auxiliary variables plus linear constraints and returns a
//! polynomial standing in for the node.
//!
//! | Construct | Auxiliaries | Constraints |
//! |---|---|---|
//! | `abs(e)` | 1 continuous | 2 |
//! | `max`/`min` of n | 1 continuous | n |
//! | `and`/`or` of n | 1 binary | n + 1 |
//! | `if c then t else f` | 1 continuous, 1 binary | 5 |
//! | piecewise, k segments | 1 continuous, k binary | 1 + 4k |

use std::sync::Arc;

use tracing::debug;

use super::big_m;
use super::config::LinearizeConfig;
use super::fingerprint::{aux_name, Construct};
use crate::error::{ModelError, Result};
use crate::expr::eval::{resolve_matches, resolve_pattern};
use crate::expr::{evaluate, expand, Expr, Piecewise, Scope};
use crate::model::{Comparison, Constraint, VariableOptions};
use crate::poly::Polynomial;
use crate::problem::Problem;

/// Rewrites non-linear constructs into auxiliaries and linear constraints.
#[derive(Debug, Clone, Default)]
pub struct Linearizer {
    config: LinearizeConfig,
}

impl Linearizer {
    /// Create a linearizer with the given settings.
    pub fn new(config: LinearizeConfig) -> Self {
        Linearizer { config }
    }

    /// The settings in use.
    pub fn config(&self) -> &LinearizeConfig {
        &self.config
    }

    /// Linearize `expr` against a copy of `problem`.
    ///
    /// Returns the extended problem and the polynomial standing for `expr`.
    /// The input problem is never touched. Builders that extend a model in
    /// place use [`Linearizer::transform`], which does not copy.
    pub fn apply(
        &self,
        problem: &Problem,
        expr: &Expr,
        scope: &Scope<'_>,
    ) -> Result<(Problem, Polynomial)> {
        let mut staged = problem.clone();
        let poly = self.transform(&mut staged, expr, scope)?;
        Ok((staged, poly))
    }

    /// Linearize `expr` into `problem`.
    ///
    /// On error everything the failed rewrite appended is rolled back. An
    /// expression with no non-linear construct is evaluated directly and
    /// leaves the problem untouched.
    pub fn transform(
        &self,
        problem: &mut Problem,
        expr: &Expr,
        scope: &Scope<'_>,
    ) -> Result<Polynomial> {
        if !expr.contains_non_linear() {
            return evaluate(expr, problem, scope);
        }
        problem.atomically(|staged| {
            LinearizeContext::new(staged, &self.config).linearize(expr, scope)
        })
    }
}

/// Working state for one linearization: the staged problem and settings.
struct LinearizeContext<'a> {
    problem: &'a mut Problem,
    config: &'a LinearizeConfig,
}

impl<'a> LinearizeContext<'a> {
    fn new(problem: &'a mut Problem, config: &'a LinearizeConfig) -> Self {
        LinearizeContext { problem, config }
    }

    fn linearize(&mut self, expr: &Expr, scope: &Scope<'_>) -> Result<Polynomial> {
        match expr {
            Expr::Const(_) | Expr::Poly(_) | Expr::Var(_) | Expr::Param { .. } | Expr::Sym(_) => {
                evaluate(expr, self.problem, scope)
            }
            Expr::Sum { body, generators } => {
                let mut total = Polynomial::zero();
                for inner in expand(generators, scope)? {
                    let term = self
                        .linearize(body, &inner)
                        .map_err(|e| e.with_context(format!("{} in {}", inner.describe(), body)))?;
                    total = total.add(&term);
                }
                Ok(total)
            }
            Expr::Add(a, b) => Ok(self.linearize(a, scope)?.add(&self.linearize(b, scope)?)),
            Expr::Sub(a, b) => Ok(self.linearize(a, scope)?.subtract(&self.linearize(b, scope)?)),
            Expr::Mul(a, b) => Ok(self.linearize(a, scope)?.multiply(&self.linearize(b, scope)?)),
            Expr::Div(a, b) => self.linearize(a, scope)?.divide_by(&self.linearize(b, scope)?),
            Expr::Neg(a) => Ok(self.linearize(a, scope)?.negate()),

            Expr::Abs(a) => {
                let e = self.linearize(a, scope)?;
                self.linearize_abs(&e)
            }
            Expr::Max(args) => {
                let ops = self.operands("max", args, scope)?;
                self.linearize_extremum(Construct::Max, &ops)
            }
            Expr::Min(args) => {
                let ops = self.operands("min", args, scope)?;
                self.linearize_extremum(Construct::Min, &ops)
            }
            Expr::And(args) => {
                let ops = self.operands("and", args, scope)?;
                self.linearize_logic(Construct::And, &ops)
            }
            Expr::Or(args) => {
                let ops = self.operands("or", args, scope)?;
                self.linearize_logic(Construct::Or, &ops)
            }
            Expr::IfThenElse {
                cond,
                then,
                otherwise,
            } => {
                let c = self.linearize(cond, scope)?;
                let t = self.linearize(then, scope)?;
                let f = self.linearize(otherwise, scope)?;
                self.linearize_if_then_else(&c, &t, &f)
            }
            Expr::PiecewiseLinear(pw) => {
                check_piecewise(pw)?;
                let e = self.linearize(&pw.arg, scope)?;
                self.linearize_piecewise(&e, pw)
            }
        }
    }

    /// Operands of a variadic construct.
    ///
    /// A lone wildcard reference ranges over its matches, which must not be
    /// empty. Otherwise at least two explicit operands are required.
    fn operands(
        &mut self,
        construct: &'static str,
        args: &[Arc<Expr>],
        scope: &Scope<'_>,
    ) -> Result<Vec<Polynomial>> {
        if let [only] = args {
            if let Expr::Var(v) = only.as_ref() {
                if v.is_pattern() {
                    let matches = resolve_matches(v, self.problem, scope)?;
                    if matches.is_empty() {
                        return Err(ModelError::EmptyPattern {
                            construct,
                            family: v.family.clone(),
                            pattern: resolve_pattern(&v.indices, scope)?.to_string(),
                        });
                    }
                    return Ok(matches);
                }
            }
        }
        if args.len() < 2 {
            return Err(ModelError::TooFewOperands {
                construct,
                expected: 2,
                got: args.len(),
            });
        }
        args.iter().map(|a| self.linearize(a, scope)).collect()
    }

    // ========================================================================
    // Auxiliary bookkeeping
    // ========================================================================

    fn name(&self, construct: Construct, operands: &[&Polynomial], params: &[f64]) -> String {
        aux_name(construct, &self.config.context, operands, params)
    }

    fn reuse(&self, name: &str) -> Option<Polynomial> {
        let hit = self.problem.auxiliary(name).cloned();
        if hit.is_some() {
            debug!(aux = name, "reusing memoized auxiliary");
        }
        hit
    }

    fn add_row(&mut self, lhs: &Polynomial, op: Comparison, rhs: &Polynomial, label: &str) {
        self.problem
            .add_constraint(Constraint::new(lhs, op, rhs).with_label(label));
    }

    fn finish(&mut self, construct: Construct, name: &str, result: Polynomial, rows: usize) -> Polynomial {
        debug!(construct = construct.name(), aux = name, constraints = rows, "linearized");
        self.problem.remember_auxiliary(name, result.clone());
        result
    }

    // ========================================================================
    // Encodings
    // ========================================================================

    fn linearize_abs(&mut self, e: &Polynomial) -> Result<Polynomial> {
        let name = self.name(Construct::Abs, &[e], &[]);
        if let Some(hit) = self.reuse(&name) {
            return Ok(hit);
        }
        let a = self.problem.add_auxiliary(&name, &VariableOptions::new())?;

        // a >= e, a >= -e
        self.add_row(&a, Comparison::Ge, e, &name);
        self.add_row(&a, Comparison::Ge, &e.negate(), &name);

        Ok(self.finish(Construct::Abs, &name, a, 2))
    }

    fn linearize_extremum(&mut self, construct: Construct, ops: &[Polynomial]) -> Result<Polynomial> {
        let refs: Vec<&Polynomial> = ops.iter().collect();
        let name = self.name(construct, &refs, &[]);
        if let Some(hit) = self.reuse(&name) {
            return Ok(hit);
        }
        let a = self.problem.add_auxiliary(&name, &VariableOptions::new())?;

        // max: a >= e_i; min: a <= e_i
        let op = if construct == Construct::Max {
            Comparison::Ge
        } else {
            Comparison::Le
        };
        for e in ops {
            self.add_row(&a, op, e, &name);
        }

        Ok(self.finish(construct, &name, a, ops.len()))
    }

    fn linearize_logic(&mut self, construct: Construct, ops: &[Polynomial]) -> Result<Polynomial> {
        let refs: Vec<&Polynomial> = ops.iter().collect();
        let name = self.name(construct, &refs, &[]);
        if let Some(hit) = self.reuse(&name) {
            return Ok(hit);
        }
        let a = self
            .problem
            .add_auxiliary(&name, &VariableOptions::new().binary())?;
        let total = ops.iter().fold(Polynomial::zero(), |acc, e| acc.add(e));

        if construct == Construct::And {
            // a <= e_i, a >= sum(e) - (n - 1)
            for e in ops {
                self.add_row(&a, Comparison::Le, e, &name);
            }
            let floor = total.subtract(&Polynomial::constant(ops.len() as f64 - 1.0));
            self.add_row(&a, Comparison::Ge, &floor, &name);
        } else {
            // a >= e_i, a <= sum(e)
            for e in ops {
                self.add_row(&a, Comparison::Ge, e, &name);
            }
            self.add_row(&a, Comparison::Le, &total, &name);
        }

        Ok(self.finish(construct, &name, a, ops.len() + 1))
    }

    fn linearize_if_then_else(
        &mut self,
        c: &Polynomial,
        t: &Polynomial,
        f: &Polynomial,
    ) -> Result<Polynomial> {
        let name = self.name(Construct::IfThenElse, &[c, t, f], &[]);
        if let Some(hit) = self.reuse(&name) {
            return Ok(hit);
        }
        let m = big_m::for_difference(self.config, self.problem, &t.subtract(f));
        let a = self.problem.add_auxiliary(&name, &VariableOptions::new())?;
        let b = self
            .problem
            .add_auxiliary(&format!("{}_c", name), &VariableOptions::new().binary())?;

        let off = Polynomial::constant(1.0).subtract(&b).scale(m);
        let on = b.scale(m);

        // b mirrors the condition; a = t when b = 1, a = f when b = 0
        self.add_row(&b, Comparison::Eq, c, &name);
        self.add_row(&a, Comparison::Le, &t.add(&off), &name);
        self.add_row(&a, Comparison::Ge, &t.subtract(&off), &name);
        self.add_row(&a, Comparison::Le, &f.add(&on), &name);
        self.add_row(&a, Comparison::Ge, &f.subtract(&on), &name);

        Ok(self.finish(Construct::IfThenElse, &name, a, 5))
    }

    fn linearize_piecewise(&mut self, e: &Polynomial, pw: &Piecewise) -> Result<Polynomial> {
        let params: Vec<f64> = pw
            .breakpoints
            .iter()
            .chain(&pw.slopes)
            .chain(&pw.intercepts)
            .copied()
            .collect();
        let name = self.name(Construct::Piecewise, &[e], &params);
        if let Some(hit) = self.reuse(&name) {
            return Ok(hit);
        }
        let m = big_m::for_piecewise(self.config, self.problem, e, pw);
        let v = self.problem.add_auxiliary(&name, &VariableOptions::new())?;
        let selectors = (0..pw.segments())
            .map(|i| {
                self.problem
                    .add_auxiliary(&format!("{}_s{}", name, i), &VariableOptions::new().binary())
            })
            .collect::<Result<Vec<_>>>()?;

        // exactly one segment is active
        let chosen = selectors.iter().fold(Polynomial::zero(), |acc, z| acc.add(z));
        self.add_row(&chosen, Comparison::Eq, &Polynomial::constant(1.0), &name);

        for (i, z) in selectors.iter().enumerate() {
            let segment = e
                .scale(pw.slopes[i])
                .add(&Polynomial::constant(pw.intercepts[i]));
            let slack = Polynomial::constant(1.0).subtract(z).scale(m);
            let lo = Polynomial::constant(pw.breakpoints[i]);
            let hi = Polynomial::constant(pw.breakpoints[i + 1]);

            self.add_row(&v, Comparison::Le, &segment.add(&slack), &name);
            self.add_row(&v, Comparison::Ge, &segment.subtract(&slack), &name);
            self.add_row(e, Comparison::Ge, &lo.subtract(&slack), &name);
            self.add_row(e, Comparison::Le, &hi.add(&slack), &name);
        }

        Ok(self.finish(Construct::Piecewise, &name, v, 1 + 4 * pw.segments()))
    }
}

/// Validate the shape of a piecewise-linear function.
fn check_piecewise(pw: &Piecewise) -> Result<()> {
    let k = pw.slopes.len();
    if k == 0 {
        return Err(ModelError::PiecewiseShape("at least one segment is required".into()));
    }
    if pw.intercepts.len() != k {
        return Err(ModelError::PiecewiseShape(format!(
            "{} slopes but {} intercepts",
            k,
            pw.intercepts.len()
        )));
    }
    if pw.breakpoints.len() != k + 1 {
        return Err(ModelError::PiecewiseShape(format!(
            "{} segments need {} breakpoints, got {}",
            k,
            k + 1,
            pw.breakpoints.len()
        )));
    }
    let finite = pw
        .breakpoints
        .iter()
        .chain(&pw.slopes)
        .chain(&pw.intercepts)
        .all(|v| v.is_finite());
    if !finite {
        return Err(ModelError::PiecewiseShape("values must be finite".into()));
    }
    if pw.breakpoints.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ModelError::PiecewiseShape(
            "breakpoints must be strictly ascending".into(),
        ));
    }
    Ok(())
}
