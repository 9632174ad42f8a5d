//! CPLEX LP text output.
//!
//! The writer is the hand-off point to external MILP solvers. Everything it
//! emits is at most quadratic; a model with a higher-degree objective or
//! constraint is rejected before any text is produced.

use std::fmt::Write;

use crate::error::{ModelError, Result};
use crate::model::{Comparison, VarType};
use crate::poly::Polynomial;
use crate::problem::{Direction, Problem};

/// Render `problem` as CPLEX LP text.
///
/// Strict comparisons are written as their non-strict counterparts. Names
/// are the generated variable names and constraint identifiers.
pub fn write_lp(problem: &Problem) -> Result<String> {
    check_degrees(problem)?;

    // LP rows need at least one term; pad empty ones with a zero coefficient
    let filler = problem.variables().next().map(|v| v.name.as_str());

    let mut out = String::new();
    let sense = match problem.direction() {
        Direction::Minimize => "Minimize",
        Direction::Maximize => "Maximize",
    };
    writeln!(out, "{}", sense).map_err(fmt_err)?;
    let (constant, objective) = problem.objective().split_constant();
    writeln!(out, " obj: {}", render(&objective, true, filler)?).map_err(fmt_err)?;
    if constant != 0.0 {
        writeln!(out, "\\ objective constant {:+}", constant).map_err(fmt_err)?;
    }

    writeln!(out, "Subject To").map_err(fmt_err)?;
    for (id, c) in problem.constraints() {
        let op = match c.op {
            Comparison::Eq => "=",
            Comparison::Le | Comparison::Lt => "<=",
            Comparison::Ge | Comparison::Gt => ">=",
        };
        writeln!(out, " {}: {} {} {:+}", id, render(&c.lhs, false, filler)?, op, c.rhs)
            .map_err(fmt_err)?;
    }

    writeln!(out, "Bounds").map_err(fmt_err)?;
    for def in problem.variables().filter(|v| v.kind != VarType::Binary) {
        let line = match (def.lower, def.upper) {
            (None, None) => format!(" {} free", def.name),
            (Some(lo), None) => format!(" {} >= {}", def.name, lo),
            (None, Some(hi)) => format!(" -inf <= {} <= {}", def.name, hi),
            (Some(lo), Some(hi)) => format!(" {} <= {} <= {}", lo, def.name, hi),
        };
        writeln!(out, "{}", line).map_err(fmt_err)?;
    }

    let section = |kind: VarType| -> Vec<&str> {
        problem
            .variables()
            .filter(|v| v.kind == kind)
            .map(|v| v.name.as_str())
            .collect()
    };
    for (title, names) in [
        ("General", section(VarType::Integer)),
        ("Binary", section(VarType::Binary)),
    ] {
        if names.is_empty() {
            continue;
        }
        writeln!(out, "{}", title).map_err(fmt_err)?;
        for name in names {
            writeln!(out, " {}", name).map_err(fmt_err)?;
        }
    }
    writeln!(out, "End").map_err(fmt_err)?;
    Ok(out)
}

/// Reject anything above degree 2, naming the offending location.
pub fn check_degrees(problem: &Problem) -> Result<()> {
    let degree = problem.objective().degree();
    if degree > 2 {
        return Err(ModelError::DegreeTooHigh {
            location: "objective".into(),
            degree,
        });
    }
    for (id, c) in problem.constraints() {
        if c.degree() > 2 {
            return Err(ModelError::DegreeTooHigh {
                location: format!("constraint {}", id),
                degree: c.degree(),
            });
        }
    }
    Ok(())
}

/// Linear part, then a bracketed quadratic part. The objective's bracket
/// carries doubled coefficients and a trailing `/ 2`.
fn render(poly: &Polynomial, objective: bool, filler: Option<&str>) -> Result<String> {
    let mut parts: Vec<String> = poly
        .linear_terms()
        .map(|(name, k)| format!("{:+} {}", k, name))
        .collect();

    let scale = if objective { 2.0 } else { 1.0 };
    let quad: Vec<String> = poly
        .quadratic_terms()
        .map(|(a, b, k)| {
            if a == b {
                format!("{:+} {} ^ 2", k * scale, a)
            } else {
                format!("{:+} {} * {}", k * scale, a, b)
            }
        })
        .collect();
    if !quad.is_empty() {
        let tail = if objective { " ] / 2" } else { " ]" };
        parts.push(format!("+ [ {}{}", quad.join(" "), tail));
    }

    if parts.is_empty() {
        let name = filler.ok_or_else(|| {
            ModelError::Unsupported("cannot write an LP model without variables".into())
        })?;
        parts.push(format!("0 {}", name));
    }
    Ok(parts.join(" "))
}

fn fmt_err(e: std::fmt::Error) -> ModelError {
    ModelError::Unsupported(format!("failed to format LP text: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, VariableOptions};

    #[test]
    fn test_sections() {
        let mut p = Problem::maximize();
        let x = p.new_variable("x", &VariableOptions::new().bounds(0.0, 4.0)).unwrap();
        let n = p.new_variable("n", &VariableOptions::new().integer()).unwrap();
        let b = p.new_variable("b", &VariableOptions::new().binary()).unwrap();
        p.increment_objective(&x.scale(3.0).add(&n).add(&Polynomial::constant(7.0)));
        p.add_constraint(Constraint::leq(&x.add(&b), &Polynomial::constant(5.0)));
        p.add_constraint(Constraint::new(
            &n,
            Comparison::Gt,
            &Polynomial::constant(1.0),
        ));

        let lp = write_lp(&p).unwrap();
        assert!(lp.starts_with("Maximize\n obj: +3 v00000_x +1 v00001_n\n"));
        assert!(lp.contains("\\ objective constant +7"));
        assert!(lp.contains(" c00000: +1 v00000_x +1 v00002_b <= +5\n"));
        assert!(lp.contains(" c00001: +1 v00001_n >= +1\n"));
        assert!(lp.contains(" 0 <= v00000_x <= 4\n"));
        assert!(lp.contains(" v00001_n free\n"));
        assert!(lp.contains("General\n v00001_n\n"));
        assert!(lp.contains("Binary\n v00002_b\n"));
        assert!(lp.ends_with("End\n"));
    }

    #[test]
    fn test_quadratic_objective_is_halved() {
        let mut p = Problem::minimize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();
        p.increment_objective(&x.multiply(&x));
        let lp = write_lp(&p).unwrap();
        assert!(lp.contains(" obj: + [ +2 v00000_x ^ 2 ] / 2\n"));
    }

    #[test]
    fn test_degree_check() {
        let mut p = Problem::minimize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();
        let cube = x.multiply(&x).multiply(&x);
        p.add_constraint(Constraint::leq(&cube, &Polynomial::constant(1.0)));
        match write_lp(&p) {
            Err(ModelError::DegreeTooHigh { location, degree }) => {
                assert_eq!(location, "constraint c00000");
                assert_eq!(degree, 3);
            }
            other => panic!("expected DegreeTooHigh, got {:?}", other),
        }

        let mut q = Problem::minimize();
        let y = q.new_variable("y", &VariableOptions::new()).unwrap();
        q.increment_objective(&y.multiply(&y).multiply(&y));
        assert!(matches!(
            write_lp(&q),
            Err(ModelError::DegreeTooHigh { degree: 3, .. })
        ));
    }

    #[test]
    fn test_empty_objective_padded() {
        let mut p = Problem::minimize();
        p.new_variable("x", &VariableOptions::new()).unwrap();
        let lp = write_lp(&p).unwrap();
        assert!(lp.contains(" obj: 0 v00000_x\n"));
    }
}
