//! Big-M constants.
//!
//! When every variable involved has finite bounds, the tightest constant that
//! keeps a deactivated big-M row slack is computed by interval arithmetic.
//! Otherwise the configured global constant is used.

use super::config::LinearizeConfig;
use crate::expr::Piecewise;
use crate::poly::Polynomial;
use crate::problem::Problem;

/// Range of `poly` over the variable bounds, or `None` if any variable is
/// unbounded or unregistered.
pub fn interval(poly: &Polynomial, problem: &Problem) -> Option<(f64, f64)> {
    let mut lo = 0.0;
    let mut hi = 0.0;
    for (term, coeff) in poly.terms() {
        let mut range = (1.0, 1.0);
        for name in term.names() {
            let bounds = problem.variable(name)?.interval();
            if !bounds.0.is_finite() || !bounds.1.is_finite() {
                return None;
            }
            range = mul_interval(range, bounds);
        }
        let (a, b) = mul_interval(range, (coeff, coeff));
        lo += a;
        hi += b;
    }
    Some((lo, hi))
}

fn mul_interval(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    let products = [a.0 * b.0, a.0 * b.1, a.1 * b.0, a.1 * b.1];
    let lo = products.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

/// M bounding `|diff|` over the variable bounds.
pub fn for_difference(config: &LinearizeConfig, problem: &Problem, diff: &Polynomial) -> f64 {
    if !config.derive_big_m {
        return config.big_m;
    }
    match interval(diff, problem) {
        Some((lo, hi)) => lo.abs().max(hi.abs()),
        None => config.big_m,
    }
}

/// M for a piecewise-linear encoding over argument `arg`.
///
/// Covers both the value sandwich of every inactive segment and the
/// confinement of the argument to an inactive segment's domain. A shape with
/// no segments, or too few breakpoints, falls back to the global M.
pub fn for_piecewise(
    config: &LinearizeConfig,
    problem: &Problem,
    arg: &Polynomial,
    pw: &Piecewise,
) -> f64 {
    if !config.derive_big_m {
        return config.big_m;
    }
    let k = pw.segments();
    let (Some(last_start), Some(first_end)) = (
        k.checked_sub(1).and_then(|i| pw.breakpoints.get(i)),
        pw.breakpoints.get(1),
    ) else {
        return config.big_m;
    };
    let Some((elo, ehi)) = interval(arg, problem) else {
        return config.big_m;
    };

    let mut vlo = f64::INFINITY;
    let mut vhi = f64::NEG_INFINITY;
    for (slope, intercept) in pw.slopes.iter().zip(&pw.intercepts) {
        let at_lo = slope * elo + intercept;
        let at_hi = slope * ehi + intercept;
        vlo = vlo.min(at_lo.min(at_hi));
        vhi = vhi.max(at_lo.max(at_hi));
    }

    let domain = (last_start - elo).max(ehi - first_end);
    (vhi - vlo).max(domain).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::var;
    use crate::model::VariableOptions;
    use std::sync::Arc;

    fn problem() -> (Problem, Polynomial, Polynomial) {
        let mut p = Problem::minimize();
        let x = p
            .new_variable("x", &VariableOptions::new().bounds(-2.0, 3.0))
            .unwrap();
        let y = p.new_variable("y", &VariableOptions::new().nonneg()).unwrap();
        (p, x, y)
    }

    #[test]
    fn test_interval_of_linear() {
        let (p, x, _) = problem();
        let e = x.scale(2.0).add(&Polynomial::constant(1.0));
        assert_eq!(interval(&e, &p), Some((-3.0, 7.0)));
        assert_eq!(interval(&x.negate(), &p), Some((-3.0, 2.0)));
    }

    #[test]
    fn test_interval_of_square() {
        let (p, x, _) = problem();
        assert_eq!(interval(&x.multiply(&x), &p), Some((-6.0, 9.0)));
    }

    #[test]
    fn test_unbounded_falls_back() {
        let (p, x, y) = problem();
        let config = LinearizeConfig::default().big_m(1000.0);
        assert_eq!(interval(&y, &p), None);
        assert_eq!(for_difference(&config, &p, &x.subtract(&y)), 1000.0);
        assert_eq!(for_difference(&config, &p, &x), 3.0);
        let fixed = config.derive_big_m(false);
        assert_eq!(for_difference(&fixed, &p, &x), 1000.0);
    }

    #[test]
    fn test_piecewise_constant() {
        let (p, x, _) = problem();
        let pw = Piecewise {
            arg: Arc::new(var("x", Vec::<i64>::new())),
            breakpoints: vec![-2.0, 0.0, 3.0],
            slopes: vec![-1.0, 2.0],
            intercepts: vec![0.0, 0.0],
        };
        let m = for_piecewise(&LinearizeConfig::default(), &p, &x, &pw);
        // values span [-4, 6] over [-2, 3]; domain gaps are at most 3
        assert_eq!(m, 10.0);
    }

    #[test]
    fn test_piecewise_malformed_shape_uses_global() {
        let (p, x, _) = problem();
        let config = LinearizeConfig::default().big_m(500.0);
        let empty = Piecewise {
            arg: Arc::new(var("x", Vec::<i64>::new())),
            breakpoints: vec![],
            slopes: vec![],
            intercepts: vec![],
        };
        assert_eq!(for_piecewise(&config, &p, &x, &empty), 500.0);

        let short = Piecewise {
            breakpoints: vec![0.0],
            slopes: vec![1.0],
            intercepts: vec![0.0],
            ..empty
        };
        assert_eq!(for_piecewise(&config, &p, &x, &short), 500.0);
    }
}
