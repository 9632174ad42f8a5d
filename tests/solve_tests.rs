//! Solve tests for continuous models.
//!
//! Cases are defined as data and run programmatically against the Clarabel
//! backend. Every piecewise-linear construct used here stays continuous, so
//! the relaxation is exact.

use approx::assert_abs_diff_eq;
use milpc::prelude::*;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-4;

/// A test case definition
struct TestCase {
    name: &'static str,
    /// Function that builds the problem and returns (problem, expected_value)
    build: fn() -> (Problem, f64),
}

fn free() -> VariableOptions {
    VariableOptions::new()
}

fn minimize_test_cases() -> Vec<TestCase> {
    vec![
        // ========== Linear Programs ==========
        TestCase {
            name: "bounded_lp",
            build: || {
                // minimize x + 2y s.t. x + y >= 3, x, y >= 0
                // optimal: x = 3, y = 0, value = 3
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free().nonneg()).unwrap();
                let y = p.new_variable("y", &free().nonneg()).unwrap();
                p.increment_objective(&x.add(&y.scale(2.0)));
                p.add_constraint(Constraint::geq(&x.add(&y), &Polynomial::constant(3.0)));
                (p, 3.0)
            },
        },
        TestCase {
            name: "equality_with_bound",
            build: || {
                // minimize x s.t. x + y == 4, y <= 1
                // optimal: x = 3, y = 1
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free()).unwrap();
                let y = p.new_variable("y", &free().upper(1.0)).unwrap();
                p.increment_objective(&x);
                p.add_constraint(Constraint::eq(&x.add(&y), &Polynomial::constant(4.0)));
                (p, 3.0)
            },
        },
        TestCase {
            name: "objective_constant",
            build: || {
                // minimize x + 10 s.t. x >= 2
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free().lower(2.0)).unwrap();
                p.increment_objective(&x.add(&Polynomial::constant(10.0)));
                (p, 12.0)
            },
        },
        // ========== Piecewise-linear atoms ==========
        TestCase {
            name: "abs_shift",
            build: || {
                // minimize |x - 3|, x in [-5, 5]
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free().bounds(-5.0, 5.0)).unwrap();
                p.add_objective_expr(&abs(&(poly(&x) - 3.0)), &Scope::empty())
                    .unwrap();
                (p, 0.0)
            },
        },
        TestCase {
            name: "abs_outside_bounds",
            build: || {
                // minimize |x - 8|, x in [-5, 5]
                // optimal: x = 5, value = 3
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free().bounds(-5.0, 5.0)).unwrap();
                p.add_objective_expr(&abs(&(poly(&x) - 8.0)), &Scope::empty())
                    .unwrap();
                (p, 3.0)
            },
        },
        TestCase {
            name: "sum_of_abs",
            build: || {
                // minimize |x - 1| + |y + 2|
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free()).unwrap();
                let y = p.new_variable("y", &free()).unwrap();
                let e = abs(&(poly(&x) - 1.0)) + abs(&(poly(&y) + 2.0));
                p.add_objective_expr(&e, &Scope::empty()).unwrap();
                (p, 0.0)
            },
        },
        TestCase {
            name: "max_of_two",
            build: || {
                // minimize max(x, 2 - x)
                // optimal: x = 1, value = 1
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free()).unwrap();
                let e = max2(&poly(&x), &(2.0 - poly(&x)));
                p.add_objective_expr(&e, &Scope::empty()).unwrap();
                (p, 1.0)
            },
        },
        TestCase {
            name: "max_over_pattern",
            build: || {
                // minimize max_i x(i) s.t. x(1) + x(2) + x(3) == 6
                // optimal: all equal, value = 2
                let mut p = Problem::minimize();
                p.new_family(
                    "x",
                    &[Generator::list("i", [1, 2, 3])],
                    &free(),
                    &DataContext::new(),
                )
                .unwrap();
                p.add_objective_expr(&max(vec![var("x", ["_"])]), &Scope::empty())
                    .unwrap();
                let total = sum_over(var("x", ["i"]), vec![Generator::list("i", [1, 2, 3])]);
                p.constrain(&total, Comparison::Eq, &constant(6.0), &Scope::empty(), None)
                    .unwrap();
                (p, 2.0)
            },
        },
        TestCase {
            name: "indexed_lower_bounds",
            build: || {
                // minimize sum_i x(i) s.t. x(i) >= lo(i)
                let data = DataContext::new()
                    .with_domain("items", [1, 2, 3])
                    .with_table("lo", [(vec![1], 1.5), (vec![2], 2.0), (vec![3], 0.5)]);
                let scope = Scope::new(&data);
                let items = vec![Generator::data("i", "items")];

                let mut p = Problem::minimize();
                p.new_family("x", &items, &free(), &data).unwrap();
                p.add_objective_expr(&sum_over(var("x", ["i"]), items.clone()), &scope)
                    .unwrap();
                p.constrain_for_all(
                    &var("x", ["i"]),
                    Comparison::Ge,
                    &param("lo", ["i"]),
                    &items,
                    &scope,
                    "floor",
                )
                .unwrap();
                (p, 4.0)
            },
        },
        // ========== Quadratic Programs ==========
        TestCase {
            name: "qp_on_line",
            build: || {
                // minimize x^2 + y^2 s.t. x + y == 2
                // optimal: x = y = 1, value = 2
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free()).unwrap();
                let y = p.new_variable("y", &free()).unwrap();
                p.increment_objective(&x.multiply(&x).add(&y.multiply(&y)));
                p.add_constraint(Constraint::eq(&x.add(&y), &Polynomial::constant(2.0)));
                (p, 2.0)
            },
        },
        TestCase {
            name: "qp_shifted",
            build: || {
                // minimize (x - 3)^2, written through the expression layer
                let mut p = Problem::minimize();
                let x = p.new_variable("x", &free().bounds(-10.0, 10.0)).unwrap();
                let d = poly(&x) - 3.0;
                p.add_objective_expr(&(&d * &d), &Scope::empty()).unwrap();
                (p, 0.0)
            },
        },
    ]
}

fn maximize_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "sum_upper_bound",
            build: || {
                // maximize x + y s.t. x + y <= 4, x, y >= 0
                let mut p = Problem::maximize();
                let x = p.new_variable("x", &free().nonneg()).unwrap();
                let y = p.new_variable("y", &free().nonneg()).unwrap();
                p.increment_objective(&x.add(&y));
                p.add_constraint(Constraint::leq(&x.add(&y), &Polynomial::constant(4.0)));
                (p, 4.0)
            },
        },
        TestCase {
            name: "two_resource_lp",
            build: || {
                // maximize 3x + 2y s.t. x + y <= 4, x + 3y <= 6, x, y >= 0
                // optimal: x = 4, y = 0, value = 12
                let mut p = Problem::maximize();
                let x = p.new_variable("x", &free().nonneg()).unwrap();
                let y = p.new_variable("y", &free().nonneg()).unwrap();
                p.increment_objective(&x.scale(3.0).add(&y.scale(2.0)));
                p.add_constraint(Constraint::leq(&x.add(&y), &Polynomial::constant(4.0)));
                p.add_constraint(Constraint::leq(
                    &x.add(&y.scale(3.0)),
                    &Polynomial::constant(6.0),
                ));
                (p, 12.0)
            },
        },
        TestCase {
            name: "min_of_two",
            build: || {
                // maximize min(x, 4 - x), x in [0, 10]
                // optimal: x = 2, value = 2
                let mut p = Problem::maximize();
                let x = p.new_variable("x", &free().bounds(0.0, 10.0)).unwrap();
                let e = min2(&poly(&x), &(4.0 - poly(&x)));
                p.add_objective_expr(&e, &Scope::empty()).unwrap();
                (p, 2.0)
            },
        },
        TestCase {
            name: "concave_qp",
            build: || {
                // maximize 4x - x^2
                // optimal: x = 2, value = 4
                let mut p = Problem::maximize();
                let x = p.new_variable("x", &free().bounds(-10.0, 10.0)).unwrap();
                p.increment_objective(&x.scale(4.0));
                p.decrement_objective(&x.multiply(&x));
                (p, 4.0)
            },
        },
    ]
}

// ============================================================================
// Test runner
// ============================================================================

fn run(cases: Vec<TestCase>) {
    for case in cases {
        let (prob, expected) = (case.build)();

        let result = prob.solve();
        assert!(result.is_ok(), "Problem '{}' should solve: {:?}", case.name, result.err());

        let solution = result.unwrap();
        assert_eq!(
            solution.status,
            SolveStatus::Optimal,
            "Problem '{}' should be optimal, got {:?}",
            case.name,
            solution.status
        );

        let value = solution.objective.expect("should have value");
        let rel_err = (value - expected).abs() / (1.0 + expected.abs());
        assert!(
            rel_err < TOL,
            "Problem '{}': expected {}, got {} (rel_err={})",
            case.name,
            expected,
            value,
            rel_err
        );
        assert!(
            prob.is_feasible(&solution.values, 1e-3).unwrap(),
            "Problem '{}': solution violates the model",
            case.name
        );
    }
}

#[test]
fn test_minimize_cases() {
    run(minimize_test_cases());
}

#[test]
fn test_maximize_cases() {
    run(maximize_test_cases());
}

// ============================================================================
// Individual checks
// ============================================================================

#[test]
fn test_solution_values_by_name() {
    let mut p = Problem::minimize();
    let x = p.new_variable("x", &free().bounds(1.0, 5.0)).unwrap();
    p.increment_objective(&x);
    let solution = ClarabelSolver::default().solve(&p).unwrap();
    assert_abs_diff_eq!(solution.value("v00000_x").unwrap(), 1.0, epsilon = TOL);
    assert_abs_diff_eq!(solution.evaluate(&x).unwrap(), 1.0, epsilon = TOL);
    assert_abs_diff_eq!(solution.objective.unwrap(), 1.0, epsilon = TOL);
}

#[test]
fn test_infeasible() {
    let mut p = Problem::minimize();
    let x = p.new_variable("x", &free().nonneg()).unwrap();
    p.increment_objective(&x);
    p.add_constraint(Constraint::leq(&x, &Polynomial::constant(-1.0)));
    let solution = p.solve().unwrap();
    assert!(!solution.is_optimal());
    assert!(solution.objective.is_none());
    assert!(solution.values.is_empty());
}

#[test]
fn test_unbounded() {
    let mut p = Problem::minimize();
    let x = p.new_variable("x", &free().upper(10.0)).unwrap();
    p.increment_objective(&x);
    let solution = p.solve().unwrap();
    assert!(!solution.is_optimal());
    assert!(solution.objective.is_none());
}

#[test]
fn test_binary_model_is_unsupported() {
    let mut p = Problem::minimize();
    let b = p.new_variable("b", &free().binary()).unwrap();
    p.increment_objective(&b);
    assert!(matches!(p.solve(), Err(ModelError::Unsupported(_))));
    // the same model still goes out as LP text
    assert!(write_lp(&p).unwrap().contains("Binary\n v00000_b\n"));
}

#[test]
fn test_custom_settings() {
    let settings = Settings {
        max_iter: 200,
        ..Settings::default()
    };
    let solver = ClarabelSolver::new(settings);
    assert_eq!(solver.settings().max_iter, 200);

    let mut p = Problem::minimize();
    let x = p.new_variable("x", &free()).unwrap();
    p.add_objective_expr(&abs(&(poly(&x) + 1.5)), &Scope::empty())
        .unwrap();
    let solution = p.solve_with(&solver).unwrap();
    assert!(solution.is_optimal());
    assert_abs_diff_eq!(solution.evaluate(&x).unwrap(), -1.5, epsilon = 1e-3);
}
