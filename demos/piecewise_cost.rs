//! Piecewise-Linear Cost Example
//!
//! Buying `q` units from a supplier with volume discounts:
//!
//! cost(q) = 5q           on [0, 100]
//!           4q + 100     on [100, 250]
//!           3q + 350     on [250, 400]
//!
//! minimize cost(q) + 2 |q - 180|  subject to  q >= 120
//!
//! The piecewise cost introduces one binary selector per segment, so the
//! model goes out as LP text. The same model without the cost curve is a
//! plain LP and is solved directly.

use milpc::prelude::*;

fn main() -> milpc::Result<()> {
    println!("=== Piecewise Purchase Cost ===\n");

    let scope = Scope::empty();
    let mut problem = Problem::minimize();
    let q = problem.new_variable("q", &VariableOptions::new().bounds(0.0, 400.0))?;

    let cost = piecewise(
        &poly(&q),
        vec![0.0, 100.0, 250.0, 400.0],
        vec![5.0, 4.0, 3.0],
        vec![0.0, 100.0, 350.0],
    );
    let penalty = 2.0 * abs(&(poly(&q) - 180.0));
    problem.add_objective_expr(&(&cost + &penalty), &scope)?;
    problem.constrain(&poly(&q), Comparison::Ge, &constant(120.0), &scope, Some("demand"))?;

    println!("Cost curve: {:?}", analyze(&cost).classification);
    println!(
        "{} variables, {} constraints\n",
        problem.num_variables(),
        problem.num_constraints()
    );
    print!("{}", write_lp(&problem)?);

    // Continuous part only: minimize 2 |q - 180| s.t. q >= 120
    println!("\nSolving the deviation model with Clarabel...");
    let mut relaxed = Problem::minimize();
    let q = relaxed.new_variable("q", &VariableOptions::new().bounds(0.0, 400.0))?;
    relaxed.add_objective_expr(&(2.0 * abs(&(poly(&q) - 180.0))), &scope)?;
    relaxed.constrain(&poly(&q), Comparison::Ge, &constant(120.0), &scope, Some("demand"))?;

    let solution = relaxed.solve()?;
    println!("Status: {:?}", solution.status);
    if let Some(value) = solution.objective {
        println!("q = {:.3}, penalty = {:.3}", solution.evaluate(&q)?, value);
    }
    Ok(())
}
