//! Production Planning Example
//!
//! A small mixed-integer model:
//!
//! maximize    sum_p profit(p) x(p) - setup(p) y(p) - 15 overtime
//! subject to  x(p) <= 40 y(p)                  for each product p
//!             overtime = max(0, sum_p hours(p) x(p) - 60)
//!
//! with `x` integer and `y` binary. The model is written as CPLEX LP text
//! for an external MILP solver.

use milpc::prelude::*;

fn main() -> milpc::Result<()> {
    println!("=== Production Plan ===\n");

    let data = DataContext::new()
        .with_domain("products", [1, 2, 3])
        .with_table("profit", [(vec![1], 12.0), (vec![2], 9.0), (vec![3], 15.0)])
        .with_table("setup", [(vec![1], 50.0), (vec![2], 20.0), (vec![3], 80.0)])
        .with_table("hours", [(vec![1], 1.5), (vec![2], 1.0), (vec![3], 2.5)])
        .with_scalar("batch", 40.0)
        .with_scalar("regular", 60.0);
    let scope = Scope::new(&data);
    let products = vec![Generator::data("p", "products")];

    let mut problem = Problem::maximize();
    problem.new_family(
        "x",
        &products,
        &VariableOptions::new().integer().bounds(0.0, 40.0),
        &data,
    )?;
    problem.new_family("y", &products, &VariableOptions::new().binary(), &data)?;

    // Revenue minus fixed setup costs
    let margin = sum_over(
        param("profit", ["p"]) * var("x", ["p"]) - param("setup", ["p"]) * var("y", ["p"]),
        products.clone(),
    );
    problem.add_objective_expr(&margin, &scope)?;

    // A product can only be made once its line is set up
    problem.constrain_for_all(
        &var("x", ["p"]),
        Comparison::Le,
        &(sym("batch") * var("y", ["p"])),
        &products,
        &scope,
        "setup",
    )?;

    // Hours above the regular shift are paid at an overtime rate
    let hours = sum_over(param("hours", ["p"]) * var("x", ["p"]), products.clone());
    let overtime = max2(&constant(0.0), &(hours - sym("regular")));
    problem.add_objective_expr(&(-15.0 * overtime), &scope)?;

    println!(
        "{} variables, {} constraints\n",
        problem.num_variables(),
        problem.num_constraints()
    );
    print!("{}", write_lp(&problem)?);
    Ok(())
}
