//! Model assembly.
//!
//! A `Problem` owns everything a model accumulates while it is built:
//! - the optimization direction and the running objective polynomial
//! - registered variable definitions, keyed by generated name
//! - constraints, keyed by generated identifier, in insertion order
//! - indexed variable families
//! - memoized auxiliary results of the linearizer
//!
//! Growth is append-only. Variable names and constraint identifiers come from
//! counters that never go backwards, so an identifier is never reused.
//!
//! ```
//! use milpc::prelude::*;
//!
//! let mut problem = Problem::minimize();
//! let x = problem.new_variable("x", &VariableOptions::new().bounds(-5.0, 5.0)).unwrap();
//! problem.add_objective_expr(&abs(&(poly(&x) - 3.0)), &Scope::empty()).unwrap();
//! assert_eq!(problem.num_constraints(), 2);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{ModelError, Result};
use crate::expr::{expand, DataContext, Expr, Generator, Scope};
use crate::linearize::{LinearizeConfig, Linearizer};
use crate::model::{format_index, Comparison, Constraint, Family, Index, VariableDef, VariableOptions};
use crate::poly::Polynomial;
use crate::solver::{ClarabelSolver, Solution, Solver};

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Minimize the objective.
    Minimize,
    /// Maximize the objective.
    Maximize,
}

impl Direction {
    /// Check if this is a minimization.
    pub fn is_minimize(self) -> bool {
        self == Direction::Minimize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Minimize => write!(f, "minimize"),
            Direction::Maximize => write!(f, "maximize"),
        }
    }
}

impl FromStr for Direction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimize" | "min" => Ok(Direction::Minimize),
            "maximize" | "max" => Ok(Direction::Maximize),
            other => Err(ModelError::InvalidDirection(other.to_string())),
        }
    }
}

/// Builder for a problem. A direction must be supplied before `build`.
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    direction: Option<Direction>,
    config: LinearizeConfig,
}

impl ProblemBuilder {
    /// A builder with no direction and the default linearizer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Minimize the objective.
    pub fn minimize(self) -> Self {
        self.direction(Direction::Minimize)
    }

    /// Maximize the objective.
    pub fn maximize(self) -> Self {
        self.direction(Direction::Maximize)
    }

    /// Linearizer settings used by the expression builders.
    pub fn config(mut self, config: LinearizeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the problem.
    pub fn build(self) -> Result<Problem> {
        let direction = self.direction.ok_or(ModelError::MissingDirection)?;
        let mut problem = Problem::new(direction);
        problem.config = self.config;
        Ok(problem)
    }
}

/// Sizes of the append-only parts of a problem, taken before a step that
/// may have to be undone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    variables: usize,
    constraints: usize,
    auxiliaries: usize,
    next_variable: u64,
    next_constraint: u64,
}

/// An optimization model under construction.
#[derive(Debug, Clone)]
pub struct Problem {
    direction: Direction,
    objective: Polynomial,
    variables: IndexMap<String, VariableDef>,
    constraints: IndexMap<String, Constraint>,
    families: BTreeMap<String, Family>,
    auxiliaries: IndexMap<String, Polynomial>,
    next_variable: u64,
    next_constraint: u64,
    config: LinearizeConfig,
}

impl Problem {
    /// Create an empty problem with the given direction.
    pub fn new(direction: Direction) -> Self {
        Problem {
            direction,
            objective: Polynomial::zero(),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
            families: BTreeMap::new(),
            auxiliaries: IndexMap::new(),
            next_variable: 0,
            next_constraint: 0,
            config: LinearizeConfig::default(),
        }
    }

    /// Create a minimization problem.
    pub fn minimize() -> Self {
        Problem::new(Direction::Minimize)
    }

    /// Create a maximization problem.
    pub fn maximize() -> Self {
        Problem::new(Direction::Maximize)
    }

    /// Start a builder.
    pub fn builder() -> ProblemBuilder {
        ProblemBuilder::new()
    }

    /// The optimization direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Linearizer settings used by `add_objective_expr` and `constrain`.
    pub fn config(&self) -> &LinearizeConfig {
        &self.config
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// Create a scalar variable and register it as the zero-arity family `label`.
    ///
    /// The variable's name is counter-coded (`v00000_label`); the returned
    /// polynomial is that single variable.
    pub fn new_variable(&mut self, label: &str, options: &VariableOptions) -> Result<Polynomial> {
        if self.families.contains_key(label) {
            return Err(ModelError::DuplicateFamily(label.to_string()));
        }
        let var = self.instantiate(label, options)?;
        self.families
            .insert(label.to_string(), Family::from_entries(label, [(Vec::new(), var.clone())]));
        Ok(var)
    }

    /// Create one variable per binding combination of `generators`.
    ///
    /// Each member is labelled `name_i_j` after its index tuple. With no
    /// generators the family holds a single scalar at the empty index.
    pub fn new_family(
        &mut self,
        name: &str,
        generators: &[Generator],
        options: &VariableOptions,
        data: &DataContext,
    ) -> Result<Family> {
        if self.families.contains_key(name) {
            return Err(ModelError::DuplicateFamily(name.to_string()));
        }
        options.define(name)?;

        let indices: Vec<Index> = if generators.is_empty() {
            vec![Vec::new()]
        } else {
            expand(generators, &Scope::new(data))?
                .iter()
                .map(|scope| {
                    generators
                        .iter()
                        .map(|g| {
                            scope
                                .lookup(&g.symbol)
                                .ok_or_else(|| ModelError::UnboundSymbol(g.symbol.clone()))
                        })
                        .collect::<Result<Index>>()
                })
                .collect::<Result<_>>()?
        };

        let mut family = Family::new(name);
        for index in indices {
            if family.lookup(&index).is_ok() {
                continue;
            }
            let label = std::iter::once(name.to_string())
                .chain(index.iter().map(i64::to_string))
                .collect::<Vec<_>>()
                .join("_");
            let var = self.instantiate(&label, options)?;
            family.insert(index, var);
        }
        debug!(family = name, size = family.len(), "created variable family");
        self.families.insert(name.to_string(), family.clone());
        Ok(family)
    }

    /// Register a variable under an exact name, as the linearizer does for
    /// auxiliaries. The name must be new.
    pub fn add_auxiliary(&mut self, name: &str, options: &VariableOptions) -> Result<Polynomial> {
        if self.variables.contains_key(name) {
            return Err(ModelError::DuplicateVariable(name.to_string()));
        }
        let def = options.define(name)?;
        self.variables.insert(name.to_string(), def);
        Ok(Polynomial::variable(name))
    }

    fn instantiate(&mut self, label: &str, options: &VariableOptions) -> Result<Polynomial> {
        let name = variable_name(self.next_variable, label);
        let def = options.define(name.clone())?;
        if self.variables.contains_key(&name) {
            return Err(ModelError::DuplicateVariable(name));
        }
        self.next_variable += 1;
        trace!(variable = %name, kind = %def.kind, "registered variable");
        self.variables.insert(name.clone(), def);
        Ok(Polynomial::variable(name))
    }

    /// Look up a variable definition.
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        self.variables.get(name)
    }

    /// Variable definitions in registration order.
    pub fn variables(&self) -> impl Iterator<Item = &VariableDef> {
        self.variables.values()
    }

    /// Number of registered variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    // ========================================================================
    // Families
    // ========================================================================

    /// Create or replace a family.
    ///
    /// Every member must be a single registered variable; anything else is
    /// an `UndefinedVariable` error and the family is not stored.
    pub fn put_family(&mut self, family: Family) -> Result<()> {
        for (index, poly) in family.iter() {
            match poly.as_variable() {
                Some(name) if self.variables.contains_key(name) => {}
                Some(name) => return Err(ModelError::UndefinedVariable(name.to_string())),
                None => {
                    return Err(ModelError::UndefinedVariable(format!(
                        "{}{} = {}",
                        family.name(),
                        format_index(index),
                        poly
                    )))
                }
            }
        }
        self.families.insert(family.name().to_string(), family);
        Ok(())
    }

    /// Look up a family; an unknown name is an error.
    pub fn get_family(&self, name: &str) -> Result<&Family> {
        self.family(name)
            .ok_or_else(|| ModelError::UndefinedFamily(name.to_string()))
    }

    /// Look up a family.
    pub fn family(&self, name: &str) -> Option<&Family> {
        self.families.get(name)
    }

    // ========================================================================
    // Constraints
    // ========================================================================

    /// Store a constraint and return its identifier (`c00000` or `c00000_label`).
    pub fn add_constraint(&mut self, constraint: Constraint) -> String {
        let id = match &constraint.label {
            Some(label) if !label.is_empty() => {
                format!("c{:05}_{}", self.next_constraint, sanitize(label))
            }
            _ => format!("c{:05}", self.next_constraint),
        };
        self.next_constraint += 1;
        trace!(id = %id, constraint = %constraint, "added constraint");
        self.constraints.insert(id.clone(), constraint);
        id
    }

    /// Look up a constraint by identifier.
    pub fn constraint(&self, id: &str) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    /// Constraints with their identifiers, in insertion order.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    // ========================================================================
    // Objective
    // ========================================================================

    /// The running objective.
    pub fn objective(&self) -> &Polynomial {
        &self.objective
    }

    /// Add a polynomial to the objective.
    pub fn increment_objective(&mut self, poly: &Polynomial) {
        self.objective = self.objective.add(poly);
    }

    /// Subtract a polynomial from the objective.
    pub fn decrement_objective(&mut self, poly: &Polynomial) {
        self.objective = self.objective.subtract(poly);
    }

    // ========================================================================
    // Expression builders
    // ========================================================================

    /// Linearize `expr` and add it to the objective.
    ///
    /// Auxiliaries are tagged with the configured context plus `obj`. On
    /// error the problem is left unchanged.
    pub fn add_objective_expr(&mut self, expr: &Expr, scope: &Scope<'_>) -> Result<Polynomial> {
        let linearizer = Linearizer::new(self.tagged_config("obj"));
        let poly = linearizer.transform(self, expr, scope)?;
        self.increment_objective(&poly);
        Ok(poly)
    }

    /// Linearize both sides, normalize, and store `lhs op rhs`.
    ///
    /// Returns the constraint identifier. On error the problem is left
    /// unchanged.
    pub fn constrain(
        &mut self,
        lhs: &Expr,
        op: Comparison,
        rhs: &Expr,
        scope: &Scope<'_>,
        label: Option<&str>,
    ) -> Result<String> {
        let tag = match label {
            Some(l) => sanitize(l),
            None => format!("c{:05}", self.next_constraint),
        };
        let linearizer = Linearizer::new(self.tagged_config(&tag));
        self.atomically(|problem| {
            let left = linearizer.transform(problem, lhs, scope)?;
            let right = linearizer.transform(problem, rhs, scope)?;
            let mut constraint = Constraint::new(&left, op, &right);
            if let Some(l) = label {
                constraint = constraint.with_label(l);
            }
            Ok(problem.add_constraint(constraint))
        })
    }

    /// Add `lhs op rhs` once per binding combination of `generators`.
    ///
    /// Labels get the bound values appended (`cap_1_2`). All-or-nothing: if
    /// any instance fails, none are kept.
    pub fn constrain_for_all(
        &mut self,
        lhs: &Expr,
        op: Comparison,
        rhs: &Expr,
        generators: &[Generator],
        scope: &Scope<'_>,
        label: &str,
    ) -> Result<Vec<String>> {
        let bindings = expand(generators, scope)?;
        self.atomically(|problem| {
            let mut ids = Vec::with_capacity(bindings.len());
            for inner in &bindings {
                let values: Vec<String> = generators
                    .iter()
                    .filter_map(|g| inner.lookup(&g.symbol))
                    .map(|v| v.to_string())
                    .collect();
                let instance = std::iter::once(label.to_string())
                    .chain(values)
                    .collect::<Vec<_>>()
                    .join("_");
                let id = problem
                    .constrain(lhs, op, rhs, inner, Some(&instance))
                    .map_err(|e| e.with_context(inner.describe()))?;
                ids.push(id);
            }
            Ok(ids)
        })
    }

    /// Run `step`, undoing everything it appended if it fails.
    pub(crate) fn atomically<T>(
        &mut self,
        step: impl FnOnce(&mut Problem) -> Result<T>,
    ) -> Result<T> {
        let checkpoint = self.checkpoint();
        let result = step(self);
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            variables: self.variables.len(),
            constraints: self.constraints.len(),
            auxiliaries: self.auxiliaries.len(),
            next_variable: self.next_variable,
            next_constraint: self.next_constraint,
        }
    }

    // Variables, constraints and memo entries are only ever appended while a
    // step runs, so truncating restores the earlier state.
    fn rollback(&mut self, checkpoint: Checkpoint) {
        trace!(
            variables = self.variables.len() - checkpoint.variables,
            constraints = self.constraints.len() - checkpoint.constraints,
            "rolling back failed step"
        );
        self.variables.truncate(checkpoint.variables);
        self.constraints.truncate(checkpoint.constraints);
        self.auxiliaries.truncate(checkpoint.auxiliaries);
        self.next_variable = checkpoint.next_variable;
        self.next_constraint = checkpoint.next_constraint;
    }

    fn tagged_config(&self, tag: &str) -> LinearizeConfig {
        let context = if self.config.context.is_empty() {
            tag.to_string()
        } else {
            format!("{}_{}", self.config.context, tag)
        };
        self.config.clone().context(context)
    }

    // ========================================================================
    // Auxiliary memo
    // ========================================================================

    /// The memoized result for an auxiliary name, if that construct was
    /// already linearized.
    pub fn auxiliary(&self, name: &str) -> Option<&Polynomial> {
        self.auxiliaries.get(name)
    }

    pub(crate) fn remember_auxiliary(&mut self, name: &str, result: Polynomial) {
        self.auxiliaries.insert(name.to_string(), result);
    }

    // ========================================================================
    // Solving
    // ========================================================================

    /// Solve with the bundled continuous backend and default settings.
    pub fn solve(&self) -> Result<Solution> {
        self.solve_with(&ClarabelSolver::default())
    }

    /// Solve with a given backend.
    pub fn solve_with<S: Solver>(&self, solver: &S) -> Result<Solution> {
        solver.solve(self)
    }

    // ========================================================================
    // Checking assignments
    // ========================================================================

    /// Objective value under an assignment.
    pub fn objective_value(&self, values: &HashMap<String, f64>) -> Result<f64> {
        self.objective.evaluate(values)
    }

    /// Check that an assignment satisfies every constraint and variable
    /// domain within `tol`. Every registered variable must be assigned.
    pub fn is_feasible(&self, values: &HashMap<String, f64>, tol: f64) -> Result<bool> {
        for def in self.variables.values() {
            let value = values
                .get(&def.name)
                .ok_or_else(|| ModelError::UndefinedVariable(def.name.clone()))?;
            if !def.admits(*value, tol) {
                return Ok(false);
            }
        }
        for constraint in self.constraints.values() {
            if !constraint.is_satisfied(values, tol)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn variable_name(counter: u64, label: &str) -> String {
    if label.is_empty() {
        format!("v{:05}", counter)
    } else {
        format!("v{:05}_{}", counter, sanitize(label))
    }
}

/// Keep names safe for LP text: alphanumerics and underscores only.
pub(crate) fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' => c,
            '-' => 'm',
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{abs, poly, var};

    #[test]
    fn test_direction_parsing() {
        assert_eq!("min".parse::<Direction>().unwrap(), Direction::Minimize);
        assert_eq!(" Maximize ".parse::<Direction>().unwrap(), Direction::Maximize);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(ModelError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_builder_requires_direction() {
        assert!(matches!(
            Problem::builder().build(),
            Err(ModelError::MissingDirection)
        ));
        let p = Problem::builder()
            .maximize()
            .config(LinearizeConfig::default().big_m(100.0))
            .build()
            .unwrap();
        assert_eq!(p.direction(), Direction::Maximize);
        assert_eq!(p.config().big_m, 100.0);
    }

    #[test]
    fn test_variable_names_are_sequential() {
        let mut p = Problem::minimize();
        let a = p.new_variable("a", &VariableOptions::new()).unwrap();
        let b = p.new_variable("b c", &VariableOptions::new()).unwrap();
        assert_eq!(a.as_variable(), Some("v00000_a"));
        assert_eq!(b.as_variable(), Some("v00001_b_c"));
        assert!(p.family("a").is_some());
        assert!(matches!(
            p.new_variable("a", &VariableOptions::new()),
            Err(ModelError::DuplicateFamily(_))
        ));
        assert_eq!(p.num_variables(), 2);
    }

    #[test]
    fn test_family_naming_and_counter_sharing() {
        let mut p = Problem::minimize();
        p.new_variable("z", &VariableOptions::new()).unwrap();
        let fam = p
            .new_family(
                "x",
                &[Generator::list("i", [1, 2]), Generator::list("j", [-1])],
                &VariableOptions::new().nonneg(),
                &DataContext::new(),
            )
            .unwrap();
        assert_eq!(fam.len(), 2);
        assert_eq!(fam.lookup(&[1, -1]).unwrap().as_variable(), Some("v00001_x_1_m1"));
        assert_eq!(fam.lookup(&[2, -1]).unwrap().as_variable(), Some("v00002_x_2_m1"));
        assert_eq!(p.variable("v00002_x_2_m1").unwrap().lower, Some(0.0));
    }

    #[test]
    fn test_family_rejects_bad_bounds_without_registering() {
        let mut p = Problem::minimize();
        let err = p.new_family(
            "x",
            &[Generator::list("i", [1])],
            &VariableOptions::new().bounds(2.0, 1.0),
            &DataContext::new(),
        );
        assert!(matches!(err, Err(ModelError::InvalidBounds { .. })));
        assert_eq!(p.num_variables(), 0);
        assert!(p.family("x").is_none());
    }

    #[test]
    fn test_constraint_ids_never_reused() {
        let mut p = Problem::minimize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();
        let one = Polynomial::constant(1.0);
        let first = p.add_constraint(Constraint::leq(&x, &one));
        let second = p.add_constraint(Constraint::geq(&x, &one).with_label("floor"));
        assert_eq!(first, "c00000");
        assert_eq!(second, "c00001_floor");
        assert_eq!(p.constraints().map(|(id, _)| id).collect::<Vec<_>>(), vec![first.as_str(), second.as_str()]);
    }

    #[test]
    fn test_objective_increments() {
        let mut p = Problem::maximize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();
        p.increment_objective(&x.scale(3.0));
        p.decrement_objective(&x);
        assert_eq!(p.objective(), &x.scale(2.0));
    }

    #[test]
    fn test_constrain_is_all_or_nothing() {
        let mut p = Problem::minimize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();
        let before = (p.num_variables(), p.num_constraints());
        let bad = abs(&var("missing", [1]));
        assert!(p
            .constrain(&bad, Comparison::Le, &poly(&x), &Scope::empty(), None)
            .is_err());
        assert_eq!((p.num_variables(), p.num_constraints()), before);

        let id = p
            .constrain(&abs(&poly(&x)), Comparison::Le, &Expr::Const(4.0), &Scope::empty(), Some("cap"))
            .unwrap();
        assert!(id.ends_with("_cap"));
        // abs emits one auxiliary and two constraints before the stored one
        assert_eq!(p.num_variables(), 2);
        assert_eq!(p.num_constraints(), 3);
    }

    #[test]
    fn test_failed_constrain_rolls_back_counters_and_memo() {
        let mut p = Problem::minimize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();
        // the left side linearizes before the right side fails
        let err = p.constrain(
            &abs(&poly(&x)),
            Comparison::Le,
            &var("missing", [1]),
            &Scope::empty(),
            Some("cap"),
        );
        assert!(matches!(err, Err(ModelError::UndefinedFamily(_))));
        assert_eq!((p.num_variables(), p.num_constraints()), (1, 0));

        let y = p.new_variable("y", &VariableOptions::new()).unwrap();
        assert_eq!(y.as_variable(), Some("v00001_y"));
        let id = p
            .constrain(&abs(&poly(&x)), Comparison::Le, &Expr::Const(4.0), &Scope::empty(), Some("cap"))
            .unwrap();
        assert_eq!(id, "c00002_cap");
        assert_eq!((p.num_variables(), p.num_constraints()), (3, 3));
    }

    #[test]
    fn test_constrain_for_all_scales_to_many_rows() {
        let n: i64 = 5000;
        let mut p = Problem::minimize();
        p.new_family(
            "x",
            &[Generator::range("i", 1, n)],
            &VariableOptions::new(),
            &DataContext::new(),
        )
        .unwrap();
        let ids = p
            .constrain_for_all(
                &var("x", ["i"]),
                Comparison::Le,
                &Expr::Const(1.0),
                &[Generator::range("i", 1, n)],
                &Scope::empty(),
                "cap",
            )
            .unwrap();
        assert_eq!(ids.len(), n as usize);
        assert_eq!(ids.last().map(String::as_str), Some("c04999_cap_5000"));
        assert_eq!(p.num_constraints(), n as usize);
        assert_eq!(p.num_variables(), n as usize);
    }

    #[test]
    fn test_put_family_requires_registered_variables() {
        let mut p = Problem::minimize();
        let x = p.new_variable("x", &VariableOptions::new()).unwrap();

        let ghost = Family::from_entries("ghost", [(vec![1], Polynomial::variable("never_registered"))]);
        assert!(matches!(
            p.put_family(ghost),
            Err(ModelError::UndefinedVariable(name)) if name == "never_registered"
        ));
        assert!(p.family("ghost").is_none());

        let scaled = Family::from_entries("scaled", [(vec![1], x.scale(2.0))]);
        assert!(matches!(
            p.put_family(scaled),
            Err(ModelError::UndefinedVariable(_))
        ));

        let alias = Family::from_entries("alias", [(vec![1], x.clone())]);
        p.put_family(alias).unwrap();
        assert_eq!(p.get_family("alias").unwrap().lookup(&[1]).unwrap(), &x);
    }

    #[test]
    fn test_constrain_for_all_labels_instances() {
        let mut p = Problem::minimize();
        p.new_family(
            "x",
            &[Generator::list("i", [1, 2, 3])],
            &VariableOptions::new(),
            &DataContext::new(),
        )
        .unwrap();
        let ids = p
            .constrain_for_all(
                &var("x", ["i"]),
                Comparison::Le,
                &Expr::Const(1.0),
                &[Generator::list("i", [1, 2, 3])],
                &Scope::empty(),
                "cap",
            )
            .unwrap();
        assert_eq!(ids, vec!["c00000_cap_1", "c00001_cap_2", "c00002_cap_3"]);

        let before = p.num_constraints();
        let err = p
            .constrain_for_all(
                &var("x", ["i"]),
                Comparison::Le,
                &Expr::Const(1.0),
                &[Generator::list("i", [3, 4])],
                &Scope::empty(),
                "cap",
            )
            .unwrap_err();
        assert!(err.to_string().contains("i = 4"));
        assert_eq!(p.num_constraints(), before);
    }

    #[test]
    fn test_feasibility_check() {
        let mut p = Problem::minimize();
        let x = p
            .new_variable("x", &VariableOptions::new().integer().bounds(0.0, 3.0))
            .unwrap();
        p.add_constraint(Constraint::geq(&x, &Polynomial::constant(1.0)));
        let name = x.as_variable().unwrap().to_string();

        let ok = HashMap::from([(name.clone(), 2.0)]);
        let fractional = HashMap::from([(name.clone(), 1.5)]);
        let below = HashMap::from([(name, 0.0)]);
        assert!(p.is_feasible(&ok, 1e-9).unwrap());
        assert!(!p.is_feasible(&fractional, 1e-9).unwrap());
        assert!(!p.is_feasible(&below, 1e-9).unwrap());
        assert!(p.is_feasible(&HashMap::new(), 1e-9).is_err());
    }
}
