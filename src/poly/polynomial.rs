//! Sparse multivariate polynomial with exact term merging.
//!
//! A polynomial maps each `Term` to its coefficient. Zero coefficients are
//! never stored, the constant lives under the empty term, and the map is
//! ordered so that two polynomials built in different orders compare equal.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::term::Term;
use crate::error::{ModelError, Result};

/// A sparse polynomial over named variables.
///
/// All operations are pure and return new instances. The algebra is
/// general-degree; the degree <= 2 cap is enforced only when a model is
/// handed to a solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polynomial {
    terms: BTreeMap<Term, f64>,
}

impl Polynomial {
    /// The zero polynomial (empty map).
    pub fn zero() -> Self {
        Polynomial::default()
    }

    /// A constant polynomial. `constant(0.0)` is the zero polynomial.
    pub fn constant(value: f64) -> Self {
        let mut terms = BTreeMap::new();
        if value != 0.0 {
            terms.insert(Term::constant(), value);
        }
        Polynomial { terms }
    }

    /// A monomial for a single variable with coefficient 1.
    pub fn variable(name: impl Into<String>) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(Term::variable(name), 1.0);
        Polynomial { terms }
    }

    /// Build from (term, coefficient) pairs, merging like terms.
    pub fn from_terms(pairs: impl IntoIterator<Item = (Term, f64)>) -> Self {
        let mut terms = BTreeMap::new();
        for (term, coeff) in pairs {
            accumulate(&mut terms, term, coeff);
        }
        Polynomial { terms }
    }

    /// Sum of two polynomials.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut terms = self.terms.clone();
        for (term, coeff) in &other.terms {
            accumulate(&mut terms, term.clone(), *coeff);
        }
        Polynomial { terms }
    }

    /// Difference of two polynomials.
    pub fn subtract(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.scale(-1.0))
    }

    /// Multiply every coefficient by a scalar.
    pub fn scale(&self, k: f64) -> Polynomial {
        if k == 0.0 {
            return Polynomial::zero();
        }
        let terms = self
            .terms
            .iter()
            .map(|(t, c)| (t.clone(), c * k))
            .filter(|(_, c)| *c != 0.0)
            .collect();
        Polynomial { terms }
    }

    /// Negation.
    pub fn negate(&self) -> Polynomial {
        self.scale(-1.0)
    }

    /// Product of two polynomials.
    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        let mut terms = BTreeMap::new();
        for (ta, ca) in &self.terms {
            for (tb, cb) in &other.terms {
                accumulate(&mut terms, ta.product(tb), ca * cb);
            }
        }
        Polynomial { terms }
    }

    /// Divide by a polynomial that reduces to a non-zero constant.
    pub fn divide_by(&self, divisor: &Polynomial) -> Result<Polynomial> {
        let k = divisor
            .constant_value()
            .ok_or_else(|| ModelError::NonConstantDivisor(divisor.to_string()))?;
        if k == 0.0 {
            return Err(ModelError::DivisionByZero);
        }
        Ok(self.scale(1.0 / k))
    }

    /// Replace every occurrence of `name` by `replacement`.
    pub fn substitute(&self, name: &str, replacement: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for (term, coeff) in &self.terms {
            let mut product = Polynomial::constant(*coeff);
            let mut rest = Vec::with_capacity(term.degree());
            for var in term.names() {
                if var == name {
                    product = product.multiply(replacement);
                } else {
                    rest.push(var.clone());
                }
            }
            let rest = Polynomial::from_terms([(Term::from_names(rest), 1.0)]);
            result = Polynomial::add(&result, &product.multiply(&rest));
        }
        result
    }

    /// Size of the largest term (0 for constants and for zero).
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Term::degree).max().unwrap_or(0)
    }

    /// Distinct variable names appearing in any term.
    pub fn variables(&self) -> BTreeSet<String> {
        self.terms
            .keys()
            .flat_map(|t| t.names().iter().cloned())
            .collect()
    }

    /// Check if no variable terms are present.
    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(Term::is_constant)
    }

    /// Check if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The numeric value if the polynomial is constant.
    pub fn constant_value(&self) -> Option<f64> {
        if self.is_constant() {
            Some(self.constant_term())
        } else {
            None
        }
    }

    /// The coefficient of the empty term (0 if absent).
    pub fn constant_term(&self) -> f64 {
        self.coefficient(&Term::constant())
    }

    /// Separate the constant term from the variable part.
    pub fn split_constant(&self) -> (f64, Polynomial) {
        let mut terms = self.terms.clone();
        let constant = terms.remove(&Term::constant()).unwrap_or(0.0);
        (constant, Polynomial { terms })
    }

    /// Coefficient of a term (0 if absent).
    pub fn coefficient(&self, term: &Term) -> f64 {
        self.terms.get(term).copied().unwrap_or(0.0)
    }

    /// Iterate over (term, coefficient) pairs in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = (&Term, f64)> {
        self.terms.iter().map(|(t, c)| (t, *c))
    }

    /// Number of stored terms, constant included.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Degree-1 terms as (variable, coefficient).
    pub fn linear_terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms
            .iter()
            .filter(|(t, _)| t.degree() == 1)
            .map(|(t, c)| (t.names()[0].as_str(), *c))
    }

    /// Degree-2 terms as (first variable, second variable, coefficient).
    pub fn quadratic_terms(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.terms
            .iter()
            .filter(|(t, _)| t.degree() == 2)
            .map(|(t, c)| (t.names()[0].as_str(), t.names()[1].as_str(), *c))
    }

    /// If this polynomial is exactly one variable with coefficient 1, its name.
    pub fn as_variable(&self) -> Option<&str> {
        match self.terms.iter().next() {
            Some((t, c)) if self.terms.len() == 1 && t.degree() == 1 && *c == 1.0 => {
                Some(t.names()[0].as_str())
            }
            _ => None,
        }
    }

    /// Evaluate under a full assignment. Unassigned variables are an error.
    pub fn evaluate(&self, values: &HashMap<String, f64>) -> Result<f64> {
        let mut total = 0.0;
        for (term, coeff) in &self.terms {
            let mut product = *coeff;
            for name in term.names() {
                let v = values
                    .get(name)
                    .ok_or_else(|| ModelError::UndefinedVariable(name.clone()))?;
                product *= v;
            }
            total += product;
        }
        Ok(total)
    }
}

/// Add `coeff` to the entry for `term`, removing it if it cancels.
fn accumulate(terms: &mut BTreeMap<Term, f64>, term: Term, coeff: f64) {
    if coeff == 0.0 {
        return;
    }
    let sum = terms.get(&term).copied().unwrap_or(0.0) + coeff;
    if sum == 0.0 {
        terms.remove(&term);
    } else {
        terms.insert(term, sum);
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (term, coeff)) in self.terms.iter().enumerate() {
            let magnitude = coeff.abs();
            if i == 0 {
                if *coeff < 0.0 {
                    write!(f, "-")?;
                }
            } else if *coeff < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            if term.is_constant() {
                write!(f, "{}", magnitude)?;
            } else if magnitude == 1.0 {
                write!(f, "{}", term)?;
            } else {
                write!(f, "{} {}", magnitude, term)?;
            }
        }
        Ok(())
    }
}

impl From<f64> for Polynomial {
    fn from(value: f64) -> Self {
        Polynomial::constant(value)
    }
}

// Operator overloading, owned and borrowed

impl Add for Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: Polynomial) -> Polynomial {
        Polynomial::add(&self, &rhs)
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::add(self, rhs)
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: Polynomial) -> Polynomial {
        self.subtract(&rhs)
    }
}

impl Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: &Polynomial) -> Polynomial {
        self.subtract(rhs)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: Polynomial) -> Polynomial {
        self.multiply(&rhs)
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        self.multiply(rhs)
    }
}

impl Mul<f64> for Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: f64) -> Polynomial {
        self.scale(rhs)
    }
}

impl Mul<Polynomial> for f64 {
    type Output = Polynomial;
    fn mul(self, rhs: Polynomial) -> Polynomial {
        rhs.scale(self)
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        self.negate()
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Polynomial {
        Polynomial::variable("x")
    }

    fn y() -> Polynomial {
        Polynomial::variable("y")
    }

    #[test]
    fn test_variable_monomial() {
        let p = x();
        assert_eq!(p.degree(), 1);
        assert_eq!(p.num_terms(), 1);
        assert_eq!(p.constant_term(), 0.0);
        assert_eq!(p.coefficient(&Term::variable("x")), 1.0);
    }

    #[test]
    fn test_constant_zero_is_empty() {
        assert!(Polynomial::constant(0.0).is_zero());
        assert_eq!(Polynomial::constant(3.0).constant_value(), Some(3.0));
        assert_eq!(Polynomial::constant(3.0).degree(), 0);
    }

    #[test]
    fn test_like_terms_merge() {
        let p = x().add(x());
        assert_eq!(p.num_terms(), 1);
        assert_eq!(p.coefficient(&Term::variable("x")), 2.0);
    }

    #[test]
    fn test_cancellation_drops_term() {
        let p = x().add(y()).subtract(&x());
        assert_eq!(p, y());
        assert!(x().subtract(&x()).is_zero());
    }

    #[test]
    fn test_multiply_is_canonical() {
        let xy = x().multiply(&y());
        let yx = y().multiply(&x());
        assert_eq!(xy, yx);
        assert_eq!(xy.degree(), 2);
        assert_eq!(xy.coefficient(&Term::from_names(["x", "y"])), 1.0);
    }

    #[test]
    fn test_scale_by_zero() {
        assert!(x().add(Polynomial::constant(4.0)).scale(0.0).is_zero());
    }

    #[test]
    fn test_divide_by_constant() {
        let p = x().scale(4.0);
        let q = p.divide_by(&Polynomial::constant(2.0)).unwrap();
        assert_eq!(q, x().scale(2.0));
    }

    #[test]
    fn test_divide_by_variable_fails() {
        let err = x().divide_by(&y()).unwrap_err();
        assert!(matches!(err, ModelError::NonConstantDivisor(_)));
        let err = x().divide_by(&Polynomial::zero()).unwrap_err();
        assert!(matches!(err, ModelError::DivisionByZero));
    }

    #[test]
    fn test_split_constant() {
        let p = x().scale(2.0).add(Polynomial::constant(5.0));
        let (c, rest) = p.split_constant();
        assert_eq!(c, 5.0);
        assert_eq!(rest, x().scale(2.0));
    }

    #[test]
    fn test_substitute() {
        // (x*y + x) with x := y + 1  ->  y*y + 2y + 1
        let p = x().multiply(&y()).add(x());
        let q = p.substitute("x", &y().add(Polynomial::constant(1.0)));
        let expected = y()
            .multiply(&y())
            .add(y().scale(2.0))
            .add(Polynomial::constant(1.0));
        assert_eq!(q, expected);
    }

    #[test]
    fn test_evaluate_requires_all_values() {
        let p = x().scale(3.0).add(Polynomial::constant(1.0));
        let mut values = HashMap::new();
        values.insert("x".to_string(), 2.0);
        assert_eq!(p.evaluate(&values).unwrap(), 7.0);

        let err = y().evaluate(&values).unwrap_err();
        assert!(matches!(err, ModelError::UndefinedVariable(name) if name == "y"));
    }

    #[test]
    fn test_variables_set() {
        let p = x().multiply(&y()).add(x());
        let vars: Vec<_> = p.variables().into_iter().collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_display() {
        let p = x().scale(2.0).subtract(&y()).add(Polynomial::constant(-3.0));
        assert_eq!(p.to_string(), "-3 + 2 x - y");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }

    #[test]
    fn test_operators() {
        let p = &x() + &y();
        let q = 2.0 * (x() - y());
        assert_eq!((-&p).coefficient(&Term::variable("x")), -1.0);
        assert_eq!(q.coefficient(&Term::variable("y")), -2.0);
        assert_eq!((x() * y()).degree(), 2);
    }

    #[test]
    fn test_as_variable() {
        assert_eq!(x().as_variable(), Some("x"));
        assert_eq!(x().scale(2.0).as_variable(), None);
        assert_eq!(x().add(y()).as_variable(), None);
    }
}
