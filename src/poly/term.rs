//! Monomial terms: products of variable names.

use std::fmt;

/// A product of variables, stored as a sorted multiset of names.
///
/// The empty term is the constant term. Sorting on construction is what
/// makes `x*y` and `y*x` the same map key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term(Vec<String>);

impl Term {
    /// The empty (constant) term.
    pub fn constant() -> Self {
        Term(Vec::new())
    }

    /// A single-variable term.
    pub fn variable(name: impl Into<String>) -> Self {
        Term(vec![name.into()])
    }

    /// Build a term from any list of names, canonicalizing the order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        Term(names)
    }

    /// Product of two terms.
    pub fn product(&self, other: &Term) -> Term {
        let mut names = Vec::with_capacity(self.0.len() + other.0.len());
        names.extend(self.0.iter().cloned());
        names.extend(other.0.iter().cloned());
        names.sort();
        Term(names)
    }

    /// Number of variable factors (with multiplicity).
    pub fn degree(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the constant term.
    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    /// The variable names, sorted.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Check whether a variable occurs in this term.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        write!(f, "{}", self.0.join("*"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_is_sorted() {
        let xy = Term::variable("y").product(&Term::variable("x"));
        assert_eq!(xy, Term::from_names(["x", "y"]));
        assert_eq!(xy.degree(), 2);
    }

    #[test]
    fn test_constant_term() {
        let c = Term::constant();
        assert!(c.is_constant());
        assert_eq!(c.degree(), 0);
        assert_eq!(c.product(&Term::variable("x")), Term::variable("x"));
    }

    #[test]
    fn test_multiset_keeps_repeats() {
        let xx = Term::variable("x").product(&Term::variable("x"));
        assert_eq!(xx.names(), &["x".to_string(), "x".to_string()]);
        assert_eq!(xx.to_string(), "x*x");
    }
}
