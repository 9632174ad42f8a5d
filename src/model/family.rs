//! Indexed variable families and wildcard patterns.
//!
//! A family is a convenience index from integer tuples to variable
//! monomials. Definitions (bounds, type) live in the problem's registry;
//! the family only answers "which variable sits at this index".

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ModelError, Result};
use crate::poly::Polynomial;

/// A concrete index tuple. The empty tuple indexes a scalar.
pub type Index = Vec<i64>;

/// Render an index tuple as `(1, 2)`; the empty tuple renders as nothing.
pub fn format_index(index: &[i64]) -> String {
    if index.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = index.iter().map(|v| v.to_string()).collect();
    format!("({})", parts.join(", "))
}

/// One component of a resolved index pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternComponent {
    /// Matches exactly this value.
    Value(i64),
    /// Matches anything.
    Wildcard,
    /// An unbound symbol; never matches.
    Opaque(String),
}

impl fmt::Display for PatternComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternComponent::Value(v) => write!(f, "{}", v),
            PatternComponent::Wildcard => write!(f, "_"),
            PatternComponent::Opaque(s) => write!(f, "{}", s),
        }
    }
}

/// An index template with wildcard components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern(pub Vec<PatternComponent>);

impl Pattern {
    /// A pattern matching exactly one index.
    pub fn exact(index: &[i64]) -> Self {
        Pattern(index.iter().map(|v| PatternComponent::Value(*v)).collect())
    }

    /// Component-wise match; arity mismatch is a non-match.
    pub fn matches(&self, index: &[i64]) -> bool {
        self.0.len() == index.len()
            && self.0.iter().zip(index).all(|(p, v)| match p {
                PatternComponent::Wildcard => true,
                PatternComponent::Value(x) => x == v,
                PatternComponent::Opaque(_) => false,
            })
    }

    /// Check if any component is a wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.0.iter().any(|c| matches!(c, PatternComponent::Wildcard))
    }

    /// The concrete index, if every component is a value.
    pub fn as_index(&self) -> Option<Index> {
        self.0
            .iter()
            .map(|c| match c {
                PatternComponent::Value(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Number of components.
    pub fn arity(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// A named family of indexed variables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Family {
    name: String,
    entries: BTreeMap<Index, Polynomial>,
}

impl Family {
    /// An empty family.
    pub fn new(name: impl Into<String>) -> Self {
        Family {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Build from index/monomial pairs.
    pub fn from_entries(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (Index, Polynomial)>,
    ) -> Self {
        Family {
            name: name.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Family name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, index: Index, poly: Polynomial) {
        self.entries.insert(index, poly);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the family has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Arity of the stored indices (taken from the first entry).
    pub fn arity(&self) -> Option<usize> {
        self.entries.keys().next().map(Vec::len)
    }

    /// Iterate entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&Index, &Polynomial)> {
        self.entries.iter()
    }

    /// Exact lookup. Missing entries and arity mismatches are errors.
    pub fn lookup(&self, index: &[i64]) -> Result<&Polynomial> {
        if let Some(arity) = self.arity() {
            if arity != index.len() {
                return Err(ModelError::ArityMismatch {
                    family: self.name.clone(),
                    expected: arity,
                    got: index.len(),
                });
            }
        }
        self.entries
            .get(index)
            .ok_or_else(|| ModelError::IndexNotFound {
                family: self.name.clone(),
                index: format_index(index),
            })
    }

    /// All entries matching a pattern, in index order.
    pub fn matching<'a>(
        &'a self,
        pattern: &'a Pattern,
    ) -> impl Iterator<Item = (&'a Index, &'a Polynomial)> + 'a {
        self.entries.iter().filter(move |(idx, _)| pattern.matches(idx))
    }

    /// Sum of all entries matching a pattern; zero if none match.
    pub fn sum_matching(&self, pattern: &Pattern) -> Polynomial {
        self.matching(pattern)
            .fold(Polynomial::zero(), |acc, (_, p)| acc.add(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Family {
        let mut fam = Family::new("x");
        for i in 1..=2 {
            for j in 1..=2 {
                fam.insert(vec![i, j], Polynomial::variable(format!("x_{}_{}", i, j)));
            }
        }
        fam
    }

    #[test]
    fn test_sum_matching_first_component() {
        let fam = grid();
        let pattern = Pattern(vec![PatternComponent::Value(1), PatternComponent::Wildcard]);
        let sum = fam.sum_matching(&pattern);
        let expected = Polynomial::variable("x_1_1").add(&Polynomial::variable("x_1_2"));
        assert_eq!(sum, expected);
    }

    #[test]
    fn test_arity_mismatch_is_non_match() {
        let fam = grid();
        let pattern = Pattern(vec![PatternComponent::Wildcard]);
        assert!(fam.sum_matching(&pattern).is_zero());
    }

    #[test]
    fn test_opaque_never_matches() {
        let fam = grid();
        let pattern = Pattern(vec![
            PatternComponent::Opaque("k".into()),
            PatternComponent::Wildcard,
        ]);
        assert_eq!(fam.matching(&pattern).count(), 0);
    }

    #[test]
    fn test_lookup_errors() {
        let fam = grid();
        assert!(fam.lookup(&[2, 1]).is_ok());
        assert!(matches!(
            fam.lookup(&[3, 1]),
            Err(ModelError::IndexNotFound { .. })
        ));
        assert!(matches!(
            fam.lookup(&[1]),
            Err(ModelError::ArityMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_display() {
        let pattern = Pattern(vec![PatternComponent::Value(1), PatternComponent::Wildcard]);
        assert_eq!(pattern.to_string(), "(1, _)");
        assert_eq!(format_index(&[3, 4]), "(3, 4)");
        assert_eq!(format_index(&[]), "");
    }
}
