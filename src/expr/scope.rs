//! Generator bindings and the external data context.
//!
//! Free identifiers are never looked up in ambient state: a `Scope` carries
//! the generator bindings in effect plus an explicit `DataContext`.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::model::{format_index, Index};

static EMPTY_DATA: DataContext = DataContext::new();

/// Named constants a model is built against.
///
/// ```
/// use milpc::expr::DataContext;
///
/// let data = DataContext::new()
///     .with_domain("products", [1, 2, 3])
///     .with_table("cost", [(vec![1], 4.0), (vec![2], 2.5), (vec![3], 7.0)])
///     .with_scalar("budget", 100.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataContext {
    scalars: BTreeMap<String, f64>,
    domains: BTreeMap<String, Vec<i64>>,
    tables: BTreeMap<String, BTreeMap<Index, f64>>,
}

impl DataContext {
    /// An empty context.
    pub const fn new() -> Self {
        DataContext {
            scalars: BTreeMap::new(),
            domains: BTreeMap::new(),
            tables: BTreeMap::new(),
        }
    }

    /// Add a named scalar.
    pub fn with_scalar(mut self, name: impl Into<String>, value: f64) -> Self {
        self.scalars.insert(name.into(), value);
        self
    }

    /// Add a named domain of index values.
    pub fn with_domain(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = i64>,
    ) -> Self {
        self.domains.insert(name.into(), values.into_iter().collect());
        self
    }

    /// Add a named parameter table keyed by index tuples.
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (Index, f64)>,
    ) -> Self {
        self.tables.insert(name.into(), entries.into_iter().collect());
        self
    }

    /// Look up a scalar.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).copied()
    }

    /// Look up a domain.
    pub fn domain(&self, name: &str) -> Result<&[i64]> {
        self.domains
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ModelError::UnknownParameter(name.to_string()))
    }

    /// Look up a parameter. A zero-arity lookup also accepts a scalar.
    pub fn param(&self, name: &str, index: &[i64]) -> Result<f64> {
        if index.is_empty() {
            if let Some(v) = self.scalar(name) {
                return Ok(v);
            }
        }
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| ModelError::UnknownParameter(name.to_string()))?;
        table
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::UnknownParameter(format!("{}{}", name, format_index(index))))
    }
}

/// Generator bindings in effect plus the data context.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    bindings: Vec<(String, i64)>,
    data: &'a DataContext,
}

impl Scope<'static> {
    /// A scope with no bindings and no data.
    pub fn empty() -> Self {
        Scope {
            bindings: Vec::new(),
            data: &EMPTY_DATA,
        }
    }
}

impl<'a> Scope<'a> {
    /// A scope with no bindings over `data`.
    pub fn new(data: &'a DataContext) -> Self {
        Scope {
            bindings: Vec::new(),
            data,
        }
    }

    /// A new scope with `symbol` bound to `value`, shadowing earlier bindings.
    pub fn bind(&self, symbol: impl Into<String>, value: i64) -> Scope<'a> {
        let mut bindings = self.bindings.clone();
        bindings.push((symbol.into(), value));
        Scope {
            bindings,
            data: self.data,
        }
    }

    /// The innermost value bound to `symbol`.
    pub fn lookup(&self, symbol: &str) -> Option<i64> {
        self.bindings
            .iter()
            .rev()
            .find(|(s, _)| s == symbol)
            .map(|(_, v)| *v)
    }

    /// The data context.
    pub fn data(&self) -> &'a DataContext {
        self.data
    }

    /// Check if no symbols are bound.
    pub fn is_unbound(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Render the bindings as `i = 1, j = 2` (innermost binding per symbol).
    pub fn describe(&self) -> String {
        let mut seen: Vec<&str> = Vec::new();
        let mut parts = Vec::new();
        for (s, v) in self.bindings.iter().rev() {
            if !seen.contains(&s.as_str()) {
                seen.push(s);
                parts.push(format!("{} = {}", s, v));
            }
        }
        parts.reverse();
        parts.join(", ")
    }
}

impl Default for Scope<'static> {
    fn default() -> Self {
        Scope::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing() {
        let scope = Scope::empty().bind("i", 1).bind("j", 2).bind("i", 3);
        assert_eq!(scope.lookup("i"), Some(3));
        assert_eq!(scope.lookup("j"), Some(2));
        assert_eq!(scope.lookup("k"), None);
        assert_eq!(scope.describe(), "j = 2, i = 3");
    }

    #[test]
    fn test_param_lookup() {
        let data = DataContext::new()
            .with_table("cost", [(vec![1], 4.0)])
            .with_scalar("budget", 10.0);
        assert_eq!(data.param("cost", &[1]).unwrap(), 4.0);
        assert_eq!(data.param("budget", &[]).unwrap(), 10.0);
        assert!(matches!(
            data.param("cost", &[2]),
            Err(ModelError::UnknownParameter(_))
        ));
        assert!(data.domain("missing").is_err());
    }
}
