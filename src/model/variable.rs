//! Variable definitions with builder-style options.

use std::fmt;

use crate::error::{ModelError, Result};

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VarType {
    /// Real-valued.
    #[default]
    Continuous,
    /// Integer-valued.
    Integer,
    /// Restricted to {0, 1}.
    Binary,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Continuous => write!(f, "continuous"),
            VarType::Integer => write!(f, "integer"),
            VarType::Binary => write!(f, "binary"),
        }
    }
}

/// Options for creating a variable.
///
/// ```
/// use milpc::model::VariableOptions;
///
/// let opts = VariableOptions::new().integer().bounds(0.0, 10.0);
/// let flag = VariableOptions::new().binary();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableOptions {
    kind: VarType,
    lower: Option<f64>,
    upper: Option<f64>,
}

impl VariableOptions {
    /// Continuous and unbounded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the variable continuous.
    pub fn continuous(mut self) -> Self {
        self.kind = VarType::Continuous;
        self
    }

    /// Make the variable integer.
    pub fn integer(mut self) -> Self {
        self.kind = VarType::Integer;
        self
    }

    /// Make the variable binary (bounds are implied).
    pub fn binary(mut self) -> Self {
        self.kind = VarType::Binary;
        self
    }

    /// Set the lower bound.
    pub fn lower(mut self, value: f64) -> Self {
        self.lower = Some(value);
        self
    }

    /// Set the upper bound.
    pub fn upper(mut self, value: f64) -> Self {
        self.upper = Some(value);
        self
    }

    /// Set both bounds.
    pub fn bounds(self, lower: f64, upper: f64) -> Self {
        self.lower(lower).upper(upper)
    }

    /// Non-negative shortcut.
    pub fn nonneg(self) -> Self {
        self.lower(0.0)
    }

    /// The configured kind.
    pub fn kind(&self) -> VarType {
        self.kind
    }

    /// Validate and produce a definition under `name`.
    pub fn define(&self, name: impl Into<String>) -> Result<VariableDef> {
        let name = name.into();
        let (lower, upper) = match self.kind {
            VarType::Binary => (
                Some(self.lower.unwrap_or(0.0).max(0.0)),
                Some(self.upper.unwrap_or(1.0).min(1.0)),
            ),
            _ => (self.lower, self.upper),
        };
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo > hi {
                return Err(ModelError::InvalidBounds {
                    name,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(VariableDef {
            name,
            kind: self.kind,
            lower,
            upper,
        })
    }
}

/// A registered variable. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    /// Unique name, used as the key everywhere.
    pub name: String,
    /// Continuous, integer or binary.
    pub kind: VarType,
    /// Lower bound, if any.
    pub lower: Option<f64>,
    /// Upper bound, if any.
    pub upper: Option<f64>,
}

impl VariableDef {
    /// Bounds as an interval, with infinities for missing sides.
    pub fn interval(&self) -> (f64, f64) {
        (
            self.lower.unwrap_or(f64::NEG_INFINITY),
            self.upper.unwrap_or(f64::INFINITY),
        )
    }

    /// Check whether a value lies within bounds and domain.
    pub fn admits(&self, value: f64, tol: f64) -> bool {
        let (lo, hi) = self.interval();
        if value < lo - tol || value > hi + tol {
            return false;
        }
        match self.kind {
            VarType::Continuous => true,
            VarType::Integer | VarType::Binary => (value - value.round()).abs() <= tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_implies_bounds() {
        let def = VariableOptions::new().binary().define("b").unwrap();
        assert_eq!(def.kind, VarType::Binary);
        assert_eq!(def.interval(), (0.0, 1.0));
    }

    #[test]
    fn test_default_is_free_continuous() {
        let def = VariableOptions::new().define("x").unwrap();
        assert_eq!(def.kind, VarType::Continuous);
        assert_eq!(def.interval(), (f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = VariableOptions::new().bounds(3.0, 1.0).define("x").unwrap_err();
        assert!(matches!(err, ModelError::InvalidBounds { .. }));
    }

    #[test]
    fn test_admits_integrality() {
        let def = VariableOptions::new().integer().bounds(0.0, 5.0).define("n").unwrap();
        assert!(def.admits(3.0, 1e-9));
        assert!(!def.admits(2.5, 1e-9));
        assert!(!def.admits(6.0, 1e-9));
    }
}
