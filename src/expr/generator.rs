//! Generator expansion.
//!
//! A list of generators expands to the Cartesian product of their domains in
//! declaration order, first generator outermost. Each combination becomes a
//! `Scope` extended with the generator symbols.

use tracing::trace;

use super::eval::eval_constant;
use super::expression::{Domain, Generator};
use super::scope::Scope;
use crate::error::{ModelError, Result};

/// Evaluate a domain to its concrete values under `scope`.
pub fn domain_values(domain: &Domain, scope: &Scope<'_>) -> Result<Vec<i64>> {
    match domain {
        Domain::List(values) => Ok(values.clone()),
        Domain::Data(name) => Ok(scope.data().domain(name)?.to_vec()),
        Domain::Range(lo, hi) => {
            let lo = integral(eval_constant(lo, scope)?, domain)?;
            let hi = integral(eval_constant(hi, scope)?, domain)?;
            Ok((lo..=hi).collect())
        }
    }
}

fn integral(value: f64, domain: &Domain) -> Result<i64> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(ModelError::InvalidGenerator(format!(
            "range bound {} of {} is not an integer",
            value, domain
        )));
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(ModelError::InvalidGenerator(format!(
            "range bound {} of {} is out of range",
            value, domain
        )));
    }
    Ok(value as i64)
}

/// Expand generators into one scope per combination, in nested-loop order.
///
/// Later domains may refer to earlier symbols (e.g. `j <- i..3`), so each
/// domain is evaluated under the bindings of the generators before it.
pub fn expand<'a>(generators: &[Generator], scope: &Scope<'a>) -> Result<Vec<Scope<'a>>> {
    if generators.is_empty() {
        return Err(ModelError::InvalidGenerator(
            "sum requires at least one generator".into(),
        ));
    }
    let mut scopes = vec![scope.clone()];
    for generator in generators {
        if generator.symbol.is_empty() || generator.symbol == "_" {
            return Err(ModelError::InvalidGenerator(format!(
                "cannot bind symbol '{}'",
                generator.symbol
            )));
        }
        let mut next = Vec::new();
        for outer in &scopes {
            let values = domain_values(&generator.domain, outer)
                .map_err(|e| e.with_context(outer.describe()))?;
            for value in values {
                next.push(outer.bind(generator.symbol.clone(), value));
            }
        }
        trace!(symbol = %generator.symbol, combinations = next.len(), "expanded generator");
        scopes = next;
    }
    Ok(scopes)
}
