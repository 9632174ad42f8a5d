//! Deterministic auxiliary-variable names.
//!
//! An auxiliary is named after what it stands for: the construct kind, the
//! context tag, and a SHA-256 digest over the canonical operand polynomials
//! and any numeric parameters. The same construct over the same operands in
//! the same context always gets the same name.

use sha2::{Digest, Sha256};

use crate::poly::Polynomial;
use crate::problem::sanitize;

/// Number of hex digits of the digest kept in a name.
const DIGEST_HEX_LEN: usize = 12;

/// The constructs that introduce auxiliaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Abs,
    Max,
    Min,
    And,
    Or,
    IfThenElse,
    Piecewise,
}

impl Construct {
    /// Short name used as the auxiliary prefix.
    pub fn name(self) -> &'static str {
        match self {
            Construct::Abs => "abs",
            Construct::Max => "max",
            Construct::Min => "min",
            Construct::And => "and",
            Construct::Or => "or",
            Construct::IfThenElse => "ite",
            Construct::Piecewise => "pwl",
        }
    }
}

/// Name of the auxiliary standing for `construct` over `operands`.
///
/// Operands are hashed in order; `params` carries extra numeric data such as
/// piecewise breakpoints.
pub fn aux_name(
    construct: Construct,
    context: &str,
    operands: &[&Polynomial],
    params: &[f64],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(construct.name().as_bytes());
    hasher.update([0u8]);
    hasher.update(context.as_bytes());
    hasher.update([0u8]);
    for operand in operands {
        hash_polynomial(&mut hasher, operand);
        hasher.update([1u8]);
    }
    for p in params {
        hasher.update(p.to_bits().to_le_bytes());
    }
    let hex: String = hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    let digest = &hex[..DIGEST_HEX_LEN];

    let tag = sanitize(context);
    if tag.is_empty() {
        format!("{}_{}", construct.name(), digest)
    } else {
        format!("{}_{}_{}", construct.name(), tag, digest)
    }
}

// Terms iterate in sorted order, so equal polynomials hash equally.
fn hash_polynomial(hasher: &mut Sha256, poly: &Polynomial) {
    for (term, coeff) in poly.terms() {
        for name in term.names() {
            hasher.update(name.as_bytes());
            hasher.update([b'*']);
        }
        hasher.update(coeff.to_bits().to_le_bytes());
        hasher.update([b';']);
    }
}
