//! Core expression types for milpc.
//!
//! The `Expr` enum is the closed set of node kinds the analyzer, evaluator
//! and linearizer all match on exhaustively. Expressions are immutable trees
//! using `Arc` for sharing subtrees.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::poly::Polynomial;

/// One index position of a variable or parameter reference.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexExpr {
    /// A literal value.
    Lit(i64),
    /// A symbol resolved through the generator bindings.
    Sym(String),
    /// Matches every value; turns a reference into a sum over the pattern.
    Wildcard,
    /// Index arithmetic such as `i + 1`, evaluated to an integer.
    Computed(Arc<Expr>),
}

impl From<i64> for IndexExpr {
    fn from(v: i64) -> Self {
        IndexExpr::Lit(v)
    }
}

impl From<i32> for IndexExpr {
    fn from(v: i32) -> Self {
        IndexExpr::Lit(v as i64)
    }
}

impl From<&str> for IndexExpr {
    fn from(s: &str) -> Self {
        if s == "_" {
            IndexExpr::Wildcard
        } else {
            IndexExpr::Sym(s.to_string())
        }
    }
}

impl From<Expr> for IndexExpr {
    fn from(e: Expr) -> Self {
        IndexExpr::Computed(Arc::new(e))
    }
}

impl fmt::Display for IndexExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexExpr::Lit(v) => write!(f, "{}", v),
            IndexExpr::Sym(s) => write!(f, "{}", s),
            IndexExpr::Wildcard => write!(f, "_"),
            IndexExpr::Computed(e) => write!(f, "{}", e),
        }
    }
}

/// A reference to a variable family at an index expression list.
#[derive(Debug, Clone, PartialEq)]
pub struct VarRef {
    /// Family name.
    pub family: String,
    /// Index expressions; empty for a scalar.
    pub indices: Vec<IndexExpr>,
}

impl VarRef {
    /// Check if any index is a wildcard (an implicit sum).
    pub fn is_pattern(&self) -> bool {
        self.indices.iter().any(|i| matches!(i, IndexExpr::Wildcard))
    }
}

/// Domain of a generator symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// An explicit list of values.
    List(Vec<i64>),
    /// An inclusive integer range whose bounds are evaluated eagerly.
    Range(Arc<Expr>, Arc<Expr>),
    /// A named domain from the external data context.
    Data(String),
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::List(vs) => {
                let parts: Vec<String> = vs.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Domain::Range(lo, hi) => write!(f, "{}..{}", lo, hi),
            Domain::Data(name) => write!(f, "{}", name),
        }
    }
}

/// A `symbol <- domain` binding of a generator sum.
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    /// Bound symbol.
    pub symbol: String,
    /// Values the symbol ranges over.
    pub domain: Domain,
}

impl Generator {
    /// `symbol <- [values]`.
    pub fn list(symbol: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Generator {
            symbol: symbol.into(),
            domain: Domain::List(values.into_iter().collect()),
        }
    }

    /// `symbol <- lo..hi` (inclusive).
    pub fn range(symbol: impl Into<String>, lo: impl Into<Expr>, hi: impl Into<Expr>) -> Self {
        Generator {
            symbol: symbol.into(),
            domain: Domain::Range(Arc::new(lo.into()), Arc::new(hi.into())),
        }
    }

    /// `symbol <- name` where `name` is a domain in the data context.
    pub fn data(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Generator {
            symbol: symbol.into(),
            domain: Domain::Data(name.into()),
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.symbol, self.domain)
    }
}

/// Piecewise-linear function data.
#[derive(Debug, Clone, PartialEq)]
pub struct Piecewise {
    /// The argument expression.
    pub arg: Arc<Expr>,
    /// Ascending breakpoints; `k + 1` of them for `k` segments.
    pub breakpoints: Vec<f64>,
    /// Per-segment slopes.
    pub slopes: Vec<f64>,
    /// Per-segment intercepts.
    pub intercepts: Vec<f64>,
}

impl Piecewise {
    /// Number of segments.
    pub fn segments(&self) -> usize {
        self.slopes.len()
    }
}

/// The expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // ========== Leaf nodes ==========
    /// A numeric literal.
    Const(f64),
    /// An already-built polynomial (e.g. a variable held by the caller).
    Poly(Polynomial),
    /// A variable reference; wildcard indices make it a sum over the pattern.
    Var(VarRef),
    /// A numeric parameter from the data context.
    Param { name: String, indices: Vec<IndexExpr> },
    /// A bare symbol used as a number (bound generator value or data scalar).
    Sym(String),

    // ========== Linear structure ==========
    /// Sum of `body` over the Cartesian product of the generators.
    Sum {
        body: Arc<Expr>,
        generators: Vec<Generator>,
    },
    /// a + b
    Add(Arc<Expr>, Arc<Expr>),
    /// a - b
    Sub(Arc<Expr>, Arc<Expr>),
    /// a * b
    Mul(Arc<Expr>, Arc<Expr>),
    /// a / b
    Div(Arc<Expr>, Arc<Expr>),
    /// -a
    Neg(Arc<Expr>),

    // ========== Constructs that need linearization ==========
    /// |a|
    Abs(Arc<Expr>),
    /// Maximum of the operands.
    Max(Vec<Arc<Expr>>),
    /// Minimum of the operands.
    Min(Vec<Arc<Expr>>),
    /// Logical AND over 0/1 operands.
    And(Vec<Arc<Expr>>),
    /// Logical OR over 0/1 operands.
    Or(Vec<Arc<Expr>>),
    /// `if cond then a else b` with a 0/1 condition.
    IfThenElse {
        cond: Arc<Expr>,
        then: Arc<Expr>,
        otherwise: Arc<Expr>,
    },
    /// A piecewise-linear function of one argument.
    PiecewiseLinear(Piecewise),
}

impl Expr {
    /// Check if this is a numeric literal.
    pub fn is_constant(&self) -> bool {
        matches!(self, Expr::Const(_))
    }

    /// Names referenced by this expression: variable families, and variables
    /// of embedded polynomials.
    pub fn referenced_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Expr::Const(_) | Expr::Sym(_) => {}
            Expr::Poly(p) => names.extend(p.variables()),
            Expr::Var(v) => {
                names.insert(v.family.clone());
                collect_index_variables(&v.indices, names);
            }
            Expr::Param { indices, .. } => collect_index_variables(indices, names),
            Expr::Sum { body, .. } => body.collect_variables(names),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_variables(names);
                b.collect_variables(names);
            }
            Expr::Neg(a) | Expr::Abs(a) => a.collect_variables(names),
            Expr::Max(args) | Expr::Min(args) | Expr::And(args) | Expr::Or(args) => {
                for a in args {
                    a.collect_variables(names);
                }
            }
            Expr::IfThenElse {
                cond,
                then,
                otherwise,
            } => {
                cond.collect_variables(names);
                then.collect_variables(names);
                otherwise.collect_variables(names);
            }
            Expr::PiecewiseLinear(pw) => pw.arg.collect_variables(names),
        }
    }
}

fn collect_index_variables(indices: &[IndexExpr], names: &mut BTreeSet<String>) {
    for idx in indices {
        if let IndexExpr::Computed(e) = idx {
            e.collect_variables(names);
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, args: &[Arc<Expr>]) -> fmt::Result {
    let parts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    write!(f, "{}({})", name, parts.join(", "))
}

fn write_indices(f: &mut fmt::Formatter<'_>, name: &str, indices: &[IndexExpr]) -> fmt::Result {
    if indices.is_empty() {
        return write!(f, "{}", name);
    }
    let parts: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
    write!(f, "{}({})", name, parts.join(", "))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(v) => write!(f, "{}", v),
            Expr::Poly(p) => write!(f, "[{}]", p),
            Expr::Var(v) => write_indices(f, &v.family, &v.indices),
            Expr::Param { name, indices } => write_indices(f, name, indices),
            Expr::Sym(s) => write!(f, "{}", s),
            Expr::Sum { body, generators } => {
                let gens: Vec<String> = generators.iter().map(|g| g.to_string()).collect();
                write!(f, "sum({} for {})", body, gens.join(", "))
            }
            Expr::Add(a, b) => write!(f, "({} + {})", a, b),
            Expr::Sub(a, b) => write!(f, "({} - {})", a, b),
            Expr::Mul(a, b) => write!(f, "{} * {}", a, b),
            Expr::Div(a, b) => write!(f, "{} / {}", a, b),
            Expr::Neg(a) => write!(f, "-{}", a),
            Expr::Abs(a) => write!(f, "abs({})", a),
            Expr::Max(args) => write_list(f, "max", args),
            Expr::Min(args) => write_list(f, "min", args),
            Expr::And(args) => write_list(f, "and", args),
            Expr::Or(args) => write_list(f, "or", args),
            Expr::IfThenElse {
                cond,
                then,
                otherwise,
            } => write!(f, "if {} then {} else {}", cond, then, otherwise),
            Expr::PiecewiseLinear(pw) => write!(
                f,
                "pwl({}, {:?}, {:?}, {:?})",
                pw.arg, pw.breakpoints, pw.slopes, pw.intercepts
            ),
        }
    }
}

// Convenient From implementations for automatic conversion
impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Const(value as f64)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Const(value as f64)
    }
}

impl From<Polynomial> for Expr {
    fn from(p: Polynomial) -> Self {
        Expr::Poly(p)
    }
}

impl From<&Polynomial> for Expr {
    fn from(p: &Polynomial) -> Self {
        Expr::Poly(p.clone())
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_at(i: &str) -> Expr {
        Expr::Var(VarRef {
            family: "x".into(),
            indices: vec![i.into()],
        })
    }

    #[test]
    fn test_index_from_str() {
        assert_eq!(IndexExpr::from("_"), IndexExpr::Wildcard);
        assert_eq!(IndexExpr::from("i"), IndexExpr::Sym("i".into()));
    }

    #[test]
    fn test_pattern_detection() {
        match x_at("_") {
            Expr::Var(v) => assert!(v.is_pattern()),
            _ => unreachable!(),
        }
        match x_at("i") {
            Expr::Var(v) => assert!(!v.is_pattern()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_referenced_variables() {
        let e = Expr::Add(
            Arc::new(x_at("i")),
            Arc::new(Expr::Poly(Polynomial::variable("y"))),
        );
        let names: Vec<_> = e.referenced_variables().into_iter().collect();
        assert_eq!(names, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_display() {
        let e = Expr::Abs(Arc::new(Expr::Sub(
            Arc::new(x_at("i")),
            Arc::new(Expr::Const(3.0)),
        )));
        assert_eq!(e.to_string(), "abs((x(i) - 3))");
    }
}
