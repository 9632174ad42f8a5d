//! Error types for milpc.

use thiserror::Error;

/// Error type for model construction, linearization and solving.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A variable name was referenced that the model never registered.
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    /// An indexed family was referenced that was never declared.
    #[error("Undefined variable family: {0}")]
    UndefinedFamily(String),

    /// A concrete index tuple has no entry in its family.
    #[error("Variable {family}{index} not found")]
    IndexNotFound { family: String, index: String },

    /// A pattern matched nothing where at least one match is required.
    #[error("{construct} over {family}{pattern} matched no variables")]
    EmptyPattern {
        construct: &'static str,
        family: String,
        pattern: String,
    },

    /// Index arity differs from the family's stored arity in a single-item lookup.
    #[error("Index arity mismatch for {family}: expected {expected}, got {got}")]
    ArityMismatch {
        family: String,
        expected: usize,
        got: usize,
    },

    /// Breakpoints, slopes and intercepts of a piecewise-linear function disagree.
    #[error("Piecewise-linear shape mismatch: {0}")]
    PiecewiseShape(String),

    /// A variadic construct received fewer operands than it needs.
    #[error("{construct} requires at least {expected} operands, got {got}")]
    TooFewOperands {
        construct: &'static str,
        expected: usize,
        got: usize,
    },

    /// Division by a polynomial that does not reduce to a number.
    #[error("Cannot divide by non-constant polynomial {0}")]
    NonConstantDivisor(String),

    /// Division by the constant zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// The solver boundary only accepts degree <= 2.
    #[error("{location} has degree {degree}; at most 2 is supported")]
    DegreeTooHigh { location: String, degree: usize },

    /// A problem was built without an optimization direction.
    #[error("Problem requires an explicit direction (minimize or maximize)")]
    MissingDirection,

    /// Unrecognized direction string.
    #[error("Unknown optimization direction: {0}")]
    InvalidDirection(String),

    /// A variable name is already registered.
    #[error("Variable {0} is already defined")]
    DuplicateVariable(String),

    /// A family name is already declared.
    #[error("Variable family {0} is already defined")]
    DuplicateFamily(String),

    /// A symbol was used where a bound value is required.
    #[error("Unbound symbol: {0}")]
    UnboundSymbol(String),

    /// A generator or domain could not be expanded.
    #[error("Invalid generator: {0}")]
    InvalidGenerator(String),

    /// A name was not found in the external data context.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A computed index did not evaluate to an integer.
    #[error("Index expression {0} is not an integer")]
    NonIntegralIndex(String),

    /// Lower bound above upper bound.
    #[error("Invalid bounds for {name}: lower {lower} > upper {upper}")]
    InvalidBounds { name: String, lower: f64, upper: f64 },

    /// A feature outside what the chosen backend accepts.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Solver failure.
    #[error("Solver error: {0}")]
    Solver(String),

    /// An error raised while evaluating under generator bindings.
    #[error("{source} (with {context})")]
    InContext {
        context: String,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    /// Attach the bindings in scope to an error, unless it already carries them.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let context = context.into();
        match self {
            err @ ModelError::InContext { .. } => err,
            err if context.is_empty() => err,
            err => ModelError::InContext {
                context,
                source: Box::new(err),
            },
        }
    }

    /// The innermost error, skipping binding context wrappers.
    pub fn root(&self) -> &ModelError {
        match self {
            ModelError::InContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for milpc operations.
pub type Result<T> = std::result::Result<T, ModelError>;
