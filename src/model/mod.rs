//! Model data types.
//!
//! This module holds the records a `Problem` accumulates:
//! - `VariableDef` / `VariableOptions` - variable registry entries and their builder
//! - `Constraint` / `Comparison` - normalized constraints
//! - `Family` / `Pattern` - the indexed variable store and its pattern matching

pub mod constraint;
pub mod family;
pub mod variable;

pub use constraint::{Comparison, Constraint};
pub use family::{format_index, Family, Index, Pattern, PatternComponent};
pub use variable::{VarType, VariableDef, VariableOptions};
