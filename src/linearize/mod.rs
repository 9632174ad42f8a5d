//! Linearization of non-linear constructs.
//!
//! This module rewrites abs, max, min, and, or, if-then-else and
//! piecewise-linear nodes into auxiliary variables plus linear constraints:
//! - `Linearizer` - the entry point, pure (`apply`) or committing (`transform`)
//! - `LinearizeConfig` - big-M settings and the naming context tag
//! - `fingerprint` - deterministic auxiliary-variable names
//! - `big_m` - bound-derived big-M constants

pub mod big_m;
pub mod config;
pub mod fingerprint;
pub mod transformer;

pub use config::LinearizeConfig;
pub use fingerprint::{aux_name, Construct};
pub use transformer::Linearizer;
