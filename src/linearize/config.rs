//! Linearizer settings.

/// Settings for the linearizer.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearizeConfig {
    /// Global big-M used when no bound-derived constant is available.
    pub big_m: f64,
    /// Derive big-M from variable bounds when every bound involved is finite.
    pub derive_big_m: bool,
    /// Tag mixed into auxiliary names; distinct tags never share auxiliaries.
    pub context: String,
}

impl Default for LinearizeConfig {
    fn default() -> Self {
        LinearizeConfig {
            big_m: 1e6,
            derive_big_m: true,
            context: String::new(),
        }
    }
}

impl LinearizeConfig {
    /// Set the global big-M.
    pub fn big_m(mut self, m: f64) -> Self {
        self.big_m = m;
        self
    }

    /// Enable or disable bound-derived big-M.
    pub fn derive_big_m(mut self, enabled: bool) -> Self {
        self.derive_big_m = enabled;
        self
    }

    /// Set the naming context tag.
    pub fn context(mut self, tag: impl Into<String>) -> Self {
        self.context = tag.into();
        self
    }
}
