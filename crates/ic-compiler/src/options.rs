//! Per-run compiler configuration.

/// Knobs for one compilation.
///
/// ```
/// use ic_compiler::CompilerOptions;
///
/// let options = CompilerOptions::default().optimize(true);
/// assert!(options.optimize);
/// assert_eq!(options.entry_method, "main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Use the register-pressure-aware generator.
    pub optimize: bool,
    /// Name of the designated entry method.
    pub entry_method: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            optimize: false,
            entry_method: "main".to_string(),
        }
    }
}

impl CompilerOptions {
    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn entry_method(mut self, name: impl Into<String>) -> Self {
        self.entry_method = name.into();
        self
    }
}
