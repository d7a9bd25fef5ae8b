//! Interpreter configuration.

use crate::render::RenderOptions;

/// Name of the binding a module evaluates to by default.
pub const DEFAULT_ENTRY: &str = "main";

/// Interpreter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Load the standard prelude on top of the primitives.
    pub prelude: bool,
    /// Binding whose value is the result of a module.
    pub entry: String,
    pub render: RenderOptions,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            prelude: true,
            entry: DEFAULT_ENTRY.to_string(),
            render: RenderOptions::default(),
        }
    }
}

impl InterpreterConfig {
    pub fn with_prelude(mut self, prelude: bool) -> Self {
        self.prelude = prelude;
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.render.max_depth = max_depth;
        self
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InterpreterConfig::default();
        assert!(config.prelude);
        assert_eq!(config.entry, "main");
        assert_eq!(config.render.max_depth, None);
    }

    #[test]
    fn test_builder() {
        let config = InterpreterConfig::default()
            .with_prelude(false)
            .with_entry("start")
            .with_max_depth(Some(4));
        assert!(!config.prelude);
        assert_eq!(config.entry, "start");
        assert_eq!(config.render, RenderOptions::with_max_depth(4));
    }
}
