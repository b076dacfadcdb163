use std::collections::BTreeMap;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Per-session settings of an [`Interpreter`](super::interpreter::Interpreter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Nested calls of script functions allowed before `StackOverflow`.
    pub max_call_depth: usize,
    /// Session environment variables, visible to scripts through `env`.
    pub env_vars: BTreeMap<String, String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            env_vars: BTreeMap::new(),
        }
    }
}

impl EvalConfig {
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_env_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env_vars.extend(vars);
        self
    }
}
