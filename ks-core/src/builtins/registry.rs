use std::{cell::RefCell, collections::BTreeMap, fmt::Display, rc::Rc, sync::OnceLock};

use rustc_hash::FxHashMap;

use crate::{
    environment::prelude::Value,
    eval::prelude::RuntimeErrorType,
    utils::prelude::ConsoleIO
};

pub type NativeFn = fn(&mut Host, &[Value]) -> Result<Value, RuntimeErrorType>;

/// Everything a native function may touch besides its arguments.
pub struct Host {
    pub io: Rc<dyn ConsoleIO>,
    pub env_vars: BTreeMap<String, String>,
    /// Set by `exit`; the evaluator unwinds once it sees a value here.
    pub exit: Option<Value>,
    /// Names passed to `free`; the evaluator unbinds them in the calling scope.
    pub freed: Vec<String>,
}

impl Host {
    pub fn new(io: Rc<dyn ConsoleIO>, env_vars: BTreeMap<String, String>) -> Self {
        Self {
            io,
            env_vars,
            exit: None,
            freed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::Between(min, max) => (min..=max).contains(&count),
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
            Self::Between(min, max) => write!(f, "{min} to {max}"),
        }
    }
}

#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub function: NativeFn,
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl NativeFunction {
    /// Checks the argument count, then dispatches.
    pub fn call(&self, host: &mut Host, arguments: &[Value]) -> Result<Value, RuntimeErrorType> {
        if !self.arity.accepts(arguments.len()) {
            return Err(RuntimeErrorType::ArityMismatch {
                name: self.name.to_string(),
                expected: self.arity.to_string(),
                found: arguments.len(),
            });
        }

        (self.function)(host, arguments)
    }
}

/// The process-wide table of native functions. Built on first use and
/// never mutated afterwards.
pub struct Registry {
    functions: FxHashMap<&'static str, NativeFunction>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

impl Registry {
    pub fn global() -> &'static Registry {
        REGISTRY.get_or_init(Self::build)
    }

    fn build() -> Self {
        let functions = super::system::FUNCTIONS.iter()
            .chain(super::math::FUNCTIONS)
            .chain(super::string::FUNCTIONS)
            .chain(super::collection::FUNCTIONS)
            .map(|function| (function.name, *function))
            .collect();

        Self { functions }
    }

    pub fn resolve(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names = self.functions.keys().copied().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

pub(super) fn invalid_argument(function: &str, message: impl Into<String>) -> RuntimeErrorType {
    RuntimeErrorType::InvalidArgument {
        function: function.to_string(),
        message: message.into(),
    }
}

fn wrong_type(function: &str, expected: &str, found: &Value) -> RuntimeErrorType {
    invalid_argument(function, format!("expected {expected}, found {}", found.value_type()))
}

pub(super) fn expect_number(function: &str, value: &Value) -> Result<f64, RuntimeErrorType> {
    match value {
        Value::Number { value } => Ok(*value),
        other => Err(wrong_type(function, "a number", other))
    }
}

/// A number that is a whole, non-negative value.
pub(super) fn expect_count(function: &str, value: &Value) -> Result<usize, RuntimeErrorType> {
    let number = expect_number(function, value)?;

    if number < 0.0 || number.fract() != 0.0 || !number.is_finite() {
        return Err(invalid_argument(function, format!("expected a whole non-negative number, found {number}")));
    }

    Ok(number as usize)
}

pub(super) fn expect_str<'a>(function: &str, value: &'a Value) -> Result<&'a str, RuntimeErrorType> {
    match value {
        Value::String { value } => Ok(&**value),
        other => Err(wrong_type(function, "a string", other))
    }
}

pub(super) fn expect_list<'a>(function: &str, value: &'a Value) -> Result<&'a Rc<RefCell<Vec<Value>>>, RuntimeErrorType> {
    match value {
        Value::List { items } => Ok(items),
        other => Err(wrong_type(function, "a list", other))
    }
}

pub(super) fn expect_map<'a>(function: &str, value: &'a Value) -> Result<&'a Rc<RefCell<BTreeMap<String, Value>>>, RuntimeErrorType> {
    match value {
        Value::Map { entries } => Ok(entries),
        other => Err(wrong_type(function, "a map", other))
    }
}
