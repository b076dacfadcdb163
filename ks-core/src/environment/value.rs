use std::{cell::RefCell, collections::BTreeMap, fmt::Display, rc::Rc};

use crate::{builtins::prelude::NativeFunction, lexer::prelude::escape, parser::prelude::FunctionLiteral};

use super::environment::Environment;

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };
pub const NULL: Value = Value::Null;

/// Nesting beyond this prints as `...`.
const MAX_DISPLAY_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean {
        value: bool
    },
    Number {
        value: f64
    },
    String {
        value: Rc<str>
    },
    List {
        items: Rc<RefCell<Vec<Value>>>
    },
    Map {
        entries: Rc<RefCell<BTreeMap<String, Value>>>
    },
    Function {
        closure: Rc<Closure>
    },
    Native {
        function: &'static NativeFunction
    },
}

/// A function value: the literal it was created from and the scope it
/// was created in.
pub struct Closure {
    pub function: Rc<FunctionLiteral>,
    pub env: Rc<RefCell<Environment>>,
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the captured scope may contain this closure
        f.debug_struct("Closure")
            .field("name", &self.function.name)
            .field("params", &self.function.parameter_list())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean { value: a }, Self::Boolean { value: b }) => a == b,
            (Self::Number { value: a }, Self::Number { value: b }) => a == b,
            (Self::String { value: a }, Self::String { value: b }) => a == b,
            (Self::List { items: a }, Self::List { items: b }) => Rc::ptr_eq(a, b),
            (Self::Map { entries: a }, Self::Map { entries: b }) => Rc::ptr_eq(a, b),
            (Self::Function { closure: a }, Self::Function { closure: b }) => Rc::ptr_eq(a, b),
            (Self::Native { function: a }, Self::Native { function: b }) => a.name == b.name,
            _ => false
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String { value } => write!(f, "{value}"),
            other => other.fmt_nested(f, &mut Vec::new())
        }
    }
}

impl Value {
    pub fn number(value: f64) -> Self {
        Self::Number { value }
    }

    pub fn boolean(value: bool) -> Self {
        Self::Boolean { value }
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::List { items: Rc::new(RefCell::new(items)) }
    }

    pub fn map(entries: BTreeMap<String, Value>) -> Self {
        Self::Map { entries: Rc::new(RefCell::new(entries)) }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Boolean { .. } => ValueType::Boolean,
            Self::Number { .. } => ValueType::Number,
            Self::String { .. } => ValueType::String,
            Self::List { .. } => ValueType::List,
            Self::Map { .. } => ValueType::Map,
            Self::Function { .. } | Self::Native { .. } => ValueType::Function,
        }
    }

    /// Like `Display`, but strings are quoted. Used inside collections and
    /// by the shell when echoing results.
    pub fn repr(&self) -> String {
        struct Repr<'a>(&'a Value);

        impl Display for Repr<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt_nested(f, &mut Vec::new())
            }
        }

        Repr(self).to_string()
    }

    /// `path` holds the collections currently being printed. A list or map
    /// that contains itself prints as `[...]` or `{...}` at the repeat.
    fn fmt_nested(&self, f: &mut std::fmt::Formatter<'_>, path: &mut Vec<*const ()>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean { value } => write!(f, "{value}"),
            Self::Number { value } => write!(f, "{value}"),
            Self::String { value } => write!(f, "\"{}\"", escape(value)),
            Self::List { items } => {
                let id = Rc::as_ptr(items) as *const ();
                if path.contains(&id) || path.len() >= MAX_DISPLAY_DEPTH {
                    return write!(f, "[...]");
                }

                path.push(id);
                write!(f, "[")?;

                for (idx, item) in items.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f, path)?;
                }

                path.pop();
                write!(f, "]")
            },
            Self::Map { entries } => {
                let id = Rc::as_ptr(entries) as *const ();
                if path.contains(&id) || path.len() >= MAX_DISPLAY_DEPTH {
                    return write!(f, "{{...}}");
                }

                path.push(id);
                write!(f, "{{")?;

                for (idx, (key, value)) in entries.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\": ", escape(key))?;
                    value.fmt_nested(f, path)?;
                }

                path.pop();
                write!(f, "}}")
            },
            Self::Function { closure } => match &closure.function.name {
                Some(name) => write!(f, "<function {name}>"),
                None => write!(f, "<function>")
            },
            Self::Native { function } => write!(f, "<native {}>", function.name),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean { value }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number { value }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String { value: value.into() }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String { value: value.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Boolean,
    Number,
    String,
    List,
    Map,
    Function,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Function => "function",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
