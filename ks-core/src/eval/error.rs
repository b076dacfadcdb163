use thiserror::Error;

use crate::{
    environment::prelude::ValueType,
    parser::prelude::{InfixOperator, PrefixOperator},
    utils::prelude::SrcSpan
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },
    #[error("`{name}` is already declared in this scope")]
    Redeclaration { name: String },
    #[error("cannot apply `{operator}` to {left} and {right}")]
    InvalidOperands {
        operator: InfixOperator,
        left: ValueType,
        right: ValueType,
    },
    #[error("cannot apply `{operator}` to {operand}")]
    InvalidOperand {
        operator: PrefixOperator,
        operand: ValueType,
    },
    #[error("expected a boolean, found {found}")]
    ExpectedBoolean { found: ValueType },
    #[error("{found} is not callable")]
    NotCallable { found: ValueType },
    #[error("{found} cannot be indexed")]
    NotIndexable { found: ValueType },
    #[error("`{index}` is not a valid {collection} index")]
    InvalidIndex {
        collection: ValueType,
        index: String,
    },
    #[error("map keys must be strings, found {found}")]
    InvalidMapKey { found: ValueType },
    #[error("index {index} is out of bounds for length {length}")]
    IndexOutOfBounds { index: f64, length: usize },
    #[error("`{name}` expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: String,
        found: usize,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{function}: {message}")]
    InvalidArgument {
        function: String,
        message: String,
    },
    #[error("maximum call depth of {limit} exceeded")]
    StackOverflow { limit: usize },
    #[error("`break` outside of a loop")]
    BreakOutsideLoop,
    #[error("`continue` outside of a loop")]
    ContinueOutsideLoop,
    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
}

impl RuntimeErrorType {
    /// Operations applied to values of the wrong type.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOperands { .. }
                | Self::InvalidOperand { .. }
                | Self::ExpectedBoolean { .. }
                | Self::NotCallable { .. }
                | Self::NotIndexable { .. }
                | Self::InvalidIndex { .. }
                | Self::InvalidMapKey { .. }
                | Self::InvalidArgument { .. }
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub span: SrcSpan
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, span: SrcSpan) -> Self {
        Self { error, span }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            RuntimeErrorType::UndefinedVariable { name } => ("Not declared", vec![
                format!("Declare it first with `var {name};`")
            ]),
            RuntimeErrorType::Redeclaration { .. } => ("Declared twice in the same scope", vec![
                "Assign to the existing variable instead, or declare it in an inner block".to_string()
            ]),
            RuntimeErrorType::InvalidOperands { left, right, .. } => ("Invalid operands", vec![
                format!("Left side is a {left}, right side is a {right}"),
                "Convert explicitly with `str(...)` or `number(...)`".to_string()
            ]),
            RuntimeErrorType::InvalidOperand { .. } => ("Invalid operand", vec![]),
            RuntimeErrorType::ExpectedBoolean { .. } => ("Expected a boolean here", vec![
                "Conditions and `&&`, `||`, `!` operands must be `true` or `false`".to_string()
            ]),
            RuntimeErrorType::NotCallable { .. } => ("Not a function", vec![]),
            RuntimeErrorType::NotIndexable { .. } => ("Cannot index this", vec![
                "Only lists, strings and maps can be indexed".to_string()
            ]),
            RuntimeErrorType::InvalidIndex { .. } => ("Invalid index", vec![
                "Lists and strings take whole numbers, maps take strings".to_string()
            ]),
            RuntimeErrorType::InvalidMapKey { .. } => ("Invalid map key", vec![]),
            RuntimeErrorType::IndexOutOfBounds { .. } => ("Index out of bounds", vec![]),
            RuntimeErrorType::ArityMismatch { .. } => ("Wrong number of arguments", vec![]),
            RuntimeErrorType::DivisionByZero => ("Division by zero", vec![]),
            RuntimeErrorType::InvalidArgument { .. } => ("Invalid argument", vec![]),
            RuntimeErrorType::StackOverflow { .. } => ("Recursion too deep", vec![
                "Raise the limit with `--max-depth` if this is intended".to_string()
            ]),
            RuntimeErrorType::BreakOutsideLoop => ("`break` outside of a loop", vec![]),
            RuntimeErrorType::ContinueOutsideLoop => ("`continue` outside of a loop", vec![]),
            RuntimeErrorType::ReturnOutsideFunction => ("`return` outside of a function", vec![]),
        }
    }
}
