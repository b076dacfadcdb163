use crate::{environment::prelude::Value, utils::prelude::SrcSpan};

use super::error::{RuntimeError, RuntimeErrorType};

/// Non-local exits travelling up the evaluator on the error arm of
/// [`EvalResult`].
#[derive(Debug)]
pub(crate) enum Signal {
    Error(RuntimeError),
    Return {
        value: Value,
        span: SrcSpan
    },
    Break {
        span: SrcSpan
    },
    Continue {
        span: SrcSpan
    },
    Exit {
        value: Value
    },
}

pub(crate) type EvalResult<T = Value> = Result<T, Signal>;

impl From<RuntimeError> for Signal {
    fn from(value: RuntimeError) -> Self {
        Self::Error(value)
    }
}

impl Signal {
    pub(crate) fn error(error: RuntimeErrorType, span: SrcSpan) -> Self {
        Self::Error(RuntimeError::new(error, span))
    }

    /// Turns a loop signal that reached a function boundary into an error.
    pub(crate) fn escape_function(self) -> Self {
        match self {
            Self::Break { span } => Self::error(RuntimeErrorType::BreakOutsideLoop, span),
            Self::Continue { span } => Self::error(RuntimeErrorType::ContinueOutsideLoop, span),
            other => other
        }
    }
}
