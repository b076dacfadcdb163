use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    builtins::prelude::{Host, Registry},
    environment::prelude::{Closure, Environment, Value},
    parser::prelude::{
        AssignTarget, Assignment, Block, Call, Expression, ForLoop, Index, Infix, InfixOperator,
        Literal, Prefix, PrefixOperator, Program, Statement
    },
    utils::prelude::{ensure_sufficient_stack, ConsoleIO, SrcSpan}
};

use super::{
    config::EvalConfig,
    error::{RuntimeError, RuntimeErrorType},
    signal::{EvalResult, Signal}
};

type Scope = Rc<RefCell<Environment>>;

/// A tree-walking evaluator holding one session: the global scope, the
/// host I/O and session variables, and the exit state.
pub struct Interpreter {
    globals: Scope,
    host: Host,
    config: EvalConfig,
    registry: &'static Registry,
    depth: usize,
}

impl Interpreter {
    pub fn new(config: EvalConfig, io: Rc<dyn ConsoleIO>) -> Self {
        let host = Host::new(io, config.env_vars.clone());

        Self {
            globals: Environment::new().into_shared(),
            host,
            config,
            registry: Registry::global(),
            depth: 0,
        }
    }

    pub fn globals(&self) -> Scope {
        self.globals.clone()
    }

    /// Session variables as currently set, including changes made by scripts.
    pub fn env_vars(&self) -> &BTreeMap<String, String> {
        &self.host.env_vars
    }

    /// The value passed to `exit`, once a script has called it.
    pub fn exit_value(&self) -> Option<&Value> {
        self.host.exit.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.host.exit.is_some()
    }

    /// Runs `program` in the global scope and returns the value of its last
    /// expression statement, or the value passed to `exit`.
    ///
    /// Once the session has been terminated by `exit`, nothing runs anymore
    /// and the terminating value is returned.
    pub fn evaluate(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        if let Some(value) = &self.host.exit {
            return Ok(value.clone());
        }

        let globals = self.globals.clone();
        let mut last = Value::Null;

        for statement in &program.statements {
            let result = match statement {
                Statement::Expression { expression, .. } => self.eval_expression(expression, &globals)
                    .map(|value| last = value),
                statement => self.eval_statement(statement, &globals)
            };

            match result {
                Ok(()) => {},
                Err(Signal::Error(error)) => return Err(error),
                Err(Signal::Exit { value }) => return Ok(value),
                Err(Signal::Return { span, .. }) => {
                    return Err(RuntimeError::new(RuntimeErrorType::ReturnOutsideFunction, span))
                },
                Err(Signal::Break { span }) => {
                    return Err(RuntimeError::new(RuntimeErrorType::BreakOutsideLoop, span))
                },
                Err(Signal::Continue { span }) => {
                    return Err(RuntimeError::new(RuntimeErrorType::ContinueOutsideLoop, span))
                }
            }
        }

        Ok(last)
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Scope) -> EvalResult<()> {
        match statement {
            Statement::Var(var) => {
                let value = match &var.value {
                    Some(value) => self.eval_expression(value, env)?,
                    None => Value::Null
                };

                env.borrow_mut()
                    .declare(&var.name.value, value)
                    .map_err(|error| Signal::error(error, var.name.location))
            },
            Statement::Function(declaration) => {
                let closure = Closure {
                    function: declaration.function.clone(),
                    env: env.clone(),
                };

                env.borrow_mut()
                    .declare(&declaration.name.value, Value::Function { closure: Rc::new(closure) })
                    .map_err(|error| Signal::error(error, declaration.name.location))
            },
            Statement::Block(block) => self.eval_block(block, env),
            Statement::If(conditional) => {
                if self.eval_condition(&conditional.condition, env)? {
                    self.eval_statement(&conditional.resolution, env)
                } else if let Some(alternative) = &conditional.alternative {
                    self.eval_statement(alternative, env)
                } else {
                    Ok(())
                }
            },
            Statement::While(loop_) => {
                while self.eval_condition(&loop_.condition, env)? {
                    let scope = Environment::child_of(env);

                    match self.eval_statement(&loop_.block, &scope) {
                        Ok(()) | Err(Signal::Continue { .. }) => {},
                        Err(Signal::Break { .. }) => break,
                        Err(signal) => return Err(signal)
                    }
                }

                Ok(())
            },
            Statement::For(loop_) => self.eval_for(loop_, env),
            Statement::Return(return_) => {
                let value = match &return_.value {
                    Some(value) => self.eval_expression(value, env)?,
                    None => Value::Null
                };

                Err(Signal::Return { value, span: return_.location })
            },
            Statement::Break(span) => Err(Signal::Break { span: *span }),
            Statement::Continue(span) => Err(Signal::Continue { span: *span }),
            Statement::Expression { expression, .. } => self.eval_expression(expression, env).map(|_| ())
        }
    }

    fn eval_block(&mut self, block: &Block, env: &Scope) -> EvalResult<()> {
        let scope = Environment::child_of(env);

        for statement in &block.statements {
            self.eval_statement(statement, &scope)?;
        }

        Ok(())
    }

    fn eval_for(&mut self, loop_: &ForLoop, env: &Scope) -> EvalResult<()> {
        let scope = Environment::child_of(env);

        if let Some(init) = &loop_.init {
            self.eval_statement(init, &scope)?;
        }

        loop {
            if let Some(condition) = &loop_.condition {
                if !self.eval_condition(condition, &scope)? {
                    break;
                }
            }

            let body = Environment::child_of(&scope);

            match self.eval_statement(&loop_.block, &body) {
                Ok(()) | Err(Signal::Continue { .. }) => {},
                Err(Signal::Break { .. }) => break,
                Err(signal) => return Err(signal)
            }

            if let Some(update) = &loop_.update {
                self.eval_expression(update, &scope)?;
            }
        }

        Ok(())
    }

    fn eval_condition(&mut self, condition: &Expression, env: &Scope) -> EvalResult<bool> {
        match self.eval_expression(condition, env)? {
            Value::Boolean { value } => Ok(value),
            other => Err(Signal::error(
                RuntimeErrorType::ExpectedBoolean { found: other.value_type() },
                condition.location()
            ))
        }
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Scope) -> EvalResult {
        ensure_sufficient_stack(|| -> EvalResult {
            match expression {
                Expression::Identifier(ident) => self.lookup(&ident.value, ident.location, env),
                Expression::Literal(literal) => Ok(match literal {
                    Literal::Number { value, .. } => Value::number(*value),
                    Literal::String { value, .. } => Value::from(value.as_str()),
                    Literal::Boolean { value, .. } => Value::boolean(*value),
                    Literal::Null { .. } => Value::Null
                }),
                Expression::Infix(infix) => self.eval_infix(infix, env),
                Expression::Prefix(prefix) => self.eval_prefix(prefix, env),
                Expression::Call(call) => self.eval_call(call, env),
                Expression::Index(index) => self.eval_index(index, env),
                Expression::Assignment(assignment) => self.eval_assignment(assignment, env),
                Expression::List(list) => {
                    let mut items = Vec::with_capacity(list.items.len());

                    for item in &list.items {
                        items.push(self.eval_expression(item, env)?);
                    }

                    Ok(Value::list(items))
                },
                Expression::Map(map) => {
                    let mut entries = BTreeMap::new();

                    for (key, value) in &map.entries {
                        let key_value = self.eval_expression(key, env)?;
                        let value = self.eval_expression(value, env)?;

                        match key_value {
                            Value::String { value: name } => {
                                entries.insert(name.to_string(), value);
                            },
                            other => return Err(Signal::error(
                                RuntimeErrorType::InvalidMapKey { found: other.value_type() },
                                key.location()
                            ))
                        }
                    }

                    Ok(Value::map(entries))
                },
                Expression::Function(function) => Ok(Value::Function {
                    closure: Rc::new(Closure {
                        function: function.clone(),
                        env: env.clone(),
                    })
                }),
                Expression::Nested { expression, .. } => self.eval_expression(expression, env)
            }
        })
    }

    /// Scopes innermost to outermost, then the built-in registry.
    fn lookup(&self, name: &str, span: SrcSpan, env: &Scope) -> EvalResult {
        if let Some(value) = env.borrow().get(name) {
            return Ok(value);
        }

        let registry: &'static Registry = self.registry;

        match registry.resolve(name) {
            Some(function) => Ok(Value::Native { function }),
            None => Err(Signal::error(
                RuntimeErrorType::UndefinedVariable { name: name.to_string() },
                span
            ))
        }
    }

    fn eval_infix(&mut self, infix: &Infix, env: &Scope) -> EvalResult {
        match infix.operator {
            InfixOperator::And | InfixOperator::Or => {
                let left = self.eval_condition(&infix.left, env)?;

                match (infix.operator, left) {
                    (InfixOperator::And, false) => Ok(Value::boolean(false)),
                    (InfixOperator::Or, true) => Ok(Value::boolean(true)),
                    _ => Ok(Value::boolean(self.eval_condition(&infix.right, env)?))
                }
            },
            operator => {
                let left = self.eval_expression(&infix.left, env)?;
                let right = self.eval_expression(&infix.right, env)?;

                binary(operator, &left, &right)
                    .map_err(|error| Signal::error(error, infix.location))
            }
        }
    }

    fn eval_prefix(&mut self, prefix: &Prefix, env: &Scope) -> EvalResult {
        let value = self.eval_expression(&prefix.expression, env)?;

        match (prefix.operator, &value) {
            (PrefixOperator::Negate, Value::Number { value }) => Ok(Value::number(-value)),
            (PrefixOperator::Not, Value::Boolean { value }) => Ok(Value::boolean(!value)),
            (operator, value) => Err(Signal::error(
                RuntimeErrorType::InvalidOperand { operator, operand: value.value_type() },
                prefix.location
            ))
        }
    }

    fn eval_call(&mut self, call: &Call, env: &Scope) -> EvalResult {
        let callee = self.eval_expression(&call.function, env)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());

        for argument in &call.arguments {
            arguments.push(self.eval_expression(argument, env)?);
        }

        self.call_value(&callee, arguments, env, call.function.location(), call.location)
    }

    fn call_value(
        &mut self,
        callee: &Value,
        arguments: Vec<Value>,
        env: &Scope,
        callee_span: SrcSpan,
        span: SrcSpan
    ) -> EvalResult {
        match callee {
            Value::Function { closure } => self.call_closure(closure, arguments, span),
            Value::Native { function } => {
                let value = function.call(&mut self.host, &arguments)
                    .map_err(|error| Signal::error(error, span))?;

                for name in std::mem::take(&mut self.host.freed) {
                    env.borrow_mut().remove(&name);
                }

                match &self.host.exit {
                    Some(value) => Err(Signal::Exit { value: value.clone() }),
                    None => Ok(value)
                }
            },
            other => Err(Signal::error(
                RuntimeErrorType::NotCallable { found: other.value_type() },
                callee_span
            ))
        }
    }

    fn call_closure(&mut self, closure: &Closure, arguments: Vec<Value>, span: SrcSpan) -> EvalResult {
        let function = &closure.function;

        if arguments.len() != function.params.len() {
            return Err(Signal::error(
                RuntimeErrorType::ArityMismatch {
                    name: function.name.clone().unwrap_or_else(|| "<anonymous>".to_string()),
                    expected: function.params.len().to_string(),
                    found: arguments.len(),
                },
                span
            ));
        }

        if self.depth >= self.config.max_call_depth {
            return Err(Signal::error(
                RuntimeErrorType::StackOverflow { limit: self.config.max_call_depth },
                span
            ));
        }

        let scope = Environment::child_of(&closure.env);

        for (param, value) in function.params.iter().zip(arguments) {
            scope.borrow_mut()
                .declare(&param.value, value)
                .map_err(|error| Signal::error(error, param.location))?;
        }

        self.depth += 1;
        let result = self.eval_block(&function.body, &scope);
        self.depth -= 1;

        match result {
            Ok(()) => Ok(Value::Null),
            Err(Signal::Return { value, .. }) => Ok(value),
            Err(signal) => Err(signal.escape_function())
        }
    }

    fn eval_index(&mut self, index: &Index, env: &Scope) -> EvalResult {
        let collection = self.eval_expression(&index.collection, env)?;
        let key = self.eval_expression(&index.index, env)?;

        index_value(&collection, &key)
            .map_err(|error| Signal::error(error, index.location))
    }

    fn eval_assignment(&mut self, assignment: &Assignment, env: &Scope) -> EvalResult {
        match &assignment.target {
            AssignTarget::Identifier(ident) => {
                let value = self.eval_expression(&assignment.value, env)?;

                env.borrow_mut()
                    .assign(&ident.value, value.clone())
                    .map_err(|error| Signal::error(error, ident.location))?;

                Ok(value)
            },
            AssignTarget::Index(index) => {
                let collection = self.eval_expression(&index.collection, env)?;
                let key = self.eval_expression(&index.index, env)?;
                let value = self.eval_expression(&assignment.value, env)?;

                set_index(&collection, &key, value.clone())
                    .map_err(|error| Signal::error(error, index.location))?;

                Ok(value)
            }
        }
    }
}

fn binary(operator: InfixOperator, left: &Value, right: &Value) -> Result<Value, RuntimeErrorType> {
    use InfixOperator::*;

    let value = match (operator, left, right) {
        (Equal, _, _) => Value::boolean(left == right),
        (NotEqual, _, _) => Value::boolean(left != right),

        (Plus, Value::String { value: a }, Value::String { value: b }) => {
            Value::from(format!("{a}{b}"))
        },

        (_, Value::Number { value: a }, Value::Number { value: b }) => {
            let (a, b) = (*a, *b);

            match operator {
                Plus => Value::number(a + b),
                Minus => Value::number(a - b),
                Multiply => Value::number(a * b),
                Divide | Modulo if b == 0.0 => return Err(RuntimeErrorType::DivisionByZero),
                Divide => Value::number(a / b),
                Modulo => Value::number(a % b),
                LessThan => Value::boolean(a < b),
                LessThanOrEqual => Value::boolean(a <= b),
                GreaterThan => Value::boolean(a > b),
                GreaterThanOrEqual => Value::boolean(a >= b),
                Equal | NotEqual | And | Or => return Err(invalid_operands(operator, left, right))
            }
        },

        (LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual, Value::String { value: a }, Value::String { value: b }) => {
            let ordering = a.cmp(b);

            Value::boolean(match operator {
                LessThan => ordering.is_lt(),
                LessThanOrEqual => ordering.is_le(),
                GreaterThan => ordering.is_gt(),
                _ => ordering.is_ge(),
            })
        },

        _ => return Err(invalid_operands(operator, left, right))
    };

    Ok(value)
}

fn invalid_operands(operator: InfixOperator, left: &Value, right: &Value) -> RuntimeErrorType {
    RuntimeErrorType::InvalidOperands {
        operator,
        left: left.value_type(),
        right: right.value_type(),
    }
}

/// Converts `index` to a position in a sequence of `length` items.
fn position(collection: &Value, index: f64, length: usize) -> Result<usize, RuntimeErrorType> {
    if index.fract() != 0.0 || !index.is_finite() {
        return Err(RuntimeErrorType::InvalidIndex {
            collection: collection.value_type(),
            index: index.to_string(),
        });
    }

    if index < 0.0 || index >= length as f64 {
        return Err(RuntimeErrorType::IndexOutOfBounds { index, length });
    }

    Ok(index as usize)
}

fn index_value(collection: &Value, key: &Value) -> Result<Value, RuntimeErrorType> {
    match (collection, key) {
        (Value::List { items }, Value::Number { value }) => {
            let items = items.borrow();
            let idx = position(collection, *value, items.len())?;

            Ok(items[idx].clone())
        },
        (Value::String { value: string }, Value::Number { value }) => {
            let length = string.chars().count();
            let idx = position(collection, *value, length)?;

            Ok(string.chars().nth(idx).map_or(Value::Null, |ch| Value::from(ch.to_string())))
        },
        (Value::Map { entries }, Value::String { value }) => {
            Ok(entries.borrow().get(&**value).cloned().unwrap_or(Value::Null))
        },
        (Value::List { .. } | Value::String { .. } | Value::Map { .. }, key) => {
            Err(RuntimeErrorType::InvalidIndex {
                collection: collection.value_type(),
                index: key.repr(),
            })
        },
        (other, _) => Err(RuntimeErrorType::NotIndexable { found: other.value_type() })
    }
}

fn set_index(collection: &Value, key: &Value, value: Value) -> Result<(), RuntimeErrorType> {
    match (collection, key) {
        (Value::List { items }, Value::Number { value: index }) => {
            let mut items = items.borrow_mut();
            let idx = position(collection, *index, items.len())?;

            items[idx] = value;

            Ok(())
        },
        (Value::Map { entries }, Value::String { value: key }) => {
            entries.borrow_mut().insert(key.to_string(), value);

            Ok(())
        },
        (Value::List { .. } | Value::Map { .. }, key) => {
            Err(RuntimeErrorType::InvalidIndex {
                collection: collection.value_type(),
                index: key.repr(),
            })
        },
        (other, _) => Err(RuntimeErrorType::NotIndexable { found: other.value_type() })
    }
}
