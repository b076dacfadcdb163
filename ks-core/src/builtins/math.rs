use crate::{environment::prelude::Value, eval::prelude::RuntimeErrorType};

use super::registry::{expect_number, invalid_argument, Arity, Host, NativeFunction};

pub(super) const FUNCTIONS: &[NativeFunction] = &[
    NativeFunction { name: "abs", arity: Arity::Exact(1), function: abs },
    NativeFunction { name: "floor", arity: Arity::Exact(1), function: floor },
    NativeFunction { name: "ceil", arity: Arity::Exact(1), function: ceil },
    NativeFunction { name: "round", arity: Arity::Exact(1), function: round },
    NativeFunction { name: "sqrt", arity: Arity::Exact(1), function: sqrt },
    NativeFunction { name: "pow", arity: Arity::Exact(2), function: pow },
    NativeFunction { name: "min", arity: Arity::AtLeast(1), function: min },
    NativeFunction { name: "max", arity: Arity::AtLeast(1), function: max },
    NativeFunction { name: "number", arity: Arity::Exact(1), function: number },
];

fn unary(name: &str, args: &[Value], op: fn(f64) -> f64) -> Result<Value, RuntimeErrorType> {
    Ok(Value::number(op(expect_number(name, &args[0])?)))
}

fn abs(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    unary("abs", args, f64::abs)
}

fn floor(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    unary("floor", args, f64::floor)
}

fn ceil(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    unary("ceil", args, f64::ceil)
}

// halves round away from zero
fn round(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    unary("round", args, f64::round)
}

fn sqrt(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let value = expect_number("sqrt", &args[0])?;

    if value < 0.0 {
        return Err(invalid_argument("sqrt", format!("cannot take the square root of {value}")));
    }

    Ok(Value::number(value.sqrt()))
}

fn pow(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let base = expect_number("pow", &args[0])?;
    let exponent = expect_number("pow", &args[1])?;

    Ok(Value::number(base.powf(exponent)))
}

fn fold(name: &str, args: &[Value], pick: fn(f64, f64) -> f64) -> Result<Value, RuntimeErrorType> {
    let mut numbers = args.iter().map(|arg| expect_number(name, arg));

    let mut acc = match numbers.next() {
        Some(first) => first?,
        None => return Err(invalid_argument(name, "expected at least one number"))
    };

    for number in numbers {
        acc = pick(acc, number?);
    }

    Ok(Value::number(acc))
}

fn min(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    fold("min", args, f64::min)
}

fn max(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    fold("max", args, f64::max)
}

/// Numbers pass through, strings are parsed (`null` when they are not a
/// number).
fn number(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    match &args[0] {
        Value::Number { value } => Ok(Value::number(*value)),
        Value::String { value } => Ok(value.trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map_or(Value::Null, Value::number)
        ),
        other => Err(invalid_argument("number", format!("cannot convert {} to a number", other.value_type())))
    }
}
