use std::collections::BTreeMap;

use crate::{environment::prelude::Value, eval::prelude::RuntimeErrorType};

use super::registry::{expect_str, Arity, Host, NativeFunction};

pub(super) const FUNCTIONS: &[NativeFunction] = &[
    NativeFunction { name: "print", arity: Arity::AtLeast(0), function: print },
    NativeFunction { name: "input", arity: Arity::Exact(0), function: input },
    NativeFunction { name: "typeof", arity: Arity::Exact(1), function: type_of },
    NativeFunction { name: "str", arity: Arity::AtLeast(0), function: to_str },
    NativeFunction { name: "exit", arity: Arity::Between(0, 1), function: exit },
    NativeFunction { name: "free", arity: Arity::AtLeast(1), function: free },
    NativeFunction { name: "env", arity: Arity::Exact(1), function: env },
    NativeFunction { name: "env_set", arity: Arity::Exact(2), function: env_set },
    NativeFunction { name: "env_list", arity: Arity::Exact(0), function: env_list },
];

fn print(host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let line = args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<String>>()
        .join(" ");

    host.io.write_line(&line);

    Ok(Value::Null)
}

fn input(host: &mut Host, _args: &[Value]) -> Result<Value, RuntimeErrorType> {
    Ok(host.io.read_line().map_or(Value::Null, Value::from))
}

fn type_of(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    Ok(Value::from(args[0].value_type().as_str()))
}

fn to_str(_host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    Ok(Value::from(args.iter().map(|arg| arg.to_string()).collect::<String>()))
}

fn exit(host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    host.exit = Some(args.first().cloned().unwrap_or(Value::Null));

    Ok(Value::Null)
}

fn free(host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let names = args.iter()
        .map(|arg| expect_str("free", arg).map(str::to_string))
        .collect::<Result<Vec<String>, RuntimeErrorType>>()?;

    host.freed.extend(names);

    Ok(Value::Null)
}

fn env(host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let name = expect_str("env", &args[0])?;

    Ok(host.env_vars.get(name).map_or(Value::Null, |value| Value::from(value.as_str())))
}

// a `null` value removes the variable
fn env_set(host: &mut Host, args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let name = expect_str("env_set", &args[0])?;

    match &args[1] {
        Value::Null => {
            host.env_vars.remove(name);
        },
        value => {
            host.env_vars.insert(name.to_string(), value.to_string());
        }
    }

    Ok(Value::Null)
}

fn env_list(host: &mut Host, _args: &[Value]) -> Result<Value, RuntimeErrorType> {
    let entries = host.env_vars.iter()
        .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
        .collect::<BTreeMap<String, Value>>();

    Ok(Value::map(entries))
}
