use crate::{error::Panic, interpreter::value::core::Value};

/// The operation registry.
///
/// Dispatch tables for logical, comparison, arithmetic and unary operators
/// and for casts, keyed by operator and operand types, with the implicit
/// right-operand cast applied on lookup.
pub mod registry;

/// Casts between the builtin types and the truthiness they define.
pub mod cast;

/// `&&` and `||` on same-typed builtin operands.
pub mod logic;

/// `==`, `!=`, `<` and `>`.
pub mod comparison;

/// `+`, `-`, `*` and `/`, with string concatenation and repetition.
pub mod arithmetic;

/// Prefix `-` and `!`.
pub mod unary;

fn mismatch(expected: &str, value: &Value) -> Panic {
    Panic::new(format!("expected a value of type '{expected}', found '{}'",
                       value.type_name()))
}

fn as_i32(value: &Value) -> Result<i32, Panic> {
    match value {
        Value::I32(n) => Ok(*n),
        other => Err(mismatch("i32", other)),
    }
}

fn as_f32(value: &Value) -> Result<f32, Panic> {
    match value {
        Value::F32(x) => Ok(*x),
        other => Err(mismatch("f32", other)),
    }
}

fn as_str(value: &Value) -> Result<&str, Panic> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(mismatch("str", other)),
    }
}

fn as_bool(value: &Value) -> Result<bool, Panic> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(mismatch("bool", other)),
    }
}
