use crate::{
    ast::BinaryOperator,
    error::{Panic, RuntimeError},
    interpreter::{
        operations::{as_f32, as_i32, as_str, registry::OperationRegistry},
        types::registry::BuiltinType,
        value::core::Value,
    },
    util::num::repetitions,
};

/// Longest string, in bytes, that `+` and `*` may produce.
pub const MAX_STRING_BYTES: usize = 16 * 1024 * 1024;

fn overflow() -> Panic {
    Panic::new("integer overflow")
}

fn division_by_zero() -> Panic {
    Panic::new("division by zero")
}

fn add_i32(left: &Value, right: &Value) -> Result<Value, Panic> {
    as_i32(left)?.checked_add(as_i32(right)?)
                 .map(Value::I32)
                 .ok_or_else(overflow)
}

fn sub_i32(left: &Value, right: &Value) -> Result<Value, Panic> {
    as_i32(left)?.checked_sub(as_i32(right)?)
                 .map(Value::I32)
                 .ok_or_else(overflow)
}

fn mul_i32(left: &Value, right: &Value) -> Result<Value, Panic> {
    as_i32(left)?.checked_mul(as_i32(right)?)
                 .map(Value::I32)
                 .ok_or_else(overflow)
}

fn div_i32(left: &Value, right: &Value) -> Result<Value, Panic> {
    let divisor = as_i32(right)?;
    if divisor == 0 {
        return Err(division_by_zero());
    }
    as_i32(left)?.checked_div(divisor)
                 .map(Value::I32)
                 .ok_or_else(overflow)
}

fn add_f32(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::F32(as_f32(left)? + as_f32(right)?))
}

fn sub_f32(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::F32(as_f32(left)? - as_f32(right)?))
}

fn mul_f32(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::F32(as_f32(left)? * as_f32(right)?))
}

fn div_f32(left: &Value, right: &Value) -> Result<Value, Panic> {
    let divisor = as_f32(right)?;
    if divisor == 0.0 {
        return Err(division_by_zero());
    }
    Ok(Value::F32(as_f32(left)? / divisor))
}

fn string_too_long() -> Panic {
    Panic::new(format!("string longer than {MAX_STRING_BYTES} bytes"))
}

fn concat(left: &Value, right: &Value) -> Result<Value, Panic> {
    let (left, right) = (as_str(left)?, as_str(right)?);
    if left.len() + right.len() > MAX_STRING_BYTES {
        return Err(string_too_long());
    }
    Ok(Value::Str(format!("{left}{right}")))
}

fn repeat(left: &Value, right: &Value) -> Result<Value, Panic> {
    let text = as_str(left)?;
    let count = repetitions(as_i32(right)?);
    text.len()
        .checked_mul(count)
        .filter(|len| *len <= MAX_STRING_BYTES)
        .ok_or_else(string_too_long)?;
    Ok(Value::Str(text.repeat(count)))
}

/// Registers the arithmetic operators on `i32` and `f32`, `str + str` and
/// `str * i32`.
pub(super) fn register(registry: &mut OperationRegistry) -> Result<(), RuntimeError> {
    use BinaryOperator::{Add, Div, Mul, Sub};

    let i32 = BuiltinType::I32.type_name();
    let f32 = BuiltinType::F32.type_name();
    let str = BuiltinType::Str.type_name();

    for (op, handler) in [(Add, add_i32 as fn(&Value, &Value) -> Result<Value, Panic>),
                          (Sub, sub_i32),
                          (Mul, mul_i32),
                          (Div, div_i32)]
    {
        registry.register_binary(op, i32.clone(), i32.clone(), i32.clone(), handler)?;
    }
    for (op, handler) in [(Add, add_f32 as fn(&Value, &Value) -> Result<Value, Panic>),
                          (Sub, sub_f32),
                          (Mul, mul_f32),
                          (Div, div_f32)]
    {
        registry.register_binary(op, f32.clone(), f32.clone(), f32.clone(), handler)?;
    }

    registry.register_binary(Add, str.clone(), str.clone(), str.clone(), concat)?;
    registry.register_binary(Mul, str.clone(), i32, str, repeat)?;
    Ok(())
}
