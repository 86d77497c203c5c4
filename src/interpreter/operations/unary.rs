use crate::{
    ast::UnaryOperator,
    error::{Panic, RuntimeError},
    interpreter::{
        operations::{as_bool, as_f32, as_i32, registry::OperationRegistry},
        types::registry::BuiltinType,
        value::core::Value,
    },
};

fn negate_i32(value: &Value) -> Result<Value, Panic> {
    as_i32(value)?.checked_neg()
                  .map(Value::I32)
                  .ok_or_else(|| Panic::new("integer overflow"))
}

fn negate_f32(value: &Value) -> Result<Value, Panic> {
    Ok(Value::F32(-as_f32(value)?))
}

fn not_bool(value: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(!as_bool(value)?))
}

/// Registers `-` on the numeric types and `!` on `bool`.
pub(super) fn register(registry: &mut OperationRegistry) -> Result<(), RuntimeError> {
    let i32 = BuiltinType::I32.type_name();
    let f32 = BuiltinType::F32.type_name();
    let bool = BuiltinType::Bool.type_name();

    registry.register_unary(UnaryOperator::Negate, i32.clone(), i32, negate_i32)?;
    registry.register_unary(UnaryOperator::Negate, f32.clone(), f32, negate_f32)?;
    registry.register_unary(UnaryOperator::Not, bool.clone(), bool, not_bool)?;
    Ok(())
}
