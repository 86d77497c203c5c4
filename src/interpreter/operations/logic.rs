use crate::{
    ast::BoolOperator,
    error::{Panic, RuntimeError},
    interpreter::{
        operations::{cast::truthy, registry::OperationRegistry},
        types::registry::BuiltinType,
        value::core::Value,
    },
};

/// `left && right`: the left operand when it is falsy, else the right one.
///
/// # Example
/// ```
/// use fhll::interpreter::{operations::logic::and, value::core::Value};
///
/// assert_eq!(and(&Value::I32(0), &Value::I32(7)).unwrap(), Value::I32(0));
/// assert_eq!(and(&Value::I32(2), &Value::I32(7)).unwrap(), Value::I32(7));
/// ```
///
/// # Errors
/// Never; the signature matches the other operation handlers.
pub fn and(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(if truthy(left) { right.clone() } else { left.clone() })
}

/// `left || right`: the left operand when it is truthy, else the right one.
///
/// # Errors
/// Never; the signature matches the other operation handlers.
pub fn or(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(if truthy(left) { left.clone() } else { right.clone() })
}

/// Registers `&&` and `||` on each builtin type paired with itself. The
/// result has the left operand's type.
pub(super) fn register(registry: &mut OperationRegistry) -> Result<(), RuntimeError> {
    for ty in BuiltinType::ALL {
        let name = ty.type_name();
        registry.register_bool(BoolOperator::And, name.clone(), name.clone(), name.clone(), and)?;
        registry.register_bool(BoolOperator::Or, name.clone(), name.clone(), name, or)?;
    }
    Ok(())
}
