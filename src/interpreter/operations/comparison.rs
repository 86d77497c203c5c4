use crate::{
    ast::CompareOperator,
    error::{Panic, RuntimeError},
    interpreter::{
        operations::{as_f32, as_i32, registry::OperationRegistry},
        types::registry::BuiltinType,
        value::core::Value,
    },
};

fn equal(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(left == right))
}

fn not_equal(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(left != right))
}

fn less_i32(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(as_i32(left)? < as_i32(right)?))
}

fn greater_i32(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(as_i32(left)? > as_i32(right)?))
}

fn less_f32(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(as_f32(left)? < as_f32(right)?))
}

fn greater_f32(left: &Value, right: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(as_f32(left)? > as_f32(right)?))
}

/// Registers equality on every builtin type and ordering on the numeric ones.
pub(super) fn register(registry: &mut OperationRegistry) -> Result<(), RuntimeError> {
    for ty in BuiltinType::ALL {
        let name = ty.type_name();
        registry.register_compare(CompareOperator::Equal, name.clone(), name.clone(), equal)?;
        registry.register_compare(CompareOperator::NotEqual, name.clone(), name, not_equal)?;
    }

    let i32 = BuiltinType::I32.type_name();
    registry.register_compare(CompareOperator::Less, i32.clone(), i32.clone(), less_i32)?;
    registry.register_compare(CompareOperator::Greater, i32.clone(), i32, greater_i32)?;

    let f32 = BuiltinType::F32.type_name();
    registry.register_compare(CompareOperator::Less, f32.clone(), f32.clone(), less_f32)?;
    registry.register_compare(CompareOperator::Greater, f32.clone(), f32, greater_f32)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::CompareOperator,
        interpreter::{
            operations::registry::OperationRegistry, types::type_name::TypeName,
            value::core::Value,
        },
    };

    fn compare(op: CompareOperator, left: Value, right: Value) -> Value {
        let registry = OperationRegistry::with_builtins().unwrap();
        registry.find_compare(op, &left.type_name(), &right.type_name())
                .unwrap()
                .apply(&left, right)
                .unwrap()
    }

    #[test]
    fn equality_on_every_builtin() {
        assert_eq!(compare(CompareOperator::Equal, 0.into(), 1.into()), Value::Bool(false));
        assert_eq!(compare(CompareOperator::Equal, "a".into(), "a".into()), Value::Bool(true));
        assert_eq!(compare(CompareOperator::NotEqual, true.into(), false.into()),
                   Value::Bool(true));
    }

    #[test]
    fn ordering_on_numbers_only() {
        assert_eq!(compare(CompareOperator::Less, 5.into(), 6.into()), Value::Bool(true));
        assert_eq!(compare(CompareOperator::Greater, 1.5f32.into(), 2.5f32.into()),
                   Value::Bool(false));

        let registry = OperationRegistry::with_builtins().unwrap();
        let bool = TypeName::simple("bool");
        assert!(registry.find_compare(CompareOperator::Less, &bool, &bool).is_none());
    }
}
