use crate::{
    error::{Panic, RuntimeError},
    interpreter::{
        operations::{
            as_bool, as_f32, as_i32, as_str,
            registry::{OperationRegistry, UnaryHandler},
        },
        types::registry::BuiltinType,
        value::core::Value,
    },
    util::num::{f32_to_i32_saturating, i32_to_f32},
};

/// Whether a value counts as true in a condition.
///
/// Numbers are true when non-zero, strings when non-empty, structs always.
///
/// # Example
/// ```
/// use fhll::interpreter::{operations::cast::truthy, value::core::Value};
///
/// assert!(truthy(&Value::I32(-1)));
/// assert!(!truthy(&Value::from("")));
/// ```
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::I32(n) => *n != 0,
        Value::F32(x) => *x != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        Value::Struct(_) => true,
    }
}

fn to_str(value: &Value) -> Result<Value, Panic> {
    Ok(Value::Str(value.to_string()))
}

fn to_bool(value: &Value) -> Result<Value, Panic> {
    Ok(Value::Bool(truthy(value)))
}

fn i32_to_f32_value(value: &Value) -> Result<Value, Panic> {
    as_i32(value).map(|n| Value::F32(i32_to_f32(n)))
}

fn f32_to_i32_value(value: &Value) -> Result<Value, Panic> {
    as_f32(value).map(|x| Value::I32(f32_to_i32_saturating(x)))
}

fn str_to_i32(value: &Value) -> Result<Value, Panic> {
    let text = as_str(value)?;
    text.trim()
        .parse()
        .map(Value::I32)
        .map_err(|_| Panic::new(format!("cannot convert \"{text}\" to i32")))
}

fn str_to_f32(value: &Value) -> Result<Value, Panic> {
    let text = as_str(value)?;
    text.trim()
        .parse()
        .map(Value::F32)
        .map_err(|_| Panic::new(format!("cannot convert \"{text}\" to f32")))
}

fn bool_to_i32(value: &Value) -> Result<Value, Panic> {
    as_bool(value).map(|b| Value::I32(i32::from(b)))
}

fn bool_to_f32(value: &Value) -> Result<Value, Panic> {
    as_bool(value).map(|b| Value::F32(if b { 1.0 } else { 0.0 }))
}

/// Registers a cast for every ordered pair of distinct builtin types.
///
/// The order matters: it is the order in which the implicit right-operand
/// conversion tries targets.
pub(super) fn register(registry: &mut OperationRegistry) -> Result<(), RuntimeError> {
    use BuiltinType::{Bool, F32, I32, Str};

    let casts: [(BuiltinType, BuiltinType, UnaryHandler); 12] = [(I32, F32, i32_to_f32_value),
                                                                 (I32, Str, to_str),
                                                                 (I32, Bool, to_bool),
                                                                 (F32, I32, f32_to_i32_value),
                                                                 (F32, Str, to_str),
                                                                 (F32, Bool, to_bool),
                                                                 (Str, I32, str_to_i32),
                                                                 (Str, F32, str_to_f32),
                                                                 (Str, Bool, to_bool),
                                                                 (Bool, I32, bool_to_i32),
                                                                 (Bool, F32, bool_to_f32),
                                                                 (Bool, Str, to_str)];

    for (from, to, handler) in casts {
        registry.register_cast(from.type_name(), to.type_name(), handler)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{
        operations::registry::OperationRegistry, types::type_name::TypeName, value::core::Value,
    };

    fn cast(value: Value, to: &str) -> Result<Value, String> {
        let registry = OperationRegistry::with_builtins().unwrap();
        let conversion = registry.find_cast(&value.type_name(), &TypeName::simple(to))
                                 .unwrap();
        conversion.apply(value).map_err(|panic| panic.to_string())
    }

    #[test]
    fn numeric_casts() {
        assert_eq!(cast(Value::I32(3), "f32"), Ok(Value::F32(3.0)));
        assert_eq!(cast(Value::F32(-3.75), "i32"), Ok(Value::I32(-3)));
        assert_eq!(cast(Value::Bool(true), "i32"), Ok(Value::I32(1)));
        assert_eq!(cast(Value::Bool(false), "f32"), Ok(Value::F32(0.0)));
    }

    #[test]
    fn string_casts() {
        assert_eq!(cast(Value::I32(-12), "str"), Ok(Value::from("-12")));
        assert_eq!(cast(Value::Bool(true), "str"), Ok(Value::from("true")));
        assert_eq!(cast(Value::from(" 42 "), "i32"), Ok(Value::I32(42)));
        assert_eq!(cast(Value::from("2.5"), "f32"), Ok(Value::F32(2.5)));
        assert_eq!(cast(Value::from(""), "bool"), Ok(Value::Bool(false)));
    }

    #[test]
    fn unparsable_strings_panic() {
        assert_eq!(cast(Value::from("abc"), "i32"),
                   Err("cannot convert \"abc\" to i32".to_string()));
    }
}
