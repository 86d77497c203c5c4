use std::fmt;

use crate::interpreter::types::{registry::BuiltinType, type_name::TypeName};

/// Represents a runtime value in the interpreter.
///
/// Builtin types are stored unboxed; everything user-declared is a
/// [`StructValue`] tagged with its fully-qualified type. Values are copied on
/// assignment and on argument passing; nothing is shared.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A value of type `i32`.
    I32(i32),
    /// A value of type `f32`.
    F32(f32),
    /// A value of type `str`.
    Str(String),
    /// A value of type `bool`.
    Bool(bool),
    /// An instance of a user-declared struct.
    Struct(StructValue),
}

/// An instance of a struct: its type and its fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// The concrete type, e.g. `Shape::Circle`.
    pub type_name: TypeName,
    /// Field names and values in declaration order.
    pub fields:    Vec<(String, Value)>,
}

impl StructValue {
    /// Reads a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Mutably borrows a field by name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl Value {
    /// The fully-qualified type of this value.
    ///
    /// # Example
    /// ```
    /// use fhll::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::I32(3).type_name().to_string(), "i32");
    /// assert_eq!(Value::from("x").type_name().to_string(), "str");
    /// ```
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        match self {
            Self::I32(_) => BuiltinType::I32.type_name(),
            Self::F32(_) => BuiltinType::F32.type_name(),
            Self::Str(_) => BuiltinType::Str.type_name(),
            Self::Bool(_) => BuiltinType::Bool.type_name(),
            Self::Struct(s) => s.type_name.clone(),
        }
    }

    /// Follows a field path starting at this value.
    ///
    /// Returns `None` as soon as a segment names a field that does not exist
    /// or is applied to a non-struct value.
    #[must_use]
    pub fn field_path<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> Option<&Self> {
        path.into_iter().try_fold(self, |value, field| match value {
                            Self::Struct(s) => s.field(field),
                            _ => None,
                        })
    }

    /// Mutable counterpart of [`Value::field_path`].
    pub fn field_path_mut<'a>(&mut self,
                              path: impl IntoIterator<Item = &'a str>)
                              -> Option<&mut Self> {
        path.into_iter().try_fold(self, |value, field| match value {
                            Self::Struct(s) => s.field_mut(field),
                            _ => None,
                        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32(n) => write!(f, "{n}"),
            Self::F32(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Struct(s) => {
                write!(f, "{} {{", s.type_name)?;
                for (index, (name, value)) in s.fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    match value {
                        Self::Str(text) => write!(f, " {name}: {text:?}")?,
                        _ => write!(f, " {name}: {value}")?,
                    }
                }
                if s.fields.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StructValue, Value};
    use crate::interpreter::types::type_name::TypeName;

    fn item() -> Value {
        let inner = Value::Struct(StructValue { type_name: TypeName::simple("Inner"),
                                                fields:    vec![("amount".into(), Value::I32(5))], });
        Value::Struct(StructValue { type_name: TypeName::simple("Item"),
                                    fields:    vec![("inner".into(), inner),
                                                    ("name".into(), Value::from("apple"))], })
    }

    #[test]
    fn field_paths_walk_nested_structs() {
        let value = item();
        assert_eq!(value.field_path(["inner", "amount"]), Some(&Value::I32(5)));
        assert_eq!(value.field_path(["inner", "missing"]), None);
        assert_eq!(value.field_path(["name", "amount"]), None);
    }

    #[test]
    fn field_path_mut_updates_in_place() {
        let mut value = item();
        if let Some(slot) = value.field_path_mut(["inner", "amount"]) {
            *slot = Value::I32(7);
        }
        assert_eq!(value.field_path(["inner", "amount"]), Some(&Value::I32(7)));
    }

    #[test]
    fn structs_display_with_their_fields() {
        assert_eq!(item().to_string(),
                   "Item { inner: Inner { amount: 5 }, name: \"apple\" }");
    }
}
