use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::location::Location,
    error::RuntimeError,
    interpreter::{
        types::type_name::TypeName,
        value::core::{StructValue, Value},
    },
};

/// The types every program can use without declaring them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// 32-bit signed integer.
    I32,
    /// 32-bit float.
    F32,
    /// UTF-8 string.
    Str,
    /// Boolean.
    Bool,
}

impl BuiltinType {
    /// All builtin types, in registration order.
    pub const ALL: [Self; 4] = [Self::I32, Self::F32, Self::Str, Self::Bool];

    /// The keyword naming this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::F32 => "f32",
            Self::Str => "str",
            Self::Bool => "bool",
        }
    }

    /// The registry key of this type.
    #[must_use]
    pub fn type_name(self) -> TypeName {
        TypeName::simple(self.name())
    }

    /// The zero value a default-initialised variable of this type holds.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::I32 => Value::I32(0),
            Self::F32 => Value::F32(0.0),
            Self::Str => Value::Str(String::new()),
            Self::Bool => Value::Bool(false),
        }
    }

    /// Looks a builtin up by its type name.
    #[must_use]
    pub fn from_type_name(type_name: &TypeName) -> Option<Self> {
        Self::ALL.into_iter()
                 .find(|builtin| type_name.segments() == [builtin.name()])
    }
}

/// A declared struct: its fields, in declaration order, with their types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructImplementation {
    /// The unqualified name.
    pub name:      String,
    /// The fully-qualified name.
    pub type_name: TypeName,
    /// Field names and their resolved types.
    pub fields:    Vec<(String, TypeName)>,
    /// The declaration.
    pub location:  Location,
}

impl StructImplementation {
    /// The declared type of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&TypeName> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

/// A declared enum: the names of its struct and enum variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumImplementation {
    /// The unqualified name.
    pub name:      String,
    /// The fully-qualified name.
    pub type_name: TypeName,
    /// Variant names and the qualified types they register.
    pub variants:  Vec<(String, TypeName)>,
    /// The declaration.
    pub location:  Location,
}

/// What a registered type name stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// One of the builtin scalar types.
    Builtin(BuiltinType),
    /// A struct; its fields live in the struct sub-registry.
    Struct,
    /// An enum; its variants live in the enum sub-registry.
    Enum,
}

/// Every type known to a program, keyed by fully-qualified name.
///
/// Structs and enums additionally live in their own sub-registries. The
/// registry is filled while collecting a module and read-only afterwards.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types:   HashMap<TypeName, TypeKind>,
    structs: HashMap<TypeName, StructImplementation>,
    enums:   HashMap<TypeName, EnumImplementation>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding only the builtin types.
    #[must_use]
    pub fn new() -> Self {
        let types = BuiltinType::ALL.into_iter()
                                    .map(|builtin| (builtin.type_name(), TypeKind::Builtin(builtin)))
                                    .collect();
        Self { types,
               structs: HashMap::new(),
               enums: HashMap::new() }
    }

    /// Registers a struct.
    ///
    /// # Errors
    /// `TypeRedeclaration` if any type already uses the name.
    pub fn register_struct(&mut self, implementation: StructImplementation) -> Result<(), RuntimeError> {
        self.claim(&implementation.type_name, TypeKind::Struct, implementation.location)?;
        debug!(type_name = %implementation.type_name, "registered struct");
        self.structs
            .insert(implementation.type_name.clone(), implementation);
        Ok(())
    }

    /// Registers an enum.
    ///
    /// # Errors
    /// `TypeRedeclaration` if any type already uses the name.
    pub fn register_enum(&mut self, implementation: EnumImplementation) -> Result<(), RuntimeError> {
        self.claim(&implementation.type_name, TypeKind::Enum, implementation.location)?;
        debug!(type_name = %implementation.type_name, "registered enum");
        self.enums.insert(implementation.type_name.clone(), implementation);
        Ok(())
    }

    fn claim(&mut self,
             type_name: &TypeName,
             kind: TypeKind,
             location: Location)
             -> Result<(), RuntimeError> {
        if self.types.contains_key(type_name) {
            return Err(RuntimeError::TypeRedeclaration { type_name: type_name.clone(),
                                                         location });
        }
        self.types.insert(type_name.clone(), kind);
        Ok(())
    }

    /// Whether the name is registered.
    #[must_use]
    pub fn contains(&self, type_name: &TypeName) -> bool {
        self.types.contains_key(type_name)
    }

    /// What kind of type the name stands for.
    #[must_use]
    pub fn kind(&self, type_name: &TypeName) -> Option<TypeKind> {
        self.types.get(type_name).copied()
    }

    /// Resolves a type reference written at `location`.
    ///
    /// # Errors
    /// `UnknownType` if the name is not registered.
    pub fn resolve(&self, type_name: &TypeName, location: Location) -> Result<TypeKind, RuntimeError> {
        self.kind(type_name)
            .ok_or_else(|| RuntimeError::UnknownType { type_name: type_name.clone(),
                                                       location })
    }

    /// The struct registered under the name, if it is one.
    #[must_use]
    pub fn get_struct(&self, type_name: &TypeName) -> Option<&StructImplementation> {
        self.structs.get(type_name)
    }

    /// Mutable access for the collector's field-resolution phase.
    pub(in crate::interpreter::types) fn get_struct_mut(&mut self,
                                                         type_name: &TypeName)
                                                         -> Option<&mut StructImplementation> {
        self.structs.get_mut(type_name)
    }

    /// The enum registered under the name, if it is one.
    #[must_use]
    pub fn get_enum(&self, type_name: &TypeName) -> Option<&EnumImplementation> {
        self.enums.get(type_name)
    }

    /// Builds the value a variable of this type holds when declared without
    /// an initialiser: zero for builtins, and for structs every field
    /// defaulted in declaration order.
    ///
    /// # Errors
    /// - `EnumDefaultValue` when the type, or any field reached, is an enum.
    /// - `RecursiveDefaultValue` when a struct reaches itself through its
    ///   fields.
    /// - `UnknownType` for unregistered names.
    ///
    /// # Example
    /// ```
    /// use fhll::interpreter::{
    ///     types::{registry::TypeRegistry, type_name::TypeName},
    ///     value::core::Value,
    /// };
    ///
    /// let registry = TypeRegistry::new();
    /// let zero = registry.default_value(&TypeName::simple("i32"), Default::default());
    /// assert_eq!(zero.unwrap(), Value::I32(0));
    /// ```
    pub fn default_value(&self, type_name: &TypeName, location: Location) -> Result<Value, RuntimeError> {
        self.default_value_guarded(type_name, location, &mut Vec::new())
    }

    fn default_value_guarded(&self,
                             type_name: &TypeName,
                             location: Location,
                             visiting: &mut Vec<TypeName>)
                             -> Result<Value, RuntimeError> {
        match self.resolve(type_name, location)? {
            TypeKind::Builtin(builtin) => Ok(builtin.default_value()),
            TypeKind::Enum => Err(RuntimeError::EnumDefaultValue { type_name: type_name.clone(),
                                                                   location }),
            TypeKind::Struct => {
                if visiting.contains(type_name) {
                    return Err(RuntimeError::RecursiveDefaultValue { type_name:
                                                                         type_name.clone(),
                                                                     location });
                }
                let implementation = self.structs.get(type_name).ok_or_else(|| {
                                                                     RuntimeError::UnknownType {
                        type_name: type_name.clone(),
                        location,
                    }
                                                                 })?;
                visiting.push(type_name.clone());
                let fields = implementation.fields
                                           .iter()
                                           .map(|(name, field_type)| {
                                               self.default_value_guarded(field_type,
                                                                          location,
                                                                          visiting)
                                                   .map(|value| (name.clone(), value))
                                           })
                                           .collect::<Result<Vec<_>, _>>()?;
                visiting.pop();
                Ok(Value::Struct(StructValue { type_name: type_name.clone(),
                                               fields }))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BuiltinType, EnumImplementation, StructImplementation, TypeRegistry};
    use crate::{
        ast::location::Location,
        error::RuntimeError,
        interpreter::{types::type_name::TypeName, value::core::Value},
    };

    fn structure(path: &str, fields: &[(&str, &str)]) -> StructImplementation {
        let type_name = TypeName::parse(path).unwrap();
        StructImplementation { name: type_name.last().to_string(),
                               type_name,
                               fields: fields.iter()
                                             .map(|(n, t)| ((*n).to_string(), TypeName::parse(t).unwrap()))
                                             .collect(),
                               location: Location::default() }
    }

    #[test]
    fn builtins_are_preregistered() {
        let registry = TypeRegistry::new();
        for builtin in BuiltinType::ALL {
            assert!(registry.contains(&builtin.type_name()));
            assert_eq!(BuiltinType::from_type_name(&builtin.type_name()), Some(builtin));
        }
    }

    #[test]
    fn registering_a_name_twice_fails() {
        let mut registry = TypeRegistry::new();
        registry.register_struct(structure("A", &[])).unwrap();
        let err = registry.register_struct(structure("A", &[])).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeRedeclaration { .. }));

        let err = registry.register_struct(structure("i32", &[])).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeRedeclaration { .. }));
    }

    #[test]
    fn struct_defaults_follow_field_order() {
        let mut registry = TypeRegistry::new();
        registry.register_struct(structure("Item", &[("amount", "i32"), ("label", "str")]))
                .unwrap();
        let value = registry.default_value(&TypeName::simple("Item"), Location::default())
                            .unwrap();
        let Value::Struct(item) = value else { panic!("expected a struct") };
        assert_eq!(item.fields,
                   vec![("amount".to_string(), Value::I32(0)),
                        ("label".to_string(), Value::Str(String::new()))]);
    }

    #[test]
    fn enums_and_cycles_have_no_default() {
        let mut registry = TypeRegistry::new();
        registry.register_enum(EnumImplementation { name:      "List".into(),
                                                    type_name: TypeName::simple("List"),
                                                    variants:  vec![],
                                                    location:  Location::default(), })
                .unwrap();
        registry.register_struct(structure("Holder", &[("list", "List")])).unwrap();
        registry.register_struct(structure("Loop", &[("next", "Loop")])).unwrap();

        let err = registry.default_value(&TypeName::simple("Holder"), Location::default())
                          .unwrap_err();
        assert!(matches!(err, RuntimeError::EnumDefaultValue { .. }));

        let err = registry.default_value(&TypeName::simple("Loop"), Location::default())
                          .unwrap_err();
        assert!(matches!(err, RuntimeError::RecursiveDefaultValue { .. }));
    }
}
