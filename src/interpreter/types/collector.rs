use std::collections::HashSet;

use crate::{
    ast::{EnumDeclaration, EnumVariant, Module, StructDeclaration, location::Location},
    error::RuntimeError,
    interpreter::types::{
        registry::{EnumImplementation, StructImplementation, TypeRegistry},
        type_name::TypeName,
    },
};

/// A field whose declared type is checked once every type name is known.
struct PendingField {
    owner:    TypeName,
    name:     String,
    declared: TypeName,
    location: Location,
}

/// Registers every struct and enum of a module.
///
/// Collection runs in two phases. The first registers each declaration under
/// its fully-qualified name, nesting enum variants in their enum's namespace,
/// and queues the struct fields. The second resolves each queued field against
/// the now complete registry and attaches it to its struct. Splitting the
/// phases is what lets a struct mention its own umbrella enum.
///
/// # Errors
/// - `TypeRedeclaration` for a second declaration of the same qualified name.
/// - `FieldRedeclaration` for duplicate field names within a struct.
/// - `UnknownType` for a field whose type is not declared anywhere.
pub fn collect_types(module: &Module, registry: &mut TypeRegistry) -> Result<(), RuntimeError> {
    let mut pending = Vec::new();

    for declaration in &module.structs {
        register_struct(declaration, None, registry, &mut pending)?;
    }
    for declaration in &module.enums {
        register_enum(declaration, None, registry, &mut pending)?;
    }

    for field in pending {
        registry.resolve(&field.declared, field.location)?;
        let owner = registry.get_struct_mut(&field.owner).ok_or_else(|| {
                                                            RuntimeError::UnknownType {
                type_name: field.owner.clone(),
                location: field.location,
            }
                                                        })?;
        owner.fields.push((field.name, field.declared));
    }

    Ok(())
}

fn qualify(namespace: Option<&TypeName>, name: &str) -> TypeName {
    namespace.map_or_else(|| TypeName::simple(name), |ns| ns.extend(name))
}

fn register_struct(declaration: &StructDeclaration,
                   namespace: Option<&TypeName>,
                   registry: &mut TypeRegistry,
                   pending: &mut Vec<PendingField>)
                   -> Result<TypeName, RuntimeError> {
    let type_name = qualify(namespace, &declaration.name.value);
    registry.register_struct(StructImplementation { name:      declaration.name.value.clone(),
                                                    type_name: type_name.clone(),
                                                    fields:    Vec::new(),
                                                    location:  declaration.location, })?;

    let mut seen = HashSet::new();
    for field in &declaration.fields {
        if !seen.insert(field.name.value.as_str()) {
            return Err(RuntimeError::FieldRedeclaration { type_name: type_name.clone(),
                                                          field:     field.name.value.clone(),
                                                          location:  field.location, });
        }
        pending.push(PendingField { owner:    type_name.clone(),
                                    name:     field.name.value.clone(),
                                    declared: field.ty.type_name(),
                                    location: field.ty.location, });
    }

    Ok(type_name)
}

fn register_enum(declaration: &EnumDeclaration,
                 namespace: Option<&TypeName>,
                 registry: &mut TypeRegistry,
                 pending: &mut Vec<PendingField>)
                 -> Result<TypeName, RuntimeError> {
    let type_name = qualify(namespace, &declaration.name.value);

    let mut variants = Vec::with_capacity(declaration.variants.len());
    for variant in &declaration.variants {
        variants.push(match variant {
                          EnumVariant::Struct(s) => (s.name.value.clone(), type_name.extend(&s.name.value)),
                          EnumVariant::Enum(e) => (e.name.value.clone(), type_name.extend(&e.name.value)),
                      });
    }
    registry.register_enum(EnumImplementation { name: declaration.name.value.clone(),
                                                type_name: type_name.clone(),
                                                variants,
                                                location: declaration.location })?;

    for variant in &declaration.variants {
        match variant {
            EnumVariant::Struct(s) => register_struct(s, Some(&type_name), registry, pending)?,
            EnumVariant::Enum(e) => register_enum(e, Some(&type_name), registry, pending)?,
        };
    }

    Ok(type_name)
}
