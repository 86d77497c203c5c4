use std::collections::HashSet;

use crate::{
    ast::{FunctionDeclaration, Module},
    error::RuntimeError,
    interpreter::{
        functions::registry::{
            FunctionImplementation, FunctionRegistry, ParameterImplementation, UserFunction,
        },
        types::registry::TypeRegistry,
    },
};

/// Registers every top-level function of a module.
///
/// # Errors
/// - `UnknownType` for a return or parameter type that is not registered.
/// - `ParameterRedeclaration` for two parameters with the same name.
/// - `FunctionRedeclaration` for a name already taken, builtins included.
pub fn collect_functions(module: &Module,
                         types: &TypeRegistry,
                         functions: &mut FunctionRegistry)
                         -> Result<(), RuntimeError> {
    for declaration in &module.functions {
        let function = user_function(declaration, types)?;
        functions.register(FunctionImplementation::User(function), declaration.name.location)?;
    }
    Ok(())
}

fn user_function(declaration: &FunctionDeclaration,
                 types: &TypeRegistry)
                 -> Result<UserFunction, RuntimeError> {
    let return_type = match &declaration.return_type {
        Some(ty) => {
            let type_name = ty.type_name();
            types.resolve(&type_name, ty.location)?;
            Some(type_name)
        },
        None => None,
    };

    let mut seen = HashSet::new();
    let mut parameters = Vec::with_capacity(declaration.parameters.len());
    for parameter in &declaration.parameters {
        if !seen.insert(parameter.name.value.as_str()) {
            return Err(RuntimeError::ParameterRedeclaration { name:     parameter.name.value.clone(),
                                                              location: parameter.location, });
        }
        let type_name = parameter.ty.type_name();
        types.resolve(&type_name, parameter.ty.location)?;
        parameters.push(ParameterImplementation { name: parameter.name.value.clone(),
                                                  type_name,
                                                  mutable: parameter.mutable });
    }

    Ok(UserFunction { name: declaration.name.value.clone(),
                      parameters,
                      return_type,
                      block: declaration.block.clone(),
                      location: declaration.location })
}
