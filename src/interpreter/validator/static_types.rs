use crate::{
    ast::{Expression, Module, Statement, VariantAccess},
    error::RuntimeError,
    interpreter::{
        types::registry::{TypeKind, TypeRegistry},
        validator::walk::{Visitor, walk_block},
    },
};

/// Checks that every type written inside a function body is registered:
/// declared variable types, matcher types other than `_`, `as` and `is`
/// targets, and struct literals, which must also name a struct.
///
/// # Errors
/// `UnknownType` for an unregistered name, `UndefinedStruct` for a struct
/// literal of a builtin or enum type.
pub fn check_types(module: &Module, types: &TypeRegistry) -> Result<(), RuntimeError> {
    let mut checker = TypeReferences { types };
    module.functions
          .iter()
          .try_for_each(|function| walk_block(&mut checker, &function.block))
}

struct TypeReferences<'t> {
    types: &'t TypeRegistry,
}

impl TypeReferences<'_> {
    fn resolve(&self, ty: &VariantAccess) -> Result<TypeKind, RuntimeError> {
        self.types.resolve(&ty.type_name(), ty.location)
    }
}

impl Visitor for TypeReferences<'_> {
    fn visit_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::VariableDeclaration(declaration) => {
                if let Some(ty) = &declaration.ty {
                    self.resolve(ty)?;
                }
            },
            Statement::Match(statement) => {
                for matcher in statement.matchers.iter().filter(|m| !m.ty.is_wildcard()) {
                    self.resolve(&matcher.ty)?;
                }
            },
            _ => {},
        }
        Ok(())
    }

    fn visit_expression(&mut self, expression: &Expression) -> Result<(), RuntimeError> {
        match expression {
            Expression::Cast(cast) => {
                self.resolve(&cast.ty)?;
            },
            Expression::IsCompare(test) => {
                self.resolve(&test.ty)?;
            },
            Expression::NewStruct(literal) => {
                if self.resolve(&literal.ty)? != TypeKind::Struct {
                    return Err(RuntimeError::UndefinedStruct { type_name: literal.ty.type_name(),
                                                               location:  literal.ty.location, });
                }
            },
            _ => {},
        }
        Ok(())
    }
}
