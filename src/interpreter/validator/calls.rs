use std::cmp::Ordering;

use crate::{
    ast::{Expression, FnCall, Module, Statement},
    error::RuntimeError,
    interpreter::{
        functions::registry::FunctionRegistry,
        validator::walk::{Visitor, walk_block},
    },
};

/// Checks that every call names a registered function and passes as many
/// arguments as it has parameters.
///
/// # Errors
/// `UndefinedFunction`, `TooFewArguments` or `TooManyArguments`.
pub fn check_calls(module: &Module, functions: &FunctionRegistry) -> Result<(), RuntimeError> {
    let mut checker = CallSites { functions };
    module.functions
          .iter()
          .try_for_each(|function| walk_block(&mut checker, &function.block))
}

/// Checks one call against the registry.
///
/// # Errors
/// `UndefinedFunction`, `TooFewArguments` or `TooManyArguments`.
pub fn check_arity(call: &FnCall, functions: &FunctionRegistry) -> Result<(), RuntimeError> {
    let name = &call.name.value;
    let function =
        functions.get(name)
                 .ok_or_else(|| RuntimeError::UndefinedFunction { name:     name.clone(),
                                                                  location: call.name.location, })?;

    let expected = function.parameters().len();
    let found = call.arguments.len();
    match found.cmp(&expected) {
        Ordering::Less => Err(RuntimeError::TooFewArguments { name: name.clone(),
                                                              expected,
                                                              found,
                                                              location: call.location }),
        Ordering::Greater => Err(RuntimeError::TooManyArguments { name: name.clone(),
                                                                  expected,
                                                                  found,
                                                                  location: call.location }),
        Ordering::Equal => Ok(()),
    }
}

struct CallSites<'f> {
    functions: &'f FunctionRegistry,
}

impl Visitor for CallSites<'_> {
    fn visit_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::FnCall(call) => check_arity(call, self.functions),
            _ => Ok(()),
        }
    }

    fn visit_expression(&mut self, expression: &Expression) -> Result<(), RuntimeError> {
        match expression {
            Expression::FnCall(call) => check_arity(call, self.functions),
            _ => Ok(()),
        }
    }
}
