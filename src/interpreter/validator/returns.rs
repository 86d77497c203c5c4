use crate::{
    ast::{Block, FunctionDeclaration, Module, Statement},
    error::RuntimeError,
    interpreter::validator::walk::{Visitor, walk_block},
    util::stack::guarded,
};

/// Checks every function's `return` statements against its signature, and
/// that non-void functions return on every path.
///
/// A block returns when one of its statements returns, since everything
/// after it is unreachable. `if` returns when both branches do; `match` when
/// every arm does and one of them is the `_` arm. Loops never count.
///
/// # Errors
/// - `ReturnValueInVoid` for `return value` in a void function.
/// - `MissingReturnValue` for a bare `return` in a non-void function.
/// - `MissingReturnStatement` for a non-void function with a path that falls
///   off the end of its body.
pub fn check_returns(module: &Module) -> Result<(), RuntimeError> {
    module.functions.iter().try_for_each(check_function)
}

fn check_function(function: &FunctionDeclaration) -> Result<(), RuntimeError> {
    let mut returns = ReturnValues { function: &function.name.value,
                                     non_void: function.return_type.is_some(), };
    walk_block(&mut returns, &function.block)?;

    if function.return_type.is_some() && !block_returns(&function.block) {
        return Err(RuntimeError::MissingReturnStatement { function: function.name.value.clone(),
                                                          location: function.block.location, });
    }
    Ok(())
}

struct ReturnValues<'f> {
    function: &'f str,
    non_void: bool,
}

impl Visitor for ReturnValues<'_> {
    fn visit_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        let Statement::Return(ret) = statement else {
            return Ok(());
        };
        match (&ret.value, self.non_void) {
            (Some(_), false) => Err(RuntimeError::ReturnValueInVoid { function: self.function.to_string(),
                                                                      location: ret.location, }),
            (None, true) => Err(RuntimeError::MissingReturnValue { function: self.function.to_string(),
                                                                   location: ret.location, }),
            _ => Ok(()),
        }
    }
}

fn block_returns(block: &Block) -> bool {
    block.statements.iter().any(statement_returns)
}

fn statement_returns(statement: &Statement) -> bool {
    guarded(|| match statement {
        Statement::Return(_) => true,
        Statement::If(statement) => {
            block_returns(&statement.then_block) && statement.else_block.as_ref().is_some_and(block_returns)
        },
        Statement::Match(statement) => {
            statement.matchers.iter().any(|matcher| matcher.ty.is_wildcard())
            && statement.matchers.iter().all(|matcher| block_returns(&matcher.block))
        },
        Statement::Block(block) => block_returns(block),
        Statement::VariableDeclaration(_)
        | Statement::Assignment(_)
        | Statement::FnCall(_)
        | Statement::While(_) => false,
    })
}
