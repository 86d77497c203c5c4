use crate::{
    ast::{Block, Expression, Statement},
    error::RuntimeError,
    util::stack::guarded,
};

/// Hooks called for every statement and expression of a function body, in
/// source order, parents before children.
pub trait Visitor {
    /// Called once per statement.
    fn visit_statement(&mut self, _statement: &Statement) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// Called once per expression, sub-expressions included.
    fn visit_expression(&mut self, _expression: &Expression) -> Result<(), RuntimeError> {
        Ok(())
    }
}

/// Walks every statement of a block and everything nested in them.
///
/// # Errors
/// The first error a hook returns.
pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) -> Result<(), RuntimeError> {
    block.statements
         .iter()
         .try_for_each(|statement| walk_statement(visitor, statement))
}

/// Walks one statement and everything nested in it.
///
/// # Errors
/// The first error a hook returns.
pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V,
                                           statement: &Statement)
                                           -> Result<(), RuntimeError> {
    guarded(|| walk_statement_inner(visitor, statement))
}

fn walk_statement_inner<V: Visitor + ?Sized>(visitor: &mut V,
                                             statement: &Statement)
                                             -> Result<(), RuntimeError> {
    visitor.visit_statement(statement)?;
    match statement {
        Statement::VariableDeclaration(declaration) => match &declaration.value {
            Some(value) => walk_expression(visitor, value),
            None => Ok(()),
        },
        Statement::Assignment(assignment) => walk_expression(visitor, &assignment.value),
        Statement::FnCall(call) => call.arguments
                                       .iter()
                                       .try_for_each(|argument| walk_expression(visitor, argument)),
        Statement::Return(ret) => match &ret.value {
            Some(value) => walk_expression(visitor, value),
            None => Ok(()),
        },
        Statement::If(statement) => {
            walk_expression(visitor, &statement.condition)?;
            walk_block(visitor, &statement.then_block)?;
            match &statement.else_block {
                Some(block) => walk_block(visitor, block),
                None => Ok(()),
            }
        },
        Statement::While(statement) => {
            walk_expression(visitor, &statement.condition)?;
            walk_block(visitor, &statement.block)
        },
        Statement::Match(statement) => {
            walk_expression(visitor, &statement.value)?;
            statement.matchers
                     .iter()
                     .try_for_each(|matcher| walk_block(visitor, &matcher.block))
        },
        Statement::Block(block) => walk_block(visitor, block),
    }
}

/// Walks one expression and all of its sub-expressions.
///
/// # Errors
/// The first error a hook returns.
pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V,
                                            expression: &Expression)
                                            -> Result<(), RuntimeError> {
    guarded(|| walk_expression_inner(visitor, expression))
}

fn walk_expression_inner<V: Visitor + ?Sized>(visitor: &mut V,
                                              expression: &Expression)
                                              -> Result<(), RuntimeError> {
    visitor.visit_expression(expression)?;
    match expression {
        Expression::BoolOperation(e) => {
            walk_expression(visitor, &e.left)?;
            walk_expression(visitor, &e.right)
        },
        Expression::Compare(e) => {
            walk_expression(visitor, &e.left)?;
            walk_expression(visitor, &e.right)
        },
        Expression::BinaryOperation(e) => {
            walk_expression(visitor, &e.left)?;
            walk_expression(visitor, &e.right)
        },
        Expression::UnaryOperation(e) => walk_expression(visitor, &e.operand),
        Expression::Cast(e) => walk_expression(visitor, &e.value),
        Expression::IsCompare(e) => walk_expression(visitor, &e.value),
        Expression::FnCall(call) => call.arguments
                                        .iter()
                                        .try_for_each(|argument| walk_expression(visitor, argument)),
        Expression::NewStruct(e) => e.assignments
                                     .iter()
                                     .try_for_each(|assignment| walk_expression(visitor, &assignment.value)),
        Expression::Constant(_) | Expression::Access(_) => Ok(()),
    }
}
