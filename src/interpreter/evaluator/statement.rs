use crate::{
    ast::{
        Assignment, Block, IfStatement, MatchStatement, Statement, VariableDeclaration,
        VariantAccess, WhileStatement,
    },
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Flow, Variable},
        frame::Binding,
    },
    util::stack::guarded,
};

impl Evaluator<'_, '_> {
    /// Runs statements in order until one returns.
    pub(in crate::interpreter::evaluator) fn statements(&mut self,
                                                        statements: &[Statement])
                                                        -> EvalResult<Flow> {
        for statement in statements {
            if let Flow::Return(value) = self.execute(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    /// Runs a block in a scope of its own.
    pub(in crate::interpreter::evaluator) fn scoped(&mut self, block: &Block) -> EvalResult<Flow> {
        self.frame()?.push_scope();
        let flow = self.statements(&block.statements)?;
        self.frame()?.pop_scope()?;
        Ok(flow)
    }

    fn execute(&mut self, statement: &Statement) -> EvalResult<Flow> {
        guarded(|| self.execute_inner(statement))
    }

    fn execute_inner(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::VariableDeclaration(declaration) => {
                self.declare(declaration)?;
                Ok(Flow::Next)
            },
            Statement::Assignment(assignment) => {
                self.assign(assignment)?;
                Ok(Flow::Next)
            },
            Statement::FnCall(call) => {
                self.call(call)?;
                Ok(Flow::Next)
            },
            Statement::Return(ret) => {
                let value = match &ret.value {
                    Some(value) => Some(self.evaluate(value)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            },
            Statement::If(statement) => self.if_statement(statement),
            Statement::While(statement) => self.while_statement(statement),
            Statement::Match(statement) => self.match_statement(statement),
            Statement::Block(block) => self.scoped(block),
        }
    }

    fn declare(&mut self, declaration: &VariableDeclaration) -> EvalResult<()> {
        let declared = declaration.ty.as_ref().map(VariantAccess::type_name);
        let variable = match (declared, &declaration.value) {
            (Some(type_name), Some(expression)) => {
                let value = self.evaluate(expression)?;
                let value = self.coerce(value, &type_name, declaration.location)?;
                Variable { type_name, value }
            },
            (Some(type_name), None) => {
                let value = self.program
                                .types
                                .default_value(&type_name, declaration.location)?;
                Variable { type_name, value }
            },
            (None, Some(expression)) => {
                let value = self.evaluate(expression)?;
                let type_name = self.static_type(expression, &value)?;
                Variable { type_name, value }
            },
            (None, None) => {
                return Err(RuntimeError::InferenceError { name:     declaration.name.value.clone(),
                                                          location: declaration.location, }.into());
            },
        };

        self.frame()?.declare(&declaration.name.value,
                              Binding { mutable: declaration.mutable,
                                        value:   variable, },
                              declaration.name.location)?;
        Ok(())
    }

    fn assign(&mut self, assignment: &Assignment) -> EvalResult<()> {
        let target = &assignment.target;
        let value = self.evaluate(&assignment.value)?;
        let target_type = self.access_type(target)?;
        let value = self.coerce(value, &target_type, assignment.location)?;

        let root = target.root();
        let binding = self.frame()?.get_mut(&root.value, root.location)?;
        if !binding.mutable {
            return Err(RuntimeError::AssignmentToConstant { name:     root.value.clone(),
                                                            location: assignment.location, }.into());
        }

        let variable = &mut binding.value;
        let path = target.fields().iter().map(|field| field.value.as_str());
        let slot = variable.value.field_path_mut(path).ok_or_else(|| {
                                                       RuntimeError::UndefinedField { type_name: variable.type_name.clone(),
                                                                                      field:     target.to_string(),
                                                                                      location:  target.location, }
                                                   })?;
        *slot = value;
        Ok(())
    }

    fn if_statement(&mut self, statement: &IfStatement) -> EvalResult<Flow> {
        if self.condition(&statement.condition)? {
            self.scoped(&statement.then_block)
        } else if let Some(block) = &statement.else_block {
            self.scoped(block)
        } else {
            Ok(Flow::Next)
        }
    }

    fn while_statement(&mut self, statement: &WhileStatement) -> EvalResult<Flow> {
        while self.condition(&statement.condition)? {
            if let Flow::Return(value) = self.scoped(&statement.block)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    /// Runs the first arm whose type the scrutinee derives from, or the `_`
    /// arm. The matcher's name is bound to the scrutinee in the arm's scope.
    fn match_statement(&mut self, statement: &MatchStatement) -> EvalResult<Flow> {
        let value = self.evaluate(&statement.value)?;
        let runtime_type = value.type_name();

        let Some(matcher) = statement.matchers.iter().find(|matcher| {
                                                         matcher.ty.is_wildcard()
                                                         || runtime_type.is_derived_from(&matcher.ty.type_name())
                                                     })
        else {
            return Ok(Flow::Next);
        };

        let type_name = if matcher.ty.is_wildcard() {
            self.static_type(&statement.value, &value)?
        } else {
            matcher.ty.type_name()
        };

        self.frame()?.push_scope();
        self.frame()?.declare(&matcher.name.value,
                              Binding { mutable: false,
                                        value:   Variable { type_name, value }, },
                              matcher.name.location)?;
        let flow = self.scoped(&matcher.block)?;
        self.frame()?.pop_scope()?;
        Ok(flow)
    }
}
