use std::collections::HashSet;

use tracing::trace;

use crate::{
    ast::{
        Access, Assignment, Block, Constant, Expression, FnCall, FunctionDeclaration,
        IfStatement, LiteralValue, MatchStatement, Module, NewStruct, ReturnStatement, Statement,
        VariableDeclaration, VariantAccess,
        location::{Located, Location},
    },
    error::{Error, InternalError, RuntimeError},
    interpreter::{
        frame::{Binding, CallStack, Frame},
        operations::registry::{describe_binary, describe_cast, describe_unary},
        types::{registry::BuiltinType, type_name::TypeName},
        validator::{Program, calls::check_arity},
    },
    util::{num::u64_to_i32_checked, stack::guarded},
};

type Checked<T> = Result<T, Error>;

/// Type-checks function bodies by evaluating them over types instead of
/// values.
///
/// Scoping mirrors the evaluator exactly: a function body runs in its call
/// scope next to the parameters, every nested block and every match arm
/// opens a scope, and a matcher's name is bound in its arm's scope.
pub struct DynamicValidator<'p> {
    program:     &'p Program,
    stack:       CallStack<TypeName>,
    function:    String,
    return_type: Option<TypeName>,
}

impl<'p> DynamicValidator<'p> {
    /// Creates a validator over collected registries.
    #[must_use]
    pub const fn new(program: &'p Program) -> Self {
        Self { program,
               stack: CallStack::new(1),
               function: String::new(),
               return_type: None }
    }

    /// Checks every function of the module, in declaration order.
    ///
    /// # Errors
    /// The first type error found; see [`RuntimeError`] for the conditions.
    pub fn check_module(&mut self, module: &Module) -> Checked<()> {
        module.functions
              .iter()
              .try_for_each(|function| self.check_function(function))
    }

    fn check_function(&mut self, function: &FunctionDeclaration) -> Checked<()> {
        trace!(function = %function.name.value, "checking function body");
        let mut frame = Frame::new();
        for parameter in &function.parameters {
            frame.declare(&parameter.name.value,
                          Binding { mutable: parameter.mutable,
                                    value:   parameter.ty.type_name(), },
                          parameter.location)?;
        }

        self.function.clone_from(&function.name.value);
        self.return_type = function.return_type.as_ref().map(VariantAccess::type_name);

        self.stack.push(frame, function.location)?;
        self.statements(&function.block.statements)?;
        self.stack.pop()?;
        Ok(())
    }

    fn frame(&mut self) -> Result<&mut Frame<TypeName>, InternalError> {
        self.stack.current_mut()
    }

    fn statements(&mut self, statements: &[Statement]) -> Checked<()> {
        statements.iter()
                  .try_for_each(|statement| self.statement(statement))
    }

    fn scoped(&mut self, block: &Block) -> Checked<()> {
        self.frame()?.push_scope();
        self.statements(&block.statements)?;
        self.frame()?.pop_scope()?;
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> Checked<()> {
        guarded(|| self.statement_inner(statement))
    }

    fn statement_inner(&mut self, statement: &Statement) -> Checked<()> {
        match statement {
            Statement::VariableDeclaration(declaration) => self.declaration(declaration),
            Statement::Assignment(assignment) => self.assignment(assignment),
            Statement::FnCall(call) => self.call(call).map(|_| ()),
            Statement::Return(ret) => self.ret(ret),
            Statement::If(statement) => self.if_statement(statement),
            Statement::While(statement) => {
                self.condition(&statement.condition)?;
                self.scoped(&statement.block)
            },
            Statement::Match(statement) => self.match_statement(statement),
            Statement::Block(block) => self.scoped(block),
        }
    }

    fn declaration(&mut self, declaration: &VariableDeclaration) -> Checked<()> {
        let declared = match &declaration.ty {
            Some(ty) => {
                let type_name = ty.type_name();
                self.program.types.resolve(&type_name, ty.location)?;
                Some(type_name)
            },
            None => None,
        };
        let found = match &declaration.value {
            Some(value) => Some(self.value_type(value)?),
            None => None,
        };

        let name = &declaration.name.value;
        let type_name = match (declared, found) {
            (None, None) => {
                return Err(RuntimeError::InferenceError { name:     name.clone(),
                                                          location: declaration.location, }.into());
            },
            (Some(declared), Some(found)) => {
                self.convertible(&found, &declared, declaration.location)?;
                declared
            },
            (Some(declared), None) => {
                if !declaration.mutable {
                    return Err(RuntimeError::EmptyVariable { name:     name.clone(),
                                                             location: declaration.location, }.into());
                }
                self.program.types.default_value(&declared, declaration.location)?;
                declared
            },
            (None, Some(found)) => found,
        };

        self.frame()?.declare(name,
                              Binding { mutable: declaration.mutable,
                                        value:   type_name, },
                              declaration.name.location)?;
        Ok(())
    }

    fn assignment(&mut self, assignment: &Assignment) -> Checked<()> {
        let (mutable, target) = self.access(&assignment.target)?;
        if !mutable {
            let root = assignment.target.root();
            return Err(RuntimeError::AssignmentToConstant { name:     root.value.clone(),
                                                            location: assignment.location, }.into());
        }
        let found = self.value_type(&assignment.value)?;
        self.convertible(&found, &target, assignment.location)
    }

    fn ret(&mut self, ret: &ReturnStatement) -> Checked<()> {
        match (&ret.value, self.return_type.clone()) {
            (Some(value), Some(expected)) => {
                let found = self.value_type(value)?;
                if !found.is_derived_from(&expected) {
                    return Err(RuntimeError::InvalidType { expected,
                                                           found,
                                                           location: value.location() }.into());
                }
                Ok(())
            },
            (Some(_), None) => Err(RuntimeError::ReturnValueInVoid { function: self.function.clone(),
                                                                     location: ret.location, }.into()),
            (None, Some(_)) => Err(RuntimeError::MissingReturnValue { function: self.function.clone(),
                                                                      location: ret.location, }.into()),
            (None, None) => Ok(()),
        }
    }

    fn if_statement(&mut self, statement: &IfStatement) -> Checked<()> {
        self.condition(&statement.condition)?;
        self.scoped(&statement.then_block)?;
        match &statement.else_block {
            Some(block) => self.scoped(block),
            None => Ok(()),
        }
    }

    fn match_statement(&mut self, statement: &MatchStatement) -> Checked<()> {
        let scrutinee = self.value_type(&statement.value)?;
        for matcher in &statement.matchers {
            let bound = if matcher.ty.is_wildcard() {
                scrutinee.clone()
            } else {
                matcher.ty.type_name()
            };
            self.frame()?.push_scope();
            self.frame()?.declare(&matcher.name.value,
                                  Binding { mutable: false,
                                            value:   bound, },
                                  matcher.name.location)?;
            self.scoped(&matcher.block)?;
            self.frame()?.pop_scope()?;
        }
        Ok(())
    }

    /// A condition is anything that converts to `bool`.
    fn condition(&mut self, condition: &Expression) -> Checked<()> {
        let found = self.value_type(condition)?;
        self.convertible(&found, &BuiltinType::Bool.type_name(), condition.location())
    }

    fn convertible(&self, from: &TypeName, to: &TypeName, location: Location) -> Checked<()> {
        if self.program.operations.find_cast(from, to).is_none() {
            return Err(RuntimeError::MissingOperation { operation: describe_cast(from, to),
                                                        location }.into());
        }
        Ok(())
    }

    /// Mutability of the root binding and type of the whole path.
    fn access(&self, access: &Access) -> Checked<(bool, TypeName)> {
        let root = access.root();
        let binding = self.stack.current()?.get(&root.value, root.location)?;
        let mutable = binding.mutable;
        let mut type_name = binding.value.clone();

        for field in access.fields() {
            let next = self.program
                           .types
                           .get_struct(&type_name)
                           .and_then(|structure| structure.field(&field.value))
                           .cloned()
                           .ok_or_else(|| RuntimeError::UndefinedField { type_name: type_name.clone(),
                                                                         field:     field.value.clone(),
                                                                         location:  field.location, })?;
            type_name = next;
        }
        Ok((mutable, type_name))
    }

    /// The return type of a call, `None` for void functions.
    fn call(&mut self, call: &FnCall) -> Checked<Option<TypeName>> {
        let program = self.program;
        check_arity(call, &program.functions)?;
        let function = program.functions
                              .get(&call.name.value)
                              .ok_or_else(|| InternalError::MissingFunction { name: call.name.value.clone() })?;

        for (argument, parameter) in call.arguments.iter().zip(function.parameters()) {
            let found = self.value_type(argument)?;
            if !found.is_derived_from(&parameter.type_name) {
                return Err(RuntimeError::InvalidType { expected: parameter.type_name.clone(),
                                                       found,
                                                       location: argument.location() }.into());
            }
        }
        Ok(function.return_type().cloned())
    }

    fn new_struct(&mut self, literal: &NewStruct) -> Checked<TypeName> {
        let program = self.program;
        let type_name = literal.ty.type_name();
        let structure =
            program.types
                   .get_struct(&type_name)
                   .ok_or_else(|| RuntimeError::UndefinedStruct { type_name: type_name.clone(),
                                                                  location:  literal.ty.location, })?;

        let mut assigned = HashSet::new();
        for assignment in &literal.assignments {
            let target = &assignment.target;
            let [field] = target.names.as_slice() else {
                return Err(RuntimeError::InvalidFieldAssignment { field:    target.to_string(),
                                                                  location: assignment.location, }.into());
            };
            if !assigned.insert(field.value.as_str()) {
                return Err(RuntimeError::InvalidFieldAssignment { field:    field.value.clone(),
                                                                  location: assignment.location, }.into());
            }
            let expected = structure.field(&field.value).ok_or_else(|| {
                                                            RuntimeError::AssignmentToUndefinedField {
                    type_name: type_name.clone(),
                    field: field.value.clone(),
                    location: field.location,
                }
                                                        })?;
            let found = self.value_type(&assignment.value)?;
            if !found.is_derived_from(expected) {
                return Err(RuntimeError::InvalidType { expected: expected.clone(),
                                                       found,
                                                       location: assignment.value.location() }.into());
            }
        }

        for (name, field_type) in &structure.fields {
            if !assigned.contains(name.as_str()) {
                program.types.default_value(field_type, literal.location)?;
            }
        }
        Ok(type_name)
    }

    /// The static type of an expression that must produce a value.
    fn value_type(&mut self, expression: &Expression) -> Checked<TypeName> {
        guarded(|| self.value_type_inner(expression))
    }

    fn value_type_inner(&mut self, expression: &Expression) -> Checked<TypeName> {
        let program = self.program;
        let operations = &program.operations;
        match expression {
            Expression::Constant(constant) => constant_type(constant),
            Expression::Access(access) => self.access(access).map(|(_, type_name)| type_name),
            Expression::FnCall(call) => self.call(call)?.ok_or_else(|| {
                                                            RuntimeError::InferenceError { name:     call.name.value.clone(),
                                                                                           location: call.location, }.into()
                                                        }),
            Expression::NewStruct(literal) => self.new_struct(literal),
            Expression::BoolOperation(e) => {
                let left = self.value_type(&e.left)?;
                let right = self.value_type(&e.right)?;
                operations.find_bool(e.op, &left, &right)
                          .map(|resolved| resolved.result().clone())
                          .ok_or_else(|| missing(describe_binary(e.op, &left, &right), e.location))
            },
            Expression::Compare(e) => {
                let left = self.value_type(&e.left)?;
                let right = self.value_type(&e.right)?;
                operations.find_compare(e.op, &left, &right)
                          .map(|resolved| resolved.result().clone())
                          .ok_or_else(|| missing(describe_binary(e.op, &left, &right), e.location))
            },
            Expression::BinaryOperation(e) => {
                let left = self.value_type(&e.left)?;
                let right = self.value_type(&e.right)?;
                operations.find_binary(e.op, &left, &right)
                          .map(|resolved| resolved.result().clone())
                          .ok_or_else(|| missing(describe_binary(e.op, &left, &right), e.location))
            },
            Expression::UnaryOperation(e) => {
                let operand = self.value_type(&e.operand)?;
                operations.find_unary(e.op, &operand)
                          .map(|implementation| implementation.result.clone())
                          .ok_or_else(|| missing(describe_unary(e.op, &operand), e.location))
            },
            Expression::Cast(cast) => {
                let from = self.value_type(&cast.value)?;
                let to = cast.ty.type_name();
                program.types.resolve(&to, cast.ty.location)?;
                self.convertible(&from, &to, cast.location)?;
                Ok(to)
            },
            Expression::IsCompare(test) => {
                self.value_type(&test.value)?;
                program.types.resolve(&test.ty.type_name(), test.ty.location)?;
                Ok(BuiltinType::Bool.type_name())
            },
        }
    }
}

fn missing(operation: String, location: Location) -> Error {
    RuntimeError::MissingOperation { operation,
                                     location }.into()
}

fn constant_type(constant: &Constant) -> Checked<TypeName> {
    let builtin = match &constant.value {
        LiteralValue::Integer(value) => {
            u64_to_i32_checked(*value,
                               RuntimeError::IntegerLiteralOutOfRange { value:    *value,
                                                                        location: constant.location, })?;
            BuiltinType::I32
        },
        LiteralValue::Floating(_) => BuiltinType::F32,
        LiteralValue::Boolean(_) => BuiltinType::Bool,
        LiteralValue::Str(_) => BuiltinType::Str,
    };
    Ok(builtin.type_name())
}
