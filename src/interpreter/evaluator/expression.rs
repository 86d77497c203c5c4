use crate::{
    ast::{
        Access, BoolOperation, BoolOperator, Constant, Expression, FnCall, LiteralValue, NewStruct,
        location::{Located, Location},
    },
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        operations::registry::{describe_binary, describe_unary},
        value::core::{StructValue, Value},
    },
    util::{
        num::{f64_to_f32, u64_to_i32_checked},
        stack::guarded,
    },
};

fn missing(operation: String, location: Location) -> Error {
    RuntimeError::MissingOperation { operation,
                                     location }.into()
}

impl Evaluator<'_, '_> {
    /// Evaluates an expression that must produce a value.
    pub(in crate::interpreter::evaluator) fn evaluate(&mut self, expression: &Expression) -> EvalResult<Value> {
        guarded(|| self.evaluate_inner(expression))
    }

    fn evaluate_inner(&mut self, expression: &Expression) -> EvalResult<Value> {
        let program = self.program;
        let operations = &program.operations;

        match expression {
            Expression::Constant(constant) => constant_value(constant),
            Expression::Access(access) => self.read(access),
            Expression::FnCall(call) => self.call(call)?.ok_or_else(|| {
                                                            RuntimeError::InferenceError { name:     call.name.value.clone(),
                                                                                           location: call.location, }.into()
                                                        }),
            Expression::NewStruct(literal) => self.new_struct(literal),
            Expression::BoolOperation(operation) => self.logical(operation),
            Expression::Compare(e) => {
                let left = self.evaluate(&e.left)?;
                let right = self.evaluate(&e.right)?;
                let (left_type, right_type) = (left.type_name(), right.type_name());
                let resolved =
                    operations.find_compare(e.op, &left_type, &right_type)
                              .ok_or_else(|| missing(describe_binary(e.op, &left_type, &right_type), e.location))?;
                resolved.apply(&left, right)
                        .map_err(|panic| panic.at(e.location).into())
            },
            Expression::BinaryOperation(e) => {
                let left = self.evaluate(&e.left)?;
                let right = self.evaluate(&e.right)?;
                let (left_type, right_type) = (left.type_name(), right.type_name());
                let resolved =
                    operations.find_binary(e.op, &left_type, &right_type)
                              .ok_or_else(|| missing(describe_binary(e.op, &left_type, &right_type), e.location))?;
                resolved.apply(&left, right)
                        .map_err(|panic| panic.at(e.location).into())
            },
            Expression::UnaryOperation(e) => {
                let operand = self.evaluate(&e.operand)?;
                let operand_type = operand.type_name();
                let implementation =
                    operations.find_unary(e.op, &operand_type)
                              .ok_or_else(|| missing(describe_unary(e.op, &operand_type), e.location))?;
                (implementation.handler)(&operand).map_err(|panic| panic.at(e.location).into())
            },
            Expression::Cast(cast) => {
                let value = self.evaluate(&cast.value)?;
                self.coerce(value, &cast.ty.type_name(), cast.location)
            },
            Expression::IsCompare(test) => {
                let value = self.evaluate(&test.value)?;
                Ok(Value::Bool(value.type_name().is_derived_from(&test.ty.type_name())))
            },
        }
    }

    /// Evaluates the arguments left to right and calls the function.
    pub(in crate::interpreter::evaluator) fn call(&mut self, call: &FnCall) -> EvalResult<Option<Value>> {
        let arguments = call.arguments
                            .iter()
                            .map(|argument| self.evaluate(argument))
                            .collect::<EvalResult<Vec<_>>>()?;
        self.call_function(&call.name.value, arguments, call.location)
    }

    fn read(&self, access: &Access) -> EvalResult<Value> {
        let root = access.root();
        let binding = self.stack.current()?.get(&root.value, root.location)?;

        let mut value = &binding.value.value;
        for field in access.fields() {
            let next = match value {
                Value::Struct(structure) => structure.field(&field.value),
                _ => None,
            };
            value = next.ok_or_else(|| RuntimeError::UndefinedField { type_name: value.type_name(),
                                                                      field:     field.value.clone(),
                                                                      location:  field.location, })?;
        }
        Ok(value.clone())
    }

    /// `&&` and `||` with short-circuiting: the right operand is only
    /// evaluated when the left one does not decide the result.
    fn logical(&mut self, operation: &BoolOperation) -> EvalResult<Value> {
        let left = self.evaluate(&operation.left)?;
        let truthy = self.is_truthy(&left, operation.left.location())?;
        let decided = match operation.op {
            BoolOperator::And => !truthy,
            BoolOperator::Or => truthy,
        };
        if decided {
            return Ok(left);
        }

        let right = self.evaluate(&operation.right)?;
        let (left_type, right_type) = (left.type_name(), right.type_name());
        let resolved = self.program
                           .operations
                           .find_bool(operation.op, &left_type, &right_type)
                           .ok_or_else(|| {
                               missing(describe_binary(operation.op, &left_type, &right_type),
                                       operation.location)
                           })?;
        resolved.apply(&left, right)
                .map_err(|panic| panic.at(operation.location).into())
    }

    /// Builds a struct value with its fields in declaration order. Supplied
    /// initialisers run in source order; omitted fields get their type's
    /// default.
    fn new_struct(&mut self, literal: &NewStruct) -> EvalResult<Value> {
        let program = self.program;
        let type_name = literal.ty.type_name();
        let structure =
            program.types
                   .get_struct(&type_name)
                   .ok_or_else(|| RuntimeError::UndefinedStruct { type_name: type_name.clone(),
                                                                  location:  literal.ty.location, })?;

        let mut supplied = Vec::with_capacity(literal.assignments.len());
        for assignment in &literal.assignments {
            let value = self.evaluate(&assignment.value)?;
            supplied.push((assignment.target.root().value.as_str(), value));
        }

        let mut fields = Vec::with_capacity(structure.fields.len());
        for (name, field_type) in &structure.fields {
            let value = match supplied.iter().position(|(field, _)| *field == name.as_str()) {
                Some(index) => supplied.swap_remove(index).1,
                None => program.types.default_value(field_type, literal.location)?,
            };
            fields.push((name.clone(), value));
        }

        Ok(Value::Struct(StructValue { type_name,
                                       fields }))
    }
}

fn constant_value(constant: &Constant) -> EvalResult<Value> {
    Ok(match &constant.value {
        LiteralValue::Integer(value) => {
            Value::I32(u64_to_i32_checked(*value,
                                          RuntimeError::IntegerLiteralOutOfRange { value:    *value,
                                                                                   location: constant.location, })?)
        },
        LiteralValue::Floating(value) => Value::F32(f64_to_f32(value.0)),
        LiteralValue::Boolean(value) => Value::Bool(*value),
        LiteralValue::Str(value) => Value::Str(value.clone()),
    })
}
