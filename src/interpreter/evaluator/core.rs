use std::io::Write;

use tracing::info_span;

use crate::{
    ast::{
        Access, Expression,
        location::{Located, Location},
    },
    config::Config,
    error::{Error, InternalError, RuntimeError},
    interpreter::{
        frame::{CallStack, Frame},
        functions::registry::FunctionImplementation,
        operations::registry::describe_cast,
        types::{registry::BuiltinType, type_name::TypeName},
        validator::Program,
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// Both user-program failures and broken interpreter invariants surface
/// through it, as the matching [`Error`] variant.
pub type EvalResult<T> = Result<T, Error>;

/// What a variable holds at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The type the variable was declared with. The value's own type may be
    /// derived from it, e.g. a `Shape::Circle` in a `Shape` variable.
    pub type_name: TypeName,
    /// The current value.
    pub value:     Value,
}

/// How control leaves a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Next,
    /// Unwind to the enclosing call, returning the value if there is one.
    Return(Option<Value>),
}

/// Runs a validated program.
///
/// The evaluator owns the call stack and the output that `print` and
/// `println` write to. The registries are read-only.
pub struct Evaluator<'p, 'o> {
    pub(in crate::interpreter::evaluator) program: &'p Program,
    pub(in crate::interpreter::evaluator) stack:   CallStack<Variable>,
    pub(in crate::interpreter::evaluator) out:     &'o mut dyn Write,
}

impl<'p, 'o> Evaluator<'p, 'o> {
    /// Creates an evaluator writing builtin output to `out`.
    #[must_use]
    pub fn new(program: &'p Program, config: &Config, out: &'o mut dyn Write) -> Self {
        Self { program,
               stack: CallStack::new(config.max_recursion_depth),
               out }
    }

    /// Calls the entry function with no arguments and returns what it
    /// returns.
    ///
    /// # Errors
    /// - `UndefinedFunction` if no function has the entry's name.
    /// - `TooManyArguments` if the entry function declares parameters.
    /// - Any runtime error raised while it runs.
    pub fn run(&mut self, entry: &str) -> EvalResult<Option<Value>> {
        let _span = info_span!("run", entry).entered();
        let program = self.program;

        let function = program.functions.get(entry).ok_or_else(|| {
                                                      RuntimeError::UndefinedFunction { name:     entry.to_string(),
                                                                                        location: Location::default(), }
                                                  })?;
        let parameters = function.parameters().len();
        if parameters > 0 {
            let location = match function {
                FunctionImplementation::User(f) => f.location,
                FunctionImplementation::Builtin(_) => Location::default(),
            };
            return Err(RuntimeError::TooManyArguments { name: entry.to_string(),
                                                        expected: 0,
                                                        found: parameters,
                                                        location }.into());
        }

        self.call_function(entry, Vec::new(), Location::default())
    }

    pub(in crate::interpreter::evaluator) fn frame(&mut self) -> Result<&mut Frame<Variable>, InternalError> {
        self.stack.current_mut()
    }

    /// Converts a value to `target`, through a registered cast unless its
    /// type already derives from the target.
    pub(in crate::interpreter::evaluator) fn coerce(&self,
                                                    value: Value,
                                                    target: &TypeName,
                                                    location: Location)
                                                    -> EvalResult<Value> {
        let from = value.type_name();
        let conversion =
            self.program
                .operations
                .find_cast(&from, target)
                .ok_or_else(|| RuntimeError::MissingOperation { operation: describe_cast(&from, target),
                                                                location })?;
        conversion.apply(value).map_err(|panic| panic.at(location).into())
    }

    /// Truthiness of a value: its conversion to `bool`.
    pub(in crate::interpreter::evaluator) fn is_truthy(&self,
                                                       value: &Value,
                                                       location: Location)
                                                       -> EvalResult<bool> {
        match self.coerce(value.clone(), &BuiltinType::Bool.type_name(), location)? {
            Value::Bool(b) => Ok(b),
            other => Err(InternalError::UnexpectedValue { expected: "a bool",
                                                          found:    other.type_name().to_string(), }.into()),
        }
    }

    /// Evaluates a condition of `if` or `while`.
    pub(in crate::interpreter::evaluator) fn condition(&mut self, condition: &Expression) -> EvalResult<bool> {
        let value = self.evaluate(condition)?;
        self.is_truthy(&value, condition.location())
    }

    /// The declared type of a variable or field path.
    pub(in crate::interpreter::evaluator) fn access_type(&self, access: &Access) -> EvalResult<TypeName> {
        let root = access.root();
        let binding = self.stack.current()?.get(&root.value, root.location)?;
        let mut type_name = binding.value.type_name.clone();

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
        Ok(type_name)
    }

    /// The static type of an expression that evaluated to `value`.
    ///
    /// Calls, reads and casts may produce a value of a type derived from the
    /// one they are declared with; every other expression's value has exactly
    /// its static type.
    pub(in crate::interpreter::evaluator) fn static_type(&self,
                                                         expression: &Expression,
                                                         value: &Value)
                                                         -> EvalResult<TypeName> {
        match expression {
            Expression::FnCall(call) => Ok(self.program
                                               .functions
                                               .get(&call.name.value)
                                               .and_then(FunctionImplementation::return_type)
                                               .cloned()
                                               .unwrap_or_else(|| value.type_name())),
            Expression::Access(access) => self.access_type(access),
            Expression::Cast(cast) => Ok(cast.ty.type_name()),
            _ => Ok(value.type_name()),
        }
    }
}
