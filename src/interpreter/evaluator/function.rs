use tracing::debug;

use crate::{
    ast::location::Location,
    error::{InternalError, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Flow, Variable},
        frame::{Binding, Frame},
        functions::registry::{FunctionImplementation, UserFunction},
        value::core::Value,
    },
    util::stack::guarded,
};

impl Evaluator<'_, '_> {
    /// Calls a function with already evaluated arguments.
    ///
    /// Arguments are moved into the callee, so the callee works on its own
    /// copies. Returns `None` for void functions.
    pub(in crate::interpreter::evaluator) fn call_function(&mut self,
                                                           name: &str,
                                                           arguments: Vec<Value>,
                                                           location: Location)
                                                           -> EvalResult<Option<Value>> {
        let program = self.program;
        let function = program.functions
                              .get(name)
                              .ok_or_else(|| InternalError::MissingFunction { name: name.to_string() })?;

        let expected = function.parameters().len();
        let found = arguments.len();
        if found < expected {
            return Err(RuntimeError::TooFewArguments { name: name.to_string(),
                                                       expected,
                                                       found,
                                                       location }.into());
        }
        if found > expected {
            return Err(RuntimeError::TooManyArguments { name: name.to_string(),
                                                        expected,
                                                        found,
                                                        location }.into());
        }

        debug!(function = name, depth = self.stack.depth(), "calling function");
        match function {
            FunctionImplementation::Builtin(builtin) => {
                Ok((builtin.handler)(&arguments, &mut *self.out, location)?)
            },
            FunctionImplementation::User(user) => self.call_user(user, arguments, location),
        }
    }

    fn call_user(&mut self,
                 function: &UserFunction,
                 arguments: Vec<Value>,
                 location: Location)
                 -> EvalResult<Option<Value>> {
        let mut frame = Frame::new();
        for (parameter, value) in function.parameters.iter().zip(arguments) {
            frame.declare(&parameter.name,
                          Binding { mutable: parameter.mutable,
                                    value:   Variable { type_name: parameter.type_name.clone(),
                                                        value }, },
                          location)?;
        }

        self.stack.push(frame, location)?;
        let flow = guarded(|| self.statements(&function.block.statements))?;
        self.stack.pop()?;

        match flow {
            Flow::Return(value) => Ok(value),
            Flow::Next => Ok(None),
        }
    }
}
