use std::{collections::HashMap, io::Write};

use tracing::debug;

use crate::{
    ast::{Block, location::Location},
    error::RuntimeError,
    interpreter::{
        functions::builtin::BUILTIN_TABLE, types::type_name::TypeName, value::core::Value,
    },
};

/// Result of a native function: its return value, if any.
pub type NativeResult = Result<Option<Value>, RuntimeError>;

/// Type alias for builtin function handlers.
///
/// A builtin receives its evaluated arguments, the output the run writes to,
/// and the location of the call for error reporting.
pub type NativeHandler = fn(&[Value], &mut dyn Write, Location) -> NativeResult;

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterImplementation {
    /// The binding name inside the body.
    pub name:      String,
    /// The declared type.
    pub type_name: TypeName,
    /// Whether the body may assign to it.
    pub mutable:   bool,
}

/// A function written in the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFunction {
    /// The function name.
    pub name:        String,
    /// Parameters in declaration order.
    pub parameters:  Vec<ParameterImplementation>,
    /// The declared return type; `None` for void functions.
    pub return_type: Option<TypeName>,
    /// The body.
    pub block:       Block,
    /// The declaration.
    pub location:    Location,
}

/// A function implemented by the interpreter.
#[derive(Debug, Clone)]
pub struct BuiltinFunction {
    /// The function name.
    pub name:        String,
    /// Parameters in declaration order.
    pub parameters:  Vec<ParameterImplementation>,
    /// The return type; `None` for void functions.
    pub return_type: Option<TypeName>,
    /// The native implementation.
    pub handler:     NativeHandler,
}

/// A callable registered under a name.
#[derive(Debug, Clone)]
pub enum FunctionImplementation {
    /// Declared with `fn` in the program.
    User(UserFunction),
    /// Provided by the interpreter.
    Builtin(BuiltinFunction),
}

impl FunctionImplementation {
    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(f) => &f.name,
            Self::Builtin(f) => &f.name,
        }
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterImplementation] {
        match self {
            Self::User(f) => &f.parameters,
            Self::Builtin(f) => &f.parameters,
        }
    }

    /// The return type; `None` for void functions.
    #[must_use]
    pub const fn return_type(&self) -> Option<&TypeName> {
        match self {
            Self::User(f) => f.return_type.as_ref(),
            Self::Builtin(f) => f.return_type.as_ref(),
        }
    }
}

/// All functions of a program, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionImplementation>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the builtin functions (`print`, `println`,
    /// `panic`).
    ///
    /// # Example
    /// ```
    /// use fhll::interpreter::functions::registry::FunctionRegistry;
    ///
    /// let registry = FunctionRegistry::with_builtins();
    /// assert!(registry.get("println").is_some());
    /// assert!(registry.get("main").is_none());
    /// ```
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for definition in BUILTIN_TABLE {
            let function = definition.implementation();
            debug!(name = definition.name, "registered builtin function");
            registry.functions
                    .insert(definition.name.to_string(), FunctionImplementation::Builtin(function));
        }
        registry
    }

    /// Registers a function.
    ///
    /// # Errors
    /// `FunctionRedeclaration` if the name is taken, builtins included.
    pub fn register(&mut self,
                    function: FunctionImplementation,
                    location: Location)
                    -> Result<(), RuntimeError> {
        if self.functions.contains_key(function.name()) {
            return Err(RuntimeError::FunctionRedeclaration { name: function.name().to_string(),
                                                             location });
        }
        debug!(name = function.name(), "registered function");
        self.functions.insert(function.name().to_string(), function);
        Ok(())
    }

    /// Looks a function up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FunctionImplementation> {
        self.functions.get(name)
    }

    /// Iterates the user-declared functions, in no particular order.
    pub fn user_functions(&self) -> impl Iterator<Item = &UserFunction> {
        self.functions.values().filter_map(|function| match function {
                                   FunctionImplementation::User(f) => Some(f),
                                   FunctionImplementation::Builtin(_) => None,
                               })
    }
}
