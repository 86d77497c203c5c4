use thiserror::Error;

use crate::{ast::location::Location, interpreter::types::type_name::TypeName};

/// Represents all errors raised by a well-formed program: semantic errors found
/// while validating it and panics raised while running it.
///
/// Every variant except [`RuntimeError::OperationAlreadyRegistered`] carries
/// the location of the node that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A type reference that resolves to nothing.
    #[error("Error at {location}: Unknown type '{type_name}'.")]
    UnknownType {
        /// The unresolved name.
        type_name: TypeName,
        /// The reference.
        location:  Location,
    },
    /// Two struct or enum declarations with the same qualified name.
    #[error("Error at {location}: Type '{type_name}' is already declared.")]
    TypeRedeclaration {
        /// The duplicated name.
        type_name: TypeName,
        /// The second declaration.
        location:  Location,
    },
    /// Two fields with the same name in one struct.
    #[error("Error at {location}: Field '{field}' is already declared in '{type_name}'.")]
    FieldRedeclaration {
        /// The struct.
        type_name: TypeName,
        /// The duplicated field.
        field:     String,
        /// The second field declaration.
        location:  Location,
    },
    /// Two functions with the same name.
    #[error("Error at {location}: Function '{name}' is already declared.")]
    FunctionRedeclaration {
        /// The duplicated name.
        name:     String,
        /// The second declaration.
        location: Location,
    },
    /// Two parameters with the same name in one function.
    #[error("Error at {location}: Parameter '{name}' is already declared.")]
    ParameterRedeclaration {
        /// The duplicated name.
        name:     String,
        /// The second parameter.
        location: Location,
    },
    /// A call to a function that does not exist.
    #[error("Error at {location}: Undefined function '{name}'.")]
    UndefinedFunction {
        /// The callee.
        name:     String,
        /// The call.
        location: Location,
    },
    /// A call with fewer arguments than parameters.
    #[error("Error at {location}: Too few arguments for '{name}': expected {expected}, found {found}.")]
    TooFewArguments {
        /// The callee.
        name:     String,
        /// Number of parameters.
        expected: usize,
        /// Number of arguments.
        found:    usize,
        /// The call.
        location: Location,
    },
    /// A call with more arguments than parameters.
    #[error("Error at {location}: Too many arguments for '{name}': expected {expected}, found {found}.")]
    TooManyArguments {
        /// The callee.
        name:     String,
        /// Number of parameters.
        expected: usize,
        /// Number of arguments.
        found:    usize,
        /// The call.
        location: Location,
    },
    /// A non-void function with a control path that ends without `return`.
    #[error("Error at {location}: Function '{function}' does not return on every path.")]
    MissingReturnStatement {
        /// The function.
        function: String,
        /// The function body.
        location: Location,
    },
    /// A bare `return` in a non-void function.
    #[error("Error at {location}: Function '{function}' must return a value.")]
    MissingReturnValue {
        /// The function.
        function: String,
        /// The return statement.
        location: Location,
    },
    /// `return value` in a void function.
    #[error("Error at {location}: Function '{function}' does not return a value.")]
    ReturnValueInVoid {
        /// The function.
        function: String,
        /// The return statement.
        location: Location,
    },
    /// Instantiation of something that is not a struct.
    #[error("Error at {location}: '{type_name}' is not a struct.")]
    UndefinedStruct {
        /// The type used.
        type_name: TypeName,
        /// The instantiation.
        location:  Location,
    },
    /// A struct instantiation naming a field the struct does not have.
    #[error("Error at {location}: Struct '{type_name}' has no field '{field}'.")]
    AssignmentToUndefinedField {
        /// The struct.
        type_name: TypeName,
        /// The unknown field.
        field:     String,
        /// The field initialiser.
        location:  Location,
    },
    /// A struct instantiation initialising a field twice or through a path.
    #[error("Error at {location}: Invalid initialisation of field '{field}'.")]
    InvalidFieldAssignment {
        /// The field as written.
        field:    String,
        /// The field initialiser.
        location: Location,
    },
    /// No operation or cast is registered for the operand types.
    #[error("Error at {location}: Missing implementation for {operation}.")]
    MissingOperation {
        /// A description such as `i32 + str`.
        operation: String,
        /// The expression.
        location:  Location,
    },
    /// An operation or cast was registered twice.
    #[error("Operation {operation} is already registered.")]
    OperationAlreadyRegistered {
        /// A description such as `i32 + i32`.
        operation: String,
    },
    /// A declaration with neither type nor value.
    #[error("Error at {location}: Cannot infer the type of '{name}'.")]
    InferenceError {
        /// The variable.
        name:     String,
        /// The declaration.
        location: Location,
    },
    /// An immutable declaration without a value.
    #[error("Error at {location}: Constant '{name}' must be initialised.")]
    EmptyVariable {
        /// The variable.
        name:     String,
        /// The declaration.
        location: Location,
    },
    /// A second declaration of a name at the same nesting level.
    #[error("Error at {location}: Variable '{name}' is already declared in this block.")]
    VariableRedeclaration {
        /// The variable.
        name:     String,
        /// The second declaration.
        location: Location,
    },
    /// A read or write of a name that is not bound.
    #[error("Error at {location}: Undefined variable '{name}'.")]
    UndefinedVariable {
        /// The variable.
        name:     String,
        /// The access.
        location: Location,
    },
    /// A field path that does not exist on the value's type.
    #[error("Error at {location}: Type '{type_name}' has no field '{field}'.")]
    UndefinedField {
        /// The type being accessed.
        type_name: TypeName,
        /// The missing field.
        field:     String,
        /// The access.
        location:  Location,
    },
    /// A write to an immutable binding.
    #[error("Error at {location}: Cannot assign to constant '{name}'.")]
    AssignmentToConstant {
        /// The variable.
        name:     String,
        /// The assignment.
        location: Location,
    },
    /// A value whose type is not compatible with what the context requires.
    #[error("Error at {location}: Expected a value of type '{expected}', found '{found}'.")]
    InvalidType {
        /// The required type.
        expected: TypeName,
        /// The supplied type.
        found:    TypeName,
        /// The offending expression.
        location: Location,
    },
    /// A default value was needed for an enum type.
    #[error("Error at {location}: Enum '{type_name}' has no default value.")]
    EnumDefaultValue {
        /// The enum.
        type_name: TypeName,
        /// The declaration needing a default.
        location:  Location,
    },
    /// A default value was needed for a struct that contains itself.
    #[error("Error at {location}: Struct '{type_name}' contains itself and has no default value.")]
    RecursiveDefaultValue {
        /// The struct.
        type_name: TypeName,
        /// The declaration needing a default.
        location:  Location,
    },
    /// An integer literal that does not fit an `i32`.
    #[error("Error at {location}: Integer literal {value} does not fit in i32.")]
    IntegerLiteralOutOfRange {
        /// The literal.
        value:    u64,
        /// The literal's position.
        location: Location,
    },
    /// The call stack grew past the configured depth.
    #[error("Error at {location}: Maximum recursion depth of {depth} exceeded.")]
    MaximumRecursion {
        /// The configured limit.
        depth:    usize,
        /// The call that overflowed.
        location: Location,
    },
    /// A panic raised by the running program.
    #[error("Error at {location}: Panic: {message}")]
    Panic {
        /// What happened.
        message:  String,
        /// The statement or expression that panicked.
        location: Location,
    },
    /// A builtin could not write its output.
    #[error("Error at {location}: Failed to write output: {message}")]
    OutputFailure {
        /// The underlying I/O error.
        message:  String,
        /// The call.
        location: Location,
    },
}

impl RuntimeError {
    /// Location of the node that caused the error, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        match self {
            Self::OperationAlreadyRegistered { .. } => None,
            Self::UnknownType { location, .. }
            | Self::TypeRedeclaration { location, .. }
            | Self::FieldRedeclaration { location, .. }
            | Self::FunctionRedeclaration { location, .. }
            | Self::ParameterRedeclaration { location, .. }
            | Self::UndefinedFunction { location, .. }
            | Self::TooFewArguments { location, .. }
            | Self::TooManyArguments { location, .. }
            | Self::MissingReturnStatement { location, .. }
            | Self::MissingReturnValue { location, .. }
            | Self::ReturnValueInVoid { location, .. }
            | Self::UndefinedStruct { location, .. }
            | Self::AssignmentToUndefinedField { location, .. }
            | Self::InvalidFieldAssignment { location, .. }
            | Self::MissingOperation { location, .. }
            | Self::InferenceError { location, .. }
            | Self::EmptyVariable { location, .. }
            | Self::VariableRedeclaration { location, .. }
            | Self::UndefinedVariable { location, .. }
            | Self::UndefinedField { location, .. }
            | Self::AssignmentToConstant { location, .. }
            | Self::InvalidType { location, .. }
            | Self::EnumDefaultValue { location, .. }
            | Self::RecursiveDefaultValue { location, .. }
            | Self::IntegerLiteralOutOfRange { location, .. }
            | Self::MaximumRecursion { location, .. }
            | Self::Panic { location, .. }
            | Self::OutputFailure { location, .. } => Some(*location),
        }
    }
}

/// A panic raised by an operation handler or a builtin function.
///
/// Handlers do not know where in the program they were invoked from; the
/// caller attaches the location with [`Panic::at`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Panic {
    /// What happened.
    pub message: String,
}

impl Panic {
    /// Creates a panic with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Turns the panic into a located [`RuntimeError::Panic`].
    #[must_use]
    pub fn at(self, location: Location) -> RuntimeError {
        RuntimeError::Panic { message: self.message,
                              location }
    }
}
