use std::io::Write;

use crate::{
    ast::location::Location,
    error::{Panic, RuntimeError},
    interpreter::{
        functions::registry::{
            BuiltinFunction, NativeHandler, NativeResult, ParameterImplementation,
        },
        types::registry::BuiltinType,
        value::core::Value,
    },
};

/// Static description of a builtin function.
pub(crate) struct BuiltinDefinition {
    pub(crate) name:        &'static str,
    pub(crate) parameters:  &'static [(&'static str, BuiltinType)],
    pub(crate) return_type: Option<BuiltinType>,
    pub(crate) handler:     NativeHandler,
}

impl BuiltinDefinition {
    pub(crate) fn implementation(&self) -> BuiltinFunction {
        let parameters = self.parameters
                             .iter()
                             .map(|(name, ty)| ParameterImplementation { name:      (*name).to_string(),
                                                                         type_name: ty.type_name(),
                                                                         mutable:   false, })
                             .collect();
        BuiltinFunction { name: self.name.to_string(),
                          parameters,
                          return_type: self.return_type.map(BuiltinType::type_name),
                          handler: self.handler }
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - its typed parameters,
/// - its return type, or `None`,
/// - a function pointer implementing the builtin.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                parameters: [$($param:literal : $ty:expr),* $(,)?],
                returns: $returns:expr,
                handler: $handler:expr $(,)?
            }
        ),* $(,)?
    ) => {
        pub(crate) static BUILTIN_TABLE: &[BuiltinDefinition] = &[
            $(
                BuiltinDefinition { name:        $name,
                                    parameters:  &[$(($param, $ty)),*],
                                    return_type: $returns,
                                    handler:     $handler, },
            )*
        ];

        /// Names of every builtin function.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"   => { parameters: ["value": BuiltinType::Str], returns: None, handler: print },
    "println" => { parameters: ["value": BuiltinType::Str], returns: None, handler: println },
    "panic"   => { parameters: ["message": BuiltinType::Str], returns: None, handler: panic },
}

fn text(args: &[Value], location: Location) -> Result<&str, RuntimeError> {
    match args {
        [Value::Str(text)] => Ok(text),
        [other] => Err(RuntimeError::InvalidType { expected: BuiltinType::Str.type_name(),
                                                   found: other.type_name(),
                                                   location }),
        _ => Err(RuntimeError::TooManyArguments { name: "builtin".into(),
                                                  expected: 1,
                                                  found: args.len(),
                                                  location }),
    }
}

fn output_failure(error: &std::io::Error, location: Location) -> RuntimeError {
    RuntimeError::OutputFailure { message: error.to_string(),
                                  location }
}

/// Writes a string to the run's output.
///
/// # Example
/// ```
/// use fhll::interpreter::{functions::builtin::print, value::core::Value};
///
/// let mut out = Vec::new();
/// print(&[Value::from("hi")], &mut out, Default::default()).unwrap();
///
/// assert_eq!(out, b"hi");
/// ```
///
/// # Errors
/// `OutputFailure` if the output cannot be written.
pub fn print(args: &[Value], out: &mut dyn Write, location: Location) -> NativeResult {
    write!(out, "{}", text(args, location)?).map_err(|e| output_failure(&e, location))?;
    Ok(None)
}

/// Writes a string and a newline to the run's output.
///
/// # Errors
/// `OutputFailure` if the output cannot be written.
pub fn println(args: &[Value], out: &mut dyn Write, location: Location) -> NativeResult {
    writeln!(out, "{}", text(args, location)?).map_err(|e| output_failure(&e, location))?;
    Ok(None)
}

/// Stops the run with the given message.
///
/// # Errors
/// Always: a `Panic` carrying the message at the call site.
pub fn panic(args: &[Value], _out: &mut dyn Write, location: Location) -> NativeResult {
    Err(Panic::new(text(args, location)?).at(location))
}
