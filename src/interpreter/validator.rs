use tracing::{debug, info_span};

use crate::{
    ast::Module,
    error::Error,
    interpreter::{
        functions::{collector::collect_functions, registry::FunctionRegistry},
        operations::registry::OperationRegistry,
        types::{collector::collect_types, registry::TypeRegistry},
        validator::dynamic::DynamicValidator,
    },
};

/// A depth-first walk over function bodies shared by the static passes.
pub mod walk;

/// Return analysis: every path of a non-void function ends in a `return`
/// with a value, and void functions never return one.
pub mod returns;

/// Every type written in a function body is registered.
pub mod static_types;

/// Every call names a registered function with the right number of
/// arguments.
pub mod calls;

/// Type checking by evaluating function bodies over types.
pub mod dynamic;

/// A validated program: the registries the evaluator runs against.
#[derive(Debug, Clone)]
pub struct Program {
    /// Builtin and declared types.
    pub types:      TypeRegistry,
    /// Builtin and declared functions.
    pub functions:  FunctionRegistry,
    /// Operators and casts.
    pub operations: OperationRegistry,
}

/// Collects a module's types and functions and runs every check on it.
///
/// The phases run in order and the first failing one aborts: type
/// collection, function collection, return analysis, type references,
/// call sites, and the dynamic type check.
///
/// # Errors
/// The first semantic error found.
///
/// # Example
/// ```
/// use fhll::{interpreter::validator::validate, parse_str};
///
/// let module = parse_str("fn main() -> i32 { return 1; }", &Default::default()).unwrap();
/// let program = validate(&module).unwrap();
/// assert!(program.functions.get("main").is_some());
///
/// let module = parse_str("fn main() -> i32 { }", &Default::default()).unwrap();
/// assert!(validate(&module).is_err());
/// ```
pub fn validate(module: &Module) -> Result<Program, Error> {
    let _span = info_span!("validate").entered();

    let mut types = TypeRegistry::new();
    collect_types(module, &mut types)?;

    let mut functions = FunctionRegistry::with_builtins();
    collect_functions(module, &types, &mut functions)?;

    let operations = OperationRegistry::with_builtins()?;

    returns::check_returns(module)?;
    static_types::check_types(module, &types)?;
    calls::check_calls(module, &functions)?;

    let program = Program { types,
                            functions,
                            operations };
    DynamicValidator::new(&program).check_module(module)?;

    debug!(functions = module.functions.len(), "module validated");
    Ok(program)
}
