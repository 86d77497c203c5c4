/// The function registry.
///
/// Maps names to user-declared functions and to builtins backed by native
/// handlers.
pub mod registry;

/// Builtin functions.
///
/// The native `print`, `println` and `panic` functions and the table they
/// are registered from.
pub mod builtin;

/// Function collection.
///
/// Populates the registry from a module's function declarations.
pub mod collector;
