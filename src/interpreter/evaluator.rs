/// Core evaluation state.
///
/// Defines the `Evaluator`, the control-flow signal threaded through
/// statements, the entry point that runs a program and the conversions shared
/// by statements and expressions.
pub mod core;

/// Function calls.
///
/// Dispatches to builtin handlers or runs user functions in a fresh frame,
/// enforcing the recursion limit.
pub mod function;

/// Statement execution.
///
/// Declarations, assignments, `return`, `if`, `while`, `match` and nested
/// blocks, each block in its own scope.
pub mod statement;

/// Expression evaluation.
///
/// Literals, variable and field reads, calls, struct literals, operators
/// dispatched through the operation registry, casts and `is` tests.
pub mod expression;
