/// Parser entry points and the token stream.
///
/// Defines `TokenStream`, the single-lookahead view over the lexer, and the
/// module and expression entry points.
pub mod core;

/// Declaration parsing.
///
/// Functions with their parameters, structs with their fields, and enums
/// with their nested variants.
pub mod declaration;

/// Statement parsing.
///
/// Blocks, variable declarations, assignments, calls, `return`, `if`,
/// `while` and `match`.
pub mod statement;

/// Binary operator parsing.
///
/// One function per precedence level, from logical OR down to
/// multiplication.
pub mod binary;

/// Unary operators and terms.
///
/// Prefix operators, `as`/`is` suffixes, literals, accesses, calls, struct
/// literals and parenthesised expressions.
pub mod unary;

/// Shared helpers: expecting punctuation, names, type paths, field chains
/// and comma-separated lists.
pub mod utils;
