/// Character input.
///
/// Wraps any byte reader in a UTF-8 decoding buffer that folds `\r\n` and
/// lone `\r` into `\n` and tracks line and column, and drains it into a
/// `SourceText` that maps byte offsets back to positions.
pub mod stream;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the normalised source text and produces lexemes: tokens
/// paired with their location. Identifier, string and integer limits come
/// from `LexerConfig` and are enforced while tokens are recognised.
///
/// # Responsibilities
/// - Converts the source text into tokens with their source location.
/// - Resolves string escapes and classifies numeric literals.
/// - Reports classified lexical errors for invalid input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// A recursive-descent parser with one token of lookahead. Each precedence
/// level of the expression grammar has its own function.
///
/// # Responsibilities
/// - Converts lexemes into declarations, statements and expressions.
/// - Attaches spans covering every node's tokens.
/// - Stops at the first syntax error with its position.
pub mod parser;
/// Types known to a program.
pub mod types;
/// The value module defines the runtime data types for evaluation.
pub mod value;
/// User and builtin functions.
pub mod functions;
/// Operators and casts.
///
/// A table of implementations keyed by operator and operand types, filled
/// once with the builtin numeric, string and boolean operations.
pub mod operations;
/// Call frames with nested block scopes, and the bounded call stack.
///
/// Shared by the validator, whose frames bind types, and the evaluator,
/// whose frames bind values.
pub mod frame;
/// Semantic analysis.
///
/// Builds the registries for a module and rejects programs that would fail
/// in ways detectable before running them.
///
/// # Responsibilities
/// - Collects types and functions.
/// - Checks returns, type references and call arity.
/// - Type-checks function bodies against the operation table.
pub mod validator;
/// The evaluator module executes a validated program.
///
/// The evaluator walks function bodies, evaluates expressions through the
/// operation table, manages frames and scopes, and produces the entry
/// function's result.
///
/// # Responsibilities
/// - Evaluates statements and expressions.
/// - Calls user and builtin functions under the recursion limit.
/// - Reports runtime errors such as division by zero or explicit panics.
pub mod evaluator;
