//! # fhll
//!
//! fhll is a tree-walking interpreter for FHLL, a small statically typed
//! imperative language with structs, nested enums and `match`.
//! Source text is lexed, parsed into an AST, validated into a `Program` and
//! then run from an entry function.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::{self, Read, Write};

use tracing::info_span;

use crate::{
    ast::{Location, Module},
    config::Config,
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        evaluator::core::Evaluator,
        lexer::{Lexer, LexerConfig},
        parser::core::{TokenStream, parse_module},
        stream::SourceText,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the declaration, statement and expression types that
/// represent a source file as a tree. The AST is built by the parser, checked
/// by the validator and walked by the evaluator.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches source spans to every node for error reporting.
pub mod ast;
/// Limits applied while reading and running a program.
pub mod config;
/// Provides unified error types for every phase.
///
/// This module defines all errors that can be raised while reading, lexing,
/// parsing, validating or running a program, each with the position or span
/// it refers to.
///
/// # Responsibilities
/// - Defines one error enum per family (lexer, parser, semantic/runtime,
///   internal) and the umbrella `Error`.
/// - Maps errors to the command-line exit codes.
pub mod error;
/// Canonical source formatting.
pub mod formatter;
/// Orchestrates the entire process of code execution.
///
/// This module ties together reading, lexing, parsing, validation and
/// evaluation, with the registries those phases share.
///
/// # Responsibilities
/// - Coordinates all core components.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

pub use formatter::format_module;
pub use interpreter::validator::{Program, validate};

/// Reads and parses a whole source file.
///
/// # Errors
/// A `Source` error if the reader fails or the bytes are not UTF-8, then the
/// first lexical or syntax error.
pub fn parse(reader: impl Read, config: &LexerConfig) -> Result<Module, Error> {
    let _span = info_span!("parse").entered();
    let source = SourceText::read(reader)?;
    let mut tokens = TokenStream::new(Lexer::new(&source, *config)).map_err(syntax_error)?;
    parse_module(&mut tokens).map_err(syntax_error)
}

/// Lexical errors surface as [`Error::Lex`] even though the parser reports
/// them wrapped.
fn syntax_error(error: ParseError) -> Error {
    match error {
        ParseError::Lex(error) => Error::Lex(error),
        error => Error::Parse(error),
    }
}

/// Parses source held in memory.
///
/// # Errors
/// The first lexical or syntax error.
///
/// # Example
/// ```
/// use fhll::parse_str;
///
/// let module = parse_str("struct P { x: i32; } fn main() {}", &Default::default()).unwrap();
/// assert_eq!(module.structs.len(), 1);
/// assert_eq!(module.functions[0].name.value, "main");
///
/// assert!(parse_str("fn main() {", &Default::default()).is_err());
/// ```
pub fn parse_str(source: &str, config: &LexerConfig) -> Result<Module, Error> {
    parse(source.as_bytes(), config)
}

/// Runs a validated program from `entry`, writing builtin output to stdout.
///
/// # Errors
/// The first runtime error.
pub fn run(program: &Program, entry: &str, config: &Config) -> Result<Option<Value>, Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(program, entry, config, &mut out)
}

/// Runs a validated program from `entry`, writing builtin output to `out`.
///
/// Returns the entry function's return value, or `None` if it is void.
///
/// # Errors
/// The first runtime error.
///
/// # Example
/// ```
/// use fhll::{config::Config, parse_str, run_with_output, validate};
///
/// let module = parse_str(r#"fn main() { println("hi"); }"#, &Default::default()).unwrap();
/// let program = validate(&module).unwrap();
///
/// let mut out = Vec::new();
/// let result = run_with_output(&program, "main", &Config::default(), &mut out).unwrap();
/// assert_eq!(result, None);
/// assert_eq!(out, b"hi\n");
/// ```
pub fn run_with_output(program: &Program,
                       entry: &str,
                       config: &Config,
                       out: &mut dyn Write)
                       -> Result<Option<Value>, Error> {
    let mut evaluator = Evaluator::new(program, config, out);
    let result = evaluator.run(entry)?;
    out.flush()
       .map_err(|error| RuntimeError::OutputFailure { message:  error.to_string(),
                                                      location: Location::default(), })?;
    Ok(result)
}

/// Parses, validates and runs a source string from `main`.
///
/// # Errors
/// The first error of any phase.
///
/// # Example
/// ```
/// use fhll::{config::Config, execute, interpreter::value::core::Value};
///
/// let source = "fn main() -> i32 { return 2 + 3 * 4; }";
/// assert_eq!(execute(source, &Config::default()).unwrap(), Some(Value::I32(14)));
///
/// // 'x' is not defined
/// assert!(execute("fn main() -> i32 { return x; }", &Config::default()).is_err());
/// ```
pub fn execute(source: &str, config: &Config) -> Result<Option<Value>, Error> {
    let module = parse_str(source, &config.lexer)?;
    let program = validate(&module)?;
    run(&program, "main", config)
}
