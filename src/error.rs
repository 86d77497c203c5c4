/// Lexical errors.
///
/// Defines the classified failures of the lexer, such as overlong identifiers,
/// integer overflow or unterminated strings, each attached to the location of
/// the offending text.
pub mod lex_error;
/// Parsing errors.
///
/// One error per expected production, each carrying the found token and its
/// start position. Lexical errors pass through unchanged.
pub mod parse_error;
/// Semantic and runtime errors.
///
/// Errors raised by type and function collection, by the static and dynamic
/// validators, and by the evaluator while a program runs.
pub mod runtime_error;
/// Interpreter invariant violations.
///
/// Kept apart from the other families so that bugs in the interpreter never
/// look like mistakes in the interpreted program.
pub mod internal_error;

pub use internal_error::InternalError;
pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::ParseError;
pub use runtime_error::{Panic, RuntimeError};
use thiserror::Error;

/// Every failure the pipeline can surface to its caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be read.
    #[error("Failed to read source: {0}")]
    Source(#[from] std::io::Error),
    /// The source is not a valid token stream.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The tokens do not form a module.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The module is not a valid program, or it failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// The interpreter broke one of its own invariants.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// The process exit code the command-line front-end reports for this
    /// error: `1` for unreadable or malformed source, `2` for everything
    /// detected after parsing.
    ///
    /// # Example
    /// ```
    /// use fhll::error::{Error, InternalError};
    ///
    /// assert_eq!(Error::from(InternalError::MissingFrame).exit_code(), 2);
    /// ```
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Source(_) | Self::Lex(_) | Self::Parse(_) => 1,
            Self::Runtime(_) | Self::Internal(_) => 2,
        }
    }
}
