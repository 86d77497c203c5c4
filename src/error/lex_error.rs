use thiserror::Error;

use crate::ast::location::{Location, Position};

/// What went wrong while turning characters into tokens.
///
/// This is also the error type the `logos` token definitions produce, which is
/// why it must be `Default`: any character that starts no token at all is an
/// [`LexErrorKind::UnexpectedCharacter`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[default]
    #[error("Unexpected character.")]
    UnexpectedCharacter,
    /// An identifier exceeding the configured maximum length.
    #[error("Identifier is longer than {max} characters.")]
    IdentifierTooLong {
        /// The configured limit.
        max: usize,
    },
    /// An integer literal above the configured maximum value.
    #[error("Integer literal is larger than {max}.")]
    IntegerOverflow {
        /// The configured limit.
        max: u64,
    },
    /// An integer literal such as `007`.
    #[error("Integer literal has leading zeros.")]
    IntegerLeadingZeros,
    /// A floating literal that could not be represented.
    #[error("Invalid floating literal.")]
    InvalidFloating,
    /// A string literal exceeding the configured maximum length.
    #[error("String literal is longer than {max} characters.")]
    StringTooLong {
        /// The configured limit.
        max: usize,
    },
    /// A string literal still open at end of file.
    #[error("String literal is not terminated.")]
    UnterminatedString,
    /// A backslash followed by anything but `n`, `t`, `\` or `"`.
    #[error("Invalid escape sequence '\\{escape}'.")]
    InvalidEscapeSequence {
        /// The character after the backslash.
        escape: char,
    },
    /// The first half of a two-character operator without its second half.
    #[error("Expected '{expected}' after '{found}'.")]
    ExpectingChar {
        /// The character that was read.
        found:    char,
        /// The character that must follow it.
        expected: char,
    },
}

/// A lexical error together with the offending source range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error at {position}: {kind}", position = .location.begin)]
pub struct LexError {
    /// The classified failure.
    pub kind:     LexErrorKind,
    /// Where the offending text is.
    pub location: Location,
}

impl LexError {
    /// Position of the first offending character.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.location.begin
    }
}
