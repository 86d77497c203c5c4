use thiserror::Error;

use crate::{ast::location::Position, error::LexError};

/// Represents all errors that can occur during parsing.
///
/// There is one variant per expected production. Each carries a description
/// of the token actually found and the position where that token starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token stream itself was malformed.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// An identifier was expected.
    #[error("Error at {position}: Expected a name, found {found}.")]
    ExpectedName {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// A builtin type keyword or a `::` path was expected.
    #[error("Error at {position}: Expected a type, found {found}.")]
    ExpectedType {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// An expression was expected.
    #[error("Error at {position}: Expected an expression, found {found}.")]
    ExpectedExpression {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// A `{ ... }` block was expected.
    #[error("Error at {position}: Expected a block, found {found}.")]
    ExpectedBlock {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// A function parameter was expected.
    #[error("Error at {position}: Expected a parameter, found {found}.")]
    ExpectedParameter {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// `let` was expected after `mut`.
    #[error("Error at {position}: Expected 'let', found {found}.")]
    ExpectedLet {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// `,` was expected.
    #[error("Error at {position}: Expected ',', found {found}.")]
    ExpectedComma {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// `:` was expected.
    #[error("Error at {position}: Expected ':', found {found}.")]
    ExpectedColon {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// `;` was expected.
    #[error("Error at {position}: Expected ';', found {found}.")]
    ExpectedSemicolon {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// `{` or `}` was expected.
    #[error("Error at {position}: Expected '{expected}', found {found}.")]
    ExpectedBrace {
        /// The brace that was expected.
        expected: char,
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// `(` or `)` was expected.
    #[error("Error at {position}: Expected '{expected}', found {found}.")]
    ExpectedParenthesis {
        /// The parenthesis that was expected.
        expected: char,
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// `=` was expected.
    #[error("Error at {position}: Expected '=', found {found}.")]
    ExpectedAssign {
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
    /// Expressions or blocks nested deeper than the parser allows.
    #[error("Error at {position}: Nesting is deeper than {max} levels.")]
    NestingTooDeep {
        /// The nesting limit.
        max:      usize,
        /// Where the level past the limit starts.
        position: Position,
    },
    /// A token that fits no production at this point.
    #[error("Error at {position}: Unexpected token {found}, expected {expected}.")]
    UnexpectedToken {
        /// What would have been accepted.
        expected: String,
        /// The token encountered.
        found:    String,
        /// Where it starts.
        position: Position,
    },
}

impl ParseError {
    /// Position of the offending token.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Lex(e) => e.location.begin,
            Self::ExpectedName { position, .. }
            | Self::ExpectedType { position, .. }
            | Self::ExpectedExpression { position, .. }
            | Self::ExpectedBlock { position, .. }
            | Self::ExpectedParameter { position, .. }
            | Self::ExpectedLet { position, .. }
            | Self::ExpectedComma { position, .. }
            | Self::ExpectedColon { position, .. }
            | Self::ExpectedSemicolon { position, .. }
            | Self::ExpectedBrace { position, .. }
            | Self::ExpectedParenthesis { position, .. }
            | Self::ExpectedAssign { position, .. }
            | Self::NestingTooDeep { position, .. }
            | Self::UnexpectedToken { position, .. } => *position,
        }
    }
}
