use crate::{
    ast::{
        Expression, Module,
        location::{Located, Location},
    },
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Lexer, Token},
        parser::{
            binary::parse_logical_or,
            declaration::{parse_enum, parse_function, parse_struct},
        },
    },
    util::stack::guarded,
};

/// Deepest nesting of expressions and blocks a source file may have.
///
/// Parenthesised expressions, call arguments, prefix operators, blocks and
/// every operand of an operator chain each count as one level.
pub const MAX_NESTING_DEPTH: usize = 1024;

pub type ParseResult<T> = Result<T, ParseError>;

/// The parser's view of the lexer: one lexeme of lookahead, comments dropped.
pub struct TokenStream<'s> {
    lexer:   Lexer<'s>,
    current: Lexeme,
    depth:   usize,
}

impl<'s> TokenStream<'s> {
    /// Primes the lookahead with the first significant lexeme.
    ///
    /// # Errors
    /// A lexical error in the first token.
    pub fn new(mut lexer: Lexer<'s>) -> ParseResult<Self> {
        let current = Self::read(&mut lexer)?;
        Ok(Self { lexer,
                  current,
                  depth: 0 })
    }

    fn read(lexer: &mut Lexer<'s>) -> ParseResult<Lexeme> {
        loop {
            let lexeme = lexer.next_lexeme()?;
            if !matches!(lexeme.token, Some(Token::Comment(_))) {
                return Ok(lexeme);
            }
        }
    }

    /// The upcoming lexeme.
    #[must_use]
    pub const fn peek(&self) -> &Lexeme {
        &self.current
    }

    /// The upcoming token, `None` at end of file.
    #[must_use]
    pub const fn peek_token(&self) -> Option<&Token> {
        self.current.token.as_ref()
    }

    /// Whether the upcoming token is `expected`.
    #[must_use]
    pub fn check(&self, expected: &Token) -> bool {
        self.current.token.as_ref() == Some(expected)
    }

    /// Consumes the upcoming lexeme.
    ///
    /// # Errors
    /// A lexical error in the lexeme after it.
    pub fn next(&mut self) -> ParseResult<Lexeme> {
        let upcoming = Self::read(&mut self.lexer)?;
        Ok(std::mem::replace(&mut self.current, upcoming))
    }

    /// Consumes the upcoming lexeme if it is `expected`.
    ///
    /// # Errors
    /// A lexical error in the lexeme after it.
    pub fn accept(&mut self, expected: &Token) -> ParseResult<Option<Lexeme>> {
        if self.check(expected) {
            self.next().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Descends one nesting level.
    ///
    /// # Errors
    /// `NestingTooDeep` at the upcoming token when already at
    /// [`MAX_NESTING_DEPTH`].
    pub fn deepen(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep { max:      MAX_NESTING_DEPTH,
                                                    position: self.current.location.begin, });
        }
        self.depth += 1;
        Ok(())
    }

    /// Climbs back `levels` nesting levels.
    pub const fn restore(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    /// Runs `parse` one nesting level deeper.
    ///
    /// # Errors
    /// `NestingTooDeep`, or whatever `parse` fails with.
    pub fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.deepen()?;
        let result = guarded(|| parse(self));
        self.restore(1);
        result
    }
}

/// Parses a whole source file.
///
/// Grammar: `module := { fn_decl | struct_decl | enum_decl } EOF`
///
/// # Errors
/// The first lexical or syntactic error; nothing is skipped.
pub fn parse_module(tokens: &mut TokenStream<'_>) -> ParseResult<Module> {
    let mut module = Module::default();
    let mut location: Option<Location> = None;

    loop {
        let span = match tokens.peek_token() {
            None => break,
            Some(Token::Fn) => {
                let function = parse_function(tokens)?;
                let span = function.location();
                module.functions.push(function);
                span
            },
            Some(Token::Struct) => {
                let declaration = parse_struct(tokens)?;
                let span = declaration.location();
                module.structs.push(declaration);
                span
            },
            Some(Token::Enum) => {
                let declaration = parse_enum(tokens)?;
                let span = declaration.location();
                module.enums.push(declaration);
                span
            },
            Some(_) => {
                let found = tokens.peek();
                return Err(ParseError::UnexpectedToken { expected: "'fn', 'struct' or 'enum'".into(),
                                                         found:    found.describe(),
                                                         position: found.location.begin, });
            },
        };
        location = Some(location.map_or(span, |l| l.to(span)));
    }

    module.location = location.unwrap_or_default();
    Ok(module)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, logical OR, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := logical_or`
pub fn parse_expression(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    tokens.nested(parse_logical_or)
}
