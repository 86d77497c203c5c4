use std::fmt;

use logos::Logos;
use ordered_float::OrderedFloat;

use crate::{
    ast::location::Location,
    error::{LexError, LexErrorKind},
    interpreter::stream::SourceText,
};

/// Limits enforced while tokenizing.
///
/// Carried as the `logos` extras so the literal callbacks can check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Longest identifier accepted, in characters.
    pub max_identifier_len: usize,
    /// Longest string literal accepted, in characters after unescaping.
    pub max_string_len:     usize,
    /// Largest integer literal accepted.
    pub max_integer_value:  u64,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self { max_identifier_len: 128,
               max_string_len:     128,
               max_integer_value:  u64::MAX, }
    }
}

/// Represents a lexical token in the source input.
///
/// Comments are tokens too; the parser drops them. End of file is not a
/// token: see [`Lexeme`].
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerConfig)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\n\f]+")]
pub enum Token {
    /// Floating literal: an integer, a dot and an optional fraction.
    #[regex(r"[0-9]+\.[0-9]*", parse_floating)]
    Floating(OrderedFloat<f64>),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(u64),
    /// `true` or `false`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Boolean(bool),
    /// String literal with its escapes resolved.
    #[regex(r#""([^"\\]|\\.)*""#, parse_string, allow_greedy = true)]
    Str(String),
    /// A string literal that runs into end of file. Never produced.
    #[regex(r#""([^"\\]|\\.)*"#, callback = |_| { Err::<(), _>(LexErrorKind::UnterminatedString) }, allow_greedy = true)]
    UnterminatedStr,
    /// Builtin type keyword such as `i32` or `str`.
    #[token("i16", builtin_type)]
    #[token("i32", builtin_type)]
    #[token("i64", builtin_type)]
    #[token("u16", builtin_type)]
    #[token("u32", builtin_type)]
    #[token("u64", builtin_type)]
    #[token("f32", builtin_type)]
    #[token("bool", builtin_type)]
    #[token("str", builtin_type)]
    BuiltinType(String),
    /// `fn`
    #[token("fn")]
    Fn,
    /// `struct`
    #[token("struct")]
    Struct,
    /// `enum`
    #[token("enum")]
    Enum,
    /// `mut`
    #[token("mut")]
    Mut,
    /// `let`
    #[token("let")]
    Let,
    /// `is`
    #[token("is")]
    Is,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `return`
    #[token("return")]
    Return,
    /// `as`
    #[token("as")]
    As,
    /// `match`
    #[token("match")]
    Match,
    /// Identifier tokens; variable, field, function or type names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", parse_identifier)]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", |lex| lex.slice()[2..].to_string(), allow_greedy = true)]
    Comment(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Assign,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// A lone `&` or `|`. Never produced.
    #[token("&", half_operator)]
    #[token("|", half_operator)]
    HalfOperator,
    /// `!`
    #[token("!")]
    Bang,
    /// `=>`
    #[token("=>")]
    FatArrow,
    /// `->`
    #[token("->")]
    Arrow,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `::`
    #[token("::")]
    ColonColon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Floating(x) => return write!(f, "floating literal {x}"),
            Self::Integer(n) => return write!(f, "integer literal {n}"),
            Self::Boolean(b) => return write!(f, "'{b}'"),
            Self::Str(_) | Self::UnterminatedStr => "string literal",
            Self::BuiltinType(name) | Self::Identifier(name) => return write!(f, "'{name}'"),
            Self::Comment(_) => "comment",
            Self::Fn => "'fn'",
            Self::Struct => "'struct'",
            Self::Enum => "'enum'",
            Self::Mut => "'mut'",
            Self::Let => "'let'",
            Self::Is => "'is'",
            Self::If => "'if'",
            Self::Else => "'else'",
            Self::While => "'while'",
            Self::Return => "'return'",
            Self::As => "'as'",
            Self::Match => "'match'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::EqualEqual => "'=='",
            Self::BangEqual => "'!='",
            Self::Less => "'<'",
            Self::Greater => "'>'",
            Self::Assign => "'='",
            Self::AndAnd => "'&&'",
            Self::OrOr => "'||'",
            Self::HalfOperator => "operator",
            Self::Bang => "'!'",
            Self::FatArrow => "'=>'",
            Self::Arrow => "'->'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::ColonColon => "'::'",
        };
        write!(f, "{text}")
    }
}

fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn builtin_type(lex: &logos::Lexer<Token>) -> String {
    lex.slice().to_string()
}

fn parse_identifier(lex: &logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    let max = lex.extras.max_identifier_len;
    if lex.slice().chars().count() > max {
        return Err(LexErrorKind::IdentifierTooLong { max });
    }
    Ok(lex.slice().to_string())
}

fn has_leading_zeros(digits: &str) -> bool {
    digits.len() > 1 && digits.starts_with('0')
}

fn parse_integer(lex: &logos::Lexer<Token>) -> Result<u64, LexErrorKind> {
    let slice = lex.slice();
    if has_leading_zeros(slice) {
        return Err(LexErrorKind::IntegerLeadingZeros);
    }
    let max = lex.extras.max_integer_value;
    slice.parse::<u64>()
         .ok()
         .filter(|value| *value <= max)
         .ok_or(LexErrorKind::IntegerOverflow { max })
}

fn parse_floating(lex: &logos::Lexer<Token>) -> Result<OrderedFloat<f64>, LexErrorKind> {
    let slice = lex.slice();
    let integer = slice.split('.').next().unwrap_or_default();
    if has_leading_zeros(integer) {
        return Err(LexErrorKind::IntegerLeadingZeros);
    }
    slice.parse::<f64>()
         .ok()
         .filter(|value| value.is_finite())
         .map(OrderedFloat)
         .ok_or(LexErrorKind::InvalidFloating)
}

fn parse_string(lex: &logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    let slice = lex.slice();
    let mut value = String::with_capacity(slice.len());
    let mut chars = slice[1..slice.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('\\') => value.push('\\'),
            Some('"') => value.push('"'),
            Some(escape) => return Err(LexErrorKind::InvalidEscapeSequence { escape }),
            None => return Err(LexErrorKind::UnterminatedString),
        }
    }
    let max = lex.extras.max_string_len;
    if value.chars().count() > max {
        return Err(LexErrorKind::StringTooLong { max });
    }
    Ok(value)
}

fn half_operator(lex: &logos::Lexer<Token>) -> Result<(), LexErrorKind> {
    let found = if lex.slice() == "&" { '&' } else { '|' };
    Err(LexErrorKind::ExpectingChar { found,
                                      expected: found })
}

/// A token and where it is, or end of file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The token; `None` at end of file.
    pub token:    Option<Token>,
    /// From the first character of the token through its last one. End of
    /// file sits just past the last character.
    pub location: Location,
}

impl Lexeme {
    /// Whether this is the end of the input.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.token.is_none()
    }

    /// Human-readable description used in parse errors.
    #[must_use]
    pub fn describe(&self) -> String {
        self.token
            .as_ref()
            .map_or_else(|| "end of file".to_string(), ToString::to_string)
    }
}

/// Turns a [`SourceText`] into [`Lexeme`]s.
///
/// Once the text is exhausted every call yields an end-of-file lexeme at the
/// final position.
pub struct Lexer<'s> {
    source: &'s SourceText,
    inner:  logos::Lexer<'s, Token>,
}

impl<'s> Lexer<'s> {
    /// Creates a lexer over `source` enforcing `config`.
    #[must_use]
    pub fn new(source: &'s SourceText, config: LexerConfig) -> Self {
        Self { source,
               inner: Token::lexer_with_extras(source.text(), config) }
    }

    /// Produces the next lexeme.
    ///
    /// # Errors
    /// The classified [`LexError`] for the offending text.
    pub fn next_lexeme(&mut self) -> Result<Lexeme, LexError> {
        match self.inner.next() {
            None => Ok(Lexeme { token:    None,
                                location: Location::at(self.source.end()), }),
            Some(result) => {
                let span = self.inner.span();
                let location = self.source.location(span.start, span.end);
                result.map(|token| Lexeme { token: Some(token),
                                            location })
                      .map_err(|kind| LexError { kind, location })
            },
        }
    }
}

/// Tokenizes a whole source, up to and including the end-of-file lexeme.
///
/// # Errors
/// The first lexical error encountered.
///
/// # Example
/// ```
/// use fhll::interpreter::{
///     lexer::{LexerConfig, Token, tokenize},
///     stream::SourceText,
/// };
///
/// let source = SourceText::read("let x = 1;".as_bytes()).unwrap();
/// let lexemes = tokenize(&source, LexerConfig::default()).unwrap();
///
/// assert_eq!(lexemes[0].token, Some(Token::Let));
/// assert!(lexemes.last().unwrap().is_eof());
/// ```
pub fn tokenize(source: &SourceText, config: LexerConfig) -> Result<Vec<Lexeme>, LexError> {
    let mut lexer = Lexer::new(source, config);
    let mut lexemes = Vec::new();
    loop {
        let lexeme = lexer.next_lexeme()?;
        let done = lexeme.is_eof();
        lexemes.push(lexeme);
        if done {
            return Ok(lexemes);
        }
    }
}

#[cfg(test)]
mod tests {
    use ordered_float::OrderedFloat;

    use super::{LexerConfig, Token, tokenize};
    use crate::{
        ast::location::Position,
        error::{LexError, LexErrorKind},
        interpreter::stream::SourceText,
    };

    fn tokens(source: &str) -> Vec<Token> {
        let source = SourceText::read(source.as_bytes()).unwrap();
        tokenize(&source, LexerConfig::default()).unwrap()
                                                 .into_iter()
                                                 .filter_map(|lexeme| lexeme.token)
                                                 .collect()
    }

    fn failure(source: &str, config: LexerConfig) -> LexError {
        let source = SourceText::read(source.as_bytes()).unwrap();
        tokenize(&source, config).unwrap_err()
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(tokens("fn letter let i32 i32x"),
                   vec![Token::Fn,
                        Token::Identifier("letter".into()),
                        Token::Let,
                        Token::BuiltinType("i32".into()),
                        Token::Identifier("i32x".into())]);
    }

    #[test]
    fn two_character_operators() {
        assert_eq!(tokens("== = => -> - :: : && || !="),
                   vec![Token::EqualEqual,
                        Token::Assign,
                        Token::FatArrow,
                        Token::Arrow,
                        Token::Minus,
                        Token::ColonColon,
                        Token::Colon,
                        Token::AndAnd,
                        Token::OrOr,
                        Token::BangEqual]);
    }

    #[test]
    fn comments_are_tokens() {
        assert_eq!(tokens("x // note\ny"),
                   vec![Token::Identifier("x".into()),
                        Token::Comment(" note".into()),
                        Token::Identifier("y".into())]);
    }

    #[test]
    fn escapes_are_resolved() {
        assert_eq!(tokens(r#""a\n\t\\\"b""#), vec![Token::Str("a\n\t\\\"b".into())]);
    }

    #[test]
    fn lone_ampersand_expects_its_twin() {
        let err = failure("a & b", LexerConfig::default());
        assert_eq!(err.kind,
                   LexErrorKind::ExpectingChar { found:    '&',
                                                 expected: '&', });
        assert_eq!(err.position(), Position::new(1, 3));
    }

    #[test]
    fn limits_come_from_the_config() {
        let config = LexerConfig { max_identifier_len: 3,
                                   max_string_len:     2,
                                   max_integer_value:  99, };
        assert_eq!(failure("abcd", config).kind, LexErrorKind::IdentifierTooLong { max: 3 });
        assert_eq!(failure("\"abc\"", config).kind, LexErrorKind::StringTooLong { max: 2 });
        assert_eq!(failure("100", config).kind, LexErrorKind::IntegerOverflow { max: 99 });
    }

    #[test]
    fn leading_zeros_are_rejected_before_the_dot() {
        assert_eq!(tokens("0.5 0. 10.05"),
                   vec![Token::Floating(OrderedFloat(0.5)),
                        Token::Floating(OrderedFloat(0.0)),
                        Token::Floating(OrderedFloat(10.05))]);

        let err = failure("x = 00.5", LexerConfig::default());
        assert_eq!(err.kind, LexErrorKind::IntegerLeadingZeros);
        assert_eq!(err.position(), Position::new(1, 5));
        assert_eq!(failure("01.", LexerConfig::default()).kind, LexErrorKind::IntegerLeadingZeros);
    }

    #[test]
    fn eof_repeats_at_the_end() {
        let source = SourceText::read("x".as_bytes()).unwrap();
        let mut lexer = super::Lexer::new(&source, LexerConfig::default());
        assert!(!lexer.next_lexeme().unwrap().is_eof());
        for _ in 0..3 {
            let lexeme = lexer.next_lexeme().unwrap();
            assert!(lexeme.is_eof());
            assert_eq!(lexeme.location.begin, Position::new(1, 2));
        }
    }
}
