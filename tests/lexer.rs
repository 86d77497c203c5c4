use fhll::{
    ast::location::{Location, Position},
    error::LexErrorKind,
    interpreter::{
        lexer::{Lexeme, LexerConfig, Token, tokenize},
        stream::SourceText,
    },
};
use ordered_float::OrderedFloat;
use pretty_assertions::assert_eq;

fn lex(source: &str) -> Vec<Lexeme> {
    let source = SourceText::read(source.as_bytes()).unwrap();
    tokenize(&source, LexerConfig::default()).unwrap()
}

fn span(begin: (usize, usize), end: (usize, usize)) -> Location {
    Location::new(Position::new(begin.0, begin.1), Position::new(end.0, end.1))
}

#[test]
fn lexemes_carry_line_and_column_spans() {
    let lexemes = lex("let total = 42;\r\nreturn total;");
    let spans = lexemes.iter().map(|l| l.location).collect::<Vec<_>>();

    assert_eq!(spans,
               vec![span((1, 1), (1, 3)),
                    span((1, 5), (1, 9)),
                    span((1, 11), (1, 11)),
                    span((1, 13), (1, 14)),
                    span((1, 15), (1, 15)),
                    span((2, 1), (2, 6)),
                    span((2, 8), (2, 12)),
                    span((2, 13), (2, 13)),
                    span((2, 14), (2, 14))]);
    assert!(lexemes.last().unwrap().is_eof());
}

#[test]
fn line_endings_are_normalised() {
    for source in ["a\nb", "a\r\nb", "a\rb"] {
        let lexemes = lex(source);
        assert_eq!(lexemes[1].location.begin, Position::new(2, 1), "in {source:?}");
    }
}

#[test]
fn columns_count_characters() {
    let lexemes = lex("\"héllo\" x");
    assert_eq!(lexemes[0].token, Some(Token::Str("héllo".into())));
    assert_eq!(lexemes[0].location, span((1, 1), (1, 7)));
    assert_eq!(lexemes[1].location, span((1, 9), (1, 9)));
}

#[test]
fn numeric_literals() {
    let tokens = lex("0 17 3.25 1. 18446744073709551615").into_iter()
                                                          .filter_map(|l| l.token)
                                                          .collect::<Vec<_>>();
    assert_eq!(tokens,
               vec![Token::Integer(0),
                    Token::Integer(17),
                    Token::Floating(OrderedFloat(3.25)),
                    Token::Floating(OrderedFloat(1.0)),
                    Token::Integer(u64::MAX)]);
}

#[test]
fn builtin_types_and_keywords() {
    let tokens = lex("mut let x: f32 = y as bool is str; match while").into_iter()
                                                                       .filter_map(|l| l.token)
                                                                       .collect::<Vec<_>>();
    assert_eq!(tokens,
               vec![Token::Mut,
                    Token::Let,
                    Token::Identifier("x".into()),
                    Token::Colon,
                    Token::BuiltinType("f32".into()),
                    Token::Assign,
                    Token::Identifier("y".into()),
                    Token::As,
                    Token::BuiltinType("bool".into()),
                    Token::Is,
                    Token::BuiltinType("str".into()),
                    Token::Semicolon,
                    Token::Match,
                    Token::While]);
}

#[test]
fn errors_point_at_the_offending_text() {
    let source = SourceText::read("let s =\n  \"a\\qb\";".as_bytes()).unwrap();
    let error = tokenize(&source, LexerConfig::default()).unwrap_err();
    assert_eq!(error.kind, LexErrorKind::InvalidEscapeSequence { escape: 'q' });
    assert_eq!(error.position(), Position::new(2, 3));
    assert_eq!(error.to_string(), "Error at 2:3: Invalid escape sequence '\\q'.");
}

#[test]
fn unexpected_characters_are_reported() {
    let source = SourceText::read("let # = 1;".as_bytes()).unwrap();
    let error = tokenize(&source, LexerConfig::default()).unwrap_err();
    assert_eq!(error.kind, LexErrorKind::UnexpectedCharacter);
    assert_eq!(error.position(), Position::new(1, 5));
}

#[test]
fn limits_are_configurable() {
    let config = LexerConfig { max_identifier_len: 4,
                               ..LexerConfig::default() };
    let source = SourceText::read("abcd abcde".as_bytes()).unwrap();
    let error = tokenize(&source, config).unwrap_err();
    assert_eq!(error.kind, LexErrorKind::IdentifierTooLong { max: 4 });
    assert_eq!(error.position(), Position::new(1, 6));
}
