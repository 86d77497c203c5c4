use crate::{
    ast::{Access, Name, VariantAccess, location::Position},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::core::{ParseResult, TokenStream},
    },
};

/// Consumes `expected` or fails with the error `error` builds from the token
/// actually found.
pub(in crate::interpreter::parser) fn expect<F>(tokens: &mut TokenStream<'_>,
                                                expected: &Token,
                                                error: F)
                                                -> ParseResult<Lexeme>
    where F: FnOnce(String, Position) -> ParseError
{
    if tokens.check(expected) {
        return tokens.next();
    }
    let found = tokens.peek();
    Err(error(found.describe(), found.location.begin))
}

pub(in crate::interpreter::parser) fn expect_semicolon(tokens: &mut TokenStream<'_>)
                                                       -> ParseResult<Lexeme> {
    expect(tokens, &Token::Semicolon, |found, position| {
        ParseError::ExpectedSemicolon { found, position }
    })
}

pub(in crate::interpreter::parser) fn expect_brace(tokens: &mut TokenStream<'_>,
                                                   brace: char)
                                                   -> ParseResult<Lexeme> {
    let token = if brace == '{' { Token::LBrace } else { Token::RBrace };
    expect(tokens, &token, |found, position| {
        ParseError::ExpectedBrace { expected: brace,
                                    found,
                                    position }
    })
}

pub(in crate::interpreter::parser) fn expect_parenthesis(tokens: &mut TokenStream<'_>,
                                                         parenthesis: char)
                                                         -> ParseResult<Lexeme> {
    let token = if parenthesis == '(' { Token::LParen } else { Token::RParen };
    expect(tokens, &token, |found, position| {
        ParseError::ExpectedParenthesis { expected: parenthesis,
                                          found,
                                          position }
    })
}

/// Parses an identifier into a [`Name`].
///
/// # Errors
/// `ExpectedName` if the upcoming token is not an identifier.
pub(in crate::interpreter::parser) fn parse_name(tokens: &mut TokenStream<'_>) -> ParseResult<Name> {
    if let Some(Token::Identifier(value)) = tokens.peek_token() {
        let value = value.clone();
        let lexeme = tokens.next()?;
        return Ok(Name { value,
                         location: lexeme.location });
    }
    let found = tokens.peek();
    Err(ParseError::ExpectedName { found:    found.describe(),
                                   position: found.location.begin, })
}

/// Parses a type reference: a builtin keyword or a `::`-separated path.
///
/// Grammar: `type := builtin | name { "::" name }`
///
/// # Errors
/// `ExpectedType` if the upcoming token cannot start a type.
pub(in crate::interpreter::parser) fn parse_type(tokens: &mut TokenStream<'_>)
                                                 -> ParseResult<VariantAccess> {
    match tokens.peek_token() {
        Some(Token::BuiltinType(keyword)) => {
            let value = keyword.clone();
            let lexeme = tokens.next()?;
            Ok(VariantAccess { names:    vec![Name { value,
                                                     location: lexeme.location }],
                               location: lexeme.location, })
        },
        Some(Token::Identifier(_)) => {
            let first = parse_name(tokens)?;
            parse_variant_access(tokens, first)
        },
        _ => {
            let found = tokens.peek();
            Err(ParseError::ExpectedType { found:    found.describe(),
                                           position: found.location.begin, })
        },
    }
}

/// Continues a `::` path whose first segment is already consumed.
pub(in crate::interpreter::parser) fn parse_variant_access(tokens: &mut TokenStream<'_>,
                                                           first: Name)
                                                           -> ParseResult<VariantAccess> {
    let mut location = first.location;
    let mut names = vec![first];
    while tokens.accept(&Token::ColonColon)?.is_some() {
        let name = parse_name(tokens)?;
        location = location.to(name.location);
        names.push(name);
    }
    Ok(VariantAccess { names, location })
}

/// Continues a `.` field chain whose root is already consumed.
pub(in crate::interpreter::parser) fn parse_access(tokens: &mut TokenStream<'_>,
                                                   root: Name)
                                                   -> ParseResult<Access> {
    let mut location = root.location;
    let mut names = vec![root];
    while tokens.accept(&Token::Dot)?.is_some() {
        let name = parse_name(tokens)?;
        location = location.to(name.location);
        names.push(name);
    }
    Ok(Access { names, location })
}

/// Parses a comma-separated list up to and including `)`.
///
/// An immediately encountered `)` produces an empty list.
///
/// Grammar (simplified): `list := [ item { "," item } ] ")"`
///
/// Returns the items and the closing parenthesis.
pub(in crate::interpreter::parser) fn parse_comma_separated<T>(
    tokens: &mut TokenStream<'_>,
    parse_item: impl Fn(&mut TokenStream<'_>) -> ParseResult<T>)
    -> ParseResult<(Vec<T>, Lexeme)> {
    let mut items = Vec::new();
    if let Some(closing) = tokens.accept(&Token::RParen)? {
        return Ok((items, closing));
    }
    loop {
        items.push(parse_item(tokens)?);
        if tokens.accept(&Token::Comma)?.is_some() {
            continue;
        }
        if let Some(closing) = tokens.accept(&Token::RParen)? {
            return Ok((items, closing));
        }
        let found = tokens.peek();
        return Err(ParseError::ExpectedComma { found:    found.describe(),
                                               position: found.location.begin, });
    }
}
