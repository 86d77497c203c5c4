use crate::{
    ast::{
        EnumDeclaration, EnumVariant, FieldDeclaration, FunctionDeclaration, Parameter,
        StructDeclaration,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, TokenStream},
            statement::parse_block,
            utils::{
                expect, expect_brace, expect_parenthesis, expect_semicolon, parse_comma_separated,
                parse_name, parse_type,
            },
        },
    },
};

/// Parses a function declaration.
///
/// Grammar: `fn_decl := "fn" name "(" [ param { "," param } ] ")" [ "->" type ] block`
///
/// # Errors
/// - `ExpectedName` for a missing function name.
/// - `ExpectedParenthesis` around the parameter list.
/// - `ExpectedParameter`, `ExpectedComma` inside it.
/// - `ExpectedType`, `ExpectedBlock` after it.
pub fn parse_function(tokens: &mut TokenStream<'_>) -> ParseResult<FunctionDeclaration> {
    let keyword = tokens.next()?;
    let name = parse_name(tokens)?;
    expect_parenthesis(tokens, '(')?;
    let (parameters, _) = parse_comma_separated(tokens, parse_parameter)?;

    let return_type = if tokens.accept(&Token::Arrow)?.is_some() {
        Some(parse_type(tokens)?)
    } else {
        None
    };

    let block = parse_block(tokens)?;
    Ok(FunctionDeclaration { location: keyword.location.to(block.location),
                             name,
                             parameters,
                             return_type,
                             block })
}

/// Parses one parameter.
///
/// Grammar: `param := [ "mut" ] name ":" type`
fn parse_parameter(tokens: &mut TokenStream<'_>) -> ParseResult<Parameter> {
    let mutable = tokens.accept(&Token::Mut)?;
    if !matches!(tokens.peek_token(), Some(Token::Identifier(_))) {
        let found = tokens.peek();
        return Err(ParseError::ExpectedParameter { found:    found.describe(),
                                                   position: found.location.begin, });
    }
    let name = parse_name(tokens)?;
    expect(tokens, &Token::Colon, |found, position| ParseError::ExpectedColon { found, position })?;
    let ty = parse_type(tokens)?;

    let begin = mutable.as_ref().map_or(name.location, |m| m.location);
    Ok(Parameter { location: begin.to(ty.location),
                   mutable: mutable.is_some(),
                   name,
                   ty })
}

/// Parses a struct declaration.
///
/// Grammar: `struct_decl := "struct" name "{" { name ":" type ";" } "}"`
pub fn parse_struct(tokens: &mut TokenStream<'_>) -> ParseResult<StructDeclaration> {
    let keyword = tokens.next()?;
    let name = parse_name(tokens)?;
    expect_brace(tokens, '{')?;

    let mut fields = Vec::new();
    let closing = loop {
        if let Some(closing) = tokens.accept(&Token::RBrace)? {
            break closing;
        }
        if !matches!(tokens.peek_token(), Some(Token::Identifier(_))) {
            let found = tokens.peek();
            return Err(ParseError::ExpectedBrace { expected: '}',
                                                   found:    found.describe(),
                                                   position: found.location.begin, });
        }
        let field_name = parse_name(tokens)?;
        expect(tokens, &Token::Colon, |found, position| ParseError::ExpectedColon { found, position })?;
        let ty = parse_type(tokens)?;
        let semicolon = expect_semicolon(tokens)?;
        fields.push(FieldDeclaration { location: field_name.location.to(semicolon.location),
                                       name: field_name,
                                       ty });
    };

    Ok(StructDeclaration { location: keyword.location.to(closing.location),
                           name,
                           fields })
}

/// Parses an enum declaration whose variants are structs and nested enums.
///
/// Grammar: `enum_decl := "enum" name "{" { (struct_decl | enum_decl) ";" } "}"`
pub fn parse_enum(tokens: &mut TokenStream<'_>) -> ParseResult<EnumDeclaration> {
    let keyword = tokens.next()?;
    let name = parse_name(tokens)?;
    expect_brace(tokens, '{')?;

    let mut variants = Vec::new();
    let closing = loop {
        let variant = match tokens.peek_token() {
            Some(Token::RBrace) => break tokens.next()?,
            Some(Token::Struct) => EnumVariant::Struct(parse_struct(tokens)?),
            Some(Token::Enum) => EnumVariant::Enum(parse_enum(tokens)?),
            _ => {
                let found = tokens.peek();
                return Err(ParseError::UnexpectedToken { expected: "'struct', 'enum' or '}'".into(),
                                                         found:    found.describe(),
                                                         position: found.location.begin, });
            },
        };
        expect_semicolon(tokens)?;
        variants.push(variant);
    };

    Ok(EnumDeclaration { location: keyword.location.to(closing.location),
                         name,
                         variants })
}
