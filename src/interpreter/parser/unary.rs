use crate::{
    ast::{
        Cast, Constant, Expression, FnCall, IsCompare, LiteralValue, Name, NewStruct,
        UnaryOperation, UnaryOperator, VariantAccess, location::Located,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, TokenStream, parse_expression},
            statement::parse_assignment_value,
            utils::{
                expect_brace, expect_parenthesis, expect_semicolon, parse_access,
                parse_comma_separated, parse_name, parse_type, parse_variant_access,
            },
        },
    },
};

/// Parses a prefix `-` or `!`.
///
/// Grammar: `unary := ("-" | "!") unary | casted`
pub fn parse_unary(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let op = match tokens.peek_token() {
        Some(Token::Minus) => UnaryOperator::Negate,
        Some(Token::Bang) => UnaryOperator::Not,
        _ => return parse_casted(tokens),
    };
    let operator = tokens.next()?;
    let operand = tokens.nested(parse_unary)?;
    Ok(Expression::UnaryOperation(UnaryOperation { location: operator.location.to(operand.location()),
                                                   op,
                                                   operand: Box::new(operand) }))
}

/// Parses a term followed by `as T` or `is T` suffixes.
///
/// Grammar: `casted := term { ("as" | "is") type }`
fn parse_casted(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let mut value = parse_term(tokens)?;
    let mut levels = 0;
    loop {
        if matches!(tokens.peek_token(), Some(Token::As | Token::Is)) {
            tokens.deepen()?;
            levels += 1;
        }
        if tokens.accept(&Token::As)?.is_some() {
            let ty = parse_type(tokens)?;
            value = Expression::Cast(Cast { location: value.location().to(ty.location),
                                            value: Box::new(value),
                                            ty });
        } else if tokens.accept(&Token::Is)?.is_some() {
            let ty = parse_type(tokens)?;
            value = Expression::IsCompare(IsCompare { location: value.location().to(ty.location),
                                                      value: Box::new(value),
                                                      ty });
        } else {
            tokens.restore(levels);
            return Ok(value);
        }
    }
}

/// Parses a primary term.
///
/// Grammar:
/// ```text
/// term := literal | access | fn_call | new_struct | "(" expression ")"
/// ```
///
/// A parenthesised expression keeps the parentheses in its location.
///
/// # Errors
/// `ExpectedExpression` if the upcoming token cannot start a term.
pub fn parse_term(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let literal = match tokens.peek_token() {
        Some(Token::Integer(n)) => LiteralValue::Integer(*n),
        Some(Token::Floating(x)) => LiteralValue::Floating(*x),
        Some(Token::Boolean(b)) => LiteralValue::Boolean(*b),
        Some(Token::Str(s)) => LiteralValue::Str(s.clone()),
        Some(Token::Identifier(_)) => {
            let name = parse_name(tokens)?;
            return parse_named_term(tokens, name);
        },
        Some(Token::LParen) => {
            let opening = tokens.next()?;
            let inner = parse_expression(tokens)?;
            let closing = expect_parenthesis(tokens, ')')?;
            return Ok(inner.with_location(opening.location.to(closing.location)));
        },
        _ => {
            let found = tokens.peek();
            return Err(ParseError::ExpectedExpression { found:    found.describe(),
                                                        position: found.location.begin, });
        },
    };
    let lexeme = tokens.next()?;
    Ok(Expression::Constant(Constant { value:    literal,
                                       location: lexeme.location, }))
}

/// A term that starts with a name: a call, a struct literal or an access.
fn parse_named_term(tokens: &mut TokenStream<'_>, name: Name) -> ParseResult<Expression> {
    match tokens.peek_token() {
        Some(Token::LParen) => parse_call_arguments(tokens, name).map(Expression::FnCall),
        Some(Token::ColonColon | Token::LBrace) => {
            let ty = parse_variant_access(tokens, name)?;
            parse_new_struct(tokens, ty).map(Expression::NewStruct)
        },
        _ => parse_access(tokens, name).map(Expression::Access),
    }
}

/// Parses the argument list of a call whose name is already consumed.
///
/// Grammar: `fn_call := name "(" [ expression { "," expression } ] ")"`
pub(in crate::interpreter::parser) fn parse_call_arguments(tokens: &mut TokenStream<'_>,
                                                           name: Name)
                                                           -> ParseResult<FnCall> {
    expect_parenthesis(tokens, '(')?;
    let (arguments, closing) = parse_comma_separated(tokens, parse_expression)?;
    Ok(FnCall { location: name.location.to(closing.location),
                name,
                arguments })
}

/// Parses the field assignments of a struct literal.
///
/// Grammar: `new_struct := variant_access "{" { access "=" expression ";" } "}"`
fn parse_new_struct(tokens: &mut TokenStream<'_>, ty: VariantAccess) -> ParseResult<NewStruct> {
    expect_brace(tokens, '{')?;
    let mut assignments = Vec::new();
    loop {
        if let Some(closing) = tokens.accept(&Token::RBrace)? {
            return Ok(NewStruct { location: ty.location.to(closing.location),
                                  ty,
                                  assignments });
        }
        if !matches!(tokens.peek_token(), Some(Token::Identifier(_))) {
            let found = tokens.peek();
            return Err(ParseError::ExpectedBrace { expected: '}',
                                                   found:    found.describe(),
                                                   position: found.location.begin, });
        }
        let root = parse_name(tokens)?;
        let target = parse_access(tokens, root)?;
        assignments.push(parse_assignment_value(tokens, target)?);
        expect_semicolon(tokens)?;
    }
}
