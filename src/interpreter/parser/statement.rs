use crate::{
    ast::{
        Access, Assignment, Block, Expression, IfStatement, MatchStatement, Matcher, ReturnStatement, Statement,
        VariableDeclaration, WhileStatement,
        location::{Located, Location},
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, TokenStream, parse_expression},
            unary::parse_call_arguments,
            utils::{
                expect, expect_brace, expect_parenthesis, expect_semicolon, parse_access,
                parse_name, parse_type,
            },
        },
    },
};

/// Parses a `{ ... }` block.
///
/// Grammar: `block := "{" { statement } "}"`
///
/// # Errors
/// - `ExpectedBlock` if the upcoming token is not `{`.
/// - `ExpectedBrace` if the input ends before the closing `}`.
/// - `NestingTooDeep` if blocks and expressions are nested too deeply.
pub fn parse_block(tokens: &mut TokenStream<'_>) -> ParseResult<Block> {
    let Some(opening) = tokens.accept(&Token::LBrace)? else {
        let found = tokens.peek();
        return Err(ParseError::ExpectedBlock { found:    found.describe(),
                                               position: found.location.begin, });
    };

    tokens.nested(|tokens| parse_statements(tokens, opening.location))
}

/// The statements of a block whose `{` is already consumed, up to and
/// including its `}`.
fn parse_statements(tokens: &mut TokenStream<'_>, opening: Location) -> ParseResult<Block> {
    let mut statements = Vec::new();
    loop {
        if let Some(closing) = tokens.accept(&Token::RBrace)? {
            return Ok(Block { statements,
                              location: opening.to(closing.location) });
        }
        if tokens.peek().is_eof() {
            expect_brace(tokens, '}')?;
        }
        statements.push(parse_statement(tokens)?);
    }
}

/// Parses one statement and its optional trailing `;`.
///
/// Grammar:
/// ```text
/// statement := ( var_decl | assignment | fn_call | return | if | while
///              | match | block ) [ ";" ]
/// ```
pub fn parse_statement(tokens: &mut TokenStream<'_>) -> ParseResult<Statement> {
    let statement = match tokens.peek_token() {
        Some(Token::Mut | Token::Let) => Statement::VariableDeclaration(parse_variable_declaration(tokens)?),
        Some(Token::Identifier(_)) => parse_assignment_or_call(tokens)?,
        Some(Token::Return) => Statement::Return(parse_return(tokens)?),
        Some(Token::If) => Statement::If(parse_if(tokens)?),
        Some(Token::While) => Statement::While(parse_while(tokens)?),
        Some(Token::Match) => Statement::Match(parse_match(tokens)?),
        Some(Token::LBrace) => Statement::Block(parse_block(tokens)?),
        _ => {
            let found = tokens.peek();
            return Err(ParseError::UnexpectedToken { expected: "a statement".into(),
                                                     found:    found.describe(),
                                                     position: found.location.begin, });
        },
    };
    tokens.accept(&Token::Semicolon)?;
    Ok(statement)
}

/// Grammar: `var_decl := [ "mut" ] "let" name [ ":" type ] [ "=" expression ]`
fn parse_variable_declaration(tokens: &mut TokenStream<'_>) -> ParseResult<VariableDeclaration> {
    let mutable = tokens.accept(&Token::Mut)?;
    let keyword = expect(tokens, &Token::Let, |found, position| ParseError::ExpectedLet { found, position })?;
    let name = parse_name(tokens)?;
    let mut location = mutable.as_ref()
                              .map_or(keyword.location, |m| m.location)
                              .to(name.location);

    let ty = if tokens.accept(&Token::Colon)?.is_some() {
        let ty = parse_type(tokens)?;
        location = location.to(ty.location);
        Some(ty)
    } else {
        None
    };

    let value = if tokens.accept(&Token::Assign)?.is_some() {
        let value = parse_expression(tokens)?;
        location = location.to(value.location());
        Some(value)
    } else {
        None
    };

    Ok(VariableDeclaration { name,
                             ty,
                             value,
                             mutable: mutable.is_some(),
                             location })
}

/// A statement starting with a name is a call when `(` follows it and an
/// assignment otherwise.
fn parse_assignment_or_call(tokens: &mut TokenStream<'_>) -> ParseResult<Statement> {
    let name = parse_name(tokens)?;
    if tokens.check(&Token::LParen) {
        return parse_call_arguments(tokens, name).map(Statement::FnCall);
    }
    let target = parse_access(tokens, name)?;
    parse_assignment_value(tokens, target).map(Statement::Assignment)
}

/// Parses `"=" expression` after an already parsed target.
///
/// Grammar: `assignment := access "=" expression`
pub(in crate::interpreter::parser) fn parse_assignment_value(tokens: &mut TokenStream<'_>,
                                                             target: Access)
                                                             -> ParseResult<Assignment> {
    expect(tokens, &Token::Assign, |found, position| ParseError::ExpectedAssign { found, position })?;
    let value = parse_expression(tokens)?;
    Ok(Assignment { location: target.location.to(value.location()),
                    target,
                    value })
}

/// Grammar: `return := "return" [ expression ]`
///
/// The value is absent when `;` or `}` follows the keyword.
fn parse_return(tokens: &mut TokenStream<'_>) -> ParseResult<ReturnStatement> {
    let keyword = tokens.next()?;
    let value = match tokens.peek_token() {
        Some(Token::Semicolon | Token::RBrace) | None => None,
        Some(_) => Some(parse_expression(tokens)?),
    };
    let location = value.as_ref()
                        .map_or(keyword.location, |v| keyword.location.to(v.location()));
    Ok(ReturnStatement { value, location })
}

fn parse_condition(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    expect_parenthesis(tokens, '(')?;
    let condition = parse_expression(tokens)?;
    expect_parenthesis(tokens, ')')?;
    Ok(condition)
}

/// Grammar: `if := "if" "(" expression ")" block [ "else" block ]`
fn parse_if(tokens: &mut TokenStream<'_>) -> ParseResult<IfStatement> {
    let keyword = tokens.next()?;
    let condition = parse_condition(tokens)?;
    let then_block = parse_block(tokens)?;
    let else_block = if tokens.accept(&Token::Else)?.is_some() {
        Some(parse_block(tokens)?)
    } else {
        None
    };

    let end = else_block.as_ref().map_or(then_block.location, |b| b.location);
    Ok(IfStatement { location: keyword.location.to(end),
                     condition,
                     then_block,
                     else_block })
}

/// Grammar: `while := "while" "(" expression ")" block`
fn parse_while(tokens: &mut TokenStream<'_>) -> ParseResult<WhileStatement> {
    let keyword = tokens.next()?;
    let condition = parse_condition(tokens)?;
    let block = parse_block(tokens)?;
    Ok(WhileStatement { location: keyword.location.to(block.location),
                        condition,
                        block })
}

/// Grammar: `match := "match" "(" expression ")" "{" { type name "=>" block ";" } "}"`
fn parse_match(tokens: &mut TokenStream<'_>) -> ParseResult<MatchStatement> {
    let keyword = tokens.next()?;
    let value = parse_condition(tokens)?;
    expect_brace(tokens, '{')?;

    let mut matchers = Vec::new();
    let closing: Location = loop {
        if let Some(closing) = tokens.accept(&Token::RBrace)? {
            break closing.location;
        }
        let ty = parse_type(tokens)?;
        let name = parse_name(tokens)?;
        expect(tokens, &Token::FatArrow, |found, position| {
            ParseError::UnexpectedToken { expected: "'=>'".into(),
                                          found,
                                          position }
        })?;
        let block = parse_block(tokens)?;
        expect_semicolon(tokens)?;
        matchers.push(Matcher { location: ty.location.to(block.location),
                                ty,
                                name,
                                block });
    };

    Ok(MatchStatement { location: keyword.location.to(closing),
                        value,
                        matchers })
}
