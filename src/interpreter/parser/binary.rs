use crate::{
    ast::{
        BinaryOperation, BinaryOperator, BoolOperation, BoolOperator, Compare, CompareOperator,
        Expression, location::Located,
    },
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, TokenStream},
            unary::parse_unary,
        },
    },
};

/// Parses logical OR expressions (`||`).
///
/// Grammar: `logical_or := logical_and { "||" logical_and }`
pub fn parse_logical_or(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let mut left = parse_logical_and(tokens)?;
    let mut levels = 0;
    while tokens.accept(&Token::OrOr)?.is_some() {
        tokens.deepen()?;
        levels += 1;
        let right = parse_logical_and(tokens)?;
        left = bool_operation(BoolOperator::Or, left, right);
    }
    tokens.restore(levels);
    Ok(left)
}

/// Parses logical AND expressions (`&&`).
///
/// Grammar: `logical_and := relational { "&&" relational }`
pub fn parse_logical_and(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let mut left = parse_relational(tokens)?;
    let mut levels = 0;
    while tokens.accept(&Token::AndAnd)?.is_some() {
        tokens.deepen()?;
        levels += 1;
        let right = parse_relational(tokens)?;
        left = bool_operation(BoolOperator::And, left, right);
    }
    tokens.restore(levels);
    Ok(left)
}

fn bool_operation(op: BoolOperator, left: Expression, right: Expression) -> Expression {
    Expression::BoolOperation(BoolOperation { location: left.location().to(right.location()),
                                              op,
                                              left: Box::new(left),
                                              right: Box::new(right) })
}

/// Parses a single, non-associative comparison.
///
/// Grammar: `relational := additive [ ("==" | "!=" | "<" | ">") additive ]`
pub fn parse_relational(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let left = parse_additive(tokens)?;
    let op = match tokens.peek_token() {
        Some(Token::EqualEqual) => CompareOperator::Equal,
        Some(Token::BangEqual) => CompareOperator::NotEqual,
        Some(Token::Less) => CompareOperator::Less,
        Some(Token::Greater) => CompareOperator::Greater,
        _ => return Ok(left),
    };
    tokens.next()?;
    let right = parse_additive(tokens)?;
    Ok(Expression::Compare(Compare { location: left.location().to(right.location()),
                                     op,
                                     left: Box::new(left),
                                     right: Box::new(right) }))
}

/// Parses additive expressions (`+`, `-`), left-associative.
///
/// Grammar: `additive := multiplicative { ("+" | "-") multiplicative }`
pub fn parse_additive(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let mut left = parse_multiplicative(tokens)?;
    let mut levels = 0;
    loop {
        let op = match tokens.peek_token() {
            Some(Token::Plus) => BinaryOperator::Add,
            Some(Token::Minus) => BinaryOperator::Sub,
            _ => {
                tokens.restore(levels);
                return Ok(left);
            },
        };
        tokens.next()?;
        tokens.deepen()?;
        levels += 1;
        let right = parse_multiplicative(tokens)?;
        left = binary_operation(op, left, right);
    }
}

/// Parses multiplicative expressions (`*`, `/`), left-associative.
///
/// Grammar: `multiplicative := unary { ("*" | "/") unary }`
pub fn parse_multiplicative(tokens: &mut TokenStream<'_>) -> ParseResult<Expression> {
    let mut left = parse_unary(tokens)?;
    let mut levels = 0;
    loop {
        let op = match tokens.peek_token() {
            Some(Token::Star) => BinaryOperator::Mul,
            Some(Token::Slash) => BinaryOperator::Div,
            _ => {
                tokens.restore(levels);
                return Ok(left);
            },
        };
        tokens.next()?;
        tokens.deepen()?;
        levels += 1;
        let right = parse_unary(tokens)?;
        left = binary_operation(op, left, right);
    }
}

fn binary_operation(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::BinaryOperation(BinaryOperation { location: left.location().to(right.location()),
                                                  op,
                                                  left: Box::new(left),
                                                  right: Box::new(right) })
}
