use fhll::{
    ast::{
        BinaryOperator, EnumVariant, Expression, Module, Statement,
        location::{Located, Location, Position},
    },
    error::{Error, ParseError},
    interpreter::parser::core::MAX_NESTING_DEPTH,
    parse_str,
};
use pretty_assertions::assert_eq;

fn module(src: &str) -> Module {
    parse_str(src, &Default::default()).unwrap_or_else(|e| panic!("Parse failed: {e}\n{src}"))
}

fn parse_failure(src: &str) -> ParseError {
    match parse_str(src, &Default::default()) {
        Err(Error::Parse(e)) => e,
        other => panic!("Expected a parse error for {src:?}, got {other:?}"),
    }
}

/// The expression of the single `return` in `main`.
fn returned(src: &str) -> Expression {
    let module = module(&format!("fn main() -> i32 {{ return {src}; }}"));
    match module.functions[0].block.statements.as_slice() {
        [Statement::Return(ret)] => ret.value.clone().unwrap(),
        other => panic!("Unexpected statements {other:?}"),
    }
}

fn span(begin: (usize, usize), end: (usize, usize)) -> Location {
    Location::new(Position::new(begin.0, begin.1), Position::new(end.0, end.1))
}

#[test]
fn declarations_keep_their_order_per_kind() {
    let module = module("fn a() {} struct S { x: i32; } enum E { struct V {}; enum W { struct X {}; }; } fn \
                         b(mut n: i32, s: S) -> E::W::X { return E::W::X {}; }");

    let functions = module.functions.iter().map(|f| f.name.value.as_str()).collect::<Vec<_>>();
    assert_eq!(functions, vec!["a", "b"]);
    assert_eq!(module.structs[0].fields[0].ty.to_string(), "i32");

    let variants = module.enums[0].variants
                                  .iter()
                                  .map(|variant| match variant {
                                      EnumVariant::Struct(s) => format!("struct {}", s.name.value),
                                      EnumVariant::Enum(e) => format!("enum {}", e.name.value),
                                  })
                                  .collect::<Vec<_>>();
    assert_eq!(variants, vec!["struct V", "enum W"]);

    let b = &module.functions[1];
    assert!(b.parameters[0].mutable);
    assert!(!b.parameters[1].mutable);
    assert_eq!(b.return_type.as_ref().unwrap().to_string(), "E::W::X");
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let Expression::BinaryOperation(add) = returned("1 + 2 * 3") else {
        panic!("expected an addition");
    };
    assert_eq!(add.op, BinaryOperator::Add);
    assert!(matches!(*add.right, Expression::BinaryOperation(ref mul) if mul.op == BinaryOperator::Mul));
}

#[test]
fn subtraction_is_left_associative() {
    let Expression::BinaryOperation(outer) = returned("10 - 3 - 2") else {
        panic!("expected a subtraction");
    };
    assert!(matches!(*outer.left, Expression::BinaryOperation(_)));
    assert!(matches!(*outer.right, Expression::Constant(_)));
}

#[test]
fn casts_bind_tighter_than_unary_operators() {
    let Expression::UnaryOperation(negation) = returned("-x as f32") else {
        panic!("expected a negation");
    };
    assert!(matches!(*negation.operand, Expression::Cast(_)));
}

#[test]
fn spans_cover_all_tokens() {
    // fn main() -> i32 { return (a + b) * c; }
    // 1234567890123456789012345678901234567890
    let expression = returned("(a + b) * c");
    assert_eq!(expression.location(), span((1, 27), (1, 37)));
    let Expression::BinaryOperation(mul) = expression else {
        panic!("expected a multiplication");
    };
    assert_eq!(mul.left.location(), span((1, 27), (1, 33)));
    assert_eq!(mul.right.location(), span((1, 37), (1, 37)));
}

#[test]
fn statement_spans_run_across_lines() {
    let module = module("fn main() {\n    mut let x: i32\n        = 1;\n    x = 2\n}");
    let statements = &module.functions[0].block.statements;
    assert_eq!(statements[0].location(), span((2, 5), (3, 11)));
    assert_eq!(statements[1].location(), span((4, 5), (4, 9)));
    assert_eq!(module.functions[0].location(), span((1, 1), (5, 1)));
}

#[test]
fn semicolons_are_optional_between_statements() {
    let module = module("fn main() { let a = 1 let b = 2; print(\"x\") }");
    assert_eq!(module.functions[0].block.statements.len(), 3);
}

#[test]
fn calls_accesses_and_struct_literals_are_told_apart() {
    assert!(matches!(returned("f(1, g())"), Expression::FnCall(ref call) if call.arguments.len() == 2));
    assert!(matches!(returned("item.inner.amount"), Expression::Access(ref a) if a.names.len() == 3));
    assert!(matches!(returned("Shape::Circle { r = 1; }"), Expression::NewStruct(ref s) if s.assignments.len() == 1));
    assert!(matches!(returned("P {}"), Expression::NewStruct(_)));
}

#[test]
fn match_arms_need_a_semicolon() {
    let module = module("fn main() { match (x) { i32 n => {}; _ other => { return; }; } }");
    let [Statement::Match(statement)] = module.functions[0].block.statements.as_slice() else {
        panic!("expected a match");
    };
    assert_eq!(statement.matchers.len(), 2);
    assert!(statement.matchers[1].ty.is_wildcard());

    assert!(matches!(parse_failure("fn main() { match (x) { i32 n => {} } }"),
                     ParseError::ExpectedSemicolon { .. }));
}

#[test]
fn syntax_errors_name_the_expected_production() {
    assert!(matches!(parse_failure("fn main() { let x = ; }"),
                     ParseError::ExpectedExpression { position, .. } if position == Position::new(1, 21)));
    assert!(matches!(parse_failure("fn ("), ParseError::ExpectedName { .. }));
    assert!(matches!(parse_failure("fn f(x i32) {}"), ParseError::ExpectedColon { .. }));
    assert!(matches!(parse_failure("fn f(1) {}"), ParseError::ExpectedParameter { .. }));
    assert!(matches!(parse_failure("fn f(a: i32 b: i32) {}"), ParseError::ExpectedComma { .. }));
    assert!(matches!(parse_failure("fn f() -> {}"), ParseError::ExpectedType { .. }));
    assert!(matches!(parse_failure("fn f()"), ParseError::ExpectedBlock { .. }));
    assert!(matches!(parse_failure("fn f() { mut x = 1; }"), ParseError::ExpectedLet { .. }));
    assert!(matches!(parse_failure("fn f() { x 1; }"), ParseError::ExpectedAssign { .. }));
    assert!(matches!(parse_failure("fn f() { if true {} }"), ParseError::ExpectedParenthesis { .. }));
    assert!(matches!(parse_failure("fn f() {"), ParseError::ExpectedBrace { .. }));
    assert!(matches!(parse_failure("struct S { a: i32 }"), ParseError::ExpectedSemicolon { .. }));
    assert!(matches!(parse_failure("let x = 1;"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn comparisons_do_not_chain() {
    assert!(matches!(parse_failure("fn main() -> bool { return 1 < 2 < 3; }"),
                     ParseError::UnexpectedToken { .. }));
}

#[test]
fn nesting_is_limited() {
    let limit = MAX_NESTING_DEPTH;
    let too_deep = |e: ParseError| matches!(e, ParseError::NestingTooDeep { max, .. } if max == limit);

    let parens = format!("fn main() -> i32 {{ return {}1{}; }}", "(".repeat(3000), ")".repeat(3000));
    assert!(too_deep(parse_failure(&parens)));

    let blocks = format!("fn main() {{ {}{} }}", "{ ".repeat(3000), " }".repeat(3000));
    assert!(too_deep(parse_failure(&blocks)));

    let negations = format!("fn main() -> bool {{ return {}true; }}", "!".repeat(3000));
    assert!(too_deep(parse_failure(&negations)));

    let chain = format!("fn main() -> i32 {{ return 1{}; }}", " + 1".repeat(3000));
    assert!(too_deep(parse_failure(&chain)));

    let casts = format!("fn main() -> i32 {{ return 1{}; }}", " as i32".repeat(3000));
    assert!(too_deep(parse_failure(&casts)));
}

#[test]
fn nesting_limit_reports_the_first_level_past_it() {
    // Function body and `return` value take two levels.
    let depth = MAX_NESTING_DEPTH - 2;
    let fits = format!("fn main() -> i32 {{ return {}1{}; }}", "(".repeat(depth), ")".repeat(depth));
    module(&fits);

    let over = format!("fn main() -> i32 {{ return {}1{}; }}", "(".repeat(depth + 1), ")".repeat(depth + 1));
    match parse_failure(&over) {
        ParseError::NestingTooDeep { position, .. } => {
            // `fn main() -> i32 { return ` is 26 characters long; the error
            // points at the `1` after the innermost parenthesis.
            assert_eq!(position, Position::new(1, 26 + depth + 2));
        },
        other => panic!("Expected a nesting error, got {other:?}"),
    }
}
