use fhll::{
    config::Config,
    error::{Error, LexErrorKind, RuntimeError},
    interpreter::value::core::Value,
    parse_str, run_with_output, validate,
};

fn run_program(src: &str, entry: &str, config: &Config) -> Result<(Option<Value>, String), Error> {
    let module = parse_str(src, &config.lexer)?;
    let program = validate(&module)?;
    let mut out = Vec::new();
    let value = run_with_output(&program, entry, config, &mut out)?;
    Ok((value, String::from_utf8_lossy(&out).into_owned()))
}

fn assert_value(src: &str, expected: impl Into<Value>) {
    match run_program(src, "main", &Config::default()) {
        Ok((value, _)) => assert_eq!(value, Some(expected.into()), "in:\n{src}"),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_output(src: &str, expected: &str) {
    match run_program(src, "main", &Config::default()) {
        Ok((_, output)) => assert_eq!(output, expected),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_failure(src: &str) -> Error {
    match run_program(src, "main", &Config::default()) {
        Ok((value, _)) => panic!("Script succeeded with {value:?} but was expected to fail"),
        Err(e) => e,
    }
}

fn runtime_failure(src: &str) -> RuntimeError {
    match assert_failure(src) {
        Error::Runtime(e) => e,
        other => panic!("Expected a semantic or runtime error, got {other:?}"),
    }
}

#[test]
fn returns_a_constant() {
    assert_value("fn main() -> i32 { return 3; }", 3);
}

#[test]
fn returns_a_typed_variable() {
    assert_value("fn main() -> i32 { let z: i32 = 32; return z; }", 32);
}

#[test]
fn while_loop_returns_early() {
    assert_value("fn main() -> i32 { mut let i: i32 = 0; while (i < 10) { if (5 < i) { return i; } i = \
                  i + 1; } return i; }",
                 6);
}

#[test]
fn match_falls_back_to_wildcard() {
    assert_value("fn main() -> i32 { mut let i = 0 == 1; match (i) { i32 x => { return 10; }; _ y => { \
                  return 20; }; } }",
                 20);
}

#[test]
fn nested_calls_pass_arguments() {
    assert_value("fn double2(x:i32,y:i32)->i32{return x+y;} fn double(x:i32)->i32{return double2(x,x);} \
                  fn main()->i32{return double(3);}",
                 6);
}

#[test]
fn struct_fields_are_readable() {
    assert_value("struct Item { amount: i32; } fn main() -> i32 { let item: Item = Item { amount = 5; }; \
                  return item.amount; }",
                 5);
}

#[test]
fn arithmetic_follows_precedence() {
    assert_value("fn main() -> i32 { return 2 + 3 * 4 - 10 / 5; }", 12);
    assert_value("fn main() -> i32 { return (2 + 3) * 4; }", 20);
    assert_value("fn main() -> i32 { return 10 - 3 - 2; }", 5);
    assert_value("fn main() -> i32 { return --4; }", 4);
    assert_value("fn main() -> f32 { return 1.5 * 2.0; }", 3.0_f32);
}

#[test]
fn mixed_operands_cast_the_right_side() {
    assert_value("fn main() -> f32 { return 1.5 + 2; }", 3.5_f32);
    assert_value("fn main() -> i32 { return 2 + 1.5; }", 3);
}

#[test]
fn comparisons_and_logic() {
    assert_value("fn main() -> bool { return 1 < 2 && 3 > 2; }", true);
    assert_value("fn main() -> bool { return \"a\" == \"b\" || !false; }", true);
    assert_value("fn main() -> bool { return 1.5 != 1.5; }", false);
}

#[test]
fn logical_operators_short_circuit() {
    let side = "fn side() -> bool { panic(\"evaluated\"); return true; }";
    assert_value(&format!("{side} fn main() -> bool {{ return false && side(); }}"), false);
    assert_value(&format!("{side} fn main() -> bool {{ return true || side(); }}"), true);
}

#[test]
fn logical_operators_yield_an_operand() {
    assert_value("fn main() -> i32 { return 0 || 5; }", 5);
    assert_value("fn main() -> i32 { return 3 && 0; }", 0);
    assert_value("fn main() -> str { return \"\" || \"fallback\"; }", "fallback");
}

#[test]
fn strings_concatenate_and_repeat() {
    assert_value("fn main() -> str { return \"ab\" + \"cd\"; }", "abcd");
    assert_value("fn main() -> str { return \"ab\" * 3; }", "ababab");
    assert_value("fn main() -> str { return \"ab\" * 0; }", "");
}

#[test]
fn casts_convert_between_builtins() {
    assert_value("fn main() -> i32 { return \"42\" as i32 + 1; }", 43);
    assert_value("fn main() -> f32 { return (7 as f32) / 2.0; }", 3.5_f32);
    assert_value("fn main() -> i32 { return 3.9 as i32; }", 3);
    assert_value("fn main() -> str { return 12 as str; }", "12");
    assert_value("fn main() -> i32 { return true as i32; }", 1);
    assert_value("fn main() -> bool { return \"\" as bool; }", false);
}

#[test]
fn declarations_convert_implicitly() {
    assert_value("fn main() -> f32 { let x: f32 = 3; return x; }", 3.0_f32);
    assert_value("fn main() -> str { mut let s: str = \"\"; s = 7; return s; }", "7");
}

#[test]
fn conditions_use_truthiness() {
    assert_value("fn main() -> i32 { if (\"x\") { return 1; } else { return 2; } }", 1);
    assert_value("fn main() -> i32 { mut let n = 3; mut let steps = 0; while (n) { n = n - 1; steps = \
                  steps + 1; } return steps; }",
                 3);
}

#[test]
fn blocks_scope_declarations() {
    assert_value("fn main() -> i32 { let x = 1; { let x = 2; } return x; }", 1);
    assert_value("fn main() -> i32 { mut let x = 1; { x = 2; } return x; }", 2);
    assert_value("fn main() -> i32 { mut let x = 1; if (true) { let y = 5; x = y; } return x; }", 5);
}

#[test]
fn omitted_declaration_values_default() {
    assert_value("fn main() -> i32 { mut let x: i32; return x; }", 0);
    assert_value("fn main() -> str { mut let s: str; return s + \"!\"; }", "!");
}

#[test]
fn struct_literals_default_omitted_fields() {
    let src = "struct P { x: i32; y: str; } fn main() -> str { let p = P { x = 1; }; return p.y + \"|\"; }";
    assert_value(src, "|");
}

#[test]
fn nested_fields_are_assignable() {
    let src = "struct Inner { n: i32; } struct Outer { inner: Inner; } fn main() -> i32 { mut let o: Outer; \
               o.inner.n = 9; return o.inner.n; }";
    assert_value(src, 9);
}

#[test]
fn arguments_are_copied_into_the_callee() {
    let src = "struct Counter { n: i32; } fn bump(mut c: Counter) -> i32 { c.n = c.n + 1; return c.n; } fn \
               main() -> i32 { let c = Counter { n = 1; }; let b = bump(c); return c.n * 10 + b; }";
    assert_value(src, 12);
}

#[test]
fn enums_dispatch_through_match() {
    let src = "enum Shape { struct Circle { r: i32; }; struct Square { side: i32; }; }
               fn area(s: Shape) -> i32 {
                   match (s) {
                       Shape::Circle c => { return 3 * c.r * c.r; };
                       Shape::Square q => { return q.side * q.side; };
                       _ other => { return 0; };
                   }
               }
               fn main() -> i32 { return area(Shape::Square { side = 4; }) + area(Shape::Circle { r = 1; }); }";
    assert_value(src, 19);
}

#[test]
fn is_tests_the_derived_from_relation() {
    let types = "enum A { enum B { struct C {}; }; struct D {}; }";
    assert_value(&format!("{types} fn main() -> bool {{ return A::B::C {{}} is A; }}"), true);
    assert_value(&format!("{types} fn main() -> bool {{ return A::B::C {{}} is A::B; }}"), true);
    assert_value(&format!("{types} fn main() -> bool {{ return A::D {{}} is A::B; }}"), false);
    assert_value(&format!("{types} fn main() -> bool {{ let a: A = A::D {{}}; return a is A::D; }}"),
                 true);
}

#[test]
fn match_without_selected_arm_does_nothing() {
    assert_value("fn main() -> i32 { match (1) { str s => { return 1; }; }; return 2; }", 2);
}

#[test]
fn recursion_within_the_limit() {
    let src = "fn fact(n: i32) -> i32 { if (n < 2) { return 1; } return n * fact(n - 1); } fn main() -> i32 \
               { return fact(10); }";
    assert_value(src, 3_628_800);
}

#[test]
fn builtins_write_to_the_output() {
    assert_output("fn main() { print(\"a\"); println(\"b\"); println(3 as str); }", "ab\n3\n");
}

#[test]
fn void_entry_returns_nothing() {
    let (value, _) = run_program("fn main() { return; }", "main", &Config::default()).unwrap();
    assert_eq!(value, None);
}

#[test]
fn other_entry_functions_can_run() {
    let (value, _) =
        run_program("fn start() -> i32 { return 7; } fn main() {}", "start", &Config::default()).unwrap();
    assert_eq!(value, Some(Value::I32(7)));
}

#[test]
fn comments_are_ignored() {
    assert_value("// leading\nfn main() -> i32 {\n    // inside\n    return 1; // trailing\n}", 1);
}

#[test]
fn undefined_variable() {
    let e = runtime_failure("fn main() { let z = z + 1; }");
    assert!(matches!(e, RuntimeError::UndefinedVariable { ref name, .. } if name == "z"), "{e:?}");
}

#[test]
fn assignment_to_constant() {
    let e = runtime_failure("fn main() { let z: i32 = 3; z = 4; }");
    assert!(matches!(e, RuntimeError::AssignmentToConstant { .. }), "{e:?}");
}

#[test]
fn missing_return_statement() {
    let e = runtime_failure("fn main()->i32 { if (true) { return 1; } }");
    assert!(matches!(e, RuntimeError::MissingReturnStatement { .. }), "{e:?}");
}

#[test]
fn returning_the_wrong_type() {
    let e = runtime_failure("fn main()->f32 { return 3; }");
    assert!(matches!(e, RuntimeError::InvalidType { .. }), "{e:?}");
}

#[test]
fn type_redeclaration() {
    let e = runtime_failure("struct A{} struct A{} fn main() {}");
    assert!(matches!(e, RuntimeError::TypeRedeclaration { .. }), "{e:?}");
}

#[test]
fn division_by_zero_panics() {
    let e = runtime_failure("fn main()->i32{ return 1/0; }");
    assert!(matches!(e, RuntimeError::Panic { ref message, .. } if message == "division by zero"),
            "{e:?}");
    let e = runtime_failure("fn main()->f32{ return 1.0/0.0; }");
    assert!(matches!(e, RuntimeError::Panic { .. }), "{e:?}");
}

#[test]
fn integer_overflow_panics() {
    let e = runtime_failure("fn main() -> i32 { return 2147483647 + 1; }");
    assert!(matches!(e, RuntimeError::Panic { ref message, .. } if message == "integer overflow"),
            "{e:?}");
}

#[test]
fn integer_literals_must_fit_i32() {
    let e = runtime_failure("fn main() -> i32 { return 2147483648; }");
    assert!(matches!(e, RuntimeError::IntegerLiteralOutOfRange { value: 2_147_483_648, .. }),
            "{e:?}");
}

#[test]
fn oversized_strings_panic() {
    let e = runtime_failure("fn main() -> str { return \"a\" * 2000000000; }");
    assert!(matches!(e, RuntimeError::Panic { ref message, .. } if message.starts_with("string longer than")),
            "{e:?}");

    let doubling = "fn main() -> i32 { mut let s = \"abcdefgh\"; while (true) { s = s + s; } return 0; }";
    let e = runtime_failure(doubling);
    assert!(matches!(e, RuntimeError::Panic { ref message, .. } if message.starts_with("string longer than")),
            "{e:?}");
}

#[test]
fn failed_string_casts_panic() {
    let e = runtime_failure("fn main() -> i32 { return \"abc\" as i32; }");
    assert!(matches!(e, RuntimeError::Panic { .. }), "{e:?}");
}

#[test]
fn explicit_panics_carry_their_message() {
    let e = runtime_failure("fn main() { panic(\"boom\"); }");
    assert!(matches!(e, RuntimeError::Panic { ref message, .. } if message == "boom"), "{e:?}");
}

#[test]
fn unbounded_recursion_hits_the_limit() {
    let config = Config { max_recursion_depth: 16,
                          ..Config::default() };
    let src = "fn f(n: i32) -> i32 { return f(n + 1); } fn main() -> i32 { return f(0); }";
    match run_program(src, "main", &config) {
        Err(Error::Runtime(RuntimeError::MaximumRecursion { depth, .. })) => assert_eq!(depth, 16),
        other => panic!("Expected maximum recursion, got {other:?}"),
    }
}

const COUNTDOWN: &str = "fn f(n: i32) -> i32 { if (n < 1) { return 0; } return 1 + f(n - 1); }";

#[test]
fn recursion_reaches_the_default_limit() {
    let config = Config::default();
    let depth = config.max_recursion_depth;

    // `main` takes one frame and `f(n)` takes `n + 1`.
    let n = depth - 2;
    let src = format!("{COUNTDOWN} fn main() -> i32 {{ return f({n}); }}");
    let (value, _) = run_program(&src, "main", &config).unwrap();
    assert_eq!(value, Some(Value::I32(i32::try_from(n).unwrap())));

    let src = format!("{COUNTDOWN} fn main() -> i32 {{ return f({}); }}", depth - 1);
    match run_program(&src, "main", &config) {
        Err(Error::Runtime(RuntimeError::MaximumRecursion { depth: limit, .. })) => assert_eq!(limit, depth),
        other => panic!("Expected maximum recursion, got {other:?}"),
    }
}

#[test]
fn raised_recursion_limit_does_not_overflow_the_stack() {
    let config = Config { max_recursion_depth: 6000,
                          ..Config::default() };

    let src = format!("{COUNTDOWN} fn main() -> i32 {{ return f(5000); }}");
    let (value, _) = run_program(&src, "main", &config).unwrap();
    assert_eq!(value, Some(Value::I32(5000)));

    let src = "fn g(n: i32) -> i32 { return g(n + 1); } fn main() -> i32 { return g(0); }";
    match run_program(src, "main", &config) {
        Err(Error::Runtime(RuntimeError::MaximumRecursion { depth, .. })) => assert_eq!(depth, 6000),
        other => panic!("Expected maximum recursion, got {other:?}"),
    }
}

#[test]
fn deeply_nested_programs_run() {
    let parens = format!("fn main() -> i32 {{ return {}1{}; }}", "(".repeat(500), ")".repeat(500));
    assert_value(&parens, 1);

    let blocks = format!("fn main() -> i32 {{ {}return 2;{} }}", "{ ".repeat(500), " }".repeat(500));
    assert_value(&blocks, 2);

    let chain = format!("fn main() -> i32 {{ return 1{}; }}", " + 1".repeat(999));
    assert_value(&chain, 1000);

    let negations = format!("fn main() -> bool {{ return {}true; }}", "!".repeat(400));
    assert_value(&negations, true);
}

#[test]
fn variable_redeclaration_in_one_block() {
    let e = runtime_failure("fn main() { let x = 1; let x = 2; }");
    assert!(matches!(e, RuntimeError::VariableRedeclaration { .. }), "{e:?}");
}

#[test]
fn immutable_declarations_need_a_value() {
    let e = runtime_failure("fn main() { let x: i32; }");
    assert!(matches!(e, RuntimeError::EmptyVariable { .. }), "{e:?}");
    let e = runtime_failure("fn main() { mut let x; }");
    assert!(matches!(e, RuntimeError::InferenceError { .. }), "{e:?}");
}

#[test]
fn void_results_cannot_be_values() {
    let e = runtime_failure("fn f() {} fn main() { let x = f(); }");
    assert!(matches!(e, RuntimeError::InferenceError { ref name, .. } if name == "f"), "{e:?}");
}

#[test]
fn return_values_must_match_the_signature() {
    let e = runtime_failure("fn main() { return 1; }");
    assert!(matches!(e, RuntimeError::ReturnValueInVoid { .. }), "{e:?}");
    let e = runtime_failure("fn main() -> i32 { return; }");
    assert!(matches!(e, RuntimeError::MissingReturnValue { .. }), "{e:?}");
}

#[test]
fn unknown_types_are_rejected() {
    let e = runtime_failure("fn main() { let x: Foo = 1; }");
    assert!(matches!(e, RuntimeError::UnknownType { .. }), "{e:?}");
    let e = runtime_failure("fn main() { let x: i64 = 1; }");
    assert!(matches!(e, RuntimeError::UnknownType { .. }), "{e:?}");
}

#[test]
fn calls_are_checked() {
    let e = runtime_failure("fn f(a: i32) -> i32 { return a; } fn main() -> i32 { return f(); }");
    assert!(matches!(e, RuntimeError::TooFewArguments { expected: 1, found: 0, .. }), "{e:?}");
    let e = runtime_failure("fn f(a: i32) -> i32 { return a; } fn main() -> i32 { return f(1, 2); }");
    assert!(matches!(e, RuntimeError::TooManyArguments { expected: 1, found: 2, .. }), "{e:?}");
    let e = runtime_failure("fn main() -> i32 { return g(); }");
    assert!(matches!(e, RuntimeError::UndefinedFunction { .. }), "{e:?}");
    let e = runtime_failure("fn main() { print(5); }");
    assert!(matches!(e, RuntimeError::InvalidType { .. }), "{e:?}");
}

#[test]
fn declarations_are_unique() {
    let e = runtime_failure("fn f() {} fn f() {} fn main() {}");
    assert!(matches!(e, RuntimeError::FunctionRedeclaration { .. }), "{e:?}");
    let e = runtime_failure("fn print(s: str) {} fn main() {}");
    assert!(matches!(e, RuntimeError::FunctionRedeclaration { .. }), "{e:?}");
    let e = runtime_failure("fn f(a: i32, a: i32) {} fn main() {}");
    assert!(matches!(e, RuntimeError::ParameterRedeclaration { .. }), "{e:?}");
    let e = runtime_failure("struct A { x: i32; x: i32; } fn main() {}");
    assert!(matches!(e, RuntimeError::FieldRedeclaration { .. }), "{e:?}");
}

#[test]
fn missing_operations_are_reported() {
    let e = runtime_failure("fn main() -> str { return \"a\" - \"b\"; }");
    assert!(matches!(e, RuntimeError::MissingOperation { .. }), "{e:?}");
    let e = runtime_failure("struct P {} fn main() { if (P {}) {} }");
    assert!(matches!(e, RuntimeError::MissingOperation { .. }), "{e:?}");
}

#[test]
fn struct_literals_are_checked() {
    let e = runtime_failure("enum E { struct S {}; } fn main() { let x = E {}; }");
    assert!(matches!(e, RuntimeError::UndefinedStruct { .. }), "{e:?}");
    let e = runtime_failure("struct P { x: i32; } fn main() { let p = P { y = 1; }; }");
    assert!(matches!(e, RuntimeError::AssignmentToUndefinedField { .. }), "{e:?}");
    let e = runtime_failure("struct P { x: i32; } fn main() { let p = P { x = 1; x = 2; }; }");
    assert!(matches!(e, RuntimeError::InvalidFieldAssignment { .. }), "{e:?}");
    let e = runtime_failure("struct P { x: i32; } fn main() { let p = P { x = \"one\"; }; }");
    assert!(matches!(e, RuntimeError::InvalidType { .. }), "{e:?}");
}

#[test]
fn fields_must_exist() {
    let e = runtime_failure("struct P { x: i32; } fn main() -> i32 { let p = P {}; return p.y; }");
    assert!(matches!(e, RuntimeError::UndefinedField { .. }), "{e:?}");
}

#[test]
fn uninstantiable_defaults_are_rejected() {
    let e = runtime_failure("enum Shape { struct Circle {}; } fn main() { mut let s: Shape; }");
    assert!(matches!(e, RuntimeError::EnumDefaultValue { .. }), "{e:?}");
    let e = runtime_failure("struct Node { next: Node; } fn main() { mut let n: Node; }");
    assert!(matches!(e, RuntimeError::RecursiveDefaultValue { .. }), "{e:?}");
}

#[test]
fn entry_function_must_exist_and_take_no_parameters() {
    match run_program("fn main(x: i32) {}", "main", &Config::default()) {
        Err(Error::Runtime(RuntimeError::TooManyArguments { .. })) => {},
        other => panic!("Expected too many arguments, got {other:?}"),
    }
    match run_program("fn main() {}", "start", &Config::default()) {
        Err(Error::Runtime(RuntimeError::UndefinedFunction { .. })) => {},
        other => panic!("Expected undefined function, got {other:?}"),
    }
}

#[test]
fn lexical_errors_surface_as_lex_errors() {
    match assert_failure("fn main() { let s = \"open; }") {
        Error::Lex(e) => assert_eq!(e.kind, LexErrorKind::UnterminatedString),
        other => panic!("Expected a lexical error, got {other:?}"),
    }
    match assert_failure("fn main() -> i32 { return 007; }") {
        Error::Lex(e) => assert_eq!(e.kind, LexErrorKind::IntegerLeadingZeros),
        other => panic!("Expected a lexical error, got {other:?}"),
    }
    match assert_failure("fn main() -> f32 { return 00.5; }") {
        Error::Lex(e) => assert_eq!(e.kind, LexErrorKind::IntegerLeadingZeros),
        other => panic!("Expected a lexical error, got {other:?}"),
    }
    assert_value("fn main() -> f32 { return 0.5; }", 0.5_f32);
}

#[test]
fn exit_codes_follow_the_error_family() {
    assert_eq!(assert_failure("fn main( {}").exit_code(), 1);
    assert_eq!(assert_failure("fn main() { let s = \"open; }").exit_code(), 1);
    assert_eq!(assert_failure("fn main() -> i32 { return 1/0; }").exit_code(), 2);
}
