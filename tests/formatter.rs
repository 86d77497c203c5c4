use std::fs;

use fhll::{format_module, parse_str};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

fn format(src: &str) -> String {
    let module = parse_str(src, &Default::default()).unwrap_or_else(|e| panic!("Parse failed: {e}\n{src}"));
    format_module(&module)
}

fn assert_expression(src: &str, expected: &str) {
    assert_eq!(format(&format!("fn f() {{ return {src}; }}")),
               format!("fn f() {{\n    return {expected};\n}}\n"));
}

#[test]
fn declarations_are_laid_out_canonically() {
    let src = "fn main() -> i32 { mut let x: i32 = 1; while (x < 10) { x = x * 2; } if (x > 5) { return x; } \
               else { return 0; } }
               struct P { x: i32; label: str; }
               enum Shape { struct Circle { r: f32; }; enum Poly { struct Square {}; }; }";

    let expected = "\
struct P {
    x: i32;
    label: str;
}

enum Shape {
    struct Circle {
        r: f32;
    };
    enum Poly {
        struct Square {};
    };
}

fn main() -> i32 {
    mut let x: i32 = 1;
    while (x < 10) {
        x = x * 2;
    };
    if (x > 5) {
        return x;
    } else {
        return 0;
    };
}
";
    assert_eq!(format(src), expected);
}

#[test]
fn match_arms_and_nested_blocks() {
    let src = "fn f(s: Shape, mut n: i32) { match (s) { Shape::Circle c => { n = c.r; }; _ o => {}; } { \
               println(\"done\") } }";
    let expected = "\
fn f(s: Shape, mut n: i32) {
    match (s) {
        Shape::Circle c => {
            n = c.r;
        };
        _ o => {};
    };
    {
        println(\"done\");
    };
}
";
    assert_eq!(format(src), expected);
}

#[test]
fn only_required_parentheses_are_kept() {
    assert_expression("(1 + 2) * 3", "(1 + 2) * 3");
    assert_expression("1 + (2 * 3)", "1 + 2 * 3");
    assert_expression("1 - (2 - 3)", "1 - (2 - 3)");
    assert_expression("(1 - 2) - 3", "1 - 2 - 3");
    assert_expression("(a < b) == c", "(a < b) == c");
    assert_expression("-(a + b)", "-(a + b)");
    assert_expression("(-a) as f32", "(-a) as f32");
    assert_expression("-(a as f32)", "-a as f32");
    assert_expression("!(a && b) || c", "!(a && b) || c");
    assert_expression("a || (b && c)", "a || b && c");
    assert_expression("(a || b) && c", "(a || b) && c");
    assert_expression("((x))", "x");
}

#[test]
fn terms_are_printed_in_source_form() {
    assert_expression("f((1), \"s\\n\\\"q\\\"\")", "f(1, \"s\\n\\\"q\\\"\")");
    assert_expression("1. + 2.5", "1.0 + 2.5");
    assert_expression("P { x = 1 + 2; y = \"a\"; }", "P { x = 1 + 2; y = \"a\"; }");
    assert_expression("Shape::Circle {}", "Shape::Circle {}");
    assert_expression("item.inner.amount is i32", "item.inner.amount is i32");
    assert_expression("true && !false", "true && !false");
}

#[test]
fn statements_without_values() {
    assert_eq!(format("fn f() { mut let x: i32; return }"),
               "fn f() {\n    mut let x: i32;\n    return;\n}\n");
    assert_eq!(format("fn f() {}"), "fn f() {}\n");
    assert_eq!(format(""), "");
}

#[test]
fn formatting_is_a_fixed_point() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/programs").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "fhll"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let Ok(module) = parse_str(&content, &Default::default()) else {
            continue;
        };

        count += 1;
        let once = format_module(&module);
        let twice = format(&once);
        assert_eq!(once, twice, "in {path:?}");
    }

    assert!(count > 0, "No parseable sample programs found in tests/programs");
}
