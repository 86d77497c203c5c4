//! Canonical source rendering of a parsed module.
//!
//! Output uses four-space indentation, terminates every statement with `;`
//! and inserts only the parentheses the precedence table requires, so
//! formatting the re-parsed output reproduces it exactly.

use crate::{
    ast::{
        BinaryOperator, BoolOperator, Block, EnumDeclaration, EnumVariant, Expression, FnCall,
        FunctionDeclaration, Module, NewStruct, Statement, StructDeclaration,
    },
    util::stack::guarded,
};

const INDENT: &str = "    ";

const OR: u8 = 1;
const AND: u8 = 2;
const COMPARE: u8 = 3;
const ADDITIVE: u8 = 4;
const MULTIPLICATIVE: u8 = 5;
const UNARY: u8 = 6;
const CASTED: u8 = 7;
const TERM: u8 = 8;

struct Formatter {
    buffer:       String,
    indent_level: usize,
}

impl Formatter {
    const fn new() -> Self {
        Self { buffer:       String::new(),
               indent_level: 0, }
    }

    const fn indent(&mut self) {
        self.indent_level += 1;
    }

    const fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn write_line(&mut self, s: &str) {
        self.write_indent();
        self.write_str(s);
        self.buffer.push('\n');
    }

    fn finish(self) -> String {
        self.buffer
    }
}

/// Renders a module as canonical source.
///
/// Structs come first, then enums, then functions, each in declaration order
/// and separated by a blank line.
///
/// # Example
/// ```
/// use fhll::{format_module, parse_str};
///
/// let module = parse_str("fn main()->i32{return (1+2)*3;}", &Default::default()).unwrap();
/// assert_eq!(format_module(&module),
///            "fn main() -> i32 {\n    return (1 + 2) * 3;\n}\n");
/// ```
#[must_use]
pub fn format_module(module: &Module) -> String {
    let mut fmt = Formatter::new();
    let mut first = true;
    let mut separate = |fmt: &mut Formatter| {
        if !first {
            fmt.buffer.push('\n');
        }
        first = false;
    };

    for declaration in &module.structs {
        separate(&mut fmt);
        format_struct(declaration, &mut fmt);
        fmt.buffer.push('\n');
    }
    for declaration in &module.enums {
        separate(&mut fmt);
        format_enum(declaration, &mut fmt);
        fmt.buffer.push('\n');
    }
    for function in &module.functions {
        separate(&mut fmt);
        format_function(function, &mut fmt);
        fmt.buffer.push('\n');
    }
    fmt.finish()
}

fn format_struct(declaration: &StructDeclaration, fmt: &mut Formatter) {
    fmt.write_str(&format!("struct {} {{", declaration.name.value));
    if declaration.fields.is_empty() {
        fmt.write_str("}");
        return;
    }
    fmt.buffer.push('\n');
    fmt.indent();
    for field in &declaration.fields {
        fmt.write_line(&format!("{}: {};", field.name.value, field.ty));
    }
    fmt.dedent();
    fmt.write_indent();
    fmt.write_str("}");
}

fn format_enum(declaration: &EnumDeclaration, fmt: &mut Formatter) {
    fmt.write_str(&format!("enum {} {{", declaration.name.value));
    if declaration.variants.is_empty() {
        fmt.write_str("}");
        return;
    }
    fmt.buffer.push('\n');
    fmt.indent();
    for variant in &declaration.variants {
        fmt.write_indent();
        match variant {
            EnumVariant::Struct(declaration) => format_struct(declaration, fmt),
            EnumVariant::Enum(declaration) => format_enum(declaration, fmt),
        }
        fmt.write_str(";\n");
    }
    fmt.dedent();
    fmt.write_indent();
    fmt.write_str("}");
}

fn format_function(function: &FunctionDeclaration, fmt: &mut Formatter) {
    let parameters = function.parameters
                             .iter()
                             .map(|parameter| {
                                 let prefix = if parameter.mutable { "mut " } else { "" };
                                 format!("{prefix}{}: {}", parameter.name.value, parameter.ty)
                             })
                             .collect::<Vec<_>>();
    fmt.write_str(&format!("fn {}({})", function.name.value, parameters.join(", ")));
    if let Some(ty) = &function.return_type {
        fmt.write_str(&format!(" -> {ty}"));
    }
    fmt.write_str(" ");
    format_block(&function.block, fmt);
}

/// Writes `{ ... }` starting at the current position; the closing brace is
/// indented to the current level.
fn format_block(block: &Block, fmt: &mut Formatter) {
    if block.statements.is_empty() {
        fmt.write_str("{}");
        return;
    }
    fmt.write_str("{\n");
    fmt.indent();
    for statement in &block.statements {
        fmt.write_indent();
        format_statement(statement, fmt);
        fmt.write_str(";\n");
    }
    fmt.dedent();
    fmt.write_indent();
    fmt.write_str("}");
}

fn format_statement(statement: &Statement, fmt: &mut Formatter) {
    guarded(|| format_statement_inner(statement, fmt));
}

fn format_statement_inner(statement: &Statement, fmt: &mut Formatter) {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            if declaration.mutable {
                fmt.write_str("mut ");
            }
            fmt.write_str(&format!("let {}", declaration.name.value));
            if let Some(ty) = &declaration.ty {
                fmt.write_str(&format!(": {ty}"));
            }
            if let Some(value) = &declaration.value {
                fmt.write_str(" = ");
                format_expression(value, fmt, OR);
            }
        },
        Statement::Assignment(assignment) => {
            fmt.write_str(&format!("{} = ", assignment.target));
            format_expression(&assignment.value, fmt, OR);
        },
        Statement::FnCall(call) => format_call(call, fmt),
        Statement::Return(ret) => {
            fmt.write_str("return");
            if let Some(value) = &ret.value {
                fmt.write_str(" ");
                format_expression(value, fmt, OR);
            }
        },
        Statement::If(statement) => {
            fmt.write_str("if (");
            format_expression(&statement.condition, fmt, OR);
            fmt.write_str(") ");
            format_block(&statement.then_block, fmt);
            if let Some(block) = &statement.else_block {
                fmt.write_str(" else ");
                format_block(block, fmt);
            }
        },
        Statement::While(statement) => {
            fmt.write_str("while (");
            format_expression(&statement.condition, fmt, OR);
            fmt.write_str(") ");
            format_block(&statement.block, fmt);
        },
        Statement::Match(statement) => {
            fmt.write_str("match (");
            format_expression(&statement.value, fmt, OR);
            fmt.write_str(") {");
            if statement.matchers.is_empty() {
                fmt.write_str("}");
                return;
            }
            fmt.buffer.push('\n');
            fmt.indent();
            for matcher in &statement.matchers {
                fmt.write_indent();
                fmt.write_str(&format!("{} {} => ", matcher.ty, matcher.name.value));
                format_block(&matcher.block, fmt);
                fmt.write_str(";\n");
            }
            fmt.dedent();
            fmt.write_indent();
            fmt.write_str("}");
        },
        Statement::Block(block) => format_block(block, fmt),
    }
}

const fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::BoolOperation(e) => match e.op {
            BoolOperator::Or => OR,
            BoolOperator::And => AND,
        },
        Expression::Compare(_) => COMPARE,
        Expression::BinaryOperation(e) => match e.op {
            BinaryOperator::Add | BinaryOperator::Sub => ADDITIVE,
            BinaryOperator::Mul | BinaryOperator::Div => MULTIPLICATIVE,
        },
        Expression::UnaryOperation(_) => UNARY,
        Expression::Cast(_) | Expression::IsCompare(_) => CASTED,
        Expression::Constant(_)
        | Expression::Access(_)
        | Expression::FnCall(_)
        | Expression::NewStruct(_) => TERM,
    }
}

/// Writes an expression, parenthesised if it binds looser than `parent`.
fn format_expression(expression: &Expression, fmt: &mut Formatter, parent: u8) {
    guarded(|| format_expression_inner(expression, fmt, parent));
}

fn format_expression_inner(expression: &Expression, fmt: &mut Formatter, parent: u8) {
    let own = precedence(expression);
    let needs_parens = own < parent;
    if needs_parens {
        fmt.write_str("(");
    }

    match expression {
        Expression::BoolOperation(e) => {
            format_expression(&e.left, fmt, own);
            fmt.write_str(&format!(" {} ", e.op));
            format_expression(&e.right, fmt, own + 1);
        },
        Expression::Compare(e) => {
            format_expression(&e.left, fmt, ADDITIVE);
            fmt.write_str(&format!(" {} ", e.op));
            format_expression(&e.right, fmt, ADDITIVE);
        },
        Expression::BinaryOperation(e) => {
            format_expression(&e.left, fmt, own);
            fmt.write_str(&format!(" {} ", e.op));
            format_expression(&e.right, fmt, own + 1);
        },
        Expression::UnaryOperation(e) => {
            fmt.write_str(&e.op.to_string());
            format_expression(&e.operand, fmt, UNARY);
        },
        Expression::Cast(e) => {
            format_expression(&e.value, fmt, CASTED);
            fmt.write_str(&format!(" as {}", e.ty));
        },
        Expression::IsCompare(e) => {
            format_expression(&e.value, fmt, CASTED);
            fmt.write_str(&format!(" is {}", e.ty));
        },
        Expression::Constant(constant) => fmt.write_str(&constant.value.to_string()),
        Expression::Access(access) => fmt.write_str(&access.to_string()),
        Expression::FnCall(call) => format_call(call, fmt),
        Expression::NewStruct(literal) => format_new_struct(literal, fmt),
    }

    if needs_parens {
        fmt.write_str(")");
    }
}

fn format_call(call: &FnCall, fmt: &mut Formatter) {
    fmt.write_str(&format!("{}(", call.name.value));
    for (index, argument) in call.arguments.iter().enumerate() {
        if index > 0 {
            fmt.write_str(", ");
        }
        format_expression(argument, fmt, OR);
    }
    fmt.write_str(")");
}

fn format_new_struct(literal: &NewStruct, fmt: &mut Formatter) {
    fmt.write_str(&format!("{} {{", literal.ty));
    for assignment in &literal.assignments {
        fmt.write_str(&format!(" {} = ", assignment.target));
        format_expression(&assignment.value, fmt, OR);
        fmt.write_str(";");
    }
    if literal.assignments.is_empty() {
        fmt.write_str("}");
    } else {
        fmt.write_str(" }");
    }
}
