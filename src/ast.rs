//! The abstract syntax tree.
//!
//! Every node owns the [`Location`] of the tokens it was built from, from its
//! first constituent token through its last one. Nodes are plain values: the
//! later phases read them but never rewrite them.

use std::fmt;

use ordered_float::OrderedFloat;

use crate::interpreter::types::type_name::TypeName;

/// Source positions and spans.
pub mod location;

pub use location::{Located, Location, Position};

/// A raw constant as written in the source.
///
/// Integer literals keep the full unsigned range the lexer accepts; narrowing
/// to `i32` happens during validation. Floating literals are stored in an
/// [`OrderedFloat`] so the whole tree can derive `Eq` and `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// A non-negative integer literal such as `42`.
    Integer(u64),
    /// A floating literal such as `3.25` or `1.`.
    Floating(OrderedFloat<f64>),
    /// `true` or `false`.
    Boolean(bool),
    /// A string literal with escapes already resolved.
    Str(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Floating(x) => {
                let text = x.0.to_string();
                if text.contains('.') || !x.0.is_finite() {
                    write!(f, "{text}")
                } else {
                    write!(f, "{text}.0")
                }
            },
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\\' => write!(f, "\\\\")?,
                        '"' => write!(f, "\\\"")?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            },
        }
    }
}

/// The logical operators `&&` and `||`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOperator {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// The comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
}

/// The arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// The prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `-`
    Negate,
    /// `!`
    Not,
}

impl fmt::Display for BoolOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}

/// A whole source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    /// Top-level functions in declaration order.
    pub functions: Vec<FunctionDeclaration>,
    /// Top-level structs in declaration order.
    pub structs:   Vec<StructDeclaration>,
    /// Top-level enums in declaration order.
    pub enums:     Vec<EnumDeclaration>,
    /// Span of the whole file.
    pub location:  Location,
}

/// A single identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    /// The identifier text.
    pub value:    String,
    /// Where it was written.
    pub location: Location,
}

/// A `::`-separated type reference such as `Shape::Circle` or `i32`.
///
/// Builtin type keywords are stored as a single-segment reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantAccess {
    /// Path segments, outermost first.
    pub names:    Vec<Name>,
    /// Span of the whole path.
    pub location: Location,
}

impl VariantAccess {
    /// The fully-qualified type name this reference spells.
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        TypeName::from_segments(self.names.iter().map(|name| name.value.clone()))
    }

    /// Whether this is the catch-all matcher type `_`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.names.as_slice(), [name] if name.value == "_")
    }
}

/// A `.`-separated variable and field path such as `item.amount`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Access {
    /// The variable followed by the field names.
    pub names:    Vec<Name>,
    /// Span of the whole path.
    pub location: Location,
}

impl Access {
    /// The variable at the root of the path.
    #[must_use]
    pub fn root(&self) -> &Name {
        &self.names[0]
    }

    /// The field names after the root.
    #[must_use]
    pub fn fields(&self) -> &[Name] {
        &self.names[1..]
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.names.iter().map(|n| n.value.as_str()).collect::<Vec<_>>();
        write!(f, "{}", path.join("."))
    }
}

impl fmt::Display for VariantAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.names.iter().map(|n| n.value.as_str()).collect::<Vec<_>>();
        write!(f, "{}", path.join("::"))
    }
}

/// `struct Name { field: Type; ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDeclaration {
    /// The struct's own (unqualified) name.
    pub name:     Name,
    /// Fields in declaration order.
    pub fields:   Vec<FieldDeclaration>,
    /// Span from `struct` to the closing brace.
    pub location: Location,
}

/// `name: Type;` inside a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    /// Field name.
    pub name:     Name,
    /// Declared type.
    pub ty:       VariantAccess,
    /// Span from the name to the `;`.
    pub location: Location,
}

/// `enum Name { struct A {...}; enum B {...}; }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    /// The enum's own (unqualified) name.
    pub name:     Name,
    /// Variants in declaration order.
    pub variants: Vec<EnumVariant>,
    /// Span from `enum` to the closing brace.
    pub location: Location,
}

/// A variant of an enum: itself a struct or a nested enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumVariant {
    /// A struct variant.
    Struct(StructDeclaration),
    /// A nested enum, which extends the namespace.
    Enum(EnumDeclaration),
}

/// `fn name(params) -> Type { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeclaration {
    /// Function name.
    pub name:        Name,
    /// Parameters in order.
    pub parameters:  Vec<Parameter>,
    /// Declared return type; `None` for void functions.
    pub return_type: Option<VariantAccess>,
    /// The body.
    pub block:       Block,
    /// Span from `fn` to the closing brace of the body.
    pub location:    Location,
}

/// `[mut] name: Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name:     Name,
    /// Declared type.
    pub ty:       VariantAccess,
    /// Whether the body may assign to it.
    pub mutable:  bool,
    /// Span of the parameter.
    pub location: Location,
}

/// `{ statement* }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Statements in order.
    pub statements: Vec<Statement>,
    /// Span from `{` to `}`.
    pub location:   Location,
}

/// Everything that may appear inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `[mut] let name [: Type] [= value]`
    VariableDeclaration(VariableDeclaration),
    /// `path = value`
    Assignment(Assignment),
    /// A call evaluated for its effects.
    FnCall(FnCall),
    /// `return [value]`
    Return(ReturnStatement),
    /// `if (...) { ... } [else { ... }]`
    If(IfStatement),
    /// `while (...) { ... }`
    While(WhileStatement),
    /// `match (...) { Type name => { ... }; ... }`
    Match(MatchStatement),
    /// A nested block with its own scope.
    Block(Block),
}

/// `[mut] let name [: Type] [= value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    /// Variable name.
    pub name:     Name,
    /// Declared type, if written.
    pub ty:       Option<VariantAccess>,
    /// Initial value, if written.
    pub value:    Option<Expression>,
    /// Whether later assignments are allowed.
    pub mutable:  bool,
    /// Span of the declaration.
    pub location: Location,
}

/// `path = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The variable or field being written.
    pub target:   Access,
    /// The new value.
    pub value:    Expression,
    /// Span from the target to the end of the value.
    pub location: Location,
}

/// `return [value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStatement {
    /// Returned value; `None` in void functions.
    pub value:    Option<Expression>,
    /// Span of the statement.
    pub location: Location,
}

/// `if (condition) { ... } [else { ... }]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStatement {
    /// The condition.
    pub condition:  Expression,
    /// Taken when the condition is truthy.
    pub then_block: Block,
    /// Taken otherwise, if present.
    pub else_block: Option<Block>,
    /// Span of the statement.
    pub location:   Location,
}

/// `while (condition) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStatement {
    /// Re-evaluated before every iteration.
    pub condition: Expression,
    /// The loop body.
    pub block:     Block,
    /// Span of the statement.
    pub location:  Location,
}

/// `match (value) { arms }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStatement {
    /// The scrutinee, evaluated once.
    pub value:    Expression,
    /// Arms in order; the first selected arm runs.
    pub matchers: Vec<Matcher>,
    /// Span of the statement.
    pub location: Location,
}

/// `Type name => { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    /// The type selected on, or `_`.
    pub ty:       VariantAccess,
    /// The name bound to the scrutinee inside the arm.
    pub name:     Name,
    /// The arm body.
    pub block:    Block,
    /// Span of the arm.
    pub location: Location,
}

/// Every expression form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `a && b`, `a || b`
    BoolOperation(BoolOperation),
    /// `a == b`, `a != b`, `a < b`, `a > b`
    Compare(Compare),
    /// `a + b`, `a - b`, `a * b`, `a / b`
    BinaryOperation(BinaryOperation),
    /// `-a`, `!a`
    UnaryOperation(UnaryOperation),
    /// `a as Type`
    Cast(Cast),
    /// `a is Type`
    IsCompare(IsCompare),
    /// A literal.
    Constant(Constant),
    /// A variable or field read.
    Access(Access),
    /// A function call.
    FnCall(FnCall),
    /// `Type { field = value; ... }`
    NewStruct(NewStruct),
}

/// `left op right` for logical operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolOperation {
    /// The operator.
    pub op:       BoolOperator,
    /// Left operand.
    pub left:     Box<Expression>,
    /// Right operand; skipped when the left one decides the result.
    pub right:    Box<Expression>,
    /// Span of the expression.
    pub location: Location,
}

/// `left op right` for comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compare {
    /// The operator.
    pub op:       CompareOperator,
    /// Left operand.
    pub left:     Box<Expression>,
    /// Right operand.
    pub right:    Box<Expression>,
    /// Span of the expression.
    pub location: Location,
}

/// `left op right` for arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOperation {
    /// The operator.
    pub op:       BinaryOperator,
    /// Left operand.
    pub left:     Box<Expression>,
    /// Right operand.
    pub right:    Box<Expression>,
    /// Span of the expression.
    pub location: Location,
}

/// `op operand`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryOperation {
    /// The operator.
    pub op:       UnaryOperator,
    /// The operand.
    pub operand:  Box<Expression>,
    /// Span of the expression.
    pub location: Location,
}

/// `value as Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    /// The converted expression.
    pub value:    Box<Expression>,
    /// Target type.
    pub ty:       VariantAccess,
    /// Span of the expression.
    pub location: Location,
}

/// `value is Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsCompare {
    /// The tested expression.
    pub value:    Box<Expression>,
    /// The type tested against.
    pub ty:       VariantAccess,
    /// Span of the expression.
    pub location: Location,
}

/// A literal expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    /// The literal.
    pub value:    LiteralValue,
    /// Span of the literal token.
    pub location: Location,
}

/// `name(arguments)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnCall {
    /// The callee.
    pub name:      Name,
    /// Arguments in order.
    pub arguments: Vec<Expression>,
    /// Span from the name to `)`.
    pub location:  Location,
}

/// `Type { field = value; ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStruct {
    /// The struct being instantiated.
    pub ty:          VariantAccess,
    /// Field initialisers; omitted fields are defaulted.
    pub assignments: Vec<Assignment>,
    /// Span from the type to `}`.
    pub location:    Location,
}

impl Expression {
    /// Replaces the span of this expression.
    ///
    /// Used by the parser to extend an expression over its surrounding
    /// parentheses.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        match &mut self {
            Self::BoolOperation(e) => e.location = location,
            Self::Compare(e) => e.location = location,
            Self::BinaryOperation(e) => e.location = location,
            Self::UnaryOperation(e) => e.location = location,
            Self::Cast(e) => e.location = location,
            Self::IsCompare(e) => e.location = location,
            Self::Constant(e) => e.location = location,
            Self::Access(e) => e.location = location,
            Self::FnCall(e) => e.location = location,
            Self::NewStruct(e) => e.location = location,
        }
        self
    }
}

macro_rules! located {
    ($($node:ty),* $(,)?) => {
        $(
            impl Located for $node {
                fn location(&self) -> Location {
                    self.location
                }
            }
        )*
    };
}

located!(Module,
         Name,
         VariantAccess,
         Access,
         StructDeclaration,
         FieldDeclaration,
         EnumDeclaration,
         FunctionDeclaration,
         Parameter,
         Block,
         VariableDeclaration,
         Assignment,
         ReturnStatement,
         IfStatement,
         WhileStatement,
         MatchStatement,
         Matcher,
         BoolOperation,
         Compare,
         BinaryOperation,
         UnaryOperation,
         Cast,
         IsCompare,
         Constant,
         FnCall,
         NewStruct);

impl Located for EnumVariant {
    fn location(&self) -> Location {
        match self {
            Self::Struct(s) => s.location,
            Self::Enum(e) => e.location,
        }
    }
}

impl Located for Statement {
    fn location(&self) -> Location {
        match self {
            Self::VariableDeclaration(s) => s.location,
            Self::Assignment(s) => s.location,
            Self::FnCall(s) => s.location,
            Self::Return(s) => s.location,
            Self::If(s) => s.location,
            Self::While(s) => s.location,
            Self::Match(s) => s.location,
            Self::Block(s) => s.location,
        }
    }
}

impl Located for Expression {
    fn location(&self) -> Location {
        match self {
            Self::BoolOperation(e) => e.location,
            Self::Compare(e) => e.location,
            Self::BinaryOperation(e) => e.location,
            Self::UnaryOperation(e) => e.location,
            Self::Cast(e) => e.location,
            Self::IsCompare(e) => e.location,
            Self::Constant(e) => e.location,
            Self::Access(e) => e.location,
            Self::FnCall(e) => e.location,
            Self::NewStruct(e) => e.location,
        }
    }
}
