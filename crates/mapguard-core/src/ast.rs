// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Abstract syntax tree for the analyzed C#-style source subset.
//!
//! The AST covers the slice of the language that hand-written mapping code
//! uses: class declarations with auto-properties, methods with attributes,
//! and the statement/expression forms found in mapper bodies (assignments,
//! object creation with initializers, casts, helper calls).
//!
//! Every node carries a [`Span`] so diagnostics can point at the exact
//! source range. The parser recovers from errors by producing
//! [`Statement::Error`] / [`Expression::Error`] nodes rather than stopping.

use ecow::EcoString;

use crate::source_analysis::Span;

/// Top-level container for one parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    /// The class declarations in the file.
    pub classes: Vec<ClassDecl>,
    /// Source location spanning the entire file.
    pub span: Span,
}

impl CompilationUnit {
    /// Creates a new compilation unit.
    #[must_use]
    pub fn new(classes: Vec<ClassDecl>, span: Span) -> Self {
        Self { classes, span }
    }
}

/// Member accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    Private,
}

/// Declaration modifiers shared by classes, properties, and methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Declared accessibility, if any modifier was written.
    pub accessibility: Option<Accessibility>,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
}

impl Modifiers {
    /// Returns `true` if the declared accessibility is public.
    ///
    /// Members without an explicit modifier default to private, matching
    /// the analyzed language's rules.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.accessibility == Some(Accessibility::Public)
    }
}

/// An attribute application: `[MappingMethod]`, `[UnmappedProperties(...)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The attribute name as written (without the `Attribute` suffix
    /// resolution applied).
    pub name: Identifier,
    /// Constructor arguments, possibly empty.
    pub arguments: Vec<Expression>,
    /// Source location of the whole attribute, brackets included.
    pub span: Span,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Attributes applied to the class.
    pub attributes: Vec<Attribute>,
    /// Declaration modifiers.
    pub modifiers: Modifiers,
    /// The class name.
    pub name: Identifier,
    /// The base class name, if a base list was written.
    pub base: Option<Identifier>,
    /// Property and method members, in declaration order.
    pub members: Vec<Member>,
    /// Source location of the whole declaration.
    pub span: Span,
}

impl ClassDecl {
    /// Iterates over the property members.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Property(property) => Some(property),
            Member::Method(_) => None,
        })
    }

    /// Iterates over the method members.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            Member::Property(_) => None,
        })
    }
}

/// A class member.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(PropertyDecl),
    Method(MethodDecl),
}

/// An auto-property declaration: `public virtual string Name { get; set; }`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    /// Attributes applied to the property.
    pub attributes: Vec<Attribute>,
    /// Declaration modifiers (`public`, `virtual`, `override`, ...).
    pub modifiers: Modifiers,
    /// The property type.
    pub ty: TypeRef,
    /// The property name.
    pub name: Identifier,
    /// The `get` accessor, if declared.
    pub getter: Option<Accessor>,
    /// The `set` accessor, if declared.
    pub setter: Option<Accessor>,
    /// Source location of the whole declaration.
    pub span: Span,
}

impl PropertyDecl {
    /// Returns `true` if this property can be assigned from outside its
    /// declaring class: the property is public and has a setter that does
    /// not restrict accessibility below public.
    #[must_use]
    pub fn is_publicly_settable(&self) -> bool {
        if !self.modifiers.is_public() {
            return false;
        }
        match &self.setter {
            Some(setter) => setter.accessibility.is_none_or(|a| a == Accessibility::Public),
            None => false,
        }
    }
}

/// A property accessor (`get;` or `private set;`).
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    /// Accessor-level accessibility override, e.g. `private set;`.
    pub accessibility: Option<Accessibility>,
    /// Source location.
    pub span: Span,
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Attributes applied to the method.
    pub attributes: Vec<Attribute>,
    /// Declaration modifiers.
    pub modifiers: Modifiers,
    /// The return type; `None` for `void`.
    pub return_type: Option<TypeRef>,
    /// The method name.
    pub name: Identifier,
    /// The parameter list.
    pub parameters: Vec<Parameter>,
    /// The method body.
    pub body: Block,
    /// Source location of the whole declaration.
    pub span: Span,
}

/// A method parameter, optionally attributed: `[MappingTarget] Person p`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Attributes applied to the parameter.
    pub attributes: Vec<Attribute>,
    /// The parameter type.
    pub ty: TypeRef,
    /// The parameter name.
    pub name: Identifier,
    /// Source location.
    pub span: Span,
}

/// A reference to a named type, with optional array suffix (`string[]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// The type name.
    pub name: EcoString,
    /// Whether a `[]` suffix was written.
    pub is_array: bool,
    /// Source location.
    pub span: Span,
}

impl TypeRef {
    /// Creates a non-array type reference.
    #[must_use]
    pub fn named(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            span,
        }
    }
}

/// A braced statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The statements, in source order.
    pub statements: Vec<Statement>,
    /// Source location including the braces.
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A local variable declaration: `var p = new Person();` or
    /// `Person p = ...;`. A `None` type means `var`.
    Local {
        ty: Option<TypeRef>,
        name: Identifier,
        initializer: Option<Expression>,
        span: Span,
    },

    /// An expression evaluated for its effect, e.g. an assignment.
    Expression(Expression),

    /// A `return` statement, with optional value.
    Return { value: Option<Expression>, span: Span },

    /// An `if` statement with optional `else`.
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        span: Span,
    },

    /// A nested block.
    Block(Block),

    /// An unparseable statement; lets analysis proceed past syntax errors.
    Error { span: Span },
}

impl Statement {
    /// The span of this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Local { span, .. }
            | Self::Return { span, .. }
            | Self::If { span, .. }
            | Self::Error { span } => *span,
            Self::Expression(expression) => expression.span(),
            Self::Block(block) => block.span,
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value.
    Literal(Literal, Span),

    /// A bare name: local, parameter, or class reference.
    Identifier(Identifier),

    /// Member access: `person.FirstName`, `Names.Defaults`.
    MemberAccess {
        receiver: Box<Expression>,
        member: Identifier,
        span: Span,
    },

    /// Assignment: `lhs = rhs`.
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
        span: Span,
    },

    /// Invocation: `callee(args)`.
    Invocation {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },

    /// Object creation: `new Person(...)` with an optional initializer
    /// `new Person { FirstName = x }`.
    ObjectCreation {
        ty: TypeRef,
        arguments: Vec<Expression>,
        initializer: Option<ObjectInitializer>,
        span: Span,
    },

    /// Array creation: `new[] { ... }` or `new string[] { ... }`.
    ArrayCreation {
        element_ty: Option<TypeRef>,
        elements: Vec<Expression>,
        span: Span,
    },

    /// A cast: `(Base) person`.
    Cast {
        ty: TypeRef,
        operand: Box<Expression>,
        span: Span,
    },

    /// A binary operation. Only `+` exists in the subset; it appears in
    /// computed exclusion-name expressions.
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        span: Span,
    },

    /// A parenthesized expression.
    Parenthesized { inner: Box<Expression>, span: Span },

    /// An unparseable expression.
    Error { message: EcoString, span: Span },
}

impl Expression {
    /// The span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(_, span)
            | Self::MemberAccess { span, .. }
            | Self::Assignment { span, .. }
            | Self::Invocation { span, .. }
            | Self::ObjectCreation { span, .. }
            | Self::ArrayCreation { span, .. }
            | Self::Cast { span, .. }
            | Self::Binary { span, .. }
            | Self::Parenthesized { span, .. }
            | Self::Error { span, .. } => *span,
            Self::Identifier(identifier) => identifier.span,
        }
    }

    /// Returns `true` if this expression is an error-recovery node.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Strips any number of surrounding parentheses.
    #[must_use]
    pub fn unparenthesized(&self) -> &Self {
        let mut expression = self;
        while let Self::Parenthesized { inner, .. } = expression {
            expression = inner;
        }
        expression
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`, string concatenation in exclusion expressions.
    Add,
}

/// An object-initializer clause: `{ FirstName = x, LastName = y }`.
///
/// Initializer entries are a syntactically distinct assignment form; the
/// assignment collector traverses them separately from `=` expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInitializer {
    /// The property-name/value pairs.
    pub entries: Vec<InitializerEntry>,
    /// Source location including the braces.
    pub span: Span,
}

/// One `Name = value` pair inside an object initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct InitializerEntry {
    /// The assigned property name.
    pub name: Identifier,
    /// The assigned value.
    pub value: Expression,
    /// Source location.
    pub span: Span,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A string literal.
    String(EcoString),
    /// An integer literal.
    Integer(i64),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
}

/// A name with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The name.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}
