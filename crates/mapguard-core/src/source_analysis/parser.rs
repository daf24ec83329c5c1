// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser for the analyzed C#-style source subset.
//!
//! The parser consumes the token stream produced by the
//! [lexer](super::lexer) and builds a [`CompilationUnit`]. It never fails:
//! syntax errors are reported as [`Diagnostic`]s and the parser recovers at
//! the next `;` or `}`, producing [`Statement::Error`] /
//! [`Expression::Error`] nodes so analysis can still run over the rest of
//! the file.
//!
//! This module is also the home of the [`Diagnostic`] type shared between
//! the parser and the mapping analysis.

use ecow::EcoString;

use crate::ast::{
    Accessibility, Accessor, Attribute, BinaryOp, Block, ClassDecl, CompilationUnit, Expression,
    Identifier, InitializerEntry, Literal, Member, MethodDecl, Modifiers, ObjectInitializer,
    Parameter, PropertyDecl, Statement, TypeRef,
};
use crate::source_analysis::{Span, Token, TokenKind};

/// Stable identifier for an analysis diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A mapping method whose target type cannot be determined.
    MissingMappingTargetType,
    /// A target property that is neither assigned nor excluded.
    UnmappedProperty,
}

impl DiagnosticCode {
    /// The stable textual code, as shown to users and asserted in tests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingMappingTargetType => "MMG0001",
            Self::UnmappedProperty => "MMG1001",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An error that should fail the build.
    Error,
    /// A warning that should be addressed.
    Warning,
}

/// A diagnostic message produced by parsing or analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// Stable code for analysis diagnostics; parse errors carry none.
    pub code: Option<DiagnosticCode>,
    /// The message text.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a new error diagnostic without a code (parse errors).
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            code: None,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a coded analysis diagnostic with severity
    /// [`Severity::Error`].
    #[must_use]
    pub fn analysis(code: DiagnosticCode, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code: Some(code),
            message: message.into(),
            span,
            hint: None,
        }
    }
}

/// Maximum expression nesting depth before the parser bails out.
///
/// Guards against stack overflow on adversarial input such as
/// `((((((...))))))`.
const MAX_NESTING_DEPTH: usize = 64;

/// The parser state.
struct Parser {
    /// The tokens being parsed; always ends with [`TokenKind::Eof`].
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diagnostic>,
    /// Current expression nesting depth.
    nesting_depth: usize,
}

/// Parses a token stream into a compilation unit plus diagnostics.
///
/// The token stream must end with [`TokenKind::Eof`]; use
/// [`lex_with_eof`](super::lex_with_eof).
#[must_use]
pub fn parse(tokens: Vec<Token>) -> (CompilationUnit, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let unit = parser.parse_compilation_unit();
    (unit, parser.diagnostics)
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.kind.is_eof()) {
            let end = tokens.last().map_or(Span::default(), Token::span);
            tokens.push(Token::new(TokenKind::Eof, end));
        }
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            nesting_depth: 0,
        }
    }

    // ========================================================================
    // Token stream helpers
    // ========================================================================

    fn current_token(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current_token().kind
    }

    fn current_span(&self) -> Span {
        self.current_token().span
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let index = (self.current + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    /// The span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.tokens
            .get(self.current.wrapping_sub(1))
            .map_or_else(Span::default, Token::span)
    }

    fn at_eof(&self) -> bool {
        self.current_kind().is_eof()
    }

    fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.at_eof() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, message: impl Into<EcoString>) {
        let span = self.current_span();
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Consumes the expected token or reports an error (without advancing).
    fn expect(&mut self, kind: &TokenKind, message: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    /// Parses an identifier, recovering with a placeholder on failure.
    fn parse_identifier(&mut self, message: &str) -> Identifier {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let identifier = Identifier::new(name.clone(), self.current_span());
            self.advance();
            identifier
        } else {
            let span = self.current_span();
            self.error(message);
            Identifier::new("<error>", span)
        }
    }

    /// Skips tokens until a likely statement boundary.
    fn synchronize(&mut self) {
        while !self.at_eof() {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Reports lexer error tokens as diagnostics, consuming them.
    fn drain_error_tokens(&mut self) {
        while let TokenKind::Error(message) = self.current_kind() {
            let message = message.clone();
            let span = self.current_span();
            self.diagnostics.push(Diagnostic::error(message, span));
            self.advance();
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let start = self.current_span();
        let mut classes = Vec::new();

        while !self.at_eof() {
            self.drain_error_tokens();
            if self.at_eof() {
                break;
            }
            let before = self.current;
            if let Some(class) = self.parse_class_decl() {
                classes.push(class);
            } else {
                self.error("Expected a class declaration");
                self.synchronize();
                // `synchronize` stops in front of `}`; force progress.
                if self.current == before {
                    self.advance();
                }
            }
        }

        let end = self.current_span();
        CompilationUnit::new(classes, start.merge(end))
    }

    /// Parses a class declaration, or returns `None` if the upcoming tokens
    /// cannot start one.
    fn parse_class_decl(&mut self) -> Option<ClassDecl> {
        let start = self.current_span();
        let attributes = self.parse_attribute_list();
        let modifiers = self.parse_modifiers();

        if !self.eat(&TokenKind::Class) {
            // Attributes/modifiers with no `class` afterwards: report at the
            // offending token and let the caller recover.
            if !attributes.is_empty() || modifiers != Modifiers::default() {
                self.error("Expected 'class' after attributes or modifiers");
            }
            return None;
        }

        let name = self.parse_identifier("Expected class name");
        let base = if self.eat(&TokenKind::Colon) {
            Some(self.parse_identifier("Expected base class name"))
        } else {
            None
        };

        self.expect(&TokenKind::LeftBrace, "Expected '{' to open class body");
        let members = self.parse_members();
        let end = self.current_span();
        self.expect(&TokenKind::RightBrace, "Expected '}' to close class body");

        Some(ClassDecl {
            attributes,
            modifiers,
            name,
            base,
            members,
            span: start.merge(end),
        })
    }

    fn parse_members(&mut self) -> Vec<Member> {
        let mut members = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.at_eof() {
            self.drain_error_tokens();
            if self.check(&TokenKind::RightBrace) || self.at_eof() {
                break;
            }
            if let Some(member) = self.parse_member() {
                members.push(member);
            } else {
                self.synchronize();
            }
        }
        members
    }

    /// Parses one property or method member.
    fn parse_member(&mut self) -> Option<Member> {
        let start = self.current_span();
        let attributes = self.parse_attribute_list();
        let modifiers = self.parse_modifiers();

        // `void` can only start a method.
        if self.eat(&TokenKind::Void) {
            let name = self.parse_identifier("Expected method name");
            return Some(Member::Method(self.parse_method_rest(
                start, attributes, modifiers, None, name,
            )));
        }

        let Some(ty) = self.parse_type_ref() else {
            self.error("Expected member type");
            return None;
        };
        let name = self.parse_identifier("Expected member name");

        match self.current_kind() {
            TokenKind::LeftBrace => Some(Member::Property(self.parse_property_rest(
                start, attributes, modifiers, ty, name,
            ))),
            TokenKind::LeftParen => Some(Member::Method(self.parse_method_rest(
                start,
                attributes,
                modifiers,
                Some(ty),
                name,
            ))),
            _ => {
                self.error("Expected '{' (property) or '(' (method) after member name");
                None
            }
        }
    }

    fn parse_property_rest(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Modifiers,
        ty: TypeRef,
        name: Identifier,
    ) -> PropertyDecl {
        self.expect(&TokenKind::LeftBrace, "Expected '{' to open accessor list");

        let mut getter = None;
        let mut setter = None;
        while !self.check(&TokenKind::RightBrace) && !self.at_eof() {
            let accessor_start = self.current_span();
            let accessibility = self.parse_accessibility();
            match self.current_kind() {
                TokenKind::Get => {
                    self.advance();
                    self.expect(&TokenKind::Semicolon, "Expected ';' after 'get'");
                    getter = Some(Accessor {
                        accessibility,
                        span: accessor_start.merge(self.current_span()),
                    });
                }
                TokenKind::Set => {
                    self.advance();
                    self.expect(&TokenKind::Semicolon, "Expected ';' after 'set'");
                    setter = Some(Accessor {
                        accessibility,
                        span: accessor_start.merge(self.current_span()),
                    });
                }
                _ => {
                    self.error("Expected 'get' or 'set' accessor");
                    self.synchronize();
                    break;
                }
            }
        }
        let end = self.current_span();
        self.expect(&TokenKind::RightBrace, "Expected '}' to close accessor list");

        PropertyDecl {
            attributes,
            modifiers,
            ty,
            name,
            getter,
            setter,
            span: start.merge(end),
        }
    }

    fn parse_method_rest(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Modifiers,
        return_type: Option<TypeRef>,
        name: Identifier,
    ) -> MethodDecl {
        self.expect(&TokenKind::LeftParen, "Expected '(' to open parameter list");
        let parameters = self.parse_parameters();
        self.expect(
            &TokenKind::RightParen,
            "Expected ')' to close parameter list",
        );
        let body = self.parse_block();

        MethodDecl {
            attributes,
            modifiers,
            return_type,
            name,
            parameters,
            span: start.merge(body.span),
            body,
        }
    }

    fn parse_parameters(&mut self) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        if self.check(&TokenKind::RightParen) {
            return parameters;
        }
        loop {
            let start = self.current_span();
            let attributes = self.parse_attribute_list();
            let Some(ty) = self.parse_type_ref() else {
                self.error("Expected parameter type");
                break;
            };
            let name = self.parse_identifier("Expected parameter name");
            parameters.push(Parameter {
                attributes,
                ty,
                name,
                span: start.merge(self.current_span()),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        parameters
    }

    /// Parses `[A, B("x")] [C]`-style attribute lists.
    fn parse_attribute_list(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        while self.check(&TokenKind::LeftBracket) {
            let list_start = self.current_span();
            self.advance(); // `[`
            let mut first_in_list = true;
            loop {
                let start = if first_in_list {
                    list_start
                } else {
                    self.current_span()
                };
                first_in_list = false;
                let name = self.parse_identifier("Expected attribute name");
                let arguments = if self.eat(&TokenKind::LeftParen) {
                    let arguments = self.parse_argument_list();
                    self.expect(
                        &TokenKind::RightParen,
                        "Expected ')' to close attribute arguments",
                    );
                    arguments
                } else {
                    Vec::new()
                };
                attributes.push(Attribute {
                    name,
                    arguments,
                    span: start.merge(self.current_span()),
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightBracket, "Expected ']' to close attribute");
        }
        attributes
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            match self.current_kind() {
                TokenKind::Public => modifiers.accessibility = Some(Accessibility::Public),
                TokenKind::Private => modifiers.accessibility = Some(Accessibility::Private),
                TokenKind::Protected => modifiers.accessibility = Some(Accessibility::Protected),
                TokenKind::Internal => modifiers.accessibility = Some(Accessibility::Internal),
                TokenKind::Static => modifiers.is_static = true,
                TokenKind::Virtual => modifiers.is_virtual = true,
                TokenKind::Override => modifiers.is_override = true,
                TokenKind::Abstract => modifiers.is_abstract = true,
                TokenKind::Sealed => modifiers.is_sealed = true,
                _ => return modifiers,
            }
            self.advance();
        }
    }

    fn parse_accessibility(&mut self) -> Option<Accessibility> {
        let accessibility = match self.current_kind() {
            TokenKind::Public => Accessibility::Public,
            TokenKind::Private => Accessibility::Private,
            TokenKind::Protected => Accessibility::Protected,
            TokenKind::Internal => Accessibility::Internal,
            _ => return None,
        };
        self.advance();
        Some(accessibility)
    }

    /// Parses `Name` or `Name[]`, or returns `None` if the current token is
    /// not an identifier.
    fn parse_type_ref(&mut self) -> Option<TypeRef> {
        let TokenKind::Identifier(name) = self.current_kind() else {
            return None;
        };
        let name = name.clone();
        let start = self.current_span();
        self.advance();

        let mut is_array = false;
        if self.check(&TokenKind::LeftBracket) && self.peek_kind(1) == &TokenKind::RightBracket {
            self.advance();
            self.advance();
            is_array = true;
        }
        Some(TypeRef {
            name,
            is_array,
            span: start.merge(self.current_span()),
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_block(&mut self) -> Block {
        let start = self.current_span();
        self.expect(&TokenKind::LeftBrace, "Expected '{' to open block");
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.at_eof() {
            statements.push(self.parse_statement());
        }
        let end = self.current_span();
        self.expect(&TokenKind::RightBrace, "Expected '}' to close block");
        Block {
            statements,
            span: start.merge(end),
        }
    }

    fn parse_statement(&mut self) -> Statement {
        self.drain_error_tokens();
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression())
                };
                let end = self.current_span();
                self.expect(&TokenKind::Semicolon, "Expected ';' after return statement");
                Statement::Return {
                    value,
                    span: start.merge(end),
                }
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::LeftBrace => Statement::Block(self.parse_block()),
            TokenKind::Var => {
                self.advance();
                self.parse_local_rest(start, None)
            }
            TokenKind::Identifier(_) if self.starts_typed_local() => {
                let ty = self.parse_type_ref();
                self.parse_local_rest(start, ty)
            }
            TokenKind::Eof => {
                self.error("Unexpected end of input in block");
                Statement::Error { span: start }
            }
            _ => {
                let expression = self.parse_expression();
                if expression.is_error() {
                    self.synchronize();
                    return Statement::Error {
                        span: start.merge(self.current_span()),
                    };
                }
                self.expect(&TokenKind::Semicolon, "Expected ';' after expression");
                Statement::Expression(expression)
            }
        }
    }

    /// Disambiguates `Person p = ...;` from `person.X = ...;`.
    ///
    /// A statement starts a typed local when an identifier is followed by
    /// another identifier, or by `[]` and then an identifier.
    fn starts_typed_local(&self) -> bool {
        match self.peek_kind(1) {
            TokenKind::Identifier(_) => true,
            TokenKind::LeftBracket => {
                self.peek_kind(2) == &TokenKind::RightBracket
                    && matches!(self.peek_kind(3), TokenKind::Identifier(_))
            }
            _ => false,
        }
    }

    fn parse_local_rest(&mut self, start: Span, ty: Option<TypeRef>) -> Statement {
        let name = self.parse_identifier("Expected variable name");
        let initializer = if self.eat(&TokenKind::Equals) {
            Some(self.parse_expression())
        } else {
            None
        };
        let end = self.current_span();
        self.expect(&TokenKind::Semicolon, "Expected ';' after declaration");
        Statement::Local {
            ty,
            name,
            initializer,
            span: start.merge(end),
        }
    }

    fn parse_if_statement(&mut self) -> Statement {
        let start = self.current_span();
        self.advance(); // `if`
        self.expect(&TokenKind::LeftParen, "Expected '(' after 'if'");
        let condition = self.parse_expression();
        self.expect(&TokenKind::RightParen, "Expected ')' after condition");
        let then_branch = Box::new(self.parse_statement());
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        let end = else_branch
            .as_ref()
            .map_or_else(|| then_branch.span(), |b| b.span());
        Statement::If {
            condition,
            then_branch,
            else_branch,
            span: start.merge(end),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Expression {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            let span = self.current_span();
            self.error("Expression is nested too deeply");
            self.synchronize();
            return Expression::Error {
                message: "expression nested too deeply".into(),
                span,
            };
        }
        self.nesting_depth += 1;
        let expression = self.parse_assignment();
        self.nesting_depth -= 1;
        expression
    }

    /// Assignment is right-associative and lowest precedence.
    fn parse_assignment(&mut self) -> Expression {
        let target = self.parse_additive();
        if self.eat(&TokenKind::Equals) {
            let value = self.parse_expression();
            let span = target.span().merge(value.span());
            return Expression::Assignment {
                target: Box::new(target),
                value: Box::new(value),
                span,
            };
        }
        target
    }

    fn parse_additive(&mut self) -> Expression {
        let mut lhs = self.parse_unary();
        while self.eat(&TokenKind::Plus) {
            let rhs = self.parse_unary();
            let span = lhs.span().merge(rhs.span());
            lhs = Expression::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expression {
        if let Some(cast) = self.try_parse_cast() {
            return cast;
        }
        self.parse_postfix()
    }

    /// Parses `(Type) operand` if the lookahead matches a cast.
    ///
    /// `(Base) person` is a cast; `(x) + y` is a parenthesized expression.
    /// The two are distinguished by the token after `)`: a cast is followed
    /// by something that can begin an operand.
    fn try_parse_cast(&mut self) -> Option<Expression> {
        if !self.check(&TokenKind::LeftParen) {
            return None;
        }
        let (close_offset, _is_array) = match (self.peek_kind(1), self.peek_kind(2)) {
            (TokenKind::Identifier(_), TokenKind::RightParen) => (2, false),
            (TokenKind::Identifier(_), TokenKind::LeftBracket)
                if self.peek_kind(3) == &TokenKind::RightBracket
                    && self.peek_kind(4) == &TokenKind::RightParen =>
            {
                (4, true)
            }
            _ => return None,
        };
        let operand_start = self.peek_kind(close_offset + 1);
        let starts_operand = matches!(
            operand_start,
            TokenKind::Identifier(_)
                | TokenKind::String(_)
                | TokenKind::Integer(_)
                | TokenKind::LeftParen
                | TokenKind::New
        );
        if !starts_operand {
            return None;
        }

        let start = self.current_span();
        self.advance(); // `(`
        let ty = self.parse_type_ref()?; // identifier guaranteed by lookahead
        self.expect(&TokenKind::RightParen, "Expected ')' to close cast");
        let operand = self.parse_unary();
        let span = start.merge(operand.span());
        Some(Expression::Cast {
            ty,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_postfix(&mut self) -> Expression {
        let mut expression = self.parse_primary();
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let member = self.parse_identifier("Expected member name after '.'");
                    let span = expression.span().merge(member.span);
                    expression = Expression::MemberAccess {
                        receiver: Box::new(expression),
                        member,
                        span,
                    };
                }
                TokenKind::LeftParen => {
                    self.advance();
                    let arguments = self.parse_argument_list();
                    let end = self.current_span();
                    self.expect(&TokenKind::RightParen, "Expected ')' to close arguments");
                    let span = expression.span().merge(end);
                    expression = Expression::Invocation {
                        callee: Box::new(expression),
                        arguments,
                        span,
                    };
                }
                _ => return expression,
            }
        }
    }

    fn parse_argument_list(&mut self) -> Vec<Expression> {
        let mut arguments = Vec::new();
        if self.check(&TokenKind::RightParen) {
            return arguments;
        }
        loop {
            arguments.push(self.parse_expression());
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        arguments
    }

    fn parse_primary(&mut self) -> Expression {
        let start = self.current_span();
        match self.current_kind().clone() {
            TokenKind::String(value) => {
                self.advance();
                Expression::Literal(Literal::String(value), start)
            }
            TokenKind::Integer(value) => {
                self.advance();
                Expression::Literal(Literal::Integer(value), start)
            }
            TokenKind::True => {
                self.advance();
                Expression::Literal(Literal::Boolean(true), start)
            }
            TokenKind::False => {
                self.advance();
                Expression::Literal(Literal::Boolean(false), start)
            }
            TokenKind::Null => {
                self.advance();
                Expression::Literal(Literal::Null, start)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Expression::Identifier(Identifier::new(name, start))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression();
                let end = self.current_span();
                self.expect(&TokenKind::RightParen, "Expected ')'");
                Expression::Parenthesized {
                    inner: Box::new(inner),
                    span: start.merge(end),
                }
            }
            TokenKind::New => self.parse_creation(),
            other => {
                self.error(format!("Expected an expression, found {other:?}"));
                Expression::Error {
                    message: "expected an expression".into(),
                    span: start,
                }
            }
        }
    }

    /// Parses `new ...`: object creation (with optional initializer) or
    /// array creation.
    fn parse_creation(&mut self) -> Expression {
        let start = self.current_span();
        self.advance(); // `new`

        // `new[] { ... }` is an implicitly typed array.
        if self.check(&TokenKind::LeftBracket) {
            self.advance();
            self.expect(
                &TokenKind::RightBracket,
                "Expected ']' in implicitly typed array creation",
            );
            return self.parse_array_elements(start, None);
        }

        let Some(ty) = self.parse_type_ref() else {
            self.error("Expected type name after 'new'");
            return Expression::Error {
                message: "expected type after 'new'".into(),
                span: start,
            };
        };

        // `parse_type_ref` consumed a `[]` suffix: `new string[] { ... }`.
        if ty.is_array {
            let element_ty = TypeRef::named(ty.name.clone(), ty.span);
            return self.parse_array_elements(start, Some(element_ty));
        }

        let arguments = if self.eat(&TokenKind::LeftParen) {
            let arguments = self.parse_argument_list();
            self.expect(
                &TokenKind::RightParen,
                "Expected ')' to close constructor arguments",
            );
            arguments
        } else {
            Vec::new()
        };

        let initializer = if self.check(&TokenKind::LeftBrace) {
            Some(self.parse_object_initializer())
        } else {
            None
        };

        let end = initializer
            .as_ref()
            .map_or_else(|| self.previous_span(), |i| i.span);
        Expression::ObjectCreation {
            ty,
            arguments,
            initializer,
            span: start.merge(end),
        }
    }

    fn parse_array_elements(&mut self, start: Span, element_ty: Option<TypeRef>) -> Expression {
        self.expect(&TokenKind::LeftBrace, "Expected '{' to open array elements");
        let mut elements = Vec::new();
        if !self.check(&TokenKind::RightBrace) {
            loop {
                elements.push(self.parse_expression());
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                // Trailing comma before the closing brace.
                if self.check(&TokenKind::RightBrace) {
                    break;
                }
            }
        }
        let end = self.current_span();
        self.expect(
            &TokenKind::RightBrace,
            "Expected '}' to close array elements",
        );
        Expression::ArrayCreation {
            element_ty,
            elements,
            span: start.merge(end),
        }
    }

    fn parse_object_initializer(&mut self) -> ObjectInitializer {
        let start = self.current_span();
        self.advance(); // `{`
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.at_eof() {
            let entry_start = self.current_span();
            let name = self.parse_identifier("Expected property name in object initializer");
            self.expect(&TokenKind::Equals, "Expected '=' in object initializer");
            let value = self.parse_expression();
            entries.push(InitializerEntry {
                span: entry_start.merge(value.span()),
                name,
                value,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.current_span();
        self.expect(
            &TokenKind::RightBrace,
            "Expected '}' to close object initializer",
        );
        ObjectInitializer {
            entries,
            span: start.merge(end),
        }
    }
}
