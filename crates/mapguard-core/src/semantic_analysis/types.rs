// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Nominal type resolution for expressions inside one method body.
//!
//! The mapping analysis needs to know the static type of an assignment
//! target's receiver (`person` in `person.FirstName = ...`) so it can
//! resolve the assigned property. [`TypeResolver`] answers that question
//! for the expression forms the subset supports.
//!
//! Name binding is deliberately flow-insensitive, matching the assignment
//! collector: all locals in the body are bound up front, regardless of the
//! branch they are declared in.

use std::collections::HashMap;

use ecow::EcoString;

use crate::ast::{Block, Expression, Literal, MethodDecl, Statement, TypeRef};

use super::ClassHierarchy;

/// Resolves expression types within a single method body.
#[derive(Debug)]
pub struct TypeResolver<'a> {
    hierarchy: &'a ClassHierarchy,
    /// Class containing the method, for unqualified method calls.
    containing_class: EcoString,
    /// Parameter and local names bound to their declared or inferred types.
    bindings: HashMap<EcoString, EcoString>,
}

impl<'a> TypeResolver<'a> {
    /// Builds a resolver for `method`, declared in `containing_class`.
    ///
    /// Parameters are bound first, then every local declaration in the
    /// body (in source order, nested blocks and branches included).
    #[must_use]
    pub fn for_method(
        hierarchy: &'a ClassHierarchy,
        containing_class: impl Into<EcoString>,
        method: &MethodDecl,
    ) -> Self {
        let mut resolver = Self {
            hierarchy,
            containing_class: containing_class.into(),
            bindings: HashMap::new(),
        };
        for parameter in &method.parameters {
            resolver
                .bindings
                .insert(parameter.name.name.clone(), type_name(&parameter.ty));
        }
        resolver.bind_locals_in_block(&method.body);
        resolver
    }

    fn bind_locals_in_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.bind_locals_in_statement(statement);
        }
    }

    fn bind_locals_in_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Local {
                ty,
                name,
                initializer,
                ..
            } => {
                let inferred = match ty {
                    Some(ty) => Some(type_name(ty)),
                    None => initializer.as_ref().and_then(|init| self.resolve(init)),
                };
                if let Some(inferred) = inferred {
                    self.bindings.insert(name.name.clone(), inferred);
                }
            }
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.bind_locals_in_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.bind_locals_in_statement(else_branch);
                }
            }
            Statement::Block(block) => self.bind_locals_in_block(block),
            Statement::Expression(_) | Statement::Return { .. } | Statement::Error { .. } => {}
        }
    }

    /// Resolves the nominal type of an expression, or `None` when the
    /// subset cannot determine one.
    #[must_use]
    pub fn resolve(&self, expression: &Expression) -> Option<EcoString> {
        match expression.unparenthesized() {
            Expression::Literal(literal, _) => match literal {
                Literal::String(_) => Some("string".into()),
                Literal::Integer(_) => Some("int".into()),
                Literal::Boolean(_) => Some("bool".into()),
                Literal::Null => None,
            },
            Expression::Identifier(identifier) => self.bindings.get(&identifier.name).cloned(),
            Expression::ObjectCreation { ty, .. } | Expression::Cast { ty, .. } => {
                Some(type_name(ty))
            }
            Expression::ArrayCreation { element_ty, .. } => element_ty
                .as_ref()
                .map(|ty| EcoString::from(format!("{}[]", ty.name))),
            Expression::MemberAccess { receiver, member, .. } => {
                let receiver_type = self.resolve_receiver(receiver)?;
                self.hierarchy
                    .find_property(&receiver_type, &member.name)
                    .map(|property| property.ty.clone())
            }
            Expression::Invocation { callee, .. } => self.resolve_invocation_return(callee),
            Expression::Binary { lhs, rhs, .. } => {
                // `+` keeps the operand type when both sides agree
                // (string concatenation in practice).
                let lhs_type = self.resolve(lhs)?;
                let rhs_type = self.resolve(rhs)?;
                (lhs_type == rhs_type).then_some(lhs_type)
            }
            Expression::Assignment { value, .. } => self.resolve(value),
            Expression::Parenthesized { .. } | Expression::Error { .. } => None,
        }
    }

    /// Resolves the type a member access reads its member from.
    ///
    /// A bare identifier that is not a local or parameter but names a known
    /// class is a static reference to that class.
    pub fn resolve_receiver(&self, receiver: &Expression) -> Option<EcoString> {
        if let Some(resolved) = self.resolve(receiver) {
            return Some(resolved);
        }
        if let Expression::Identifier(identifier) = receiver.unparenthesized() {
            if self.hierarchy.contains(&identifier.name) {
                return Some(identifier.name.clone());
            }
        }
        None
    }

    fn resolve_invocation_return(&self, callee: &Expression) -> Option<EcoString> {
        match callee.unparenthesized() {
            // Unqualified call: a method of the containing class.
            Expression::Identifier(identifier) => self
                .hierarchy
                .find_method(&self.containing_class, &identifier.name)
                .and_then(|method| method.return_type.clone()),
            // Qualified call: static (`Helpers.Names()`) or instance
            // (`source.FullName()`). Both resolve through the receiver's
            // class.
            Expression::MemberAccess { receiver, member, .. } => {
                let receiver_type = self.resolve_receiver(receiver)?;
                self.hierarchy
                    .find_method(&receiver_type, &member.name)
                    .and_then(|method| method.return_type.clone())
            }
            _ => None,
        }
    }
}

fn type_name(ty: &TypeRef) -> EcoString {
    if ty.is_array {
        EcoString::from(format!("{}[]", ty.name))
    } else {
        ty.name.clone()
    }
}
