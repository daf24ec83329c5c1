// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Collecting the properties a mapping method body assigns.
//!
//! The walk is syntactic and flow-insensitive: an assignment anywhere in the
//! body counts, including inside an `if` branch that may never run. Two
//! forms contribute:
//!
//! * plain assignments whose target is a member access
//!   (`target.FirstName = ...`), resolved through the receiver's static
//!   type, casts included;
//! * object-initializer entries (`new Person { FirstName = ... }`),
//!   resolved against the created type.

use std::collections::HashSet;

use crate::ast::{Block, Expression, MethodDecl, ObjectInitializer, Statement};
use crate::semantic_analysis::{ClassHierarchy, TypeResolver};

use super::properties::PropertyKey;

/// Collects the identity of every property `method` assigns.
///
/// Assignments whose receiver type cannot be resolved, or that name a
/// property no class in the receiver's chain declares, are silently
/// skipped.
#[must_use]
pub fn collect_mapped_properties(
    hierarchy: &ClassHierarchy,
    containing_class: &str,
    method: &MethodDecl,
) -> HashSet<PropertyKey> {
    let resolver = TypeResolver::for_method(hierarchy, containing_class, method);
    let mut collector = AssignmentCollector {
        hierarchy,
        resolver,
        mapped: HashSet::new(),
    };
    collector.walk_block(&method.body);
    collector.mapped
}

struct AssignmentCollector<'a> {
    hierarchy: &'a ClassHierarchy,
    resolver: TypeResolver<'a>,
    mapped: HashSet<PropertyKey>,
}

impl AssignmentCollector<'_> {
    fn walk_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.walk_statement(statement);
        }
    }

    fn walk_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Local { initializer, .. } => {
                if let Some(initializer) = initializer {
                    self.walk_expression(initializer);
                }
            }
            Statement::Expression(expression) => self.walk_expression(expression),
            Statement::Return { value, .. } => {
                if let Some(value) = value {
                    self.walk_expression(value);
                }
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.walk_expression(condition);
                self.walk_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.walk_statement(else_branch);
                }
            }
            Statement::Block(block) => self.walk_block(block),
            Statement::Error { .. } => {}
        }
    }

    fn walk_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Assignment { target, value, .. } => {
                self.record_assignment(target);
                self.walk_expression(target);
                self.walk_expression(value);
            }
            Expression::ObjectCreation {
                ty,
                arguments,
                initializer,
                ..
            } => {
                for argument in arguments {
                    self.walk_expression(argument);
                }
                if let Some(initializer) = initializer {
                    self.record_initializer(&ty.name, initializer);
                }
            }
            Expression::MemberAccess { receiver, .. } => self.walk_expression(receiver),
            Expression::Invocation {
                callee, arguments, ..
            } => {
                self.walk_expression(callee);
                for argument in arguments {
                    self.walk_expression(argument);
                }
            }
            Expression::ArrayCreation { elements, .. } => {
                for element in elements {
                    self.walk_expression(element);
                }
            }
            Expression::Cast { operand, .. } => self.walk_expression(operand),
            Expression::Binary { lhs, rhs, .. } => {
                self.walk_expression(lhs);
                self.walk_expression(rhs);
            }
            Expression::Parenthesized { inner, .. } => self.walk_expression(inner),
            Expression::Literal(..) | Expression::Identifier(_) | Expression::Error { .. } => {}
        }
    }

    /// Records `target.Property = ...` when the receiver type resolves and
    /// declares the property.
    fn record_assignment(&mut self, target: &Expression) {
        let Expression::MemberAccess {
            receiver, member, ..
        } = target.unparenthesized()
        else {
            return;
        };
        let Some(receiver_type) = self.resolver.resolve_receiver(receiver) else {
            return;
        };
        if let Some(key) = PropertyKey::resolve(self.hierarchy, &receiver_type, &member.name) {
            self.mapped.insert(key);
        }
    }

    /// Records every entry of `new {type_name} { Name = value, ... }` and
    /// walks the entry values for nested assignments.
    fn record_initializer(&mut self, type_name: &str, initializer: &ObjectInitializer) {
        for entry in &initializer.entries {
            if let Some(key) = PropertyKey::resolve(self.hierarchy, type_name, &entry.name.name) {
                self.mapped.insert(key);
            }
            self.walk_expression(&entry.value);
        }
    }
}
