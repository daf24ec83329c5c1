// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Evaluating exclusion attribute arguments to property names.
//!
//! `[UnmappedProperties(...)]` (and its single-name `[UnmappedProperty]`
//! subclass) carry the names a mapping method is allowed to leave
//! unassigned. Arguments are evaluated by a small constant interpreter
//! rather than by executing user code: string literals, `+` concatenation,
//! array creation expressions, and calls to pure helper methods. A pure
//! helper is a static method whose body is exactly one `return` of a
//! supported expression; parameters bind by position.
//!
//! Evaluation is budgeted. Every expression step spends fuel and helper
//! calls may only nest so deep, so a self-recursive helper terminates with
//! an error instead of hanging the analysis. Each attribute occurrence is
//! evaluated with a fresh budget; a failed occurrence contributes no names
//! (the affected properties are then reported as unmapped) and is logged,
//! but never aborts the analysis or affects other occurrences.

use std::collections::HashMap;

use ecow::EcoString;
use thiserror::Error;
use tracing::warn;

use crate::ast::{
    Attribute, ClassDecl, CompilationUnit, Expression, Literal, MethodDecl, Statement,
};
use crate::semantic_analysis::{ClassHierarchy, UNMAPPED_PROPERTIES_ATTRIBUTE};
use crate::source_analysis::Span;

use super::detection::attribute_matches;

/// Total expression steps one attribute occurrence may spend.
const EVAL_FUEL: u32 = 256;

/// Maximum helper-call nesting within one occurrence.
const MAX_CALL_DEPTH: usize = 16;

/// Why an exclusion argument could not be evaluated.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("expression is not supported in a constant exclusion list")]
    Unsupported { span: Span },

    #[error("unknown helper method `{name}`")]
    UnknownHelper { name: EcoString, span: Span },

    #[error("helper method `{name}` is declared in more than one class; qualify the call")]
    AmbiguousHelper { name: EcoString, span: Span },

    #[error("helper method `{name}` is not a static single-return method")]
    ImpureHelper { name: EcoString, span: Span },

    #[error("helper method `{name}` expects {expected} arguments, got {actual}")]
    ArityMismatch {
        name: EcoString,
        expected: usize,
        actual: usize,
        span: Span,
    },

    #[error("exclusion evaluation budget exhausted")]
    FuelExhausted,

    #[error("helper calls nested deeper than {MAX_CALL_DEPTH} levels")]
    CallDepthExceeded,

    #[error("exclusion names must evaluate to strings")]
    NotAString { span: Span },
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(EcoString),
    Int(i64),
    Seq(Vec<Value>),
}

type Env = HashMap<EcoString, Value>;

/// Interprets the constant arguments of one exclusion attribute occurrence.
///
/// [`evaluate`](Self::evaluate) consumes the evaluator, so every occurrence
/// gets its own fuel budget and no state leaks between occurrences.
pub struct ExclusionEvaluator<'a> {
    /// Every method in the unit, indexed for helper-call resolution.
    helpers: Vec<(&'a ClassDecl, &'a MethodDecl)>,
    fuel: u32,
}

impl<'a> ExclusionEvaluator<'a> {
    #[must_use]
    pub fn new(unit: &'a CompilationUnit) -> Self {
        let helpers = unit
            .classes
            .iter()
            .flat_map(|class| class.methods().map(move |method| (class, method)))
            .collect();
        Self {
            helpers,
            fuel: EVAL_FUEL,
        }
    }

    /// Evaluates every argument of `attribute` and flattens the results to
    /// a list of property names.
    pub fn evaluate(mut self, attribute: &Attribute) -> Result<Vec<EcoString>, EvalError> {
        let mut names = Vec::new();
        for argument in &attribute.arguments {
            let value = self.eval(argument, &Env::new(), 0)?;
            flatten(value, argument.span(), &mut names)?;
        }
        Ok(names)
    }

    fn spend(&mut self) -> Result<(), EvalError> {
        if self.fuel == 0 {
            return Err(EvalError::FuelExhausted);
        }
        self.fuel -= 1;
        Ok(())
    }

    fn eval(&mut self, expression: &Expression, env: &Env, depth: usize) -> Result<Value, EvalError> {
        self.spend()?;
        let expression = expression.unparenthesized();
        let span = expression.span();
        match expression {
            Expression::Literal(Literal::String(value), _) => Ok(Value::Str(value.clone())),
            Expression::Literal(Literal::Integer(value), _) => Ok(Value::Int(*value)),
            Expression::Identifier(identifier) => env
                .get(&identifier.name)
                .cloned()
                .ok_or(EvalError::Unsupported { span }),
            Expression::Binary { lhs, rhs, .. } => {
                let lhs = self.eval(lhs, env, depth)?;
                let rhs = self.eval(rhs, env, depth)?;
                match (lhs, rhs) {
                    (Value::Str(a), Value::Str(b)) => {
                        let mut joined = a;
                        joined.push_str(&b);
                        Ok(Value::Str(joined))
                    }
                    (Value::Int(a), Value::Int(b)) => a
                        .checked_add(b)
                        .map(Value::Int)
                        .ok_or(EvalError::Unsupported { span }),
                    _ => Err(EvalError::Unsupported { span }),
                }
            }
            Expression::ArrayCreation { elements, .. } => {
                let values = elements
                    .iter()
                    .map(|element| self.eval(element, env, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Seq(values))
            }
            Expression::Cast { operand, .. } => self.eval(operand, env, depth),
            Expression::Invocation {
                callee, arguments, ..
            } => self.eval_call(callee, arguments, env, depth, span),
            _ => Err(EvalError::Unsupported { span }),
        }
    }

    fn eval_call(
        &mut self,
        callee: &Expression,
        arguments: &[Expression],
        env: &Env,
        depth: usize,
        span: Span,
    ) -> Result<Value, EvalError> {
        if depth >= MAX_CALL_DEPTH {
            return Err(EvalError::CallDepthExceeded);
        }
        let helper = self.resolve_helper(callee, span)?;
        if !helper.modifiers.is_static {
            return Err(EvalError::ImpureHelper {
                name: helper.name.name.clone(),
                span,
            });
        }
        let Some(body) = single_return_body(helper) else {
            return Err(EvalError::ImpureHelper {
                name: helper.name.name.clone(),
                span,
            });
        };
        if helper.parameters.len() != arguments.len() {
            return Err(EvalError::ArityMismatch {
                name: helper.name.name.clone(),
                expected: helper.parameters.len(),
                actual: arguments.len(),
                span,
            });
        }
        let mut call_env = Env::new();
        for (parameter, argument) in helper.parameters.iter().zip(arguments) {
            let value = self.eval(argument, env, depth)?;
            call_env.insert(parameter.name.name.clone(), value);
        }
        self.eval(body, &call_env, depth + 1)
    }

    /// Resolves `Helpers.Names` or a bare `Names` to a method declaration.
    ///
    /// Bare names must be unambiguous across the unit.
    fn resolve_helper(
        &self,
        callee: &Expression,
        span: Span,
    ) -> Result<&'a MethodDecl, EvalError> {
        match callee.unparenthesized() {
            Expression::MemberAccess {
                receiver, member, ..
            } => {
                let Expression::Identifier(class_name) = receiver.unparenthesized() else {
                    return Err(EvalError::Unsupported { span });
                };
                self.helpers
                    .iter()
                    .find(|(class, method)| {
                        class.name.name == class_name.name && method.name.name == member.name
                    })
                    .map(|(_, method)| *method)
                    .ok_or_else(|| EvalError::UnknownHelper {
                        name: member.name.clone(),
                        span,
                    })
            }
            Expression::Identifier(identifier) => {
                let mut matches = self
                    .helpers
                    .iter()
                    .filter(|(_, method)| method.name.name == identifier.name)
                    .map(|(_, method)| *method);
                let first = matches.next().ok_or_else(|| EvalError::UnknownHelper {
                    name: identifier.name.clone(),
                    span,
                })?;
                if matches.next().is_some() {
                    return Err(EvalError::AmbiguousHelper {
                        name: identifier.name.clone(),
                        span,
                    });
                }
                Ok(first)
            }
            _ => Err(EvalError::Unsupported { span }),
        }
    }
}

/// The body expression of a helper that is exactly `return <expr>;`.
fn single_return_body(method: &MethodDecl) -> Option<&Expression> {
    match method.body.statements.as_slice() {
        [Statement::Return {
            value: Some(value), ..
        }] => Some(value),
        _ => None,
    }
}

fn flatten(value: Value, span: Span, names: &mut Vec<EcoString>) -> Result<(), EvalError> {
    match value {
        Value::Str(name) => names.push(name),
        Value::Seq(values) => {
            for value in values {
                flatten(value, span, names)?;
            }
        }
        Value::Int(_) => return Err(EvalError::NotAString { span }),
    }
    Ok(())
}

/// Collects the excluded property names declared on `method`.
///
/// Every exclusion attribute occurrence is evaluated independently with a
/// fresh budget; the results concatenate. An occurrence that fails to
/// evaluate contributes nothing and is logged as a warning.
#[must_use]
pub fn excluded_property_names(
    unit: &CompilationUnit,
    hierarchy: &ClassHierarchy,
    method: &MethodDecl,
) -> Vec<EcoString> {
    let mut excluded = Vec::new();
    for attribute in &method.attributes {
        if !attribute_matches(attribute, hierarchy, UNMAPPED_PROPERTIES_ATTRIBUTE) {
            continue;
        }
        match ExclusionEvaluator::new(unit).evaluate(attribute) {
            Ok(names) => excluded.extend(names),
            Err(error) => warn!(
                attribute = %attribute.name.name,
                method = %method.name.name,
                %error,
                "could not evaluate exclusion attribute; treating its list as empty"
            ),
        }
    }
    excluded
}
