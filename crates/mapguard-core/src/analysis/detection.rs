// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recognising mapping methods and resolving their target type.
//!
//! A method is a mapping method when one of its attributes resolves to
//! `MappingMethodAttribute` or a class derived from it. The mapping target
//! type is the method's return type when it has one, otherwise the type of
//! the single parameter marked `[MappingTarget]`.

use ecow::EcoString;

use crate::ast::{Attribute, MethodDecl, Parameter};
use crate::semantic_analysis::{
    ClassHierarchy, MAPPING_METHOD_ATTRIBUTE, MAPPING_TARGET_ATTRIBUTE,
};
use crate::source_analysis::Span;

/// Returns `true` when `attribute` resolves to `marker` or a class derived
/// from it.
///
/// Resolution honours the `Attribute` suffix convention: `[MappingMethod]`
/// and `[MappingMethodAttribute]` name the same class.
#[must_use]
pub fn attribute_matches(
    attribute: &Attribute,
    hierarchy: &ClassHierarchy,
    marker: &str,
) -> bool {
    hierarchy
        .resolve_attribute_class(&attribute.name.name)
        .is_some_and(|class| hierarchy.inherits_from_or_equals(&class.name, marker))
}

/// Finds the attribute that marks `method` as a mapping method, if any.
#[must_use]
pub fn mapping_method_attribute<'a>(
    method: &'a MethodDecl,
    hierarchy: &ClassHierarchy,
) -> Option<&'a Attribute> {
    method
        .attributes
        .iter()
        .find(|attribute| attribute_matches(attribute, hierarchy, MAPPING_METHOD_ATTRIBUTE))
}

/// Whether `method` is a mapping method subject to completeness analysis.
#[must_use]
pub fn is_mapping_method(method: &MethodDecl, hierarchy: &ClassHierarchy) -> bool {
    mapping_method_attribute(method, hierarchy).is_some()
}

/// The location all findings for `method` anchor to: the marking attribute
/// when present, otherwise the method name.
#[must_use]
pub fn anchor_span(method: &MethodDecl, hierarchy: &ClassHierarchy) -> Span {
    mapping_method_attribute(method, hierarchy)
        .map_or(method.name.span, |attribute| attribute.span)
}

/// Resolves the mapping target type of `method`.
///
/// A non-void return type wins outright. Otherwise the method must have
/// exactly one parameter marked `[MappingTarget]`; zero or several marked
/// parameters leave the target undetermined and yield `None`.
#[must_use]
pub fn mapping_target_type(method: &MethodDecl, hierarchy: &ClassHierarchy) -> Option<EcoString> {
    if let Some(return_type) = &method.return_type {
        return Some(return_type.name.clone());
    }
    let mut marked = method
        .parameters
        .iter()
        .filter(|parameter| is_mapping_target(parameter, hierarchy));
    let target = marked.next()?;
    if marked.next().is_some() {
        return None;
    }
    Some(target.ty.name.clone())
}

fn is_mapping_target(parameter: &Parameter, hierarchy: &ClassHierarchy) -> bool {
    parameter
        .attributes
        .iter()
        .any(|attribute| attribute_matches(attribute, hierarchy, MAPPING_TARGET_ATTRIBUTE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompilationUnit;
    use crate::source_analysis::{lex_with_eof, parse};

    fn unit(source: &str) -> CompilationUnit {
        let (unit, diagnostics) = parse(lex_with_eof(source));
        assert!(diagnostics.is_empty(), "parse diagnostics: {diagnostics:?}");
        unit
    }

    fn only_method(unit: &CompilationUnit) -> &MethodDecl {
        unit.classes
            .iter()
            .flat_map(|class| class.methods())
            .next()
            .expect("expected a method")
    }

    #[test]
    fn marking_attribute_is_recognised() {
        let unit = unit(
            "public static class Mappers\n\
             {\n\
             [MappingMethod]\n\
             public static string Map() { return \"x\"; }\n\
             }\n",
        );
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        assert!(is_mapping_method(only_method(&unit), &hierarchy));
    }

    #[test]
    fn unmarked_method_is_not_a_mapping_method() {
        let unit = unit(
            "public static class Mappers\n\
             {\n\
             public static string Map() { return \"x\"; }\n\
             }\n",
        );
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        assert!(!is_mapping_method(only_method(&unit), &hierarchy));
    }

    #[test]
    fn attribute_subclass_also_marks() {
        let unit = unit(
            "public class AuditedMappingAttribute : MappingMethodAttribute { }\n\
             public static class Mappers\n\
             {\n\
             [AuditedMapping]\n\
             public static string Map() { return \"x\"; }\n\
             }\n",
        );
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        assert!(is_mapping_method(only_method(&unit), &hierarchy));
    }

    #[test]
    fn return_type_wins_as_target() {
        let unit = unit(
            "public class Person { }\n\
             public static class Mappers\n\
             {\n\
             [MappingMethod]\n\
             public static Person Map() { return new Person(); }\n\
             }\n",
        );
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        assert_eq!(
            mapping_target_type(only_method(&unit), &hierarchy).as_deref(),
            Some("Person")
        );
    }

    #[test]
    fn single_marked_parameter_is_target() {
        let unit = unit(
            "public class Person { }\n\
             public static class Mappers\n\
             {\n\
             [MappingMethod]\n\
             public static void Map([MappingTarget] Person target) { }\n\
             }\n",
        );
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        assert_eq!(
            mapping_target_type(only_method(&unit), &hierarchy).as_deref(),
            Some("Person")
        );
    }

    #[test]
    fn void_method_without_marked_parameter_has_no_target() {
        let unit = unit(
            "public class Person { }\n\
             public static class Mappers\n\
             {\n\
             [MappingMethod]\n\
             public static void Map(Person target) { }\n\
             }\n",
        );
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        assert_eq!(mapping_target_type(only_method(&unit), &hierarchy), None);
    }

    #[test]
    fn two_marked_parameters_leave_target_undetermined() {
        let unit = unit(
            "public class Person { }\n\
             public static class Mappers\n\
             {\n\
             [MappingMethod]\n\
             public static void Map([MappingTarget] Person a, [MappingTarget] Person b) { }\n\
             }\n",
        );
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        assert_eq!(mapping_target_type(only_method(&unit), &hierarchy), None);
    }

    #[test]
    fn anchor_is_the_marking_attribute() {
        let source = "public static class Mappers\n\
                      {\n\
                      [MappingMethod]\n\
                      public static string Map() { return \"x\"; }\n\
                      }\n";
        let unit = unit(source);
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        let span = anchor_span(only_method(&unit), &hierarchy);
        assert_eq!(&source[span.as_range()], "[MappingMethod]");
    }
}
