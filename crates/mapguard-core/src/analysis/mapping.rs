// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! The mapping completeness pass.
//!
//! For every mapping method the pass resolves the target type, collects the
//! publicly settable target properties, subtracts the properties the body
//! assigns and the names the exclusion attributes declare, and reports what
//! is left. All findings anchor to the marking attribute so the report
//! points at the mapping declaration, not at an arbitrary statement.

use crate::ast::{ClassDecl, CompilationUnit, MethodDecl};
use crate::semantic_analysis::ClassHierarchy;
use crate::source_analysis::{Diagnostic, DiagnosticCode};

use super::AnalysisPass;
use super::assignments::collect_mapped_properties;
use super::detection::{anchor_span, is_mapping_method, mapping_target_type};
use super::exclusions::excluded_property_names;
use super::properties::target_property_set;

/// Message for a mapping method whose target type cannot be determined.
pub const MISSING_TARGET_MESSAGE: &str = "Unable to determine target type of mapping. \
     Ensure that this method either returns a value or has a single parameter decorated \
     with MappingTargetAttribute.";

pub(crate) struct MappingCompletenessPass;

impl AnalysisPass for MappingCompletenessPass {
    fn check(
        &self,
        unit: &CompilationUnit,
        hierarchy: &ClassHierarchy,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for class in &unit.classes {
            for method in class.methods() {
                check_method(unit, hierarchy, class, method, diagnostics);
            }
        }
    }
}

fn check_method(
    unit: &CompilationUnit,
    hierarchy: &ClassHierarchy,
    class: &ClassDecl,
    method: &MethodDecl,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if !is_mapping_method(method, hierarchy) {
        return;
    }
    let anchor = anchor_span(method, hierarchy);

    let Some(target_type) = mapping_target_type(method, hierarchy) else {
        diagnostics.push(Diagnostic::analysis(
            DiagnosticCode::MissingMappingTargetType,
            MISSING_TARGET_MESSAGE,
            anchor,
        ));
        return;
    };

    let mapped = collect_mapped_properties(hierarchy, &class.name.name, method);
    let excluded = excluded_property_names(unit, hierarchy, method);

    let mut unmapped: Vec<_> = target_property_set(hierarchy, &target_type)
        .into_iter()
        .filter(|key| !mapped.contains(key))
        .filter(|key| !excluded.contains(&key.name))
        .map(|key| key.name)
        .collect();
    unmapped.sort_unstable();

    for name in unmapped {
        diagnostics.push(Diagnostic::analysis(
            DiagnosticCode::UnmappedProperty,
            format!("Property {name} is not mapped."),
            anchor,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_analysis;
    use crate::source_analysis::{Severity, lex_with_eof, parse};

    fn analyze(source: &str) -> Vec<Diagnostic> {
        let tokens = lex_with_eof(source);
        let (unit, diagnostics) = parse(tokens);
        assert!(diagnostics.is_empty(), "parse diagnostics: {diagnostics:?}");
        run_analysis(&unit)
    }

    /// Formats coded findings as `MMG1001: Property LastName is not mapped.`
    fn findings(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics
            .iter()
            .filter_map(|diagnostic| {
                diagnostic
                    .code
                    .map(|code| format!("{}: {}", code.as_str(), diagnostic.message))
            })
            .collect()
    }

    fn assert_unmapped(diagnostics: &[Diagnostic], names: &[&str]) {
        let expected: Vec<String> = names
            .iter()
            .map(|name| format!("MMG1001: Property {name} is not mapped."))
            .collect();
        assert_eq!(findings(diagnostics), expected);
    }

    const PERSON: &str = "public class Person\n\
                          {\n\
                          public string FirstName { get; set; }\n\
                          public string LastName { get; set; }\n\
                          }\n";

    #[test]
    fn missing_target_type_is_reported_once() {
        let diagnostics = analyze(
            "public static class Mappers\n\
             {\n\
             [MappingMethod]\n\
             public static void Map() { }\n\
             }\n",
        );
        assert_eq!(
            findings(&diagnostics),
            vec![format!("MMG0001: {MISSING_TARGET_MESSAGE}")]
        );
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn missing_target_suppresses_property_findings() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             public static void Map(Person target) {{ }}\n\
             }}\n"
        );
        let diagnostics = analyze(&source);
        assert_eq!(
            findings(&diagnostics),
            vec![format!("MMG0001: {MISSING_TARGET_MESSAGE}")]
        );
    }

    #[test]
    fn partially_assigned_target_reports_the_rest() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             public static Person Map()\n\
             {{\n\
             var person = new Person();\n\
             person.FirstName = \"Ann\";\n\
             return person;\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &["LastName"]);
    }

    #[test]
    fn fully_initialized_target_is_clean() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\", LastName = \"Lee\" }};\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &[]);
    }

    #[test]
    fn base_class_property_must_be_mapped() {
        let source = "public class PersonBase\n\
                      {\n\
                      public string LastName { get; set; }\n\
                      }\n\
                      public class Person : PersonBase\n\
                      {\n\
                      public string FirstName { get; set; }\n\
                      }\n\
                      public static class Mappers\n\
                      {\n\
                      [MappingMethod]\n\
                      public static Person Map()\n\
                      {\n\
                      return new Person { FirstName = \"Ann\" };\n\
                      }\n\
                      }\n";
        assert_unmapped(&analyze(source), &["LastName"]);
    }

    #[test]
    fn assignment_through_base_cast_satisfies_override() {
        let source = "public class PersonBase\n\
                      {\n\
                      public virtual string LastName { get; set; }\n\
                      }\n\
                      public class Person : PersonBase\n\
                      {\n\
                      public override string LastName { get; set; }\n\
                      }\n\
                      public static class Mappers\n\
                      {\n\
                      [MappingMethod]\n\
                      public static void Map([MappingTarget] Person target)\n\
                      {\n\
                      ((PersonBase) target).LastName = \"Lee\";\n\
                      }\n\
                      }\n";
        assert_unmapped(&analyze(source), &[]);
    }

    #[test]
    fn mapping_target_parameter_is_analyzed() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             public static void Map([MappingTarget] Person target)\n\
             {{\n\
             target.FirstName = \"Ann\";\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &["LastName"]);
    }

    #[test]
    fn assignment_in_branch_counts_as_mapped() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             public static void Map([MappingTarget] Person target, bool flag)\n\
             {{\n\
             target.FirstName = \"Ann\";\n\
             if (flag)\n\
             {{\n\
             target.LastName = \"Lee\";\n\
             }}\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &[]);
    }

    #[test]
    fn read_only_properties_are_not_required() {
        let source = "public class Person\n\
                      {\n\
                      public string FirstName { get; set; }\n\
                      public string FullName { get; }\n\
                      public string Token { get; private set; }\n\
                      }\n\
                      public static class Mappers\n\
                      {\n\
                      [MappingMethod]\n\
                      public static Person Map()\n\
                      {\n\
                      return new Person { FirstName = \"Ann\" };\n\
                      }\n\
                      }\n";
        assert_unmapped(&analyze(source), &[]);
    }

    #[test]
    fn literal_exclusion_suppresses_finding() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             [UnmappedProperties(\"LastName\")]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\" }};\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &[]);
    }

    #[test]
    fn single_name_exclusion_attribute_works() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             [UnmappedProperty(\"LastName\")]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\" }};\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &[]);
    }

    #[test]
    fn computed_exclusion_suppresses_finding() {
        let source = format!(
            "{PERSON}\
             public static class Names\n\
             {{\n\
             public static string[] Excluded() {{ return new[] {{ \"Last\" + \"Name\" }}; }}\n\
             }}\n\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             [UnmappedProperties(Names.Excluded())]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\" }};\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &[]);
    }

    #[test]
    fn unevaluable_exclusion_degrades_to_reporting() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             [UnmappedProperties(Names.Missing())]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\" }};\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &["LastName"]);
    }

    #[test]
    fn exclusion_of_unknown_name_is_harmless() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             [UnmappedProperties(\"NoSuchProperty\")]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\", LastName = \"Lee\" }};\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &[]);
    }

    #[test]
    fn findings_are_sorted_by_property_name() {
        let source = "public class Record\n\
                      {\n\
                      public string Zeta { get; set; }\n\
                      public string Alpha { get; set; }\n\
                      public string Mid { get; set; }\n\
                      }\n\
                      public static class Mappers\n\
                      {\n\
                      [MappingMethod]\n\
                      public static Record Map()\n\
                      {\n\
                      return new Record();\n\
                      }\n\
                      }\n";
        assert_unmapped(&analyze(source), &["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn analysis_is_deterministic() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             public static Person Map()\n\
             {{\n\
             return new Person();\n\
             }}\n\
             }}\n"
        );
        let first = analyze(&source);
        let second = analyze(&source);
        assert_eq!(first, second);
    }

    #[test]
    fn findings_anchor_to_the_marking_attribute() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             [MappingMethod]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\" }};\n\
             }}\n\
             }}\n"
        );
        let diagnostics = analyze(&source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&source[diagnostics[0].span.as_range()], "[MappingMethod]");
    }

    #[test]
    fn unmarked_methods_are_ignored() {
        let source = format!(
            "{PERSON}\
             public static class Mappers\n\
             {{\n\
             public static Person Map()\n\
             {{\n\
             return new Person();\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &[]);
    }

    #[test]
    fn attribute_subclass_marks_a_mapping_method() {
        let source = format!(
            "{PERSON}\
             public class AuditedMappingAttribute : MappingMethodAttribute {{ }}\n\
             public static class Mappers\n\
             {{\n\
             [AuditedMapping]\n\
             public static Person Map()\n\
             {{\n\
             return new Person {{ FirstName = \"Ann\" }};\n\
             }}\n\
             }}\n"
        );
        assert_unmapped(&analyze(&source), &["LastName"]);
    }
}
