// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! The set of target properties a mapping method must write.
//!
//! Properties are identified by name plus the most-base class in the
//! inheritance chain that declares the name, so an override and the
//! declaration it overrides count as one property. Only publicly settable
//! instance properties participate; read-only and restricted-setter
//! properties are never required.

use std::collections::HashSet;

use ecow::EcoString;

use crate::semantic_analysis::ClassHierarchy;

/// Identity of a target property across the inheritance chain.
///
/// `root_class` is the most-base declarer of the name, so an assignment
/// through a base-typed reference matches the same key as one through the
/// derived type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey {
    /// The property name.
    pub name: EcoString,
    /// The most-base class declaring a property of this name.
    pub root_class: EcoString,
}

impl PropertyKey {
    /// Builds the key for `property_name` as seen from `type_name`.
    ///
    /// Returns `None` when no class in the chain declares the name.
    #[must_use]
    pub fn resolve(
        hierarchy: &ClassHierarchy,
        type_name: &str,
        property_name: &str,
    ) -> Option<Self> {
        let root_class = hierarchy.root_declaring_class(type_name, property_name)?;
        Some(Self {
            name: property_name.into(),
            root_class,
        })
    }
}

/// Collects the publicly settable properties of `type_name` and its bases.
///
/// The walk runs most-derived first, so when a name appears several times
/// in the chain (an override) the most-derived declaration decides whether
/// the property participates. Each name yields at most one key.
#[must_use]
pub fn target_property_set(hierarchy: &ClassHierarchy, type_name: &str) -> Vec<PropertyKey> {
    let mut seen: HashSet<PropertyKey> = HashSet::new();
    let mut targets = Vec::new();
    for class in hierarchy.base_chain(type_name) {
        for property in &class.properties {
            let Some(key) = PropertyKey::resolve(hierarchy, type_name, &property.name) else {
                continue;
            };
            if !seen.insert(key.clone()) {
                continue;
            }
            if !property.is_publicly_settable {
                continue;
            }
            targets.push(key);
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{lex_with_eof, parse};

    fn hierarchy(source: &str) -> ClassHierarchy {
        let (unit, diagnostics) = parse(lex_with_eof(source));
        assert!(diagnostics.is_empty(), "parse diagnostics: {diagnostics:?}");
        let (hierarchy, _) = ClassHierarchy::build(&unit);
        hierarchy
    }

    fn names(targets: &[PropertyKey]) -> Vec<&str> {
        let mut names: Vec<&str> = targets.iter().map(|key| key.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn collects_publicly_settable_properties() {
        let hierarchy = hierarchy(
            "public class Person\n\
             {\n\
             public string FirstName { get; set; }\n\
             public string LastName { get; set; }\n\
             }\n",
        );
        let targets = target_property_set(&hierarchy, "Person");
        assert_eq!(names(&targets), vec!["FirstName", "LastName"]);
    }

    #[test]
    fn read_only_and_restricted_setters_are_skipped() {
        let hierarchy = hierarchy(
            "public class Person\n\
             {\n\
             public string FirstName { get; set; }\n\
             public string FullName { get; }\n\
             public string Token { get; private set; }\n\
             internal string Internal { get; set; }\n\
             }\n",
        );
        let targets = target_property_set(&hierarchy, "Person");
        assert_eq!(names(&targets), vec!["FirstName"]);
    }

    #[test]
    fn base_class_properties_are_included() {
        let hierarchy = hierarchy(
            "public class PersonBase\n\
             {\n\
             public string LastName { get; set; }\n\
             }\n\
             public class Person : PersonBase\n\
             {\n\
             public string FirstName { get; set; }\n\
             }\n",
        );
        let targets = target_property_set(&hierarchy, "Person");
        assert_eq!(names(&targets), vec!["FirstName", "LastName"]);
    }

    #[test]
    fn override_and_base_declaration_collapse_to_one_key() {
        let hierarchy = hierarchy(
            "public class PersonBase\n\
             {\n\
             public virtual string LastName { get; set; }\n\
             }\n\
             public class Person : PersonBase\n\
             {\n\
             public override string LastName { get; set; }\n\
             }\n",
        );
        let targets = target_property_set(&hierarchy, "Person");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].root_class, "PersonBase");
    }

    #[test]
    fn key_through_base_reference_matches_key_through_derived() {
        let hierarchy = hierarchy(
            "public class PersonBase\n\
             {\n\
             public virtual string LastName { get; set; }\n\
             }\n\
             public class Person : PersonBase\n\
             {\n\
             public override string LastName { get; set; }\n\
             }\n",
        );
        let via_derived = PropertyKey::resolve(&hierarchy, "Person", "LastName");
        let via_base = PropertyKey::resolve(&hierarchy, "PersonBase", "LastName");
        assert_eq!(via_derived, via_base);
        assert!(via_derived.is_some());
    }

    #[test]
    fn unknown_type_yields_no_targets() {
        let hierarchy = hierarchy("public class Person { }\n");
        assert!(target_property_set(&hierarchy, "Missing").is_empty());
    }
}
