// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Built-in class definitions seeded into every [`ClassHierarchy`].
//!
//! These cover the primitive type names the analyzed subset uses and the
//! marker attribute types the mapping analysis recognizes. They are
//! registered before any user-defined classes, so user code can subclass
//! the attribute types (e.g. a project-specific exclusion attribute
//! deriving from `UnmappedPropertiesAttribute`).

use std::collections::HashMap;

use ecow::EcoString;

use super::{ClassHierarchy, ClassInfo};

/// Marker attribute identifying a mapping method.
pub const MAPPING_METHOD_ATTRIBUTE: &str = "MappingMethodAttribute";

/// Marker attribute identifying the target parameter of a `void` mapping
/// method.
pub const MAPPING_TARGET_ATTRIBUTE: &str = "MappingTargetAttribute";

/// Attribute declaring properties that are intentionally left unmapped.
pub const UNMAPPED_PROPERTIES_ATTRIBUTE: &str = "UnmappedPropertiesAttribute";

/// Single-name convenience subclass of [`UNMAPPED_PROPERTIES_ATTRIBUTE`].
pub const UNMAPPED_PROPERTY_ATTRIBUTE: &str = "UnmappedPropertyAttribute";

/// Returns all built-in class definitions, keyed by name.
pub(super) fn builtin_classes() -> HashMap<EcoString, ClassInfo> {
    let definitions = [
        ClassInfo::builtin("object", None),
        ClassInfo::builtin("string", Some("object")),
        ClassInfo::builtin("int", Some("object")),
        ClassInfo::builtin("bool", Some("object")),
        ClassInfo::builtin("Attribute", Some("object")),
        ClassInfo::builtin(MAPPING_METHOD_ATTRIBUTE, Some("Attribute")),
        ClassInfo::builtin(MAPPING_TARGET_ATTRIBUTE, Some("Attribute")),
        ClassInfo::builtin(UNMAPPED_PROPERTIES_ATTRIBUTE, Some("Attribute")),
        ClassInfo::builtin(
            UNMAPPED_PROPERTY_ATTRIBUTE,
            Some(UNMAPPED_PROPERTIES_ATTRIBUTE),
        ),
    ];
    definitions
        .into_iter()
        .map(|class| (class.name.clone(), class))
        .collect()
}

impl ClassHierarchy {
    /// Returns `true` if the given class name is a built-in class.
    #[must_use]
    pub fn is_builtin_class(name: &str) -> bool {
        matches!(
            name,
            "object"
                | "string"
                | "int"
                | "bool"
                | "Attribute"
                | MAPPING_METHOD_ATTRIBUTE
                | MAPPING_TARGET_ATTRIBUTE
                | UNMAPPED_PROPERTIES_ATTRIBUTE
                | UNMAPPED_PROPERTY_ATTRIBUTE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_is_consistent_with_registry() {
        for name in builtin_classes().keys() {
            assert!(
                ClassHierarchy::is_builtin_class(name),
                "{name} missing from is_builtin_class"
            );
        }
    }

    #[test]
    fn attribute_classes_root_in_attribute() {
        let classes = builtin_classes();
        let marker = &classes[MAPPING_METHOD_ATTRIBUTE];
        assert_eq!(marker.base.as_deref(), Some("Attribute"));
        let single = &classes[UNMAPPED_PROPERTY_ATTRIBUTE];
        assert_eq!(single.base.as_deref(), Some(UNMAPPED_PROPERTIES_ATTRIBUTE));
    }
}
