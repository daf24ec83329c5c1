// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Static class hierarchy for the analyzed compilation unit.
//!
//! The hierarchy gives the mapping analysis compile-time knowledge of every
//! class in the unit plus the built-in marker attribute types: base-chain
//! walking, attribute-class resolution, and property/method lookup through
//! inheritance. It is rebuilt per compilation unit and never cached across
//! analyses.

use std::collections::{HashMap, HashSet};

use ecow::EcoString;

use crate::ast::{ClassDecl, CompilationUnit, Member, MethodDecl, PropertyDecl};
use crate::source_analysis::Diagnostic;

mod builtins;
pub mod types;

pub use builtins::{
    MAPPING_METHOD_ATTRIBUTE, MAPPING_TARGET_ATTRIBUTE, UNMAPPED_PROPERTIES_ATTRIBUTE,
    UNMAPPED_PROPERTY_ATTRIBUTE,
};
pub use types::TypeResolver;

/// Information about a property in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Property name.
    pub name: EcoString,
    /// Declared type name.
    pub ty: EcoString,
    /// Class that declares this property.
    pub declared_in: EcoString,
    /// Whether the declaration carries the `override` modifier.
    pub is_override: bool,
    /// Whether the property is public with a public setter.
    pub is_publicly_settable: bool,
}

/// Information about a method in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    /// Method name.
    pub name: EcoString,
    /// Class that declares this method.
    pub declared_in: EcoString,
    /// Whether the method is static.
    pub is_static: bool,
    /// Return type name; `None` for `void`.
    pub return_type: Option<EcoString>,
}

/// Information about a class in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Class name.
    pub name: EcoString,
    /// Base class name, if any.
    pub base: Option<EcoString>,
    /// Properties declared directly on this class.
    pub properties: Vec<PropertyInfo>,
    /// Methods declared directly on this class.
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    /// A builtin class with no members.
    fn builtin(name: &str, base: Option<&str>) -> Self {
        Self {
            name: name.into(),
            base: base.map(EcoString::from),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// Static class hierarchy built from built-ins plus one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHierarchy {
    classes: HashMap<EcoString, ClassInfo>,
}

impl ClassHierarchy {
    /// Builds a hierarchy from the built-in classes and a parsed unit.
    ///
    /// Returns the hierarchy and any diagnostics (duplicate class names).
    #[must_use]
    pub fn build(unit: &CompilationUnit) -> (Self, Vec<Diagnostic>) {
        let mut hierarchy = Self {
            classes: builtins::builtin_classes(),
        };
        let mut diagnostics = Vec::new();
        for class in &unit.classes {
            if hierarchy.classes.contains_key(&class.name.name) {
                let message = if Self::is_builtin_class(&class.name.name) {
                    format!("Class {} conflicts with a built-in type", class.name.name)
                } else {
                    format!("Class {} is declared more than once", class.name.name)
                };
                diagnostics.push(Diagnostic::warning(message, class.name.span));
                continue;
            }
            let info = Self::class_info(class);
            hierarchy.classes.insert(info.name.clone(), info);
        }
        (hierarchy, diagnostics)
    }

    fn class_info(class: &ClassDecl) -> ClassInfo {
        let mut properties = Vec::new();
        let mut methods = Vec::new();
        for member in &class.members {
            match member {
                Member::Property(property) => {
                    properties.push(Self::property_info(class, property));
                }
                Member::Method(method) => {
                    methods.push(Self::method_info(class, method));
                }
            }
        }
        ClassInfo {
            name: class.name.name.clone(),
            base: class.base.as_ref().map(|b| b.name.clone()),
            properties,
            methods,
        }
    }

    fn property_info(class: &ClassDecl, property: &PropertyDecl) -> PropertyInfo {
        PropertyInfo {
            name: property.name.name.clone(),
            ty: property.ty.name.clone(),
            declared_in: class.name.name.clone(),
            is_override: property.modifiers.is_override,
            is_publicly_settable: property.is_publicly_settable(),
        }
    }

    fn method_info(class: &ClassDecl, method: &MethodDecl) -> MethodInfo {
        MethodInfo {
            name: method.name.name.clone(),
            declared_in: class.name.name.clone(),
            is_static: method.modifiers.is_static,
            return_type: method.return_type.as_ref().map(|t| t.name.clone()),
        }
    }

    /// Looks up a class by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    /// Returns `true` if `name` names a known class.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// The base chain of `name`, starting at the class itself and walking
    /// towards the root. Unknown base names end the chain; inheritance
    /// cycles are broken rather than looped.
    #[must_use]
    pub fn base_chain(&self, name: &str) -> Vec<&ClassInfo> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.get(name);
        while let Some(class) = current {
            if !visited.insert(class.name.clone()) {
                break;
            }
            chain.push(class);
            current = class.base.as_deref().and_then(|base| self.get(base));
        }
        chain
    }

    /// Returns `true` if `name` is `ancestor` or inherits from it.
    #[must_use]
    pub fn inherits_from_or_equals(&self, name: &str, ancestor: &str) -> bool {
        self.base_chain(name)
            .iter()
            .any(|class| class.name == ancestor)
    }

    /// Resolves an attribute name as written to its attribute class.
    ///
    /// `[MappingMethod]` may refer to a class named `MappingMethod` or, by
    /// convention, `MappingMethodAttribute`.
    #[must_use]
    pub fn resolve_attribute_class(&self, written_name: &str) -> Option<&ClassInfo> {
        if let Some(class) = self.get(written_name) {
            return Some(class);
        }
        let mut suffixed = String::with_capacity(written_name.len() + 9);
        suffixed.push_str(written_name);
        suffixed.push_str("Attribute");
        self.get(&suffixed)
    }

    /// Finds a property by name, searching the base chain from the most
    /// derived class upwards. Returns the first (most derived) declaration.
    #[must_use]
    pub fn find_property(&self, type_name: &str, property_name: &str) -> Option<&PropertyInfo> {
        self.base_chain(type_name).iter().find_map(|class| {
            class
                .properties
                .iter()
                .find(|property| property.name == property_name)
        })
    }

    /// The root declaring class of a property: the most-base class in the
    /// chain of `type_name` that declares a property with this name.
    ///
    /// An override and the base declaration it overrides share a root, so
    /// a (name, root) pair identifies one logical property slot.
    #[must_use]
    pub fn root_declaring_class(&self, type_name: &str, property_name: &str) -> Option<EcoString> {
        self.base_chain(type_name)
            .iter()
            .filter(|class| {
                class
                    .properties
                    .iter()
                    .any(|property| property.name == property_name)
            })
            .next_back()
            .map(|class| class.name.clone())
    }

    /// Finds a method by name, searching the base chain from the most
    /// derived class upwards.
    #[must_use]
    pub fn find_method(&self, type_name: &str, method_name: &str) -> Option<&MethodInfo> {
        self.base_chain(type_name)
            .iter()
            .find_map(|class| class.methods.iter().find(|method| method.name == method_name))
    }
}
