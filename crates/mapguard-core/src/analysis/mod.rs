// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Analysis passes over a parsed compilation unit.
//!
//! Passes run after the class hierarchy has been built and report findings
//! as [`Diagnostic`]s with a stable diagnostic code. Today there is a single
//! pass, mapping completeness, but the registry keeps the shape open:
//!
//! 1. Create `crates/mapguard-core/src/analysis/<your_pass>.rs`.
//! 2. Declare `pub(crate) struct YourPass;` implementing [`AnalysisPass`].
//! 3. Add `mod your_pass;` below (keep alphabetical).
//! 4. Push `Box::new(your_pass::YourPass)` into `all_passes()`.

pub mod assignments;
pub mod detection;
pub mod exclusions;
mod mapping;
pub mod properties;

use crate::ast::CompilationUnit;
use crate::semantic_analysis::ClassHierarchy;
use crate::source_analysis::Diagnostic;

/// A single analysis pass.
///
/// Implementors inspect `unit` against the resolved `hierarchy` and push
/// their findings into `diagnostics`.
pub(crate) trait AnalysisPass {
    fn check(
        &self,
        unit: &CompilationUnit,
        hierarchy: &ClassHierarchy,
        diagnostics: &mut Vec<Diagnostic>,
    );
}

/// Construct the ordered list of all active analysis passes.
fn all_passes() -> Vec<Box<dyn AnalysisPass>> {
    vec![Box::new(mapping::MappingCompletenessPass)]
}

/// Build the class hierarchy for `unit` and run every analysis pass on it.
///
/// Hierarchy construction warnings (for example duplicate class names)
/// precede pass findings in the returned list; within a pass, findings are
/// emitted in a deterministic order so repeated runs over the same source
/// produce identical output.
#[must_use]
pub fn run_analysis(unit: &CompilationUnit) -> Vec<Diagnostic> {
    let (hierarchy, mut diagnostics) = ClassHierarchy::build(unit);
    for pass in all_passes() {
        pass.check(unit, &hierarchy, &mut diagnostics);
    }
    diagnostics
}
