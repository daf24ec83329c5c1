// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rich diagnostic rendering using miette.
//!
//! Converts mapguard-core diagnostics into miette-formatted reports with
//! source context, a label pointing at the finding, and the stable
//! diagnostic code (MMG0001, MMG1001) when one exists.

use mapguard_core::source_analysis::{Diagnostic as CoreDiagnostic, Severity};
use miette::{Diagnostic, SourceSpan};

/// An analysis diagnostic with rich formatting.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(mapguard::check))]
pub struct AnalysisDiagnostic {
    /// Message text, prefixed with the stable code when one exists.
    pub message: String,
    /// Source code for context.
    #[source_code]
    pub src: miette::NamedSource<String>,
    /// Location of the finding.
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the span (interpolated by the miette derive macro).
    pub label: String,
    /// Optional fix hint.
    #[help]
    pub hint: Option<String>,
}

impl AnalysisDiagnostic {
    /// Create a renderable diagnostic from a mapguard-core diagnostic.
    pub fn from_core_diagnostic(
        diagnostic: &CoreDiagnostic,
        source_path: &str,
        source: &str,
    ) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
        };
        let message = match diagnostic.code {
            Some(code) => format!("{}: {}", code.as_str(), diagnostic.message),
            None => diagnostic.message.to_string(),
        };

        Self {
            message,
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: (
                diagnostic.span.start() as usize,
                diagnostic.span.len() as usize,
            )
                .into(),
            label: label.to_string(),
            hint: diagnostic.hint.as_ref().map(ToString::to_string),
        }
    }
}
