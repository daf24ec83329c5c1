// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Mapguard analysis core.
//!
//! This crate contains the analysis pipeline:
//! - Lexical analysis (tokenization)
//! - Parsing (AST construction)
//! - Semantic analysis (class hierarchy, type resolution)
//! - Analysis passes (mapping completeness)
//!
//! The entry point for consumers is [`analysis::run_analysis`], fed with a
//! compilation unit from [`source_analysis::parse`].

#![doc = include_str!("../../../README.md")]

pub mod analysis;
pub mod ast;
pub mod semantic_analysis;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::analysis::run_analysis;
    pub use crate::ast::CompilationUnit;
    pub use crate::source_analysis::{Diagnostic, DiagnosticCode, Severity, Span, lex_with_eof, parse};
}
