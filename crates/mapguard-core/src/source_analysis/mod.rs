// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for the analyzed C#-style source subset.
//!
//! This module contains the lexer, parser, spans, and the [`Diagnostic`]
//! type shared with the mapping analysis.
//!
//! # Lexical analysis
//!
//! [`Lexer`] converts source text into [`Token`]s; every token carries a
//! [`Span`]. The lexer recovers from bad input by emitting
//! [`TokenKind::Error`] tokens instead of stopping.
//!
//! ```
//! use mapguard_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("new Person()").collect();
//! assert_eq!(tokens.len(), 4); // new, Person, (, )
//! ```
//!
//! # Parsing
//!
//! [`parse`] converts tokens into a [`CompilationUnit`](crate::ast::CompilationUnit)
//! plus any parse diagnostics. Syntax errors produce error-recovery AST
//! nodes so the mapping analysis can still run over the rest of the file.

mod lexer;
mod parser;
mod span;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use lexer::{lex, lex_with_eof, Lexer};
pub use parser::{parse, Diagnostic, DiagnosticCode, Severity};
pub use span::Span;
pub use token::{Token, TokenKind};
