// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! `mapguard check`: analyze mapping methods in source files.
//!
//! The command parses each `.cs` file, runs the analysis passes, and reports
//! every diagnostic: parse errors, hierarchy warnings, and the coded mapping
//! findings (MMG0001, MMG1001). It exits non-zero if any error-severity
//! diagnostic is found.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use mapguard_core::analysis::run_analysis;
use mapguard_core::source_analysis::{Severity, lex_with_eof, parse};
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::diagnostic::AnalysisDiagnostic;

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output via miette (default).
    #[default]
    Text,
    /// Machine-readable JSON (one object per line).
    Json,
}

/// Run the mapping analysis on the given path (file or directory).
///
/// Prints each diagnostic and returns an error if any have error severity.
pub fn run_check(path: &str, format: OutputFormat) -> Result<()> {
    let source_path = Utf8PathBuf::from(path);

    let source_files = if source_path.is_file() {
        if source_path.extension() == Some("cs") {
            vec![source_path.clone()]
        } else {
            miette::bail!("File '{}' is not a .cs source file", path);
        }
    } else if source_path.is_dir() {
        collect_source_files_from_dir(&source_path)?
    } else {
        miette::bail!("Path '{}' does not exist", path);
    };

    if source_files.is_empty() {
        miette::bail!("No .cs source files found in '{path}'");
    }
    tracing::debug!(files = source_files.len(), "collected source files");

    let mut error_count = 0usize;

    for file in &source_files {
        let source = fs::read_to_string(file)
            .into_diagnostic()
            .map_err(|e| miette::miette!("Failed to read '{}': {e}", file))?;

        let tokens = lex_with_eof(&source);
        let (unit, mut diagnostics) = parse(tokens);
        diagnostics.extend(run_analysis(&unit));

        for diag in &diagnostics {
            match format {
                OutputFormat::Text => {
                    let report =
                        AnalysisDiagnostic::from_core_diagnostic(diag, file.as_str(), &source);
                    eprintln!("{:?}", miette::Report::new(report));
                }
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "file": file.as_str(),
                        "severity": match diag.severity {
                            Severity::Error => "error",
                            Severity::Warning => "warning",
                        },
                        "code": diag.code.map(|code| code.as_str()),
                        "message": diag.message.as_str(),
                        "span_start": diag.span.start(),
                        "span_end": diag.span.end(),
                        "hint": diag.hint.as_deref(),
                    });
                    println!("{json}");
                }
            }
        }

        error_count += diagnostics
            .iter()
            .filter(|diag| diag.severity == Severity::Error)
            .count();
    }

    if error_count > 0 {
        let files_checked = source_files.len();
        let plural = if error_count == 1 { "" } else { "s" };
        miette::bail!("{error_count} error{plural} found in {files_checked} file(s)");
    }

    Ok(())
}

/// Collect all `.cs` files under `dir`, recursively.
pub fn collect_source_files_from_dir(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    collect_cs_files_recursive(dir, &mut files)?;
    files.sort_unstable();
    Ok(files)
}

/// Recursively collect all `.cs` files from a directory tree.
///
/// Symlinks are skipped to avoid potential infinite recursion from circular
/// links.
fn collect_cs_files_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_cs_files_recursive(&entry_path, files)?;
        } else if file_type.is_file() && entry_path.extension() == Some("cs") {
            files.push(entry_path);
        }
    }
    Ok(())
}
