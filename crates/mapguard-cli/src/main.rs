// Copyright 2026 Mapguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Mapguard command-line interface.
//!
//! This is the main entry point for the `mapguard` command.

use clap::{Parser, Subcommand};
use miette::Result;

mod commands;
mod diagnostic;

use commands::check::OutputFormat;

/// Mapguard: completeness analysis for hand-written mapping methods
#[derive(Debug, Parser)]
#[command(name = "mapguard")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze source files and report unmapped target properties
    Check {
        /// Source file or directory to analyze
        #[arg(default_value = ".")]
        path: String,

        /// Output format for diagnostics
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    init_tracing();

    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check { path, format } => commands::check::run_check(&path, format),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

/// Route `tracing` events to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}
