//! Sharpsyn Core
//!
//! Lossless, error-tolerant parser for C# source text.
//! This crate provides the lexer, the recursive-descent parser producing a
//! Rowan concrete syntax tree, diagnostics, and configuration shared by the
//! command-line tool.

pub mod config;
pub mod console; // Terminal console utilities for rich output
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod parser;
pub mod result;

// Configuration system
pub use config::{
    ConfigLoader, FilesSection, LanguageVersion, OutputSection, ParseEntry, ParseOptions,
    ParseSection, ProjectConfig,
};
// Console utilities for rich terminal output
pub use console::{Color, Console};
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken, debug_tree};
pub use diagnostics::{
    Diagnostic, DiagnosticRecord, DiagnosticRenderer, ErrorCode, LineIndex, OutputFormat,
    Severity, Span,
};
pub use error::{ErrorKind, SharpsynError};
pub use features::Feature;
pub use parser::{
    CSharpParser, Parse, SourceParser, parse, parse_compilation_unit, parse_expression,
    parse_statement, parse_type,
};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sharpsyn=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
