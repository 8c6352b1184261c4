//! sharpsyn CLI
//!
//! Command-line interface for the sharpsyn C# parser

mod commands; // parse, tree, check, config
mod discovery;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use sharpsyn_core::{LanguageVersion, OutputFormat, ParseEntry, init_tracing};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "sharpsyn")]
#[command(about = "sharpsyn: lossless, error-tolerant C# parser")]
#[command(version = sharpsyn_core::VERSION)]
#[command(
    long_about = "sharpsyn parses C# source into a full-fidelity syntax tree and reports\n\
syntax diagnostics without ever giving up on malformed input.\n\
\n\
Examples:\n  \
sharpsyn parse                    # Parse every .cs file under the current directory\n  \
sharpsyn parse --lang-version 7.3 src/\n  \
sharpsyn tree Program.cs          # Dump the syntax tree of one file\n  \
sharpsyn check .                  # Verify lossless round-trip\n  \
sharpsyn config init              # Write a default sharpsyn.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (sharpsyn.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

/// Parse options shared by the commands that parse files
#[derive(clap::Args, Clone, Debug, Default)]
struct ParseArgs {
    /// Language version gate
    #[arg(long, help = "Language version (e.g. 7.3, 9, latest, preview)")]
    lang_version: Option<LanguageVersion>,

    /// Production to start parsing from
    #[arg(long, help = "Entry point: compilation-unit, expression, statement, type")]
    entry: Option<ParseEntry>,
}

/// File selection shared by the commands that walk directories
#[derive(clap::Args, Clone, Debug, Default)]
struct FileArgs {
    /// Files or directories to process
    #[arg(help = "Files or directories to process (default: current directory)")]
    paths: Vec<PathBuf>,

    /// Include patterns (glob syntax)
    #[arg(
        long,
        help = "Include files matching pattern (can be used multiple times)"
    )]
    include: Vec<String>,

    /// Exclude patterns (glob syntax)
    #[arg(
        long,
        help = "Exclude files matching pattern (can be used multiple times)"
    )]
    exclude: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse C# files and report syntax diagnostics
    Parse {
        #[command(flatten)]
        files: FileArgs,

        #[command(flatten)]
        parse: ParseArgs,

        /// Output format
        #[arg(short, long, help = "Output format: human, json, compact")]
        format: Option<OutputFormat>,
    },

    /// Print the syntax tree of a single file
    Tree {
        /// File to dump
        file: PathBuf,

        #[command(flatten)]
        parse: ParseArgs,

        /// Leave whitespace and comments out of the dump
        #[arg(long, help = "Hide trivia tokens")]
        no_trivia: bool,
    },

    /// Verify that parsing reproduces every file byte for byte
    Check {
        #[command(flatten)]
        files: FileArgs,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Directory to write sharpsyn.toml into
        #[arg(help = "Target directory (default: current directory)")]
        dir: Option<PathBuf>,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Show the configuration that applies to a directory
    Show {
        /// Directory to resolve the configuration for
        dir: Option<PathBuf>,
    },
}

/// Shared settings derived from global flags
pub(crate) struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    if std::env::var_os("RUST_LOG").is_none() {
        let log_level = match cli.verbose {
            0 => "sharpsyn=warn",
            1 => "sharpsyn=info",
            2 => "sharpsyn=debug",
            _ => "sharpsyn=trace",
        };
        // SAFETY: no other threads exist yet
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    init_tracing();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        return ExitCode::from(2);
    }

    match run_command(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Runs the selected command; `Ok(false)` means the input had errors
fn run_command(cli: Cli) -> anyhow::Result<bool> {
    let global = GlobalOptions {
        config: cli.config,
        no_color: cli.no_color,
    };
    match cli.command {
        Some(Commands::Parse {
            files,
            parse,
            format,
        }) => commands::parse_command(&global, files, parse, format),
        Some(Commands::Tree {
            file,
            parse,
            no_trivia,
        }) => commands::tree_command(&global, &file, parse, no_trivia),
        Some(Commands::Check { files, parse }) => commands::check_command(&global, files, parse),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { dir, force } => commands::config::init_command(dir, force),
            ConfigAction::Show { dir } => commands::config::show_command(&global, dir),
        },
        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(true)
        }
    }
}
