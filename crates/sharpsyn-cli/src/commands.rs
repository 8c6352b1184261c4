//! CLI command implementations
//!
//! - `parse`: discover files, parse them in parallel, report diagnostics
//! - `tree`: dump the syntax tree of one file
//! - `check`: verify lossless round-trip for every file
//! - `config`: configuration file management (in `commands/config.rs`)

pub mod config;

use anyhow::Result;
use rayon::prelude::*;
use sharpsyn_core::cst::{RoundTripValidator, TreePrinter};
use sharpsyn_core::{
    ConfigLoader, OutputFormat, ParseOptions, ProjectConfig, ResultExt, SharpsynError, parse,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::discovery::FileDiscovery;
use crate::output::{FileReport, Reporter, Summary};
use crate::{FileArgs, GlobalOptions, ParseArgs};

/// Parse command implementation
pub fn parse_command(
    global: &GlobalOptions,
    files: FileArgs,
    args: ParseArgs,
    format: Option<OutputFormat>,
) -> Result<bool> {
    let paths = default_paths(files.paths.clone());
    debug!("Running parse command on paths: {:?}", paths);

    let config = load_config(global, config_start(&paths))?;
    let options = resolve_options(&config, &args);
    let format = match format {
        Some(format) => format,
        None => config
            .output
            .format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()?
            .unwrap_or_default(),
    };

    let targets = discovery(&config, &files)?.discover(&paths)?;
    let start_time = Instant::now();
    // unreadable files are logged and skipped; anything else aborts the run
    let reports = targets
        .par_iter()
        .map(|path| -> sharpsyn_core::Result<Option<FileReport>> {
            Ok(read_source(path).recoverable()?.map(|text| FileReport {
                path: path.clone(),
                parse: parse(&text, options),
            }))
        })
        .collect::<sharpsyn_core::Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    let unreadable = targets.len() - reports.len();
    let summary = Summary::from_reports(&reports);
    info!(
        "Parsed {} files in {:?} ({} errors, {} warnings)",
        summary.files,
        start_time.elapsed(),
        summary.errors,
        summary.warnings
    );

    print!("{}", Reporter::new(format, global.no_color).render(&reports, &summary));
    if unreadable > 0 {
        eprintln!("error: {unreadable} of {} files could not be read", targets.len());
    }
    Ok(!summary.has_errors() && unreadable == 0)
}

/// Tree command implementation
pub fn tree_command(
    global: &GlobalOptions,
    file: &Path,
    args: ParseArgs,
    no_trivia: bool,
) -> Result<bool> {
    let config = load_config(global, parent_dir(file))?;
    let options = resolve_options(&config, &args);
    let text = read_source(file)?;
    let parse = parse(&text, options);

    let printer = if no_trivia {
        TreePrinter::new().without_trivia()
    } else {
        TreePrinter::new()
    };
    print!("{}", printer.print(&parse.syntax()));
    Ok(true)
}

/// Check command implementation
pub fn check_command(global: &GlobalOptions, files: FileArgs, args: ParseArgs) -> Result<bool> {
    let paths = default_paths(files.paths.clone());
    let config = load_config(global, config_start(&paths))?;
    let validator = RoundTripValidator::new(resolve_options(&config, &args));
    let targets = discovery(&config, &files)?.discover(&paths)?;

    let results = targets
        .par_iter()
        .map(|path| -> Option<Option<SharpsynError>> {
            let text = read_source(path).log_and_continue()?;
            let result = validator.validate(&text);
            Some((!result.is_valid())
                .then(|| SharpsynError::round_trip_mismatch(path, result.issues().join("; "))))
        })
        .collect::<Vec<_>>();
    let checked = results.iter().flatten().count();
    let failures = results.into_iter().flatten().flatten().collect::<Vec<_>>();

    for failure in &failures {
        eprintln!("error: {failure}");
    }
    println!(
        "{} files checked, {} round-trip mismatches",
        checked,
        failures.len()
    );
    if checked < targets.len() {
        eprintln!(
            "error: {} of {} files could not be read",
            targets.len() - checked,
            targets.len()
        );
    }
    Ok(failures.is_empty() && checked == targets.len())
}

fn default_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

/// Directory to start configuration discovery from
fn config_start(paths: &[PathBuf]) -> &Path {
    match paths.first() {
        Some(path) if path.is_dir() => path,
        Some(path) => parent_dir(path),
        None => Path::new("."),
    }
}

fn parent_dir(file: &Path) -> &Path {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn load_config(global: &GlobalOptions, start: &Path) -> Result<ProjectConfig> {
    let config = ConfigLoader::load(global.config.as_deref(), Some(start))?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Command-line flags override the `[parse]` section
fn resolve_options(config: &ProjectConfig, args: &ParseArgs) -> ParseOptions {
    let mut options = config.parse_options();
    if let Some(version) = args.lang_version {
        options.language_version = version;
    }
    if let Some(entry) = args.entry {
        options.entry = entry;
    }
    options
}

/// Command-line patterns replace the `[files]` section's
fn discovery(config: &ProjectConfig, files: &FileArgs) -> Result<FileDiscovery> {
    let include = if files.include.is_empty() {
        &config.files.include
    } else {
        &files.include
    };
    let exclude = if files.exclude.is_empty() {
        &config.files.exclude
    } else {
        &files.exclude
    };
    FileDiscovery::new(include, exclude)
}

/// File contents, with invalid UTF-8 replaced rather than rejected
fn read_source(path: &Path) -> sharpsyn_core::Result<String> {
    let bytes = std::fs::read(path).map_err(|e| SharpsynError::io_error(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
