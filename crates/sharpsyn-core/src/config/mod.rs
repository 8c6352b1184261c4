//! Configuration for sharpsyn
//!
//! Two layers:
//! - [`ParseOptions`]: the immutable per-parse value (language version and
//!   entry point) handed to the parser
//! - [`ProjectConfig`]: the optional `sharpsyn.toml` project file, found by
//!   [`ConfigLoader`] walking upward from the working directory
//!
//! ## Example Configuration
//!
//! ```toml
//! [parse]
//! language-version = "9"
//! entry = "compilation-unit"
//!
//! [files]
//! include = ["**/*.cs"]
//! exclude = ["**/obj/**", "**/bin/**"]
//!
//! [output]
//! format = "human"
//! ```

mod loader;
mod options;
mod project;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use options::{LanguageVersion, ParseEntry, ParseOptions};
pub use project::{FilesSection, OutputSection, ParseSection, ProjectConfig};
