//! Project configuration file (`sharpsyn.toml`)

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::options::{LanguageVersion, ParseEntry, ParseOptions};
use crate::error::SharpsynError;
use crate::result::Result;

/// Top-level configuration file contents
///
/// Every section is optional; missing sections and fields fall back to
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub parse: ParseSection,
    #[serde(default)]
    pub files: FilesSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// `[parse]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParseSection {
    pub language_version: Option<LanguageVersion>,
    pub entry: Option<ParseEntry>,
}

/// `[files]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FilesSection {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            include: vec!["**/*.cs".to_string()],
            exclude: vec!["**/bin/**".to_string(), "**/obj/**".to_string()],
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputSection {
    pub format: Option<String>,
}

impl ProjectConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| SharpsynError::TomlError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| SharpsynError::io_error(path, e))?;
        Self::from_toml(&text, path)
    }

    /// Default configuration rendered as TOML, used by `config init`
    pub fn default_toml() -> String {
        let config = ProjectConfig {
            parse: ParseSection {
                language_version: Some(LanguageVersion::LATEST),
                entry: Some(ParseEntry::CompilationUnit),
            },
            files: FilesSection::default(),
            output: OutputSection {
                format: Some("human".to_string()),
            },
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Parse options described by the `[parse]` section
    pub fn parse_options(&self) -> ParseOptions {
        let defaults = ParseOptions::default();
        ParseOptions {
            language_version: self
                .parse
                .language_version
                .unwrap_or(defaults.language_version),
            entry: self.parse.entry.unwrap_or(defaults.entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let text = r#"
[parse]
language-version = "9"
entry = "statement"

[files]
include = ["src/**/*.cs"]
exclude = []

[output]
format = "json"
"#;
        let config = ProjectConfig::from_toml(text, Path::new("sharpsyn.toml")).unwrap();
        let options = config.parse_options();
        assert_eq!(options.language_version, LanguageVersion::CSharp9);
        assert_eq!(options.entry, ParseEntry::Statement);
        assert_eq!(config.files.include, vec!["src/**/*.cs".to_string()]);
        assert!(config.files.exclude.is_empty());
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = ProjectConfig::from_toml("", Path::new("sharpsyn.toml")).unwrap();
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert_eq!(config.files, FilesSection::default());
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        let text = "[parse]\nlanguage-version = \"42\"\n";
        let err = ProjectConfig::from_toml(text, Path::new("sharpsyn.toml")).unwrap_err();
        assert!(err.to_string().contains("sharpsyn.toml"));
    }

    #[test]
    fn test_default_toml_parses_back() {
        let text = ProjectConfig::default_toml();
        let config = ProjectConfig::from_toml(&text, Path::new("sharpsyn.toml")).unwrap();
        assert_eq!(config.parse.language_version, Some(LanguageVersion::LATEST));
        assert_eq!(config.output.format.as_deref(), Some("human"));
    }
}
