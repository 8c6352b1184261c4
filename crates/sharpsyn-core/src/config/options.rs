//! Parse options: language version gate and entry point

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SharpsynError;

/// C# language versions, in release order
///
/// The version gates which constructs parse without a
/// `FeatureNotAvailable` diagnostic; the grammar itself is the same for
/// every version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageVersion {
    CSharp1,
    CSharp2,
    CSharp3,
    CSharp4,
    CSharp5,
    CSharp6,
    CSharp7,
    CSharp7_1,
    CSharp7_2,
    CSharp7_3,
    CSharp8,
    CSharp9,
    CSharp10,
    Preview,
}

impl LanguageVersion {
    pub const ALL: [LanguageVersion; 14] = [
        LanguageVersion::CSharp1,
        LanguageVersion::CSharp2,
        LanguageVersion::CSharp3,
        LanguageVersion::CSharp4,
        LanguageVersion::CSharp5,
        LanguageVersion::CSharp6,
        LanguageVersion::CSharp7,
        LanguageVersion::CSharp7_1,
        LanguageVersion::CSharp7_2,
        LanguageVersion::CSharp7_3,
        LanguageVersion::CSharp8,
        LanguageVersion::CSharp9,
        LanguageVersion::CSharp10,
        LanguageVersion::Preview,
    ];

    /// Newest released version
    pub const LATEST: LanguageVersion = LanguageVersion::CSharp10;

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageVersion::CSharp1 => "1.0",
            LanguageVersion::CSharp2 => "2.0",
            LanguageVersion::CSharp3 => "3.0",
            LanguageVersion::CSharp4 => "4.0",
            LanguageVersion::CSharp5 => "5.0",
            LanguageVersion::CSharp6 => "6.0",
            LanguageVersion::CSharp7 => "7.0",
            LanguageVersion::CSharp7_1 => "7.1",
            LanguageVersion::CSharp7_2 => "7.2",
            LanguageVersion::CSharp7_3 => "7.3",
            LanguageVersion::CSharp8 => "8.0",
            LanguageVersion::CSharp9 => "9.0",
            LanguageVersion::CSharp10 => "10.0",
            LanguageVersion::Preview => "preview",
        }
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageVersion {
    type Err = SharpsynError;

    /// Accepts `7.3`, `7`, `csharp9`, `CSharp7_3`, `latest`, `default`,
    /// `preview`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let number = lowered
            .strip_prefix("csharp")
            .unwrap_or(&lowered)
            .replace('_', ".");
        let version = match number.as_str() {
            "latest" | "latestmajor" | "default" => Self::LATEST,
            "preview" => LanguageVersion::Preview,
            "1" | "1.0" => LanguageVersion::CSharp1,
            "2" | "2.0" => LanguageVersion::CSharp2,
            "3" | "3.0" => LanguageVersion::CSharp3,
            "4" | "4.0" => LanguageVersion::CSharp4,
            "5" | "5.0" => LanguageVersion::CSharp5,
            "6" | "6.0" => LanguageVersion::CSharp6,
            "7" | "7.0" => LanguageVersion::CSharp7,
            "7.1" => LanguageVersion::CSharp7_1,
            "7.2" => LanguageVersion::CSharp7_2,
            "7.3" => LanguageVersion::CSharp7_3,
            "8" | "8.0" => LanguageVersion::CSharp8,
            "9" | "9.0" => LanguageVersion::CSharp9,
            "10" | "10.0" => LanguageVersion::CSharp10,
            _ => {
                return Err(SharpsynError::InvalidLanguageVersion {
                    value: s.to_string(),
                });
            }
        };
        Ok(version)
    }
}

impl TryFrom<String> for LanguageVersion {
    type Error = SharpsynError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageVersion> for String {
    fn from(version: LanguageVersion) -> Self {
        version.as_str().to_string()
    }
}

/// Which production the parse starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseEntry {
    #[default]
    CompilationUnit,
    Expression,
    Statement,
    Type,
}

impl ParseEntry {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseEntry::CompilationUnit => "compilation-unit",
            ParseEntry::Expression => "expression",
            ParseEntry::Statement => "statement",
            ParseEntry::Type => "type",
        }
    }
}

impl fmt::Display for ParseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseEntry {
    type Err = SharpsynError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compilation-unit" | "compilationunit" | "unit" | "file" => {
                Ok(ParseEntry::CompilationUnit)
            }
            "expression" | "expr" => Ok(ParseEntry::Expression),
            "statement" | "stmt" => Ok(ParseEntry::Statement),
            "type" => Ok(ParseEntry::Type),
            _ => Err(SharpsynError::invalid_option(
                "entry",
                s,
                "compilation-unit, expression, statement, type",
            )),
        }
    }
}

/// Immutable options for a single parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParseOptions {
    pub language_version: LanguageVersion,
    pub entry: ParseEntry,
}

impl ParseOptions {
    pub fn new(language_version: LanguageVersion) -> Self {
        Self {
            language_version,
            entry: ParseEntry::CompilationUnit,
        }
    }

    pub fn with_language_version(self, language_version: LanguageVersion) -> Self {
        Self {
            language_version,
            ..self
        }
    }

    pub fn with_entry(self, entry: ParseEntry) -> Self {
        Self { entry, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_versions() {
        assert_eq!("7.3".parse::<LanguageVersion>().ok(), Some(LanguageVersion::CSharp7_3));
        assert_eq!("csharp9".parse::<LanguageVersion>().ok(), Some(LanguageVersion::CSharp9));
        assert_eq!("CSharp7_1".parse::<LanguageVersion>().ok(), Some(LanguageVersion::CSharp7_1));
        assert_eq!("latest".parse::<LanguageVersion>().ok(), Some(LanguageVersion::CSharp10));
        assert_eq!("Preview".parse::<LanguageVersion>().ok(), Some(LanguageVersion::Preview));
        assert!("11.5".parse::<LanguageVersion>().is_err());
    }

    #[test]
    fn test_versions_are_ordered() {
        assert!(LanguageVersion::CSharp1 < LanguageVersion::CSharp7_3);
        assert!(LanguageVersion::CSharp10 < LanguageVersion::Preview);
        assert!(LanguageVersion::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for version in LanguageVersion::ALL {
            assert_eq!(version.to_string().parse::<LanguageVersion>().ok(), Some(version));
        }
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!("expression".parse::<ParseEntry>().ok(), Some(ParseEntry::Expression));
        assert_eq!("compilation-unit".parse::<ParseEntry>().ok(), Some(ParseEntry::CompilationUnit));
        assert!("module".parse::<ParseEntry>().is_err());
    }

    #[test]
    fn test_options_builders() {
        let options = ParseOptions::default()
            .with_language_version(LanguageVersion::CSharp8)
            .with_entry(ParseEntry::Statement);
        assert_eq!(options.language_version, LanguageVersion::CSharp8);
        assert_eq!(options.entry, ParseEntry::Statement);
        assert_eq!(ParseOptions::default().language_version, LanguageVersion::LATEST);
    }
}
