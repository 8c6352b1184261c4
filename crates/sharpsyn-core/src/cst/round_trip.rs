//! Round-trip validation
//!
//! Checks the two properties every parse must have:
//!
//! 1. **Lossless**: the tree's text is exactly the source text
//! 2. **Stable**: parsing the rendered text again yields the same tree
//!    shape (kinds and ranges of every element) and the same diagnostics
//!
//! # Example
//!
//! ```
//! use sharpsyn_core::ParseOptions;
//! use sharpsyn_core::cst::RoundTripValidator;
//!
//! let validator = RoundTripValidator::new(ParseOptions::default());
//! let result = validator.validate("class C { void M() { if (x) } ");
//! assert!(result.is_valid());
//! assert!(result.diagnostic_count > 0);
//! ```

use rowan::{NodeOrToken, TextRange};
use std::fmt;

use super::{SyntaxKind, SyntaxNode};
use crate::config::ParseOptions;
use crate::parser::{Parse, parse};

/// Outcome of validating one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Source text that was parsed
    pub original: String,
    /// Text of the produced tree
    pub rendered: String,
    /// Diagnostics of the first parse
    pub diagnostic_count: usize,
    pub differences: Vec<Difference>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.differences.is_empty()
    }

    /// One line per difference
    pub fn issues(&self) -> Vec<String> {
        self.differences.iter().map(ToString::to_string).collect()
    }
}

/// One way the round trip failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub kind: DifferenceKind,
    /// Byte offset in the original text
    pub offset: u32,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: expected {}, found {}",
            self.kind, self.offset, self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
    /// Rendered text differs from the source
    Text,
    /// Re-parse produced a different element kind or range
    Structure,
    /// Re-parse produced a different element count
    ElementCount,
    /// Re-parse produced different diagnostics
    Diagnostics,
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DifferenceKind::Text => "text mismatch",
            DifferenceKind::Structure => "structure mismatch",
            DifferenceKind::ElementCount => "element count mismatch",
            DifferenceKind::Diagnostics => "diagnostics mismatch",
        };
        f.write_str(text)
    }
}

/// Validates lossless parsing and re-parse stability
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundTripValidator {
    options: ParseOptions,
}

impl RoundTripValidator {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn validate(&self, text: &str) -> ValidationResult {
        let first = parse(text, self.options);
        self.validate_parse(&first)
    }

    /// Validate an existing parse against a fresh one of its own text
    pub fn validate_parse(&self, first: &Parse) -> ValidationResult {
        let original = first.text().to_string();
        let rendered = first.syntax().text().to_string();
        let mut differences = Vec::new();

        if let Some(offset) = first_mismatch(&original, &rendered) {
            differences.push(Difference {
                kind: DifferenceKind::Text,
                offset,
                expected: excerpt(&original, offset),
                actual: excerpt(&rendered, offset),
            });
        }

        let second = parse(&rendered, self.options);
        if let Some(difference) = compare_shapes(&first.syntax(), &second.syntax()) {
            differences.push(difference);
        }
        if first.diagnostics() != second.diagnostics() {
            differences.push(Difference {
                kind: DifferenceKind::Diagnostics,
                offset: 0,
                expected: format!("{} diagnostics", first.diagnostics().len()),
                actual: format!("{} diagnostics", second.diagnostics().len()),
            });
        }

        if !differences.is_empty() {
            tracing::debug!(count = differences.len(), "round trip differences");
        }
        ValidationResult {
            original,
            rendered,
            diagnostic_count: first.diagnostics().len(),
            differences,
        }
    }
}

fn first_mismatch(expected: &str, actual: &str) -> Option<u32> {
    if expected == actual {
        return None;
    }
    let common = expected
        .bytes()
        .zip(actual.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    Some(common as u32)
}

/// Up to 20 characters from `offset`, escaped for display
fn excerpt(text: &str, offset: u32) -> String {
    let start = (offset as usize).min(text.len());
    let start = (0..=start)
        .rev()
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(0);
    let snippet: String = text[start..].chars().take(20).collect();
    format!("{snippet:?}")
}

fn shape(root: &SyntaxNode) -> Vec<(SyntaxKind, TextRange)> {
    root.preorder_with_tokens()
        .filter_map(|event| match event {
            rowan::WalkEvent::Enter(element) => Some(match element {
                NodeOrToken::Node(node) => (node.kind(), node.text_range()),
                NodeOrToken::Token(token) => (token.kind(), token.text_range()),
            }),
            rowan::WalkEvent::Leave(_) => None,
        })
        .collect()
}

fn compare_shapes(first: &SyntaxNode, second: &SyntaxNode) -> Option<Difference> {
    let (a, b) = (shape(first), shape(second));
    let describe = |(kind, range): &(SyntaxKind, TextRange)| format!("{kind:?}@{range:?}");
    if let Some((expected, actual)) = a.iter().zip(b.iter()).find(|(x, y)| x != y) {
        return Some(Difference {
            kind: DifferenceKind::Structure,
            offset: expected.1.start().into(),
            expected: describe(expected),
            actual: describe(actual),
        });
    }
    (a.len() != b.len()).then(|| Difference {
        kind: DifferenceKind::ElementCount,
        offset: 0,
        expected: a.len().to_string(),
        actual: b.len().to_string(),
    })
}
