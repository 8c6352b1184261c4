//! Diagnostics produced while lexing and parsing
//!
//! A diagnostic is a `(code, severity, span, args)` tuple. The message is
//! derived from the code's template, with `{0}`, `{1}`, ... replaced by the
//! positional arguments. Diagnostics are data: the parser never fails, it
//! accumulates diagnostics in a [`DiagnosticSink`] and returns them next to
//! the tree.

mod renderer;

pub use renderer::{DiagnosticRecord, DiagnosticRenderer, OutputFormat};

use rowan::{TextRange, TextSize};
use serde::Serialize;
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hint,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Hint => "hint",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(text)
    }
}

/// Stable diagnostic codes
///
/// `SS1xxx` are lexical and syntax errors, `SS2xxx` are warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    // Lexical
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedCharacter,
    EmptyCharacterLiteral,
    TooManyCharactersInCharacterLiteral,
    UnterminatedComment,
    InvalidNumber,
    InvalidEscapeSequence,

    // Syntax
    TokenExpected,
    IdentifierExpected,
    IdentifierExpectedKeyword,
    TypeExpected,
    ExpressionExpected,
    InvalidExpressionTerm,
    UnexpectedToken,
    InvalidMemberDeclaration,
    NamespaceMemberExpected,
    EndOfFileExpected,
    DuplicateModifier,
    DuplicateConstraintClause,
    BadEmbeddedStatement,
    ElseCannotStartStatement,
    CatchOrFinallyExpected,
    TopLevelStatementAfterDeclaration,
    UsingAfterElements,
    NestingTooDeep,
    FeatureNotAvailable,

    // Warnings
    PossibleMistakenEmptyStatement,
}

impl ErrorCode {
    /// Code string shown to users
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "SS1001",
            ErrorCode::UnterminatedString => "SS1002",
            ErrorCode::UnterminatedCharacter => "SS1003",
            ErrorCode::EmptyCharacterLiteral => "SS1004",
            ErrorCode::TooManyCharactersInCharacterLiteral => "SS1005",
            ErrorCode::UnterminatedComment => "SS1006",
            ErrorCode::InvalidNumber => "SS1007",
            ErrorCode::InvalidEscapeSequence => "SS1008",
            ErrorCode::TokenExpected => "SS1100",
            ErrorCode::IdentifierExpected => "SS1101",
            ErrorCode::IdentifierExpectedKeyword => "SS1102",
            ErrorCode::TypeExpected => "SS1103",
            ErrorCode::ExpressionExpected => "SS1104",
            ErrorCode::InvalidExpressionTerm => "SS1105",
            ErrorCode::UnexpectedToken => "SS1106",
            ErrorCode::InvalidMemberDeclaration => "SS1107",
            ErrorCode::NamespaceMemberExpected => "SS1108",
            ErrorCode::EndOfFileExpected => "SS1109",
            ErrorCode::DuplicateModifier => "SS1110",
            ErrorCode::DuplicateConstraintClause => "SS1111",
            ErrorCode::BadEmbeddedStatement => "SS1112",
            ErrorCode::ElseCannotStartStatement => "SS1113",
            ErrorCode::CatchOrFinallyExpected => "SS1114",
            ErrorCode::TopLevelStatementAfterDeclaration => "SS1115",
            ErrorCode::UsingAfterElements => "SS1116",
            ErrorCode::NestingTooDeep => "SS1117",
            ErrorCode::FeatureNotAvailable => "SS1200",
            ErrorCode::PossibleMistakenEmptyStatement => "SS2001",
        }
    }

    /// Message template with positional `{n}` placeholders
    pub fn template(self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "Unexpected character '{0}'",
            ErrorCode::UnterminatedString => "Unterminated string literal",
            ErrorCode::UnterminatedCharacter => "Unterminated character literal",
            ErrorCode::EmptyCharacterLiteral => "Empty character literal",
            ErrorCode::TooManyCharactersInCharacterLiteral => {
                "Too many characters in character literal"
            }
            ErrorCode::UnterminatedComment => "End-of-file found, '*/' expected",
            ErrorCode::InvalidNumber => "Invalid number '{0}'",
            ErrorCode::InvalidEscapeSequence => "Unrecognized escape sequence '{0}'",
            ErrorCode::TokenExpected => "'{0}' expected",
            ErrorCode::IdentifierExpected => "Identifier expected",
            ErrorCode::IdentifierExpectedKeyword => "Identifier expected; '{0}' is a keyword",
            ErrorCode::TypeExpected => "Type expected",
            ErrorCode::ExpressionExpected => "Expression expected",
            ErrorCode::InvalidExpressionTerm => "Invalid expression term '{0}'",
            ErrorCode::UnexpectedToken => "Unexpected token '{0}'",
            ErrorCode::InvalidMemberDeclaration => {
                "Invalid token '{0}' in class, record, struct, or interface member declaration"
            }
            ErrorCode::NamespaceMemberExpected => {
                "A namespace cannot directly contain members such as fields, methods or statements"
            }
            ErrorCode::EndOfFileExpected => "Type or namespace definition, or end-of-file expected",
            ErrorCode::DuplicateModifier => "Duplicate '{0}' modifier",
            ErrorCode::DuplicateConstraintClause => {
                "A constraint clause has already been specified for type parameter '{0}'"
            }
            ErrorCode::BadEmbeddedStatement => {
                "Embedded statement cannot be a declaration or labeled statement"
            }
            ErrorCode::ElseCannotStartStatement => "'else' cannot start a statement",
            ErrorCode::CatchOrFinallyExpected => "Expected catch or finally",
            ErrorCode::TopLevelStatementAfterDeclaration => {
                "Top-level statements must precede namespace and type declarations"
            }
            ErrorCode::UsingAfterElements => {
                "A using clause must precede all other elements defined in the namespace except extern alias declarations"
            }
            ErrorCode::NestingTooDeep => {
                "Source is nested too deeply; the innermost part was skipped"
            }
            ErrorCode::FeatureNotAvailable => {
                "Feature '{0}' is not available in C# {1}. Please use language version {2} or greater."
            }
            ErrorCode::PossibleMistakenEmptyStatement => "Possible mistaken empty statement",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            ErrorCode::PossibleMistakenEmptyStatement => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Lexical errors come from the token source rather than the grammar
    pub fn is_lexical(self) -> bool {
        self.as_str().starts_with("SS10")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Zero-width span at `offset`
    pub fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn text_range(&self) -> TextRange {
        TextRange::new(TextSize::from(self.start), TextSize::from(self.end))
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self::new(range.start().into(), range.end().into())
    }
}

/// A positioned diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub span: Span,
    pub args: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, span: Span) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            span,
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(code: ErrorCode, span: Span, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code,
            severity: code.default_severity(),
            span,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Message with the positional arguments substituted
    pub fn message(&self) -> String {
        let mut message = self.code.template().to_string();
        for (index, arg) in self.args.iter().enumerate() {
            message = message.replace(&format!("{{{index}}}"), arg);
        }
        message
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}..{}: {}",
            self.severity,
            self.code,
            self.span.start,
            self.span.end,
            self.message()
        )
    }
}

/// Ordered diagnostic accumulator with snapshot/truncate support
///
/// Speculative parses record `len()` and call `truncate()` when they are
/// abandoned, so nothing emitted on a discarded path survives.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.diagnostics.last()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics in document order; ties keep emission order
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| d.span.start);
        self.diagnostics
    }
}

/// Maps byte offsets to 1-based line/column positions
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i as u32 + 1);
                }
                b'\n' => line_starts.push(i as u32 + 1),
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// 1-based `(line, column)` where the column counts characters
    pub fn line_col(&self, text: &str, offset: u32) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line] as usize;
        let end = (offset as usize).min(text.len());
        let column = text
            .get(line_start..end)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        (line + 1, column + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of the 1-based `line`, without its line terminator
    pub fn line_range(&self, text: &str, line: usize) -> Option<std::ops::Range<usize>> {
        let start = *self.line_starts.get(line.checked_sub(1)?)? as usize;
        let mut end = self
            .line_starts
            .get(line)
            .map(|s| *s as usize)
            .unwrap_or(text.len());
        let bytes = text.as_bytes();
        while end > start && matches!(bytes[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        Some(start..end)
    }
}
