//! Public parsing API
//!
//! Parsing is total: every function here returns a [`Parse`] holding a tree
//! that covers the whole input plus the diagnostics found on the way. There
//! is no error path.

use rowan::GreenNode;
use std::sync::Arc;

use crate::config::{LanguageVersion, ParseEntry, ParseOptions};
use crate::cst::{SyntaxNode, parser::parse_text};
use crate::diagnostics::Diagnostic;

/// Outcome of parsing one source text
///
/// Cheap to clone and safe to send across threads; the red tree is created
/// on demand by [`syntax`](Self::syntax).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    diagnostics: Arc<[Diagnostic]>,
    text: Arc<str>,
    options: ParseOptions,
}

impl Parse {
    /// Root node: `CompilationUnit`, or the `*Root` of the other entries
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Lexical and syntax diagnostics ordered by position
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Source text the tree was built from
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Whether any diagnostic has error severity
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Parse `text` at the production selected by `options.entry`
pub fn parse(text: &str, options: ParseOptions) -> Parse {
    let (green, diagnostics) = parse_text(text, options);
    Parse {
        green,
        diagnostics: diagnostics.into(),
        text: Arc::from(text),
        options,
    }
}

pub fn parse_compilation_unit(text: &str, version: LanguageVersion) -> Parse {
    parse(text, ParseOptions::new(version))
}

pub fn parse_expression(text: &str, version: LanguageVersion) -> Parse {
    parse(text, ParseOptions::new(version).with_entry(ParseEntry::Expression))
}

pub fn parse_statement(text: &str, version: LanguageVersion) -> Parse {
    parse(text, ParseOptions::new(version).with_entry(ParseEntry::Statement))
}

pub fn parse_type(text: &str, version: LanguageVersion) -> Parse {
    parse(text, ParseOptions::new(version).with_entry(ParseEntry::Type))
}

/// Something that turns source text into a [`Parse`]
pub trait SourceParser {
    fn options(&self) -> ParseOptions;

    fn parse(&self, text: &str) -> Parse;
}

/// Stateless C# parser bound to one set of options
///
/// Holds no mutable state, so one instance can be shared by any number of
/// threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CSharpParser {
    options: ParseOptions,
}

impl CSharpParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl SourceParser for CSharpParser {
    fn options(&self) -> ParseOptions {
        self.options
    }

    fn parse(&self, text: &str) -> Parse {
        parse(text, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxKind;
    use crate::diagnostics::ErrorCode;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_parse_is_send_sync() {
        assert_send_sync::<Parse>();
        assert_send_sync::<CSharpParser>();
    }

    #[test]
    fn test_entry_roots() {
        let cases = [
            (parse_compilation_unit("class C { }", LanguageVersion::LATEST), SyntaxKind::CompilationUnit),
            (parse_expression("a + b", LanguageVersion::LATEST), SyntaxKind::ExpressionRoot),
            (parse_statement("return;", LanguageVersion::LATEST), SyntaxKind::StatementRoot),
            (parse_type("int[]", LanguageVersion::LATEST), SyntaxKind::TypeRoot),
        ];
        for (parse, kind) in cases {
            let root = parse.syntax();
            assert_eq!(root.kind(), kind);
            assert!(!parse.has_errors(), "{:?}", parse.diagnostics());
            let last = root.last_token().unwrap();
            assert_eq!(last.kind(), SyntaxKind::EndOfFile);
        }
    }

    #[test]
    fn test_trailing_tokens_after_expression() {
        let parse = parse_expression("a b c", LanguageVersion::LATEST);
        assert_eq!(parse.diagnostics().len(), 1);
        assert_eq!(parse.diagnostics()[0].code, ErrorCode::UnexpectedToken);
        let skipped = parse
            .syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::SkippedTokens)
            .unwrap();
        assert_eq!(skipped.text().to_string(), "b c");
    }

    #[test]
    fn test_parser_trait() {
        let parser = CSharpParser::new(ParseOptions::new(LanguageVersion::CSharp9));
        let parse = parser.parse("record R;");
        assert_eq!(parse.options().language_version, LanguageVersion::CSharp9);
        assert_eq!(parse.text(), "record R;");
        assert!(!parse.has_errors());
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let parse = parse_statement("if (x);", LanguageVersion::LATEST);
        assert_eq!(parse.diagnostics().len(), 1);
        assert_eq!(parse.diagnostics()[0].code, ErrorCode::PossibleMistakenEmptyStatement);
        assert!(!parse.has_errors());
        assert_eq!(parse.error_count(), 0);
    }
}
