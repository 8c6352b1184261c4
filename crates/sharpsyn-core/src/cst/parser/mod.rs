//! Error-tolerant recursive-descent parser for C#
//!
//! Parsing happens in three steps:
//!
//! 1. The [`TokenSource`] lexes lazily and buffers tokens so the parser can
//!    look ahead arbitrarily far and rewind to a checkpoint.
//! 2. Grammar productions (the submodules) consume tokens and append events
//!    to a [`CstBuilder`]; diagnostics go to a [`DiagnosticSink`].
//! 3. [`build_tree`] replays the surviving events into a Rowan green tree.
//!
//! Productions never fail. A missing token is synthesized as a zero-width
//! token of the expected kind, and tokens that fit nowhere are wrapped in
//! `SkippedTokens` or `IncompleteMember` nodes, so the tree always covers
//! the whole input.

mod declarations;
mod disambiguation;
mod expressions;
mod patterns;
mod statements;
mod types;

use rowan::GreenNode;

use super::SyntaxKind;
use super::builder::{CstBuilder, build_tree};
use super::source::TokenSource;
use crate::config::{ParseEntry, ParseOptions};
use crate::diagnostics::{Diagnostic, DiagnosticSink, ErrorCode, Span};
use crate::features::Feature;

/// Productions deeper than this give up and skip the group they start
const MAX_DEPTH: u32 = 256;

/// A small set of token kinds used for recovery decisions
#[derive(Clone, Copy)]
pub(crate) struct TokenSet(&'static [SyntaxKind]);

impl TokenSet {
    pub(crate) const fn new(kinds: &'static [SyntaxKind]) -> Self {
        Self(kinds)
    }

    pub(crate) fn contains(self, kind: SyntaxKind) -> bool {
        self.0.contains(&kind)
    }
}

/// Bracket nesting seen while skipping tokens
#[derive(Default, Clone, Copy)]
struct DelimiterDepth {
    braces: u32,
    parens: u32,
    brackets: u32,
}

impl DelimiterDepth {
    fn is_zero(self) -> bool {
        self.braces == 0 && self.parens == 0 && self.brackets == 0
    }

    fn update(&mut self, kind: SyntaxKind) {
        match kind {
            SyntaxKind::OpenBrace => self.braces += 1,
            SyntaxKind::CloseBrace => self.braces = self.braces.saturating_sub(1),
            SyntaxKind::OpenParen => self.parens += 1,
            SyntaxKind::CloseParen => self.parens = self.parens.saturating_sub(1),
            SyntaxKind::OpenBracket => self.brackets += 1,
            SyntaxKind::CloseBracket => self.brackets = self.brackets.saturating_sub(1),
            _ => {}
        }
    }
}

/// Snapshot of everything a speculative parse can change
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    tokens: usize,
    events: usize,
    diagnostics: usize,
}

/// Start of a node whose kind is decided when it is completed
#[must_use]
pub(crate) struct Marker {
    pos: usize,
}

impl Marker {
    pub(crate) fn complete(self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        p.builder.close(self.pos, kind);
        CompletedMarker {
            pos: self.pos,
            kind,
        }
    }

    /// Drop the marker without creating a node
    pub(crate) fn abandon(self, p: &mut Parser<'_>) {
        p.builder.abandon(self.pos);
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: usize,
    kind: SyntaxKind,
}

impl CompletedMarker {
    /// Start a new node that will become this node's parent
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let m = p.start();
        p.builder.set_forward_parent(self.pos, m.pos);
        m
    }

    pub(crate) fn kind(&self) -> SyntaxKind {
        self.kind
    }
}

/// Parser state for a single parse invocation
pub(crate) struct Parser<'a> {
    text: &'a str,
    source: TokenSource<'a>,
    builder: CstBuilder,
    diagnostics: DiagnosticSink,
    options: ParseOptions,
    /// Feature diagnostics are suppressed while non-zero
    feature_suppression: u32,
    in_async: bool,
    in_query: bool,
    depth: u32,
    /// `NestingTooDeep` is reported once per parse
    too_deep_reported: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, options: ParseOptions) -> Self {
        Self {
            text,
            source: TokenSource::new(text),
            builder: CstBuilder::new(),
            diagnostics: DiagnosticSink::new(),
            options,
            feature_suppression: 0,
            in_async: false,
            in_query: false,
            depth: 0,
            too_deep_reported: false,
        }
    }

    pub(crate) fn options(&self) -> ParseOptions {
        self.options
    }

    // --- lookahead -------------------------------------------------------

    pub(crate) fn nth(&mut self, n: usize) -> SyntaxKind {
        self.source.kind(n)
    }

    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth_text(&mut self, n: usize) -> &'a str {
        self.source.text(n)
    }

    pub(crate) fn current_text(&mut self) -> &'a str {
        self.nth_text(0)
    }

    pub(crate) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.nth_at(0, kind)
    }

    /// Token check that understands the fused shift operators
    pub(crate) fn nth_at(&mut self, n: usize, kind: SyntaxKind) -> bool {
        match kind {
            SyntaxKind::GreaterThanGreaterThan => self.at_fused(n, SyntaxKind::GreaterThan),
            SyntaxKind::GreaterThanGreaterThanEquals => {
                self.at_fused(n, SyntaxKind::GreaterThanEquals)
            }
            _ => self.nth(n) == kind,
        }
    }

    pub(crate) fn at_ts(&mut self, set: TokenSet) -> bool {
        let kind = self.current();
        set.contains(kind)
    }

    /// `>` at `n` immediately followed by `second` with nothing in between
    fn at_fused(&mut self, n: usize, second: SyntaxKind) -> bool {
        if self.nth(n) != SyntaxKind::GreaterThan || self.nth(n + 1) != second {
            return false;
        }
        let first = self.source.peek(n);
        let (end, trailing) = (first.end(), first.has_trailing_trivia());
        let next = self.source.peek(n + 1);
        !trailing && !next.has_leading_trivia() && next.offset == end
    }

    /// Identifier whose text is the contextual keyword `kw`
    pub(crate) fn at_contextual(&mut self, kw: SyntaxKind) -> bool {
        self.nth_at_contextual(0, kw)
    }

    pub(crate) fn nth_at_contextual(&mut self, n: usize, kw: SyntaxKind) -> bool {
        self.nth(n) == SyntaxKind::Identifier && kw.text() == Some(self.nth_text(n))
    }

    /// Contextual keyword kind of the identifier at `n`, if it is one
    pub(crate) fn nth_contextual_kind(&mut self, n: usize) -> Option<SyntaxKind> {
        if self.nth(n) != SyntaxKind::Identifier {
            return None;
        }
        SyntaxKind::from_contextual_keyword(self.nth_text(n))
    }

    pub(crate) fn current_span(&mut self) -> Span {
        self.source.current().span()
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.at(SyntaxKind::EndOfFile)
    }

    /// Tokens consumed so far, used for progress checks
    pub(crate) fn position(&self) -> usize {
        self.source.position()
    }

    // --- consuming -------------------------------------------------------

    pub(crate) fn start(&mut self) -> Marker {
        Marker {
            pos: self.builder.open(),
        }
    }

    /// Consume the current token as-is. End-of-file is only consumed by the
    /// root production.
    pub(crate) fn bump(&mut self) {
        let kind = self.current();
        if kind == SyntaxKind::EndOfFile {
            return;
        }
        self.builder.token(kind, 1);
        self.source.advance();
    }

    /// Consume the current token under a different kind (contextual
    /// keywords, keywords salvaged as identifiers)
    pub(crate) fn bump_remap(&mut self, kind: SyntaxKind) {
        if self.current() == SyntaxKind::EndOfFile {
            return;
        }
        self.builder.token(kind, 1);
        self.source.advance();
    }

    /// Consume an operator, fusing `> >` and `> >=` when adjacent
    pub(crate) fn bump_operator(&mut self) -> SyntaxKind {
        for fused in [
            SyntaxKind::GreaterThanGreaterThanEquals,
            SyntaxKind::GreaterThanGreaterThan,
        ] {
            if self.at(fused) {
                self.builder.token(fused, 2);
                self.source.advance();
                self.source.advance();
                return fused;
            }
        }
        let kind = self.current();
        self.bump();
        kind
    }

    pub(crate) fn bump_eof(&mut self) {
        self.builder.token(SyntaxKind::EndOfFile, 1);
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        if matches!(
            kind,
            SyntaxKind::GreaterThanGreaterThan | SyntaxKind::GreaterThanGreaterThanEquals
        ) {
            self.bump_operator();
        } else {
            self.bump();
        }
        true
    }

    pub(crate) fn eat_contextual(&mut self, kw: SyntaxKind) -> bool {
        if self.at_contextual(kw) {
            self.bump_remap(kw);
            true
        } else {
            false
        }
    }

    /// Consume `kind`, or synthesize a missing one and report it
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.missing(kind, ErrorCode::TokenExpected);
        false
    }

    pub(crate) fn expect_contextual(&mut self, kw: SyntaxKind) -> bool {
        if self.eat_contextual(kw) {
            return true;
        }
        self.missing(kw, ErrorCode::TokenExpected);
        false
    }

    /// Zero-width token of `kind` plus a diagnostic at the current token
    pub(crate) fn missing(&mut self, kind: SyntaxKind, code: ErrorCode) {
        match code {
            ErrorCode::TokenExpected => {
                let name = kind.display_name();
                self.error(code, &[name.as_str()]);
            }
            _ => self.error(code, &[]),
        }
        self.builder.missing(kind);
    }

    /// Zero-width token without a diagnostic; the caller has reported one
    pub(crate) fn missing_silent(&mut self, kind: SyntaxKind) {
        self.builder.missing(kind);
    }

    /// Consume an identifier, salvaging a misplaced keyword when the next
    /// token shows it was meant as a name
    pub(crate) fn expect_identifier(&mut self) -> bool {
        if self.at(SyntaxKind::Identifier) {
            self.bump();
            return true;
        }
        let kind = self.current();
        if kind.is_keyword()
            && matches!(
                self.nth(1),
                SyntaxKind::Semicolon
                    | SyntaxKind::Equals
                    | SyntaxKind::Comma
                    | SyntaxKind::OpenParen
                    | SyntaxKind::CloseParen
            )
        {
            let text = self.current_text();
            self.error(ErrorCode::IdentifierExpectedKeyword, &[text]);
            self.bump_remap(SyntaxKind::Identifier);
            return true;
        }
        self.missing(SyntaxKind::Identifier, ErrorCode::IdentifierExpected);
        false
    }

    // --- diagnostics -----------------------------------------------------

    pub(crate) fn error(&mut self, code: ErrorCode, args: &[&str]) {
        let span = self.current_span();
        self.error_at(span, code, args);
    }

    pub(crate) fn error_at(&mut self, span: Span, code: ErrorCode, args: &[&str]) {
        self.diagnostics
            .push(Diagnostic::with_args(code, span, args.iter().copied()));
    }

    /// Report `feature` at `span` when the configured version lacks it.
    /// Returns whether a diagnostic was emitted.
    pub(crate) fn check_feature(&mut self, feature: Feature, span: Span) -> bool {
        let version = self.options.language_version;
        if feature.is_available(version) || self.feature_suppression > 0 {
            return false;
        }
        let required = feature.required_version();
        self.error_at(
            span,
            ErrorCode::FeatureNotAvailable,
            &[feature.name(), version.as_str(), required.as_str()],
        );
        true
    }

    pub(crate) fn suppress_features<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.feature_suppression += 1;
        let result = f(self);
        self.feature_suppression -= 1;
        result
    }

    // --- context ---------------------------------------------------------

    pub(crate) fn in_async(&self) -> bool {
        self.in_async
    }

    pub(crate) fn with_async<T>(&mut self, is_async: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.in_async, is_async);
        let result = f(self);
        self.in_async = saved;
        result
    }

    pub(crate) fn in_query(&self) -> bool {
        self.in_query
    }

    pub(crate) fn with_query<T>(&mut self, in_query: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.in_query, in_query);
        let result = f(self);
        self.in_query = saved;
        result
    }

    /// Track recursion depth; false once the input nests too deeply
    pub(crate) fn enter(&mut self) -> bool {
        self.depth += 1;
        self.depth <= MAX_DEPTH
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // --- speculation -----------------------------------------------------

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            tokens: self.source.checkpoint(),
            events: self.builder.len(),
            diagnostics: self.diagnostics.len(),
        }
    }

    /// Discard everything produced since `checkpoint`
    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        tracing::trace!(
            from = self.source.position(),
            to = checkpoint.tokens,
            "rewinding speculative parse"
        );
        self.source.rewind(checkpoint.tokens);
        self.builder.truncate(checkpoint.events);
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    /// Run `f` speculatively: keep its output on `Some`, rewind on `None`
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.checkpoint();
        let result = f(self);
        if result.is_none() {
            self.rewind(checkpoint);
        }
        result
    }

    // --- recovery --------------------------------------------------------

    /// Skip tokens into a `SkippedTokens` node until one in `recovery` is
    /// reached at bracket depth zero. Reports the first skipped token.
    pub(crate) fn recover_to(&mut self, recovery: TokenSet) {
        self.recover_until(ErrorCode::UnexpectedToken, |p| p.at_ts(recovery));
    }

    /// Skip tokens until `stop` holds at bracket depth zero, reporting the
    /// first skipped token with `code`
    pub(crate) fn recover_until(&mut self, code: ErrorCode, stop: impl Fn(&mut Self) -> bool) {
        if self.at_end() || stop(self) {
            return;
        }
        let m = self.start();
        let text = self.current_text();
        self.error(code, &[text]);
        let mut depth = DelimiterDepth::default();
        loop {
            let kind = self.current();
            if kind == SyntaxKind::EndOfFile || (depth.is_zero() && stop(self)) {
                break;
            }
            depth.update(kind);
            self.bump();
        }
        m.complete(self, SyntaxKind::SkippedTokens);
    }

    /// Guarantee that a loop iteration consumed something: when nothing was
    /// consumed since `before`, skip at least one token and then up to
    /// `stop`
    pub(crate) fn force_progress(&mut self, before: usize, stop: impl Fn(&mut Self) -> bool) {
        if self.position() != before || self.at_end() {
            return;
        }
        let m = self.start();
        self.report_unexpected();
        let mut depth = DelimiterDepth::default();
        depth.update(self.current());
        self.bump();
        while !self.at_end() && !(depth.is_zero() && stop(self)) {
            let kind = self.current();
            depth.update(kind);
            self.bump();
        }
        m.complete(self, SyntaxKind::SkippedTokens);
    }

    /// Past the nesting limit: skip the current token and, when it opens a
    /// bracket, everything up to its match
    pub(crate) fn skip_too_deep(&mut self) {
        if self.at_end() {
            return;
        }
        let m = self.start();
        if !self.too_deep_reported {
            self.too_deep_reported = true;
            self.error(ErrorCode::NestingTooDeep, &[]);
        }
        let mut depth = DelimiterDepth::default();
        loop {
            let kind = self.current();
            if kind == SyntaxKind::EndOfFile {
                break;
            }
            depth.update(kind);
            self.bump();
            if depth.is_zero() {
                break;
            }
        }
        m.complete(self, SyntaxKind::SkippedTokens);
    }

    /// Wrap the single current token in `SkippedTokens`
    pub(crate) fn skip_token(&mut self, code: ErrorCode) {
        if self.at_end() {
            return;
        }
        let m = self.start();
        let text = self.current_text();
        self.error(code, &[text]);
        self.bump();
        m.complete(self, SyntaxKind::SkippedTokens);
    }

    fn report_unexpected(&mut self) {
        let text = self.current_text();
        self.error(ErrorCode::UnexpectedToken, &[text]);
    }

    /// Everything left before end-of-file becomes one `SkippedTokens` node
    fn skip_remaining(&mut self) {
        if self.at_end() {
            return;
        }
        let m = self.start();
        self.report_unexpected();
        while !self.at_end() {
            self.bump();
        }
        m.complete(self, SyntaxKind::SkippedTokens);
    }

    // --- finishing -------------------------------------------------------

    pub(crate) fn finish(self) -> (GreenNode, Vec<Diagnostic>) {
        let Parser {
            text,
            source,
            builder,
            diagnostics,
            ..
        } = self;
        let (tokens, lexical) = source.finish();
        let green = build_tree(text, builder.into_events(), &tokens);
        tracing::debug!(
            tokens = tokens.len(),
            diagnostics = lexical.len() + diagnostics.len(),
            "parse finished"
        );

        let mut sink = DiagnosticSink::new();
        sink.extend(lexical);
        sink.extend(diagnostics.into_sorted());
        (green, sink.into_sorted())
    }
}

/// Parse `text` starting at the production selected by `options.entry`
pub(crate) fn parse_text(text: &str, options: ParseOptions) -> (GreenNode, Vec<Diagnostic>) {
    tracing::debug!(
        entry = %options.entry,
        version = %options.language_version,
        len = text.len(),
        "parse started"
    );
    let mut p = Parser::new(text, options);
    let root = p.start();
    let kind = match options.entry {
        ParseEntry::CompilationUnit => {
            declarations::compilation_unit(&mut p);
            SyntaxKind::CompilationUnit
        }
        ParseEntry::Expression => {
            expressions::expression(&mut p);
            p.skip_remaining();
            SyntaxKind::ExpressionRoot
        }
        ParseEntry::Statement => {
            statements::statement(&mut p);
            p.skip_remaining();
            SyntaxKind::StatementRoot
        }
        ParseEntry::Type => {
            types::type_(&mut p);
            p.skip_remaining();
            SyntaxKind::TypeRoot
        }
    };
    p.bump_eof();
    root.complete(&mut p, kind);
    p.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanguageVersion;

    fn parser(text: &str) -> Parser<'_> {
        Parser::new(text, ParseOptions::default())
    }

    #[test]
    fn test_fused_greater_than() {
        let mut p = parser("a >> b > > c >>= d");
        p.bump();
        assert!(p.at(SyntaxKind::GreaterThanGreaterThan));
        assert_eq!(p.bump_operator(), SyntaxKind::GreaterThanGreaterThan);
        p.bump();
        assert!(!p.at(SyntaxKind::GreaterThanGreaterThan));
        assert!(p.at(SyntaxKind::GreaterThan));
        p.bump();
        p.bump();
        p.bump();
        assert!(p.at(SyntaxKind::GreaterThanGreaterThanEquals));
    }

    #[test]
    fn test_contextual_keywords() {
        let mut p = parser("record R");
        assert!(p.at_contextual(SyntaxKind::RecordKw));
        assert!(!p.at_contextual(SyntaxKind::WithKw));
        assert_eq!(p.nth_contextual_kind(0), Some(SyntaxKind::RecordKw));
        assert_eq!(p.nth_contextual_kind(1), None);
    }

    #[test]
    fn test_rewind_discards_events_and_diagnostics() {
        let mut p = parser("a b");
        let checkpoint = p.checkpoint();
        p.bump();
        p.expect(SyntaxKind::Semicolon);
        assert_eq!(p.diagnostics.len(), 1);
        p.rewind(checkpoint);
        assert_eq!(p.diagnostics.len(), 0);
        assert_eq!(p.builder.len(), 0);
        assert_eq!(p.current_text(), "a");
    }

    #[test]
    fn test_try_parse_keeps_success() {
        let mut p = parser("a b");
        let kept = p.try_parse(|p| {
            p.bump();
            Some(())
        });
        assert!(kept.is_some());
        assert_eq!(p.current_text(), "b");
        let dropped: Option<()> = p.try_parse(|p| {
            p.bump();
            None
        });
        assert!(dropped.is_none());
        assert_eq!(p.current_text(), "b");
    }

    #[test]
    fn test_feature_suppression() {
        let options = ParseOptions::new(LanguageVersion::CSharp1);
        let mut p = Parser::new("x", options);
        let span = p.current_span();
        assert!(p.check_feature(Feature::Records, span));
        assert!(!p.suppress_features(|p| p.check_feature(Feature::Records, span)));
        assert_eq!(p.diagnostics.len(), 1);
    }

    #[test]
    fn test_keyword_salvaged_as_identifier() {
        let mut p = parser("class;");
        assert!(p.expect_identifier());
        assert_eq!(p.diagnostics.last().map(|d| d.code), Some(ErrorCode::IdentifierExpectedKeyword));
        assert!(p.at(SyntaxKind::Semicolon));
    }
}
