//! Buffered, rewindable token stream
//!
//! Tokens are pulled from the [`Lexer`] on demand and kept in a buffer, so a
//! checkpoint is just an index and rewinding never re-lexes.

use super::SyntaxKind;
use super::lexer::{Lexer, Token};
use crate::diagnostics::Diagnostic;

pub(crate) struct TokenSource<'a> {
    lexer: Lexer<'a>,
    tokens: Vec<Token<'a>>,
    pos: usize,
    eof_buffered: bool,
}

impl<'a> TokenSource<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lexer: Lexer::new(text),
            tokens: Vec::new(),
            pos: 0,
            eof_buffered: false,
        }
    }

    /// Make sure `index` is buffered, or that the end-of-file token is
    fn fill(&mut self, index: usize) {
        while self.tokens.len() <= index && !self.eof_buffered {
            let token = self.lexer.next_token();
            self.eof_buffered = token.kind == SyntaxKind::EndOfFile;
            self.tokens.push(token);
        }
    }

    /// Token `n` positions ahead of the cursor; past the end this is the
    /// end-of-file token.
    pub(crate) fn peek(&mut self, n: usize) -> &Token<'a> {
        let index = self.pos + n;
        self.fill(index);
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub(crate) fn current(&mut self) -> &Token<'a> {
        self.peek(0)
    }

    pub(crate) fn kind(&mut self, n: usize) -> SyntaxKind {
        self.peek(n).kind
    }

    pub(crate) fn text(&mut self, n: usize) -> &'a str {
        self.peek(n).text
    }

    /// Move past the current token. The cursor never moves past
    /// end-of-file.
    pub(crate) fn advance(&mut self) {
        if self.current().kind != SyntaxKind::EndOfFile {
            self.pos += 1;
        }
    }

    /// Number of tokens consumed so far
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, checkpoint: usize) {
        debug_assert!(checkpoint <= self.tokens.len());
        self.pos = checkpoint;
    }

    /// Drain the lexer and hand back every token plus lexical diagnostics
    pub(crate) fn finish(mut self) -> (Vec<Token<'a>>, Vec<Diagnostic>) {
        while !self.eof_buffered {
            let index = self.tokens.len();
            self.fill(index);
        }
        let diagnostics = self.lexer.take_diagnostics();
        (self.tokens, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let mut source = TokenSource::new("a b c");
        assert_eq!(source.text(2), "c");
        assert_eq!(source.text(0), "a");
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn test_checkpoint_and_rewind() {
        let mut source = TokenSource::new("a b c");
        source.advance();
        let checkpoint = source.checkpoint();
        source.advance();
        source.advance();
        assert_eq!(source.kind(0), SyntaxKind::EndOfFile);
        source.rewind(checkpoint);
        assert_eq!(source.text(0), "b");
    }

    #[test]
    fn test_peek_past_end_is_end_of_file() {
        let mut source = TokenSource::new("a");
        assert_eq!(source.kind(10), SyntaxKind::EndOfFile);
        source.advance();
        source.advance();
        assert_eq!(source.kind(0), SyntaxKind::EndOfFile);
        assert_eq!(source.position(), 1);
    }

    #[test]
    fn test_finish_collects_lexical_diagnostics() {
        let source = TokenSource::new("a ` b");
        let (tokens, diagnostics) = source.finish();
        assert_eq!(tokens.len(), 4);
        assert_eq!(diagnostics.len(), 1);
    }
}
