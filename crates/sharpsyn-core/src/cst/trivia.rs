//! Trivia views over the C# CST
//!
//! In the tree, trivia pieces are ordinary tokens placed next to the token
//! that owns them. This module regroups them per token the way the lexer
//! attached them:
//!
//! - **Leading**: everything since the previous token's trailing trivia
//! - **Trailing**: pieces after the token up to and including the first
//!   end-of-line
//!
//! # Example
//!
//! ```
//! use sharpsyn_core::cst::TriviaCollector;
//! use sharpsyn_core::{ParseOptions, parse};
//!
//! let parse = parse("/// Docs\nclass C { } // tail\n", ParseOptions::default());
//! let collector = TriviaCollector::new();
//! let comments = collector.comments(&parse.syntax());
//! assert_eq!(comments.len(), 2);
//! assert_eq!(comments[0].comment_content().as_deref(), Some("Docs"));
//! ```

use rowan::TextRange;

use super::{SyntaxKind, SyntaxNode, SyntaxToken, is_missing};

/// One trivia piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaPiece {
    pub kind: SyntaxKind,
    pub text: String,
    pub range: TextRange,
}

impl TriviaPiece {
    pub fn from_token(token: &SyntaxToken) -> Self {
        Self {
            kind: token.kind(),
            text: token.text().to_string(),
            range: token.text_range(),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self.kind,
            SyntaxKind::SingleLineComment
                | SyntaxKind::MultiLineComment
                | SyntaxKind::SingleLineDocComment
                | SyntaxKind::MultiLineDocComment
        )
    }

    pub fn is_doc_comment(&self) -> bool {
        matches!(
            self.kind,
            SyntaxKind::SingleLineDocComment | SyntaxKind::MultiLineDocComment
        )
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, SyntaxKind::Whitespace | SyntaxKind::EndOfLine)
    }

    pub fn is_newline(&self) -> bool {
        self.kind == SyntaxKind::EndOfLine
    }

    /// Comment text without its delimiters
    pub fn comment_content(&self) -> Option<String> {
        let content = match self.kind {
            SyntaxKind::SingleLineDocComment => self.text.trim_start_matches("///"),
            SyntaxKind::SingleLineComment => self.text.trim_start_matches("//"),
            SyntaxKind::MultiLineDocComment => self
                .text
                .trim_start_matches("/**")
                .trim_end_matches("*/"),
            SyntaxKind::MultiLineComment => self
                .text
                .trim_start_matches("/*")
                .trim_end_matches("*/"),
            _ => return None,
        };
        Some(content.trim().to_string())
    }
}

/// Trivia attached to one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaInfo {
    pub token_kind: SyntaxKind,
    pub token_range: TextRange,
    pub leading: Vec<TriviaPiece>,
    pub trailing: Vec<TriviaPiece>,
}

impl TriviaInfo {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }

    pub fn has_comments(&self) -> bool {
        self.pieces().any(TriviaPiece::is_comment)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &TriviaPiece> {
        self.leading.iter().chain(self.trailing.iter())
    }
}

/// Regroups trivia tokens per owning token
#[derive(Debug, Clone, Default)]
pub struct TriviaCollector {
    skip_empty: bool,
}

impl TriviaCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave tokens without any trivia out of [`collect`](Self::collect)
    pub fn skip_empty(mut self) -> Self {
        self.skip_empty = true;
        self
    }

    /// Trivia for every real (non-trivia, non-missing) token under `root`,
    /// in document order
    pub fn collect(&self, root: &SyntaxNode) -> Vec<TriviaInfo> {
        let mut result = Vec::new();
        let mut current: Option<TriviaInfo> = None;
        let mut pending: Vec<TriviaPiece> = Vec::new();
        let mut trailing_open = false;

        for token in root
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
        {
            if token.kind().is_trivia() {
                let piece = TriviaPiece::from_token(&token);
                match current.as_mut() {
                    Some(info) if trailing_open && piece.kind != SyntaxKind::PreprocessorDirective => {
                        trailing_open = !piece.is_newline();
                        info.trailing.push(piece);
                    }
                    _ => {
                        trailing_open = false;
                        pending.push(piece);
                    }
                }
                continue;
            }
            if is_missing(&token) {
                continue;
            }
            if let Some(info) = current.take() {
                self.push(&mut result, info);
            }
            current = Some(TriviaInfo {
                token_kind: token.kind(),
                token_range: token.text_range(),
                leading: std::mem::take(&mut pending),
                trailing: Vec::new(),
            });
            trailing_open = true;
        }
        if let Some(info) = current {
            self.push(&mut result, info);
        }
        result
    }

    fn push(&self, result: &mut Vec<TriviaInfo>, info: TriviaInfo) {
        if !(self.skip_empty && info.is_empty()) {
            result.push(info);
        }
    }

    /// Trivia of the token at `offset`, if a real token starts there
    pub fn token_trivia(&self, root: &SyntaxNode, offset: u32) -> Option<TriviaInfo> {
        self.collect(root)
            .into_iter()
            .find(|info| u32::from(info.token_range.start()) == offset)
    }

    /// Every comment under `root`, in document order
    pub fn comments(&self, root: &SyntaxNode) -> Vec<TriviaPiece> {
        root.descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind().is_trivia())
            .map(|t| TriviaPiece::from_token(&t))
            .filter(TriviaPiece::is_comment)
            .collect()
    }

    /// Documentation comments leading the first real token of `node`
    pub fn doc_comments(&self, node: &SyntaxNode) -> Vec<TriviaPiece> {
        let Some(first) = node
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia() && !is_missing(t))
        else {
            return Vec::new();
        };
        let mut pieces = Vec::new();
        let mut previous = first.prev_token();
        while let Some(token) = previous {
            if !token.kind().is_trivia() {
                break;
            }
            pieces.push(TriviaPiece::from_token(&token));
            previous = token.prev_token();
        }
        pieces.reverse();
        pieces.retain(TriviaPiece::is_doc_comment);
        pieces
    }
}
