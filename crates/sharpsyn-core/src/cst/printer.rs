//! Indented debug dump of a syntax tree
//!
//! One line per element, two spaces of indentation per level:
//!
//! ```text
//! StatementRoot@0..6
//!   ReturnStatement@0..6
//!     ReturnKw@0..6 "return"
//!     Semicolon@6..6 (missing)
//!   EndOfFile@6..6 ""
//! ```

use std::fmt::Write;

use rowan::{NodeOrToken, WalkEvent};

use super::{SyntaxNode, SyntaxToken, is_missing};

/// Dump `node` and everything below it, trivia included
pub fn debug_tree(node: &SyntaxNode) -> String {
    TreePrinter::new().print(node)
}

#[derive(Debug, Clone, Copy)]
pub struct TreePrinter {
    show_trivia: bool,
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self { show_trivia: true }
    }
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_trivia(mut self) -> Self {
        self.show_trivia = false;
        self
    }

    pub fn print(&self, node: &SyntaxNode) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in node.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(NodeOrToken::Node(node)) => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?}@{:?}",
                        "",
                        node.kind(),
                        node.text_range(),
                        indent = depth * 2
                    );
                    depth += 1;
                }
                WalkEvent::Enter(NodeOrToken::Token(token)) => {
                    if self.show_trivia || !token.kind().is_trivia() {
                        self.print_token(&mut out, &token, depth);
                    }
                }
                WalkEvent::Leave(NodeOrToken::Node(_)) => depth = depth.saturating_sub(1),
                WalkEvent::Leave(NodeOrToken::Token(_)) => {}
            }
        }
        out
    }

    fn print_token(&self, out: &mut String, token: &SyntaxToken, depth: usize) {
        let _ = write!(
            out,
            "{:indent$}{:?}@{:?}",
            "",
            token.kind(),
            token.text_range(),
            indent = depth * 2
        );
        if is_missing(token) {
            out.push_str(" (missing)\n");
        } else {
            let _ = writeln!(out, " {:?}", token.text());
        }
    }
}
