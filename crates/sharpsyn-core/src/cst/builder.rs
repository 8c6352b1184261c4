//! Event-based CST construction
//!
//! Productions do not talk to [`rowan::GreenNodeBuilder`] directly. They
//! append [`Event`]s to a [`CstBuilder`], which can be truncated when a
//! speculative parse is abandoned. Once parsing is done the event log is
//! replayed into a green tree by [`build_tree`], which is also where token
//! trivia is expanded into sibling tokens.
//!
//! `Start` events may carry a `forward_parent` offset pointing at a later
//! `Start` event. This is how a completed node gets wrapped by a parent that
//! was only discovered afterwards (`a` becoming the left operand of `a + b`).

use rowan::{GreenNode, GreenNodeBuilder};

use super::SyntaxKind;
use super::lexer::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    /// Consume `n_raw` lexer tokens as a single tree token of `kind`
    Token { kind: SyntaxKind, n_raw: u8 },
    /// Zero-width token synthesized by recovery
    Missing { kind: SyntaxKind },
    Finish,
    /// Placeholder for an unfinished or abandoned `Start`
    Tombstone,
}

/// Append-only (until truncated) log of tree events
#[derive(Debug, Default)]
pub struct CstBuilder {
    events: Vec<Event>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drop every event recorded after `len`
    pub fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    /// Reserve a slot for a node start; returns its position
    pub(crate) fn open(&mut self) -> usize {
        let pos = self.events.len();
        self.events.push(Event::Tombstone);
        pos
    }

    pub(crate) fn close(&mut self, pos: usize, kind: SyntaxKind) {
        if let Some(event @ Event::Tombstone) = self.events.get_mut(pos) {
            *event = Event::Start {
                kind,
                forward_parent: None,
            };
        }
        self.events.push(Event::Finish);
    }

    pub(crate) fn abandon(&mut self, pos: usize) {
        if pos + 1 == self.events.len() {
            self.events.pop();
        }
    }

    /// Make the node started at `new_pos` the parent of the node at `pos`
    pub(crate) fn set_forward_parent(&mut self, pos: usize, new_pos: usize) {
        if let Some(Event::Start { forward_parent, .. }) = self.events.get_mut(pos) {
            *forward_parent = Some(new_pos - pos);
        }
    }

    pub(crate) fn token(&mut self, kind: SyntaxKind, n_raw: u8) {
        self.events.push(Event::Token { kind, n_raw });
    }

    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Missing { kind });
    }

    pub(crate) fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// Replay `events` into a green tree
///
/// `tokens` is the full lexer output in order; every token must be consumed
/// by exactly one `Token` event.
pub(crate) fn build_tree(source: &str, mut events: Vec<Event>, tokens: &[Token<'_>]) -> GreenNode {
    let mut builder = GreenNodeBuilder::new();
    let mut forward_parents = Vec::new();
    let mut cursor = 0usize;

    for i in 0..events.len() {
        match std::mem::replace(&mut events[i], Event::Tombstone) {
            Event::Start {
                kind,
                forward_parent,
            } => {
                forward_parents.push(kind);
                let mut idx = i;
                let mut next = forward_parent;
                while let Some(offset) = next {
                    idx += offset;
                    next = match std::mem::replace(&mut events[idx], Event::Tombstone) {
                        Event::Start {
                            kind,
                            forward_parent,
                        } => {
                            forward_parents.push(kind);
                            forward_parent
                        }
                        _ => None,
                    };
                }
                for kind in forward_parents.drain(..).rev() {
                    builder.start_node(kind.into());
                }
            }
            Event::Finish => builder.finish_node(),
            Event::Token { kind, n_raw } => {
                let n = usize::from(n_raw).max(1);
                let Some(group) = tokens.get(cursor..cursor + n) else {
                    continue;
                };
                cursor += n;
                emit_token(&mut builder, source, kind, group);
            }
            Event::Missing { kind } => builder.token(kind.into(), ""),
            Event::Tombstone => {}
        }
    }

    builder.finish()
}

fn emit_token(builder: &mut GreenNodeBuilder<'_>, source: &str, kind: SyntaxKind, group: &[Token<'_>]) {
    let (Some(first), Some(last)) = (group.first(), group.last()) else {
        return;
    };
    for trivia in &first.leading {
        builder.token(trivia.kind.into(), trivia.text);
    }
    // Fused tokens are adjacent, so their text is one contiguous slice.
    let text = source
        .get(first.offset as usize..last.end() as usize)
        .unwrap_or(first.text);
    builder.token(kind.into(), text);
    for trivia in &last.trailing {
        builder.token(trivia.kind.into(), trivia.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxNode;
    use crate::cst::lexer::lex;

    #[test]
    fn test_replay_with_trivia() {
        let source = "a /* c */ + b\n";
        let (tokens, _) = lex(source);
        let mut builder = CstBuilder::new();
        let root = builder.open();
        builder.token(SyntaxKind::Identifier, 1);
        builder.token(SyntaxKind::Plus, 1);
        builder.token(SyntaxKind::Identifier, 1);
        builder.token(SyntaxKind::EndOfFile, 1);
        builder.close(root, SyntaxKind::ExpressionRoot);

        let green = build_tree(source, builder.into_events(), &tokens);
        let node = SyntaxNode::new_root(green);
        assert_eq!(node.text().to_string(), source);
        assert_eq!(node.kind(), SyntaxKind::ExpressionRoot);
    }

    #[test]
    fn test_forward_parent_wraps_completed_node() {
        let source = "a+b";
        let (tokens, _) = lex(source);
        let mut builder = CstBuilder::new();
        let root = builder.open();
        let lhs = builder.open();
        builder.token(SyntaxKind::Identifier, 1);
        builder.close(lhs, SyntaxKind::IdentifierName);
        let binary = builder.open();
        builder.set_forward_parent(lhs, binary);
        builder.token(SyntaxKind::Plus, 1);
        let rhs = builder.open();
        builder.token(SyntaxKind::Identifier, 1);
        builder.close(rhs, SyntaxKind::IdentifierName);
        builder.close(binary, SyntaxKind::BinaryExpression);
        builder.token(SyntaxKind::EndOfFile, 1);
        builder.close(root, SyntaxKind::ExpressionRoot);

        let node = SyntaxNode::new_root(build_tree(source, builder.into_events(), &tokens));
        let binary = node.first_child().map(|n| n.kind());
        assert_eq!(binary, Some(SyntaxKind::BinaryExpression));
        let operands: Vec<_> = node
            .first_child()
            .into_iter()
            .flat_map(|n| n.children())
            .map(|n| n.kind())
            .collect();
        assert_eq!(
            operands,
            vec![SyntaxKind::IdentifierName, SyntaxKind::IdentifierName]
        );
    }

    #[test]
    fn test_fused_tokens_and_missing() {
        let source = "a>>b";
        let (tokens, _) = lex(source);
        let mut builder = CstBuilder::new();
        let root = builder.open();
        builder.token(SyntaxKind::Identifier, 1);
        builder.token(SyntaxKind::GreaterThanGreaterThan, 2);
        builder.token(SyntaxKind::Identifier, 1);
        builder.missing(SyntaxKind::Semicolon);
        builder.token(SyntaxKind::EndOfFile, 1);
        builder.close(root, SyntaxKind::ExpressionRoot);

        let node = SyntaxNode::new_root(build_tree(source, builder.into_events(), &tokens));
        let tokens: Vec<_> = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| (t.kind(), t.text().to_string()))
            .collect();
        assert_eq!(tokens[1], (SyntaxKind::GreaterThanGreaterThan, ">>".to_string()));
        assert_eq!(tokens[3], (SyntaxKind::Semicolon, String::new()));
        assert_eq!(node.text().to_string(), source);
    }

    #[test]
    fn test_abandon_and_truncate() {
        let mut builder = CstBuilder::new();
        let root = builder.open();
        let m = builder.open();
        builder.abandon(m);
        assert_eq!(builder.len(), 1);
        let snapshot = builder.len();
        builder.token(SyntaxKind::Identifier, 1);
        builder.truncate(snapshot);
        builder.close(root, SyntaxKind::CompilationUnit);
        assert_eq!(builder.len(), 2);
    }
}
