//! Rowan language implementation for C#
//!
//! This module implements the `rowan::Language` trait for C#, which connects
//! our SyntaxKind enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SyntaxKind;

/// Language implementation for C#
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CSharpLanguage;

impl Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Raw kinds only ever come from `kind_to_raw`, so the index is in range.
        SyntaxKind::ALL
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::BadToken)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Red tree node for C#
pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;

/// Red tree token for C#
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;

/// Either a node or a token
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;

/// Whether `token` was synthesized by error recovery
///
/// Missing tokens are zero-width tokens of the expected kind. The end-of-file
/// token is zero-width too but always genuine.
pub fn is_missing(token: &SyntaxToken) -> bool {
    token.text().is_empty() && token.kind() != SyntaxKind::EndOfFile
}
