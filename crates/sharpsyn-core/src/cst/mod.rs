//! Concrete Syntax Tree (CST) for C#
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! Every byte of the input, including whitespace, comments, preprocessor
//! lines and tokens the parser could not place, ends up in the tree, so
//! `root.text() == source` holds for any input.
//!
//! ## Architecture
//!
//! - [`lexer`]: splits text into tokens carrying leading and trailing trivia
//! - `source`: lazy token buffer with arbitrary lookahead and rewind
//! - `parser`: recursive-descent productions emitting builder events
//! - `builder`: replays events into a Rowan green tree
//!
//! The green tree is immutable and position-independent; [`SyntaxNode`]
//! is the red view with parent pointers and absolute offsets.
//!
//! ## Trivia Handling
//!
//! Trivia is attached to tokens:
//! - **Leading trivia**: everything before a token since the previous line
//!   break
//! - **Trailing trivia**: everything after a token up to and including the
//!   next line break
//!
//! In the tree, trivia pieces become sibling tokens placed directly around
//! the token that owns them.
//!
//! ## Example
//!
//! ```rust
//! use sharpsyn_core::{ParseOptions, parse};
//! use sharpsyn_core::cst::SyntaxKind;
//!
//! let source = "class C { int x; } // done\n";
//! let parse = parse(source, ParseOptions::default());
//! assert_eq!(parse.syntax().text().to_string(), source);
//!
//! let comments = parse
//!     .syntax()
//!     .descendants_with_tokens()
//!     .filter_map(|e| e.into_token())
//!     .filter(|t| t.kind() == SyntaxKind::SingleLineComment)
//!     .count();
//! assert_eq!(comments, 1);
//! ```

mod builder;
mod language;
mod source;
mod syntax_kind;

pub(crate) mod parser;

pub mod ast;
pub mod lexer;
pub mod printer;
pub mod round_trip;
pub mod trivia;

pub use language::{CSharpLanguage, SyntaxElement, SyntaxNode, SyntaxToken, is_missing};
pub use lexer::{Token, Trivia, lex};
pub use printer::{TreePrinter, debug_tree};
pub use round_trip::{Difference, DifferenceKind, RoundTripValidator, ValidationResult};
pub use syntax_kind::SyntaxKind;
pub use trivia::{TriviaCollector, TriviaInfo};
