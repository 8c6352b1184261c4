//! Lookahead rules for ambiguous token sequences
//!
//! Everything here only peeks: no function in this module consumes tokens
//! or emits events. Scans are index based (`n` is a lookahead offset from
//! the current token) and bounded by [`MAX_SCAN`].

use super::Parser;
use crate::config::LanguageVersion;
use crate::cst::SyntaxKind;
use crate::cst::SyntaxKind::*;

/// Longest token window a single scan may inspect
const MAX_SCAN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ScanTypeFlags {
    NotType,
    /// Only a type can look like this (predefined, array, pointer, tuple)
    MustBeType,
    /// A generic name that could still be an expression operand
    GenericTypeOrExpression,
    /// A plain or qualified name that could still be an expression
    NonGenericTypeOrExpression,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ScannedType {
    /// Offset of the first token after the type
    pub(super) end: usize,
    pub(super) flags: ScanTypeFlags,
}

impl ScannedType {
    fn not_type(n: usize) -> Self {
        Self {
            end: n,
            flags: ScanTypeFlags::NotType,
        }
    }

    pub(super) fn is_type(&self) -> bool {
        self.flags != ScanTypeFlags::NotType
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DeclarationKind {
    Variable,
    LocalFunction,
}

pub(super) fn can_start_expression(p: &mut Parser<'_>, n: usize) -> bool {
    let kind = p.nth(n);
    kind.is_literal()
        || kind.is_predefined_type()
        || matches!(
            kind,
            Identifier
                | InterpolatedStringStart
                | InterpolatedVerbatimStringStart
                | OpenParen
                | Exclamation
                | Tilde
                | Minus
                | Plus
                | PlusPlus
                | MinusMinus
                | Ampersand
                | Asterisk
                | Caret
                | DotDot
                | ThisKw
                | BaseKw
                | NewKw
                | TypeofKw
                | SizeofKw
                | DefaultKw
                | CheckedKw
                | UncheckedKw
                | TrueKw
                | FalseKw
                | NullKw
                | DelegateKw
                | StackallocKw
                | ThrowKw
                | RefKw
                | ArglistKw
        )
}

/// Tokens that can directly follow the `)` of a cast whose type is only a
/// name; anything else keeps the parenthesized expression reading
fn can_follow_name_cast(kind: SyntaxKind) -> bool {
    kind.is_literal()
        || kind.is_predefined_type()
        || matches!(
            kind,
            Identifier
                | InterpolatedStringStart
                | InterpolatedVerbatimStringStart
                | OpenParen
                | Exclamation
                | Tilde
                | ThisKw
                | BaseKw
                | NewKw
                | TypeofKw
                | SizeofKw
                | DefaultKw
                | CheckedKw
                | UncheckedKw
                | TrueKw
                | FalseKw
                | NullKw
                | DelegateKw
                | StackallocKw
        )
}

pub(super) fn is_statement_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        IfKw | WhileKw
            | DoKw
            | ForKw
            | ForeachKw
            | SwitchKw
            | BreakKw
            | ContinueKw
            | ReturnKw
            | ThrowKw
            | GotoKw
            | TryKw
            | CheckedKw
            | UncheckedKw
            | LockKw
            | UsingKw
            | FixedKw
            | UnsafeKw
            | ConstKw
            | StaticKw
            | ExternKw
    )
}

pub(super) fn can_start_statement(p: &mut Parser<'_>) -> bool {
    let kind = p.current();
    matches!(kind, OpenBrace | Semicolon | OpenBracket)
        || is_statement_keyword(kind)
        || can_start_expression(p, 0)
}

/// Keywords that end a statement list: a block cannot contain them, so the
/// enclosing declaration gets a chance to resynchronize
pub(super) fn at_block_terminator(p: &mut Parser<'_>) -> bool {
    matches!(
        p.current(),
        PublicKw
            | PrivateKw
            | ProtectedKw
            | InternalKw
            | NamespaceKw
            | ClassKw
            | StructKw
            | InterfaceKw
            | EnumKw
    )
}

/// Offset of the delimiter closing the one at `n`
pub(super) fn matching_close(p: &mut Parser<'_>, n: usize) -> Option<usize> {
    let (open, close) = match p.nth(n) {
        OpenParen => (OpenParen, CloseParen),
        OpenBracket => (OpenBracket, CloseBracket),
        OpenBrace => (OpenBrace, CloseBrace),
        _ => return None,
    };
    let mut depth = 0usize;
    for i in n..n + MAX_SCAN {
        let kind = p.nth(i);
        if kind == open {
            depth += 1;
        } else if kind == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        } else if kind == EndOfFile || (open != OpenBrace && matches!(kind, Semicolon | OpenBrace | CloseBrace)) {
            return None;
        }
    }
    None
}

/// Whether the parenthesized list starting at `n` contains a comma at its
/// own nesting level
pub(super) fn has_top_level_comma(p: &mut Parser<'_>, open: usize, close: usize) -> bool {
    let mut depth = 0usize;
    for i in open + 1..close {
        match p.nth(i) {
            OpenParen | OpenBracket | OpenBrace => depth += 1,
            CloseParen | CloseBracket | CloseBrace => depth = depth.saturating_sub(1),
            Comma if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

// --- types ---------------------------------------------------------------

pub(super) fn scan_type(p: &mut Parser<'_>, n: usize) -> ScannedType {
    scan_type_inner(p, n, 0)
}

fn scan_type_inner(p: &mut Parser<'_>, n: usize, depth: usize) -> ScannedType {
    if depth > 32 {
        return ScannedType::not_type(n);
    }
    let mut result = scan_non_array_type(p, n, depth);
    if !result.is_type() {
        return result;
    }

    loop {
        let i = result.end;
        match p.nth(i) {
            Question if nullable_follows(p, i + 1) => {
                result = ScannedType {
                    end: i + 1,
                    flags: ScanTypeFlags::MustBeType,
                };
            }
            Asterisk if pointer_follows(p, i + 1) => {
                result = ScannedType {
                    end: i + 1,
                    flags: ScanTypeFlags::MustBeType,
                };
            }
            OpenBracket if matches!(p.nth(i + 1), CloseBracket | Comma) => {
                let mut j = i + 1;
                while p.nth(j) == Comma {
                    j += 1;
                }
                if p.nth(j) != CloseBracket {
                    return result;
                }
                result = ScannedType {
                    end: j + 1,
                    flags: ScanTypeFlags::MustBeType,
                };
            }
            _ => return result,
        }
    }
}

fn scan_non_array_type(p: &mut Parser<'_>, n: usize, depth: usize) -> ScannedType {
    let kind = p.nth(n);
    if kind.is_predefined_type() {
        return ScannedType {
            end: n + 1,
            flags: ScanTypeFlags::MustBeType,
        };
    }
    match kind {
        OpenParen => scan_tuple_type(p, n, depth),
        Identifier => scan_named_type(p, n, depth),
        _ => ScannedType::not_type(n),
    }
}

fn scan_named_type(p: &mut Parser<'_>, n: usize, depth: usize) -> ScannedType {
    let mut i = n;
    let mut flags = ScanTypeFlags::NonGenericTypeOrExpression;
    if p.nth(i + 1) == ColonColon {
        if p.nth(i + 2) != Identifier {
            return ScannedType::not_type(n);
        }
        i += 2;
    }
    loop {
        i += 1;
        if p.nth(i) == LessThan
            && let Some(end) = scan_type_argument_list_inner(p, i, depth + 1)
        {
            i = end;
            flags = ScanTypeFlags::GenericTypeOrExpression;
        }
        if p.nth(i) == Dot && p.nth(i + 1) == Identifier {
            i += 1;
            continue;
        }
        return ScannedType { end: i, flags };
    }
}

fn scan_tuple_type(p: &mut Parser<'_>, n: usize, depth: usize) -> ScannedType {
    let mut i = n + 1;
    let mut elements = 0;
    loop {
        let element = scan_type_inner(p, i, depth + 1);
        if !element.is_type() {
            return ScannedType::not_type(n);
        }
        i = element.end;
        if p.nth(i) == Identifier {
            i += 1;
        }
        elements += 1;
        match p.nth(i) {
            Comma => i += 1,
            CloseParen if elements >= 2 => {
                return ScannedType {
                    end: i + 1,
                    flags: ScanTypeFlags::MustBeType,
                };
            }
            _ => return ScannedType::not_type(n),
        }
    }
}

/// Offset just past the `>` closing the type argument list at `n`
pub(super) fn scan_type_argument_list(p: &mut Parser<'_>, n: usize) -> Option<usize> {
    scan_type_argument_list_inner(p, n, 0)
}

fn scan_type_argument_list_inner(p: &mut Parser<'_>, n: usize, depth: usize) -> Option<usize> {
    if p.nth(n) != LessThan {
        return None;
    }
    let mut i = n + 1;
    if matches!(p.nth(i), GreaterThan | Comma) {
        while p.nth(i) == Comma {
            i += 1;
        }
        return (p.nth(i) == GreaterThan).then_some(i + 1);
    }
    loop {
        if i > n + MAX_SCAN {
            return None;
        }
        let argument = scan_type_inner(p, i, depth + 1);
        if !argument.is_type() {
            return None;
        }
        i = argument.end;
        match p.nth(i) {
            Comma => i += 1,
            GreaterThan => return Some(i + 1),
            _ => return None,
        }
    }
}

/// `?` at `n - 1` is a nullable suffix rather than a conditional operator
fn nullable_follows(p: &mut Parser<'_>, n: usize) -> bool {
    if p.nth(n) == Identifier {
        return match p.nth(n + 1) {
            Equals | Semicolon | Comma | CloseParen | InKw => true,
            OpenParen => matching_close(p, n + 1)
                .is_some_and(|close| matches!(p.nth(close + 1), OpenBrace | EqualsGreaterThan)),
            _ => false,
        };
    }
    !can_start_expression(p, n) || matches!(p.nth(n), OpenBracket)
}

/// `*` at `n - 1` is a pointer suffix rather than multiplication
fn pointer_follows(p: &mut Parser<'_>, n: usize) -> bool {
    match p.nth(n) {
        Asterisk | CloseParen | Comma | GreaterThan | OpenBracket => true,
        Identifier => matches!(p.nth(n + 1), Equals | Semicolon | Comma | CloseParen | InKw),
        _ => false,
    }
}

/// In an expression, whether `<` at `n` opens type arguments
pub(super) fn is_generic_argument_list(p: &mut Parser<'_>, n: usize) -> bool {
    let Some(end) = scan_type_argument_list(p, n) else {
        return false;
    };
    matches!(
        p.nth(end),
        OpenParen
            | CloseParen
            | CloseBracket
            | CloseBrace
            | Colon
            | Semicolon
            | Comma
            | Dot
            | Question
            | EqualsEquals
            | ExclamationEquals
            | Bar
            | Caret
            | AmpersandAmpersand
            | BarBar
            | Ampersand
            | OpenBracket
            | EndOfFile
    )
}

// --- statements ----------------------------------------------------------

/// Whether the tokens at `n` begin a local declaration or local function
pub(super) fn declaration_at(p: &mut Parser<'_>, n: usize) -> Option<DeclarationKind> {
    let mut i = n;
    if p.nth(i) == RefKw {
        i += 1;
        if p.nth(i) == ReadonlyKw {
            i += 1;
        }
    }
    let scanned = scan_type(p, i);
    if !scanned.is_type() {
        return None;
    }
    let name = scanned.end;
    if p.nth(name) != Identifier {
        return None;
    }
    // `a with { ... }` is a with-expression, not a local named `with`
    if p.nth_at_contextual(name, WithKw) && p.nth(name + 1) == OpenBrace {
        return None;
    }
    let nullable = p.nth(name - 1) == Question;

    match p.nth(name + 1) {
        Equals | Semicolon | Comma => Some(DeclarationKind::Variable),
        OpenParen => {
            let close = matching_close(p, name + 1)?;
            let follows_body = matches!(p.nth(close + 1), OpenBrace | EqualsGreaterThan | Semicolon)
                || p.nth_at_contextual(close + 1, WhereKw);
            if nullable && !follows_body {
                None
            } else {
                Some(DeclarationKind::LocalFunction)
            }
        }
        LessThan if !nullable => Some(DeclarationKind::LocalFunction),
        _ if nullable => None,
        // identifier followed by identifier can only be a declaration
        _ => Some(DeclarationKind::Variable),
    }
}

/// A typed declaration such as `int x` or `var y` used as an expression,
/// ended by one of `follow`
pub(super) fn is_declaration_expression(p: &mut Parser<'_>, n: usize, follow: &[SyntaxKind]) -> bool {
    let scanned = scan_type(p, n);
    if !scanned.is_type() || p.nth(scanned.end) != Identifier {
        return false;
    }
    follow.contains(&p.nth(scanned.end + 1))
}

/// `var (a, b)` followed by `=` or `in`
pub(super) fn is_var_designation(p: &mut Parser<'_>, n: usize) -> bool {
    if p.nth(n) != Identifier || p.nth_text(n) != "var" || p.nth(n + 1) != OpenParen {
        return false;
    }
    let Some(close) = matching_close(p, n + 1) else {
        return false;
    };
    if !matches!(p.nth(close + 1), Equals | InKw) {
        return false;
    }
    (n + 2..close).all(|i| matches!(p.nth(i), Identifier | Comma | OpenParen | CloseParen))
}

// --- lambdas and parentheses --------------------------------------------

pub(super) fn is_simple_lambda(p: &mut Parser<'_>, n: usize) -> bool {
    p.nth(n) == Identifier && p.nth(n + 1) == EqualsGreaterThan
}

pub(super) fn is_parenthesized_lambda(p: &mut Parser<'_>, n: usize) -> bool {
    if p.nth(n) != OpenParen {
        return false;
    }
    matching_close(p, n).is_some_and(|close| p.nth(close + 1) == EqualsGreaterThan)
}

/// Lambda or anonymous method at `n`, including `async`/`static` prefixes
pub(super) fn is_lambda_start(p: &mut Parser<'_>, n: usize) -> bool {
    let mut i = n;
    loop {
        if p.nth(i) == StaticKw || (p.nth_at_contextual(i, AsyncKw) && p.nth(i + 1) != EqualsGreaterThan) {
            i += 1;
            continue;
        }
        break;
    }
    if i > n && p.nth(i) == DelegateKw {
        return true;
    }
    is_simple_lambda(p, i) || is_parenthesized_lambda(p, i)
}

/// `(` at the current token starts a cast
pub(super) fn is_cast(p: &mut Parser<'_>) -> bool {
    let scanned = scan_type(p, 1);
    if !scanned.is_type() || p.nth(scanned.end) != CloseParen {
        return false;
    }
    let after = p.nth(scanned.end + 1);
    match scanned.flags {
        ScanTypeFlags::MustBeType => {
            can_follow_name_cast(after)
                || matches!(after, Minus | Plus | PlusPlus | MinusMinus | Asterisk | Ampersand)
        }
        _ => can_follow_name_cast(after),
    }
}

// --- contextual keywords -------------------------------------------------

/// `from x in` or `from T x in`
pub(super) fn is_query_start(p: &mut Parser<'_>, n: usize) -> bool {
    if !p.nth_at_contextual(n, FromKw) {
        return false;
    }
    if p.nth(n + 1) == Identifier && p.nth(n + 2) == InKw {
        return true;
    }
    let scanned = scan_type(p, n + 1);
    scanned.is_type() && p.nth(scanned.end) == Identifier && p.nth(scanned.end + 1) == InKw
}

/// `record` starts a record declaration at `n`
pub(super) fn is_record_start(p: &mut Parser<'_>, n: usize) -> bool {
    if p.options().language_version < LanguageVersion::CSharp9 || !p.nth_at_contextual(n, RecordKw) {
        return false;
    }
    match p.nth(n + 1) {
        ClassKw | StructKw => true,
        Identifier => {
            matches!(p.nth(n + 2), OpenParen | OpenBrace | LessThan | Colon | Semicolon)
                || p.nth_at_contextual(n + 2, WhereKw)
        }
        _ => false,
    }
}

/// `async` at `n` is a modifier of the declaration that follows
pub(super) fn is_async_modifier(p: &mut Parser<'_>, n: usize) -> bool {
    if !p.nth_at_contextual(n, AsyncKw) {
        return false;
    }
    let next = p.nth(n + 1);
    if next.is_predefined_type() || next.is_modifier() || next == VoidKw || next == OpenParen {
        return next != OpenParen || scan_type(p, n + 1).is_type();
    }
    next == Identifier && !matches!(p.nth(n + 2), Semicolon | Equals | Comma | OpenParen | EqualsGreaterThan)
}

/// `partial` at `n` is a modifier
pub(super) fn is_partial_modifier(p: &mut Parser<'_>, n: usize) -> bool {
    if !p.nth_at_contextual(n, PartialKw) {
        return false;
    }
    let next = p.nth(n + 1);
    matches!(next, ClassKw | StructKw | InterfaceKw | VoidKw)
        || next.is_modifier()
        || is_record_start(p, n + 1)
        || next.is_predefined_type()
        || (next == Identifier && p.nth(n + 2) == Identifier)
}

/// Modifier tokens (reserved or contextual) at `n`
pub(super) fn is_modifier_at(p: &mut Parser<'_>, n: usize) -> bool {
    let kind = p.nth(n);
    if kind == RefKw {
        return p.nth(n + 1) == StructKw || is_partial_modifier(p, n + 1);
    }
    if kind == NewKw && p.nth(n + 1) == OpenParen {
        return false;
    }
    kind.is_modifier() || is_partial_modifier(p, n) || is_async_modifier(p, n)
}

/// After attributes and modifiers, the tokens at `n` declare a type or
/// namespace
pub(super) fn is_type_declaration_at(p: &mut Parser<'_>, n: usize) -> bool {
    let mut i = n;
    while i < n + MAX_SCAN && is_modifier_at(p, i) {
        i += 1;
    }
    match p.nth(i) {
        ClassKw | StructKw | InterfaceKw | EnumKw | NamespaceKw => true,
        DelegateKw => !matches!(p.nth(i + 1), OpenParen | OpenBrace),
        _ => is_record_start(p, i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;

    fn with_parser<T>(text: &str, f: impl FnOnce(&mut Parser<'_>) -> T) -> T {
        let mut p = Parser::new(text, ParseOptions::default());
        f(&mut p)
    }

    #[test]
    fn test_scan_type_shapes() {
        with_parser("List<int>[] x", |p| {
            let scanned = scan_type(p, 0);
            assert_eq!(scanned.flags, ScanTypeFlags::MustBeType);
            assert_eq!(scanned.end, 6);
        });
        with_parser("A.B<C, D>.E x", |p| {
            let scanned = scan_type(p, 0);
            assert_eq!(scanned.flags, ScanTypeFlags::GenericTypeOrExpression);
            assert_eq!(p.nth(scanned.end), Identifier);
        });
        with_parser("(int a, string) t", |p| {
            assert_eq!(scan_type(p, 0).flags, ScanTypeFlags::MustBeType);
        });
        with_parser("1 + 2", |p| assert!(!scan_type(p, 0).is_type()));
    }

    #[test]
    fn test_nullable_versus_conditional() {
        with_parser("int? x = 1;", |p| {
            assert_eq!(declaration_at(p, 0), Some(DeclarationKind::Variable));
        });
        with_parser("a ? b : c;", |p| assert_eq!(declaration_at(p, 0), None));
        with_parser("T? M() { }", |p| {
            assert_eq!(declaration_at(p, 0), Some(DeclarationKind::LocalFunction));
        });
    }

    #[test]
    fn test_declaration_versus_expression() {
        with_parser("a b;", |p| assert_eq!(declaration_at(p, 0), Some(DeclarationKind::Variable)));
        with_parser("a.b = c;", |p| assert_eq!(declaration_at(p, 0), None));
        with_parser("f(x);", |p| assert_eq!(declaration_at(p, 0), None));
        with_parser("a<b> c;", |p| {
            assert_eq!(declaration_at(p, 0), Some(DeclarationKind::Variable))
        });
        with_parser("a < b;", |p| assert_eq!(declaration_at(p, 0), None));
        with_parser("record C(int X, int Y);", |p| {
            assert_eq!(declaration_at(p, 0), Some(DeclarationKind::LocalFunction))
        });
        with_parser("a * b + c;", |p| assert_eq!(declaration_at(p, 0), None));
        with_parser("int* p = null;", |p| {
            assert_eq!(declaration_at(p, 0), Some(DeclarationKind::Variable))
        });
    }

    #[test]
    fn test_generic_versus_comparison() {
        with_parser("F<int>(x)", |p| assert!(is_generic_argument_list(p, 1)));
        with_parser("a < b > c", |p| assert!(!is_generic_argument_list(p, 1)));
        with_parser("a < b", |p| assert!(!is_generic_argument_list(p, 1)));
        with_parser("typeof(List<>)", |p| assert_eq!(scan_type_argument_list(p, 3), Some(5)));
    }

    #[test]
    fn test_casts_and_lambdas() {
        with_parser("(int)-x", |p| assert!(is_cast(p)));
        with_parser("(a)-x", |p| assert!(!is_cast(p)));
        with_parser("(a)b", |p| assert!(is_cast(p)));
        with_parser("(a, b) => a", |p| assert!(is_parenthesized_lambda(p, 0)));
        with_parser("async x => x", |p| assert!(is_lambda_start(p, 0)));
        with_parser("(a, b)", |p| assert!(!is_lambda_start(p, 0)));
    }

    #[test]
    fn test_record_needs_companion_token() {
        with_parser("record R(int X);", |p| assert!(is_record_start(p, 0)));
        with_parser("record struct S;", |p| assert!(is_record_start(p, 0)));
        with_parser("record = 1;", |p| assert!(!is_record_start(p, 0)));
        with_parser("record++;", |p| assert!(!is_record_start(p, 0)));
        let options = ParseOptions::new(LanguageVersion::CSharp8);
        let mut p = Parser::new("record R(int X);", options);
        assert!(!is_record_start(&mut p, 0));
    }

    #[test]
    fn test_query_start() {
        with_parser("from x in xs select x", |p| assert!(is_query_start(p, 0)));
        with_parser("from int x in xs select x", |p| assert!(is_query_start(p, 0)));
        with_parser("from + 1", |p| assert!(!is_query_start(p, 0)));
    }

    #[test]
    fn test_var_designation() {
        with_parser("var (a, (b, c)) = t;", |p| assert!(is_var_designation(p, 0)));
        with_parser("var(1);", |p| assert!(!is_var_designation(p, 0)));
    }
}
