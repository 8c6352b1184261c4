//! Types and names

use super::disambiguation::{can_start_expression, scan_type_argument_list};
use super::{CompletedMarker, Parser, expressions};
use crate::cst::SyntaxKind::*;
use crate::diagnostics::ErrorCode;
use crate::features::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TypeMode {
    Normal,
    /// After `is`/`as` and inside patterns, where `?` may be a conditional
    AfterIs,
    /// Element type of `new T[n]`: rank specifiers may carry sizes
    ArrayCreation,
}

pub(super) fn type_(p: &mut Parser<'_>) -> CompletedMarker {
    type_with_mode(p, TypeMode::Normal)
}

/// Return and local types, which may be `ref` or `ref readonly`
pub(super) fn return_type(p: &mut Parser<'_>) -> CompletedMarker {
    if !p.at(RefKw) {
        return type_(p);
    }
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::RefLocalsAndReturns, span);
    if p.at(ReadonlyKw) {
        let span = p.current_span();
        p.bump();
        p.check_feature(Feature::ReadonlyReferences, span);
    }
    type_(p);
    m.complete(p, RefType)
}

pub(super) fn type_with_mode(p: &mut Parser<'_>, mode: TypeMode) -> CompletedMarker {
    let mut lhs = non_array_type(p, mode);
    loop {
        match p.current() {
            Question if nullable_allowed(p, mode) => {
                let m = lhs.precede(p);
                let span = p.current_span();
                p.bump();
                p.check_feature(Feature::NullableTypes, span);
                lhs = m.complete(p, NullableType);
            }
            Asterisk if mode != TypeMode::AfterIs => {
                let m = lhs.precede(p);
                p.bump();
                lhs = m.complete(p, PointerType);
            }
            OpenBracket if is_rank_specifier(p, mode) => {
                let m = lhs.precede(p);
                let mut allow_sizes = mode == TypeMode::ArrayCreation;
                while p.at(OpenBracket) && (allow_sizes || is_rank_specifier(p, TypeMode::Normal)) {
                    array_rank_specifier(p, allow_sizes);
                    allow_sizes = false;
                }
                lhs = m.complete(p, ArrayType);
            }
            _ => return lhs,
        }
    }
}

fn nullable_allowed(p: &mut Parser<'_>, mode: TypeMode) -> bool {
    match mode {
        TypeMode::AfterIs => !can_start_expression(p, 1),
        TypeMode::Normal | TypeMode::ArrayCreation => true,
    }
}

fn is_rank_specifier(p: &mut Parser<'_>, mode: TypeMode) -> bool {
    match mode {
        TypeMode::ArrayCreation => true,
        _ => matches!(p.nth(1), CloseBracket | Comma),
    }
}

fn non_array_type(p: &mut Parser<'_>, mode: TypeMode) -> CompletedMarker {
    let kind = p.current();
    if kind.is_predefined_type() {
        let m = p.start();
        p.bump();
        return m.complete(p, PredefinedType);
    }
    match kind {
        OpenParen => tuple_type(p),
        Identifier => name(p, mode == TypeMode::AfterIs),
        _ => {
            let m = p.start();
            p.missing(Identifier, ErrorCode::TypeExpected);
            m.complete(p, IdentifierName)
        }
    }
}

/// Qualified or alias-qualified name in type position. With `strict`, a
/// `<` only opens type arguments when a full argument list follows.
pub(super) fn name(p: &mut Parser<'_>, strict: bool) -> CompletedMarker {
    let mut lhs = if p.at(Identifier) && p.nth(1) == ColonColon {
        alias_qualified_name(p, strict)
    } else {
        simple_name_in_type(p, strict)
    };
    while p.at(Dot) {
        let m = lhs.precede(p);
        p.bump();
        simple_name_in_type(p, strict);
        lhs = m.complete(p, QualifiedName);
    }
    lhs
}

/// Exactly `segments` dotted name segments, stopping before the next dot
pub(super) fn name_segments(p: &mut Parser<'_>, segments: usize) -> CompletedMarker {
    let mut lhs = simple_name_in_type(p, false);
    for _ in 1..segments {
        let m = lhs.precede(p);
        p.bump();
        simple_name_in_type(p, false);
        lhs = m.complete(p, QualifiedName);
    }
    lhs
}

fn alias_qualified_name(p: &mut Parser<'_>, strict: bool) -> CompletedMarker {
    let alias = p.start();
    if p.at_contextual(GlobalKw) {
        p.bump_remap(GlobalKw);
    } else {
        p.bump();
    }
    let alias = alias.complete(p, IdentifierName);
    let m = alias.precede(p);
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::GlobalNamespace, span);
    simple_name_in_type(p, strict);
    m.complete(p, AliasQualifiedName)
}

fn simple_name_in_type(p: &mut Parser<'_>, strict: bool) -> CompletedMarker {
    let m = p.start();
    p.expect_identifier();
    let generic = p.at(LessThan) && (!strict || scan_type_argument_list(p, 0).is_some());
    if generic {
        type_argument_list(p);
        m.complete(p, GenericName)
    } else {
        m.complete(p, IdentifierName)
    }
}

/// `<T, U>`, or `<>`/`<,>` with omitted arguments
pub(super) fn type_argument_list(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::Generics, span);
    if p.at(GreaterThan) || p.at(Comma) {
        loop {
            let omitted = p.start();
            omitted.complete(p, OmittedTypeArgument);
            if !p.eat(Comma) {
                break;
            }
        }
    } else {
        loop {
            type_(p);
            if !p.eat(Comma) {
                break;
            }
        }
    }
    p.expect(GreaterThan);
    m.complete(p, TypeArgumentList)
}

fn tuple_type(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::Tuples, span);
    loop {
        let element = p.start();
        type_(p);
        if p.at(Identifier) {
            p.bump();
        }
        element.complete(p, TupleElement);
        if !p.eat(Comma) {
            break;
        }
    }
    p.expect(CloseParen);
    m.complete(p, TupleType)
}

fn array_rank_specifier(p: &mut Parser<'_>, allow_sizes: bool) {
    let m = p.start();
    p.bump();
    loop {
        if allow_sizes && can_start_expression(p, 0) {
            expressions::expression(p);
        } else {
            let omitted = p.start();
            omitted.complete(p, OmittedArraySizeExpression);
        }
        if !p.eat(Comma) {
            break;
        }
    }
    p.expect(CloseBracket);
    m.complete(p, ArrayRankSpecifier);
}
