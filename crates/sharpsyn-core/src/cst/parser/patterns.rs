//! Patterns for `is`, `case` labels and switch expression arms

use super::disambiguation::{
    ScanTypeFlags, can_start_expression, has_top_level_comma, matching_close, scan_type,
};
use super::expressions::{self, Precedence};
use super::types::{self, TypeMode};
use super::{CompletedMarker, Parser};
use crate::cst::SyntaxKind::{self, *};
use crate::features::Feature;

/// `or` binds loosest, then `and`, then `not`
pub(super) fn pattern(p: &mut Parser<'_>) -> CompletedMarker {
    let mut lhs = and_pattern(p);
    while p.at_contextual(OrKw) && can_start_pattern(p, 1) {
        lhs = combinator(p, lhs, OrKw, and_pattern);
    }
    lhs
}

fn and_pattern(p: &mut Parser<'_>) -> CompletedMarker {
    let mut lhs = not_pattern(p);
    while p.at_contextual(AndKw) && can_start_pattern(p, 1) {
        lhs = combinator(p, lhs, AndKw, not_pattern);
    }
    lhs
}

fn combinator(
    p: &mut Parser<'_>,
    lhs: CompletedMarker,
    keyword: SyntaxKind,
    rhs: fn(&mut Parser<'_>) -> CompletedMarker,
) -> CompletedMarker {
    let m = lhs.precede(p);
    let span = p.current_span();
    p.bump_remap(keyword);
    p.check_feature(Feature::PatternCombinators, span);
    rhs(p);
    m.complete(p, BinaryPattern)
}

fn not_pattern(p: &mut Parser<'_>) -> CompletedMarker {
    if !(p.at_contextual(NotKw) && can_start_pattern(p, 1)) {
        return primary_pattern(p);
    }
    let m = p.start();
    let span = p.current_span();
    p.bump_remap(NotKw);
    p.check_feature(Feature::PatternCombinators, span);
    not_pattern(p);
    m.complete(p, UnaryPattern)
}

fn can_start_pattern(p: &mut Parser<'_>, n: usize) -> bool {
    matches!(
        p.nth(n),
        OpenBrace | LessThan | LessThanEquals | GreaterThan | GreaterThanEquals | EqualsEquals | ExclamationEquals
    ) || can_start_expression(p, n)
}

fn is_relational_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        LessThan | LessThanEquals | GreaterThan | GreaterThanEquals | EqualsEquals | ExclamationEquals
    )
}

/// An identifier at `n` that names a designation rather than continuing
/// the pattern
fn designation_at(p: &mut Parser<'_>, n: usize) -> bool {
    p.nth(n) == Identifier
        && !p.nth_at_contextual(n, AndKw)
        && !p.nth_at_contextual(n, OrKw)
        && !p.nth_at_contextual(n, WhenKw)
}

fn primary_pattern(p: &mut Parser<'_>) -> CompletedMarker {
    if !p.enter() {
        p.leave();
        return constant_pattern(p);
    }
    let result = primary_pattern_inner(p);
    p.leave();
    result
}

fn primary_pattern_inner(p: &mut Parser<'_>) -> CompletedMarker {
    let kind = p.current();
    if is_relational_operator(kind) {
        let m = p.start();
        let span = p.current_span();
        p.bump();
        p.check_feature(Feature::RelationalPatterns, span);
        expressions::sub_expression(p, Precedence::Shift);
        return m.complete(p, RelationalPattern);
    }
    match kind {
        OpenParen => parenthesized_or_positional(p),
        OpenBrace => {
            let m = p.start();
            let span = p.current_span();
            property_pattern_clause(p);
            p.check_feature(Feature::RecursivePatterns, span);
            optional_designation(p);
            m.complete(p, RecursivePattern)
        }
        Identifier if p.current_text() == "_" && !matches!(p.nth(1), Identifier | OpenParen | OpenBrace | Dot) => {
            let m = p.start();
            p.bump();
            m.complete(p, DiscardPattern)
        }
        Identifier if p.current_text() == "var" && matches!(p.nth(1), Identifier | OpenParen) => {
            let m = p.start();
            p.bump();
            expressions::designation(p);
            m.complete(p, VarPattern)
        }
        _ => type_or_constant_pattern(p),
    }
}

fn type_or_constant_pattern(p: &mut Parser<'_>) -> CompletedMarker {
    let scanned = scan_type(p, 0);
    if !scanned.is_type() {
        return constant_pattern(p);
    }
    let after = p.nth(scanned.end);
    if matches!(after, OpenParen | OpenBrace) {
        let m = p.start();
        let span = p.current_span();
        types::type_with_mode(p, TypeMode::AfterIs);
        if p.at(OpenParen) {
            positional_pattern_clause(p);
        }
        if p.at(OpenBrace) {
            property_pattern_clause(p);
        }
        p.check_feature(Feature::RecursivePatterns, span);
        optional_designation(p);
        return m.complete(p, RecursivePattern);
    }
    if designation_at(p, scanned.end) {
        let m = p.start();
        types::type_with_mode(p, TypeMode::AfterIs);
        expressions::designation(p);
        return m.complete(p, DeclarationPattern);
    }
    match scanned.flags {
        ScanTypeFlags::MustBeType | ScanTypeFlags::GenericTypeOrExpression => {
            let m = p.start();
            let span = p.current_span();
            types::type_with_mode(p, TypeMode::AfterIs);
            p.check_feature(Feature::TypePatterns, span);
            m.complete(p, TypePattern)
        }
        _ => constant_pattern(p),
    }
}

fn constant_pattern(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    expressions::sub_expression(p, Precedence::Shift);
    m.complete(p, ConstantPattern)
}

fn parenthesized_or_positional(p: &mut Parser<'_>) -> CompletedMarker {
    let parenthesized = match matching_close(p, 0) {
        Some(close) => {
            close > 1
                && !(p.nth(1) == Identifier && p.nth(2) == Colon)
                && !has_top_level_comma(p, 0, close)
                && p.nth(close + 1) != OpenBrace
                && !designation_at(p, close + 1)
        }
        None => false,
    };
    let m = p.start();
    if parenthesized {
        p.bump();
        pattern(p);
        p.expect(CloseParen);
        return m.complete(p, ParenthesizedPattern);
    }
    let span = p.current_span();
    positional_pattern_clause(p);
    if p.at(OpenBrace) {
        property_pattern_clause(p);
    }
    p.check_feature(Feature::RecursivePatterns, span);
    optional_designation(p);
    m.complete(p, RecursivePattern)
}

fn optional_designation(p: &mut Parser<'_>) {
    if designation_at(p, 0) {
        expressions::designation(p);
    }
}

fn positional_pattern_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if !p.at(CloseParen) {
        loop {
            subpattern(p);
            if !p.eat(Comma) {
                break;
            }
        }
    }
    p.expect(CloseParen);
    m.complete(p, PositionalPatternClause);
}

fn property_pattern_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    while !p.at(CloseBrace) && !p.at_end() {
        let before = p.position();
        subpattern(p);
        p.force_progress(before, |p| p.at(Comma) || p.at(CloseBrace));
        if !p.eat(Comma) {
            break;
        }
    }
    p.expect(CloseBrace);
    m.complete(p, PropertyPatternClause);
}

/// `A.B.C:` where an extended property pattern names a nested member
fn is_extended_property_name(p: &mut Parser<'_>) -> bool {
    let mut i = 0;
    while p.nth(i) == Identifier && p.nth(i + 1) == Dot {
        i += 2;
    }
    i > 0 && p.nth(i) == Identifier && p.nth(i + 1) == Colon
}

fn subpattern(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(Identifier) && p.nth(1) == Colon {
        expressions::name_colon(p);
    } else if is_extended_property_name(p) {
        let name = p.start();
        let span = p.current_span();
        let mut lhs = expressions::simple_name(p);
        while p.at(Dot) {
            let access = lhs.precede(p);
            p.bump();
            expressions::simple_name(p);
            lhs = access.complete(p, MemberAccessExpression);
        }
        p.bump();
        p.check_feature(Feature::ExtendedPropertyPatterns, span);
        name.complete(p, NameColon);
    }
    pattern(p);
    m.complete(p, Subpattern);
}

#[cfg(test)]
mod tests {
    use crate::config::{LanguageVersion, ParseEntry, ParseOptions};
    use crate::cst::parser::parse_text;
    use crate::cst::{SyntaxKind, SyntaxNode};
    use crate::diagnostics::ErrorCode;

    fn pattern_of(text: &str) -> SyntaxNode {
        let source = format!("x is {text}");
        let options = ParseOptions::default().with_entry(ParseEntry::Expression);
        let (green, diagnostics) = parse_text(&source, options);
        assert!(diagnostics.is_empty(), "{text}: {diagnostics:?}");
        let root = SyntaxNode::new_root(green);
        let is = root.first_child().unwrap();
        assert_eq!(is.kind(), SyntaxKind::IsPatternExpression);
        is.children().nth(1).unwrap()
    }

    fn kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
        node.children().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_combinators() {
        let pattern = pattern_of("> 0 and < 10 or 42");
        assert_eq!(pattern.kind(), SyntaxKind::BinaryPattern);
        assert_eq!(
            kinds(&pattern),
            vec![SyntaxKind::BinaryPattern, SyntaxKind::ConstantPattern]
        );
        let not = pattern_of("not null");
        assert_eq!(not.kind(), SyntaxKind::UnaryPattern);
    }

    #[test]
    fn test_recursive_patterns() {
        let pattern = pattern_of("(1, _) { Length: > 2 } p");
        assert_eq!(pattern.kind(), SyntaxKind::RecursivePattern);
        assert_eq!(
            kinds(&pattern),
            vec![
                SyntaxKind::PositionalPatternClause,
                SyntaxKind::PropertyPatternClause,
                SyntaxKind::SingleVariableDesignation,
            ]
        );
        let typed = pattern_of("Point { X: 0 }");
        assert_eq!(
            kinds(&typed),
            vec![SyntaxKind::IdentifierName, SyntaxKind::PropertyPatternClause]
        );
    }

    #[test]
    fn test_parenthesized_pattern() {
        let pattern = pattern_of("(> 1 or < -1)");
        assert_eq!(pattern.kind(), SyntaxKind::ParenthesizedPattern);
    }

    #[test]
    fn test_var_and_type_patterns() {
        assert_eq!(pattern_of("var (a, b)").kind(), SyntaxKind::VarPattern);
        assert_eq!(pattern_of("int or long").kind(), SyntaxKind::BinaryPattern);
        let pattern = pattern_of("int or long");
        assert_eq!(
            kinds(&pattern),
            vec![SyntaxKind::TypePattern, SyntaxKind::TypePattern]
        );
        let constants = pattern_of("Color.Red or Color.Blue");
        assert_eq!(
            kinds(&constants),
            vec![SyntaxKind::ConstantPattern, SyntaxKind::ConstantPattern]
        );
    }

    #[test]
    fn test_extended_property_pattern() {
        let pattern = pattern_of("{ A.B: 1 }");
        let name = pattern
            .descendants()
            .find(|n| n.kind() == SyntaxKind::NameColon)
            .unwrap();
        assert_eq!(
            name.first_child().map(|n| n.kind()),
            Some(SyntaxKind::MemberAccessExpression)
        );
    }

    #[test]
    fn test_combinators_gated() {
        let options = ParseOptions::new(LanguageVersion::CSharp8).with_entry(ParseEntry::Expression);
        let (_, diagnostics) = parse_text("x is not null", options);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::FeatureNotAvailable);
        assert_eq!(diagnostics[0].args[0], "pattern combinators");
    }
}
