//! Expressions
//!
//! Binary operators use precedence climbing over [`Precedence`]. Assignment
//! and `??` are right-associative; `?:` is handled after the operator loop.
//! `switch` and `with` are postfix forms sitting between multiplicative and
//! range operators, so `a() with { } + 1` groups as `(a() with { }) + 1`.
//! Lambdas, queries and casts are recognised as primaries.

use super::disambiguation::{
    can_start_expression, is_cast, is_declaration_expression, is_generic_argument_list,
    is_lambda_start, is_parenthesized_lambda, is_query_start, is_var_designation, scan_type,
};
use super::types::{self, TypeMode};
use super::{CompletedMarker, Parser, TokenSet, declarations, patterns, statements};
use crate::cst::SyntaxKind::{self, *};
use crate::diagnostics::ErrorCode;
use crate::features::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Expression,
    Assignment,
    Conditional,
    Coalescing,
    ConditionalOr,
    ConditionalAnd,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Switch,
    Range,
    Unary,
}

impl Precedence {
    fn is_right_associative(self) -> bool {
        matches!(self, Precedence::Assignment | Precedence::Coalescing)
    }
}

const QUERY_CLAUSE_KEYWORDS: &[SyntaxKind] = &[
    SelectKw,
    WhereKw,
    GroupKw,
    ByKw,
    OrderbyKw,
    JoinKw,
    OnKw,
    EqualsKw,
    IntoKw,
    LetKw,
    AscendingKw,
    DescendingKw,
];

const INTERPOLATION_RECOVERY: TokenSet =
    TokenSet::new(&[CloseBrace, InterpolatedStringEnd, InterpolatedStringTextToken]);

pub(super) fn expression(p: &mut Parser<'_>) -> CompletedMarker {
    sub_expression(p, Precedence::Expression)
}

pub(super) fn sub_expression(p: &mut Parser<'_>, precedence: Precedence) -> CompletedMarker {
    if !p.enter() {
        p.leave();
        return too_deep(p);
    }
    let lhs = unary_or_term(p);
    let result = binary_loop(p, lhs, precedence);
    p.leave();
    result
}

fn too_deep(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.skip_too_deep();
    p.missing_silent(Identifier);
    m.complete(p, IdentifierName)
}

/// Node kind and precedence of the binary or postfix operator at the
/// current token
fn binary_operator(p: &mut Parser<'_>) -> Option<(SyntaxKind, Precedence)> {
    if p.at(GreaterThanGreaterThanEquals) {
        return Some((AssignmentExpression, Precedence::Assignment));
    }
    if p.at(GreaterThanGreaterThan) {
        return Some((BinaryExpression, Precedence::Shift));
    }
    let kind = p.current();
    if kind.is_assignment_operator() {
        return Some((AssignmentExpression, Precedence::Assignment));
    }
    let operator = match kind {
        QuestionQuestion => (BinaryExpression, Precedence::Coalescing),
        BarBar => (BinaryExpression, Precedence::ConditionalOr),
        AmpersandAmpersand => (BinaryExpression, Precedence::ConditionalAnd),
        Bar => (BinaryExpression, Precedence::LogicalOr),
        Caret => (BinaryExpression, Precedence::LogicalXor),
        Ampersand => (BinaryExpression, Precedence::LogicalAnd),
        EqualsEquals | ExclamationEquals => (BinaryExpression, Precedence::Equality),
        LessThan | GreaterThan | LessThanEquals | GreaterThanEquals => {
            (BinaryExpression, Precedence::Relational)
        }
        IsKw => (IsPatternExpression, Precedence::Relational),
        AsKw => (BinaryExpression, Precedence::Relational),
        LessThanLessThan => (BinaryExpression, Precedence::Shift),
        Plus | Minus => (BinaryExpression, Precedence::Additive),
        Asterisk | Slash | Percent => (BinaryExpression, Precedence::Multiplicative),
        SwitchKw if p.nth(1) == OpenBrace => (SwitchExpression, Precedence::Switch),
        Identifier if p.at_contextual(WithKw) && p.nth(1) == OpenBrace => {
            (WithExpression, Precedence::Switch)
        }
        DotDot => (RangeExpression, Precedence::Range),
        _ => return None,
    };
    Some(operator)
}

fn binary_loop(p: &mut Parser<'_>, mut lhs: CompletedMarker, precedence: Precedence) -> CompletedMarker {
    while let Some((node, operator)) = binary_operator(p) {
        if operator < precedence || (operator == precedence && !operator.is_right_associative()) {
            break;
        }
        lhs = match node {
            SwitchExpression => switch_expression(p, lhs),
            WithExpression => with_expression(p, lhs),
            IsPatternExpression => is_expression(p, lhs),
            RangeExpression => {
                let m = lhs.precede(p);
                let span = p.current_span();
                p.bump();
                p.check_feature(Feature::Ranges, span);
                if can_start_expression(p, 0) {
                    sub_expression(p, Precedence::Range);
                }
                m.complete(p, RangeExpression)
            }
            _ if p.at(AsKw) => {
                let m = lhs.precede(p);
                p.bump();
                types::type_with_mode(p, TypeMode::AfterIs);
                m.complete(p, BinaryExpression)
            }
            _ => {
                let m = lhs.precede(p);
                let span = p.current_span();
                if p.bump_operator() == QuestionQuestionEquals {
                    p.check_feature(Feature::CoalesceAssignment, span);
                }
                sub_expression(p, operator);
                m.complete(p, node)
            }
        };
    }

    if p.at(Question) && precedence <= Precedence::Conditional {
        let m = lhs.precede(p);
        p.bump();
        expression(p);
        p.expect(Colon);
        expression(p);
        lhs = m.complete(p, ConditionalExpression);
    }
    lhs
}

fn is_expression(p: &mut Parser<'_>, lhs: CompletedMarker) -> CompletedMarker {
    let m = lhs.precede(p);
    p.bump();
    if is_type_after_is(p) {
        types::type_with_mode(p, TypeMode::AfterIs);
        return m.complete(p, BinaryExpression);
    }
    let span = p.current_span();
    p.check_feature(Feature::PatternMatching, span);
    patterns::pattern(p);
    m.complete(p, IsPatternExpression)
}

/// `x is T` tests a type only when no designation, subpattern or pattern
/// combinator follows the type
fn is_type_after_is(p: &mut Parser<'_>) -> bool {
    if p.at_contextual(NotKw) || (p.current_text() == "var" && p.nth(1) == Identifier) {
        return false;
    }
    let scanned = scan_type(p, 0);
    scanned.is_type() && !matches!(p.nth(scanned.end), Identifier | OpenParen | OpenBrace)
}

fn unary_or_term(p: &mut Parser<'_>) -> CompletedMarker {
    match p.current() {
        Plus | Minus | Exclamation | Tilde | PlusPlus | MinusMinus | Ampersand | Asterisk => {
            let m = p.start();
            p.bump();
            sub_expression(p, Precedence::Unary);
            m.complete(p, PrefixUnaryExpression)
        }
        Caret => {
            let m = p.start();
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::Ranges, span);
            sub_expression(p, Precedence::Unary);
            m.complete(p, PrefixUnaryExpression)
        }
        DotDot => {
            let m = p.start();
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::Ranges, span);
            if can_start_expression(p, 0) {
                sub_expression(p, Precedence::Range);
            }
            m.complete(p, RangeExpression)
        }
        ThrowKw => {
            let m = p.start();
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::ThrowExpressions, span);
            sub_expression(p, Precedence::Coalescing);
            m.complete(p, ThrowExpression)
        }
        Identifier if p.in_async() && p.at_contextual(AwaitKw) && can_start_expression(p, 1) => {
            let m = p.start();
            let span = p.current_span();
            p.bump_remap(AwaitKw);
            p.check_feature(Feature::AsyncAwait, span);
            sub_expression(p, Precedence::Unary);
            m.complete(p, AwaitExpression)
        }
        OpenParen if !is_parenthesized_lambda(p, 0) && is_cast(p) => {
            let m = p.start();
            p.bump();
            types::type_(p);
            p.expect(CloseParen);
            sub_expression(p, Precedence::Unary);
            m.complete(p, CastExpression)
        }
        _ => {
            let (lhs, postfix) = primary(p);
            if postfix { postfix_chain(p, lhs) } else { lhs }
        }
    }
}

fn postfix_chain(p: &mut Parser<'_>, mut lhs: CompletedMarker) -> CompletedMarker {
    loop {
        lhs = match p.current() {
            OpenParen => {
                let m = lhs.precede(p);
                argument_list(p);
                m.complete(p, InvocationExpression)
            }
            OpenBracket => {
                let m = lhs.precede(p);
                bracketed_argument_list(p);
                m.complete(p, ElementAccessExpression)
            }
            Dot | MinusGreaterThan => {
                let m = lhs.precede(p);
                p.bump();
                simple_name(p);
                m.complete(p, MemberAccessExpression)
            }
            PlusPlus | MinusMinus | Exclamation => {
                let m = lhs.precede(p);
                p.bump();
                m.complete(p, PostfixUnaryExpression)
            }
            Question if matches!(p.nth(1), Dot | OpenBracket) => conditional_access(p, lhs),
            _ => return lhs,
        };
    }
}

fn conditional_access(p: &mut Parser<'_>, lhs: CompletedMarker) -> CompletedMarker {
    let m = lhs.precede(p);
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::NullPropagatingOperator, span);
    let binding = p.start();
    let binding = if p.at(Dot) {
        p.bump();
        simple_name(p);
        binding.complete(p, MemberBindingExpression)
    } else {
        bracketed_argument_list(p);
        binding.complete(p, ElementBindingExpression)
    };
    postfix_chain(p, binding);
    m.complete(p, ConditionalAccessExpression)
}

/// Identifier, optionally with type arguments when they cannot be a
/// comparison
pub(super) fn simple_name(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.expect_identifier();
    if p.at(LessThan) && is_generic_argument_list(p, 0) {
        types::type_argument_list(p);
        m.complete(p, GenericName)
    } else {
        m.complete(p, IdentifierName)
    }
}

/// Primary expression, and whether postfix operators may follow it
fn primary(p: &mut Parser<'_>) -> (CompletedMarker, bool) {
    let kind = p.current();
    if kind.is_predefined_type() {
        let m = p.start();
        p.bump();
        return (m.complete(p, PredefinedType), true);
    }
    let result = match kind {
        TrueKw | FalseKw | NullKw | NumericLiteral | StringLiteral | CharacterLiteral | ArglistKw => {
            literal(p)
        }
        DefaultKw => default_expression(p),
        InterpolatedStringStart | InterpolatedVerbatimStringStart => interpolated_string(p),
        ThisKw => keyword_node(p, ThisExpression),
        BaseKw => keyword_node(p, BaseExpression),
        TypeofKw => type_operand(p, TypeOfExpression),
        SizeofKw => type_operand(p, SizeOfExpression),
        CheckedKw => checked_expression(p, CheckedExpression),
        UncheckedKw => checked_expression(p, UncheckedExpression),
        NewKw => creation_expression(p),
        StackallocKw => stackalloc_expression(p),
        RefKw => {
            let m = p.start();
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::RefLocalsAndReturns, span);
            sub_expression(p, Precedence::Unary);
            return (m.complete(p, RefExpression), false);
        }
        DelegateKw | StaticKw | OpenParen | Identifier if is_lambda_start(p, 0) => {
            return (lambda(p), false);
        }
        DelegateKw => {
            let m = p.start();
            anonymous_method_rest(p);
            m.complete(p, AnonymousMethodExpression)
        }
        OpenParen => parenthesized_or_tuple(p),
        Identifier => {
            if is_query_start(p, 0) {
                return (query_expression(p), false);
            }
            if is_var_designation(p, 0) {
                return (var_declaration_expression(p), false);
            }
            if p.in_query() && p.nth_contextual_kind(0).is_some_and(|k| QUERY_CLAUSE_KEYWORDS.contains(&k)) {
                missing_term(p)
            } else if p.nth(1) == ColonColon {
                alias_qualified_name(p)
            } else {
                simple_name(p)
            }
        }
        _ => missing_term(p),
    };
    (result, true)
}

fn missing_term(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    match p.current() {
        EndOfFile | Semicolon | CloseParen | CloseBracket | CloseBrace | Comma => {
            p.error(ErrorCode::ExpressionExpected, &[]);
        }
        _ => {
            let text = p.current_text();
            p.error(ErrorCode::InvalidExpressionTerm, &[text]);
        }
    }
    p.missing_silent(Identifier);
    m.complete(p, IdentifierName)
}

fn keyword_node(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    m.complete(p, kind)
}

fn literal(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.at(NumericLiteral) {
        let text = p.current_text();
        let span = p.current_span();
        if text.starts_with("0b") || text.starts_with("0B") {
            p.check_feature(Feature::BinaryLiterals, span);
        }
        if text.contains('_') {
            p.check_feature(Feature::DigitSeparators, span);
        }
    }
    p.bump();
    m.complete(p, LiteralExpression)
}

fn default_expression(p: &mut Parser<'_>) -> CompletedMarker {
    if p.nth(1) == OpenParen {
        return type_operand(p, DefaultExpression);
    }
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::DefaultLiteral, span);
    m.complete(p, LiteralExpression)
}

/// `typeof(T)`, `sizeof(T)`, `default(T)`
fn type_operand(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(OpenParen);
    types::type_(p);
    p.expect(CloseParen);
    m.complete(p, kind)
}

fn checked_expression(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(OpenParen);
    expression(p);
    p.expect(CloseParen);
    m.complete(p, kind)
}

fn alias_qualified_name(p: &mut Parser<'_>) -> CompletedMarker {
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
    simple_name(p);
    m.complete(p, AliasQualifiedName)
}

// --- parentheses, tuples and declarations --------------------------------

fn parenthesized_or_tuple(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    if p.at(CloseParen) {
        let missing = p.start();
        p.missing(Identifier, ErrorCode::ExpressionExpected);
        missing.complete(p, IdentifierName);
        p.bump();
        return m.complete(p, ParenthesizedExpression);
    }

    let first = p.start();
    let forced = tuple_element(p);
    if !forced && !p.at(Comma) {
        first.abandon(p);
        p.expect(CloseParen);
        return m.complete(p, ParenthesizedExpression);
    }
    first.complete(p, Argument);
    p.check_feature(Feature::Tuples, span);
    while p.eat(Comma) {
        let argument = p.start();
        tuple_element(p);
        argument.complete(p, Argument);
    }
    p.expect(CloseParen);
    m.complete(p, TupleExpression)
}

/// Returns true when the element can only belong to a tuple
fn tuple_element(p: &mut Parser<'_>) -> bool {
    if p.at(Identifier) && p.nth(1) == Colon {
        name_colon(p);
        expression(p);
        return true;
    }
    if is_declaration_expression(p, 0, &[Comma, CloseParen]) {
        declaration_expression(p);
        return true;
    }
    expression(p);
    false
}

pub(super) fn name_colon(p: &mut Parser<'_>) {
    let m = p.start();
    let name = p.start();
    p.bump();
    name.complete(p, IdentifierName);
    p.bump();
    m.complete(p, NameColon);
}

fn declaration_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    types::type_(p);
    designation(p);
    m.complete(p, DeclarationExpression)
}

fn var_declaration_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let var = p.start();
    p.bump();
    var.complete(p, IdentifierName);
    designation(p);
    m.complete(p, DeclarationExpression)
}

/// `x`, `_` or `(a, (b, c))`
pub(super) fn designation(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.at(OpenParen) {
        p.bump();
        if !p.at(CloseParen) {
            loop {
                designation(p);
                if !p.eat(Comma) {
                    break;
                }
            }
        }
        p.expect(CloseParen);
        return m.complete(p, ParenthesizedVariableDesignation);
    }
    if p.at(Identifier) && p.current_text() == "_" {
        p.bump();
        return m.complete(p, DiscardDesignation);
    }
    p.expect_identifier();
    m.complete(p, SingleVariableDesignation)
}

// --- arguments -----------------------------------------------------------

pub(super) fn argument_list(p: &mut Parser<'_>) -> CompletedMarker {
    arguments(p, OpenParen, CloseParen, ArgumentList)
}

pub(super) fn bracketed_argument_list(p: &mut Parser<'_>) -> CompletedMarker {
    arguments(p, OpenBracket, CloseBracket, BracketedArgumentList)
}

fn arguments(p: &mut Parser<'_>, open: SyntaxKind, close: SyntaxKind, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.expect(open);
    if !p.at(close) {
        loop {
            argument(p);
            if p.eat(Comma) {
                continue;
            }
            if p.at(close) || !argument_can_start(p) {
                break;
            }
            p.missing(Comma, ErrorCode::TokenExpected);
        }
    }
    p.expect(close);
    m.complete(p, kind)
}

fn argument_can_start(p: &mut Parser<'_>) -> bool {
    matches!(p.current(), OutKw | InKw) || can_start_expression(p, 0)
}

fn argument(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(Identifier) && p.nth(1) == Colon {
        let span = p.current_span();
        name_colon(p);
        p.check_feature(Feature::NamedArguments, span);
    }
    if matches!(p.current(), RefKw | OutKw | InKw) {
        p.bump();
        if is_declaration_expression(p, 0, &[Comma, CloseParen, CloseBracket]) {
            let span = p.current_span();
            declaration_expression(p);
            p.check_feature(Feature::OutVariables, span);
        } else {
            expression(p);
        }
    } else {
        expression(p);
    }
    m.complete(p, Argument);
}

// --- creation and initializers --------------------------------------------

fn creation_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    match p.current() {
        OpenParen => {
            p.check_feature(Feature::TargetTypedNew, span);
            argument_list(p);
            if p.at(OpenBrace) {
                object_or_collection_initializer(p);
            }
            m.complete(p, ImplicitObjectCreationExpression)
        }
        OpenBracket => {
            p.check_feature(Feature::ImplicitlyTypedArrays, span);
            p.bump();
            while p.eat(Comma) {}
            p.expect(CloseBracket);
            array_initializer(p);
            m.complete(p, ImplicitArrayCreationExpression)
        }
        OpenBrace => {
            p.check_feature(Feature::AnonymousTypes, span);
            delimited_elements(p, anonymous_object_member);
            m.complete(p, AnonymousObjectCreationExpression)
        }
        _ => {
            let ty = types::type_with_mode(p, TypeMode::ArrayCreation);
            if ty.kind() == ArrayType {
                if p.at(OpenBrace) {
                    array_initializer(p);
                }
                return m.complete(p, ArrayCreationExpression);
            }
            if p.at(OpenParen) {
                argument_list(p);
            } else if !p.at(OpenBrace) {
                let arguments = p.start();
                p.missing(OpenParen, ErrorCode::TokenExpected);
                p.missing_silent(CloseParen);
                arguments.complete(p, ArgumentList);
            }
            if p.at(OpenBrace) {
                object_or_collection_initializer(p);
            }
            m.complete(p, ObjectCreationExpression)
        }
    }
}

fn stackalloc_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.at(OpenBracket) {
        p.bump();
        p.expect(CloseBracket);
        array_initializer(p);
        return m.complete(p, ImplicitStackAllocArrayCreationExpression);
    }
    types::type_with_mode(p, TypeMode::ArrayCreation);
    if p.at(OpenBrace) {
        array_initializer(p);
    }
    m.complete(p, StackAllocArrayCreationExpression)
}

/// `{ ... }` with comma-separated elements and a synthesized `}` when the
/// list is unterminated
fn delimited_elements(p: &mut Parser<'_>, element: fn(&mut Parser<'_>)) {
    p.expect(OpenBrace);
    while !p.at(CloseBrace) && !p.at_end() {
        let before = p.position();
        element(p);
        p.force_progress(before, |p| p.at(Comma) || p.at(CloseBrace));
        if p.eat(Comma) {
            continue;
        }
        if p.at(CloseBrace) || !can_start_expression(p, 0) {
            break;
        }
        p.missing(Comma, ErrorCode::TokenExpected);
    }
    p.expect(CloseBrace);
}

pub(super) fn array_initializer(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    delimited_elements(p, |p| {
        variable_initializer(p);
    });
    m.complete(p, ArrayInitializerExpression)
}

/// Right-hand side of `=` in declarations: an expression or `{ ... }`
pub(super) fn variable_initializer(p: &mut Parser<'_>) -> CompletedMarker {
    if p.at(OpenBrace) {
        array_initializer(p)
    } else {
        expression(p)
    }
}

fn object_or_collection_initializer(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    let is_object = matches!(p.nth(1), CloseBrace | OpenBracket)
        || (p.nth(1) == Identifier && p.nth(2) == Equals);
    if is_object {
        p.check_feature(Feature::ObjectInitializers, span);
        delimited_elements(p, object_member_initializer);
        m.complete(p, ObjectInitializerExpression)
    } else {
        p.check_feature(Feature::CollectionInitializers, span);
        delimited_elements(p, collection_element);
        m.complete(p, CollectionInitializerExpression)
    }
}

fn object_member_initializer(p: &mut Parser<'_>) {
    let target = if p.at(Identifier) && p.nth(1) == Equals {
        let m = p.start();
        let name = p.start();
        p.bump();
        name.complete(p, IdentifierName);
        m
    } else if p.at(OpenBracket) {
        let m = p.start();
        let span = p.current_span();
        let binding = p.start();
        bracketed_argument_list(p);
        binding.complete(p, ElementBindingExpression);
        p.check_feature(Feature::DictionaryInitializers, span);
        m
    } else {
        expression(p);
        return;
    };
    p.expect(Equals);
    if p.at(OpenBrace) {
        object_or_collection_initializer(p);
    } else {
        expression(p);
    }
    target.complete(p, AssignmentExpression);
}

fn collection_element(p: &mut Parser<'_>) {
    if p.at(OpenBrace) {
        let m = p.start();
        delimited_elements(p, |p| {
            expression(p);
        });
        m.complete(p, ComplexElementInitializerExpression);
    } else {
        expression(p);
    }
}

fn anonymous_object_member(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(Identifier) && p.nth(1) == Equals {
        let name_equals = p.start();
        let name = p.start();
        p.bump();
        name.complete(p, IdentifierName);
        p.bump();
        name_equals.complete(p, NameEquals);
    }
    expression(p);
    m.complete(p, AnonymousObjectMemberDeclarator);
}

// --- postfix forms at the switch level ------------------------------------

fn switch_expression(p: &mut Parser<'_>, lhs: CompletedMarker) -> CompletedMarker {
    let m = lhs.precede(p);
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::SwitchExpressions, span);
    p.expect(OpenBrace);
    while !p.at(CloseBrace) && !p.at_end() {
        let before = p.position();
        let arm = p.start();
        patterns::pattern(p);
        if p.at_contextual(WhenKw) {
            let when = p.start();
            p.bump_remap(WhenKw);
            expression(p);
            when.complete(p, WhenClause);
        }
        p.expect(EqualsGreaterThan);
        expression(p);
        arm.complete(p, SwitchExpressionArm);
        p.force_progress(before, |p| p.at(Comma) || p.at(CloseBrace));
        if !p.eat(Comma) {
            break;
        }
    }
    p.expect(CloseBrace);
    m.complete(p, SwitchExpression)
}

fn with_expression(p: &mut Parser<'_>, lhs: CompletedMarker) -> CompletedMarker {
    let m = lhs.precede(p);
    let span = p.current_span();
    p.bump_remap(WithKw);
    p.check_feature(Feature::Records, span);
    let initializer = p.start();
    delimited_elements(p, |p| {
        expression(p);
    });
    initializer.complete(p, WithInitializerExpression);
    m.complete(p, WithExpression)
}

// --- lambdas --------------------------------------------------------------

fn lambda(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let mut is_async = false;
    loop {
        if p.at(StaticKw) {
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::StaticAnonymousFunctions, span);
        } else if p.at_contextual(AsyncKw) && p.nth(1) != EqualsGreaterThan {
            let span = p.current_span();
            p.bump_remap(AsyncKw);
            p.check_feature(Feature::AsyncAwait, span);
            is_async = true;
        } else {
            break;
        }
    }

    if p.at(DelegateKw) {
        p.with_async(is_async, anonymous_method_rest);
        return m.complete(p, AnonymousMethodExpression);
    }

    let span = p.current_span();
    let kind = if p.at(OpenParen) {
        declarations::parameter_list(p, true);
        ParenthesizedLambdaExpression
    } else {
        let parameter = p.start();
        p.bump();
        parameter.complete(p, Parameter);
        SimpleLambdaExpression
    };
    p.check_feature(Feature::LambdaExpressions, span);
    p.expect(EqualsGreaterThan);
    p.with_async(is_async, |p| {
        if p.at(OpenBrace) {
            statements::block(p);
        } else {
            expression(p);
        }
    });
    m.complete(p, kind)
}

/// `delegate [(params)] { ... }` after any modifiers
fn anonymous_method_rest(p: &mut Parser<'_>) {
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::AnonymousMethods, span);
    if p.at(OpenParen) {
        declarations::parameter_list(p, false);
    }
    let is_async = p.in_async();
    p.with_async(is_async, |p| statements::block(p));
}

// --- interpolated strings -------------------------------------------------

fn interpolated_string(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::InterpolatedStrings, span);
    loop {
        match p.current() {
            InterpolatedStringTextToken => {
                let text = p.start();
                p.bump();
                text.complete(p, InterpolatedStringText);
            }
            OpenBrace => interpolation(p),
            InterpolatedStringEnd => {
                p.bump();
                break;
            }
            EndOfFile => {
                p.missing_silent(InterpolatedStringEnd);
                break;
            }
            _ => p.skip_token(ErrorCode::UnexpectedToken),
        }
    }
    m.complete(p, InterpolatedStringExpression)
}

fn interpolation(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    expression(p);
    if p.at(Comma) {
        let alignment = p.start();
        p.bump();
        expression(p);
        alignment.complete(p, InterpolationAlignmentClause);
    }
    if p.at(Colon) {
        let format = p.start();
        p.bump();
        if p.at(InterpolatedStringTextToken) {
            p.bump();
        }
        format.complete(p, InterpolationFormatClause);
    }
    if !p.at(CloseBrace) {
        p.recover_to(INTERPOLATION_RECOVERY);
    }
    p.expect(CloseBrace);
    m.complete(p, Interpolation);
}

// --- queries --------------------------------------------------------------

fn query_expression(p: &mut Parser<'_>) -> CompletedMarker {
    p.with_query(true, |p| {
        let m = p.start();
        let span = p.current_span();
        from_clause(p);
        p.check_feature(Feature::QueryExpressions, span);
        query_body(p);
        m.complete(p, QueryExpression)
    })
}

/// Optional type before the range variable of `from` and `join`
fn range_variable(p: &mut Parser<'_>) {
    if !(p.at(Identifier) && p.nth(1) == InKw) {
        types::type_(p);
    }
    p.expect_identifier();
    p.expect(InKw);
}

fn from_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_remap(FromKw);
    range_variable(p);
    expression(p);
    m.complete(p, FromClause);
}

fn query_body(p: &mut Parser<'_>) {
    let m = p.start();
    loop {
        match p.nth_contextual_kind(0) {
            Some(FromKw) => from_clause(p),
            Some(LetKw) => {
                let clause = p.start();
                p.bump_remap(LetKw);
                p.expect_identifier();
                p.expect(Equals);
                expression(p);
                clause.complete(p, LetClause);
            }
            Some(WhereKw) => {
                let clause = p.start();
                p.bump_remap(WhereKw);
                expression(p);
                clause.complete(p, WhereClause);
            }
            Some(JoinKw) => join_clause(p),
            Some(OrderbyKw) => orderby_clause(p),
            _ => break,
        }
    }

    match p.nth_contextual_kind(0) {
        Some(SelectKw) => {
            let clause = p.start();
            p.bump_remap(SelectKw);
            expression(p);
            clause.complete(p, SelectClause);
        }
        Some(GroupKw) => {
            let clause = p.start();
            p.bump_remap(GroupKw);
            expression(p);
            p.expect_contextual(ByKw);
            expression(p);
            clause.complete(p, GroupClause);
        }
        _ => {
            let clause = p.start();
            p.missing(SelectKw, ErrorCode::TokenExpected);
            let missing = p.start();
            p.missing_silent(Identifier);
            missing.complete(p, IdentifierName);
            clause.complete(p, SelectClause);
        }
    }

    if p.at_contextual(IntoKw) {
        let continuation = p.start();
        p.bump_remap(IntoKw);
        p.expect_identifier();
        query_body(p);
        continuation.complete(p, QueryContinuation);
    }
    m.complete(p, QueryBody);
}

fn join_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_remap(JoinKw);
    range_variable(p);
    expression(p);
    p.expect_contextual(OnKw);
    expression(p);
    p.expect_contextual(EqualsKw);
    expression(p);
    if p.at_contextual(IntoKw) {
        let into = p.start();
        p.bump_remap(IntoKw);
        p.expect_identifier();
        into.complete(p, JoinIntoClause);
    }
    m.complete(p, JoinClause);
}

fn orderby_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_remap(OrderbyKw);
    loop {
        let ordering = p.start();
        expression(p);
        if !p.eat_contextual(AscendingKw) {
            p.eat_contextual(DescendingKw);
        }
        ordering.complete(p, Ordering);
        if !p.eat(Comma) {
            break;
        }
    }
    m.complete(p, OrderByClause);
}
