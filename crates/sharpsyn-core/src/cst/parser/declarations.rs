//! Compilation units, namespaces, type declarations and members

use super::disambiguation::{
    can_start_statement, is_modifier_at, is_record_start, is_type_declaration_at, matching_close,
    scan_type, scan_type_argument_list,
};
use super::expressions;
use super::types;
use super::{CompletedMarker, Marker, Parser, statements};
use crate::cst::SyntaxKind::{self, *};
use crate::diagnostics::ErrorCode;
use crate::features::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    CompilationUnit,
    Namespace,
    FileScopedNamespace,
}

/// Ordering facts used to report misplaced usings and statements
#[derive(Default)]
struct BodyState {
    seen_member: bool,
    seen_type: bool,
}

pub(super) fn compilation_unit(p: &mut Parser<'_>) {
    namespace_body(p, Scope::CompilationUnit);
}

fn namespace_body(p: &mut Parser<'_>, scope: Scope) {
    let mut state = BodyState::default();
    loop {
        if p.at_end() || (scope == Scope::Namespace && p.at(CloseBrace)) {
            break;
        }
        let before = p.position();
        namespace_member(p, scope, &mut state);
        p.force_progress(before, |p| at_namespace_member_start(p, scope));
    }
}

fn namespace_member(p: &mut Parser<'_>, scope: Scope, state: &mut BodyState) {
    if p.at(ExternKw) && p.nth_at_contextual(1, AliasKw) {
        extern_alias(p);
        return;
    }
    if is_using_directive(p) {
        using_directive(p, state);
        return;
    }
    if is_global_attribute(p) {
        attribute_list(p);
        return;
    }
    if p.at(CloseBrace) {
        p.skip_token(ErrorCode::EndOfFileExpected);
        return;
    }

    let after_attributes = skip_attributes(p, 0);
    if p.nth(after_attributes) == NamespaceKw || is_type_declaration_at(p, after_attributes) {
        state.seen_member = true;
        state.seen_type = true;
        member_declaration(p);
        return;
    }
    if scope == Scope::CompilationUnit && is_global_statement_start(p) {
        state.seen_member = true;
        global_statement(p, state);
        return;
    }
    if !at_member_start(p) {
        p.recover_until(ErrorCode::UnexpectedToken, |p| at_namespace_member_start(p, scope));
        return;
    }
    state.seen_member = true;
    p.error(ErrorCode::NamespaceMemberExpected, &[]);
    member_declaration(p);
}

fn at_namespace_member_start(p: &mut Parser<'_>, scope: Scope) -> bool {
    match scope {
        Scope::CompilationUnit => at_member_start(p) || can_start_statement(p) || p.at(CloseBrace),
        Scope::Namespace => at_member_start(p) || p.at(CloseBrace),
        Scope::FileScopedNamespace => at_member_start(p),
    }
}

/// Offset of the first token after any attribute lists starting at `n`
fn skip_attributes(p: &mut Parser<'_>, n: usize) -> usize {
    let mut i = n;
    while p.nth(i) == OpenBracket {
        match matching_close(p, i) {
            Some(close) => i = close + 1,
            None => break,
        }
    }
    i
}

fn is_using_directive(p: &mut Parser<'_>) -> bool {
    if p.at_contextual(GlobalKw) && p.nth(1) == UsingKw {
        return true;
    }
    if !p.at(UsingKw) || p.nth(1) == OpenParen {
        return false;
    }
    // `using var x = ...;` is a top-level using declaration
    let scanned = scan_type(p, 1);
    !(scanned.is_type() && p.nth(scanned.end) == Identifier)
}

fn is_global_attribute(p: &mut Parser<'_>) -> bool {
    p.at(OpenBracket)
        && p.nth(1) == Identifier
        && matches!(p.nth_text(1), "assembly" | "module")
        && p.nth(2) == Colon
}

/// At the top level, a statement unless the tokens can only start a member
fn is_global_statement_start(p: &mut Parser<'_>) -> bool {
    if matches!(
        p.current(),
        PublicKw
            | PrivateKw
            | ProtectedKw
            | InternalKw
            | AbstractKw
            | VirtualKw
            | OverrideKw
            | SealedKw
            | EventKw
            | ImplicitKw
            | ExplicitKw
            | Tilde
            | OpenBracket
    ) {
        return false;
    }
    can_start_statement(p)
}

/// Tokens that can begin a member of a type body
fn at_member_start(p: &mut Parser<'_>) -> bool {
    let kind = p.current();
    kind.is_predefined_type()
        || matches!(
            kind,
            OpenBracket
                | Identifier
                | OpenParen
                | Tilde
                | EventKw
                | ImplicitKw
                | ExplicitKw
                | DelegateKw
                | ClassKw
                | StructKw
                | InterfaceKw
                | EnumKw
                | NamespaceKw
                | RefKw
        )
        || is_modifier_at(p, 0)
}

fn extern_alias(p: &mut Parser<'_>) {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::ExternAlias, span);
    p.bump_remap(AliasKw);
    p.expect_identifier();
    p.expect(Semicolon);
    m.complete(p, ExternAliasDirective);
}

fn using_directive(p: &mut Parser<'_>, state: &BodyState) {
    let m = p.start();
    if state.seen_member {
        p.error(ErrorCode::UsingAfterElements, &[]);
    }
    if p.at_contextual(GlobalKw) {
        let span = p.current_span();
        p.bump_remap(GlobalKw);
        p.check_feature(Feature::GlobalUsings, span);
    }
    p.bump();
    if p.at(StaticKw) {
        let span = p.current_span();
        p.bump();
        p.check_feature(Feature::UsingStatic, span);
    } else if p.at(Identifier) && p.nth(1) == Equals {
        let name_equals = p.start();
        let name = p.start();
        p.bump();
        name.complete(p, IdentifierName);
        p.bump();
        name_equals.complete(p, NameEquals);
    }
    types::name(p, false);
    p.expect(Semicolon);
    m.complete(p, UsingDirective);
}

fn global_statement(p: &mut Parser<'_>, state: &BodyState) {
    let m = p.start();
    if state.seen_type {
        p.error(ErrorCode::TopLevelStatementAfterDeclaration, &[]);
    }
    let span = p.current_span();
    let reported = p.check_feature(Feature::TopLevelStatements, span);
    if reported {
        p.suppress_features(|p| p.with_async(true, statements::statement));
    } else {
        p.with_async(true, statements::statement);
    }
    m.complete(p, GlobalStatement);
}

// --- attributes and modifiers ---------------------------------------------

pub(super) fn attribute_lists(p: &mut Parser<'_>) {
    while p.at(OpenBracket) {
        attribute_list(p);
    }
}

fn attribute_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if (p.at(Identifier) || p.current().is_keyword()) && p.nth(1) == Colon {
        let target = p.start();
        p.bump();
        p.bump();
        target.complete(p, AttributeTargetSpecifier);
    }
    loop {
        attribute(p);
        if !p.eat(Comma) || p.at(CloseBracket) {
            break;
        }
    }
    p.expect(CloseBracket);
    m.complete(p, AttributeList);
}

fn attribute(p: &mut Parser<'_>) {
    let m = p.start();
    types::name(p, false);
    if p.at(OpenParen) {
        let arguments = p.start();
        p.bump();
        if !p.at(CloseParen) {
            loop {
                attribute_argument(p);
                if !p.eat(Comma) {
                    break;
                }
            }
        }
        p.expect(CloseParen);
        arguments.complete(p, AttributeArgumentList);
    }
    m.complete(p, Attribute);
}

fn attribute_argument(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(Identifier) && p.nth(1) == Equals {
        let name_equals = p.start();
        let name = p.start();
        p.bump();
        name.complete(p, IdentifierName);
        p.bump();
        name_equals.complete(p, NameEquals);
    } else if p.at(Identifier) && p.nth(1) == Colon {
        expressions::name_colon(p);
    }
    expressions::expression(p);
    m.complete(p, AttributeArgument);
}

#[derive(Debug, Default, Clone, Copy)]
struct Modifiers {
    is_async: bool,
}

/// Modifiers in any order; a repeated one is reported and kept
fn modifiers(p: &mut Parser<'_>) -> Modifiers {
    let mut seen: Vec<SyntaxKind> = Vec::new();
    let mut modifiers = Modifiers::default();
    while is_modifier_at(p, 0) {
        let kind = match p.nth_contextual_kind(0) {
            Some(contextual @ (PartialKw | AsyncKw)) => contextual,
            _ => p.current(),
        };
        let span = p.current_span();
        if seen.contains(&kind) {
            let text = p.current_text();
            p.error(ErrorCode::DuplicateModifier, &[text]);
        }
        match kind {
            PartialKw => {
                p.bump_remap(PartialKw);
                p.check_feature(Feature::PartialTypes, span);
            }
            AsyncKw => {
                p.bump_remap(AsyncKw);
                p.check_feature(Feature::AsyncAwait, span);
                modifiers.is_async = true;
            }
            PrivateKw if seen.contains(&ProtectedKw) => {
                p.bump();
                p.check_feature(Feature::PrivateProtected, span);
            }
            ProtectedKw if seen.contains(&PrivateKw) => {
                p.bump();
                p.check_feature(Feature::PrivateProtected, span);
            }
            _ => p.bump(),
        }
        seen.push(kind);
    }
    modifiers
}

// --- members --------------------------------------------------------------

fn member_declaration(p: &mut Parser<'_>) {
    if !p.enter() {
        p.leave();
        p.skip_too_deep();
        return;
    }
    member_declaration_inner(p);
    p.leave();
}

fn member_declaration_inner(p: &mut Parser<'_>) {
    let start = p.position();
    let m = p.start();
    attribute_lists(p);
    let modifiers = modifiers(p);

    match p.current() {
        NamespaceKw => return namespace_declaration(p, m),
        ClassKw => return type_declaration(p, m, ClassDeclaration),
        StructKw => return type_declaration(p, m, StructDeclaration),
        InterfaceKw => return type_declaration(p, m, InterfaceDeclaration),
        EnumKw => return enum_declaration(p, m),
        DelegateKw => return delegate_declaration(p, m),
        Identifier if is_record_start(p, 0) => return record_declaration(p, m),
        Tilde => return destructor_declaration(p, m, modifiers),
        EventKw => return event_declaration(p, m),
        ImplicitKw | ExplicitKw => return conversion_operator(p, m, modifiers),
        Identifier if p.nth(1) == OpenParen => return constructor_declaration(p, m, modifiers),
        _ => {}
    }

    let kind = p.current();
    let starts_type = kind.is_predefined_type() || matches!(kind, Identifier | OpenParen | RefKw);
    if !starts_type || !scan_type(p, usize::from(kind == RefKw)).is_type() {
        return incomplete_member(p, m, start);
    }
    typed_member(p, m, modifiers);
}

fn incomplete_member(p: &mut Parser<'_>, m: Marker, start: usize) {
    if !p.at_end() {
        let text = p.current_text();
        p.error(ErrorCode::InvalidMemberDeclaration, &[text]);
    }
    if p.position() == start && !p.at_end() && !p.at(CloseBrace) {
        p.bump();
    }
    while !p.at_end() && !p.at(CloseBrace) && !at_member_start(p) {
        p.bump();
    }
    m.complete(p, IncompleteMember);
}

/// Explicit interface prefix (`I.`, `N.I<T>.`) starting at `n`: the number
/// of name segments and the offset just past the last dot
fn explicit_interface_at(p: &mut Parser<'_>, n: usize) -> Option<(usize, usize)> {
    let mut i = n;
    let mut segments = 0;
    let mut last = None;
    while p.nth(i) == Identifier {
        let mut j = i + 1;
        if p.nth(j) == LessThan {
            match scan_type_argument_list(p, j) {
                Some(end) => j = end,
                None => break,
            }
        }
        if p.nth(j) != Dot || !matches!(p.nth(j + 1), Identifier | ThisKw | OperatorKw) {
            break;
        }
        segments += 1;
        i = j + 1;
        last = Some((segments, i));
    }
    last
}

fn explicit_interface_specifier(p: &mut Parser<'_>) {
    if let Some((segments, _)) = explicit_interface_at(p, 0) {
        let m = p.start();
        types::name_segments(p, segments);
        p.bump();
        m.complete(p, ExplicitInterfaceSpecifier);
    }
}

/// Offset of the member name after a type ending at `n`, skipping an
/// explicit interface prefix
fn member_name_at(p: &mut Parser<'_>, n: usize) -> usize {
    explicit_interface_at(p, n).map_or(n, |(_, end)| end)
}

fn return_type_end(p: &mut Parser<'_>) -> usize {
    let mut i = 0;
    if p.nth(i) == RefKw {
        i += 1;
        if p.nth(i) == ReadonlyKw {
            i += 1;
        }
    }
    scan_type(p, i).end
}

fn typed_member(p: &mut Parser<'_>, m: Marker, modifiers: Modifiers) {
    let type_end = return_type_end(p);
    let name = member_name_at(p, type_end);
    match p.nth(name) {
        OperatorKw => operator_declaration(p, m, modifiers),
        ThisKw => indexer_declaration(p, m),
        Identifier => match p.nth(name + 1) {
            OpenParen | LessThan => method_declaration(p, m, modifiers),
            OpenBrace | EqualsGreaterThan => property_declaration(p, m),
            _ => field_declaration(p, m, FieldDeclaration),
        },
        _ => field_declaration(p, m, FieldDeclaration),
    }
}

fn field_declaration(p: &mut Parser<'_>, m: Marker, kind: SyntaxKind) {
    variable_declaration(p);
    p.expect(Semicolon);
    m.complete(p, kind);
}

fn method_declaration(p: &mut Parser<'_>, m: Marker, modifiers: Modifiers) {
    types::return_type(p);
    explicit_interface_specifier(p);
    p.expect_identifier();
    if p.at(LessThan) {
        type_parameter_list(p);
    }
    parameter_list(p, false);
    constraint_clauses(p);
    method_body(p, modifiers.is_async);
    m.complete(p, MethodDeclaration);
}

fn constructor_declaration(p: &mut Parser<'_>, m: Marker, modifiers: Modifiers) {
    p.bump();
    parameter_list(p, false);
    if p.at(Colon) {
        let initializer = p.start();
        p.bump();
        if p.at(BaseKw) || p.at(ThisKw) {
            p.bump();
        } else {
            p.missing(ThisKw, ErrorCode::TokenExpected);
        }
        expressions::argument_list(p);
        initializer.complete(p, ConstructorInitializer);
    }
    method_body(p, modifiers.is_async);
    m.complete(p, ConstructorDeclaration);
}

fn destructor_declaration(p: &mut Parser<'_>, m: Marker, modifiers: Modifiers) {
    p.bump();
    p.expect_identifier();
    parameter_list(p, false);
    method_body(p, modifiers.is_async);
    m.complete(p, DestructorDeclaration);
}

fn property_declaration(p: &mut Parser<'_>, m: Marker) {
    types::return_type(p);
    explicit_interface_specifier(p);
    p.expect_identifier();
    if p.at(EqualsGreaterThan) {
        arrow_expression_clause(p);
        p.expect(Semicolon);
    } else {
        accessor_list(p);
        if p.at(Equals) {
            let initializer = p.start();
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::AutoPropertyInitializers, span);
            expressions::variable_initializer(p);
            initializer.complete(p, EqualsValueClause);
            p.expect(Semicolon);
        }
    }
    m.complete(p, PropertyDeclaration);
}

fn indexer_declaration(p: &mut Parser<'_>, m: Marker) {
    types::return_type(p);
    explicit_interface_specifier(p);
    p.bump();
    bracketed_parameter_list(p);
    if p.at(EqualsGreaterThan) {
        arrow_expression_clause(p);
        p.expect(Semicolon);
    } else {
        accessor_list(p);
    }
    m.complete(p, IndexerDeclaration);
}

fn event_declaration(p: &mut Parser<'_>, m: Marker) {
    p.bump();
    let type_end = scan_type(p, 0).end;
    let name = member_name_at(p, type_end);
    if p.nth(name) == Identifier && p.nth(name + 1) == OpenBrace {
        types::type_(p);
        explicit_interface_specifier(p);
        p.expect_identifier();
        accessor_list(p);
        m.complete(p, EventDeclaration);
    } else {
        field_declaration(p, m, EventFieldDeclaration);
    }
}

fn is_overloadable_operator(p: &mut Parser<'_>) -> bool {
    p.at(GreaterThanGreaterThan)
        || matches!(
            p.current(),
            Plus | Minus
                | Exclamation
                | Tilde
                | PlusPlus
                | MinusMinus
                | Asterisk
                | Slash
                | Percent
                | Ampersand
                | Bar
                | Caret
                | LessThanLessThan
                | EqualsEquals
                | ExclamationEquals
                | LessThan
                | GreaterThan
                | LessThanEquals
                | GreaterThanEquals
                | TrueKw
                | FalseKw
        )
}

fn operator_declaration(p: &mut Parser<'_>, m: Marker, modifiers: Modifiers) {
    types::return_type(p);
    explicit_interface_specifier(p);
    p.bump();
    if is_overloadable_operator(p) {
        p.bump_operator();
    } else {
        let text = p.current_text();
        p.error(ErrorCode::InvalidMemberDeclaration, &[text]);
    }
    parameter_list(p, false);
    method_body(p, modifiers.is_async);
    m.complete(p, OperatorDeclaration);
}

fn conversion_operator(p: &mut Parser<'_>, m: Marker, modifiers: Modifiers) {
    p.bump();
    p.expect(OperatorKw);
    types::type_(p);
    parameter_list(p, false);
    method_body(p, modifiers.is_async);
    m.complete(p, ConversionOperatorDeclaration);
}

fn accessor_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.expect(OpenBrace);
    while !p.at(CloseBrace) && !p.at_end() && !p.at(NamespaceKw) {
        let before = p.position();
        accessor(p);
        p.force_progress(before, |p| p.at(CloseBrace) || at_accessor_start(p));
    }
    p.expect(CloseBrace);
    m.complete(p, AccessorList);
}

fn at_accessor_start(p: &mut Parser<'_>) -> bool {
    p.at(OpenBracket)
        || p.current().is_modifier()
        || matches!(
            p.nth_contextual_kind(0),
            Some(GetKw | SetKw | InitKw | AddKw | RemoveKw)
        )
}

fn accessor(p: &mut Parser<'_>) {
    let m = p.start();
    attribute_lists(p);
    while p.current().is_modifier() {
        p.bump();
    }
    match p.nth_contextual_kind(0) {
        Some(keyword @ (GetKw | SetKw | AddKw | RemoveKw)) => p.bump_remap(keyword),
        Some(InitKw) => {
            let span = p.current_span();
            p.bump_remap(InitKw);
            p.check_feature(Feature::InitOnlySetters, span);
        }
        _ => {
            p.missing(GetKw, ErrorCode::TokenExpected);
        }
    }
    method_body(p, false);
    m.complete(p, AccessorDeclaration);
}

/// Block, `=> expr;`, or `;`
pub(super) fn method_body(p: &mut Parser<'_>, is_async: bool) {
    p.with_async(is_async, |p| match p.current() {
        OpenBrace => {
            statements::block(p);
        }
        EqualsGreaterThan => {
            arrow_expression_clause(p);
            p.expect(Semicolon);
        }
        _ => {
            p.expect(Semicolon);
        }
    });
}

fn arrow_expression_clause(p: &mut Parser<'_>) {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::ExpressionBodiedMembers, span);
    expressions::expression(p);
    m.complete(p, ArrowExpressionClause);
}

/// Type (possibly `ref`) followed by comma-separated declarators
pub(super) fn variable_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    types::return_type(p);
    loop {
        variable_declarator(p);
        if !p.eat(Comma) {
            break;
        }
    }
    m.complete(p, VariableDeclaration)
}

fn variable_declarator(p: &mut Parser<'_>) {
    let m = p.start();
    p.expect_identifier();
    if p.at(OpenBracket) {
        expressions::bracketed_argument_list(p);
    }
    if p.at(Equals) {
        let initializer = p.start();
        p.bump();
        expressions::variable_initializer(p);
        initializer.complete(p, EqualsValueClause);
    }
    m.complete(p, VariableDeclarator);
}

// --- namespaces and types -------------------------------------------------

fn namespace_declaration(p: &mut Parser<'_>, m: Marker) {
    let span = p.current_span();
    p.bump();
    types::name(p, false);
    if p.at(Semicolon) {
        p.bump();
        p.check_feature(Feature::FileScopedNamespaces, span);
        namespace_body(p, Scope::FileScopedNamespace);
        m.complete(p, FileScopedNamespaceDeclaration);
        return;
    }
    p.expect(OpenBrace);
    namespace_body(p, Scope::Namespace);
    p.expect(CloseBrace);
    p.eat(Semicolon);
    m.complete(p, NamespaceDeclaration);
}

fn type_declaration(p: &mut Parser<'_>, m: Marker, kind: SyntaxKind) {
    p.bump();
    type_declaration_rest(p, m, kind, false);
}

fn record_declaration(p: &mut Parser<'_>, m: Marker) {
    let span = p.current_span();
    p.bump_remap(RecordKw);
    p.check_feature(Feature::Records, span);
    match p.current() {
        ClassKw => p.bump(),
        StructKw => {
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::RecordStructs, span);
        }
        _ => {}
    }
    type_declaration_rest(p, m, RecordDeclaration, true);
}

/// Everything after the `class`/`struct`/`interface`/`record` keyword
fn type_declaration_rest(p: &mut Parser<'_>, m: Marker, kind: SyntaxKind, is_record: bool) {
    p.expect_identifier();
    if p.at(LessThan) {
        type_parameter_list(p);
    }
    if p.at(OpenParen) {
        if !is_record {
            let span = p.current_span();
            p.check_feature(Feature::PrimaryConstructors, span);
        }
        parameter_list(p, false);
    }
    if p.at(Colon) {
        base_list(p);
    }
    constraint_clauses(p);

    if p.at(Semicolon) && is_record {
        p.bump();
    } else {
        type_body(p);
    }
    m.complete(p, kind);
}

fn type_body(p: &mut Parser<'_>) {
    if !p.at(OpenBrace) {
        p.missing(OpenBrace, ErrorCode::TokenExpected);
        p.missing_silent(CloseBrace);
        return;
    }
    p.bump();
    while !p.at(CloseBrace) && !p.at_end() && !p.at(NamespaceKw) {
        if !at_member_start(p) {
            p.recover_until(ErrorCode::InvalidMemberDeclaration, |p| {
                at_member_start(p) || p.at(CloseBrace)
            });
            continue;
        }
        let before = p.position();
        member_declaration(p);
        p.force_progress(before, |p| at_member_start(p) || p.at(CloseBrace));
    }
    p.expect(CloseBrace);
    p.eat(Semicolon);
}

fn base_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    loop {
        let base = p.start();
        types::type_(p);
        if p.at(OpenParen) {
            expressions::argument_list(p);
            base.complete(p, PrimaryConstructorBaseType);
        } else {
            base.complete(p, SimpleBaseType);
        }
        if !p.eat(Comma) {
            break;
        }
    }
    m.complete(p, BaseList);
}

fn enum_declaration(p: &mut Parser<'_>, m: Marker) {
    p.bump();
    p.expect_identifier();
    if p.at(Colon) {
        base_list(p);
    }
    p.expect(OpenBrace);
    while !p.at(CloseBrace) && !p.at_end() {
        let before = p.position();
        let member = p.start();
        attribute_lists(p);
        p.expect_identifier();
        if p.at(Equals) {
            let value = p.start();
            p.bump();
            expressions::expression(p);
            value.complete(p, EqualsValueClause);
        }
        member.complete(p, EnumMemberDeclaration);
        p.force_progress(before, |p| p.at(Comma) || p.at(CloseBrace));
        if p.eat(Comma) {
            continue;
        }
        if !p.at(Identifier) {
            break;
        }
        p.missing(Comma, ErrorCode::TokenExpected);
    }
    p.expect(CloseBrace);
    p.eat(Semicolon);
    m.complete(p, EnumDeclaration);
}

fn delegate_declaration(p: &mut Parser<'_>, m: Marker) {
    p.bump();
    types::return_type(p);
    p.expect_identifier();
    if p.at(LessThan) {
        type_parameter_list(p);
    }
    parameter_list(p, false);
    constraint_clauses(p);
    p.expect(Semicolon);
    m.complete(p, DelegateDeclaration);
}

pub(super) fn type_parameter_list(p: &mut Parser<'_>) {
    let m = p.start();
    let span = p.current_span();
    p.bump();
    p.check_feature(Feature::Generics, span);
    loop {
        let parameter = p.start();
        attribute_lists(p);
        if p.at(InKw) || p.at(OutKw) {
            let span = p.current_span();
            p.bump();
            p.check_feature(Feature::GenericVariance, span);
        }
        p.expect_identifier();
        parameter.complete(p, TypeParameter);
        if !p.eat(Comma) {
            break;
        }
    }
    p.expect(GreaterThan);
    m.complete(p, TypeParameterList);
}

/// `where T : ...` clauses. A clause without a subject still gets an
/// identifier, colon and constraint, synthesized where missing.
pub(super) fn constraint_clauses(p: &mut Parser<'_>) {
    let mut subjects: Vec<&str> = Vec::new();
    while p.at_contextual(WhereKw) {
        let m = p.start();
        p.bump_remap(WhereKw);
        let span = p.current_span();
        let text = p.current_text();
        let subject = p.start();
        let named = p.at(Identifier);
        p.expect_identifier();
        subject.complete(p, IdentifierName);
        if named {
            if subjects.contains(&text) {
                p.error_at(span, ErrorCode::DuplicateConstraintClause, &[text]);
            } else {
                subjects.push(text);
            }
        }
        p.expect(Colon);
        loop {
            type_parameter_constraint(p);
            if !p.eat(Comma) {
                break;
            }
        }
        m.complete(p, TypeParameterConstraintClause);
    }
}

fn type_parameter_constraint(p: &mut Parser<'_>) {
    let m = p.start();
    match p.current() {
        ClassKw | StructKw => {
            p.bump();
            p.eat(Question);
            m.complete(p, ClassOrStructConstraint);
        }
        NewKw if p.nth(1) == OpenParen => {
            p.bump();
            p.bump();
            p.expect(CloseParen);
            m.complete(p, ConstructorConstraint);
        }
        DefaultKw => {
            p.bump();
            m.complete(p, DefaultConstraint);
        }
        _ => {
            types::type_(p);
            m.complete(p, TypeConstraint);
        }
    }
}

// --- parameters -----------------------------------------------------------

/// `(...)` parameters. Lambdas pass `allow_untyped` so `(a, b)` needs no
/// types.
pub(super) fn parameter_list(p: &mut Parser<'_>, allow_untyped: bool) -> CompletedMarker {
    parameters(p, OpenParen, CloseParen, ParameterList, allow_untyped)
}

fn bracketed_parameter_list(p: &mut Parser<'_>) -> CompletedMarker {
    parameters(p, OpenBracket, CloseBracket, BracketedParameterList, false)
}

fn parameters(
    p: &mut Parser<'_>,
    open: SyntaxKind,
    close: SyntaxKind,
    kind: SyntaxKind,
    allow_untyped: bool,
) -> CompletedMarker {
    let m = p.start();
    p.expect(open);
    if !p.at(close) {
        loop {
            parameter(p, allow_untyped, close);
            if !p.eat(Comma) {
                break;
            }
        }
    }
    p.expect(close);
    m.complete(p, kind)
}

fn parameter(p: &mut Parser<'_>, allow_untyped: bool, close: SyntaxKind) {
    let m = p.start();
    attribute_lists(p);
    if p.at(ArglistKw) {
        p.bump();
        m.complete(p, Parameter);
        return;
    }
    while matches!(p.current(), RefKw | OutKw | InKw | ParamsKw | ThisKw | ReadonlyKw) {
        let span = p.current_span();
        let is_this = p.at(ThisKw);
        p.bump();
        if is_this {
            p.check_feature(Feature::ExtensionMethods, span);
        }
    }
    let untyped = allow_untyped && p.at(Identifier) && (p.nth(1) == Comma || p.nth(1) == close);
    if untyped {
        if p.current_text() == "_" {
            let span = p.current_span();
            p.check_feature(Feature::LambdaDiscardParameters, span);
        }
        p.bump();
    } else {
        types::type_(p);
        p.expect_identifier();
    }
    if p.at(Equals) {
        let default = p.start();
        p.bump();
        expressions::expression(p);
        default.complete(p, EqualsValueClause);
    }
    m.complete(p, Parameter);
}

#[cfg(test)]
mod tests {
    use crate::config::{LanguageVersion, ParseOptions};
    use crate::cst::parser::parse_text;
    use crate::cst::{SyntaxKind, SyntaxNode};
    use crate::diagnostics::{Diagnostic, ErrorCode};

    fn parse_with(text: &str, version: LanguageVersion) -> (SyntaxNode, Vec<Diagnostic>) {
        let (green, diagnostics) = parse_text(text, ParseOptions::new(version));
        (SyntaxNode::new_root(green), diagnostics)
    }

    fn parse(text: &str) -> (SyntaxNode, Vec<Diagnostic>) {
        parse_with(text, LanguageVersion::LATEST)
    }

    fn find(root: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
        root.descendants().find(|n| n.kind() == kind)
    }

    fn count(root: &SyntaxNode, kind: SyntaxKind) -> usize {
        root.descendants().filter(|n| n.kind() == kind).count()
    }

    #[test]
    fn test_usings_and_namespaces() {
        let (root, diagnostics) = parse(
            "extern alias Lib;\nglobal using System;\nusing static System.Math;\nusing IO = System.IO;\nnamespace A.B { class C { } }\n",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::ExternAliasDirective), 1);
        assert_eq!(count(&root, SyntaxKind::UsingDirective), 3);
        assert_eq!(count(&root, SyntaxKind::NameEquals), 1);
        assert_eq!(count(&root, SyntaxKind::NamespaceDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::ClassDeclaration), 1);
    }

    #[test]
    fn test_file_scoped_namespace() {
        let (root, diagnostics) = parse("namespace App;\nclass A { }\nclass B { }\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let namespace = find(&root, SyntaxKind::FileScopedNamespaceDeclaration).unwrap();
        assert_eq!(count(&namespace, SyntaxKind::ClassDeclaration), 2);
    }

    #[test]
    fn test_class_members() {
        let (root, diagnostics) = parse(
            r#"
[Serializable]
public sealed partial class Point<T> : Base, IEquatable<Point<T>> where T : struct
{
    private const int Zero = 0;
    private readonly T _x, _y;
    public event EventHandler Changed;
    public Point(T x) : base(x) { _x = x; }
    ~Point() { }
    public T X { get => _x; init { } }
    public int Count { get; private set; } = 3;
    public T this[int i] => _x;
    public static Point<T> operator +(Point<T> a, Point<T> b) => a;
    public static implicit operator T(Point<T> p) => p._x;
    public async Task<int> RunAsync<U>(U value, params object[] rest) where U : class, new() { await Task.Yield(); return 1; }
    bool IEquatable<Point<T>>.Equals(Point<T> other) => true;
    public enum Kind { A, B = 2, }
    public delegate void Handler(object sender);
}
"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::FieldDeclaration), 2);
        assert_eq!(count(&root, SyntaxKind::EventFieldDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::ConstructorDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::ConstructorInitializer), 1);
        assert_eq!(count(&root, SyntaxKind::DestructorDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::PropertyDeclaration), 2);
        assert_eq!(count(&root, SyntaxKind::IndexerDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::OperatorDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::ConversionOperatorDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::MethodDeclaration), 2);
        assert_eq!(count(&root, SyntaxKind::ExplicitInterfaceSpecifier), 1);
        assert_eq!(count(&root, SyntaxKind::EnumMemberDeclaration), 2);
        assert_eq!(count(&root, SyntaxKind::DelegateDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::TypeParameterConstraintClause), 2);
        assert_eq!(count(&root, SyntaxKind::AwaitExpression), 1);
    }

    #[test]
    fn test_record_by_version() {
        let text = "record C(int X, int Y);";
        let (root, diagnostics) = parse_with(text, LanguageVersion::CSharp9);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let record = find(&root, SyntaxKind::RecordDeclaration).unwrap();
        let parameters = find(&record, SyntaxKind::ParameterList).unwrap();
        assert_eq!(count(&parameters, SyntaxKind::Parameter), 2);

        let (root, diagnostics) = parse_with(text, LanguageVersion::CSharp1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::FeatureNotAvailable);
        assert_eq!(diagnostics[0].span.start, 0);
        assert!(find(&root, SyntaxKind::RecordDeclaration).is_none());
        assert!(find(&root, SyntaxKind::GlobalStatement).is_some());
        assert!(find(&root, SyntaxKind::LocalFunctionStatement).is_some());
    }

    #[test]
    fn test_record_struct_and_primary_base() {
        let (root, diagnostics) =
            parse("public record struct P(int X);\nrecord Q(int A) : Base(A) { }\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::RecordDeclaration), 2);
        assert_eq!(count(&root, SyntaxKind::PrimaryConstructorBaseType), 1);
    }

    #[test]
    fn test_constraint_clause_missing_subject() {
        let (root, diagnostics) = parse("class a<b> where b : c where { }");
        assert_eq!(count(&root, SyntaxKind::TypeParameterConstraintClause), 2);
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![ErrorCode::IdentifierExpected, ErrorCode::TokenExpected, ErrorCode::TypeExpected]
        );
        let offset = "class a<b> where b : c where ".len() as u32;
        assert!(diagnostics.iter().all(|d| d.span.start == offset));
    }

    #[test]
    fn test_duplicate_constraint_clause_kept() {
        let (root, diagnostics) = parse("class C<T> where T : class where T : new() { }");
        assert_eq!(count(&root, SyntaxKind::TypeParameterConstraintClause), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::DuplicateConstraintClause);
        assert_eq!(diagnostics[0].args, vec!["T".to_string()]);
    }

    #[test]
    fn test_duplicate_modifier() {
        let (root, diagnostics) = parse("class C { public public int x; }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::DuplicateModifier);
        assert_eq!(count(&root, SyntaxKind::FieldDeclaration), 1);
    }

    #[test]
    fn test_top_level_statements() {
        let (root, diagnostics) = parse("using System;\nConsole.WriteLine(1);\nawait Task.Delay(1);\nclass C { }\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::GlobalStatement), 2);
        assert_eq!(count(&root, SyntaxKind::AwaitExpression), 1);

        let (_, diagnostics) = parse("class C { }\nM();\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::TopLevelStatementAfterDeclaration);
    }

    #[test]
    fn test_misplaced_elements() {
        let (_, diagnostics) = parse("class C { }\nusing System;\n");
        assert_eq!(diagnostics[0].code, ErrorCode::UsingAfterElements);

        let (_, diagnostics) = parse("class C { }\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::EndOfFileExpected);

        let (_, diagnostics) = parse("namespace N { public int x; }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::NamespaceMemberExpected);
    }

    #[test]
    fn test_incomplete_member() {
        let (root, diagnostics) = parse("class C { public 42; void M() { } }");
        assert_eq!(diagnostics[0].code, ErrorCode::InvalidMemberDeclaration);
        assert_eq!(count(&root, SyntaxKind::IncompleteMember), 1);
        assert_eq!(count(&root, SyntaxKind::MethodDeclaration), 1);
        assert_eq!(root.text().to_string(), "class C { public 42; void M() { } }");
    }

    #[test]
    fn test_unterminated_class() {
        let (root, diagnostics) = parse("class C { void M() { ");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.code == ErrorCode::TokenExpected));
        assert_eq!(count(&root, SyntaxKind::MethodDeclaration), 1);
    }
}
