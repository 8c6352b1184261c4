//! Statements and blocks

use super::disambiguation::{
    DeclarationKind, at_block_terminator, can_start_expression, can_start_statement,
    declaration_at, has_top_level_comma, is_async_modifier, is_var_designation, matching_close,
};
use super::expressions;
use super::types;
use super::{CompletedMarker, Marker, Parser, TokenSet, declarations};
use crate::cst::SyntaxKind::{self, *};
use crate::diagnostics::ErrorCode;
use crate::features::Feature;

/// Postfix operators that may not follow a `with { }` block directly
const WITH_TRAILERS: TokenSet = TokenSet::new(&[Dot, OpenParen, OpenBracket, MinusGreaterThan]);

pub(super) fn block(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.expect(OpenBrace);
    statement_list(p, |p| p.at(CloseBrace));
    p.expect(CloseBrace);
    m.complete(p, Block)
}

/// Statements up to `stop`, end of file, or a keyword only a type body can
/// contain
fn statement_list(p: &mut Parser<'_>, stop: fn(&mut Parser<'_>) -> bool) {
    while !p.at_end() && !stop(p) {
        if p.at(ElseKw) {
            p.skip_token(ErrorCode::ElseCannotStartStatement);
            continue;
        }
        if at_block_terminator(p) {
            break;
        }
        if !can_start_statement(p) {
            p.recover_until(ErrorCode::UnexpectedToken, |p| {
                stop(p) || can_start_statement(p) || at_block_terminator(p) || p.at(ElseKw)
            });
            continue;
        }
        let before = p.position();
        statement(p);
        p.force_progress(before, |p| stop(p) || can_start_statement(p));
    }
}

pub(super) fn statement(p: &mut Parser<'_>) -> CompletedMarker {
    if !p.enter() {
        p.leave();
        let m = p.start();
        p.skip_too_deep();
        p.missing_silent(Semicolon);
        return m.complete(p, EmptyStatement);
    }
    let result = statement_inner(p);
    p.leave();
    result
}

fn statement_inner(p: &mut Parser<'_>) -> CompletedMarker {
    match p.current() {
        OpenBrace => return block(p),
        Semicolon => {
            let m = p.start();
            p.bump();
            return m.complete(p, EmptyStatement);
        }
        IfKw => return if_statement(p),
        WhileKw => return while_statement(p),
        DoKw => return do_statement(p),
        ForKw => return for_statement(p),
        ForeachKw => return foreach_statement(p),
        SwitchKw => return switch_statement(p),
        BreakKw => return keyword_statement(p, BreakStatement),
        ContinueKw => return keyword_statement(p, ContinueStatement),
        ReturnKw => return return_or_throw(p, ReturnStatement),
        ThrowKw => return return_or_throw(p, ThrowStatement),
        GotoKw => return goto_statement(p),
        TryKw => return try_statement(p),
        CheckedKw if p.nth(1) == OpenBrace => return keyword_block(p, CheckedStatement),
        UncheckedKw if p.nth(1) == OpenBrace => return keyword_block(p, UncheckedStatement),
        UnsafeKw if p.nth(1) == OpenBrace => return keyword_block(p, UnsafeStatement),
        LockKw => return lock_statement(p),
        UsingKw => return using_statement(p),
        FixedKw => return fixed_statement(p),
        ConstKw => {
            let m = p.start();
            p.bump();
            declarations::variable_declaration(p);
            p.expect(Semicolon);
            return m.complete(p, LocalDeclarationStatement);
        }
        OpenBracket => return attributed_local_function(p),
        Identifier if p.nth(1) == Colon => return labeled_statement(p),
        Identifier if p.at_contextual(YieldKw) && matches!(p.nth(1), ReturnKw | BreakKw) => {
            return yield_statement(p);
        }
        Identifier if p.at_contextual(AwaitKw) && p.nth(1) == ForeachKw => {
            return foreach_statement(p);
        }
        Identifier if p.at_contextual(AwaitKw) && p.nth(1) == UsingKw => {
            return using_statement(p);
        }
        Identifier if p.in_async() && p.at_contextual(AwaitKw) && can_start_expression(p, 1) => {
            return expression_statement(p);
        }
        _ => {}
    }

    if let Some(modifiers) = local_function_modifiers(p) {
        return local_function(p, modifiers);
    }
    match declaration_at(p, 0) {
        Some(DeclarationKind::LocalFunction) => local_function(p, 0),
        Some(DeclarationKind::Variable) => {
            let m = p.start();
            declarations::variable_declaration(p);
            p.expect(Semicolon);
            m.complete(p, LocalDeclarationStatement)
        }
        None => expression_statement(p),
    }
}

/// Statement in the body of `if`, `while` and friends. Declarations and
/// labels are parsed but reported; `;` right after the header draws a
/// warning when `warn_empty` is set.
fn embedded_statement(p: &mut Parser<'_>, warn_empty: bool) -> CompletedMarker {
    if p.at(Semicolon) {
        let m = p.start();
        if warn_empty {
            p.error(ErrorCode::PossibleMistakenEmptyStatement, &[]);
        }
        p.bump();
        return m.complete(p, EmptyStatement);
    }
    if !can_start_statement(p) || at_block_terminator(p) {
        let m = p.start();
        let missing = p.start();
        p.missing(Identifier, ErrorCode::ExpressionExpected);
        missing.complete(p, IdentifierName);
        p.missing_silent(Semicolon);
        return m.complete(p, ExpressionStatement);
    }
    let span = p.current_span();
    let statement = statement(p);
    if matches!(
        statement.kind(),
        LocalDeclarationStatement | LocalFunctionStatement | LabeledStatement
    ) {
        p.error_at(span, ErrorCode::BadEmbeddedStatement, &[]);
    }
    statement
}

fn expression_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let expr = expressions::expression(p);
    if expr.kind() == WithExpression && p.at_ts(WITH_TRAILERS) {
        p.recover_until(ErrorCode::UnexpectedToken, |p| p.at(Semicolon) || p.at(CloseBrace));
    }
    p.expect(Semicolon);
    m.complete(p, ExpressionStatement)
}

/// `(expr)` after a statement keyword
fn parenthesized_condition(p: &mut Parser<'_>) {
    p.expect(OpenParen);
    expressions::expression(p);
    p.expect(CloseParen);
}

fn if_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p, true);
    if p.at(ElseKw) {
        let clause = p.start();
        p.bump();
        embedded_statement(p, false);
        clause.complete(p, ElseClause);
    }
    m.complete(p, IfStatement)
}

fn while_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p, true);
    m.complete(p, WhileStatement)
}

fn do_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    embedded_statement(p, false);
    p.expect(WhileKw);
    parenthesized_condition(p);
    p.expect(Semicolon);
    m.complete(p, DoStatement)
}

fn expression_list(p: &mut Parser<'_>) {
    loop {
        expressions::expression(p);
        if !p.eat(Comma) {
            break;
        }
    }
}

fn for_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(OpenParen);
    if !p.at(Semicolon) {
        if p.at(RefKw) || declaration_at(p, 0) == Some(DeclarationKind::Variable) {
            declarations::variable_declaration(p);
        } else {
            expression_list(p);
        }
    }
    p.expect(Semicolon);
    if !p.at(Semicolon) {
        expressions::expression(p);
    }
    p.expect(Semicolon);
    if !p.at(CloseParen) {
        expression_list(p);
    }
    p.expect(CloseParen);
    embedded_statement(p, true);
    m.complete(p, ForStatement)
}

fn foreach_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.at_contextual(AwaitKw) {
        let span = p.current_span();
        p.bump_remap(AwaitKw);
        p.check_feature(Feature::AsyncStreams, span);
    }
    p.bump();
    p.expect(OpenParen);
    let kind = if is_var_designation(p, 0) || is_deconstruction(p) {
        expressions::expression(p);
        ForEachVariableStatement
    } else {
        types::return_type(p);
        p.expect_identifier();
        ForEachStatement
    };
    p.expect(InKw);
    expressions::expression(p);
    p.expect(CloseParen);
    embedded_statement(p, true);
    m.complete(p, kind)
}

/// `(a, b) in` or `(var a, var b) in` at the current token
fn is_deconstruction(p: &mut Parser<'_>) -> bool {
    p.at(OpenParen) && matching_close(p, 0).is_some_and(|close| p.nth(close + 1) == InKw)
}

fn switch_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    let is_tuple = p.at(OpenParen) && matching_close(p, 0).is_some_and(|close| has_top_level_comma(p, 0, close));
    if is_tuple {
        expressions::expression(p);
    } else {
        parenthesized_condition(p);
    }
    p.expect(OpenBrace);
    while !p.at(CloseBrace) && !p.at_end() {
        if at_switch_label(p) {
            switch_section(p);
        } else {
            p.recover_until(ErrorCode::UnexpectedToken, |p| {
                at_switch_label(p) || p.at(CloseBrace) || at_block_terminator(p)
            });
            if at_block_terminator(p) {
                break;
            }
        }
    }
    p.expect(CloseBrace);
    m.complete(p, SwitchStatement)
}

fn at_switch_label(p: &mut Parser<'_>) -> bool {
    p.at(CaseKw) || (p.at(DefaultKw) && p.nth(1) == Colon)
}

fn switch_section(p: &mut Parser<'_>) {
    let m = p.start();
    while at_switch_label(p) {
        if p.at(CaseKw) {
            case_label(p);
        } else {
            let label = p.start();
            p.bump();
            p.bump();
            label.complete(p, DefaultSwitchLabel);
        }
    }
    statement_list(p, |p| at_switch_label(p) || p.at(CloseBrace));
    m.complete(p, SwitchSection);
}

/// A constant label keeps its expression form; anything else, or a
/// constant with a `when` clause, is a pattern label
fn case_label(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    let span = p.current_span();
    // a lone constant is reparsed as the classic `case expr:` label
    let pattern = p.try_parse(|p| {
        let pattern = super::patterns::pattern(p);
        (pattern.kind() != ConstantPattern || p.at_contextual(WhenKw)).then_some(pattern)
    });
    if pattern.is_none() {
        expressions::expression(p);
        p.expect(Colon);
        m.complete(p, CaseSwitchLabel);
        return;
    }
    p.check_feature(Feature::PatternMatching, span);
    if p.at_contextual(WhenKw) {
        let clause = p.start();
        p.bump_remap(WhenKw);
        expressions::expression(p);
        clause.complete(p, WhenClause);
    }
    p.expect(Colon);
    m.complete(p, CasePatternSwitchLabel);
}

fn keyword_statement(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(Semicolon);
    m.complete(p, kind)
}

fn return_or_throw(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if !p.at(Semicolon) && can_start_expression(p, 0) {
        expressions::expression(p);
    }
    p.expect(Semicolon);
    m.complete(p, kind)
}

fn goto_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    let kind = match p.current() {
        CaseKw => {
            p.bump();
            expressions::expression(p);
            GotoCaseStatement
        }
        DefaultKw => {
            p.bump();
            GotoDefaultStatement
        }
        _ => {
            expressions::simple_name(p);
            GotoStatement
        }
    };
    p.expect(Semicolon);
    m.complete(p, kind)
}

fn try_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    block(p);
    let mut has_handler = false;
    while p.at(CatchKw) {
        catch_clause(p);
        has_handler = true;
    }
    if p.at(FinallyKw) {
        let clause = p.start();
        p.bump();
        block(p);
        clause.complete(p, FinallyClause);
        has_handler = true;
    }
    if !has_handler {
        p.error(ErrorCode::CatchOrFinallyExpected, &[]);
        let clause = p.start();
        p.missing_silent(FinallyKw);
        let body = p.start();
        p.missing_silent(OpenBrace);
        p.missing_silent(CloseBrace);
        body.complete(p, Block);
        clause.complete(p, FinallyClause);
    }
    m.complete(p, TryStatement)
}

fn catch_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if p.at(OpenParen) {
        let declaration = p.start();
        p.bump();
        types::type_(p);
        if p.at(Identifier) {
            p.bump();
        }
        p.expect(CloseParen);
        declaration.complete(p, CatchDeclaration);
    }
    if p.at_contextual(WhenKw) {
        let filter = p.start();
        let span = p.current_span();
        p.bump_remap(WhenKw);
        p.check_feature(Feature::ExceptionFilters, span);
        parenthesized_condition(p);
        filter.complete(p, CatchFilterClause);
    }
    block(p);
    m.complete(p, CatchClause);
}

fn keyword_block(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    block(p);
    m.complete(p, kind)
}

fn lock_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p, true);
    m.complete(p, LockStatement)
}

/// `using (...) stmt`, or a `using` declaration, optionally after `await`
fn using_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.at_contextual(AwaitKw) {
        let span = p.current_span();
        p.bump_remap(AwaitKw);
        p.check_feature(Feature::AsyncStreams, span);
    }
    let span = p.current_span();
    p.bump();
    if p.at(OpenParen) {
        p.bump();
        if declaration_at(p, 0) == Some(DeclarationKind::Variable) {
            declarations::variable_declaration(p);
        } else {
            expressions::expression(p);
        }
        p.expect(CloseParen);
        embedded_statement(p, true);
        return m.complete(p, UsingStatement);
    }
    p.check_feature(Feature::UsingDeclarations, span);
    declarations::variable_declaration(p);
    p.expect(Semicolon);
    m.complete(p, LocalDeclarationStatement)
}

fn fixed_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(OpenParen);
    declarations::variable_declaration(p);
    p.expect(CloseParen);
    embedded_statement(p, true);
    m.complete(p, FixedStatement)
}

fn yield_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    p.bump_remap(YieldKw);
    p.check_feature(Feature::YieldIterators, span);
    let kind = if p.at(ReturnKw) {
        p.bump();
        expressions::expression(p);
        YieldReturnStatement
    } else {
        p.bump();
        YieldBreakStatement
    };
    p.expect(Semicolon);
    m.complete(p, kind)
}

fn labeled_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.bump();
    statement(p);
    m.complete(p, LabeledStatement)
}

/// Number of modifier tokens before a local function, if one follows
fn local_function_modifiers(p: &mut Parser<'_>) -> Option<usize> {
    let mut i = 0;
    while matches!(p.nth(i), StaticKw | UnsafeKw | ExternKw) || is_async_modifier(p, i) {
        i += 1;
    }
    (i > 0 && declaration_at(p, i) == Some(DeclarationKind::LocalFunction)).then_some(i)
}

/// `[A] static void F() { }`; attributes are only allowed on local
/// functions at statement level
fn attributed_local_function(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let span = p.current_span();
    declarations::attribute_lists(p);
    p.check_feature(Feature::LocalFunctionAttributes, span);
    let mut modifiers = 0;
    while matches!(p.nth(modifiers), StaticKw | UnsafeKw | ExternKw) || is_async_modifier(p, modifiers) {
        modifiers += 1;
    }
    local_function_rest(p, m, modifiers)
}

fn local_function(p: &mut Parser<'_>, modifiers: usize) -> CompletedMarker {
    let m = p.start();
    local_function_rest(p, m, modifiers)
}

fn local_function_rest(p: &mut Parser<'_>, m: Marker, modifiers: usize) -> CompletedMarker {
    let span = p.current_span();
    p.check_feature(Feature::LocalFunctions, span);
    let mut is_async = false;
    for _ in 0..modifiers {
        if p.at_contextual(AsyncKw) {
            let span = p.current_span();
            p.bump_remap(AsyncKw);
            p.check_feature(Feature::AsyncAwait, span);
            is_async = true;
        } else {
            let is_static = p.at(StaticKw);
            let span = p.current_span();
            p.bump();
            if is_static {
                p.check_feature(Feature::StaticLocalFunctions, span);
            }
        }
    }
    types::return_type(p);
    p.expect_identifier();
    if p.at(LessThan) {
        declarations::type_parameter_list(p);
    }
    declarations::parameter_list(p, false);
    declarations::constraint_clauses(p);
    declarations::method_body(p, is_async);
    m.complete(p, LocalFunctionStatement)
}

#[cfg(test)]
mod tests {
    use crate::config::{ParseEntry, ParseOptions};
    use crate::cst::parser::parse_text;
    use crate::cst::{SyntaxKind, SyntaxNode};
    use crate::diagnostics::{Diagnostic, ErrorCode};

    fn parse_stmt(text: &str) -> (SyntaxNode, Vec<Diagnostic>) {
        let options = ParseOptions::default().with_entry(ParseEntry::Statement);
        let (green, diagnostics) = parse_text(text, options);
        (SyntaxNode::new_root(green), diagnostics)
    }

    fn statement_kind(text: &str) -> SyntaxKind {
        let (root, diagnostics) = parse_stmt(text);
        assert!(diagnostics.is_empty(), "{text}: {diagnostics:?}");
        root.first_child().map(|n| n.kind()).unwrap_or(SyntaxKind::EndOfFile)
    }

    fn count(root: &SyntaxNode, kind: SyntaxKind) -> usize {
        root.descendants().filter(|n| n.kind() == kind).count()
    }

    #[test]
    fn test_declaration_versus_expression() {
        assert_eq!(statement_kind("int x = 1;"), SyntaxKind::LocalDeclarationStatement);
        assert_eq!(statement_kind("var x = y;"), SyntaxKind::LocalDeclarationStatement);
        assert_eq!(statement_kind("List<int> xs;"), SyntaxKind::LocalDeclarationStatement);
        assert_eq!(statement_kind("a < b;"), SyntaxKind::ExpressionStatement);
        assert_eq!(statement_kind("x = y;"), SyntaxKind::ExpressionStatement);
        assert_eq!(statement_kind("F(x);"), SyntaxKind::ExpressionStatement);
        assert_eq!(statement_kind("const int N = 3;"), SyntaxKind::LocalDeclarationStatement);
    }

    #[test]
    fn test_local_functions() {
        assert_eq!(statement_kind("int Add(int a, int b) => a + b;"), SyntaxKind::LocalFunctionStatement);
        assert_eq!(statement_kind("static void F() { }"), SyntaxKind::LocalFunctionStatement);
        assert_eq!(
            statement_kind("async Task RunAsync() { await Task.Delay(1); }"),
            SyntaxKind::LocalFunctionStatement
        );
    }

    #[test]
    fn test_contextual_keywords_as_identifiers() {
        assert_eq!(statement_kind("record = 1;"), SyntaxKind::ExpressionStatement);
        assert_eq!(statement_kind("var await = 1;"), SyntaxKind::LocalDeclarationStatement);
        assert_eq!(statement_kind("yield = 2;"), SyntaxKind::ExpressionStatement);
        assert_eq!(statement_kind("yield return 2;"), SyntaxKind::YieldReturnStatement);
    }

    #[test]
    fn test_control_flow() {
        let (root, diagnostics) = parse_stmt(
            "{ if (a) b(); else { c(); } while (x) x--; do { } while (y); for (int i = 0; i < n; i++) { } foreach (var (k, v) in map) { } }",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::IfStatement), 1);
        assert_eq!(count(&root, SyntaxKind::ElseClause), 1);
        assert_eq!(count(&root, SyntaxKind::WhileStatement), 1);
        assert_eq!(count(&root, SyntaxKind::DoStatement), 1);
        assert_eq!(count(&root, SyntaxKind::ForStatement), 1);
        assert_eq!(count(&root, SyntaxKind::ForEachVariableStatement), 1);
    }

    #[test]
    fn test_switch_labels() {
        let (root, diagnostics) = parse_stmt(
            "switch (x) { case 1: case 2: break; case int n when n > 3: return; default: goto case 1; }",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::SwitchSection), 3);
        assert_eq!(count(&root, SyntaxKind::CaseSwitchLabel), 2);
        assert_eq!(count(&root, SyntaxKind::CasePatternSwitchLabel), 1);
        assert_eq!(count(&root, SyntaxKind::DefaultSwitchLabel), 1);
        assert_eq!(count(&root, SyntaxKind::GotoCaseStatement), 1);
    }

    #[test]
    fn test_constant_case_labels_leave_no_pattern_nodes() {
        let (root, diagnostics) = parse_stmt("switch (x) { case 1 + 2: case \"a\": break; }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::CaseSwitchLabel), 2);
        assert_eq!(count(&root, SyntaxKind::ConstantPattern), 0);
        assert_eq!(count(&root, SyntaxKind::CasePatternSwitchLabel), 0);
    }

    #[test]
    fn test_try_without_handlers() {
        let (root, diagnostics) = parse_stmt("try { }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::CatchOrFinallyExpected);
        assert_eq!(count(&root, SyntaxKind::FinallyClause), 1);
        assert_eq!(root.text().to_string(), "try { }");
    }

    #[test]
    fn test_try_catch_filter() {
        let (root, diagnostics) =
            parse_stmt("try { } catch (IOException e) when (e.HResult == 5) { } finally { }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(count(&root, SyntaxKind::CatchFilterClause), 1);
        assert_eq!(count(&root, SyntaxKind::FinallyClause), 1);
    }

    #[test]
    fn test_using_forms() {
        assert_eq!(statement_kind("using (var f = Open()) { }"), SyntaxKind::UsingStatement);
        assert_eq!(statement_kind("using var f = Open();"), SyntaxKind::LocalDeclarationStatement);
    }

    #[test]
    fn test_embedded_statement_diagnostics() {
        let (_, diagnostics) = parse_stmt("if (x) int y = 1;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::BadEmbeddedStatement);

        let (_, diagnostics) = parse_stmt("while (x);");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::PossibleMistakenEmptyStatement);
    }

    #[test]
    fn test_block_recovery() {
        let (root, diagnostics) = parse_stmt("{ a(); else b(); ) c(); }");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code, ErrorCode::ElseCannotStartStatement);
        assert_eq!(diagnostics[1].code, ErrorCode::UnexpectedToken);
        assert_eq!(count(&root, SyntaxKind::ExpressionStatement), 3);
        assert_eq!(root.text().to_string(), "{ a(); else b(); ) c(); }");
    }

    #[test]
    fn test_missing_semicolon() {
        let (_, diagnostics) = parse_stmt("x = 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::TokenExpected);
        assert_eq!(diagnostics[0].args, vec![";".to_string()]);
        assert_eq!(diagnostics[0].span.start, 5);
    }
}
