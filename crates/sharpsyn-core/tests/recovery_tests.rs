//! Error recovery tests
//!
//! Malformed input must still produce a tree spanning the whole text, with
//! missing tokens synthesized and unplaceable tokens kept in the tree.

use sharpsyn_core::cst::is_missing;
use sharpsyn_core::{
    ErrorCode, LanguageVersion, ParseOptions, Severity, SyntaxKind, SyntaxNode, parse,
    parse_compilation_unit, parse_expression, parse_statement,
};

fn missing_tokens(node: &SyntaxNode) -> Vec<SyntaxKind> {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(is_missing)
        .map(|t| t.kind())
        .collect()
}

fn count(root: &SyntaxNode, kind: SyntaxKind) -> usize {
    root.descendants().filter(|n| n.kind() == kind).count()
}

#[test]
fn test_constraint_clause_without_subject() {
    let text = "class a<b> where b : c where { }";
    let parse = parse_compilation_unit(text, LanguageVersion::LATEST);
    let root = parse.syntax();
    assert_eq!(root.text().to_string(), text);

    let clauses: Vec<_> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::TypeParameterConstraintClause)
        .collect();
    assert_eq!(clauses.len(), 2);
    assert!(missing_tokens(&clauses[0]).is_empty());
    assert_eq!(
        missing_tokens(&clauses[1]),
        vec![SyntaxKind::Identifier, SyntaxKind::Colon, SyntaxKind::Identifier]
    );

    let offset = text.rfind("{").unwrap() as u32;
    let codes: Vec<_> = parse.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::IdentifierExpected, ErrorCode::TokenExpected, ErrorCode::TypeExpected]
    );
    assert!(parse.diagnostics().iter().all(|d| d.span.start == offset));
}

#[test]
fn test_unterminated_with_initializer() {
    let parse = parse_expression("0 with {", LanguageVersion::LATEST);
    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(diagnostic.code, ErrorCode::TokenExpected);
    assert_eq!(diagnostic.message(), "'}' expected");
    assert_eq!(diagnostic.span.start, 8);
    assert!(diagnostic.span.is_empty());

    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::WithExpression), 1);
    assert_eq!(missing_tokens(&root), vec![SyntaxKind::CloseBrace]);
}

#[test]
fn test_missing_delimiters_are_synthesized() {
    let text = "class C { void M() { F(1, 2 } }";
    let parse = parse_compilation_unit(text, LanguageVersion::LATEST);
    assert_eq!(parse.syntax().text().to_string(), text);
    let missing = missing_tokens(&parse.syntax());
    assert!(missing.contains(&SyntaxKind::CloseParen), "{missing:?}");
    assert!(missing.contains(&SyntaxKind::Semicolon), "{missing:?}");
    assert!(
        parse
            .diagnostics()
            .iter()
            .all(|d| d.code == ErrorCode::TokenExpected)
    );
}

#[test]
fn test_unterminated_class_keeps_members() {
    let parse = parse_compilation_unit("class C { void M() { ", LanguageVersion::LATEST);
    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::MethodDeclaration), 1);
    assert_eq!(
        missing_tokens(&root),
        vec![SyntaxKind::CloseBrace, SyntaxKind::CloseBrace]
    );
    assert_eq!(parse.diagnostics().len(), 2);
}

#[test]
fn test_garbage_member_becomes_incomplete_member() {
    let text = "class C { public 42; void M() { } }";
    let parse = parse_compilation_unit(text, LanguageVersion::LATEST);
    let root = parse.syntax();
    assert_eq!(root.text().to_string(), text);
    assert_eq!(parse.diagnostics()[0].code, ErrorCode::InvalidMemberDeclaration);
    assert_eq!(count(&root, SyntaxKind::IncompleteMember), 1);
    assert_eq!(count(&root, SyntaxKind::MethodDeclaration), 1);
}

#[test]
fn test_statement_level_resynchronization() {
    let parse = parse_statement("{ a(); else b(); ) c(); }", LanguageVersion::LATEST);
    let codes: Vec<_> = parse.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::ElseCannotStartStatement, ErrorCode::UnexpectedToken]
    );
    assert_eq!(count(&parse.syntax(), SyntaxKind::ExpressionStatement), 3);
}

#[test]
fn test_lexical_errors_reach_the_parse() {
    let text = "class C { string s = \"abc\n; char c = ''; }\n/* open";
    let parse = parse_compilation_unit(text, LanguageVersion::LATEST);
    assert_eq!(parse.syntax().text().to_string(), text);
    let codes: Vec<_> = parse.diagnostics().iter().map(|d| d.code).collect();
    assert!(codes.contains(&ErrorCode::UnterminatedString), "{codes:?}");
    assert!(codes.contains(&ErrorCode::EmptyCharacterLiteral), "{codes:?}");
    assert!(codes.contains(&ErrorCode::UnterminatedComment), "{codes:?}");
}

#[test]
fn test_diagnostics_are_ordered_and_in_bounds() {
    let text = "namespace N { class { int x = ; } } } )";
    let parse = parse(text, ParseOptions::default());
    assert!(!parse.diagnostics().is_empty());
    let starts: Vec<_> = parse.diagnostics().iter().map(|d| d.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    for diagnostic in parse.diagnostics() {
        assert!(diagnostic.span.end as usize <= text.len());
        assert_eq!(diagnostic.severity, Severity::Error);
    }
}

#[test]
fn test_mistaken_empty_statement_is_a_warning() {
    let parse = parse_statement("while (x);", LanguageVersion::LATEST);
    assert_eq!(parse.diagnostics().len(), 1);
    assert_eq!(parse.diagnostics()[0].severity, Severity::Warning);
    assert!(!parse.has_errors());
}

#[test]
fn test_deep_nesting_terminates() {
    let depth = 500;
    let text = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let parse = parse_statement(&text, LanguageVersion::LATEST);
    assert_eq!(parse.syntax().text().to_string(), text);
    let codes: Vec<_> = parse.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::NestingTooDeep]);

    let text = format!("class C {{ void M() {} }}", "{".repeat(depth));
    let parse = parse_compilation_unit(&text, LanguageVersion::LATEST);
    assert_eq!(parse.syntax().text().to_string(), text);
    assert!(parse.has_errors());
}

#[test]
fn test_ordinary_nesting_is_accepted() {
    let depth = 150;
    let text = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let parse = parse_statement(&text, LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
}
