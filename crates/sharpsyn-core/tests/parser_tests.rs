//! Parser integration tests through the public API
//!
//! Covers whole-file shapes, contextual keywords, version gating and the
//! `with` expression precedence rules.

use sharpsyn_core::cst::ast::{AstNode, CompilationUnit, TypeDeclaration};
use sharpsyn_core::{
    ErrorCode, LanguageVersion, ParseOptions, SyntaxKind, SyntaxNode, debug_tree, parse,
    parse_compilation_unit, parse_expression, parse_statement,
};

fn count(root: &SyntaxNode, kind: SyntaxKind) -> usize {
    root.descendants().filter(|n| n.kind() == kind).count()
}

fn find(root: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    root.descendants().find(|n| n.kind() == kind)
}

/// Nested node kinds, e.g. `BinaryExpression(IdentifierName LiteralExpression)`
fn shape(node: &SyntaxNode) -> String {
    let children: Vec<String> = node.children().map(|child| shape(&child)).collect();
    if children.is_empty() {
        format!("{:?}", node.kind())
    } else {
        format!("{:?}({})", node.kind(), children.join(" "))
    }
}

#[test]
fn test_empty_class_tree() {
    let parse = parse("class C { }", ParseOptions::default());
    insta::assert_snapshot!(debug_tree(&parse.syntax()), @r#"
    CompilationUnit@0..11
      ClassDeclaration@0..11
        ClassKw@0..5 "class"
        Whitespace@5..6 " "
        Identifier@6..7 "C"
        Whitespace@7..8 " "
        OpenBrace@8..9 "{"
        Whitespace@9..10 " "
        CloseBrace@10..11 "}"
      EndOfFile@11..11 ""
    "#);
}

#[test]
fn test_realistic_file() {
    let source = r#"using System;
using System.Collections.Generic;

namespace Shop.Orders
{
    /// <summary>An order line.</summary>
    public sealed class Line<T> : IComparable<Line<T>> where T : struct
    {
        private readonly List<T> _items = new();

        public Line(int quantity) => Quantity = quantity;

        public int Quantity { get; private set; }

        public T this[int index] => _items[index];

        public int CompareTo(Line<T> other)
        {
            if (other is null) return 1;
            return Quantity.CompareTo(other.Quantity);
        }

        public static Line<T> operator +(Line<T> a, Line<T> b) => new Line<T>(a.Quantity + b.Quantity);
    }

    public enum Status { Open, Closed = 2, }
}
"#;
    let parse = parse_compilation_unit(source, LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    assert_eq!(parse.syntax().text().to_string(), source);

    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::UsingDirective), 2);
    assert_eq!(count(&root, SyntaxKind::NamespaceDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::ClassDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::ConstructorDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::PropertyDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::IndexerDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::OperatorDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::MethodDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::EnumMemberDeclaration), 2);

    let unit = CompilationUnit::cast(root).unwrap();
    assert_eq!(unit.usings().count(), 2);
    let namespace = unit.namespaces().next().unwrap();
    let Some(TypeDeclaration::Class(class)) = namespace.type_declarations().next() else {
        panic!("expected a class");
    };
    assert_eq!(class.name().as_deref(), Some("Line"));
    assert_eq!(class.constraint_clauses().count(), 1);
}

#[test]
fn test_contextual_keywords_as_names() {
    let source = "class record { int record; int async; void M() { var record = 1; var await = 2; } }";
    let parse = parse_compilation_unit(source, LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::ClassDeclaration), 1);
    assert_eq!(count(&root, SyntaxKind::RecordDeclaration), 0);
    assert_eq!(count(&root, SyntaxKind::FieldDeclaration), 2);
    assert_eq!(count(&root, SyntaxKind::LocalDeclarationStatement), 2);
}

#[test]
fn test_record_reinterpreted_under_oldest_version() {
    let text = "record C(int X, int Y);";

    let parse = parse_compilation_unit(text, LanguageVersion::CSharp9);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    let record = find(&parse.syntax(), SyntaxKind::RecordDeclaration).unwrap();
    let parameters = find(&record, SyntaxKind::ParameterList).unwrap();
    assert_eq!(count(&parameters, SyntaxKind::Parameter), 2);

    let parse = parse_compilation_unit(text, LanguageVersion::CSharp1);
    assert_eq!(parse.diagnostics().len(), 1);
    let diagnostic = &parse.diagnostics()[0];
    assert_eq!(diagnostic.code, ErrorCode::FeatureNotAvailable);
    assert_eq!(diagnostic.span.start, 0);
    assert!(find(&parse.syntax(), SyntaxKind::RecordDeclaration).is_none());
    assert!(find(&parse.syntax(), SyntaxKind::LocalFunctionStatement).is_some());
}

#[test]
fn test_gated_constructs_still_parse() {
    let text = "class C { int P { get; } = 1; void M() => F(x?.y, $\"{z}\"); }";
    let latest = parse_compilation_unit(text, LanguageVersion::LATEST);
    let old = parse_compilation_unit(text, LanguageVersion::CSharp5);
    assert!(latest.diagnostics().is_empty(), "{:?}", latest.diagnostics());
    assert!(!old.diagnostics().is_empty());
    assert!(
        old.diagnostics()
            .iter()
            .all(|d| d.code == ErrorCode::FeatureNotAvailable)
    );
    assert_eq!(shape(&latest.syntax()), shape(&old.syntax()));
}

#[test]
fn test_with_expression_precedence() {
    let parse = parse_expression("M() with { } + 3", LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty());
    assert_eq!(
        shape(&parse.syntax().first_child().unwrap()),
        "BinaryExpression(WithExpression(InvocationExpression(IdentifierName ArgumentList) WithInitializerExpression) LiteralExpression)"
    );

    let parse = parse_expression("M() with { } with { }", LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty());
    let outer = parse.syntax().first_child().unwrap();
    assert_eq!(outer.kind(), SyntaxKind::WithExpression);
    assert_eq!(outer.first_child().unwrap().kind(), SyntaxKind::WithExpression);
}

#[test]
fn test_with_expression_then_member_access() {
    let parse = parse_expression("M() with { }.ToString()", LanguageVersion::LATEST);
    assert_eq!(parse.diagnostics().len(), 1);
    assert_eq!(parse.diagnostics()[0].code, ErrorCode::UnexpectedToken);
    assert_eq!(parse.diagnostics()[0].message(), "Unexpected token '.'");
    let kinds: Vec<_> = parse.syntax().children().map(|n| n.kind()).collect();
    assert_eq!(kinds, vec![SyntaxKind::WithExpression, SyntaxKind::SkippedTokens]);
}

#[test]
fn test_with_expression_at_statement_start() {
    let parse = parse_statement("a with { }.b;", LanguageVersion::LATEST);
    assert_eq!(parse.diagnostics().len(), 1, "{:?}", parse.diagnostics());
    assert_eq!(parse.diagnostics()[0].message(), "Unexpected token '.'");
    let statement = parse.syntax().first_child().unwrap();
    assert_eq!(
        shape(&statement),
        "ExpressionStatement(WithExpression(IdentifierName WithInitializerExpression) SkippedTokens)"
    );

    let source = "class C { void M() { a with { }.b; } }";
    let parse = parse_compilation_unit(source, LanguageVersion::LATEST);
    assert_eq!(parse.diagnostics().len(), 1, "{:?}", parse.diagnostics());
    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::LocalDeclarationStatement), 0);
    assert_eq!(count(&root, SyntaxKind::WithExpression), 1);
    assert_eq!(count(&root, SyntaxKind::Block), 1);
}

#[test]
fn test_attributes_on_local_functions() {
    let source = "class C { void M() { [Obsolete] void G() { } [A, B(1)] static int H() => 1; } }";
    let parse = parse_compilation_unit(source, LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::LocalFunctionStatement), 2);
    let function = find(&root, SyntaxKind::LocalFunctionStatement).unwrap();
    assert_eq!(function.first_child().unwrap().kind(), SyntaxKind::AttributeList);

    let parse = parse_compilation_unit(source, LanguageVersion::CSharp8);
    assert_eq!(parse.diagnostics().len(), 2);
    assert!(parse.diagnostics().iter().all(|d| d.code == ErrorCode::FeatureNotAvailable));
    assert!(parse.diagnostics()[0].message().contains("local function attributes"));
}

#[test]
fn test_generic_versus_comparison_in_statements() {
    let source = "class C { void M() { F<int>(x); G(a < b, c > d); List<List<int>> xs = null; } }";
    let parse = parse_compilation_unit(source, LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::GenericName), 3);
    assert_eq!(count(&root, SyntaxKind::BinaryExpression), 2);
    assert_eq!(count(&root, SyntaxKind::LocalDeclarationStatement), 1);
}

#[test]
fn test_top_level_program() {
    let source = "using System;\n\nConsole.WriteLine(\"hi\");\nawait Task.Delay(1);\nclass Helper { }\n";
    let parse = parse_compilation_unit(source, LanguageVersion::LATEST);
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    let root = parse.syntax();
    assert_eq!(count(&root, SyntaxKind::GlobalStatement), 2);
    assert_eq!(count(&root, SyntaxKind::AwaitExpression), 1);
    assert_eq!(count(&root, SyntaxKind::ClassDeclaration), 1);
}
