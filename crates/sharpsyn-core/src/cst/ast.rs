//! Typed AST layer over CST
//!
//! Thin, type-safe wrappers over [`SyntaxNode`]s. A wrapper owns nothing
//! beyond its node; accessors walk the children on demand and return
//! `None` when the parser had to synthesize or skip the piece.
//!
//! # Example
//!
//! ```
//! use sharpsyn_core::cst::ast::{AstNode, CompilationUnit, TypeDeclaration};
//! use sharpsyn_core::{ParseOptions, parse};
//!
//! let parse = parse("record Point(int X, int Y);", ParseOptions::default());
//! let unit = CompilationUnit::cast(parse.syntax()).unwrap();
//! let TypeDeclaration::Record(record) = unit.type_declarations().next().unwrap() else {
//!     panic!("expected a record");
//! };
//! assert_eq!(record.name().as_deref(), Some("Point"));
//! assert_eq!(record.parameter_list().unwrap().parameters().count(), 2);
//! ```

use super::{SyntaxKind, SyntaxNode, SyntaxToken, is_missing};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Source text of the node, trivia included
    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$name
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> {
    parent.children().filter_map(N::cast)
}

/// First non-missing token of `kind` among the direct children
fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind && !is_missing(t))
}

fn identifier_text(parent: &SyntaxNode) -> Option<String> {
    token_of_kind(parent, SyntaxKind::Identifier).map(|t| t.text().to_string())
}

/// Modifier keywords written directly on a declaration
fn modifier_tokens(parent: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| {
            t.kind().is_modifier() || matches!(t.kind(), SyntaxKind::PartialKw | SyntaxKind::AsyncKw)
        })
}

/// First child node that is not one of the listed structural kinds
fn first_child_except(parent: &SyntaxNode, skip: &[SyntaxKind]) -> Option<SyntaxNode> {
    parent.children().find(|n| !skip.contains(&n.kind()))
}

// ============================================================================
// Compilation unit
// ============================================================================

ast_node!(
    /// Root of a parsed file
    CompilationUnit
);

impl CompilationUnit {
    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> {
        children(&self.syntax)
    }

    /// Types declared at the top level, outside any namespace
    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> {
        self.syntax.children().filter_map(TypeDeclaration::cast)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = NamespaceDeclaration> {
        children(&self.syntax)
    }

    pub fn file_scoped_namespace(&self) -> Option<FileScopedNamespaceDeclaration> {
        child(&self.syntax)
    }

    pub fn global_statements(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::GlobalStatement)
    }
}

ast_node!(UsingDirective);

impl UsingDirective {
    pub fn is_global(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::GlobalKw).is_some()
    }

    pub fn is_static(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::StaticKw).is_some()
    }

    /// Alias name of `using A = B;`
    pub fn alias(&self) -> Option<String> {
        let name_equals = self
            .syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::NameEquals)?;
        Some(name_equals.first_child()?.text().to_string().trim().to_string())
    }

    /// Imported name without trivia
    pub fn name(&self) -> Option<String> {
        let name = first_child_except(&self.syntax, &[SyntaxKind::NameEquals])?;
        Some(name.text().to_string().trim().to_string())
    }
}

ast_node!(NamespaceDeclaration);

impl NamespaceDeclaration {
    pub fn name(&self) -> Option<String> {
        Some(self.syntax.first_child()?.text().to_string().trim().to_string())
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> {
        self.syntax.children().filter_map(TypeDeclaration::cast)
    }
}

ast_node!(FileScopedNamespaceDeclaration);

impl FileScopedNamespaceDeclaration {
    pub fn name(&self) -> Option<String> {
        Some(self.syntax.first_child()?.text().to_string().trim().to_string())
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> {
        self.syntax.children().filter_map(TypeDeclaration::cast)
    }
}

// ============================================================================
// Type declarations
// ============================================================================

ast_node!(ClassDeclaration);
ast_node!(StructDeclaration);
ast_node!(InterfaceDeclaration);
ast_node!(
    /// `record`, `record class` or `record struct`
    RecordDeclaration
);
ast_node!(EnumDeclaration);

/// Shared accessors of class-like declarations
macro_rules! type_declaration_accessors {
    ($($name:ident),*) => {$(
        impl $name {
            pub fn name(&self) -> Option<String> {
                identifier_text(&self.syntax)
            }

            pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> {
                modifier_tokens(&self.syntax)
            }

            pub fn type_parameter_list(&self) -> Option<TypeParameterList> {
                child(&self.syntax)
            }

            /// Primary constructor parameters
            pub fn parameter_list(&self) -> Option<ParameterList> {
                child(&self.syntax)
            }

            pub fn base_list(&self) -> Option<BaseList> {
                child(&self.syntax)
            }

            pub fn constraint_clauses(&self) -> impl Iterator<Item = TypeParameterConstraintClause> {
                children(&self.syntax)
            }

            pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> {
                self.syntax.children().filter_map(MemberDeclaration::cast)
            }
        }
    )*};
}

type_declaration_accessors!(
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    RecordDeclaration
);

impl RecordDeclaration {
    /// `record struct`
    pub fn is_struct(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::StructKw).is_some()
    }
}

impl EnumDeclaration {
    pub fn name(&self) -> Option<String> {
        identifier_text(&self.syntax)
    }

    pub fn member_names(&self) -> impl Iterator<Item = String> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::EnumMemberDeclaration)
            .filter_map(|n| identifier_text(&n))
    }
}

/// Any declaration that introduces a type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDeclaration {
    Class(ClassDeclaration),
    Struct(StructDeclaration),
    Interface(InterfaceDeclaration),
    Record(RecordDeclaration),
    Enum(EnumDeclaration),
}

impl TypeDeclaration {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::ClassDeclaration => ClassDeclaration::cast(node).map(Self::Class),
            SyntaxKind::StructDeclaration => StructDeclaration::cast(node).map(Self::Struct),
            SyntaxKind::InterfaceDeclaration => {
                InterfaceDeclaration::cast(node).map(Self::Interface)
            }
            SyntaxKind::RecordDeclaration => RecordDeclaration::cast(node).map(Self::Record),
            SyntaxKind::EnumDeclaration => EnumDeclaration::cast(node).map(Self::Enum),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Class(d) => d.syntax(),
            Self::Struct(d) => d.syntax(),
            Self::Interface(d) => d.syntax(),
            Self::Record(d) => d.syntax(),
            Self::Enum(d) => d.syntax(),
        }
    }

    pub fn name(&self) -> Option<String> {
        identifier_text(self.syntax())
    }
}

ast_node!(TypeParameterList);

impl TypeParameterList {
    pub fn names(&self) -> impl Iterator<Item = String> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::TypeParameter)
            .filter_map(|n| identifier_text(&n))
    }
}

ast_node!(
    /// `where T : class, new()`
    TypeParameterConstraintClause
);

impl TypeParameterConstraintClause {
    /// Constrained type parameter; `None` when it was synthesized
    pub fn type_parameter(&self) -> Option<String> {
        let name = self.syntax.first_child()?;
        identifier_text(&name)
    }

    pub fn constraints(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children().skip(1)
    }
}

ast_node!(BaseList);

impl BaseList {
    pub fn types(&self) -> impl Iterator<Item = BaseType> {
        self.syntax.children().filter_map(BaseType::cast)
    }
}

ast_node!(SimpleBaseType);
ast_node!(
    /// Base type with arguments forwarded from a primary constructor
    PrimaryConstructorBaseType
);

impl PrimaryConstructorBaseType {
    pub fn argument_list(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::ArgumentList)
    }
}

/// One entry of a base list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Simple(SimpleBaseType),
    PrimaryConstructor(PrimaryConstructorBaseType),
}

impl BaseType {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::SimpleBaseType => SimpleBaseType::cast(node).map(Self::Simple),
            SyntaxKind::PrimaryConstructorBaseType => {
                PrimaryConstructorBaseType::cast(node).map(Self::PrimaryConstructor)
            }
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Simple(t) => t.syntax(),
            Self::PrimaryConstructor(t) => t.syntax(),
        }
    }

    /// The base type's name without trivia
    pub fn type_text(&self) -> Option<String> {
        Some(self.syntax().first_child()?.text().to_string().trim().to_string())
    }
}

// ============================================================================
// Members
// ============================================================================

ast_node!(MethodDeclaration);
ast_node!(FieldDeclaration);
ast_node!(PropertyDeclaration);
ast_node!(ConstructorDeclaration);

impl MethodDeclaration {
    pub fn name(&self) -> Option<String> {
        identifier_text(&self.syntax)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> {
        modifier_tokens(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        child(&self.syntax)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| matches!(n.kind(), SyntaxKind::Block | SyntaxKind::ArrowExpressionClause))
    }
}

impl FieldDeclaration {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        child(&self.syntax)
    }
}

impl PropertyDeclaration {
    pub fn name(&self) -> Option<String> {
        identifier_text(&self.syntax)
    }

    pub fn accessors(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::AccessorList)
            .flat_map(|list| list.children())
    }
}

impl ConstructorDeclaration {
    pub fn name(&self) -> Option<String> {
        identifier_text(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        child(&self.syntax)
    }
}

/// Members the typed layer knows by name; everything else is `Other`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberDeclaration {
    Method(MethodDeclaration),
    Field(FieldDeclaration),
    Property(PropertyDeclaration),
    Constructor(ConstructorDeclaration),
    Type(TypeDeclaration),
    Other(SyntaxNode),
}

impl MemberDeclaration {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let member = match node.kind() {
            SyntaxKind::MethodDeclaration => Self::Method(MethodDeclaration::cast(node)?),
            SyntaxKind::FieldDeclaration => Self::Field(FieldDeclaration::cast(node)?),
            SyntaxKind::PropertyDeclaration => Self::Property(PropertyDeclaration::cast(node)?),
            SyntaxKind::ConstructorDeclaration => {
                Self::Constructor(ConstructorDeclaration::cast(node)?)
            }
            SyntaxKind::EventFieldDeclaration
            | SyntaxKind::EventDeclaration
            | SyntaxKind::IndexerDeclaration
            | SyntaxKind::OperatorDeclaration
            | SyntaxKind::ConversionOperatorDeclaration
            | SyntaxKind::DestructorDeclaration
            | SyntaxKind::DelegateDeclaration
            | SyntaxKind::IncompleteMember => Self::Other(node),
            _ => Self::Type(TypeDeclaration::cast(node)?),
        };
        Some(member)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Method(m) => m.syntax(),
            Self::Field(m) => m.syntax(),
            Self::Property(m) => m.syntax(),
            Self::Constructor(m) => m.syntax(),
            Self::Type(m) => m.syntax(),
            Self::Other(node) => node,
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

ast_node!(ParameterList);

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        children(&self.syntax)
    }
}

ast_node!(Parameter);

impl Parameter {
    pub fn name(&self) -> Option<String> {
        identifier_text(&self.syntax)
    }

    /// Declared type, absent for untyped lambda parameters
    pub fn ty(&self) -> Option<SyntaxNode> {
        first_child_except(
            &self.syntax,
            &[SyntaxKind::AttributeList, SyntaxKind::EqualsValueClause],
        )
    }

    pub fn default_value(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::EqualsValueClause)?
            .first_child()
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(LocalDeclarationStatement);

impl LocalDeclarationStatement {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        child(&self.syntax)
    }
}

ast_node!(VariableDeclaration);

impl VariableDeclaration {
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> {
        children(&self.syntax)
    }
}

ast_node!(VariableDeclarator);

impl VariableDeclarator {
    pub fn name(&self) -> Option<String> {
        identifier_text(&self.syntax)
    }

    pub fn initializer(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::EqualsValueClause)?
            .first_child()
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(
    /// `expr with { ... }`
    WithExpression
);

impl WithExpression {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }

    /// Assignments inside the braces
    pub fn initializers(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::WithInitializerExpression)
            .flat_map(|n| n.children())
    }
}

ast_node!(BinaryExpression);

impl BinaryExpression {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        self.syntax.children().nth(1)
    }

    /// Operator token; fused `>>` comes back as one token
    pub fn operator(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

ast_node!(InvocationExpression);

impl InvocationExpression {
    pub fn callee(&self) -> Option<SyntaxNode> {
        self.syntax.first_child()
    }

    pub fn arguments(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::ArgumentList)
            .flat_map(|list| list.children())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LanguageVersion, ParseEntry, ParseOptions};
    use crate::parser::parse;

    fn unit(text: &str) -> CompilationUnit {
        CompilationUnit::cast(parse(text, ParseOptions::default()).syntax()).unwrap()
    }

    #[test]
    fn test_class_shape() {
        let unit = unit(
            "using System;\npublic sealed class Box<T> : Base<T>, IDisposable where T : new() {\n    private int _count = 1;\n    public void Add(T item, int times = 2) { }\n}\n",
        );
        assert_eq!(unit.usings().next().unwrap().name().as_deref(), Some("System"));
        let TypeDeclaration::Class(class) = unit.type_declarations().next().unwrap() else {
            panic!("expected class");
        };
        assert_eq!(class.name().as_deref(), Some("Box"));
        let modifiers: Vec<_> = class.modifiers().map(|t| t.text().to_string()).collect();
        assert_eq!(modifiers, vec!["public", "sealed"]);
        assert_eq!(
            class.type_parameter_list().unwrap().names().collect::<Vec<_>>(),
            vec!["T"]
        );
        let bases: Vec<_> = class
            .base_list()
            .unwrap()
            .types()
            .filter_map(|t| t.type_text())
            .collect();
        assert_eq!(bases, vec!["Base<T>", "IDisposable"]);
        let clause = class.constraint_clauses().next().unwrap();
        assert_eq!(clause.type_parameter().as_deref(), Some("T"));

        let members: Vec<_> = class.members().collect();
        assert_eq!(members.len(), 2);
        let MemberDeclaration::Field(field) = &members[0] else {
            panic!("expected field");
        };
        let declarator = field.declaration().unwrap().declarators().next().unwrap();
        assert_eq!(declarator.name().as_deref(), Some("_count"));
        assert_eq!(declarator.initializer().unwrap().text().to_string(), "1");
        let MemberDeclaration::Method(method) = &members[1] else {
            panic!("expected method");
        };
        let parameters: Vec<_> = method.parameter_list().unwrap().parameters().collect();
        assert_eq!(parameters[1].name().as_deref(), Some("times"));
        assert_eq!(parameters[1].default_value().unwrap().text().to_string(), "2");
    }

    #[test]
    fn test_record_with_primary_base() {
        let unit = unit("record B(int X) : A(X);");
        let TypeDeclaration::Record(record) = unit.type_declarations().next().unwrap() else {
            panic!("expected record");
        };
        assert!(!record.is_struct());
        let base = record.base_list().unwrap().types().next().unwrap();
        let BaseType::PrimaryConstructor(base) = base else {
            panic!("expected primary constructor base");
        };
        assert_eq!(base.argument_list().unwrap().text().to_string(), "(X)");
    }

    #[test]
    fn test_missing_constraint_subject() {
        let unit = unit("class a<b> where b : c where { }");
        let TypeDeclaration::Class(class) = unit.type_declarations().next().unwrap() else {
            panic!("expected class");
        };
        let subjects: Vec<_> = class
            .constraint_clauses()
            .map(|c| c.type_parameter())
            .collect();
        assert_eq!(subjects, vec![Some("b".to_string()), None]);
    }

    #[test]
    fn test_expressions() {
        let options = ParseOptions::new(LanguageVersion::LATEST).with_entry(ParseEntry::Expression);
        let root = parse("f(1, 2) with { X = 3 }", options).syntax();
        let with = WithExpression::cast(root.first_child().unwrap()).unwrap();
        let call = InvocationExpression::cast(with.expression().unwrap()).unwrap();
        assert_eq!(call.arguments().count(), 2);
        assert_eq!(with.initializers().count(), 1);

        let root = parse("a >> b", options).syntax();
        let shift = BinaryExpression::cast(root.first_child().unwrap()).unwrap();
        assert_eq!(shift.operator().unwrap().text(), ">>");
        assert_eq!(shift.rhs().unwrap().text().to_string(), "b");
    }
}
