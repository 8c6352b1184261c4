//! Syntax kinds for C#
//!
//! A single closed enum covers trivia, tokens, keywords and nodes. The
//! discriminants are dense and start at zero, which lets
//! [`CSharpLanguage`](super::CSharpLanguage) convert raw Rowan kinds back
//! without a lookup table.

macro_rules! syntax_kinds {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        /// Every token and node kind in the C# syntax tree
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($(#[$meta])* $name),*
        }

        impl SyntaxKind {
            /// All kinds in discriminant order
            pub(crate) const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$name),*];
        }
    };
}

syntax_kinds! {
    // Trivia
    Whitespace,
    EndOfLine,
    SingleLineComment,
    MultiLineComment,
    SingleLineDocComment,
    MultiLineDocComment,
    PreprocessorDirective,

    // Special tokens
    EndOfFile,
    BadToken,

    // Punctuation
    Tilde,
    Exclamation,
    Percent,
    Caret,
    Ampersand,
    Asterisk,
    OpenParen,
    CloseParen,
    Minus,
    Plus,
    Equals,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Bar,
    Colon,
    Semicolon,
    LessThan,
    Comma,
    GreaterThan,
    Dot,
    Question,
    Slash,

    // Compound punctuation
    DotDot,
    BarBar,
    AmpersandAmpersand,
    MinusMinus,
    PlusPlus,
    ColonColon,
    QuestionQuestion,
    MinusGreaterThan,
    ExclamationEquals,
    EqualsEquals,
    EqualsGreaterThan,
    LessThanEquals,
    LessThanLessThan,
    LessThanLessThanEquals,
    GreaterThanEquals,
    /// Fused by the parser from two adjacent `>` tokens
    GreaterThanGreaterThan,
    /// Fused by the parser from `>` followed by `>=`
    GreaterThanGreaterThanEquals,
    SlashEquals,
    AsteriskEquals,
    BarEquals,
    AmpersandEquals,
    PlusEquals,
    MinusEquals,
    CaretEquals,
    PercentEquals,
    QuestionQuestionEquals,

    // Literals and names
    Identifier,
    NumericLiteral,
    CharacterLiteral,
    StringLiteral,
    InterpolatedStringStart,
    InterpolatedVerbatimStringStart,
    InterpolatedStringTextToken,
    InterpolatedStringEnd,

    // Reserved keywords
    AbstractKw,
    AsKw,
    BaseKw,
    BoolKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    CheckedKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DecimalKw,
    DefaultKw,
    DelegateKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    EventKw,
    ExplicitKw,
    ExternKw,
    FalseKw,
    FinallyKw,
    FixedKw,
    FloatKw,
    ForKw,
    ForeachKw,
    GotoKw,
    IfKw,
    ImplicitKw,
    InKw,
    IntKw,
    InterfaceKw,
    InternalKw,
    IsKw,
    LockKw,
    LongKw,
    NamespaceKw,
    NewKw,
    NullKw,
    ObjectKw,
    OperatorKw,
    OutKw,
    OverrideKw,
    ParamsKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReadonlyKw,
    RefKw,
    ReturnKw,
    SbyteKw,
    SealedKw,
    ShortKw,
    SizeofKw,
    StackallocKw,
    StaticKw,
    StringKw,
    StructKw,
    SwitchKw,
    ThisKw,
    ThrowKw,
    TrueKw,
    TryKw,
    TypeofKw,
    UintKw,
    UlongKw,
    UncheckedKw,
    UnsafeKw,
    UshortKw,
    UsingKw,
    VirtualKw,
    VoidKw,
    VolatileKw,
    WhileKw,
    ArglistKw,

    // Contextual keywords (lexed as identifiers, remapped by the parser)
    AddKw,
    AliasKw,
    AndKw,
    AscendingKw,
    AsyncKw,
    AwaitKw,
    ByKw,
    DescendingKw,
    EqualsKw,
    FromKw,
    GetKw,
    GlobalKw,
    GroupKw,
    InitKw,
    IntoKw,
    JoinKw,
    LetKw,
    NotKw,
    OnKw,
    OrKw,
    OrderbyKw,
    PartialKw,
    RecordKw,
    RemoveKw,
    SelectKw,
    SetKw,
    WhenKw,
    WhereKw,
    WithKw,
    YieldKw,

    // Roots
    CompilationUnit,
    ExpressionRoot,
    StatementRoot,
    TypeRoot,

    // Recovery
    SkippedTokens,
    IncompleteMember,

    // Directives and attributes
    ExternAliasDirective,
    UsingDirective,
    NameEquals,
    AttributeList,
    AttributeTargetSpecifier,
    Attribute,
    AttributeArgumentList,
    AttributeArgument,
    NameColon,

    // Namespaces and type declarations
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    RecordDeclaration,
    EnumDeclaration,
    DelegateDeclaration,
    EnumMemberDeclaration,
    EqualsValueClause,
    TypeParameterList,
    TypeParameter,
    BaseList,
    SimpleBaseType,
    PrimaryConstructorBaseType,
    TypeParameterConstraintClause,
    ClassOrStructConstraint,
    ConstructorConstraint,
    DefaultConstraint,
    TypeConstraint,

    // Members
    FieldDeclaration,
    EventFieldDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    MethodDeclaration,
    ConstructorDeclaration,
    ConstructorInitializer,
    DestructorDeclaration,
    PropertyDeclaration,
    IndexerDeclaration,
    EventDeclaration,
    OperatorDeclaration,
    ConversionOperatorDeclaration,
    AccessorList,
    AccessorDeclaration,
    ArrowExpressionClause,
    ExplicitInterfaceSpecifier,
    ParameterList,
    BracketedParameterList,
    Parameter,

    // Statements
    Block,
    EmptyStatement,
    ExpressionStatement,
    LocalDeclarationStatement,
    LocalFunctionStatement,
    LabeledStatement,
    IfStatement,
    ElseClause,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForEachStatement,
    ForEachVariableStatement,
    SwitchStatement,
    SwitchSection,
    CaseSwitchLabel,
    CasePatternSwitchLabel,
    DefaultSwitchLabel,
    WhenClause,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    GotoStatement,
    GotoCaseStatement,
    GotoDefaultStatement,
    TryStatement,
    CatchClause,
    CatchDeclaration,
    CatchFilterClause,
    FinallyClause,
    CheckedStatement,
    UncheckedStatement,
    LockStatement,
    UsingStatement,
    YieldReturnStatement,
    YieldBreakStatement,
    FixedStatement,
    UnsafeStatement,
    GlobalStatement,

    // Names and types
    IdentifierName,
    GenericName,
    TypeArgumentList,
    QualifiedName,
    AliasQualifiedName,
    PredefinedType,
    ArrayType,
    ArrayRankSpecifier,
    OmittedArraySizeExpression,
    OmittedTypeArgument,
    NullableType,
    PointerType,
    TupleType,
    TupleElement,
    RefType,

    // Expressions
    LiteralExpression,
    InterpolatedStringExpression,
    InterpolatedStringText,
    Interpolation,
    InterpolationAlignmentClause,
    InterpolationFormatClause,
    ThisExpression,
    BaseExpression,
    ParenthesizedExpression,
    TupleExpression,
    Argument,
    ArgumentList,
    BracketedArgumentList,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    BinaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    CastExpression,
    IsPatternExpression,
    RangeExpression,
    AwaitExpression,
    ThrowExpression,
    RefExpression,
    DeclarationExpression,
    SingleVariableDesignation,
    DiscardDesignation,
    ParenthesizedVariableDesignation,
    MemberAccessExpression,
    ConditionalAccessExpression,
    MemberBindingExpression,
    ElementBindingExpression,
    InvocationExpression,
    ElementAccessExpression,
    TypeOfExpression,
    SizeOfExpression,
    DefaultExpression,
    CheckedExpression,
    UncheckedExpression,
    ObjectCreationExpression,
    ImplicitObjectCreationExpression,
    ArrayCreationExpression,
    ImplicitArrayCreationExpression,
    StackAllocArrayCreationExpression,
    ImplicitStackAllocArrayCreationExpression,
    AnonymousObjectCreationExpression,
    AnonymousObjectMemberDeclarator,
    ObjectInitializerExpression,
    CollectionInitializerExpression,
    ArrayInitializerExpression,
    ComplexElementInitializerExpression,
    WithInitializerExpression,
    AnonymousMethodExpression,
    SimpleLambdaExpression,
    ParenthesizedLambdaExpression,
    SwitchExpression,
    SwitchExpressionArm,
    WithExpression,

    // Query expressions
    QueryExpression,
    FromClause,
    QueryBody,
    LetClause,
    WhereClause,
    JoinClause,
    JoinIntoClause,
    OrderByClause,
    Ordering,
    SelectClause,
    GroupClause,
    QueryContinuation,

    // Patterns
    ConstantPattern,
    DeclarationPattern,
    VarPattern,
    DiscardPattern,
    TypePattern,
    RecursivePattern,
    PositionalPatternClause,
    PropertyPatternClause,
    Subpattern,
    ParenthesizedPattern,
    RelationalPattern,
    UnaryPattern,
    BinaryPattern,
}

impl SyntaxKind {
    /// Whitespace, newlines, comments and preprocessor lines
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::EndOfLine
                | SyntaxKind::SingleLineComment
                | SyntaxKind::MultiLineComment
                | SyntaxKind::SingleLineDocComment
                | SyntaxKind::MultiLineDocComment
                | SyntaxKind::PreprocessorDirective
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::SingleLineComment
                | SyntaxKind::MultiLineComment
                | SyntaxKind::SingleLineDocComment
                | SyntaxKind::MultiLineDocComment
        )
    }

    /// Reserved keywords
    pub fn is_keyword(self) -> bool {
        (SyntaxKind::AbstractKw..=SyntaxKind::ArglistKw).contains(&self)
    }

    pub fn is_contextual_keyword(self) -> bool {
        (SyntaxKind::AddKw..=SyntaxKind::YieldKw).contains(&self)
    }

    pub fn is_punct(self) -> bool {
        (SyntaxKind::Tilde..=SyntaxKind::QuestionQuestionEquals).contains(&self)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral | SyntaxKind::CharacterLiteral | SyntaxKind::StringLiteral
        )
    }

    /// Token kinds (as opposed to node kinds)
    pub fn is_token(self) -> bool {
        self <= SyntaxKind::YieldKw
    }

    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Built-in type keywords (`int`, `string`, ...)
    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::BoolKw
                | SyntaxKind::ByteKw
                | SyntaxKind::SbyteKw
                | SyntaxKind::ShortKw
                | SyntaxKind::UshortKw
                | SyntaxKind::IntKw
                | SyntaxKind::UintKw
                | SyntaxKind::LongKw
                | SyntaxKind::UlongKw
                | SyntaxKind::CharKw
                | SyntaxKind::FloatKw
                | SyntaxKind::DoubleKw
                | SyntaxKind::DecimalKw
                | SyntaxKind::StringKw
                | SyntaxKind::ObjectKw
                | SyntaxKind::VoidKw
        )
    }

    /// Keywords that may appear in a modifier list
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKw
                | SyntaxKind::PrivateKw
                | SyntaxKind::ProtectedKw
                | SyntaxKind::InternalKw
                | SyntaxKind::StaticKw
                | SyntaxKind::AbstractKw
                | SyntaxKind::SealedKw
                | SyntaxKind::VirtualKw
                | SyntaxKind::OverrideKw
                | SyntaxKind::ReadonlyKw
                | SyntaxKind::VolatileKw
                | SyntaxKind::ExternKw
                | SyntaxKind::UnsafeKw
                | SyntaxKind::NewKw
                | SyntaxKind::ConstKw
                | SyntaxKind::FixedKw
                | SyntaxKind::RefKw
        )
    }

    /// Assignment operators, including compound ones
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Equals
                | SyntaxKind::PlusEquals
                | SyntaxKind::MinusEquals
                | SyntaxKind::AsteriskEquals
                | SyntaxKind::SlashEquals
                | SyntaxKind::PercentEquals
                | SyntaxKind::AmpersandEquals
                | SyntaxKind::BarEquals
                | SyntaxKind::CaretEquals
                | SyntaxKind::LessThanLessThanEquals
                | SyntaxKind::GreaterThanGreaterThanEquals
                | SyntaxKind::QuestionQuestionEquals
        )
    }

    /// Fixed source text for punctuation and keywords
    pub fn text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let text = match self {
            Tilde => "~",
            Exclamation => "!",
            Percent => "%",
            Caret => "^",
            Ampersand => "&",
            Asterisk => "*",
            OpenParen => "(",
            CloseParen => ")",
            Minus => "-",
            Plus => "+",
            Equals => "=",
            OpenBrace => "{",
            CloseBrace => "}",
            OpenBracket => "[",
            CloseBracket => "]",
            Bar => "|",
            Colon => ":",
            Semicolon => ";",
            LessThan => "<",
            Comma => ",",
            GreaterThan => ">",
            Dot => ".",
            Question => "?",
            Slash => "/",
            DotDot => "..",
            BarBar => "||",
            AmpersandAmpersand => "&&",
            MinusMinus => "--",
            PlusPlus => "++",
            ColonColon => "::",
            QuestionQuestion => "??",
            MinusGreaterThan => "->",
            ExclamationEquals => "!=",
            EqualsEquals => "==",
            EqualsGreaterThan => "=>",
            LessThanEquals => "<=",
            LessThanLessThan => "<<",
            LessThanLessThanEquals => "<<=",
            GreaterThanEquals => ">=",
            GreaterThanGreaterThan => ">>",
            GreaterThanGreaterThanEquals => ">>=",
            SlashEquals => "/=",
            AsteriskEquals => "*=",
            BarEquals => "|=",
            AmpersandEquals => "&=",
            PlusEquals => "+=",
            MinusEquals => "-=",
            CaretEquals => "^=",
            PercentEquals => "%=",
            QuestionQuestionEquals => "??=",
            InterpolatedStringEnd => "\"",
            kind if kind.is_keyword() || kind.is_contextual_keyword() => {
                return KEYWORDS
                    .iter()
                    .chain(CONTEXTUAL_KEYWORDS.iter())
                    .find(|(_, k)| *k == kind)
                    .map(|(text, _)| *text);
            }
            _ => return None,
        };
        Some(text)
    }

    /// Human-readable description used in diagnostics
    pub fn display_name(self) -> String {
        match self {
            SyntaxKind::Identifier => "identifier".to_string(),
            SyntaxKind::EndOfFile => "end of file".to_string(),
            SyntaxKind::NumericLiteral => "numeric literal".to_string(),
            SyntaxKind::StringLiteral => "string literal".to_string(),
            SyntaxKind::CharacterLiteral => "character literal".to_string(),
            kind => match kind.text() {
                Some(text) => text.to_string(),
                None => format!("{kind:?}"),
            },
        }
    }

    /// Reserved keyword for `text`, if any
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == text)
            .map(|(_, kind)| *kind)
    }

    /// Contextual keyword for `text`, if any
    pub fn from_contextual_keyword(text: &str) -> Option<SyntaxKind> {
        CONTEXTUAL_KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == text)
            .map(|(_, kind)| *kind)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("abstract", SyntaxKind::AbstractKw),
    ("as", SyntaxKind::AsKw),
    ("base", SyntaxKind::BaseKw),
    ("bool", SyntaxKind::BoolKw),
    ("break", SyntaxKind::BreakKw),
    ("byte", SyntaxKind::ByteKw),
    ("case", SyntaxKind::CaseKw),
    ("catch", SyntaxKind::CatchKw),
    ("char", SyntaxKind::CharKw),
    ("checked", SyntaxKind::CheckedKw),
    ("class", SyntaxKind::ClassKw),
    ("const", SyntaxKind::ConstKw),
    ("continue", SyntaxKind::ContinueKw),
    ("decimal", SyntaxKind::DecimalKw),
    ("default", SyntaxKind::DefaultKw),
    ("delegate", SyntaxKind::DelegateKw),
    ("do", SyntaxKind::DoKw),
    ("double", SyntaxKind::DoubleKw),
    ("else", SyntaxKind::ElseKw),
    ("enum", SyntaxKind::EnumKw),
    ("event", SyntaxKind::EventKw),
    ("explicit", SyntaxKind::ExplicitKw),
    ("extern", SyntaxKind::ExternKw),
    ("false", SyntaxKind::FalseKw),
    ("finally", SyntaxKind::FinallyKw),
    ("fixed", SyntaxKind::FixedKw),
    ("float", SyntaxKind::FloatKw),
    ("for", SyntaxKind::ForKw),
    ("foreach", SyntaxKind::ForeachKw),
    ("goto", SyntaxKind::GotoKw),
    ("if", SyntaxKind::IfKw),
    ("implicit", SyntaxKind::ImplicitKw),
    ("in", SyntaxKind::InKw),
    ("int", SyntaxKind::IntKw),
    ("interface", SyntaxKind::InterfaceKw),
    ("internal", SyntaxKind::InternalKw),
    ("is", SyntaxKind::IsKw),
    ("lock", SyntaxKind::LockKw),
    ("long", SyntaxKind::LongKw),
    ("namespace", SyntaxKind::NamespaceKw),
    ("new", SyntaxKind::NewKw),
    ("null", SyntaxKind::NullKw),
    ("object", SyntaxKind::ObjectKw),
    ("operator", SyntaxKind::OperatorKw),
    ("out", SyntaxKind::OutKw),
    ("override", SyntaxKind::OverrideKw),
    ("params", SyntaxKind::ParamsKw),
    ("private", SyntaxKind::PrivateKw),
    ("protected", SyntaxKind::ProtectedKw),
    ("public", SyntaxKind::PublicKw),
    ("readonly", SyntaxKind::ReadonlyKw),
    ("ref", SyntaxKind::RefKw),
    ("return", SyntaxKind::ReturnKw),
    ("sbyte", SyntaxKind::SbyteKw),
    ("sealed", SyntaxKind::SealedKw),
    ("short", SyntaxKind::ShortKw),
    ("sizeof", SyntaxKind::SizeofKw),
    ("stackalloc", SyntaxKind::StackallocKw),
    ("static", SyntaxKind::StaticKw),
    ("string", SyntaxKind::StringKw),
    ("struct", SyntaxKind::StructKw),
    ("switch", SyntaxKind::SwitchKw),
    ("this", SyntaxKind::ThisKw),
    ("throw", SyntaxKind::ThrowKw),
    ("true", SyntaxKind::TrueKw),
    ("try", SyntaxKind::TryKw),
    ("typeof", SyntaxKind::TypeofKw),
    ("uint", SyntaxKind::UintKw),
    ("ulong", SyntaxKind::UlongKw),
    ("unchecked", SyntaxKind::UncheckedKw),
    ("unsafe", SyntaxKind::UnsafeKw),
    ("ushort", SyntaxKind::UshortKw),
    ("using", SyntaxKind::UsingKw),
    ("virtual", SyntaxKind::VirtualKw),
    ("void", SyntaxKind::VoidKw),
    ("volatile", SyntaxKind::VolatileKw),
    ("while", SyntaxKind::WhileKw),
    ("__arglist", SyntaxKind::ArglistKw),
];

const CONTEXTUAL_KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("add", SyntaxKind::AddKw),
    ("alias", SyntaxKind::AliasKw),
    ("and", SyntaxKind::AndKw),
    ("ascending", SyntaxKind::AscendingKw),
    ("async", SyntaxKind::AsyncKw),
    ("await", SyntaxKind::AwaitKw),
    ("by", SyntaxKind::ByKw),
    ("descending", SyntaxKind::DescendingKw),
    ("equals", SyntaxKind::EqualsKw),
    ("from", SyntaxKind::FromKw),
    ("get", SyntaxKind::GetKw),
    ("global", SyntaxKind::GlobalKw),
    ("group", SyntaxKind::GroupKw),
    ("init", SyntaxKind::InitKw),
    ("into", SyntaxKind::IntoKw),
    ("join", SyntaxKind::JoinKw),
    ("let", SyntaxKind::LetKw),
    ("not", SyntaxKind::NotKw),
    ("on", SyntaxKind::OnKw),
    ("or", SyntaxKind::OrKw),
    ("orderby", SyntaxKind::OrderbyKw),
    ("partial", SyntaxKind::PartialKw),
    ("record", SyntaxKind::RecordKw),
    ("remove", SyntaxKind::RemoveKw),
    ("select", SyntaxKind::SelectKw),
    ("set", SyntaxKind::SetKw),
    ("when", SyntaxKind::WhenKw),
    ("where", SyntaxKind::WhereKw),
    ("with", SyntaxKind::WithKw),
    ("yield", SyntaxKind::YieldKw),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(SyntaxKind::from_keyword("class"), Some(SyntaxKind::ClassKw));
        assert_eq!(SyntaxKind::from_keyword("record"), None);
        assert_eq!(
            SyntaxKind::from_contextual_keyword("record"),
            Some(SyntaxKind::RecordKw)
        );
    }

    #[test]
    fn test_kind_classes() {
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::WhileKw.is_keyword());
        assert!(!SyntaxKind::WithKw.is_keyword());
        assert!(SyntaxKind::WithKw.is_contextual_keyword());
        assert!(SyntaxKind::QuestionQuestionEquals.is_punct());
        assert!(SyntaxKind::YieldKw.is_token());
        assert!(SyntaxKind::CompilationUnit.is_node());
    }

    #[test]
    fn test_fixed_text() {
        assert_eq!(SyntaxKind::GreaterThanGreaterThanEquals.text(), Some(">>="));
        assert_eq!(SyntaxKind::RecordKw.text(), Some("record"));
        assert_eq!(SyntaxKind::Identifier.text(), None);
        assert_eq!(SyntaxKind::CloseBrace.display_name(), "}");
    }

    #[test]
    fn test_all_is_dense() {
        for (index, kind) in SyntaxKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
    }
}
