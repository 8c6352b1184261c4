//! Language features gated by [`LanguageVersion`]
//!
//! Gated constructs always parse; when the configured version is older than
//! the feature's, the parser attaches a `FeatureNotAvailable` diagnostic to
//! the construct's first token.

use crate::config::LanguageVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    // C# 2
    Generics,
    NullableTypes,
    AnonymousMethods,
    PartialTypes,
    ExternAlias,
    GlobalNamespace,
    YieldIterators,
    // C# 3
    LambdaExpressions,
    QueryExpressions,
    ObjectInitializers,
    CollectionInitializers,
    AnonymousTypes,
    ImplicitlyTypedArrays,
    ExtensionMethods,
    // C# 4
    NamedArguments,
    GenericVariance,
    // C# 5
    AsyncAwait,
    // C# 6
    ExpressionBodiedMembers,
    NullPropagatingOperator,
    InterpolatedStrings,
    ExceptionFilters,
    UsingStatic,
    DictionaryInitializers,
    AutoPropertyInitializers,
    // C# 7
    Tuples,
    PatternMatching,
    OutVariables,
    LocalFunctions,
    BinaryLiterals,
    DigitSeparators,
    RefLocalsAndReturns,
    ThrowExpressions,
    // C# 7.1
    DefaultLiteral,
    // C# 7.2
    PrivateProtected,
    ReadonlyReferences,
    // C# 8
    RecursivePatterns,
    SwitchExpressions,
    Ranges,
    CoalesceAssignment,
    UsingDeclarations,
    StaticLocalFunctions,
    AsyncStreams,
    // C# 9
    Records,
    InitOnlySetters,
    TopLevelStatements,
    TargetTypedNew,
    RelationalPatterns,
    PatternCombinators,
    TypePatterns,
    LambdaDiscardParameters,
    StaticAnonymousFunctions,
    LocalFunctionAttributes,
    // C# 10
    RecordStructs,
    FileScopedNamespaces,
    GlobalUsings,
    ExtendedPropertyPatterns,
    // Preview
    PrimaryConstructors,
}

impl Feature {
    /// Name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Feature::Generics => "generics",
            Feature::NullableTypes => "nullable types",
            Feature::AnonymousMethods => "anonymous methods",
            Feature::PartialTypes => "partial types",
            Feature::ExternAlias => "extern alias",
            Feature::GlobalNamespace => "namespace alias qualifier",
            Feature::YieldIterators => "iterators",
            Feature::LambdaExpressions => "lambda expression",
            Feature::QueryExpressions => "query expression",
            Feature::ObjectInitializers => "object initializer",
            Feature::CollectionInitializers => "collection initializer",
            Feature::AnonymousTypes => "anonymous types",
            Feature::ImplicitlyTypedArrays => "implicitly typed array",
            Feature::ExtensionMethods => "extension method",
            Feature::NamedArguments => "named argument",
            Feature::GenericVariance => "generic variance",
            Feature::AsyncAwait => "async function",
            Feature::ExpressionBodiedMembers => "expression-bodied member",
            Feature::NullPropagatingOperator => "null propagating operator",
            Feature::InterpolatedStrings => "interpolated strings",
            Feature::ExceptionFilters => "exception filter",
            Feature::UsingStatic => "using static",
            Feature::DictionaryInitializers => "dictionary initializer",
            Feature::AutoPropertyInitializers => "auto property initializer",
            Feature::Tuples => "tuples",
            Feature::PatternMatching => "pattern matching",
            Feature::OutVariables => "out variable declaration",
            Feature::LocalFunctions => "local functions",
            Feature::BinaryLiterals => "binary literals",
            Feature::DigitSeparators => "digit separators",
            Feature::RefLocalsAndReturns => "byref locals and returns",
            Feature::ThrowExpressions => "throw expression",
            Feature::DefaultLiteral => "default literal",
            Feature::PrivateProtected => "private protected",
            Feature::ReadonlyReferences => "readonly references",
            Feature::RecursivePatterns => "recursive patterns",
            Feature::SwitchExpressions => "switch expression",
            Feature::Ranges => "index operator and range operator",
            Feature::CoalesceAssignment => "coalescing assignment",
            Feature::UsingDeclarations => "using declarations",
            Feature::StaticLocalFunctions => "static local functions",
            Feature::AsyncStreams => "async streams",
            Feature::Records => "records",
            Feature::InitOnlySetters => "init-only setters",
            Feature::TopLevelStatements => "top-level statements",
            Feature::TargetTypedNew => "target-typed object creation",
            Feature::RelationalPatterns => "relational pattern",
            Feature::PatternCombinators => "pattern combinators",
            Feature::TypePatterns => "type pattern",
            Feature::LambdaDiscardParameters => "lambda discard parameters",
            Feature::StaticAnonymousFunctions => "static anonymous function",
            Feature::LocalFunctionAttributes => "local function attributes",
            Feature::RecordStructs => "record structs",
            Feature::FileScopedNamespaces => "file-scoped namespace",
            Feature::GlobalUsings => "global using directive",
            Feature::ExtendedPropertyPatterns => "extended property patterns",
            Feature::PrimaryConstructors => "primary constructors",
        }
    }

    /// First version in which the feature is available
    pub fn required_version(self) -> LanguageVersion {
        use LanguageVersion::*;
        match self {
            Feature::Generics
            | Feature::NullableTypes
            | Feature::AnonymousMethods
            | Feature::PartialTypes
            | Feature::ExternAlias
            | Feature::GlobalNamespace
            | Feature::YieldIterators => CSharp2,
            Feature::LambdaExpressions
            | Feature::QueryExpressions
            | Feature::ObjectInitializers
            | Feature::CollectionInitializers
            | Feature::AnonymousTypes
            | Feature::ImplicitlyTypedArrays
            | Feature::ExtensionMethods => CSharp3,
            Feature::NamedArguments | Feature::GenericVariance => CSharp4,
            Feature::AsyncAwait => CSharp5,
            Feature::ExpressionBodiedMembers
            | Feature::NullPropagatingOperator
            | Feature::InterpolatedStrings
            | Feature::ExceptionFilters
            | Feature::UsingStatic
            | Feature::DictionaryInitializers
            | Feature::AutoPropertyInitializers => CSharp6,
            Feature::Tuples
            | Feature::PatternMatching
            | Feature::OutVariables
            | Feature::LocalFunctions
            | Feature::BinaryLiterals
            | Feature::DigitSeparators
            | Feature::RefLocalsAndReturns
            | Feature::ThrowExpressions => CSharp7,
            Feature::DefaultLiteral => CSharp7_1,
            Feature::PrivateProtected | Feature::ReadonlyReferences => CSharp7_2,
            Feature::RecursivePatterns
            | Feature::SwitchExpressions
            | Feature::Ranges
            | Feature::CoalesceAssignment
            | Feature::UsingDeclarations
            | Feature::StaticLocalFunctions
            | Feature::AsyncStreams => CSharp8,
            Feature::Records
            | Feature::InitOnlySetters
            | Feature::TopLevelStatements
            | Feature::TargetTypedNew
            | Feature::RelationalPatterns
            | Feature::PatternCombinators
            | Feature::TypePatterns
            | Feature::LambdaDiscardParameters
            | Feature::StaticAnonymousFunctions
            | Feature::LocalFunctionAttributes => CSharp9,
            Feature::RecordStructs
            | Feature::FileScopedNamespaces
            | Feature::GlobalUsings
            | Feature::ExtendedPropertyPatterns => CSharp10,
            Feature::PrimaryConstructors => Preview,
        }
    }

    pub fn is_available(self, version: LanguageVersion) -> bool {
        version >= self.required_version()
    }
}
