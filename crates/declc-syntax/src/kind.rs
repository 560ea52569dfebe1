//! Token and node kinds for the declaration dialect.

/// Every token and syntax node kind.
///
/// Token kinds come first, then node kinds. The scanner only ever produces
/// kinds up to and including the keyword block; everything after
/// [`SyntaxKind::QualifiedName`] is created by the parser.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Unknown = 0,
    EndOfFileToken,

    // --- Trivia (surfaced only when trivia skipping is off) ---
    WhitespaceTrivia,
    NewLineTrivia,
    SingleLineCommentTrivia,
    MultiLineCommentTrivia,

    // --- Literals and names ---
    NumericLiteral,
    StringLiteral,
    Identifier,

    // --- Punctuation ---
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    LessThanToken,
    GreaterThanToken,
    EqualsToken,
    EqualsGreaterThanToken,
    ColonToken,
    QuestionToken,
    AtToken,
    BarToken,
    AmpersandToken,
    MinusToken,
    AsteriskToken,

    // --- Keywords ---
    AbstractKeyword,
    AnyKeyword,
    AsKeyword,
    BigIntKeyword,
    BooleanKeyword,
    ClassKeyword,
    ConstKeyword,
    DeclareKeyword,
    DefaultKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FromKeyword,
    FunctionKeyword,
    GetKeyword,
    ImplementsKeyword,
    ImportKeyword,
    InKeyword,
    InferKeyword,
    InterfaceKeyword,
    KeyOfKeyword,
    LetKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    NeverKeyword,
    NewKeyword,
    NullKeyword,
    NumberKeyword,
    ObjectKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReadonlyKeyword,
    SetKeyword,
    StaticKeyword,
    StringKeyword,
    SymbolKeyword,
    TrueKeyword,
    TypeKeyword,
    TypeOfKeyword,
    UndefinedKeyword,
    UnknownKeyword,
    VarKeyword,
    VoidKeyword,

    // --- Names ---
    QualifiedName,
    ComputedPropertyName,

    // --- Signature elements ---
    Decorator,
    Parameter,
    TypeParameter,

    // --- Members ---
    PropertySignature,
    MethodSignature,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    Constructor,
    GetAccessor,
    SetAccessor,

    // --- Types ---
    TypeReference,
    FunctionType,
    ConstructorType,
    TypeQuery,
    TypeLiteral,
    ArrayType,
    TupleType,
    OptionalType,
    RestType,
    UnionType,
    IntersectionType,
    ConditionalType,
    InferType,
    ParenthesizedType,
    TypeOperator,
    IndexedAccessType,
    MappedType,
    LiteralType,

    // --- Declarations ---
    HeritageClause,
    EnumMember,
    InterfaceDeclaration,
    ClassDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    ModuleDeclaration,
    ModuleBlock,
    FunctionDeclaration,
    VariableStatement,
    VariableDeclaration,

    // --- Module plumbing ---
    ImportDeclaration,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ExportDeclaration,
    NamedExports,
    ExportSpecifier,
    ExportAssignment,

    SourceFile,
}

impl SyntaxKind {
    /// Map identifier text to a keyword kind.
    pub fn keyword_from_text(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "abstract" => SyntaxKind::AbstractKeyword,
            "any" => SyntaxKind::AnyKeyword,
            "as" => SyntaxKind::AsKeyword,
            "bigint" => SyntaxKind::BigIntKeyword,
            "boolean" => SyntaxKind::BooleanKeyword,
            "class" => SyntaxKind::ClassKeyword,
            "const" => SyntaxKind::ConstKeyword,
            "declare" => SyntaxKind::DeclareKeyword,
            "default" => SyntaxKind::DefaultKeyword,
            "enum" => SyntaxKind::EnumKeyword,
            "export" => SyntaxKind::ExportKeyword,
            "extends" => SyntaxKind::ExtendsKeyword,
            "false" => SyntaxKind::FalseKeyword,
            "from" => SyntaxKind::FromKeyword,
            "function" => SyntaxKind::FunctionKeyword,
            "get" => SyntaxKind::GetKeyword,
            "implements" => SyntaxKind::ImplementsKeyword,
            "import" => SyntaxKind::ImportKeyword,
            "in" => SyntaxKind::InKeyword,
            "infer" => SyntaxKind::InferKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "keyof" => SyntaxKind::KeyOfKeyword,
            "let" => SyntaxKind::LetKeyword,
            "module" => SyntaxKind::ModuleKeyword,
            "namespace" => SyntaxKind::NamespaceKeyword,
            "never" => SyntaxKind::NeverKeyword,
            "new" => SyntaxKind::NewKeyword,
            "null" => SyntaxKind::NullKeyword,
            "number" => SyntaxKind::NumberKeyword,
            "object" => SyntaxKind::ObjectKeyword,
            "private" => SyntaxKind::PrivateKeyword,
            "protected" => SyntaxKind::ProtectedKeyword,
            "public" => SyntaxKind::PublicKeyword,
            "readonly" => SyntaxKind::ReadonlyKeyword,
            "set" => SyntaxKind::SetKeyword,
            "static" => SyntaxKind::StaticKeyword,
            "string" => SyntaxKind::StringKeyword,
            "symbol" => SyntaxKind::SymbolKeyword,
            "true" => SyntaxKind::TrueKeyword,
            "type" => SyntaxKind::TypeKeyword,
            "typeof" => SyntaxKind::TypeOfKeyword,
            "undefined" => SyntaxKind::UndefinedKeyword,
            "unknown" => SyntaxKind::UnknownKeyword,
            "var" => SyntaxKind::VarKeyword,
            "void" => SyntaxKind::VoidKeyword,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::AbstractKeyword as u16)
            && (self as u16) <= (SyntaxKind::VoidKeyword as u16)
    }

    /// Keywords that can appear in a declaration's modifier list.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::AbstractKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::ExportKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::StaticKeyword
        )
    }

    /// Keywords that are complete types by themselves.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::AnyKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::VoidKeyword
        )
    }

    /// Fixed source text for tokens that have one. Identifiers and literals
    /// return `None`.
    pub fn token_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::DotToken => ".",
            SyntaxKind::DotDotDotToken => "...",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::EqualsGreaterThanToken => "=>",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::AtToken => "@",
            SyntaxKind::BarToken => "|",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::AbstractKeyword => "abstract",
            SyntaxKind::AnyKeyword => "any",
            SyntaxKind::AsKeyword => "as",
            SyntaxKind::BigIntKeyword => "bigint",
            SyntaxKind::BooleanKeyword => "boolean",
            SyntaxKind::ClassKeyword => "class",
            SyntaxKind::ConstKeyword => "const",
            SyntaxKind::DeclareKeyword => "declare",
            SyntaxKind::DefaultKeyword => "default",
            SyntaxKind::EnumKeyword => "enum",
            SyntaxKind::ExportKeyword => "export",
            SyntaxKind::ExtendsKeyword => "extends",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::FromKeyword => "from",
            SyntaxKind::FunctionKeyword => "function",
            SyntaxKind::GetKeyword => "get",
            SyntaxKind::ImplementsKeyword => "implements",
            SyntaxKind::ImportKeyword => "import",
            SyntaxKind::InKeyword => "in",
            SyntaxKind::InferKeyword => "infer",
            SyntaxKind::InterfaceKeyword => "interface",
            SyntaxKind::KeyOfKeyword => "keyof",
            SyntaxKind::LetKeyword => "let",
            SyntaxKind::ModuleKeyword => "module",
            SyntaxKind::NamespaceKeyword => "namespace",
            SyntaxKind::NeverKeyword => "never",
            SyntaxKind::NewKeyword => "new",
            SyntaxKind::NullKeyword => "null",
            SyntaxKind::NumberKeyword => "number",
            SyntaxKind::ObjectKeyword => "object",
            SyntaxKind::PrivateKeyword => "private",
            SyntaxKind::ProtectedKeyword => "protected",
            SyntaxKind::PublicKeyword => "public",
            SyntaxKind::ReadonlyKeyword => "readonly",
            SyntaxKind::SetKeyword => "set",
            SyntaxKind::StaticKeyword => "static",
            SyntaxKind::StringKeyword => "string",
            SyntaxKind::SymbolKeyword => "symbol",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::TypeKeyword => "type",
            SyntaxKind::TypeOfKeyword => "typeof",
            SyntaxKind::UndefinedKeyword => "undefined",
            SyntaxKind::UnknownKeyword => "unknown",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::VoidKeyword => "void",
            _ => return None,
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_round_trip() {
        for text in ["interface", "keyof", "namespace", "typeof", "readonly"] {
            let kind = SyntaxKind::keyword_from_text(text).unwrap();
            assert!(kind.is_keyword());
            assert_eq!(kind.token_text(), Some(text));
        }
    }

    #[test]
    fn identifier_is_not_keyword() {
        assert_eq!(SyntaxKind::keyword_from_text("Promise"), None);
        assert!(!SyntaxKind::Identifier.is_keyword());
    }

    #[test]
    fn modifier_subset_of_keywords() {
        assert!(SyntaxKind::StaticKeyword.is_modifier());
        assert!(SyntaxKind::DeclareKeyword.is_modifier());
        assert!(!SyntaxKind::InterfaceKeyword.is_modifier());
    }
}
