//! Syntax node representation.
//!
//! Nodes live in a [`crate::arena::SyntaxArena`] and refer to each other by
//! [`NodeIndex`]. Each node carries its kind, source span, and a typed data
//! payload; absent children are `NodeIndex::NONE` rather than `Option` so
//! the data structs stay flat.

use crate::kind::SyntaxKind;
use bitflags::bitflags;
use smallvec::SmallVec;

/// Handle to a node in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Sentinel for "no node".
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }

    pub fn is_some(self) -> bool {
        self != NodeIndex::NONE
    }
}

/// Child list. Inline capacity covers typical parameter and member counts.
pub type NodeList = SmallVec<[NodeIndex; declc_common::limits::TYPE_LIST_INLINE]>;

bitflags! {
    /// Modifier keywords collapsed into a bit set.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct ModifierFlags: u16 {
        const DECLARE   = 1 << 0;
        const EXPORT    = 1 << 1;
        const DEFAULT   = 1 << 2;
        const ABSTRACT  = 1 << 3;
        const STATIC    = 1 << 4;
        const READONLY  = 1 << 5;
        const PRIVATE   = 1 << 6;
        const PROTECTED = 1 << 7;
        const PUBLIC    = 1 << 8;
        const CONST     = 1 << 9;
    }
}

impl ModifierFlags {
    pub fn from_kind(kind: SyntaxKind) -> ModifierFlags {
        match kind {
            SyntaxKind::DeclareKeyword => ModifierFlags::DECLARE,
            SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
            SyntaxKind::DefaultKeyword => ModifierFlags::DEFAULT,
            SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
            SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
            SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
            SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
            SyntaxKind::ConstKeyword => ModifierFlags::CONST,
            _ => ModifierFlags::empty(),
        }
    }
}

/// A single syntax node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    pub(crate) data: NodeData,
}

// =============================================================================
// Node Data
// =============================================================================

/// Data for identifiers
#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub text: String,
}

/// Data for string and numeric literal tokens. `text` is the cooked value:
/// unescaped contents for strings, separator-free text for numbers.
#[derive(Clone, Debug)]
pub struct LiteralData {
    pub text: String,
}

/// Data for qualified names (`A.B`)
#[derive(Clone, Debug)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

/// Data for computed property names (`[expr]`). Only the raw text is kept;
/// the collector decides what to do with it.
#[derive(Clone, Debug)]
pub struct ComputedNameData {
    pub expression_text: String,
}

/// Data for decorators. Arguments are preserved as raw source text.
#[derive(Clone, Debug)]
pub struct DecoratorData {
    pub name: String,
    pub arguments_text: Option<String>,
}

/// Data for parameter declarations
#[derive(Clone, Debug)]
pub struct ParameterData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
}

/// Data for type parameter declarations
#[derive(Clone, Debug)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

/// Data for property and method signatures. `parameters` is `None` for
/// properties; call and construct signatures have no name.
#[derive(Clone, Debug)]
pub struct SignatureData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: Option<NodeList>,
    pub type_annotation: NodeIndex,
    /// Literal initializer on class properties (`static readonly pi = 3.14`).
    pub initializer: NodeIndex,
    /// True when a tolerated `{ ... }` body followed the signature. Marks
    /// the implementation signature of an overload group.
    pub has_body: bool,
}

/// Data for index signatures
#[derive(Clone, Debug)]
pub struct IndexSignatureData {
    pub modifiers: Option<NodeList>,
    pub parameter: NodeIndex,
    pub type_annotation: NodeIndex,
}

/// Data for constructor declarations
#[derive(Clone, Debug)]
pub struct ConstructorData {
    pub modifiers: Option<NodeList>,
    pub parameters: NodeList,
    pub has_body: bool,
}

/// Data for get and set accessors
#[derive(Clone, Debug)]
pub struct AccessorData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

/// Data for type references
#[derive(Clone, Debug)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

/// Data for union and intersection types
#[derive(Clone, Debug)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

/// Data for function and constructor types
#[derive(Clone, Debug)]
pub struct FunctionTypeData {
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
}

/// Data for `typeof` type queries
#[derive(Clone, Debug)]
pub struct TypeQueryData {
    pub expr_name: NodeIndex,
}

/// Data for object type literals
#[derive(Clone, Debug)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

/// Data for array types
#[derive(Clone, Debug)]
pub struct ArrayTypeData {
    pub element_type: NodeIndex,
}

/// Data for tuple types
#[derive(Clone, Debug)]
pub struct TupleTypeData {
    pub elements: NodeList,
}

/// Data for optional, rest and parenthesized types
#[derive(Clone, Debug)]
pub struct WrappedTypeData {
    pub type_node: NodeIndex,
}

/// Data for conditional types
#[derive(Clone, Debug)]
pub struct ConditionalTypeData {
    pub check_type: NodeIndex,
    pub extends_type: NodeIndex,
    pub true_type: NodeIndex,
    pub false_type: NodeIndex,
}

/// Data for `infer T` placeholders
#[derive(Clone, Debug)]
pub struct InferTypeData {
    pub type_parameter: NodeIndex,
}

/// Data for type operators (`keyof T`, `readonly T[]`)
#[derive(Clone, Debug)]
pub struct TypeOperatorData {
    pub operator: SyntaxKind,
    pub type_node: NodeIndex,
}

/// Data for indexed access types (`T[K]`)
#[derive(Clone, Debug)]
pub struct IndexedAccessTypeData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

/// Data for mapped types
#[derive(Clone, Debug)]
pub struct MappedTypeData {
    pub readonly_token: bool,
    pub type_parameter: NodeIndex,
    pub question_token: bool,
    pub type_node: NodeIndex,
}

/// Data for literal types
#[derive(Clone, Debug)]
pub struct LiteralTypeData {
    pub literal: NodeIndex,
    pub negative: bool,
}

/// Data for heritage clauses
#[derive(Clone, Debug)]
pub struct HeritageData {
    pub token: SyntaxKind,
    pub types: NodeList,
}

/// Data for interface declarations
#[derive(Clone, Debug)]
pub struct InterfaceData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

/// Data for class declarations
#[derive(Clone, Debug)]
pub struct ClassData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

/// Data for type alias declarations
#[derive(Clone, Debug)]
pub struct TypeAliasData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeIndex,
}

/// Data for enum declarations
#[derive(Clone, Debug)]
pub struct EnumData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub members: NodeList,
}

/// Data for enum members
#[derive(Clone, Debug)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for namespace and ambient module declarations. Dotted namespace
/// names are desugared during parsing, so `body` is either a module block,
/// a nested module declaration, or `NONE` for shorthand ambient modules.
#[derive(Clone, Debug)]
pub struct ModuleData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub body: NodeIndex,
}

/// Data for module blocks
#[derive(Clone, Debug)]
pub struct ModuleBlockData {
    pub statements: NodeList,
}

/// Data for function declarations
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub modifiers: Option<NodeList>,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    pub has_body: bool,
}

/// Data for variable statements. `keyword` preserves const/let/var.
#[derive(Clone, Debug)]
pub struct VariableData {
    pub modifiers: Option<NodeList>,
    pub keyword: SyntaxKind,
    pub declarations: NodeList,
}

/// Data for a single variable declaration
#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Data for import declarations
#[derive(Clone, Debug)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

/// Data for import clauses
#[derive(Clone, Debug)]
pub struct ImportClauseData {
    pub name: NodeIndex,
    pub named_bindings: NodeIndex,
}

/// Data for namespace imports (`* as ns`)
#[derive(Clone, Debug)]
pub struct NamespaceImportData {
    pub name: NodeIndex,
}

/// Data for named import/export brace lists
#[derive(Clone, Debug)]
pub struct NamedBindingsData {
    pub elements: NodeList,
}

/// Data for import and export specifiers. `property_name` is the source
/// name when the specifier is aliased (`a as b`), otherwise `NONE`.
#[derive(Clone, Debug)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

/// Data for export declarations (`export { ... }`, `export * from`)
#[derive(Clone, Debug)]
pub struct ExportDeclData {
    pub export_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

/// Data for `export default Name`
#[derive(Clone, Debug)]
pub struct ExportAssignmentData {
    pub expression: NodeIndex,
}

/// Data for source files
#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub statements: NodeList,
}

/// Payload storage for every node shape.
#[derive(Clone, Debug)]
pub(crate) enum NodeData {
    /// Tokens and keyword type nodes carry no payload.
    Token,
    Identifier(IdentifierData),
    Literal(LiteralData),
    QualifiedName(QualifiedNameData),
    ComputedName(ComputedNameData),
    Decorator(DecoratorData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    Signature(SignatureData),
    IndexSignature(IndexSignatureData),
    Constructor(ConstructorData),
    Accessor(AccessorData),
    TypeRef(TypeRefData),
    CompositeType(CompositeTypeData),
    FunctionType(FunctionTypeData),
    TypeQuery(TypeQueryData),
    TypeLiteral(TypeLiteralData),
    ArrayType(ArrayTypeData),
    TupleType(TupleTypeData),
    WrappedType(WrappedTypeData),
    ConditionalType(ConditionalTypeData),
    InferType(InferTypeData),
    TypeOperator(TypeOperatorData),
    IndexedAccessType(IndexedAccessTypeData),
    MappedType(MappedTypeData),
    LiteralType(LiteralTypeData),
    Heritage(HeritageData),
    Interface(InterfaceData),
    Class(ClassData),
    TypeAlias(TypeAliasData),
    Enum(EnumData),
    EnumMember(EnumMemberData),
    Module(ModuleData),
    ModuleBlock(ModuleBlockData),
    Function(FunctionData),
    Variable(VariableData),
    VariableDeclaration(VariableDeclarationData),
    ImportDecl(ImportDeclData),
    ImportClause(ImportClauseData),
    NamespaceImport(NamespaceImportData),
    NamedBindings(NamedBindingsData),
    Specifier(SpecifierData),
    ExportDecl(ExportDeclData),
    ExportAssignment(ExportAssignmentData),
    SourceFile(SourceFileData),
}
