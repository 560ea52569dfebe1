//! Symbol envelope and per-kind definition payloads.

use serde::{Deserialize, Serialize};

use crate::members::{GenericParam, Member, MemberVisibility, Signature};
use crate::types::{LiteralValue, TypeNode};

/// Format version stamped into every emitted document.
pub const IDM_VERSION: &str = "1.0";

/// Where a symbol came from, in byte offsets of the source unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file: String,
    pub start: u32,
    pub length: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Exported,
    Internal,
}

/// Documentation text with the tags the extractor recognizes pre-parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    pub text: String,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub deprecated: bool,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub system_api: bool,
}

/// A decorator, carried through opaquely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub name: String,
    /// Raw argument text between the parentheses, if any were written.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub arguments: Option<String>,
}

/// A named declaration in its resolved form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdmSymbol {
    pub name: String,
    /// Dot-separated path from the unit root, e.g. `http.request.Options`.
    pub qualified_name: String,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<SourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub documentation: Option<Documentation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub annotations: Vec<Annotation>,
    #[serde(flatten)]
    pub def: SymbolDef,
}

/// The kind-specific payload of a symbol. Serializes inline into the symbol
/// object under a `kind` tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SymbolDef {
    Interface(ShapeDef),
    Class(ShapeDef),
    Enum(EnumDef),
    TypeAlias(AliasDef),
    Function(FunctionDef),
    Constant(ConstantDef),
    Namespace(NamespaceDef),
    Module(ModuleDef),
}

/// Shared payload of interfaces and classes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDef {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub generic_params: Vec<GenericParam>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extends: Vec<TypeNode>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub implements: Vec<TypeNode>,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "MemberVisibility::is_public", default)]
    pub constructor_visibility: MemberVisibility,
    /// Declared constructor signatures in declaration order, implementation
    /// signature excluded.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub constructors: Vec<Signature>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub constructor_implementation: Option<Signature>,
    /// Own members first, then inherited ones, each at most once per name
    /// and kind.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members: Vec<Member>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumKind {
    Numeric,
    String,
    Heterogeneous,
}

/// An enum member value after auto-increment assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "baseKind", content = "value", rename_all = "lowercase")]
pub enum EnumValue {
    Integer(i64),
    Float(f64),
    String(String),
    /// Initializer text the extractor could not evaluate.
    Opaque(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMemberDef {
    pub name: String,
    pub value: EnumValue,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub documentation: Option<Documentation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    pub enum_kind: EnumKind,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub is_const: bool,
    pub members: Vec<EnumMemberDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasDef {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub generic_params: Vec<GenericParam>,
    #[serde(rename = "type")]
    pub aliased: TypeNode,
}

/// A free function. Overloads collapse into one symbol whose signatures keep
/// declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDef {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub signatures: Vec<Signature>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub implementation: Option<Signature>,
}

/// A `const`, `let`, or `var` binding at declaration scope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantDef {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub const_type: Option<TypeNode>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<LiteralValue>,
    /// Initializer text for non-literal initializers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub writable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceDef {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members: Vec<IdmSymbol>,
}

/// An ambient module declaration with a string-literal name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDef {
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub shorthand: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members: Vec<IdmSymbol>,
}

/// One name a unit exports, mapped to the qualified name of its target.
/// Aliases produce a record whose `name` differs from the last segment of
/// `target`; re-exports carry the module specifier in `from`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub name: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdmUnit {
    pub file: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub symbols: Vec<IdmSymbol>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exports: Vec<ExportRecord>,
}

/// The extraction result for a whole input set, one unit per input file in
/// input order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdmDocument {
    pub version: String,
    pub units: Vec<IdmUnit>,
}

impl IdmDocument {
    pub fn new() -> IdmDocument {
        IdmDocument { version: IDM_VERSION.to_string(), units: Vec::new() }
    }
}

impl Default for IdmDocument {
    fn default() -> Self {
        IdmDocument::new()
    }
}
