//! Interface Description Model.
//!
//! The IDM is the language-neutral output of declaration extraction: a tree of
//! [`IdmSymbol`] values whose shapes are fully resolved, with every type
//! reduced to a [`TypeNode`]. All structs serialize to camelCase JSON through
//! serde; fields at their default values are omitted so emitted documents stay
//! small and diff-friendly.

pub mod builtins;
pub mod members;
pub mod symbols;
pub mod types;

pub use members::{GenericParam, Member, MemberKind, MemberVisibility, Param, Signature};
pub use symbols::{
    AliasDef, Annotation, ConstantDef, Documentation, EnumDef, EnumKind, EnumMemberDef, EnumValue,
    ExportRecord, FunctionDef, IdmDocument, IdmSymbol, IdmUnit, ModuleDef, NamespaceDef, ShapeDef,
    SourceLocation, SymbolDef, Visibility, IDM_VERSION,
};
pub use types::{LiteralValue, PrimitiveKind, TupleElement, TypeNode, TypeOperatorKind};

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
