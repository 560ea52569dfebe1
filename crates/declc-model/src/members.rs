//! Members and signatures of resolved shapes.

use serde::{Deserialize, Serialize};

use crate::symbols::{Annotation, Documentation};
use crate::types::{LiteralValue, TypeNode};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Property,
    Method,
    Accessor,
    IndexSignature,
    CallSignature,
    ConstructSignature,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberVisibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl MemberVisibility {
    pub fn is_public(&self) -> bool {
        matches!(self, MemberVisibility::Public)
    }
}

/// A declared generic parameter, with its constraint and default if written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericParam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub constraint: Option<TypeNode>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<TypeNode>,
}

impl GenericParam {
    pub fn new(name: impl Into<String>) -> GenericParam {
        GenericParam { name: name.into(), constraint: None, default: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub param_type: Option<TypeNode>,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub optional: bool,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub rest: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, param_type: Option<TypeNode>) -> Param {
        Param { name: name.into(), param_type, optional: false, rest: false }
    }
}

/// One callable signature. Functions and methods carry a list of these in
/// declaration order; an overload group shares a single [`Member`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub generic_params: Vec<GenericParam>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Param>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub return_type: Option<TypeNode>,
}

/// A resolved member of an interface, class, or object literal type.
///
/// Which fields are populated depends on `kind`: properties use `value_type`,
/// methods and call signatures use `signatures`, index signatures use
/// `key_type` plus `value_type`. Call and construct signatures have an empty
/// name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub is_static: bool,
    #[serde(skip_serializing_if = "MemberVisibility::is_public", default)]
    pub visibility: MemberVisibility,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub optional: bool,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub readonly: bool,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub is_abstract: bool,
    /// Qualified name of the base shape this member was merged in from.
    /// Absent on members the shape declares itself.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inherited_from: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub value_type: Option<TypeNode>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_type: Option<TypeNode>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub signatures: Vec<Signature>,
    /// The implementation signature of an overload group, kept out of
    /// `signatures` because it is not callable directly.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub implementation: Option<Signature>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<LiteralValue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub documentation: Option<Documentation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub annotations: Vec<Annotation>,
}

impl Member {
    /// A member with every optional field at its default.
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Member {
        Member {
            name: name.into(),
            kind,
            is_static: false,
            visibility: MemberVisibility::Public,
            optional: false,
            readonly: false,
            is_abstract: false,
            inherited_from: None,
            value_type: None,
            key_type: None,
            signatures: Vec::new(),
            implementation: None,
            value: None,
            documentation: None,
            annotations: Vec::new(),
        }
    }
}
