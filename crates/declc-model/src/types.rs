//! Resolved type representations.

use serde::{Deserialize, Serialize};

use crate::members::{GenericParam, Member, Param};

/// Built-in base types with no further structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Any,
    BigInt,
    Boolean,
    Never,
    Null,
    Number,
    Object,
    String,
    Symbol,
    Undefined,
    Unknown,
    Void,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Any => "any",
            PrimitiveKind::BigInt => "bigint",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Never => "never",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Object => "object",
            PrimitiveKind::String => "string",
            PrimitiveKind::Symbol => "symbol",
            PrimitiveKind::Undefined => "undefined",
            PrimitiveKind::Unknown => "unknown",
            PrimitiveKind::Void => "void",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix type operators that survive into the model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeOperatorKind {
    KeyOf,
    Readonly,
}

/// A literal used as a type, tagged with its base kind.
///
/// Integer and float literals are kept apart so `0` and `0.5` round-trip
/// without a lossy shared representation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "baseKind", content = "value", rename_all = "lowercase")]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

/// One position of a tuple type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleElement {
    #[serde(rename = "type")]
    pub element_type: TypeNode,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub optional: bool,
    #[serde(skip_serializing_if = "crate::is_false", default)]
    pub rest: bool,
}

/// A fully resolved type.
///
/// `Reference` names are qualified where the target is a known declaration;
/// generic parameters in scope stay as bare references to their own name.
/// `Unknown` stands in for constructs the extractor tolerated but could not
/// model, and compares equal only to itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeNode {
    Primitive {
        name: PrimitiveKind,
    },
    Reference {
        name: String,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        type_arguments: Vec<TypeNode>,
    },
    Union {
        members: Vec<TypeNode>,
    },
    Intersection {
        members: Vec<TypeNode>,
    },
    Array {
        element: Box<TypeNode>,
    },
    Tuple {
        elements: Vec<TupleElement>,
    },
    Function {
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        generic_params: Vec<GenericParam>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        parameters: Vec<Param>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        return_type: Option<Box<TypeNode>>,
        #[serde(skip_serializing_if = "crate::is_false", default)]
        is_constructor: bool,
    },
    ObjectLiteral {
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        members: Vec<Member>,
    },
    Mapped {
        key_name: String,
        key_source: Box<TypeNode>,
        value: Box<TypeNode>,
        #[serde(skip_serializing_if = "crate::is_false", default)]
        readonly: bool,
        #[serde(skip_serializing_if = "crate::is_false", default)]
        optional: bool,
    },
    Literal {
        value: LiteralValue,
    },
    /// `typeof target`, with the fully qualified entity name.
    TypeQuery {
        target: String,
    },
    Conditional {
        check: Box<TypeNode>,
        extends: Box<TypeNode>,
        true_type: Box<TypeNode>,
        false_type: Box<TypeNode>,
    },
    /// An `infer T` binder inside the extends clause of a conditional.
    Infer {
        name: String,
    },
    Operator {
        operator: TypeOperatorKind,
        operand: Box<TypeNode>,
    },
    IndexedAccess {
        object: Box<TypeNode>,
        index: Box<TypeNode>,
    },
    Unknown,
}

impl TypeNode {
    pub fn primitive(name: PrimitiveKind) -> TypeNode {
        TypeNode::Primitive { name }
    }

    /// A reference without type arguments.
    pub fn reference(name: impl Into<String>) -> TypeNode {
        TypeNode::Reference { name: name.into(), type_arguments: Vec::new() }
    }

    pub fn array(element: TypeNode) -> TypeNode {
        TypeNode::Array { element: Box::new(element) }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeNode::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_serializes_with_kind_tag() {
        let node = TypeNode::primitive(PrimitiveKind::String);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "primitive");
        assert_eq!(json["name"], "string");
    }

    #[test]
    fn reference_omits_empty_type_arguments() {
        let json = serde_json::to_value(TypeNode::reference("Widget")).unwrap();
        assert!(json.get("typeArguments").is_none());

        let generic = TypeNode::Reference {
            name: "Array".to_string(),
            type_arguments: vec![TypeNode::primitive(PrimitiveKind::Number)],
        };
        let json = serde_json::to_value(&generic).unwrap();
        assert_eq!(json["typeArguments"][0]["name"], "number");
    }

    #[test]
    fn literal_base_kinds_stay_distinct() {
        let int = serde_json::to_value(LiteralValue::Integer(0)).unwrap();
        let float = serde_json::to_value(LiteralValue::Float(0.5)).unwrap();
        assert_eq!(int["baseKind"], "integer");
        assert_eq!(float["baseKind"], "float");
        assert_ne!(
            LiteralValue::Integer(1),
            LiteralValue::Float(1.0),
            "integer and float literals must not compare equal"
        );
    }

    #[test]
    fn structural_equality_ignores_nothing() {
        let a = TypeNode::Union {
            members: vec![
                TypeNode::primitive(PrimitiveKind::String),
                TypeNode::array(TypeNode::reference("T")),
            ],
        };
        let b = TypeNode::Union {
            members: vec![
                TypeNode::primitive(PrimitiveKind::String),
                TypeNode::array(TypeNode::reference("T")),
            ],
        };
        assert_eq!(a, b);

        let c = TypeNode::Union {
            members: vec![
                TypeNode::array(TypeNode::reference("T")),
                TypeNode::primitive(PrimitiveKind::String),
            ],
        };
        assert_ne!(a, c, "member order is part of the structure");
    }

    #[test]
    fn tuple_element_round_trips() {
        let element = TupleElement {
            element_type: TypeNode::primitive(PrimitiveKind::Boolean),
            optional: true,
            rest: false,
        };
        let json = serde_json::to_string(&element).unwrap();
        let back: TupleElement = serde_json::from_str(&json).unwrap();
        assert_eq!(element, back);
        assert!(!json.contains("rest"), "false flags are omitted: {json}");
    }
}
