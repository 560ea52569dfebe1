//! Arena storage for syntax nodes.

use crate::kind::SyntaxKind;
use crate::node::*;
use declc_common::{DocComment, Span, limits};
use rustc_hash::FxHashMap;

/// Owns every node of one parsed source file.
///
/// Doc comments and decorators are kept in side tables keyed by the node
/// they attach to, so declaration data structs stay independent of them.
#[derive(Default)]
pub struct SyntaxArena {
    nodes: Vec<Node>,
    docs: FxHashMap<NodeIndex, DocComment>,
    decorators: FxHashMap<NodeIndex, NodeList>,
}

macro_rules! node_accessors {
    ($(($add:ident, $get:ident, $variant:ident, $data:ty)),+ $(,)?) => {
        $(
            pub fn $add(&mut self, kind: SyntaxKind, pos: u32, end: u32, data: $data) -> NodeIndex {
                self.push_node(kind, pos, end, NodeData::$variant(data))
            }

            pub fn $get(&self, index: NodeIndex) -> Option<&$data> {
                match &self.node(index)?.data {
                    NodeData::$variant(data) => Some(data),
                    _ => None,
                }
            }
        )+
    };
}

impl SyntaxArena {
    pub fn new() -> SyntaxArena {
        SyntaxArena::default()
    }

    /// Pre-allocate from a source-size estimate, roughly one node per 20
    /// characters.
    pub fn with_source_estimate(source_len: usize) -> SyntaxArena {
        let estimate = (source_len / 20).min(limits::MAX_NODE_PREALLOC);
        SyntaxArena {
            nodes: Vec::with_capacity(estimate),
            ..SyntaxArena::default()
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push_node(&mut self, kind: SyntaxKind, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            kind,
            pos,
            end,
            data,
        });
        NodeIndex(index)
    }

    /// Add a token node with no payload (punctuation, keyword types).
    pub fn add_token(&mut self, kind: SyntaxKind, pos: u32, end: u32) -> NodeIndex {
        self.push_node(kind, pos, end, NodeData::Token)
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0 as usize)
    }

    pub fn kind(&self, index: NodeIndex) -> SyntaxKind {
        self.node(index).map_or(SyntaxKind::Unknown, |n| n.kind)
    }

    pub fn span(&self, index: NodeIndex) -> Span {
        self.node(index)
            .map_or(Span::at(0), |n| Span::new(n.pos, n.end))
    }

    node_accessors!(
        (add_identifier, get_identifier, Identifier, IdentifierData),
        (add_literal, get_literal, Literal, LiteralData),
        (add_qualified_name, get_qualified_name, QualifiedName, QualifiedNameData),
        (add_computed_name, get_computed_name, ComputedName, ComputedNameData),
        (add_decorator, get_decorator, Decorator, DecoratorData),
        (add_parameter, get_parameter, Parameter, ParameterData),
        (add_type_parameter, get_type_parameter, TypeParameter, TypeParameterData),
        (add_signature, get_signature, Signature, SignatureData),
        (add_index_signature, get_index_signature, IndexSignature, IndexSignatureData),
        (add_constructor, get_constructor, Constructor, ConstructorData),
        (add_accessor, get_accessor, Accessor, AccessorData),
        (add_type_ref, get_type_ref, TypeRef, TypeRefData),
        (add_composite_type, get_composite_type, CompositeType, CompositeTypeData),
        (add_function_type, get_function_type, FunctionType, FunctionTypeData),
        (add_type_query, get_type_query, TypeQuery, TypeQueryData),
        (add_type_literal, get_type_literal, TypeLiteral, TypeLiteralData),
        (add_array_type, get_array_type, ArrayType, ArrayTypeData),
        (add_tuple_type, get_tuple_type, TupleType, TupleTypeData),
        (add_wrapped_type, get_wrapped_type, WrappedType, WrappedTypeData),
        (add_conditional_type, get_conditional_type, ConditionalType, ConditionalTypeData),
        (add_infer_type, get_infer_type, InferType, InferTypeData),
        (add_type_operator, get_type_operator, TypeOperator, TypeOperatorData),
        (add_indexed_access_type, get_indexed_access_type, IndexedAccessType, IndexedAccessTypeData),
        (add_mapped_type, get_mapped_type, MappedType, MappedTypeData),
        (add_literal_type, get_literal_type, LiteralType, LiteralTypeData),
        (add_heritage_clause, get_heritage_clause, Heritage, HeritageData),
        (add_interface, get_interface, Interface, InterfaceData),
        (add_class, get_class, Class, ClassData),
        (add_type_alias, get_type_alias, TypeAlias, TypeAliasData),
        (add_enum, get_enum, Enum, EnumData),
        (add_enum_member, get_enum_member, EnumMember, EnumMemberData),
        (add_module, get_module, Module, ModuleData),
        (add_module_block, get_module_block, ModuleBlock, ModuleBlockData),
        (add_function, get_function, Function, FunctionData),
        (add_variable, get_variable, Variable, VariableData),
        (add_variable_declaration, get_variable_declaration, VariableDeclaration, VariableDeclarationData),
        (add_import_decl, get_import_decl, ImportDecl, ImportDeclData),
        (add_import_clause, get_import_clause, ImportClause, ImportClauseData),
        (add_namespace_import, get_namespace_import, NamespaceImport, NamespaceImportData),
        (add_named_bindings, get_named_bindings, NamedBindings, NamedBindingsData),
        (add_specifier, get_specifier, Specifier, SpecifierData),
        (add_export_decl, get_export_decl, ExportDecl, ExportDeclData),
        (add_export_assignment, get_export_assignment, ExportAssignment, ExportAssignmentData),
        (add_source_file, get_source_file, SourceFile, SourceFileData),
    );

    // =========================================================================
    // Attachments
    // =========================================================================

    pub fn set_doc(&mut self, index: NodeIndex, doc: DocComment) {
        if index.is_some() && !doc.is_empty() {
            self.docs.insert(index, doc);
        }
    }

    pub fn doc(&self, index: NodeIndex) -> Option<&DocComment> {
        self.docs.get(&index)
    }

    pub fn set_decorators(&mut self, index: NodeIndex, decorators: NodeList) {
        if index.is_some() && !decorators.is_empty() {
            self.decorators.insert(index, decorators);
        }
    }

    pub fn decorators(&self, index: NodeIndex) -> Option<&NodeList> {
        self.decorators.get(&index)
    }

    // =========================================================================
    // Name Helpers
    // =========================================================================

    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.get_identifier(index).map(|data| data.text.as_str())
    }

    /// Text of a member or declaration name: identifier or string literal.
    pub fn name_text(&self, index: NodeIndex) -> Option<&str> {
        match &self.node(index)?.data {
            NodeData::Identifier(data) => Some(&data.text),
            NodeData::Literal(data) => Some(&data.text),
            _ => None,
        }
    }

    /// Dotted text of an entity name (`A.B.C`).
    pub fn entity_name_text(&self, index: NodeIndex) -> Option<String> {
        match &self.node(index)?.data {
            NodeData::Identifier(data) => Some(data.text.clone()),
            NodeData::QualifiedName(data) => {
                let left = self.entity_name_text(data.left)?;
                let right = self.identifier_text(data.right)?;
                Some(format!("{left}.{right}"))
            }
            _ => None,
        }
    }

    // =========================================================================
    // Modifier Helpers
    // =========================================================================

    pub fn modifier_flags(&self, modifiers: &Option<NodeList>) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        if let Some(list) = modifiers {
            for &modifier in list {
                flags |= ModifierFlags::from_kind(self.kind(modifier));
            }
        }
        flags
    }
}
