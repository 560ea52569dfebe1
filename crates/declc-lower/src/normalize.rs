//! Type annotation normalization and entity resolution.
//!
//! Every annotation in the syntax tree is rewritten into a
//! [`declc_model::TypeNode`]. References are resolved against the lexical
//! frames of the current unit first, then imports, then the shared global
//! scope, and finally the known ambient globals. Unions flatten and
//! deduplicate structurally, tuples are validated, and literal types carry
//! their cooked values.

use crate::context::{LowerCtx, LowerResult};
use crate::members;
use declc_binder::{DeclKind, Declaration, Import, ImportKind, ModuleTarget};
use declc_common::{codes, limits, Span};
use declc_model::builtins;
use declc_model::{
    GenericParam, LiteralValue, Param, PrimitiveKind, TupleElement, TypeNode, TypeOperatorKind,
};
use declc_syntax::{NodeIndex, NodeList, SyntaxArena, SyntaxKind};
use rustc_hash::FxHashSet;

// =============================================================================
// Entity Resolution
// =============================================================================

/// What a dotted name in type or value position resolved to.
pub(crate) enum ResolvedEntity<'a> {
    /// A type parameter currently in scope.
    GenericParam(String),
    /// A known ambient global with no declaration in the input set.
    Builtin(String),
    Declared {
        unit: usize,
        /// Dot-separated path from the declaring unit's root.
        qualified: String,
        decl: &'a Declaration,
    },
}

fn type_position(kind: DeclKind) -> bool {
    matches!(
        kind,
        DeclKind::Interface | DeclKind::Class | DeclKind::Enum | DeclKind::TypeAlias
    )
}

fn value_position(kind: DeclKind) -> bool {
    matches!(
        kind,
        DeclKind::Variable
            | DeclKind::Function
            | DeclKind::Class
            | DeclKind::Enum
            | DeclKind::Namespace
            | DeclKind::Module
    )
}

/// Resolve a dotted name written in type position.
pub(crate) fn resolve_type_entity<'a>(
    ctx: &mut LowerCtx<'a>,
    text: &str,
    span: Span,
) -> LowerResult<ResolvedEntity<'a>> {
    let segments: Vec<&str> = text.split('.').collect();
    let Some((&first, rest)) = segments.split_first() else {
        return Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[text]));
    };
    if rest.is_empty() && ctx.in_scope(first) {
        return Ok(ResolvedEntity::GenericParam(first.to_string()));
    }
    if let Some(entity) = lookup_entity(ctx, first, rest, text, span)? {
        return match &entity {
            ResolvedEntity::Declared { decl, .. } if !type_position(decl.kind) => {
                Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[text]))
            }
            _ => Ok(entity),
        };
    }
    if rest.is_empty() && builtins::is_known_global_type(first) {
        return Ok(ResolvedEntity::Builtin(first.to_string()));
    }
    Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[text]))
}

/// Resolve the target of a `typeof` query down to its canonical name.
pub(crate) fn resolve_value_entity(
    ctx: &mut LowerCtx<'_>,
    text: &str,
    span: Span,
) -> LowerResult<String> {
    let segments: Vec<&str> = text.split('.').collect();
    let Some((&first, rest)) = segments.split_first() else {
        return Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[text]));
    };
    if let Some(entity) = lookup_entity(ctx, first, rest, text, span)? {
        return match entity {
            ResolvedEntity::Declared {
                qualified, decl, ..
            } if value_position(decl.kind) => Ok(qualified),
            _ => Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[text])),
        };
    }
    if rest.is_empty() && builtins::is_type_query_global(first) {
        return Ok(first.to_string());
    }
    Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[text]))
}

/// Walk the lexical frames, imports, then the global scope for `first`.
/// `Ok(None)` means the head segment is unknown everywhere; navigation
/// failures past a known head are fatal.
fn lookup_entity<'a>(
    ctx: &mut LowerCtx<'a>,
    first: &str,
    rest: &[&str],
    full: &str,
    span: Span,
) -> LowerResult<Option<ResolvedEntity<'a>>> {
    for position in (0..ctx.frames.len()).rev() {
        let frame_unit = ctx.frames[position].unit;
        let container = ctx.frames[position].container;
        if let Some(decl) = container.get(first) {
            let prefix = &ctx.frames[position].prefix;
            let qualified = if prefix.is_empty() {
                first.to_string()
            } else {
                format!("{prefix}.{first}")
            };
            return navigate(ctx, frame_unit, qualified, decl, rest, full, span).map(Some);
        }
    }
    if let Some(import) = ctx.bindings().imports.get(first) {
        return resolve_through_import(ctx, import, rest, full, span).map(Some);
    }
    if let Some((unit, decl)) = ctx.global.declarations_named(first).into_iter().next() {
        return navigate(ctx, unit, first.to_string(), decl, rest, full, span).map(Some);
    }
    Ok(None)
}

/// Descend the remaining segments through nested containers. The final
/// segment may name an enum member.
fn navigate<'a>(
    ctx: &mut LowerCtx<'a>,
    unit: usize,
    qualified: String,
    decl: &'a Declaration,
    rest: &[&str],
    full: &str,
    span: Span,
) -> LowerResult<ResolvedEntity<'a>> {
    let mut qualified = qualified;
    let mut current = decl;
    for (position, &segment) in rest.iter().enumerate() {
        if let Some(inner) = current.inner.as_ref() {
            if let Some(next) = inner.get(segment) {
                qualified.push('.');
                qualified.push_str(segment);
                current = next;
                continue;
            }
        } else if current.kind == DeclKind::Enum
            && position == rest.len() - 1
            && enum_has_member(ctx, unit, current, segment)
        {
            qualified.push('.');
            qualified.push_str(segment);
            return Ok(ResolvedEntity::Declared {
                unit,
                qualified,
                decl: current,
            });
        }
        return Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[full]));
    }
    Ok(ResolvedEntity::Declared {
        unit,
        qualified,
        decl: current,
    })
}

fn enum_has_member(ctx: &LowerCtx<'_>, unit: usize, decl: &Declaration, member: &str) -> bool {
    let arena = &ctx.parses[unit].arena;
    decl.nodes.iter().any(|&node| {
        arena.get_enum(node).is_some_and(|data| {
            data.members.iter().any(|&entry| {
                arena
                    .get_enum_member(entry)
                    .and_then(|data| arena.name_text(data.name))
                    .is_some_and(|name| name == member)
            })
        })
    })
}

fn resolve_through_import<'a>(
    ctx: &mut LowerCtx<'a>,
    import: &Import,
    rest: &[&str],
    full: &str,
    span: Span,
) -> LowerResult<ResolvedEntity<'a>> {
    let Some(target) = ctx.global.resolve_specifier(&import.specifier) else {
        return Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[full]));
    };
    // A namespace import consumes the first dotted segment as the exported
    // name; default and named imports carry the name themselves.
    let (wanted, tail): (String, &[&str]) = match &import.kind {
        ImportKind::Default => ("default".to_string(), rest),
        ImportKind::Named { original } => (original.clone(), rest),
        ImportKind::Namespace => match rest.split_first() {
            Some((&head, tail)) => (head.to_string(), tail),
            None => return Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[full])),
        },
    };
    match target {
        ModuleTarget::Unit(unit) => {
            let mut visited = FxHashSet::default();
            let Some((found_unit, decl, qualified)) =
                resolve_exported(ctx, unit, &wanted, &mut visited)
            else {
                return Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[full]));
            };
            navigate(ctx, found_unit, qualified, decl, tail, full, span)
        }
        ModuleTarget::Ambient(_) => {
            let Some((unit, decl)) = ambient_lookup(ctx, &import.specifier, &wanted) else {
                return Err(ctx.fatal(span, codes::UNRESOLVED_TYPE_REFERENCE, &[full]));
            };
            let qualified = format!("{}.{}", import.specifier, wanted);
            navigate(ctx, unit, qualified, decl, tail, full, span)
        }
    }
}

/// Resolve an exported name of `unit` to its backing declaration, following
/// alias chains and re-exports. `visited` breaks re-export cycles.
pub(crate) fn resolve_exported<'a>(
    ctx: &LowerCtx<'a>,
    unit: usize,
    name: &str,
    visited: &mut FxHashSet<(usize, String)>,
) -> Option<(usize, &'a Declaration, String)> {
    if !visited.insert((unit, name.to_string())) {
        return None;
    }
    let bindings = ctx.global.unit(unit);
    for entry in bindings.local_export_surface() {
        if entry.name != name {
            continue;
        }
        if let Some(decl) = bindings.root.get(&entry.local) {
            return Some((unit, decl, entry.local));
        }
        if let Some(import) = bindings.imports.get(&entry.local) {
            let wanted = match &import.kind {
                ImportKind::Default => "default",
                ImportKind::Named { original } => original,
                ImportKind::Namespace => return None,
            };
            return resolve_from_specifier(ctx, &import.specifier, wanted, visited);
        }
        return None;
    }
    for reexport in &bindings.reexports {
        match &reexport.names {
            Some(pairs) => {
                for (original, exported) in pairs {
                    if exported == name {
                        return resolve_from_specifier(ctx, &reexport.specifier, original, visited);
                    }
                }
            }
            None => {
                // Star re-exports never forward a default export.
                if name == "default" {
                    continue;
                }
                if let Some(found) =
                    resolve_from_specifier(ctx, &reexport.specifier, name, visited)
                {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn resolve_from_specifier<'a>(
    ctx: &LowerCtx<'a>,
    specifier: &str,
    name: &str,
    visited: &mut FxHashSet<(usize, String)>,
) -> Option<(usize, &'a Declaration, String)> {
    match ctx.global.resolve_specifier(specifier)? {
        ModuleTarget::Unit(unit) => resolve_exported(ctx, unit, name, visited),
        ModuleTarget::Ambient(_) => {
            let (unit, decl) = ambient_lookup(ctx, specifier, name)?;
            Some((unit, decl, format!("{specifier}.{name}")))
        }
    }
}

/// Look a member up inside the ambient modules declared under `module`.
/// When no member of a module body carries `export`, every member is
/// treated as exported.
pub(crate) fn ambient_lookup<'a>(
    ctx: &LowerCtx<'a>,
    module: &str,
    name: &str,
) -> Option<(usize, &'a Declaration)> {
    let Some(ModuleTarget::Ambient(indices)) = ctx.global.resolve_specifier(module) else {
        return None;
    };
    for &unit in indices {
        let root = &ctx.global.unit(unit).root;
        let Some(module_decl) = root.get(module) else {
            continue;
        };
        let Some(inner) = module_decl.inner.as_ref() else {
            continue;
        };
        if let Some(decl) = inner.get(name) {
            if !inner.any_exported() || decl.exported {
                return Some((unit, decl));
            }
        }
    }
    None
}

// =============================================================================
// Normalization
// =============================================================================

pub(crate) fn normalize_opt(
    ctx: &mut LowerCtx<'_>,
    index: NodeIndex,
) -> LowerResult<Option<TypeNode>> {
    if index.is_none() {
        return Ok(None);
    }
    normalize_type(ctx, index).map(Some)
}

pub(crate) fn normalize_type(ctx: &mut LowerCtx<'_>, index: NodeIndex) -> LowerResult<TypeNode> {
    if ctx.depth >= limits::MAX_NORMALIZE_DEPTH {
        let span = ctx.arena().span(index);
        ctx.warning(
            span,
            codes::UNSUPPORTED_CONSTRUCT,
            &["type nesting deeper than the supported limit"],
        );
        return Ok(TypeNode::Unknown);
    }
    ctx.depth += 1;
    let result = normalize_inner(ctx, index);
    ctx.depth -= 1;
    result
}

fn normalize_inner(ctx: &mut LowerCtx<'_>, index: NodeIndex) -> LowerResult<TypeNode> {
    let arena = ctx.arena();
    let kind = arena.kind(index);
    if let Some(primitive) = primitive_of(kind) {
        return Ok(TypeNode::Primitive { name: primitive });
    }
    match kind {
        SyntaxKind::TypeReference => normalize_reference(ctx, index),
        SyntaxKind::UnionType | SyntaxKind::IntersectionType => normalize_composite(ctx, index),
        SyntaxKind::ArrayType => {
            let Some(data) = arena.get_array_type(index) else {
                return Ok(TypeNode::Unknown);
            };
            let element = normalize_type(ctx, data.element_type)?;
            Ok(TypeNode::Array {
                element: Box::new(element),
            })
        }
        SyntaxKind::TupleType => normalize_tuple(ctx, index),
        SyntaxKind::FunctionType | SyntaxKind::ConstructorType => {
            let Some(data) = arena.get_function_type(index) else {
                return Ok(TypeNode::Unknown);
            };
            let generic_params = enter_generics(ctx, &data.type_parameters)?;
            let parameters = lower_parameters(ctx, &data.parameters)?;
            let return_type = normalize_type(ctx, data.return_type)?;
            leave_generics(ctx);
            Ok(TypeNode::Function {
                generic_params,
                parameters,
                return_type: Some(Box::new(return_type)),
                is_constructor: kind == SyntaxKind::ConstructorType,
            })
        }
        SyntaxKind::TypeQuery => {
            let Some(data) = arena.get_type_query(index) else {
                return Ok(TypeNode::Unknown);
            };
            let Some(text) = arena.entity_name_text(data.expr_name) else {
                return Ok(TypeNode::Unknown);
            };
            let target = resolve_value_entity(ctx, &text, arena.span(index))?;
            Ok(TypeNode::TypeQuery { target })
        }
        SyntaxKind::TypeLiteral => {
            let Some(data) = arena.get_type_literal(index) else {
                return Ok(TypeNode::Unknown);
            };
            let own = members::lower_member_nodes(ctx, &data.members)?;
            Ok(TypeNode::ObjectLiteral {
                members: own.members,
            })
        }
        SyntaxKind::MappedType => normalize_mapped(ctx, index),
        SyntaxKind::ConditionalType => normalize_conditional(ctx, index),
        SyntaxKind::InferType => {
            let Some(data) = arena.get_infer_type(index) else {
                return Ok(TypeNode::Unknown);
            };
            let name = arena
                .get_type_parameter(data.type_parameter)
                .and_then(|parameter| arena.identifier_text(parameter.name))
                .unwrap_or("")
                .to_string();
            ctx.register_infer(&name);
            Ok(TypeNode::Infer { name })
        }
        SyntaxKind::TypeOperator => {
            let Some(data) = arena.get_type_operator(index) else {
                return Ok(TypeNode::Unknown);
            };
            let operator = match data.operator {
                SyntaxKind::KeyOfKeyword => TypeOperatorKind::KeyOf,
                SyntaxKind::ReadonlyKeyword => TypeOperatorKind::Readonly,
                _ => return Ok(TypeNode::Unknown),
            };
            let operand = normalize_type(ctx, data.type_node)?;
            Ok(TypeNode::Operator {
                operator,
                operand: Box::new(operand),
            })
        }
        SyntaxKind::IndexedAccessType => {
            let Some(data) = arena.get_indexed_access_type(index) else {
                return Ok(TypeNode::Unknown);
            };
            let object = normalize_type(ctx, data.object_type)?;
            let index_type = normalize_type(ctx, data.index_type)?;
            Ok(TypeNode::IndexedAccess {
                object: Box::new(object),
                index: Box::new(index_type),
            })
        }
        SyntaxKind::LiteralType => match literal_value_of(arena, index) {
            Some(value) => Ok(TypeNode::Literal { value }),
            None => {
                let span = arena.span(index);
                ctx.warning(span, codes::UNSUPPORTED_CONSTRUCT, &["literal type"]);
                Ok(TypeNode::Unknown)
            }
        },
        SyntaxKind::ParenthesizedType
        | SyntaxKind::OptionalType
        | SyntaxKind::RestType => match arena.get_wrapped_type(index) {
            Some(data) => normalize_type(ctx, data.type_node),
            None => Ok(TypeNode::Unknown),
        },
        _ => Ok(TypeNode::Unknown),
    }
}

fn primitive_of(kind: SyntaxKind) -> Option<PrimitiveKind> {
    match kind {
        SyntaxKind::AnyKeyword => Some(PrimitiveKind::Any),
        SyntaxKind::BigIntKeyword => Some(PrimitiveKind::BigInt),
        SyntaxKind::BooleanKeyword => Some(PrimitiveKind::Boolean),
        SyntaxKind::NeverKeyword => Some(PrimitiveKind::Never),
        SyntaxKind::NullKeyword => Some(PrimitiveKind::Null),
        SyntaxKind::NumberKeyword => Some(PrimitiveKind::Number),
        SyntaxKind::ObjectKeyword => Some(PrimitiveKind::Object),
        SyntaxKind::StringKeyword => Some(PrimitiveKind::String),
        SyntaxKind::SymbolKeyword => Some(PrimitiveKind::Symbol),
        SyntaxKind::UndefinedKeyword => Some(PrimitiveKind::Undefined),
        SyntaxKind::UnknownKeyword => Some(PrimitiveKind::Unknown),
        SyntaxKind::VoidKeyword => Some(PrimitiveKind::Void),
        _ => None,
    }
}

fn normalize_reference(ctx: &mut LowerCtx<'_>, index: NodeIndex) -> LowerResult<TypeNode> {
    let arena = ctx.arena();
    let Some(data) = arena.get_type_ref(index) else {
        return Ok(TypeNode::Unknown);
    };
    let Some(text) = arena.entity_name_text(data.type_name) else {
        return Ok(TypeNode::Unknown);
    };
    let mut arguments = Vec::new();
    if let Some(list) = &data.type_arguments {
        for &argument in list {
            arguments.push(normalize_type(ctx, argument)?);
        }
    }
    // `Array<T>` and `ReadonlyArray<T>` collapse into the array form.
    if matches!(text.as_str(), "Array" | "ReadonlyArray") && arguments.len() == 1 {
        if let Some(element) = arguments.pop() {
            return Ok(TypeNode::Array {
                element: Box::new(element),
            });
        }
    }
    let span = arena.span(index);
    let name = match resolve_type_entity(ctx, &text, span)? {
        ResolvedEntity::GenericParam(name) | ResolvedEntity::Builtin(name) => name,
        ResolvedEntity::Declared { qualified, .. } => qualified,
    };
    Ok(TypeNode::Reference {
        name,
        type_arguments: arguments,
    })
}

/// Flatten nested composites of the same kind and drop structural
/// duplicates, keeping first-occurrence order. A composite left with one
/// member collapses to that member.
fn normalize_composite(ctx: &mut LowerCtx<'_>, index: NodeIndex) -> LowerResult<TypeNode> {
    let arena = ctx.arena();
    let kind = arena.kind(index);
    let Some(data) = arena.get_composite_type(index) else {
        return Ok(TypeNode::Unknown);
    };
    let mut members: Vec<TypeNode> = Vec::new();
    for &entry in &data.types {
        let normalized = normalize_type(ctx, entry)?;
        let nested = match (kind, normalized) {
            (SyntaxKind::UnionType, TypeNode::Union { members }) => members,
            (SyntaxKind::IntersectionType, TypeNode::Intersection { members }) => members,
            (_, other) => vec![other],
        };
        for member in nested {
            if !members.contains(&member) {
                members.push(member);
            }
        }
    }
    if members.len() == 1 {
        if let Some(only) = members.pop() {
            return Ok(only);
        }
    }
    Ok(if kind == SyntaxKind::UnionType {
        TypeNode::Union { members }
    } else {
        TypeNode::Intersection { members }
    })
}

fn normalize_tuple(ctx: &mut LowerCtx<'_>, index: NodeIndex) -> LowerResult<TypeNode> {
    let arena = ctx.arena();
    let Some(data) = arena.get_tuple_type(index) else {
        return Ok(TypeNode::Unknown);
    };
    let mut elements = Vec::new();
    let mut saw_optional = false;
    let mut saw_rest = false;
    for &entry in &data.elements {
        let span = arena.span(entry);
        if saw_rest {
            return Err(ctx.fatal(span, codes::TUPLE_REST_NOT_LAST, &[]));
        }
        match arena.kind(entry) {
            SyntaxKind::RestType => {
                let Some(wrapped) = arena.get_wrapped_type(entry) else {
                    continue;
                };
                let inner = normalize_type(ctx, wrapped.type_node)?;
                // `...T[]` spreads elements of T; record the element type.
                let element_type = match inner {
                    TypeNode::Array { element } => *element,
                    other => other,
                };
                elements.push(TupleElement {
                    element_type,
                    optional: false,
                    rest: true,
                });
                saw_rest = true;
            }
            SyntaxKind::OptionalType => {
                let Some(wrapped) = arena.get_wrapped_type(entry) else {
                    continue;
                };
                elements.push(TupleElement {
                    element_type: normalize_type(ctx, wrapped.type_node)?,
                    optional: true,
                    rest: false,
                });
                saw_optional = true;
            }
            _ => {
                if saw_optional {
                    return Err(ctx.fatal(span, codes::TUPLE_REQUIRED_AFTER_OPTIONAL, &[]));
                }
                elements.push(TupleElement {
                    element_type: normalize_type(ctx, entry)?,
                    optional: false,
                    rest: false,
                });
            }
        }
    }
    Ok(TypeNode::Tuple { elements })
}

fn normalize_mapped(ctx: &mut LowerCtx<'_>, index: NodeIndex) -> LowerResult<TypeNode> {
    let arena = ctx.arena();
    let Some(data) = arena.get_mapped_type(index) else {
        return Ok(TypeNode::Unknown);
    };
    let Some(parameter) = arena.get_type_parameter(data.type_parameter) else {
        return Ok(TypeNode::Unknown);
    };
    let key_name = arena
        .identifier_text(parameter.name)
        .unwrap_or("K")
        .to_string();
    // The key constraint is resolved outside the key's own scope.
    let key_source = normalize_type(ctx, parameter.constraint)?;
    let mut scope = FxHashSet::default();
    scope.insert(key_name.clone());
    ctx.push_scope(scope);
    let value = if data.type_node.is_some() {
        normalize_type(ctx, data.type_node)?
    } else {
        TypeNode::Unknown
    };
    ctx.pop_scope();
    Ok(TypeNode::Mapped {
        key_name,
        key_source: Box::new(key_source),
        value: Box::new(value),
        readonly: data.readonly_token,
        optional: data.question_token,
    })
}

fn normalize_conditional(ctx: &mut LowerCtx<'_>, index: NodeIndex) -> LowerResult<TypeNode> {
    let arena = ctx.arena();
    let Some(data) = arena.get_conditional_type(index) else {
        return Ok(TypeNode::Unknown);
    };
    let check = normalize_type(ctx, data.check_type)?;
    // `infer` names bound in the extends clause are visible in the true
    // branch only.
    ctx.push_scope(FxHashSet::default());
    let extends = normalize_type(ctx, data.extends_type)?;
    let true_type = normalize_type(ctx, data.true_type)?;
    ctx.pop_scope();
    let false_type = normalize_type(ctx, data.false_type)?;
    Ok(TypeNode::Conditional {
        check: Box::new(check),
        extends: Box::new(extends),
        true_type: Box::new(true_type),
        false_type: Box::new(false_type),
    })
}

// =============================================================================
// Generic Parameters and Parameter Lists
// =============================================================================

/// Push a scope holding every parameter name, then normalize constraints
/// and defaults inside it so parameters can refer to each other.
pub(crate) fn enter_generics(
    ctx: &mut LowerCtx<'_>,
    list: &Option<NodeList>,
) -> LowerResult<Vec<GenericParam>> {
    let arena = ctx.arena();
    let mut names: FxHashSet<String> = FxHashSet::default();
    let mut parameters = Vec::new();
    if let Some(list) = list {
        for &entry in list {
            let Some(parameter) = arena.get_type_parameter(entry) else {
                continue;
            };
            if let Some(name) = arena.identifier_text(parameter.name) {
                names.insert(name.to_string());
            }
            parameters.push(parameter);
        }
    }
    ctx.push_scope(names);
    let mut params = Vec::new();
    for parameter in parameters {
        let name = arena
            .identifier_text(parameter.name)
            .unwrap_or("")
            .to_string();
        params.push(GenericParam {
            name,
            constraint: normalize_opt(ctx, parameter.constraint)?,
            default: normalize_opt(ctx, parameter.default)?,
        });
    }
    Ok(params)
}

pub(crate) fn leave_generics(ctx: &mut LowerCtx<'_>) {
    ctx.pop_scope();
}

pub(crate) fn lower_parameters(
    ctx: &mut LowerCtx<'_>,
    list: &[NodeIndex],
) -> LowerResult<Vec<Param>> {
    let arena = ctx.arena();
    let mut params = Vec::new();
    for &entry in list {
        let Some(data) = arena.get_parameter(entry) else {
            continue;
        };
        let name = arena.name_text(data.name).unwrap_or("_").to_string();
        params.push(Param {
            name,
            param_type: normalize_opt(ctx, data.type_annotation)?,
            optional: data.question_token,
            rest: data.dot_dot_dot_token,
        });
    }
    Ok(params)
}

// =============================================================================
// Literal Values
// =============================================================================

/// Cook a `LiteralType` node into a value. `None` when the literal is not
/// representable.
pub(crate) fn literal_value_of(arena: &SyntaxArena, index: NodeIndex) -> Option<LiteralValue> {
    let data = arena.get_literal_type(index)?;
    match arena.kind(data.literal) {
        SyntaxKind::StringLiteral => {
            let text = &arena.get_literal(data.literal)?.text;
            Some(LiteralValue::String(text.clone()))
        }
        SyntaxKind::NumericLiteral => {
            let text = &arena.get_literal(data.literal)?.text;
            numeric_literal(text, data.negative)
        }
        SyntaxKind::TrueKeyword => Some(LiteralValue::Boolean(true)),
        SyntaxKind::FalseKeyword => Some(LiteralValue::Boolean(false)),
        SyntaxKind::NullKeyword => Some(LiteralValue::Null),
        _ => None,
    }
}

/// Raw initializer text preserved for expressions the scanner does not
/// cook into literals.
pub(crate) fn opaque_text(arena: &SyntaxArena, index: NodeIndex) -> Option<String> {
    arena
        .get_computed_name(index)
        .map(|data| data.expression_text.clone())
}

/// Integer values keep their base kind; anything with a decimal point or
/// exponent, and integers past the `i64` range, become floats.
fn numeric_literal(text: &str, negative: bool) -> Option<LiteralValue> {
    let radix_prefixes: [(&str, u32); 6] = [
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ];
    let mut value = None;
    for (prefix, radix) in radix_prefixes {
        if let Some(digits) = text.strip_prefix(prefix) {
            value = i64::from_str_radix(digits, radix)
                .ok()
                .map(LiteralValue::Integer);
            break;
        }
    }
    if value.is_none() && !text.contains(['.', 'e', 'E']) {
        value = text.parse::<i64>().ok().map(LiteralValue::Integer);
    }
    if value.is_none() {
        value = text.parse::<f64>().ok().map(LiteralValue::Float);
    }
    match (value, negative) {
        (Some(LiteralValue::Integer(int)), true) => Some(LiteralValue::Integer(-int)),
        (Some(LiteralValue::Float(float)), true) => Some(LiteralValue::Float(-float)),
        (other, _) => other,
    }
}
