//! Member resolution for interfaces, classes and object type literals.
//!
//! Member lists arrive concatenated across merged declarations of one name.
//! Overloads of a method group into a single member whose signatures keep
//! declaration order; a trailing bodied signature of a group is split off as
//! the implementation. Heritage clauses fold base members in after own
//! members, tagging each with the qualified name it came from.

use crate::context::{Frame, LowerCtx, LowerResult};
use crate::normalize::{
    self, enter_generics, leave_generics, lower_parameters, normalize_opt, normalize_type,
    resolve_type_entity, ResolvedEntity,
};
use declc_binder::{DeclKind, Declaration};
use declc_common::{codes, limits, Span};
use declc_model::{
    Member, MemberKind, MemberVisibility, PrimitiveKind, ShapeDef, Signature, TypeNode,
};
use declc_syntax::{ModifierFlags, NodeIndex, NodeList, SyntaxArena, SyntaxKind};
use std::mem;

/// Resolved members of one shape, before inheritance.
pub(crate) struct OwnMembers {
    pub members: Vec<Member>,
    pub constructors: Vec<Signature>,
    pub constructor_implementation: Option<Signature>,
    pub constructor_visibility: MemberVisibility,
}

/// A member being assembled, with overload bookkeeping the final
/// [`Member`] does not carry.
struct Working {
    member: Member,
    signatures: Vec<(Signature, bool)>,
    has_getter: bool,
    has_setter: bool,
}

pub(crate) fn lower_member_nodes(
    ctx: &mut LowerCtx<'_>,
    nodes: &[NodeIndex],
) -> LowerResult<OwnMembers> {
    let arena = ctx.arena();
    let mut working: Vec<Working> = Vec::new();
    let mut constructors: Vec<(Signature, bool)> = Vec::new();
    let mut constructor_visibility = MemberVisibility::Public;
    for &node in nodes {
        match arena.kind(node) {
            SyntaxKind::PropertySignature => lower_property(ctx, node, &mut working)?,
            SyntaxKind::MethodSignature => lower_method(ctx, node, &mut working)?,
            SyntaxKind::CallSignature => {
                lower_unnamed(ctx, node, MemberKind::CallSignature, &mut working)?;
            }
            SyntaxKind::ConstructSignature => {
                lower_unnamed(ctx, node, MemberKind::ConstructSignature, &mut working)?;
            }
            SyntaxKind::IndexSignature => lower_index(ctx, node, &mut working)?,
            SyntaxKind::Constructor => {
                let Some(data) = arena.get_constructor(node) else {
                    continue;
                };
                let flags = arena.modifier_flags(&data.modifiers);
                if constructors.is_empty() {
                    if flags.contains(ModifierFlags::PRIVATE) {
                        constructor_visibility = MemberVisibility::Private;
                    } else if flags.contains(ModifierFlags::PROTECTED) {
                        constructor_visibility = MemberVisibility::Protected;
                    }
                }
                let signature = Signature {
                    generic_params: Vec::new(),
                    parameters: lower_parameters(ctx, &data.parameters)?,
                    return_type: None,
                };
                constructors.push((signature, data.has_body));
            }
            SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                lower_accessor(ctx, node, &mut working)?;
            }
            _ => {}
        }
    }

    let mut result = OwnMembers {
        members: Vec::new(),
        constructors: Vec::new(),
        constructor_implementation: None,
        constructor_visibility,
    };
    for mut entry in working {
        if entry.member.kind == MemberKind::Accessor {
            entry.member.readonly = entry.has_getter && !entry.has_setter;
        }
        if !entry.signatures.is_empty() {
            let (signatures, implementation) = split_implementation(entry.signatures);
            entry.member.signatures = signatures;
            entry.member.implementation = implementation;
        }
        result.members.push(entry.member);
    }
    let (signatures, implementation) = split_implementation(constructors);
    result.constructors = signatures;
    result.constructor_implementation = implementation;
    Ok(result)
}

/// A trailing bodied signature of a group of two or more is the
/// implementation; it is excluded from the declared signatures.
pub(crate) fn split_implementation(
    mut signatures: Vec<(Signature, bool)>,
) -> (Vec<Signature>, Option<Signature>) {
    let mut implementation = None;
    if signatures.len() >= 2 && signatures.last().is_some_and(|(_, has_body)| *has_body) {
        implementation = signatures.pop().map(|(signature, _)| signature);
    }
    let declared = signatures
        .into_iter()
        .map(|(signature, _)| signature)
        .collect();
    (declared, implementation)
}

fn lower_property(
    ctx: &mut LowerCtx<'_>,
    node: NodeIndex,
    working: &mut Vec<Working>,
) -> LowerResult<()> {
    let arena = ctx.arena();
    let Some(data) = arena.get_signature(node) else {
        return Ok(());
    };
    let Some(name) = member_name(ctx, node, data.name) else {
        return Ok(());
    };
    let mut member = Member::new(name, MemberKind::Property);
    apply_flags(&mut member, arena.modifier_flags(&data.modifiers));
    member.optional = data.question_token;
    member.value_type = normalize_opt(ctx, data.type_annotation)?;
    member.value = normalize::literal_value_of(arena, data.initializer);
    member.documentation = ctx.doc_of(node);
    member.annotations = ctx.annotations_of(node);
    insert_single(ctx, working, member, arena.span(node));
    Ok(())
}

fn lower_method(
    ctx: &mut LowerCtx<'_>,
    node: NodeIndex,
    working: &mut Vec<Working>,
) -> LowerResult<()> {
    let arena = ctx.arena();
    let Some(data) = arena.get_signature(node) else {
        return Ok(());
    };
    let Some(name) = member_name(ctx, node, data.name) else {
        return Ok(());
    };
    let flags = arena.modifier_flags(&data.modifiers);
    let generic_params = enter_generics(ctx, &data.type_parameters)?;
    let parameters = match &data.parameters {
        Some(list) => lower_parameters(ctx, list)?,
        None => Vec::new(),
    };
    let return_type = normalize_opt(ctx, data.type_annotation)?;
    leave_generics(ctx);
    let signature = Signature {
        generic_params,
        parameters,
        return_type,
    };

    let mut member = Member::new(name, MemberKind::Method);
    member.is_static = flags.contains(ModifierFlags::STATIC);
    if let Some(position) = find_member(working, &member) {
        working[position].signatures.push((signature, data.has_body));
        return Ok(());
    }
    apply_flags(&mut member, flags);
    member.optional = data.question_token;
    member.documentation = ctx.doc_of(node);
    member.annotations = ctx.annotations_of(node);
    working.push(Working {
        member,
        signatures: vec![(signature, data.has_body)],
        has_getter: false,
        has_setter: false,
    });
    Ok(())
}

/// Call and construct signatures: nameless members grouped by kind.
fn lower_unnamed(
    ctx: &mut LowerCtx<'_>,
    node: NodeIndex,
    kind: MemberKind,
    working: &mut Vec<Working>,
) -> LowerResult<()> {
    let arena = ctx.arena();
    let Some(data) = arena.get_signature(node) else {
        return Ok(());
    };
    let generic_params = enter_generics(ctx, &data.type_parameters)?;
    let parameters = match &data.parameters {
        Some(list) => lower_parameters(ctx, list)?,
        None => Vec::new(),
    };
    let return_type = normalize_opt(ctx, data.type_annotation)?;
    leave_generics(ctx);
    let signature = Signature {
        generic_params,
        parameters,
        return_type,
    };

    let member = Member::new(String::new(), kind);
    if let Some(position) = find_member(working, &member) {
        working[position].signatures.push((signature, data.has_body));
        return Ok(());
    }
    let mut member = member;
    member.documentation = ctx.doc_of(node);
    working.push(Working {
        member,
        signatures: vec![(signature, data.has_body)],
        has_getter: false,
        has_setter: false,
    });
    Ok(())
}

fn lower_index(
    ctx: &mut LowerCtx<'_>,
    node: NodeIndex,
    working: &mut Vec<Working>,
) -> LowerResult<()> {
    let arena = ctx.arena();
    let Some(data) = arena.get_index_signature(node) else {
        return Ok(());
    };
    let Some(parameter) = arena.get_parameter(data.parameter) else {
        return Ok(());
    };
    let key_type = normalize_opt(ctx, parameter.type_annotation)?;
    let key_class = match &key_type {
        Some(TypeNode::Primitive {
            name: PrimitiveKind::String,
        }) => "string",
        Some(TypeNode::Primitive {
            name: PrimitiveKind::Number,
        }) => "numeric",
        _ => {
            ctx.warning(
                arena.span(node),
                codes::UNSUPPORTED_CONSTRUCT,
                &["index signature key that is neither string nor number"],
            );
            return Ok(());
        }
    };
    let mut member = Member::new(String::new(), MemberKind::IndexSignature);
    apply_flags(&mut member, arena.modifier_flags(&data.modifiers));
    member.key_type = key_type;
    member.value_type = normalize_opt(ctx, data.type_annotation)?;
    member.documentation = ctx.doc_of(node);
    if find_member(working, &member).is_some() {
        return Err(ctx.fatal(
            arena.span(node),
            codes::DUPLICATE_INDEX_SIGNATURE,
            &[key_class],
        ));
    }
    working.push(Working {
        member,
        signatures: Vec::new(),
        has_getter: false,
        has_setter: false,
    });
    Ok(())
}

/// Get and set accessors of one name fold into a single member. The getter
/// return type wins over the setter parameter type; a getter without a
/// setter marks the member readonly.
fn lower_accessor(
    ctx: &mut LowerCtx<'_>,
    node: NodeIndex,
    working: &mut Vec<Working>,
) -> LowerResult<()> {
    let arena = ctx.arena();
    let kind = arena.kind(node);
    let Some(data) = arena.get_accessor(node) else {
        return Ok(());
    };
    let Some(name) = member_name(ctx, node, data.name) else {
        return Ok(());
    };
    let is_getter = kind == SyntaxKind::GetAccessor;
    let annotation = if is_getter {
        data.type_annotation
    } else {
        data.parameters
            .first()
            .and_then(|&parameter| arena.get_parameter(parameter))
            .map_or(NodeIndex::NONE, |parameter| parameter.type_annotation)
    };
    let flags = arena.modifier_flags(&data.modifiers);
    let accessor_type = normalize_opt(ctx, annotation)?;

    let mut member = Member::new(name, MemberKind::Accessor);
    member.is_static = flags.contains(ModifierFlags::STATIC);
    if let Some(position) = find_member(working, &member) {
        let entry = &mut working[position];
        if is_getter {
            entry.has_getter = true;
            if accessor_type.is_some() {
                entry.member.value_type = accessor_type;
            }
        } else {
            entry.has_setter = true;
            if entry.member.value_type.is_none() {
                entry.member.value_type = accessor_type;
            }
        }
        return Ok(());
    }
    apply_flags(&mut member, flags);
    member.value_type = accessor_type;
    member.documentation = ctx.doc_of(node);
    member.annotations = ctx.annotations_of(node);
    working.push(Working {
        member,
        signatures: Vec::new(),
        has_getter: is_getter,
        has_setter: !is_getter,
    });
    Ok(())
}

/// `None` skips the member; computed property names warn first.
fn member_name(ctx: &mut LowerCtx<'_>, node: NodeIndex, name: NodeIndex) -> Option<String> {
    let arena = ctx.arena();
    if arena.kind(name) == SyntaxKind::ComputedPropertyName {
        let text = arena
            .get_computed_name(name)
            .map(|data| data.expression_text.clone())
            .unwrap_or_default();
        let detail = format!("computed property name '{text}'");
        ctx.warning(
            arena.span(node),
            codes::UNSUPPORTED_CONSTRUCT,
            &[detail.as_str()],
        );
        return None;
    }
    arena.name_text(name).map(str::to_string)
}

/// Insert a non-grouping member, keeping the first of exact duplicates and
/// warning when a redeclaration disagrees.
fn insert_single(ctx: &mut LowerCtx<'_>, working: &mut Vec<Working>, member: Member, span: Span) {
    if let Some(position) = find_member(working, &member) {
        if !same_shape(&working[position].member, &member) {
            let detail = format!("duplicate declaration of member '{}'", member.name);
            ctx.warning(span, codes::UNSUPPORTED_CONSTRUCT, &[detail.as_str()]);
        }
        return;
    }
    working.push(Working {
        member,
        signatures: Vec::new(),
        has_getter: false,
        has_setter: false,
    });
}

fn find_member(working: &[Working], candidate: &Member) -> Option<usize> {
    working.iter().position(|entry| {
        entry.member.name == candidate.name
            && entry.member.kind == candidate.kind
            && entry.member.is_static == candidate.is_static
            && index_class(&entry.member) == index_class(candidate)
    })
}

/// Index signatures of the same key class collide; string and numeric ones
/// coexist.
fn index_class(member: &Member) -> u8 {
    match &member.key_type {
        Some(TypeNode::Primitive {
            name: PrimitiveKind::String,
        }) => 1,
        Some(TypeNode::Primitive {
            name: PrimitiveKind::Number,
        }) => 2,
        _ => 0,
    }
}

/// Structural comparison ignoring provenance and documentation.
fn same_shape(a: &Member, b: &Member) -> bool {
    let strip = |member: &Member| {
        let mut copy = member.clone();
        copy.inherited_from = None;
        copy.documentation = None;
        copy.annotations = Vec::new();
        copy
    };
    strip(a) == strip(b)
}

fn apply_flags(member: &mut Member, flags: ModifierFlags) {
    member.is_static = flags.contains(ModifierFlags::STATIC);
    member.readonly = flags.contains(ModifierFlags::READONLY);
    member.is_abstract = flags.contains(ModifierFlags::ABSTRACT);
    member.visibility = if flags.contains(ModifierFlags::PRIVATE) {
        MemberVisibility::Private
    } else if flags.contains(ModifierFlags::PROTECTED) {
        MemberVisibility::Protected
    } else {
        MemberVisibility::Public
    };
}

// =============================================================================
// Shapes and Inheritance
// =============================================================================

/// Resolve the full member set of an interface or class, inherited members
/// included. Results are memoized per declaration; the active resolution
/// path is tracked to turn cycles into diagnostics.
pub(crate) fn shape_def<'a>(
    ctx: &mut LowerCtx<'a>,
    unit: usize,
    qualified: &str,
    decl: &'a Declaration,
) -> LowerResult<ShapeDef> {
    let key = (unit, qualified.to_string());
    if let Some(cached) = ctx.shape_memo.get(&key) {
        return Ok(cached.clone());
    }
    if ctx.shape_stack.contains(&key) {
        return Err(ctx.fatal(decl.span, codes::INHERITANCE_CYCLE, &[qualified]));
    }
    if ctx.shape_stack.len() >= limits::MAX_INHERITANCE_DEPTH as usize {
        ctx.warning(
            decl.span,
            codes::UNSUPPORTED_CONSTRUCT,
            &["inheritance deeper than the supported limit"],
        );
        return Ok(ShapeDef::default());
    }
    ctx.shape_stack.push(key.clone());

    // The shape resolves inside its own container path, with fresh type
    // scopes. Everything is restored afterwards so a base lookup does not
    // disturb the caller.
    let fallback = vec![Frame {
        unit,
        prefix: String::new(),
        container: &ctx.global.unit(unit).root,
    }];
    let new_frames = frames_for(ctx, unit, qualified).unwrap_or(fallback);
    let saved_frames = mem::replace(&mut ctx.frames, new_frames);
    let saved_scopes = mem::take(&mut ctx.scopes);
    let saved_depth = mem::take(&mut ctx.depth);

    let result = shape_def_inner(ctx, decl);

    ctx.frames = saved_frames;
    ctx.scopes = saved_scopes;
    ctx.depth = saved_depth;
    ctx.shape_stack.pop();
    if let Ok(def) = &result {
        ctx.shape_memo.insert(key, def.clone());
    }
    result
}

/// Frames for resolving inside `qualified`'s parent path, outermost first.
fn frames_for<'a>(ctx: &LowerCtx<'a>, unit: usize, qualified: &str) -> Option<Vec<Frame<'a>>> {
    let bindings = ctx.global.unit(unit);
    let mut frames = vec![Frame {
        unit,
        prefix: String::new(),
        container: &bindings.root,
    }];
    let segments: Vec<&str> = qualified.split('.').collect();
    let mut container = &bindings.root;
    let mut prefix = String::new();
    for &segment in &segments[..segments.len().saturating_sub(1)] {
        let decl = container.get(segment)?;
        let inner = decl.inner.as_ref()?;
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(segment);
        frames.push(Frame {
            unit,
            prefix: prefix.clone(),
            container: inner,
        });
        container = inner;
    }
    Some(frames)
}

fn shape_def_inner<'a>(ctx: &mut LowerCtx<'a>, decl: &'a Declaration) -> LowerResult<ShapeDef> {
    let arena = ctx.arena();
    let mut def = ShapeDef::default();

    let type_parameters = decl
        .nodes
        .iter()
        .find_map(|&node| shape_parts(arena, node).and_then(|parts| parts.type_parameters.clone()));
    def.generic_params = enter_generics(ctx, &type_parameters)?;
    for &node in &decl.nodes {
        if let Some(parts) = shape_parts(arena, node) {
            if arena
                .modifier_flags(parts.modifiers)
                .contains(ModifierFlags::ABSTRACT)
            {
                def.is_abstract = true;
            }
        }
    }

    let mut extend_bases: Vec<(usize, String, &'a Declaration)> = Vec::new();
    let mut implement_bases: Vec<(usize, String, &'a Declaration)> = Vec::new();
    for &node in &decl.nodes {
        let Some(parts) = shape_parts(arena, node) else {
            continue;
        };
        let Some(clauses) = parts.heritage_clauses else {
            continue;
        };
        for &clause in clauses {
            let Some(heritage) = arena.get_heritage_clause(clause) else {
                continue;
            };
            let extends = heritage.token == SyntaxKind::ExtendsKeyword;
            for &type_node in &heritage.types {
                let (reference, base) = heritage_reference(ctx, type_node)?;
                if extends {
                    def.extends.push(reference);
                    extend_bases.extend(base);
                } else {
                    def.implements.push(reference);
                    implement_bases.extend(base);
                }
            }
        }
    }

    let mut member_nodes: Vec<NodeIndex> = Vec::new();
    for &node in &decl.nodes {
        if let Some(parts) = shape_parts(arena, node) {
            member_nodes.extend(parts.members.iter().copied());
        }
    }
    let own = lower_member_nodes(ctx, &member_nodes)?;
    def.members = own.members;
    def.constructors = own.constructors;
    def.constructor_implementation = own.constructor_implementation;
    def.constructor_visibility = own.constructor_visibility;

    // Base members merge in declared order, extends clauses before
    // implements clauses. A base in another unit resolves quietly; its own
    // lowering reports for it.
    for (base_unit, base_qualified, base_decl) in extend_bases.into_iter().chain(implement_bases) {
        let foreign = base_unit != ctx.unit_index;
        if foreign {
            ctx.silence();
        }
        let base_result = shape_def(ctx, base_unit, &base_qualified, base_decl);
        if foreign {
            ctx.unsilence();
        }
        match base_result {
            Ok(base) => {
                merge_inherited(ctx, &mut def.members, &base.members, &base_qualified, decl.span);
            }
            Err(fatal) => {
                if !foreign {
                    return Err(fatal);
                }
                let detail = format!("could not resolve base type '{base_qualified}'");
                ctx.warning(decl.span, codes::UNSUPPORTED_CONSTRUCT, &[detail.as_str()]);
            }
        }
    }

    leave_generics(ctx);
    Ok(def)
}

struct ShapeParts<'x> {
    type_parameters: &'x Option<NodeList>,
    heritage_clauses: &'x Option<NodeList>,
    members: &'x NodeList,
    modifiers: &'x Option<NodeList>,
}

fn shape_parts(arena: &SyntaxArena, node: NodeIndex) -> Option<ShapeParts<'_>> {
    if let Some(data) = arena.get_interface(node) {
        return Some(ShapeParts {
            type_parameters: &data.type_parameters,
            heritage_clauses: &data.heritage_clauses,
            members: &data.members,
            modifiers: &data.modifiers,
        });
    }
    arena.get_class(node).map(|data| ShapeParts {
        type_parameters: &data.type_parameters,
        heritage_clauses: &data.heritage_clauses,
        members: &data.members,
        modifiers: &data.modifiers,
    })
}

/// Normalize one heritage type. The second value names the base declaration
/// when it is an interface or class whose members can merge in.
fn heritage_reference<'a>(
    ctx: &mut LowerCtx<'a>,
    node: NodeIndex,
) -> LowerResult<(TypeNode, Option<(usize, String, &'a Declaration)>)> {
    let arena = ctx.arena();
    let Some(data) = arena.get_type_ref(node) else {
        return Ok((normalize_type(ctx, node)?, None));
    };
    let Some(text) = arena.entity_name_text(data.type_name) else {
        return Ok((TypeNode::Unknown, None));
    };
    let mut arguments = Vec::new();
    if let Some(list) = &data.type_arguments {
        for &argument in list {
            arguments.push(normalize_type(ctx, argument)?);
        }
    }
    let span = arena.span(node);
    match resolve_type_entity(ctx, &text, span)? {
        ResolvedEntity::Declared {
            unit,
            qualified,
            decl,
        } if matches!(decl.kind, DeclKind::Interface | DeclKind::Class) => {
            let reference = TypeNode::Reference {
                name: qualified.clone(),
                type_arguments: arguments,
            };
            Ok((reference, Some((unit, qualified, decl))))
        }
        ResolvedEntity::Declared { qualified, .. } => Ok((
            TypeNode::Reference {
                name: qualified,
                type_arguments: arguments,
            },
            None,
        )),
        ResolvedEntity::GenericParam(name) | ResolvedEntity::Builtin(name) => Ok((
            TypeNode::Reference {
                name,
                type_arguments: arguments,
            },
            None,
        )),
    }
}

/// Fold base members into the derived list. Own members always win; among
/// inherited ones the first-listed ancestor wins, with a warning when a
/// later ancestor disagrees about the shape.
fn merge_inherited(
    ctx: &mut LowerCtx<'_>,
    members: &mut Vec<Member>,
    base_members: &[Member],
    base_qualified: &str,
    derived_span: Span,
) {
    for base_member in base_members {
        let position = members.iter().position(|existing| {
            existing.name == base_member.name
                && existing.kind == base_member.kind
                && existing.is_static == base_member.is_static
                && index_class(existing) == index_class(base_member)
        });
        let Some(position) = position else {
            let mut inherited = base_member.clone();
            if inherited.inherited_from.is_none() {
                inherited.inherited_from = Some(base_qualified.to_string());
            }
            members.push(inherited);
            continue;
        };
        let existing = &members[position];
        if existing.inherited_from.is_none() {
            continue;
        }
        if !same_shape(existing, base_member) {
            let provider = existing.inherited_from.clone().unwrap_or_default();
            let name = existing.name.clone();
            ctx.warning(
                derived_span,
                codes::CONFLICTING_INHERITED_MEMBER,
                &[name.as_str(), provider.as_str()],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{lower_unit, LowerOutput};
    use declc_binder::{bind_unit, GlobalTable, UnitBindings};
    use declc_model::{LiteralValue, SymbolDef};
    use declc_syntax::{parse_source_file, ParseResult};

    fn lower_all(sources: &[(&str, &str)]) -> Vec<LowerOutput> {
        let parses: Vec<ParseResult> = sources
            .iter()
            .map(|(file, text)| parse_source_file(file, text))
            .collect();
        let units: Vec<UnitBindings> = sources
            .iter()
            .zip(&parses)
            .map(|((file, _), parse)| bind_unit(file, parse))
            .collect();
        let global = GlobalTable::build(&units);
        (0..parses.len())
            .map(|index| lower_unit(index, &parses, &global))
            .collect()
    }

    fn lower_one(source: &str) -> LowerOutput {
        let mut outputs = lower_all(&[("test.d.ts", source)]);
        outputs.remove(0)
    }

    fn shape_at(output: &LowerOutput, index: usize) -> ShapeDef {
        let unit = output.unit.as_ref().expect("unit should lower");
        match &unit.symbols[index].def {
            SymbolDef::Interface(shape) | SymbolDef::Class(shape) => shape.clone(),
            other => panic!("expected a shape, got {other:?}"),
        }
    }

    #[test]
    fn extends_merges_base_members_after_own() {
        let source = "\
interface A { id: number; shared(): void; }
interface B extends A { name: string; }
";
        let output = lower_one(source);
        let shape = shape_at(&output, 1);
        let names: Vec<&str> = shape
            .members
            .iter()
            .map(|member| member.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "id", "shared"]);
        assert_eq!(shape.members[0].inherited_from, None);
        assert_eq!(shape.members[1].inherited_from, Some("A".to_string()));
        assert_eq!(shape.members[2].inherited_from, Some("A".to_string()));
    }

    #[test]
    fn own_member_overrides_inherited_silently() {
        let source = "\
interface A { value: number; }
interface B extends A { value: string; }
";
        let output = lower_one(source);
        assert!(output.diagnostics.is_empty());
        let shape = shape_at(&output, 1);
        assert_eq!(shape.members.len(), 1);
        assert_eq!(shape.members[0].inherited_from, None);
        assert_eq!(
            shape.members[0].value_type,
            Some(TypeNode::primitive(PrimitiveKind::String))
        );
    }

    #[test]
    fn conflicting_bases_warn_and_first_listed_wins() {
        let source = "\
interface Left { flag: string; }
interface Right { flag: number; }
interface Both extends Left, Right {}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 2);
        assert_eq!(shape.members.len(), 1);
        assert_eq!(shape.members[0].inherited_from, Some("Left".to_string()));
        assert_eq!(
            shape.members[0].value_type,
            Some(TypeNode::primitive(PrimitiveKind::String))
        );
        let warning = output
            .diagnostics
            .iter()
            .find(|diagnostic| diagnostic.code == codes::CONFLICTING_INHERITED_MEMBER)
            .expect("missing conflict warning");
        assert_eq!(
            warning.message_text,
            "Member 'flag' is inherited with incompatible declarations; using 'Left'."
        );
    }

    #[test]
    fn diamond_inheritance_stays_silent() {
        let source = "\
interface Root { id: string; }
interface Left extends Root {}
interface Right extends Root {}
interface Join extends Left, Right {}
";
        let output = lower_one(source);
        assert!(output.diagnostics.is_empty());
        let shape = shape_at(&output, 3);
        assert_eq!(shape.members.len(), 1);
        assert_eq!(shape.members[0].inherited_from, Some("Root".to_string()));
    }

    #[test]
    fn inheritance_cycle_is_fatal() {
        let source = "\
interface A extends B {}
interface B extends A {}
";
        let output = lower_one(source);
        assert!(output.unit.is_none());
        let diagnostic = output
            .diagnostics
            .iter()
            .find(|diagnostic| diagnostic.code == codes::INHERITANCE_CYCLE)
            .expect("missing cycle diagnostic");
        assert!(diagnostic
            .message_text
            .contains("recursively references itself"));
    }

    #[test]
    fn implements_contributes_members_like_extends() {
        let source = "\
interface Closeable { close(): void; }
class File implements Closeable { path: string; }
";
        let output = lower_one(source);
        let shape = shape_at(&output, 1);
        let names: Vec<&str> = shape
            .members
            .iter()
            .map(|member| member.name.as_str())
            .collect();
        assert_eq!(names, vec!["path", "close"]);
        assert_eq!(
            shape.members[1].inherited_from,
            Some("Closeable".to_string())
        );
        assert_eq!(shape.implements.len(), 1);
    }

    #[test]
    fn method_overloads_keep_order_and_split_implementation() {
        let source = "\
class Parser {
    parse(input: string): number;
    parse(input: number): number;
    parse(input: any): number { return 0; }
}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        let member = &shape.members[0];
        assert_eq!(member.signatures.len(), 2);
        assert!(member.implementation.is_some());
        assert_eq!(
            member.signatures[0].parameters[0].param_type,
            Some(TypeNode::primitive(PrimitiveKind::String))
        );
        assert_eq!(
            member.signatures[1].parameters[0].param_type,
            Some(TypeNode::primitive(PrimitiveKind::Number))
        );
    }

    #[test]
    fn lone_bodied_method_keeps_its_signature() {
        let source = "class Runner { run(): void {} }";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members[0].signatures.len(), 1);
        assert!(shape.members[0].implementation.is_none());
    }

    #[test]
    fn constructor_overloads_split_like_methods() {
        let source = "\
class Point {
    constructor(x: number, y: number);
    constructor(source: string);
    constructor(a: any, b?: number) {}
}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.constructors.len(), 2);
        assert!(shape.constructor_implementation.is_some());
    }

    #[test]
    fn private_constructor_visibility_is_recorded() {
        let source = "class Singleton { private constructor(); }";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.constructor_visibility, MemberVisibility::Private);
    }

    #[test]
    fn duplicate_string_index_signature_is_fatal() {
        let source = "\
interface Dict {
    [key: string]: number;
    [name: string]: number;
}
";
        let output = lower_one(source);
        assert!(output.unit.is_none());
        let diagnostic = output
            .diagnostics
            .iter()
            .find(|diagnostic| diagnostic.code == codes::DUPLICATE_INDEX_SIGNATURE)
            .expect("missing duplicate diagnostic");
        assert_eq!(diagnostic.message_text, "Duplicate string index signature.");
    }

    #[test]
    fn string_and_numeric_index_signatures_coexist() {
        let source = "\
interface Mixed {
    [key: string]: any;
    [index: number]: any;
}
";
        let output = lower_one(source);
        assert!(output.diagnostics.is_empty());
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members.len(), 2);
    }

    #[test]
    fn accessor_pair_folds_into_one_member() {
        let source = "\
class Config {
    get timeout(): number;
    set timeout(value: number);
    get name(): string;
}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members.len(), 2);
        let timeout = &shape.members[0];
        assert_eq!(timeout.kind, MemberKind::Accessor);
        assert!(!timeout.readonly);
        assert_eq!(
            timeout.value_type,
            Some(TypeNode::primitive(PrimitiveKind::Number))
        );
        let name = &shape.members[1];
        assert!(name.readonly);
    }

    #[test]
    fn class_modifiers_map_onto_member_flags() {
        let source = "\
declare abstract class Base {
    static create(): Base;
    private secret: string;
    protected inner: number;
    readonly frozen: boolean;
    abstract run(): void;
}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert!(shape.is_abstract);
        assert!(shape.members[0].is_static);
        assert_eq!(shape.members[1].visibility, MemberVisibility::Private);
        assert_eq!(shape.members[2].visibility, MemberVisibility::Protected);
        assert!(shape.members[3].readonly);
        assert!(shape.members[4].is_abstract);
    }

    #[test]
    fn property_initializer_value_is_captured() {
        let source = "declare class MathConstants { static readonly pi = 3.14159; }";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members[0].value, Some(LiteralValue::Float(3.14159)));
    }

    #[test]
    fn computed_property_names_warn_and_are_skipped() {
        let source = "\
interface Iter {
    [Symbol.iterator](): any;
    next(): any;
}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members.len(), 1);
        assert_eq!(shape.members[0].name, "next");
        assert!(output
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code == codes::UNSUPPORTED_CONSTRUCT));
    }

    #[test]
    fn reopened_interface_concatenates_members() {
        let source = "\
interface Options { a: string; }
interface Options { b: number; }
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        let names: Vec<&str> = shape
            .members
            .iter()
            .map(|member| member.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_identical_property_is_dropped_silently() {
        let source = "\
interface Options { a: string; }
interface Options { a: string; }
";
        let output = lower_one(source);
        assert!(output.diagnostics.is_empty());
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members.len(), 1);
    }

    #[test]
    fn disagreeing_duplicate_property_warns_and_keeps_first() {
        let source = "\
interface Options { a: string; }
interface Options { a: number; }
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members.len(), 1);
        assert_eq!(
            shape.members[0].value_type,
            Some(TypeNode::primitive(PrimitiveKind::String))
        );
        assert!(output
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code == codes::UNSUPPORTED_CONSTRUCT));
    }

    #[test]
    fn call_signatures_group_into_one_member() {
        let source = "\
interface Callable {
    (input: string): number;
    (input: number): number;
}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 0);
        assert_eq!(shape.members.len(), 1);
        assert_eq!(shape.members[0].kind, MemberKind::CallSignature);
        assert_eq!(shape.members[0].signatures.len(), 2);
    }

    #[test]
    fn cross_unit_base_members_merge_quietly() {
        let outputs = lower_all(&[
            ("base.d.ts", "export interface Entity { id: string; }"),
            (
                "derived.d.ts",
                "import { Entity } from \"./base\";\nexport interface User extends Entity { name: string; }",
            ),
        ]);
        assert!(outputs[1].diagnostics.is_empty());
        let shape = shape_at(&outputs[1], 0);
        let names: Vec<&str> = shape
            .members
            .iter()
            .map(|member| member.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "id"]);
        assert_eq!(shape.members[1].inherited_from, Some("Entity".to_string()));
    }

    #[test]
    fn generic_base_reference_keeps_its_arguments() {
        let source = "\
interface Container<T> { value: T; }
interface Box extends Container<string> {}
";
        let output = lower_one(source);
        let shape = shape_at(&output, 1);
        assert_eq!(
            shape.extends[0],
            TypeNode::Reference {
                name: "Container".to_string(),
                type_arguments: vec![TypeNode::primitive(PrimitiveKind::String)],
            }
        );
        // Members merge uninstantiated; the reference carries the arguments.
        assert_eq!(shape.members[0].value_type, Some(TypeNode::reference("T")));
    }
}
