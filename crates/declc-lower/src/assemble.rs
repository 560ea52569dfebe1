//! Unit assembly: walks a unit's bound declarations top to bottom, lowers
//! each into an [`IdmSymbol`], and resolves the export surface into
//! [`ExportRecord`]s.
//!
//! A fatal diagnostic aborts the unit; its diagnostics are still returned so
//! the caller can report them while excluding the unit from the document.

use crate::context::{Frame, LowerCtx, LowerResult};
use crate::normalize::{
    self, enter_generics, leave_generics, lower_parameters, normalize_opt, normalize_type,
};
use crate::{enums, members};
use declc_binder::{DeclKind, Declaration, GlobalTable, ImportKind, ModuleTarget, UnitBindings};
use declc_common::{codes, Diagnostic, Span};
use declc_model::{
    AliasDef, ConstantDef, ExportRecord, FunctionDef, IdmSymbol, IdmUnit, ModuleDef, NamespaceDef,
    Signature, SourceLocation, SymbolDef, TypeNode, Visibility,
};
use declc_syntax::{NodeIndex, ParseResult, SyntaxKind};
use rustc_hash::FxHashSet;

/// Result of lowering one unit. `unit` is `None` when a fatal diagnostic
/// aborted it.
pub struct LowerOutput {
    pub unit: Option<IdmUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lower one unit against the global declaration table.
pub fn lower_unit<'a>(
    unit_index: usize,
    parses: &'a [ParseResult],
    global: &'a GlobalTable<'a>,
) -> LowerOutput {
    let mut ctx = LowerCtx::new(unit_index, parses, global);
    let result = assemble_unit(&mut ctx);
    tracing::debug!(
        file = %global.unit(unit_index).file,
        symbols = result.as_ref().map_or(0, |unit| unit.symbols.len()),
        ok = result.is_ok(),
        "lowered unit"
    );
    LowerOutput {
        unit: result.ok(),
        diagnostics: ctx.diagnostics,
    }
}

fn assemble_unit<'a>(ctx: &mut LowerCtx<'a>) -> LowerResult<IdmUnit> {
    let bindings = ctx.bindings();
    let exported_locals: FxHashSet<String> = bindings
        .local_export_surface()
        .into_iter()
        .map(|entry| entry.local)
        .collect();

    let mut symbols = Vec::new();
    for (name, decl) in &bindings.root.declarations {
        let visibility =
            if !bindings.module_mode || decl.exported || exported_locals.contains(name) {
                Visibility::Exported
            } else {
                Visibility::Internal
            };
        symbols.push(lower_declaration(ctx, name, decl, "", visibility)?);
    }
    let exports = build_exports(ctx)?;
    Ok(IdmUnit {
        file: bindings.file.clone(),
        symbols,
        exports,
    })
}

fn lower_declaration<'a>(
    ctx: &mut LowerCtx<'a>,
    name: &str,
    decl: &'a Declaration,
    prefix: &str,
    visibility: Visibility,
) -> LowerResult<IdmSymbol> {
    let qualified = if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    };
    let first = decl.nodes.first().copied().unwrap_or(NodeIndex::NONE);
    let unit_index = ctx.unit_index;
    let def = match decl.kind {
        DeclKind::Interface => {
            SymbolDef::Interface(members::shape_def(ctx, unit_index, &qualified, decl)?)
        }
        DeclKind::Class => SymbolDef::Class(members::shape_def(ctx, unit_index, &qualified, decl)?),
        DeclKind::Enum => SymbolDef::Enum(enums::lower_enum(ctx, decl)),
        DeclKind::TypeAlias => SymbolDef::TypeAlias(lower_alias(ctx, first)?),
        DeclKind::Function => SymbolDef::Function(lower_function(ctx, decl)?),
        DeclKind::Variable => SymbolDef::Constant(lower_variable(ctx, decl, first)?),
        DeclKind::Namespace => SymbolDef::Namespace(NamespaceDef {
            members: lower_container(ctx, decl, &qualified)?,
        }),
        DeclKind::Module => {
            let shorthand = ctx
                .arena()
                .get_module(first)
                .is_some_and(|data| data.body.is_none());
            SymbolDef::Module(ModuleDef {
                shorthand,
                members: lower_container(ctx, decl, &qualified)?,
            })
        }
    };
    Ok(IdmSymbol {
        name: name.to_string(),
        qualified_name: qualified,
        visibility,
        location: Some(SourceLocation {
            file: ctx.bindings().file.clone(),
            start: decl.span.start,
            length: decl.span.len(),
        }),
        documentation: ctx.doc_of(first),
        annotations: ctx.annotations_of(first),
        def,
    })
}

fn lower_alias(ctx: &mut LowerCtx<'_>, node: NodeIndex) -> LowerResult<AliasDef> {
    let arena = ctx.arena();
    let Some(data) = arena.get_type_alias(node) else {
        return Ok(AliasDef {
            generic_params: Vec::new(),
            aliased: TypeNode::Unknown,
        });
    };
    let generic_params = enter_generics(ctx, &data.type_parameters)?;
    let aliased = normalize_type(ctx, data.type_node)?;
    leave_generics(ctx);
    Ok(AliasDef {
        generic_params,
        aliased,
    })
}

fn lower_function(ctx: &mut LowerCtx<'_>, decl: &Declaration) -> LowerResult<FunctionDef> {
    let arena = ctx.arena();
    let mut signatures: Vec<(Signature, bool)> = Vec::new();
    for &node in &decl.nodes {
        let Some(data) = arena.get_function(node) else {
            continue;
        };
        let generic_params = enter_generics(ctx, &data.type_parameters)?;
        let parameters = lower_parameters(ctx, &data.parameters)?;
        let return_type = normalize_opt(ctx, data.type_annotation)?;
        leave_generics(ctx);
        signatures.push((
            Signature {
                generic_params,
                parameters,
                return_type,
            },
            data.has_body,
        ));
    }
    let (signatures, implementation) = members::split_implementation(signatures);
    Ok(FunctionDef {
        signatures,
        implementation,
    })
}

fn lower_variable(
    ctx: &mut LowerCtx<'_>,
    decl: &Declaration,
    node: NodeIndex,
) -> LowerResult<ConstantDef> {
    let writable = decl.keyword != SyntaxKind::ConstKeyword;
    let arena = ctx.arena();
    let Some(data) = arena.get_variable_declaration(node) else {
        return Ok(ConstantDef {
            writable,
            ..ConstantDef::default()
        });
    };
    let const_type = normalize_opt(ctx, data.type_annotation)?;
    let value = normalize::literal_value_of(arena, data.initializer);
    let reference = if value.is_none() {
        normalize::opaque_text(arena, data.initializer)
    } else {
        None
    };
    Ok(ConstantDef {
        const_type,
        value,
        reference,
        writable,
    })
}

/// Lower the members of a namespace or ambient module body. A body without
/// any explicit export exposes everything; one explicit export hides the
/// rest.
fn lower_container<'a>(
    ctx: &mut LowerCtx<'a>,
    decl: &'a Declaration,
    qualified_prefix: &str,
) -> LowerResult<Vec<IdmSymbol>> {
    let Some(inner) = decl.inner.as_ref() else {
        return Ok(Vec::new());
    };
    let all_exported = !inner.any_exported();
    ctx.frames.push(Frame {
        unit: ctx.unit_index,
        prefix: qualified_prefix.to_string(),
        container: inner,
    });
    let mut members = Vec::new();
    let mut aborted = None;
    for (name, member_decl) in &inner.declarations {
        let visibility = if member_decl.exported || all_exported {
            Visibility::Exported
        } else {
            Visibility::Internal
        };
        match lower_declaration(ctx, name, member_decl, qualified_prefix, visibility) {
            Ok(symbol) => members.push(symbol),
            Err(fatal) => {
                aborted = Some(fatal);
                break;
            }
        }
    }
    ctx.frames.pop();
    match aborted {
        Some(fatal) => Err(fatal),
        None => Ok(members),
    }
}

// =============================================================================
// Export Surface
// =============================================================================

fn build_exports(ctx: &mut LowerCtx<'_>) -> LowerResult<Vec<ExportRecord>> {
    let bindings = ctx.bindings();
    let mut records: Vec<ExportRecord> = Vec::new();

    for entry in bindings.local_export_surface() {
        if bindings.root.contains(&entry.local) {
            push_record(
                &mut records,
                ExportRecord {
                    name: entry.name,
                    target: entry.local,
                    from: None,
                },
            );
            continue;
        }
        let span = alias_span(bindings, &entry.name);
        let Some(import) = bindings.imports.get(&entry.local) else {
            return Err(ctx.fatal(
                span,
                codes::UNRESOLVED_EXPORT,
                &[entry.name.as_str(), bindings.file.as_str()],
            ));
        };
        let wanted = match &import.kind {
            ImportKind::Default => "default".to_string(),
            ImportKind::Named { original } => original.clone(),
            ImportKind::Namespace => {
                let detail = format!("re-export of the namespace import '{}'", entry.local);
                ctx.warning(span, codes::UNSUPPORTED_CONSTRUCT, &[detail.as_str()]);
                continue;
            }
        };
        match ctx.global.resolve_specifier(&import.specifier) {
            Some(ModuleTarget::Unit(unit)) => {
                let mut visited = FxHashSet::default();
                match normalize::resolve_exported(ctx, unit, &wanted, &mut visited) {
                    Some((_, _, qualified)) => push_record(
                        &mut records,
                        ExportRecord {
                            name: entry.name,
                            target: qualified,
                            from: Some(import.specifier.clone()),
                        },
                    ),
                    None => {
                        return Err(ctx.fatal(
                            span,
                            codes::UNRESOLVED_EXPORT,
                            &[entry.name.as_str(), import.specifier.as_str()],
                        ));
                    }
                }
            }
            Some(ModuleTarget::Ambient(_)) => {
                if normalize::ambient_lookup(ctx, &import.specifier, &wanted).is_none() {
                    return Err(ctx.fatal(
                        span,
                        codes::UNRESOLVED_EXPORT,
                        &[entry.name.as_str(), import.specifier.as_str()],
                    ));
                }
                push_record(
                    &mut records,
                    ExportRecord {
                        name: entry.name,
                        target: format!("{}.{}", import.specifier, wanted),
                        from: Some(import.specifier.clone()),
                    },
                );
            }
            None => {
                return Err(ctx.fatal(
                    span,
                    codes::UNRESOLVED_EXPORT,
                    &[entry.name.as_str(), import.specifier.as_str()],
                ));
            }
        }
    }

    for reexport in &bindings.reexports {
        let target = ctx.global.resolve_specifier(&reexport.specifier);
        match target {
            Some(ModuleTarget::Unit(unit)) => match &reexport.names {
                Some(names) => {
                    for (original, exported) in names {
                        let mut visited = FxHashSet::default();
                        match normalize::resolve_exported(ctx, unit, original, &mut visited) {
                            Some((_, _, qualified)) => push_record(
                                &mut records,
                                ExportRecord {
                                    name: exported.clone(),
                                    target: qualified,
                                    from: Some(reexport.specifier.clone()),
                                },
                            ),
                            None => {
                                return Err(ctx.fatal(
                                    reexport.span,
                                    codes::UNRESOLVED_EXPORT,
                                    &[original.as_str(), reexport.specifier.as_str()],
                                ));
                            }
                        }
                    }
                }
                None => {
                    let mut visited = FxHashSet::default();
                    for (name, qualified) in exported_surface(ctx, unit, &mut visited) {
                        if name == "default" {
                            continue;
                        }
                        push_record(
                            &mut records,
                            ExportRecord {
                                name,
                                target: qualified,
                                from: Some(reexport.specifier.clone()),
                            },
                        );
                    }
                }
            },
            Some(ModuleTarget::Ambient(_)) => match &reexport.names {
                Some(names) => {
                    for (original, exported) in names {
                        if normalize::ambient_lookup(ctx, &reexport.specifier, original).is_none() {
                            return Err(ctx.fatal(
                                reexport.span,
                                codes::UNRESOLVED_EXPORT,
                                &[original.as_str(), reexport.specifier.as_str()],
                            ));
                        }
                        push_record(
                            &mut records,
                            ExportRecord {
                                name: exported.clone(),
                                target: format!("{}.{}", reexport.specifier, original),
                                from: Some(reexport.specifier.clone()),
                            },
                        );
                    }
                }
                None => {
                    for (name, target) in ambient_star_surface(ctx, &reexport.specifier) {
                        push_record(
                            &mut records,
                            ExportRecord {
                                name,
                                target,
                                from: Some(reexport.specifier.clone()),
                            },
                        );
                    }
                }
            },
            None => {
                let shown = reexport
                    .names
                    .as_ref()
                    .and_then(|names| names.first())
                    .map_or("*", |(original, _)| original.as_str());
                return Err(ctx.fatal(
                    reexport.span,
                    codes::UNRESOLVED_EXPORT,
                    &[shown, reexport.specifier.as_str()],
                ));
            }
        }
    }

    Ok(records)
}

fn alias_span(bindings: &UnitBindings, exported: &str) -> Span {
    bindings
        .export_aliases
        .iter()
        .find(|alias| alias.exported == exported)
        .map(|alias| alias.span)
        .or_else(|| {
            bindings
                .default_export
                .as_ref()
                .filter(|default| default.exported == exported)
                .map(|default| default.span)
        })
        .unwrap_or_else(|| Span::at(0))
}

/// The full export surface of a unit, resolved best-effort and quietly, for
/// star re-exports. `visited` guards against re-export cycles.
fn exported_surface(
    ctx: &LowerCtx<'_>,
    unit: usize,
    visited: &mut FxHashSet<usize>,
) -> Vec<(String, String)> {
    let mut surface = Vec::new();
    if !visited.insert(unit) {
        return surface;
    }
    let bindings = ctx.global.unit(unit);
    for entry in bindings.local_export_surface() {
        if bindings.root.contains(&entry.local) {
            surface.push((entry.name, entry.local));
            continue;
        }
        let Some(import) = bindings.imports.get(&entry.local) else {
            continue;
        };
        let wanted = match &import.kind {
            ImportKind::Default => "default".to_string(),
            ImportKind::Named { original } => original.clone(),
            ImportKind::Namespace => continue,
        };
        match ctx.global.resolve_specifier(&import.specifier) {
            Some(ModuleTarget::Unit(target_unit)) => {
                let mut seen = FxHashSet::default();
                if let Some((_, _, qualified)) =
                    normalize::resolve_exported(ctx, target_unit, &wanted, &mut seen)
                {
                    surface.push((entry.name, qualified));
                }
            }
            Some(ModuleTarget::Ambient(_)) => {
                if normalize::ambient_lookup(ctx, &import.specifier, &wanted).is_some() {
                    surface.push((entry.name, format!("{}.{}", import.specifier, wanted)));
                }
            }
            None => {}
        }
    }
    for reexport in &bindings.reexports {
        match ctx.global.resolve_specifier(&reexport.specifier) {
            Some(ModuleTarget::Unit(target_unit)) => match &reexport.names {
                Some(names) => {
                    for (original, exported) in names {
                        let mut seen = FxHashSet::default();
                        if let Some((_, _, qualified)) =
                            normalize::resolve_exported(ctx, target_unit, original, &mut seen)
                        {
                            surface.push((exported.clone(), qualified));
                        }
                    }
                }
                None => {
                    for (name, qualified) in exported_surface(ctx, target_unit, visited) {
                        if name != "default" {
                            surface.push((name, qualified));
                        }
                    }
                }
            },
            Some(ModuleTarget::Ambient(_)) => match &reexport.names {
                Some(names) => {
                    for (original, exported) in names {
                        if normalize::ambient_lookup(ctx, &reexport.specifier, original).is_some() {
                            surface.push((
                                exported.clone(),
                                format!("{}.{}", reexport.specifier, original),
                            ));
                        }
                    }
                }
                None => {
                    surface.extend(ambient_star_surface(ctx, &reexport.specifier));
                }
            },
            None => {}
        }
    }
    surface
}

fn ambient_star_surface(ctx: &LowerCtx<'_>, module: &str) -> Vec<(String, String)> {
    let mut surface = Vec::new();
    let Some(ModuleTarget::Ambient(units)) = ctx.global.resolve_specifier(module) else {
        return surface;
    };
    for &unit in units {
        let bindings = ctx.global.unit(unit);
        let Some(decl) = bindings.root.get(module) else {
            continue;
        };
        let Some(inner) = decl.inner.as_ref() else {
            continue;
        };
        let all_exported = !inner.any_exported();
        for (name, member) in &inner.declarations {
            if all_exported || member.exported {
                surface.push((name.clone(), format!("{module}.{name}")));
            }
        }
    }
    surface
}

/// First record of a name wins; later duplicates are dropped.
fn push_record(records: &mut Vec<ExportRecord>, record: ExportRecord) {
    if records.iter().any(|existing| existing.name == record.name) {
        return;
    }
    records.push(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use declc_binder::bind_unit;
    use declc_model::{EnumValue, LiteralValue, PrimitiveKind};
    use declc_syntax::parse_source_file;

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

    fn unit(output: &LowerOutput) -> &IdmUnit {
        output.unit.as_ref().expect("unit should lower")
    }

    #[test]
    fn nested_namespaces_produce_qualified_names() {
        let source = "\
declare namespace Outer {
    namespace Inner {
        interface Leaf { id: string; }
    }
}
";
        let output = lower_one(source);
        let symbols = &unit(&output).symbols;
        assert_eq!(symbols[0].qualified_name, "Outer");
        let SymbolDef::Namespace(outer) = &symbols[0].def else {
            panic!("expected a namespace");
        };
        let SymbolDef::Namespace(inner) = &outer.members[0].def else {
            panic!("expected a nested namespace");
        };
        assert_eq!(outer.members[0].qualified_name, "Outer.Inner");
        assert_eq!(inner.members[0].qualified_name, "Outer.Inner.Leaf");
    }

    #[test]
    fn dotted_and_nested_namespace_declarations_merge() {
        let nested = "\
declare namespace A {
    namespace B {
        interface First { x: string; }
    }
}
declare namespace A.B {
    interface Second { y: number; }
}
";
        let reversed = "\
declare namespace A.B {
    interface Second { y: number; }
}
declare namespace A {
    namespace B {
        interface First { x: string; }
    }
}
";
        let forward = lower_one(nested);
        let backward = lower_one(reversed);
        let names = |output: &LowerOutput| -> Vec<String> {
            let SymbolDef::Namespace(a) = &unit(output).symbols[0].def else {
                panic!("expected namespace A");
            };
            let SymbolDef::Namespace(b) = &a.members[0].def else {
                panic!("expected namespace A.B");
            };
            let mut names: Vec<String> = b
                .members
                .iter()
                .map(|symbol| symbol.qualified_name.clone())
                .collect();
            names.sort();
            names
        };
        assert_eq!(unit(&forward).symbols.len(), 1);
        assert_eq!(names(&forward), vec!["A.B.First", "A.B.Second"]);
        assert_eq!(names(&forward), names(&backward));
    }

    #[test]
    fn script_units_export_every_top_level_symbol() {
        let output = lower_one("interface Visible {}\nconst hidden: number;");
        let symbols = &unit(&output).symbols;
        assert!(symbols
            .iter()
            .all(|symbol| symbol.visibility == Visibility::Exported));
    }

    #[test]
    fn module_units_mark_unexported_symbols_internal() {
        let source = "\
export interface Public {}
interface Private {}
";
        let output = lower_one(source);
        let symbols = &unit(&output).symbols;
        assert_eq!(symbols[0].visibility, Visibility::Exported);
        assert_eq!(symbols[1].visibility, Visibility::Internal);
    }

    #[test]
    fn export_alias_keeps_the_local_symbol_visible() {
        let source = "\
interface Options {}
export { Options as Config };
";
        let output = lower_one(source);
        let lowered = unit(&output);
        assert_eq!(lowered.symbols[0].visibility, Visibility::Exported);
        assert_eq!(
            lowered.exports,
            vec![ExportRecord {
                name: "Config".to_string(),
                target: "Options".to_string(),
                from: None,
            }]
        );
    }

    #[test]
    fn export_default_surfaces_under_the_default_name() {
        let source = "\
interface App {}
export default App;
";
        let output = lower_one(source);
        let lowered = unit(&output);
        assert_eq!(lowered.exports.len(), 1);
        assert_eq!(lowered.exports[0].name, "default");
        assert_eq!(lowered.exports[0].target, "App");
    }

    #[test]
    fn unresolved_export_alias_is_fatal() {
        let output = lower_one("export { Missing };");
        assert!(output.unit.is_none());
        let diagnostic = output
            .diagnostics
            .iter()
            .find(|diagnostic| diagnostic.code == codes::UNRESOLVED_EXPORT)
            .expect("missing unresolved-export diagnostic");
        assert_eq!(
            diagnostic.message_text,
            "Export 'Missing' does not name a declaration in module 'test.d.ts'."
        );
    }

    #[test]
    fn named_reexport_records_the_source_module() {
        let outputs = lower_all(&[
            ("types.d.ts", "export interface Shape { area: number; }"),
            (
                "index.d.ts",
                "export { Shape as Figure } from \"./types\";",
            ),
        ]);
        let lowered = unit(&outputs[1]);
        assert_eq!(
            lowered.exports,
            vec![ExportRecord {
                name: "Figure".to_string(),
                target: "Shape".to_string(),
                from: Some("./types".to_string()),
            }]
        );
    }

    #[test]
    fn star_reexport_spreads_the_surface_without_default() {
        let outputs = lower_all(&[
            (
                "lib.d.ts",
                "export interface A {}\nexport interface B {}\ninterface C {}\nexport default C;",
            ),
            ("index.d.ts", "export * from \"./lib\";"),
        ]);
        let lowered = unit(&outputs[1]);
        let names: Vec<&str> = lowered
            .exports
            .iter()
            .map(|record| record.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(lowered
            .exports
            .iter()
            .all(|record| record.from.as_deref() == Some("./lib")));
    }

    #[test]
    fn reexport_of_a_missing_name_is_fatal() {
        let outputs = lower_all(&[
            ("lib.d.ts", "export interface Real {}"),
            ("index.d.ts", "export { Phantom } from \"./lib\";"),
        ]);
        assert!(outputs[1].unit.is_none());
        let diagnostic = outputs[1]
            .diagnostics
            .iter()
            .find(|diagnostic| diagnostic.code == codes::UNRESOLVED_EXPORT)
            .expect("missing unresolved-export diagnostic");
        assert!(diagnostic.message_text.contains("Phantom"));
        assert!(diagnostic.message_text.contains("./lib"));
    }

    #[test]
    fn import_backed_export_resolves_through_the_chain() {
        let outputs = lower_all(&[
            ("core.d.ts", "export interface Engine { start(): void; }"),
            (
                "facade.d.ts",
                "import { Engine } from \"./core\";\nexport { Engine };",
            ),
        ]);
        let lowered = unit(&outputs[1]);
        assert_eq!(
            lowered.exports,
            vec![ExportRecord {
                name: "Engine".to_string(),
                target: "Engine".to_string(),
                from: Some("./core".to_string()),
            }]
        );
    }

    #[test]
    fn ambient_module_members_follow_the_export_rule() {
        let source = "\
declare module \"fs\" {
    export function readFile(path: string): string;
    function helper(): void;
}
declare module \"os\" {
    function hostname(): string;
}
";
        let output = lower_one(source);
        let symbols = &unit(&output).symbols;
        let SymbolDef::Module(fs) = &symbols[0].def else {
            panic!("expected a module");
        };
        assert_eq!(fs.members[0].visibility, Visibility::Exported);
        assert_eq!(fs.members[1].visibility, Visibility::Internal);
        let SymbolDef::Module(os) = &symbols[1].def else {
            panic!("expected a module");
        };
        assert_eq!(os.members[0].visibility, Visibility::Exported);
    }

    #[test]
    fn shorthand_ambient_module_is_flagged() {
        let output = lower_one("declare module \"untyped-lib\";");
        let symbols = &unit(&output).symbols;
        let SymbolDef::Module(module) = &symbols[0].def else {
            panic!("expected a module");
        };
        assert!(module.shorthand);
        assert!(module.members.is_empty());
    }

    #[test]
    fn constants_capture_literal_values() {
        let source = "\
declare const version: string;
declare const retries = 3;
declare let mutable: number;
declare const fallback = defaults.limit;
";
        let output = lower_one(source);
        let symbols = &unit(&output).symbols;
        let constant = |index: usize| -> &ConstantDef {
            match &symbols[index].def {
                SymbolDef::Constant(def) => def,
                other => panic!("expected a constant, got {other:?}"),
            }
        };
        assert_eq!(
            constant(0).const_type,
            Some(TypeNode::primitive(PrimitiveKind::String))
        );
        assert!(!constant(0).writable);
        assert_eq!(constant(1).value, Some(LiteralValue::Integer(3)));
        assert!(constant(2).writable);
        assert_eq!(constant(3).reference, Some("defaults.limit".to_string()));
        assert!(constant(3).value.is_none());
    }

    #[test]
    fn function_overloads_split_off_the_implementation() {
        let source = "\
export function read(path: string): string;
export function read(path: string, binary: boolean): Uint8Array;
export function read(path: string, binary?: boolean): any {}
";
        let output = lower_one(source);
        let SymbolDef::Function(def) = &unit(&output).symbols[0].def else {
            panic!("expected a function");
        };
        assert_eq!(def.signatures.len(), 2);
        assert!(def.implementation.is_some());
    }

    #[test]
    fn type_alias_generics_scope_over_the_body() {
        let output = lower_one("type Pair<T> = [T, T];");
        let SymbolDef::TypeAlias(def) = &unit(&output).symbols[0].def else {
            panic!("expected an alias");
        };
        assert_eq!(def.generic_params.len(), 1);
        let TypeNode::Tuple { elements } = &def.aliased else {
            panic!("expected a tuple");
        };
        assert_eq!(elements[0].element_type, TypeNode::reference("T"));
    }

    #[test]
    fn doc_comments_flow_into_symbol_documentation() {
        let source = "\
/**
 * Reads the manifest.
 * @deprecated use loadManifest instead
 */
export function readManifest(): string;
";
        let output = lower_one(source);
        let symbol = &unit(&output).symbols[0];
        let documentation = symbol.documentation.as_ref().expect("missing documentation");
        assert!(documentation.text.contains("Reads the manifest."));
        assert!(documentation.deprecated);
        assert!(!documentation.system_api);
    }

    #[test]
    fn variable_doc_comments_attach_to_the_symbol() {
        let source = "\
/** Build number injected at release time. */
declare const BUILD: number;
";
        let output = lower_one(source);
        let symbol = &unit(&output).symbols[0];
        let documentation = symbol.documentation.as_ref().expect("missing documentation");
        assert_eq!(documentation.text, "Build number injected at release time.");
    }

    #[test]
    fn decorators_become_annotations() {
        let source = "\
@sealed
@injectable()
declare class Service {}
";
        let output = lower_one(source);
        let symbol = &unit(&output).symbols[0];
        assert_eq!(symbol.annotations.len(), 2);
        assert_eq!(symbol.annotations[0].name, "sealed");
        assert_eq!(symbol.annotations[0].arguments, None);
        assert_eq!(symbol.annotations[1].name, "injectable");
        assert!(symbol.annotations[1].arguments.is_some());
    }

    #[test]
    fn enum_symbols_lower_through_assembly() {
        let output = lower_one("export enum Level { Debug, Info, Warn }");
        let SymbolDef::Enum(def) = &unit(&output).symbols[0].def else {
            panic!("expected an enum");
        };
        assert_eq!(def.members[2].value, EnumValue::Integer(2));
    }

    #[test]
    fn source_locations_cover_the_declaration() {
        let source = "export interface Tiny { a: string; }";
        let output = lower_one(source);
        let location = unit(&output).symbols[0]
            .location
            .as_ref()
            .expect("missing location");
        assert_eq!(location.file, "test.d.ts");
        assert_eq!(location.start, 0);
        assert_eq!(location.length as usize, source.len());
    }

    #[test]
    fn fatal_namespace_member_aborts_the_unit_but_keeps_diagnostics() {
        let source = "\
declare namespace Broken {
    interface Uses { field: Missing; }
}
";
        let output = lower_one(source);
        assert!(output.unit.is_none());
        assert!(output
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code == codes::UNRESOLVED_TYPE_REFERENCE));
    }
}
