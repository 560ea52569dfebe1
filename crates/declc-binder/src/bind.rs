//! Per-unit declaration collection.

use declc_common::diagnostics::get_message_template;
use declc_common::{Diagnostic, Span, codes, format_message};
use declc_syntax::{ModifierFlags, NodeIndex, ParseResult, SyntaxArena, SyntaxKind};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

/// What a name was declared as.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Interface,
    Class,
    Enum,
    TypeAlias,
    Function,
    Variable,
    Namespace,
    /// Ambient module with a string-literal name.
    Module,
}

impl DeclKind {
    /// Kinds where a second declaration of the same name adds to the first
    /// instead of clashing with it.
    fn merges(self) -> bool {
        matches!(
            self,
            DeclKind::Interface
                | DeclKind::Enum
                | DeclKind::Function
                | DeclKind::Namespace
                | DeclKind::Module
        )
    }
}

/// All declarations of one name within a container.
///
/// `nodes` holds every contributing declaration in source order: overload
/// signatures for functions, re-opened blocks for namespaces and interfaces.
#[derive(Debug)]
pub struct Declaration {
    pub kind: DeclKind,
    pub nodes: Vec<NodeIndex>,
    pub exported: bool,
    /// `const`/`let`/`var` for variables, `Unknown` otherwise.
    pub keyword: SyntaxKind,
    /// Span of the first declaration.
    pub span: Span,
    /// Body of namespaces and modules, merged across re-openings.
    pub inner: Option<Container>,
}

/// A declaration scope: the unit root, a namespace body, or a module body.
/// Iteration order is first-declaration order.
#[derive(Debug, Default)]
pub struct Container {
    pub declarations: IndexMap<String, Declaration>,
}

impl Container {
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn any_exported(&self) -> bool {
        self.declarations.values().any(|decl| decl.exported)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Default,
    Namespace,
    Named { original: String },
}

/// One imported binding, keyed in [`UnitBindings::imports`] by local name.
#[derive(Clone, Debug)]
pub struct Import {
    pub specifier: String,
    pub kind: ImportKind,
}

/// `export { local as exported }` without a module specifier, and
/// `export default local` as the alias `default`.
#[derive(Clone, Debug)]
pub struct ExportAlias {
    pub local: String,
    pub exported: String,
    pub span: Span,
}

/// `export ... from "specifier"`. `names` is `None` for a star re-export,
/// otherwise `(original, exported)` pairs.
#[derive(Clone, Debug)]
pub struct Reexport {
    pub specifier: String,
    pub names: Option<Vec<(String, String)>>,
    pub span: Span,
}

/// One name a unit exposes, before re-exports are folded in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportEntry {
    pub name: String,
    pub local: String,
}

/// Everything the collect phase learned about one unit.
pub struct UnitBindings {
    pub file: String,
    /// True when the unit uses import or export syntax. Scripts expose every
    /// top-level declaration; modules expose only what they export.
    pub module_mode: bool,
    pub root: Container,
    pub imports: FxHashMap<String, Import>,
    pub export_aliases: Vec<ExportAlias>,
    pub reexports: Vec<Reexport>,
    pub default_export: Option<ExportAlias>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitBindings {
    /// Exported names backed by this unit's own declarations and imports, in
    /// declaration order, first occurrence of a name winning. Re-exports need
    /// the global table and are resolved later.
    pub fn local_export_surface(&self) -> Vec<ExportEntry> {
        let mut entries: Vec<ExportEntry> = Vec::new();
        if !self.module_mode {
            for name in self.root.declarations.keys() {
                push_entry(&mut entries, name, name);
            }
            return entries;
        }
        for (name, decl) in &self.root.declarations {
            if decl.exported {
                push_entry(&mut entries, name, name);
            }
        }
        for alias in &self.export_aliases {
            push_entry(&mut entries, &alias.exported, &alias.local);
        }
        if let Some(default) = &self.default_export {
            push_entry(&mut entries, &default.exported, &default.local);
        }
        entries
    }
}

fn push_entry(entries: &mut Vec<ExportEntry>, name: &str, local: &str) {
    if !entries.iter().any(|entry| entry.name == name) {
        entries.push(ExportEntry {
            name: name.to_string(),
            local: local.to_string(),
        });
    }
}

fn message(code: u32, args: &[&str]) -> String {
    get_message_template(code).map_or_else(String::new, |template| format_message(template, args))
}

/// Collect every declaration of a parsed unit.
pub fn bind_unit(file: &str, result: &ParseResult) -> UnitBindings {
    let arena = &result.arena;
    let mut state = BinderState {
        arena,
        file,
        module_mode: false,
        imports: FxHashMap::default(),
        export_aliases: Vec::new(),
        reexports: Vec::new(),
        default_export: None,
        diagnostics: Vec::new(),
    };

    let mut root = Container::default();
    if let Some(source) = arena.get_source_file(result.root) {
        state.bind_statements(&source.statements, &mut root, true);
    }
    state.validate_exports(&root);

    debug!(
        file,
        declarations = root.declarations.len(),
        module_mode = state.module_mode,
        "collected unit"
    );

    UnitBindings {
        file: file.to_string(),
        module_mode: state.module_mode,
        root,
        imports: state.imports,
        export_aliases: state.export_aliases,
        reexports: state.reexports,
        default_export: state.default_export,
        diagnostics: state.diagnostics,
    }
}

struct BinderState<'a> {
    arena: &'a SyntaxArena,
    file: &'a str,
    module_mode: bool,
    imports: FxHashMap<String, Import>,
    export_aliases: Vec<ExportAlias>,
    reexports: Vec<Reexport>,
    default_export: Option<ExportAlias>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> BinderState<'a> {
    fn bind_statements(
        &mut self,
        statements: &[NodeIndex],
        container: &mut Container,
        top_level: bool,
    ) {
        for &statement in statements {
            self.bind_statement(statement, container, top_level);
        }
    }

    fn bind_statement(&mut self, index: NodeIndex, container: &mut Container, top_level: bool) {
        let arena = self.arena;
        match arena.kind(index) {
            SyntaxKind::InterfaceDeclaration => {
                if let Some(data) = arena.get_interface(index) {
                    let exported = self.export_flag(&data.modifiers, top_level);
                    self.declare_named(container, data.name, DeclKind::Interface, index, exported);
                }
            }
            SyntaxKind::ClassDeclaration => {
                if let Some(data) = arena.get_class(index) {
                    let exported = self.export_flag(&data.modifiers, top_level);
                    self.declare_named(container, data.name, DeclKind::Class, index, exported);
                }
            }
            SyntaxKind::EnumDeclaration => {
                if let Some(data) = arena.get_enum(index) {
                    let exported = self.export_flag(&data.modifiers, top_level);
                    self.declare_named(container, data.name, DeclKind::Enum, index, exported);
                }
            }
            SyntaxKind::TypeAliasDeclaration => {
                if let Some(data) = arena.get_type_alias(index) {
                    let exported = self.export_flag(&data.modifiers, top_level);
                    self.declare_named(container, data.name, DeclKind::TypeAlias, index, exported);
                }
            }
            SyntaxKind::FunctionDeclaration => {
                if let Some(data) = arena.get_function(index) {
                    let exported = self.export_flag(&data.modifiers, top_level);
                    self.declare_named(container, data.name, DeclKind::Function, index, exported);
                }
            }
            SyntaxKind::VariableStatement => self.bind_variable_statement(index, container, top_level),
            SyntaxKind::ModuleDeclaration => self.bind_module(index, container, top_level),
            SyntaxKind::ImportDeclaration => self.bind_import(index, top_level),
            SyntaxKind::ExportDeclaration => self.bind_export(index, top_level),
            SyntaxKind::ExportAssignment => {
                if top_level {
                    self.module_mode = true;
                    if let Some(data) = arena.get_export_assignment(index) {
                        if let Some(name) = arena.identifier_text(data.expression) {
                            self.default_export = Some(ExportAlias {
                                local: name.to_string(),
                                exported: "default".to_string(),
                                span: arena.span(index),
                            });
                        }
                    }
                }
            }
            // Error placeholders already carry a parser diagnostic.
            _ => {}
        }
    }

    fn export_flag(&mut self, modifiers: &Option<declc_syntax::NodeList>, top_level: bool) -> bool {
        let flags = self.arena.modifier_flags(modifiers);
        let exported = flags.intersects(ModifierFlags::EXPORT | ModifierFlags::DEFAULT);
        if exported && top_level {
            self.module_mode = true;
        }
        exported
    }

    fn declare_named(
        &mut self,
        container: &mut Container,
        name_node: NodeIndex,
        kind: DeclKind,
        index: NodeIndex,
        exported: bool,
    ) {
        let Some(name) = self.arena.name_text(name_node) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        let name = name.to_string();
        self.declare(container, &name, kind, index, exported, SyntaxKind::Unknown);
    }

    fn declare(
        &mut self,
        container: &mut Container,
        name: &str,
        kind: DeclKind,
        index: NodeIndex,
        exported: bool,
        keyword: SyntaxKind,
    ) {
        let span = self.arena.span(index);
        if let Some(existing) = container.declarations.get_mut(name) {
            if existing.kind == kind && kind.merges() {
                existing.nodes.push(index);
                existing.exported |= exported;
            } else {
                self.diagnostics.push(Diagnostic::warning(
                    self.file,
                    span,
                    message(
                        codes::UNSUPPORTED_CONSTRUCT,
                        &[&format!("redeclaration of '{name}'")],
                    ),
                    codes::UNSUPPORTED_CONSTRUCT,
                ));
            }
            return;
        }
        container.declarations.insert(name.to_string(), Declaration {
            kind,
            nodes: vec![index],
            exported,
            keyword,
            span,
            inner: None,
        });
    }

    fn bind_variable_statement(
        &mut self,
        index: NodeIndex,
        container: &mut Container,
        top_level: bool,
    ) {
        let arena = self.arena;
        let Some(data) = arena.get_variable(index) else {
            return;
        };
        let exported = self.export_flag(&data.modifiers, top_level);
        for &declarator in &data.declarations {
            let Some(decl) = arena.get_variable_declaration(declarator) else {
                continue;
            };
            let Some(name) = arena.name_text(decl.name) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let name = name.to_string();
            self.declare(
                container,
                &name,
                DeclKind::Variable,
                declarator,
                exported,
                data.keyword,
            );
        }
    }

    fn bind_module(&mut self, index: NodeIndex, container: &mut Container, top_level: bool) {
        let arena = self.arena;
        let Some(data) = arena.get_module(index) else {
            return;
        };
        let Some(name) = arena.name_text(data.name) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        let kind = if arena.kind(data.name) == SyntaxKind::StringLiteral {
            DeclKind::Module
        } else {
            DeclKind::Namespace
        };
        let exported = self.export_flag(&data.modifiers, top_level);
        let name = name.to_string();
        self.declare(container, &name, kind, index, exported, SyntaxKind::Unknown);

        let Some(decl) = container.declarations.get_mut(&name) else {
            return;
        };
        if decl.kind != kind {
            // Mismatched redeclaration was already reported; drop the body.
            return;
        }
        let mut inner = decl.inner.take().unwrap_or_default();
        match arena.kind(data.body) {
            SyntaxKind::ModuleBlock => {
                if let Some(block) = arena.get_module_block(data.body) {
                    self.bind_statements(&block.statements, &mut inner, false);
                }
            }
            // Desugared dotted name: the body is the next nested namespace.
            SyntaxKind::ModuleDeclaration => {
                self.bind_statement(data.body, &mut inner, false);
            }
            _ => {}
        }
        decl.inner = Some(inner);
    }

    fn bind_import(&mut self, index: NodeIndex, top_level: bool) {
        let arena = self.arena;
        if top_level {
            self.module_mode = true;
        }
        let Some(data) = arena.get_import_decl(index) else {
            return;
        };
        let Some(specifier) = arena.name_text(data.module_specifier) else {
            return;
        };
        let specifier = specifier.to_string();
        let Some(clause) = arena.get_import_clause(data.import_clause) else {
            return;
        };
        if let Some(local) = arena.identifier_text(clause.name) {
            self.imports.insert(local.to_string(), Import {
                specifier: specifier.clone(),
                kind: ImportKind::Default,
            });
        }
        match arena.kind(clause.named_bindings) {
            SyntaxKind::NamespaceImport => {
                if let Some(ns) = arena.get_namespace_import(clause.named_bindings) {
                    if let Some(local) = arena.identifier_text(ns.name) {
                        self.imports.insert(local.to_string(), Import {
                            specifier: specifier.clone(),
                            kind: ImportKind::Namespace,
                        });
                    }
                }
            }
            SyntaxKind::NamedImports => {
                if let Some(bindings) = arena.get_named_bindings(clause.named_bindings) {
                    for &element in &bindings.elements {
                        let Some(spec) = arena.get_specifier(element) else {
                            continue;
                        };
                        let Some(local) = arena.identifier_text(spec.name) else {
                            continue;
                        };
                        let original = arena
                            .identifier_text(spec.property_name)
                            .unwrap_or(local)
                            .to_string();
                        self.imports.insert(local.to_string(), Import {
                            specifier: specifier.clone(),
                            kind: ImportKind::Named { original },
                        });
                    }
                }
            }
            _ => {}
        }
    }

    fn bind_export(&mut self, index: NodeIndex, top_level: bool) {
        let arena = self.arena;
        if !top_level {
            return;
        }
        self.module_mode = true;
        let Some(data) = arena.get_export_decl(index) else {
            return;
        };
        let span = arena.span(index);
        let from = arena.name_text(data.module_specifier).map(str::to_string);

        if data.export_clause.is_none() {
            if let Some(specifier) = from {
                self.reexports.push(Reexport {
                    specifier,
                    names: None,
                    span,
                });
            }
            return;
        }

        let Some(bindings) = arena.get_named_bindings(data.export_clause) else {
            return;
        };
        let mut names = Vec::new();
        for &element in &bindings.elements {
            let Some(spec) = arena.get_specifier(element) else {
                continue;
            };
            let Some(exported) = arena.identifier_text(spec.name) else {
                continue;
            };
            let local = arena.identifier_text(spec.property_name).unwrap_or(exported);
            if from.is_some() {
                names.push((local.to_string(), exported.to_string()));
            } else {
                self.export_aliases.push(ExportAlias {
                    local: local.to_string(),
                    exported: exported.to_string(),
                    span: arena.span(element),
                });
            }
        }
        if let Some(specifier) = from {
            self.reexports.push(Reexport {
                specifier,
                names: Some(names),
                span,
            });
        }
    }

    /// Local export aliases must name a declaration or an import of this
    /// unit. Re-exports are checked against the global table later.
    fn validate_exports(&mut self, root: &Container) {
        let aliases = std::mem::take(&mut self.export_aliases);
        for alias in &aliases {
            if !root.contains(&alias.local) && !self.imports.contains_key(&alias.local) {
                self.diagnostics.push(Diagnostic::error(
                    self.file,
                    alias.span,
                    message(codes::UNRESOLVED_EXPORT, &[&alias.local, self.file]),
                    codes::UNRESOLVED_EXPORT,
                ));
            }
        }
        self.export_aliases = aliases;

        let default = self.default_export.take();
        if let Some(alias) = &default {
            if !root.contains(&alias.local) && !self.imports.contains_key(&alias.local) {
                self.diagnostics.push(Diagnostic::error(
                    self.file,
                    alias.span,
                    message(codes::UNRESOLVED_EXPORT, &[&alias.local, self.file]),
                    codes::UNRESOLVED_EXPORT,
                ));
            }
        }
        self.default_export = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declc_syntax::parse_source_file;

    fn bind_source(source: &str) -> UnitBindings {
        let result = parse_source_file("test.d.ts", source);
        assert!(
            !result.has_errors(),
            "parse errors: {:?}",
            result.diagnostics
        );
        bind_unit("test.d.ts", &result)
    }

    #[test]
    fn declarations_keep_first_declaration_order() {
        let bindings = bind_source(
            r#"
interface Config {}
declare class Server {}
declare enum Level { Info }
declare const version: string;
type Handler = () => void;
"#,
        );
        let names: Vec<&str> = bindings
            .root
            .declarations
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["Config", "Server", "Level", "version", "Handler"]);
        assert!(!bindings.module_mode);
    }

    #[test]
    fn function_overloads_accumulate_nodes() {
        let bindings = bind_source(
            r#"
declare function read(path: string): string;
declare function read(path: string, binary: true): number;
"#,
        );
        let decl = bindings.root.get("read").unwrap();
        assert_eq!(decl.kind, DeclKind::Function);
        assert_eq!(decl.nodes.len(), 2);
    }

    #[test]
    fn reopened_namespace_merges_into_one_container() {
        let bindings = bind_source(
            r#"
declare namespace app {
    interface First {}
}
declare namespace app {
    interface Second {}
}
"#,
        );
        let decl = bindings.root.get("app").unwrap();
        assert_eq!(decl.nodes.len(), 2);
        let inner = decl.inner.as_ref().unwrap();
        let names: Vec<&str> = inner.declarations.keys().map(String::as_str).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn dotted_namespace_binds_nested_containers() {
        let bindings = bind_source("declare namespace A.B { interface C {} }");
        let a = bindings.root.get("A").unwrap();
        assert_eq!(a.kind, DeclKind::Namespace);
        let b = a.inner.as_ref().unwrap().get("B").unwrap();
        assert_eq!(b.kind, DeclKind::Namespace);
        assert!(b.inner.as_ref().unwrap().contains("C"));
    }

    #[test]
    fn export_modifier_switches_to_module_mode() {
        let bindings = bind_source("export interface Only {}");
        assert!(bindings.module_mode);
        assert!(bindings.root.get("Only").unwrap().exported);
    }

    #[test]
    fn export_inside_namespace_stays_script_mode() {
        let bindings = bind_source("declare namespace n { export interface X {} }");
        assert!(!bindings.module_mode);
        let ns = bindings.root.get("n").unwrap();
        assert!(ns.inner.as_ref().unwrap().get("X").unwrap().exported);
    }

    #[test]
    fn export_alias_records_local_and_exported_names() {
        let bindings = bind_source(
            r#"
interface Widget {}
export { Widget as Control };
"#,
        );
        assert!(bindings.diagnostics.is_empty());
        assert_eq!(bindings.export_aliases.len(), 1);
        assert_eq!(bindings.export_aliases[0].local, "Widget");
        assert_eq!(bindings.export_aliases[0].exported, "Control");
    }

    #[test]
    fn unresolved_export_alias_is_reported() {
        let bindings = bind_source("export { missing };");
        assert_eq!(bindings.diagnostics.len(), 1);
        assert_eq!(bindings.diagnostics[0].code, codes::UNRESOLVED_EXPORT);
        assert_eq!(
            bindings.diagnostics[0].message_text,
            "Export 'missing' does not name a declaration in module 'test.d.ts'."
        );
    }

    #[test]
    fn imports_record_every_clause_shape() {
        let bindings = bind_source(
            r#"
import def, { Parser, Writer as W } from "./lib";
import * as util from "util";
import "./effects";
"#,
        );
        assert_eq!(bindings.imports["def"].kind, ImportKind::Default);
        assert_eq!(bindings.imports["Parser"].kind, ImportKind::Named {
            original: "Parser".to_string()
        });
        assert_eq!(bindings.imports["W"].kind, ImportKind::Named {
            original: "Writer".to_string()
        });
        assert_eq!(bindings.imports["util"].kind, ImportKind::Namespace);
        assert_eq!(bindings.imports["util"].specifier, "util");
        assert_eq!(bindings.imports.len(), 4);
    }

    #[test]
    fn ambient_module_binds_by_literal_name() {
        let bindings = bind_source(
            r#"
declare module "http" {
    export interface Server {}
}
declare module "side-effects";
"#,
        );
        let http = bindings.root.get("http").unwrap();
        assert_eq!(http.kind, DeclKind::Module);
        assert!(http.inner.as_ref().unwrap().contains("Server"));
        let shorthand = bindings.root.get("side-effects").unwrap();
        assert!(shorthand.inner.as_ref().unwrap().declarations.is_empty());
        assert!(!bindings.module_mode, "ambient modules do not make the unit a module");
    }

    #[test]
    fn star_and_named_reexports_are_recorded() {
        let bindings = bind_source(
            r#"
export * from "./base";
export { helper as run } from "./helpers";
"#,
        );
        assert_eq!(bindings.reexports.len(), 2);
        assert!(bindings.reexports[0].names.is_none());
        assert_eq!(bindings.reexports[0].specifier, "./base");
        assert_eq!(
            bindings.reexports[1].names.as_deref(),
            Some(&[("helper".to_string(), "run".to_string())][..])
        );
        assert!(bindings.diagnostics.is_empty());
    }

    #[test]
    fn mismatched_redeclaration_warns_and_keeps_first() {
        let bindings = bind_source(
            r#"
interface Port {}
declare class Port {}
"#,
        );
        assert_eq!(bindings.diagnostics.len(), 1);
        assert_eq!(bindings.diagnostics[0].code, codes::UNSUPPORTED_CONSTRUCT);
        assert_eq!(bindings.root.get("Port").unwrap().kind, DeclKind::Interface);
    }

    #[test]
    fn variables_bind_each_declarator_with_keyword() {
        let bindings = bind_source("declare const a: string, b: number; declare let c: boolean;");
        assert_eq!(bindings.root.get("a").unwrap().keyword, SyntaxKind::ConstKeyword);
        assert_eq!(bindings.root.get("b").unwrap().keyword, SyntaxKind::ConstKeyword);
        assert_eq!(bindings.root.get("c").unwrap().keyword, SyntaxKind::LetKeyword);
    }

    #[test]
    fn default_export_validates_like_an_alias() {
        let bindings = bind_source("interface App {}\nexport default App;");
        assert!(bindings.diagnostics.is_empty());
        let default = bindings.default_export.as_ref().unwrap();
        assert_eq!(default.local, "App");
        assert_eq!(default.exported, "default");

        let broken = bind_source("export default nothing;");
        assert_eq!(broken.diagnostics.len(), 1);
        assert_eq!(broken.diagnostics[0].code, codes::UNRESOLVED_EXPORT);
    }

    #[test]
    fn export_surface_differs_between_script_and_module() {
        let script = bind_source("interface A {}\ninterface B {}");
        let surface = script.local_export_surface();
        let names: Vec<&str> = surface.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);

        let module = bind_source(
            r#"
export interface Pub {}
interface Hidden {}
export { Hidden as Aliased };
"#,
        );
        let surface = module.local_export_surface();
        assert_eq!(surface.len(), 2);
        assert_eq!(surface[0].name, "Pub");
        assert_eq!(surface[1].name, "Aliased");
        assert_eq!(surface[1].local, "Hidden");
    }
}
