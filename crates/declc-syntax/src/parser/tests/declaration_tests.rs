use super::{codes_of, parse_clean, statements};
use crate::kind::SyntaxKind;
use crate::node::ModifierFlags;
use crate::parser::parse_source_file;
use declc_common::codes;

#[test]
fn test_interface_with_members() {
    let result = parse_clean(
        r#"
interface Point {
    x: number;
    y: number;
}
"#,
    );
    let stmts = statements(&result);
    assert_eq!(stmts.len(), 1);
    assert_eq!(result.arena.kind(stmts[0]), SyntaxKind::InterfaceDeclaration);
    let interface = result.arena.get_interface(stmts[0]).unwrap();
    assert_eq!(result.arena.name_text(interface.name), Some("Point"));
    assert_eq!(interface.members.len(), 2);
    let first = result.arena.get_signature(interface.members[0]).unwrap();
    assert_eq!(result.arena.name_text(first.name), Some("x"));
    assert!(first.parameters.is_none(), "property has no parameter list");
}

#[test]
fn test_class_heritage_clauses() {
    let result = parse_clean(
        r#"
declare class Dog extends Animal implements Pet, Named {
}
"#,
    );
    let stmts = statements(&result);
    let class = result.arena.get_class(stmts[0]).unwrap();
    let clauses = class.heritage_clauses.as_ref().unwrap();
    assert_eq!(clauses.len(), 2);
    let extends = result.arena.get_heritage_clause(clauses[0]).unwrap();
    assert_eq!(extends.token, SyntaxKind::ExtendsKeyword);
    assert_eq!(extends.types.len(), 1);
    let implements = result.arena.get_heritage_clause(clauses[1]).unwrap();
    assert_eq!(implements.token, SyntaxKind::ImplementsKeyword);
    assert_eq!(implements.types.len(), 2);
}

#[test]
fn test_enum_member_initializers() {
    let result = parse_clean(
        r#"
enum Color {
    Red,
    Green = 5,
    Blue
}
"#,
    );
    let stmts = statements(&result);
    let enum_decl = result.arena.get_enum(stmts[0]).unwrap();
    assert_eq!(enum_decl.members.len(), 3);
    let red = result.arena.get_enum_member(enum_decl.members[0]).unwrap();
    assert!(red.initializer.is_none());
    let green = result.arena.get_enum_member(enum_decl.members[1]).unwrap();
    assert!(green.initializer.is_some());
    assert_eq!(result.arena.kind(green.initializer), SyntaxKind::LiteralType);
}

#[test]
fn test_const_enum_modifier() {
    let result = parse_clean("declare const enum Flags { None }");
    let stmts = statements(&result);
    let enum_decl = result.arena.get_enum(stmts[0]).unwrap();
    let flags = result.arena.modifier_flags(&enum_decl.modifiers);
    assert!(flags.contains(ModifierFlags::DECLARE | ModifierFlags::CONST));
}

#[test]
fn test_dotted_namespace_desugars_to_nesting() {
    let result = parse_clean(
        r#"
declare namespace A.B.C {
    export const x: number;
}
"#,
    );
    let stmts = statements(&result);
    let outer = result.arena.get_module(stmts[0]).unwrap();
    assert_eq!(result.arena.name_text(outer.name), Some("A"));
    let middle = result.arena.get_module(outer.body).unwrap();
    assert_eq!(result.arena.name_text(middle.name), Some("B"));
    let inner = result.arena.get_module(middle.body).unwrap();
    assert_eq!(result.arena.name_text(inner.name), Some("C"));
    let block = result.arena.get_module_block(inner.body).unwrap();
    assert_eq!(block.statements.len(), 1);
}

#[test]
fn test_ambient_module_with_string_name() {
    let result = parse_clean(
        r#"
declare module 'fs' {
    export function readFile(path: string): string;
}
"#,
    );
    let stmts = statements(&result);
    let module = result.arena.get_module(stmts[0]).unwrap();
    assert_eq!(result.arena.name_text(module.name), Some("fs"));
    assert_eq!(result.arena.kind(module.body), SyntaxKind::ModuleBlock);
}

#[test]
fn test_shorthand_ambient_module_has_no_body() {
    let result = parse_clean("declare module 'legacy-lib';");
    let stmts = statements(&result);
    let module = result.arena.get_module(stmts[0]).unwrap();
    assert!(module.body.is_none());
}

#[test]
fn test_import_and_export_forms() {
    let result = parse_clean(
        r#"
import defaultExport, { helper as aliased } from './util';
import * as ns from './all';
import './side-effect';
export * from './re';
export { localThing as publicThing };
export default mainThing;
"#,
    );
    let stmts = statements(&result);
    assert_eq!(stmts.len(), 6);
    assert_eq!(result.arena.kind(stmts[0]), SyntaxKind::ImportDeclaration);
    assert_eq!(result.arena.kind(stmts[1]), SyntaxKind::ImportDeclaration);
    assert_eq!(result.arena.kind(stmts[2]), SyntaxKind::ImportDeclaration);
    assert_eq!(result.arena.kind(stmts[3]), SyntaxKind::ExportDeclaration);
    assert_eq!(result.arena.kind(stmts[4]), SyntaxKind::ExportDeclaration);
    assert_eq!(result.arena.kind(stmts[5]), SyntaxKind::ExportAssignment);

    let first = result.arena.get_import_decl(stmts[0]).unwrap();
    let clause = result.arena.get_import_clause(first.import_clause).unwrap();
    assert_eq!(result.arena.name_text(clause.name), Some("defaultExport"));
    let named = result.arena.get_named_bindings(clause.named_bindings).unwrap();
    let spec = result.arena.get_specifier(named.elements[0]).unwrap();
    assert_eq!(result.arena.name_text(spec.property_name), Some("helper"));
    assert_eq!(result.arena.name_text(spec.name), Some("aliased"));

    let bare = result.arena.get_import_decl(stmts[2]).unwrap();
    assert!(bare.import_clause.is_none());

    let star = result.arena.get_export_decl(stmts[3]).unwrap();
    assert!(star.export_clause.is_none());
    assert!(star.module_specifier.is_some());

    let named_export = result.arena.get_export_decl(stmts[4]).unwrap();
    assert!(named_export.module_specifier.is_none());
}

#[test]
fn test_function_overloads_parse_as_separate_statements() {
    let result = parse_clean(
        r#"
export function parse(input: string): Document;
export function parse(input: Buffer, encoding: string): Document;
"#,
    );
    let stmts = statements(&result);
    assert_eq!(stmts.len(), 2);
    for stmt in stmts {
        assert_eq!(result.arena.kind(stmt), SyntaxKind::FunctionDeclaration);
        let function = result.arena.get_function(stmt).unwrap();
        assert_eq!(result.arena.name_text(function.name), Some("parse"));
    }
}

#[test]
fn test_variable_statement_keyword_and_declarations() {
    let result = parse_clean(
        r#"
declare const VERSION: "1.0";
declare let a: number, b: string;
"#,
    );
    let stmts = statements(&result);
    let const_stmt = result.arena.get_variable(stmts[0]).unwrap();
    assert_eq!(const_stmt.keyword, SyntaxKind::ConstKeyword);
    assert_eq!(const_stmt.declarations.len(), 1);
    let let_stmt = result.arena.get_variable(stmts[1]).unwrap();
    assert_eq!(let_stmt.keyword, SyntaxKind::LetKeyword);
    assert_eq!(let_stmt.declarations.len(), 2);
}

#[test]
fn test_type_alias_with_type_parameters() {
    let result = parse_clean("type Pair<K, V extends object = object> = [K, V];");
    let stmts = statements(&result);
    let alias = result.arena.get_type_alias(stmts[0]).unwrap();
    assert_eq!(result.arena.name_text(alias.name), Some("Pair"));
    let params = alias.type_parameters.as_ref().unwrap();
    assert_eq!(params.len(), 2);
    let second = result.arena.get_type_parameter(params[1]).unwrap();
    assert!(second.constraint.is_some());
    assert!(second.default.is_some());
}

#[test]
fn test_doc_comment_attaches_to_following_declaration_only() {
    let result = parse_clean(
        r#"
/** The main entry point. */
export function main(): void;
export function helper(): void;
"#,
    );
    let stmts = statements(&result);
    let doc = result.arena.doc(stmts[0]).unwrap();
    assert_eq!(doc.text, "The main entry point.");
    assert!(result.arena.doc(stmts[1]).is_none());
}

#[test]
fn test_decorator_with_argument_text() {
    let result = parse_clean(
        r#"
@Component({ selector: 'app-root' })
@Injectable
export declare class AppComponent {
}
"#,
    );
    let stmts = statements(&result);
    let decorators = result.arena.decorators(stmts[0]).unwrap();
    assert_eq!(decorators.len(), 2);
    let component = result.arena.get_decorator(decorators[0]).unwrap();
    assert_eq!(component.name, "Component");
    assert!(
        component
            .arguments_text
            .as_deref()
            .is_some_and(|text| text.contains("selector")),
        "argument text should be preserved"
    );
    let injectable = result.arena.get_decorator(decorators[1]).unwrap();
    assert_eq!(injectable.name, "Injectable");
    assert!(injectable.arguments_text.is_none());
}

#[test]
fn test_unknown_statement_reports_declaration_expected() {
    let result = parse_source_file("test.d.ts", "interface Ok {}\n%%%\ninterface AlsoOk {}");
    assert!(result.has_errors());
    assert!(
        codes_of(&result).contains(&codes::DECLARATION_EXPECTED)
            || codes_of(&result).contains(&codes::INVALID_CHARACTER),
        "got: {:?}",
        result.diagnostics
    );
    // Recovery keeps the surrounding declarations.
    let stmts = statements(&result);
    let interfaces = stmts
        .iter()
        .filter(|&&s| result.arena.kind(s) == SyntaxKind::InterfaceDeclaration)
        .count();
    assert_eq!(interfaces, 2);
}

#[test]
fn test_missing_interface_name_recovers() {
    let result = parse_source_file("test.d.ts", "interface { x: number; }");
    assert!(codes_of(&result).contains(&codes::IDENTIFIER_EXPECTED));
    let stmts = statements(&result);
    assert_eq!(result.arena.kind(stmts[0]), SyntaxKind::InterfaceDeclaration);
}

#[test]
fn test_diagnostics_sorted_by_position() {
    let result = parse_source_file("test.d.ts", "type A = ;\ntype B = ;");
    let starts: Vec<u32> = result.diagnostics.iter().map(|d| d.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}
