//! Enum lowering with auto-increment value assignment.
//!
//! Members without an initializer continue from the previous numeric value,
//! starting at zero. A string or unevaluable initializer blocks implicit
//! values for the members after it; they still receive the continued count,
//! with a warning. Merged enum declarations share one counter.

use crate::context::LowerCtx;
use crate::normalize;
use declc_binder::Declaration;
use declc_common::codes;
use declc_model::{EnumDef, EnumKind, EnumMemberDef, EnumValue, LiteralValue};
use declc_syntax::ModifierFlags;

/// Counter state for members without an initializer.
#[derive(Clone, Copy)]
enum Auto {
    Int(i64),
    Float(f64),
}

impl Auto {
    fn next(self) -> Auto {
        match self {
            Auto::Int(value) => Auto::Int(value.saturating_add(1)),
            Auto::Float(value) => Auto::Float(value + 1.0),
        }
    }

    fn value(self) -> EnumValue {
        match self {
            Auto::Int(value) => EnumValue::Integer(value),
            Auto::Float(value) => EnumValue::Float(value),
        }
    }
}

pub(crate) fn lower_enum(ctx: &mut LowerCtx<'_>, decl: &Declaration) -> EnumDef {
    let arena = ctx.arena();
    let mut def = EnumDef {
        enum_kind: EnumKind::Numeric,
        is_const: false,
        members: Vec::new(),
    };
    let mut last = Auto::Int(-1);
    let mut blocked = false;
    let mut saw_numeric = false;
    let mut saw_string = false;

    for &node in &decl.nodes {
        let Some(data) = arena.get_enum(node) else {
            continue;
        };
        if arena
            .modifier_flags(&data.modifiers)
            .contains(ModifierFlags::CONST)
        {
            def.is_const = true;
        }
        for &member_node in &data.members {
            let Some(member) = arena.get_enum_member(member_node) else {
                continue;
            };
            let Some(name) = arena.name_text(member.name).map(str::to_string) else {
                continue;
            };
            let span = arena.span(member_node);
            let value = if member.initializer.is_none() {
                if blocked {
                    let detail = format!(
                        "implicit value for enum member '{name}' after a non-numeric member"
                    );
                    ctx.warning(span, codes::UNSUPPORTED_CONSTRUCT, &[detail.as_str()]);
                }
                last = last.next();
                saw_numeric = true;
                last.value()
            } else if let Some(literal) = normalize::literal_value_of(arena, member.initializer) {
                match literal {
                    LiteralValue::Integer(value) => {
                        last = Auto::Int(value);
                        blocked = false;
                        saw_numeric = true;
                        EnumValue::Integer(value)
                    }
                    LiteralValue::Float(value) => {
                        last = Auto::Float(value);
                        blocked = false;
                        saw_numeric = true;
                        EnumValue::Float(value)
                    }
                    LiteralValue::String(value) => {
                        blocked = true;
                        saw_string = true;
                        EnumValue::String(value)
                    }
                    LiteralValue::Boolean(value) => {
                        blocked = true;
                        let detail = format!("non-literal value for enum member '{name}'");
                        ctx.warning(span, codes::UNSUPPORTED_CONSTRUCT, &[detail.as_str()]);
                        EnumValue::Opaque(value.to_string())
                    }
                    LiteralValue::Null => {
                        blocked = true;
                        let detail = format!("non-literal value for enum member '{name}'");
                        ctx.warning(span, codes::UNSUPPORTED_CONSTRUCT, &[detail.as_str()]);
                        EnumValue::Opaque("null".to_string())
                    }
                }
            } else {
                blocked = true;
                let text = normalize::opaque_text(arena, member.initializer).unwrap_or_default();
                let detail = format!("computed value for enum member '{name}'");
                ctx.warning(span, codes::UNSUPPORTED_CONSTRUCT, &[detail.as_str()]);
                EnumValue::Opaque(text)
            };
            def.members.push(EnumMemberDef {
                name,
                value,
                documentation: ctx.doc_of(member_node),
            });
        }
    }

    def.enum_kind = match (saw_numeric, saw_string) {
        (_, false) => EnumKind::Numeric,
        (false, true) => EnumKind::String,
        (true, true) => EnumKind::Heterogeneous,
    };
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{lower_unit, LowerOutput};
    use declc_binder::{bind_unit, GlobalTable};
    use declc_model::SymbolDef;
    use declc_syntax::parse_source_file;

    fn lower_one(source: &str) -> LowerOutput {
        let parses = vec![parse_source_file("test.d.ts", source)];
        let units = vec![bind_unit("test.d.ts", &parses[0])];
        let global = GlobalTable::build(&units);
        lower_unit(0, &parses, &global)
    }

    fn enum_at(output: &LowerOutput, index: usize) -> EnumDef {
        let unit = output.unit.as_ref().expect("unit should lower");
        match &unit.symbols[index].def {
            SymbolDef::Enum(def) => def.clone(),
            other => panic!("expected an enum, got {other:?}"),
        }
    }

    fn values(def: &EnumDef) -> Vec<EnumValue> {
        def.members.iter().map(|member| member.value.clone()).collect()
    }

    #[test]
    fn implicit_values_count_from_zero() {
        let output = lower_one("enum Direction { Up, Down, Left }");
        let def = enum_at(&output, 0);
        assert_eq!(
            values(&def),
            vec![
                EnumValue::Integer(0),
                EnumValue::Integer(1),
                EnumValue::Integer(2)
            ]
        );
        assert_eq!(def.enum_kind, EnumKind::Numeric);
    }

    #[test]
    fn explicit_integer_restarts_the_counter() {
        let output = lower_one("enum Flags { A = 5, B, C }");
        let def = enum_at(&output, 0);
        assert_eq!(
            values(&def),
            vec![
                EnumValue::Integer(5),
                EnumValue::Integer(6),
                EnumValue::Integer(7)
            ]
        );
    }

    #[test]
    fn float_values_continue_by_one() {
        let output = lower_one("enum Scale { Half = 1.5, Next }");
        let def = enum_at(&output, 0);
        assert_eq!(
            values(&def),
            vec![EnumValue::Float(1.5), EnumValue::Float(2.5)]
        );
    }

    #[test]
    fn negative_values_continue_upward() {
        let output = lower_one("enum Offset { Before = -1, Zero, After }");
        let def = enum_at(&output, 0);
        assert_eq!(
            values(&def),
            vec![
                EnumValue::Integer(-1),
                EnumValue::Integer(0),
                EnumValue::Integer(1)
            ]
        );
    }

    #[test]
    fn hex_initializers_cook_to_integers() {
        let output = lower_one("enum Mask { Read = 0x1, Write = 0x2, All = 0xFF }");
        let def = enum_at(&output, 0);
        assert_eq!(
            values(&def),
            vec![
                EnumValue::Integer(1),
                EnumValue::Integer(2),
                EnumValue::Integer(255)
            ]
        );
    }

    #[test]
    fn string_member_blocks_implicit_followers() {
        let output = lower_one("enum Mode { Name = \"name\", Fallback }");
        let def = enum_at(&output, 0);
        assert_eq!(
            values(&def),
            vec![
                EnumValue::String("name".to_string()),
                EnumValue::Integer(0)
            ]
        );
        let warning = output
            .diagnostics
            .iter()
            .find(|diagnostic| diagnostic.code == codes::UNSUPPORTED_CONSTRUCT)
            .expect("missing implicit-value warning");
        assert!(warning.message_text.contains("Fallback"));
    }

    #[test]
    fn numeric_member_unblocks_the_counter() {
        let output = lower_one("enum Mixed { A = \"a\", B = 10, C }");
        let def = enum_at(&output, 0);
        assert!(output.diagnostics.is_empty());
        assert_eq!(
            values(&def),
            vec![
                EnumValue::String("a".to_string()),
                EnumValue::Integer(10),
                EnumValue::Integer(11)
            ]
        );
        assert_eq!(def.enum_kind, EnumKind::Heterogeneous);
    }

    #[test]
    fn all_string_members_make_a_string_enum() {
        let output = lower_one("enum Color { Red = \"red\", Blue = \"blue\" }");
        let def = enum_at(&output, 0);
        assert_eq!(def.enum_kind, EnumKind::String);
    }

    #[test]
    fn const_modifier_is_recorded() {
        let output = lower_one("declare const enum Level { Low, High }");
        let def = enum_at(&output, 0);
        assert!(def.is_const);
    }

    #[test]
    fn computed_initializer_becomes_opaque() {
        let output = lower_one("enum Derived { Base = 1, Shifted = Base << 2 }");
        let def = enum_at(&output, 0);
        assert_eq!(def.members[1].value, EnumValue::Opaque("Base << 2".to_string()));
        assert!(output
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code == codes::UNSUPPORTED_CONSTRUCT));
    }

    #[test]
    fn member_documentation_is_kept() {
        let source = "\
enum Status {
    /** All good. */
    Ok,
    Failed,
}
";
        let output = lower_one(source);
        let def = enum_at(&output, 0);
        let documentation = def.members[0]
            .documentation
            .as_ref()
            .expect("missing member documentation");
        assert_eq!(documentation.text, "All good.");
        assert!(def.members[1].documentation.is_none());
    }

    #[test]
    fn merged_enum_declarations_share_the_counter() {
        let source = "\
enum Parts { A }
enum Parts { B = 10, C }
";
        let output = lower_one(source);
        let def = enum_at(&output, 0);
        assert_eq!(
            values(&def),
            vec![
                EnumValue::Integer(0),
                EnumValue::Integer(10),
                EnumValue::Integer(11)
            ]
        );
    }
}
