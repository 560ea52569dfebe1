//! Declaration-dialect to Interface Description Model extraction.
//!
//! [`Program`] drives the pipeline over a fixed set of compilation units.
//! Compilation runs in two phases with a barrier between them: the collect
//! phase parses and binds every unit independently, then a read-only
//! [`GlobalTable`] over all bindings is built, and the resolve phase lowers
//! each unit against it. Units never share mutable state, so both phases
//! run units in parallel, and results merge back in input order for stable
//! output and diagnostics.
//!
//! A malformed unit (syntax errors, or a fatal extraction error) is dropped
//! from the document; its diagnostics are still reported. Other units are
//! unaffected.
//!
//! ```
//! use declc::{Program, emit_document, EmitOptions};
//!
//! let mut program = Program::new();
//! program.add_unit("api.d.ts", "export interface Status { code: number; }");
//! let output = program.compile();
//! assert!(!output.has_errors());
//! let json = emit_document(&output.document, &EmitOptions::stable()).unwrap();
//! assert!(json.contains("\"Status\""));
//! ```

use declc_binder::{GlobalTable, UnitBindings, bind_unit};
use declc_lower::LowerOutput;
use declc_model::IdmDocument;
use declc_syntax::{ParseResult, parse_source_file};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

pub use declc_common::{Diagnostic, DiagnosticCategory, LineMap, Position, Span, codes};
pub use declc_emit::{EmitError, EmitMode, EmitOptions, emit_document, emit_unit};
pub use declc_lower::lower_unit;
pub use declc_model::{
    ExportRecord, IdmSymbol, IdmUnit, Member, MemberKind, Signature, SymbolDef, TypeNode,
    Visibility,
};
pub use declc_model as model;

/// One compilation unit: a file path used for diagnostics and qualified
/// locations, plus its full source text. The caller resolves paths; the
/// engine never touches the file system.
#[derive(Clone, Debug)]
pub struct UnitSource {
    pub path: String,
    pub source: String,
}

impl UnitSource {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> UnitSource {
        UnitSource {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Everything a compilation produced: the document with one entry per
/// surviving unit, and every diagnostic in unit input order.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    pub document: IdmDocument,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.category == DiagnosticCategory::Error)
    }
}

/// A fixed set of compilation units, compiled together so cross-unit
/// imports and ambient modules resolve.
#[derive(Default)]
pub struct Program {
    units: Vec<UnitSource>,
}

impl Program {
    pub fn new() -> Program {
        Program { units: Vec::new() }
    }

    pub fn add_unit(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.units.push(UnitSource::new(path, source));
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Run both phases over every unit.
    pub fn compile(&self) -> CompileOutput {
        let collected: Vec<(ParseResult, UnitBindings)> = self
            .units
            .par_iter()
            .map(|unit| {
                let parse = parse_source_file(&unit.path, &unit.source);
                let bindings = bind_unit(&unit.path, &parse);
                (parse, bindings)
            })
            .collect();
        let (parses, bindings): (Vec<ParseResult>, Vec<UnitBindings>) =
            collected.into_iter().unzip();
        tracing::debug!(units = parses.len(), "collect phase complete");

        // Barrier: the global table is built once and only read afterwards.
        let outputs: Vec<Option<LowerOutput>> = {
            let global = GlobalTable::build(&bindings);
            (0..parses.len())
                .into_par_iter()
                .map(|index| {
                    if parses[index].has_errors() {
                        return None;
                    }
                    Some(lower_unit(index, &parses, &global))
                })
                .collect()
        };

        let mut document = IdmDocument::new();
        let mut diagnostics = Vec::new();
        for ((parse, unit_bindings), output) in parses.into_iter().zip(bindings).zip(outputs) {
            diagnostics.extend(parse.diagnostics);
            diagnostics.extend(unit_bindings.diagnostics);
            if let Some(output) = output {
                diagnostics.extend(output.diagnostics);
                if let Some(unit) = output.unit {
                    document.units.push(unit);
                }
            }
        }
        tracing::debug!(
            units = document.units.len(),
            diagnostics = diagnostics.len(),
            "resolve phase complete"
        );
        CompileOutput {
            document,
            diagnostics,
        }
    }

    /// Format diagnostics for human output, one per line, as
    /// `file(line,col): category D<code>: message` with 1-based positions.
    /// A diagnostic whose file is not among this program's units keeps its
    /// byte offset as `file(@offset)`.
    pub fn render_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        let mut maps: FxHashMap<&str, LineMap> = FxHashMap::default();
        let mut lines = Vec::with_capacity(diagnostics.len());
        for diagnostic in diagnostics {
            let category = match diagnostic.category {
                DiagnosticCategory::Error => "error",
                DiagnosticCategory::Warning => "warning",
            };
            let position = self
                .units
                .iter()
                .find(|unit| unit.path == diagnostic.file)
                .map(|unit| {
                    maps.entry(unit.path.as_str())
                        .or_insert_with(|| LineMap::build(&unit.source))
                        .position(diagnostic.start)
                });
            let location = match position {
                Some(position) => {
                    format!(
                        "{}({},{})",
                        diagnostic.file,
                        position.line + 1,
                        position.character + 1
                    )
                }
                None => format!("{}(@{})", diagnostic.file, diagnostic.start),
            };
            lines.push(format!(
                "{location}: {category} D{}: {}",
                diagnostic.code, diagnostic.message_text
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_compiles_to_an_empty_document() {
        let output = Program::new().compile();
        assert!(output.document.units.is_empty());
        assert!(output.diagnostics.is_empty());
        assert!(!output.has_errors());
    }

    #[test]
    fn units_enter_the_document_in_input_order() {
        let mut program = Program::new();
        program.add_unit("b.d.ts", "export interface B {}");
        program.add_unit("a.d.ts", "export interface A {}");
        let output = program.compile();
        let files: Vec<&str> = output
            .document
            .units
            .iter()
            .map(|unit| unit.file.as_str())
            .collect();
        assert_eq!(files, vec!["b.d.ts", "a.d.ts"]);
    }

    #[test]
    fn a_unit_with_syntax_errors_is_dropped_but_reported() {
        let mut program = Program::new();
        program.add_unit("broken.d.ts", "interface {{{");
        program.add_unit("fine.d.ts", "export interface Fine {}");
        let output = program.compile();
        assert_eq!(output.document.units.len(), 1);
        assert_eq!(output.document.units[0].file, "fine.d.ts");
        assert!(output.has_errors());
        assert!(output
            .diagnostics
            .iter()
            .all(|diagnostic| diagnostic.file == "broken.d.ts"));
    }

    #[test]
    fn rendered_diagnostics_carry_line_and_column() {
        let mut program = Program::new();
        program.add_unit("tuple.d.ts", "type Ok = string;\ntype Bad = [number?, string];");
        let output = program.compile();
        assert!(output.has_errors());
        let rendered = program.render_diagnostics(&output.diagnostics);
        assert!(rendered.contains("tuple.d.ts(2,"), "got: {rendered}");
        assert!(
            rendered.contains(
                "error D2004: A required tuple element cannot follow an optional element."
            ),
            "got: {rendered}"
        );

        let foreign = Diagnostic::error(
            "other.d.ts",
            Span::new(4, 6),
            "boom",
            codes::UNRESOLVED_EXPORT,
        );
        assert_eq!(
            program.render_diagnostics(&[foreign]),
            "other.d.ts(@4): error D2001: boom"
        );
    }

    #[test]
    fn diagnostics_keep_unit_input_order() {
        let mut program = Program::new();
        program.add_unit("first.d.ts", "type A = [string?, number];");
        program.add_unit("second.d.ts", "type B = Unknown1;");
        let output = program.compile();
        assert!(output.diagnostics.len() >= 2);
        let first_position = output
            .diagnostics
            .iter()
            .position(|diagnostic| diagnostic.file == "first.d.ts")
            .unwrap();
        let second_position = output
            .diagnostics
            .iter()
            .position(|diagnostic| diagnostic.file == "second.d.ts")
            .unwrap();
        assert!(first_position < second_position);
    }
}
