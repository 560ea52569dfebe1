//! Shared state for lowering one unit.

use declc_binder::{Container, GlobalTable, UnitBindings};
use declc_common::diagnostics::get_message_template;
use declc_common::{format_message, Diagnostic, Span};
use declc_model::{Annotation, Documentation, ShapeDef};
use declc_syntax::{NodeIndex, ParseResult, SyntaxArena};
use rustc_hash::{FxHashMap, FxHashSet};

/// Marker for a fatal extraction failure.
///
/// The diagnostic has already been recorded by the time this is returned;
/// callers unwind to the unit boundary and discard the unit's output.
#[derive(Clone, Copy, Debug)]
pub struct Fatal;

pub type LowerResult<T> = Result<T, Fatal>;

/// A lexical container the resolver can see, innermost last.
pub(crate) struct Frame<'a> {
    pub unit: usize,
    pub prefix: String,
    pub container: &'a Container,
}

pub(crate) type ShapeKey = (usize, String);

pub(crate) struct LowerCtx<'a> {
    /// The unit this context produces output for.
    pub unit_index: usize,
    pub parses: &'a [ParseResult],
    pub global: &'a GlobalTable<'a>,
    pub diagnostics: Vec<Diagnostic>,
    /// Namespace nesting, outermost first. The last frame decides which
    /// arena node indexes are read from.
    pub frames: Vec<Frame<'a>>,
    /// Type parameter scopes, innermost last.
    pub scopes: Vec<FxHashSet<String>>,
    /// Current type nesting depth, guarded by `MAX_NORMALIZE_DEPTH`.
    pub depth: u32,
    /// While non-zero, diagnostics are dropped. Used when lowering a base
    /// shape that belongs to another unit; that unit reports for itself.
    quiet: u32,
    pub(crate) shape_memo: FxHashMap<ShapeKey, ShapeDef>,
    pub(crate) shape_stack: Vec<ShapeKey>,
}

impl<'a> LowerCtx<'a> {
    pub fn new(unit_index: usize, parses: &'a [ParseResult], global: &'a GlobalTable<'a>) -> Self {
        let bindings = global.unit(unit_index);
        LowerCtx {
            unit_index,
            parses,
            global,
            diagnostics: Vec::new(),
            frames: vec![Frame {
                unit: unit_index,
                prefix: String::new(),
                container: &bindings.root,
            }],
            scopes: Vec::new(),
            depth: 0,
            quiet: 0,
            shape_memo: FxHashMap::default(),
            shape_stack: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &'a UnitBindings {
        self.global.unit(self.unit_index)
    }

    /// The unit whose nodes the innermost frame refers to.
    pub fn current_unit(&self) -> usize {
        self.frames.last().map_or(self.unit_index, |frame| frame.unit)
    }

    pub fn arena(&self) -> &'a SyntaxArena {
        &self.parses[self.current_unit()].arena
    }

    pub fn error(&mut self, span: Span, code: u32, args: &[&str]) {
        if self.quiet == 0 {
            let file = self.bindings().file.clone();
            self.diagnostics
                .push(Diagnostic::error(file, span, message(code, args), code));
        }
    }

    pub fn warning(&mut self, span: Span, code: u32, args: &[&str]) {
        if self.quiet == 0 {
            let file = self.bindings().file.clone();
            self.diagnostics
                .push(Diagnostic::warning(file, span, message(code, args), code));
        }
    }

    /// Record an error and hand back the abort marker.
    pub fn fatal(&mut self, span: Span, code: u32, args: &[&str]) -> Fatal {
        self.error(span, code, args);
        Fatal
    }

    pub fn silence(&mut self) {
        self.quiet += 1;
    }

    pub fn unsilence(&mut self) {
        self.quiet = self.quiet.saturating_sub(1);
    }

    pub fn in_scope(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    pub fn push_scope(&mut self, names: FxHashSet<String>) {
        self.scopes.push(names);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Add an `infer` binding to the innermost scope.
    pub fn register_infer(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    pub fn doc_of(&self, node: NodeIndex) -> Option<Documentation> {
        self.arena().doc(node).map(|doc| Documentation {
            text: doc.text.clone(),
            deprecated: doc.deprecated,
            system_api: doc.system_api,
        })
    }

    pub fn annotations_of(&self, node: NodeIndex) -> Vec<Annotation> {
        let arena = self.arena();
        let Some(list) = arena.decorators(node) else {
            return Vec::new();
        };
        list.iter()
            .filter_map(|&decorator| arena.get_decorator(decorator))
            .map(|data| Annotation {
                name: data.name.clone(),
                arguments: data.arguments_text.clone(),
            })
            .collect()
    }
}

fn message(code: u32, args: &[&str]) -> String {
    get_message_template(code).map_or_else(String::new, |template| format_message(template, args))
}
