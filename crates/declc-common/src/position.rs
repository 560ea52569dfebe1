//! Line/column mapping for diagnostics display.
//!
//! The engine works in byte offsets internally; a `LineMap` converts an
//! offset into a 0-based line/character pair when a diagnostic needs to be
//! rendered for a human.

use crate::span::Span;
use serde::Serialize;

/// A 0-based line/character position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Precomputed line-start offsets for one source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    /// Byte offset of the first character of each line. Always starts with 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(source: &str) -> LineMap {
        let mut line_starts = vec![0u32];
        let bytes = source.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i as u32 + 1),
                b'\r' => {
                    // \r\n counts as one terminator
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        i += 1;
                    }
                    line_starts.push(i as u32 + 1);
                }
                _ => {}
            }
            i += 1;
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset to a line/character position.
    pub fn position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        Position {
            line: line as u32,
            character: offset - self.line_starts[line],
        }
    }

    pub fn span_start(&self, span: Span) -> Position {
        self.position(span.start)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
