//! Byte-offset source spans.
//!
//! Every syntax node and diagnostic carries a `Span` locating it in its
//! compilation unit's source text. Offsets are byte positions into the
//! original string, `start` inclusive and `end` exclusive.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` within one compilation unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    /// An empty span at a single position, used for synthesized nodes.
    pub const fn at(pos: u32) -> Span {
        Span { start: pos, end: pos }
    }

    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The smallest span covering both `self` and `other`.
    pub fn cover(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the source text this span points into.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start as usize;
        let end = (self.end as usize).min(source.len());
        if start < end { &source[start..end] } else { "" }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
