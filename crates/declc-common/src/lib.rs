//! Common types and utilities for the declc declaration engine.
//!
//! This crate provides foundational types used across all declc crates:
//! - Source spans (`Span`) and line/column mapping (`LineMap`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, code tables)
//! - Doc-comment extraction (`DocComment`)
//! - Engine limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics - ordered error/warning records with stable codes
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticKind, codes, format_message, get_message_template,
    kind_of,
};

// Doc comment parsing utilities
pub mod comments;
pub use comments::DocComment;

// Centralized limits and thresholds
pub mod limits;
