//! Diagnostic types and message lookup for the declaration engine.
//!
//! Diagnostics are plain value records collected in declaration order and
//! reported per compilation unit. Codes are stable: 1xxx for syntax-level
//! problems reported by the front-end, 20xx for fatal extraction errors and
//! 21xx for recoverable warnings.

use crate::span::Span;
use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

/// A diagnostic record with a stable code and a source location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, span: Span, message: impl Into<String>, code: u32) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            file: file.into(),
            start: span.start,
            length: span.len(),
            message_text: message.into(),
        }
    }

    pub fn warning(
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Warning,
            code,
            file: file.into(),
            start: span.start,
            length: span.len(),
            message_text: message.into(),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }

    pub const fn span(&self) -> Span {
        Span::new(self.start, self.start + self.length)
    }
}

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Stable diagnostic codes.
///
/// Syntax-level codes (1xxx) come from the reference front-end; extraction
/// codes (2xxx) come from the collector/resolver phases. Codes are part of
/// the output contract and must not be renumbered.
pub mod codes {
    // --- Syntax (front-end) ---
    pub const EXPECTED_TOKEN: u32 = 1001;
    pub const DECLARATION_EXPECTED: u32 = 1002;
    pub const TYPE_EXPECTED: u32 = 1003;
    pub const IDENTIFIER_EXPECTED: u32 = 1004;
    pub const UNEXPECTED_TOKEN: u32 = 1005;
    pub const UNTERMINATED_STRING: u32 = 1006;
    pub const UNTERMINATED_COMMENT: u32 = 1007;
    pub const INVALID_CHARACTER: u32 = 1009;

    // --- Extraction, fatal for the unit ---
    pub const UNRESOLVED_EXPORT: u32 = 2001;
    pub const UNRESOLVED_TYPE_REFERENCE: u32 = 2002;
    pub const TUPLE_REST_NOT_LAST: u32 = 2003;
    pub const TUPLE_REQUIRED_AFTER_OPTIONAL: u32 = 2004;
    pub const DUPLICATE_INDEX_SIGNATURE: u32 = 2005;
    pub const INHERITANCE_CYCLE: u32 = 2006;

    // --- Extraction, recoverable ---
    pub const CONFLICTING_INHERITED_MEMBER: u32 = 2101;
    pub const UNSUPPORTED_CONSTRUCT: u32 = 2102;
}

/// The failure class of a diagnostic code.
///
/// Several codes can map to the same kind (the two malformed-tuple codes
/// are one failure class with two triggers).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Syntax,
    UnresolvedExport,
    UnresolvedTypeReference,
    MalformedTuple,
    DuplicateIndexSignature,
    InheritanceCycle,
    ConflictingInheritedMember,
    UnsupportedConstruct,
}

/// Classify a diagnostic code.
pub fn kind_of(code: u32) -> DiagnosticKind {
    match code {
        codes::UNRESOLVED_EXPORT => DiagnosticKind::UnresolvedExport,
        codes::UNRESOLVED_TYPE_REFERENCE => DiagnosticKind::UnresolvedTypeReference,
        codes::TUPLE_REST_NOT_LAST | codes::TUPLE_REQUIRED_AFTER_OPTIONAL => {
            DiagnosticKind::MalformedTuple
        }
        codes::DUPLICATE_INDEX_SIGNATURE => DiagnosticKind::DuplicateIndexSignature,
        codes::INHERITANCE_CYCLE => DiagnosticKind::InheritanceCycle,
        codes::CONFLICTING_INHERITED_MEMBER => DiagnosticKind::ConflictingInheritedMember,
        codes::UNSUPPORTED_CONSTRUCT => DiagnosticKind::UnsupportedConstruct,
        _ => DiagnosticKind::Syntax,
    }
}

// =============================================================================
// Message Templates
// =============================================================================

pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Message templates, `{0}`/`{1}` substituted via [`format_message`].
pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: codes::EXPECTED_TOKEN,
        category: DiagnosticCategory::Error,
        message: "'{0}' expected.",
    },
    DiagnosticMessage {
        code: codes::DECLARATION_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Declaration expected.",
    },
    DiagnosticMessage {
        code: codes::TYPE_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Type expected.",
    },
    DiagnosticMessage {
        code: codes::IDENTIFIER_EXPECTED,
        category: DiagnosticCategory::Error,
        message: "Identifier expected.",
    },
    DiagnosticMessage {
        code: codes::UNEXPECTED_TOKEN,
        category: DiagnosticCategory::Error,
        message: "Unexpected token '{0}'.",
    },
    DiagnosticMessage {
        code: codes::UNTERMINATED_STRING,
        category: DiagnosticCategory::Error,
        message: "Unterminated string literal.",
    },
    DiagnosticMessage {
        code: codes::UNTERMINATED_COMMENT,
        category: DiagnosticCategory::Error,
        message: "Unterminated comment.",
    },
    DiagnosticMessage {
        code: codes::INVALID_CHARACTER,
        category: DiagnosticCategory::Error,
        message: "Invalid character.",
    },
    DiagnosticMessage {
        code: codes::UNRESOLVED_EXPORT,
        category: DiagnosticCategory::Error,
        message: "Export '{0}' does not name a declaration in module '{1}'.",
    },
    DiagnosticMessage {
        code: codes::UNRESOLVED_TYPE_REFERENCE,
        category: DiagnosticCategory::Error,
        message: "Cannot resolve type reference '{0}'.",
    },
    DiagnosticMessage {
        code: codes::TUPLE_REST_NOT_LAST,
        category: DiagnosticCategory::Error,
        message: "A rest element must be last in a tuple type.",
    },
    DiagnosticMessage {
        code: codes::TUPLE_REQUIRED_AFTER_OPTIONAL,
        category: DiagnosticCategory::Error,
        message: "A required tuple element cannot follow an optional element.",
    },
    DiagnosticMessage {
        code: codes::DUPLICATE_INDEX_SIGNATURE,
        category: DiagnosticCategory::Error,
        message: "Duplicate {0} index signature.",
    },
    DiagnosticMessage {
        code: codes::INHERITANCE_CYCLE,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' recursively references itself as a base type.",
    },
    DiagnosticMessage {
        code: codes::CONFLICTING_INHERITED_MEMBER,
        category: DiagnosticCategory::Warning,
        message: "Member '{0}' is inherited with incompatible declarations; using '{1}'.",
    },
    DiagnosticMessage {
        code: codes::UNSUPPORTED_CONSTRUCT,
        category: DiagnosticCategory::Warning,
        message: "Unsupported construct: {0}.",
    },
];

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
