mod declaration_tests;

use crate::node::NodeIndex;
use crate::parser::{ParseResult, parse_source_file};

/// Parse and require a clean diagnostic list.
pub(crate) fn parse_clean(source: &str) -> ParseResult {
    let result = parse_source_file("test.d.ts", source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );
    result
}

pub(crate) fn statements(result: &ParseResult) -> Vec<NodeIndex> {
    result
        .arena
        .get_source_file(result.root)
        .map(|file| file.statements.to_vec())
        .unwrap_or_default()
}

pub(crate) fn codes_of(result: &ParseResult) -> Vec<u32> {
    result.diagnostics.iter().map(|d| d.code).collect()
}
