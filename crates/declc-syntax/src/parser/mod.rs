//! Recursive-descent parser for the declaration dialect.
//!
//! The parser is split across three files: this module holds the state
//! machine core and token bookkeeping, `state_declarations` parses
//! top-level declarations and module plumbing, `state_members` parses
//! interface and class bodies, and `state_types` parses the type grammar.

mod state_declarations;
mod state_members;
mod state_types;

#[cfg(test)]
mod tests;

use crate::arena::SyntaxArena;
use crate::kind::SyntaxKind;
use crate::node::{IdentifierData, NodeIndex};
use crate::scanner::ScannerState;
use declc_common::{Diagnostic, DocComment, Span, codes, format_message, get_message_template, limits};
use tracing::debug;

/// Output of parsing one source file.
pub struct ParseResult {
    pub arena: SyntaxArena,
    pub root: NodeIndex,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Parse a single declaration source file.
pub fn parse_source_file(file_name: &str, source: &str) -> ParseResult {
    let mut state = ParserState::new(file_name.to_string(), source.to_string());
    let root = state.parse_source_file();
    debug!(
        file = %state.file_name,
        nodes = state.arena.len(),
        diagnostics = state.diagnostics.len(),
        "parsed source file"
    );
    state.into_result(root)
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: SyntaxArena,
    pub(crate) current_token: SyntaxKind,
    pub(crate) file_name: String,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// End offset of the most recently consumed token, used for node spans.
    pub(crate) last_token_end: u32,
    recursion_depth: u32,
}

impl ParserState {
    pub fn new(file_name: String, source: String) -> ParserState {
        let arena = SyntaxArena::with_source_estimate(source.len());
        let scanner = ScannerState::new(source, true);
        let mut state = ParserState {
            scanner,
            arena,
            current_token: SyntaxKind::Unknown,
            file_name,
            diagnostics: Vec::new(),
            last_token_end: 0,
            recursion_depth: 0,
        };
        state.next_token();
        state
    }

    pub fn into_result(mut self, root: NodeIndex) -> ParseResult {
        // Fold lexical errors in ahead of parse errors at the same offset.
        let mut diagnostics = Vec::new();
        for scan_error in self.scanner.take_errors() {
            let message = get_message_template(scan_error.code).unwrap_or_default();
            diagnostics.push(Diagnostic::error(
                self.file_name.as_str(),
                scan_error.span,
                message,
                scan_error.code,
            ));
        }
        diagnostics.append(&mut self.diagnostics);
        diagnostics.sort_by_key(|d| d.start);
        ParseResult {
            arena: self.arena,
            root,
            diagnostics,
        }
    }

    // =========================================================================
    // Token Bookkeeping
    // =========================================================================

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.last_token_end = self.scanner.token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    pub(crate) fn finish_span(&self, start: u32) -> Span {
        Span::new(start, self.last_token_end.max(start))
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            let text = kind.token_text().unwrap_or("token");
            self.error_at_current(codes::EXPECTED_TOKEN, &[text]);
            false
        }
    }

    /// Statement and member terminators are optional; a missing semicolon is
    /// never an error in this dialect.
    pub(crate) fn parse_semicolon(&mut self) {
        self.parse_optional(SyntaxKind::SemicolonToken);
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_at_current(&mut self, code: u32, args: &[&str]) {
        let span = self.scanner.token_span();
        self.error_at_span(code, span, args);
    }

    pub(crate) fn error_at_span(&mut self, code: u32, span: Span, args: &[&str]) {
        let template = get_message_template(code).unwrap_or_default();
        let message = format_message(template, args);
        let file = self.file_name.clone();
        self.diagnostics.push(Diagnostic::error(file, span, message, code));
    }

    // =========================================================================
    // Lookahead
    // =========================================================================

    /// Run `f` speculatively, then rewind the scanner and any diagnostics it
    /// reported. Lookahead closures must not create nodes.
    pub(crate) fn lookahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let last_end = self.last_token_end;
        let diagnostic_count = self.diagnostics.len();
        let result = f(self);
        self.scanner.restore_state(snapshot);
        self.current_token = current;
        self.last_token_end = last_end;
        self.diagnostics.truncate(diagnostic_count);
        result
    }

    // =========================================================================
    // Recursion Guard
    // =========================================================================

    pub(crate) fn enter_recursion(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth > limits::MAX_PARSER_RECURSION_DEPTH {
            let text = self.current_text();
            self.error_at_current(codes::UNEXPECTED_TOKEN, &[text.as_str()]);
            false
        } else {
            true
        }
    }

    pub(crate) fn leave_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    fn current_text(&self) -> String {
        self.current_token
            .token_text()
            .map(str::to_string)
            .unwrap_or_else(|| self.scanner.get_token_value())
    }

    // =========================================================================
    // Identifiers and Names
    // =========================================================================

    /// Tokens usable as binding names. Contextual keywords are fine;
    /// reserved declaration keywords are not.
    pub(crate) fn is_identifier_candidate(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::Identifier
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::AsKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::FromKeyword
                | SyntaxKind::GetKeyword
                | SyntaxKind::ImplementsKeyword
                | SyntaxKind::InferKeyword
                | SyntaxKind::KeyOfKeyword
                | SyntaxKind::LetKeyword
                | SyntaxKind::ModuleKeyword
                | SyntaxKind::NamespaceKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::SetKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::TypeKeyword
        )
    }

    /// Parse a binding identifier. On failure reports `IDENTIFIER_EXPECTED`
    /// and synthesizes a zero-width missing identifier without consuming
    /// the offending token.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.is_identifier_candidate() {
            let pos = self.token_pos();
            let end = self.token_end();
            let text = self.scanner.get_token_value();
            self.next_token();
            self.arena
                .add_identifier(SyntaxKind::Identifier, pos, end, IdentifierData { text })
        } else {
            self.error_at_current(codes::IDENTIFIER_EXPECTED, &[]);
            self.missing_identifier()
        }
    }

    /// Parse a name position where any keyword is acceptable (member names,
    /// names after a dot).
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::Identifier) || self.current_token.is_keyword() {
            let pos = self.token_pos();
            let end = self.token_end();
            let text = self.scanner.get_token_value();
            self.next_token();
            self.arena
                .add_identifier(SyntaxKind::Identifier, pos, end, IdentifierData { text })
        } else {
            self.error_at_current(codes::IDENTIFIER_EXPECTED, &[]);
            self.missing_identifier()
        }
    }

    pub(crate) fn missing_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add_identifier(
            SyntaxKind::Identifier,
            pos,
            pos,
            IdentifierData {
                text: String::new(),
            },
        )
    }

    // =========================================================================
    // Attachments
    // =========================================================================

    pub(crate) fn take_doc_comment(&mut self) -> Option<DocComment> {
        let span = self.scanner.take_doc_comment()?;
        let raw = span.text(self.scanner.source()).to_string();
        let doc = DocComment::parse(&raw);
        if doc.is_empty() { None } else { Some(doc) }
    }

    // =========================================================================
    // Raw Text Capture
    // =========================================================================

    /// Consume a balanced token run starting at the current `open` token and
    /// return the source text between (not including) the delimiters.
    pub(crate) fn capture_balanced_text(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
    ) -> String {
        let start = self.token_end();
        if !self.parse_expected(open) {
            return String::new();
        }
        let mut depth = 1usize;
        let mut inner_end = self.token_pos();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            if self.is_token(open) {
                depth += 1;
            } else if self.is_token(close) {
                depth -= 1;
                if depth == 0 {
                    inner_end = self.token_pos();
                    self.next_token();
                    break;
                }
            }
            self.next_token();
            inner_end = self.last_token_end;
        }
        let source = self.scanner.source();
        let start = (start as usize).min(source.len());
        let end = (inner_end as usize).clamp(start, source.len());
        source[start..end].trim().to_string()
    }

    /// Consume tokens up to (not including) the first terminator at nesting
    /// depth zero and return the raw source text.
    pub(crate) fn capture_raw_until(&mut self, terminators: &[SyntaxKind]) -> String {
        let start = self.token_pos();
        let mut depth = 0usize;
        let mut end = start;
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            if depth == 0 && terminators.contains(&self.current_token) {
                break;
            }
            match self.current_token {
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
            end = self.last_token_end;
        }
        let source = self.scanner.source();
        let start = (start as usize).min(source.len());
        let end = (end as usize).clamp(start, source.len());
        source[start..end].trim().to_string()
    }
}
