//! Tokenizer for the declaration dialect.
//!
//! The scanner is a plain state machine over the source text. It skips
//! trivia by default, tracks preceding line breaks, and remembers the most
//! recent `/** */` block so the parser can attach it to the declaration
//! that follows.

use crate::kind::SyntaxKind;
use declc_common::Span;

/// A lexical error with a stable diagnostic code. The parser turns these
/// into [`declc_common::Diagnostic`] records with the file name attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub code: u32,
    pub span: Span,
}

/// Saved scanner position for lookahead. Restoring also rolls back any
/// errors reported after the snapshot was taken.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    doc_comment: Option<Span>,
    error_count: usize,
}

pub struct ScannerState {
    source: String,
    pos: usize,
    skip_trivia: bool,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    doc_comment: Option<Span>,
    errors: Vec<ScanError>,
}

impl ScannerState {
    pub fn new(source: String, skip_trivia: bool) -> ScannerState {
        ScannerState {
            source,
            pos: 0,
            skip_trivia,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            preceding_line_break: false,
            doc_comment: None,
            errors: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Byte offset where the current token starts (trivia excluded).
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// Byte offset just past the current token.
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    pub fn token_span(&self) -> Span {
        Span::new(self.token_start(), self.token_end())
    }

    /// Cooked value of the current token: identifier text, unescaped string
    /// contents, or numeric text with separators removed.
    pub fn get_token_value(&self) -> String {
        self.token_value.clone()
    }

    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    /// The `/** */` block scanned immediately before the current token,
    /// if any. Consuming it detaches it so it cannot leak onto a later
    /// declaration.
    pub fn take_doc_comment(&mut self) -> Option<Span> {
        self.doc_comment.take()
    }

    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            doc_comment: self.doc_comment,
            error_count: self.errors.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.doc_comment = snapshot.doc_comment;
        self.errors.truncate(snapshot.error_count);
    }

    fn error(&mut self, code: u32, start: usize, end: usize) {
        self.errors.push(ScanError {
            code,
            span: Span::new(start as u32, end as u32),
        });
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.source[pos..].chars().next()
    }

    fn byte_at(&self, pos: usize) -> u8 {
        self.source.as_bytes().get(pos).copied().unwrap_or(0)
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.doc_comment = None;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            if self.pos >= self.source.len() {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            }

            let b = self.byte_at(self.pos);
            match b {
                b' ' | b'\t' => {
                    while matches!(self.byte_at(self.pos), b' ' | b'\t') {
                        self.pos += 1;
                    }
                    if self.skip_trivia {
                        continue;
                    }
                    self.token = SyntaxKind::WhitespaceTrivia;
                    return self.token;
                }
                b'\r' | b'\n' => {
                    self.preceding_line_break = true;
                    if b == b'\r' && self.byte_at(self.pos + 1) == b'\n' {
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                    if self.skip_trivia {
                        continue;
                    }
                    self.token = SyntaxKind::NewLineTrivia;
                    return self.token;
                }
                b'/' => match self.byte_at(self.pos + 1) {
                    b'/' => {
                        self.pos += 2;
                        while self.pos < self.source.len()
                            && !matches!(self.byte_at(self.pos), b'\r' | b'\n')
                        {
                            self.pos += 1;
                        }
                        if self.skip_trivia {
                            continue;
                        }
                        self.token = SyntaxKind::SingleLineCommentTrivia;
                        return self.token;
                    }
                    b'*' => {
                        let start = self.pos;
                        self.pos += 2;
                        let mut closed = false;
                        while self.pos < self.source.len() {
                            if self.byte_at(self.pos) == b'*' && self.byte_at(self.pos + 1) == b'/'
                            {
                                self.pos += 2;
                                closed = true;
                                break;
                            }
                            if matches!(self.byte_at(self.pos), b'\r' | b'\n') {
                                self.preceding_line_break = true;
                            }
                            self.pos += 1;
                        }
                        if !closed {
                            self.error(
                                declc_common::codes::UNTERMINATED_COMMENT,
                                start,
                                self.pos,
                            );
                        }
                        // `/**` with actual content is a doc comment; `/**/`
                        // is just an empty block comment.
                        if closed
                            && self.pos - start > 4
                            && self.source.as_bytes()[start + 2] == b'*'
                        {
                            self.doc_comment = Some(Span::new(start as u32, self.pos as u32));
                        }
                        if self.skip_trivia {
                            continue;
                        }
                        self.token = SyntaxKind::MultiLineCommentTrivia;
                        return self.token;
                    }
                    _ => {
                        self.error(declc_common::codes::INVALID_CHARACTER, self.pos, self.pos + 1);
                        self.pos += 1;
                        self.token = SyntaxKind::Unknown;
                        return self.token;
                    }
                },
                b'"' | b'\'' => {
                    self.token = self.scan_string(b);
                    return self.token;
                }
                b'0'..=b'9' => {
                    self.token = self.scan_number();
                    return self.token;
                }
                b'.' => {
                    if self.byte_at(self.pos + 1) == b'.' && self.byte_at(self.pos + 2) == b'.' {
                        self.pos += 3;
                        self.token = SyntaxKind::DotDotDotToken;
                    } else if self.byte_at(self.pos + 1).is_ascii_digit() {
                        self.token = self.scan_number();
                    } else {
                        self.pos += 1;
                        self.token = SyntaxKind::DotToken;
                    }
                    return self.token;
                }
                b'=' => {
                    if self.byte_at(self.pos + 1) == b'>' {
                        self.pos += 2;
                        self.token = SyntaxKind::EqualsGreaterThanToken;
                    } else {
                        self.pos += 1;
                        self.token = SyntaxKind::EqualsToken;
                    }
                    return self.token;
                }
                b'{' => return self.single(SyntaxKind::OpenBraceToken),
                b'}' => return self.single(SyntaxKind::CloseBraceToken),
                b'(' => return self.single(SyntaxKind::OpenParenToken),
                b')' => return self.single(SyntaxKind::CloseParenToken),
                b'[' => return self.single(SyntaxKind::OpenBracketToken),
                b']' => return self.single(SyntaxKind::CloseBracketToken),
                b';' => return self.single(SyntaxKind::SemicolonToken),
                b',' => return self.single(SyntaxKind::CommaToken),
                b'<' => return self.single(SyntaxKind::LessThanToken),
                b'>' => return self.single(SyntaxKind::GreaterThanToken),
                b':' => return self.single(SyntaxKind::ColonToken),
                b'?' => return self.single(SyntaxKind::QuestionToken),
                b'@' => return self.single(SyntaxKind::AtToken),
                b'|' => return self.single(SyntaxKind::BarToken),
                b'&' => return self.single(SyntaxKind::AmpersandToken),
                b'-' => return self.single(SyntaxKind::MinusToken),
                b'*' => return self.single(SyntaxKind::AsteriskToken),
                _ => {
                    let Some(ch) = self.char_at(self.pos) else {
                        self.pos += 1;
                        continue;
                    };
                    if is_identifier_start(ch) {
                        self.token = self.scan_identifier();
                        return self.token;
                    }
                    self.error(
                        declc_common::codes::INVALID_CHARACTER,
                        self.pos,
                        self.pos + ch.len_utf8(),
                    );
                    self.pos += ch.len_utf8();
                    self.token = SyntaxKind::Unknown;
                    return self.token;
                }
            }
        }
    }

    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        self.token = kind;
        kind
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(ch) = self.char_at(self.pos) {
            if is_identifier_part(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        self.token_value.push_str(&self.source[start..self.pos]);
        SyntaxKind::keyword_from_text(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_string(&mut self, quote: u8) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        loop {
            if self.pos >= self.source.len() {
                self.error(declc_common::codes::UNTERMINATED_STRING, start, self.pos);
                break;
            }
            let b = self.byte_at(self.pos);
            if b == quote {
                self.pos += 1;
                break;
            }
            if matches!(b, b'\r' | b'\n') {
                self.error(declc_common::codes::UNTERMINATED_STRING, start, self.pos);
                break;
            }
            if b == b'\\' {
                self.scan_escape();
                continue;
            }
            let Some(ch) = self.char_at(self.pos) else {
                break;
            };
            self.token_value.push(ch);
            self.pos += ch.len_utf8();
        }
        SyntaxKind::StringLiteral
    }

    fn scan_escape(&mut self) {
        // Positioned at the backslash.
        self.pos += 1;
        let Some(ch) = self.char_at(self.pos) else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => self.token_value.push('\n'),
            't' => self.token_value.push('\t'),
            'r' => self.token_value.push('\r'),
            'b' => self.token_value.push('\u{8}'),
            'f' => self.token_value.push('\u{c}'),
            'v' => self.token_value.push('\u{b}'),
            '0' => self.token_value.push('\0'),
            'x' => self.scan_hex_escape(2),
            'u' => {
                if self.byte_at(self.pos) == b'{' {
                    self.pos += 1;
                    let start = self.pos;
                    while self.byte_at(self.pos).is_ascii_hexdigit() {
                        self.pos += 1;
                    }
                    let digits = self.source[start..self.pos].to_string();
                    if self.byte_at(self.pos) == b'}' {
                        self.pos += 1;
                    }
                    self.push_code_point(&digits);
                } else {
                    self.scan_hex_escape(4);
                }
            }
            // Unknown escapes keep the escaped character.
            other => self.token_value.push(other),
        }
    }

    fn scan_hex_escape(&mut self, len: usize) {
        let start = self.pos;
        for _ in 0..len {
            if self.byte_at(self.pos).is_ascii_hexdigit() {
                self.pos += 1;
            }
        }
        let digits = self.source[start..self.pos].to_string();
        self.push_code_point(&digits);
    }

    fn push_code_point(&mut self, digits: &str) {
        if let Ok(value) = u32::from_str_radix(digits, 16)
            && let Some(ch) = char::from_u32(value)
        {
            self.token_value.push(ch);
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.byte_at(self.pos) == b'0'
            && matches!(self.byte_at(self.pos + 1), b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
        {
            self.pos += 2;
            while self.byte_at(self.pos).is_ascii_alphanumeric() || self.byte_at(self.pos) == b'_'
            {
                self.pos += 1;
            }
        } else {
            while self.byte_at(self.pos).is_ascii_digit() || self.byte_at(self.pos) == b'_' {
                self.pos += 1;
            }
            if self.byte_at(self.pos) == b'.' && self.byte_at(self.pos + 1).is_ascii_digit() {
                self.pos += 1;
                while self.byte_at(self.pos).is_ascii_digit() || self.byte_at(self.pos) == b'_' {
                    self.pos += 1;
                }
            }
            if matches!(self.byte_at(self.pos), b'e' | b'E')
                && (self.byte_at(self.pos + 1).is_ascii_digit()
                    || (matches!(self.byte_at(self.pos + 1), b'+' | b'-')
                        && self.byte_at(self.pos + 2).is_ascii_digit()))
            {
                self.pos += 2;
                while self.byte_at(self.pos).is_ascii_digit() || self.byte_at(self.pos) == b'_' {
                    self.pos += 1;
                }
            }
        }
        for b in self.source[start..self.pos].bytes() {
            if b != b'_' {
                self.token_value.push(b as char);
            }
        }
        SyntaxKind::NumericLiteral
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
