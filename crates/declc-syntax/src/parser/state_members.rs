//! Parser state - interface, class and type-literal members.

use super::ParserState;
use crate::kind::SyntaxKind;
use crate::node::*;
use declc_common::codes;

impl ParserState {
    /// Parse `{ member* }`. Members may be separated by `;`, `,`, or
    /// nothing at all.
    pub(crate) fn parse_member_block(&mut self, in_class: bool) -> NodeList {
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken)
                || self.parse_optional(SyntaxKind::CommaToken)
            {
                continue;
            }
            let member = self.parse_member(in_class);
            if member.is_some() {
                members.push(member);
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        members
    }

    pub(crate) fn parse_member(&mut self, in_class: bool) -> NodeIndex {
        let doc = self.take_doc_comment();
        let start = self.token_pos();
        let decorators = self.parse_decorators();
        let modifiers = self.parse_member_modifiers();

        let current = self.current_token;
        let member = match current {
            SyntaxKind::NewKeyword if self.lookahead_is_signature_start() => {
                self.parse_construct_signature(start, modifiers)
            }
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                self.parse_call_signature(start, modifiers)
            }
            SyntaxKind::OpenBracketToken if self.lookahead_is_index_signature() => {
                self.parse_index_signature(start, modifiers)
            }
            SyntaxKind::GetKeyword if self.lookahead_is_accessor() => {
                self.parse_accessor(start, modifiers, SyntaxKind::GetAccessor)
            }
            SyntaxKind::SetKeyword if self.lookahead_is_accessor() => {
                self.parse_accessor(start, modifiers, SyntaxKind::SetAccessor)
            }
            _ => self.parse_property_or_method(start, modifiers, in_class),
        };

        if member.is_some() {
            if let Some(doc) = doc {
                self.arena.set_doc(member, doc);
            }
            self.arena.set_decorators(member, decorators);
        }
        member
    }

    /// A modifier keyword only counts as a modifier when the next token can
    /// continue a member; `readonly: boolean` is a property named readonly.
    fn parse_member_modifiers(&mut self) -> Option<NodeList> {
        let mut modifiers = NodeList::new();
        while self.current_token.is_modifier()
            && self.current_token != SyntaxKind::ConstKeyword
            && self.lookahead_modifier_applies()
        {
            let kind = self.current_token;
            let pos = self.token_pos();
            let end = self.token_end();
            self.next_token();
            modifiers.push(self.arena.add_token(kind, pos, end));
        }
        if modifiers.is_empty() { None } else { Some(modifiers) }
    }

    fn lookahead_modifier_applies(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            !matches!(
                p.current_token,
                SyntaxKind::ColonToken
                    | SyntaxKind::QuestionToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::LessThanToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::CloseBraceToken
            )
        })
    }

    fn lookahead_is_signature_start(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            matches!(
                p.current_token,
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        })
    }

    fn lookahead_is_accessor(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            matches!(
                p.current_token,
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::OpenBracketToken
            ) || p.is_identifier_candidate()
                || p.current_token.is_keyword()
        })
    }

    /// `[` starts an index signature only when followed by `ident :`;
    /// everything else in bracket position is a computed property name.
    fn lookahead_is_index_signature(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            if !p.is_identifier_candidate() {
                return false;
            }
            p.next_token();
            p.is_token(SyntaxKind::ColonToken)
        })
    }

    // =========================================================================
    // Signature Members
    // =========================================================================

    fn parse_call_signature(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_signature(
            SyntaxKind::CallSignature,
            span.start,
            span.end,
            SignatureData {
                modifiers,
                name: NodeIndex::NONE,
                question_token: false,
                type_parameters,
                parameters: Some(parameters),
                type_annotation,
                initializer: NodeIndex::NONE,
                has_body: false,
            },
        )
    }

    fn parse_construct_signature(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::NewKeyword);
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_signature(
            SyntaxKind::ConstructSignature,
            span.start,
            span.end,
            SignatureData {
                modifiers,
                name: NodeIndex::NONE,
                question_token: false,
                type_parameters,
                parameters: Some(parameters),
                type_annotation,
                initializer: NodeIndex::NONE,
                has_body: false,
            },
        )
    }

    fn parse_index_signature(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let param_start = self.token_pos();
        let param_name = self.parse_identifier();
        self.parse_expected(SyntaxKind::ColonToken);
        let key_type = self.parse_type();
        let param_span = self.finish_span(param_start);
        let parameter = self.arena.add_parameter(
            SyntaxKind::Parameter,
            param_span.start,
            param_span.end,
            ParameterData {
                dot_dot_dot_token: false,
                name: param_name,
                question_token: false,
                type_annotation: key_type,
            },
        );
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_index_signature(
            SyntaxKind::IndexSignature,
            span.start,
            span.end,
            IndexSignatureData {
                modifiers,
                parameter,
                type_annotation,
            },
        )
    }

    fn parse_accessor(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
        kind: SyntaxKind,
    ) -> NodeIndex {
        self.next_token();
        let name = self.parse_member_name();
        let parameters = self.parse_parameter_list();
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.skip_tolerated_body();
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_accessor(
            kind,
            span.start,
            span.end,
            AccessorData {
                modifiers,
                name,
                parameters,
                type_annotation,
            },
        )
    }

    // =========================================================================
    // Properties and Methods
    // =========================================================================

    fn parse_property_or_method(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
        in_class: bool,
    ) -> NodeIndex {
        if !self.is_member_name_start() {
            self.error_at_current(codes::IDENTIFIER_EXPECTED, &[]);
            self.next_token();
            return NodeIndex::NONE;
        }
        let name = self.parse_member_name();

        if in_class
            && self.is_token(SyntaxKind::OpenParenToken)
            && self
                .arena
                .identifier_text(name)
                .is_some_and(|text| text == "constructor")
        {
            let parameters = self.parse_parameter_list();
            let has_body = self.skip_tolerated_body();
            self.parse_semicolon();
            let span = self.finish_span(start);
            return self.arena.add_constructor(
                SyntaxKind::Constructor,
                span.start,
                span.end,
                ConstructorData {
                    modifiers,
                    parameters,
                    has_body,
                },
            );
        }

        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        if matches!(
            self.current_token,
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let type_parameters = self.parse_type_parameters();
            let parameters = self.parse_parameter_list();
            let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let has_body = self.skip_tolerated_body();
            self.parse_semicolon();
            let span = self.finish_span(start);
            self.arena.add_signature(
                SyntaxKind::MethodSignature,
                span.start,
                span.end,
                SignatureData {
                    modifiers,
                    name,
                    question_token,
                    type_parameters,
                    parameters: Some(parameters),
                    type_annotation,
                    initializer: NodeIndex::NONE,
                    has_body,
                },
            )
        } else {
            let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_literal_initializer(&[
                    SyntaxKind::SemicolonToken,
                    SyntaxKind::CommaToken,
                    SyntaxKind::CloseBraceToken,
                ])
            } else {
                NodeIndex::NONE
            };
            self.parse_semicolon();
            let span = self.finish_span(start);
            self.arena.add_signature(
                SyntaxKind::PropertySignature,
                span.start,
                span.end,
                SignatureData {
                    modifiers,
                    name,
                    question_token,
                    type_parameters: None,
                    parameters: None,
                    type_annotation,
                    initializer,
                    has_body: false,
                },
            )
        }
    }

    fn is_member_name_start(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::StringLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::Identifier
        ) || self.current_token.is_keyword()
    }

    fn parse_member_name(&mut self) -> NodeIndex {
        match self.current_token {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral => {
                let pos = self.token_pos();
                let end = self.token_end();
                let text = self.scanner.get_token_value();
                self.next_token();
                self.arena
                    .add_literal(SyntaxKind::NumericLiteral, pos, end, LiteralData { text })
            }
            SyntaxKind::OpenBracketToken => {
                let start = self.token_pos();
                let text = self.capture_balanced_text(
                    SyntaxKind::OpenBracketToken,
                    SyntaxKind::CloseBracketToken,
                );
                let span = self.finish_span(start);
                self.arena.add_computed_name(
                    SyntaxKind::ComputedPropertyName,
                    span.start,
                    span.end,
                    ComputedNameData {
                        expression_text: text,
                    },
                )
            }
            _ => self.parse_identifier_name(),
        }
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut parameters = NodeList::new();
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        parameters
    }

    pub(crate) fn parse_parameter(&mut self) -> NodeIndex {
        let start = self.token_pos();
        // Constructor parameter properties carry accessibility modifiers;
        // the shape of the parameter is all the extractor keeps.
        while self.current_token.is_modifier()
            && self.current_token != SyntaxKind::ConstKeyword
            && self.lookahead_modifier_applies()
        {
            self.next_token();
        }
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_name();
        let mut question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        if self.parse_optional(SyntaxKind::EqualsToken) {
            // A default value makes the parameter optional; the value itself
            // is not part of the extracted shape.
            let _ = self.capture_raw_until(&[
                SyntaxKind::CommaToken,
                SyntaxKind::CloseParenToken,
            ]);
            question_token = true;
        }
        let span = self.finish_span(start);
        self.arena.add_parameter(
            SyntaxKind::Parameter,
            span.start,
            span.end,
            ParameterData {
                dot_dot_dot_token,
                name,
                question_token,
                type_annotation,
            },
        )
    }
}
