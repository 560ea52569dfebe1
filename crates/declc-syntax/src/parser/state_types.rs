//! Parser state - the type grammar.
//!
//! Precedence, loosest first: conditional, union, intersection, type
//! operator, postfix (`[]` and indexed access), primary.

use super::ParserState;
use crate::kind::SyntaxKind;
use crate::node::*;
use declc_common::codes;
use smallvec::smallvec;

impl ParserState {
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.leave_recursion();
            return self.error_type_node();
        }
        let result = self.parse_conditional_type();
        self.leave_recursion();
        result
    }

    fn parse_conditional_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let check_type = self.parse_union_type();
        if !self.parse_optional(SyntaxKind::ExtendsKeyword) {
            return check_type;
        }
        let extends_type = self.parse_union_type();
        self.parse_expected(SyntaxKind::QuestionToken);
        let true_type = self.parse_type();
        self.parse_expected(SyntaxKind::ColonToken);
        let false_type = self.parse_type();
        let span = self.finish_span(start);
        self.arena.add_conditional_type(
            SyntaxKind::ConditionalType,
            span.start,
            span.end,
            ConditionalTypeData {
                check_type,
                extends_type,
                true_type,
                false_type,
            },
        )
    }

    fn parse_union_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let leading = self.parse_optional(SyntaxKind::BarToken);
        let first = self.parse_intersection_type();
        if !leading && !self.is_token(SyntaxKind::BarToken) {
            return first;
        }
        let mut types: NodeList = smallvec![first];
        while self.parse_optional(SyntaxKind::BarToken) {
            types.push(self.parse_intersection_type());
        }
        if types.len() == 1 {
            return first;
        }
        let span = self.finish_span(start);
        self.arena.add_composite_type(
            SyntaxKind::UnionType,
            span.start,
            span.end,
            CompositeTypeData { types },
        )
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let leading = self.parse_optional(SyntaxKind::AmpersandToken);
        let first = self.parse_type_operator();
        if !leading && !self.is_token(SyntaxKind::AmpersandToken) {
            return first;
        }
        let mut types: NodeList = smallvec![first];
        while self.parse_optional(SyntaxKind::AmpersandToken) {
            types.push(self.parse_type_operator());
        }
        if types.len() == 1 {
            return first;
        }
        let span = self.finish_span(start);
        self.arena.add_composite_type(
            SyntaxKind::IntersectionType,
            span.start,
            span.end,
            CompositeTypeData { types },
        )
    }

    fn parse_type_operator(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.current_token {
            SyntaxKind::KeyOfKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.current_token;
                self.next_token();
                let type_node = self.parse_type_operator();
                let span = self.finish_span(start);
                self.arena.add_type_operator(
                    SyntaxKind::TypeOperator,
                    span.start,
                    span.end,
                    TypeOperatorData {
                        operator,
                        type_node,
                    },
                )
            }
            SyntaxKind::InferKeyword => {
                self.next_token();
                let parameter_start = self.token_pos();
                let name = self.parse_identifier();
                let parameter_span = self.finish_span(parameter_start);
                let type_parameter = self.arena.add_type_parameter(
                    SyntaxKind::TypeParameter,
                    parameter_span.start,
                    parameter_span.end,
                    TypeParameterData {
                        name,
                        constraint: NodeIndex::NONE,
                        default: NodeIndex::NONE,
                    },
                );
                let span = self.finish_span(start);
                self.arena.add_infer_type(
                    SyntaxKind::InferType,
                    span.start,
                    span.end,
                    InferTypeData { type_parameter },
                )
            }
            _ => self.parse_postfix_type(),
        }
    }

    fn parse_postfix_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut type_node = self.parse_primary_type();
        while self.is_token(SyntaxKind::OpenBracketToken)
            && !self.scanner.has_preceding_line_break()
        {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                let span = self.finish_span(start);
                type_node = self.arena.add_array_type(
                    SyntaxKind::ArrayType,
                    span.start,
                    span.end,
                    ArrayTypeData {
                        element_type: type_node,
                    },
                );
            } else {
                let index_type = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                let span = self.finish_span(start);
                type_node = self.arena.add_indexed_access_type(
                    SyntaxKind::IndexedAccessType,
                    span.start,
                    span.end,
                    IndexedAccessTypeData {
                        object_type: type_node,
                        index_type,
                    },
                );
            }
        }
        type_node
    }

    fn parse_primary_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = self.current_token;
        if kind.is_type_keyword() {
            let end = self.token_end();
            self.next_token();
            return self.arena.add_token(kind, start, end);
        }
        match kind {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                let end = self.token_end();
                let text = self.scanner.get_token_value();
                self.next_token();
                let literal = self.arena.add_literal(kind, start, end, LiteralData { text });
                self.arena.add_literal_type(
                    SyntaxKind::LiteralType,
                    start,
                    end,
                    LiteralTypeData {
                        literal,
                        negative: false,
                    },
                )
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let end = self.token_end();
                self.next_token();
                let literal = self.arena.add_token(kind, start, end);
                self.arena.add_literal_type(
                    SyntaxKind::LiteralType,
                    start,
                    end,
                    LiteralTypeData {
                        literal,
                        negative: false,
                    },
                )
            }
            SyntaxKind::MinusToken if self.lookahead_is_numeric() => {
                self.next_token();
                let literal_start = self.token_pos();
                let end = self.token_end();
                let text = self.scanner.get_token_value();
                self.next_token();
                let literal = self.arena.add_literal(
                    SyntaxKind::NumericLiteral,
                    literal_start,
                    end,
                    LiteralData { text },
                );
                self.arena.add_literal_type(
                    SyntaxKind::LiteralType,
                    start,
                    end,
                    LiteralTypeData {
                        literal,
                        negative: true,
                    },
                )
            }
            SyntaxKind::TypeOfKeyword => self.parse_type_query(),
            SyntaxKind::NewKeyword => {
                self.next_token();
                self.parse_function_type_rest(start, SyntaxKind::ConstructorType)
            }
            SyntaxKind::LessThanToken => {
                self.parse_function_type_rest(start, SyntaxKind::FunctionType)
            }
            SyntaxKind::OpenParenToken => {
                if self.lookahead_is_function_type() {
                    self.parse_function_type_rest(start, SyntaxKind::FunctionType)
                } else {
                    self.parse_parenthesized_type()
                }
            }
            SyntaxKind::OpenBraceToken => {
                if self.lookahead_is_mapped_type() {
                    self.parse_mapped_type()
                } else {
                    self.parse_type_literal()
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            _ if self.is_identifier_candidate() => self.parse_type_reference(),
            _ => {
                self.error_at_current(codes::TYPE_EXPECTED, &[]);
                self.error_type_node()
            }
        }
    }

    /// Zero-width placeholder node used after a type error so callers always
    /// get an index back.
    pub(crate) fn error_type_node(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add_token(SyntaxKind::Unknown, pos, pos)
    }

    // =========================================================================
    // References and Queries
    // =========================================================================

    fn parse_type_reference(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let type_name = self.parse_entity_name();
        let type_arguments = self.parse_type_arguments();
        let span = self.finish_span(start);
        self.arena.add_type_ref(
            SyntaxKind::TypeReference,
            span.start,
            span.end,
            TypeRefData {
                type_name,
                type_arguments,
            },
        )
    }

    pub(crate) fn parse_entity_name(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut name = self.parse_identifier();
        while self.parse_optional(SyntaxKind::DotToken) {
            let right = self.parse_identifier_name();
            let span = self.finish_span(start);
            name = self.arena.add_qualified_name(
                SyntaxKind::QualifiedName,
                span.start,
                span.end,
                QualifiedNameData { left: name, right },
            );
        }
        name
    }

    pub(crate) fn parse_type_arguments(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        self.next_token();
        let mut arguments = NodeList::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            arguments.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        Some(arguments)
    }

    fn parse_type_query(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::TypeOfKeyword);
        let expr_name = self.parse_entity_name();
        let span = self.finish_span(start);
        self.arena.add_type_query(
            SyntaxKind::TypeQuery,
            span.start,
            span.end,
            TypeQueryData { expr_name },
        )
    }

    // =========================================================================
    // Function and Grouping Types
    // =========================================================================

    fn parse_function_type_rest(&mut self, start: u32, kind: SyntaxKind) -> NodeIndex {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let return_type = self.parse_type();
        let span = self.finish_span(start);
        self.arena.add_function_type(
            kind,
            span.start,
            span.end,
            FunctionTypeData {
                type_parameters,
                parameters,
                return_type,
            },
        )
    }

    fn parse_parenthesized_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let type_node = self.parse_type();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let span = self.finish_span(start);
        self.arena.add_wrapped_type(
            SyntaxKind::ParenthesizedType,
            span.start,
            span.end,
            WrappedTypeData { type_node },
        )
    }

    /// Decide `(` starts a function type rather than a parenthesized type.
    fn lookahead_is_function_type(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            if matches!(
                p.current_token,
                SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken
            ) {
                return true;
            }
            if !p.is_identifier_candidate() && !p.current_token.is_keyword() {
                return false;
            }
            p.next_token();
            if matches!(
                p.current_token,
                SyntaxKind::ColonToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::QuestionToken
                    | SyntaxKind::EqualsToken
            ) {
                return true;
            }
            if p.is_token(SyntaxKind::CloseParenToken) {
                p.next_token();
                return p.is_token(SyntaxKind::EqualsGreaterThanToken);
            }
            false
        })
    }

    // =========================================================================
    // Object, Mapped, Tuple
    // =========================================================================

    fn parse_type_literal(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let members = self.parse_member_block(false);
        let span = self.finish_span(start);
        self.arena.add_type_literal(
            SyntaxKind::TypeLiteral,
            span.start,
            span.end,
            TypeLiteralData { members },
        )
    }

    fn lookahead_is_mapped_type(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            if p.is_token(SyntaxKind::ReadonlyKeyword) {
                p.next_token();
            }
            if !p.is_token(SyntaxKind::OpenBracketToken) {
                return false;
            }
            p.next_token();
            if !p.is_identifier_candidate() {
                return false;
            }
            p.next_token();
            p.is_token(SyntaxKind::InKeyword)
        })
    }

    fn parse_mapped_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let readonly_token = self.parse_optional(SyntaxKind::ReadonlyKeyword);
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let parameter_start = self.token_pos();
        let name = self.parse_identifier();
        self.parse_expected(SyntaxKind::InKeyword);
        let constraint = self.parse_type();
        let parameter_span = self.finish_span(parameter_start);
        let type_parameter = self.arena.add_type_parameter(
            SyntaxKind::TypeParameter,
            parameter_span.start,
            parameter_span.end,
            TypeParameterData {
                name,
                constraint,
                default: NodeIndex::NONE,
            },
        );
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        self.parse_expected(SyntaxKind::ColonToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let span = self.finish_span(start);
        self.arena.add_mapped_type(
            SyntaxKind::MappedType,
            span.start,
            span.end,
            MappedTypeData {
                readonly_token,
                type_parameter,
                question_token,
                type_node,
            },
        )
    }

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            elements.push(self.parse_tuple_element());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let span = self.finish_span(start);
        self.arena.add_tuple_type(
            SyntaxKind::TupleType,
            span.start,
            span.end,
            TupleTypeData { elements },
        )
    }

    fn parse_tuple_element(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_tuple_element_type();
            let span = self.finish_span(start);
            return self.arena.add_wrapped_type(
                SyntaxKind::RestType,
                span.start,
                span.end,
                WrappedTypeData { type_node },
            );
        }
        self.parse_tuple_element_type()
    }

    /// One tuple slot, with an optional cosmetic label (`[x: string]`) and
    /// the postfix `?` marker.
    fn parse_tuple_element_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.lookahead_is_named_tuple_member() {
            let _label = self.parse_identifier_name();
            let question = self.parse_optional(SyntaxKind::QuestionToken);
            self.parse_expected(SyntaxKind::ColonToken);
            let type_node = self.parse_type();
            if question {
                let span = self.finish_span(start);
                return self.arena.add_wrapped_type(
                    SyntaxKind::OptionalType,
                    span.start,
                    span.end,
                    WrappedTypeData { type_node },
                );
            }
            return type_node;
        }
        let type_node = self.parse_type();
        if self.parse_optional(SyntaxKind::QuestionToken) {
            let span = self.finish_span(start);
            return self.arena.add_wrapped_type(
                SyntaxKind::OptionalType,
                span.start,
                span.end,
                WrappedTypeData { type_node },
            );
        }
        type_node
    }

    fn lookahead_is_named_tuple_member(&mut self) -> bool {
        self.lookahead(|p| {
            if !p.is_identifier_candidate() {
                return false;
            }
            p.next_token();
            if p.is_token(SyntaxKind::QuestionToken) {
                p.next_token();
            }
            p.is_token(SyntaxKind::ColonToken)
        })
    }
}
