//! Parser state - top-level declarations and module plumbing.

use super::ParserState;
use crate::kind::SyntaxKind;
use crate::node::*;
use declc_common::codes;

impl ParserState {
    pub(crate) fn parse_source_file(&mut self) -> NodeIndex {
        let mut statements = NodeList::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
        }
        let end = self.token_end();
        self.arena
            .add_source_file(SyntaxKind::SourceFile, 0, end, SourceFileData { statements })
    }

    /// Parse one declaration statement. Returns `NONE` after error recovery
    /// so the caller can keep going.
    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        let doc = self.take_doc_comment();
        let start = self.token_pos();
        let decorators = self.parse_decorators();
        let modifiers = self.parse_modifiers();
        let flags = self.arena.modifier_flags(&modifiers);

        let current = self.current_token;
        let statement = match current {
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(start, modifiers),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, modifiers),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start, modifiers),
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start, modifiers),
            SyntaxKind::NamespaceKeyword | SyntaxKind::ModuleKeyword => {
                self.parse_module_declaration(start, modifiers)
            }
            SyntaxKind::ConstKeyword | SyntaxKind::LetKeyword | SyntaxKind::VarKeyword => {
                self.parse_variable_statement(start, modifiers)
            }
            SyntaxKind::TypeKeyword if self.lookahead_is_type_alias() => {
                self.parse_type_alias_declaration(start, modifiers)
            }
            SyntaxKind::ImportKeyword => self.parse_import_declaration(start),
            SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken
                if flags.contains(ModifierFlags::EXPORT) =>
            {
                self.parse_export_declaration(start)
            }
            _ if flags.contains(ModifierFlags::DEFAULT) && self.is_identifier_candidate() => {
                self.parse_export_default(start)
            }
            _ => {
                self.error_at_current(codes::DECLARATION_EXPECTED, &[]);
                self.next_token();
                NodeIndex::NONE
            }
        };

        if statement.is_some() {
            if let Some(doc) = doc {
                // Variable statements bind per declarator; give each one
                // the statement's doc so it survives into the symbol.
                if let Some(data) = self.arena.get_variable(statement) {
                    let declarators: Vec<NodeIndex> = data.declarations.iter().copied().collect();
                    for declarator in declarators {
                        self.arena.set_doc(declarator, doc.clone());
                    }
                }
                self.arena.set_doc(statement, doc);
            }
            self.arena.set_decorators(statement, decorators);
        }
        statement
    }

    // =========================================================================
    // Decorators and Modifiers
    // =========================================================================

    pub(crate) fn parse_decorators(&mut self) -> NodeList {
        let mut decorators = NodeList::new();
        while self.is_token(SyntaxKind::AtToken) {
            let start = self.token_pos();
            self.next_token();
            let name_node = self.parse_entity_name();
            let name = self
                .arena
                .entity_name_text(name_node)
                .unwrap_or_default();
            let arguments_text = if self.is_token(SyntaxKind::OpenParenToken) {
                Some(self.capture_balanced_text(
                    SyntaxKind::OpenParenToken,
                    SyntaxKind::CloseParenToken,
                ))
            } else {
                None
            };
            let span = self.finish_span(start);
            decorators.push(self.arena.add_decorator(
                SyntaxKind::Decorator,
                span.start,
                span.end,
                DecoratorData {
                    name,
                    arguments_text,
                },
            ));
        }
        decorators
    }

    pub(crate) fn parse_modifiers(&mut self) -> Option<NodeList> {
        let mut modifiers = NodeList::new();
        loop {
            let kind = self.current_token;
            if !kind.is_modifier() {
                break;
            }
            // `const` is only a modifier when it prefixes an enum.
            if kind == SyntaxKind::ConstKeyword && !self.lookahead_is_const_enum() {
                break;
            }
            let pos = self.token_pos();
            let end = self.token_end();
            self.next_token();
            modifiers.push(self.arena.add_token(kind, pos, end));
        }
        if modifiers.is_empty() { None } else { Some(modifiers) }
    }

    fn lookahead_is_const_enum(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            p.is_token(SyntaxKind::EnumKeyword)
        })
    }

    fn lookahead_is_type_alias(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            p.is_identifier_candidate()
        })
    }

    // =========================================================================
    // Type Containers
    // =========================================================================

    fn parse_interface_declaration(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_member_block(false);
        let span = self.finish_span(start);
        self.arena.add_interface(
            SyntaxKind::InterfaceDeclaration,
            span.start,
            span.end,
            InterfaceData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            },
        )
    }

    fn parse_class_declaration(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_member_block(true);
        let span = self.finish_span(start);
        self.arena.add_class(
            SyntaxKind::ClassDeclaration,
            span.start,
            span.end,
            ClassData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            },
        )
    }

    pub(crate) fn parse_type_parameters(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        self.next_token();
        let mut parameters = NodeList::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let start = self.token_pos();
            let name = self.parse_identifier();
            let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let span = self.finish_span(start);
            parameters.push(self.arena.add_type_parameter(
                SyntaxKind::TypeParameter,
                span.start,
                span.end,
                TypeParameterData {
                    name,
                    constraint,
                    default,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        Some(parameters)
    }

    fn parse_heritage_clauses(&mut self) -> Option<NodeList> {
        let mut clauses = NodeList::new();
        while matches!(
            self.current_token,
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ) {
            let token = self.current_token;
            let start = self.token_pos();
            self.next_token();
            let mut types = NodeList::new();
            loop {
                types.push(self.parse_heritage_type());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            let span = self.finish_span(start);
            clauses.push(self.arena.add_heritage_clause(
                SyntaxKind::HeritageClause,
                span.start,
                span.end,
                HeritageData { token, types },
            ));
        }
        if clauses.is_empty() { None } else { Some(clauses) }
    }

    fn parse_heritage_type(&mut self) -> NodeIndex {
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

    // =========================================================================
    // Enums
    // =========================================================================

    fn parse_enum_declaration(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let doc = self.take_doc_comment();
            let member_start = self.token_pos();
            let member_name = if self.is_token(SyntaxKind::StringLiteral) {
                self.parse_string_literal()
            } else {
                self.parse_identifier_name()
            };
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_literal_initializer(&[
                    SyntaxKind::CommaToken,
                    SyntaxKind::CloseBraceToken,
                ])
            } else {
                NodeIndex::NONE
            };
            let span = self.finish_span(member_start);
            let member = self.arena.add_enum_member(
                SyntaxKind::EnumMember,
                span.start,
                span.end,
                EnumMemberData {
                    name: member_name,
                    initializer,
                },
            );
            if let Some(doc) = doc {
                self.arena.set_doc(member, doc);
            }
            members.push(member);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let span = self.finish_span(start);
        self.arena.add_enum(
            SyntaxKind::EnumDeclaration,
            span.start,
            span.end,
            EnumData {
                modifiers,
                name,
                members,
            },
        )
    }

    // =========================================================================
    // Functions, Aliases, Variables
    // =========================================================================

    fn parse_function_declaration(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let name = self.parse_identifier();
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
        self.arena.add_function(
            SyntaxKind::FunctionDeclaration,
            span.start,
            span.end,
            FunctionData {
                modifiers,
                name,
                type_parameters,
                parameters,
                type_annotation,
                has_body,
            },
        )
    }

    fn parse_type_alias_declaration(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_type_alias(
            SyntaxKind::TypeAliasDeclaration,
            span.start,
            span.end,
            TypeAliasData {
                modifiers,
                name,
                type_parameters,
                type_node,
            },
        )
    }

    fn parse_variable_statement(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        let keyword = self.current_token;
        self.next_token();
        let mut declarations = NodeList::new();
        loop {
            let decl_start = self.token_pos();
            let name = self.parse_identifier();
            let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_literal_initializer(&[
                    SyntaxKind::CommaToken,
                    SyntaxKind::SemicolonToken,
                    SyntaxKind::CloseBraceToken,
                ])
            } else {
                NodeIndex::NONE
            };
            let span = self.finish_span(decl_start);
            declarations.push(self.arena.add_variable_declaration(
                SyntaxKind::VariableDeclaration,
                span.start,
                span.end,
                VariableDeclarationData {
                    name,
                    type_annotation,
                    initializer,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_variable(
            SyntaxKind::VariableStatement,
            span.start,
            span.end,
            VariableData {
                modifiers,
                keyword,
                declarations,
            },
        )
    }

    /// Parse a literal initializer value. Anything that is not a plain
    /// literal is preserved as raw text for the collector to classify.
    pub(crate) fn parse_literal_initializer(
        &mut self,
        terminators: &[SyntaxKind],
    ) -> NodeIndex {
        let start = self.token_pos();
        let current = self.current_token;
        match current {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                let kind = self.current_token;
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
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword | SyntaxKind::NullKeyword => {
                let kind = self.current_token;
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
                let lit_start = self.token_pos();
                let end = self.token_end();
                let text = self.scanner.get_token_value();
                self.next_token();
                let literal = self
                    .arena
                    .add_literal(SyntaxKind::NumericLiteral, lit_start, end, LiteralData { text });
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
            _ => {
                let text = self.capture_raw_until(terminators);
                let span = self.finish_span(start);
                self.arena.add_computed_name(
                    SyntaxKind::Unknown,
                    span.start,
                    span.end,
                    ComputedNameData {
                        expression_text: text,
                    },
                )
            }
        }
    }

    pub(crate) fn lookahead_is_numeric(&mut self) -> bool {
        self.lookahead(|p| {
            p.next_token();
            p.is_token(SyntaxKind::NumericLiteral)
        })
    }

    /// Bodies carry no declaration content, but one after the final overload
    /// marks the implementation signature. Returns whether a body was
    /// skipped.
    pub(crate) fn skip_tolerated_body(&mut self) -> bool {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            let _ = self.capture_balanced_text(
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
            );
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Namespaces and Ambient Modules
    // =========================================================================

    fn parse_module_declaration(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        self.next_token();
        if self.is_token(SyntaxKind::StringLiteral) {
            let name = self.parse_string_literal();
            let body = if self.is_token(SyntaxKind::OpenBraceToken) {
                self.parse_module_block()
            } else {
                // Shorthand ambient module: `declare module 'name';`
                NodeIndex::NONE
            };
            self.parse_semicolon();
            let span = self.finish_span(start);
            return self.arena.add_module(
                SyntaxKind::ModuleDeclaration,
                span.start,
                span.end,
                ModuleData {
                    modifiers,
                    name,
                    body,
                },
            );
        }
        self.parse_module_name_rest(start, modifiers)
    }

    /// Parse `A.B.C { ... }` into nested module declarations, one per
    /// dotted segment.
    fn parse_module_name_rest(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        let name = self.parse_identifier();
        let body = if self.parse_optional(SyntaxKind::DotToken) {
            let inner_start = self.token_pos();
            self.parse_module_name_rest(inner_start, None)
        } else {
            self.parse_module_block()
        };
        let span = self.finish_span(start);
        self.arena.add_module(
            SyntaxKind::ModuleDeclaration,
            span.start,
            span.end,
            ModuleData {
                modifiers,
                name,
                body,
            },
        )
    }

    fn parse_module_block(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut statements = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let span = self.finish_span(start);
        self.arena.add_module_block(
            SyntaxKind::ModuleBlock,
            span.start,
            span.end,
            ModuleBlockData { statements },
        )
    }

    // =========================================================================
    // Imports and Exports
    // =========================================================================

    fn parse_import_declaration(&mut self, start: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::ImportKeyword);
        if self.is_token(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_string_literal();
            self.parse_semicolon();
            let span = self.finish_span(start);
            return self.arena.add_import_decl(
                SyntaxKind::ImportDeclaration,
                span.start,
                span.end,
                ImportDeclData {
                    import_clause: NodeIndex::NONE,
                    module_specifier,
                },
            );
        }

        let clause_start = self.token_pos();
        let mut default_name = NodeIndex::NONE;
        let mut named_bindings = NodeIndex::NONE;
        if self.is_identifier_candidate() {
            default_name = self.parse_identifier();
            self.parse_optional(SyntaxKind::CommaToken);
        }
        if self.is_token(SyntaxKind::AsteriskToken) {
            let ns_start = self.token_pos();
            self.next_token();
            self.parse_expected(SyntaxKind::AsKeyword);
            let ns_name = self.parse_identifier();
            let span = self.finish_span(ns_start);
            named_bindings = self.arena.add_namespace_import(
                SyntaxKind::NamespaceImport,
                span.start,
                span.end,
                NamespaceImportData { name: ns_name },
            );
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            named_bindings =
                self.parse_named_bindings(SyntaxKind::NamedImports, SyntaxKind::ImportSpecifier);
        }
        let clause_span = self.finish_span(clause_start);
        let import_clause = self.arena.add_import_clause(
            SyntaxKind::ImportClause,
            clause_span.start,
            clause_span.end,
            ImportClauseData {
                name: default_name,
                named_bindings,
            },
        );
        self.parse_expected(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_module_specifier();
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_import_decl(
            SyntaxKind::ImportDeclaration,
            span.start,
            span.end,
            ImportDeclData {
                import_clause,
                module_specifier,
            },
        )
    }

    fn parse_export_declaration(&mut self, start: u32) -> NodeIndex {
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            self.parse_expected(SyntaxKind::FromKeyword);
            let module_specifier = self.parse_module_specifier();
            self.parse_semicolon();
            let span = self.finish_span(start);
            return self.arena.add_export_decl(
                SyntaxKind::ExportDeclaration,
                span.start,
                span.end,
                ExportDeclData {
                    export_clause: NodeIndex::NONE,
                    module_specifier,
                },
            );
        }
        let export_clause =
            self.parse_named_bindings(SyntaxKind::NamedExports, SyntaxKind::ExportSpecifier);
        let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
            self.parse_module_specifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_export_decl(
            SyntaxKind::ExportDeclaration,
            span.start,
            span.end,
            ExportDeclData {
                export_clause,
                module_specifier,
            },
        )
    }

    fn parse_export_default(&mut self, start: u32) -> NodeIndex {
        let expression = self.parse_identifier();
        self.parse_semicolon();
        let span = self.finish_span(start);
        self.arena.add_export_assignment(
            SyntaxKind::ExportAssignment,
            span.start,
            span.end,
            ExportAssignmentData { expression },
        )
    }

    fn parse_named_bindings(
        &mut self,
        list_kind: SyntaxKind,
        specifier_kind: SyntaxKind,
    ) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut elements = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let specifier_start = self.token_pos();
            let first = self.parse_identifier_name();
            let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
                (first, self.parse_identifier_name())
            } else {
                (NodeIndex::NONE, first)
            };
            let span = self.finish_span(specifier_start);
            elements.push(self.arena.add_specifier(
                specifier_kind,
                span.start,
                span.end,
                SpecifierData {
                    property_name,
                    name,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let span = self.finish_span(start);
        self.arena.add_named_bindings(
            list_kind,
            span.start,
            span.end,
            NamedBindingsData { elements },
        )
    }

    pub(crate) fn parse_string_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let end = self.token_end();
        let text = self.scanner.get_token_value();
        self.next_token();
        self.arena
            .add_literal(SyntaxKind::StringLiteral, pos, end, LiteralData { text })
    }

    fn parse_module_specifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_string_literal()
        } else {
            self.error_at_current(codes::EXPECTED_TOKEN, &["module specifier"]);
            let pos = self.token_pos();
            self.arena.add_literal(
                SyntaxKind::StringLiteral,
                pos,
                pos,
                LiteralData {
                    text: String::new(),
                },
            )
        }
    }
}
