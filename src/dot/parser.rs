//! Recursive-descent parser for the DOT language
//!
//!     The parser pulls tokens from the scanner on demand and builds the
//!     arena-backed syntax tree bottom-up. It parses at most one top-level
//!     graph; trailing content is reported but never causes a failure. For
//!     malformed input the parser always returns a complete (possibly
//!     error-flagged) tree; user input never raises an error through this
//!     API.
//!
//! Error Recovery
//!
//!     Every list in the grammar (statements, attribute containers,
//!     assignments, edge right-hand sides, quoted-string concatenations)
//!     goes through one generic list routine parameterized by a
//!     [`ParsingContext`]. The routine keeps a bitmask of currently active
//!     contexts. On a token that is neither a valid element nor the
//!     terminator of the current context, it aborts the current list if the
//!     token would be valid for any enclosing active context; otherwise it
//!     reports one error and advances exactly one token. The forced
//!     one-token progress bounds every parse at O(n) scanner advances.
//!
//!     Whenever a required token or identifier cannot be parsed, a
//!     zero-width missing node of the expected kind is synthesized so that
//!     downstream passes can traverse the tree without null checks.
//!
//!     Diagnostics are de-duplicated by start offset: a new diagnostic at
//!     the same start offset as the immediately preceding one is suppressed,
//!     which stops one bad token from producing a cascade of messages. Every
//!     reported diagnostic also taints the next finished node with
//!     `CONTAINS_ERRORS`.
//!
//! Disambiguation
//!
//!     Statement dispatch uses one token of speculative look-ahead to
//!     distinguish `ID '=' ID` statements from node statements; a node
//!     statement with no attributes and no terminator is upgraded to an edge
//!     statement when an edge operator follows; a subgraph followed by an
//!     edge operator becomes an edge source. Ports are disambiguated by
//!     checking compass-point table membership one token past the colon.

use std::collections::HashSet;

use super::ast::{ContextFlags, NodeData, NodeFlags, NodeId, SourceFile, SyntaxNode};
use super::binder::SymbolStore;
use super::diagnostics::{
    DiagnosticCategory, DiagnosticMessage, ErrorCode, ParseErrorCode,
};
use super::scanner::Scanner;
use super::token::{text_to_kind, token_display, SyntaxKind};

/// The list-parsing contexts used by the recovery protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsingContext {
    StatementList = 1,
    AttributeContainerList = 2,
    AssignmentList = 4,
    EdgeRhsList = 8,
    QuotedTextIdentifierConcatenation = 16,
}

impl ParsingContext {
    const ALL: [ParsingContext; 5] = [
        ParsingContext::StatementList,
        ParsingContext::AttributeContainerList,
        ParsingContext::AssignmentList,
        ParsingContext::EdgeRhsList,
        ParsingContext::QuotedTextIdentifierConcatenation,
    ];

    fn bit(self) -> u8 {
        self as u8
    }
}

/// Parses one DOT document into a [`SourceFile`].
///
/// This is the only entry point; a parser instance holds mutable cursor and
/// diagnostics state for exactly one parse.
pub fn parse(source: &str) -> SourceFile {
    let mut parser = Parser::new(source);
    parser.next_token();
    let graph = if parser.token() != SyntaxKind::EndOfFile {
        Some(parser.parse_graph())
    } else {
        None
    };
    if parser.token() != SyntaxKind::EndOfFile {
        let start = parser.scanner.token_pos();
        parser.push_diagnostic(DiagnosticMessage {
            message: "Content after the end of the graph is not allowed.".to_string(),
            code: ErrorCode::Parse(ParseErrorCode::TrailingData),
            category: DiagnosticCategory::Error,
            start,
            end: source.len(),
        });
    }
    SourceFile {
        content: source.to_string(),
        nodes: parser.nodes,
        graph,
        identifiers: parser.identifiers,
        diagnostics: parser.diagnostics,
        symbols: SymbolStore::default(),
        global_symbols: None,
        colors: None,
    }
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    nodes: Vec<SyntaxNode>,
    diagnostics: Vec<DiagnosticMessage>,
    identifiers: HashSet<String>,
    parsing_contexts: u8,
    current_node_has_error: bool,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            scanner: Scanner::new(source),
            nodes: Vec::new(),
            diagnostics: Vec::new(),
            identifiers: HashSet::new(),
            parsing_contexts: 0,
            current_node_has_error: false,
        }
    }

    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    /// Advances the scanner and drains its buffered errors into the
    /// diagnostics list.
    fn next_token(&mut self) -> SyntaxKind {
        let kind = self.scanner.scan(true);
        for error in self.scanner.take_errors() {
            self.current_node_has_error = true;
            self.push_diagnostic(DiagnosticMessage {
                message: error.message,
                code: ErrorCode::Scan(error.code),
                category: DiagnosticCategory::Error,
                start: error.pos,
                end: error.pos + error.length,
            });
        }
        kind
    }

    /// Runs the callback speculatively and always restores parser and
    /// scanner state afterward, including diagnostics produced on the way.
    fn look_ahead<T>(&mut self, callback: impl FnOnce(&mut Self) -> T) -> T {
        let checkpoint = self.scanner.checkpoint();
        let diagnostics_len = self.diagnostics.len();
        let had_error = self.current_node_has_error;
        let result = callback(self);
        self.scanner.restore(checkpoint);
        self.diagnostics.truncate(diagnostics_len);
        self.current_node_has_error = had_error;
        result
    }

    /// Pushes a diagnostic unless one was already reported at the same
    /// start offset.
    fn push_diagnostic(&mut self, diagnostic: DiagnosticMessage) {
        if let Some(previous) = self.diagnostics.last() {
            if previous.start == diagnostic.start {
                return;
            }
        }
        self.diagnostics.push(diagnostic);
    }

    fn parse_error_at_current(&mut self, message: impl Into<String>, code: ParseErrorCode) {
        self.current_node_has_error = true;
        self.push_diagnostic(DiagnosticMessage {
            message: message.into(),
            code: ErrorCode::Parse(code),
            category: DiagnosticCategory::Error,
            start: self.scanner.token_pos(),
            end: self.scanner.pos(),
        });
    }

    /// Display text of the current token, for error messages.
    fn current_token_text(&self) -> String {
        if let Some(text) = token_display(self.token()) {
            return text.to_string();
        }
        if let Some(value) = self.scanner.token_value() {
            return value.to_string();
        }
        format!("{:?}", self.token())
    }

    /// Position that the next started node should use as its `pos`
    /// (before the current token's leading trivia).
    fn node_pos(&self) -> usize {
        self.scanner.start_pos()
    }

    /// Finishes a node whose end is the start of the next unconsumed token,
    /// folding any pending error taint into its flags.
    fn finish_node(&mut self, kind: SyntaxKind, pos: usize, data: NodeData) -> NodeId {
        let end = self.scanner.start_pos();
        self.finish_node_at(kind, pos, end, data)
    }

    fn finish_node_at(
        &mut self,
        kind: SyntaxKind,
        pos: usize,
        end: usize,
        data: NodeData,
    ) -> NodeId {
        let mut flags = NodeFlags::NONE;
        if self.current_node_has_error {
            self.current_node_has_error = false;
            flags |= NodeFlags::CONTAINS_ERRORS;
        }
        self.nodes.push(SyntaxNode {
            kind,
            pos,
            end,
            flags,
            data,
            parent: None,
            graph_context: ContextFlags::NONE,
            symbol: None,
        });
        NodeId((self.nodes.len() - 1) as u32)
    }

    /// Synthesizes a zero-width placeholder of the expected kind at the
    /// current position.
    fn create_missing_node(&mut self, kind: SyntaxKind) -> NodeId {
        let data = match kind {
            SyntaxKind::TextIdentifier => NodeData::TextIdentifier {
                text: String::new(),
            },
            SyntaxKind::StringLiteral => NodeData::StringLiteral {
                text: String::new(),
            },
            SyntaxKind::AttributeContainer => NodeData::AttributeContainer {
                assignments: Vec::new(),
            },
            _ => NodeData::Token,
        };
        let pos = self.scanner.start_pos();
        let id = self.finish_node_at(kind, pos, pos, data);
        self.nodes[id.index()].flags |= NodeFlags::SYNTHESIZED;
        id
    }

    /// Consumes the current token into a leaf node.
    fn parse_token_node(&mut self) -> NodeId {
        let kind = self.token();
        let pos = self.scanner.start_pos();
        let end = self.scanner.pos();
        self.next_token();
        self.finish_node_at(kind, pos, end, NodeData::Token)
    }

    fn parse_optional_token(&mut self, kind: SyntaxKind) -> Option<NodeId> {
        if self.token() == kind {
            Some(self.parse_token_node())
        } else {
            None
        }
    }

    /// Consumes an expected punctuation token, reporting an error (without
    /// synthesizing a node) when it is absent.
    fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            return true;
        }
        let display = token_display(kind).unwrap_or("token");
        self.parse_error_at_current(
            format!("'{display}' expected."),
            ParseErrorCode::ExpectationFailed,
        );
        false
    }

    // --- grammar productions ---

    /// `Graph := [strict] (graph | digraph) [ID] '{' Statement* '}'`
    fn parse_graph(&mut self) -> NodeId {
        let pos = self.node_pos();
        let strict = self.parse_optional_token(SyntaxKind::StrictKeyword);
        let kind = match self.token() {
            SyntaxKind::DigraphKeyword => {
                self.next_token();
                SyntaxKind::DirectedGraph
            }
            SyntaxKind::GraphKeyword => {
                self.next_token();
                SyntaxKind::UndirectedGraph
            }
            _ => {
                self.parse_error_at_current(
                    "'graph' or 'digraph' expected.",
                    ParseErrorCode::ExpectationFailed,
                );
                SyntaxKind::UndirectedGraph
            }
        };
        let id = if self.token().is_identifier() {
            Some(self.parse_identifier())
        } else {
            None
        };
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_list(ParsingContext::StatementList, Self::parse_statement);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish_node(
            kind,
            pos,
            NodeData::Graph {
                strict,
                id,
                statements,
            },
        )
    }

    /// Statement dispatch on the current token; see the module docs for the
    /// disambiguation rules.
    fn parse_statement(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::GraphKeyword | SyntaxKind::NodeKeyword | SyntaxKind::EdgeKeyword => {
                self.parse_attribute_statement()
            }
            SyntaxKind::OpenBraceToken | SyntaxKind::SubgraphKeyword => {
                self.parse_subgraph_statement_or_edge()
            }
            _ => {
                let is_id_equals_id = self.look_ahead(|parser| {
                    parser.next_token();
                    parser.token() == SyntaxKind::EqualsToken
                });
                if is_id_equals_id {
                    self.parse_id_equals_id_statement()
                } else {
                    self.parse_node_or_edge_statement()
                }
            }
        }
    }

    fn parse_id_equals_id_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let left = self.parse_identifier();
        self.parse_expected(SyntaxKind::EqualsToken);
        let right = self.parse_identifier();
        let terminator = self.parse_optional_token(SyntaxKind::SemicolonToken);
        self.finish_node(
            SyntaxKind::IdEqualsIdStatement,
            pos,
            NodeData::IdEqualsIdStatement {
                left,
                right,
                terminator,
            },
        )
    }

    /// Parses a node statement, upgrading it to an edge statement when an
    /// edge operator follows a bare node id.
    fn parse_node_or_edge_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let source = self.parse_node_id();
        let attributes =
            self.parse_list(ParsingContext::AttributeContainerList, Self::parse_attribute_container);
        let terminator = self.parse_optional_token(SyntaxKind::SemicolonToken);
        if terminator.is_none() && attributes.is_empty() && self.token().is_edge_operator() {
            return self.parse_edge_statement_rest(pos, source);
        }
        self.finish_node(
            SyntaxKind::NodeStatement,
            pos,
            NodeData::NodeStatement {
                id: source,
                attributes,
                terminator,
            },
        )
    }

    /// `EdgeStatement := (NodeId | SubGraph) EdgeRhs+ AttributeContainer* [';']`,
    /// entered with the source already parsed and an edge operator current.
    fn parse_edge_statement_rest(&mut self, pos: usize, source: NodeId) -> NodeId {
        let rhs = self.parse_list(ParsingContext::EdgeRhsList, Self::parse_edge_rhs);
        debug_assert!(!rhs.is_empty());
        let attributes =
            self.parse_list(ParsingContext::AttributeContainerList, Self::parse_attribute_container);
        let terminator = self.parse_optional_token(SyntaxKind::SemicolonToken);
        self.finish_node(
            SyntaxKind::EdgeStatement,
            pos,
            NodeData::EdgeStatement {
                source,
                rhs,
                attributes,
                terminator,
            },
        )
    }

    fn parse_edge_rhs(&mut self) -> NodeId {
        let pos = self.node_pos();
        let operation = self.parse_token_node();
        let target = match self.token() {
            SyntaxKind::OpenBraceToken | SyntaxKind::SubgraphKeyword => self.parse_subgraph(),
            _ => self.parse_node_id(),
        };
        self.finish_node(SyntaxKind::EdgeRhs, pos, NodeData::EdgeRhs { operation, target })
    }

    /// `graph|node|edge AttributeContainer+ [';']`; a missing `[` is an
    /// error, but a container is still manufactured so downstream passes
    /// need not null-check.
    fn parse_attribute_statement(&mut self) -> NodeId {
        let pos = self.node_pos();
        let subject = self.parse_token_node();
        let attributes = if self.token() == SyntaxKind::OpenBracketToken {
            self.parse_list(ParsingContext::AttributeContainerList, Self::parse_attribute_container)
        } else {
            self.parse_error_at_current("'[' expected.", ParseErrorCode::ExpectationFailed);
            vec![self.create_missing_node(SyntaxKind::AttributeContainer)]
        };
        let terminator = self.parse_optional_token(SyntaxKind::SemicolonToken);
        self.finish_node(
            SyntaxKind::AttributeStatement,
            pos,
            NodeData::AttributeStatement {
                subject,
                attributes,
                terminator,
            },
        )
    }

    fn parse_attribute_container(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let assignments = self.parse_list(ParsingContext::AssignmentList, Self::parse_assignment);
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish_node(
            SyntaxKind::AttributeContainer,
            pos,
            NodeData::AttributeContainer { assignments },
        )
    }

    fn parse_assignment(&mut self) -> NodeId {
        let pos = self.node_pos();
        let left = self.parse_identifier();
        self.parse_expected(SyntaxKind::EqualsToken);
        let right = self.parse_identifier();
        let terminator = match self.token() {
            SyntaxKind::CommaToken | SyntaxKind::SemicolonToken => Some(self.parse_token_node()),
            _ => None,
        };
        self.finish_node(
            SyntaxKind::Assignment,
            pos,
            NodeData::Assignment {
                left,
                right,
                terminator,
            },
        )
    }

    fn parse_subgraph_statement_or_edge(&mut self) -> NodeId {
        let pos = self.node_pos();
        let subgraph = self.parse_subgraph();
        if self.token() == SyntaxKind::SemicolonToken {
            let terminator = Some(self.parse_token_node());
            return self.finish_node(
                SyntaxKind::SubGraphStatement,
                pos,
                NodeData::SubGraphStatement {
                    subgraph,
                    terminator,
                },
            );
        }
        if self.token().is_edge_operator() {
            // The subgraph turns out to be the source of an edge statement.
            return self.parse_edge_statement_rest(pos, subgraph);
        }
        self.finish_node(
            SyntaxKind::SubGraphStatement,
            pos,
            NodeData::SubGraphStatement {
                subgraph,
                terminator: None,
            },
        )
    }

    /// `SubGraph := [subgraph [ID]] '{' Statement* '}'`
    fn parse_subgraph(&mut self) -> NodeId {
        let pos = self.node_pos();
        let id = if self.token() == SyntaxKind::SubgraphKeyword {
            self.next_token();
            if self.token().is_identifier() {
                Some(self.parse_identifier())
            } else {
                None
            }
        } else {
            None
        };
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_list(ParsingContext::StatementList, Self::parse_statement);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish_node(SyntaxKind::SubGraph, pos, NodeData::SubGraph { id, statements })
    }

    fn parse_node_id(&mut self) -> NodeId {
        let pos = self.node_pos();
        let id = self.parse_identifier();
        let port = if self.token() == SyntaxKind::ColonToken {
            Some(self.parse_port_declaration())
        } else {
            None
        };
        self.finish_node(SyntaxKind::NodeId, pos, NodeData::NodeId { id, port })
    }

    /// `':' ID [':' CompassPoint]` versus `':' CompassPoint`, decided by
    /// compass-table membership plus one token of look-ahead past the
    /// colon.
    fn parse_port_declaration(&mut self) -> NodeId {
        let pos = self.node_pos();
        self.parse_expected(SyntaxKind::ColonToken);
        let compass_candidate = self.compass_kind_of_current().is_some();
        let followed_by_colon = self.look_ahead(|parser| {
            parser.next_token();
            parser.token() == SyntaxKind::ColonToken
        });
        if compass_candidate && !followed_by_colon {
            let compass = self.parse_compass_token();
            return self.finish_node(
                SyntaxKind::CompassPortDeclaration,
                pos,
                NodeData::CompassPortDeclaration { compass },
            );
        }
        let id = self.parse_identifier();
        let compass = if self.token() == SyntaxKind::ColonToken {
            self.next_token();
            Some(self.parse_compass_token())
        } else {
            None
        };
        self.finish_node(
            SyntaxKind::NormalPortDeclaration,
            pos,
            NodeData::NormalPortDeclaration { id, compass },
        )
    }

    /// Compass kind of the current token, when its text is a compass-point
    /// table member. The scanner never yields compass kinds itself (they
    /// fall below the keyword length gate), so re-classification happens
    /// here.
    fn compass_kind_of_current(&self) -> Option<SyntaxKind> {
        if self.token() != SyntaxKind::TextIdentifier {
            return None;
        }
        let value = self.scanner.token_value()?;
        text_to_kind(value).filter(|kind| kind.is_compass_point())
    }

    fn parse_compass_token(&mut self) -> NodeId {
        if let Some(kind) = self.compass_kind_of_current() {
            let pos = self.scanner.start_pos();
            let end = self.scanner.pos();
            self.next_token();
            return self.finish_node_at(kind, pos, end, NodeData::Token);
        }
        self.parse_error_at_current("Compass point expected.", ParseErrorCode::ExpectationFailed);
        self.create_missing_node(SyntaxKind::CompassCenterToken)
    }

    fn parse_identifier(&mut self) -> NodeId {
        match self.token() {
            SyntaxKind::TextIdentifier => {
                let text = self.scanner.token_value().unwrap_or("").to_string();
                self.identifiers.insert(text.clone());
                let pos = self.scanner.start_pos();
                let end = self.scanner.pos();
                self.next_token();
                self.finish_node_at(
                    SyntaxKind::TextIdentifier,
                    pos,
                    end,
                    NodeData::TextIdentifier { text },
                )
            }
            SyntaxKind::NumericIdentifier => {
                let text = self.scanner.token_value().unwrap_or("").to_string();
                self.identifiers.insert(text.clone());
                let value = text.parse::<f64>().unwrap_or(0.0);
                let pos = self.scanner.start_pos();
                let end = self.scanner.pos();
                self.next_token();
                self.finish_node_at(
                    SyntaxKind::NumericIdentifier,
                    pos,
                    end,
                    NodeData::NumericIdentifier { text, value },
                )
            }
            SyntaxKind::HtmlIdentifier => {
                let html_content = self.scanner.token_value().unwrap_or("").to_string();
                let pos = self.scanner.start_pos();
                let end = self.scanner.pos();
                self.next_token();
                self.finish_node_at(
                    SyntaxKind::HtmlIdentifier,
                    pos,
                    end,
                    NodeData::HtmlIdentifier { html_content },
                )
            }
            SyntaxKind::QuotedTextIdentifier => self.parse_quoted_text_identifier(),
            _ => {
                self.parse_error_at_current("Identifier expected.", ParseErrorCode::ExpectationFailed);
                self.create_missing_node(SyntaxKind::TextIdentifier)
            }
        }
    }

    /// `"a" + "b" + ...` parses as one quoted identifier holding each
    /// segment; the binder computes the concatenation.
    fn parse_quoted_text_identifier(&mut self) -> NodeId {
        let pos = self.node_pos();
        let mut values = vec![self.parse_string_literal()];
        let rest = self.parse_list(
            ParsingContext::QuotedTextIdentifierConcatenation,
            Self::parse_concatenation_segment,
        );
        values.extend(rest);
        let mut joined = String::new();
        for value in &values {
            if let NodeData::StringLiteral { text } = &self.nodes[value.index()].data {
                joined.push_str(text);
            }
        }
        self.identifiers.insert(joined);
        self.finish_node(
            SyntaxKind::QuotedTextIdentifier,
            pos,
            NodeData::QuotedTextIdentifier {
                values,
                concatenation: None,
            },
        )
    }

    fn parse_string_literal(&mut self) -> NodeId {
        let text = self.scanner.token_value().unwrap_or("").to_string();
        let pos = self.scanner.start_pos();
        let end = self.scanner.pos();
        self.next_token();
        self.finish_node_at(SyntaxKind::StringLiteral, pos, end, NodeData::StringLiteral { text })
    }

    fn parse_concatenation_segment(&mut self) -> NodeId {
        self.parse_expected(SyntaxKind::PlusToken);
        if self.token() == SyntaxKind::QuotedTextIdentifier {
            self.parse_string_literal()
        } else {
            self.parse_error_at_current("String literal expected.", ParseErrorCode::ExpectationFailed);
            self.create_missing_node(SyntaxKind::StringLiteral)
        }
    }

    // --- generic list parsing with context-stacked recovery ---

    fn parse_list(
        &mut self,
        context: ParsingContext,
        mut parse_element: impl FnMut(&mut Self) -> NodeId,
    ) -> Vec<NodeId> {
        let saved = self.parsing_contexts;
        self.parsing_contexts |= context.bit();
        let mut elements = Vec::new();
        while self.token() != SyntaxKind::EndOfFile && !self.is_list_terminator(context) {
            if self.is_list_element(context) {
                elements.push(parse_element(self));
                continue;
            }
            if self.abort_list_or_skip(context) {
                break;
            }
        }
        self.parsing_contexts = saved;
        elements
    }

    fn is_list_element(&mut self, context: ParsingContext) -> bool {
        match context {
            ParsingContext::StatementList => {
                self.token().is_identifier()
                    || matches!(
                        self.token(),
                        SyntaxKind::GraphKeyword
                            | SyntaxKind::NodeKeyword
                            | SyntaxKind::EdgeKeyword
                            | SyntaxKind::SubgraphKeyword
                            | SyntaxKind::OpenBraceToken
                    )
            }
            ParsingContext::AttributeContainerList => self.token() == SyntaxKind::OpenBracketToken,
            ParsingContext::AssignmentList => {
                self.token().is_identifier()
                    && self.look_ahead(|parser| {
                        parser.next_token();
                        parser.token() == SyntaxKind::EqualsToken
                    })
            }
            ParsingContext::EdgeRhsList => self.token().is_edge_operator(),
            ParsingContext::QuotedTextIdentifierConcatenation => {
                self.token() == SyntaxKind::PlusToken
            }
        }
    }

    fn is_list_terminator(&mut self, context: ParsingContext) -> bool {
        match context {
            ParsingContext::StatementList => self.token() == SyntaxKind::CloseBraceToken,
            ParsingContext::AttributeContainerList => self.token() != SyntaxKind::OpenBracketToken,
            ParsingContext::AssignmentList => self.token() == SyntaxKind::CloseBracketToken,
            ParsingContext::EdgeRhsList => !self.token().is_edge_operator(),
            ParsingContext::QuotedTextIdentifierConcatenation => {
                self.token() != SyntaxKind::PlusToken
            }
        }
    }

    /// On an unexpected token, aborts the current list when the token is
    /// valid for any enclosing active context; otherwise reports one error
    /// and advances exactly one token.
    fn abort_list_or_skip(&mut self, current: ParsingContext) -> bool {
        for context in ParsingContext::ALL {
            if context == current || self.parsing_contexts & context.bit() == 0 {
                continue;
            }
            if self.is_list_element(context) || self.is_list_terminator(context) {
                return true;
            }
        }
        let text = self.current_token_text();
        self.parse_error_at_current(
            format!("Unexpected token '{text}'."),
            ParseErrorCode::FailedListParsing,
        );
        self.next_token();
        false
    }
}
