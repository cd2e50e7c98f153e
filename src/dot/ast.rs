//! Syntax tree for the DOT language
//!
//!     The tree is stored in a node arena owned by [`SourceFile`]; children
//!     are [`NodeId`] indices held by the parent's [`NodeData`] variant, and
//!     the parent back-reference assigned by the binder is a non-owning
//!     index. Token leaves (keywords, operators, punctuation the checker may
//!     flag) live in the same arena so spans and flags are uniform across
//!     the whole tree.
//!
//! Spans
//!
//!     Every node carries a half-open `[pos, end)` byte-offset span over the
//!     original source. `pos` is the position *before* leading trivia, so
//!     sibling spans tile the source; consumers use [`display_start`] to
//!     find the trivia-skipped start. A *missing node* (a zero-width
//!     placeholder synthesized during error recovery) is recognized by
//!     `pos == end`, and all text accessors special-case it.
//!
//! Lifecycle
//!
//!     A `SourceFile` is created once by the parser (content, tree,
//!     diagnostics, identifier set), mutated exactly once by the binder
//!     (symbols, colors, and the per-node parent/graph-context/symbol
//!     annotations), then read-only for the checker and all service
//!     consumers. Nodes are never deleted; diagnostics and flags only
//!     accumulate. Binding the same file twice is not supported.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::binder::{ColorTable, SymbolId, SymbolStore, SymbolTable};
use super::diagnostics::DiagnosticMessage;
use super::scanner::skip_trivia;
use super::token::SyntaxKind;

/// Index of a node in the [`SourceFile`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-node flags; monotonic once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeFlags(pub u8);

impl NodeFlags {
    pub const NONE: NodeFlags = NodeFlags(0);
    /// A diagnostic was reported while this node was being produced.
    pub const CONTAINS_ERRORS: NodeFlags = NodeFlags(1);
    /// The node is a zero-width error-recovery placeholder.
    pub const SYNTHESIZED: NodeFlags = NodeFlags(2);

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for NodeFlags {
    type Output = NodeFlags;
    fn bitor(self, rhs: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for NodeFlags {
    fn bitor_assign(&mut self, rhs: NodeFlags) {
        self.0 |= rhs.0;
    }
}

/// Graph context inherited from the nearest enclosing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextFlags(pub u8);

impl ContextFlags {
    pub const NONE: ContextFlags = ContextFlags(0);
    pub const STRICT: ContextFlags = ContextFlags(1);
    pub const DIRECTED: ContextFlags = ContextFlags(2);
    pub const UNDIRECTED: ContextFlags = ContextFlags(4);

    pub fn contains(self, other: ContextFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ContextFlags {
    type Output = ContextFlags;
    fn bitor(self, rhs: ContextFlags) -> ContextFlags {
        ContextFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ContextFlags {
    fn bitor_assign(&mut self, rhs: ContextFlags) {
        self.0 |= rhs.0;
    }
}

/// Kind-specific payload of a syntax node; the closed tagged union over
/// which [`for_each_child`] dispatches exhaustively.
///
/// Child vectors are assigned once at construction; they are the tree's only
/// ownership path.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// A leaf token (keyword, punctuation, operator, compass point).
    Token,
    TextIdentifier {
        text: String,
    },
    NumericIdentifier {
        text: String,
        value: f64,
    },
    /// One `"..."` segment of a quoted identifier, already unescaped.
    StringLiteral {
        text: String,
    },
    /// One or more string literals joined by `+`; `concatenation` is
    /// computed by the binder.
    QuotedTextIdentifier {
        values: Vec<NodeId>,
        concatenation: Option<String>,
    },
    HtmlIdentifier {
        html_content: String,
    },
    Graph {
        strict: Option<NodeId>,
        id: Option<NodeId>,
        statements: Vec<NodeId>,
    },
    NodeStatement {
        id: NodeId,
        attributes: Vec<NodeId>,
        terminator: Option<NodeId>,
    },
    EdgeStatement {
        source: NodeId,
        rhs: Vec<NodeId>,
        attributes: Vec<NodeId>,
        terminator: Option<NodeId>,
    },
    EdgeRhs {
        operation: NodeId,
        target: NodeId,
    },
    AttributeStatement {
        subject: NodeId,
        attributes: Vec<NodeId>,
        terminator: Option<NodeId>,
    },
    AttributeContainer {
        assignments: Vec<NodeId>,
    },
    Assignment {
        left: NodeId,
        right: NodeId,
        terminator: Option<NodeId>,
    },
    IdEqualsIdStatement {
        left: NodeId,
        right: NodeId,
        terminator: Option<NodeId>,
    },
    SubGraph {
        id: Option<NodeId>,
        statements: Vec<NodeId>,
    },
    SubGraphStatement {
        subgraph: NodeId,
        terminator: Option<NodeId>,
    },
    NodeId {
        id: NodeId,
        port: Option<NodeId>,
    },
    NormalPortDeclaration {
        id: NodeId,
        compass: Option<NodeId>,
    },
    CompassPortDeclaration {
        compass: NodeId,
    },
}

/// A node in the syntax tree: kind tag, span, flags, payload, and the
/// annotations assigned by the binder.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub pos: usize,
    pub end: usize,
    pub flags: NodeFlags,
    pub data: NodeData,
    /// Non-owning back-reference, assigned by the binder.
    pub parent: Option<NodeId>,
    /// Strict/directed/undirected context of the nearest enclosing graph.
    pub graph_context: ContextFlags,
    /// Symbol this node resolves to, if any.
    pub symbol: Option<SymbolId>,
}

impl SyntaxNode {
    /// True for zero-width error-recovery placeholders.
    pub fn is_missing(&self) -> bool {
        self.pos == self.end && self.kind != SyntaxKind::EndOfFile
    }
}

/// The result of parsing one DOT document.
#[derive(Debug)]
pub struct SourceFile {
    /// The original source text, immutable after parse.
    pub content: String,
    pub(crate) nodes: Vec<SyntaxNode>,
    /// The top-level graph, absent only for empty input.
    pub graph: Option<NodeId>,
    /// Every identifier text seen while parsing.
    pub identifiers: HashSet<String>,
    /// Ordered diagnostics accumulated by scan, parse, and check.
    pub diagnostics: Vec<DiagnosticMessage>,
    /// Arena of symbols created by the binder.
    pub symbols: SymbolStore,
    /// Global node-identifier scope, present after binding.
    pub global_symbols: Option<SymbolTable>,
    /// Color usages harvested by the binder, present after binding.
    pub colors: Option<ColorTable>,
}

impl SourceFile {
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SyntaxNode {
        &mut self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The decoded identifier text of a node, if it is identifier-shaped.
    ///
    /// For quoted identifiers this is the concatenation of all segments,
    /// whether or not the binder has cached it yet.
    pub fn identifier_text(&self, id: NodeId) -> Option<String> {
        match &self.node(id).data {
            NodeData::TextIdentifier { text } => Some(text.clone()),
            NodeData::NumericIdentifier { text, .. } => Some(text.clone()),
            NodeData::StringLiteral { text } => Some(text.clone()),
            NodeData::HtmlIdentifier { html_content } => Some(html_content.clone()),
            NodeData::QuotedTextIdentifier {
                values,
                concatenation,
            } => concatenation.clone().or_else(|| {
                let mut joined = String::new();
                for value in values {
                    if let NodeData::StringLiteral { text } = &self.node(*value).data {
                        joined.push_str(text);
                    }
                }
                Some(joined)
            }),
            _ => None,
        }
    }

    /// The source text covered by a node, from its trivia-skipped start.
    pub fn node_text(&self, id: NodeId) -> &str {
        let node = self.node(id);
        &self.content[display_start(self, id)..node.end]
    }

    /// True when the node or any descendant carries `CONTAINS_ERRORS`.
    pub fn subtree_has_errors(&self, id: NodeId) -> bool {
        if self.node(id).flags.contains(NodeFlags::CONTAINS_ERRORS) {
            return true;
        }
        let mut found = false;
        for_each_child(self, id, |child| {
            if !found {
                found = self.subtree_has_errors(child);
            }
        });
        found
    }
}

/// The trivia-skipped display start of a node.
///
/// Missing nodes have no text of their own, so their `pos` is returned
/// unchanged.
pub fn display_start(file: &SourceFile, id: NodeId) -> usize {
    let node = file.node(id);
    if node.is_missing() {
        node.pos
    } else {
        skip_trivia(&file.content, node.pos)
    }
}

/// Visits every direct child of a node, in source order.
///
/// This is the generic double-dispatch visitor the service layer builds on;
/// child arrays are visited element-wise.
pub fn for_each_child(file: &SourceFile, id: NodeId, mut visit: impl FnMut(NodeId)) {
    match &file.node(id).data {
        NodeData::Token
        | NodeData::TextIdentifier { .. }
        | NodeData::NumericIdentifier { .. }
        | NodeData::StringLiteral { .. }
        | NodeData::HtmlIdentifier { .. } => {}
        NodeData::QuotedTextIdentifier { values, .. } => {
            for value in values {
                visit(*value);
            }
        }
        NodeData::Graph {
            strict,
            id: graph_id,
            statements,
        } => {
            if let Some(strict) = strict {
                visit(*strict);
            }
            if let Some(graph_id) = graph_id {
                visit(*graph_id);
            }
            for statement in statements {
                visit(*statement);
            }
        }
        NodeData::NodeStatement {
            id: node_id,
            attributes,
            terminator,
        } => {
            visit(*node_id);
            for attribute in attributes {
                visit(*attribute);
            }
            if let Some(terminator) = terminator {
                visit(*terminator);
            }
        }
        NodeData::EdgeStatement {
            source,
            rhs,
            attributes,
            terminator,
        } => {
            visit(*source);
            for rhs in rhs {
                visit(*rhs);
            }
            for attribute in attributes {
                visit(*attribute);
            }
            if let Some(terminator) = terminator {
                visit(*terminator);
            }
        }
        NodeData::EdgeRhs { operation, target } => {
            visit(*operation);
            visit(*target);
        }
        NodeData::AttributeStatement {
            subject,
            attributes,
            terminator,
        } => {
            visit(*subject);
            for attribute in attributes {
                visit(*attribute);
            }
            if let Some(terminator) = terminator {
                visit(*terminator);
            }
        }
        NodeData::AttributeContainer { assignments } => {
            for assignment in assignments {
                visit(*assignment);
            }
        }
        NodeData::Assignment {
            left,
            right,
            terminator,
        }
        | NodeData::IdEqualsIdStatement {
            left,
            right,
            terminator,
        } => {
            visit(*left);
            visit(*right);
            if let Some(terminator) = terminator {
                visit(*terminator);
            }
        }
        NodeData::SubGraph {
            id: subgraph_id,
            statements,
        } => {
            if let Some(subgraph_id) = subgraph_id {
                visit(*subgraph_id);
            }
            for statement in statements {
                visit(*statement);
            }
        }
        NodeData::SubGraphStatement {
            subgraph,
            terminator,
        } => {
            visit(*subgraph);
            if let Some(terminator) = terminator {
                visit(*terminator);
            }
        }
        NodeData::NodeId { id: inner, port } => {
            visit(*inner);
            if let Some(port) = port {
                visit(*port);
            }
        }
        NodeData::NormalPortDeclaration { id: port_id, compass } => {
            visit(*port_id);
            if let Some(compass) = compass {
                visit(*compass);
            }
        }
        NodeData::CompassPortDeclaration { compass } => {
            visit(*compass);
        }
    }
}

/// Collects the direct children of a node, in source order.
pub fn children(file: &SourceFile, id: NodeId) -> Vec<NodeId> {
    let mut result = Vec::new();
    for_each_child(file, id, |child| result.push(child));
    result
}

/// Descends to the narrowest node enclosing the given offset.
///
/// Ties are broken by the first matching child in traversal order, except
/// that a zero-width node exactly at the offset is an immediate match. A
/// child whose end equals the offset is entered only when no half-open
/// match exists, which is how missing nodes sitting at the very end of a
/// parent's span are reached.
pub fn find_node_at_offset(file: &SourceFile, root: NodeId, offset: usize) -> NodeId {
    let mut current = root;
    'descend: loop {
        let candidates = children(file, current);
        for child in &candidates {
            let node = file.node(*child);
            if node.pos == node.end {
                if node.pos == offset {
                    current = *child;
                    continue 'descend;
                }
                continue;
            }
            if node.pos <= offset && offset < node.end {
                current = *child;
                continue 'descend;
            }
        }
        for child in &candidates {
            let node = file.node(*child);
            if node.pos < node.end && node.end == offset {
                current = *child;
                continue 'descend;
            }
        }
        return current;
    }
}

/// Renders an indented `kind [pos..end)` dump of the tree, for tests and
/// debugging.
pub fn tree_dump(file: &SourceFile) -> String {
    let mut out = String::new();
    if let Some(root) = file.graph {
        dump_node(file, root, 0, &mut out);
    }
    out
}

fn dump_node(file: &SourceFile, id: NodeId, depth: usize, out: &mut String) {
    let node = file.node(id);
    let _ = writeln!(
        out,
        "{:indent$}{:?} [{}..{})",
        "",
        node.kind,
        node.pos,
        node.end,
        indent = depth * 2
    );
    for_each_child(file, id, |child| dump_node(file, child, depth + 1, out));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot::parser::parse;

    #[test]
    fn test_missing_node_recognition() {
        let file = parse("digraph { a -> }");
        // Find the EdgeRhs target through the tree.
        let root = file.graph.expect("graph");
        let mut missing = Vec::new();
        collect_missing(&file, root, &mut missing);
        assert!(!missing.is_empty());
        let target = file.node(missing[0]);
        assert_eq!(target.pos, target.end);
    }

    fn collect_missing(file: &SourceFile, id: NodeId, out: &mut Vec<NodeId>) {
        if file.node(id).is_missing() {
            out.push(id);
        }
        for_each_child(file, id, |child| collect_missing(file, child, out));
    }

    #[test]
    fn test_display_start_skips_leading_trivia() {
        let file = parse("digraph {  a }");
        let root = file.graph.expect("graph");
        let statement = children(&file, root)
            .into_iter()
            .find(|id| file.node(*id).kind == SyntaxKind::NodeStatement)
            .expect("node statement");
        // The statement's pos includes the trivia after '{'.
        assert!(file.node(statement).pos < display_start(&file, statement));
        assert_eq!(file.node_text(statement), "a");
    }

    #[test]
    fn test_find_node_at_offset_descends_to_identifier() {
        let source = "digraph { a -> b }";
        let file = parse(source);
        let root = file.graph.expect("graph");
        let hit = find_node_at_offset(&file, root, source.find('b').unwrap());
        assert_eq!(file.node(hit).kind, SyntaxKind::TextIdentifier);
        assert_eq!(file.identifier_text(hit).as_deref(), Some("b"));
    }

    #[test]
    fn test_find_node_at_offset_prefers_zero_width_match() {
        let source = "digraph { a -> }";
        let file = parse(source);
        let root = file.graph.expect("graph");
        // The missing target sits right after the operator's end.
        let offset = source.find("->").unwrap() + 2;
        let hit = find_node_at_offset(&file, root, offset);
        assert!(file.node(hit).is_missing());
    }

    #[test]
    fn test_sibling_spans_tile_the_statement_list() {
        let source = "digraph { a; b; c -> d }";
        let file = parse(source);
        assert!(file.diagnostics.is_empty());
        let root = file.graph.expect("graph");
        let statements: Vec<NodeId> = children(&file, root)
            .into_iter()
            .filter(|id| !matches!(file.node(*id).data, NodeData::Token))
            .collect();
        let mut previous_end = None;
        for statement in statements {
            let node = file.node(statement);
            if let Some(previous_end) = previous_end {
                assert_eq!(node.pos, previous_end);
            }
            previous_end = Some(node.end);
        }
    }
}
