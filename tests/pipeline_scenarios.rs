//! End-to-end scenarios over the full analyze pipeline
//!
//! Each test feeds one realistic document through parse + bind + check and
//! asserts on the tree shape, symbol tables, and diagnostics together, the
//! way an editor host consumes the front-end.

use dot_parser::dot::analyze;
use dot_parser::dot::ast::{children, display_start, NodeData, SourceFile};
use dot_parser::dot::diagnostics::{CheckErrorCode, ErrorCode, ErrorSource};
use dot_parser::dot::token::SyntaxKind;

fn statements(file: &SourceFile) -> Vec<dot_parser::dot::ast::NodeId> {
    let root = file.graph.expect("graph");
    match &file.node(root).data {
        NodeData::Graph { statements, .. } => statements.clone(),
        other => panic!("expected graph data, got {other:?}"),
    }
}

#[test]
fn directed_edge_roundtrip() {
    let file = analyze("digraph { a -> b }");
    assert!(file.diagnostics.is_empty());
    let root = file.graph.expect("graph");
    assert_eq!(file.node(root).kind, SyntaxKind::DirectedGraph);
    let statements = statements(&file);
    assert_eq!(statements.len(), 1);
    let NodeData::EdgeStatement { source, rhs, .. } = &file.node(statements[0]).data else {
        panic!("expected edge statement");
    };
    let NodeData::NodeId { id, .. } = &file.node(*source).data else {
        panic!("expected node id");
    };
    assert_eq!(file.identifier_text(*id).as_deref(), Some("a"));
    let NodeData::EdgeRhs { operation, target } = &file.node(rhs[0]).data else {
        panic!("expected edge rhs");
    };
    assert_eq!(file.node(*operation).kind, SyntaxKind::DirectedEdgeOp);
    let NodeData::NodeId { id, .. } = &file.node(*target).data else {
        panic!("expected node id");
    };
    assert_eq!(file.identifier_text(*id).as_deref(), Some("b"));
}

#[test]
fn undirected_graph_rejects_directed_operator() {
    let file = analyze("graph { a -> b }");
    assert_eq!(file.diagnostics.len(), 1);
    let diagnostic = &file.diagnostics[0];
    assert_eq!(diagnostic.code.source(), ErrorSource::Check);
    assert_eq!(
        diagnostic.code,
        ErrorCode::Check(CheckErrorCode::InvalidEdgeOperation)
    );
    assert!(diagnostic.message.contains("--"));
}

#[test]
fn quoted_concatenation_binds_to_joined_text() {
    let file = analyze(r#"digraph { "x" + "y" -> z }"#);
    assert!(file.diagnostics.is_empty());
    let statements = statements(&file);
    let NodeData::EdgeStatement { source, .. } = &file.node(statements[0]).data else {
        panic!("expected edge statement");
    };
    let NodeData::NodeId { id, .. } = &file.node(*source).data else {
        panic!("expected node id");
    };
    let NodeData::QuotedTextIdentifier { values, concatenation } = &file.node(*id).data else {
        panic!("expected quoted identifier");
    };
    assert_eq!(values.len(), 2);
    assert_eq!(concatenation.as_deref(), Some("xy"));
    let symbols = file.global_symbols.as_ref().expect("bound");
    assert!(symbols.get("xy").is_some());
}

#[test]
fn repeated_color_assignment_keeps_last_value() {
    let file = analyze("digraph { a[color=red]; a[color=blue] }");
    let colors = file.colors.as_ref().expect("bound");
    assert_eq!(colors.len(), 1);
    assert!(colors.get("blue").is_some());
}

#[test]
fn truncated_edge_keeps_a_traversable_tree() {
    let file = analyze("digraph { a -> }");
    assert!(!file.diagnostics.is_empty());
    let statements = statements(&file);
    let NodeData::EdgeStatement { rhs, .. } = &file.node(statements[0]).data else {
        panic!("expected edge statement");
    };
    let NodeData::EdgeRhs { target, .. } = &file.node(rhs[0]).data else {
        panic!("expected edge rhs");
    };
    let target = file.node(*target);
    assert_eq!(target.pos, target.end);
}

#[test]
fn realistic_document_is_clean() {
    let source = r##"
        // build dependencies
        strict digraph deps {
            rankdir = LR;
            node [shape=box, fontcolor="#333333"];
            "core lib" -> parser -> binder;
            parser -> checker [style=dashed];
            subgraph cluster_tools {
                label = "tools";
                cli:out:e -> viewer;
            }
            { cli viewer } -> docs;
        }
    "##;
    let file = analyze(source);
    assert!(
        file.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        file.diagnostics
    );
    let symbols = file.global_symbols.as_ref().expect("bound");
    for name in ["core lib", "parser", "binder", "checker", "cli", "viewer", "docs"] {
        assert!(symbols.get(name).is_some(), "missing symbol {name}");
    }
    let colors = file.colors.as_ref().expect("bound");
    assert!(colors.get("#333333").is_some());
}

#[test]
fn statement_texts_tile_the_source() {
    let source = "digraph { a; b [shape=box]; c -> d; e = f }";
    let file = analyze(source);
    assert!(file.diagnostics.is_empty());
    let statements = statements(&file);
    assert_eq!(statements.len(), 4);
    let mut previous_end = None;
    for statement in &statements {
        let node = file.node(*statement);
        if let Some(previous_end) = previous_end {
            assert_eq!(node.pos, previous_end);
        }
        previous_end = Some(node.end);
        // The trivia-skipped slice reproduces the statement text.
        let text = &source[display_start(&file, *statement)..node.end];
        assert!(!text.starts_with(char::is_whitespace));
    }
}

#[test]
fn comments_and_unicode_identifiers_scan_cleanly() {
    let source = "digraph { /* edges */ caf\u{00e9} -> b # trailing\n c -> d }";
    let file = analyze(source);
    assert!(file.diagnostics.is_empty());
    assert!(file.identifiers.contains("caf\u{00e9}"));
}

#[test]
fn html_label_assignment_parses() {
    let file = analyze("digraph { a [label=<<b>bold</b>>] }");
    assert!(file.diagnostics.is_empty());
    let statements = statements(&file);
    let NodeData::NodeStatement { attributes, .. } = &file.node(statements[0]).data else {
        panic!("expected node statement");
    };
    let NodeData::AttributeContainer { assignments } = &file.node(attributes[0]).data else {
        panic!("expected container");
    };
    let NodeData::Assignment { right, .. } = &file.node(assignments[0]).data else {
        panic!("expected assignment");
    };
    assert_eq!(file.node(*right).kind, SyntaxKind::HtmlIdentifier);
}

#[test]
fn unterminated_string_reports_scan_diagnostic() {
    let file = analyze("digraph { a [label=\"oops] }");
    assert!(file
        .diagnostics
        .iter()
        .any(|d| d.code.source() == ErrorSource::Scan));
}

#[test]
fn every_diagnostic_span_is_within_bounds() {
    let source = "digraph { & a -> ; b [ = ] \"x }";
    let file = analyze(source);
    assert!(!file.diagnostics.is_empty());
    for diagnostic in &file.diagnostics {
        assert!(diagnostic.start <= diagnostic.end);
        assert!(diagnostic.end <= source.len());
    }
}

#[test]
fn children_walk_reaches_every_statement() {
    let source = "digraph { a -> b; subgraph s { c } }";
    let file = analyze(source);
    let root = file.graph.expect("graph");
    let mut seen = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if file.node(id).kind == SyntaxKind::NodeId {
            seen += 1;
        }
        stack.extend(children(&file, id));
    }
    assert_eq!(seen, 3);
}
