//! Semantic checks over the parsed tree
//!
//!     The checker runs after the binder and only appends: semantic
//!     diagnostics on the file and `CONTAINS_ERRORS` flags on offending
//!     operator tokens. It never reshapes the tree.
//!
//! Edge-Operator Consistency
//!
//!     The root graph's kind mandates a single legal edge operator (`->`
//!     for `digraph`, `--` for `graph`). Every edge right-hand side in the
//!     document, including those inside subgraphs, is checked against it;
//!     DOT has no per-subgraph direction override. Each violation produces
//!     exactly one diagnostic pointing at the operator's trivia-skipped
//!     span.
//!
//! Shape Names
//!
//!     Values assigned to a `shape` attribute are checked against the known
//!     shape table when the value parsed cleanly; see [`shapes`].
//!
//! [`shapes`]: crate::dot::shapes

use super::ast::{children, display_start, NodeData, NodeFlags, NodeId, SourceFile};
use super::diagnostics::{CheckErrorCode, DiagnosticCategory, DiagnosticMessage, ErrorCode};
use super::shapes::is_valid_shape;
use super::token::{token_display, SyntaxKind};

/// Appends semantic diagnostics to an already-parsed file.
pub fn check(file: &mut SourceFile) {
    let Some(root) = file.graph else {
        return;
    };
    let expected = match file.node(root).kind {
        SyntaxKind::DirectedGraph => SyntaxKind::DirectedEdgeOp,
        _ => SyntaxKind::UndirectedEdgeOp,
    };

    let mut violations = Vec::new();
    collect_violations(file, root, expected, &mut violations);

    for violation in violations {
        match violation {
            Violation::EdgeOperation { operation } => {
                let start = display_start(file, operation);
                let end = file.node(operation).end;
                let found = token_display(file.node(operation).kind).unwrap_or("");
                let legal = token_display(expected).unwrap_or("");
                file.node_mut(operation).flags |= NodeFlags::CONTAINS_ERRORS;
                file.diagnostics.push(DiagnosticMessage {
                    message: format!(
                        "The edge operation '{found}' is not allowed here; use '{legal}' instead."
                    ),
                    code: ErrorCode::Check(CheckErrorCode::InvalidEdgeOperation),
                    category: DiagnosticCategory::Error,
                    start,
                    end,
                });
            }
            Violation::ShapeName { value } => {
                let start = display_start(file, value);
                let end = file.node(value).end;
                let text = file.identifier_text(value).unwrap_or_default();
                file.diagnostics.push(DiagnosticMessage {
                    message: format!("Unknown shape '{text}'."),
                    code: ErrorCode::Check(CheckErrorCode::InvalidShapeName),
                    category: DiagnosticCategory::Error,
                    start,
                    end,
                });
            }
        }
    }
}

enum Violation {
    EdgeOperation { operation: NodeId },
    ShapeName { value: NodeId },
}

fn collect_violations(
    file: &SourceFile,
    id: NodeId,
    expected: SyntaxKind,
    out: &mut Vec<Violation>,
) {
    match &file.node(id).data {
        NodeData::EdgeRhs { operation, .. } => {
            let kind = file.node(*operation).kind;
            if kind.is_edge_operator() && kind != expected {
                out.push(Violation::EdgeOperation {
                    operation: *operation,
                });
            }
        }
        NodeData::Assignment { left, right, .. } => {
            if is_shape_assignment(file, *left, *right) {
                out.push(Violation::ShapeName { value: *right });
            }
        }
        _ => {}
    }
    for child in children(file, id) {
        collect_violations(file, child, expected, out);
    }
}

/// True when the assignment sets `shape` to a cleanly parsed value that is
/// not a known shape.
fn is_shape_assignment(file: &SourceFile, left: NodeId, right: NodeId) -> bool {
    let Some(name) = file.identifier_text(left) else {
        return false;
    };
    if !name.eq_ignore_ascii_case("shape") {
        return false;
    }
    if file.subtree_has_errors(right) {
        return false;
    }
    let Some(value) = file.identifier_text(right) else {
        return false;
    };
    !value.is_empty() && !is_valid_shape(&value)
}
