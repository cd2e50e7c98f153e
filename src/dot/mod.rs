//! DOT language front-end
//!
//!     A scanner, recursive-descent parser, binder, and semantic checker
//!     for the DOT graph-description language. The pipeline is:
//!
//!     source text -> [`scanner::Scanner`] tokens pulled on demand by
//!     [`parser::parse`] -> syntax tree plus diagnostics on a
//!     [`ast::SourceFile`] -> [`binder::bind`] annotates parents, graph
//!     context, symbols, and colors -> [`checker::check`] appends semantic
//!     diagnostics.
//!
//!     Each stage is a pure function over its predecessor's output;
//!     malformed input always yields a complete, error-flagged tree and
//!     never an `Err` or a panic. [`analyze`] runs the whole pipeline.

pub mod ast;
pub mod binder;
pub mod checker;
pub mod diagnostics;
pub mod parser;
pub mod scanner;
pub mod shapes;
pub mod text;
pub mod token;

use self::ast::SourceFile;

/// Parses, binds, and checks one DOT document.
pub fn analyze(source: &str) -> SourceFile {
    let mut file = parser::parse(source);
    binder::bind(&mut file);
    checker::check(&mut file);
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot::diagnostics::{CheckErrorCode, ErrorCode};

    #[test]
    fn test_analyze_runs_full_pipeline() {
        let file = analyze("graph a { a -- b; b [color=cyan] }");
        assert!(file.diagnostics.is_empty());
        assert!(file.global_symbols.is_some());
        assert!(file.colors.as_ref().is_some_and(|c| c.get("cyan").is_some()));
    }

    #[test]
    fn test_analyze_surfaces_check_diagnostics() {
        let file = analyze("graph { a -> b }");
        assert_eq!(file.diagnostics.len(), 1);
        assert_eq!(
            file.diagnostics[0].code,
            ErrorCode::Check(CheckErrorCode::InvalidEdgeOperation)
        );
    }
}
