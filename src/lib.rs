//! # dot-parser
//!
//! A fault-tolerant front-end for the DOT graph-description language:
//! scanner, recursive-descent parser with structured error recovery,
//! binder, and semantic checker. Built to power editor tooling, so any
//! input, including malformed input, produces a complete syntax tree
//! with precise, offset-addressed diagnostics.
//!
//! ```
//! use dot_parser::dot;
//!
//! let file = dot::analyze("digraph deps { a -> b }");
//! assert!(file.diagnostics.is_empty());
//! ```

pub mod dot;

pub use dot::analyze;
pub use dot::ast::SourceFile;
pub use dot::diagnostics::DiagnosticMessage;
