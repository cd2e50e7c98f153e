//! Diagnostic types for the DOT front-end
//!
//!     Every stage of the pipeline (scan, parse, check) accumulates
//!     diagnostics into one ordered list on the [`SourceFile`]; malformed
//!     input never raises an error through the API. Each diagnostic carries
//!     a half-open `[start, end)` byte-offset range into the original
//!     source, suitable for squiggly-underline rendering.
//!
//! External Error Codes
//!
//!     The documented external code format concatenates the fixed `DOT` tag,
//!     the numeric source id, and a zero-padded 3-digit sub-code. For
//!     example, a parse error (source id 2) with sub-code 2 renders as
//!     `DOT2002`.
//!
//! [`SourceFile`]: crate::dot::ast::SourceFile

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
    Suggestion,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Message => write!(f, "message"),
            DiagnosticCategory::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// The stage a diagnostic originated from.
///
/// The discriminants are the numeric source ids used in external codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSource {
    Scan = 1,
    Parse = 2,
    Check = 4,
}

/// Sub-codes for scanner diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanErrorCode {
    ExpectationFailed = 0,
    Unterminated = 1,
}

/// Sub-codes for parser diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorCode {
    TrailingData = 0,
    ExpectationFailed = 1,
    FailedListParsing = 2,
}

/// Sub-codes for checker diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckErrorCode {
    InvalidEdgeOperation = 0,
    InvalidShapeName = 1,
}

/// A fully qualified diagnostic code: source namespace plus sub-code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Scan(ScanErrorCode),
    Parse(ParseErrorCode),
    Check(CheckErrorCode),
}

impl ErrorCode {
    /// The source namespace of this code.
    pub fn source(self) -> ErrorSource {
        match self {
            ErrorCode::Scan(_) => ErrorSource::Scan,
            ErrorCode::Parse(_) => ErrorSource::Parse,
            ErrorCode::Check(_) => ErrorSource::Check,
        }
    }

    /// The numeric sub-code within the source namespace.
    pub fn sub(self) -> u8 {
        match self {
            ErrorCode::Scan(sub) => sub as u8,
            ErrorCode::Parse(sub) => sub as u8,
            ErrorCode::Check(sub) => sub as u8,
        }
    }

    /// Formats the external code, e.g. `DOT2002`.
    pub fn format(self) -> String {
        format!("DOT{}{:03}", self.source() as u8, self.sub())
    }
}

/// A single diagnostic with a half-open byte-offset range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    pub message: String,
    pub code: ErrorCode,
    pub category: DiagnosticCategory,
    pub start: usize,
    pub end: usize,
}

impl DiagnosticMessage {
    /// Renders this diagnostic as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Renders a diagnostic list as a JSON array, the shape hosts consume.
pub fn diagnostics_to_json(diagnostics: &[DiagnosticMessage]) -> serde_json::Result<String> {
    serde_json::to_string(diagnostics)
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} at {}..{}",
            self.category,
            self.code.format(),
            self.message,
            self.start,
            self.end
        )
    }
}
