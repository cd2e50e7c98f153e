//! Token kinds and classification tables for the DOT language
//!
//!     This module defines [`SyntaxKind`], the single closed enum shared by the
//!     scanner (token kinds) and the syntax tree (node kinds), along with the
//!     keyword/compass lookup table and display helpers.
//!
//! Keyword Recognition
//!
//!     DOT keywords (`graph`, `digraph`, `node`, `edge`, `subgraph`, `strict`)
//!     are matched case-insensitively. The scanner only consults the lookup
//!     table for identifier texts of length 4 to 8 starting with an ASCII
//!     letter, which covers every keyword and nothing else; compass points
//!     (length 1 to 2) therefore never surface as compass tokens from the
//!     scanner. The parser re-classifies identifiers into compass tokens in
//!     port position using the same table without the length gate.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The closed set of token and syntax-node kinds.
///
/// Token kinds come first (trivia, punctuation, operators, keywords, compass
/// points, identifier classes), followed by the tree-node kinds produced by
/// the parser. Keeping both in one enum lets token leaves live in the syntax
/// tree with uniform spans and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    Unknown,
    EndOfFile,

    // Trivia (only produced when scanning with `skip_trivia = false`)
    NewLineTrivia,
    WhitespaceTrivia,
    HashCommentTrivia,
    SingleLineCommentTrivia,
    MultiLineCommentTrivia,

    // Punctuation
    CommaToken,
    SemicolonToken,
    PlusToken,
    OpenBraceToken,
    CloseBraceToken,
    OpenBracketToken,
    CloseBracketToken,
    ColonToken,
    EqualsToken,
    LessThanToken,
    GreaterThanToken,

    // Edge operators
    DirectedEdgeOp,
    UndirectedEdgeOp,

    // Keywords
    GraphKeyword,
    DigraphKeyword,
    NodeKeyword,
    EdgeKeyword,
    SubgraphKeyword,
    StrictKeyword,

    // Compass points (materialized by the parser in port position)
    CompassNorthToken,
    CompassNorthEastToken,
    CompassEastToken,
    CompassSouthEastToken,
    CompassSouthToken,
    CompassSouthWestToken,
    CompassWestToken,
    CompassNorthWestToken,
    CompassCenterToken,
    UnderscoreToken,

    // Identifier token classes
    TextIdentifier,
    QuotedTextIdentifier,
    HtmlIdentifier,
    NumericIdentifier,

    // Tree-node kinds
    StringLiteral,
    DirectedGraph,
    UndirectedGraph,
    NodeStatement,
    EdgeStatement,
    AttributeStatement,
    IdEqualsIdStatement,
    SubGraph,
    SubGraphStatement,
    EdgeRhs,
    AttributeContainer,
    Assignment,
    NormalPortDeclaration,
    CompassPortDeclaration,
    NodeId,
}

impl SyntaxKind {
    /// Returns true for trivia token kinds (whitespace, newlines, comments).
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::NewLineTrivia
                | SyntaxKind::WhitespaceTrivia
                | SyntaxKind::HashCommentTrivia
                | SyntaxKind::SingleLineCommentTrivia
                | SyntaxKind::MultiLineCommentTrivia
        )
    }

    /// Returns true for the four identifier token classes.
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::TextIdentifier
                | SyntaxKind::QuotedTextIdentifier
                | SyntaxKind::HtmlIdentifier
                | SyntaxKind::NumericIdentifier
        )
    }

    /// Returns true for `->` and `--`.
    pub fn is_edge_operator(self) -> bool {
        matches!(self, SyntaxKind::DirectedEdgeOp | SyntaxKind::UndirectedEdgeOp)
    }

    /// Returns true for the compass-point token kinds (including `_`).
    pub fn is_compass_point(self) -> bool {
        matches!(
            self,
            SyntaxKind::CompassNorthToken
                | SyntaxKind::CompassNorthEastToken
                | SyntaxKind::CompassEastToken
                | SyntaxKind::CompassSouthEastToken
                | SyntaxKind::CompassSouthToken
                | SyntaxKind::CompassSouthWestToken
                | SyntaxKind::CompassWestToken
                | SyntaxKind::CompassNorthWestToken
                | SyntaxKind::CompassCenterToken
                | SyntaxKind::UnderscoreToken
        )
    }

    /// Returns true for the DOT keyword token kinds.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::GraphKeyword
                | SyntaxKind::DigraphKeyword
                | SyntaxKind::NodeKeyword
                | SyntaxKind::EdgeKeyword
                | SyntaxKind::SubgraphKeyword
                | SyntaxKind::StrictKeyword
        )
    }
}

/// Per-token flags reported by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenFlags(pub u8);

impl TokenFlags {
    pub const NONE: TokenFlags = TokenFlags(0);
    /// The literal token was not closed before EOF or a raw newline.
    pub const UNTERMINATED: TokenFlags = TokenFlags(1);

    pub fn contains(self, other: TokenFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TokenFlags {
    type Output = TokenFlags;
    fn bitor(self, rhs: TokenFlags) -> TokenFlags {
        TokenFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TokenFlags {
    fn bitor_assign(&mut self, rhs: TokenFlags) {
        self.0 |= rhs.0;
    }
}

/// Keyword and compass-point texts mapped to their token kinds.
///
/// Lookups are performed on ASCII-lowercased text; see [`text_to_kind`].
static TEXT_TO_KIND: Lazy<HashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
    HashMap::from([
        ("graph", SyntaxKind::GraphKeyword),
        ("digraph", SyntaxKind::DigraphKeyword),
        ("node", SyntaxKind::NodeKeyword),
        ("edge", SyntaxKind::EdgeKeyword),
        ("subgraph", SyntaxKind::SubgraphKeyword),
        ("strict", SyntaxKind::StrictKeyword),
        ("n", SyntaxKind::CompassNorthToken),
        ("ne", SyntaxKind::CompassNorthEastToken),
        ("e", SyntaxKind::CompassEastToken),
        ("se", SyntaxKind::CompassSouthEastToken),
        ("s", SyntaxKind::CompassSouthToken),
        ("sw", SyntaxKind::CompassSouthWestToken),
        ("w", SyntaxKind::CompassWestToken),
        ("nw", SyntaxKind::CompassNorthWestToken),
        ("c", SyntaxKind::CompassCenterToken),
        ("_", SyntaxKind::UnderscoreToken),
    ])
});

/// Looks up an identifier text in the keyword/compass table, case-insensitively.
pub fn text_to_kind(text: &str) -> Option<SyntaxKind> {
    TEXT_TO_KIND.get(text.to_ascii_lowercase().as_str()).copied()
}

/// Classifies a scanned identifier text as a keyword or a plain text identifier.
///
/// The table is only consulted for texts of length 4 to 8 whose first
/// character is an ASCII letter; everything else (including compass-point
/// texts) falls through to [`SyntaxKind::TextIdentifier`].
pub fn classify_identifier(text: &str) -> SyntaxKind {
    let len = text.len();
    if (4..=8).contains(&len) && text.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        if let Some(kind) = text_to_kind(text) {
            if kind.is_keyword() {
                return kind;
            }
        }
    }
    SyntaxKind::TextIdentifier
}

/// Returns the fixed display text of a token kind, if it has one.
///
/// Identifier and trivia kinds have no fixed text and return `None`.
pub fn token_display(kind: SyntaxKind) -> Option<&'static str> {
    Some(match kind {
        SyntaxKind::CommaToken => ",",
        SyntaxKind::SemicolonToken => ";",
        SyntaxKind::PlusToken => "+",
        SyntaxKind::OpenBraceToken => "{",
        SyntaxKind::CloseBraceToken => "}",
        SyntaxKind::OpenBracketToken => "[",
        SyntaxKind::CloseBracketToken => "]",
        SyntaxKind::ColonToken => ":",
        SyntaxKind::EqualsToken => "=",
        SyntaxKind::LessThanToken => "<",
        SyntaxKind::GreaterThanToken => ">",
        SyntaxKind::DirectedEdgeOp => "->",
        SyntaxKind::UndirectedEdgeOp => "--",
        SyntaxKind::GraphKeyword => "graph",
        SyntaxKind::DigraphKeyword => "digraph",
        SyntaxKind::NodeKeyword => "node",
        SyntaxKind::EdgeKeyword => "edge",
        SyntaxKind::SubgraphKeyword => "subgraph",
        SyntaxKind::StrictKeyword => "strict",
        SyntaxKind::CompassNorthToken => "n",
        SyntaxKind::CompassNorthEastToken => "ne",
        SyntaxKind::CompassEastToken => "e",
        SyntaxKind::CompassSouthEastToken => "se",
        SyntaxKind::CompassSouthToken => "s",
        SyntaxKind::CompassSouthWestToken => "sw",
        SyntaxKind::CompassWestToken => "w",
        SyntaxKind::CompassNorthWestToken => "nw",
        SyntaxKind::CompassCenterToken => "c",
        SyntaxKind::UnderscoreToken => "_",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_match_case_insensitively() {
        assert_eq!(classify_identifier("digraph"), SyntaxKind::DigraphKeyword);
        assert_eq!(classify_identifier("DiGraph"), SyntaxKind::DigraphKeyword);
        assert_eq!(classify_identifier("STRICT"), SyntaxKind::StrictKeyword);
        assert_eq!(classify_identifier("node"), SyntaxKind::NodeKeyword);
        assert_eq!(classify_identifier("subgraph"), SyntaxKind::SubgraphKeyword);
    }

    #[test]
    fn test_length_gate_excludes_compass_points() {
        // Compass points are below the 4-character floor, so the scanner path
        // classifies them as plain text identifiers.
        assert_eq!(classify_identifier("n"), SyntaxKind::TextIdentifier);
        assert_eq!(classify_identifier("ne"), SyntaxKind::TextIdentifier);
        assert_eq!(classify_identifier("_"), SyntaxKind::TextIdentifier);
        // The full table still resolves them for the parser's port logic.
        assert_eq!(text_to_kind("ne"), Some(SyntaxKind::CompassNorthEastToken));
        assert_eq!(text_to_kind("_"), Some(SyntaxKind::UnderscoreToken));
    }

    #[test]
    fn test_length_gate_upper_bound() {
        // Identifiers longer than 8 characters are never keywords, even if a
        // keyword happens to prefix them.
        assert_eq!(classify_identifier("subgraphs"), SyntaxKind::TextIdentifier);
        assert_eq!(classify_identifier("digraphxx"), SyntaxKind::TextIdentifier);
    }

    #[test]
    fn test_non_letter_start_is_text() {
        assert_eq!(classify_identifier("_node"), SyntaxKind::TextIdentifier);
        assert_eq!(classify_identifier("1edge"), SyntaxKind::TextIdentifier);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(token_display(SyntaxKind::DirectedEdgeOp), Some("->"));
        assert_eq!(token_display(SyntaxKind::UndirectedEdgeOp), Some("--"));
        assert_eq!(token_display(SyntaxKind::OpenBracketToken), Some("["));
        assert_eq!(token_display(SyntaxKind::TextIdentifier), None);
    }
}
