//! Offset to line/column translation
//!
//!     The front-end operates purely on byte offsets; hosts that want
//!     line/column positions (editor protocols, human-readable output)
//!     build a [`SourceMap`] once per document and translate on demand.
//!
//!     Conversion is O(log n) via binary search over precomputed line
//!     starts. Columns count characters, not bytes, so multi-byte UTF-8
//!     text maps correctly.

use std::fmt;

/// A zero-based line:column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Precomputed line starts over one document, for offset translation.
#[derive(Debug)]
pub struct SourceMap<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { text, line_starts }
    }

    /// Translates a byte offset into a line:column position.
    ///
    /// Offsets past the end of the text clamp to the final position;
    /// offsets inside a multi-byte character floor to that character's
    /// start.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = self.text[self.line_starts[line]..offset].chars().count();
        Position { line, column }
    }

    /// Translates a line:column position back into a byte offset.
    ///
    /// Positions past the end of a line clamp to the line's end; lines past
    /// the end of the document clamp to the text length.
    pub fn offset_at(&self, position: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(position.line) else {
            return self.text.len();
        };
        let line_end = self
            .line_starts
            .get(position.line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.text.len());
        let line = &self.text[line_start..line_end];
        match line.char_indices().nth(position.column) {
            Some((offset, _)) => line_start + offset,
            None => line_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "digraph {\n  a -> b;\n}\n";

    #[test]
    fn test_position_at_start_of_lines() {
        let map = SourceMap::new(SOURCE);
        assert_eq!(map.position_at(0), Position::new(0, 0));
        assert_eq!(map.position_at(10), Position::new(1, 0));
        assert_eq!(map.position_at(20), Position::new(2, 0));
    }

    #[test]
    fn test_position_at_mid_line() {
        let map = SourceMap::new(SOURCE);
        let offset = SOURCE.find("->").unwrap();
        assert_eq!(map.position_at(offset), Position::new(1, 4));
    }

    #[test]
    fn test_position_at_clamps_past_end() {
        let map = SourceMap::new(SOURCE);
        assert_eq!(map.position_at(SOURCE.len() + 10), Position::new(3, 0));
    }

    #[test]
    fn test_offset_round_trip() {
        let map = SourceMap::new(SOURCE);
        for offset in [0, 5, 10, 15, SOURCE.len()] {
            assert_eq!(map.offset_at(map.position_at(offset)), offset);
        }
    }

    #[test]
    fn test_multibyte_columns_count_characters() {
        let source = "graph { \u{00e9}\u{00e9} }";
        let map = SourceMap::new(source);
        let offset = source.find('}').unwrap();
        // Two two-byte characters before the brace still count as two columns.
        assert_eq!(map.position_at(offset), Position::new(0, 11));
        assert_eq!(map.offset_at(Position::new(0, 11)), offset);
    }

    #[test]
    fn test_position_at_floors_mid_character_offsets() {
        let source = "graph { \u{00e9} }";
        let map = SourceMap::new(source);
        // Offset 9 lands on the second byte of the two-byte character at 8.
        assert_eq!(map.position_at(9), map.position_at(8));
        assert_eq!(map.position_at(9), Position::new(0, 8));
    }

    #[test]
    fn test_offset_at_clamps_long_column() {
        let map = SourceMap::new(SOURCE);
        assert_eq!(map.offset_at(Position::new(0, 99)), 9);
        assert_eq!(map.offset_at(Position::new(99, 0)), SOURCE.len());
    }
}
