//! Hand-written scanner for the DOT language
//!
//!     The scanner advances a cursor over an immutable source string and
//!     yields one classified token per [`Scanner::scan`] call. In normal
//!     parsing mode (`skip_trivia = true`) whitespace, newlines, and comments
//!     are consumed silently; in trivia mode each trivia run is a distinct
//!     token carrying its text. All positions are byte offsets into the
//!     original source.
//!
//! Position Registers
//!
//!     - `start_pos`: position before the current token's leading trivia.
//!       The parser uses this as a node's `pos`, so node spans include
//!       leading trivia.
//!     - `token_pos`: position of the token text itself, after trivia.
//!     - `pos`: the cursor, one past the end of the current token.
//!
//! Speculative Scanning
//!
//!     [`Scanner::look_ahead`] and [`Scanner::try_scan`] snapshot the scalar
//!     registers (and the pending-error count) into a [`ScannerCheckpoint`]
//!     before invoking the callback. `look_ahead` always restores; `try_scan`
//!     restores only when the callback returns `false`. Nesting is legal.
//!     This is the only mechanism the parser needs to disambiguate statement
//!     forms without a separate grammar pass.
//!
//! Error Reporting
//!
//!     Scan errors never stop the scanner; it records a [`ScanError`] and
//!     continues from the next character. The parser drains the queue after
//!     each scan, which keeps rollback of speculative scans a simple
//!     truncation.

use super::diagnostics::ScanErrorCode;
use super::token::{classify_identifier, SyntaxKind, TokenFlags};

/// A buffered scanner error, drained by the parser into the diagnostics list.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    pub message: String,
    pub code: ScanErrorCode,
    pub pos: usize,
    pub length: usize,
}

/// Snapshot of the scanner's scalar registers for speculative scanning.
#[derive(Debug, Clone)]
pub struct ScannerCheckpoint {
    pos: usize,
    start_pos: usize,
    token_pos: usize,
    token: SyntaxKind,
    token_value: Option<String>,
    token_flags: TokenFlags,
    error_count: usize,
}

/// Tokenizer over an immutable source string.
///
/// One scanner instance serves one parse; it is not reentrant. Concurrent
/// parses require separate instances.
#[derive(Debug)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    start_pos: usize,
    token_pos: usize,
    token: SyntaxKind,
    token_value: Option<String>,
    token_flags: TokenFlags,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            start_pos: 0,
            token_pos: 0,
            token: SyntaxKind::Unknown,
            token_value: None,
            token_flags: TokenFlags::NONE,
            errors: Vec::new(),
        }
    }

    /// The cursor, one past the end of the current token.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Start of the current token including its leading trivia.
    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    /// Start of the current token's text, after leading trivia.
    pub fn token_pos(&self) -> usize {
        self.token_pos
    }

    /// Kind of the most recently scanned token.
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Decoded text for literal-bearing tokens (identifiers, literals,
    /// trivia in trivia mode).
    pub fn token_value(&self) -> Option<&str> {
        self.token_value.as_deref()
    }

    /// True when the current literal token was not properly closed.
    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    /// Moves the cursor to an arbitrary byte offset (token boundary).
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
        self.start_pos = self.pos;
        self.token_pos = self.pos;
        self.token = SyntaxKind::Unknown;
        self.token_value = None;
        self.token_flags = TokenFlags::NONE;
    }

    /// Drains the buffered scan errors accumulated since the last drain.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..).and_then(|rest| rest.chars().next())
    }

    fn error(&mut self, message: impl Into<String>, code: ScanErrorCode, pos: usize, length: usize) {
        self.errors.push(ScanError {
            message: message.into(),
            code,
            pos,
            length,
        });
    }

    fn emit(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.token = kind;
        kind
    }

    /// Scans the next token and returns its kind.
    ///
    /// With `skip_trivia` set, trivia is consumed in a loop and only
    /// semantically meaningful tokens are yielded; otherwise each trivia run
    /// is itself returned as a token carrying its text.
    pub fn scan(&mut self, skip_trivia: bool) -> SyntaxKind {
        self.start_pos = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value = None;
        loop {
            self.token_pos = self.pos;
            let Some(ch) = self.char_at(self.pos) else {
                return self.emit(SyntaxKind::EndOfFile);
            };
            match ch {
                '\r' | '\n' => {
                    if ch == '\r' && self.char_at(self.pos + 1) == Some('\n') {
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                    if skip_trivia {
                        continue;
                    }
                    self.token_value = Some(self.text[self.token_pos..self.pos].to_string());
                    return self.emit(SyntaxKind::NewLineTrivia);
                }
                c if c.is_whitespace() => {
                    while let Some(c) = self.char_at(self.pos) {
                        if c.is_whitespace() && c != '\r' && c != '\n' {
                            self.pos += c.len_utf8();
                        } else {
                            break;
                        }
                    }
                    if skip_trivia {
                        continue;
                    }
                    self.token_value = Some(self.text[self.token_pos..self.pos].to_string());
                    return self.emit(SyntaxKind::WhitespaceTrivia);
                }
                '#' => {
                    self.consume_to_line_end();
                    if skip_trivia {
                        continue;
                    }
                    self.token_value = Some(self.text[self.token_pos..self.pos].to_string());
                    return self.emit(SyntaxKind::HashCommentTrivia);
                }
                '/' if self.char_at(self.pos + 1) == Some('/') => {
                    self.consume_to_line_end();
                    if skip_trivia {
                        continue;
                    }
                    self.token_value = Some(self.text[self.token_pos..self.pos].to_string());
                    return self.emit(SyntaxKind::SingleLineCommentTrivia);
                }
                '/' if self.char_at(self.pos + 1) == Some('*') => {
                    self.consume_block_comment();
                    if skip_trivia {
                        continue;
                    }
                    self.token_value = Some(self.text[self.token_pos..self.pos].to_string());
                    return self.emit(SyntaxKind::MultiLineCommentTrivia);
                }
                '{' => return self.single_char(SyntaxKind::OpenBraceToken),
                '}' => return self.single_char(SyntaxKind::CloseBraceToken),
                '[' => return self.single_char(SyntaxKind::OpenBracketToken),
                ']' => return self.single_char(SyntaxKind::CloseBracketToken),
                ';' => return self.single_char(SyntaxKind::SemicolonToken),
                ':' => return self.single_char(SyntaxKind::ColonToken),
                '=' => return self.single_char(SyntaxKind::EqualsToken),
                ',' => return self.single_char(SyntaxKind::CommaToken),
                '+' => return self.single_char(SyntaxKind::PlusToken),
                '>' => return self.single_char(SyntaxKind::GreaterThanToken),
                '"' => return self.scan_quoted_string(),
                '<' => return self.scan_html_literal(),
                '-' => return self.scan_dash(),
                '0'..='9' | '.' => return self.scan_numeral(),
                c if is_identifier_start(c) => return self.scan_text_identifier(),
                other => {
                    self.error(
                        format!("Unexpected character '{other}'."),
                        ScanErrorCode::ExpectationFailed,
                        self.pos,
                        other.len_utf8(),
                    );
                    self.pos += other.len_utf8();
                    self.token_value = Some(other.to_string());
                    return self.emit(SyntaxKind::Unknown);
                }
            }
        }
    }

    fn single_char(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        self.emit(kind)
    }

    fn consume_to_line_end(&mut self) {
        while let Some(c) = self.char_at(self.pos) {
            if c == '\r' || c == '\n' {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn consume_block_comment(&mut self) {
        self.pos += 2; // "/*"
        while let Some(c) = self.char_at(self.pos) {
            if c == '*' && self.char_at(self.pos + 1) == Some('/') {
                self.pos += 2;
                return;
            }
            self.pos += c.len_utf8();
        }
    }

    /// A dash starts `->`, `--`, or a negative numeral; anything else is a
    /// scan error.
    fn scan_dash(&mut self) -> SyntaxKind {
        match self.char_at(self.pos + 1) {
            Some('>') => {
                self.pos += 2;
                self.emit(SyntaxKind::DirectedEdgeOp)
            }
            Some('-') => {
                self.pos += 2;
                self.emit(SyntaxKind::UndirectedEdgeOp)
            }
            Some('0'..='9') | Some('.') => self.scan_numeral(),
            _ => {
                self.error(
                    "Unexpected '-'; did you mean to define an edge with '->' or '--'?",
                    ScanErrorCode::ExpectationFailed,
                    self.pos,
                    1,
                );
                self.pos += 1;
                self.token_value = Some("-".to_string());
                self.emit(SyntaxKind::Unknown)
            }
        }
    }

    /// Numeral grammar: optional leading `-`, then `\d+(\.\d*)?` or `.\d+`.
    ///
    /// Implemented as a character-class state machine that stops without
    /// consuming at the first character that would introduce a second dot.
    fn scan_numeral(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.char_at(self.pos) == Some('-') {
            self.pos += 1;
        }
        let mut seen_digit = false;
        let mut seen_dot = false;
        while let Some(c) = self.char_at(self.pos) {
            match c {
                '0'..='9' => {
                    seen_digit = true;
                    self.pos += 1;
                }
                '.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        self.token_value = Some(self.text[start..self.pos].to_string());
        if seen_digit {
            self.emit(SyntaxKind::NumericIdentifier)
        } else {
            self.error(
                "A numeral must contain at least one digit.",
                ScanErrorCode::ExpectationFailed,
                start,
                self.pos - start,
            );
            self.emit(SyntaxKind::Unknown)
        }
    }

    /// Scans from the opening quote to the next unescaped quote.
    ///
    /// A backslash marks the next character as escaped, with no further
    /// interpretation. Escaped quotes are decoded here and escaped line
    /// continuations are removed here, so the parser only ever sees the
    /// final text. Reaching EOF or a raw newline records an unterminated
    /// error and yields the partial text.
    fn scan_quoted_string(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            let Some(c) = self.char_at(self.pos) else {
                self.unterminated(start);
                break;
            };
            match c {
                '"' => {
                    self.pos += 1;
                    break;
                }
                '\r' | '\n' => {
                    self.unterminated(start);
                    break;
                }
                '\\' => match self.char_at(self.pos + 1) {
                    None => {
                        self.pos += 1;
                    }
                    Some('"') => {
                        value.push('"');
                        self.pos += 2;
                    }
                    Some('\r') => {
                        self.pos += if self.char_at(self.pos + 2) == Some('\n') { 3 } else { 2 };
                    }
                    Some('\n') => {
                        self.pos += 2;
                    }
                    Some(next) => {
                        value.push('\\');
                        value.push(next);
                        self.pos += 1 + next.len_utf8();
                    }
                },
                _ => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.token_value = Some(value);
        self.emit(SyntaxKind::QuotedTextIdentifier)
    }

    /// Scans an HTML literal, tracking nested angle brackets so inner `<`
    /// and `>` do not terminate the literal prematurely.
    fn scan_html_literal(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.char_at(self.pos) {
                None => {
                    self.unterminated(start);
                    break;
                }
                Some('<') => {
                    depth += 1;
                    self.pos += 1;
                }
                Some('>') => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        self.token_value = Some(self.text[start..self.pos].to_string());
        self.emit(SyntaxKind::HtmlIdentifier)
    }

    fn unterminated(&mut self, start: usize) {
        self.token_flags |= TokenFlags::UNTERMINATED;
        self.error(
            "Unterminated literal.",
            ScanErrorCode::Unterminated,
            start,
            self.pos - start,
        );
    }

    /// Scans a maximal identifier run and classifies it via the keyword
    /// table (subject to the 4-8 length gate).
    fn scan_text_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(c) = self.char_at(self.pos) {
            if is_identifier_part(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        let kind = classify_identifier(text);
        self.token_value = Some(text.to_string());
        self.emit(kind)
    }

    /// Captures the scanner registers for later restoration.
    pub fn checkpoint(&self) -> ScannerCheckpoint {
        ScannerCheckpoint {
            pos: self.pos,
            start_pos: self.start_pos,
            token_pos: self.token_pos,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            error_count: self.errors.len(),
        }
    }

    /// Restores a previously captured checkpoint, discarding any scan
    /// errors recorded after it.
    pub fn restore(&mut self, checkpoint: ScannerCheckpoint) {
        self.pos = checkpoint.pos;
        self.start_pos = checkpoint.start_pos;
        self.token_pos = checkpoint.token_pos;
        self.token = checkpoint.token;
        self.token_value = checkpoint.token_value;
        self.token_flags = checkpoint.token_flags;
        self.errors.truncate(checkpoint.error_count);
    }

    /// Invokes the callback and always restores the scanner state afterward
    /// (a pure peek).
    pub fn look_ahead<T>(&mut self, callback: impl FnOnce(&mut Self) -> T) -> T {
        let checkpoint = self.checkpoint();
        let result = callback(self);
        self.restore(checkpoint);
        result
    }

    /// Invokes the callback and keeps the scanner state only when it
    /// returns `true` (commit-on-success).
    pub fn try_scan(&mut self, callback: impl FnOnce(&mut Self) -> bool) -> bool {
        let checkpoint = self.checkpoint();
        let committed = callback(self);
        if !committed {
            self.restore(checkpoint);
        }
        committed
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (c as u32) > 127
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (c as u32) > 127
}

/// Returns the position of the first non-trivia token at or after `pos`.
///
/// This is the dedicated trivia-skip utility used by consumers to find a
/// node's display start; it drives the scanner in trivia mode. Callers must
/// special-case missing nodes (`pos == end`) before calling this.
pub fn skip_trivia(text: &str, pos: usize) -> usize {
    let mut scanner = Scanner::new(text);
    scanner.set_position(pos);
    loop {
        let kind = scanner.scan(false);
        if !kind.is_trivia() {
            return scanner.token_pos();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(source: &str) -> Vec<(SyntaxKind, usize, usize)> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let kind = scanner.scan(true);
            if kind == SyntaxKind::EndOfFile {
                break;
            }
            tokens.push((kind, scanner.token_pos(), scanner.pos()));
        }
        tokens
    }

    #[test]
    fn test_basic_digraph_tokens() {
        let tokens = scan_all("digraph { a -> b }");
        assert_eq!(
            tokens,
            vec![
                (SyntaxKind::DigraphKeyword, 0, 7),
                (SyntaxKind::OpenBraceToken, 8, 9),
                (SyntaxKind::TextIdentifier, 10, 11),
                (SyntaxKind::DirectedEdgeOp, 12, 14),
                (SyntaxKind::TextIdentifier, 15, 16),
                (SyntaxKind::CloseBraceToken, 17, 18),
            ]
        );
    }

    #[test]
    fn test_start_pos_includes_leading_trivia() {
        let mut scanner = Scanner::new("  a");
        scanner.scan(true);
        assert_eq!(scanner.start_pos(), 0);
        assert_eq!(scanner.token_pos(), 2);
        assert_eq!(scanner.pos(), 3);
    }

    #[test]
    fn test_trivia_mode_yields_trivia_tokens() {
        let mut scanner = Scanner::new(" \n# note\na");
        assert_eq!(scanner.scan(false), SyntaxKind::WhitespaceTrivia);
        assert_eq!(scanner.scan(false), SyntaxKind::NewLineTrivia);
        assert_eq!(scanner.scan(false), SyntaxKind::HashCommentTrivia);
        assert_eq!(scanner.token_value(), Some("# note"));
        assert_eq!(scanner.scan(false), SyntaxKind::NewLineTrivia);
        assert_eq!(scanner.scan(false), SyntaxKind::TextIdentifier);
    }

    #[test]
    fn test_comments_are_skipped_in_parsing_mode() {
        let tokens = scan_all("a // line\n/* block */ b # hash");
        assert_eq!(tokens[0].0, SyntaxKind::TextIdentifier);
        assert_eq!(tokens[1].0, SyntaxKind::TextIdentifier);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_numerals() {
        let mut scanner = Scanner::new("-1.5");
        assert_eq!(scanner.scan(true), SyntaxKind::NumericIdentifier);
        assert_eq!(scanner.token_value(), Some("-1.5"));

        let mut scanner = Scanner::new(".5");
        assert_eq!(scanner.scan(true), SyntaxKind::NumericIdentifier);
        assert_eq!(scanner.token_value(), Some(".5"));

        // The state machine stops before a second dot.
        let mut scanner = Scanner::new("1.2.3");
        assert_eq!(scanner.scan(true), SyntaxKind::NumericIdentifier);
        assert_eq!(scanner.token_value(), Some("1.2"));
        assert_eq!(scanner.scan(true), SyntaxKind::NumericIdentifier);
        assert_eq!(scanner.token_value(), Some(".3"));
    }

    #[test]
    fn test_lone_dash_is_a_scan_error() {
        let mut scanner = Scanner::new("- b");
        assert_eq!(scanner.scan(true), SyntaxKind::Unknown);
        let errors = scanner.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ScanErrorCode::ExpectationFailed);
        assert!(errors[0].message.contains("edge"));
    }

    #[test]
    fn test_edge_operators() {
        let mut scanner = Scanner::new("->--");
        assert_eq!(scanner.scan(true), SyntaxKind::DirectedEdgeOp);
        assert_eq!(scanner.scan(true), SyntaxKind::UndirectedEdgeOp);
    }

    #[test]
    fn test_quoted_string_decoding() {
        let mut scanner = Scanner::new(r#""a \" b""#);
        assert_eq!(scanner.scan(true), SyntaxKind::QuotedTextIdentifier);
        assert_eq!(scanner.token_value(), Some(r#"a " b"#));
        assert!(!scanner.is_unterminated());
    }

    #[test]
    fn test_quoted_string_line_continuation_removed() {
        let mut scanner = Scanner::new("\"ab\\\ncd\"");
        assert_eq!(scanner.scan(true), SyntaxKind::QuotedTextIdentifier);
        assert_eq!(scanner.token_value(), Some("abcd"));
    }

    #[test]
    fn test_other_escapes_kept_verbatim() {
        let mut scanner = Scanner::new(r#""a\nb""#);
        scanner.scan(true);
        assert_eq!(scanner.token_value(), Some("a\\nb"));
    }

    #[test]
    fn test_unterminated_string_at_eof() {
        let mut scanner = Scanner::new("\"abc");
        assert_eq!(scanner.scan(true), SyntaxKind::QuotedTextIdentifier);
        assert!(scanner.is_unterminated());
        assert_eq!(scanner.token_value(), Some("abc"));
        let errors = scanner.take_errors();
        assert_eq!(errors[0].code, ScanErrorCode::Unterminated);
    }

    #[test]
    fn test_unterminated_string_at_newline() {
        let mut scanner = Scanner::new("\"abc\nd\"");
        assert_eq!(scanner.scan(true), SyntaxKind::QuotedTextIdentifier);
        assert!(scanner.is_unterminated());
        assert_eq!(scanner.token_value(), Some("abc"));
    }

    #[test]
    fn test_html_literal_nesting() {
        let mut scanner = Scanner::new("<<b>bold</b>> x");
        assert_eq!(scanner.scan(true), SyntaxKind::HtmlIdentifier);
        assert_eq!(scanner.token_value(), Some("<<b>bold</b>>"));
        assert_eq!(scanner.scan(true), SyntaxKind::TextIdentifier);
    }

    #[test]
    fn test_unterminated_html_literal() {
        let mut scanner = Scanner::new("<<table>");
        assert_eq!(scanner.scan(true), SyntaxKind::HtmlIdentifier);
        assert!(scanner.is_unterminated());
    }

    #[test]
    fn test_unicode_identifier_characters() {
        let mut scanner = Scanner::new("café");
        assert_eq!(scanner.scan(true), SyntaxKind::TextIdentifier);
        assert_eq!(scanner.token_value(), Some("café"));
    }

    #[test]
    fn test_look_ahead_is_a_pure_peek() {
        let mut scanner = Scanner::new("a = b");
        scanner.scan(true);
        let next = scanner.look_ahead(|s| s.scan(true));
        assert_eq!(next, SyntaxKind::EqualsToken);
        assert_eq!(scanner.token(), SyntaxKind::TextIdentifier);
        assert_eq!(scanner.token_value(), Some("a"));
    }

    #[test]
    fn test_try_scan_commits_on_success() {
        let mut scanner = Scanner::new("a = b");
        scanner.scan(true);
        let committed = scanner.try_scan(|s| s.scan(true) == SyntaxKind::EqualsToken);
        assert!(committed);
        assert_eq!(scanner.token(), SyntaxKind::EqualsToken);
    }

    #[test]
    fn test_try_scan_restores_on_failure() {
        let mut scanner = Scanner::new("a ; b");
        scanner.scan(true);
        let committed = scanner.try_scan(|s| s.scan(true) == SyntaxKind::EqualsToken);
        assert!(!committed);
        assert_eq!(scanner.token(), SyntaxKind::TextIdentifier);
    }

    #[test]
    fn test_look_ahead_discards_speculative_errors() {
        let mut scanner = Scanner::new("a \"oops");
        scanner.scan(true);
        scanner.look_ahead(|s| s.scan(true));
        assert!(scanner.take_errors().is_empty());
    }

    #[test]
    fn test_skip_trivia_utility() {
        let text = "  /* c */ node";
        assert_eq!(skip_trivia(text, 0), 10);
        assert_eq!(skip_trivia(text, 10), 10);
        // At EOF the utility returns the end position.
        assert_eq!(skip_trivia("  ", 0), 2);
    }
}
