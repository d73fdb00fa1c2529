//! Token scanning methods for the sexp tokenizer
//!
//! Provides specialized scanning functions for each lexical element: strings,
//! comments, reader-macro prefixes, character literals and plain atoms.
//! Scanning is total: malformed input (an unterminated string, a lone `#`)
//! still produces a token, so every byte of the buffer is covered.

use super::tokens::TokenType;

/// Character navigation helper for the tokenizer
///
/// Provides character-level navigation with byte position tracking and
/// lookahead for efficient tokenization.
#[derive(Debug, Clone)]
pub struct CharNavigator<'a> {
    /// Source text being scanned
    source: &'a str,
    /// Current byte position in source
    position: usize,
}

impl<'a> CharNavigator<'a> {
    /// Create new character navigator
    #[must_use]
    pub const fn new(source: &'a str, position: usize) -> Self {
        Self { source, position }
    }

    /// Get current position
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Source text being scanned
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Check if at end of input
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Peek at current character without advancing
    #[must_use]
    pub fn peek_char(&self) -> Option<char> {
        self.source.get(self.position..)?.chars().next()
    }

    /// Peek at the character after the current one
    #[must_use]
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.source.get(self.position..)?.chars();
        chars.next();
        chars.next()
    }

    /// Check whether the remaining input starts with `prefix`
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.source
            .get(self.position..)
            .is_some_and(|rest| rest.starts_with(prefix))
    }

    /// Advance by one character, returning it
    pub fn advance_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Advance while `predicate` holds for the current character
    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek_char() {
            if !predicate(ch) {
                break;
            }
            self.position += ch.len_utf8();
        }
    }
}

/// Whitespace for sexp purposes: Unicode whitespace, commas and the BOM
#[must_use]
pub fn is_whitespace_char(ch: char) -> bool {
    ch.is_whitespace() || ch == ',' || ch == '\u{FEFF}'
}

/// Characters that end an atom
#[must_use]
pub fn is_atom_terminator(ch: char) -> bool {
    is_whitespace_char(ch) || matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';')
}

/// Token scanner over a [`CharNavigator`]
///
/// Each `scan_*` method expects the navigator to sit on the first character
/// of the element it scans and leaves it just past the element.
#[derive(Debug, Clone)]
pub struct TokenScanner<'a> {
    /// Character navigator for position tracking
    navigator: CharNavigator<'a>,
}

impl<'a> TokenScanner<'a> {
    /// Create new token scanner
    #[must_use]
    pub const fn new(source: &'a str, position: usize) -> Self {
        Self {
            navigator: CharNavigator::new(source, position),
        }
    }

    /// Get reference to character navigator
    #[must_use]
    pub const fn navigator(&self) -> &CharNavigator<'a> {
        &self.navigator
    }

    /// Get mutable reference to character navigator
    pub fn navigator_mut(&mut self) -> &mut CharNavigator<'a> {
        &mut self.navigator
    }

    /// Scan a run of whitespace
    pub fn scan_whitespace(&mut self) -> TokenType {
        self.navigator.advance_while(is_whitespace_char);
        TokenType::Whitespace
    }

    /// Scan a string body after its opening delimiter was consumed
    ///
    /// Backslash escapes the next character. Runs to end of input when the
    /// closing quote is missing.
    pub fn scan_string_body(&mut self) -> TokenType {
        while let Some(ch) = self.navigator.advance_char() {
            match ch {
                '\\' => {
                    self.navigator.advance_char();
                }
                '"' => break,
                _ => {}
            }
        }
        TokenType::String
    }

    /// Scan `;` up to, not including, the line break
    pub fn scan_line_comment(&mut self) -> TokenType {
        self.navigator.advance_while(|ch| ch != '\n' && ch != '\r');
        TokenType::LineComment
    }

    /// Scan `#| ... |#`
    pub fn scan_block_comment(&mut self) -> TokenType {
        self.navigator.advance_char();
        self.navigator.advance_char();
        while !self.navigator.is_at_end() {
            if self.navigator.starts_with("|#") {
                self.navigator.advance_char();
                self.navigator.advance_char();
                break;
            }
            self.navigator.advance_char();
        }
        TokenType::BlockComment
    }

    /// Scan a character literal such as `\a`, `\(` or `\newline`
    ///
    /// The character after the backslash is always part of the literal, even
    /// when it is a bracket or whitespace.
    pub fn scan_char_literal(&mut self) -> TokenType {
        self.navigator.advance_char();
        self.navigator.advance_char();
        self.navigator.advance_while(|ch| !is_atom_terminator(ch));
        TokenType::Atom
    }

    /// Scan a plain atom
    pub fn scan_atom(&mut self) -> TokenType {
        self.navigator.advance_char();
        self.navigator.advance_while(|ch| !is_atom_terminator(ch));
        TokenType::Atom
    }

    /// Scan a quote-family prefix: `'`, `` ` ``, `~`, `~@`, `@`, `^`
    pub fn scan_quote_macro(&mut self) -> TokenType {
        let first = self.navigator.advance_char();
        if first == Some('~') && self.navigator.peek_char() == Some('@') {
            self.navigator.advance_char();
        }
        TokenType::ReaderMacro
    }

    /// Scan a `#` dispatch form
    ///
    /// Produces a regex string, block comment, reader-macro prefix
    /// (`#_`, `#'`, `#?`, `#?@`, `#=`, `#^`, `#:ns`, `#tag`, bare `#` before a
    /// bracket) or an atom (`##Inf`, a lone `#`).
    pub fn scan_dispatch(&mut self) -> TokenType {
        match self.navigator.peek_next() {
            Some('"') => {
                self.navigator.advance_char();
                self.navigator.advance_char();
                self.scan_string_body()
            }
            Some('|') => self.scan_block_comment(),
            Some('_' | '\'' | '=' | '^') => {
                self.navigator.advance_char();
                self.navigator.advance_char();
                TokenType::ReaderMacro
            }
            Some('?') => {
                self.navigator.advance_char();
                self.navigator.advance_char();
                if self.navigator.peek_char() == Some('@') {
                    self.navigator.advance_char();
                }
                TokenType::ReaderMacro
            }
            Some('(' | '{' | '[') => {
                self.navigator.advance_char();
                TokenType::ReaderMacro
            }
            Some('#') => self.scan_atom(),
            Some(ch) if !is_atom_terminator(ch) => {
                // `#:ns{...}` and tagged literals like `#inst`
                self.navigator.advance_char();
                self.navigator.advance_while(|ch| !is_atom_terminator(ch));
                TokenType::ReaderMacro
            }
            _ => {
                self.navigator.advance_char();
                TokenType::Atom
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigator_tracks_byte_positions() {
        let mut nav = CharNavigator::new("λx", 0);
        assert_eq!(nav.peek_char(), Some('λ'));
        assert_eq!(nav.peek_next(), Some('x'));
        assert_eq!(nav.advance_char(), Some('λ'));
        assert_eq!(nav.position(), 2);
        nav.advance_char();
        assert!(nav.is_at_end());
        assert_eq!(nav.advance_char(), None);
    }

    #[test]
    fn whitespace_includes_commas_and_bom() {
        assert!(is_whitespace_char(','));
        assert!(is_whitespace_char('\u{FEFF}'));
        assert!(is_whitespace_char('\n'));
        assert!(!is_whitespace_char('a'));
    }

    #[test]
    fn scan_unterminated_string_runs_to_end() {
        let mut scanner = TokenScanner::new("\"abc", 0);
        scanner.navigator_mut().advance_char();
        assert_eq!(scanner.scan_string_body(), TokenType::String);
        assert_eq!(scanner.navigator().position(), 4);
    }

    #[test]
    fn scan_char_literal_swallows_bracket() {
        let mut scanner = TokenScanner::new("\\()", 0);
        assert_eq!(scanner.scan_char_literal(), TokenType::Atom);
        assert_eq!(scanner.navigator().position(), 2);
    }

    #[test]
    fn scan_dispatch_variants() {
        let cases = [
            ("#_x", TokenType::ReaderMacro, 2),
            ("#?@(", TokenType::ReaderMacro, 3),
            ("#{1}", TokenType::ReaderMacro, 1),
            ("#inst \"x\"", TokenType::ReaderMacro, 5),
            ("#:user{}", TokenType::ReaderMacro, 6),
            ("##Inf", TokenType::Atom, 5),
            ("#\"a\"", TokenType::String, 4),
            ("#| c |#", TokenType::BlockComment, 7),
            ("# ", TokenType::Atom, 1),
        ];
        for (source, expected, end) in cases {
            let mut scanner = TokenScanner::new(source, 0);
            assert_eq!(scanner.scan_dispatch(), expected, "{source}");
            assert_eq!(scanner.navigator().position(), end, "{source}");
        }
    }
}
