//! Lossless tokenizer for Lisp-family source text
//!
//! Splits a buffer into contiguous tokens that cover every byte: brackets,
//! strings, comments, reader-macro prefixes, whitespace runs and atoms.
//! Tokenization never fails; malformed input (an unterminated string, a stray
//! `#`) still yields tokens whose spans concatenate back to the input.
//!
//! # Example
//!
//! ```rust
//! use paredit_core::tokenizer::{SexpTokenizer, TokenType};
//!
//! let source = "(def x \"hi\") ; done";
//! let tokens = SexpTokenizer::new(source).tokenize_all();
//!
//! let rebuilt: String = tokens.iter().map(|t| t.span).collect();
//! assert_eq!(rebuilt, source);
//! assert_eq!(tokens[5].token_type, TokenType::String);
//! ```

pub mod scanner;
pub mod tokens;

// Re-export public API
pub use scanner::{is_atom_terminator, is_whitespace_char, CharNavigator, TokenScanner};
pub use tokens::{DelimiterType, Token, TokenType};

/// Streaming tokenizer for sexp source text
///
/// Yields zero-copy [`Token`]s in buffer order. Implements [`Iterator`], so
/// tokens can be pulled lazily or collected with [`Self::tokenize_all`].
#[derive(Debug, Clone)]
pub struct SexpTokenizer<'a> {
    /// Source text being tokenized
    source: &'a str,
    /// Token scanner for character processing
    scanner: TokenScanner<'a>,
}

impl<'a> SexpTokenizer<'a> {
    /// Create new tokenizer for source text
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self {
            source,
            scanner: TokenScanner::new(source, 0),
        }
    }

    /// Get next token from input stream
    ///
    /// Returns `None` when end of input reached.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.navigator().position();
        let current = self.scanner.navigator().peek_char()?;

        let token_type = match current {
            ch if is_whitespace_char(ch) => self.scanner.scan_whitespace(),
            '(' | '[' | '{' => {
                self.scanner.navigator_mut().advance_char();
                DelimiterType::from_open(current).map_or(TokenType::Atom, TokenType::Open)
            }
            ')' | ']' | '}' => {
                self.scanner.navigator_mut().advance_char();
                DelimiterType::from_close(current).map_or(TokenType::Atom, TokenType::Close)
            }
            '"' => {
                self.scanner.navigator_mut().advance_char();
                self.scanner.scan_string_body()
            }
            ';' => self.scanner.scan_line_comment(),
            '\\' => self.scanner.scan_char_literal(),
            '#' => self.scanner.scan_dispatch(),
            '\'' | '`' | '~' | '@' | '^' => self.scanner.scan_quote_macro(),
            _ => self.scanner.scan_atom(),
        };

        let end = self.scanner.navigator().position();
        Some(Token::new(token_type, &self.source[start..end], start))
    }

    /// Tokenize the remaining input into a vector
    #[must_use]
    pub fn tokenize_all(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::with_capacity(self.source.len() / 3 + 1);
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        log::trace!(
            "tokenized {} bytes into {} tokens",
            self.source.len(),
            tokens.len()
        );
        tokens
    }

    /// Get current byte position in source
    #[must_use]
    pub const fn position(&self) -> usize {
        self.scanner.navigator().position()
    }
}

impl<'a> Iterator for SexpTokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests;
