//! Token definitions for Lisp-family source tokenization
//!
//! Provides zero-copy token types for lexical analysis of Clojure, Lisp and
//! Scheme buffers. All tokens keep a reference to the original source text
//! together with their byte offset, so concatenating the spans of a full token
//! run reproduces the buffer exactly.
//!
//! # Token Design
//!
//! - Zero-copy via `&'a str` spans referencing source
//! - Byte offsets for editor integration
//! - Brackets carry their [`DelimiterType`] so matching is by kind
//! - Strings and comments are single opaque tokens
//!
//! # Example
//!
//! ```rust
//! use paredit_core::tokenizer::{DelimiterType, Token, TokenType};
//!
//! let source = "(inc 1)";
//! let token = Token::new(TokenType::Open(DelimiterType::Paren), &source[0..1], 0);
//! assert_eq!(token.end(), 1);
//! assert!(token.is_open());
//! ```

use core::fmt;

use crate::utils::Span;

/// Token produced by the sexp tokenizer with zero-copy span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token type discriminant
    pub token_type: TokenType,

    /// Zero-copy span referencing source text
    pub span: &'a str,

    /// Byte offset where the token starts
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Create new token
    #[must_use]
    pub const fn new(token_type: TokenType, span: &'a str, offset: usize) -> Self {
        Self {
            token_type,
            span,
            offset,
        }
    }

    /// Token length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.span.len()
    }

    /// Check if token is empty (should not happen in normal tokenization)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Byte offset just past the token
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.span.len()
    }

    /// Byte range covered by the token
    #[must_use]
    pub const fn range(&self) -> Span {
        Span {
            start: self.offset,
            end: self.end(),
        }
    }

    /// Check if this token is an opening bracket
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.token_type, TokenType::Open(_))
    }

    /// Check if this token is a closing bracket
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self.token_type, TokenType::Close(_))
    }

    /// Check if this token is whitespace (including commas)
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self.token_type, TokenType::Whitespace)
    }

    /// Check if this token is a line or block comment
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(
            self.token_type,
            TokenType::LineComment | TokenType::BlockComment
        )
    }

    /// Whitespace, or a comment when `include_comments` is set
    #[must_use]
    pub const fn is_trivia(&self, include_comments: bool) -> bool {
        self.is_whitespace() || (include_comments && self.is_comment())
    }

    /// Check if this token is a reader-macro prefix such as `'` or `#_`
    #[must_use]
    pub const fn is_reader_macro(&self) -> bool {
        matches!(self.token_type, TokenType::ReaderMacro)
    }

    /// Check if this token is an atom (symbol, keyword, number, char literal)
    #[must_use]
    pub const fn is_atom(&self) -> bool {
        matches!(self.token_type, TokenType::Atom)
    }

    /// Check if this token is a string or regex literal
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self.token_type, TokenType::String)
    }

    /// Length of the opening delimiter of a string or comment token
    ///
    /// `"` and `;` open with one byte, `#"` and `#|` with two. Other tokens
    /// have no delimiters.
    #[must_use]
    pub fn open_len(&self) -> usize {
        match self.token_type {
            TokenType::String if self.span.starts_with('#') => 2,
            TokenType::String | TokenType::LineComment => 1,
            TokenType::BlockComment => 2,
            _ => 0,
        }
    }

    /// Length of the closing delimiter, zero when the token is unterminated
    #[must_use]
    pub fn close_len(&self) -> usize {
        match self.token_type {
            TokenType::String if self.is_terminated() => 1,
            TokenType::BlockComment if self.is_terminated() => 2,
            _ => 0,
        }
    }

    /// Check whether a string or block comment reaches its closing delimiter
    ///
    /// Always true for other token types.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        match self.token_type {
            TokenType::String => {
                let body = &self.span[self.open_len().min(self.span.len())..];
                let mut chars = body.chars();
                while let Some(ch) = chars.next() {
                    match ch {
                        '\\' => {
                            chars.next();
                        }
                        '"' => return chars.as_str().is_empty(),
                        _ => {}
                    }
                }
                false
            }
            TokenType::BlockComment => self.span.len() >= 4 && self.span.ends_with("|#"),
            _ => true,
        }
    }

    /// Byte range strictly between the delimiters of a string or comment
    ///
    /// Returns `None` for tokens without an interior.
    #[must_use]
    pub fn interior(&self) -> Option<Span> {
        match self.token_type {
            TokenType::String | TokenType::LineComment | TokenType::BlockComment => {
                let start = self.offset + self.open_len();
                let end = self.end() - self.close_len();
                Some(Span::new(start, end.max(start)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}: {:?}", self.token_type, self.offset, self.span)
    }
}

/// Token type discriminant for semantic classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Opening bracket `(`, `[` or `{`
    Open(DelimiterType),

    /// Closing bracket `)`, `]` or `}`
    Close(DelimiterType),

    /// String literal `"..."` or regex literal `#"..."`
    String,

    /// Line comment from `;` to the end of the line (newline excluded)
    LineComment,

    /// Block comment `#| ... |#`
    BlockComment,

    /// Reader-macro prefix that binds to the following form
    ReaderMacro,

    /// Run of whitespace, commas and byte order marks
    Whitespace,

    /// Symbol, keyword, number or character literal
    Atom,
}

impl TokenType {
    /// Delimiter kind for bracket tokens
    #[must_use]
    pub const fn delimiter(self) -> Option<DelimiterType> {
        match self {
            Self::Open(kind) | Self::Close(kind) => Some(kind),
            _ => None,
        }
    }

    /// Human-readable name for diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open(_) => "Open",
            Self::Close(_) => "Close",
            Self::String => "String",
            Self::LineComment => "LineComment",
            Self::BlockComment => "BlockComment",
            Self::ReaderMacro => "ReaderMacro",
            Self::Whitespace => "Whitespace",
            Self::Atom => "Atom",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(kind) => write!(f, "Open({})", kind.open_char()),
            Self::Close(kind) => write!(f, "Close({})", kind.close_char()),
            other => f.write_str(other.name()),
        }
    }
}

/// Bracket kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelimiterType {
    /// `( )`
    Paren,
    /// `[ ]`
    Bracket,
    /// `{ }`
    Brace,
}

impl DelimiterType {
    /// Opening character
    #[must_use]
    pub const fn open_char(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Bracket => '[',
            Self::Brace => '{',
        }
    }

    /// Closing character
    #[must_use]
    pub const fn close_char(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Bracket => ']',
            Self::Brace => '}',
        }
    }

    /// Kind of an opening character
    #[must_use]
    pub const fn from_open(ch: char) -> Option<Self> {
        match ch {
            '(' => Some(Self::Paren),
            '[' => Some(Self::Bracket),
            '{' => Some(Self::Brace),
            _ => None,
        }
    }

    /// Kind of a closing character
    #[must_use]
    pub const fn from_close(ch: char) -> Option<Self> {
        match ch {
            ')' => Some(Self::Paren),
            ']' => Some(Self::Bracket),
            '}' => Some(Self::Brace),
            _ => None,
        }
    }
}
