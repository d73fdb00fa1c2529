//! Token stream and cursor for sexp-level navigation
//!
//! [`TokenStream`] owns the tokens of one buffer snapshot. [`TokenCursor`] is a
//! cheap `Copy` view into that stream: a token index plus a byte offset. All
//! movement methods return `bool` and leave the cursor untouched when the
//! movement is impossible, so callers probe by copying:
//!
//! ```rust
//! use paredit_core::cursor::TokenStream;
//!
//! let stream = TokenStream::new("(a (b c) d)");
//! let mut cursor = stream.cursor_at(3);
//! assert!(cursor.forward_sexp());
//! assert_eq!(cursor.offset(), 8);
//!
//! let mut probe = cursor;
//! assert!(probe.forward_up_sexp());
//! assert_eq!(cursor.offset(), 8);
//! assert_eq!(probe.offset(), 11);
//! ```
//!
//! # Model
//!
//! The cursor sits either on a token boundary or inside a multi-byte token
//! (the middle of an atom, string or comment). "The token before the cursor"
//! is the token containing the offset when the offset is in its interior,
//! otherwise the token ending at the offset. Movement never reports the
//! interior of a token as a sexp boundary.
//!
//! Unmatched closing brackets act as local boundaries. Sexp motions count
//! bracket depth across all kinds; [`TokenCursor::enclosing_list`] additionally
//! requires the pair to match by kind.

use crate::tokenizer::{DelimiterType, SexpTokenizer, Token, TokenType};
use crate::utils::Span;

/// Tokens of one buffer snapshot
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    /// Source text the tokens reference
    source: &'a str,
    /// Contiguous tokens covering `source`
    tokens: Vec<Token<'a>>,
}

impl<'a> TokenStream<'a> {
    /// Tokenize `source`
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: SexpTokenizer::new(source).tokenize_all(),
        }
    }

    /// Source text
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// All tokens in buffer order
    #[must_use]
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    /// Index of the token containing `offset`, or `tokens.len()` at the end
    #[must_use]
    pub fn token_index_at(&self, offset: usize) -> usize {
        self.tokens.partition_point(|token| token.end() <= offset)
    }

    /// Cursor at `offset`, clamped to the buffer
    #[must_use]
    pub fn cursor_at(&self, offset: usize) -> TokenCursor<'_> {
        let offset = offset.min(self.source.len());
        TokenCursor {
            tokens: &self.tokens,
            source_len: self.source.len(),
            index: self.token_index_at(offset),
            offset,
        }
    }

    /// Brackets without a partner of their kind, plus unterminated strings
    /// and block comments
    ///
    /// A closer that does not match the innermost open bracket counts as
    /// unmatched and leaves that bracket open.
    #[must_use]
    pub fn unmatched_count(&self) -> usize {
        let mut stack: Vec<DelimiterType> = Vec::new();
        let mut unmatched = 0;
        for token in &self.tokens {
            match token.token_type {
                TokenType::Open(kind) => stack.push(kind),
                TokenType::Close(kind) => {
                    if stack.last() == Some(&kind) {
                        stack.pop();
                    } else {
                        unmatched += 1;
                    }
                }
                TokenType::String | TokenType::BlockComment if !token.is_terminated() => {
                    unmatched += 1;
                }
                _ => {}
            }
        }
        unmatched + stack.len()
    }

    /// Check that brackets pair by kind and strings and block comments close
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.unmatched_count() == 0
    }
}

/// Check bracket balance of arbitrary text
#[must_use]
pub fn is_balanced(source: &str) -> bool {
    TokenStream::new(source).is_balanced()
}

/// Bracket pair enclosing a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRange {
    /// Start of the list including attached reader-macro prefixes
    pub outer_start: usize,
    /// Opening bracket
    pub open: Span,
    /// Closing bracket
    pub close: Span,
    /// Bracket kind
    pub kind: DelimiterType,
}

impl ListRange {
    /// Whole list from its first prefix through the closing bracket
    #[must_use]
    pub const fn outer(&self) -> Span {
        Span {
            start: self.outer_start,
            end: self.close.end,
        }
    }

    /// Range between the brackets
    #[must_use]
    pub const fn inner(&self) -> Span {
        Span {
            start: self.open.end,
            end: self.close.start,
        }
    }

    /// Opening text including reader-macro prefixes, e.g. `#{` or `'(`
    #[must_use]
    pub const fn opener(&self) -> Span {
        Span {
            start: self.outer_start,
            end: self.open.end,
        }
    }
}

/// Immutable position in a [`TokenStream`]
///
/// Invariant: `tokens[index]` contains `offset`, or `index == tokens.len()` and
/// `offset` is the buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token<'a>],
    source_len: usize,
    index: usize,
    offset: usize,
}

impl<'a> TokenCursor<'a> {
    /// Byte offset of the cursor
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Index of the token at or after the cursor
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Check whether the cursor sits strictly inside a token
    #[must_use]
    pub fn is_interior(&self) -> bool {
        self.tokens
            .get(self.index)
            .is_some_and(|token| self.offset > token.offset)
    }

    /// Check if the cursor is at the end of the buffer
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Check if the cursor is at the start of the buffer
    #[must_use]
    pub const fn at_start(&self) -> bool {
        self.offset == 0
    }

    /// Token at or after the cursor
    #[must_use]
    pub fn token(&self) -> Option<Token<'a>> {
        self.tokens.get(self.index).copied()
    }

    /// Token before the cursor, or the token containing it when interior
    #[must_use]
    pub fn prev_token(&self) -> Option<Token<'a>> {
        if self.is_interior() {
            return self.token();
        }
        self.index
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index).copied())
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
        self.offset = self
            .tokens
            .get(index)
            .map_or(self.source_len, |token| token.offset);
    }

    /// Move to the start of the next token
    pub fn forward_token(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.set_index(self.index + 1);
        true
    }

    /// Move to the start of the previous token
    ///
    /// From the interior of a token, moves to that token's start.
    pub fn backward_token(&mut self) -> bool {
        if self.is_interior() {
            self.set_index(self.index);
            return true;
        }
        if self.index == 0 {
            return false;
        }
        self.set_index(self.index - 1);
        true
    }

    /// Skip whitespace, and comments when `include_comments` is set
    pub fn forward_whitespace(&mut self, include_comments: bool) {
        while self
            .token()
            .is_some_and(|token| token.is_trivia(include_comments))
        {
            self.forward_token();
        }
    }

    /// Skip whitespace backward, and comments when `include_comments` is set
    pub fn backward_whitespace(&mut self, include_comments: bool) {
        while self
            .prev_token()
            .is_some_and(|token| token.is_trivia(include_comments))
        {
            self.backward_token();
        }
    }

    /// Move back over reader-macro prefixes attached to the form after the cursor
    fn absorb_prefixes_backward(&mut self) {
        loop {
            let mut probe = *self;
            probe.backward_whitespace(true);
            if probe.prev_token().is_some_and(|token| token.is_reader_macro()) {
                probe.backward_token();
                *self = probe;
            } else {
                break;
            }
        }
    }

    /// Move past the next sibling: an atom, a string, or a bracketed list
    ///
    /// Leading whitespace, comments and reader-macro prefixes are skipped. A
    /// prefix with nothing to attach to is a sexp of its own. Fails at the
    /// end of the enclosing list, at the end of the buffer, and when the next
    /// list never closes.
    pub fn forward_sexp(&mut self) -> bool {
        let mut cursor = *self;
        cursor.forward_whitespace(true);

        while cursor.token().is_some_and(|token| token.is_reader_macro()) {
            cursor.forward_token();
            let mut probe = cursor;
            probe.forward_whitespace(true);
            match probe.token() {
                None => {
                    *self = cursor;
                    return true;
                }
                Some(token) if token.is_close() => {
                    *self = cursor;
                    return true;
                }
                Some(_) => cursor = probe,
            }
        }

        let Some(token) = cursor.token() else {
            return false;
        };
        match token.token_type {
            TokenType::Close(_) => return false,
            TokenType::Open(_) => {
                let mut depth = 0usize;
                loop {
                    let Some(token) = cursor.token() else {
                        return false;
                    };
                    match token.token_type {
                        TokenType::Open(_) => depth += 1,
                        TokenType::Close(_) => depth -= 1,
                        _ => {}
                    }
                    cursor.forward_token();
                    if depth == 0 {
                        break;
                    }
                }
            }
            _ => {
                cursor.forward_token();
            }
        }
        *self = cursor;
        true
    }

    /// Move to the start of the previous sibling, including its prefixes
    ///
    /// Fails at the start of the enclosing list, at the start of the buffer,
    /// and when the previous list never opens.
    pub fn backward_sexp(&mut self) -> bool {
        let mut cursor = *self;
        cursor.backward_whitespace(true);

        let Some(token) = cursor.prev_token() else {
            return false;
        };
        match token.token_type {
            TokenType::Open(_) => return false,
            TokenType::Close(_) => {
                let mut depth = 0usize;
                loop {
                    let Some(token) = cursor.prev_token() else {
                        return false;
                    };
                    match token.token_type {
                        TokenType::Close(_) => depth += 1,
                        TokenType::Open(_) => depth -= 1,
                        _ => {}
                    }
                    cursor.backward_token();
                    if depth == 0 {
                        break;
                    }
                }
            }
            _ => {
                cursor.backward_token();
            }
        }
        cursor.absorb_prefixes_backward();
        *self = cursor;
        true
    }

    /// Move to just before the closing bracket of the enclosing list
    pub fn forward_list(&mut self) -> bool {
        let mut cursor = *self;
        while cursor.forward_sexp() {}
        cursor.forward_whitespace(true);
        if cursor.token().is_some_and(|token| token.is_close()) {
            *self = cursor;
            true
        } else {
            false
        }
    }

    /// Move to just after the opening bracket of the enclosing list
    pub fn backward_list(&mut self) -> bool {
        let mut cursor = *self;
        while cursor.backward_sexp() {}
        cursor.backward_whitespace(true);
        if cursor.prev_token().is_some_and(|token| token.is_open()) {
            *self = cursor;
            true
        } else {
            false
        }
    }

    /// Move past the closing bracket of the enclosing list
    pub fn forward_up_sexp(&mut self) -> bool {
        let mut cursor = *self;
        if cursor.forward_list() && cursor.forward_token() {
            *self = cursor;
            true
        } else {
            false
        }
    }

    /// Move before the opening bracket (and prefixes) of the enclosing list
    pub fn backward_up_sexp(&mut self) -> bool {
        let mut cursor = *self;
        if cursor.backward_list() && cursor.backward_token() {
            cursor.absorb_prefixes_backward();
            *self = cursor;
            true
        } else {
            false
        }
    }

    /// Enter the next list at its start, skipping atoms on the way
    pub fn forward_down_sexp(&mut self) -> bool {
        let mut cursor = *self;
        loop {
            cursor.forward_whitespace(true);
            let Some(token) = cursor.token() else {
                return false;
            };
            match token.token_type {
                TokenType::Open(_) => {
                    cursor.forward_token();
                    *self = cursor;
                    return true;
                }
                TokenType::Close(_) => return false,
                _ => {
                    cursor.forward_token();
                }
            }
        }
    }

    /// Enter the previous list at its end, skipping atoms on the way
    pub fn backward_down_sexp(&mut self) -> bool {
        let mut cursor = *self;
        loop {
            cursor.backward_whitespace(true);
            let Some(token) = cursor.prev_token() else {
                return false;
            };
            match token.token_type {
                TokenType::Close(_) => {
                    cursor.backward_token();
                    *self = cursor;
                    return true;
                }
                TokenType::Open(_) => return false,
                _ => {
                    cursor.backward_token();
                }
            }
        }
    }

    fn within_interior(&self, predicate: impl Fn(&Token<'a>) -> bool) -> bool {
        let offset = self.offset;
        let candidates = [
            self.token(),
            self.index
                .checked_sub(1)
                .and_then(|index| self.tokens.get(index).copied()),
        ];
        candidates.into_iter().flatten().any(|token| {
            predicate(&token)
                && token.offset < offset
                && token
                    .interior()
                    .is_some_and(|inner| inner.start <= offset && offset <= inner.end)
        })
    }

    /// Check whether the cursor is strictly inside a string's delimiters
    #[must_use]
    pub fn within_string(&self) -> bool {
        self.within_interior(Token::is_string)
    }

    /// Check whether the cursor is inside a comment's text
    ///
    /// The end of a line comment counts as inside.
    #[must_use]
    pub fn within_comment(&self) -> bool {
        self.within_interior(Token::is_comment)
    }

    /// String or comment token whose interior holds the cursor
    #[must_use]
    pub fn opaque_token(&self) -> Option<Token<'a>> {
        if !(self.within_string() || self.within_comment()) {
            return None;
        }
        if self.is_interior() {
            self.token()
        } else {
            self.prev_token()
        }
    }

    /// Innermost list around the cursor whose brackets match by kind
    ///
    /// Returns `None` at top level and when the surrounding brackets are
    /// unbalanced.
    #[must_use]
    pub fn enclosing_list(&self) -> Option<ListRange> {
        let mut open = *self;
        if !open.backward_list() {
            return None;
        }
        let open_token = open.prev_token()?;
        let mut close = *self;
        if !close.forward_list() {
            return None;
        }
        let close_token = close.token()?;
        let kind = open_token.token_type.delimiter()?;
        if close_token.token_type.delimiter()? != kind {
            return None;
        }
        let mut outer = open;
        outer.backward_token();
        outer.absorb_prefixes_backward();
        Some(ListRange {
            outer_start: outer.offset,
            open: open_token.range(),
            close: close_token.range(),
            kind,
        })
    }

    /// Check whether no list encloses the cursor
    #[must_use]
    pub fn at_top_level(&self) -> bool {
        self.enclosing_list().is_none()
    }

    /// Number of lists enclosing the cursor
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut cursor = *self;
        let mut depth = 0;
        while cursor.backward_up_sexp() {
            depth += 1;
        }
        depth
    }
}
