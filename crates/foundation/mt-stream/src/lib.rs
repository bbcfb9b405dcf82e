//! Token streams and non-owning stream views
//!
//! A [`TokenStream`] owns an ordered token vector for the duration of one
//! engine run. A [`StreamView`] is a cheap cursor into a stream with a fixed
//! exclusive upper bound; views borrow the stream, so they can never outlive
//! it, and the stream cannot be mutated while any view exists.

use mt_lexer::Lexer;
use mt_token::{Token, TokenKind};

/// An ordered sequence of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream<K: TokenKind> {
    tokens: Vec<Token<K>>,
}

impl<K: TokenKind> TokenStream<K> {
    /// Creates an empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Lexes source text into a stream under the vocabulary `K`.
    #[must_use]
    pub fn lex(source: &str) -> Self {
        let mut lexer = Lexer::<K>::new(source);
        let mut stream = Self::new();
        loop {
            let token = lexer.scan_token();
            if token.kind == K::END_OF_FILE {
                break;
            }
            stream.push(token);
        }
        stream
    }

    /// Appends a token.
    pub fn push(&mut self, token: Token<K>) {
        self.tokens.push(token);
    }

    /// Removes the last token, if any.
    pub fn pop_back(&mut self) -> Option<Token<K>> {
        self.tokens.pop()
    }

    /// Appends every token of `other`.
    pub fn extend(&mut self, other: TokenStream<K>) {
        self.tokens.extend(other.tokens);
    }

    /// The token at `index`, or the end-of-input sentinel when out of range.
    #[must_use]
    pub fn at(&self, index: usize) -> Token<K> {
        self.tokens.get(index).cloned().unwrap_or_default()
    }

    /// The token `offset` positions from the back, or the sentinel.
    #[must_use]
    pub fn peek_back(&self, offset: usize) -> Token<K> {
        if offset == 0 || offset > self.tokens.len() {
            return Token::default();
        }
        self.tokens[self.tokens.len() - offset].clone()
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the stream holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Removes every token.
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Iterates over the tokens.
    pub fn iter(&self) -> impl Iterator<Item = &Token<K>> {
        self.tokens.iter()
    }

    /// Concatenates every lexeme, reproducing the covered source text.
    #[must_use]
    pub fn construct(&self) -> String {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }

    /// A view over the whole stream.
    #[must_use]
    pub fn view(&self) -> StreamView<'_, K> {
        StreamView {
            stream: self,
            cursor: 0,
            end: self.tokens.len(),
        }
    }
}

/// A non-owning cursor into a [`TokenStream`] with an exclusive upper bound.
///
/// Views are `Copy`; matching routines take a view by value and advance their
/// private copy without disturbing the caller's cursor.
#[derive(Debug, Clone, Copy)]
pub struct StreamView<'a, K: TokenKind> {
    stream: &'a TokenStream<K>,
    cursor: usize,
    end: usize,
}

impl<'a, K: TokenKind> StreamView<'a, K> {
    /// Whether the cursor (plus `offset`) has reached the view's bound.
    #[must_use]
    pub fn is_at_end_offset(&self, offset: usize) -> bool {
        self.cursor + offset >= self.end
    }

    /// Whether the cursor has reached the view's bound.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.is_at_end_offset(0)
    }

    /// The current token, or the end-of-input sentinel past the bound.
    #[must_use]
    pub fn peek(&self) -> Token<K> {
        self.peek_at(0)
    }

    /// The token `offset` positions ahead, or the sentinel past the bound.
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Token<K> {
        if self.is_at_end_offset(offset) {
            return Token::default();
        }
        self.stream.at(self.cursor + offset)
    }

    /// The token `offset` positions behind the cursor, or the sentinel.
    #[must_use]
    pub fn peek_back(&self, offset: usize) -> Token<K> {
        if offset > self.cursor {
            return Token::default();
        }
        self.stream.at(self.cursor - offset)
    }

    /// Returns the current token and advances.
    pub fn pop(&mut self) -> Token<K> {
        let token = self.peek();
        self.advance(1);
        token
    }

    /// Advances the cursor by `steps`.
    pub fn advance(&mut self, steps: usize) {
        self.cursor += steps;
    }

    /// Remaining tokens before the bound.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.cursor)
    }

    /// Whether the current token is any of the given kinds.
    #[must_use]
    pub fn matches(&self, kinds: &[K]) -> bool {
        self.peek().any_of(kinds)
    }

    /// Whether the next tokens follow the given kind sequence exactly.
    #[must_use]
    pub fn match_sequence(&self, kinds: &[K]) -> bool {
        kinds
            .iter()
            .enumerate()
            .all(|(offset, kind)| self.peek_at(offset).kind == *kind)
    }

    /// Advances past the current token if it is any of the given kinds.
    pub fn consume(&mut self, kinds: &[K]) -> bool {
        let matched = self.matches(kinds);
        if matched {
            self.advance(1);
        }
        matched
    }

    /// Advances while the current token is any of the given kinds.
    pub fn skip(&mut self, kinds: &[K]) {
        while !self.is_at_end() && self.matches(kinds) {
            self.advance(1);
        }
    }

    /// Advances until the current token is of the given kind (or the end).
    pub fn skip_until(&mut self, kind: K) {
        while !self.is_at_end() && !self.peek().is(kind) {
            self.advance(1);
        }
    }

    /// A sub-view covering everything before the first token of `kind`.
    #[must_use]
    pub fn until(&self, kind: K) -> StreamView<'a, K> {
        let mut offset = 0;
        while !self.is_at_end_offset(offset) && !self.peek_at(offset).is(kind) {
            offset += 1;
        }
        StreamView {
            stream: self.stream,
            cursor: self.cursor,
            end: self.cursor + offset,
        }
    }

    /// A sub-view of the balanced body between `head` and its matching
    /// `tail`, nesting respected.
    ///
    /// With `in_scope` the cursor is taken to sit just inside the opening
    /// `head`; otherwise the pair is located first. The caller is expected to
    /// advance past the closing `tail` using the returned view's
    /// [`remaining`](Self::remaining) plus one.
    #[must_use]
    pub fn between(&self, head: K, tail: K, in_scope: bool) -> StreamView<'a, K> {
        let mut offset = 0;
        if !in_scope {
            while !self.is_at_end_offset(offset) && !self.peek_at(offset).is(head) {
                offset += 1;
            }
            offset += 1;
        }

        let start = self.cursor + offset;
        let mut depth = 1i32;
        while !self.is_at_end_offset(offset) {
            let token = self.peek_at(offset);
            if token.is(head) {
                depth += 1;
            } else if token.is(tail) {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            offset += 1;
        }

        StreamView {
            stream: self.stream,
            cursor: start,
            end: self.cursor + offset,
        }
    }

    /// A sub-view of the next `size` tokens.
    #[must_use]
    pub fn sub_view(&self, size: usize) -> StreamView<'a, K> {
        StreamView {
            stream: self.stream,
            cursor: self.cursor,
            end: (self.cursor + size).min(self.end),
        }
    }

    /// Concatenates the remaining lexemes; empty for an exhausted view.
    #[must_use]
    pub fn construct(&self) -> String {
        let mut text = String::new();
        let mut offset = 0;
        while !self.is_at_end_offset(offset) {
            text.push_str(&self.peek_at(offset).lexeme);
            offset += 1;
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt_token::SourceToken;

    fn stream(source: &str) -> TokenStream<SourceToken> {
        TokenStream::lex(source)
    }

    #[test]
    fn test_construct_round_trips() {
        let source = "foo! [ bar, (1 + 2) ]\n";
        assert_eq!(stream(source).construct(), source);
    }

    #[test]
    fn test_peek_past_end_is_sentinel() {
        let s = stream("a");
        let view = s.view();
        assert_eq!(view.peek_at(5).kind, SourceToken::EndOfFile);
    }

    #[test]
    fn test_pop_and_peek_back() {
        let s = stream("a b");
        let mut view = s.view();
        assert_eq!(view.pop().lexeme, "a");
        assert_eq!(view.peek_back(1).lexeme, "a");
        assert_eq!(view.pop().lexeme, " ");
        assert_eq!(view.pop().lexeme, "b");
        assert!(view.is_at_end());
    }

    #[test]
    fn test_match_sequence() {
        let s = stream("foo![x]");
        let view = s.view();
        assert!(view.match_sequence(&[
            SourceToken::Identifier,
            SourceToken::Exclamation,
            SourceToken::LSquare,
        ]));
        assert!(!view.match_sequence(&[SourceToken::Identifier, SourceToken::LSquare]));
    }

    #[test]
    fn test_skip_and_consume() {
        let s = stream("  \t x");
        let mut view = s.view();
        view.skip(&[SourceToken::Space, SourceToken::Tab]);
        assert!(view.consume(&[SourceToken::Identifier]));
        assert!(view.is_at_end());
    }

    #[test]
    fn test_until_excludes_match() {
        let s = stream("a b, c");
        let view = s.view();
        let head = view.until(SourceToken::Comma);
        assert_eq!(head.construct(), "a b");
    }

    #[test]
    fn test_between_in_scope_counts_inner_tokens() {
        let s = stream("(a (b) c) d");
        let mut view = s.view();
        view.advance(1); // into the opening paren
        let body = view.between(SourceToken::LParen, SourceToken::RParen, true);
        assert_eq!(body.construct(), "a (b) c");
        assert_eq!(body.remaining(), 7);
        // The documented calling convention: step past the closing tail.
        view.advance(body.remaining() + 1);
        assert_eq!(view.construct(), " d");
    }

    #[test]
    fn test_between_out_of_scope_locates_pair() {
        let s = stream("x = [1, 2] y");
        let view = s.view();
        let body = view.between(SourceToken::LSquare, SourceToken::RSquare, false);
        assert_eq!(body.construct(), "1, 2");
    }

    #[test]
    fn test_sub_view_construct_matches_full_construct() {
        let s = stream("alpha beta");
        let view = s.view();
        let sub = view.sub_view(view.remaining());
        assert_eq!(sub.construct(), view.construct());
    }

    #[test]
    fn test_construct_on_exhausted_view_is_empty() {
        let s = stream("a");
        let mut view = s.view();
        view.advance(1);
        assert_eq!(view.construct(), "");
        let empty = stream("");
        assert_eq!(empty.view().construct(), "");
    }

    #[test]
    fn test_stream_peek_back() {
        let mut s = stream("a b");
        assert_eq!(s.peek_back(1).lexeme, "b");
        assert_eq!(s.peek_back(3).kind, SourceToken::EndOfFile);
        s.pop_back();
        assert_eq!(s.peek_back(1).lexeme, " ");
    }
}
