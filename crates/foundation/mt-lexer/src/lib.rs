//! One-pass scanner over a declared token vocabulary
//!
//! Scanning order at each position: discard the vocabulary's ignorable
//! characters (and `//` line comments where the vocabulary opts in), then
//! classify a digit run as a number, a word as a keyword or identifier, and
//! a leading character as its declared symbol. Anything else becomes an
//! `Error` token.

use mt_token::{Token, TokenKind};
use std::marker::PhantomData;

/// Lexeme of every `Error` token.
pub const UNEXPECTED_CHARACTER: &str = "Unexpected character.";

/// A scanner producing tokens of one vocabulary from source text.
pub struct Lexer<K: TokenKind> {
    chars: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    _kind: PhantomData<K>,
}

impl<K: TokenKind> Lexer<K> {
    /// Creates a scanner over the given source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            _kind: PhantomData,
        }
    }

    /// Whether the scanner has consumed all input.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    /// Scans and returns the next token.
    pub fn scan_token(&mut self) -> Token<K> {
        self.skip_ignorable();
        self.start = self.current;

        if self.is_at_end() {
            return Token::end_of_file(self.line);
        }

        let line = self.line;
        let ch = self.advance();

        if ch.is_ascii_digit() {
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            return self.make_token(K::NUMBER, line);
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            while self
                .peek(0)
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.advance();
            }
            let word: String = self.chars[self.start..self.current].iter().collect();
            let kind = K::keyword(&word).unwrap_or(K::IDENTIFIER);
            return self.make_token(kind, line);
        }

        if let Some(kind) = K::symbol(ch) {
            return self.make_token(kind, line);
        }

        Token::new(K::ERROR, UNEXPECTED_CHARACTER, line)
    }

    /// Discards ignorable characters and, where the vocabulary opts in,
    /// `//` line comments.
    pub fn skip_ignorable(&mut self) {
        loop {
            match self.peek(0) {
                Some(ch) if K::IGNORABLE.contains(&ch) => {
                    self.advance();
                }
                Some('/') if K::LINE_COMMENTS && self.peek(1) == Some('/') => {
                    while let Some(ch) = self.peek(0) {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Captures the balanced body between an already-consumed `head` and its
    /// matching `tail`, respecting nesting.
    ///
    /// The returned `Raw` token's lexeme is the exact source slice strictly
    /// between the delimiters; the scanner is left positioned just before the
    /// closing `tail`, so the next [`scan_token`](Self::scan_token) returns it.
    pub fn capture_balanced(&mut self, head: K, tail: K) -> Token<K> {
        let start_pos = self.current;
        let start_line = self.line;
        let mut depth = 1i32;
        let mut last_len = 0usize;

        while depth != 0 && !self.is_at_end() {
            let token = self.scan_token();
            if token.kind == K::END_OF_FILE {
                last_len = 0;
                break;
            }
            if token.kind == head {
                depth += 1;
            } else if token.kind == tail {
                depth -= 1;
            }
            last_len = token.lexeme.chars().count();
        }

        if depth == 0 {
            self.current -= last_len;
        }

        let lexeme: String = self.chars[start_pos..self.current].iter().collect();
        self.start = start_pos;
        Token::new(K::RAW, lexeme, start_line)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.current + offset).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.current];
        self.current += 1;
        if ch == '\n' {
            self.line += 1;
        }
        ch
    }

    fn make_token(&self, kind: K, line: usize) -> Token<K> {
        let lexeme: String = self.chars[self.start..self.current].iter().collect();
        Token::new(kind, lexeme, line)
    }
}
