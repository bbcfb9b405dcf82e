//! The token type shared by every vocabulary

use crate::TokenKind;

/// A classified slice of source text.
///
/// The lexeme is the exact source substring, whitespace included;
/// concatenating the lexemes of a stream reproduces the input verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K: TokenKind> {
    /// Kind drawn from the vocabulary.
    pub kind: K,
    /// Exact source substring.
    pub lexeme: String,
    /// 1-based source line the token starts on.
    pub line: usize,
}

impl<K: TokenKind> Token<K> {
    /// Creates a token.
    #[must_use]
    pub fn new(kind: K, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// The end-of-input sentinel.
    #[must_use]
    pub fn end_of_file(line: usize) -> Self {
        Self::new(K::END_OF_FILE, "", line)
    }

    /// Whether the token is of the given kind.
    #[must_use]
    pub fn is(&self, kind: K) -> bool {
        self.kind == kind
    }

    /// Whether the token is of any of the given kinds.
    #[must_use]
    pub fn any_of(&self, kinds: &[K]) -> bool {
        kinds.iter().any(|kind| self.kind == *kind)
    }

    /// Lexical equality: kinds match, and for identifiers and numbers the
    /// lexemes match as well.
    #[must_use]
    pub fn lexically_eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        if self.kind == K::IDENTIFIER || self.kind == K::NUMBER {
            return self.lexeme == other.lexeme;
        }
        true
    }
}

impl<K: TokenKind> Default for Token<K> {
    fn default() -> Self {
        Self::end_of_file(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceToken;

    #[test]
    fn test_default_is_end_of_file() {
        let token: Token<SourceToken> = Token::default();
        assert!(token.is(SourceToken::EndOfFile));
        assert!(token.lexeme.is_empty());
    }

    #[test]
    fn test_lexical_equality_checks_identifier_lexemes() {
        let a = Token::new(SourceToken::Identifier, "foo", 1);
        let b = Token::new(SourceToken::Identifier, "foo", 7);
        let c = Token::new(SourceToken::Identifier, "bar", 1);
        assert!(a.lexically_eq(&b));
        assert!(!a.lexically_eq(&c));
    }

    #[test]
    fn test_lexical_equality_ignores_symbol_lexemes() {
        let a = Token::new(SourceToken::Comma, ",", 1);
        let b = Token::new(SourceToken::Comma, ",", 2);
        assert!(a.lexically_eq(&b));
    }

    #[test]
    fn test_any_of() {
        let token = Token::new(SourceToken::Space, " ", 1);
        assert!(token.any_of(&[SourceToken::Tab, SourceToken::Space]));
        assert!(!token.any_of(&[SourceToken::Newline]));
    }
}
