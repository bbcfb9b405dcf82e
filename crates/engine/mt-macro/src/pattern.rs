//! Parameter-signature patterns for declarative macro branches
//!
//! A signature like `($first, $( $rest ),*)` is compiled into a sequence of
//! pattern elements. Matching runs over the meta-lexed call arguments;
//! argument binding runs over the source-lexed arguments so captured values
//! keep their exact spelling.

use mt_stream::StreamView;
use mt_token::{MetaToken, SourceToken, Token, TokenKind};
use rustc_hash::FxHashMap;

/// Argument name to captured argument text.
pub type ArgumentMap = FxHashMap<String, String>;

/// Whitespace kinds skipped between items while binding arguments.
const BINDING_WHITESPACE: &[SourceToken] =
    &[SourceToken::Newline, SourceToken::Tab, SourceToken::Space];

/// One element of a parameter signature.
#[derive(Debug, Clone)]
pub enum PatternElement {
    /// A token the input must reproduce (lexical equality for identifiers
    /// and numbers).
    Literal(Token<MetaToken>),
    /// `$name`: consumes one input token, or one balanced `(...)` group.
    Placeholder(String),
    /// `$( template ) <sep>? [*+]?`: the repeating template of a variadic
    /// branch, with an optional single-token separator between repetitions.
    Variadic {
        /// Elements of one repetition.
        inner: Vec<PatternElement>,
        /// Separator expected between repetitions, if any.
        separator: Option<Token<MetaToken>>,
    },
}

/// Overall shape of a branch's parameter signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// Empty signature; matches only an empty argument list.
    Empty,
    /// Fixed-arity signature.
    Normal,
    /// Signature containing a variadic group.
    Variadic,
}

/// The compiled parameter signature of one macro branch.
#[derive(Debug, Clone)]
pub struct ParameterPattern {
    mode: PatternMode,
    elements: Vec<PatternElement>,
    argument_names: Vec<String>,
    variadic_name: Option<String>,
}

impl Default for ParameterPattern {
    fn default() -> Self {
        Self {
            mode: PatternMode::Empty,
            elements: Vec::new(),
            argument_names: Vec::new(),
            variadic_name: None,
        }
    }
}

impl ParameterPattern {
    /// Compiles a parameter signature from its meta-token view.
    #[must_use]
    pub fn from_signature(mut view: StreamView<'_, MetaToken>) -> Self {
        if view.is_at_end() {
            return Self::default();
        }

        let mut pattern = Self {
            mode: PatternMode::Normal,
            ..Self::default()
        };

        while !view.is_at_end() {
            let token = view.pop();
            if token.is(MetaToken::Dollar) {
                pattern.parse_sigil(token, &mut view);
            } else {
                pattern.elements.push(PatternElement::Literal(token));
            }
        }

        pattern
    }

    /// The signature's shape.
    #[must_use]
    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    /// Declared argument names, in signature order (variadic container
    /// excluded).
    #[must_use]
    pub fn argument_names(&self) -> &[String] {
        &self.argument_names
    }

    /// The variadic container's name, when the signature is variadic.
    #[must_use]
    pub fn variadic_name(&self) -> Option<&str> {
        self.variadic_name.as_deref()
    }

    fn parse_sigil(&mut self, sigil: Token<MetaToken>, view: &mut StreamView<'_, MetaToken>) {
        match view.peek().kind {
            MetaToken::Identifier => {
                let name = view.pop().lexeme;
                self.argument_names.push(name.clone());
                self.elements.push(PatternElement::Placeholder(name));
            }
            MetaToken::LParen => {
                self.mode = PatternMode::Variadic;
                view.advance(1);
                let mut body = view.between(MetaToken::LParen, MetaToken::RParen, true);
                view.advance(body.remaining() + 1);

                let mut inner = Vec::new();
                while !body.is_at_end() {
                    let token = body.pop();
                    if token.is(MetaToken::Dollar) && body.peek().is(MetaToken::Identifier) {
                        let name = body.pop().lexeme;
                        if self.variadic_name.is_none() {
                            self.variadic_name = Some(name.clone());
                        }
                        inner.push(PatternElement::Placeholder(name));
                    } else {
                        inner.push(PatternElement::Literal(token));
                    }
                }

                let markers = [MetaToken::Star, MetaToken::Plus];
                let mut separator = None;
                if view.matches(&markers) {
                    view.advance(1);
                } else if view.peek_at(1).any_of(&markers) {
                    separator = Some(view.pop());
                    view.advance(1);
                }

                self.elements.push(PatternElement::Variadic { inner, separator });
            }
            _ => {
                // Stray sigil; keep it literal so the mismatch surfaces when
                // matching instead of being silently dropped.
                self.elements.push(PatternElement::Literal(sigil));
            }
        }
    }

    /// Whether the meta-lexed call arguments match this signature.
    #[must_use]
    pub fn matches(&self, mut input: StreamView<'_, MetaToken>) -> bool {
        if self.mode == PatternMode::Empty {
            return input.peek().is(MetaToken::EndOfFile);
        }

        for element in &self.elements {
            match element {
                PatternElement::Literal(expected) => {
                    let token = input.pop();
                    if !token.lexically_eq(expected) {
                        return false;
                    }
                }
                PatternElement::Placeholder(_) => {
                    if !consume_value(&mut input) {
                        return false;
                    }
                }
                PatternElement::Variadic { inner, separator } => {
                    return matches_variadic(inner, separator.as_ref(), input);
                }
            }
        }

        input.is_at_end()
    }

    /// Binds argument names to argument text over the source-lexed call
    /// arguments.
    ///
    /// For a variadic signature one repetition of the template is bound per
    /// call (a following separator is consumed); the expansion loop re-runs
    /// the matcher over whatever remains.
    #[must_use]
    pub fn map_args(&self, input: &mut StreamView<'_, SourceToken>) -> Option<ArgumentMap> {
        let mut map = ArgumentMap::default();

        for element in &self.elements {
            match element {
                PatternElement::Literal(expected) => {
                    bind_literal(input, expected)?;
                }
                PatternElement::Placeholder(name) => {
                    bind_placeholder(input, name, &mut map)?;
                }
                PatternElement::Variadic { inner, separator } => {
                    for element in inner {
                        match element {
                            PatternElement::Literal(expected) => bind_literal(input, expected)?,
                            PatternElement::Placeholder(name) => {
                                bind_placeholder(input, name, &mut map)?;
                            }
                            PatternElement::Variadic { .. } => return None,
                        }
                    }
                    input.skip(BINDING_WHITESPACE);
                    if let Some(separator) = separator {
                        if input.peek().kind.name() == separator.kind.name() {
                            input.advance(1);
                        }
                    }
                }
            }
        }

        Some(map)
    }
}

/// Consumes one argument value during matching: a balanced `(...)` group, or
/// a single non-sentinel token.
fn consume_value(input: &mut StreamView<'_, MetaToken>) -> bool {
    if input.is_at_end() {
        return false;
    }
    let token = input.pop();
    if token.is(MetaToken::LParen) {
        let body = input.between(MetaToken::LParen, MetaToken::RParen, true);
        input.advance(body.remaining() + 1);
    }
    true
}

fn matches_variadic(
    inner: &[PatternElement],
    separator: Option<&Token<MetaToken>>,
    mut input: StreamView<'_, MetaToken>,
) -> bool {
    if inner.is_empty() || input.is_at_end() {
        return false;
    }

    loop {
        for element in inner {
            match element {
                PatternElement::Literal(expected) => {
                    if !input.pop().lexically_eq(expected) {
                        return false;
                    }
                }
                PatternElement::Placeholder(_) => {
                    if !consume_value(&mut input) {
                        return false;
                    }
                }
                PatternElement::Variadic { .. } => return false,
            }
        }

        if input.is_at_end() {
            return true;
        }

        if let Some(separator) = separator {
            if !input.pop().lexically_eq(separator) {
                return false;
            }
            // A trailing separator has nothing left to repeat over.
            if input.is_at_end() {
                return false;
            }
        }
    }
}

/// Requires the next non-whitespace source token to agree with the expected
/// literal's kind. Kinds are compared by name across the two vocabularies.
fn bind_literal(
    input: &mut StreamView<'_, SourceToken>,
    expected: &Token<MetaToken>,
) -> Option<()> {
    input.skip(BINDING_WHITESPACE);
    let token = input.pop();
    if token.kind.name() == expected.kind.name() {
        Some(())
    } else {
        None
    }
}

/// Binds the next argument value: the constructed text of a balanced `(...)`
/// group, or a single token's lexeme.
fn bind_placeholder(
    input: &mut StreamView<'_, SourceToken>,
    name: &str,
    map: &mut ArgumentMap,
) -> Option<()> {
    input.skip(BINDING_WHITESPACE);
    let token = input.pop();
    if token.is(SourceToken::EndOfFile) {
        return None;
    }

    let value = if token.is(SourceToken::LParen) {
        let body = input.between(SourceToken::LParen, SourceToken::RParen, true);
        input.advance(body.remaining() + 1);
        body.construct()
    } else {
        token.lexeme
    };

    map.insert(name.to_owned(), value);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt_stream::TokenStream;

    fn pattern(signature: &str) -> ParameterPattern {
        let stream = TokenStream::<MetaToken>::lex(signature);
        ParameterPattern::from_signature(stream.view())
    }

    fn matches(signature: &str, input: &str) -> bool {
        let stream = TokenStream::<MetaToken>::lex(input);
        pattern(signature).matches(stream.view())
    }

    fn bind(signature: &str, input: &str) -> Option<ArgumentMap> {
        let stream = TokenStream::<SourceToken>::lex(input);
        let mut view = stream.view();
        pattern(signature).map_args(&mut view)
    }

    #[test]
    fn test_empty_signature_matches_only_empty_input() {
        assert_eq!(pattern("").mode(), PatternMode::Empty);
        assert!(matches("", ""));
        assert!(!matches("", "x"));
    }

    #[test]
    fn test_placeholder_names_in_order() {
        let p = pattern("$a, $b");
        assert_eq!(p.argument_names(), ["a", "b"]);
        assert_eq!(p.mode(), PatternMode::Normal);
    }

    #[test]
    fn test_normal_requires_exhausted_input() {
        assert!(matches("$x", "foo"));
        assert!(!matches("$x", "foo bar"));
        assert!(!matches("$x", ""));
    }

    #[test]
    fn test_literal_identifiers_compare_lexemes() {
        assert!(matches("a", "a"));
        assert!(!matches("a", "b"));
        assert!(matches("add $x", "add 1"));
        assert!(!matches("add $x", "sub 1"));
    }

    #[test]
    fn test_grouped_argument_consumed_balanced() {
        assert!(matches("$e", "(1 + (2 * 3))"));
        assert!(!matches("$e", "(1) extra"));
    }

    #[test]
    fn test_variadic_with_separator() {
        let p = pattern("$( $x ),*");
        assert_eq!(p.mode(), PatternMode::Variadic);
        assert_eq!(p.variadic_name(), Some("x"));
        assert!(matches("$( $x ),*", "1, 2, 3"));
        assert!(matches("$( $x ),*", "1"));
        assert!(!matches("$( $x ),*", "1, 2,"));
        assert!(!matches("$( $x ),*", ""));
    }

    #[test]
    fn test_variadic_without_separator() {
        assert!(matches("$( $x )*", "a b c"));
        assert!(matches("$( $x ; )*", "a ; b ;"));
        assert!(!matches("$( $x ; )*", "a ; b"));
    }

    #[test]
    fn test_map_args_binds_lexemes() {
        let map = bind("$a, $b", "hello, 42").unwrap();
        assert_eq!(map["a"], "hello");
        assert_eq!(map["b"], "42");
    }

    #[test]
    fn test_map_args_binds_group_text() {
        let map = bind("$e", "(1 + 2)").unwrap();
        assert_eq!(map["e"], "1 + 2");
    }

    #[test]
    fn test_map_args_literal_mismatch() {
        assert!(bind("add $x", "sub 1").is_none());
    }

    #[test]
    fn test_map_args_key_set() {
        let p = pattern("$a, $( $x ),*");
        let stream = TokenStream::<SourceToken>::lex("first, 1, 2");
        let mut view = stream.view();
        let map = p.map_args(&mut view).unwrap();
        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["a", "x"]);
    }

    #[test]
    fn test_variadic_map_binds_one_repetition() {
        let p = pattern("$( $x ),*");
        let stream = TokenStream::<SourceToken>::lex("1,2,3");
        let mut view = stream.view();
        let map = p.map_args(&mut view).unwrap();
        assert_eq!(map["x"], "1");
        // The separator is consumed with the repetition.
        assert_eq!(view.construct(), "2,3");
    }
}
