//! The expander: the engine's top-level rewrite loop
//!
//! Walks a preprocessed stream, detects `name![ args ]` call sites, and
//! splices in their expansions, recursing on expansion output so that macros
//! can call macros. Recursion depth is capped.

use crate::error::ExpandError;
use crate::host::MacroHost;
use crate::registry::{MacroKind, MacroRegistry};
use mt_stream::{StreamView, TokenStream};
use mt_token::{MetaToken, SourceToken, Token};

/// Default cap on expansion recursion depth.
pub const DEFAULT_RECURSION_LIMIT: usize = 256;

/// Whether the view is positioned at a macro call site (`name ! [`).
#[must_use]
pub fn is_macro_call(view: &StreamView<'_, SourceToken>) -> bool {
    view.match_sequence(&[
        SourceToken::Identifier,
        SourceToken::Exclamation,
        SourceToken::LSquare,
    ])
}

/// The recursive expansion driver.
pub struct Expander<'a> {
    registry: &'a MacroRegistry,
    host: &'a dyn MacroHost,
    max_depth: usize,
    depth: usize,
    indent: Vec<Token<SourceToken>>,
    at_line_start: bool,
}

impl<'a> Expander<'a> {
    /// Creates an expander over a populated registry.
    #[must_use]
    pub fn new(registry: &'a MacroRegistry, host: &'a dyn MacroHost) -> Self {
        Self {
            registry,
            host,
            max_depth: DEFAULT_RECURSION_LIMIT,
            depth: 0,
            indent: Vec::new(),
            at_line_start: true,
        }
    }

    /// Overrides the recursion cap.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The registry this expander dispatches through.
    #[must_use]
    pub fn registry(&self) -> &'a MacroRegistry {
        self.registry
    }

    /// Expands every macro call in `view`, appending output to `target`.
    ///
    /// # Errors
    ///
    /// Returns the first expansion failure; `target` may hold partial output.
    pub fn expand_view(
        &mut self,
        target: &mut TokenStream<SourceToken>,
        view: &mut StreamView<'_, SourceToken>,
    ) -> Result<(), ExpandError> {
        self.enter()?;
        let result = self.walk(target, view);
        self.depth -= 1;
        result
    }

    fn walk(
        &mut self,
        target: &mut TokenStream<SourceToken>,
        view: &mut StreamView<'_, SourceToken>,
    ) -> Result<(), ExpandError> {
        while !view.peek().is(SourceToken::EndOfFile) {
            let mut token = view.peek();

            // Fuse `Identifier (Underscore Identifier | Underscore+)*` into
            // one logical identifier so hosts that split on underscores still
            // get a single macro-name lookup.
            if token.is(SourceToken::Identifier) {
                loop {
                    if view.peek_at(1).is(SourceToken::Underscore)
                        && view.peek_at(2).is(SourceToken::Identifier)
                    {
                        token.lexeme.push('_');
                        token.lexeme.push_str(&view.peek_at(2).lexeme);
                        view.advance(2);
                    } else if view.peek_at(1).is(SourceToken::Underscore) {
                        while view.peek_at(1).is(SourceToken::Underscore) {
                            token.lexeme.push('_');
                            view.advance(1);
                        }
                    } else {
                        break;
                    }
                }
            }

            if is_macro_call(view) {
                match self.registry.kind(&token.lexeme) {
                    Some(MacroKind::Declarative(_)) => {
                        let arguments = capture_call_arguments(view, &token.lexeme)?;
                        self.match_and_execute(target, &token.lexeme, &arguments)?;
                        self.at_line_start = false;
                        view.advance(1);
                        continue;
                    }
                    Some(MacroKind::Procedural) => {
                        let arguments = capture_call_arguments(view, &token.lexeme)?;
                        let output = self.host.expand(&token.lexeme, &arguments).map_err(
                            |error| ExpandError::Host {
                                name: token.lexeme.clone(),
                                message: format!("{error:#}"),
                            },
                        )?;
                        self.splice_with_indent(target, &output);
                        self.at_line_start = false;
                        view.advance(1);
                        continue;
                    }
                    None => {}
                }
            }

            self.track_indent(&token);
            target.push(token);
            view.advance(1);
        }
        Ok(())
    }

    /// Runs one declarative macro over its argument text, consuming one
    /// matched element per iteration until the arguments are exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error when no branch matches, binding fails, or a branch
    /// application fails.
    pub fn match_and_execute(
        &mut self,
        target: &mut TokenStream<SourceToken>,
        name: &str,
        arguments: &str,
    ) -> Result<(), ExpandError> {
        self.enter()?;
        let result = self.execute(target, name, arguments);
        self.depth -= 1;
        result
    }

    fn execute(
        &mut self,
        target: &mut TokenStream<SourceToken>,
        name: &str,
        arguments: &str,
    ) -> Result<(), ExpandError> {
        let registry = self.registry;
        let template = registry
            .template(name)
            .ok_or_else(|| ExpandError::UndefinedMacro {
                name: name.to_owned(),
            })?;

        let argument_stream = TokenStream::<SourceToken>::lex(arguments);
        let mut argument_view = argument_stream.view();

        loop {
            // Structural matching happens under the meta vocabulary over
            // whatever argument text remains.
            let meta = TokenStream::<MetaToken>::lex(&argument_view.construct());
            let index =
                template
                    .matching_branch(meta.view())
                    .ok_or_else(|| ExpandError::MatchFailure {
                        name: name.to_owned(),
                    })?;

            let args = template.map_args(index, &mut argument_view).ok_or_else(|| {
                ExpandError::ArgumentMapping {
                    name: name.to_owned(),
                }
            })?;

            template.apply(self, index, target, &args)?;

            while argument_view.peek().is(SourceToken::Newline) {
                target.push(argument_view.pop());
            }
            argument_view.skip(&[SourceToken::Space, SourceToken::Newline, SourceToken::Tab]);

            if argument_view.is_at_end() {
                return Ok(());
            }
        }
    }

    fn enter(&mut self) -> Result<(), ExpandError> {
        if self.depth >= self.max_depth {
            return Err(ExpandError::RecursionLimit {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Tracks the run of whitespace since the last newline; it is replayed
    /// after every newline of procedural output so multi-line expansions
    /// indent consistently with the call site.
    fn track_indent(&mut self, token: &Token<SourceToken>) {
        if token.is(SourceToken::Newline) {
            self.indent.clear();
            self.at_line_start = true;
        } else if self.at_line_start
            && token.any_of(&[SourceToken::Space, SourceToken::Tab])
        {
            self.indent.push(token.clone());
        } else {
            self.at_line_start = false;
        }
    }

    fn splice_with_indent(&self, target: &mut TokenStream<SourceToken>, output: &str) {
        let stream = TokenStream::<SourceToken>::lex(output);
        for token in stream.iter() {
            let is_newline = token.is(SourceToken::Newline);
            target.push(token.clone());
            if is_newline {
                for whitespace in &self.indent {
                    target.push(whitespace.clone());
                }
            }
        }
    }
}

/// Captures the balanced `[...]` argument body of a call site, leaving the
/// cursor on the closing `]`.
fn capture_call_arguments(
    view: &mut StreamView<'_, SourceToken>,
    name: &str,
) -> Result<String, ExpandError> {
    view.skip_until(SourceToken::LSquare);
    if !view.consume(&[SourceToken::LSquare]) {
        return Err(ExpandError::MalformedCall {
            name: name.to_owned(),
        });
    }
    let body = view.between(SourceToken::LSquare, SourceToken::RSquare, true);
    let text = body.construct();
    view.advance(body.remaining());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NullHost;
    use crate::pattern::ParameterPattern;
    use crate::template::MacroTemplate;
    use anyhow::Result;

    fn pattern(signature: &str) -> ParameterPattern {
        let stream = TokenStream::<MetaToken>::lex(signature);
        ParameterPattern::from_signature(stream.view())
    }

    fn registry(macros: &[(&str, &[(&str, &str)])]) -> MacroRegistry {
        let mut registry = MacroRegistry::new();
        for (name, branches) in macros {
            registry.register_template(MacroTemplate::new(
                *name,
                branches
                    .iter()
                    .map(|(signature, body)| (pattern(signature), (*body).to_owned()))
                    .collect(),
            ));
        }
        registry
    }

    fn expand(registry: &MacroRegistry, source: &str) -> Result<String, ExpandError> {
        let stream = TokenStream::<SourceToken>::lex(source);
        let mut view = stream.view();
        let mut target = TokenStream::new();
        Expander::new(registry, &NullHost).expand_view(&mut target, &mut view)?;
        Ok(target.construct())
    }

    #[test]
    fn test_plain_source_passes_through() {
        let registry = registry(&[]);
        let source = "no macros here\n";
        assert_eq!(expand(&registry, source).unwrap(), source);
    }

    #[test]
    fn test_parameterless_expansion() {
        let registry = registry(&[("greet", &[("", "hi")])]);
        assert_eq!(expand(&registry, "greet![]").unwrap(), "hi");
    }

    #[test]
    fn test_single_argument_substitution() {
        let registry = registry(&[("shout", &[("$x", "say $x")])]);
        assert_eq!(expand(&registry, "shout![world]").unwrap(), "say world");
    }

    #[test]
    fn test_no_matching_branch_is_error() {
        let registry = registry(&[("greet", &[("", "hi")])]);
        assert!(matches!(
            expand(&registry, "greet![oops]"),
            Err(ExpandError::MatchFailure { .. })
        ));
    }

    #[test]
    fn test_nested_macro_in_body() {
        let registry = registry(&[
            ("inner", &[("", "X")]),
            ("outer", &[("", "[ inner![] ]")]),
        ]);
        assert_eq!(expand(&registry, "outer![]").unwrap(), "[ X ]");
    }

    #[test]
    fn test_macro_in_grouped_argument() {
        let registry = registry(&[
            ("one", &[("", "1")]),
            ("wrap", &[("$x", "<$x>")]),
        ]);
        // A parenthesized argument is consumed as one group; expanding its
        // captured text resolves the inner call.
        assert_eq!(expand(&registry, "wrap![(one![])]").unwrap(), "<1>");
    }

    #[test]
    fn test_variadic_emits_body_per_element() {
        let registry = registry(&[("list", &[("$( $x ),*", "$x ; ")])]);
        assert_eq!(expand(&registry, "list![1,2,3]").unwrap(), "1 ; 2 ; 3 ; ");
    }

    #[test]
    fn test_cyclic_macro_hits_recursion_limit() {
        let registry = registry(&[("a", &[("", "a![]")])]);
        let stream = TokenStream::<SourceToken>::lex("a![]");
        let mut view = stream.view();
        let mut target = TokenStream::new();
        let result = Expander::new(&registry, &NullHost)
            .with_max_depth(32)
            .expand_view(&mut target, &mut view);
        assert!(matches!(result, Err(ExpandError::RecursionLimit { limit: 32 })));
    }

    #[test]
    fn test_procedural_dispatch_reapplies_indent() {
        struct FakeHost;
        impl MacroHost for FakeHost {
            fn expand(&self, _name: &str, arguments: &str) -> Result<String> {
                Ok(format!("a({arguments})\nb"))
            }
        }

        let mut reg = MacroRegistry::new();
        reg.register_procedural("gen");
        let stream = TokenStream::<SourceToken>::lex("    gen![x]");
        let mut view = stream.view();
        let mut target = TokenStream::new();
        Expander::new(&reg, &FakeHost)
            .expand_view(&mut target, &mut view)
            .unwrap();
        assert_eq!(target.construct(), "    a(x)\n    b");
    }

    #[test]
    fn test_undefined_procedural_without_host_fails() {
        let mut reg = MacroRegistry::new();
        reg.register_procedural("gen");
        let result = expand(&reg, "gen![x]");
        assert!(matches!(result, Err(ExpandError::Host { .. })));
    }
}
