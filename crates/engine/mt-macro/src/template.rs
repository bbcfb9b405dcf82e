//! Declarative macro templates
//!
//! A template is one macro name with an ordered list of branches. Branches
//! are tried in declaration order; the first whose parameter signature
//! matches the call wins.

use crate::error::ExpandError;
use crate::expand::{is_macro_call, Expander};
use crate::pattern::{ArgumentMap, ParameterPattern, PatternMode};
use mt_stream::{StreamView, TokenStream};
use mt_token::SourceToken;

/// One `( signature ) => { body }` clause.
#[derive(Debug, Clone)]
pub struct MacroBranch {
    /// The branch's compiled parameter signature.
    pub parameter: ParameterPattern,
    /// The branch body, lexed under the source vocabulary.
    pub body: TokenStream<SourceToken>,
}

/// A declarative macro: a name plus its branches.
#[derive(Debug, Clone)]
pub struct MacroTemplate {
    name: String,
    branches: Vec<MacroBranch>,
}

impl MacroTemplate {
    /// Builds a template from `(signature, body-text)` branches.
    #[must_use]
    pub fn new(name: impl Into<String>, branches: Vec<(ParameterPattern, String)>) -> Self {
        Self {
            name: name.into(),
            branches: branches
                .into_iter()
                .map(|(parameter, body)| MacroBranch {
                    parameter,
                    body: TokenStream::lex(&body),
                })
                .collect(),
        }
    }

    /// The macro's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The macro's branches, in declaration order.
    #[must_use]
    pub fn branches(&self) -> &[MacroBranch] {
        &self.branches
    }

    /// Index of the first branch matching the meta-lexed call arguments.
    #[must_use]
    pub fn matching_branch(&self, view: StreamView<'_, mt_token::MetaToken>) -> Option<usize> {
        self.branches
            .iter()
            .position(|branch| branch.parameter.matches(view))
    }

    /// Binds the chosen branch's arguments over the source-lexed call
    /// arguments, advancing `input` past what was consumed.
    #[must_use]
    pub fn map_args(
        &self,
        index: usize,
        input: &mut StreamView<'_, SourceToken>,
    ) -> Option<ArgumentMap> {
        self.branches[index].parameter.map_args(input)
    }

    /// Applies the chosen branch, writing the expansion to `target`.
    ///
    /// The body is walked into a temporary stream: `$name` references expand
    /// their argument text recursively, nested calls to known macros execute
    /// with `$name` references in their argument list substituted from the
    /// outer arguments, and everything else passes through. The temporary
    /// stream is then re-expanded into `target` so that macro calls produced
    /// by substitution are resolved as well.
    ///
    /// # Errors
    ///
    /// Returns an error on arity mismatch, unbound substitution inside a
    /// nested call, or any failure of the recursive expansion.
    pub fn apply(
        &self,
        expander: &mut Expander<'_>,
        index: usize,
        target: &mut TokenStream<SourceToken>,
        args: &ArgumentMap,
    ) -> Result<(), ExpandError> {
        let branch = &self.branches[index];
        let parameter = &branch.parameter;

        if parameter.mode() == PatternMode::Normal
            && args.len() != parameter.argument_names().len()
        {
            return Err(ExpandError::ArityMismatch {
                name: self.name.clone(),
                expected: parameter.argument_names().len(),
                found: args.len(),
            });
        }

        let mut scratch = TokenStream::new();
        let mut view = branch.body.view();

        while !view.is_at_end() {
            if view.peek().is(SourceToken::Dollar) && view.peek_at(1).is(SourceToken::Identifier)
            {
                let name = view.peek_at(1).lexeme;
                if let Some(value) = args.get(&name) {
                    view.advance(2);
                    let argument = TokenStream::<SourceToken>::lex(value);
                    let mut argument_view = argument.view();
                    argument_view.skip(&[SourceToken::Tab, SourceToken::Space]);
                    expander.expand_view(&mut scratch, &mut argument_view)?;
                    continue;
                }
            }

            if is_macro_call(&view) && expander.registry().is_declarative(&view.peek().lexeme) {
                let name = view.pop().lexeme;
                view.advance(2); // '!' '['
                let body = view.between(SourceToken::LSquare, SourceToken::RSquare, true);
                let arguments = substitute_references(body, args)?;
                view.advance(body.remaining() + 1);
                expander.match_and_execute(&mut scratch, &name, &arguments)?;
                continue;
            }

            scratch.push(view.pop());
        }

        let mut scratch_view = scratch.view();
        expander.expand_view(target, &mut scratch_view)
    }
}

/// Rebuilds an argument list's text with `$name` references replaced by the
/// outer arguments.
fn substitute_references(
    mut body: StreamView<'_, SourceToken>,
    args: &ArgumentMap,
) -> Result<String, ExpandError> {
    let mut text = String::new();
    while !body.is_at_end() {
        let token = body.pop();
        if token.is(SourceToken::Dollar) && body.peek().is(SourceToken::Identifier) {
            let name = body.pop().lexeme;
            match args.get(&name) {
                Some(value) => text.push_str(value),
                None => return Err(ExpandError::Substitution { name }),
            }
        } else {
            text.push_str(&token.lexeme);
        }
    }
    Ok(text)
}
