//! Source preprocessing ahead of expansion
//!
//! Two edits, nothing else: macro definitions are deleted from the stream,
//! and the argument list of every known declarative call site is tidied so
//! the matcher can assume a normalized shape. All other whitespace flows
//! through untouched.

use crate::registry::MacroRegistry;
use mt_stream::{StreamView, TokenStream};
use mt_token::SourceToken;

/// Returns a new stream with definitions removed and call sites tidied.
#[must_use]
pub fn preprocess(
    registry: &MacroRegistry,
    source: &TokenStream<SourceToken>,
) -> TokenStream<SourceToken> {
    let mut output = TokenStream::new();
    let mut view = source.view();

    while !view.is_at_end() {
        let token = view.pop();

        if token.any_of(&[
            SourceToken::DeclarativeDefinition,
            SourceToken::ProceduralDefinition,
        ]) {
            skip_definition(&mut view);
            continue;
        }

        if token.is(SourceToken::Identifier)
            && registry.is_declarative(&token.lexeme)
            && view.match_sequence(&[SourceToken::Exclamation, SourceToken::LSquare])
        {
            output.push(token);
            output.push(view.peek_at(0));
            output.push(view.peek_at(1));
            view.advance(2);
            tidy_call_site(&mut view, &mut output);
            continue;
        }

        output.push(token);
    }

    output
}

/// Skips a definition: surrounding whitespace, the macro name, and the
/// balanced `{...}` body. Nothing is emitted.
fn skip_definition(view: &mut StreamView<'_, SourceToken>) {
    view.skip(&[
        SourceToken::Space,
        SourceToken::Tab,
        SourceToken::Newline,
        SourceToken::Identifier,
    ]);

    if view.consume(&[SourceToken::LBrace]) {
        let mut depth = 1i32;
        while !view.is_at_end() && depth > 0 {
            match view.peek().kind {
                SourceToken::LBrace => depth += 1,
                SourceToken::RBrace => depth -= 1,
                _ => {}
            }
            view.advance(1);
        }
        view.skip(&[SourceToken::Space, SourceToken::Tab, SourceToken::Newline]);
    }
}

/// Normalizes the argument list of a call site, cursor sitting just inside
/// the opening `[`: runs of spaces collapse to one, spaces before a comma
/// are dropped, and whitespace after a comma is dropped.
fn tidy_call_site(view: &mut StreamView<'_, SourceToken>, target: &mut TokenStream<SourceToken>) {
    view.skip(&[SourceToken::Space, SourceToken::Tab, SourceToken::Newline]);

    let mut depth = 1i32;
    while !view.is_at_end() && depth > 0 {
        let token = view.pop();

        if token.is(SourceToken::Space) {
            while view.peek().is(SourceToken::Space) {
                view.advance(1);
            }
            if !view.peek().is(SourceToken::Comma) {
                target.push(token);
            }
            continue;
        }

        if token.is(SourceToken::Comma) {
            view.skip(&[SourceToken::Space, SourceToken::Tab, SourceToken::Newline]);
            target.push(token);
            continue;
        }

        if token.is(SourceToken::LSquare) {
            depth += 1;
        } else if token.is(SourceToken::RSquare) {
            depth -= 1;
        }
        target.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::MacroTemplate;

    fn registry_with(names: &[&str]) -> MacroRegistry {
        let mut registry = MacroRegistry::new();
        for name in names {
            registry.register_template(MacroTemplate::new(*name, Vec::new()));
        }
        registry
    }

    fn run(registry: &MacroRegistry, source: &str) -> String {
        preprocess(registry, &TokenStream::lex(source)).construct()
    }

    #[test]
    fn test_definitions_are_deleted_with_trailing_whitespace() {
        let registry = registry_with(&[]);
        let out = run(&registry, "defmacten_dec m { () => { x } }\n rest");
        assert_eq!(out, "rest");
    }

    #[test]
    fn test_unknown_source_passes_through_unchanged() {
        let registry = registry_with(&[]);
        let source = "int main() {\n\treturn 0;  \n}\n";
        assert_eq!(run(&registry, source), source);
    }

    #[test]
    fn test_call_site_spaces_collapse() {
        let registry = registry_with(&["f"]);
        assert_eq!(run(&registry, "f![a   b]"), "f![a b]");
    }

    #[test]
    fn test_call_site_comma_spacing_drops() {
        let registry = registry_with(&["f"]);
        assert_eq!(run(&registry, "f![1 , 2 ,  3]"), "f![1,2,3]");
        assert_eq!(run(&registry, "f![1,\n   2]"), "f![1,2]");
    }

    #[test]
    fn test_unknown_call_sites_not_tidied() {
        let registry = registry_with(&[]);
        assert_eq!(run(&registry, "g![1 ,  2]"), "g![1 ,  2]");
    }

    #[test]
    fn test_nested_squares_stay_balanced() {
        let registry = registry_with(&["f"]);
        assert_eq!(run(&registry, "f![a [b] c] tail"), "f![a [b] c] tail");
    }
}
