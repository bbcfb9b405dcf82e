//! Boundary behavior of matching, binding and body normalization

use integration_tests::expand;

/// An empty parameter list matches only an empty argument list.
#[test]
fn test_empty_parameters_match_only_empty_arguments() {
    let ok = "defmacten_dec n { () => { ok } }\nn![]";
    assert_eq!(expand(ok).unwrap(), "ok ");

    let bad = "defmacten_dec n { () => { ok } }\nn![x]";
    let error = expand(bad).unwrap_err();
    assert!(error.to_string().contains("no branch of macro 'n'"));
}

/// A body that is solely a `$x` reference reproduces the captured argument
/// text, inner whitespace included.
#[test]
fn test_bare_reference_reproduces_argument_text() {
    let source = "defmacten_dec echo { ($x) => { $x } }\necho![(a b)]";
    assert_eq!(expand(source).unwrap(), "a b ");
}

/// Underscore-joined names resolve as a single logical macro name.
#[test]
fn test_underscore_joined_macro_name() {
    let source = "defmacten_dec foo_bar { () => { fb } }\nfoo_bar![]";
    assert_eq!(expand(source).unwrap(), "fb ");
}

/// Body indentation after a newline is stripped up to two whitespace tokens
/// and one trailing newline is trimmed.
#[test]
fn test_body_normalization_in_pipeline() {
    let source = "defmacten_dec block { () => { first\n  second\n} }\nblock![]";
    assert_eq!(expand(source).unwrap(), "first\nsecond");
}

/// Literal branch heads dispatch on lexical equality, numbers included.
#[test]
fn test_numeric_literal_dispatch() {
    let source = "defmacten_dec sel { (0) => { zero } (1) => { one } }\nsel![1] sel![0]";
    assert_eq!(expand(source).unwrap(), "one  zero ");
}

/// Arguments with arbitrary punctuation still bind token by token.
#[test]
fn test_punctuated_grouped_argument() {
    let source = "defmacten_dec stmt { ($e) => { $e; } }\nstmt![(x += 2)]";
    assert_eq!(expand(source).unwrap(), "x += 2; ");
}
