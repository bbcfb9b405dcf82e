//! End-to-end expansion scenarios over the full pipeline

use integration_tests::expand;

#[test]
fn test_parameterless_replacement() {
    let source = "defmacten_dec greet { () => { hi } }\n greet![]";
    assert_eq!(expand(source).unwrap(), "hi ");
}

#[test]
fn test_single_argument() {
    let source = "defmacten_dec shout { ($x) => { say $x } }\n shout![world]";
    assert_eq!(expand(source).unwrap(), "say world ");
}

#[test]
fn test_multi_branch_dispatch_first_match_wins() {
    let source = "defmacten_dec f { (a) => { A } (b) => { B } }\n f![a] f![b]";
    assert_eq!(expand(source).unwrap(), "A  B ");
}

#[test]
fn test_grouped_argument_is_one_value() {
    let source = "defmacten_dec wrap { ($e) => { [ $e ] } }\n wrap![(1 + 2)]";
    assert_eq!(expand(source).unwrap(), "[ 1 + 2 ] ");
}

#[test]
fn test_variadic_expansion_repeats_template() {
    let source = "defmacten_dec list { ($( $x ),* ) => { $x ; } }\n list![1, 2, 3]";
    assert_eq!(expand(source).unwrap(), "1 ; 2 ; 3 ; ");
}

#[test]
fn test_nested_declarative_call_in_body() {
    let source = "defmacten_dec inner { () => { X } }\n defmacten_dec outer { () => { [ inner![] ] } }\n outer![]";
    assert_eq!(expand(source).unwrap(), "[ X  ] ");
}

#[test]
fn test_body_text_around_call_sites_is_kept() {
    let source = "defmacten_dec two { () => { 2 } }\nbefore two![] after\n";
    assert_eq!(expand(source).unwrap(), "before 2  after\n");
}

#[test]
fn test_multiple_calls_across_lines() {
    let source = "defmacten_dec inc { ($x) => { $x + 1 } }\na = inc![1]\nb = inc![2]\n";
    assert_eq!(expand(source).unwrap(), "a = 1 + 1 \nb = 2 + 1 \n");
}

#[test]
fn test_macro_inside_grouped_argument_expands() {
    let source = "defmacten_dec one { () => { 1 } }\ndefmacten_dec wrap { ($x) => { ($x) } }\nwrap![(one![])]";
    assert_eq!(expand(source).unwrap(), "(1 ) ");
}

#[test]
fn test_variadic_with_grouped_elements() {
    let source = "defmacten_dec each { ($( $x ),* ) => { <$x> } }\neach![(a b), c]";
    assert_eq!(expand(source).unwrap(), "<a b> <c> ");
}
