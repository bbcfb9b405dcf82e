//! Procedural dispatch through the host seam

use integration_tests::{expand_with, EchoHost};
use mt_macro::MacroHost;

#[test]
fn test_procedural_invocation_routes_to_host() {
    let source = "gen![a b c]\ndefmacten_proc gen { r { ident } }\n";
    let output = expand_with(source, &EchoHost).unwrap();
    assert_eq!(output, "<gen:a b c>\n");
}

#[test]
fn test_procedural_output_reindented_at_call_site() {
    struct MultiLineHost;
    impl MacroHost for MultiLineHost {
        fn expand(&self, _name: &str, arguments: &str) -> anyhow::Result<String> {
            Ok(format!("first({arguments})\nsecond"))
        }
    }

    let source = "    gen![x]\ndefmacten_proc gen { r { ident } }\n";
    let output = expand_with(source, &MultiLineHost).unwrap();
    assert_eq!(output, "    first(x)\n    second\n");
}

#[test]
fn test_host_failure_aborts_expansion() {
    struct FailingHost;
    impl MacroHost for FailingHost {
        fn expand(&self, _name: &str, _arguments: &str) -> anyhow::Result<String> {
            anyhow::bail!("interpreter unavailable")
        }
    }

    let source = "gen![x]\ndefmacten_proc gen { r { ident } }\n";
    let error = expand_with(source, &FailingHost).unwrap_err();
    assert!(error.to_string().contains("procedural macro 'gen' failed"));
}

#[test]
fn test_declarative_and_procedural_side_by_side() {
    let source = "defmacten_dec d { () => { D } }\nd![] gen![q]\ndefmacten_proc gen { r { ident } }\n";
    let output = expand_with(source, &EchoHost).unwrap();
    assert_eq!(output, "D  <gen:q>\n");
}
