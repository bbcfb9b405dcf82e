//! Pipeline orchestration
//!
//! High-level entry points gluing the engine crates together: definition
//! parsing, registry construction, preprocessing, expansion, and procedural
//! artifact generation. The output file is written only when the whole
//! pipeline succeeds.

use anyhow::{Context, Result};
use mt_bridge::SubprocessHost;
use mt_codegen::layout;
use mt_macro::{preprocess, Expander, MacroHost, MacroRegistry};
use mt_parse::Definitions;
use mt_stream::TokenStream;
use mt_token::SourceToken;
use std::path::{Path, PathBuf};

/// Expands every macro in `source`, dispatching procedural invocations to
/// `host`, and returns the rewritten text.
///
/// # Errors
///
/// Returns definition diagnostics or the first expansion failure.
pub fn expand_source(source: &str, host: &dyn MacroHost) -> Result<String> {
    let definitions = mt_parse::parse(source)?;
    let registry = build_registry(&definitions);

    let stream = TokenStream::<SourceToken>::lex(source);
    let stream = preprocess(&registry, &stream);

    let mut output = TokenStream::new();
    let mut view = stream.view();
    Expander::new(&registry, host).expand_view(&mut output, &mut view)?;
    Ok(output.construct())
}

/// Runs the full pipeline on the file at `path`; the expansion is written to
/// `dest`, or to `<stem>.macten<ext>` next to the source. Returns the output
/// path.
///
/// # Errors
///
/// Returns an error on unreadable input, malformed definitions, expansion
/// failure, or an unwritable destination.
pub fn run(path: &Path, dest: Option<&Path>) -> Result<PathBuf> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;

    let host = SubprocessHost::new();
    let output = expand_source(&source, &host)?;

    let dest = dest.map_or_else(|| default_output_path(path), Path::to_path_buf);
    std::fs::write(&dest, output)
        .with_context(|| format!("failed to write '{}'", dest.display()))?;
    Ok(dest)
}

/// Parses the definitions in `path` and emits parser, handler, driver and
/// runtime artifacts for every procedural macro. Returns how many profiles
/// were generated.
///
/// # Errors
///
/// Returns an error on unreadable input, malformed definitions, or artifact
/// write failure.
pub fn generate(path: &Path) -> Result<usize> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;

    let definitions = mt_parse::parse(&source)?;
    if definitions.profiles.is_empty() {
        return Ok(0);
    }

    mt_codegen::write_artifacts(Path::new(layout::ROOT), &definitions.profiles)?;
    Ok(definitions.profiles.len())
}

/// Recursively deletes the artifact directory. Missing is not an error.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be removed.
pub fn clean() -> Result<()> {
    match std::fs::remove_dir_all(layout::ROOT) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => {
            Err(error).with_context(|| format!("failed to remove '{}'", layout::ROOT))
        }
    }
}

/// The default output path: `<stem>.macten<ext>` next to the source.
#[must_use]
pub fn default_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("out");
    let name = match source.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}.macten.{ext}"),
        None => format!("{stem}.macten"),
    };
    source.with_file_name(name)
}

fn build_registry(definitions: &Definitions) -> MacroRegistry {
    let mut registry = MacroRegistry::new();
    for template in &definitions.templates {
        registry.register_template(template.clone());
    }
    for profile in &definitions.profiles {
        registry.register_procedural(profile.name.clone());
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt_macro::NullHost;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("dir/switch.cpp")),
            Path::new("dir/switch.macten.cpp")
        );
        assert_eq!(
            default_output_path(Path::new("script")),
            Path::new("script.macten")
        );
    }

    #[test]
    fn test_expand_source_end_to_end() {
        let source = "defmacten_dec shout { ($x) => { say $x } }\nshout![world]";
        let output = expand_source(source, &NullHost).unwrap();
        assert_eq!(output, "say world ");
    }

    #[test]
    fn test_run_writes_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.txt");
        std::fs::write(&input, "defmacten_dec hi { () => { hello } }\nhi![]").unwrap();

        let output_path = run(&input, None).unwrap();
        assert_eq!(output_path, dir.path().join("demo.macten.txt"));
        assert_eq!(std::fs::read_to_string(output_path).unwrap(), "hello ");
    }

    #[test]
    fn test_run_fails_on_malformed_definition() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.txt");
        std::fs::write(&input, "defmacten_dec { () => { x } }").unwrap();
        assert!(run(&input, None).is_err());
        // No partial output is committed.
        assert!(!dir.path().join("bad.macten.txt").exists());
    }
}
