//! Fixed layout of generated artifacts
//!
//! Everything lives under `./.macten/`; the names below are a fixed
//! agreement between the generator, the host bridge, and the generated
//! driver.

/// Directory holding every generated artifact.
pub const ROOT: &str = ".macten";

/// Runtime library, written once and never overwritten.
pub const RUNTIME_FILE: &str = "macten.py";

/// Driver script, regenerated on every generate.
pub const DRIVER_FILE: &str = "driver.py";

/// Argument payload written by the bridge before spawning.
pub const TMP_IN: &str = "tmp.in";

/// Subprocess result read by the bridge after the child exits.
pub const TMP_OUT: &str = "tmp.in.out";

/// Parser artifact for one procedural macro; overwritten on every generate.
#[must_use]
pub fn parser_file(name: &str) -> String {
    format!("{name}_parser.py")
}

/// Handler stub for one procedural macro; written only when missing.
#[must_use]
pub fn handler_file(name: &str) -> String {
    format!("{name}_handler.py")
}

/// Module name (import target) of a parser artifact.
#[must_use]
pub fn parser_module(name: &str) -> String {
    format!("{name}_parser")
}

/// Module name (import target) of a handler artifact.
#[must_use]
pub fn handler_module(name: &str) -> String {
    format!("{name}_handler")
}
