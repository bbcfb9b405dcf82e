//! The seam between the engine and the procedural-macro runtime
//!
//! The engine hands a procedural call's argument text to a host and splices
//! the returned replacement text into the output. The production host runs
//! the generated interpreter driver in a subprocess; tests substitute an
//! in-process fake. The contract is exactly the argument-text/result-text
//! pair.

use anyhow::Result;

/// Expands procedural macro invocations.
pub trait MacroHost {
    /// Produces the replacement text for one invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot produce a result.
    fn expand(&self, name: &str, arguments: &str) -> Result<String>;
}

/// A host that rejects every procedural invocation. Used when a source
/// declares no procedural macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl MacroHost for NullHost {
    fn expand(&self, name: &str, _arguments: &str) -> Result<String> {
        anyhow::bail!("no procedural macro host is available for '{name}'")
    }
}
