//! Integration test utilities for the macten pipeline

use anyhow::Result;
use mt_macro::{MacroHost, NullHost};

/// Runs the full pipeline over `source` with no procedural host.
///
/// # Errors
///
/// Returns definition diagnostics or the first expansion failure.
pub fn expand(source: &str) -> Result<String> {
    mt_driver::expand_source(source, &NullHost)
}

/// Runs the full pipeline over `source` with the given procedural host.
///
/// # Errors
///
/// Returns definition diagnostics or the first expansion failure.
pub fn expand_with(source: &str, host: &dyn MacroHost) -> Result<String> {
    mt_driver::expand_source(source, host)
}

/// An in-process stand-in for the subprocess host; replies with a fixed
/// template around the argument text.
pub struct EchoHost;

impl MacroHost for EchoHost {
    fn expand(&self, name: &str, arguments: &str) -> Result<String> {
        Ok(format!("<{name}:{arguments}>"))
    }
}
