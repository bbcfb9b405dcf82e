//! Name-to-macro registries
//!
//! Both registries are populated once during the definition pass and are
//! read-only for the rest of the run; the expander takes them by shared
//! borrow.

use crate::template::MacroTemplate;
use rustc_hash::{FxHashMap, FxHashSet};

/// Dispatch tag for a call site.
#[derive(Debug)]
pub enum MacroKind<'a> {
    /// A declarative macro with its template.
    Declarative(&'a MacroTemplate),
    /// A procedural macro, expanded through the host bridge.
    Procedural,
}

/// Every macro known to one engine run.
#[derive(Debug, Default)]
pub struct MacroRegistry {
    declarative: FxHashMap<String, MacroTemplate>,
    procedural: FxHashSet<String>,
}

impl MacroRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declarative template under its name.
    pub fn register_template(&mut self, template: MacroTemplate) {
        self.declarative.insert(template.name().to_owned(), template);
    }

    /// Registers a procedural macro name.
    pub fn register_procedural(&mut self, name: impl Into<String>) {
        self.procedural.insert(name.into());
    }

    /// Whether a declarative macro with this name exists.
    #[must_use]
    pub fn is_declarative(&self, name: &str) -> bool {
        self.declarative.contains_key(name)
    }

    /// Whether a procedural macro with this name exists.
    #[must_use]
    pub fn is_procedural(&self, name: &str) -> bool {
        self.procedural.contains(name)
    }

    /// The declarative template registered under `name`.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&MacroTemplate> {
        self.declarative.get(name)
    }

    /// Dispatch lookup for a call site. Declarative macros shadow procedural
    /// ones of the same name.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<MacroKind<'_>> {
        if let Some(template) = self.declarative.get(name) {
            return Some(MacroKind::Declarative(template));
        }
        if self.procedural.contains(name) {
            return Some(MacroKind::Procedural);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_shadowing() {
        let mut registry = MacroRegistry::new();
        registry.register_template(MacroTemplate::new("m", Vec::new()));
        registry.register_procedural("p");
        registry.register_procedural("m");

        assert!(matches!(registry.kind("m"), Some(MacroKind::Declarative(_))));
        assert!(matches!(registry.kind("p"), Some(MacroKind::Procedural)));
        assert!(registry.kind("q").is_none());
    }
}
