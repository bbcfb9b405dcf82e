//! Procedural macro profiles
//!
//! A profile is the in-memory form of one `defmacten_proc` definition: a
//! macro name plus its named rules in declaration order. The entry rule is
//! the last rule declared.

use indexmap::IndexMap;

/// A named alternation of alternatives.
#[derive(Debug, Clone, Default)]
pub struct ProfileRule {
    /// Each alternative is a symbol list: literal lexemes, rule references,
    /// or the lexical classes `ident`/`number`.
    pub alternatives: Vec<Vec<String>>,
    /// Whether one of the alternatives references the rule itself.
    pub recursive: bool,
}

/// One procedural macro's grammar.
#[derive(Debug, Clone)]
pub struct ProceduralProfile {
    /// Macro name.
    pub name: String,
    /// Rules, in declaration order.
    pub rules: IndexMap<String, ProfileRule>,
}

impl ProceduralProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: IndexMap::new(),
        }
    }

    /// Adds a rule. A rule re-declared under the same label replaces the
    /// earlier one.
    pub fn add_rule(&mut self, label: impl Into<String>, rule: ProfileRule) {
        let label = label.into();
        // Re-insert so a replacement also becomes the latest declaration.
        self.rules.shift_remove(&label);
        self.rules.insert(label, rule);
    }

    /// The profile's entry rule: the last rule declared.
    #[must_use]
    pub fn entry_rule(&self) -> Option<&str> {
        self.rules.keys().last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_rule_is_last_declared() {
        let mut profile = ProceduralProfile::new("switch");
        profile.add_rule("case_name", ProfileRule::default());
        profile.add_rule("branch", ProfileRule::default());
        profile.add_rule("switch_str", ProfileRule::default());
        assert_eq!(profile.entry_rule(), Some("switch_str"));

        profile.add_rule("branch", ProfileRule::default());
        assert_eq!(profile.entry_rule(), Some("branch"));
    }
}
