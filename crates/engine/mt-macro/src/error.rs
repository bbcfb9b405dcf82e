//! Macro expansion error types

use thiserror::Error;

/// Error type for macro expansion.
#[derive(Debug, Error)]
pub enum ExpandError {
    /// No macro with the given name is registered.
    #[error("undefined macro: '{name}'")]
    UndefinedMacro {
        /// Macro name
        name: String,
    },

    /// No branch of the macro matched the call arguments.
    #[error("no branch of macro '{name}' matches the call arguments")]
    MatchFailure {
        /// Macro name
        name: String,
    },

    /// A branch matched but its arguments could not be bound.
    #[error("failed to create argument mapping for macro '{name}'")]
    ArgumentMapping {
        /// Macro name
        name: String,
    },

    /// Bound argument count does not equal the declared parameter count.
    #[error("arity mismatch in macro '{name}': expected {expected} arguments, found {found}")]
    ArityMismatch {
        /// Macro name
        name: String,
        /// Declared argument count
        expected: usize,
        /// Bound argument count
        found: usize,
    },

    /// A `$name` reference has no corresponding argument.
    #[error("unbound substitution '${name}' in macro body")]
    Substitution {
        /// Referenced argument name
        name: String,
    },

    /// A detected call site is missing its argument brackets.
    #[error("malformed call site for macro '{name}'")]
    MalformedCall {
        /// Macro name
        name: String,
    },

    /// Expansion recursed past the configured cap.
    #[error("macro recursion limit ({limit}) exceeded")]
    RecursionLimit {
        /// Configured recursion cap
        limit: usize,
    },

    /// The procedural macro host failed.
    #[error("procedural macro '{name}' failed: {message}")]
    Host {
        /// Macro name
        name: String,
        /// Host failure description
        message: String,
    },
}
