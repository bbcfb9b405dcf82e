//! The macten macro engine
//!
//! Declarative pattern matching, template application, procedural profiles,
//! the preprocessor, and the recursive expander. The engine rewrites a
//! source-agnostic token stream; host-language specifics live entirely in
//! the declared vocabularies.

pub mod error;
pub mod expand;
pub mod host;
pub mod pattern;
pub mod preprocess;
pub mod profile;
pub mod registry;
pub mod template;

pub use error::ExpandError;
pub use expand::{is_macro_call, Expander, DEFAULT_RECURSION_LIMIT};
pub use host::{MacroHost, NullHost};
pub use pattern::{ArgumentMap, ParameterPattern, PatternElement, PatternMode};
pub use preprocess::preprocess;
pub use profile::{ProceduralProfile, ProfileRule};
pub use registry::{MacroKind, MacroRegistry};
pub use template::{MacroBranch, MacroTemplate};
