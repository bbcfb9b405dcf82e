//! Procedural-macro artifact generation
//!
//! Turns procedural profiles into the Python artifacts the host bridge
//! executes: per-macro parser files, user handler stubs, a driver, and the
//! shared runtime library.

pub mod emitter;
pub mod generate;
pub mod layout;

pub use emitter::CodeEmitter;
pub use generate::{
    generate_driver, generate_handler, generate_parser, write_artifacts, EmitError, RUNTIME,
};
