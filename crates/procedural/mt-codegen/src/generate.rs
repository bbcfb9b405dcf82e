//! Python artifact generation for procedural macros
//!
//! For each profile the generator emits one parser file (a class per rule
//! with declaration-ordered alternatives), a handler stub the user is
//! expected to edit, and a single driver that wires every profile to the
//! runtime library.

use crate::emitter::CodeEmitter;
use crate::layout;
use mt_macro::{ProceduralProfile, ProfileRule};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The runtime library shipped with every generated project.
pub const RUNTIME: &str = include_str!("../runtime/macten.py");

/// Artifact emission failure.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Filesystem write failed.
    #[error("failed to write '{path}': {source}")]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Writes every artifact for the given profiles under `root`.
///
/// The runtime is written once, handler stubs only when missing; parser
/// files and the driver are overwritten on every call.
///
/// # Errors
///
/// Returns the first filesystem failure.
pub fn write_artifacts(root: &Path, profiles: &[ProceduralProfile]) -> Result<(), EmitError> {
    fs::create_dir_all(root).map_err(|source| EmitError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let runtime = root.join(layout::RUNTIME_FILE);
    if !runtime.exists() {
        write(&runtime, RUNTIME)?;
    }

    for profile in profiles {
        write(
            &root.join(layout::parser_file(&profile.name)),
            &generate_parser(profile),
        )?;

        let handler = root.join(layout::handler_file(&profile.name));
        if !handler.exists() {
            write(&handler, &generate_handler(&profile.name))?;
        }
    }

    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    write(&root.join(layout::DRIVER_FILE), &generate_driver(&names))
}

fn write(path: &Path, contents: &str) -> Result<(), EmitError> {
    fs::write(path, contents).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Generates the parser file for one profile.
#[must_use]
pub fn generate_parser(profile: &ProceduralProfile) -> String {
    let mut e = CodeEmitter::new();
    e.comment("AUTO GENERATED CODE, DO NOT EDIT");

    e.section("Imports");
    e.writeln("import macten");
    e.writeln(
        "from macten import ListStream, ProceduralMacroContext, ident, number, parse_fn, NodeUtils",
    );
    e.writeln("from typing import Any");
    e.writeln("from dataclasses import dataclass");

    e.section(&format!("Profile: {}", profile.name));
    for (label, rule) in &profile.rules {
        emit_rule(&mut e, profile, label, rule);
        e.blank();
    }

    e.section("Rule Adder");
    e.block("def add_rules():", |e| {
        for label in profile.rules.keys() {
            let class = class_name(&profile.name, label);
            e.writeln(&format!("macten.ctx.add_rule(\"{class}\", {class})"));
        }
        if let Some(entry) = profile.entry_rule() {
            e.writeln(&format!(
                "macten.ctx.add_rule(\"{}\", {})",
                profile.name,
                class_name(&profile.name, entry)
            ));
        }
    });

    e.finish()
}

/// Generates the handler stub for one macro.
#[must_use]
pub fn generate_handler(name: &str) -> String {
    let mut e = CodeEmitter::new();
    e.comment(&format!("USER IMPLEMENTATION - {name} HANDLER"));

    e.section("Imports");
    e.writeln("import macten");
    e.writeln("from macten import NodeUtils");
    e.writeln("from dataclasses import dataclass");
    e.writeln("from typing import Any");

    e.section("Register Handler");
    e.block("def add_handler():", |e| {
        e.writeln(&format!("macten.handler.add(\"{name}\", handle)"));
    });

    e.section("Handler Function");
    e.block("def handle(ast):", |e| {
        e.comment(&format!("TODO: Implementation of \"{name}\" handler"));
        e.writeln("macten.NodeUtils.print(ast)");
    });

    e.finish()
}

/// Generates the driver wiring every profile to the runtime.
#[must_use]
pub fn generate_driver(names: &[&str]) -> String {
    let mut e = CodeEmitter::new();
    e.comment("AUTO GENERATED CODE, DO NOT EDIT");

    e.section("Imports");
    e.writeln("import macten");
    e.writeln("import sys");
    e.writeln("from pathlib import Path");
    e.writeln("from contextlib import redirect_stdout");
    for name in names {
        e.writeln(&format!("import {}", layout::parser_module(name)));
        e.writeln(&format!("import {}", layout::handler_module(name)));
    }

    e.section("Setup");
    e.writeln("macten.init()");
    for name in names {
        e.writeln(&format!("{}.add_rules()", layout::parser_module(name)));
        e.writeln(&format!("{}.add_handler()", layout::handler_module(name)));
    }

    e.section("Execution");
    e.writeln("rule=sys.argv[1]");
    e.writeln("file=sys.argv[2]");
    e.writeln("source=Path(file).read_text()");
    e.writeln("input=macten.ListStream.from_string(source)");
    e.writeln("ast=None");
    e.block(
        &format!("with open('{}/{}','w') as f:", layout::ROOT, layout::TMP_OUT),
        |e| {
            e.block("with redirect_stdout(f):", |e| {
                e.block("while input and not input.empty():", |e| {
                    e.writeln("input,ast=macten.ctx.get_rule(rule).parse(input,ast)");
                    e.block("if ast is None:", |e| {
                        e.writeln(
                            "print(f\"Failed to parse '{file}' using '{rule}' parser rules\")",
                        );
                        e.writeln("break");
                    });
                    e.writeln("macten.handler.get(rule)(ast)");
                });
            });
        },
    );

    e.finish()
}

fn class_name(macro_name: &str, label: &str) -> String {
    format!("{macro_name}_{label}")
}

/// Quotes a symbol as a Python string literal.
fn py_str(symbol: &str) -> String {
    if symbol.contains('"') {
        format!("'{symbol}'")
    } else {
        format!("\"{symbol}\"")
    }
}

fn emit_rule(e: &mut CodeEmitter, profile: &ProceduralProfile, label: &str, rule: &ProfileRule) {
    let name = class_name(&profile.name, label);

    e.writeln("@dataclass");
    e.block(&format!("class {name}:"), |e| {
        e.writeln("_value: Any");
        e.blank();

        // Recursive rules dispatch through the context so the runtime can
        // thread the growing AST back in (left recursion).
        if rule.recursive {
            e.writeln("@staticmethod");
            e.block("def parse(input: ListStream, ast: Any):", |e| {
                e.writeln(&format!("return parse_fn(macten.ctx, \"{name}\")(input, ast)"));
            });
            e.blank();
        }

        let function = if rule.recursive { "_parse" } else { "parse" };
        e.writeln("@staticmethod");
        e.block(&format!("def {function}(input: ListStream, ast: Any):"), |e| {
            e.block("if input.empty():", |e| e.writeln("return None, None"));

            let mut nullable = false;
            for alternative in &rule.alternatives {
                if alternative.is_empty() {
                    nullable = true;
                } else if alternative.len() == 1 {
                    emit_singleton(e, profile, &name, &alternative[0]);
                } else {
                    emit_sequence(e, profile, &name, alternative);
                }
            }

            if nullable {
                e.writeln(&format!("return input, {name}(_value=None)"));
            }
            e.writeln("return None, None");
        });
    });
}

fn emit_singleton(e: &mut CodeEmitter, profile: &ProceduralProfile, name: &str, symbol: &str) {
    e.block("while True:", |e| {
        e.writeln("t_input = input.deepcopy()");
        if profile.rules.contains_key(symbol) {
            let target = class_name(&profile.name, symbol);
            e.block(
                &format!("if (value := ({target}.parse(t_input, ast)))[1]:"),
                |e| e.writeln(&format!("return value[0], {name}(_value=value[1])")),
            );
        } else if symbol == "ident" || symbol == "number" {
            e.block(&format!("if (value := ({symbol}.parse(t_input))):"), |e| {
                e.writeln(&format!("return value[0], {name}(_value=value[1])"));
            });
        } else {
            e.block(
                &format!("if (value := (t_input.pop_if({}))):", py_str(symbol)),
                |e| e.writeln(&format!("return t_input, {name}(_value=value)")),
            );
        }
        e.writeln("break");
    });
}

fn emit_sequence(e: &mut CodeEmitter, profile: &ProceduralProfile, name: &str, symbols: &[String]) {
    let first = symbols[0].as_str();
    let rest = &symbols[1..];

    e.block("while True:", |e| {
        e.writeln("t_input = input.deepcopy()");

        if profile.rules.contains_key(first) {
            let target = class_name(&profile.name, first);
            if target == name {
                e.block(&format!("if isinstance(ast, {name}):"), |e| {
                    e.writeln(&format!("value = {{{}: ast}}", py_str(first)));
                    emit_sequence_tail(e, profile, name, rest);
                });
            } else {
                e.block(
                    &format!("if (value := ({target}.parse(t_input, ast)))[1]:"),
                    |e| {
                        e.writeln("t_input, ast = value");
                        e.writeln(&format!("value = {{{}: ast}}", py_str(first)));
                        emit_sequence_tail(e, profile, name, rest);
                    },
                );
            }
        } else if first == "ident" || first == "number" {
            e.block(&format!("if (tmp := ({first}.parse(t_input))):"), |e| {
                e.writeln("t_input, ast = tmp");
                e.writeln(&format!("value = {{{}: ast}}", py_str(first)));
                emit_sequence_tail(e, profile, name, rest);
            });
        } else {
            e.block(&format!("if t_input.pop_if({}):", py_str(first)), |e| {
                e.writeln("value = {}");
                emit_sequence_tail(e, profile, name, rest);
            });
        }

        e.writeln("break");
    });
}

fn emit_sequence_tail(
    e: &mut CodeEmitter,
    profile: &ProceduralProfile,
    name: &str,
    symbols: &[String],
) {
    for symbol in symbols {
        let symbol = symbol.as_str();
        if profile.rules.contains_key(symbol) {
            let target = class_name(&profile.name, symbol);
            e.block(
                &format!("if (tmp := ({target}.parse(t_input, ast)))[1]:"),
                |e| e.writeln(&format!("t_input, value[{}] = tmp", py_str(symbol))),
            );
            e.block("else:", |e| e.writeln("break"));
        } else if symbol == "ident" || symbol == "number" {
            e.block(&format!("if (tmp := ({symbol}.parse(t_input))):"), |e| {
                e.writeln(&format!("t_input, value[{}] = tmp", py_str(symbol)));
            });
            e.block("else:", |e| e.writeln("break"));
        } else {
            e.block(&format!("if not t_input.pop_if({}):", py_str(symbol)), |e| {
                e.writeln("break");
            });
        }
    }
    e.writeln(&format!("return t_input, {name}(_value=value)"));
}
