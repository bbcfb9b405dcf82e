//! Subprocess host for procedural macros
//!
//! Writes the invocation's argument text to the well-known input file,
//! launches the interpreter on the generated driver, waits for it to exit,
//! and reads back the replacement text. The interface to the child is
//! exactly two files and one argv pair; no sandboxing is attempted.

use anyhow::{Context, Result};
use mt_codegen::layout;
use mt_macro::MacroHost;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// The interpreter executable launched on generated drivers.
pub const INTERPRETER: &str = "python3";

/// Bridge failure.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The interpreter exited non-zero.
    #[error("interpreter exited with status {status} for macro '{name}'")]
    NonZeroExit {
        /// Macro being expanded.
        name: String,
        /// Child exit status.
        status: i32,
    },
    /// The child produced no output file.
    #[error("missing interpreter output '{path}'")]
    MissingOutput {
        /// Expected output path.
        path: PathBuf,
    },
}

/// Expands procedural macros by running the generated driver in a
/// subprocess.
#[derive(Debug, Clone)]
pub struct SubprocessHost {
    root: PathBuf,
}

impl SubprocessHost {
    /// A host rooted at the default artifact directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(layout::ROOT)
    }

    /// A host rooted at a specific artifact directory.
    #[must_use]
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The artifact directory this host runs in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for SubprocessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroHost for SubprocessHost {
    fn expand(&self, name: &str, arguments: &str) -> Result<String> {
        let input = self.root.join(layout::TMP_IN);
        std::fs::write(&input, arguments)
            .with_context(|| format!("failed to write argument payload '{}'", input.display()))?;

        let driver = self.root.join(layout::DRIVER_FILE);
        let status = Command::new(INTERPRETER)
            .arg(&driver)
            .arg(name)
            .arg(&input)
            .status()
            .with_context(|| format!("failed to launch {INTERPRETER} on '{}'", driver.display()))?;

        if !status.success() {
            return Err(BridgeError::NonZeroExit {
                name: name.to_owned(),
                status: status.code().unwrap_or(-1),
            }
            .into());
        }

        let output = self.root.join(layout::TMP_OUT);
        std::fs::read_to_string(&output)
            .map_err(|_| BridgeError::MissingOutput { path: output }.into())
    }
}
