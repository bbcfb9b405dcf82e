//! A small line-oriented code writer for the generated Python

/// Accumulates generated code with four-space indentation levels.
#[derive(Debug, Default)]
pub struct CodeEmitter {
    code: String,
    indent: usize,
}

impl CodeEmitter {
    /// Creates an empty emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one indented line.
    pub fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.code.push_str("    ");
        }
        self.code.push_str(line);
        self.code.push('\n');
    }

    /// Writes an indented `# ...` comment line.
    pub fn comment(&mut self, message: &str) {
        self.writeln(&format!("# {message}"));
    }

    /// Writes a blank line.
    pub fn blank(&mut self) {
        self.code.push('\n');
    }

    /// Writes a boxed section banner.
    pub fn section(&mut self, name: &str) {
        let line = format!("#{}#", "=".repeat(name.len() + 2));
        self.blank();
        self.writeln(&line);
        self.comment(&format!("{name} #"));
        self.writeln(&line);
        self.blank();
    }

    /// Writes `header`, then runs `body` one indentation level deeper.
    pub fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) {
        self.writeln(header);
        self.indent += 1;
        body(self);
        self.indent -= 1;
    }

    /// Consumes the emitter, returning the generated code.
    #[must_use]
    pub fn finish(self) -> String {
        self.code
    }
}
