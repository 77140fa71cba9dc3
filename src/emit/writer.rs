/// Indented source-text builder for the generated host-language units.
/// Four-space indents, Allman braces, one trailing newline. Emission goes
/// through this one type so repeated runs are byte-identical.
pub struct SourceWriter {
    buf: String,
    indent: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self { buf: String::new(), indent: 0 }
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Open an Allman-style block: the header line, then `{`.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.line("{");
        self.indent += 1;
    }

    pub fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new()
    }
}
