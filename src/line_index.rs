/// Maps byte offsets to 1-based line/column pairs for a single source file.
///
/// Interception keys must carry the exact position the host compiler
/// validates, which is 1-based in both coordinates.
pub struct LineIndex {
    /// Byte offset of the start of each line. line_starts[0] == 0 always.
    line_starts: Vec<u32>,
}

/// 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based line/column.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset as u32;
        // Binary search: find the last line_start <= offset
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(ins) => ins.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        LineCol {
            line: line as u32 + 1,
            column: col + 1,
        }
    }
}
