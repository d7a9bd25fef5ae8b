//! Line and column lookup for byte offsets.
//! 字节偏移到行列号的转换。

use std::fmt;

use serde::Serialize;

use crate::BytePos;

/// A 1-based line and column in source text.
///
/// Columns count characters, not bytes, so multi-byte input reports the
/// column a reader would see in an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Precomputed line starts for a piece of source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Number of lines in the source (an empty source has one line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end clamp to the end of the source.
    pub fn position(&self, pos: BytePos) -> Position {
        let offset = usize::from(pos).min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(offset - line_start);
        Position::new(line as u32 + 1, column as u32 + 1)
    }

    /// The text of a 1-based line without its trailing newline.
    pub fn line_text(&self, line: u32) -> Option<&'src str> {
        let index = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        self.source.get(start..end).map(|l| l.trim_end_matches('\r'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        let index = LineIndex::new("abc");
        assert_eq!(index.position(BytePos(0)), Position::new(1, 1));
        assert_eq!(index.position(BytePos(2)), Position::new(1, 3));
    }

    #[test]
    fn test_after_newline() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.position(BytePos(3)), Position::new(2, 1));
        assert_eq!(index.position(BytePos(4)), Position::new(2, 2));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_multibyte_columns() {
        let index = LineIndex::new("λx");
        assert_eq!(index.position(BytePos(2)), Position::new(1, 2));
    }

    #[test]
    fn test_line_text() {
        let index = LineIndex::new("one\r\ntwo");
        assert_eq!(index.line_text(1), Some("one"));
        assert_eq!(index.line_text(2), Some("two"));
        assert_eq!(index.line_text(3), None);
    }
}
