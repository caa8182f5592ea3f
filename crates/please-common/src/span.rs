use std::ops::Range;

use serde::Serialize;

/// Half-open byte range `start..end` into a BUILD file.
///
/// Lexer and parser only ever hand out byte offsets. Line/column pairs are
/// computed on demand through [`LineIndex`] when a diagnostic is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span {start}..{end} is reversed");
        Self { start, end }
    }

    /// Zero width, as used by synthetic block tokens and EOF.
    pub fn empty_at(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// For slicing the source text.
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Offsets of line starts, for turning byte offsets into positions.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, the same set of terminators
/// the lexer recognises.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Always starts with 0.
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let line_starts = std::iter::once(0)
            .chain(bytes.iter().enumerate().filter_map(|(i, &b)| {
                let ends_line = b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n'));
                ends_line.then_some((i + 1) as u32)
            }))
            .collect();
        Self {
            line_starts,
            len: source.len() as u32,
        }
    }

    /// 1-based `(line, column)` of `offset`. The column counts bytes, and a
    /// line terminator belongs to the line it ends. Offsets past the end are
    /// clamped to the end.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line] + 1;
        (line as u32 + 1, col)
    }
}
