//! Line-number to byte-range conversion.

use crate::error::Error;
use crate::types::SourceRange;

/// Start offsets of every line in a source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts; always has at least one entry.
    starts: Vec<u32>,
    /// Byte offset of each line's terminator (or end of text for the last line).
    ends: Vec<u32>,
}

impl LineIndex {
    /// Index the lines of `source`. Both `\n` and `\r\n` terminate a line.
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0_u32];
        let mut ends = Vec::new();
        let bytes = source.as_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            if *byte != b'\n' {
                continue;
            }
            let newline = u32::try_from(i).unwrap_or(u32::MAX);
            let is_crlf = i > 0 && bytes.get(i.saturating_sub(1)) == Some(&b'\r');
            ends.push(if is_crlf { newline.saturating_sub(1) } else { newline });
            starts.push(newline.saturating_add(1));
        }
        ends.push(u32::try_from(bytes.len()).unwrap_or(u32::MAX));
        return Self { starts, ends };
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        return self.starts.len();
    }

    /// One-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> i64 {
        let idx = self.starts.partition_point(|start| return *start <= offset);
        return i64::try_from(idx).unwrap_or(i64::MAX);
    }

    /// Byte range of a one-based line, excluding its terminator.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedInput` if the line is outside the file.
    pub fn line_range(&self, line: i64) -> Result<SourceRange, Error> {
        let idx = usize::try_from(line)
            .ok()
            .and_then(|l| return l.checked_sub(1))
            .ok_or_else(|| return out_of_bounds(line, self.line_count()))?;
        let (Some(start), Some(end)) = (self.starts.get(idx), self.ends.get(idx)) else {
            return Err(out_of_bounds(line, self.line_count()));
        };
        return Ok(SourceRange::from_bounds(*start, *end));
    }
}

/// Error for a line outside `1..=count`.
fn out_of_bounds(line: i64, count: usize) -> Error {
    return Error::MalformedInput {
        reason: format!("line {line} is outside 1..={count}"),
    };
}
