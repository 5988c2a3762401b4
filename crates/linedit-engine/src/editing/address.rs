//! Pure translation between flat char offsets and (line, column) grid
//! addresses over a [`Document`]. Stateless: every function is a plain
//! function of the document content.

use crate::editing::Document;
use crate::error::{BufferError, Result};

/// The char at 1-based flat offset `offset` into the flat text.
pub fn char_at(doc: &Document, offset: usize) -> Result<char> {
    let len = doc.len();
    if offset < 1 || offset > len {
        return Err(BufferError::out_of_range("offset", offset, len));
    }
    doc.raw_text()
        .chars()
        .nth(offset - 1)
        .ok_or_else(|| BufferError::out_of_range("offset", offset, len))
}

/// The char at a 1-based (line, column) grid address.
///
/// Every line except the last has an implicit trailing `\n` addressable
/// at `col == line_len + 1`.
pub fn char_at_grid(doc: &Document, line: usize, col: usize) -> Result<char> {
    let mut text = doc.line_at(line)?.to_owned();
    if line < doc.line_count() {
        text.push('\n');
    }
    let limit = text.chars().count();
    if col < 1 || col > limit {
        return Err(BufferError::out_of_range("column", col, limit));
    }
    text.chars()
        .nth(col - 1)
        .ok_or_else(|| BufferError::out_of_range("column", col, limit))
}

/// Map a 1-based flat offset to its 1-based (line, column) address by
/// counting newlines up to the offset. The char immediately after a
/// `\n` is column 1 of the next line.
///
/// Linear in the offset; a precomputed line-start index could answer in
/// O(log n) but must then match this scan exactly at every offset,
/// including at line boundaries.
pub fn grid_from_offset(doc: &Document, offset: usize) -> Result<(usize, usize)> {
    let len = doc.len();
    if offset < 1 || offset > len {
        return Err(BufferError::out_of_range("offset", offset, len));
    }
    let mut line = 1;
    let mut col = 1;
    for c in doc.raw_text().chars().take(offset - 1) {
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    Ok((line, col))
}
