use std::path::{Path, PathBuf};

use log::debug;
use parking_lot::Mutex;

use crate::editing::{address, Document, Value};
use crate::error::{BufferError, Result};
use crate::io::{self, durable::DurableWriter};

struct State {
    doc: Document,
    last_path: Option<PathBuf>,
}

/// Monitor over a [`Document`]: one mutex per buffer instance
/// serializes every operation against concurrent external callers.
///
/// The lock is not reentrant and does not need to be: public methods
/// only ever call the lock-free primitives on the inner [`Document`]
/// (and the pure [`address`] functions), never each other. Operations
/// observed from multiple threads are linearized by the lock; there is
/// no ordering guarantee across two different instances.
///
/// Callers receive snapshots, never references into the live document.
/// Persistence resolves its target and takes the text snapshot under
/// the lock, then releases it before touching the filesystem, so disk
/// IO never blocks other readers.
pub struct LineBuffer {
    state: Mutex<State>,
}

impl LineBuffer {
    pub fn new() -> Self {
        LineBuffer::from_document(Document::new())
    }

    pub fn from_text(text: &str) -> Self {
        LineBuffer::from_document(Document::from_text(text))
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        LineBuffer::from_document(Document::from_lines(lines))
    }

    /// Open `path` into a fresh buffer and record it as the last
    /// persisted path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let buffer = LineBuffer::new();
        buffer.load(path)?;
        Ok(buffer)
    }

    fn from_document(doc: Document) -> Self {
        LineBuffer {
            state: Mutex::new(State {
                doc,
                last_path: None,
            }),
        }
    }

    // ---- reads ----

    pub fn line_count(&self) -> usize {
        self.state.lock().doc.line_count()
    }

    pub fn len(&self) -> usize {
        self.state.lock().doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().doc.is_empty()
    }

    pub fn line_at(&self, line: usize) -> Result<String> {
        Ok(self.state.lock().doc.line_at(line)?.to_owned())
    }

    pub fn lines(&self) -> Vec<String> {
        self.state.lock().doc.to_lines()
    }

    pub fn raw_text(&self) -> String {
        self.state.lock().doc.raw_text()
    }

    pub fn render(&self, formatted: bool, begin: i64, end: i64) -> Result<String> {
        self.state.lock().doc.render(formatted, begin, end)
    }

    /// Independent copy of the document; later edits to the buffer do
    /// not show through.
    pub fn snapshot(&self) -> Document {
        self.state.lock().doc.clone()
    }

    /// Target of the last successful load or persist, if any.
    pub fn last_path(&self) -> Option<PathBuf> {
        self.state.lock().last_path.clone()
    }

    // ---- address translation ----

    pub fn char_at(&self, offset: usize) -> Result<char> {
        address::char_at(&self.state.lock().doc, offset)
    }

    pub fn char_at_grid(&self, line: usize, col: usize) -> Result<char> {
        address::char_at_grid(&self.state.lock().doc, line, col)
    }

    pub fn grid_from_offset(&self, offset: usize) -> Result<(usize, usize)> {
        address::grid_from_offset(&self.state.lock().doc, offset)
    }

    // ---- search and slicing ----

    pub fn search(&self, needle: &str) -> Option<(usize, usize)> {
        self.state.lock().doc.search(needle)
    }

    pub fn search_from(&self, needle: &str, after_line: usize) -> Option<(usize, usize)> {
        self.state.lock().doc.search_from(needle, after_line)
    }

    pub fn search_all(
        &self,
        needle: &str,
        after_line: usize,
        limit: Option<usize>,
    ) -> Vec<(usize, usize)> {
        self.state.lock().doc.search_all(needle, after_line, limit)
    }

    pub fn index_of(&self, needle: &str) -> Option<usize> {
        self.state.lock().doc.index_of(needle)
    }

    pub fn index_of_from(&self, needle: &str, from: usize) -> Option<usize> {
        self.state.lock().doc.index_of_from(needle, from)
    }

    pub fn split(&self, delimiter: &str) -> Vec<String> {
        self.state.lock().doc.split(delimiter)
    }

    pub fn substring(&self, pos: usize) -> Result<String> {
        self.state.lock().doc.substring(pos)
    }

    pub fn substring_range(&self, pos: usize, end: usize) -> Result<String> {
        self.state.lock().doc.substring_range(pos, end)
    }

    // ---- edits ----

    pub fn set_text(&self, text: &str) {
        self.state.lock().doc.set_text(text);
    }

    pub fn set_lines(&self, lines: Vec<String>) {
        self.state.lock().doc.set_lines(lines);
    }

    pub fn append_at_end(&self, text: &str) {
        self.state.lock().doc.append_at_end(text);
    }

    pub fn insert_at_line(&self, line: usize, text: &str) -> Result<()> {
        self.state.lock().doc.insert_at_line(line, text)
    }

    pub fn append_at_line(&self, line: usize, text: &str) -> Result<()> {
        self.state.lock().doc.append_at_line(line, text)
    }

    pub fn edit_line(&self, line: usize, text: &str) -> Result<()> {
        self.state.lock().doc.edit_line(line, text)
    }

    pub fn edit_char(&self, offset: usize, ch: char) -> Result<()> {
        self.state.lock().doc.edit_char(offset, ch)
    }

    pub fn delete_at_line(&self, line: usize) -> Result<()> {
        self.state.lock().doc.delete_at_line(line)
    }

    pub fn delete_range(&self, begin: usize, end: usize) -> Result<()> {
        self.state.lock().doc.delete_range(begin, end)
    }

    pub fn delete_char_at(&self, offset: usize) -> Result<()> {
        self.state.lock().doc.delete_char_at(offset)
    }

    pub fn clear(&self) {
        self.state.lock().doc.clear();
    }

    pub fn reverse(&self) {
        self.state.lock().doc.reverse();
    }

    pub fn append(&self, value: impl Into<Value>) {
        self.state.lock().doc.append(value);
    }

    pub fn insert(&self, position: usize, value: impl Into<Value>) -> Result<()> {
        self.state.lock().doc.insert(position, value)
    }

    /// Replace this buffer's content with a copy of `other`'s.
    pub fn set_instance(&self, other: &LineBuffer) {
        if std::ptr::eq(self, other) {
            return;
        }
        let doc = other.snapshot();
        self.state.lock().doc = doc;
    }

    /// Exchange document content with `other`. Last persisted paths
    /// stay with their buffers. Locks are taken in address order so two
    /// concurrent swaps cannot deadlock.
    pub fn swap(&self, other: &LineBuffer) {
        if std::ptr::eq(self, other) {
            return;
        }
        let (first, second) = if (self as *const LineBuffer) < (other as *const LineBuffer) {
            (self, other)
        } else {
            (other, self)
        };
        let mut a = first.state.lock();
        let mut b = second.state.lock();
        std::mem::swap(&mut a.doc, &mut b.doc);
    }

    // ---- persistence ----

    /// Read `path` byte-exact and replace the buffer content. A blank
    /// `path` falls back to the last persisted path.
    pub fn load(&self, path: &Path) -> Result<PathBuf> {
        let target = {
            let state = self.state.lock();
            resolve_target(path, &state.last_path)?
        };
        let content = io::read_file(&target)?;
        let mut state = self.state.lock();
        state.doc.set_text(&content);
        state.last_path = Some(target.clone());
        Ok(target)
    }

    /// Write the flat text to `path` directly, with no durability
    /// protocol. A blank `path` falls back to the last persisted path.
    pub fn persist(&self, path: &Path) -> Result<PathBuf> {
        let (target, text) = self.snapshot_for_write(path)?;
        io::write_file(&target, &text)?;
        self.state.lock().last_path = Some(target.clone());
        Ok(target)
    }

    /// Write the flat text to `path` through the default
    /// [`DurableWriter`] (temp file, atomic rename, verified-copy
    /// fallback).
    pub fn persist_durable(&self, path: &Path) -> Result<PathBuf> {
        self.persist_durable_with(&DurableWriter::default(), path)
    }

    /// Like [`persist_durable`](Self::persist_durable) with a caller
    /// supplied writer, e.g. one carrying extra fingerprint providers.
    pub fn persist_durable_with(&self, writer: &DurableWriter, path: &Path) -> Result<PathBuf> {
        let (target, text) = self.snapshot_for_write(path)?;
        writer.write(&target, text.as_bytes())?;
        debug!(
            "durably wrote {} bytes to '{}'",
            text.len(),
            target.display()
        );
        self.state.lock().last_path = Some(target.clone());
        Ok(target)
    }

    /// Resolve the write target and snapshot the flat text under the
    /// lock, so the file IO that follows runs without holding it.
    fn snapshot_for_write(&self, path: &Path) -> Result<(PathBuf, String)> {
        let state = self.state.lock();
        let target = resolve_target(path, &state.last_path)?;
        Ok((target, state.doc.raw_text()))
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        LineBuffer::new()
    }
}

impl Clone for LineBuffer {
    fn clone(&self) -> Self {
        let state = self.state.lock();
        LineBuffer {
            state: Mutex::new(State {
                doc: state.doc.clone(),
                last_path: state.last_path.clone(),
            }),
        }
    }
}

fn resolve_target(path: &Path, last_path: &Option<PathBuf>) -> Result<PathBuf> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        last_path.clone().ok_or(BufferError::PathNotSet)
    } else {
        Ok(path.to_path_buf())
    }
}
