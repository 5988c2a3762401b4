use crate::error::{BufferError, Result};

/// In-memory document: an ordered sequence of lines.
///
/// `Document` is the authoritative text store and the lock-free inner
/// layer of the engine. Lines never contain an embedded `\n`; the
/// canonical flat-text form is the lines joined by single newlines with
/// no trailing terminator. An empty document is a zero-length sequence
/// of lines, not a sequence containing one empty line.
///
/// Addressing conventions, applied consistently per operation family:
///
/// - **Lines** are 1-based everywhere (`line 1` is the first line).
/// - The **char read/edit family** ([`edit_char`](Self::edit_char), and
///   the translation functions in [`address`](crate::editing::address))
///   takes 1-based flat char offsets in `[1, len]`.
/// - The **string manipulation family** ([`insert`](Self::insert),
///   [`delete_range`](Self::delete_range),
///   [`delete_char_at`](Self::delete_char_at), plus the search and
///   slicing operations) takes 0-based char offsets, with half-open
///   ranges.
///
/// Offsets count chars, not bytes. Every mutating operation either
/// moves the document to a new valid state or fails leaving the prior
/// state intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

/// Split text into lines the way the document stores them: `\n` is the
/// only separator (a trailing `\r` stays part of its line), a final
/// `\n` yields no empty last line, and empty text yields no lines.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn from_text(text: &str) -> Self {
        Document {
            lines: split_lines(text),
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        // Re-split so embedded newlines cannot corrupt the invariant.
        Document::from_text(&lines.join("\n"))
    }

    /// Number of lines. O(1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Char length of the canonical flat rendering.
    pub fn len(&self) -> usize {
        let chars: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        chars + self.lines.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line at a 1-based line number.
    pub fn line_at(&self, line: usize) -> Result<&str> {
        if line < 1 || line > self.lines.len() {
            return Err(BufferError::out_of_range("line", line, self.lines.len()));
        }
        Ok(&self.lines[line - 1])
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// Flat text: lines joined by `\n`, no trailing terminator.
    pub fn raw_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Render lines `[begin, end]` (1-based, inclusive). A `begin` of
    /// zero or less means "from line 1", an `end` of zero or less means
    /// "to the last line". Formatted rendering prefixes every line with
    /// its right-aligned number (padded to the widest number in range)
    /// and a `|`, and newline-terminates each line; unformatted
    /// rendering joins with `\n` and leaves the last line unterminated.
    pub fn render(&self, formatted: bool, begin: i64, end: i64) -> Result<String> {
        if begin > 0 && end > 0 && begin > end {
            return Err(BufferError::precondition(format!(
                "begin line {begin} is beyond end line {end}"
            )));
        }
        if end > 0 && end as usize > self.lines.len() {
            return Err(BufferError::out_of_range(
                "line",
                end as usize,
                self.lines.len(),
            ));
        }
        if self.lines.is_empty() {
            return Ok(String::new());
        }

        let begin_ix = if begin <= 0 { 1 } else { begin as usize };
        let end_ix = if end <= 0 {
            self.lines.len()
        } else {
            end as usize
        };
        if begin_ix > end_ix {
            // begin positive, end defaulted to a smaller line count
            return Err(BufferError::out_of_range("line", begin_ix, end_ix));
        }

        let selected = &self.lines[begin_ix - 1..end_ix];
        if formatted {
            let width = end_ix.to_string().len();
            let mut out = String::new();
            for (offset, line) in selected.iter().enumerate() {
                let number = begin_ix + offset;
                out.push_str(&format!("{number:>width$}|{line}\n"));
            }
            Ok(out)
        } else {
            Ok(selected.join("\n"))
        }
    }

    /// Replace the whole document with `text` split on `\n`.
    ///
    /// CRLF is not special-cased: a trailing `\r` remains part of its
    /// line. A final `\n` produces no empty last line, so `"a\n"` and
    /// `"a"` load identically (the documented lossy edge case).
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
    }

    /// Replace the whole document with a line vector, re-splitting any
    /// embedded newlines.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        *self = Document::from_lines(lines);
    }

    /// Append the lines of `text` at the end of the document.
    pub fn append_at_end(&mut self, text: &str) {
        self.lines.extend(split_lines(text));
    }

    /// Insert the lines of `text` immediately before `line` (1-based).
    pub fn insert_at_line(&mut self, line: usize, text: &str) -> Result<()> {
        if line < 1 || line > self.lines.len() {
            return Err(BufferError::out_of_range("line", line, self.lines.len()));
        }
        self.lines.splice(line - 1..line - 1, split_lines(text));
        Ok(())
    }

    /// Replace `line` with `text`; when `text` spans multiple lines the
    /// first segment replaces `line` and the rest are inserted after it.
    pub fn edit_line(&mut self, line: usize, text: &str) -> Result<()> {
        if line < 1 || line > self.lines.len() {
            return Err(BufferError::out_of_range("line", line, self.lines.len()));
        }
        let mut segments = split_lines(text);
        let first = if segments.is_empty() {
            String::new()
        } else {
            segments.remove(0)
        };
        self.lines[line - 1] = first;
        self.lines.splice(line..line, segments);
        Ok(())
    }

    /// Concatenate `text` onto the end of `line`, re-splitting the
    /// result so any newlines overflow into new lines after it.
    pub fn append_at_line(&mut self, line: usize, text: &str) -> Result<()> {
        let combined = format!("{}{}", self.line_at(line)?, text);
        self.edit_line(line, &combined)
    }

    /// Replace the single char at 1-based flat offset `offset`. The
    /// flat text is re-split afterwards, so writing `\n` changes the
    /// line structure.
    pub fn edit_char(&mut self, offset: usize, ch: char) -> Result<()> {
        let len = self.len();
        if offset < 1 || offset > len {
            return Err(BufferError::out_of_range("offset", offset, len));
        }
        let mut chars: Vec<char> = self.raw_text().chars().collect();
        chars[offset - 1] = ch;
        self.set_text(&chars.into_iter().collect::<String>());
        Ok(())
    }

    /// Remove exactly one line (1-based).
    pub fn delete_at_line(&mut self, line: usize) -> Result<()> {
        if line < 1 || line > self.lines.len() {
            return Err(BufferError::out_of_range("line", line, self.lines.len()));
        }
        self.lines.remove(line - 1);
        Ok(())
    }

    /// Delete the 0-based half-open char range `[begin, end)` from the
    /// flat text, then re-split into lines.
    pub fn delete_range(&mut self, begin: usize, end: usize) -> Result<()> {
        if begin > end {
            return Err(BufferError::precondition(format!(
                "range begin {begin} is beyond end {end}"
            )));
        }
        let len = self.len();
        if end > len {
            return Err(BufferError::out_of_range("range end", end, len));
        }
        let flat: String = self
            .raw_text()
            .chars()
            .enumerate()
            .filter(|(i, _)| *i < begin || *i >= end)
            .map(|(_, c)| c)
            .collect();
        self.set_text(&flat);
        Ok(())
    }

    /// Delete the single char at 0-based flat offset `offset`.
    pub fn delete_char_at(&mut self, offset: usize) -> Result<()> {
        let len = self.len();
        if offset >= len {
            return Err(BufferError::out_of_range("offset", offset, len));
        }
        self.delete_range(offset, offset + 1)
    }

    /// Insert `text` at 0-based flat char offset `position`.
    pub(crate) fn insert_text(&mut self, position: usize, text: &str) -> Result<()> {
        let len = self.len();
        if position > len {
            return Err(BufferError::out_of_range("position", position, len));
        }
        let flat = self.raw_text();
        let mut out = String::with_capacity(flat.len() + text.len());
        for (i, c) in flat.chars().enumerate() {
            if i == position {
                out.push_str(text);
            }
            out.push(c);
        }
        if position == len {
            out.push_str(text);
        }
        self.set_text(&out);
        Ok(())
    }

    /// Empty the document in one step.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replace the document with the char-reversed flat text. Reversal
    /// operates on the joined string, newlines included, so line order
    /// and line content both flip.
    pub fn reverse(&mut self) {
        let reversed: String = self.raw_text().chars().rev().collect();
        self.set_text(&reversed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn doc(text: &str) -> Document {
        Document::from_text(text)
    }

    // ============ Construction and normalization ============

    #[test]
    fn empty_text_is_zero_lines() {
        let d = doc("");
        assert_eq!(d.line_count(), 0);
        assert_eq!(d.len(), 0);
        assert!(d.is_empty());
        assert_eq!(d.raw_text(), "");
    }

    #[test]
    fn trailing_newline_does_not_create_an_empty_line() {
        assert_eq!(doc("a\n").lines(), &["a".to_string()]);
        assert_eq!(doc("a").lines(), &["a".to_string()]);
        assert_eq!(
            doc("a\n\n").lines(),
            &["a".to_string(), "".to_string()]
        );
    }

    #[test]
    fn lone_newline_is_one_empty_line() {
        let d = doc("\n");
        assert_eq!(d.line_count(), 1);
        assert_eq!(d.raw_text(), "");
    }

    #[test]
    fn crlf_is_not_special_cased() {
        let d = doc("one\r\ntwo");
        assert_eq!(d.lines(), &["one\r".to_string(), "two".to_string()]);
    }

    #[test]
    fn from_lines_resplits_embedded_newlines() {
        let d = Document::from_lines(vec!["a\nb".to_string(), "c".to_string()]);
        assert_eq!(d.lines(), &["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    // ============ Round-trip properties ============

    #[test]
    fn raw_text_round_trips_without_trailing_newline() {
        let text = "one\ntwo\nthree";
        let d = doc(text);
        assert_eq!(d.raw_text(), text);
        assert_eq!(d.render(false, -1, -1).unwrap(), text);
    }

    #[test]
    fn set_text_of_own_rendering_is_idempotent() {
        let mut d = doc("alpha\nbeta\ngamma");
        let lines_before = d.to_lines();
        let rendered = d.render(false, -1, -1).unwrap();
        d.set_text(&rendered);
        assert_eq!(d.to_lines(), lines_before);
    }

    #[test]
    fn len_matches_flat_text_char_count() {
        for text in ["", "a", "ab\ncd", "日本\n語", "x\n\ny"] {
            let d = doc(text);
            assert_eq!(d.len(), d.raw_text().chars().count(), "text: {text:?}");
        }
    }

    // ============ Line addressing bounds ============

    #[rstest]
    #[case(0)]
    #[case(4)]
    fn line_at_out_of_bounds_fails(#[case] line: usize) {
        let d = doc("one\ntwo\nthree");
        assert!(matches!(
            d.line_at(line),
            Err(BufferError::OutOfRange { .. })
        ));
    }

    #[test]
    fn line_at_last_line_succeeds() {
        let d = doc("one\ntwo\nthree");
        assert_eq!(d.line_at(3).unwrap(), "three");
        assert_eq!(d.line_at(1).unwrap(), "one");
    }

    // ============ Rendering ============

    #[test]
    fn render_formatted_pads_to_widest_number_in_range() {
        let text = (1..=12)
            .map(|i| format!("line{i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let d = doc(&text);
        let out = d.render(true, -1, -1).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 1|line1");
        assert_eq!(lines[9], "10|line10");
        assert!(out.ends_with('\n'));

        // A single-digit range needs no padding.
        assert_eq!(d.render(true, 2, 9).unwrap().lines().next(), Some("2|line2"));
    }

    #[test]
    fn render_subrange_is_inclusive() {
        let d = doc("one\ntwo\nthree\nfour");
        assert_eq!(d.render(false, 2, 3).unwrap(), "two\nthree");
        assert_eq!(d.render(false, -1, 2).unwrap(), "one\ntwo");
        assert_eq!(d.render(false, 3, -1).unwrap(), "three\nfour");
    }

    #[test]
    fn render_begin_beyond_end_is_a_precondition_failure() {
        let d = doc("one\ntwo\nthree");
        assert!(matches!(
            d.render(false, 3, 2),
            Err(BufferError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn render_end_beyond_line_count_is_out_of_range() {
        let d = doc("one\ntwo");
        assert!(matches!(
            d.render(false, 1, 3),
            Err(BufferError::OutOfRange { .. })
        ));
    }

    #[test]
    fn render_empty_document_is_empty() {
        assert_eq!(doc("").render(true, -1, -1).unwrap(), "");
    }

    // ============ Editing ============

    #[test]
    fn insert_at_line_splices_before_the_line() {
        let mut d = doc("one\ntwo\nthree");
        d.insert_at_line(2, "X\nY").unwrap();
        assert_eq!(d.to_lines(), ["one", "X", "Y", "two", "three"]);
    }

    #[test]
    fn insert_at_line_rejects_empty_document() {
        let mut d = doc("");
        assert!(matches!(
            d.insert_at_line(1, "x"),
            Err(BufferError::OutOfRange { .. })
        ));
    }

    #[test]
    fn edit_line_replaces_and_overflows() {
        let mut d = doc("one\ntwo\nthree");
        d.edit_line(2, "TWO\nextra").unwrap();
        assert_eq!(d.to_lines(), ["one", "TWO", "extra", "three"]);
    }

    #[test]
    fn edit_line_with_empty_text_blanks_the_line() {
        let mut d = doc("one\ntwo");
        d.edit_line(1, "").unwrap();
        assert_eq!(d.to_lines(), ["", "two"]);
    }

    #[test]
    fn append_at_line_concatenates_and_resplits() {
        let mut d = doc("one\ntwo");
        d.append_at_line(1, "+more\noverflow").unwrap();
        assert_eq!(d.to_lines(), ["one+more", "overflow", "two"]);
    }

    #[test]
    fn append_at_end_splits_its_input() {
        let mut d = doc("one");
        d.append_at_end("two\nthree");
        d.append_at_end("");
        assert_eq!(d.to_lines(), ["one", "two", "three"]);
    }

    #[test]
    fn edit_char_replaces_at_one_based_offset() {
        let mut d = doc("abc\ndef");
        d.edit_char(1, 'A').unwrap();
        d.edit_char(5, 'D').unwrap();
        assert_eq!(d.raw_text(), "Abc\nDef");
    }

    #[test]
    fn edit_char_with_newline_splits_the_line() {
        let mut d = doc("abcd");
        d.edit_char(3, '\n').unwrap();
        assert_eq!(d.to_lines(), ["ab", "d"]);
    }

    #[rstest]
    #[case(0)]
    #[case(8)]
    fn edit_char_out_of_bounds_fails(#[case] offset: usize) {
        let mut d = doc("abc\ndef");
        assert!(matches!(
            d.edit_char(offset, 'x'),
            Err(BufferError::OutOfRange { .. })
        ));
        assert_eq!(d.raw_text(), "abc\ndef", "failed edit must not mutate");
    }

    #[test]
    fn delete_at_line_removes_exactly_one() {
        let mut d = doc("one\ntwo\nthree");
        d.delete_at_line(2).unwrap();
        assert_eq!(d.to_lines(), ["one", "three"]);
        assert!(d.delete_at_line(3).is_err());
    }

    #[test]
    fn delete_range_is_half_open_and_resplits() {
        let mut d = doc("ab\ncd");
        // Deleting the newline at char index 2 joins the lines.
        d.delete_range(2, 3).unwrap();
        assert_eq!(d.to_lines(), ["abcd"]);
    }

    #[test]
    fn delete_range_to_empty_yields_zero_lines() {
        let mut d = doc("abc");
        d.delete_range(0, 3).unwrap();
        assert_eq!(d.line_count(), 0);
    }

    #[test]
    fn delete_range_validates_bounds() {
        let mut d = doc("abc");
        assert!(matches!(
            d.delete_range(2, 1),
            Err(BufferError::PreconditionFailed(_))
        ));
        assert!(matches!(
            d.delete_range(0, 4),
            Err(BufferError::OutOfRange { .. })
        ));
    }

    #[test]
    fn delete_char_at_is_zero_based() {
        let mut d = doc("abc");
        d.delete_char_at(0).unwrap();
        assert_eq!(d.raw_text(), "bc");
        assert!(d.delete_char_at(2).is_err());
    }

    #[test]
    fn clear_empties_any_document() {
        let mut d = doc("one\ntwo");
        d.clear();
        assert_eq!(d.line_count(), 0);
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn reverse_flips_the_whole_flat_text() {
        let mut d = doc("ab\ncd");
        d.reverse();
        // The joined string "ab\ncd" reversed is "dc\nba": line order
        // and line content both flip.
        assert_eq!(d.to_lines(), ["dc", "ba"]);
    }

    #[test]
    fn reverse_twice_is_identity() {
        let mut d = doc("one\ntwo\nthree");
        d.reverse();
        d.reverse();
        assert_eq!(d.raw_text(), "one\ntwo\nthree");
    }

    #[test]
    fn insert_text_at_zero_based_offset() {
        let mut d = doc("ad");
        d.insert_text(1, "bc").unwrap();
        assert_eq!(d.raw_text(), "abcd");
        d.insert_text(4, "\ne").unwrap();
        assert_eq!(d.to_lines(), ["abcd", "e"]);
        assert!(d.insert_text(99, "x").is_err());
    }
}
