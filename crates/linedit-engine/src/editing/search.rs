//! Substring search and flat-text slicing over a [`Document`].

use crate::editing::Document;
use crate::error::{BufferError, Result};

/// Sentinel for "no match limit" in [`Document::search_all`].
pub const NO_LIMIT: Option<usize> = None;

impl Document {
    /// First occurrence of `needle`, scanning from line 1.
    /// Returns a 1-based (line, column) pair.
    pub fn search(&self, needle: &str) -> Option<(usize, usize)> {
        self.search_all(needle, 0, Some(1)).into_iter().next()
    }

    /// First occurrence of `needle` scanning lines strictly after
    /// `after_line` (so `after_line == 0` scans the whole document).
    pub fn search_from(&self, needle: &str, after_line: usize) -> Option<(usize, usize)> {
        self.search_all(needle, after_line, Some(1)).into_iter().next()
    }

    /// Up to `limit` occurrences of `needle` (`None` for unbounded),
    /// scanning lines strictly after `after_line` and, within each
    /// line, all non-overlapping matches left to right. Columns are
    /// 1-based char positions. An empty needle never matches.
    pub fn search_all(
        &self,
        needle: &str,
        after_line: usize,
        limit: Option<usize>,
    ) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        if needle.is_empty() || limit == Some(0) {
            return hits;
        }
        for (ix, line) in self.lines().iter().enumerate().skip(after_line) {
            for (byte_pos, _) in line.match_indices(needle) {
                let col = line[..byte_pos].chars().count() + 1;
                hits.push((ix + 1, col));
                if limit.is_some_and(|max| hits.len() >= max) {
                    return hits;
                }
            }
        }
        hits
    }

    /// 0-based char offset of the first occurrence of `needle` in the
    /// flat text.
    pub fn index_of(&self, needle: &str) -> Option<usize> {
        self.index_of_from(needle, 0)
    }

    /// Like [`index_of`](Self::index_of), starting the scan at 0-based
    /// char offset `from`.
    pub fn index_of_from(&self, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let flat = self.raw_text();
        let byte_from = char_to_byte(&flat, from)?;
        let tail = &flat[byte_from..];
        tail.find(needle)
            .map(|byte_pos| from + tail[..byte_pos].chars().count())
    }

    /// Tokenize the flat text on exact occurrences of `delimiter`,
    /// consuming the delimiter. Empty tokens (including a trailing one)
    /// are kept; an empty delimiter yields the whole text as one token.
    pub fn split(&self, delimiter: &str) -> Vec<String> {
        let flat = self.raw_text();
        if delimiter.is_empty() {
            return vec![flat];
        }
        flat.split(delimiter).map(str::to_owned).collect()
    }

    /// Flat-text substring from 0-based char offset `pos` to the end.
    pub fn substring(&self, pos: usize) -> Result<String> {
        let len = self.len();
        if pos > len {
            return Err(BufferError::out_of_range("substring pos", pos, len));
        }
        self.substring_range(pos, len)
    }

    /// Flat-text substring over the 0-based half-open char range
    /// `[pos, end)`.
    pub fn substring_range(&self, pos: usize, end: usize) -> Result<String> {
        if pos > end {
            return Err(BufferError::precondition(format!(
                "substring begin {pos} is beyond end {end}"
            )));
        }
        let len = self.len();
        if end > len {
            return Err(BufferError::out_of_range("substring end", end, len));
        }
        Ok(self.raw_text().chars().skip(pos).take(end - pos).collect())
    }
}

/// Byte offset of the char at `char_ix`, or of the end of the string
/// when `char_ix` equals the char count. `None` beyond that.
fn char_to_byte(s: &str, char_ix: usize) -> Option<usize> {
    s.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(s.len()))
        .nth(char_ix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::from_text(text)
    }

    #[test]
    fn search_finds_first_match_from_line_one() {
        let d = doc("ab\ncab\nabc");
        assert_eq!(d.search("ab"), Some((1, 1)));
        assert_eq!(d.search("zz"), None);
    }

    #[test]
    fn search_from_resumes_after_the_given_line() {
        let d = doc("ab\ncab\nabc");
        assert_eq!(d.search_from("ab", 2), Some((3, 1)));
        assert_eq!(d.search_from("ab", 1), Some((2, 2)));
        assert_eq!(d.search_from("ab", 3), None);
    }

    #[test]
    fn search_all_collects_matches_left_to_right() {
        let d = doc("aba ab\nxx\nab");
        assert_eq!(
            d.search_all("ab", 0, NO_LIMIT),
            vec![(1, 1), (1, 5), (3, 1)]
        );
        assert_eq!(d.search_all("ab", 0, Some(2)), vec![(1, 1), (1, 5)]);
    }

    #[test]
    fn search_all_matches_are_non_overlapping() {
        let d = doc("aaaa");
        assert_eq!(d.search_all("aa", 0, NO_LIMIT), vec![(1, 1), (1, 3)]);
    }

    #[test]
    fn empty_needle_never_matches() {
        let d = doc("abc");
        assert_eq!(d.search(""), None);
        assert_eq!(d.search_all("", 0, NO_LIMIT), vec![]);
        assert_eq!(d.index_of(""), None);
    }

    #[test]
    fn search_columns_count_chars_not_bytes() {
        let d = doc("日本語abc");
        assert_eq!(d.search("abc"), Some((1, 4)));
    }

    #[test]
    fn index_of_spans_line_boundaries() {
        let d = doc("one\ntwo");
        // The needle crosses the joining newline of the flat text.
        assert_eq!(d.index_of("e\nt"), Some(2));
        assert_eq!(d.index_of("two"), Some(4));
        assert_eq!(d.index_of("nope"), None);
    }

    #[test]
    fn index_of_from_skips_earlier_matches() {
        let d = doc("abcabc");
        assert_eq!(d.index_of_from("abc", 1), Some(3));
        assert_eq!(d.index_of_from("abc", 4), None);
        assert_eq!(d.index_of_from("abc", 99), None);
    }

    #[test]
    fn split_keeps_empty_and_trailing_tokens() {
        let d = doc("a,b,,c,");
        assert_eq!(d.split(","), vec!["a", "b", "", "c", ""]);
    }

    #[test]
    fn split_on_multichar_delimiter() {
        let d = doc("one--two--three");
        assert_eq!(d.split("--"), vec!["one", "two", "three"]);
    }

    #[test]
    fn split_on_empty_delimiter_is_the_whole_text() {
        let d = doc("ab\ncd");
        assert_eq!(d.split(""), vec!["ab\ncd"]);
    }

    #[test]
    fn substring_is_zero_based_half_open() {
        let d = doc("ab\ncd");
        assert_eq!(d.substring(3).unwrap(), "cd");
        assert_eq!(d.substring_range(1, 4).unwrap(), "b\nc");
        assert_eq!(d.substring_range(2, 2).unwrap(), "");
    }

    #[test]
    fn substring_validates_bounds() {
        let d = doc("abc");
        assert!(matches!(
            d.substring_range(2, 1),
            Err(BufferError::PreconditionFailed(_))
        ));
        // A single offset past the end is out of range, not a
        // begin-beyond-end precondition failure.
        assert!(matches!(
            d.substring(4),
            Err(BufferError::OutOfRange { .. })
        ));
        // The end itself is a valid (empty) starting point.
        assert_eq!(d.substring(3).unwrap(), "");
    }
}
