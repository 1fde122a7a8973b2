use std::ops::Range;

/// Screen location of a buffer position, in the text widget's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The text buffer capability the autocompleter needs from its host.
///
/// Every offset is counted in Unicode scalar values, never bytes, so that
/// hosts with UTF-16 or grapheme based iterators can translate at the edge.
pub trait TextBuffer {
    /// Offset of the insertion cursor.
    fn cursor(&self) -> usize;

    /// Number of characters in the buffer.
    fn len_chars(&self) -> usize;

    fn char_at(&self, offset: usize) -> Option<char>;

    /// Text between two offsets. Out of range bounds are clamped.
    fn text(&self, range: Range<usize>) -> String;

    fn insert(&mut self, offset: usize, text: &str);

    fn delete(&mut self, range: Range<usize>);

    /// Where `offset` is drawn, used to point the popover at the match.
    fn location(&self, offset: usize) -> Anchor;

    /// Walks backward from `from`, testing every character before it.
    ///
    /// Returns the offset of the first character accepted by `pred`, or
    /// `None` once the start of the buffer is reached.
    fn backward_find_char(&self, from: usize, pred: &mut dyn FnMut(char) -> bool) -> Option<usize> {
        let mut offset = from.min(self.len_chars());
        while offset > 0 {
            offset -= 1;
            if let Some(ch) = self.char_at(offset)
                && pred(ch)
            {
                return Some(offset);
            }
        }
        None
    }

    /// Walks forward from `from`, testing the character at `from` first.
    ///
    /// Returns the offset of the first accepted character, or `None` when
    /// the end of the buffer is reached.
    fn forward_find_char(&self, from: usize, pred: &mut dyn FnMut(char) -> bool) -> Option<usize> {
        let len = self.len_chars();
        (from..len).find(|&offset| self.char_at(offset).is_some_and(&mut *pred))
    }
}

/// Single-line oriented in-memory buffer for headless hosts and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringBuffer {
    chars: Vec<char>,
    cursor: usize,
    char_width: f32,
    line_height: f32,
}

impl StringBuffer {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self {
            chars,
            cursor,
            char_width: 1.0,
            line_height: 1.0,
        }
    }

    /// Builds a buffer from text containing a single `|` cursor marker.
    ///
    /// Without a marker the cursor lands at the end of the text.
    pub fn with_cursor_marker(marked: &str) -> Self {
        match marked.char_indices().find(|(_, ch)| *ch == '|') {
            Some((byte_ix, _)) => {
                let cursor = marked[..byte_ix].chars().count();
                let text: String = marked[..byte_ix]
                    .chars()
                    .chain(marked[byte_ix + 1..].chars())
                    .collect();
                let mut buffer = Self::new(&text);
                buffer.set_cursor(cursor);
                buffer
            }
            None => Self::new(marked),
        }
    }

    /// Sets the cell size used by [`TextBuffer::location`].
    pub fn with_cell_size(mut self, char_width: f32, line_height: f32) -> Self {
        self.char_width = char_width;
        self.line_height = line_height;
        self
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.chars.len());
    }

    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

impl TextBuffer for StringBuffer {
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn len_chars(&self) -> usize {
        self.chars.len()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    fn text(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        self.chars[start..end].iter().collect()
    }

    fn insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.chars.len());
        let inserted: Vec<char> = text.chars().collect();
        let count = inserted.len();
        self.chars.splice(offset..offset, inserted);
        if self.cursor >= offset {
            self.cursor += count;
        }
    }

    fn delete(&mut self, range: Range<usize>) {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        self.chars.drain(start..end);
        if self.cursor >= end {
            self.cursor -= end - start;
        } else if self.cursor > start {
            self.cursor = start;
        }
    }

    fn location(&self, offset: usize) -> Anchor {
        let line = self.chars[..offset.min(self.chars.len())]
            .iter()
            .filter(|ch| **ch == '\n')
            .count();
        let column = self.chars[..offset.min(self.chars.len())]
            .iter()
            .rev()
            .take_while(|ch| **ch != '\n')
            .count();
        Anchor::new(
            column as f32 * self.char_width,
            line as f32 * self.line_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_marker_is_removed() {
        let buffer = StringBuffer::with_cursor_marker("ab|cd");
        assert_eq!(buffer.as_string(), "abcd");
        assert_eq!(buffer.cursor(), 2);

        let unmarked = StringBuffer::with_cursor_marker("abcd");
        assert_eq!(unmarked.cursor(), 4);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let buffer = StringBuffer::with_cursor_marker("héllo wör|ld");
        assert_eq!(buffer.cursor(), 9);
        assert_eq!(buffer.char_at(1), Some('é'));
        assert_eq!(buffer.text(6..11), "wörld");
    }

    #[test]
    fn insert_and_delete_shift_cursor() {
        let mut buffer = StringBuffer::with_cursor_marker("hello |world");
        buffer.insert(0, ">> ");
        assert_eq!(buffer.cursor(), 9);

        buffer.delete(0..3);
        assert_eq!(buffer.cursor(), 6);

        buffer.delete(4..8);
        assert_eq!(buffer.as_string(), "hellrld");
        assert_eq!(buffer.cursor(), 4);
    }

    #[test]
    fn scans_stop_at_matching_character() {
        let buffer = StringBuffer::with_cursor_marker("say @bo|b now");
        let back = buffer.backward_find_char(buffer.cursor(), &mut |ch: char| ch == '@');
        assert_eq!(back, Some(4));

        let forward = buffer.forward_find_char(buffer.cursor(), &mut char::is_whitespace);
        assert_eq!(forward, Some(8));

        assert_eq!(buffer.backward_find_char(3, &mut |ch: char| ch == '@'), None);
        assert_eq!(buffer.forward_find_char(9, &mut |ch: char| ch == '@'), None);
    }

    #[test]
    fn buffers_compare_by_text_cursor_and_cell_size() {
        let buffer = StringBuffer::with_cursor_marker("ab|c");
        assert_eq!(buffer.clone(), StringBuffer::with_cursor_marker("ab|c"));
        assert_ne!(buffer, StringBuffer::with_cursor_marker("a|bc"));
        assert_ne!(buffer.clone().with_cell_size(8.0, 16.0), buffer);
    }

    #[test]
    fn location_uses_cell_size() {
        let buffer = StringBuffer::new("ab\ncde").with_cell_size(8.0, 16.0);
        assert_eq!(buffer.location(1), Anchor::new(8.0, 0.0));
        assert_eq!(buffer.location(5), Anchor::new(16.0, 16.0));
    }
}
