use unicode_width::UnicodeWidthStr;

pub fn prev_char_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index == 0 {
        return 0;
    }
    s.char_indices()
        .rev()
        .find(|(i, _)| *i < byte_index)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub fn next_char_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index >= s.len() {
        return s.len();
    }
    s.char_indices()
        .find(|(i, _)| *i > byte_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn prev_word_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index == 0 {
        return 0;
    }

    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut pos = chars
        .iter()
        .rposition(|(i, _)| *i < byte_index)
        .unwrap_or(0);

    while pos > 0 && !is_word_char(chars[pos].1) {
        pos -= 1;
    }
    while pos > 0 && is_word_char(chars[pos - 1].1) {
        pos -= 1;
    }

    chars.get(pos).map(|(i, _)| *i).unwrap_or(0)
}

pub fn next_word_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index >= s.len() {
        return s.len();
    }

    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut pos = chars
        .iter()
        .position(|(i, _)| *i >= byte_index)
        .unwrap_or(chars.len());

    while pos < chars.len() && is_word_char(chars[pos].1) {
        pos += 1;
    }
    while pos < chars.len() && !is_word_char(chars[pos].1) {
        pos += 1;
    }

    chars.get(pos).map(|(i, _)| *i).unwrap_or(s.len())
}

/// Single-line text buffer with a byte-offset cursor that always sits on a
/// char boundary. Backs the form, edit and search inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = prev_char_boundary(&self.value, self.cursor);
            self.value.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            let next = next_char_boundary(&self.value, self.cursor);
            self.value.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = prev_char_boundary(&self.value, self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = next_char_boundary(&self.value, self.cursor);
    }

    pub fn move_word_left(&mut self) {
        self.cursor = prev_word_boundary(&self.value, self.cursor);
    }

    pub fn move_word_right(&mut self) {
        self.cursor = next_word_boundary(&self.value, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Terminal column of the cursor, counting wide characters as two.
    pub fn cursor_column(&self) -> u16 {
        self.value[..self.cursor].width() as u16
    }
}
