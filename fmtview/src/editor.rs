//! Line buffer and cursor behind the input panel.
//!
//! The editor owns the text while the user types; every mutating call
//! returns `true` when the text changed so the caller can hand the new text
//! to the scheduler. Columns are counted in chars, not bytes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self { lines: vec![String::new()], row: 0, col: 0 }
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

impl Editor {
    /// Replaces the whole buffer and puts the cursor at the top.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        self.row = 0;
        self.col = 0;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, col), both 0-based.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn current_len(&self) -> usize {
        char_len(&self.lines[self.row])
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
        true
    }

    pub fn insert_newline(&mut self) -> bool {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        self.row += 1;
        self.col = 0;
        self.lines.insert(self.row, rest);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
            true
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_len();
            self.lines[self.row].push_str(&line);
            true
        } else {
            false
        }
    }

    pub fn delete(&mut self) -> bool {
        if self.col < self.current_len() {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
            true
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.current_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn home(&mut self) {
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.col = self.current_len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> Editor {
        let mut e = Editor::default();
        for c in s.chars() {
            if c == '\n' {
                e.insert_newline();
            } else {
                e.insert_char(c);
            }
        }
        e
    }

    #[test]
    fn typing_builds_text_and_tracks_cursor() {
        let e = typed("let a\n= 1");
        assert_eq!(e.text(), "let a\n= 1");
        assert_eq!(e.cursor(), (1, 3));
    }

    #[test]
    fn newline_splits_at_cursor() {
        let mut e = typed("ab");
        e.move_left();
        e.insert_newline();
        assert_eq!(e.lines(), ["a", "b"]);
        assert_eq!(e.cursor(), (1, 0));
    }

    #[test]
    fn backspace_joins_lines_and_stops_at_origin() {
        let mut e = typed("a\nb");
        e.move_left();
        assert!(e.backspace());
        assert_eq!(e.text(), "ab");
        assert_eq!(e.cursor(), (0, 1));
        e.home();
        assert!(!e.backspace());
    }

    #[test]
    fn delete_at_line_end_pulls_next_line_up() {
        let mut e = Editor::default();
        e.set_text("x\ny");
        e.end();
        assert!(e.delete());
        assert_eq!(e.text(), "xy");
        e.end();
        assert!(!e.delete());
    }

    #[test]
    fn multibyte_chars_edit_by_char() {
        let mut e = typed("é→x");
        e.move_left();
        assert!(e.backspace());
        assert_eq!(e.text(), "éx");
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut e = Editor::default();
        e.set_text("long line\nab");
        e.end();
        e.move_down();
        assert_eq!(e.cursor(), (1, 2));
        e.move_up();
        assert_eq!(e.cursor(), (0, 2));
    }
}
