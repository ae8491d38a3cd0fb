use ratatui::layout::Rect;

/// Minimal line editor backing the form and template fields.
///
/// Holds logical lines and a cursor; the widgets derive the visible window
/// from the cursor at render time, so no scroll state lives here.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize, // in characters, not bytes
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
        }
    }

    pub fn from_string(content: &str) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        let cursor_line = lines.len() - 1;
        let cursor_col = lines[cursor_line].chars().count();
        Self {
            lines,
            cursor_line,
            cursor_col,
        }
    }

    pub fn to_string(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(String::is_empty)
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        let col = self.cursor_col;
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let idx = Self::byte_index(line, col);
            line.insert(idx, ch);
            self.cursor_col += 1;
        }
    }

    pub fn insert_newline(&mut self) {
        let col = self.cursor_col;
        if let Some(line) = self.lines.get_mut(self.cursor_line) {
            let idx = Self::byte_index(line, col);
            let tail = line.split_off(idx);
            self.lines.insert(self.cursor_line + 1, tail);
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    /// Backspace: delete the character before the cursor, joining lines at
    /// column zero.
    pub fn delete_char(&mut self) {
        if self.cursor_col > 0 {
            let col = self.cursor_col - 1;
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let idx = Self::byte_index(line, col);
                line.remove(idx);
                self.cursor_col = col;
            }
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.lines[self.cursor_line].chars().count();
            self.lines[self.cursor_line].push_str(&current);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete_forward(&mut self) {
        let col = self.cursor_col;
        if col < self.current_line_len() {
            if let Some(line) = self.lines.get_mut(self.cursor_line) {
                let idx = Self::byte_index(line, col);
                line.remove(idx);
            }
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.cursor_col.min(self.current_line_len());
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = self.cursor_col.min(self.current_line_len());
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    /// First visible line for a viewport of the given height, keeping the
    /// cursor in view.
    pub fn scroll_top(&self, viewport_height: usize) -> usize {
        if viewport_height == 0 || self.cursor_line < viewport_height {
            0
        } else {
            self.cursor_line + 1 - viewport_height
        }
    }

    /// First visible column for a viewport of the given width.
    pub fn scroll_left(&self, viewport_width: usize) -> usize {
        if viewport_width == 0 || self.cursor_col < viewport_width {
            0
        } else {
            self.cursor_col + 1 - viewport_width
        }
    }

    /// Screen position of the cursor inside a bordered field area, if it
    /// falls within the area.
    pub fn cursor_screen_pos(&self, area: Rect) -> Option<(u16, u16)> {
        let viewport_height = area.height.saturating_sub(2) as usize;
        let viewport_width = area.width.saturating_sub(2) as usize;
        if viewport_height == 0 || viewport_width == 0 {
            return None;
        }
        let row = self.cursor_line - self.scroll_top(viewport_height);
        let col = self.cursor_col - self.scroll_left(viewport_width);
        Some((area.x + 1 + col as u16, area.y + 1 + row as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_round_trip() {
        let mut editor = Editor::new();
        for ch in "歌枠".chars() {
            editor.insert_char(ch);
        }
        assert_eq!(editor.to_string(), "歌枠");
        editor.delete_char();
        assert_eq!(editor.to_string(), "歌");
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let mut editor = Editor::from_string("abcd");
        editor.cursor_col = 2;
        editor.insert_newline();
        assert_eq!(editor.to_string(), "ab\ncd");
        assert_eq!((editor.cursor_line, editor.cursor_col), (1, 0));
        editor.delete_char();
        assert_eq!(editor.to_string(), "abcd");
        assert_eq!((editor.cursor_line, editor.cursor_col), (0, 2));
    }

    #[test]
    fn cursor_motion_clamps_to_line_ends() {
        let mut editor = Editor::from_string("long line\nx");
        editor.cursor_line = 0;
        editor.cursor_col = 9;
        editor.move_cursor_down();
        assert_eq!(editor.cursor_col, 1);
        editor.move_cursor_right();
        assert_eq!((editor.cursor_line, editor.cursor_col), (1, 1));
    }

    #[test]
    fn scroll_follows_the_cursor() {
        let editor = Editor::from_string("0\n1\n2\n3\n4\n5");
        assert_eq!(editor.cursor_line, 5);
        assert_eq!(editor.scroll_top(3), 3);
        assert_eq!(editor.scroll_top(10), 0);
    }
}
