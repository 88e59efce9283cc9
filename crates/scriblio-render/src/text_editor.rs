//! Inline text editing state.
//!
//! Tracks the content and caret of the text shape being edited, plus the
//! caret blink phase. Layout-accurate caret placement is done by the
//! renderer; this module is pure editing state.

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Caret blink half-period in milliseconds.
const BLINK_INTERVAL_MS: u128 = 500;

/// Editing state for a text shape.
#[derive(Debug)]
pub struct TextEditState {
    /// Current content of the editor.
    text: String,
    /// Caret position as a character index (0..=char_count).
    cursor: usize,
    /// When the caret last became visible.
    blink_started: Instant,
}

impl TextEditState {
    /// Start editing with existing content, caret at the end.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            blink_started: Instant::now(),
        }
    }

    /// Current content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Content up to the caret (for caret x-position measurement).
    pub fn text_before_cursor(&self) -> &str {
        let byte = self.byte_index(self.cursor);
        &self.text[..byte]
    }

    /// Replace the whole content, clamping the caret.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.cursor.min(self.text.chars().count());
    }

    /// Select-all-and-replace semantics for the first keystroke on
    /// placeholder text.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.reset_blink();
    }

    /// Insert a character at the caret.
    pub fn insert_char(&mut self, ch: char) {
        let byte = self.byte_index(self.cursor);
        self.text.insert(byte, ch);
        self.cursor += 1;
        self.reset_blink();
    }

    /// Insert a string at the caret.
    pub fn insert_str(&mut self, s: &str) {
        let byte = self.byte_index(self.cursor);
        self.text.insert_str(byte, s);
        self.cursor += s.chars().count();
        self.reset_blink();
    }

    /// Insert a line break at the caret.
    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the caret.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_index(self.cursor - 1);
        let end = self.byte_index(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        self.reset_blink();
    }

    /// Delete the character after the caret.
    pub fn delete(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.text.replace_range(start..end, "");
        self.reset_blink();
    }

    /// Move the caret one character left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.reset_blink();
    }

    /// Move the caret one character right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
        self.reset_blink();
    }

    /// Move the caret to the start of the content.
    pub fn move_home(&mut self) {
        self.cursor = 0;
        self.reset_blink();
    }

    /// Move the caret to the end of the content.
    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
        self.reset_blink();
    }

    /// Whether the caret is in the visible half of its blink cycle.
    pub fn is_cursor_visible(&self) -> bool {
        let elapsed = self.blink_started.elapsed().as_millis();
        (elapsed / BLINK_INTERVAL_MS) % 2 == 0
    }

    /// Restart the blink cycle (caret visible).
    pub fn reset_blink(&mut self) {
        self.blink_started = Instant::now();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
