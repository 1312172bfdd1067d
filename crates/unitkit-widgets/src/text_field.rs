#![forbid(unsafe_code)]

//! Single-line text edit buffer.
//!
//! Holds the raw text of an input field plus a grapheme-indexed cursor.
//! There is no validation here: the buffer accepts whatever the user types,
//! and owners decide what the text means when editing ends.

use unicode_segmentation::UnicodeSegmentation;
use unitkit_core::event::{Event, KeyCode, KeyEvent};

/// Text value and cursor of a single-line input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    /// Text value.
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
}

impl TextField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text value (builder). The cursor moves to the end.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value; the cursor moves to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.grapheme_count();
    }

    /// Cursor position as a grapheme index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key or paste event. Returns whether the field changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.is_actionable() => self.handle_key(key),
            Event::Paste(paste) => {
                let before = self.value.len();
                self.insert_text(&paste.text);
                self.value.len() != before
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.ctrl() => self.insert_char(c),
            KeyCode::Backspace => self.delete_char_back(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.grapheme_count());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.grapheme_count();
                true
            }
            _ => false,
        }
    }

    /// Insert text at the cursor.
    ///
    /// Line breaks and tabs become spaces; other control characters are
    /// dropped.
    pub fn insert_text(&mut self, text: &str) {
        let clean: String = text
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect();
        if clean.is_empty() {
            return;
        }
        let before = self.grapheme_count();
        let offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert_str(offset, &clean);
        let added = self.grapheme_count().saturating_sub(before);
        self.cursor = (self.cursor + added).min(self.grapheme_count());
    }

    fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        let before = self.grapheme_count();
        let offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert(offset, c);
        // A combining mark merges into the previous grapheme.
        if self.grapheme_count() > before {
            self.cursor += 1;
        }
        true
    }

    fn delete_char_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor - 1);
        let end = self.grapheme_byte_offset(self.cursor);
        self.value.drain(start..end);
        self.cursor -= 1;
        true
    }

    fn delete_char_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor);
        let end = self.grapheme_byte_offset(self.cursor + 1);
        self.value.drain(start..end);
        true
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}
