//! Rope-backed document buffer with cursor, selection and undo history.
//!
//! All offsets are char offsets into the document.

use std::ops::Range;

use ropey::Rope;

use crate::error::{Error, Result};

/// One committed edit, enough to apply it in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    removed: String,
    inserted: String,
    selection_before: Range<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    text: Rope,
    /// Selected range; empty when it is just a cursor.
    selection: Range<usize>,
    undo: Vec<Edit>,
    redo: Vec<Edit>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            text: Rope::from_str(text),
            ..Default::default()
        }
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn rope(&self) -> &Rope {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn set_cursor(&mut self, offset: usize) -> Result<()> {
        self.check(offset)?;
        self.selection = offset..offset;
        Ok(())
    }

    pub fn select(&mut self, range: Range<usize>) -> Result<()> {
        self.check_range(&range)?;
        self.selection = range;
        Ok(())
    }

    /// Text from the start of the cursor's line up to `offset`, and that line's start offset.
    pub fn line_prefix(&self, offset: usize) -> Result<(usize, String)> {
        self.check(offset)?;
        let line_start = self.text.line_to_char(self.text.char_to_line(offset));
        Ok((line_start, self.text.slice(line_start..offset).to_string()))
    }

    pub fn slice(&self, range: Range<usize>) -> Result<String> {
        self.check_range(&range)?;
        Ok(self.text.slice(range).to_string())
    }

    /// Byte offset of a char offset, for mapping tokens back to the document.
    pub fn char_to_byte(&self, offset: usize) -> Result<usize> {
        self.check(offset)?;
        Ok(self.text.char_to_byte(offset))
    }

    /// Replace `range` with `text`, recording the edit. The cursor moves to the end of
    /// the inserted text. Returns whether the document changed.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<bool> {
        self.check_range(&range)?;
        let removed = self.text.slice(range.clone()).to_string();
        if removed == text {
            return Ok(false);
        }

        let edit = Edit {
            start: range.start,
            removed,
            inserted: text.to_string(),
            selection_before: self.selection.clone(),
        };
        self.apply_forward(&edit);
        self.undo.push(edit);
        self.redo.clear();
        Ok(true)
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<bool> {
        self.replace(offset..offset, text)
    }

    /// Replace the whole text. Identical text is a no-op that keeps cursor and history.
    pub fn set_value(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        let end = self.len_chars();
        let cursor = self.cursor();
        let edit = Edit {
            start: 0,
            removed: self.text.to_string(),
            inserted: text.to_string(),
            selection_before: self.selection.clone(),
        };
        self.apply_forward(&edit);
        let len = self.len_chars();
        // Keep the cursor where it was when it still fits.
        let cursor = if cursor == end { len } else { cursor.min(len) };
        self.selection = cursor..cursor;
        self.undo.push(edit);
        self.redo.clear();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.undo.pop() else {
            return false;
        };
        let inserted_end = edit.start + edit.inserted.chars().count();
        self.text.remove(edit.start..inserted_end);
        self.text.insert(edit.start, &edit.removed);
        self.selection = edit.selection_before.clone();
        self.redo.push(edit);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(edit) = self.redo.pop() else {
            return false;
        };
        self.apply_forward(&edit);
        self.undo.push(edit);
        true
    }

    fn apply_forward(&mut self, edit: &Edit) {
        let removed_end = edit.start + edit.removed.chars().count();
        self.text.remove(edit.start..removed_end);
        self.text.insert(edit.start, &edit.inserted);
        let cursor = edit.start + edit.inserted.chars().count();
        self.selection = cursor..cursor;
    }

    fn check(&self, offset: usize) -> Result<()> {
        let len = self.len_chars();
        if offset > len {
            return Err(Error::OffsetOutOfBounds { offset, len });
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        self.check(range.end)?;
        if range.start > range.end {
            return Err(Error::OffsetOutOfBounds { offset: range.start, len: range.end });
        }
        Ok(())
    }
}
