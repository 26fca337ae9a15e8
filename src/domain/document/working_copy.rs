//! Session-local document buffer.
//!
//! A working copy holds the snapshot a session was seeded with plus every
//! operation that session applied itself. Operations relayed from other
//! sessions are never applied here; the buffer is an echo of this client's
//! edits and the source of its checkpoints, not a merged document.
//!
//! Positions and lengths count Unicode scalar values. Out-of-range values
//! are clamped: inserting past the end appends, deleting past the end
//! removes whatever characters exist.

use super::Operation;

/// Plain text buffer owned by exactly one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingCopy {
    text: String,
}

impl WorkingCopy {
    /// Creates a working copy seeded with the stored document content.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
        }
    }

    /// Current buffer contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters in the buffer.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Applies one operation in place.
    pub fn apply(&mut self, operation: &Operation) {
        match operation {
            Operation::Insert { position, text } => {
                let at = self.byte_offset(*position);
                self.text.insert_str(at, text);
            }
            Operation::Delete { position, length } => {
                let start = self.byte_offset(*position);
                let end = self.byte_offset(position.saturating_add(*length));
                self.text.replace_range(start..end, "");
            }
            Operation::Sync { content } => {
                self.text.clone_from(content);
            }
        }
    }

    /// Byte offset of the character at `position`, clamped to the end.
    fn byte_offset(&self, position: usize) -> usize {
        self.text
            .char_indices()
            .nth(position)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }
}
