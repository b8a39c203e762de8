//! Observer traits
//!
//! Movement observers hear about caret movement, content observers about
//! text changes. Both are registered on the [`EditorController`] and called
//! in registration order.

use crate::{EditorController, EditorResult, EditorSelection};

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

/// Origin of a content change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    Backspace,
    TextInput,
    Undo,
    HtmlContent,
    Property,
    /// Free-form description passed to an external DOM update
    External(String),
}

/// Notified after the selection moved
pub trait MovementObserver {
    /// Called with the selection before and after the move. The observer may
    /// move the caret itself; that movement is not dispatched again.
    fn handle_movement(
        &mut self,
        controller: &mut EditorController,
        old: &EditorSelection,
        new: &EditorSelection,
    ) -> EditorResult<()>;
}

/// Notified about text changes; every method defaults to doing nothing
pub trait ContentObserver {
    fn handle_text_insert(
        &mut self,
        _position: usize,
        _text: &str,
        _source: &ChangeSource,
    ) -> EditorResult<()> {
        Ok(())
    }

    fn handle_text_removal(
        &mut self,
        _start: usize,
        _end: usize,
        _source: &ChangeSource,
    ) -> EditorResult<()> {
        Ok(())
    }

    fn handle_full_content_update(&mut self, _source: &ChangeSource) -> EditorResult<()> {
        Ok(())
    }
}
