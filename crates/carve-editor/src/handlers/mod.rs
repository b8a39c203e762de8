//! Keystroke handlers
//!
//! Each handler decides whether it owns an event and then edits the document
//! through the [`crate::EditorController`]. Backspace and tab produce
//! [`crate::Manipulation`]s that plugins may veto or take over.

mod backspace;
mod executor;
mod tab;
mod text_input;

pub use backspace::{BackspaceHandler, BackspaceOutcome, BackspacePlugin, ThingBeforeCursor};
pub use executor::execute_default;
pub use tab::{TabDirection, TabHandler, TabInputPlugin};
pub use text_input::{TextInputHandler, is_supported_input_character};
