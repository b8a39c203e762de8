//! Carve Editor - cursor-relative rich text editing core
//!
//! The editor mirrors an editable DOM region in a [`RichTree`] whose nodes
//! carry absolute character ranges, keeps the caret in sync between DOM
//! positions and absolute positions, and runs keystroke handlers on top.
//!
//! Backspace runs a small state machine: classify the thing before the
//! cursor, turn it into a [`Manipulation`], let plugins veto or take over,
//! execute, wait for a paint, and retry until a visible change happened.
//!
//! ```ignore
//! let mut editor = Editor::from_html("Capybaras", Config::default())?;
//! editor.controller_mut().set_current_position(9)?;
//! smol::block_on(editor.handle_event(&KeyEvent::key_down(Key::Backspace)))?;
//! assert_eq!(editor.controller().inner_html(), "Capybara");
//! ```

mod config;
mod controller;
mod diff;
mod editor;
mod error;
mod history;
mod input;
mod layout;
mod manipulation;
mod observer;
mod paint;
mod position;
mod property;
mod rich_node;
mod selection;
mod visibility;

pub mod handlers;
pub mod observers;
pub mod plugins;
pub mod tree_modification;

pub use config::{Config, LayoutConfig};
pub use controller::EditorController;
pub use diff::{TextChange, text_change};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use history::{CappedHistory, HistoryItem};
pub use input::{HandlerResponse, Key, KeyEvent, KeyEventKind};
pub use layout::{HeadlessLayout, Layout};
pub use manipulation::{Manipulation, ManipulationExecutor, ManipulationGuidance, PluginVerdict};
pub use observer::{ChangeSource, ContentObserver, MovementObserver, ObserverId};
pub use paint::{PaintCycle, YieldingPaint};
pub use position::{dom_to_absolute, range_to_region};
pub use property::EditorProperty;
pub use rich_node::{RichNode, RichNodeId, RichNodeType, RichTree};
pub use selection::{EditorSelection, Region};
pub use visibility::{DefaultVisibility, INVISIBLE_SPACE, VisibilityPolicy, string_to_visible_text};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
