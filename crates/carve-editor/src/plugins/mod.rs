//! Built-in handler plugins

pub mod content_editable_false;
pub mod empty_element;
pub mod list;
pub mod lump_node;
pub mod rdfa;

pub use content_editable_false::ContentEditableFalseBackspacePlugin;
pub use empty_element::EmptyElementBackspacePlugin;
pub use list::ListTabInputPlugin;
pub use lump_node::{LumpNodeBackspacePlugin, LumpNodeTabInputPlugin};
pub use rdfa::RdfaBackspacePlugin;
