use carve_dom::{DomError, NodeId};
use carve_html::ParseError;

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Editor errors
///
/// Everything returned as an error aborts the current keystroke. Conditions
/// the editor can recover from are logged instead.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("cannot resolve offset {offset} in {node} to a document position")]
    UnresolvablePosition { node: NodeId, offset: usize },

    #[error("node {0} is not part of the rich node tree")]
    StaleNode(NodeId),

    #[error("there is no cursor in the editor")]
    NoCursor,

    #[error("multiple plugins want to execute {manipulation}: {}", .labels.join(", "))]
    ManipulationConflict {
        manipulation: String,
        labels: Vec<String>,
    },

    #[error("cannot {action}: {node} has no parent")]
    MissingParent { node: NodeId, action: &'static str },

    #[error("cannot split {node} at position {position}")]
    InvalidSplit { node: NodeId, position: usize },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Html(#[from] ParseError),
}
