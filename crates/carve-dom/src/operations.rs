//! DOM Node Operations errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Node has no parent
    #[error("node {0} has no parent")]
    Detached(NodeId),
    /// Invalid node type for the operation
    #[error("invalid node type for {0}")]
    InvalidNodeType(NodeId),
    /// Offset outside the node's length
    #[error("offset {offset} out of bounds for {node} (length {length})")]
    IndexSize {
        node: NodeId,
        offset: usize,
        length: usize,
    },
}
