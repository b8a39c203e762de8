//! Built-in movement observers

mod lump_node;
mod position_mark;

pub use lump_node::LumpNodeMovementObserver;
pub use position_mark::{POSITION_LEVEL, PositionMarkMovementObserver, RDFA_POSITION_LEVEL};
