//! Error types for the Combi layout crates.
//!
//! Layout math itself never fails: out-of-range inputs are clamped. Errors
//! only describe structural misuse of a layout tree.

use thiserror::Error;

use crate::types::LayoutNodeId;

/// Errors while building or laying out a layout tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Unknown layout node {node}")]
    UnknownNode { node: LayoutNodeId },

    #[error("Layout node {node} is not a container")]
    NotAContainer { node: LayoutNodeId },

    #[error("Layout cycle detected: {child} is an ancestor of {parent}")]
    CycleDetected {
        parent: LayoutNodeId,
        child: LayoutNodeId,
    },
}

/// Result alias for layout tree operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
