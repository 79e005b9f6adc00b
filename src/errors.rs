//! Errors
//!
//! Custom error types used throughout the `bart_tree` crate.
use thiserror::Error;

/// Errors that can occur when working with a regression tree.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    /// A node implied by the tree structure is missing or misplaced.
    /// Node lookups panic with this message.
    #[error("Structural corruption at node index {0}.")]
    StructuralCorruption(usize),
    /// No node at this index.
    #[error("Node {0} does not exist in the tree.")]
    MissingNode(usize),
    /// Tried to grow a split node.
    #[error("Node {0} is a split node, only leaf nodes can be grown.")]
    NotALeaf(usize),
    /// A child slot is already taken.
    #[error("Index {0} is already occupied by another node.")]
    IndexOccupied(usize),
    /// First value is the expected length, second is what was passed.
    #[error("Leaf value has {found} outputs, expected {expected}.")]
    ValueShape { expected: usize, found: usize },
    /// Data point index larger than the output buffer.
    #[error("Data point {index} is out of range for {num_observations} observations.")]
    DataPointOutOfRange { index: usize, num_observations: usize },
    /// Child data points do not split the parent's data points exactly.
    #[error("Children of node {0} do not partition its data points.")]
    PartitionMismatch(usize),
    /// Leaf registry disagrees with the stored nodes.
    #[error("Leaf registry is inconsistent at node {0}.")]
    LeafRegistry(usize),
}
