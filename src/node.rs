use crate::depth::get_depth;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of an array-indexed regression tree.
///
/// Whether a node is a leaf or a split is decided by `split_variable` alone:
/// `None` is the leaf sentinel and `Some(j)` marks a split on column `j`.
/// The meaning of `value` follows from that. Leaves hold their prediction
/// (one entry per output), splits hold a single threshold.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub index: usize,
    pub value: Vec<f64>,
    pub split_variable: Option<usize>,
    pub data_point_indices: Vec<usize>,
}

impl Node {
    /// Create a leaf node owning the training rows in `data_point_indices`.
    pub fn new_leaf_node(index: usize, value: Vec<f64>, data_point_indices: Vec<usize>) -> Self {
        Node {
            index,
            value,
            split_variable: None,
            data_point_indices,
        }
    }

    /// Create a split node sending `x[split_variable] <= threshold` left.
    pub fn new_split_node(index: usize, threshold: f64, split_variable: usize) -> Self {
        Node {
            index,
            value: vec![threshold],
            split_variable: Some(split_variable),
            data_point_indices: Vec::new(),
        }
    }

    /// Parent position. The root has no parent and maps onto itself.
    pub fn get_idx_parent_node(&self) -> usize {
        self.index.saturating_sub(1) / 2
    }

    pub fn get_idx_left_child(&self) -> usize {
        self.index * 2 + 1
    }

    pub fn get_idx_right_child(&self) -> usize {
        self.get_idx_left_child() + 1
    }

    pub fn depth(&self) -> usize {
        get_depth(self.index)
    }

    pub fn is_split_node(&self) -> bool {
        self.split_variable.is_some()
    }

    pub fn is_leaf_node(&self) -> bool {
        !self.is_split_node()
    }

    /// Threshold of a split node. For a leaf this is its first output.
    pub fn threshold(&self) -> f64 {
        self.value[0]
    }

    /// Get the child that should be traveled down, given a row.
    /// Only meaningful for split nodes.
    #[inline]
    pub fn get_child_idx(&self, x: &[f64]) -> usize {
        match self.split_variable {
            Some(var) if x[var] <= self.threshold() => self.get_idx_left_child(),
            Some(_) => self.get_idx_right_child(),
            None => self.index,
        }
    }

    /// Copy of this node without its row memberships.
    pub fn without_data_points(&self) -> Self {
        Node {
            index: self.index,
            value: self.value.clone(),
            split_variable: self.split_variable,
            data_point_indices: Vec::new(),
        }
    }
}

impl fmt::Display for Node {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.split_variable {
            None => write!(
                f,
                "{}:leaf={:?},n_points={}",
                self.index,
                self.value,
                self.data_point_indices.len()
            ),
            Some(var) => write!(
                f,
                "{}:[{} <= {}] yes={},no={}",
                self.index,
                var,
                self.threshold(),
                self.get_idx_left_child(),
                self.get_idx_right_child()
            ),
        }
    }
}
