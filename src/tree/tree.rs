use super::predict::TreeTraversal;
use super::trimmed::TrimmedTree;
use crate::constants::ROOT_INDEX;
use crate::data::OutputShape;
use crate::errors::TreeError;
use crate::node::Node;
use hashbrown::{HashMap, HashSet};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::Index;

/// Full binary regression tree.
///
/// Nodes are stored sparsely by their position in the array layout of a
/// binary tree (the root is 0, the children of `i` are `2i + 1` and `2i + 2`).
/// Every node is either a leaf or a split with exactly two children, and the
/// leaves partition the training rows the tree was built over.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Tree {
    pub(crate) nodes: HashMap<usize, Node>,
    pub(crate) leaf_indices: HashSet<usize>,
    pub(crate) output: Vec<f64>,
    pub(crate) shape: OutputShape,
    leaf_node_value: Vec<f64>,
    /// Sorted, duplicate free rows the tree was built over.
    data_point_indices: Vec<usize>,
}

impl Tree {
    /// Build a tree with a single root leaf owning `data_point_indices`.
    ///
    /// The rows are stored sorted, and a row listed twice is kept once.
    ///
    /// # Panics
    /// If `leaf_node_value` does not have `shape.num_outputs` entries.
    pub fn new(leaf_node_value: Vec<f64>, mut data_point_indices: Vec<usize>, shape: OutputShape) -> Self {
        assert_eq!(
            leaf_node_value.len(),
            shape.num_outputs,
            "{}",
            TreeError::ValueShape {
                expected: shape.num_outputs,
                found: leaf_node_value.len(),
            }
        );
        let n_supplied = data_point_indices.len();
        data_point_indices.sort_unstable();
        data_point_indices.dedup();
        if data_point_indices.len() != n_supplied {
            warn!(
                "Dropped {} duplicate data points when building the tree.",
                n_supplied - data_point_indices.len()
            );
        }
        let root = Node::new_leaf_node(ROOT_INDEX, leaf_node_value.clone(), data_point_indices.clone());
        Tree {
            nodes: HashMap::from([(ROOT_INDEX, root)]),
            leaf_indices: HashSet::from([ROOT_INDEX]),
            output: vec![0.0; shape.len()],
            shape,
            leaf_node_value,
            data_point_indices,
        }
    }

    /// Mutable access to the node at `index`.
    ///
    /// Changing `split_variable` through this reference bypasses the leaf
    /// registry, use [`Tree::set_node`] to change a node's kind.
    ///
    /// # Panics
    /// If no node is stored at `index`.
    pub fn get_node_mut(&mut self, index: usize) -> &mut Node {
        match self.nodes.get_mut(&index) {
            Some(node) => node,
            None => panic!("{}", TreeError::StructuralCorruption(index)),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.nodes.contains_key(&index)
    }

    /// Insert or overwrite the node at `index`, keeping the leaf registry in sync.
    ///
    /// A leaf's value must have one entry per output and its rows must be
    /// below `num_observations`, [`Tree::predict_batch`] indexes with them.
    pub fn set_node(&mut self, index: usize, node: Node) {
        if node.is_leaf_node() {
            if !self.leaf_indices.insert(index) {
                trace!("Leaf {} was already registered.", index);
            }
        } else {
            self.leaf_indices.remove(&index);
        }
        self.nodes.insert(index, node);
    }

    /// Remove the leaf at `index` from the tree.
    pub fn delete_leaf_node(&mut self, index: usize) {
        if !self.leaf_indices.remove(&index) {
            warn!("Deleting node {}, which is not a registered leaf.", index);
        }
        self.nodes.remove(&index);
    }

    /// Independent deep copy, sharing no storage with `self`.
    pub fn copy(&self) -> Tree {
        trace!("Copying tree with {} nodes.", self.nodes.len());
        self.clone()
    }

    /// A storage snapshot without the output buffer and the leaf
    /// row memberships.
    pub fn trim(&self) -> TrimmedTree {
        debug!("Trimming tree with {} nodes.", self.nodes.len());
        TrimmedTree::new(
            self.nodes
                .iter()
                .map(|(idx, node)| (*idx, node.without_data_points()))
                .collect(),
            self.leaf_node_value.clone(),
        )
    }

    /// Replace the leaf at `index` by a split on `split_variable` at
    /// `threshold` with two new leaf children, returning the children's indices.
    ///
    /// Which leaf, variable, and threshold to use, and how the rows are
    /// divided, are the caller's decision. This only checks that the result is
    /// still a valid tree.
    #[allow(clippy::too_many_arguments)]
    pub fn grow_leaf_node(
        &mut self,
        index: usize,
        split_variable: usize,
        threshold: f64,
        left_value: Vec<f64>,
        left_data_points: Vec<usize>,
        right_value: Vec<f64>,
        right_data_points: Vec<usize>,
    ) -> Result<(usize, usize), TreeError> {
        let node = self.nodes.get(&index).ok_or(TreeError::MissingNode(index))?;
        if node.is_split_node() {
            return Err(TreeError::NotALeaf(index));
        }
        let (left, right) = (node.get_idx_left_child(), node.get_idx_right_child());
        for child in [left, right] {
            if self.nodes.contains_key(&child) {
                return Err(TreeError::IndexOccupied(child));
            }
        }
        for value in [&left_value, &right_value] {
            if value.len() != self.shape.num_outputs {
                return Err(TreeError::ValueShape {
                    expected: self.shape.num_outputs,
                    found: value.len(),
                });
            }
        }
        let mut parent_points = node.data_point_indices.clone();
        let mut child_points: Vec<usize> = left_data_points.iter().chain(right_data_points.iter()).copied().collect();
        parent_points.sort_unstable();
        child_points.sort_unstable();
        if parent_points != child_points {
            return Err(TreeError::PartitionMismatch(index));
        }

        debug!(
            "Growing node {} on variable {} at {}, {} rows left and {} rows right.",
            index,
            split_variable,
            threshold,
            left_data_points.len(),
            right_data_points.len()
        );
        self.delete_leaf_node(index);
        self.set_node(index, Node::new_split_node(index, threshold, split_variable));
        self.set_node(left, Node::new_leaf_node(left, left_value, left_data_points));
        self.set_node(right, Node::new_leaf_node(right, right_value, right_data_points));
        Ok((left, right))
    }

    /// Verify the structural invariants: a full binary tree rooted at 0,
    /// a leaf registry matching the stored leaves, and leaves covering every
    /// training row exactly once.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        if !self.nodes.contains_key(&ROOT_INDEX) {
            return Err(TreeError::MissingNode(ROOT_INDEX));
        }
        let mut seen = Vec::with_capacity(self.data_point_indices.len());
        for (idx, node) in self.nodes.iter() {
            if *idx != node.index {
                return Err(TreeError::StructuralCorruption(*idx));
            }
            if *idx != ROOT_INDEX {
                let parent = node.get_idx_parent_node();
                match self.nodes.get(&parent) {
                    Some(p) if p.is_split_node() => (),
                    _ => return Err(TreeError::MissingNode(parent)),
                }
            }
            if node.is_split_node() {
                for child in [node.get_idx_left_child(), node.get_idx_right_child()] {
                    if !self.nodes.contains_key(&child) {
                        return Err(TreeError::MissingNode(child));
                    }
                }
                if self.leaf_indices.contains(idx) {
                    return Err(TreeError::LeafRegistry(*idx));
                }
                continue;
            }
            if !self.leaf_indices.contains(idx) {
                return Err(TreeError::LeafRegistry(*idx));
            }
            for point in node.data_point_indices.iter() {
                if *point >= self.shape.num_observations {
                    return Err(TreeError::DataPointOutOfRange {
                        index: *point,
                        num_observations: self.shape.num_observations,
                    });
                }
            }
            seen.extend(node.data_point_indices.iter().copied());
        }
        if let Some(idx) = self.leaf_indices.iter().find(|i| !self.nodes.contains_key(*i)) {
            return Err(TreeError::LeafRegistry(*idx));
        }
        seen.sort_unstable();
        if seen != self.data_point_indices {
            return Err(TreeError::PartitionMismatch(ROOT_INDEX));
        }
        Ok(())
    }

    /// Indices of the current leaves, in ascending order.
    pub fn leaf_indices(&self) -> Vec<usize> {
        let mut v: Vec<usize> = self.leaf_indices.iter().copied().collect();
        v.sort_unstable();
        v
    }

    pub fn num_leaves(&self) -> usize {
        self.leaf_indices.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Value the root leaf was created with.
    pub fn leaf_node_value(&self) -> &[f64] {
        &self.leaf_node_value
    }

    pub fn output_shape(&self) -> OutputShape {
        self.shape
    }

    /// Depth of the deepest node.
    pub fn max_depth(&self) -> usize {
        self.nodes.values().map(|n| n.depth()).max().unwrap_or(0)
    }
}

impl Index<usize> for Tree {
    type Output = Node;

    fn index(&self, index: usize) -> &Self::Output {
        self.get_node(index)
    }
}

/// Depth-first dump of the nodes, indented by depth.
pub(crate) fn fmt_nodes<T: TreeTraversal>(tree: &T, f: &mut fmt::Formatter) -> fmt::Result {
    let mut print_buffer: Vec<usize> = vec![ROOT_INDEX];
    let mut r = String::new();
    while let Some(idx) = print_buffer.pop() {
        let node = tree.get_node(idx);
        r += format!("{}{}\n", "      ".repeat(node.depth()), node).as_str();
        if node.is_split_node() {
            print_buffer.push(node.get_idx_right_child());
            print_buffer.push(node.get_idx_left_child());
        }
    }
    write!(f, "{}", r)
}

impl Display for Tree {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_nodes(self, f)
    }
}
