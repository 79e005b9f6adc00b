use super::tree::Tree;
use crate::constants::ROOT_INDEX;
use crate::data::Matrix;
use crate::errors::TreeError;
use crate::node::Node;
use crate::utils::mean_of_values;
use hashbrown::HashMap;
use log::trace;
use rayon::prelude::*;

/// Look a node up, treating a missing index as a broken tree.
#[inline]
pub(crate) fn node_or_corrupt(nodes: &HashMap<usize, Node>, index: usize) -> &Node {
    match nodes.get(&index) {
        Some(node) => node,
        None => panic!("{}", TreeError::StructuralCorruption(index)),
    }
}

/// Read-only traversal over an array-indexed tree.
///
/// Implemented by the working [`Tree`] and by its trimmed snapshot, so both
/// evaluate points through the same descent.
pub trait TreeTraversal {
    /// All stored nodes, keyed by their array position.
    fn nodes(&self) -> &HashMap<usize, Node>;

    /// Get the node at `index`.
    ///
    /// # Panics
    /// If no node is stored there. Every index reached by a lookup is implied
    /// by the tree structure, so a miss means the tree is corrupt.
    fn get_node(&self, index: usize) -> &Node {
        node_or_corrupt(self.nodes(), index)
    }

    /// Predict the output for a single point `x`.
    ///
    /// Split nodes testing a variable in `excluded` are not resolved by
    /// comparison. Instead the unweighted mean of every leaf value below it
    /// is returned, marginalizing over that variable. `excluded` may be empty.
    fn predict_point(&self, x: &[f64], excluded: &[usize]) -> Vec<f64> {
        let mut node = self.get_node(ROOT_INDEX);
        loop {
            match node.split_variable {
                None => return node.value.clone(),
                Some(var) if excluded.contains(&var) => {
                    let mut leaf_values = Vec::new();
                    self.collect_leaf_values(node.index, &mut leaf_values);
                    return mean_of_values(&leaf_values);
                }
                Some(_) => node = self.get_node(node.get_child_idx(x)),
            }
        }
    }

    /// Push the value of every leaf in the subtree rooted at `index`,
    /// left branches first.
    fn collect_leaf_values<'a>(&'a self, index: usize, leaf_values: &mut Vec<&'a [f64]>) {
        let mut stack = vec![index];
        while let Some(idx) = stack.pop() {
            let node = self.get_node(idx);
            if node.is_leaf_node() {
                leaf_values.push(&node.value);
            } else {
                stack.push(node.get_idx_right_child());
                stack.push(node.get_idx_left_child());
            }
        }
    }

    /// The variable tested by each split node, one entry per split.
    ///
    /// Entries are ordered by node index. Consumers counting variable
    /// inclusion should treat the result as a multiset.
    fn split_variables(&self) -> Vec<usize> {
        let mut splits: Vec<&Node> = self.nodes().values().filter(|n| n.is_split_node()).collect();
        splits.sort_unstable_by_key(|n| n.index);
        splits.iter().filter_map(|n| n.split_variable).collect()
    }

    /// Predict every row of `data`, optionally across the rayon pool.
    fn predict_rows(&self, data: &Matrix<f64>, excluded: &[usize], parallel: bool) -> Vec<Vec<f64>>
    where
        Self: Sync,
    {
        if parallel {
            data.index
                .par_iter()
                .map(|i| self.predict_point(&data.get_row(*i), excluded))
                .collect()
        } else {
            data.index
                .iter()
                .map(|i| self.predict_point(&data.get_row(*i), excluded))
                .collect()
        }
    }
}

impl TreeTraversal for Tree {
    fn nodes(&self) -> &HashMap<usize, Node> {
        &self.nodes
    }
}

impl Tree {
    /// Predict every training row by scattering leaf values into the
    /// output buffer.
    ///
    /// The buffer is reused across calls. It is returned output-major: the
    /// predictions for output `d` are `num_observations` contiguous values
    /// starting at `d * num_observations`.
    pub fn predict_batch(&mut self) -> &[f64] {
        let n_obs = self.shape.num_observations;
        trace!("Scattering {} leaves into {} rows.", self.leaf_indices.len(), n_obs);
        for leaf_idx in self.leaf_indices.iter() {
            let leaf = node_or_corrupt(&self.nodes, *leaf_idx);
            for row in leaf.data_point_indices.iter() {
                for (d, v) in leaf.value.iter().enumerate() {
                    self.output[d * n_obs + row] = *v;
                }
            }
        }
        &self.output
    }
}
