use super::predict::TreeTraversal;
use super::tree::fmt_nodes;
use crate::node::Node;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::Index;

/// Fitted tree kept for prediction only.
///
/// Holds split thresholds, split variables, and leaf values. The output
/// buffer and the training rows of each leaf are gone, so it cannot be grown
/// or batch-predicted, but [`TreeTraversal::predict_point`] gives the same
/// answers as on the tree it was trimmed from.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct TrimmedTree {
    nodes: HashMap<usize, Node>,
    leaf_node_value: Vec<f64>,
}

impl TrimmedTree {
    pub(crate) fn new(nodes: HashMap<usize, Node>, leaf_node_value: Vec<f64>) -> Self {
        TrimmedTree { nodes, leaf_node_value }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes.values().filter(|n| n.is_leaf_node()).count()
    }

    pub fn leaf_node_value(&self) -> &[f64] {
        &self.leaf_node_value
    }
}

impl TreeTraversal for TrimmedTree {
    fn nodes(&self) -> &HashMap<usize, Node> {
        &self.nodes
    }
}

impl Index<usize> for TrimmedTree {
    type Output = Node;

    fn index(&self, index: usize) -> &Self::Output {
        self.get_node(index)
    }
}

impl Display for TrimmedTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_nodes(self, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::data::OutputShape;
    use crate::tree::predict::TreeTraversal;
    use crate::tree::tree::Tree;

    fn two_level_tree() -> Tree {
        let mut tree = Tree::new(vec![0.0], (0..4).collect(), OutputShape::scalar(4));
        tree.grow_leaf_node(0, 0, 0.5, vec![1.0], vec![0, 1], vec![9.0], vec![2, 3])
            .unwrap();
        tree.grow_leaf_node(2, 1, 2.0, vec![4.0], vec![2], vec![6.0], vec![3])
            .unwrap();
        tree
    }

    #[test]
    fn test_trim_drops_memberships() {
        let tree = two_level_tree();
        let trimmed = tree.trim();
        assert_eq!(trimmed.num_nodes(), tree.num_nodes());
        assert_eq!(trimmed.num_leaves(), 3);
        assert!(trimmed.nodes().values().all(|n| n.data_point_indices.is_empty()));
        assert_eq!(trimmed[2].split_variable, Some(1));
        assert_eq!(trimmed[5].value, vec![4.0]);
        assert_eq!(trimmed.leaf_node_value(), &[0.0]);
        // The source keeps its rows.
        assert_eq!(tree[1].data_point_indices, vec![0, 1]);
    }

    #[test]
    fn test_trim_predicts_like_source() {
        let tree = two_level_tree();
        let trimmed = tree.trim();
        let points = [[0.1, 0.0], [0.9, 1.0], [0.9, 3.0], [0.5, 2.0], [-4.0, 10.0]];
        for x in points.iter() {
            for excluded in [vec![], vec![0], vec![1], vec![0, 1]] {
                assert_eq!(trimmed.predict_point(x, &excluded), tree.predict_point(x, &excluded));
            }
        }
        assert_eq!(trimmed.split_variables(), tree.split_variables());
    }

    #[test]
    fn test_trimmed_serializes_without_rows() {
        let trimmed = two_level_tree().trim();
        let json = serde_json::to_string(&trimmed).unwrap();
        let restored: super::TrimmedTree = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, trimmed);
        assert_eq!(restored.predict_point(&[0.9, 3.0], &[]), vec![6.0]);
    }

    #[test]
    fn test_trimmed_display() {
        let trimmed = two_level_tree().trim();
        let s = format!("{}", trimmed);
        assert_eq!(s.lines().count(), 5);
        assert!(s.starts_with("0:[0 <= 0.5]"));
    }
}
