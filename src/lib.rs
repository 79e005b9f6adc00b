//! # bart_tree
//!
//! Array-indexed binary regression trees, the building block of
//! Bayesian Additive Regression Trees. A [`Tree`] starts as a single leaf
//! over the training rows and is grown one leaf at a time by an external
//! sampler. It predicts the whole training set by scattering leaf values and
//! single points by descent, optionally marginalizing over excluded variables.

// Modules
pub mod constants;
pub mod data;
pub mod depth;
pub mod errors;
pub mod node;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use data::{Matrix, OutputShape};
pub use depth::get_depth;
pub use errors::TreeError;
pub use node::Node;
pub use tree::predict::TreeTraversal;
pub use tree::tree::Tree;
pub use tree::trimmed::TrimmedTree;
