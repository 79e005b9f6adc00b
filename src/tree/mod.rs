pub mod predict;
pub mod tree;
pub mod trimmed;
