/// Number of node indices whose depth is precomputed.
/// Covers every node of a tree up to depth 9.
pub const DEPTH_CACHE_SIZE: usize = 1024;
/// Index of the root node.
pub const ROOT_INDEX: usize = 0;
