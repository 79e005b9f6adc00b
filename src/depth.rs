//! Depth of a node in the implicit array-indexed binary tree.
use crate::constants::DEPTH_CACHE_SIZE;
use std::sync::OnceLock;

static DEPTH_CACHE: OnceLock<Vec<usize>> = OnceLock::new();

#[inline]
fn compute_depth(index: usize) -> usize {
    match index.checked_add(1) {
        Some(n) => n.ilog2() as usize,
        // log2(usize::MAX + 1) is exactly the bit width.
        None => usize::BITS as usize,
    }
}

/// Depth of the node stored at `index`, `floor(log2(index + 1))`.
///
/// The root sits at depth 0, its children at depth 1, and so on.
/// Indices below [`DEPTH_CACHE_SIZE`] are served from a table built on first use.
#[inline]
pub fn get_depth(index: usize) -> usize {
    let cache = DEPTH_CACHE.get_or_init(|| (0..DEPTH_CACHE_SIZE).map(compute_depth).collect());
    match cache.get(index) {
        Some(d) => *d,
        None => compute_depth(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_small_indices() {
        assert_eq!(get_depth(0), 0);
        assert_eq!(get_depth(1), 1);
        assert_eq!(get_depth(2), 1);
        for i in 3..=6 {
            assert_eq!(get_depth(i), 2);
        }
        assert_eq!(get_depth(7), 3);
        assert_eq!(get_depth(14), 3);
        assert_eq!(get_depth(15), 4);
    }

    #[test]
    fn test_depth_matches_float_log() {
        for i in 0..(DEPTH_CACHE_SIZE * 4) {
            let expected = ((i + 1) as f64).log2().floor() as usize;
            assert_eq!(get_depth(i), expected, "index {}", i);
        }
    }

    #[test]
    fn test_depth_past_cache() {
        assert_eq!(get_depth(DEPTH_CACHE_SIZE - 2), 9);
        assert_eq!(get_depth(DEPTH_CACHE_SIZE - 1), 10);
        assert_eq!(get_depth((1 << 20) - 1), 20);
    }

    #[test]
    fn test_depth_at_usize_limit() {
        assert_eq!(get_depth(usize::MAX), usize::BITS as usize);
        assert_eq!(get_depth(usize::MAX - 1), usize::BITS as usize - 1);
    }
}
