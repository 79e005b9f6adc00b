use bart_tree::{Matrix, OutputShape, Tree, TreeTraversal};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Grow a complete tree of the given depth over evenly spread rows of a
/// single feature in [0, 1).
fn complete_tree(rows: usize, depth: u32) -> (Vec<f64>, Tree) {
    let data_vec: Vec<f64> = (0..rows).map(|i| i as f64 / rows as f64).collect();
    let mut tree = Tree::new(vec![0.0], (0..rows).collect(), OutputShape::scalar(rows));
    let mut frontier = vec![(0_usize, 0.0_f64, 1.0_f64)];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for (idx, lo, hi) in frontier {
            let mid = (lo + hi) / 2.0;
            let points = tree[idx].data_point_indices.clone();
            let (left, right): (Vec<usize>, Vec<usize>) = points.iter().partition(|i| data_vec[**i] <= mid);
            let (l, r) = tree
                .grow_leaf_node(idx, 0, mid, vec![lo], left, vec![hi], right)
                .unwrap();
            next.push((l, lo, mid));
            next.push((r, mid, hi));
        }
        frontier = next;
    }
    (data_vec, tree)
}

pub fn tree_benchmarks(c: &mut Criterion) {
    let rows = 10_000;
    let (data_vec, mut tree) = complete_tree(rows, 6);
    let data = Matrix::new(&data_vec, rows, 1);
    let none: Vec<usize> = Vec::new();
    let excluded: Vec<usize> = vec![0];

    c.bench_function("predict_batch", |b| b.iter(|| black_box(tree.predict_batch().len())));
    c.bench_function("predict_point", |b| {
        b.iter(|| tree.predict_point(black_box(&[0.37]), black_box(&none)))
    });
    c.bench_function("predict_point excluded", |b| {
        b.iter(|| tree.predict_point(black_box(&[0.37]), black_box(&excluded)))
    });
    c.bench_function("predict_rows parallel", |b| {
        b.iter(|| tree.predict_rows(black_box(&data), &none, true))
    });
    c.bench_function("copy", |b| b.iter(|| black_box(tree.copy())));
    c.bench_function("trim", |b| b.iter(|| black_box(tree.trim())));
}

criterion_group!(benches, tree_benchmarks);
criterion_main!(benches);
