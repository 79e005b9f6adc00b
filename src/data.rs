use serde::{Deserialize, Serialize};

/// Dimensions of the output buffer a tree writes its
/// full-dataset predictions into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputShape {
    /// Number of training observations, rows of the buffer.
    pub num_observations: usize,
    /// Length of every leaf value, columns of the buffer.
    pub num_outputs: usize,
}

impl OutputShape {
    pub fn new(num_observations: usize, num_outputs: usize) -> Self {
        OutputShape {
            num_observations,
            num_outputs,
        }
    }

    /// Shape of a single-output regression tree.
    pub fn scalar(num_observations: usize) -> Self {
        OutputShape::new(num_observations, 1)
    }

    /// Total number of cells in the buffer.
    pub fn len(&self) -> usize {
        self.num_observations * self.num_outputs
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed feature matrix, stored one column after another.
///
/// Column `j` holds the covariate tested by split nodes whose split
/// variable is `j`.
pub struct Matrix<'a, T> {
    pub data: &'a [T],
    /// Rows to evaluate, all of them by default.
    pub index: Vec<usize>,
    pub rows: usize,
    pub cols: usize,
}

impl<'a, T: Copy> Matrix<'a, T> {
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
        }
    }

    /// Value of feature `col` for observation `row`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[col * self.rows + row]
    }

    /// Gather the features of one observation.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        (0..self.cols).map(|col| *self.get(row, col)).collect()
    }
}
