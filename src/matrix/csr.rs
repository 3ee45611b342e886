//! Plain Compressed Sparse Row matrix
//!
//! Independent of `sprs`, so the reference product used during verification
//! shares no code with the library being benchmarked.

use num_traits::Num;
use std::fmt;

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// - `row_ptr` has `n_rows + 1` entries; row `i` occupies
///   `row_ptr[i]..row_ptr[i + 1]` of `col_idx` and `values`
/// - `col_idx` and `values` have one entry per stored element
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    pub n_rows: usize,
    pub n_cols: usize,
    pub row_ptr: Vec<usize>,
    pub col_idx: Vec<usize>,
    pub values: Vec<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates a CSR matrix from its raw arrays
    ///
    /// # Panics
    ///
    /// Panics if the arrays are inconsistent with each other or with the
    /// dimensions.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");
        assert_eq!(
            row_ptr[n_rows],
            col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );
        for &col in &col_idx {
            assert!(col < n_cols, "Column index {} out of bounds (n_cols = {})", col, n_cols);
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterates `(col_idx, value)` over the stored elements of row `i`
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {} × {}, nnz {} {{", self.n_rows, self.n_cols, self.values.len())?;
        for i in 0..self.n_rows.min(5) {
            let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
            write!(f, "  row {}:", i)?;
            for k in start..end.min(start + 5) {
                write!(f, " ({}, {:?})", self.col_idx[k], self.values[k])?;
            }
            if end - start > 5 {
                write!(f, " ... ({} more)", end - start - 5)?;
            }
            writeln!(f)?;
        }
        if self.n_rows > 5 {
            writeln!(f, "  ... ({} more rows)", self.n_rows - 5)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_iter() {
        let matrix = SparseMatrixCSR::new(
            3, 3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
        );

        assert_eq!(matrix.nnz(), 5);
        assert_eq!(matrix.row_iter(0).collect::<Vec<_>>(), vec![(0, &1), (1, &2)]);
        assert_eq!(matrix.row_iter(1).collect::<Vec<_>>(), vec![(1, &3)]);
        assert_eq!(matrix.row_iter(2).collect::<Vec<_>>(), vec![(0, &4), (2, &5)]);
    }

    #[test]
    #[should_panic(expected = "row_ptr.len() must be n_rows + 1")]
    fn test_invalid_row_ptr() {
        SparseMatrixCSR::new(3, 3, vec![0, 2, 3], vec![0, 1, 1, 0, 2], vec![1, 2, 3, 4, 5]);
    }
}
