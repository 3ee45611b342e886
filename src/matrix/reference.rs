//! Reference SpGEMM used to cross-check the benchmarked product
//!
//! Row-by-row Gustavson product with a dense accumulator. Slow on wide
//! matrices but short enough to trust.

use num_traits::Num;
use std::ops::AddAssign;

use crate::matrix::SparseMatrixCSR;

/// Computes `a * b`, dropping entries that cancel to exactly zero
///
/// Columns within each output row are sorted.
pub fn reference_spgemm<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + AddAssign,
{
    assert_eq!(
        a.n_cols, b.n_rows,
        "Matrix dimensions must be compatible for multiplication"
    );

    let mut row_ptr = Vec::with_capacity(a.n_rows + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    let mut accum = vec![T::zero(); b.n_cols];
    let mut occupied = vec![false; b.n_cols];
    let mut touched: Vec<usize> = Vec::new();

    for i in 0..a.n_rows {
        for (k, &a_val) in a.row_iter(i) {
            for (j, &b_val) in b.row_iter(k) {
                if !occupied[j] {
                    occupied[j] = true;
                    touched.push(j);
                }
                accum[j] += a_val * b_val;
            }
        }

        touched.sort_unstable();
        for &j in &touched {
            if !accum[j].is_zero() {
                col_idx.push(j);
                values.push(accum[j]);
            }
            accum[j] = T::zero();
            occupied[j] = false;
        }
        touched.clear();
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(a.n_rows, b.n_cols, row_ptr, col_idx, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_multiplication() {
        // A = [1 2; 0 3], B = [4 5; 6 7], A*B = [16 19; 18 21]
        let a = SparseMatrixCSR::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1, 2, 3]);
        let b = SparseMatrixCSR::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![4, 5, 6, 7]);

        let c = reference_spgemm(&a, &b);

        assert_eq!(c.row_ptr, vec![0, 2, 4]);
        assert_eq!(c.col_idx, vec![0, 1, 0, 1]);
        assert_eq!(c.values, vec![16, 19, 18, 21]);
    }

    #[test]
    fn test_cancellation_is_dropped() {
        // [1 1] * [1; -1] = [0]
        let a = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![0, 1], vec![1, 1]);
        let b = SparseMatrixCSR::new(2, 1, vec![0, 1, 2], vec![0, 0], vec![1, -1]);

        let c = reference_spgemm(&a, &b);
        assert_eq!(c.nnz(), 0);
        assert_eq!(c.row_ptr, vec![0, 0]);
    }

    #[test]
    fn test_identity_multiplication() {
        let identity = SparseMatrixCSR::new(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![1, 1, 1]);
        let diagonal = SparseMatrixCSR::new(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![5, 6, 7]);

        assert_eq!(reference_spgemm(&identity, &diagonal), diagonal);
    }
}
