//! Conversions between the plain CSR type and `sprs`

use crate::matrix::SparseMatrixCSR;
use num_traits::Num;
use sprs::CsMat;

/// Converts a `sprs` matrix of either storage order to our CSR matrix
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csr() { matrix } else { matrix.to_csr() };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();
    SparseMatrixCSR::new(n_rows, n_cols, indptr, indices, data)
}
