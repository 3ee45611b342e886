//! Element comparison used by verification

use ndarray::ArrayView2;
use sprs::CsMat;

use crate::matrix::SparseMatrixCSR;

/// `|actual - expected| <= rel * max(1, scale)`
pub fn within(actual: f64, expected: f64, rel: f64, scale: f64) -> bool {
    (actual - expected).abs() <= rel * scale.abs().max(1.0)
}

/// Compare two dense matrices element by element
///
/// `rel` is scaled per element by `max(1, |expected|)` when `scale` is
/// `None`, otherwise by `max(1, scale)` for every element.
pub fn compare_dense(
    actual: ArrayView2<f64>,
    expected: ArrayView2<f64>,
    rel: f64,
    scale: Option<f64>,
) -> Result<(), String> {
    if actual.dim() != expected.dim() {
        return Err(format!(
            "shape mismatch: expected {:?}, found {:?}",
            expected.dim(),
            actual.dim()
        ));
    }
    for ((idx, &a), &e) in actual.indexed_iter().zip(expected.iter()) {
        if !within(a, e, rel, scale.unwrap_or(e)) {
            return Err(format!(
                "element ({}, {}): expected {}, found {}",
                idx.0, idx.1, e, a
            ));
        }
    }
    Ok(())
}

/// Check that two CSR matrices store the same pattern, then compare values
/// with `check(row, col, input, output)`
pub fn compare_same_pattern<F>(input: &CsMat<f64>, output: &CsMat<f64>, mut check: F) -> Result<(), String>
where
    F: FnMut(usize, usize, f64, f64) -> Result<(), String>,
{
    if input.shape() != output.shape() {
        return Err(format!(
            "shape mismatch: expected {:?}, found {:?}",
            input.shape(),
            output.shape()
        ));
    }
    if input.nnz() != output.nnz() {
        return Err(format!(
            "non-zero count mismatch: expected {}, found {}",
            input.nnz(),
            output.nnz()
        ));
    }

    for (row, (in_row, out_row)) in input.outer_iterator().zip(output.outer_iterator()).enumerate() {
        if in_row.indices() != out_row.indices() {
            return Err(format!("non-zero pattern differs in row {}", row));
        }
        for ((&col, &a), &b) in in_row.indices().iter().zip(in_row.data()).zip(out_row.data()) {
            check(row, col, a, b)?;
        }
    }
    Ok(())
}

/// Compare a `sprs` result against a reference CSR matrix
///
/// Entries present on only one side must be numerically zero, which lets
/// explicit zeros from cancellation through.
pub fn compare_with_reference(
    actual: &CsMat<f64>,
    reference: &SparseMatrixCSR<f64>,
    rel: f64,
) -> Result<(), String> {
    if actual.shape() != (reference.n_rows, reference.n_cols) {
        return Err(format!(
            "shape mismatch: expected {:?}, found {:?}",
            (reference.n_rows, reference.n_cols),
            actual.shape()
        ));
    }

    for (row, actual_row) in actual.outer_iterator().enumerate() {
        let mut found: Vec<(usize, f64)> = actual_row
            .indices()
            .iter()
            .copied()
            .zip(actual_row.data().iter().copied())
            .collect();
        found.sort_unstable_by_key(|&(col, _)| col);
        let expected: Vec<(usize, f64)> = reference.row_iter(row).map(|(c, &v)| (c, v)).collect();

        let (mut f, mut e) = (0, 0);
        while f < found.len() || e < expected.len() {
            let next_f = found.get(f).copied();
            let next_e = expected.get(e).copied();
            let (col, a, b) = match (next_f, next_e) {
                (Some((cf, a)), Some((ce, b))) if cf == ce => {
                    f += 1;
                    e += 1;
                    (cf, a, b)
                }
                (Some((cf, a)), Some((ce, _))) if cf < ce => {
                    f += 1;
                    (cf, a, 0.0)
                }
                (Some((cf, a)), None) => {
                    f += 1;
                    (cf, a, 0.0)
                }
                (_, Some((ce, b))) => {
                    e += 1;
                    (ce, 0.0, b)
                }
                (None, None) => break,
            };
            if !within(a, b, rel, b) {
                return Err(format!(
                    "element ({}, {}): expected {}, found {}",
                    row, col, b, a
                ));
            }
        }
    }
    Ok(())
}
