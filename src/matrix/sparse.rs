//! Sparse workload on `sprs` CSR matrices

use rayon::prelude::*;
use sprs::CsMat;
use std::mem::size_of;
use std::path::Path;

use crate::config::{MatrixClass, SparseOperation};
use crate::error::{BenchError, Result};
use crate::io::MatrixMarketIO;
use crate::matrix::compare::{compare_same_pattern, compare_with_reference, within};
use crate::matrix::reference_spgemm;
use crate::runner::Workload;
use crate::utils::from_sprs_csr;

const ELEMENTWISE_TOLERANCE: f64 = 1e-9;
const PRODUCT_TOLERANCE: f64 = 1e-8;

/// Benchmarks one [`SparseOperation`] on coordinate Matrix Market files
#[derive(Debug, Clone, Copy, Default)]
pub struct SparseWorkload {
    op: SparseOperation,
}

impl SparseWorkload {
    pub fn new(op: SparseOperation) -> Self {
        Self { op }
    }
}

/// Number of scalar products formed by `a * b`
///
/// For every stored `a[i, k]` this adds the length of row `k` of `b`, the
/// same count that sizes the intermediate product of a row-wise SpGEMM.
pub fn intermediate_products(a: &CsMat<f64>, b: &CsMat<f64>) -> u64 {
    let b_row_nnz: Vec<usize> = b.outer_iterator().map(|row| row.nnz()).collect();
    a.outer_iterator()
        .map(|row| {
            row.indices()
                .iter()
                .map(|&k| b_row_nnz.get(k).copied().unwrap_or(0) as u64)
                .sum::<u64>()
        })
        .sum()
}

impl Workload for SparseWorkload {
    type Matrix = CsMat<f64>;

    fn class(&self) -> MatrixClass {
        MatrixClass::Sparse
    }

    fn region(&self) -> &'static str {
        self.op.region()
    }

    fn load(&self, path: &Path) -> Result<CsMat<f64>> {
        MatrixMarketIO::read_sparse(path).map_err(|e| BenchError::load(path, e))
    }

    fn compute(&self, input: &CsMat<f64>, path: &Path) -> Result<CsMat<f64>> {
        match self.op {
            SparseOperation::ElementwiseSquare => {
                let mut output = input.clone();
                output.data_mut().par_iter_mut().for_each(|v| *v *= *v);
                Ok(output)
            }
            SparseOperation::Product => {
                if input.rows() != input.cols() {
                    return Err(BenchError::compute(
                        path,
                        format!("cannot square a non-square {}x{} matrix", input.rows(), input.cols()),
                    ));
                }
                Ok(input * input)
            }
        }
    }

    fn verify(&self, input: &CsMat<f64>, output: &CsMat<f64>, path: &Path) -> Result<()> {
        let outcome = match self.op {
            SparseOperation::ElementwiseSquare => compare_same_pattern(input, output, |row, col, a, b| {
                let root = b.sqrt();
                if within(root, a.abs(), ELEMENTWISE_TOLERANCE, a) {
                    Ok(())
                } else {
                    Err(format!(
                        "element ({}, {}): expected {}, found {}",
                        row,
                        col,
                        a.abs(),
                        root
                    ))
                }
            }),
            SparseOperation::Product => {
                let csr = from_sprs_csr(input.clone());
                let reference = reference_spgemm(&csr, &csr);
                compare_with_reference(output, &reference, PRODUCT_TOLERANCE)
            }
        };
        outcome.map_err(|e| BenchError::verification(path, e))
    }

    fn store(&self, output: &CsMat<f64>, path: &Path) -> Result<()> {
        MatrixMarketIO::write_sparse(path, output).map_err(|e| BenchError::store(path, e))
    }

    fn data_size(&self, input: &CsMat<f64>) -> u64 {
        (input.nnz() * size_of::<f64>()) as u64
    }

    fn fp_ops(&self, input: &CsMat<f64>) -> u64 {
        match self.op {
            SparseOperation::ElementwiseSquare => input.nnz() as u64,
            SparseOperation::Product => 2 * intermediate_products(input, input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // [1 2 0]
    // [0 3 0]
    // [4 0 5]
    fn sample() -> CsMat<f64> {
        CsMat::new(
            (3, 3),
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        )
    }

    #[test]
    fn test_elementwise_square_keeps_pattern() {
        let workload = SparseWorkload::new(SparseOperation::ElementwiseSquare);
        let input = sample();
        let path = Path::new("sparse_t.mtx");

        let output = workload.compute(&input, path).unwrap();
        assert_eq!(output.nnz(), 5);
        assert_eq!(output.get(2, 2), Some(&25.0));
        assert_eq!(input.get(2, 2), Some(&5.0));
        workload.verify(&input, &output, path).unwrap();
    }

    #[test]
    fn test_elementwise_verify_detects_corruption() {
        let workload = SparseWorkload::new(SparseOperation::ElementwiseSquare);
        let input = sample();
        let path = Path::new("sparse_t.mtx");

        let mut output = workload.compute(&input, path).unwrap();
        output.data_mut()[3] = 17.0;
        let err = workload.verify(&input, &output, path).unwrap_err();
        assert!(err.to_string().contains("element (2, 0)"));
    }

    #[test]
    fn test_product_matches_reference() {
        let workload = SparseWorkload::new(SparseOperation::Product);
        let input = sample();
        let path = Path::new("sparse_p.mtx");

        let output = workload.compute(&input, path).unwrap();
        // Row 2 of A*A: [4 0 5] * A = [4*1 + 5*4, 4*2, 5*5]
        assert_eq!(output.get(2, 0), Some(&24.0));
        assert_eq!(output.get(2, 1), Some(&8.0));
        assert_eq!(output.get(2, 2), Some(&25.0));
        workload.verify(&input, &output, path).unwrap();

        let wrong = workload
            .compute(&CsMat::eye(3), path)
            .unwrap();
        assert!(workload.verify(&input, &wrong, path).is_err());
    }

    #[test]
    fn test_product_rejects_rectangular() {
        let workload = SparseWorkload::new(SparseOperation::Product);
        let rect = CsMat::new((2, 3), vec![0, 1, 2], vec![0, 2], vec![1.0, 1.0]);
        let err = workload.compute(&rect, Path::new("sparse_r.mtx")).unwrap_err();
        assert_eq!(err.phase(), "compute");
    }

    #[test]
    fn test_fp_ops() {
        let input = sample();
        // Row 0 touches rows 0 and 1 (2 + 1), row 1 touches row 1 (1),
        // row 2 touches rows 0 and 2 (2 + 2)
        assert_eq!(intermediate_products(&input, &input), 8);
        assert_eq!(SparseWorkload::new(SparseOperation::Product).fp_ops(&input), 16);
        assert_eq!(SparseWorkload::new(SparseOperation::ElementwiseSquare).fp_ops(&input), 5);
        assert_eq!(SparseWorkload::default().data_size(&input), 40);
    }
}
