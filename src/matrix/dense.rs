//! Dense workload: `ndarray` storage, `nalgebra` inversion

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::mem::size_of;
use std::path::Path;

use crate::config::{DenseOperation, MatrixClass};
use crate::error::{BenchError, Result};
use crate::io::MatrixMarketIO;
use crate::matrix::compare::{compare_dense, within};
use crate::runner::Workload;

/// Scale applied to `A x` by [`DenseOperation::MatVec`]
pub const MATVEC_ALPHA: f64 = 42.0;
/// Scale applied to `z` by [`DenseOperation::MatVec`]
pub const MATVEC_BETA: f64 = 33.0;
/// Seed of the mat-vec operand generator
pub const MATVEC_SEED: u64 = 0;

const ELEMENTWISE_TOLERANCE: f64 = 1e-9;
const INVERSE_TOLERANCE: f64 = 1e-6;

/// Benchmarks one [`DenseOperation`] on `array`-layout Matrix Market files
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseWorkload {
    op: DenseOperation,
}

impl DenseWorkload {
    pub fn new(op: DenseOperation) -> Self {
        Self { op }
    }
}

/// Operand vectors `x` (length `cols`) and `z` (length `rows`)
///
/// Drawn from `Uniform(0, 1000)` with a fixed seed, so every run and every
/// verification sees the same values.
pub fn matvec_operands(rows: usize, cols: usize) -> (Array1<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(MATVEC_SEED);
    let x = Array1::from_shape_fn(cols, |_| rng.gen_range(0.0..1000.0));
    let z = Array1::from_shape_fn(rows, |_| rng.gen_range(0.0..1000.0));
    (x, z)
}

fn invert(input: &Array2<f64>) -> std::result::Result<Array2<f64>, String> {
    let (rows, cols) = input.dim();
    if rows != cols {
        return Err(format!("cannot invert a non-square {}x{} matrix", rows, cols));
    }
    let matrix = DMatrix::from_fn(rows, cols, |i, j| input[[i, j]]);
    let inverse = matrix
        .try_inverse()
        .ok_or_else(|| "matrix is singular".to_string())?;
    if inverse.iter().any(|v| !v.is_finite()) {
        return Err("inverse is not finite".to_string());
    }
    Ok(Array2::from_shape_fn((rows, cols), |(i, j)| inverse[(i, j)]))
}

fn mat_vec(input: &Array2<f64>) -> Array2<f64> {
    let (x, z) = matvec_operands(input.nrows(), input.ncols());
    let y = input.dot(&x) * MATVEC_ALPHA + &z * MATVEC_BETA;
    y.insert_axis(Axis(1))
}

impl DenseWorkload {
    fn verify_mat_vec(&self, input: &Array2<f64>, output: &Array2<f64>) -> std::result::Result<(), String> {
        let (rows, cols) = input.dim();
        if output.dim() != (rows, 1) {
            return Err(format!("expected a {}x1 result, found {:?}", rows, output.dim()));
        }
        let (x, z) = matvec_operands(rows, cols);
        for i in 0..rows {
            let mut acc = 0.0;
            let mut magnitude = 0.0;
            for j in 0..cols {
                acc += input[[i, j]] * x[j];
                magnitude += (input[[i, j]] * x[j]).abs();
            }
            let expected = MATVEC_ALPHA * acc + MATVEC_BETA * z[i];
            let scale = MATVEC_ALPHA * magnitude + MATVEC_BETA * z[i].abs();
            if !within(output[[i, 0]], expected, ELEMENTWISE_TOLERANCE, scale) {
                return Err(format!(
                    "element ({}, 0): expected {}, found {}",
                    i,
                    expected,
                    output[[i, 0]]
                ));
            }
        }
        Ok(())
    }
}

impl Workload for DenseWorkload {
    type Matrix = Array2<f64>;

    fn class(&self) -> MatrixClass {
        MatrixClass::Dense
    }

    fn region(&self) -> &'static str {
        self.op.region()
    }

    fn load(&self, path: &Path) -> Result<Array2<f64>> {
        MatrixMarketIO::read_dense(path).map_err(|e| BenchError::load(path, e))
    }

    fn compute(&self, input: &Array2<f64>, path: &Path) -> Result<Array2<f64>> {
        match self.op {
            DenseOperation::ElementwiseSquare => {
                let mut output = input.clone();
                output.par_mapv_inplace(|v| v * v);
                Ok(output)
            }
            DenseOperation::Invert => invert(input).map_err(|e| BenchError::compute(path, e)),
            DenseOperation::MatVec => Ok(mat_vec(input)),
        }
    }

    fn verify(&self, input: &Array2<f64>, output: &Array2<f64>, path: &Path) -> Result<()> {
        let outcome = match self.op {
            DenseOperation::ElementwiseSquare => {
                // sqrt(a^2) recovers |a|
                let roots = output.mapv(f64::sqrt);
                let magnitudes = input.mapv(f64::abs);
                compare_dense(roots.view(), magnitudes.view(), ELEMENTWISE_TOLERANCE, None)
            }
            DenseOperation::Invert => {
                let scale = input.iter().fold(0.0f64, |m, v| m.max(v.abs()));
                invert(output).and_then(|round_trip| {
                    compare_dense(round_trip.view(), input.view(), INVERSE_TOLERANCE, Some(scale))
                })
            }
            DenseOperation::MatVec => self.verify_mat_vec(input, output),
        };
        outcome.map_err(|e| BenchError::verification(path, e))
    }

    fn store(&self, output: &Array2<f64>, path: &Path) -> Result<()> {
        MatrixMarketIO::write_dense(path, output).map_err(|e| BenchError::store(path, e))
    }

    fn data_size(&self, input: &Array2<f64>) -> u64 {
        (input.len() * size_of::<f64>()) as u64
    }

    fn fp_ops(&self, input: &Array2<f64>) -> u64 {
        self.op.fp_ops(input.nrows(), input.ncols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_elementwise_square_and_verify() {
        let workload = DenseWorkload::new(DenseOperation::ElementwiseSquare);
        let input = array![[1.0, -2.0], [0.5, 3.0]];
        let path = Path::new("dense_t.mtx");

        let output = workload.compute(&input, path).unwrap();
        assert_eq!(output, array![[1.0, 4.0], [0.25, 9.0]]);
        workload.verify(&input, &output, path).unwrap();

        let mut corrupted = output.clone();
        corrupted[[1, 1]] = 10.0;
        let err = workload.verify(&input, &corrupted, path).unwrap_err();
        assert_eq!(err.phase(), "verify");
    }

    #[test]
    fn test_invert_and_verify() {
        let workload = DenseWorkload::new(DenseOperation::Invert);
        let input = array![[4.0, 7.0], [2.0, 6.0]];
        let path = Path::new("dense_inv.mtx");

        let output = workload.compute(&input, path).unwrap();
        assert!((output[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((output[[0, 1]] + 0.7).abs() < 1e-12);
        workload.verify(&input, &output, path).unwrap();

        let mut corrupted = output.clone();
        corrupted[[0, 0]] += 1.0;
        assert!(workload.verify(&input, &corrupted, path).is_err());
    }

    #[test]
    fn test_singular_matrix_is_a_compute_error() {
        let workload = DenseWorkload::new(DenseOperation::Invert);
        let err = workload
            .compute(&array![[1.0, 2.0], [2.0, 4.0]], Path::new("dense_s.mtx"))
            .unwrap_err();
        assert_eq!(err.phase(), "compute");

        let err = workload
            .compute(&Array2::zeros((2, 3)), Path::new("dense_r.mtx"))
            .unwrap_err();
        assert!(err.to_string().contains("non-square"));
    }

    #[test]
    fn test_mat_vec_and_verify() {
        let workload = DenseWorkload::new(DenseOperation::MatVec);
        let input = Array2::<f64>::eye(3);
        let path = Path::new("dense_mv.mtx");

        let output = workload.compute(&input, path).unwrap();
        let (x, z) = matvec_operands(3, 3);
        assert_eq!(output.dim(), (3, 1));
        for i in 0..3 {
            assert!((output[[i, 0]] - (42.0 * x[i] + 33.0 * z[i])).abs() < 1e-9);
        }
        workload.verify(&input, &output, path).unwrap();

        let mut corrupted = output.clone();
        corrupted[[2, 0]] += 1.0;
        assert!(workload.verify(&input, &corrupted, path).is_err());
    }

    #[test]
    fn test_operands_are_reproducible() {
        assert_eq!(matvec_operands(4, 5), matvec_operands(4, 5));
        let (x, _) = matvec_operands(4, 5);
        assert!(x.iter().all(|&v| (0.0..1000.0).contains(&v)));
    }

    #[test]
    fn test_metrics() {
        let workload = DenseWorkload::new(DenseOperation::Invert);
        let input = Array2::<f64>::eye(10);
        assert_eq!(workload.data_size(&input), 800);
        assert_eq!(workload.fp_ops(&input), 2000);
    }
}
