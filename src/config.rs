//! Run configuration and operation selection

use clap::ValueEnum;
use std::path::PathBuf;

/// The two matrix groups a catalog is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixClass {
    Dense,
    Sparse,
}

impl MatrixClass {
    /// Classify a file name by substring
    ///
    /// Names containing both or neither of `dense`/`sparse` are not
    /// benchmarked.
    pub fn classify(file_name: &str) -> Option<MatrixClass> {
        let dense = file_name.contains("dense");
        let sparse = file_name.contains("sparse");
        match (dense, sparse) {
            (true, false) => Some(MatrixClass::Dense),
            (false, true) => Some(MatrixClass::Sparse),
            _ => None,
        }
    }

    /// File name of the CSV report for this class
    pub fn report_name(&self) -> &'static str {
        match self {
            MatrixClass::Dense => "dense.csv",
            MatrixClass::Sparse => "sparse.csv",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixClass::Dense => "dense",
            MatrixClass::Sparse => "sparse",
        }
    }
}

/// Transformation applied to every dense matrix of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DenseOperation {
    /// `a[i, j]^2` for every element
    #[default]
    ElementwiseSquare,
    /// Full matrix inverse
    Invert,
    /// `y = 42 * A x + 33 * z` with seeded random `x` and `z`
    MatVec,
}

impl DenseOperation {
    /// Profiler region bracketing the compute phase
    pub fn region(&self) -> &'static str {
        match self {
            DenseOperation::MatVec => "DenseMV",
            _ => "dense",
        }
    }

    /// Analytical floating-point operation count for a `rows x cols` input
    ///
    /// This is an estimate of the textbook algorithm, not a measured count.
    pub fn fp_ops(&self, rows: usize, cols: usize) -> u64 {
        let (rows, cols) = (rows as u64, cols as u64);
        match self {
            DenseOperation::ElementwiseSquare => rows * cols,
            DenseOperation::Invert => 2 * rows * rows * cols,
            DenseOperation::MatVec => 2 * rows * cols + 3 * rows,
        }
    }
}

/// Transformation applied to every sparse matrix of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SparseOperation {
    /// `A ∘ A`, squaring every stored entry
    ///
    /// Counted as one multiply per stored entry, so the estimate is `nnz`.
    #[default]
    ElementwiseSquare,
    /// `A * A`
    Product,
}

impl SparseOperation {
    pub fn region(&self) -> &'static str {
        "sparse"
    }
}

/// Backend receiving the compute-phase profiling regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProfilerKind {
    /// Regions are ignored
    #[default]
    None,
    /// Regions become `tracing` spans and are summarised on close
    Tracing,
}

/// Default number of worker threads for the numeric libraries
pub fn default_threads() -> usize {
    num_cpus::get()
}

/// Everything a run needs, built once from the command line
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Directory scanned for `*dense*` and `*sparse*` files
    pub input_dir: PathBuf,
    /// Directory receiving `<file name>.out`
    pub output_dir: PathBuf,
    /// Directory receiving `dense.csv` and `sparse.csv`
    pub result_dir: PathBuf,
    /// Size of the global rayon pool
    pub threads: usize,
    /// Re-derive the input from each result and compare
    pub verify: bool,
    pub dense_op: DenseOperation,
    pub sparse_op: SparseOperation,
    pub profiler: ProfilerKind,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            input_dir: cwd.clone(),
            output_dir: cwd.clone(),
            result_dir: cwd,
            threads: default_threads(),
            verify: false,
            dense_op: DenseOperation::default(),
            sparse_op: SparseOperation::default(),
            profiler: ProfilerKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(MatrixClass::classify("dense_a.mtx"), Some(MatrixClass::Dense));
        assert_eq!(MatrixClass::classify("big_sparse.mtx"), Some(MatrixClass::Sparse));
        assert_eq!(MatrixClass::classify("densesparse.mtx"), None);
        assert_eq!(MatrixClass::classify("notes.txt"), None);
        // Substring match is case sensitive
        assert_eq!(MatrixClass::classify("DENSE_a.mtx"), None);
    }

    #[test]
    fn test_dense_fp_ops() {
        assert_eq!(DenseOperation::ElementwiseSquare.fp_ops(10, 10), 100);
        assert_eq!(DenseOperation::Invert.fp_ops(10, 10), 2000);
        assert_eq!(DenseOperation::MatVec.fp_ops(4, 3), 2 * 12 + 3 * 4);
    }

    #[test]
    fn test_regions() {
        assert_eq!(DenseOperation::Invert.region(), "dense");
        assert_eq!(DenseOperation::MatVec.region(), "DenseMV");
        assert_eq!(SparseOperation::Product.region(), "sparse");
    }

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert!(config.threads >= 1);
        assert!(!config.verify);
        assert_eq!(config.dense_op, DenseOperation::ElementwiseSquare);
        assert_eq!(config.sparse_op, SparseOperation::ElementwiseSquare);
        assert_eq!(config.input_dir, config.result_dir);
    }
}
