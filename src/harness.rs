//! Batch orchestration
//!
//! One run scans the input directory, benchmarks every dense file and then
//! every sparse file, smallest first, and writes one CSV per class. The
//! first error ends the run before any report is written.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::{CatalogEntry, MatrixCatalog};
use crate::config::{BenchConfig, MatrixClass};
use crate::error::{BenchError, Result};
use crate::matrix::{DenseWorkload, SparseWorkload};
use crate::profiler::{create_profiler, Profiler};
use crate::results::ResultCollector;
use crate::runner::{run_entry, Workload};

/// Size the global rayon pool used by the element-wise kernels
///
/// Must run once, before any benchmark; a second call fails.
pub fn configure_threads(threads: usize) -> Result<()> {
    if threads == 0 {
        return Err(BenchError::Usage("thread count must be at least 1".to_string()));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| BenchError::Usage(format!("cannot configure {} worker threads: {}", threads, e)))
}

/// Benchmark `entries` in order with one workload
pub fn run_batch<W: Workload>(
    workload: &W,
    entries: &[CatalogEntry],
    output_dir: &Path,
    verify: bool,
    profiler: &mut dyn Profiler,
) -> Result<ResultCollector> {
    let mut results = ResultCollector::new(entries.len());
    for entry in entries {
        results.insert(run_entry(workload, entry, output_dir, verify, profiler)?);
    }
    Ok(results)
}

/// Records and report locations of a completed run
#[derive(Debug)]
pub struct RunSummary {
    pub dense: ResultCollector,
    pub sparse: ResultCollector,
    pub dense_csv: PathBuf,
    pub sparse_csv: PathBuf,
}

/// Drives a full run from a [`BenchConfig`]
pub struct Harness {
    config: BenchConfig,
    profiler: Box<dyn Profiler>,
}

impl Harness {
    pub fn new(config: BenchConfig) -> Self {
        let profiler = create_profiler(config.profiler);
        Self { config, profiler }
    }

    /// Use a caller-supplied profiler instead of the configured kind
    pub fn with_profiler(config: BenchConfig, profiler: Box<dyn Profiler>) -> Self {
        Self { config, profiler }
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        let config = &self.config;
        let catalog = MatrixCatalog::scan(&config.input_dir)?.sorted_by_size();
        info!(
            input = %config.input_dir.display(),
            dense = catalog.dense().len(),
            sparse = catalog.sparse().len(),
            dense_op = ?config.dense_op,
            sparse_op = ?config.sparse_op,
            verify = config.verify,
            "starting benchmark run"
        );

        self.profiler.init();
        let dense = run_batch(
            &DenseWorkload::new(config.dense_op),
            catalog.dense(),
            &config.output_dir,
            config.verify,
            &mut *self.profiler,
        )?;
        let sparse = run_batch(
            &SparseWorkload::new(config.sparse_op),
            catalog.sparse(),
            &config.output_dir,
            config.verify,
            &mut *self.profiler,
        )?;
        self.profiler.close();

        let dense_csv = dense.write_csv(&config.result_dir, MatrixClass::Dense.report_name())?;
        let sparse_csv = sparse.write_csv(&config.result_dir, MatrixClass::Sparse.report_name())?;
        info!(
            dense = %dense_csv.display(),
            sparse = %sparse_csv.display(),
            "wrote reports"
        );

        Ok(RunSummary {
            dense,
            sparse,
            dense_csv,
            sparse_csv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threads_is_usage_error() {
        let err = configure_threads(0).unwrap_err();
        assert_eq!(err.phase(), "usage");
    }

    #[test]
    fn test_missing_input_dir_fails_before_reports() {
        let result_dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            input_dir: PathBuf::from("/no/such/input/dir"),
            result_dir: result_dir.path().to_path_buf(),
            ..BenchConfig::default()
        };

        let err = Harness::new(config).run().unwrap_err();
        assert_eq!(err.phase(), "io");
        assert!(!result_dir.path().join("dense.csv").exists());
    }
}
