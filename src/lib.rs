//! # matbench: dense and sparse matrix I/O and compute benchmarks
//!
//! Loads Matrix Market files from a directory, applies one fixed operation
//! per matrix class, writes the result back and records load, compute and
//! store timings with the derived read/write bandwidth.
//!
//! ## Pipeline
//!
//! 1. **Catalog**: [`MatrixCatalog::scan`] splits a directory into dense and
//!    sparse files by name and orders each group smallest-first.
//! 2. **Run**: [`run_entry`] drives a [`Workload`] through its load, compute
//!    and store phases, timing each on its own. [`DenseWorkload`] and
//!    [`SparseWorkload`] are the concrete workloads.
//! 3. **Report**: [`ResultCollector`] accumulates one [`BenchmarkRecord`]
//!    per file and writes `dense.csv` / `sparse.csv`.
//!
//! [`Harness`] wires the three together from a [`BenchConfig`].
//!
//! ## Usage
//!
//! ```no_run
//! use matbench::{BenchConfig, Harness};
//!
//! let config = BenchConfig {
//!     input_dir: "matrices".into(),
//!     verify: true,
//!     ..BenchConfig::default()
//! };
//! let summary = Harness::new(config).run()?;
//! println!("{} dense records", summary.dense.len());
//! # Ok::<(), matbench::BenchError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod harness;
pub mod io;
pub mod matrix;
pub mod profiler;
pub mod results;
pub mod runner;
pub mod utils;

pub use catalog::{sort_by_size, CatalogEntry, MatrixCatalog};
pub use config::{BenchConfig, DenseOperation, MatrixClass, ProfilerKind, SparseOperation};
pub use error::BenchError;
pub use harness::{configure_threads, run_batch, Harness, RunSummary};
pub use io::MatrixMarketIO;
pub use matrix::{reference_spgemm, DenseWorkload, SparseMatrixCSR, SparseWorkload};
pub use profiler::{NoopProfiler, Profiler, TracingProfiler};
pub use results::{bandwidth, BenchmarkRecord, ResultCollector};
pub use runner::{output_path, run_entry, Workload};

/// Version information for the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
