//! # Timed load/compute/store driver
//!
//! A [`Workload`] describes how one matrix class is read, transformed,
//! checked and written. [`run_entry`] drives the three phases for one catalog
//! entry, timing each independently so that I/O is never charged to compute.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::catalog::CatalogEntry;
use crate::config::MatrixClass;
use crate::error::Result;
use crate::profiler::{ProfileRegion, Profiler};
use crate::results::BenchmarkRecord;

/// Load/compute/store contract for one matrix class
pub trait Workload {
    /// In-memory matrix handle
    type Matrix;

    fn class(&self) -> MatrixClass;

    /// Profiler region bracketing `compute`
    fn region(&self) -> &'static str;

    fn load(&self, path: &Path) -> Result<Self::Matrix>;

    /// Apply the fixed transformation, leaving `input` untouched
    fn compute(&self, input: &Self::Matrix, path: &Path) -> Result<Self::Matrix>;

    /// Re-derive `input` from `output` and compare
    fn verify(&self, input: &Self::Matrix, output: &Self::Matrix, path: &Path) -> Result<()>;

    fn store(&self, output: &Self::Matrix, path: &Path) -> Result<()>;

    /// Payload bytes of the loaded input
    fn data_size(&self, input: &Self::Matrix) -> u64;

    /// Analytical operation count of `compute` on `input`
    fn fp_ops(&self, input: &Self::Matrix) -> u64;
}

/// Where the result of `entry` is written: `output_dir/<file name>.out`
pub fn output_path(entry: &CatalogEntry, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.out", entry.file_name()))
}

/// Benchmark a single matrix file
///
/// Any failing phase aborts with its error; no partial record is produced.
pub fn run_entry<W: Workload>(
    workload: &W,
    entry: &CatalogEntry,
    output_dir: &Path,
    verify: bool,
    profiler: &mut dyn Profiler,
) -> Result<BenchmarkRecord> {
    let t0 = Instant::now();
    let input = workload.load(&entry.path)?;
    let load_time = t0.elapsed().as_secs_f64();

    let t0 = Instant::now();
    let output = {
        let _region = ProfileRegion::new(profiler, workload.region());
        workload.compute(&input, &entry.path)?
    };
    let compute_time = t0.elapsed().as_secs_f64();

    if verify {
        workload.verify(&input, &output, &entry.path)?;
        debug!(path = %entry.path.display(), "verification passed");
    }

    let out_path = output_path(entry, output_dir);
    let t0 = Instant::now();
    workload.store(&output, &out_path)?;
    let store_time = t0.elapsed().as_secs_f64();

    let record = BenchmarkRecord::new(
        &entry.path,
        workload.data_size(&input),
        load_time,
        compute_time,
        store_time,
        workload.fp_ops(&input),
    );

    info!(
        class = workload.class().as_str(),
        path = %entry.path.display(),
        bytes = record.data_size,
        load_s = record.load_time,
        compute_s = record.compute_time,
        store_s = record.store_time,
        "benchmarked matrix"
    );
    Ok(record)
}
