//! Benchmark records and CSV reporting

use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};

/// CSV column order of every report
pub const CSV_HEADER: [&str; 8] = [
    "data_path",
    "data_size",
    "load_time",
    "store_time",
    "compute_time",
    "fp_ops",
    "read_bw",
    "write_bw",
];

/// Measurements for one processed matrix file
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    pub path: PathBuf,
    /// Bytes of matrix payload (elements or non-zeros times value width)
    pub data_size: u64,
    /// Seconds
    pub load_time: f64,
    /// Seconds
    pub store_time: f64,
    /// Seconds
    pub compute_time: f64,
    /// Analytical estimate for the operation performed
    pub fp_ops: u64,
    /// MB/s, `None` when the load time was zero
    pub read_bw: Option<f64>,
    /// MB/s, `None` when the store time was zero
    pub write_bw: Option<f64>,
}

impl BenchmarkRecord {
    /// Build a record, deriving both bandwidths from the timings
    pub fn new(
        path: impl Into<PathBuf>,
        data_size: u64,
        load_time: f64,
        compute_time: f64,
        store_time: f64,
        fp_ops: u64,
    ) -> Self {
        Self {
            path: path.into(),
            data_size,
            load_time,
            store_time,
            compute_time,
            fp_ops,
            read_bw: bandwidth(data_size, load_time),
            write_bw: bandwidth(data_size, store_time),
        }
    }
}

/// Megabytes (10^6 bytes) per second, undefined for a zero duration
pub fn bandwidth(bytes: u64, seconds: f64) -> Option<f64> {
    if seconds > 0.0 {
        Some(bytes as f64 * 1e-6 / seconds)
    } else {
        None
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    data_path: std::borrow::Cow<'a, str>,
    data_size: u64,
    load_time: f64,
    store_time: f64,
    compute_time: f64,
    fp_ops: u64,
    read_bw: Option<f64>,
    write_bw: Option<f64>,
}

impl<'a> From<&'a BenchmarkRecord> for CsvRow<'a> {
    fn from(record: &'a BenchmarkRecord) -> Self {
        Self {
            data_path: record.path.to_string_lossy(),
            data_size: record.data_size,
            load_time: record.load_time,
            store_time: record.store_time,
            compute_time: record.compute_time,
            fp_ops: record.fp_ops,
            read_bw: record.read_bw,
            write_bw: record.write_bw,
        }
    }
}

/// Append-only store of the records of one matrix class
#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    records: Vec<BenchmarkRecord>,
}

impl ResultCollector {
    /// Reserve room for `expected` records up front
    pub fn new(expected: usize) -> Self {
        Self {
            records: Vec::with_capacity(expected),
        }
    }

    pub fn insert(&mut self, record: BenchmarkRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    /// Write every record to `dir/file_name`, header first
    pub fn write_csv<P: AsRef<Path>>(&self, dir: P, file_name: &str) -> Result<PathBuf> {
        let path = dir.as_ref().join(file_name);
        let file = File::create(&path).map_err(|e| BenchError::io(&path, e))?;
        self.write_to(file).map_err(|e| BenchError::io(&path, e))?;
        Ok(path)
    }

    fn write_to<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);
        // Written explicitly so an empty collector still gets a header
        writer.write_record(CSV_HEADER)?;
        for record in &self.records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()
    }
}
