//! Matrix Market reading and writing
//!
//! Sparse matrices and coordinate-layout files go through `sprs::io`. Dense
//! benchmarks usually ship in the column-major `array` layout, which `sprs`
//! does not read, so that layout is handled here.

use ndarray::Array2;
use sprs::io::{read_matrix_market, write_matrix_market};
use sprs::CsMat;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const BANNER: &str = "%%MatrixMarket";

/// Storage layout named in the Matrix Market banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketLayout {
    /// `rows cols` followed by every value in column-major order
    Array,
    /// `rows cols nnz` followed by `row col value` triplets
    Coordinate,
}

/// Matrix Market format reader/writer
pub struct MatrixMarketIO;

impl MatrixMarketIO {
    /// Read a dense matrix from either layout
    pub fn read_dense<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, String> {
        let path = path.as_ref();
        match Self::detect_layout(path)? {
            MarketLayout::Array => Self::read_array(path),
            MarketLayout::Coordinate => {
                let sparse = Self::read_sparse(path)?;
                sparse
                    .rows()
                    .checked_mul(sparse.cols())
                    .ok_or_else(|| "matrix dimensions overflow".to_string())?;
                Ok(sparse.to_dense())
            }
        }
    }

    /// Write a dense matrix in the `array real general` layout
    pub fn write_dense<P: AsRef<Path>>(path: P, matrix: &Array2<f64>) -> Result<(), String> {
        let file = File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;
        let mut out = BufWriter::new(file);

        writeln!(out, "{} matrix array real general", BANNER)
            .map_err(|e| format!("Failed to write header: {}", e))?;
        writeln!(out, "{} {}", matrix.nrows(), matrix.ncols())
            .map_err(|e| format!("Failed to write dimensions: {}", e))?;

        // Column-major, one value per line
        for column in matrix.columns() {
            for value in column.iter() {
                writeln!(out, "{}", value).map_err(|e| format!("Failed to write entry: {}", e))?;
            }
        }

        out.flush().map_err(|e| format!("Failed to flush: {}", e))
    }

    /// Read a sparse matrix in coordinate layout as CSR
    pub fn read_sparse<P: AsRef<Path>>(path: P) -> Result<CsMat<f64>, String> {
        let triplets = read_matrix_market::<f64, usize, _>(path).map_err(|e| e.to_string())?;
        Ok(triplets.to_csr())
    }

    /// Write a sparse matrix in the `coordinate real general` layout
    pub fn write_sparse<P: AsRef<Path>>(path: P, matrix: &CsMat<f64>) -> Result<(), String> {
        write_matrix_market(path, matrix).map_err(|e| format!("Failed to write matrix: {}", e))
    }

    /// Work out the layout from the banner, or from the size line when the
    /// banner is missing
    pub fn detect_layout<P: AsRef<Path>>(path: P) -> Result<MarketLayout, String> {
        let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Failed to read line: {}", e))?;
            if line.starts_with(BANNER) {
                let lower = line.to_ascii_lowercase();
                if lower.contains(" array") {
                    return Ok(MarketLayout::Array);
                }
                if lower.contains(" coordinate") {
                    return Ok(MarketLayout::Coordinate);
                }
                return Err(format!("Unsupported Matrix Market banner: {}", line));
            }
            if line.starts_with('%') || line.trim().is_empty() {
                continue;
            }
            return match line.split_whitespace().count() {
                2 => Ok(MarketLayout::Array),
                3 => Ok(MarketLayout::Coordinate),
                _ => Err("Invalid Matrix Market size line".to_string()),
            };
        }

        Err("Missing Matrix Market header".to_string())
    }

    fn read_array(path: &Path) -> Result<Array2<f64>, String> {
        let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
        let file_len = file
            .metadata()
            .map_err(|e| format!("Failed to read file metadata: {}", e))?
            .len();
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        // Skip banner and comments
        let mut size_line = None;
        for line in lines.by_ref() {
            let line = line.map_err(|e| format!("Failed to read line: {}", e))?;
            if line.starts_with(BANNER) {
                let lower = line.to_ascii_lowercase();
                if !lower.contains("general") {
                    return Err(format!("Only general array matrices are supported: {}", line));
                }
                continue;
            }
            if line.starts_with('%') || line.trim().is_empty() {
                continue;
            }
            size_line = Some(line);
            break;
        }
        let size_line = size_line.ok_or_else(|| "Missing Matrix Market size line".to_string())?;

        let parts: Vec<&str> = size_line.split_whitespace().collect();
        if parts.len() != 2 {
            return Err("Invalid Matrix Market array size line".to_string());
        }
        let n_rows: usize = parts[0]
            .parse()
            .map_err(|_| "Invalid number of rows".to_string())?;
        let n_cols: usize = parts[1]
            .parse()
            .map_err(|_| "Invalid number of columns".to_string())?;

        let expected = n_rows
            .checked_mul(n_cols)
            .ok_or_else(|| "matrix dimensions overflow".to_string())?;
        // Every value takes at least two bytes, so the file bounds the count
        let plausible = usize::try_from(file_len / 2).unwrap_or(usize::MAX);
        let mut values: Vec<f64> = Vec::with_capacity(expected.min(plausible));
        for line in lines {
            let line = line.map_err(|e| format!("Failed to read line: {}", e))?;
            if line.starts_with('%') {
                continue;
            }
            for token in line.split_whitespace() {
                let value: f64 = token
                    .parse()
                    .map_err(|_| format!("Invalid value: {}", token))?;
                values.push(value);
            }
        }

        if values.len() != expected {
            return Err(format!(
                "Expected {} values for a {}x{} matrix, found {}",
                expected,
                n_rows,
                n_cols,
                values.len()
            ));
        }

        // Values are column-major: read them as the transpose, then flip
        let transposed = Array2::from_shape_vec((n_cols, n_rows), values)
            .map_err(|e| format!("Invalid matrix shape: {}", e))?;
        Ok(transposed.reversed_axes().as_standard_layout().into_owned())
    }
}
